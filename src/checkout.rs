//! Browser-SDK payment request payloads.
//!
//! A server renders these payloads and hands them to the JavaScript payment
//! widget. [`PaymentMethod`] carries exactly the options that apply to each
//! method, and [`CheckoutRequest::to_payload`] is the single mapping to the
//! wire shape.

use serde::Serialize;

use crate::{payments::require, Currency, Result, TossPaymentsError};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Amount {
    pub value: f64,
    pub currency: Currency,
}

impl Amount {
    pub fn krw(value: u64) -> Self {
        Self {
            value: value as f64,
            currency: Currency::Krw,
        }
    }

    pub fn usd(value: f64) -> Self {
        Self {
            value,
            currency: Currency::Usd,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardFlowMode {
    Default,
    Direct,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_escrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_mode: Option<CardFlowMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_card_point: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_app_card_only: Option<bool>,
}

/// Cash receipt purpose for bank transfers and virtual accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CashReceiptType {
    #[serde(rename = "소득공제")]
    IncomeDeduction,
    #[serde(rename = "지출증빙")]
    ExpenseProof,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CashReceipt {
    #[serde(rename = "type")]
    pub kind: CashReceiptType,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_receipt: Option<CashReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_escrow: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualAccountOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_receipt: Option<CashReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_escrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_hours: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ForeignEasyPayProvider {
    #[serde(rename = "PAYPAL")]
    Paypal,
    #[serde(rename = "ALIPAY")]
    Alipay,
    #[serde(rename = "ALIPAYHK")]
    AlipayHk,
    #[serde(rename = "BILLEASE")]
    Billease,
    #[serde(rename = "BOOST")]
    Boost,
    #[serde(rename = "BPI")]
    Bpi,
    #[serde(rename = "DANA")]
    Dana,
    #[serde(rename = "GCASH")]
    Gcash,
    #[serde(rename = "RABBIT_LINE_PAY")]
    RabbitLinePay,
    #[serde(rename = "TOUCHNGO")]
    TouchNGo,
    #[serde(rename = "TRUEMONEY")]
    TrueMoney,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignEasyPayOptions {
    pub provider: ForeignEasyPayProvider,
    /// ISO 3166-1 alpha-2, e.g. `"KR"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_url: Option<String>,
}

/// Payment method with its method-specific options.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentMethod {
    Card(Option<CardOptions>),
    Transfer(Option<TransferOptions>),
    VirtualAccount(Option<VirtualAccountOptions>),
    MobilePhone,
    CultureGiftCertificate,
    BookGiftCertificate,
    GameGiftCertificate,
    ForeignEasyPay(Option<ForeignEasyPayOptions>),
}

impl PaymentMethod {
    /// Wire tag sent as `method`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card(_) => "CARD",
            Self::Transfer(_) => "TRANSFER",
            Self::VirtualAccount(_) => "VIRTUAL_ACCOUNT",
            Self::MobilePhone => "MOBILE_PHONE",
            Self::CultureGiftCertificate => "CULTURE_GIFT_CERTIFICATE",
            Self::BookGiftCertificate => "BOOK_GIFT_CERTIFICATE",
            Self::GameGiftCertificate => "GAME_GIFT_CERTIFICATE",
            Self::ForeignEasyPay(_) => "FOREIGN_EASY_PAY",
        }
    }

    fn required_currency(&self) -> Currency {
        match self {
            Self::ForeignEasyPay(_) => Currency::Usd,
            _ => Currency::Krw,
        }
    }
}

/// Payment request handed to the browser SDK's `requestPayment`.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutRequest {
    pub method: PaymentMethod,
    pub amount: Amount,
    pub order_id: String,
    pub order_name: String,
    pub success_url: String,
    pub fail_url: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
}

impl CheckoutRequest {
    pub fn new(
        method: PaymentMethod,
        amount: Amount,
        order_id: impl Into<String>,
        order_name: impl Into<String>,
        success_url: impl Into<String>,
        fail_url: impl Into<String>,
    ) -> Self {
        Self {
            method,
            amount,
            order_id: order_id.into(),
            order_name: order_name.into(),
            success_url: success_url.into(),
            fail_url: fail_url.into(),
            customer_email: None,
            customer_name: None,
        }
    }

    pub fn with_customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Validates the request and builds the wire payload.
    ///
    /// Only the option object of the selected method is attached.
    pub fn to_payload(&self) -> Result<serde_json::Value> {
        self.validate()?;

        let mut payload = CheckoutPayload {
            method: self.method.as_str(),
            amount: &self.amount,
            order_id: &self.order_id,
            order_name: &self.order_name,
            success_url: &self.success_url,
            fail_url: &self.fail_url,
            customer_email: self.customer_email.as_deref(),
            customer_name: self.customer_name.as_deref(),
            card: None,
            transfer: None,
            virtual_account: None,
            foreign_easy_pay: None,
        };
        match &self.method {
            PaymentMethod::Card(options) => payload.card = options.as_ref(),
            PaymentMethod::Transfer(options) => payload.transfer = options.as_ref(),
            PaymentMethod::VirtualAccount(options) => payload.virtual_account = options.as_ref(),
            PaymentMethod::ForeignEasyPay(options) => payload.foreign_easy_pay = options.as_ref(),
            PaymentMethod::MobilePhone
            | PaymentMethod::CultureGiftCertificate
            | PaymentMethod::BookGiftCertificate
            | PaymentMethod::GameGiftCertificate => {}
        }

        serde_json::to_value(payload).map_err(|err| {
            TossPaymentsError::Config(format!("unserializable checkout payload: {err}"))
        })
    }

    fn validate(&self) -> Result<()> {
        if !self.amount.value.is_finite() || self.amount.value <= 0.0 {
            return Err(TossPaymentsError::Config("amount is required".to_owned()));
        }
        require("orderId", &self.order_id)?;
        require("orderName", &self.order_name)?;
        require_urls(&self.success_url, &self.fail_url)?;

        let expected = self.method.required_currency();
        if self.amount.currency != expected {
            return Err(TossPaymentsError::Config(format!(
                "{} requires amount.currency = {}",
                self.method.as_str(),
                expected.as_str()
            )));
        }
        if let PaymentMethod::ForeignEasyPay(Some(options)) = &self.method {
            if let Some(country) = &options.country {
                if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
                    return Err(TossPaymentsError::Config(format!(
                        "country '{country}' is not an ISO 3166-1 alpha-2 code"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Card billing-key registration handed to `requestBillingAuth`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillingAuthRequest {
    pub success_url: String,
    pub fail_url: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
}

impl BillingAuthRequest {
    pub fn new(success_url: impl Into<String>, fail_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            fail_url: fail_url.into(),
            ..Self::default()
        }
    }

    pub fn to_payload(&self) -> Result<serde_json::Value> {
        require_urls(&self.success_url, &self.fail_url)?;
        let payload = BillingAuthPayload {
            method: "CARD",
            success_url: &self.success_url,
            fail_url: &self.fail_url,
            customer_email: self.customer_email.as_deref(),
            customer_name: self.customer_name.as_deref(),
        };
        serde_json::to_value(payload).map_err(|err| {
            TossPaymentsError::Config(format!("unserializable billing auth payload: {err}"))
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutPayload<'a> {
    method: &'static str,
    amount: &'a Amount,
    order_id: &'a str,
    order_name: &'a str,
    success_url: &'a str,
    fail_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<&'a CardOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transfer: Option<&'a TransferOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    virtual_account: Option<&'a VirtualAccountOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    foreign_easy_pay: Option<&'a ForeignEasyPayOptions>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BillingAuthPayload<'a> {
    method: &'static str,
    success_url: &'a str,
    fail_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_name: Option<&'a str>,
}

fn require_urls(success_url: &str, fail_url: &str) -> Result<()> {
    if success_url.trim().is_empty() || fail_url.trim().is_empty() {
        return Err(TossPaymentsError::Config(
            "successUrl/failUrl are required".to_owned(),
        ));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        Amount, BillingAuthRequest, CardFlowMode, CardOptions, CashReceipt, CashReceiptType,
        CheckoutRequest, ForeignEasyPayOptions, ForeignEasyPayProvider, PaymentMethod,
        VirtualAccountOptions,
    };
    use crate::TossPaymentsError;

    fn request(method: PaymentMethod, amount: Amount) -> CheckoutRequest {
        CheckoutRequest::new(
            method,
            amount,
            "order-1",
            "토스 티셔츠 외 2건",
            "https://shop.example/success",
            "https://shop.example/fail",
        )
    }

    #[test]
    fn card_payload_attaches_only_card_options() {
        let payload = request(
            PaymentMethod::Card(Some(CardOptions {
                use_escrow: Some(false),
                flow_mode: Some(CardFlowMode::Default),
                ..CardOptions::default()
            })),
            Amount::krw(50_000),
        )
        .with_customer_email("customer@example.com")
        .to_payload()
        .expect("valid card request");

        assert_eq!(
            payload,
            json!({
                "method": "CARD",
                "amount": { "value": 50000.0, "currency": "KRW" },
                "orderId": "order-1",
                "orderName": "토스 티셔츠 외 2건",
                "successUrl": "https://shop.example/success",
                "failUrl": "https://shop.example/fail",
                "customerEmail": "customer@example.com",
                "card": { "useEscrow": false, "flowMode": "DEFAULT" }
            })
        );
    }

    #[test]
    fn virtual_account_payload_serializes_cash_receipt() {
        let payload = request(
            PaymentMethod::VirtualAccount(Some(VirtualAccountOptions {
                cash_receipt: Some(CashReceipt {
                    kind: CashReceiptType::IncomeDeduction,
                }),
                valid_hours: Some(24),
                ..VirtualAccountOptions::default()
            })),
            Amount::krw(10_000),
        )
        .to_payload()
        .expect("valid virtual account request");

        assert_eq!(payload["method"], "VIRTUAL_ACCOUNT");
        assert_eq!(payload["virtualAccount"]["cashReceipt"]["type"], "소득공제");
        assert_eq!(payload["virtualAccount"]["validHours"], 24);
        assert!(payload.get("card").is_none());
    }

    #[test]
    fn gift_certificate_payload_has_no_option_object() {
        let payload = request(PaymentMethod::CultureGiftCertificate, Amount::krw(5_000))
            .to_payload()
            .expect("valid request");

        assert_eq!(payload["method"], "CULTURE_GIFT_CERTIFICATE");
        for key in ["card", "transfer", "virtualAccount", "foreignEasyPay"] {
            assert!(payload.get(key).is_none(), "{key} must be absent");
        }
    }

    #[test]
    fn foreign_easy_pay_requires_usd() {
        let method = PaymentMethod::ForeignEasyPay(Some(ForeignEasyPayOptions {
            provider: ForeignEasyPayProvider::AlipayHk,
            country: Some("HK".to_owned()),
            pending_url: None,
        }));

        let err = request(method.clone(), Amount::krw(1_000))
            .to_payload()
            .expect_err("KRW must be rejected");
        assert!(err.to_string().contains("USD"));

        let payload = request(method, Amount::usd(12.5))
            .to_payload()
            .expect("USD is accepted");
        assert_eq!(payload["foreignEasyPay"]["provider"], "ALIPAYHK");
        assert_eq!(payload["amount"]["currency"], "USD");
    }

    #[test]
    fn domestic_methods_reject_usd() {
        let err = request(PaymentMethod::Transfer(None), Amount::usd(10.0))
            .to_payload()
            .expect_err("USD transfer must be rejected");
        assert!(matches!(err, TossPaymentsError::Config(_)));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut missing_order = request(PaymentMethod::MobilePhone, Amount::krw(1_000));
        missing_order.order_id.clear();
        assert!(missing_order.to_payload().is_err());

        let mut missing_url = request(PaymentMethod::MobilePhone, Amount::krw(1_000));
        missing_url.fail_url = " ".to_owned();
        let err = missing_url.to_payload().expect_err("fail url required");
        assert!(err.to_string().contains("successUrl/failUrl"));

        let zero = request(PaymentMethod::MobilePhone, Amount::krw(0));
        assert!(zero.to_payload().is_err());
        let nan = request(PaymentMethod::ForeignEasyPay(None), Amount::usd(f64::NAN));
        assert!(nan.to_payload().is_err());
    }

    #[test]
    fn invalid_country_code_is_rejected() {
        let method = PaymentMethod::ForeignEasyPay(Some(ForeignEasyPayOptions {
            provider: ForeignEasyPayProvider::Paypal,
            country: Some("kor".to_owned()),
            pending_url: None,
        }));
        assert!(request(method, Amount::usd(3.0)).to_payload().is_err());
    }

    #[test]
    fn billing_auth_payload_is_card_method() {
        let mut auth = BillingAuthRequest::new(
            "https://shop.example/billing/success",
            "https://shop.example/billing/fail",
        );
        auth.customer_name = Some("김토스".to_owned());

        assert_eq!(
            auth.to_payload().expect("valid billing auth"),
            json!({
                "method": "CARD",
                "successUrl": "https://shop.example/billing/success",
                "failUrl": "https://shop.example/billing/fail",
                "customerName": "김토스"
            })
        );

        let err = BillingAuthRequest::new("", "https://shop.example/fail")
            .to_payload()
            .expect_err("success url required");
        assert!(matches!(err, TossPaymentsError::Config(_)));
    }
}
