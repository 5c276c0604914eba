use serde::Serialize;

/// Upstream payment object, passed through without schema validation.
pub type PaymentObject = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Currency {
    #[serde(rename = "KRW")]
    Krw,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// ISO 4217 code, as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Krw => "KRW",
            Self::Usd => "USD",
        }
    }
}

/// Body of `POST /v1/payments/confirm`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPayment {
    pub payment_key: String,
    pub order_id: String,
    pub amount: u64,
}

impl ConfirmPayment {
    pub fn new(payment_key: impl Into<String>, order_id: impl Into<String>, amount: u64) -> Self {
        Self {
            payment_key: payment_key.into(),
            order_id: order_id.into(),
            amount,
        }
    }

    /// `confirm-{paymentKey}-{orderId}-{amount}`
    pub fn idempotency_key(&self) -> String {
        format!(
            "confirm-{}-{}-{}",
            self.payment_key, self.order_id, self.amount
        )
    }
}

/// Bank account that receives a virtual-account refund.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceiveAccount {
    pub bank: String,
    pub account_number: String,
    pub holder_name: String,
}

/// Full or partial cancellation of a payment.
///
/// `payment_key` is part of the path and is not serialized into the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPayment {
    #[serde(skip)]
    pub payment_key: String,
    pub cancel_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_receive_account: Option<RefundReceiveAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<u64>,
}

impl CancelPayment {
    /// Cancels the remaining balance.
    pub fn full(payment_key: impl Into<String>, cancel_reason: impl Into<String>) -> Self {
        Self {
            payment_key: payment_key.into(),
            cancel_reason: cancel_reason.into(),
            cancel_amount: None,
            currency: None,
            refund_receive_account: None,
            tax_free_amount: None,
        }
    }

    /// Cancels `cancel_amount` of the payment.
    pub fn partial(
        payment_key: impl Into<String>,
        cancel_reason: impl Into<String>,
        cancel_amount: u64,
    ) -> Self {
        Self {
            cancel_amount: Some(cancel_amount),
            ..Self::full(payment_key, cancel_reason)
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn with_refund_receive_account(mut self, account: RefundReceiveAccount) -> Self {
        self.refund_receive_account = Some(account);
        self
    }

    pub fn with_tax_free_amount(mut self, amount: u64) -> Self {
        self.tax_free_amount = Some(amount);
        self
    }

    /// `cancel-{paymentKey}-{cancelAmount}`, or `cancel-{paymentKey}-full`.
    pub fn idempotency_key(&self) -> String {
        match self.cancel_amount {
            Some(amount) => format!("cancel-{}-{amount}", self.payment_key),
            None => format!("cancel-{}-full", self.payment_key),
        }
    }
}

/// Recurring charge against a saved billing key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCharge {
    pub billing_key: String,
    pub customer_key: String,
    pub order_id: String,
    pub order_name: String,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<u64>,
    /// Sent as a header only.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

impl BillingCharge {
    pub fn new(
        billing_key: impl Into<String>,
        customer_key: impl Into<String>,
        order_id: impl Into<String>,
        order_name: impl Into<String>,
        amount: u64,
    ) -> Self {
        Self {
            billing_key: billing_key.into(),
            customer_key: customer_key.into(),
            order_id: order_id.into(),
            order_name: order_name.into(),
            amount,
            currency: None,
            customer_email: None,
            customer_name: None,
            tax_free_amount: None,
            idempotency_key: None,
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

    pub fn with_tax_free_amount(mut self, amount: u64) -> Self {
        self.tax_free_amount = Some(amount);
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Replaces the derived `billing-{customerKey}-{orderId}` key.
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// A blank override falls back to the derived key.
    pub fn effective_idempotency_key(&self) -> String {
        self.idempotency_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("billing-{}-{}", self.customer_key, self.order_id))
    }
}
