//! Payment operations bound to the request pipeline.
//!
//! Each operation validates its payload, derives the idempotency key and
//! delegates to [`TossPaymentsClient::execute`]. None of them retry on
//! their own.

use serde::Serialize;

use crate::{
    transport::Transport, BillingCharge, CancelPayment, ConfirmPayment, Currency, PaymentObject,
    RequestDescriptor, Result, TossPaymentsClient, TossPaymentsError,
};

impl<T: Transport> TossPaymentsClient<T> {
    /// Confirms an authorized payment (`POST /v1/payments/confirm`).
    pub async fn confirm_payment(&self, payload: &ConfirmPayment) -> Result<PaymentObject> {
        require_path_segment("paymentKey", &payload.payment_key)?;
        require("orderId", &payload.order_id)?;
        require_positive("amount", payload.amount)?;

        let descriptor = RequestDescriptor::post("/v1/payments/confirm")
            .with_body(to_body(payload)?)
            .with_idempotency_key(payload.idempotency_key());
        into_object(self.execute(descriptor).await?)
    }

    /// Retrieves a payment by key (`GET /v1/payments/{paymentKey}`).
    pub async fn retrieve_payment(&self, payment_key: &str) -> Result<PaymentObject> {
        require_path_segment("paymentKey", payment_key)?;

        let descriptor = RequestDescriptor::get(format!("/v1/payments/{payment_key}"));
        into_object(self.execute(descriptor).await?)
    }

    /// Cancels a payment in full or in part
    /// (`POST /v1/payments/{paymentKey}/cancel`).
    pub async fn cancel_payment(&self, payload: &CancelPayment) -> Result<PaymentObject> {
        require_path_segment("paymentKey", &payload.payment_key)?;
        require("cancelReason", &payload.cancel_reason)?;
        if let Some(amount) = payload.cancel_amount {
            require_positive("cancelAmount", amount)?;
        }
        if let Some(amount) = payload.tax_free_amount {
            require_positive("taxFreeAmount", amount)?;
        }

        let descriptor =
            RequestDescriptor::post(format!("/v1/payments/{}/cancel", payload.payment_key))
                .with_body(to_body(payload)?)
                .with_idempotency_key(payload.idempotency_key());
        into_object(self.execute(descriptor).await?)
    }

    /// Charges a saved billing key (`POST /v1/billing/authorizations`).
    pub async fn charge_with_billing_key(&self, payload: &BillingCharge) -> Result<PaymentObject> {
        require("billingKey", &payload.billing_key)?;
        require("customerKey", &payload.customer_key)?;
        require("orderId", &payload.order_id)?;
        require("orderName", &payload.order_name)?;
        require_positive("amount", payload.amount)?;
        if let Some(amount) = payload.tax_free_amount {
            require_positive("taxFreeAmount", amount)?;
        }
        if matches!(payload.currency, Some(currency) if currency != Currency::Krw) {
            return Err(TossPaymentsError::Config(
                "billing charges support KRW only".to_owned(),
            ));
        }

        let descriptor = RequestDescriptor::post("/v1/billing/authorizations")
            .with_body(to_body(payload)?)
            .with_idempotency_key(payload.effective_idempotency_key());
        into_object(self.execute(descriptor).await?)
    }
}

impl ConfirmPayment {
    /// Builds a confirmation from success-redirect query values.
    ///
    /// `amount` is the raw query string value.
    pub fn from_callback(
        payment_key: impl Into<String>,
        order_id: impl Into<String>,
        amount: &str,
    ) -> Result<Self> {
        Ok(Self::new(payment_key, order_id, parse_amount(amount)?))
    }
}

/// Parses a positive integral amount from a query-string value.
pub fn parse_amount(value: &str) -> Result<u64> {
    let amount = value
        .trim()
        .parse::<u64>()
        .map_err(|_| TossPaymentsError::Config(format!("invalid amount '{value}'")))?;
    require_positive("amount", amount)?;
    Ok(amount)
}

pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TossPaymentsError::Config(format!("{field} is required")));
    }
    Ok(())
}

fn require_path_segment(field: &str, value: &str) -> Result<()> {
    require(field, value)?;
    if value.contains(['/', '?', '#']) {
        return Err(TossPaymentsError::Config(format!(
            "{field} contains a reserved character"
        )));
    }
    Ok(())
}

fn require_positive(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(TossPaymentsError::Config(format!("{field} must be positive")));
    }
    Ok(())
}

fn to_body<S: Serialize>(payload: &S) -> Result<serde_json::Value> {
    serde_json::to_value(payload)
        .map_err(|err| TossPaymentsError::Config(format!("unserializable payload: {err}")))
}

fn into_object(value: serde_json::Value) -> Result<PaymentObject> {
    match value {
        serde_json::Value::Object(object) => Ok(object),
        other => Err(TossPaymentsError::Decode(format!(
            "expected JSON object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{into_object, parse_amount, require_path_segment};
    use crate::{ConfirmPayment, TossPaymentsError};

    #[test]
    fn parse_amount_accepts_padded_integers() {
        assert_eq!(parse_amount(" 50000 ").expect("valid amount"), 50_000);
    }

    #[test]
    fn parse_amount_rejects_garbage_and_zero() {
        for value in ["", "abc", "12.5", "-3", "0"] {
            let err = parse_amount(value).expect_err("must be rejected");
            assert!(matches!(err, TossPaymentsError::Config(_)), "{value}");
        }
    }

    #[test]
    fn from_callback_parses_amount() {
        let confirm = ConfirmPayment::from_callback("pk_1", "order-1", "1000").expect("valid");
        assert_eq!(confirm, ConfirmPayment::new("pk_1", "order-1", 1_000));
    }

    #[test]
    fn path_segments_reject_reserved_characters() {
        assert!(require_path_segment("paymentKey", "tgen_2024").is_ok());
        assert!(require_path_segment("paymentKey", "").is_err());
        assert!(require_path_segment("paymentKey", "a/../b").is_err());
        assert!(require_path_segment("paymentKey", "a?x=1").is_err());
    }

    #[test]
    fn into_object_rejects_non_objects() {
        let err = into_object(serde_json::json!([1, 2])).expect_err("array is not an object");
        assert!(matches!(err, TossPaymentsError::Decode(_)));
    }
}
