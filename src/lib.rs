//! `tosspayments-http` is an async server-side client for the Toss Payments
//! Core API.
//!
//! Every operation runs through one request pipeline that adds HTTP Basic
//! authentication and an `Idempotency-Key`, enforces a per-attempt timeout
//! and retries 5xx/429 and transient transport failures with exponential
//! backoff:
//! - [`TossPaymentsClient::confirm_payment`]
//! - [`TossPaymentsClient::retrieve_payment`]
//! - [`TossPaymentsClient::cancel_payment`]
//! - [`TossPaymentsClient::charge_with_billing_key`]
//! - [`TossPaymentsClient::execute`] for any other `/v1/` endpoint

mod client;
mod error;
mod options;
mod payments;
mod request;
mod shared;
mod types;

pub mod checkout;
pub mod transport;

pub use client::{basic_authorization, TossPaymentsClient, DEFAULT_API_BASE};
pub use error::{ApiError, TossPaymentsError, TransportError};
pub use options::ClientOptions;
pub use payments::parse_amount;
pub use request::RequestDescriptor;
pub use shared::shared_client;
pub use types::{
    BillingCharge, CancelPayment, ConfirmPayment, Currency, PaymentObject, RefundReceiveAccount,
};

pub type Result<T> = std::result::Result<T, TossPaymentsError>;
