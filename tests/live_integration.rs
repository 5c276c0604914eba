use std::fs;

use serde::Deserialize;
use tosspayments_http::{CancelPayment, TossPaymentsClient, TossPaymentsError};

#[derive(Debug, Deserialize)]
struct SecretsFile {
    #[serde(rename = "TOSS_SECRET_KEY")]
    toss_secret_key: Option<String>,
}

fn load_test_secret_key() -> Result<String, String> {
    if let Ok(secret_key) = std::env::var("TOSS_SECRET_KEY") {
        return Ok(secret_key);
    }

    let content = fs::read_to_string("secrets.json")
        .map_err(|_| "TOSS_SECRET_KEY env or secrets.json is required".to_owned())?;
    let parsed: SecretsFile = serde_json::from_str(&content)
        .map_err(|err| format!("secrets.json could not be parsed: {err}"))?;
    parsed
        .toss_secret_key
        .ok_or_else(|| "missing TOSS_SECRET_KEY in secrets.json".to_owned())
}

#[tokio::test]
async fn live_unknown_payment_is_a_non_retryable_not_found() {
    let secret_key = match load_test_secret_key() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("skipping live test: credentials not found in env or secrets.json");
            return;
        }
    };
    if !secret_key.starts_with("test_") {
        eprintln!("skipping live test: refusing to run against a live secret key");
        return;
    }

    let toss = TossPaymentsClient::new(secret_key).expect("secret key must be valid");

    let err = toss
        .retrieve_payment("tgen_does_not_exist_0000")
        .await
        .expect_err("unknown payment must fail");
    match &err {
        TossPaymentsError::Http { status, .. } => assert_eq!(*status, 404),
        other => panic!("expected http error, got {other}"),
    }
    assert!(!err.is_retryable());
    assert!(err.api_error().is_some());

    let err = toss
        .cancel_payment(&CancelPayment::full("tgen_does_not_exist_0000", "live test"))
        .await
        .expect_err("cancelling an unknown payment must fail");
    assert!(matches!(err, TossPaymentsError::Http { status, .. } if (400..500).contains(&status)));
}
