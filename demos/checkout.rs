use tosspayments_http::checkout::{
    Amount, BillingAuthRequest, CardOptions, CheckoutRequest, PaymentMethod,
};

fn main() -> anyhow::Result<()> {
    let card = CheckoutRequest::new(
        PaymentMethod::Card(Some(CardOptions {
            use_card_point: Some(true),
            ..CardOptions::default()
        })),
        Amount::krw(15_000),
        "order-1001",
        "토스 티셔츠 외 2건",
        "https://shop.example/success",
        "https://shop.example/fail",
    )
    .with_customer_name("김토스");
    println!("{}", serde_json::to_string_pretty(&card.to_payload()?)?);

    let billing = BillingAuthRequest::new(
        "https://shop.example/billing/success",
        "https://shop.example/billing/fail",
    );
    println!("{}", serde_json::to_string_pretty(&billing.to_payload()?)?);

    Ok(())
}
