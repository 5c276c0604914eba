use tosspayments_http::{CancelPayment, ConfirmPayment, TossPaymentsClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let toss = TossPaymentsClient::from_env()?;

    // Values the browser SDK appends to the success URL.
    let payment_key = std::env::var("TOSS_PAYMENT_KEY")?;
    let order_id = std::env::var("TOSS_ORDER_ID")?;
    let amount = std::env::var("TOSS_AMOUNT")?;

    let confirm = ConfirmPayment::from_callback(payment_key, order_id, &amount)?;
    let payment = toss.confirm_payment(&confirm).await?;
    println!("confirmed: {}", payment["status"]);

    let refund = CancelPayment::partial(confirm.payment_key.clone(), "demo refund", 100);
    let payment = toss.cancel_payment(&refund).await?;
    println!("after partial cancel: {}", payment["balanceAmount"]);

    Ok(())
}
