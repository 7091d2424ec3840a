#![allow(clippy::print_stdout, reason = "Examples are okay to print to stdout")]

use std::env;

use payeezy_client_sdk::{Action, Client, Credentials, Instrumentation, Params, TransactionLog};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let credentials = Credentials::from_map(
        ["url", "apikey", "apisecret", "token"]
            .into_iter()
            .filter_map(|key| {
                env::var(format!("PAYEEZY_{}", key.to_ascii_uppercase()))
                    .ok()
                    .map(|value| (key, value))
            }),
    );

    let instrumentation = Instrumentation::enabled(|log: &TransactionLog| println!("{log}"));
    let client = Client::new(credentials).with_instrumentation(instrumentation);

    let params = match json!({
        "merchant_ref": "Astonishing-Sale",
        "method": "credit_card",
        "amount": "1299",
        "currency_code": "USD",
        "credit_card": {
            "type": "visa",
            "cardholder_name": "John Smith",
            "card_number": "4788250000028291",
            "exp_date": "1030",
            "cvv": "123"
        }
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("literal is an object"),
    };

    let purchase = client.transact(Action::Purchase, params).await?;
    println!("purchase: {} {}", purchase.kind(), purchase.message());

    let Some(transaction_id) = purchase["transaction_id"].as_str().map(str::to_owned) else {
        return Ok(());
    };

    let mut refund = Params::new();
    refund.insert("transaction_id".to_owned(), json!(transaction_id));
    refund.insert("transaction_tag".to_owned(), purchase["transaction_tag"].clone());
    refund.insert("method".to_owned(), json!("credit_card"));
    refund.insert("amount".to_owned(), json!("1299"));
    refund.insert("currency_code".to_owned(), json!("USD"));

    let refunded = client.transact(Action::Refund, refund).await?;
    println!("refund: {} {}", refunded.kind(), refunded.message());

    Ok(())
}
