use connectx_sdk::{ConnectX, ConnectXOptions, IdentifyPayload, JsonObject};
use dotenvy::dotenv;
use serde_json::json;
use std::{collections::HashMap, error::Error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = ConnectX::builder()
        .initialize(ConnectXOptions::from_env())
        .await?;

    println!("anonymous id: {:?}", client.anonymous_id());

    client
        .track(&HashMap::from([("cx_event", "open app rust")]))
        .await;

    let mut customers = JsonObject::new();
    customers.insert("cx_email".to_string(), json!("jane@example.com"));
    client
        .try_identify(IdentifyPayload {
            key: "cx_email".to_string(),
            customers,
            ..IdentifyPayload::default()
        })
        .await?;

    client
        .create_records("Lead", &[json!({ "cx_Name": "Jane" })])
        .await;

    Ok(())
}
