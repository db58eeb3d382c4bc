//! The `produce` subcommand: publish one event and print its placement.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::rest_client::RestClient;

#[derive(Serialize)]
struct PublishRequest<'a> {
    key: &'a str,
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct PublishResponse {
    partition: u32,
    offset: u64,
}

pub async fn run(broker: &str, topic: &str, key: &str, payload: &str) -> Result<()> {
    let payload: serde_json::Value =
        serde_json::from_str(payload).context("payload is not valid JSON")?;

    let client = RestClient::new(broker);
    let response: PublishResponse = client
        .post(&format!("/topics/events?topic={topic}"), &PublishRequest { key, payload })
        .await
        .context("failed to publish event")?;

    println!("Event published");
    println!("  Topic:     {topic}");
    println!("  Key:       {key}");
    println!("  Partition: {}", response.partition);
    println!("  Offset:    {}", response.offset);
    Ok(())
}
