//! The `consume` subcommand: fetch loop with periodic offset commits.
//!
//! Tracks progress as `next offset = last record offset + 1`, commits on the
//! interval timer while consuming, and commits once more on the way out so a
//! clean exit never loses the group's position.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::rest_client::RestClient;

#[derive(Deserialize)]
struct Message {
    offset: u64,
    key: String,
    payload: String,
}

#[derive(Deserialize)]
struct FetchResponse {
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    topic: &'a str,
    partition: u32,
    offset: u64,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct CommitResponse {
    status: String,
}

pub struct ConsumeOpts {
    pub broker: String,
    pub topic: String,
    pub group: String,
    pub partition: u32,
    pub offset: u64,
    pub max_bytes: usize,
    pub count: usize,
    pub commit_interval: u64,
}

pub async fn run(opts: ConsumeOpts) -> Result<()> {
    let client = RestClient::new(&opts.broker);
    let commit_interval = Duration::from_secs(opts.commit_interval);

    println!("Consuming {}/{} as group {:?}", opts.topic, opts.partition, opts.group);

    let mut next_offset = opts.offset;
    let mut consumed = 0usize;
    let mut last_commit = Instant::now();

    loop {
        let response: FetchResponse = match client
            .get(&format!(
                "/messages?topic={}&partition={}&offset={}&maxBytes={}",
                opts.topic, opts.partition, next_offset, opts.max_bytes
            ))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                eprintln!("fetch failed: {e:#}");
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        if response.messages.is_empty() {
            tokio::time::sleep(Duration::from_secs(1)).await;
        } else {
            for message in &response.messages {
                let payload = BASE64
                    .decode(&message.payload)
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                    .unwrap_or_else(|_| message.payload.clone());

                println!(
                    "[{}] Offset: {} | Key: {} | Payload: {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    message.offset,
                    message.key,
                    payload,
                );

                next_offset = message.offset + 1;
                consumed += 1;
            }

            if opts.count > 0 && consumed >= opts.count {
                println!("Consumed {consumed} messages, exiting");
                break;
            }
        }

        if last_commit.elapsed() >= commit_interval {
            commit(&client, &opts, next_offset).await?;
            last_commit = Instant::now();
        }
    }

    commit(&client, &opts, next_offset).await?;
    println!("Final offset committed: {next_offset}");
    Ok(())
}

async fn commit(client: &RestClient, opts: &ConsumeOpts, offset: u64) -> Result<()> {
    let _: CommitResponse = client
        .post(
            &format!("/consumer-groups/offsets/commit?group={}", opts.group),
            &CommitRequest {
                topic: &opts.topic,
                partition: opts.partition,
                offset,
            },
        )
        .await
        .context("failed to commit offset")?;
    Ok(())
}
