//! `stratactl`: command-line producer and consumer for a Strata broker.
//!
//! ```bash
//! # publish one event
//! stratactl produce --topic orders --key user-42 --payload '{"amount": 99.99}'
//!
//! # consume a partition, committing progress for a group
//! stratactl consume --topic orders --group analytics --partition 0 --count 20
//! ```

mod commands;
mod rest_client;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stratactl")]
#[command(about = "Strata broker command-line tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish one event to a topic
    Produce {
        /// Broker address (host:port)
        #[arg(long, default_value = "localhost:8080")]
        broker: String,
        /// Topic name
        #[arg(long)]
        topic: String,
        /// Event key; empty routes round-robin
        #[arg(long, default_value = "")]
        key: String,
        /// Event payload (JSON)
        #[arg(long, default_value = "{}")]
        payload: String,
    },
    /// Fetch events from a partition in a loop, committing offsets
    Consume {
        /// Broker address (host:port)
        #[arg(long, default_value = "localhost:8080")]
        broker: String,
        /// Topic name
        #[arg(long)]
        topic: String,
        /// Consumer group name
        #[arg(long, default_value = "default")]
        group: String,
        /// Partition ID to consume from
        #[arg(long, default_value_t = 0)]
        partition: u32,
        /// Starting offset (0 = earliest)
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Maximum bytes to fetch per request
        #[arg(long, default_value_t = 1 << 20)]
        max_bytes: usize,
        /// Number of messages to consume before exiting (0 = run forever)
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Seconds between offset commits
        #[arg(long, default_value_t = 5)]
        commit_interval: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Commands::Produce {
            broker,
            topic,
            key,
            payload,
        } => commands::produce::run(&broker, &topic, &key, &payload).await,
        Commands::Consume {
            broker,
            topic,
            group,
            partition,
            offset,
            max_bytes,
            count,
            commit_interval,
        } => {
            commands::consume::run(commands::consume::ConsumeOpts {
                broker,
                topic,
                group,
                partition,
                offset,
                max_bytes,
                count,
                commit_interval,
            })
            .await
        }
    }
}
