//! In-process channel demo.
//!
//! Joins a few members backed by in-memory connections, lets each of them
//! post concurrently, drops one connection to show eviction, then closes the
//! channel and prints the retained history as JSON.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-channel-demo -- --members 3 --messages 5
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use futures_util::future::join_all;
use hiroba_channel::{
    Channel, ChannelConfig, ChannelError, Member, Message,
    domain::{MessageBody, ValueObjectError},
    infrastructure::MpscMember,
};
use hiroba_shared::logger::setup_logger;
use tokio::{sync::mpsc, task::JoinHandle};

#[derive(Parser)]
#[command(name = "hiroba-channel-demo", version, about = "Hiroba channel broadcast demo")]
struct Cli {
    /// Number of recent messages kept in history
    #[arg(long, default_value_t = hiroba_channel::config::DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,
    /// Capacity of the broadcast queue
    #[arg(long, default_value_t = hiroba_channel::config::DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,
    /// Number of members joining the channel
    #[arg(long, default_value_t = 3)]
    members: usize,
    /// Messages posted by each member
    #[arg(long, default_value_t = 5)]
    messages: usize,
    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    MemberName(#[from] ValueObjectError),
}

/// Buffer of each member's in-memory connection
const CONNECTION_BUFFER: usize = 64;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &["hiroba_channel"], &cli.log_level);

    if let Err(e) = run(cli).await {
        tracing::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), DemoError> {
    let config =
        ChannelConfig::new(cli.history_capacity, cli.queue_capacity).map_err(ChannelError::from)?;
    let channel = Arc::new(Channel::with_config(config)?);
    channel.set_topic("demo").await;

    let mut members = Vec::with_capacity(cli.members);
    let mut readers = Vec::with_capacity(cli.members);
    for i in 0..cli.members {
        let name = format!("member{i}");
        let (member, receiver) = MpscMember::with_name(&name, CONNECTION_BUFFER)?;
        channel.join(member.clone()).await?;
        tracing::debug!(
            "'{}' connected at {}",
            name,
            member.connected_at().to_rfc3339()
        );
        readers.push(spawn_reader(name, receiver));
        members.push(member);
    }
    tracing::info!(
        "Topic '{}' with {} members: {:?}",
        channel.topic().await,
        channel.member_count().await,
        channel.names_prefix("").await
    );

    let producers = members.iter().cloned().map(|member| {
        let channel = channel.clone();
        let count = cli.messages;
        tokio::spawn(async move {
            for n in 0..count {
                let body = format!("hello #{n} from {}", member.name());
                match MessageBody::new(body) {
                    Ok(body) => {
                        channel
                            .send(Message::from_member(member.as_ref(), body))
                            .await
                    }
                    Err(e) => tracing::warn!("Skipping message: {}", e),
                }
            }
        })
    });
    for result in join_all(producers).await {
        if let Err(e) = result {
            tracing::error!("Producer task failed: {}", e);
        }
    }

    // Dropping a reader's receiver makes the next delivery to it fail
    if let Some(reader) = readers.pop() {
        reader.abort();
        if let Err(e) = reader.await
            && e.is_cancelled()
        {
            tracing::info!("Dropped the connection of the last member");
        }
        channel.send(Message::system("anyone still there?")).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        tracing::info!("{} members after eviction", channel.member_count().await);
    }

    channel.close().await;
    channel.wait_drained().await;
    for reader in readers {
        if let Err(e) = reader.await {
            tracing::error!("Reader task failed: {}", e);
        }
    }

    let history = channel.history().await;
    match serde_json::to_string_pretty(&history) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize history: {}", e),
    }
    Ok(())
}

fn spawn_reader(name: String, mut receiver: mpsc::Receiver<Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = receiver.recv().await {
            tracing::info!(
                "[{}] {} ({})",
                name,
                message.format(),
                message.sent_at().to_rfc3339()
            );
        }
        tracing::debug!("[{}] connection closed", name);
    })
}
