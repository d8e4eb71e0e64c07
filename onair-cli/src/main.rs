use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use onair::Role;
use onair::model::{DEFAULT_RELAY_ADDR, DEFAULT_SIGNAL_URL, DEFAULT_STUN_ADDR, IceServerConfig};
use onair::relay::{RelayConfig, RelayServer};
use onair::session::media::spawn_placeholder_feed;
use onair::session::transport::TransportConfig;
use onair::session::{
    ReconnectPolicy, SessionConfig, SessionController, SessionHandle, SessionState,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "onair", version, about = "Live-stream signaling relay and viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Relay {
        #[arg(long, env = "ONAIR_RELAY_ADDR", default_value = DEFAULT_RELAY_ADDR)]
        addr: String,

        /// Frames queued per peer before it starts missing frames.
        #[arg(long, env = "ONAIR_OUTBOUND_BUFFER", default_value_t = 64)]
        outbound_buffer: usize,
    },

    /// Join a relay as host or audience. Lines typed on stdin are sent as chat.
    Join {
        #[arg(long, default_value = DEFAULT_SIGNAL_URL)]
        url: String,

        /// Prompted for when omitted.
        #[arg(long)]
        role: Option<Role>,

        #[arg(long, default_value = DEFAULT_STUN_ADDR)]
        stun: Vec<String>,

        /// 0 disables reconnecting.
        #[arg(long, default_value_t = 0)]
        reconnect_attempts: u32,

        #[arg(long)]
        negotiation_timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Relay {
            addr,
            outbound_buffer,
        } => run_relay(relay_config(addr, outbound_buffer)).await,

        Commands::Join {
            url,
            role,
            stun,
            reconnect_attempts,
            negotiation_timeout_secs,
        } => {
            let role = match role {
                Some(role) => role,
                None => prompt_role().await?,
            };
            let config = session_config(url, stun, reconnect_attempts, negotiation_timeout_secs);

            run_join(config, role).await
        }
    }
}

fn relay_config(addr: String, outbound_buffer: usize) -> RelayConfig {
    RelayConfig {
        bind_addr: addr,
        outbound_buffer,
        ..RelayConfig::default()
    }
}

fn session_config(
    url: String,
    stun: Vec<String>,
    reconnect_attempts: u32,
    negotiation_timeout_secs: Option<u64>,
) -> SessionConfig {
    SessionConfig {
        url,
        transport: TransportConfig {
            ice_servers: stun.into_iter().map(IceServerConfig::stun).collect(),
        },
        reconnect: (reconnect_attempts > 0)
            .then(|| ReconnectPolicy::with_max_attempts(reconnect_attempts)),
        negotiation_timeout: negotiation_timeout_secs.map(Duration::from_secs),
    }
}

async fn run_relay(config: RelayConfig) -> Result<()> {
    let server = RelayServer::bind(config).await?;
    println!(
        "{} {}",
        "📡 Relay listening on".green().bold(),
        format!("ws://{}", server.local_addr()?).cyan()
    );

    server.run().await
}

async fn prompt_role() -> Result<Role> {
    let picked = tokio::task::spawn_blocking(|| {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Join as")
            .items(&["host", "audience"])
            .default(1)
            .interact()
    })
    .await
    .context("Role prompt panicked")?
    .context("Failed to read role")?;

    Ok(if picked == 0 { Role::Host } else { Role::Audience })
}

async fn run_join(config: SessionConfig, role: Role) -> Result<()> {
    println!(
        "{} {} {}",
        "🎬 Joining".green().bold(),
        config.url.cyan(),
        format!("as {}", role).bold()
    );

    let handle = SessionController::new(config).start(role).await?;
    print_updates(&handle);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    // No encoder behind the headless capture: keep the host's tracks alive with stand-in frames.
    let mut local_streams = handle.watch_local_stream();
    let mut feed: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            Ok(()) = local_streams.changed() => {
                if let Some(old) = feed.take() {
                    old.abort();
                }
                let stream = local_streams.borrow_and_update().clone();
                feed = stream.map(spawn_placeholder_feed);
            }

            line = lines.next_line() => match line.context("Failed to read stdin")? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => handle.send_message(line),
                None => break,
            },

            _ = tokio::signal::ctrl_c() => break,

            _ = ticker.tick() => {
                if handle.is_finished() {
                    break;
                }
            }
        }
    }

    if let Some(feed) = feed {
        feed.abort();
    }
    if handle.is_finished() {
        return handle.join().await;
    }

    info!("Leaving session");
    handle.close().await
}

/// Prints received chat and state changes until the session goes away.
fn print_updates(handle: &SessionHandle) {
    let mut chat = handle.chat().subscribe();
    tokio::spawn(async move {
        loop {
            match chat.recv().await {
                Ok(line) => println!("💬 {}", line),
                Err(RecvError::Lagged(missed)) => {
                    println!("{}", format!("({} chat lines skipped)", missed).dimmed())
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut state = handle.watch_state();
    tokio::spawn(async move {
        loop {
            let current = *state.borrow_and_update();
            let label = match current {
                SessionState::Connected => current.to_string().green().bold(),
                SessionState::Disconnected => current.to_string().red().bold(),
                _ => current.to_string().yellow(),
            };
            println!("{} {}", "●".bold(), label);

            if state.changed().await.is_err() {
                break;
            }
        }
    });
}
