mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use commands::{Command, HELP};
use meshcast::session::{
    Session, SessionConfig, SessionEvent, SessionHandle, ShareOutcome, StaticMediaSource,
    TransportConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshcast")]
#[command(about = "Screen sharing, chat and file transfer over direct peer links")]
struct Cli {
    /// WebSocket url of the relay.
    #[arg(long, default_value = "ws://127.0.0.1:3000/")]
    relay: String,

    /// Room to join. Asked for interactively when omitted.
    #[arg(long)]
    room: Option<String>,

    /// Start sharing right after joining.
    #[arg(long)]
    share: bool,

    #[arg(long, default_value = "./downloads")]
    download_dir: PathBuf,

    /// STUN server url; may be repeated.
    #[arg(long = "stun", env = "MESHCAST_STUN", value_delimiter = ',')]
    stun: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let room = match cli.room.clone() {
        Some(room) => room,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Room")
            .interact_text()
            .context("Failed to read room name")?,
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    runtime.block_on(run(cli, room))
}

async fn run(cli: Cli, room: String) -> Result<()> {
    let transport = if cli.stun.is_empty() {
        TransportConfig::default()
    } else {
        TransportConfig {
            ice_servers: cli.stun.clone(),
        }
    };
    let config = SessionConfig {
        transport,
        ..Default::default()
    };

    tokio::fs::create_dir_all(&cli.download_dir)
        .await
        .with_context(|| format!("Failed to create {}", cli.download_dir.display()))?;

    println!("{} {}", "🔌 Connecting to".cyan(), cli.relay);
    let media = Arc::new(StaticMediaSource::new("meshcast"));
    let (handle, mut events) = Session::connect(&cli.relay, config, media).await?;
    handle.join_room(room.as_str()).await?;
    println!("{} {}", "🚪 Joined room".green().bold(), room.bold());
    println!("{}", HELP.dimmed());

    if cli.share {
        share(&handle).await;
    }

    let download_dir = cli.download_dir.clone();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            output::print_event(&event);
            if let SessionEvent::FileReceived { file, .. } = &event {
                match output::save_file(&download_dir, file).await {
                    Ok(path) => println!("   saved to {}", path.display()),
                    Err(e) => error!("{:?}", e),
                }
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Chat(text) => {
                if let Err(e) = handle.send_chat(text).await {
                    println!("{} {}", "✗".red(), e);
                }
            }
            Command::File(path) => {
                let handle = handle.clone();
                tokio::spawn(async move {
                    match handle.send_file(&path).await {
                        Ok(report) => println!(
                            "{} sent {} ({} bytes)",
                            "📤".green(),
                            path.display(),
                            report.bytes
                        ),
                        Err(e) => println!("{} {}: {}", "✗".red(), path.display(), e),
                    }
                });
            }
            Command::Share => share(&handle).await,
            Command::Peers => output::print_peers(&handle.snapshot().await?),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(input) => {
                println!("{} unknown command '{}'", "?".yellow(), input);
            }
        }
    }

    handle.shutdown().await;
    printer.abort();
    println!("{}", "👋 Bye".green());
    Ok(())
}

async fn share(handle: &SessionHandle) {
    match handle.start_sharing().await {
        Ok(ShareOutcome::Started { called }) => {
            println!("{} calling {} peer(s)", "📺 Sharing,".green().bold(), called)
        }
        Ok(ShareOutcome::AlreadySharing) => println!("{}", "Already sharing.".dimmed()),
        Err(e) => println!("{} {}", "✗ Could not share:".red(), e),
    }
}
