use anyhow::{Context, Result};
use colored::*;
use meshcast::ReceivedFile;
use meshcast::session::{ChatAuthor, SessionEvent, SessionSnapshot};
use std::path::{Path, PathBuf};

pub fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::Status(status) => println!("{} {}", "•".dimmed(), status.dimmed()),
        SessionEvent::Chat(line) => match &line.author {
            ChatAuthor::Local => println!("{} {}", "me:".green().bold(), line.text),
            ChatAuthor::Remote(id) => {
                println!("{} {}", format!("{}:", id.short()).cyan().bold(), line.text)
            }
        },
        SessionEvent::PeersChanged(peers) => {
            println!("{} {} in room", "•".dimmed(), peers.len().to_string().bold())
        }
        SessionEvent::RemoteTrack { participant, track } => println!(
            "{} {} is streaming {}",
            "▶".magenta(),
            participant.short(),
            track.kind()
        ),
        SessionEvent::FileReceived { from, file } => println!(
            "{} '{}' ({} bytes) from {}",
            "📥".green(),
            file.name,
            file.len(),
            from.short()
        ),
        SessionEvent::NotReady(reason) => println!("{} {}", "!".yellow().bold(), reason.yellow()),
    }
}

pub fn print_peers(snapshot: &SessionSnapshot) {
    if snapshot.peers.is_empty() {
        println!("{}", "Nobody else is here yet.".dimmed());
    }
    for peer in &snapshot.peers {
        let phase = snapshot
            .connections
            .iter()
            .find(|(id, _)| id == &peer.id)
            .map(|(_, phase)| phase.to_string())
            .unwrap_or_else(|| "not connected".to_owned());
        println!(
            "  {} {} [{}]",
            peer.id.short().bold(),
            peer.address_label.as_deref().unwrap_or("-"),
            phase
        );
    }
    println!(
        "  {} open channel(s), sharing: {}",
        snapshot.open_channels.len(),
        snapshot.sharing
    );
}

/// Reduces a remote-supplied name to its final path component.
pub fn sanitize_file_name(name: &str) -> String {
    let last = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    match last {
        "" | "." | ".." => "download".to_owned(),
        other => other.to_owned(),
    }
}

pub async fn save_file(dir: &Path, file: &ReceivedFile) -> Result<PathBuf> {
    let path = dir.join(sanitize_file_name(&file.name));
    tokio::fs::write(&path, &file.data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
