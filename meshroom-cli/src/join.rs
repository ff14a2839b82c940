use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input as Prompt;
use meshroom::ChatMessage;
use meshroom::client::{
    ConnectorConfig, MeshClient, MeshEvent, MeshHandle, RemoteMedia, TrackMediaSource,
    WebRtcConnector,
};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::input::{self, HELP, Input};

#[derive(clap::Args)]
pub struct JoinArgs {
    /// Room to join; prompted for when omitted
    room: Option<String>,

    #[arg(long, env = "MESHROOM_URL", default_value = "ws://localhost:3000/ws")]
    url: String,

    /// Name shown next to your chat messages
    #[arg(long, default_value = "anonymous")]
    name: String,

    #[arg(long)]
    no_audio: bool,

    #[arg(long)]
    no_video: bool,
}

pub async fn run(args: JoinArgs) -> Result<()> {
    let room = match args.room {
        Some(room) => room,
        None => Prompt::<String>::new()
            .with_prompt("Room")
            .interact_text()
            .context("No room given")?,
    };

    let connector = WebRtcConnector::new(ConnectorConfig::default())?;
    let media = TrackMediaSource::new(!args.no_audio, !args.no_video);
    let (client, mut events) = MeshClient::connect(&args.url, connector, media)
        .await
        .with_context(|| format!("Failed to reach relay at {}", args.url))?;

    client.handle().join_room(room.as_str())?;
    println!("{}", "Type /help for commands.".dimmed());

    let mut chat = ChatOut {
        name: args.name,
        next_id: 1,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if !render(event) {
                    break;
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !chat.handle(client.handle(), input::parse(&line))? {
                    break;
                }
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    client.close().await;
    println!("{}", "👋 Bye".green());
    Ok(())
}

struct ChatOut {
    name: String,
    next_id: u64,
}

impl ChatOut {
    /// Returns `false` when the user wants out.
    fn handle(&mut self, handle: &MeshHandle, input: Input) -> Result<bool> {
        match input {
            Input::Chat(text) => {
                let message = ChatMessage {
                    id: self.next_id,
                    text,
                    sender: self.name.clone(),
                    timestamp: now_millis(),
                };
                self.next_id += 1;
                handle.chat(serde_json::to_value(&message)?)?;
            }
            Input::Join(room) => handle.join_room(room)?,
            Input::Leave => handle.leave_room()?,
            Input::Audio(enabled) => handle.toggle_audio(enabled)?,
            Input::Video(enabled) => handle.toggle_video(enabled)?,
            Input::Clear => handle.clear_canvas()?,
            Input::Help => println!("{}", HELP),
            Input::Quit => return Ok(false),
            Input::Unknown(line) => println!("{} {}", "unknown command:".yellow(), line),
            Input::Empty => {}
        }
        Ok(true)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Print one event. Returns `false` once the relay is gone.
fn render(event: MeshEvent<RemoteMedia>) -> bool {
    match event {
        MeshEvent::Identity(peer_id) => {
            println!("{} {}", "🔑 You are".cyan(), peer_id.to_string().bold());
        }
        MeshEvent::IceServers(servers) => {
            tracing::debug!("Relay provided {} ICE servers", servers.len());
        }
        MeshEvent::RoomJoined {
            room_id,
            member_count,
        } => {
            println!(
                "{} {} ({} here)",
                "🚪 Joined".green().bold(),
                room_id.as_str().bold(),
                member_count
            );
        }
        MeshEvent::MemberCount(count) => {
            println!("{}", format!("👥 {} in the room", count).dimmed());
        }
        MeshEvent::RemoteStreamAvailable { remote, .. } => {
            println!("{} {}", "🔗 Connected to".green(), remote);
        }
        MeshEvent::RemoteStreamRemoved { remote } => {
            println!("{} {}", "✂️  Disconnected from".yellow(), remote);
        }
        MeshEvent::LinkFailed { remote, reason } => {
            println!("{} {}: {}", "⚠️  Link failed with".red(), remote, reason);
        }
        MeshEvent::MediaUnavailable { reason } => {
            println!("{} {}", "🎥 No local media:".yellow(), reason);
        }
        MeshEvent::LocalMediaChanged { audio, video } => {
            println!(
                "{}",
                format!(
                    "🎙  audio {} · video {}",
                    if audio { "on" } else { "off" },
                    if video { "on" } else { "off" }
                )
                .dimmed()
            );
        }
        MeshEvent::Draw(_) => {}
        MeshEvent::ClearCanvas => {
            println!("{}", "🧽 Canvas cleared".dimmed());
        }
        MeshEvent::Chat(value) => match serde_json::from_value::<ChatMessage>(value.clone()) {
            Ok(message) => println!("{} {}", format!("{}:", message.sender).bold(), message.text),
            Err(_) => {
                warn!("Unrecognized chat payload");
                println!("{}", value);
            }
        },
        MeshEvent::RoomLeft { room_id } => {
            println!("{} {}", "🚪 Left".yellow(), room_id);
        }
        MeshEvent::Disconnected => {
            println!("{}", "❌ Relay connection lost".red().bold());
            return false;
        }
    }
    true
}
