//! Session management. Finalizes conversations into stored sessions and
//! serves the history views.

pub mod recorder;
pub mod registry;
pub mod types;

pub use recorder::{dominant_sentiment, SessionRecorder};
pub use registry::SessionRegistry;
pub use types::Session;

use crate::conversation::Role;
use crate::engine::Engine;
use anyhow::Result;
use chrono::Local;

// ── CLI handler ──

/// Handle `solace sessions <subcommand>` CLI commands.
pub async fn handle_session_command(command: crate::SessionCommands, engine: &Engine) -> Result<()> {
    match command {
        crate::SessionCommands::List { limit } => {
            let sessions = engine.registry.list().await;
            if sessions.is_empty() {
                println!("No sessions recorded yet.");
                return Ok(());
            }
            let total = sessions.len();
            println!("Sessions ({total} total, most recent first):\n");
            for session in sessions.iter().take(limit) {
                let started = session.started_at.with_timezone(&Local);
                println!(
                    "- {}  {}  {} messages  [{}]",
                    session.id,
                    started.format("%Y-%m-%d %H:%M"),
                    session.message_count,
                    session.dominant_sentiment
                );
                if let Some(preview) = session.preview() {
                    let line = preview.lines().next().unwrap_or(preview);
                    let display = if line.chars().count() <= 70 {
                        line.to_string()
                    } else {
                        let truncated: String = line.chars().take(67).collect();
                        format!("{truncated}...")
                    };
                    println!("    {display}");
                }
            }
            if limit < total {
                println!("\n  Use --limit {total} to see all sessions.");
            }
        }
        crate::SessionCommands::Show { id } => {
            let Some(session) = engine.registry.get(&id).await else {
                println!("No session found with id: {id}");
                return Ok(());
            };
            let started = session.started_at.with_timezone(&Local);
            println!("Session:   {}", session.id);
            println!("Started:   {}", started.format("%Y-%m-%d %H:%M:%S"));
            println!("Duration:  {} min", session.duration().num_minutes());
            println!("Messages:  {}", session.message_count);
            println!("Mood:      {}", session.dominant_sentiment);
            println!();
            for message in &session.messages {
                let who = match message.role {
                    Role::User => "you",
                    Role::Assistant => "solace",
                };
                match &message.sentiment {
                    Some(sentiment) => println!("[{who}] ({sentiment}) {}", message.text),
                    None => println!("[{who}] {}", message.text),
                }
            }
        }
        crate::SessionCommands::Delete { id, yes } => {
            if !yes {
                eprintln!("Use --yes to confirm deletion of session '{id}'.");
                return Ok(());
            }
            if engine.registry.delete(&id).await? {
                println!("✓ Deleted session: {id}");
            } else {
                println!("No session found with id: {id}");
            }
        }
    }
    Ok(())
}
