//! Name resolution for greetings and replies.

pub mod stored;
pub mod traits;

pub use stored::{normalize_name, StoredNameStore};
pub use traits::NameStore;

use crate::engine::Engine;
use anyhow::Result;

/// Resolve the stored name, treating any failure as "no name known".
pub async fn resolve_name(names: &dyn NameStore) -> Option<String> {
    match names.get_stored_name().await {
        Ok(name) => name,
        Err(error) => {
            tracing::warn!("Could not resolve display name, continuing without one: {error:#}");
            None
        }
    }
}

// ── CLI handler ──

/// Handle `solace name <subcommand>` CLI commands.
pub async fn handle_name_command(command: crate::NameCommands, engine: &Engine) -> Result<()> {
    match command {
        crate::NameCommands::Get => match resolve_name(engine.names.as_ref()).await {
            Some(name) => println!("{name}"),
            None => println!("No name set. Use `solace name set <name>`."),
        },
        crate::NameCommands::Set { name } => {
            if normalize_name(&name).is_none() {
                eprintln!("Name must not be empty.");
                return Ok(());
            }
            let confirmed = engine.names.set_stored_name(&name).await?;
            println!("✓ I'll call you {confirmed}.");
        }
    }
    Ok(())
}
