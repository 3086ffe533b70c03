#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::redundant_closure_for_method_calls,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::too_many_lines,
    clippy::uninlined_format_args
)]

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::io::Write;
use tracing_subscriber::{fmt, EnvFilter};

use solace::classifier::{create_classifier, create_offline_classifier};
use solace::conversation::{repl, ChatSettings};
use solace::{Config, Engine, MoodCommands, NameCommands, SessionCommands};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CompletionShell {
    #[value(name = "bash")]
    Bash,
    #[value(name = "fish")]
    Fish,
    #[value(name = "zsh")]
    Zsh,
    #[value(name = "powershell")]
    PowerShell,
    #[value(name = "elvish")]
    Elvish,
}

/// `Solace` - a private space to talk things through and watch your mood over time.
#[derive(Parser, Debug)]
#[command(name = "solace")]
#[command(version)]
#[command(about = "Supportive chat with session history and mood tracking.", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive conversation
    #[command(long_about = "\
Start an interactive conversation.

Each message is sent to the configured classifier service, which \
answers and labels the sentiment of the exchange. Sentiments are \
recorded for the mood views, and the conversation is saved as a \
session when you type /clear or /quit.

Examples:
  solace chat
  solace chat --offline     # no network; canned replies")]
    Chat {
        /// Use canned local replies instead of the classifier service
        #[arg(long)]
        offline: bool,
    },

    /// Browse and delete past conversations
    #[command(long_about = "\
Browse and delete past conversations.

Examples:
  solace sessions list
  solace sessions list --limit 5
  solace sessions show <id>
  solace sessions delete <id> --yes")]
    Sessions {
        #[command(subcommand)]
        session_command: SessionCommands,
    },

    /// Mood trend, distribution and summary
    #[command(long_about = "\
Show mood history derived from recorded sentiments.

Examples:
  solace mood trend             # last seven days
  solace mood distribution --json
  solace mood summary")]
    Mood {
        #[command(subcommand)]
        mood_command: MoodCommands,
    },

    /// Get or set your display name
    Name {
        #[command(subcommand)]
        name_command: NameCommands,
    },

    /// Manage configuration
    #[command(long_about = "\
Manage Solace configuration.

Use 'schema' to dump the full JSON Schema for the config file, \
which documents every available key, type, and default value.

Examples:
  solace config schema              # print JSON Schema to stdout
  solace config schema > schema.json")]
    Config {
        #[command(subcommand)]
        config_command: ConfigCommands,
    },

    /// Show configuration and storage status
    Status,

    /// Generate shell completion script to stdout
    #[command(long_about = "\
Generate shell completion scripts for `solace`.

The script is printed to stdout so it can be sourced directly:

Examples:
  source <(solace completions bash)
  solace completions zsh > ~/.zfunc/_solace
  solace completions fish > ~/.config/fish/completions/solace.fish")]
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Dump the full configuration JSON Schema to stdout
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(config_dir) = &cli.config_dir {
        if config_dir.trim().is_empty() {
            bail!("--config-dir cannot be empty");
        }
        std::env::set_var("SOLACE_CONFIG_DIR", config_dir);
    }

    // Completions and the schema dump are stdout-only and need no config.
    match &cli.command {
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout().lock();
            return write_shell_completion(*shell, &mut stdout);
        }
        Commands::Config {
            config_command: ConfigCommands::Schema,
        } => {
            let schema = schemars::schema_for!(Config);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging before config so load warnings are visible.
    // RUST_LOG wins, then SOLACE_LOG, then log_level from config.toml.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(Config::startup_log_level())),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = Config::load_or_init().await?;

    let engine = Engine::open(&config).await?;

    match cli.command {
        Commands::Completions { .. }
        | Commands::Config {
            config_command: ConfigCommands::Schema,
        } => unreachable!(),

        Commands::Chat { offline } => {
            let classifier = if offline || config.classifier.api_url.is_none() {
                if !offline {
                    println!("No classifier.api_url configured; using offline replies.");
                }
                create_offline_classifier()
            } else {
                create_classifier(&config.classifier)?
            };
            tracing::info!(classifier = classifier.name(), "Starting chat");
            let controller = engine.controller(classifier, ChatSettings::from_config(&config));
            repl::run(controller, config.chat.display_name.as_deref()).await
        }

        Commands::Sessions { session_command } => {
            solace::sessions::handle_session_command(session_command, &engine).await
        }

        Commands::Mood { mood_command } => {
            solace::mood::handle_mood_command(mood_command, &engine).await
        }

        Commands::Name { name_command } => {
            solace::profile::handle_name_command(name_command, &engine).await
        }

        Commands::Status => {
            let sessions = engine.registry.list().await;
            let entries = engine.ledger.entries().await;

            println!("🌿 Solace Status");
            println!();
            println!("Version:     {}", env!("CARGO_PKG_VERSION"));
            println!("Config:      {}", config.config_path.display());
            println!("Data:        {}", config.data_dir.display());
            println!("Storage:     {}", engine.collections.store().name());
            println!();
            println!(
                "Classifier:  {}",
                config.classifier.api_url.as_deref().unwrap_or("(offline)")
            );
            println!(
                "  API key:   {}",
                if config.classifier.api_key.is_some() { "set" } else { "not set" }
            );
            println!("  Timeout:   {}s", config.classifier.timeout_secs);
            println!();
            println!("Sessions:      {}", sessions.len());
            println!("Mood entries:  {}", entries.len());
            Ok(())
        }
    }
}

fn write_shell_completion<W: Write>(shell: CompletionShell, writer: &mut W) -> Result<()> {
    use clap_complete::generate;
    use clap_complete::shells;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, bin_name, writer),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, bin_name, writer),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, bin_name, writer),
        CompletionShell::PowerShell => generate(shells::PowerShell, &mut cmd, bin_name, writer),
        CompletionShell::Elvish => generate(shells::Elvish, &mut cmd, bin_name, writer),
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn completions_cli_parses_supported_shells() {
        for shell in ["bash", "fish", "zsh", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["solace", "completions", shell])
                .expect("completions invocation should parse");
            match cli.command {
                Commands::Completions { .. } => {}
                other => panic!("expected completions command, got {other:?}"),
            }
        }
    }

    #[test]
    fn completion_generation_mentions_binary_name() {
        let mut output = Vec::new();
        write_shell_completion(CompletionShell::Bash, &mut output)
            .expect("completion generation should succeed");
        let script = String::from_utf8(output).expect("completion output should be valid utf-8");
        assert!(
            script.contains("solace"),
            "completion script should reference binary name"
        );
    }

    #[test]
    fn sessions_list_limit_defaults_to_twenty() {
        let cli = Cli::try_parse_from(["solace", "sessions", "list"]).unwrap();
        match cli.command {
            Commands::Sessions {
                session_command: SessionCommands::List { limit },
            } => assert_eq!(limit, 20),
            other => panic!("expected sessions list, got {other:?}"),
        }
    }

    #[test]
    fn delete_requires_id_and_accepts_yes() {
        assert!(Cli::try_parse_from(["solace", "sessions", "delete"]).is_err());
        let cli = Cli::try_parse_from(["solace", "sessions", "delete", "abc", "--yes"]).unwrap();
        match cli.command {
            Commands::Sessions {
                session_command: SessionCommands::Delete { id, yes },
            } => {
                assert_eq!(id, "abc");
                assert!(yes);
            }
            other => panic!("expected sessions delete, got {other:?}"),
        }
    }

    #[test]
    fn chat_offline_flag_parses() {
        let cli = Cli::try_parse_from(["solace", "chat", "--offline"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { offline: true }));
    }
}
