//! Mood tracking: the per-message mood ledger and read-time trend views.

pub mod ledger;
pub mod tally;
pub mod trend;
pub mod types;

pub use ledger::MoodLedger;
pub use tally::SentimentTally;
pub use trend::{
    distribution, local_today, rolling_trend, summarize, MoodSummary, SentimentCount, TrendPoint,
};
pub use types::{MoodEntry, Sentiment};

use crate::engine::Engine;
use anyhow::Result;

// ── CLI handler ──

/// Handle `solace mood <subcommand>` CLI commands.
pub async fn handle_mood_command(command: crate::MoodCommands, engine: &Engine) -> Result<()> {
    let entries = engine.ledger.entries().await;
    match command {
        crate::MoodCommands::Trend { json } => {
            let trend = rolling_trend(&entries, local_today());
            if json {
                println!("{}", serde_json::to_string_pretty(&trend)?);
                return Ok(());
            }
            println!("Mood over the last {} days:\n", trend::TREND_DAYS);
            for point in &trend {
                let bar = "█".repeat(point.count);
                let label = if point.count == 0 {
                    "-".to_string()
                } else {
                    point.sentiment.to_string()
                };
                println!("  {}  {:<22} {bar}", point.day.format("%a %d %b"), label);
            }
        }
        crate::MoodCommands::Distribution { json } => {
            let mut groups = distribution(&entries);
            groups.sort_by(|a, b| b.count.cmp(&a.count));
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
                return Ok(());
            }
            if groups.is_empty() {
                println!("No mood entries recorded yet.");
                return Ok(());
            }
            let total: usize = groups.iter().map(|g| g.count).sum();
            println!("Mood distribution ({total} entries):\n");
            for group in &groups {
                #[allow(clippy::cast_precision_loss)]
                let share = group.count as f64 * 100.0 / total as f64;
                println!("  {:<22} {:>4}  {share:>5.1}%", group.sentiment, group.count);
            }
        }
        crate::MoodCommands::Summary => {
            let sessions = engine.registry.list().await;
            let summary = summarize(&entries, sessions.len());
            println!("Mood Summary:\n");
            println!("  Sessions:      {}", summary.total_sessions);
            println!("  Mood entries:  {}", summary.total_entries);
            println!("  Days tracked:  {}", summary.days_tracked);
            println!(
                "  Most frequent: {}",
                summary
                    .dominant
                    .as_ref()
                    .map_or_else(|| "(none yet)".to_string(), ToString::to_string)
            );
        }
    }
    Ok(())
}
