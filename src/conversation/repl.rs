//! Interactive terminal chat loop.

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::controller::{ConversationController, SendOutcome};
use super::message::Message;

const CRISIS_BANNER: &str = "\
If you are in immediate danger or thinking about ending your life, please \
contact your local emergency number or a crisis line right now. You don't \
have to go through this alone.";

fn print_assistant(message: &Message) {
    println!("\nsolace: {}\n", message.text);
    if message.is_crisis() {
        println!("⚠️  {CRISIS_BANNER}\n");
    }
}

fn prompt() {
    print!("you: ");
    let _ = std::io::stdout().flush();
}

async fn end_conversation(controller: &mut ConversationController) {
    match controller.end().await {
        Ok(Some(session)) => println!(
            "✓ Saved session ({} messages, mood: {}).",
            session.message_count, session.dominant_sentiment
        ),
        Ok(None) => {}
        Err(error) => eprintln!("Could not save this conversation: {error:#}"),
    }
}

/// Run the chat loop on stdin/stdout until `/quit` or end of input.
///
/// `/clear` saves the current conversation and starts a new one; `/name`
/// sets the display name.
pub async fn run(mut controller: ConversationController, fallback_name: Option<&str>) -> Result<()> {
    controller.start(fallback_name).await;
    if let Some(greeting) = controller.messages().first() {
        print_assistant(greeting);
    }
    println!("(type /clear to start over, /name <name> to set your name, /quit to leave)\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "/quit" | "/exit" => break,
            "/clear" => {
                end_conversation(&mut controller).await;
                if let Some(greeting) = controller.messages().first() {
                    print_assistant(greeting);
                }
                continue;
            }
            _ => {}
        }

        if let Some(name) = input
            .strip_prefix("/name")
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            match controller.set_name(name).await {
                Ok(Some(confirmed)) => println!("✓ I'll call you {confirmed}.\n"),
                Ok(None) => println!("Usage: /name <your name>\n"),
                Err(error) => eprintln!("Could not save your name: {error:#}\n"),
            }
            continue;
        }

        match controller.send(input).await {
            Ok(SendOutcome::Replied(reply)) => print_assistant(&reply),
            Ok(SendOutcome::Ignored) => {}
            Err(error) => eprintln!("\n⚠️  {error}. Please check your connection and try again.\n"),
        }
    }

    end_conversation(&mut controller).await;
    Ok(())
}
