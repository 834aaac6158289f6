//! Telegram front-end
//!
//! Every text message is one analysis request, except text starting with `/`,
//! which is a command. The dispatcher handles chats concurrently, so a slow
//! run only delays its own chat.

use crate::crew::StockCrew;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ChatAction;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

/// Reply to `/start`
pub const GREETING: &str = "Hi! Ask me about company stock.";

/// Telegram rejects longer messages
const MAX_MESSAGE_CHARS: usize = 4096;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the greeting")]
    Start,
}

/// Poll Telegram until the process receives Ctrl-C
pub async fn run(token: String, crew: Arc<StockCrew>) {
    let bot = Bot::new(token);
    info!("Starting Telegram bot");

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(on_command),
        )
        .branch(
            Message::filter_text()
                .filter(|text: String| is_analysis_request(&text))
                .endpoint(on_text),
        )
        .branch(Message::filter_text().endpoint(on_unknown_command));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![crew])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_command(bot: Bot, msg: Message, command: Command) -> ResponseResult<()> {
    match command {
        Command::Start => {
            bot.send_message(msg.chat.id, GREETING).await?;
        }
    }
    Ok(())
}

async fn on_unknown_command(bot: Bot, msg: Message, text: String) -> ResponseResult<()> {
    info!(chat_id = msg.chat.id.0, command = %text, "Unknown command");
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Commands are never analysed
fn is_analysis_request(text: &str) -> bool {
    !text.starts_with('/')
}

async fn on_text(
    bot: Bot,
    msg: Message,
    text: String,
    crew: Arc<StockCrew>,
) -> ResponseResult<()> {
    info!(chat_id = msg.chat.id.0, "Analysis requested");
    if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
        warn!(error = %e, "Failed to send typing indicator");
    }

    let reply = crew.handle(&text).await;
    for chunk in split_reply(&reply, MAX_MESSAGE_CHARS) {
        bot.send_message(msg.chat.id, chunk).await?;
    }
    Ok(())
}

/// Split on line boundaries into pieces of at most `max` characters
fn split_reply(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let mut line = line;
        while !line.is_empty() {
            let room = max - current_len;
            let line_len = line.chars().count();
            if line_len <= room {
                current.push_str(line);
                current_len += line_len;
                break;
            }
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            // A single line longer than `max`
            let cut = line
                .char_indices()
                .nth(max)
                .map_or(line.len(), |(i, _)| i);
            chunks.push(line[..cut].to_string());
            line = &line[cut..];
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
