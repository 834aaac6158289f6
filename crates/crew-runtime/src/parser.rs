//! Interpreting a model reply as a final answer or tool requests

use crew_llm::{ContentBlock, Message, tools::input_as_string};
use regex::Regex;
use std::sync::LazyLock;

static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:\s*(?P<tool>[^\n]*?)\s*\n\s*Action\s*\d*\s*Input\s*\d*\s*:\s*(?P<input>.*)")
        .unwrap_or_else(|e| panic!("invalid action pattern: {e}"))
});

const FINAL_ANSWER: &str = "Final Answer:";

/// A tool the model asked to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    /// Provider tool-call id; `None` for text-protocol calls
    pub id: Option<String>,
    pub name: String,
    pub input: String,
}

/// What the agent does next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    FinalAnswer(String),
    UseTools(Vec<ToolRequest>),
}

/// Parse a model reply.
///
/// Native tool-use blocks take precedence. Otherwise the text is scanned for
/// an `Action:` / `Action Input:` pair that precedes any `Final Answer:`.
/// Anything else, including unparseable text, is a final answer.
pub fn parse(message: &Message) -> Decision {
    let native: Vec<ToolRequest> = message
        .tool_uses()
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::ToolUse { id, name, input } => Some(ToolRequest {
                id: Some(id.clone()),
                name: name.trim().to_string(),
                input: input_as_string(input),
            }),
            _ => None,
        })
        .collect();
    if !native.is_empty() {
        return Decision::UseTools(native);
    }

    parse_text(&message.text().unwrap_or_default())
}

/// Parse a text-protocol reply
pub fn parse_text(text: &str) -> Decision {
    let final_at = text.find(FINAL_ANSWER);
    let head = final_at.map_or(text, |at| &text[..at]);

    if let Some(caps) = ACTION.captures(head) {
        let name = caps["tool"].trim().trim_matches('*').trim();
        if !name.is_empty() {
            let input = strip_quotes(cut_observation(&caps["input"]).trim());
            return Decision::UseTools(vec![ToolRequest {
                id: None,
                name: name.to_string(),
                input: input.to_string(),
            }]);
        }
    }

    match final_at {
        Some(at) => Decision::FinalAnswer(text[at + FINAL_ANSWER.len()..].trim().to_string()),
        None => Decision::FinalAnswer(text.trim().to_string()),
    }
}

/// Remove `Thought:` / `Action:` scaffolding so an unfinished reply reads as prose
pub fn strip_tool_syntax(text: &str) -> String {
    if let Some(at) = text.find(FINAL_ANSWER) {
        return text[at + FINAL_ANSWER.len()..].trim().to_string();
    }

    text.lines()
        .filter(|line| {
            let line = line.trim_start();
            !(line.starts_with("Action") || line.starts_with("Observation:"))
        })
        .map(|line| line.trim_start().strip_prefix("Thought:").unwrap_or(line).trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn cut_observation(input: &str) -> &str {
    input.find("Observation:").map_or(input, |at| &input[..at])
}

fn strip_quotes(input: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = input
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    input
}
