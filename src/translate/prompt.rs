//! Prompt construction for filter translation

use std::fmt::Write;

use super::ChatMessage;
use crate::dataset::TableSchema;

/// Builds the `[system, user]` payload for a schema
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    instructions: String,
}

impl PromptBuilder {
    /// Render the system instructions for `schema` once
    pub fn new(schema: &TableSchema) -> Self {
        Self {
            instructions: render_instructions(schema),
        }
    }

    /// The system instructions
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Messages for one utterance
    pub fn build(&self, utterance: &str) -> [ChatMessage; 2] {
        [
            ChatMessage::system(self.instructions.clone()),
            ChatMessage::user(utterance),
        ]
    }
}

fn render_instructions(schema: &TableSchema) -> String {
    let mut out = String::new();
    out.push_str("You are a data filtering assistant.\n");
    out.push_str("The user will ask for rows based on specific criteria.\n");
    out.push_str("You must return a JSON object representing the filters.\n");
    out.push_str("Do not return any text other than the JSON.\n\n");
    out.push_str("The dataset has the following columns and values:\n");
    for column in &schema.columns {
        if column.allowed.is_empty() {
            let _ = writeln!(out, "- {}: (Numeric)", column.name);
        } else {
            let _ = writeln!(out, "- {}: {}", column.name, column.allowed.join(", "));
        }
    }
    out.push('\n');
    out.push_str("Example User Input: \"Show me high risk timber buildings in London\"\n");
    out.push_str(
        "Example JSON Output: {\"FloodRisk\": \"High\", \"Construction\": \"Timber Frame\", \"Location\": \"London\"}\n\n",
    );
    out.push_str("If the user asks to reset or show all, return an empty JSON object: {}\n");
    out
}
