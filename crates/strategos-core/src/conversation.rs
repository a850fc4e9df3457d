use serde::{Deserialize, Serialize};

/// Context stored per conversation for follow-up chat turns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub case_facts: String,
    pub history: Vec<String>,
}

impl ConversationContext {
    pub fn new(case_facts: impl Into<String>) -> Self {
        Self {
            case_facts: case_facts.into(),
            history: Vec::new(),
        }
    }

    /// Flatten facts and prior responses into the text block embedded in chat prompts.
    pub fn render(&self) -> String {
        let mut out = format!("{}\nPrevious AI Responses:\n", self.case_facts);
        for entry in &self.history {
            out.push_str("- ");
            out.push_str(entry);
            out.push('\n');
        }
        out
    }
}
