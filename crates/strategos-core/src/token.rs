//! Stream output vocabulary.
//!
//! A directive stream is an ordered sequence of [`StreamToken`]s. Each token
//! renders to one wire chunk; structural tokens render to marker lines that a
//! client uses to detect region boundaries. Strict ordering contract per section:
//!
//! SectionHeader → (ReasoningBegin → Line* → ReasoningEnd | ReasoningNone)
//!   → (QueriesBegin → Query* → (ToolResultBegin → Line* → ToolResultEnd)* | QueriesNone)
//!   → (DeliverableBegin → Line* → DeliverableEnd | DeliverableNone)
//!   → SectionSeparator
//!
//! After the last section a single `Complete` ends the stream.

use std::fmt;

use crate::ids::ConversationId;
use crate::section::Section;

pub const REASONING_BEGIN: &str = "[THOUGHTS-BEGIN]";
pub const REASONING_END: &str = "[THOUGHTS-END]";
pub const REASONING_NONE: &str = "[THOUGHTS: none]";
pub const QUERIES_BEGIN: &str = "[SEARCH_QUERIES]";
pub const QUERIES_NONE: &str = "[SEARCH_QUERIES: none]";
pub const TOOL_RESULT_BEGIN: &str = "[TOOL-RESULT-BEGIN]";
pub const TOOL_RESULT_END: &str = "[TOOL-RESULT-END]";
pub const DELIVERABLE_BEGIN: &str = "[DELIVERABLE-BEGIN]";
pub const DELIVERABLE_END: &str = "[DELIVERABLE-END]";
pub const DELIVERABLE_NONE: &str = "[DELIVERABLE: none]";
pub const STREAM_COMPLETE: &str = "[WAR-GAME-DIRECTIVE-COMPLETE]";
pub const CONVERSATION_ID: &str = "[CONVERSATION_ID]";
pub const INFO: &str = "[INFO]";

/// Prefix of generation backend failures rendered inline.
pub const LLM_ERROR_TAG: &str = "[LLM ERROR]";
/// Prefix of search backend failures rendered inline.
pub const SEARCH_ERROR_TAG: &str = "[SEARCH ERROR]";
/// Prefix of any other inline failure.
pub const ERROR_TAG: &str = "[ERROR]";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamToken {
    SectionHeader(Section),

    ReasoningBegin,
    ReasoningEnd,
    ReasoningNone,

    QueriesBegin,
    Query(String),
    QueriesNone,
    ToolResultBegin(String),
    ToolResultEnd(String),

    DeliverableBegin,
    DeliverableEnd,
    DeliverableNone,

    /// One line of region content.
    Line(String),
    SectionSeparator,
    Complete,

    /// Emitted ahead of a directive so follow-up chats can reference it.
    ConversationStarted(ConversationId),
    Info(String),
    /// Verbatim text (chat responses).
    Text(String),
    /// Inline failure; the message already carries its error tag.
    Error(String),
}

impl StreamToken {
    /// Inline error token with the given tag, e.g. `[LLM ERROR] timeout after 30s`.
    pub fn error(tag: &str, message: impl fmt::Display) -> Self {
        Self::Error(format!("{tag} {message}"))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Render the wire text for this token.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StreamToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionHeader(section) => writeln!(f, "=== PART {} ===", section.number()),
            Self::ReasoningBegin => writeln!(f, "{REASONING_BEGIN}"),
            Self::ReasoningEnd => writeln!(f, "{REASONING_END}"),
            Self::ReasoningNone => writeln!(f, "{REASONING_NONE}"),
            Self::QueriesBegin => writeln!(f, "{QUERIES_BEGIN}"),
            Self::Query(q) => writeln!(f, "- {q}"),
            Self::QueriesNone => writeln!(f, "{QUERIES_NONE}"),
            Self::ToolResultBegin(q) => writeln!(f, "{TOOL_RESULT_BEGIN} {q}"),
            Self::ToolResultEnd(q) => writeln!(f, "{TOOL_RESULT_END} {q}"),
            Self::DeliverableBegin => writeln!(f, "{DELIVERABLE_BEGIN}"),
            Self::DeliverableEnd => writeln!(f, "{DELIVERABLE_END}"),
            Self::DeliverableNone => writeln!(f, "{DELIVERABLE_NONE}"),
            Self::Line(line) => writeln!(f, "{line}"),
            Self::SectionSeparator => writeln!(f),
            Self::Complete => writeln!(f, "{STREAM_COMPLETE}"),
            Self::ConversationStarted(id) => write!(f, "{CONVERSATION_ID} {id}"),
            Self::Info(msg) => write!(f, "{INFO} {msg}"),
            Self::Text(text) => f.write_str(text),
            Self::Error(msg) => writeln!(f, "{msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_header_renders_part_number() {
        let token = StreamToken::SectionHeader(Section::MissionBriefing);
        assert_eq!(token.render(), "=== PART 1 ===\n");
        let token = StreamToken::SectionHeader(Section::Disclaimer);
        assert_eq!(token.render(), "=== PART 11 ===\n");
    }

    #[test]
    fn region_markers_render_as_lines() {
        assert_eq!(StreamToken::ReasoningNone.render(), "[THOUGHTS: none]\n");
        assert_eq!(StreamToken::QueriesNone.render(), "[SEARCH_QUERIES: none]\n");
        assert_eq!(StreamToken::DeliverableNone.render(), "[DELIVERABLE: none]\n");
        assert_eq!(StreamToken::SectionSeparator.render(), "\n");
        assert_eq!(StreamToken::Complete.render(), "[WAR-GAME-DIRECTIVE-COMPLETE]\n");
    }

    #[test]
    fn query_and_tool_result_markers_carry_query() {
        assert_eq!(StreamToken::Query("lease law".into()).render(), "- lease law\n");
        assert_eq!(
            StreamToken::ToolResultBegin("lease law".into()).render(),
            "[TOOL-RESULT-BEGIN] lease law\n"
        );
        assert_eq!(
            StreamToken::ToolResultEnd("lease law".into()).render(),
            "[TOOL-RESULT-END] lease law\n"
        );
    }

    #[test]
    fn conversation_and_info_have_no_trailing_newline() {
        let id = ConversationId::from_raw("conv_1");
        assert_eq!(
            StreamToken::ConversationStarted(id).render(),
            "[CONVERSATION_ID] conv_1"
        );
        assert_eq!(StreamToken::Info("done".into()).render(), "[INFO] done");
    }

    #[test]
    fn error_token_is_tagged() {
        let token = StreamToken::error(LLM_ERROR_TAG, "boom");
        assert!(token.is_error());
        assert_eq!(token.render(), "[LLM ERROR] boom\n");
        assert!(!StreamToken::Line("[LLM ERROR] boom".into()).is_error());
    }
}
