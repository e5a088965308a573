//! Core type definitions for the Portico assistant.
//!
//! Defines the fundamental data structures that flow through the pipeline:
//! conversation turns, intent analysis, tool results, and the final
//! per-request turn result.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Represents a participant role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single turn in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    /// Create a system turn.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// A coarse category of user goal, derived purely from keyword presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Navigation,
    KnowledgeSearch,
    Projects,
    Skills,
    Experience,
    Contact,
    Conversation,
}

impl Intent {
    /// The wire/tool-mapping identifier for this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Navigation => "navigation",
            Intent::KnowledgeSearch => "knowledge_search",
            Intent::Projects => "projects",
            Intent::Skills => "skills",
            Intent::Experience => "experience",
            Intent::Contact => "contact",
            Intent::Conversation => "conversation",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named UI section the assistant can suggest or open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modal {
    Whoami,
    Resume,
    Skills,
    Projects,
    Contact,
}

impl Modal {
    /// All valid modals, in canonical display order.
    pub const ALL: [Modal; 5] = [
        Modal::Whoami,
        Modal::Resume,
        Modal::Skills,
        Modal::Projects,
        Modal::Contact,
    ];

    /// The section identifier used in `**explore:<id>**` suggestions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modal::Whoami => "whoami",
            Modal::Resume => "resume",
            Modal::Skills => "skills",
            Modal::Projects => "projects",
            Modal::Contact => "contact",
        }
    }

    /// Parse a modal from its section identifier.
    pub fn parse(s: &str) -> Option<Modal> {
        match s {
            "whoami" => Some(Modal::Whoami),
            "resume" => Some(Modal::Resume),
            "skills" => Some(Modal::Skills),
            "projects" => Some(Modal::Projects),
            "contact" => Some(Modal::Contact),
            _ => None,
        }
    }

    /// Tie-break priority when intent analysis detects more than one modal.
    /// Higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            Modal::Skills => 5,
            Modal::Projects => 4,
            Modal::Resume => 3,
            Modal::Whoami => 2,
            Modal::Contact => 1,
        }
    }
}

impl std::fmt::Display for Modal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of classifying a single utterance.
///
/// Created once per utterance and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    /// First detected intent in table declaration order, or the
    /// knowledge-search fallback when nothing matched.
    pub primary_intent: Intent,
    /// Every intent whose keyword table matched, in table order.
    pub detected_intents: Vec<Intent>,
    /// At most one modal after deduplication and priority tie-break.
    pub mentioned_modals: Vec<Modal>,
    pub requires_modal: bool,
    /// Ratio of detected intents to total intent categories, in [0, 1].
    pub confidence: f64,
}

/// The result of a single tool invocation.
///
/// Produced exactly once per invocation by the dispatcher and immutable
/// after return. `result` carries a payload only when `success` is true;
/// consumers must check `success` before reading it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub result: Option<serde_json::Value>,
    pub execution_time: Duration,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ToolResult {
    /// Create a successful result with a payload.
    ///
    /// The dispatcher overwrites `execution_time` with its own measurement.
    pub fn ok(tool_name: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            result: Some(result),
            execution_time: Duration::ZERO,
            success: true,
            error: None,
            metadata: None,
        }
    }

    /// Create a failed result carrying an error message.
    pub fn failure(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            result: None,
            execution_time: Duration::ZERO,
            success: false,
            error: Some(error.into()),
            metadata: None,
        }
    }

    /// Create a failed result that still carries a diagnostic payload
    /// (e.g. a search status distinguishing "nothing found" from
    /// "everything below threshold").
    pub fn failure_with_payload(
        tool_name: impl Into<String>,
        result: serde_json::Value,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            result: Some(result),
            execution_time: Duration::ZERO,
            success: false,
            error: Some(error.into()),
            metadata: None,
        }
    }
}

/// The orchestrator's final output for one request.
///
/// Constructed fresh per request; has no persistent identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    /// The answer text, with any modal suggestion already appended.
    pub message: String,
    /// Successful tool results plus a synthetic validation summary entry.
    pub tool_results: Vec<ToolResult>,
    pub modal_actions: Vec<Modal>,
    pub suggestions: Vec<String>,
    pub intent_analysis: IntentAnalysis,
    /// Set only when an unexpected fault escaped every inner guard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_parse_round_trip() {
        for modal in Modal::ALL {
            assert_eq!(Modal::parse(modal.as_str()), Some(modal));
        }
        assert_eq!(Modal::parse("garage"), None);
    }

    #[test]
    fn test_modal_priority_ordering() {
        assert!(Modal::Skills.priority() > Modal::Projects.priority());
        assert!(Modal::Projects.priority() > Modal::Resume.priority());
        assert!(Modal::Resume.priority() > Modal::Whoami.priority());
        assert!(Modal::Whoami.priority() > Modal::Contact.priority());
    }

    #[test]
    fn test_intent_serde_identifiers() {
        let json = serde_json::to_string(&Intent::KnowledgeSearch).unwrap();
        assert_eq!(json, "\"knowledge_search\"");
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Intent::KnowledgeSearch);
    }

    #[test]
    fn test_tool_result_failure_has_no_payload() {
        let result = ToolResult::failure("show_modal", "invalid modal id");
        assert!(!result.success);
        assert!(result.result.is_none());
        assert_eq!(result.error.as_deref(), Some("invalid modal id"));
    }

    #[test]
    fn test_chat_turn_helpers() {
        assert_eq!(ChatTurn::user("hi").role, Role::User);
        assert_eq!(ChatTurn::assistant("hello").role, Role::Assistant);
        assert_eq!(ChatTurn::system("persona").role, Role::System);
    }
}
