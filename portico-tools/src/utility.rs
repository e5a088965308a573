//! Utility tools — clarification prompts, graceful error fallbacks, and
//! lightweight interaction analytics.

use async_trait::async_trait;
use portico_core::error::ToolError;
use portico_core::registry::Tool;
use portico_core::types::ToolResult;
use serde_json::json;

/// Handles ambiguous queries by offering clarifying questions.
pub struct ClarificationTool;

#[async_trait]
impl Tool for ClarificationTool {
    fn name(&self) -> &str {
        "clarification"
    }

    fn description(&self) -> &str {
        "handles ambiguous queries with clarifying questions"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = input["query"].as_str().unwrap_or_default();

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "status": "needs_clarification",
                "original_query": query,
                "clarifying_questions": [
                    "could you be more specific about what you're looking for?",
                    "are you interested in technical details or general information?",
                    "would you like to know about blake's experience, projects, or skills?",
                    "is there a particular aspect you'd like me to focus on?",
                ],
                "suggestions": [
                    "try asking about specific technologies or projects",
                    "specify if you want technical or personal information",
                    "use keywords like 'skills', 'projects', 'experience', or 'contact'",
                ],
                "modal_suggestion": "whoami",
            }),
        ))
    }
}

/// Graceful fallback responses keyed by error type.
pub struct ErrorHandlerTool;

const ERROR_FALLBACKS: &[(&str, &str, &str)] = &[
    (
        "unsupported_request",
        "i can help you learn about blake's background, skills, projects, and contact information. what would you like to know?",
        "whoami",
    ),
    (
        "no_information",
        "i don't have that specific information in blake's portfolio. try asking about his experience, projects, or technical skills.",
        "resume",
    ),
    (
        "technical_error",
        "something went wrong processing your request. please try asking about blake's skills, projects, or experience.",
        "skills",
    ),
    (
        "unknown",
        "i'm here to help you learn about blake bowling's portfolio. you can ask about his background, skills, projects, or contact information.",
        "whoami",
    ),
];

#[async_trait]
impl Tool for ErrorHandlerTool {
    fn name(&self) -> &str {
        "error_handler"
    }

    fn description(&self) -> &str {
        "graceful fallback for unsupported requests"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let error_type = input["error_type"].as_str().unwrap_or("unknown");
        let query = input["query"].as_str().unwrap_or_default();

        let (error_type, message, modal) = ERROR_FALLBACKS
            .iter()
            .find(|(kind, _, _)| *kind == error_type)
            .copied()
            .unwrap_or(ERROR_FALLBACKS[ERROR_FALLBACKS.len() - 1]);

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "status": "handled",
                "error_type": error_type,
                "original_query": query,
                "fallback_message": message,
                "modal_suggestion": modal,
                "available_sections": ["whoami", "resume", "skills", "projects", "contact"],
            }),
        ))
    }
}

/// Tracks interaction patterns. Stateless echo-style tracking: durable
/// aggregation lives in the execution log, not here.
pub struct AnalyticsTool;

#[async_trait]
impl Tool for AnalyticsTool {
    fn name(&self) -> &str {
        "analytics"
    }

    fn description(&self) -> &str {
        "tracks interaction patterns and popular queries"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let action = input["action"].as_str().unwrap_or("track");
        let session_id = input["session_id"].as_str().unwrap_or_default();

        let payload = match action {
            "track_query" => json!({
                "status": "tracked",
                "session_id": session_id,
                "query": input["query"],
                "intent": input["intent"],
                "tools_used": input["tools_used"],
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
            "track_modal" => json!({
                "status": "tracked",
                "session_id": session_id,
                "modal_opened": input["modal_id"],
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
            "get_stats" => json!({
                "status": "stats_available",
                "popular_queries": [
                    "tell me about blake's background",
                    "what technologies does blake use",
                    "show me blake's projects",
                ],
                "popular_modals": ["skills", "projects", "whoami"],
            }),
            _ => json!({
                "status": "no_action",
                "available_actions": ["track_query", "track_modal", "get_stats"],
            }),
        };

        Ok(ToolResult::ok(self.name(), payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clarification_offers_questions() {
        let result = ClarificationTool
            .execute(json!({ "query": "stuff" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["status"], "needs_clarification");
        assert_eq!(payload["original_query"], "stuff");
        assert_eq!(payload["clarifying_questions"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_error_handler_known_type() {
        let result = ErrorHandlerTool
            .execute(json!({ "error_type": "no_information", "query": "q" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["error_type"], "no_information");
        assert_eq!(payload["modal_suggestion"], "resume");
    }

    #[tokio::test]
    async fn test_error_handler_unknown_type_defaults() {
        let result = ErrorHandlerTool
            .execute(json!({ "error_type": "surprise" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["error_type"], "unknown");
        assert_eq!(payload["modal_suggestion"], "whoami");
    }

    #[tokio::test]
    async fn test_analytics_track_query() {
        let result = AnalyticsTool
            .execute(json!({
                "action": "track_query",
                "session_id": "s1",
                "query": "projects",
                "intent": "projects",
                "tools_used": ["knowledge_search"],
            }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["status"], "tracked");
        assert_eq!(payload["session_id"], "s1");
        assert!(payload["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_analytics_unknown_action() {
        let result = AnalyticsTool
            .execute(json!({ "action": "explode" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["status"], "no_action");
    }
}
