//! The per-request orchestration pipeline.
//!
//! One `process_message` call runs the full pipeline: classify the
//! utterance, select and dispatch tools, validate retrieved knowledge,
//! generate (or fall back), resolve a modal suggestion, and assemble the
//! turn result. The orchestrator holds no conversational state between
//! calls; history arrives from the caller each turn.
//!
//! `process_message` is infallible at the boundary. Every layer below it
//! already isolates its own faults, and a defensive catch converts
//! anything that still escapes into an apologetic turn result.

use crate::error::PorticoError;
use crate::generation::GenerationGuard;
use crate::intent;
use crate::knowledge::{KnowledgeIndex, ScoredChunk, validate_item};
use crate::persistence::{ExecutionLog, ExecutionRecord, NoopLog};
use crate::registry::ToolRegistry;
use crate::selector::select_tools;
use crate::types::{ChatTurn, Modal, ToolResult, TurnResult};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Returned when an unexpected fault escapes the inner pipeline.
const ERROR_MESSAGE: &str =
    "i encountered an error processing your request. please try again or contact blake directly.";

/// Section table for the no-knowledge branch, checked in order with the
/// last entry doubling as the default.
const NO_KNOWLEDGE_SECTIONS: &[(Modal, &[&str])] = &[
    (
        Modal::Skills,
        &["skill", "technical", "technology", "programming", "code", "language", "framework"],
    ),
    (
        Modal::Projects,
        &["project", "built", "created", "developed", "app", "application", "website"],
    ),
    (
        Modal::Resume,
        &["work", "job", "experience", "career", "professional", "employment", "resume"],
    ),
    (
        Modal::Contact,
        &["contact", "reach", "email", "hire", "message", "connect"],
    ),
    (
        Modal::Whoami,
        &["who", "about", "background", "personal", "bio"],
    ),
];

/// The orchestrator. Owns the tool registry, knowledge index, generation
/// guard, and execution log for the life of the service.
pub struct Agent {
    registry: ToolRegistry,
    index: Arc<KnowledgeIndex>,
    guard: GenerationGuard,
    log: Arc<dyn ExecutionLog>,
}

impl Agent {
    pub fn new(
        registry: ToolRegistry,
        index: Arc<KnowledgeIndex>,
        guard: GenerationGuard,
        log: Arc<dyn ExecutionLog>,
    ) -> Self {
        Self {
            registry,
            index,
            guard,
            log,
        }
    }

    /// Build an agent that discards execution records.
    pub fn without_log(
        registry: ToolRegistry,
        index: Arc<KnowledgeIndex>,
        guard: GenerationGuard,
    ) -> Self {
        Self::new(registry, index, guard, Arc::new(NoopLog))
    }

    pub fn index(&self) -> &KnowledgeIndex {
        &self.index
    }

    /// Process one user utterance end to end. Never fails: faults that
    /// escape the inner pipeline are folded into an error turn result.
    pub async fn process_message(
        &self,
        message: &str,
        session_id: &str,
        history: &[ChatTurn],
    ) -> TurnResult {
        match self.run(message, session_id, history).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "pipeline fault escaped inner guards");
                TurnResult {
                    message: ERROR_MESSAGE.to_string(),
                    tool_results: Vec::new(),
                    modal_actions: Vec::new(),
                    suggestions: vec![
                        "try rephrasing your question".to_string(),
                        "contact blake directly".to_string(),
                    ],
                    intent_analysis: intent::analyze(message),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn run(
        &self,
        message: &str,
        session_id: &str,
        history: &[ChatTurn],
    ) -> Result<TurnResult, PorticoError> {
        let analysis = intent::analyze(message);
        info!(
            intent = %analysis.primary_intent,
            confidence = analysis.confidence,
            "processing message"
        );

        let tools = select_tools(&analysis);
        let mut executed: Vec<ToolResult> = Vec::new();

        for tool_name in &tools {
            let input = json!({ "query": message, "messages": history });
            let result = self.registry.dispatch(tool_name, input.clone()).await;
            self.log
                .record(ExecutionRecord::new(
                    session_id,
                    *tool_name,
                    input,
                    result.result.clone(),
                    result.execution_time,
                    result.success,
                ))
                .await;
            executed.push(result);
        }

        let (items_found, knowledge_context) = extract_knowledge(&executed, message);
        let knowledge_attempted = tools.contains(&"knowledge_search");

        let mut modal_actions: Vec<Modal> = Vec::new();
        let mut tool_results: Vec<ToolResult> =
            executed.iter().filter(|r| r.success).cloned().collect();

        let message_out = if knowledge_attempted && knowledge_context.is_empty() {
            info!("no validated knowledge for query, using section fallback");
            tool_results.push(ToolResult::failure_with_payload(
                "validation_guard",
                json!({
                    "status": "no_knowledge_found",
                    "attempted_tools": tools,
                }),
                "no validated knowledge for query",
            ));
            return Ok(TurnResult {
                message: no_knowledge_response(message),
                tool_results,
                modal_actions,
                suggestions: vec![
                    "explore blake's portfolio sections".to_string(),
                    "ask about specific topics".to_string(),
                ],
                intent_analysis: analysis,
                error: None,
            });
        } else {
            let mut answer = self
                .guard
                .generate(message, &knowledge_context, history)
                .await;

            if let Some(modal) = self.resolve_modal(message, &analysis).await {
                modal_actions.push(modal);
                if !answer.contains("explore:") {
                    answer.push_str(&format!(" **explore:{modal}**"));
                }
            }
            answer
        };

        if knowledge_attempted {
            tool_results.push(ToolResult::ok(
                "knowledge_validation",
                json!({
                    "knowledge_items_found": items_found,
                    "knowledge_items_validated": knowledge_context.len(),
                    "validation_passed": !knowledge_context.is_empty(),
                    "fallback_triggered": knowledge_context.is_empty(),
                }),
            ));
        }

        let suggestions = extract_suggestions(&executed);

        Ok(TurnResult {
            message: message_out,
            tool_results,
            modal_actions,
            suggestions,
            intent_analysis: analysis,
            error: None,
        })
    }

    /// Resolve the modal to suggest. The scoring selector tool is always
    /// consulted first; the raw keyword mention is the fallback when the
    /// selector is unavailable or scores zero. No modal is attached only
    /// when both come up empty.
    async fn resolve_modal(
        &self,
        message: &str,
        analysis: &crate::types::IntentAnalysis,
    ) -> Option<Modal> {
        let input = json!({
            "query": message,
            "detected_modals": analysis.mentioned_modals,
        });
        let result = self
            .registry
            .dispatch("intelligent_modal_selector", input)
            .await;

        if result.success {
            if let Some(payload) = &result.result {
                let confidence = payload["confidence_score"].as_i64().unwrap_or(0);
                if confidence > 0 {
                    if let Some(modal) =
                        payload["recommended_modal"].as_str().and_then(Modal::parse)
                    {
                        return Some(modal);
                    }
                }
            }
        }

        analysis.mentioned_modals.first().copied()
    }
}

/// Pull the raw and validated knowledge out of the executed tool results.
/// Returns (items found before validation, validated items).
fn extract_knowledge(executed: &[ToolResult], query: &str) -> (usize, Vec<ScoredChunk>) {
    let mut found = 0usize;
    let mut validated: Vec<ScoredChunk> = Vec::new();

    for result in executed {
        if result.tool_name != "knowledge_search" || !result.success {
            continue;
        }
        let Some(payload) = &result.result else {
            continue;
        };
        let Ok(items) = serde_json::from_value::<Vec<ScoredChunk>>(payload["results"].clone())
        else {
            warn!(tool = %result.tool_name, "malformed knowledge payload, skipping");
            continue;
        };
        found += items.len();
        validated.extend(items.into_iter().filter(|item| validate_item(item, query)));
    }

    (found, validated)
}

/// Follow-up suggestions from the follow-up generator, when it ran.
fn extract_suggestions(executed: &[ToolResult]) -> Vec<String> {
    executed
        .iter()
        .find(|r| r.tool_name == "follow_up_generator" && r.success)
        .and_then(|r| r.result.as_ref())
        .and_then(|payload| payload["suggestions"].as_array().cloned())
        .map(|values| {
            values
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Deterministic response when retrieval was attempted but produced no
/// validated knowledge.
fn no_knowledge_response(query: &str) -> String {
    let query_lower = query.to_lowercase();

    let section = NO_KNOWLEDGE_SECTIONS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| query_lower.contains(kw)))
        .map(|(modal, _)| *modal)
        .unwrap_or(Modal::Whoami);

    format!("i don't have specific details about that. **explore:{section}**")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::generation::ModelRotation;
    use crate::persistence::MemoryLog;
    use crate::providers::MockBackend;
    use crate::registry::Tool;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// Minimal stand-in for the real knowledge search tool.
    struct IndexSearchTool {
        index: Arc<KnowledgeIndex>,
    }

    #[async_trait]
    impl Tool for IndexSearchTool {
        fn name(&self) -> &str {
            "knowledge_search"
        }

        fn description(&self) -> &str {
            "searches the knowledge index"
        }

        async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
            let query = input["query"].as_str().unwrap_or_default();
            let results = self.index.search(query);
            if results.is_empty() {
                return Ok(ToolResult::failure_with_payload(
                    "knowledge_search",
                    json!({ "results": [], "status": "no_relevant_knowledge_found" }),
                    "no relevant knowledge found",
                ));
            }
            Ok(ToolResult::ok(
                "knowledge_search",
                json!({ "results": results, "status": "knowledge_found" }),
            ))
        }
    }

    fn test_agent(backend: MockBackend, log: Arc<dyn ExecutionLog>) -> Agent {
        let index = Arc::new(KnowledgeIndex::builtin());
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(IndexSearchTool {
                index: index.clone(),
            }))
            .unwrap();
        let rotation = Arc::new(ModelRotation::new(vec!["model-a".into()]));
        let guard = GenerationGuard::new(Arc::new(backend), rotation);
        Agent::new(registry, index, guard, log)
    }

    #[tokio::test]
    async fn test_gibberish_takes_no_knowledge_branch() {
        let agent = test_agent(MockBackend::with_reply("never used"), Arc::new(NoopLog));
        let result = agent.process_message("asdkjasd", "session-1", &[]).await;

        assert_eq!(
            result.message,
            "i don't have specific details about that. **explore:whoami**"
        );
        assert!(result.modal_actions.is_empty());
        assert!(result
            .tool_results
            .iter()
            .any(|r| r.tool_name == "validation_guard"));
        assert_eq!(
            result.suggestions,
            vec!["explore blake's portfolio sections", "ask about specific topics"]
        );
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_grounded_projects_turn() {
        let agent = test_agent(
            MockBackend::with_reply("blake built keepsake, a self-hosted image host."),
            Arc::new(NoopLog),
        );
        let result = agent
            .process_message("what projects has blake built", "session-1", &[])
            .await;

        assert!(result.message.starts_with("blake built keepsake"));
        // The modal selector tool is absent here, so the keyword mention
        // drives the suggestion.
        assert_eq!(result.modal_actions, vec![Modal::Projects]);
        assert!(result.message.contains("**explore:projects**"));

        let validation = result
            .tool_results
            .iter()
            .find(|r| r.tool_name == "knowledge_validation")
            .unwrap();
        let payload = validation.result.as_ref().unwrap();
        assert_eq!(payload["validation_passed"], true);
        assert_eq!(payload["fallback_triggered"], false);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_executions_are_logged() {
        let log = Arc::new(MemoryLog::new());
        let agent = test_agent(MockBackend::with_reply("an answer about work."), log.clone());
        agent
            .process_message("where does blake work", "session-7", &[])
            .await;

        let entries = log.entries();
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| e.session_id == "session-7"));
        assert!(entries.iter().any(|e| e.tool_name == "knowledge_search"));
    }

    #[tokio::test]
    async fn test_no_knowledge_section_matches_topic() {
        let agent = test_agent(MockBackend::with_reply("never used"), Arc::new(NoopLog));
        // Gibberish plus a section hint: retrieval finds nothing but the
        // fallback still routes to the hinted section.
        let result = agent
            .process_message("zzqx employment qqz", "session-1", &[])
            .await;
        assert!(result.message.contains("**explore:resume**"));
    }
}
