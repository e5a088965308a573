//! End-to-end pipeline tests: the full orchestrator wired to the
//! built-in tool registry, the built-in knowledge index, and a mock
//! completion backend.

use portico_core::generation::{GenerationGuard, ModelRotation, TECHNICAL_DIFFICULTIES};
use portico_core::knowledge::KnowledgeIndex;
use portico_core::persistence::MemoryLog;
use portico_core::providers::MockBackend;
use portico_core::types::{Intent, Modal};
use portico_core::Agent;
use portico_tools::builtin_registry;
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct Harness {
    agent: Agent,
    backend: Arc<MockBackend>,
    rotation: Arc<ModelRotation>,
    log: Arc<MemoryLog>,
}

fn harness(backend: MockBackend, models: &[&str]) -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let index = Arc::new(KnowledgeIndex::builtin());
    let registry = builtin_registry(index.clone()).unwrap();
    let backend = Arc::new(backend);
    let rotation = Arc::new(ModelRotation::new(
        models.iter().map(|m| m.to_string()).collect(),
    ));
    let guard = GenerationGuard::new(backend.clone(), rotation.clone());
    let log = Arc::new(MemoryLog::new());
    Harness {
        agent: Agent::new(registry, index, guard, log.clone()),
        backend,
        rotation,
        log,
    }
}

#[tokio::test]
async fn projects_query_runs_full_pipeline() {
    let h = harness(
        MockBackend::with_reply(
            "blake has built keepsake, caravancraft, dexchat, and this portfolio site.",
        ),
        &["model-a"],
    );

    let result = h
        .agent
        .process_message("tell me about blake's projects", "session-1", &[])
        .await;

    assert_eq!(result.intent_analysis.primary_intent, Intent::Projects);
    assert!(result.message.starts_with("blake has built keepsake"));
    assert_eq!(result.modal_actions, vec![Modal::Projects]);
    assert!(result.message.ends_with("**explore:projects**"));
    assert!(result.error.is_none());

    // project_details and knowledge_search both succeeded, plus the
    // synthetic validation summary.
    let names: Vec<&str> = result
        .tool_results
        .iter()
        .map(|r| r.tool_name.as_str())
        .collect();
    assert!(names.contains(&"project_details"));
    assert!(names.contains(&"knowledge_search"));
    assert!(names.contains(&"knowledge_validation"));

    let validation = result
        .tool_results
        .iter()
        .find(|r| r.tool_name == "knowledge_validation")
        .unwrap();
    let payload = validation.result.as_ref().unwrap();
    assert_eq!(payload["validation_passed"], true);
    assert_eq!(payload["fallback_triggered"], false);

    // Both dispatched tools were logged under the session.
    let entries = h.log.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.session_id == "session-1"));
}

#[tokio::test]
async fn gibberish_takes_deterministic_fallback_without_generation() {
    let h = harness(MockBackend::with_reply("should never be used"), &["model-a"]);

    let result = h.agent.process_message("asdkjasd", "session-2", &[]).await;

    assert_eq!(
        result.intent_analysis.primary_intent,
        Intent::KnowledgeSearch
    );
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
        vec![
            "explore blake's portfolio sections".to_string(),
            "ask about specific topics".to_string(),
        ]
    );
    // The backend was never consulted.
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn exhausted_rotation_reports_difficulties_and_wraps() {
    let backend = MockBackend::new();
    for _ in 0..4 {
        backend.queue_err(portico_core::LlmError::RateLimited);
    }
    let h = harness(backend, &["model-a", "model-b", "model-c", "model-d"]);

    let result = h
        .agent
        .process_message("what skills does blake have", "session-3", &[])
        .await;

    assert!(result.message.starts_with(TECHNICAL_DIFFICULTIES));
    assert_eq!(
        h.backend.calls(),
        vec!["model-a", "model-b", "model-c", "model-d"]
    );
    // Every model was tried once and the cursor wrapped to the start.
    assert_eq!(h.rotation.position(), 0);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn rotation_settles_on_first_working_model() {
    let backend = MockBackend::new();
    backend.queue_err(portico_core::LlmError::RateLimited);
    backend.queue_err(portico_core::LlmError::Connection {
        message: "refused".into(),
    });
    backend.queue_ok("blake's skills span react, typescript, python, and devops tooling.");
    let h = harness(backend, &["model-a", "model-b", "model-c", "model-d"]);

    let result = h
        .agent
        .process_message("what skills does blake have", "session-4", &[])
        .await;

    assert!(result.message.starts_with("blake's skills span react"));
    assert_eq!(h.backend.calls(), vec!["model-a", "model-b", "model-c"]);
    // The cursor stays on the model that answered, for the next request.
    assert_eq!(h.rotation.position(), 2);

    // A follow-up request goes straight to the working model.
    h.backend.queue_ok("blake works as a software engineer at navigate360.");
    let result = h
        .agent
        .process_message("where does blake work", "session-4", &[])
        .await;
    assert!(result.message.starts_with("blake works as a software engineer"));
    assert_eq!(h.backend.calls().last().map(String::as_str), Some("model-c"));
}

#[tokio::test]
async fn selector_drives_modal_without_keyword_mention() {
    let h = harness(
        MockBackend::with_reply("blake grew up loving computers."),
        &["model-a"],
    );

    // "story" hits a selector indicator but none of the intent
    // analyzer's modal tables, so the suggestion can only come from the
    // selector tool.
    let result = h
        .agent
        .process_message("what's his story", "session-8", &[])
        .await;

    assert!(result.intent_analysis.mentioned_modals.is_empty());
    assert_eq!(result.modal_actions, vec![Modal::Whoami]);
    assert!(result.message.ends_with("**explore:whoami**"));
}

#[tokio::test]
async fn skills_query_suggests_skills_modal() {
    let h = harness(
        MockBackend::with_reply("blake's frontend stack is react with typescript."),
        &["model-a"],
    );

    let result = h
        .agent
        .process_message("what's in blake's tech stack", "session-5", &[])
        .await;

    assert_eq!(result.modal_actions, vec![Modal::Skills]);
    assert!(result.message.ends_with("**explore:skills**"));
}

#[tokio::test]
async fn conversation_recap_produces_follow_up_suggestions() {
    let h = harness(MockBackend::with_reply("unused"), &["model-a"]);

    let result = h
        .agent
        .process_message("can you summarize our conversation", "session-6", &[])
        .await;

    assert_eq!(
        result.intent_analysis.primary_intent,
        Intent::Conversation
    );
    // The follow-up generator ran and its suggestions surface on the turn.
    assert!(!result.suggestions.is_empty());
    assert!(result.suggestions.len() <= 3);
}
