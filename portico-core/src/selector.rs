//! Maps a classified intent to an ordered, length-capped tool list.

use crate::types::{Intent, IntentAnalysis};
use tracing::debug;

/// Upper bound on tools executed for a single utterance.
pub const MAX_TOOLS_PER_TURN: usize = 3;

/// Static intent -> tool mapping. Order within each list is execution
/// order; downstream logic depends on it (e.g. the follow-up generator
/// result is consumed after all tools have run).
const TOOL_MAPPING: &[(Intent, &[&str])] = &[
    (Intent::Navigation, &["navigation_guide", "suggest_sections"]),
    (Intent::KnowledgeSearch, &["knowledge_search"]),
    (Intent::Projects, &["project_details", "knowledge_search"]),
    (Intent::Skills, &["skill_assessment", "knowledge_search"]),
    (Intent::Experience, &["experience_lookup", "knowledge_search"]),
    (Intent::Contact, &["contact_facilitator", "knowledge_search"]),
    (
        Intent::Conversation,
        &["conversation_summarizer", "follow_up_generator"],
    ),
];

/// Select the tools to run for an analyzed utterance. Deterministic, no
/// failure mode: unknown intents fall back to a plain knowledge lookup.
pub fn select_tools(analysis: &IntentAnalysis) -> Vec<&'static str> {
    let selected = TOOL_MAPPING
        .iter()
        .find(|(intent, _)| *intent == analysis.primary_intent)
        .map(|(_, tools)| tools.to_vec())
        .unwrap_or_else(|| vec!["knowledge_search"]);

    let mut tools = selected;
    tools.truncate(MAX_TOOLS_PER_TURN);

    debug!(intent = %analysis.primary_intent, tools = ?tools, "selected tools");
    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::analyze;

    #[test]
    fn test_projects_intent_selection() {
        let analysis = analyze("tell me about blake's projects");
        assert_eq!(
            select_tools(&analysis),
            vec!["project_details", "knowledge_search"]
        );
    }

    #[test]
    fn test_fallback_selection() {
        let analysis = analyze("asdkjasd");
        assert_eq!(select_tools(&analysis), vec!["knowledge_search"]);
    }

    #[test]
    fn test_conversation_selection() {
        let analysis = analyze("can you give me a recap");
        assert_eq!(
            select_tools(&analysis),
            vec!["conversation_summarizer", "follow_up_generator"]
        );
    }

    #[test]
    fn test_selection_is_length_capped() {
        for message in ["open the skills section", "what projects has blake built"] {
            let analysis = analyze(message);
            assert!(select_tools(&analysis).len() <= MAX_TOOLS_PER_TURN);
        }
    }
}
