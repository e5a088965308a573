//! # Portico Tools
//!
//! Built-in tool implementations for the Portico portfolio assistant.
//! Provides navigation, knowledge retrieval, interaction, and utility
//! tools over a shared knowledge index.

pub mod information;
pub mod interaction;
pub mod navigation;
pub mod utility;

use portico_core::error::ToolError;
use portico_core::knowledge::KnowledgeIndex;
use portico_core::registry::{Tool, ToolRegistry};
use std::sync::Arc;

/// Lowercased query string from a tool input payload.
pub(crate) fn query_from(input: &serde_json::Value) -> String {
    input["query"].as_str().unwrap_or_default().to_lowercase()
}

/// Build a registry with every built-in tool, sharing one knowledge index.
pub fn builtin_registry(index: Arc<KnowledgeIndex>) -> Result<ToolRegistry, ToolError> {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(navigation::ShowModalTool),
        Arc::new(navigation::IntelligentModalSelectorTool),
        Arc::new(navigation::SuggestSectionsTool),
        Arc::new(navigation::NavigationGuideTool),
        Arc::new(information::KnowledgeSearchTool::new(index.clone())),
        Arc::new(information::ProjectDetailsTool::new(index.clone())),
        Arc::new(information::SkillAssessmentTool::new(index.clone())),
        Arc::new(information::ExperienceLookupTool::new(index.clone())),
        Arc::new(interaction::ContactFacilitatorTool::new(index.clone())),
        Arc::new(interaction::ConversationSummarizerTool),
        Arc::new(interaction::FollowUpGeneratorTool),
        Arc::new(utility::ClarificationTool),
        Arc::new(utility::ErrorHandlerTool),
        Arc::new(utility::AnalyticsTool),
    ];

    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool)?;
    }
    Ok(registry)
}
