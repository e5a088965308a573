//! Navigation tools — modal opening, scoring-based modal selection, and
//! section suggestions.

use async_trait::async_trait;
use portico_core::error::ToolError;
use portico_core::registry::Tool;
use portico_core::types::{Modal, ToolResult};
use serde_json::json;

use crate::query_from;

/// Scoring context for one modal section: indicator words, temporal
/// emphasis words, and multi-word intent phrases.
struct ModalContext {
    modal: Modal,
    indicators: &'static [&'static str],
    temporal: &'static [&'static str],
    intent_phrases: &'static [&'static str],
    description: &'static str,
}

/// Evaluation order matters: ties keep the earliest entry because the
/// selector only replaces the best match on a strictly higher score.
const MODAL_CONTEXTS: &[ModalContext] = &[
    ModalContext {
        modal: Modal::Resume,
        indicators: &[
            "recent work", "current job", "work at", "employment history", "career",
            "working at", "job", "position", "role",
        ],
        temporal: &[
            "recent", "current", "latest", "now", "currently", "today", "this year", "new job",
        ],
        intent_phrases: &[
            "work history",
            "employment",
            "career progression",
            "job experience",
            "professional background",
        ],
        description: "professional work history and employment details",
    },
    ModalContext {
        modal: Modal::Projects,
        indicators: &[
            "built", "created", "developed", "projects", "portfolio", "app", "website", "code",
            "github",
        ],
        temporal: &[
            "latest project",
            "recent projects",
            "new build",
            "what have you built",
        ],
        intent_phrases: &[
            "things built",
            "development work",
            "portfolio items",
            "coding projects",
            "applications",
        ],
        description: "development projects and portfolio work",
    },
    ModalContext {
        modal: Modal::Skills,
        indicators: &[
            "skills", "technologies", "tech stack", "programming", "languages", "frameworks",
            "tools", "expertise",
        ],
        temporal: &["current stack", "using now", "latest tech", "new skills"],
        intent_phrases: &[
            "technical abilities",
            "programming languages",
            "tools expertise",
            "technology stack",
        ],
        description: "technical skills and technology expertise",
    },
    ModalContext {
        modal: Modal::Whoami,
        indicators: &[
            "who", "about", "background", "personal", "bio", "introduction", "story",
        ],
        temporal: &[],
        intent_phrases: &[
            "personal information",
            "background story",
            "who blake is",
            "introduction",
        ],
        description: "personal background and introduction",
    },
    ModalContext {
        modal: Modal::Contact,
        indicators: &[
            "contact", "email", "hire", "available", "reach", "message", "touch",
        ],
        temporal: &[],
        intent_phrases: &["getting in touch", "hiring inquiries", "communication"],
        description: "contact information and availability",
    },
];

/// Opens a named portfolio section, validating the identifier first.
pub struct ShowModalTool;

#[async_trait]
impl Tool for ShowModalTool {
    fn name(&self) -> &str {
        "show_modal"
    }

    fn description(&self) -> &str {
        "opens a specific portfolio section modal (whoami, resume, skills, projects, contact)"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let modal_id = input["modal_id"].as_str().unwrap_or_default();

        let Some(modal) = Modal::parse(modal_id) else {
            let valid: Vec<&str> = Modal::ALL.iter().map(|m| m.as_str()).collect();
            return Ok(ToolResult::failure(
                self.name(),
                format!("invalid modal id: {modal_id}. valid options: {valid:?}"),
            ));
        };

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "action": "open_modal",
                "modal_id": modal.as_str(),
                "message": format!("opening {modal} section"),
            }),
        ))
    }
}

/// Recommends the most appropriate modal from weighted contextual
/// analysis: +1 per indicator, +2 per temporal keyword, +3 per fully
/// matched intent phrase, plus two targeted boosts.
pub struct IntelligentModalSelectorTool;

#[async_trait]
impl Tool for IntelligentModalSelectorTool {
    fn name(&self) -> &str {
        "intelligent_modal_selector"
    }

    fn description(&self) -> &str {
        "intelligently determines the most appropriate modal section based on contextual analysis of user intent"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = query_from(&input);

        let mut best: Option<(Modal, u32, Vec<String>, &'static str)> = None;

        for context in MODAL_CONTEXTS {
            let mut score = 0u32;
            let mut matches: Vec<String> = Vec::new();

            for indicator in context.indicators {
                if query.contains(indicator) {
                    score += 1;
                    matches.push(indicator.to_string());
                }
            }

            for temporal in context.temporal {
                if query.contains(temporal) {
                    score += 2;
                    matches.push(format!("temporal:{temporal}"));
                }
            }

            for phrase in context.intent_phrases {
                if phrase.split_whitespace().all(|word| query.contains(word)) {
                    score += 3;
                    matches.push(format!("intent:{phrase}"));
                }
            }

            if context.modal == Modal::Resume
                && query.contains("work")
                && query.contains("recent")
            {
                score += 3;
                matches.push("context:recent_work".to_string());
            }

            if context.modal == Modal::Skills
                && (query.contains("tech") || query.contains("stack"))
            {
                score += 2;
                matches.push("context:technology_focus".to_string());
            }

            // Strict comparison: earlier contexts win ties.
            if score > best.as_ref().map(|(_, s, _, _)| *s).unwrap_or(0) {
                best = Some((context.modal, score, matches, context.description));
            }
        }

        let (modal, score, matches, description) = best.unwrap_or((
            Modal::Whoami,
            0,
            vec!["fallback".to_string()],
            "default introduction section",
        ));

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "recommended_modal": modal.as_str(),
                "confidence_score": score,
                "reasoning": matches,
                "description": description,
                "analysis": format!(
                    "based on query '{query}', recommending {modal} with confidence {score}"
                ),
            }),
        ))
    }
}

/// Recommends up to three relevant sections from plain keyword presence.
pub struct SuggestSectionsTool;

const SECTION_KEYWORDS: &[(Modal, &[&str])] = &[
    (
        Modal::Whoami,
        &["about", "background", "personal", "who", "introduction", "bio"],
    ),
    (
        Modal::Resume,
        &["work", "experience", "job", "employment", "career", "resume", "cv"],
    ),
    (
        Modal::Skills,
        &["skills", "technical", "technologies", "programming", "tools", "expertise"],
    ),
    (
        Modal::Projects,
        &["projects", "portfolio", "work", "development", "code", "github"],
    ),
    (
        Modal::Contact,
        &["contact", "reach", "email", "message", "get in touch", "communicate"],
    ),
];

#[async_trait]
impl Tool for SuggestSectionsTool {
    fn name(&self) -> &str {
        "suggest_sections"
    }

    fn description(&self) -> &str {
        "recommends relevant portfolio sections based on user query"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = query_from(&input);

        let mut suggestions: Vec<&str> = SECTION_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| query.contains(kw)))
            .map(|(modal, _)| modal.as_str())
            .collect();

        if suggestions.is_empty() {
            suggestions = vec!["whoami", "projects", "skills"];
        }
        suggestions.truncate(3);
        let message = format!(
            "based on your query, you might be interested in: {}",
            suggestions.join(", ")
        );

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "suggested_sections": suggestions,
                "message": message,
            }),
        ))
    }
}

/// Static overview of the site structure.
pub struct NavigationGuideTool;

#[async_trait]
impl Tool for NavigationGuideTool {
    fn name(&self) -> &str {
        "navigation_guide"
    }

    fn description(&self) -> &str {
        "provides overview of site structure and available sections"
    }

    async fn execute(&self, _input: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::ok(
            self.name(),
            json!({
                "available_sections": {
                    "whoami": "personal introduction and background",
                    "resume": "professional experience and work history",
                    "skills": "technical expertise and tools",
                    "projects": "development work and portfolio pieces",
                    "contact": "ways to get in touch",
                },
                "navigation_tips": [
                    "click any section name in brackets to open it",
                    "use the dock at the bottom for quick navigation",
                    "ask me specific questions about blake's background",
                ],
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_modal_valid() {
        let result = ShowModalTool
            .execute(json!({ "modal_id": "projects" }))
            .await
            .unwrap();
        assert!(result.success);
        let payload = result.result.unwrap();
        assert_eq!(payload["action"], "open_modal");
        assert_eq!(payload["modal_id"], "projects");
    }

    #[tokio::test]
    async fn test_show_modal_invalid_id_fails() {
        let result = ShowModalTool
            .execute(json!({ "modal_id": "garage" }))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("invalid modal id"));
    }

    #[tokio::test]
    async fn test_selector_recent_work_boost() {
        let result = IntelligentModalSelectorTool
            .execute(json!({ "query": "where does blake work recently" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["recommended_modal"], "resume");
        assert!(payload["confidence_score"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_selector_tech_stack_boost() {
        let result = IntelligentModalSelectorTool
            .execute(json!({ "query": "what's in blake's tech stack" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["recommended_modal"], "skills");
    }

    #[tokio::test]
    async fn test_selector_fallback_on_no_match() {
        let result = IntelligentModalSelectorTool
            .execute(json!({ "query": "zzzz" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["recommended_modal"], "whoami");
        assert_eq!(payload["confidence_score"], 0);
        assert_eq!(payload["reasoning"][0], "fallback");
    }

    #[tokio::test]
    async fn test_suggest_sections_defaults() {
        let result = SuggestSectionsTool
            .execute(json!({ "query": "zzzz" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(
            payload["suggested_sections"],
            json!(["whoami", "projects", "skills"])
        );
    }

    #[tokio::test]
    async fn test_suggest_sections_caps_at_three() {
        let result = SuggestSectionsTool
            .execute(json!({ "query": "who did blake work with on projects and how to contact" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert!(payload["suggested_sections"].as_array().unwrap().len() <= 3);
    }

    #[tokio::test]
    async fn test_navigation_guide_lists_all_sections() {
        let result = NavigationGuideTool.execute(json!({})).await.unwrap();
        let payload = result.result.unwrap();
        let sections = payload["available_sections"].as_object().unwrap();
        assert_eq!(sections.len(), 5);
    }
}
