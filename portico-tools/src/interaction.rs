//! Interaction tools — contact guidance, session recaps, and follow-up
//! suggestion generation.

use async_trait::async_trait;
use portico_core::error::ToolError;
use portico_core::knowledge::KnowledgeIndex;
use portico_core::registry::Tool;
use portico_core::types::ToolResult;
use serde_json::json;
use std::sync::Arc;

use crate::query_from;

/// Suggests contact methods matched to the inquiry style. First matching
/// style wins; no match falls back to the general method set.
pub struct ContactFacilitatorTool {
    index: Arc<KnowledgeIndex>,
}

const CONTACT_STYLES: &[(&str, &[&str], &[&str])] = &[
    (
        "professional",
        &["linkedin", "email"],
        &["job", "work", "business", "professional", "hire", "opportunity"],
    ),
    (
        "technical",
        &["github", "email"],
        &["code", "technical", "project", "development", "collaboration"],
    ),
    (
        "casual",
        &["twitter", "signal", "email"],
        &["chat", "talk", "casual", "social", "connect"],
    ),
    (
        "urgent",
        &["email", "signal"],
        &["urgent", "asap", "quick", "immediate"],
    ),
];

impl ContactFacilitatorTool {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl Tool for ContactFacilitatorTool {
    fn name(&self) -> &str {
        "contact_facilitator"
    }

    fn description(&self) -> &str {
        "provides intelligent contact method suggestions and guidance"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = query_from(&input);

        let (contact_type, methods) = CONTACT_STYLES
            .iter()
            .find(|(_, _, keywords)| keywords.iter().any(|kw| query.contains(kw)))
            .map(|(style, methods, _)| (*style, methods.to_vec()))
            .unwrap_or(("general", vec!["email", "linkedin", "github"]));

        let contact_details = self
            .index
            .search("contact")
            .into_iter()
            .find(|chunk| chunk.id == "contact-details")
            .map(|chunk| chunk.content);

        let recommendation = format!(
            "for {contact_type} inquiries, i recommend using {}",
            methods[..methods.len().min(2)].join(", ")
        );

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "contact_type": contact_type,
                "suggested_methods": methods,
                "contact_details": contact_details,
                "recommendation": recommendation,
            }),
        ))
    }
}

/// Recaps the session: topic extraction from user turns plus a coarse
/// engagement level.
pub struct ConversationSummarizerTool;

const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("projects", &["project", "keepsake", "portfolio", "dexchat", "caravancraft"]),
    ("skills", &["skill", "technology", "programming", "frontend", "backend"]),
    ("experience", &["work", "job", "experience", "navigate360", "affinitiv"]),
    ("personal", &["about", "background", "who", "personal", "interests"]),
    ("contact", &["contact", "reach", "email", "linkedin", "github"]),
];

#[async_trait]
impl Tool for ConversationSummarizerTool {
    fn name(&self) -> &str {
        "conversation_summarizer"
    }

    fn description(&self) -> &str {
        "creates session recap and extracts key discussion points"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let messages = input["messages"].as_array().cloned().unwrap_or_default();

        if messages.is_empty() {
            return Ok(ToolResult::ok(
                self.name(),
                json!({
                    "summary": "no conversation history available",
                    "key_topics": [],
                    "sections_discussed": [],
                }),
            ));
        }

        let user_contents: Vec<String> = messages
            .iter()
            .filter(|m| m["role"] == "user")
            .filter_map(|m| m["content"].as_str())
            .map(str::to_lowercase)
            .collect();

        let mut key_topics: Vec<&str> = Vec::new();
        for content in &user_contents {
            for (topic, keywords) in TOPIC_KEYWORDS {
                if keywords.iter().any(|kw| content.contains(kw)) && !key_topics.contains(topic) {
                    key_topics.push(topic);
                }
            }
        }

        let engagement = user_contents.len();
        let engagement_level = if engagement > 5 {
            "high"
        } else if engagement > 2 {
            "medium"
        } else {
            "low"
        };

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "summary": format!(
                    "conversation included {} total messages with {engagement} user interactions",
                    messages.len()
                ),
                "key_topics": key_topics,
                "sections_discussed": key_topics,
                "engagement_level": engagement_level,
            }),
        ))
    }
}

/// Generates up to three follow-up suggestions from the last topic and
/// what hasn't been discussed yet.
pub struct FollowUpGeneratorTool;

const FOLLOW_UPS: &[(&str, &[&str])] = &[
    (
        "projects",
        &[
            "would you like to see the code for any of these projects?",
            "which project interests you most?",
            "ask about the technical challenges in building these projects",
        ],
    ),
    (
        "skills",
        &[
            "want to know how blake learned these technologies?",
            "interested in seeing these skills in action through projects?",
            "curious about blake's preferred development stack?",
        ],
    ),
    (
        "experience",
        &[
            "would you like to know more about blake's career transition?",
            "interested in how his support background helps with development?",
            "want to see his resume or work samples?",
        ],
    ),
    (
        "personal",
        &[
            "curious about blake's development journey?",
            "want to know about his interest in agentic ai?",
            "interested in learning about his rapid learning approach?",
        ],
    ),
    (
        "contact",
        &[
            "ready to reach out to blake?",
            "need help choosing the best contact method?",
            "want to know more before getting in touch?",
        ],
    ),
];

const ALL_TOPICS: &[&str] = &["projects", "skills", "experience", "personal", "contact"];

#[async_trait]
impl Tool for FollowUpGeneratorTool {
    fn name(&self) -> &str {
        "follow_up_generator"
    }

    fn description(&self) -> &str {
        "generates relevant next questions and suggestions based on conversation context"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let last_topic = input["last_topic"].as_str().unwrap_or_default();
        let discussed: Vec<&str> = input["discussed_topics"]
            .as_array()
            .map(|topics| topics.iter().filter_map(|t| t.as_str()).collect())
            .unwrap_or_default();

        let undiscussed: Vec<&str> = ALL_TOPICS
            .iter()
            .filter(|topic| !discussed.contains(topic))
            .copied()
            .collect();

        let mut suggestions: Vec<String> = Vec::new();

        if let Some((_, topic_suggestions)) =
            FOLLOW_UPS.iter().find(|(topic, _)| *topic == last_topic)
        {
            suggestions.extend(topic_suggestions.iter().take(2).map(|s| s.to_string()));
        }

        if let Some(next) = undiscussed.first() {
            suggestions.push(format!("explore blake's {next}"));
        }

        if suggestions.is_empty() {
            suggestions = vec![
                "ask about anything else you'd like to know".to_string(),
                "explore a different section of the portfolio".to_string(),
                "get in touch with blake directly".to_string(),
            ];
        }
        suggestions.truncate(3);
        let recommended = suggestions[0].clone();

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "suggestions": suggestions,
                "undiscussed_topics": undiscussed,
                "recommended_next_step": recommended,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_contact_facilitator_matches_style() {
        let tool = ContactFacilitatorTool::new(Arc::new(KnowledgeIndex::builtin()));
        let result = tool
            .execute(json!({ "query": "i want to hire blake for a job" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["contact_type"], "professional");
        assert_eq!(payload["suggested_methods"], json!(["linkedin", "email"]));
        assert!(payload["contact_details"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn test_contact_facilitator_general_fallback() {
        let tool = ContactFacilitatorTool::new(Arc::new(KnowledgeIndex::builtin()));
        let result = tool.execute(json!({ "query": "zzzz" })).await.unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["contact_type"], "general");
        assert_eq!(
            payload["suggested_methods"],
            json!(["email", "linkedin", "github"])
        );
    }

    #[tokio::test]
    async fn test_summarizer_empty_history() {
        let result = ConversationSummarizerTool
            .execute(json!({ "messages": [] }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["summary"], "no conversation history available");
        assert_eq!(payload["key_topics"], json!([]));
    }

    #[tokio::test]
    async fn test_summarizer_extracts_topics_and_engagement() {
        let messages = json!([
            { "role": "user", "content": "tell me about keepsake" },
            { "role": "assistant", "content": "keepsake is an image host" },
            { "role": "user", "content": "what skills does he have" },
            { "role": "user", "content": "how do i contact him" },
        ]);
        let result = ConversationSummarizerTool
            .execute(json!({ "messages": messages }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        let topics = payload["key_topics"].as_array().unwrap();
        assert!(topics.contains(&json!("projects")));
        assert!(topics.contains(&json!("skills")));
        assert!(topics.contains(&json!("contact")));
        assert_eq!(payload["engagement_level"], "medium");
    }

    #[tokio::test]
    async fn test_follow_up_mixes_topic_and_undiscussed() {
        let result = FollowUpGeneratorTool
            .execute(json!({
                "last_topic": "projects",
                "discussed_topics": ["projects"],
            }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        let suggestions = payload["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[2], "explore blake's skills");
        assert!(!payload["undiscussed_topics"]
            .as_array()
            .unwrap()
            .contains(&json!("projects")));
    }

    #[tokio::test]
    async fn test_follow_up_generic_fallback() {
        let result = FollowUpGeneratorTool
            .execute(json!({
                "last_topic": "",
                "discussed_topics": ["projects", "skills", "experience", "personal", "contact"],
            }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        let suggestions = payload["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 3);
        assert_eq!(
            suggestions[0],
            "ask about anything else you'd like to know"
        );
    }
}
