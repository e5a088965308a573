//! Information tools — knowledge retrieval with quality gating plus
//! focused project, skill, and experience lookups over the same index.

use async_trait::async_trait;
use portico_core::error::ToolError;
use portico_core::knowledge::KnowledgeIndex;
use portico_core::registry::Tool;
use portico_core::types::ToolResult;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::query_from;

/// Results scoring below this are treated as noise, not knowledge.
const MIN_RELEVANCE_THRESHOLD: u32 = 2;
/// Upper bound on knowledge items returned per search.
const MAX_KNOWLEDGE_RESULTS: usize = 3;

/// Searches the knowledge index, distinguishing "nothing matched" from
/// "everything matched too weakly" so the orchestrator can tell why a
/// retrieval came back empty.
pub struct KnowledgeSearchTool {
    index: Arc<KnowledgeIndex>,
}

impl KnowledgeSearchTool {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl Tool for KnowledgeSearchTool {
    fn name(&self) -> &str {
        "knowledge_search"
    }

    fn description(&self) -> &str {
        "searches blake's knowledge base for relevant information"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = input["query"].as_str().unwrap_or_default();

        if query.trim().is_empty() {
            warn!("empty query provided");
            return Ok(ToolResult::failure(self.name(), "empty query provided"));
        }

        info!(query = %query, "searching knowledge base");
        let results = self.index.search(query);

        if results.is_empty() {
            warn!(query = %query, "no knowledge found");
            return Ok(ToolResult::failure_with_payload(
                self.name(),
                json!({
                    "query": query,
                    "results": [],
                    "total_results": 0,
                    "status": "no_relevant_knowledge_found",
                }),
                "no relevant knowledge found",
            ));
        }

        let filtered: Vec<_> = results
            .into_iter()
            .filter(|chunk| chunk.relevance >= MIN_RELEVANCE_THRESHOLD)
            .collect();

        if filtered.is_empty() {
            warn!(query = %query, "only low-relevance knowledge found");
            return Ok(ToolResult::failure_with_payload(
                self.name(),
                json!({
                    "query": query,
                    "results": [],
                    "total_results": 0,
                    "status": "low_relevance_knowledge_only",
                }),
                "only low-relevance knowledge found",
            ));
        }

        let top: Vec<_> = filtered.into_iter().take(MAX_KNOWLEDGE_RESULTS).collect();
        let total = top.len();
        info!(count = total, "returning high-quality knowledge items");

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "query": query,
                "results": top,
                "total_results": total,
                "status": "success",
            }),
        ))
    }
}

/// Detailed project information, narrowed by project sub-vocabulary.
pub struct ProjectDetailsTool {
    index: Arc<KnowledgeIndex>,
}

const PROJECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("keepsake", &["keepsake", "image hosting", "sharex"]),
    ("portfolio", &["portfolio", "site", "current site", "syl.rest"]),
    ("caravancraft", &["caravancraft", "minecraft", "smp", "server"]),
    ("dexchat", &["dexchat", "pokemon", "chatbot", "agentic"]),
];

impl ProjectDetailsTool {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl Tool for ProjectDetailsTool {
    fn name(&self) -> &str {
        "project_details"
    }

    fn description(&self) -> &str {
        "provides detailed information about blake's projects"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = query_from(&input);

        let mut relevant: Vec<&str> = PROJECT_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| query.contains(kw)))
            .map(|(project, _)| *project)
            .collect();

        if relevant.is_empty() {
            relevant = PROJECT_KEYWORDS.iter().map(|(p, _)| *p).collect();
        }

        let details: Vec<_> = self
            .index
            .search(&relevant.join(" "))
            .into_iter()
            .filter(|chunk| chunk.category == "projects")
            .map(|chunk| {
                json!({
                    "id": chunk.id,
                    "content": chunk.content,
                    "keywords": chunk.keywords,
                })
            })
            .collect();

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "requested_projects": relevant,
                "project_details": details,
            }),
        ))
    }
}

/// Context-aware skill matching across the index's skill categories.
pub struct SkillAssessmentTool {
    index: Arc<KnowledgeIndex>,
}

const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    ("frontend", &["frontend", "react", "javascript", "typescript", "html", "css", "ui"]),
    ("backend", &["backend", "python", "node", "database", "api", "server"]),
    ("devops", &["devops", "docker", "linux", "nginx", "tools", "deployment"]),
    ("misc", &["unity", "game", "ai", "generative", "mcp", "obs"]),
];

impl SkillAssessmentTool {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl Tool for SkillAssessmentTool {
    fn name(&self) -> &str {
        "skill_assessment"
    }

    fn description(&self) -> &str {
        "provides context-aware skill matching and explanations"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = query_from(&input);

        let mut categories: Vec<&str> = SKILL_CATEGORIES
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| query.contains(kw)))
            .map(|(category, _)| *category)
            .collect();

        if categories.is_empty() {
            categories = SKILL_CATEGORIES.iter().map(|(c, _)| *c).collect();
        }

        let skills_query = format!("skills {}", categories.join(" "));
        let details: Vec<_> = self
            .index
            .search(&skills_query)
            .into_iter()
            .filter(|chunk| chunk.category == "skills")
            .map(|chunk| {
                json!({
                    "id": chunk.id,
                    "content": chunk.content,
                    "category": chunk.category,
                })
            })
            .collect();

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "requested_categories": categories,
                "skill_details": details,
            }),
        ))
    }
}

/// Work history lookup, flagging companies the query mentions.
pub struct ExperienceLookupTool {
    index: Arc<KnowledgeIndex>,
}

const COMPANY_KEYWORDS: &[(&str, &[&str])] = &[
    ("navigate360", &["navigate360", "current", "2024"]),
    ("affinitiv", &["affinitiv", "autoloop", "2023"]),
    ("logicom", &["logicom", "internet", "fiber", "2021", "2022"]),
    ("unisys", &["unisys", "contract", "2020"]),
];

impl ExperienceLookupTool {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl Tool for ExperienceLookupTool {
    fn name(&self) -> &str {
        "experience_lookup"
    }

    fn description(&self) -> &str {
        "retrieves work history and background information"
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = query_from(&input);

        let companies: Vec<&str> = COMPANY_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| query.contains(kw)))
            .map(|(company, _)| *company)
            .collect();

        let summary: Vec<_> = self
            .index
            .search("work experience resume job")
            .into_iter()
            .filter(|chunk| chunk.category == "work" || chunk.category == "personal")
            .map(|chunk| {
                json!({
                    "id": chunk.id,
                    "content": chunk.content,
                    "category": chunk.category,
                })
            })
            .collect();

        Ok(ToolResult::ok(
            self.name(),
            json!({
                "experience_summary": summary,
                "relevant_companies": companies,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> Arc<KnowledgeIndex> {
        Arc::new(KnowledgeIndex::builtin())
    }

    #[tokio::test]
    async fn test_knowledge_search_success() {
        let tool = KnowledgeSearchTool::new(index());
        let result = tool
            .execute(json!({ "query": "what projects has blake built" }))
            .await
            .unwrap();
        assert!(result.success);
        let payload = result.result.unwrap();
        assert_eq!(payload["status"], "success");
        let results = payload["results"].as_array().unwrap();
        assert!(!results.is_empty() && results.len() <= 3);
    }

    #[tokio::test]
    async fn test_knowledge_search_empty_query() {
        let tool = KnowledgeSearchTool::new(index());
        let result = tool.execute(json!({ "query": "   " })).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("empty query provided"));
    }

    #[tokio::test]
    async fn test_knowledge_search_no_match_keeps_payload() {
        let tool = KnowledgeSearchTool::new(index());
        let result = tool.execute(json!({ "query": "asdkjasd" })).await.unwrap();
        assert!(!result.success);
        let payload = result.result.unwrap();
        assert_eq!(payload["status"], "no_relevant_knowledge_found");
        assert_eq!(payload["total_results"], 0);
    }

    #[tokio::test]
    async fn test_project_details_narrows_to_mentioned_project() {
        let tool = ProjectDetailsTool::new(index());
        let result = tool
            .execute(json!({ "query": "tell me about keepsake" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["requested_projects"], json!(["keepsake"]));
        let details = payload["project_details"].as_array().unwrap();
        assert!(details.iter().all(|d| d["id"].as_str().is_some()));
    }

    #[tokio::test]
    async fn test_project_details_defaults_to_all_projects() {
        let tool = ProjectDetailsTool::new(index());
        let result = tool
            .execute(json!({ "query": "what has blake made" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(
            payload["requested_projects"],
            json!(["keepsake", "portfolio", "caravancraft", "dexchat"])
        );
    }

    #[tokio::test]
    async fn test_skill_assessment_filters_to_skills_category() {
        let tool = SkillAssessmentTool::new(index());
        let result = tool
            .execute(json!({ "query": "does blake know react" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["requested_categories"], json!(["frontend"]));
        for detail in payload["skill_details"].as_array().unwrap() {
            assert_eq!(detail["category"], "skills");
        }
    }

    #[tokio::test]
    async fn test_experience_lookup_flags_companies() {
        let tool = ExperienceLookupTool::new(index());
        let result = tool
            .execute(json!({ "query": "what did blake do at logicom" }))
            .await
            .unwrap();
        let payload = result.result.unwrap();
        assert_eq!(payload["relevant_companies"], json!(["logicom"]));
        for entry in payload["experience_summary"].as_array().unwrap() {
            let category = entry["category"].as_str().unwrap();
            assert!(category == "work" || category == "personal");
        }
    }
}
