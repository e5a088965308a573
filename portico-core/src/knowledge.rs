//! Knowledge index and relevance validation.
//!
//! The index is an in-memory collection of pre-authored content chunks,
//! each tagged with a category and keyword set. Lookup is keyword-overlap
//! scoring, not semantic search: +3 for a token inside a chunk keyword,
//! +2 for a token in the chunk content, +5 for a token equal to the chunk
//! category, and +10 when the query carries a category-boost word for the
//! chunk's category.
//!
//! Two validation passes reuse the same tokenizer with different length
//! floors. The scoring path drops single-character tokens; the stricter
//! per-item validation and binary coverage check also drop two-character
//! tokens. The thresholds intentionally stay distinct: retrieval was
//! tuned against the looser floor, grounding against the stricter one.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum token length retained on the index-scoring path.
pub const SCORING_MIN_TOKEN_LEN: usize = 2;
/// Minimum token length retained on validation and coverage paths.
pub const VALIDATION_MIN_TOKEN_LEN: usize = 3;
/// Maximum chunks returned by one index lookup.
pub const MAX_SEARCH_RESULTS: usize = 5;
/// A chunk whose content is shorter than this is never considered useful.
const MIN_USEFUL_CONTENT_LEN: usize = 10;

/// Query words that pull an extra +10 toward chunks of the named category.
const CATEGORY_BOOSTS: &[(&str, &[&str])] = &[
    ("projects", &["project", "projects"]),
    ("skills", &["skill", "skills", "technical", "tech"]),
    ("contact", &["contact", "reach", "touch"]),
    ("work", &["resume", "work", "job", "experience"]),
    ("personal", &["who", "about", "background", "personal"]),
];

/// A discrete, pre-authored fact unit with category and keyword metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub id: String,
    pub category: String,
    pub content: String,
    pub keywords: Vec<String>,
}

/// A chunk paired with the relevance score one search call assigned it.
///
/// The score is only meaningful relative to the query that produced it;
/// callers must not carry it across searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub id: String,
    pub category: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub relevance: u32,
}

/// Tokenize a query: strip punctuation, lowercase, split on whitespace,
/// and drop tokens shorter than `min_len` characters.
fn tokenize(query: &str, min_len: usize) -> Vec<String> {
    query
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}

/// The in-memory knowledge corpus with relevance-scored lookup.
#[derive(Debug, Clone)]
pub struct KnowledgeIndex {
    chunks: Vec<KnowledgeChunk>,
}

impl KnowledgeIndex {
    /// Create an index over the given chunks.
    pub fn new(chunks: Vec<KnowledgeChunk>) -> Self {
        Self { chunks }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Score every chunk against the query and return the top matches,
    /// sorted by descending relevance. Chunks that score zero are
    /// excluded entirely.
    pub fn search(&self, query: &str) -> Vec<ScoredChunk> {
        let words = tokenize(query, SCORING_MIN_TOKEN_LEN);

        let mut scored: Vec<ScoredChunk> = Vec::new();
        for chunk in &self.chunks {
            let content_lower = chunk.content.to_lowercase();
            let keywords_lower: Vec<String> =
                chunk.keywords.iter().map(|k| k.to_lowercase()).collect();

            let mut score = 0u32;
            for word in &words {
                if keywords_lower.iter().any(|kw| kw.contains(word.as_str())) {
                    score += 3;
                }
                if content_lower.contains(word.as_str()) {
                    score += 2;
                }
                if chunk.category == *word {
                    score += 5;
                }
            }

            for (category, boost_words) in CATEGORY_BOOSTS {
                if chunk.category == *category
                    && boost_words.iter().any(|b| words.iter().any(|w| w == b))
                {
                    score += 10;
                }
            }

            if score > 0 {
                scored.push(ScoredChunk {
                    id: chunk.id.clone(),
                    category: chunk.category.clone(),
                    content: chunk.content.clone(),
                    keywords: chunk.keywords.clone(),
                    relevance: score,
                });
            }
        }

        scored.sort_by(|a, b| b.relevance.cmp(&a.relevance));
        scored.truncate(MAX_SEARCH_RESULTS);
        debug!(query = %query, results = scored.len(), "knowledge search complete");
        scored
    }

    /// The built-in portfolio corpus.
    pub fn builtin() -> Self {
        Self::new(builtin_chunks())
    }
}

/// Validate that a retrieved item is actually relevant to the query:
/// non-trivial content, plus at least one strict-token overlap with the
/// item's content (+1) or keywords (+2).
pub fn validate_item(item: &ScoredChunk, query: &str) -> bool {
    if item.content.trim().chars().count() < MIN_USEFUL_CONTENT_LEN {
        debug!(id = %item.id, "knowledge item has insufficient content");
        return false;
    }

    let words = tokenize(query, VALIDATION_MIN_TOKEN_LEN);
    let content_lower = item.content.to_lowercase();

    let mut score = 0u32;
    for word in &words {
        if content_lower.contains(word.as_str()) {
            score += 1;
        }
        if item
            .keywords
            .iter()
            .any(|kw| kw.to_lowercase().contains(word.as_str()))
        {
            score += 2;
        }
    }

    debug!(id = %item.id, score, "knowledge item validation");
    score > 0
}

/// Binary coverage check: does *any* item overlap the query at all?
/// Not a ranking — this only decides whether generation is justified.
pub fn has_coverage(query: &str, items: &[ScoredChunk]) -> bool {
    if items.is_empty() {
        return false;
    }

    let words = tokenize(query, VALIDATION_MIN_TOKEN_LEN);
    for item in items {
        let content_lower = item.content.to_lowercase();
        let overlap = words
            .iter()
            .filter(|w| {
                content_lower.contains(w.as_str())
                    || item
                        .keywords
                        .iter()
                        .any(|kw| kw.to_lowercase().contains(w.as_str()))
            })
            .count();
        if overlap > 0 {
            return true;
        }
    }
    false
}

fn chunk(id: &str, category: &str, content: &str, keywords: &[&str]) -> KnowledgeChunk {
    KnowledgeChunk {
        id: id.to_string(),
        category: category.to_string(),
        content: content.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn builtin_chunks() -> Vec<KnowledgeChunk> {
    vec![
        chunk(
            "personal-intro",
            "personal",
            "blake bowling (also known as blake b., syl, or sylvexn) is a versatile technology professional with 6 years of technical support experience and a passion for fullstack development. currently working as a tier 1 tech support agent at navigate360, he's located in green cove springs, florida. blake has a unique perspective from his technical support background that helps him build robust, user-focused solutions.",
            &[
                "blake", "bowling", "syl", "sylvexn", "blake b", "who", "background", "bio",
                "introduction", "about", "personal", "location", "florida", "navigate360",
            ],
        ),
        chunk(
            "personal-interests",
            "personal",
            "blake's expertise and interests include fullstack development, networking, system administration, devops, agentic ai, and tech support. he's exceptional at learning new skills rapidly and adapting to any environment. personal interests include gaming. his career goals are focused on software development as a fullstack developer working with agentic ai.",
            &[
                "interests", "expertise", "fullstack", "networking", "sysadmin", "devops",
                "agentic", "ai", "tech support", "gaming", "goals", "career", "rapid learner",
            ],
        ),
        chunk(
            "work-navigate360",
            "work",
            "currently working as tier 1 technical support agent at navigate360 since february 2024. provides technical support to customers by troubleshooting and resolving software, hardware, and network related issues. also provides remote support for more specific hardware and software issues.",
            &[
                "navigate360", "current", "job", "work", "tier 1", "technical support",
                "troubleshooting", "remote support", "2024",
            ],
        ),
        chunk(
            "work-affinitiv",
            "work",
            "worked as tier 1 technical support agent at affinitiv from january 2023 to december 2023. handled customer complaints and escalated issues according to procedures. facilitated communication between car dealerships and the autoloop product support teams.",
            &[
                "affinitiv", "autoloop", "car dealerships", "customer complaints", "escalation",
                "2023", "communication",
            ],
        ),
        chunk(
            "work-logicom",
            "work",
            "worked as tier 1 technical support agent at logicom usa from january 2021 to january 2023. answered inbound calls to fix and maintain member's home internet. worked alongside on-site team members to fix fiber line technical issues. mentored new hires, facilitating their onboarding and training processes.",
            &[
                "logicom", "home internet", "fiber line", "mentoring", "training", "onboarding",
                "2021", "2022", "2023",
            ],
        ),
        chunk(
            "work-unisys",
            "work",
            "worked as tier 1 technical support agent at unisys (contract position) from march 2020 to january 2021. answered user inquiries regarding computer software or hardware operation to resolve problems. read technical manuals and conferred with users to provide technical assistance and support.",
            &[
                "unisys", "contract", "software", "hardware", "technical manuals",
                "user assistance", "2020", "2021",
            ],
        ),
        chunk(
            "project-keepsake",
            "projects",
            "keepsake is a personal image hosting solution with sharex integration. it features a clean dashboard for managing uploads and provides reliable image hosting with custom urls. currently in production. built using typescript, react, python, flask, sqlite, and shadcn ui. available on github at https://github.com/sylvexn/keepsake",
            &[
                "keepsake", "image hosting", "sharex", "dashboard", "uploads", "production",
                "typescript", "react", "python", "flask", "sqlite", "shadcn",
            ],
        ),
        chunk(
            "project-portfolio",
            "projects",
            "portfolio site is the current site you're viewing. built with modern animations, interactive components, and responsive design. this is blake's personal resume and portfolio site that's publicly available. built using react, typescript, tailwind, and shadcn ui. available on github at https://github.com/sylvexn/portfolio and live at https://syl.rest",
            &[
                "portfolio", "site", "current site", "animations", "interactive", "responsive",
                "resume", "react", "typescript", "tailwind", "shadcn", "syl.rest",
            ],
        ),
        chunk(
            "project-caravancraft",
            "projects",
            "caravancraft is a personal smp server for blake's friend group with visualization via website. includes custom server management, dynmap integration, and player statistics. this is a private project. built using minecraft, java, javascript, docker, and nginx. the map is available at https://map.syl.rest and status at https://panel.syl.rest/status",
            &[
                "caravancraft", "smp", "minecraft", "server", "friends", "dynmap", "statistics",
                "private", "java", "javascript", "docker", "nginx", "map.syl.rest",
            ],
        ),
        chunk(
            "project-dexchat",
            "projects",
            "dexchat is an agentic chatbot that can search a large knowledgebase of pokemon data and answer user queries. currently in development. built using react, python, postgres, openrouter, and agentic ai technologies. available on github at https://github.com/sylvexn/dexchat and live at https://dex.syl.rest",
            &[
                "dexchat", "agentic", "chatbot", "pokemon", "knowledgebase", "queries",
                "in development", "react", "python", "postgres", "openrouter", "agentic ai",
                "dex.syl.rest",
            ],
        ),
        chunk(
            "skills-frontend",
            "skills",
            "frontend technologies: react, javascript, typescript, html, css, next.js, vite, tailwind css. blake is proficient in modern frontend development with particular expertise in react and typescript for building interactive user interfaces.",
            &[
                "frontend", "react", "javascript", "typescript", "html", "css", "nextjs", "vite",
                "tailwind", "ui", "interfaces",
            ],
        ),
        chunk(
            "skills-backend",
            "skills",
            "backend technologies: python, node.js, sqlite, postgresql. blake has experience building backend services and managing databases for web applications.",
            &[
                "backend", "python", "nodejs", "node", "sqlite", "postgresql", "databases",
                "services",
            ],
        ),
        chunk(
            "skills-devops",
            "skills",
            "devops & tools: jira, salesforce, zendesk, git, bash, docker, linux, nginx. blake has experience with various tools for project management, customer support systems, version control, containerization, and server administration.",
            &[
                "devops", "tools", "jira", "salesforce", "zendesk", "git", "bash", "docker",
                "linux", "nginx", "containerization", "servers",
            ],
        ),
        chunk(
            "skills-misc",
            "skills",
            "miscellaneous skills: unity, visual studio code, unreal engine, obs, generative ai, mcp (model context protocol). blake also has experience with game development, streaming tools, and ai technologies.",
            &[
                "unity", "vsc", "visual studio code", "unreal", "obs", "generative ai", "mcp",
                "model context protocol", "game development", "streaming",
            ],
        ),
        chunk(
            "navigation-whoami",
            "navigation",
            "the whoami section contains blake's personal introduction and background information. it includes details about his experience, personality, and interests. this section helps visitors understand who blake is as a person and professional.",
            &[
                "whoami", "introduction", "background", "personality", "section", "navigation",
            ],
        ),
        chunk(
            "navigation-resume",
            "navigation",
            "the resume section (also called work history) contains blake's professional experience and work history. it includes his roles at navigate360, affinitiv, logicom usa, and unisys. visitors can also download his resume pdf from this section.",
            &[
                "resume", "work history", "experience", "professional", "download", "pdf",
                "section", "navigation",
            ],
        ),
        chunk(
            "navigation-skills",
            "navigation",
            "the skills section showcases blake's technical expertise organized by categories including frontend, backend, devops & tools, and miscellaneous skills. each skill is displayed with its corresponding icon and technology stack information.",
            &[
                "skills", "technical", "expertise", "categories", "frontend", "backend", "devops",
                "section", "navigation",
            ],
        ),
        chunk(
            "navigation-projects",
            "navigation",
            "the projects section showcases blake's development work including keepsake, portfolio site, caravancraft, and dexchat. each project includes descriptions, tech stack information, status, and links to demos or repositories where available.",
            &[
                "projects", "development", "showcase", "keepsake", "portfolio", "caravancraft",
                "dexchat", "section", "navigation",
            ],
        ),
        chunk(
            "navigation-contact",
            "navigation",
            "the contact section provides various ways to get in touch with blake including github, twitter, linkedin, signal (sylvexn.17), email (blakeb12341@gmail.com), and a direct message form. visitors can choose their preferred communication method.",
            &[
                "contact", "github", "twitter", "linkedin", "signal", "email", "message",
                "communication", "section", "navigation",
            ],
        ),
        chunk(
            "contact-details",
            "contact",
            "contact information: github: https://github.com/sylvexn, twitter: https://twitter.com/sylvexn_, linkedin: https://linkedin.com/in/blakeb17, signal: sylvexn.17, email: blakeb12341@gmail.com. for any inquiries, visitors should use the contact modal on this site to reach out directly.",
            &[
                "contact", "github", "twitter", "linkedin", "signal", "email", "sylvexn",
                "blakeb17", "inquiries",
            ],
        ),
    ]
}
