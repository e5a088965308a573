//! Deterministic keyword-based intent analysis.
//!
//! Classification is pure substring membership over the lowercased
//! utterance against ordered association tables — no learned component.
//! Specific intents precede the generic knowledge-search entry so that a
//! query like "tell me about blake's projects" classifies as a projects
//! query rather than a generic lookup; knowledge search remains the
//! fallback when nothing matches.
//!
//! This routine never fails: every utterance yields a complete
//! `IntentAnalysis`, defaulting to the fallback intent and no modals on
//! totally unmatched input.

use crate::types::{Intent, IntentAnalysis, Modal};
use tracing::debug;

/// Ordered intent table. Declaration order decides the primary intent
/// when several categories match.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Navigation,
        &["show", "open", "go to", "navigate", "section", "modal"],
    ),
    (
        Intent::Projects,
        &[
            "project",
            "projects",
            "built",
            "created",
            "developed",
            "keepsake",
            "portfolio",
            "dexchat",
            "caravancraft",
            "work",
            "app",
            "website",
        ],
    ),
    (
        Intent::Skills,
        &[
            "skills",
            "technical",
            "technologies",
            "programming",
            "expertise",
            "tech",
            "stack",
            "language",
            "framework",
            "tools",
            "development",
            "coding",
            "frontend",
            "backend",
            "database",
            "api",
        ],
    ),
    (
        Intent::Experience,
        &[
            "work",
            "job",
            "experience",
            "resume",
            "career",
            "background",
            "employment",
            "professional",
        ],
    ),
    (
        Intent::Contact,
        &[
            "contact",
            "reach",
            "email",
            "get in touch",
            "message",
            "hire",
            "available",
        ],
    ),
    (
        Intent::Conversation,
        &["summary", "recap", "what did we discuss", "conversation"],
    ),
    (
        Intent::KnowledgeSearch,
        &["tell me", "about", "what", "how", "why", "explain"],
    ),
];

/// Modal mention table, independent of the intent table.
const MODAL_KEYWORDS: &[(Modal, &[&str])] = &[
    (
        Modal::Whoami,
        &[
            "who",
            "about",
            "background",
            "personal",
            "bio",
            "person",
            "blake",
            "yourself",
        ],
    ),
    (
        Modal::Resume,
        &[
            "work",
            "job",
            "experience",
            "resume",
            "career",
            "professional",
            "employment",
            "history",
        ],
    ),
    (
        Modal::Skills,
        &[
            "skill",
            "skills",
            "technical",
            "technology",
            "tech",
            "stack",
            "programming",
            "development",
            "coding",
            "language",
            "framework",
            "tools",
            "frontend",
            "backend",
            "database",
            "api",
            "technologies",
            "expertise",
        ],
    ),
    (
        Modal::Projects,
        &[
            "project",
            "projects",
            "built",
            "created",
            "developed",
            "portfolio",
            "work",
            "app",
            "website",
            "keepsake",
            "dexchat",
            "caravancraft",
            "made",
        ],
    ),
    (
        Modal::Contact,
        &[
            "contact", "reach", "email", "message", "hire", "available", "touch", "connect",
        ],
    ),
];

/// Modals implied by a detected intent even when the modal's own keywords
/// never appeared in the utterance.
const INTENT_IMPLIED_MODALS: &[(Intent, Modal)] = &[
    (Intent::Skills, Modal::Skills),
    (Intent::Projects, Modal::Projects),
    (Intent::Experience, Modal::Resume),
    (Intent::Contact, Modal::Contact),
];

/// Classify an utterance. Pure function of the message text; prior
/// conversation context plays no role in classification.
pub fn analyze(message: &str) -> IntentAnalysis {
    let message_lower = message.to_lowercase();

    let mut detected_intents = Vec::new();
    for (intent, keywords) in INTENT_KEYWORDS {
        let matched: Vec<&&str> = keywords
            .iter()
            .filter(|kw| message_lower.contains(**kw))
            .collect();
        if !matched.is_empty() {
            debug!(intent = %intent, keywords = ?matched, "detected intent");
            detected_intents.push(*intent);
        }
    }

    let primary_intent = detected_intents
        .first()
        .copied()
        .unwrap_or(Intent::KnowledgeSearch);

    let mut mentioned_modals = Vec::new();
    for (modal, keywords) in MODAL_KEYWORDS {
        if keywords.iter().any(|kw| message_lower.contains(kw)) {
            debug!(modal = %modal, "detected modal mention");
            mentioned_modals.push(*modal);
        }
    }

    for (intent, modal) in INTENT_IMPLIED_MODALS {
        if detected_intents.contains(intent) && !mentioned_modals.contains(modal) {
            debug!(modal = %modal, intent = %intent, "added modal implied by intent");
            mentioned_modals.push(*modal);
        }
    }

    mentioned_modals.dedup();
    if mentioned_modals.len() > 1 {
        mentioned_modals.sort_by(|a, b| b.priority().cmp(&a.priority()));
        mentioned_modals.truncate(1);
    }

    let confidence = detected_intents.len() as f64 / INTENT_KEYWORDS.len() as f64;

    debug!(
        primary = %primary_intent,
        detected = detected_intents.len(),
        modals = ?mentioned_modals,
        confidence,
        "intent analysis complete"
    );

    IntentAnalysis {
        primary_intent,
        detected_intents,
        requires_modal: !mentioned_modals.is_empty(),
        mentioned_modals,
        confidence,
    }
}
