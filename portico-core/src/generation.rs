//! Guarded answer generation with ranked model failover.
//!
//! The guard runs three checkpoints around every backend call:
//!
//! 1. Pre-check: with no knowledge context, or no token overlap between
//!    the query and the retrieved chunks, generation is skipped entirely
//!    in favor of a deterministic section suggestion.
//! 2. Generation: models from the rotation list are tried in order; any
//!    fault (including a blank response) advances the rotation index and
//!    retries with the next model. Exhausting the whole list yields a
//!    fixed "technical difficulties" answer.
//! 3. Post-check: a response containing expansion phrasing (signs the
//!    model added unsupported detail) is rejected back to the section
//!    fallback, unless it also carries an acknowledged-limitation flag.
//!
//! The rotation index is shared across requests for the life of the
//! service and only ever moves forward (wrapping). The post-check is a
//! tunable heuristic: it can reject a verbose but accurate answer.

use crate::knowledge::{ScoredChunk, has_coverage};
use crate::providers::CompletionBackend;
use crate::types::{ChatTurn, Modal, Role};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Knowledge chunks embedded into the generation prompt.
const MAX_CONTEXT_CHUNKS: usize = 3;
/// Prior conversation turns embedded into the generation prompt.
const MAX_HISTORY_TURNS: usize = 2;

/// Returned when every model in the rotation failed within one request.
pub const TECHNICAL_DIFFICULTIES: &str =
    "i'm experiencing technical difficulties. please try the [contact] section to reach blake directly.";

/// Section suggestion table for fallback answers. First match wins;
/// the first section is the default when nothing matches.
const FALLBACK_SECTIONS: &[(Modal, &[&str])] = &[
    (
        Modal::Whoami,
        &["who", "about", "background", "personal", "bio", "introduction"],
    ),
    (
        Modal::Resume,
        &["work", "job", "experience", "resume", "career", "employment"],
    ),
    (
        Modal::Skills,
        &["skill", "technical", "technology", "programming", "expertise"],
    ),
    (
        Modal::Projects,
        &["project", "built", "created", "developed", "portfolio"],
    ),
    (
        Modal::Contact,
        &["contact", "reach", "email", "message", "touch"],
    ),
];

/// Phrases that explicitly acknowledge a knowledge limitation. A response
/// carrying one is always accepted, expansion phrasing or not.
const LIMITATION_FLAGS: &[&str] = &[
    "don't have that information",
    "not available in",
    "explore:",
    "contact blake directly",
];

/// Phrases that signal the model padded the answer with detail the
/// knowledge context never supplied.
const EXPANSION_PHRASES: &[&str] = &[
    "also known for",
    "in addition to",
    "furthermore",
    "additionally",
    "moreover",
    "it's worth noting",
    "beyond what's mentioned",
];

const SYSTEM_PROMPT: &str = "\
you are blake bowling's helpful portfolio assistant. respond naturally and conversationally while being completely accurate.

**CORE PRINCIPLE: only share information explicitly provided in the knowledge base, but make it sound natural**

**RESPONSE STYLE:**
- write like a knowledgeable friend helping someone learn about blake
- use natural, flowing language and avoid robotic phrases
- don't mention \"knowledge base\", \"provided information\", or validation processes
- if you don't have information, simply say you don't know that detail and suggest where to find more

**WHEN MISSING INFO:**
don't explain why you don't know. acknowledge you don't have that specific detail and helpfully direct to the relevant section:
- \"i don't have details about [topic]. you might find more in **explore:[section]**\"
- \"that's not something i know about blake. **explore:[section]** might have more\"

**ACCURACY RULES:**
- only state facts explicitly mentioned in the provided context
- never add details, technologies, or specifics not given
- if the context doesn't cover the question, acknowledge the limitation naturally
- suggest exploration sections when appropriate

**TONE:**
- friendly and helpful
- concise but complete
- confident about what you do know, honest about what you don't

make every response feel like natural conversation while being completely accurate to the provided facts.";

/// Ordered failover list of model identifiers with a shared cursor.
///
/// The cursor persists across requests and advances (wrapping) on every
/// failure; it is never reset. Concurrent requests may race on it, which
/// costs at most a suboptimal model pick since every entry is a valid
/// candidate.
pub struct ModelRotation {
    models: Vec<String>,
    index: Mutex<usize>,
}

impl ModelRotation {
    /// Create a rotation over the given models.
    ///
    /// # Panics
    ///
    /// Panics if `models` is empty; a rotation must always have a
    /// current model. Configuration loading rejects empty lists before
    /// they reach this point.
    pub fn new(models: Vec<String>) -> Self {
        assert!(!models.is_empty(), "model rotation list must not be empty");
        Self {
            models,
            index: Mutex::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The model the cursor currently points at.
    pub fn current(&self) -> String {
        let index = *self.index.lock().expect("rotation lock");
        self.models[index % self.models.len()].clone()
    }

    /// Advance the cursor (wrapping) and return the new current model.
    pub fn advance(&self) -> String {
        let mut index = self.index.lock().expect("rotation lock");
        *index = (*index + 1) % self.models.len();
        self.models[*index].clone()
    }

    /// The cursor position, for observability.
    pub fn position(&self) -> usize {
        *self.index.lock().expect("rotation lock")
    }
}

/// Orchestrates the backend call, model failover, and response
/// validation. Never returns an error: every failure path terminates in
/// a deterministic fallback string.
pub struct GenerationGuard {
    backend: Arc<dyn CompletionBackend>,
    rotation: Arc<ModelRotation>,
}

impl GenerationGuard {
    pub fn new(backend: Arc<dyn CompletionBackend>, rotation: Arc<ModelRotation>) -> Self {
        Self { backend, rotation }
    }

    pub fn rotation(&self) -> &ModelRotation {
        &self.rotation
    }

    /// Deterministic fallback directing the user at the most relevant
    /// portfolio section.
    pub fn fallback_response(query: &str) -> String {
        let query_lower = query.to_lowercase();

        let section = FALLBACK_SECTIONS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| query_lower.contains(kw)))
            .map(|(modal, _)| *modal)
            .unwrap_or(FALLBACK_SECTIONS[0].0);

        info!(section = %section, "generated fallback response");
        format!("i don't have those details about blake. **explore:{section}**")
    }

    /// Post-generation validation against the knowledge context.
    ///
    /// Limitation flags are always accepted; otherwise any expansion
    /// phrase rejects the response.
    pub fn validate_response(response: &str, knowledge_context: &[ScoredChunk]) -> bool {
        if response.is_empty() || knowledge_context.is_empty() {
            return false;
        }

        let response_lower = response.to_lowercase();

        if LIMITATION_FLAGS
            .iter()
            .any(|flag| response_lower.contains(flag))
        {
            debug!("response appropriately indicates a knowledge limitation");
            return true;
        }

        if EXPANSION_PHRASES
            .iter()
            .any(|phrase| response_lower.contains(phrase))
        {
            warn!("response contains suspicious expansion phrases");
            return false;
        }

        true
    }

    /// Produce an answer for the query grounded in the supplied knowledge.
    ///
    /// Infallible by design: every fault terminates in a fallback string.
    pub async fn generate(
        &self,
        user_message: &str,
        knowledge_context: &[ScoredChunk],
        history: &[ChatTurn],
    ) -> String {
        if knowledge_context.is_empty() {
            warn!("no knowledge context provided, using fallback");
            return Self::fallback_response(user_message);
        }

        if !has_coverage(user_message, knowledge_context) {
            warn!("insufficient knowledge coverage, using fallback");
            return Self::fallback_response(user_message);
        }

        let messages = self.build_messages(user_message, knowledge_context, history);
        let response = self.complete_with_failover(&messages).await;

        if Self::validate_response(&response, knowledge_context) {
            response
        } else {
            warn!("response failed post-generation validation, using fallback");
            Self::fallback_response(user_message)
        }
    }

    fn build_messages(
        &self,
        user_message: &str,
        knowledge_context: &[ScoredChunk],
        history: &[ChatTurn],
    ) -> Vec<ChatTurn> {
        let mut context_info = String::from("**INFORMATION ABOUT BLAKE:**\n\n");
        for item in knowledge_context.iter().take(MAX_CONTEXT_CHUNKS) {
            context_info.push_str(&item.content);
            context_info.push_str("\n\n");
        }
        context_info.push_str(
            "**IMPORTANT: respond naturally using only the information above. \
             if you don't have specific details the user asks about, simply say \
             you don't know that detail and suggest exploring the relevant section.**",
        );

        let mut messages = vec![ChatTurn::system(SYSTEM_PROMPT)];

        let tail_start = history.len().saturating_sub(MAX_HISTORY_TURNS);
        for turn in &history[tail_start..] {
            if turn.role != Role::System {
                messages.push(turn.clone());
            }
        }

        messages.push(ChatTurn::user(format!(
            "{context_info}\n\nUSER QUESTION: {user_message}\n\n\
             REMEMBER: only use facts explicitly stated in the knowledge base context above."
        )));

        messages
    }

    /// Try each model in rotation order once; a non-blank response
    /// short-circuits the loop. Exhaustion yields the fixed technical
    /// difficulties message.
    async fn complete_with_failover(&self, messages: &[ChatTurn]) -> String {
        for attempt in 0..self.rotation.len() {
            let model = self.rotation.current();
            info!(model = %model, attempt = attempt + 1, "attempting generation");

            match self.backend.complete(messages, &model).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!(model = %model, length = text.len(), "generation succeeded");
                    return text.trim().to_string();
                }
                Ok(_) => {
                    warn!(model = %model, "blank response from model, rotating");
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "model failed, rotating");
                }
            }

            let next = self.rotation.advance();
            debug!(model = %next, "rotation advanced");
        }

        warn!(models = self.rotation.len(), "all models exhausted");
        TECHNICAL_DIFFICULTIES.to_string()
    }
}
