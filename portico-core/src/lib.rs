//! # Portico Core
//!
//! Core library for the Portico portfolio assistant.
//! Provides the per-request orchestrator, intent analysis, tool registry
//! and dispatcher, knowledge index, guarded generation with model
//! failover, configuration, and fundamental types.

pub mod agent;
pub mod config;
pub mod error;
pub mod generation;
pub mod intent;
pub mod knowledge;
pub mod persistence;
pub mod providers;
pub mod registry;
pub mod selector;
pub mod types;

// Re-export commonly used types at the crate root.
pub use agent::Agent;
pub use config::{AssistantConfig, LlmConfig, load_config};
pub use error::{ConfigError, LlmError, PorticoError, Result, ToolError};
pub use generation::{GenerationGuard, ModelRotation, TECHNICAL_DIFFICULTIES};
pub use intent::analyze;
pub use knowledge::{
    KnowledgeChunk, KnowledgeIndex, ScoredChunk, has_coverage, validate_item,
};
pub use persistence::{ExecutionLog, ExecutionRecord, MemoryLog, NoopLog};
pub use providers::{CompletionBackend, MockBackend, OpenRouterBackend};
pub use registry::{Tool, ToolInfo, ToolRegistry};
pub use selector::{MAX_TOOLS_PER_TURN, select_tools};
pub use types::{
    ChatTurn, Intent, IntentAnalysis, Modal, Role, ToolResult, TurnResult,
};
