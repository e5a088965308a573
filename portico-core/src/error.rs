//! Error types for the Portico orchestration core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the LLM backend, tool execution, and configuration domains.
//! Nothing below the orchestrator boundary is allowed to abort a request:
//! tool faults are folded into `ToolResult` payloads and generation faults
//! into fallback answers, so these types mostly travel through logs.

/// Top-level error type for the Portico core library.
#[derive(Debug, thiserror::Error)]
pub enum PorticoError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from generation backend interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for backend {backend}")]
    AuthFailed { backend: String },

    #[error("Rate limited by backend")]
    RateLimited,

    #[error("Quota exceeded for model {model}")]
    QuotaExceeded { model: String },

    #[error("Empty response from model {model}")]
    EmptyResponse { model: String },

    #[error("Backend connection failed: {message}")]
    Connection { message: String },
}

/// Errors from tool registration and execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool '{name}' not found")]
    NotFound { name: String },

    #[error("tool '{name}' already registered")]
    AlreadyRegistered { name: String },

    #[error("invalid input for tool '{name}': {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("tool '{name}' execution failed: {message}")]
    ExecutionFailed { name: String, message: String },

    #[error("tool '{name}' timed out after {timeout_secs}s")]
    Timeout { name: String, timeout_secs: u64 },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Environment variable not set: {var}")]
    EnvVarMissing { var: String },
}

/// A type alias for results using the top-level `PorticoError`.
pub type Result<T> = std::result::Result<T, PorticoError>;
