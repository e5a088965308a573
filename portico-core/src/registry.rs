//! Tool trait and registry dispatcher.
//!
//! Tools are registered once at startup into an immutable lookup table.
//! `dispatch` is the uniform invocation wrapper around every capability
//! module: it measures execution time, applies a per-tool timeout, and
//! converts every fault (unknown tool, execution error, timeout) into a
//! `success=false` result. It never returns an error and never panics
//! outward, so nothing below the orchestrator can abort a request.
//!
//! Wrapper-measured time is authoritative: on success the module-reported
//! elapsed time is overwritten so timing is consistent across tools.

use crate::error::ToolError;
use crate::types::ToolResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Trait that all capability modules implement.
///
/// `execute` accepts structured input (tools commonly read a `query`
/// string field) and returns a `ToolResult`-shaped payload. Returning
/// `Err` is a tool fault; the dispatcher folds it into a failed result.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    fn name(&self) -> &str;

    /// Human-readable description of what this tool does.
    fn description(&self) -> &str;

    /// Execute the tool with the given input.
    async fn execute(&self, input: serde_json::Value) -> Result<ToolResult, ToolError>;

    /// Maximum execution time before the dispatcher gives up.
    fn timeout(&self) -> Duration {
        Duration::from_secs(10)
    }
}

/// Name and description of a registered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// The registry holds all registered tools and dispatches invocations.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Returns an error if the name is already taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolError::AlreadyRegistered { name });
        }
        debug!(tool = %name, "registering tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List registered tool names and descriptions.
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools
            .values()
            .map(|tool| ToolInfo {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name, isolating every failure mode.
    ///
    /// Contract: always returns a `ToolResult`, never propagates a fault.
    pub async fn dispatch(&self, name: &str, input: serde_json::Value) -> ToolResult {
        let start = Instant::now();

        let Some(tool) = self.tools.get(name) else {
            warn!(tool = %name, "tool not found");
            return ToolResult::failure(name, format!("tool '{name}' not found"));
        };

        let timeout = tool.timeout();
        info!(tool = %name, "executing tool");

        let outcome = tokio::time::timeout(timeout, tool.execute(input)).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(Ok(mut result)) => {
                // Wrapper-measured time wins over anything the tool set.
                result.execution_time = elapsed;
                debug!(tool = %name, success = result.success, ?elapsed, "tool finished");
                result
            }
            Ok(Err(e)) => {
                warn!(tool = %name, error = %e, "tool execution failed");
                let mut result = ToolResult::failure(name, e.to_string());
                result.execution_time = elapsed;
                result
            }
            Err(_) => {
                warn!(tool = %name, timeout_secs = timeout.as_secs(), "tool timed out");
                let mut result = ToolResult::failure(
                    name,
                    ToolError::Timeout {
                        name: name.to_string(),
                        timeout_secs: timeout.as_secs(),
                    }
                    .to_string(),
                );
                result.execution_time = elapsed;
                result
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
