//! Execution logging.
//!
//! Every tool invocation is recorded fire-and-forget: the log is a
//! collaborator the orchestrator notifies, never a dependency it waits
//! on or can fail because of. Implementations must swallow their own
//! faults.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// One recorded tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: Uuid,
    pub session_id: String,
    pub tool_name: String,
    pub input: Value,
    pub output: Option<Value>,
    pub execution_time: Duration,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionRecord {
    pub fn new(
        session_id: impl Into<String>,
        tool_name: impl Into<String>,
        input: Value,
        output: Option<Value>,
        execution_time: Duration,
        success: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into(),
            tool_name: tool_name.into(),
            input,
            output,
            execution_time,
            success,
            timestamp: Utc::now(),
        }
    }
}

/// Sink for execution records. Infallible on purpose: a broken log must
/// never break a request.
#[async_trait]
pub trait ExecutionLog: Send + Sync {
    async fn record(&self, record: ExecutionRecord);
}

/// Discards every record.
#[derive(Default)]
pub struct NoopLog;

#[async_trait]
impl ExecutionLog for NoopLog {
    async fn record(&self, _record: ExecutionRecord) {}
}

/// Keeps records in memory, for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<ExecutionRecord>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ExecutionRecord> {
        self.entries.lock().expect("log lock").clone()
    }
}

#[async_trait]
impl ExecutionLog for MemoryLog {
    async fn record(&self, record: ExecutionRecord) {
        self.entries.lock().expect("log lock").push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_log_keeps_order() {
        let log = MemoryLog::new();
        for name in ["knowledge_search", "project_details"] {
            log.record(ExecutionRecord::new(
                "session-1",
                name,
                json!({ "query": "projects" }),
                Some(json!({ "status": "ok" })),
                Duration::from_millis(3),
                true,
            ))
            .await;
        }

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tool_name, "knowledge_search");
        assert_eq!(entries[1].tool_name, "project_details");
        assert!(entries[0].success);
    }

    #[tokio::test]
    async fn test_record_serializes() {
        let record = ExecutionRecord::new(
            "session-1",
            "knowledge_search",
            json!({ "query": "skills" }),
            None,
            Duration::from_millis(1),
            false,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tool_name"], "knowledge_search");
        assert_eq!(value["success"], false);
    }
}
