// common/src/jobs/mod.rs
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    /// Percentage of items processed.
    InProgress(u32),
    Completed(String),
    Failed(String),
}

/// Outcome of rendering one item of a batch job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRenderResult {
    pub template_id: String,
    pub url: Option<String>,
    pub error: Option<String>,
}
