//! Revision counter exposed in every response envelope.

use serde::{Deserialize, Serialize};

/// Revision information for change detection.
///
/// Any mutation bumps `revision_id`; a caller holding cached reads from an
/// older revision must refetch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
