//! Style response model: the finalized answers of a client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The selections a client makes in the form.
///
/// Also used as the request body of a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleSelections {
    /// Logo category id to chosen option id. One choice per category.
    #[serde(default)]
    pub selected_logo_options: BTreeMap<String, String>,
    #[serde(default)]
    pub selected_palette: Option<String>,
    #[serde(default)]
    pub selected_typography: Option<String>,
}

/// Immutable record of a client's answers. At most one per client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleResponse {
    pub id: String,
    pub client_id: String,
    pub selected_logo_options: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selected_palette: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selected_typography: Option<String>,
    pub created_at: String,
}

impl StyleResponse {
    /// The selections this response recorded.
    pub fn selections(&self) -> StyleSelections {
        StyleSelections {
            selected_logo_options: self.selected_logo_options.clone(),
            selected_palette: self.selected_palette.clone(),
            selected_typography: self.selected_typography.clone(),
        }
    }
}
