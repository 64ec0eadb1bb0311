//! Client model: the customer who is asked to answer the questionnaire.

use serde::{Deserialize, Serialize};

use super::{LogoOption, Palette, StyleResponse, TypographyStyle};

/// Lifecycle status of a client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Pending,
    Completed,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Pending => "pending",
            ClientStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ClientStatus::Pending),
            "completed" => Some(ClientStatus::Completed),
            _ => None,
        }
    }
}

/// A client owned by a designer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub email: String,
    pub status: ClientStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// What the public form link is allowed to see about a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicClient {
    pub id: String,
    pub name: String,
    pub status: ClientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<Client> for PublicClient {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            status: client.status,
            completed_at: client.completed_at,
        }
    }
}

/// Request body for creating a new client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub name: String,
    pub email: String,
}

/// Query string for listing clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListClientsQuery {
    pub status: Option<ClientStatus>,
}

/// Per-designer client counts shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
}

/// Request body for changing a client's status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ClientStatus,
}

/// A logo choice resolved against the catalog for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLogoChoice {
    pub category_id: String,
    pub category_title: String,
    /// `None` when the chosen option is no longer in the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<LogoOption>,
}

/// Designer-facing report for a client who answered the form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReport {
    pub client: Client,
    pub response: StyleResponse,
    pub logo_choices: Vec<ResolvedLogoChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<Palette>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<TypographyStyle>,
}
