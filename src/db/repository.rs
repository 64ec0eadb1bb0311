//! Database repository for clients and style responses.
//!
//! Uses prepared statements and transactions for data integrity.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::errors::AppError;
use crate::models::{
    Catalog, Client, ClientReport, ClientStats, ClientStatus, RevisionInfo, ResolvedLogoChoice,
    StyleResponse, StyleSelections,
};

const CLIENT_COLUMNS: &str =
    "id, owner_id, name, email, status, created_at, updated_at, completed_at";

const RESPONSE_COLUMNS: &str =
    "id, client_id, selected_logo_options, selected_palette, selected_typography, created_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    // ==================== CLIENT OPERATIONS ====================

    /// List the clients owned by a designer, newest first, optionally only
    /// those with the given status.
    pub async fn list_clients_for_owner(
        &self,
        owner_id: &str,
        status: Option<ClientStatus>,
    ) -> Result<Vec<Client>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM clients WHERE owner_id = ?1 AND (?2 IS NULL OR status = ?2) ORDER BY created_at DESC, rowid DESC",
            CLIENT_COLUMNS
        ))
        .bind(owner_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(client_from_row).collect()
    }

    /// Client counts per status for a designer's dashboard.
    pub async fn get_client_stats(&self, owner_id: &str) -> Result<ClientStats, AppError> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS n FROM clients WHERE owner_id = ? GROUP BY status",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut stats = ClientStats::default();
        for row in &rows {
            let status: String = row.get("status");
            let count: i64 = row.get("n");
            match ClientStatus::parse(&status) {
                Some(ClientStatus::Pending) => stats.pending = count,
                Some(ClientStatus::Completed) => stats.completed = count,
                None => {
                    tracing::warn!(owner_id, status = %status, "Skipping unknown client status in stats")
                }
            }
            stats.total += count;
        }
        Ok(stats)
    }

    /// Get a client by ID, scoped to its owner.
    pub async fn get_client(&self, owner_id: &str, id: &str) -> Result<Option<Client>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM clients WHERE id = ? AND owner_id = ?",
            CLIENT_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(client_from_row).transpose()
    }

    /// Get a client by ID without ownership checks, for the public form link.
    pub async fn get_client_public(&self, id: &str) -> Result<Option<Client>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM clients WHERE id = ?", CLIENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(client_from_row).transpose()
    }

    /// Create a new pending client for a designer.
    pub async fn create_client(
        &self,
        owner_id: &str,
        name: &str,
        email: &str,
    ) -> Result<Client, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO clients (id, owner_id, name, email, status, created_at, updated_at) VALUES (?, ?, ?, ?, 'pending', ?, ?)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(name)
        .bind(email)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;
        tracing::info!(client_id = %id, owner_id, "Client created");

        Ok(Client {
            id,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            status: ClientStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
            completed_at: None,
        })
    }

    /// Set a client's status.
    ///
    /// Completing stamps `completed_at`. Reopening clears it and discards the
    /// recorded response so the client can answer again.
    pub async fn set_status(
        &self,
        owner_id: &str,
        id: &str,
        status: ClientStatus,
    ) -> Result<Client, AppError> {
        let existing = self
            .get_client(owner_id, id)
            .await?
            .ok_or_else(|| AppError::client_not_found(id))?;

        if existing.status == status {
            return Ok(existing);
        }

        let now = Utc::now().to_rfc3339();
        let completed_at = match status {
            ClientStatus::Completed => Some(now.clone()),
            ClientStatus::Pending => None,
        };

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE clients SET status = ?, completed_at = ?, updated_at = ? WHERE id = ? AND owner_id = ? AND status = ?",
        )
        .bind(status.as_str())
        .bind(&completed_at)
        .bind(&now)
        .bind(id)
        .bind(owner_id)
        .bind(existing.status.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Status changed between read and write, most likely a submission
            return Err(AppError::Validation(format!(
                "Client {} changed status concurrently",
                id
            )));
        }

        if status == ClientStatus::Pending {
            sqlx::query("DELETE FROM style_responses WHERE client_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        tracing::info!(client_id = %id, status = status.as_str(), "Client status changed");

        Ok(Client {
            status,
            completed_at,
            updated_at: now,
            ..existing
        })
    }

    /// Delete a client and, through the cascade, its response.
    pub async fn delete_client(&self, owner_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::client_not_found(id));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== RESPONSE OPERATIONS ====================

    /// Get the response recorded for a client, if any.
    pub async fn get_response(&self, client_id: &str) -> Result<Option<StyleResponse>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM style_responses WHERE client_id = ?",
            RESPONSE_COLUMNS
        ))
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(response_from_row).transpose()
    }

    /// Record a client's answers and mark the client completed, atomically.
    ///
    /// Exactly one of any number of concurrent calls for the same client
    /// succeeds; the others get `AlreadyCompleted`.
    pub async fn submit_response(
        &self,
        client_id: &str,
        selections: &StyleSelections,
    ) -> Result<StyleResponse, AppError> {
        let now = Utc::now().to_rfc3339();
        let logo_options_json = serde_json::to_string(&selections.selected_logo_options)?;

        let mut tx = self.pool.begin().await?;

        // Writing first takes the write lock before any read snapshot exists
        let flipped = sqlx::query(
            "UPDATE clients SET status = 'completed', completed_at = ?, updated_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(&now)
        .bind(&now)
        .bind(client_id)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM clients WHERE id = ?")
                .bind(client_id)
                .fetch_optional(&mut *tx)
                .await?
                .is_some();

            return Err(if exists {
                tracing::info!(client_id, "Rejected submission for completed client");
                already_completed(client_id)
            } else {
                AppError::client_not_found(client_id)
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        let inserted = sqlx::query(
            "INSERT INTO style_responses (id, client_id, selected_logo_options, selected_palette, selected_typography, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(client_id)
        .bind(&logo_options_json)
        .bind(&selections.selected_palette)
        .bind(&selections.selected_typography)
        .bind(&now)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                // A response survived a manual status change; dropping tx rolls back the flip
                return Err(already_completed(client_id));
            }
            Err(e) => return Err(e.into()),
        }

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        tracing::info!(client_id, response_id = %id, "Style response recorded");

        Ok(StyleResponse {
            id,
            client_id: client_id.to_string(),
            selected_logo_options: selections.selected_logo_options.clone(),
            selected_palette: selections.selected_palette.clone(),
            selected_typography: selections.selected_typography.clone(),
            created_at: now,
        })
    }

    /// Build the designer report for an answered client.
    pub async fn get_client_report(
        &self,
        owner_id: &str,
        id: &str,
    ) -> Result<ClientReport, AppError> {
        let client = self
            .get_client(owner_id, id)
            .await?
            .ok_or_else(|| AppError::client_not_found(id))?;

        let response = self
            .get_response(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} has not answered yet", id)))?;

        let catalog = self.get_catalog().await?;
        Ok(build_report(client, response, &catalog))
    }
}

fn already_completed(client_id: &str) -> AppError {
    AppError::AlreadyCompleted(format!("Client {} has already answered the form", client_id))
}

async fn bump_revision(tx: &mut Transaction<'_, Sqlite>, now: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Resolve a response's ids against the catalog, in catalog order.
fn build_report(client: Client, response: StyleResponse, catalog: &Catalog) -> ClientReport {
    let mut remaining = response.selected_logo_options.clone();

    let mut logo_choices: Vec<ResolvedLogoChoice> = catalog
        .logo_categories
        .iter()
        .filter_map(|category| {
            let option_id = remaining.remove(&category.id)?;
            Some(ResolvedLogoChoice {
                category_id: category.id.clone(),
                category_title: category.title.clone(),
                option: category.option(&option_id).cloned(),
            })
        })
        .collect();

    // Categories retired from the catalog since the client answered
    logo_choices.extend(remaining.into_keys().map(|category_id| ResolvedLogoChoice {
        category_title: category_id.clone(),
        category_id,
        option: None,
    }));

    let palette = response
        .selected_palette
        .as_deref()
        .and_then(|id| catalog.palette(id))
        .cloned();
    let typography = response
        .selected_typography
        .as_deref()
        .and_then(|id| catalog.typography(id))
        .cloned();

    ClientReport {
        client,
        response,
        logo_choices,
        palette,
        typography,
    }
}

fn client_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Client, AppError> {
    let id: String = row.get("id");
    let raw_status: String = row.get("status");
    let status = ClientStatus::parse(&raw_status).ok_or_else(|| {
        tracing::error!(client_id = %id, status = %raw_status, "Unknown client status in database");
        AppError::Database(format!("Client {} has unknown status {:?}", id, raw_status))
    })?;

    Ok(Client {
        id,
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        email: row.get("email"),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        completed_at: row.get("completed_at"),
    })
}

fn response_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<StyleResponse, AppError> {
    let client_id: String = row.get("client_id");
    let logo_options: String = row.get("selected_logo_options");
    let selected_logo_options: BTreeMap<String, String> = serde_json::from_str(&logo_options)
        .map_err(|e| {
            tracing::error!(client_id = %client_id, error = %e, "Unreadable logo selections");
            AppError::Database(format!(
                "Response for client {} has malformed logo selections: {}",
                client_id, e
            ))
        })?;

    Ok(StyleResponse {
        id: row.get("id"),
        client_id,
        selected_logo_options,
        selected_palette: row.get("selected_palette"),
        selected_typography: row.get("selected_typography"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        let repo = Repository::new(pool);
        repo.seed_default_catalog().await.expect("Failed to seed");
        (repo, temp_dir)
    }

    fn full_selections() -> StyleSelections {
        StyleSelections {
            selected_logo_options: [("minimalist".to_string(), "min-2".to_string())]
                .into_iter()
                .collect(),
            selected_palette: Some("warm".to_string()),
            selected_typography: Some("geometric".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_flips_status_and_stamps_completion() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();

        let response = repo.submit_response(&client.id, &full_selections()).await.unwrap();
        assert_eq!(response.client_id, client.id);
        assert_eq!(response.selections(), full_selections());

        let stored = repo.get_client("designer-1", &client.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ClientStatus::Completed);
        assert_eq!(stored.completed_at.as_deref(), Some(response.created_at.as_str()));
    }

    #[tokio::test]
    async fn test_second_submit_is_rejected_and_first_kept() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();

        let first = repo.submit_response(&client.id, &full_selections()).await.unwrap();

        let mut other = full_selections();
        other.selected_palette = Some("pastel".to_string());
        let err = repo.submit_response(&client.id, &other).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyCompleted(_)));

        let stored = repo.get_response(&client.id).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_concurrent_submits_have_one_winner() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let repo = repo.clone();
                let id = client.id.clone();
                tokio::spawn(async move { repo.submit_response(&id, &full_selections()).await })
            })
            .collect();

        let mut successes = 0;
        let mut rejections = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AppError::AlreadyCompleted(_)) => rejections += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(rejections, 3);

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM style_responses")
            .fetch_one(&repo.pool)
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_submit_for_missing_client() {
        let (repo, _dir) = repo().await;
        let err = repo
            .submit_response("no-such-client", &full_selections())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_manual_completion_blocks_submission() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();
        repo.set_status("designer-1", &client.id, ClientStatus::Completed)
            .await
            .unwrap();

        let err = repo.submit_response(&client.id, &full_selections()).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyCompleted(_)));
        assert!(repo.get_response(&client.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reopen_discards_response() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();
        repo.submit_response(&client.id, &full_selections()).await.unwrap();

        let reopened = repo
            .set_status("designer-1", &client.id, ClientStatus::Pending)
            .await
            .unwrap();
        assert_eq!(reopened.status, ClientStatus::Pending);
        assert!(reopened.completed_at.is_none());
        assert!(repo.get_response(&client.id).await.unwrap().is_none());

        repo.submit_response(&client.id, &full_selections()).await.unwrap();
    }

    #[tokio::test]
    async fn test_clients_are_scoped_to_owner() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();
        repo.create_client("designer-2", "Bia", "bia@example.com").await.unwrap();

        assert!(repo.get_client("designer-2", &client.id).await.unwrap().is_none());
        assert_eq!(repo.list_clients_for_owner("designer-1", None).await.unwrap().len(), 1);
        assert!(matches!(
            repo.delete_client("designer-2", &client.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_report_resolves_choices() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();

        assert!(matches!(
            repo.get_client_report("designer-1", &client.id).await,
            Err(AppError::NotFound(_))
        ));

        repo.submit_response(&client.id, &full_selections()).await.unwrap();
        let report = repo.get_client_report("designer-1", &client.id).await.unwrap();

        assert_eq!(report.logo_choices.len(), 1);
        assert_eq!(report.logo_choices[0].category_title, "Minimalist");
        assert_eq!(
            report.logo_choices[0].option.as_ref().map(|o| o.id.as_str()),
            Some("min-2")
        );
        assert_eq!(report.palette.map(|p| p.name), Some("Warm & Welcoming".to_string()));
        assert_eq!(report.typography.map(|t| t.id), Some("geometric".to_string()));
    }

    #[tokio::test]
    async fn test_corrupt_logo_selections_are_an_error() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();
        repo.submit_response(&client.id, &full_selections()).await.unwrap();

        sqlx::query("UPDATE style_responses SET selected_logo_options = '{oops' WHERE client_id = ?")
            .bind(&client.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(matches!(
            repo.get_response(&client.id).await,
            Err(AppError::Database(_))
        ));
        assert!(matches!(
            repo.get_client_report("designer-1", &client.id).await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_status_is_not_read_as_pending() {
        let (repo, _dir) = repo().await;
        let client = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();

        // Bypass the CHECK constraint to simulate a damaged row
        let mut conn = repo.pool.acquire().await.unwrap();
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("UPDATE clients SET status = 'archived' WHERE id = ?")
            .bind(&client.id)
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("PRAGMA ignore_check_constraints = OFF")
            .execute(&mut *conn)
            .await
            .unwrap();
        drop(conn);

        assert!(matches!(
            repo.get_client("designer-1", &client.id).await,
            Err(AppError::Database(_))
        ));
        assert!(matches!(
            repo.list_clients_for_owner("designer-1", None).await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_status_filter_and_stats() {
        let (repo, _dir) = repo().await;
        let answered = repo.create_client("designer-1", "Ana", "ana@example.com").await.unwrap();
        repo.create_client("designer-1", "Bia", "bia@example.com").await.unwrap();
        repo.create_client("designer-1", "Caio", "caio@example.com").await.unwrap();
        repo.create_client("designer-2", "Duda", "duda@example.com").await.unwrap();
        repo.submit_response(&answered.id, &full_selections()).await.unwrap();

        let completed = repo
            .list_clients_for_owner("designer-1", Some(ClientStatus::Completed))
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, answered.id);

        let pending = repo
            .list_clients_for_owner("designer-1", Some(ClientStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);

        let stats = repo.get_client_stats("designer-1").await.unwrap();
        assert_eq!(
            stats,
            ClientStats {
                total: 3,
                pending: 2,
                completed: 1
            }
        );
        assert_eq!(repo.get_client_stats("nobody").await.unwrap(), ClientStats::default());
    }
}
