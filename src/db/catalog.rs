//! Catalog queries and default-catalog seeding.
//!
//! An empty catalog table falls back to the built-in defaults, so the form
//! stays usable before seeding.

use std::collections::HashMap;

use sqlx::Row;

use super::defaults::default_catalog;
use super::Repository;
use crate::errors::AppError;
use crate::models::{Catalog, LogoCategory, LogoOption, Palette, TypographyStyle};

impl Repository {
    /// Full catalog for rendering the form.
    pub async fn get_catalog(&self) -> Result<Catalog, AppError> {
        Ok(Catalog {
            logo_categories: self.list_logo_categories().await?,
            palettes: self.list_palettes().await?,
            typography_styles: self.list_typography_styles().await?,
        })
    }

    /// Active logo categories in display order, each with at least one option.
    ///
    /// Only a never-populated table falls back to the defaults; a table whose
    /// rows are all inactive yields an empty list.
    pub async fn list_logo_categories(&self) -> Result<Vec<LogoCategory>, AppError> {
        if self.table_is_empty("logo_categories").await? {
            return Ok(default_catalog().logo_categories);
        }

        let categories = sqlx::query(
            "SELECT id, title, description FROM logo_categories WHERE is_active = 1 ORDER BY display_order, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let option_rows = sqlx::query(
            r#"SELECT o.id, o.category_id, o.image_url, o.alt_text
               FROM logo_options o
               JOIN logo_categories c ON c.id = o.category_id
               WHERE c.is_active = 1
               ORDER BY o.display_order, o.id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut options: HashMap<String, Vec<LogoOption>> = HashMap::new();
        for row in &option_rows {
            options
                .entry(row.get("category_id"))
                .or_default()
                .push(LogoOption {
                    id: row.get("id"),
                    image: row.get("image_url"),
                    alt_text: row.get("alt_text"),
                });
        }

        Ok(categories
            .iter()
            .filter_map(|row| {
                let id: String = row.get("id");
                let options = options.remove(&id)?;
                Some(LogoCategory {
                    id,
                    title: row.get("title"),
                    description: row.get("description"),
                    options,
                })
            })
            .collect())
    }

    pub async fn list_palettes(&self) -> Result<Vec<Palette>, AppError> {
        let rows = sqlx::query("SELECT id, name, colors FROM palettes ORDER BY display_order, id")
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Ok(default_catalog().palettes);
        }

        rows.iter().map(palette_from_row).collect()
    }

    pub async fn list_typography_styles(&self) -> Result<Vec<TypographyStyle>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, description, preview_text, font_family FROM typography_styles ORDER BY display_order, id",
        )
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(default_catalog().typography_styles);
        }

        Ok(rows
            .iter()
            .map(|row| TypographyStyle {
                id: row.get("id"),
                name: row.get("name"),
                description: row.get("description"),
                preview_text: row.get("preview_text"),
                font_family: row.get("font_family"),
            })
            .collect())
    }

    async fn table_is_empty(&self, table: &'static str) -> Result<bool, AppError> {
        let row = sqlx::query(&format!("SELECT EXISTS (SELECT 1 FROM {}) AS present", table))
            .fetch_one(&self.pool)
            .await?;
        let present: i64 = row.get("present");
        Ok(present == 0)
    }

    /// Insert the default catalog into whichever catalog tables are empty.
    ///
    /// Returns `true` if anything was inserted.
    pub async fn seed_default_catalog(&self) -> Result<bool, AppError> {
        let defaults = default_catalog();
        let mut tx = self.pool.begin().await?;
        let mut seeded = false;

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM logo_categories")
            .fetch_one(&mut *tx)
            .await?
            .get("n");
        if count == 0 {
            for (order, category) in defaults.logo_categories.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO logo_categories (id, title, description, display_order, is_active) VALUES (?, ?, ?, ?, 1)",
                )
                .bind(&category.id)
                .bind(&category.title)
                .bind(&category.description)
                .bind(order as i64)
                .execute(&mut *tx)
                .await?;

                for (option_order, option) in category.options.iter().enumerate() {
                    sqlx::query(
                        "INSERT INTO logo_options (id, category_id, image_url, alt_text, display_order) VALUES (?, ?, ?, ?, ?)",
                    )
                    .bind(&option.id)
                    .bind(&category.id)
                    .bind(&option.image)
                    .bind(&option.alt_text)
                    .bind(option_order as i64)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            seeded = true;
        }

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM palettes")
            .fetch_one(&mut *tx)
            .await?
            .get("n");
        if count == 0 {
            for (order, palette) in defaults.palettes.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO palettes (id, name, colors, display_order) VALUES (?, ?, ?, ?)",
                )
                .bind(&palette.id)
                .bind(&palette.name)
                .bind(serde_json::to_string(&palette.colors)?)
                .bind(order as i64)
                .execute(&mut *tx)
                .await?;
            }
            seeded = true;
        }

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM typography_styles")
            .fetch_one(&mut *tx)
            .await?
            .get("n");
        if count == 0 {
            for (order, style) in defaults.typography_styles.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO typography_styles (id, name, description, preview_text, font_family, display_order) VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&style.id)
                .bind(&style.name)
                .bind(&style.description)
                .bind(&style.preview_text)
                .bind(&style.font_family)
                .bind(order as i64)
                .execute(&mut *tx)
                .await?;
            }
            seeded = true;
        }

        tx.commit().await?;

        if seeded {
            tracing::info!("Default catalog seeded");
        }
        Ok(seeded)
    }
}

fn palette_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Palette, AppError> {
    let id: String = row.get("id");
    let colors: String = row.get("colors");
    let colors = serde_json::from_str(&colors).map_err(|e| {
        tracing::warn!(palette_id = %id, error = %e, "Unreadable palette colors");
        AppError::Database(format!("Palette {} has malformed colors: {}", id, e))
    })?;

    Ok(Palette {
        id,
        name: row.get("name"),
        colors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite")).await.unwrap();
        let repo = Repository::new(pool);

        assert!(repo.seed_default_catalog().await.unwrap());
        assert!(!repo.seed_default_catalog().await.unwrap());

        let catalog = repo.get_catalog().await.unwrap();
        assert_eq!(catalog, default_catalog());
    }

    #[tokio::test]
    async fn test_inactive_and_empty_categories_are_hidden() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite")).await.unwrap();
        let repo = Repository::new(pool);
        repo.seed_default_catalog().await.unwrap();

        sqlx::query("UPDATE logo_categories SET is_active = 0 WHERE id = 'vintage'")
            .execute(&repo.pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO logo_categories (id, title, description, display_order) VALUES ('empty', 'Empty', 'No options', 99)",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let ids: Vec<String> = repo
            .list_logo_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(
            ids,
            vec!["minimalist", "luxury", "modern", "organic", "playful"]
        );
    }

    #[tokio::test]
    async fn test_all_categories_inactive_yields_none() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite")).await.unwrap();
        let repo = Repository::new(pool);
        repo.seed_default_catalog().await.unwrap();

        sqlx::query("UPDATE logo_categories SET is_active = 0")
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(repo.list_logo_categories().await.unwrap().is_empty());
        // The other sections are unaffected
        assert_eq!(repo.list_palettes().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_malformed_palette_colors_are_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite")).await.unwrap();
        let repo = Repository::new(pool);
        repo.seed_default_catalog().await.unwrap();

        sqlx::query("UPDATE palettes SET colors = 'not json' WHERE id = 'warm'")
            .execute(&repo.pool)
            .await
            .unwrap();

        assert!(matches!(
            repo.list_palettes().await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_unseeded_catalog_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite")).await.unwrap();
        let repo = Repository::new(pool);

        assert_eq!(repo.get_catalog().await.unwrap(), default_catalog());
    }
}
