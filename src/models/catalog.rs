//! Catalog models: the selectable logo categories, palettes and typography styles.

use serde::{Deserialize, Serialize};

/// One selectable image inside a logo category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogoOption {
    pub id: String,
    pub image: String,
    pub alt_text: String,
}

/// A logo style category and its ordered options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogoCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub options: Vec<LogoOption>,
}

impl LogoCategory {
    pub fn option(&self, option_id: &str) -> Option<&LogoOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// A named color palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub id: String,
    pub name: String,
    /// Hex colors, darkest first.
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypographyStyle {
    pub id: String,
    pub name: String,
    pub description: String,
    pub preview_text: String,
    pub font_family: String,
}

/// Everything the form needs to render its steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub logo_categories: Vec<LogoCategory>,
    pub palettes: Vec<Palette>,
    pub typography_styles: Vec<TypographyStyle>,
}

impl Catalog {
    pub fn category(&self, id: &str) -> Option<&LogoCategory> {
        self.logo_categories.iter().find(|c| c.id == id)
    }

    pub fn palette(&self, id: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.id == id)
    }

    pub fn typography(&self, id: &str) -> Option<&TypographyStyle> {
        self.typography_styles.iter().find(|t| t.id == id)
    }
}
