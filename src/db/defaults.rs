//! Default catalog inserted into an empty database.

use crate::models::{Catalog, LogoCategory, LogoOption, Palette, TypographyStyle};

/// (id, title, description, option id prefix, option images)
const LOGO_CATEGORIES: &[(&str, &str, &str, &str, [&str; 4])] = &[
    (
        "minimalist",
        "Minimalist",
        "Clean, simple styles focused on visual clarity",
        "min",
        ["clean-minimalist", "flat", "geometric", "typographic"],
    ),
    (
        "luxury",
        "Luxury & Elegant",
        "Sophisticated styles that convey exclusivity and refinement",
        "lux",
        ["luxury", "clean-minimalist", "typographic", "vintage"],
    ),
    (
        "modern",
        "Modern & Contemporary",
        "Current designs reflecting trends and innovation",
        "mod",
        ["3d", "abstract", "geometric", "flat"],
    ),
    (
        "organic",
        "Organic & Natural",
        "Fluid, natural shapes that convey authenticity",
        "org",
        ["organic", "illustration", "feminine", "playful"],
    ),
    (
        "vintage",
        "Vintage & Retro",
        "Nostalgic styles inspired by past decades",
        "vin",
        ["vintage", "grunge", "typographic", "masculine"],
    ),
    (
        "playful",
        "Playful & Casual",
        "Cheerful designs that convey positive energy",
        "fun",
        ["playful", "illustration", "feminine", "3d"],
    ),
];

/// (id, name, colors)
const PALETTES: &[(&str, &str, [&str; 5])] = &[
    (
        "neutral",
        "Neutral & Elegant",
        ["#1a1a1a", "#4a4a4a", "#8a8a8a", "#d4d4d4", "#f5f5f5"],
    ),
    (
        "warm",
        "Warm & Welcoming",
        ["#8B4513", "#D2691E", "#F4A460", "#FFDAB9", "#FFF8DC"],
    ),
    (
        "cool",
        "Cool & Professional",
        ["#1e3a5f", "#3d5a80", "#98c1d9", "#e0fbfc", "#ffffff"],
    ),
    (
        "nature",
        "Natural & Organic",
        ["#2d4a3e", "#4a7c59", "#8fbc8f", "#c8e6c9", "#f1f8e9"],
    ),
    (
        "luxury",
        "Luxury & Sophisticated",
        ["#1a1a1a", "#333333", "#8b6914", "#d4af37", "#f5f5dc"],
    ),
    (
        "vibrant",
        "Vibrant & Modern",
        ["#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#ffeaa7"],
    ),
    (
        "pastel",
        "Pastel & Soft",
        ["#ffb3ba", "#ffdfba", "#ffffba", "#baffc9", "#bae1ff"],
    ),
    (
        "monochrome",
        "Monochrome",
        ["#0d47a1", "#1976d2", "#42a5f5", "#90caf9", "#e3f2fd"],
    ),
];

/// (id, name, description, preview, font family)
const TYPOGRAPHY: &[(&str, &str, &str, &str, &str)] = &[
    (
        "serif-classic",
        "Classic Serif",
        "Conveys tradition, elegance and reliability",
        "Playfair Display",
        "'Playfair Display', serif",
    ),
    (
        "sans-modern",
        "Modern Sans-Serif",
        "Clean, contemporary and versatile",
        "DM Sans",
        "'DM Sans', sans-serif",
    ),
    (
        "geometric",
        "Geometric",
        "Minimal, technical and precise",
        "Poppins",
        "'Poppins', sans-serif",
    ),
    (
        "handwritten",
        "Handwritten",
        "Personal, artistic and unique",
        "Dancing Script",
        "'Dancing Script', cursive",
    ),
    (
        "bold-impact",
        "Bold & Impactful",
        "Strong, striking and daring",
        "Oswald",
        "'Oswald', sans-serif",
    ),
    (
        "elegant-thin",
        "Elegant & Thin",
        "Sophisticated, light and refined",
        "Cormorant Garamond",
        "'Cormorant Garamond', serif",
    ),
];

/// Build the default catalog in display order.
pub fn default_catalog() -> Catalog {
    let logo_categories = LOGO_CATEGORIES
        .iter()
        .map(|(id, title, description, prefix, images)| LogoCategory {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            options: images
                .iter()
                .enumerate()
                .map(|(i, image)| LogoOption {
                    id: format!("{}-{}", prefix, i + 1),
                    image: format!("/assets/styles/{}.jpg", image),
                    alt_text: format!("{} option {}", title, i + 1),
                })
                .collect(),
        })
        .collect();

    let palettes = PALETTES
        .iter()
        .map(|(id, name, colors)| Palette {
            id: id.to_string(),
            name: name.to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        })
        .collect();

    let typography_styles = TYPOGRAPHY
        .iter()
        .map(
            |(id, name, description, preview, font_family)| TypographyStyle {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                preview_text: preview.to_string(),
                font_family: font_family.to_string(),
            },
        )
        .collect();

    Catalog {
        logo_categories,
        palettes,
        typography_styles,
    }
}
