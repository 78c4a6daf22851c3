//! Additional-Info Categorizer: turns free-form skill/language/certification/award
//! entries into a render plan.
//!
//! An entry list uses the *subcategory convention* when any entry contains `": "`
//! (e.g. `"Languages: English, French"`). Such lists render as a header plus one
//! labeled row per entry; all other lists render as a single comma-joined row.

use serde::{Deserialize, Serialize};

use crate::models::resume::AdditionalInfo;

const SUBCATEGORY_SEPARATOR: &str = ": ";

// ────────────────────────────────────────────────────────────────────────────
// Plan types
// ────────────────────────────────────────────────────────────────────────────

/// Render plan for one category of additional info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntryPlan {
    /// Bold header followed by indented rows.
    Grouped { header: String, rows: Vec<CategoryRow> },
    /// Bold label followed by every entry joined with `", "`.
    Flat { label: String, joined: String },
}

/// One row of a grouped plan. `label` keeps its trailing colon; rows without
/// the convention have no label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub label: Option<String>,
    pub value: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Labels
// ────────────────────────────────────────────────────────────────────────────

/// Fallback labels for the four categories and the section title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalLabels {
    pub technical_skills: String,
    pub languages: String,
    pub certifications: String,
    pub awards: String,
    /// Used when the section meta carries no display name.
    pub section_title: String,
}

impl Default for AdditionalLabels {
    fn default() -> Self {
        AdditionalLabels {
            technical_skills: "Technical Skills:".to_string(),
            languages: "Languages:".to_string(),
            certifications: "Professional Certifications:".to_string(),
            awards: "Professional Designations:".to_string(),
            section_title: "Technical Skills & Designations".to_string(),
        }
    }
}

impl AdditionalLabels {
    /// Returns a copy with every provided override substituted.
    pub fn with_overrides(&self, overrides: &AdditionalLabelOverrides) -> Self {
        let pick = |over: &Option<String>, base: &String| over.clone().unwrap_or_else(|| base.clone());
        AdditionalLabels {
            technical_skills: pick(&overrides.technical_skills, &self.technical_skills),
            languages: pick(&overrides.languages, &self.languages),
            certifications: pick(&overrides.certifications, &self.certifications),
            awards: pick(&overrides.awards, &self.awards),
            section_title: self.section_title.clone(),
        }
    }
}

/// Partial label map supplied by callers (server config or request body).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalLabelOverrides {
    pub technical_skills: Option<String>,
    pub languages: Option<String>,
    pub certifications: Option<String>,
    pub awards: Option<String>,
}

impl AdditionalLabelOverrides {
    /// Layers `top` over `self`: fields set in `top` win.
    pub fn layered(&self, top: &AdditionalLabelOverrides) -> Self {
        AdditionalLabelOverrides {
            technical_skills: top.technical_skills.clone().or_else(|| self.technical_skills.clone()),
            languages: top.languages.clone().or_else(|| self.languages.clone()),
            certifications: top.certifications.clone().or_else(|| self.certifications.clone()),
            awards: top.awards.clone().or_else(|| self.awards.clone()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Categorization
// ────────────────────────────────────────────────────────────────────────────

/// Plans one category. Returns `None` for an empty entry list.
pub fn render_entries(entries: &[String], fallback_label: &str) -> Option<EntryPlan> {
    if entries.is_empty() {
        return None;
    }

    let has_subcategories = entries
        .iter()
        .any(|entry| entry.contains(SUBCATEGORY_SEPARATOR));

    if !has_subcategories {
        return Some(EntryPlan::Flat {
            label: fallback_label.to_string(),
            joined: entries.join(", "),
        });
    }

    let rows = entries.iter().map(|entry| split_entry(entry)).collect();
    Some(EntryPlan::Grouped {
        header: fallback_label.to_string(),
        rows,
    })
}

/// Splits at the first `": "` only; anything after it, further colons included,
/// is the value.
fn split_entry(entry: &str) -> CategoryRow {
    match entry.find(SUBCATEGORY_SEPARATOR) {
        Some(idx) => CategoryRow {
            label: Some(entry[..=idx].to_string()),
            value: entry[idx + SUBCATEGORY_SEPARATOR.len()..].to_string(),
        },
        None => CategoryRow {
            label: None,
            value: entry.to_string(),
        },
    }
}

/// Plans all four categories in fixed order. Returns `None` when every category is empty.
pub fn render_additional(
    additional: &AdditionalInfo,
    labels: &AdditionalLabels,
) -> Option<Vec<EntryPlan>> {
    let categories: Vec<EntryPlan> = [
        render_entries(&additional.technical_skills, &labels.technical_skills),
        render_entries(&additional.languages, &labels.languages),
        render_entries(&additional.certifications_training, &labels.certifications),
        render_entries(&additional.awards, &labels.awards),
    ]
    .into_iter()
    .flatten()
    .collect();

    if categories.is_empty() {
        None
    } else {
        Some(categories)
    }
}
