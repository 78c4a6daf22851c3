use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Entry identity
// ────────────────────────────────────────────────────────────────────────────

/// Stable render key of a resume entry. Clients send either numeric ids
/// (`1`, `2`, ...) or opaque strings; both are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{n}"),
            EntryId::Text(s) => f.write_str(s),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume record
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: EntryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    pub location: Option<String>,
    /// Date-range descriptor, e.g. `"2020 - Present"`. Rendered by a `DateRangeFormatter`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub years: String,
    /// Bullet points; may contain inline markup that is sanitized before display.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalProject {
    pub id: EntryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub role: Option<String>,
    pub years: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: EntryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub years: String,
    pub description: Option<String>,
}

/// Free-form categories. Entries are plain phrases or `"Label: value"` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub technical_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications_training: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub awards: Vec<String>,
}

/// A single row of an `itemList` custom section (publications, research, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomItem {
    pub id: EntryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub subtitle: Option<String>,
    pub years: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: Vec<String>,
}

/// Payload of a user-defined section, keyed by section id in `ResumeData::custom_sections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sectionType", rename_all = "camelCase")]
pub enum CustomSection {
    Text {
        #[serde(default, deserialize_with = "null_as_default")]
        text: String,
    },
    ItemList {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<CustomItem>,
    },
    StringList {
        #[serde(default, deserialize_with = "null_as_default")]
        strings: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub personal_info: Option<PersonalInfo>,
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personal_projects: Vec<PersonalProject>,
    pub additional: Option<AdditionalInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_meta: Vec<SectionMeta>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_sections: BTreeMap<String, CustomSection>,
}

// ────────────────────────────────────────────────────────────────────────────
// Section metadata
// ────────────────────────────────────────────────────────────────────────────

/// Key of a document section. The six built-in keys are closed; anything else
/// is carried as `Custom` and rendered by a `CustomSectionRenderer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionKey {
    PersonalInfo,
    Summary,
    WorkExperience,
    PersonalProjects,
    Education,
    Additional,
    Custom(String),
}

impl SectionKey {
    pub fn as_str(&self) -> &str {
        match self {
            SectionKey::PersonalInfo => "personalInfo",
            SectionKey::Summary => "summary",
            SectionKey::WorkExperience => "workExperience",
            SectionKey::PersonalProjects => "personalProjects",
            SectionKey::Education => "education",
            SectionKey::Additional => "additional",
            SectionKey::Custom(key) => key,
        }
    }
}

impl From<&str> for SectionKey {
    fn from(key: &str) -> Self {
        match key {
            "personalInfo" => SectionKey::PersonalInfo,
            "summary" => SectionKey::Summary,
            "workExperience" => SectionKey::WorkExperience,
            "personalProjects" => SectionKey::PersonalProjects,
            "education" => SectionKey::Education,
            "additional" => SectionKey::Additional,
            other => SectionKey::Custom(other.to_string()),
        }
    }
}

impl From<String> for SectionKey {
    fn from(key: String) -> Self {
        SectionKey::from(key.as_str())
    }
}

impl From<SectionKey> for String {
    fn from(key: SectionKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity, label and placement of one section.
///
/// `order` and `is_visible` belong to the `SectionOrdering` collaborator;
/// the dispatcher and composer never read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionMeta {
    pub id: String,
    pub key: SectionKey,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl SectionMeta {
    /// A visible built-in section whose id equals its key.
    pub fn builtin(key: SectionKey, display_name: &str, order: i32) -> Self {
        SectionMeta {
            id: key.as_str().to_string(),
            key,
            display_name: display_name.to_string(),
            is_default: true,
            order,
            is_visible: true,
        }
    }

    /// A visible user-defined section. The key is the section id.
    pub fn custom(id: &str, display_name: &str, order: i32) -> Self {
        SectionMeta {
            id: id.to_string(),
            key: SectionKey::from(id),
            display_name: display_name.to_string(),
            is_default: false,
            order,
            is_visible: true,
        }
    }
}

/// Built-in sections in their default order, used when a record carries no `sectionMeta`.
pub fn default_section_meta() -> Vec<SectionMeta> {
    vec![
        SectionMeta::builtin(SectionKey::PersonalInfo, "Personal Info", 0),
        SectionMeta::builtin(SectionKey::Summary, "Summary", 1),
        SectionMeta::builtin(SectionKey::WorkExperience, "Experience", 2),
        SectionMeta::builtin(SectionKey::Education, "Education", 3),
        SectionMeta::builtin(SectionKey::PersonalProjects, "Projects", 4),
        SectionMeta::builtin(SectionKey::Additional, "Technical Skills & Designations", 5),
    ]
}

/// `"volunteer_work"` → `"Volunteer Work"`.
pub fn humanize_section_id(id: &str) -> String {
    id.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── deserialization ─────────────────────────────────────────────────────

    #[test]
    fn test_parses_full_record_in_client_shape() {
        let value = json!({
            "personalInfo": {
                "name": "John Doe",
                "title": "Software Engineer",
                "email": "john@example.com",
                "linkedin": "linkedin.com/in/johndoe"
            },
            "summary": "Experienced software engineer",
            "workExperience": [{
                "id": 1,
                "title": "Senior Software Engineer",
                "company": "Tech Corp",
                "location": "San Francisco, CA",
                "years": "2020 - Present",
                "description": ["Led development of microservices architecture"]
            }],
            "education": [{
                "id": 1,
                "institution": "University of California",
                "degree": "B.S. Computer Science",
                "years": "2014 - 2018",
                "description": "Graduated with honors"
            }],
            "personalProjects": [{
                "id": "proj-1",
                "name": "Open Source Tool",
                "role": "Creator & Maintainer",
                "years": "2021 - Present",
                "description": ["Built CLI tool"]
            }],
            "additional": {
                "technicalSkills": ["Python", "JavaScript"],
                "languages": ["English (Native)"]
            },
            "customSections": {
                "volunteer_work": { "sectionType": "text", "text": "Food bank" },
                "hobbies": { "sectionType": "stringList", "strings": ["Chess"] }
            }
        });

        let data: ResumeData = serde_json::from_value(value).expect("record should parse");
        assert_eq!(data.work_experience[0].id, EntryId::Number(1));
        assert_eq!(data.personal_projects[0].id, EntryId::Text("proj-1".to_string()));
        let additional = data.additional.expect("additional present");
        assert!(additional.certifications_training.is_empty());
        assert!(additional.awards.is_empty());
        assert_eq!(
            data.custom_sections.get("volunteer_work"),
            Some(&CustomSection::Text {
                text: "Food bank".to_string()
            })
        );
        assert!(data.section_meta.is_empty());
    }

    #[test]
    fn test_null_collections_treated_as_empty() {
        let value = json!({
            "workExperience": null,
            "education": null,
            "additional": { "technicalSkills": null, "awards": ["Best Paper"] }
        });
        let data: ResumeData = serde_json::from_value(value).expect("nulls should parse");
        assert!(data.work_experience.is_empty());
        assert!(data.education.is_empty());
        let additional = data.additional.expect("additional present");
        assert!(additional.technical_skills.is_empty());
        assert_eq!(additional.awards, vec!["Best Paper".to_string()]);
    }

    // ── section keys ────────────────────────────────────────────────────────

    #[test]
    fn test_section_key_known_and_custom() {
        assert_eq!(SectionKey::from("workExperience"), SectionKey::WorkExperience);
        assert_eq!(
            SectionKey::from("publications"),
            SectionKey::Custom("publications".to_string())
        );
        assert_eq!(SectionKey::Additional.as_str(), "additional");
    }

    #[test]
    fn test_section_meta_defaults_visible_and_not_default() {
        let meta: SectionMeta = serde_json::from_value(json!({
            "id": "publications",
            "key": "publications",
            "displayName": "Publications"
        }))
        .expect("meta should parse");
        assert!(meta.is_visible);
        assert!(!meta.is_default);
        assert_eq!(meta.order, 0);
        assert_eq!(meta.key, SectionKey::Custom("publications".to_string()));

        let out = serde_json::to_value(&meta).expect("meta should serialize");
        assert_eq!(out["key"], "publications");
        assert_eq!(out["displayName"], "Publications");
    }

    #[test]
    fn test_default_section_meta_starts_with_header() {
        let metas = default_section_meta();
        assert_eq!(metas.len(), 6);
        assert_eq!(metas[0].key, SectionKey::PersonalInfo);
        assert!(metas.iter().all(|m| m.is_default && m.is_visible));
    }

    #[test]
    fn test_humanize_section_id() {
        assert_eq!(humanize_section_id("volunteer_work"), "Volunteer Work");
        assert_eq!(humanize_section_id("publications"), "Publications");
        assert_eq!(humanize_section_id("open-source__talks"), "Open Source Talks");
    }
}
