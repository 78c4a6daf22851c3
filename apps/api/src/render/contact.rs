//! Link Normalizer: decides whether a contact value renders as a link and
//! derives its href and display text.
//!
//! # Rules
//! - Website, LinkedIn and GitHub values without `http`/`//` get an `https://` prefix,
//!   whatever prefix the caller passed.
//! - A value is a link only if the effective prefix is `http…`, `mailto:` or `tel:`.
//!   Location ignores the caller's prefix and therefore never links.
//! - Web links display without `http(s)://` and a leading `www.`; the href keeps the full value.

use serde::{Deserialize, Serialize};

const LINK_PREFIXES: [&str; 3] = ["http", "mailto:", "tel:"];
const SECURE_PREFIX: &str = "https://";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Contact rows of the header, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactLabel {
    Email,
    Phone,
    Location,
    Website,
    LinkedIn,
    GitHub,
}

impl ContactLabel {
    pub const HEADER_ORDER: [ContactLabel; 6] = [
        ContactLabel::Email,
        ContactLabel::Phone,
        ContactLabel::Location,
        ContactLabel::Website,
        ContactLabel::LinkedIn,
        ContactLabel::GitHub,
    ];

    /// Prefix the header passes for this label.
    pub fn default_href_prefix(self) -> &'static str {
        match self {
            ContactLabel::Email => "mailto:",
            ContactLabel::Phone => "tel:",
            _ => "",
        }
    }

    pub fn icon(self) -> Icon {
        match self {
            ContactLabel::Email => Icon::Mail,
            ContactLabel::Phone => Icon::Phone,
            ContactLabel::Location => Icon::MapPin,
            ContactLabel::Website => Icon::Globe,
            ContactLabel::LinkedIn => Icon::Linkedin,
            ContactLabel::GitHub => Icon::Github,
        }
    }

    fn is_web(self) -> bool {
        matches!(
            self,
            ContactLabel::Website | ContactLabel::LinkedIn | ContactLabel::GitHub
        )
    }
}

/// Icon identifiers. Backends map these to their own glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Icon {
    Mail,
    Phone,
    MapPin,
    Globe,
    Linkedin,
    Github,
    ExternalLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedContact {
    pub label: ContactLabel,
    pub href: String,
    pub display_text: String,
    pub is_link: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PillKind {
    Github,
    Website,
}

/// Compact project link shown next to a project name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPill {
    pub kind: PillKind,
    pub icon: Icon,
    pub href: String,
    pub display_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Normalizes one contact value. Returns `None` when the value is absent or empty.
pub fn normalize_contact(
    label: ContactLabel,
    value: Option<&str>,
    href_prefix: &str,
) -> Option<RenderedContact> {
    let value = value.filter(|v| !v.is_empty())?;

    let effective_prefix = match label {
        ContactLabel::Location => "",
        _ if label.is_web() && !value.starts_with("http") && !value.starts_with("//") => {
            SECURE_PREFIX
        }
        _ => href_prefix,
    };

    let is_link = LINK_PREFIXES
        .iter()
        .any(|prefix| effective_prefix.starts_with(prefix));

    let display_text = if is_link && label.is_web() {
        strip_scheme_noise(value).to_string()
    } else {
        value.to_string()
    };

    Some(RenderedContact {
        label,
        href: format!("{effective_prefix}{value}"),
        display_text,
        is_link,
    })
}

/// Builds a project link pill. Values without an `http` scheme link via `https://`.
pub fn link_pill(kind: PillKind, value: Option<&str>) -> Option<LinkPill> {
    let value = value.filter(|v| !v.is_empty())?;

    let href = if value.starts_with("http") {
        value.to_string()
    } else {
        format!("{SECURE_PREFIX}{value}")
    };
    let stripped = strip_scheme_noise(value);
    let display_text = stripped.strip_suffix('/').unwrap_or(stripped).to_string();

    let icon = match kind {
        PillKind::Github => Icon::Github,
        PillKind::Website => Icon::ExternalLink,
    };

    Some(LinkPill {
        kind,
        icon,
        href,
        display_text,
    })
}

/// Drops a leading `http://` or `https://`, then a leading `www.`.
pub fn strip_scheme_noise(value: &str) -> &str {
    let without_scheme = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);
    without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme)
}
