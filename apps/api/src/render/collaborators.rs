//! Seams between the render engine and the policies it does not own: section
//! ordering, date-range text, markup sanitization and custom sections.
//!
//! Each seam is an object-safe trait so `Composer` can hold any implementation
//! behind an `Arc`. A default implementation ships for every trait.

use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::errors::RenderError;
use crate::models::resume::{
    default_section_meta, humanize_section_id, CustomSection, ResumeData, SectionMeta,
};
use crate::render::section::{non_empty, CustomItemView, RenderedSection, SectionBody};

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

/// Supplies the visible sections of a record in display order.
pub trait SectionOrdering: Send + Sync {
    fn sorted_sections(&self, data: &ResumeData) -> Vec<SectionMeta>;
}

/// Renders a `years` descriptor. Errors propagate to the caller of `compose` unchanged.
pub trait DateRangeFormatter: Send + Sync {
    fn format_range(&self, years: &str) -> Result<String, RenderError>;
}

/// Neutralizes markup in free-text bullets.
pub trait HtmlSanitizer: Send + Sync {
    fn sanitize(&self, raw: &str) -> SafeFragment;
}

/// Renders sections whose key is outside the built-in set and whose `is_default` is false.
pub trait CustomSectionRenderer: Send + Sync {
    fn render_custom(
        &self,
        meta: &SectionMeta,
        data: &ResumeData,
    ) -> Result<Option<RenderedSection>, RenderError>;
}

/// Markup that has passed through an `HtmlSanitizer` and is safe to emit verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeFragment(String);

impl SafeFragment {
    /// Wraps already-sanitized markup. Only sanitizers should call this.
    pub fn from_sanitized(markup: String) -> Self {
        SafeFragment(markup)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section ordering
// ────────────────────────────────────────────────────────────────────────────

/// Orders by `SectionMeta::order` (stable) and drops hidden sections.
///
/// Records without `sectionMeta` get the built-in default list followed by one
/// section per custom payload, in id order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaOrdering;

impl SectionOrdering for MetaOrdering {
    fn sorted_sections(&self, data: &ResumeData) -> Vec<SectionMeta> {
        let mut sections = if data.section_meta.is_empty() {
            implied_section_meta(data)
        } else {
            data.section_meta.clone()
        };
        sections.retain(|section| section.is_visible);
        sections.sort_by_key(|section| section.order);
        sections
    }
}

fn implied_section_meta(data: &ResumeData) -> Vec<SectionMeta> {
    let mut sections = default_section_meta();
    let first_custom_order = sections.len() as i32;
    sections.extend(data.custom_sections.keys().enumerate().map(|(i, id)| {
        SectionMeta::custom(id, &humanize_section_id(id), first_custom_order + i as i32)
    }));
    sections
}

// ────────────────────────────────────────────────────────────────────────────
// Date ranges
// ────────────────────────────────────────────────────────────────────────────

static RANGE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+-\s*|\s*-\s+|\s*[–—]\s*").expect("Invalid range separator regex"));

static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("Invalid year-month regex"));

const OPEN_ENDED: [&str; 3] = ["present", "current", "ongoing"];

/// Formats `"YYYY - YYYY"`-style descriptors.
///
/// - sides split on a spaced `-`, `–` or `—`; at most two
/// - a hyphen needs whitespace on at least one side, so `YYYY-MM` stays whole
/// - `Present`/`Current`/`Ongoing` (any case) → `Present`
/// - `YYYY-MM` → `Mon YYYY`
/// - anything else is kept verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct YearRangeFormatter;

impl DateRangeFormatter for YearRangeFormatter {
    fn format_range(&self, years: &str) -> Result<String, RenderError> {
        let trimmed = years.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let sides: Vec<&str> = RANGE_SEPARATOR.split(trimmed).map(str::trim).collect();
        if sides.len() > 2 {
            return Err(malformed(years, "expected at most a start and an end"));
        }

        let formatted = sides
            .into_iter()
            .map(|side| format_side(years, side))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(formatted.join(" - "))
    }
}

fn format_side(input: &str, side: &str) -> Result<String, RenderError> {
    if side.is_empty() {
        return Err(malformed(input, "range has an empty side"));
    }

    if OPEN_ENDED.iter().any(|word| side.eq_ignore_ascii_case(word)) {
        return Ok("Present".to_string());
    }

    if let Some(caps) = YEAR_MONTH.captures(side) {
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| malformed(input, "year is not a number"))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| malformed(input, "month is not a number"))?;
        let date = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| malformed(input, "month out of range"))?;
        return Ok(date.format("%b %Y").to_string());
    }

    Ok(side.to_string())
}

fn malformed(input: &str, reason: &str) -> RenderError {
    RenderError::MalformedDateRange {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sanitization
// ────────────────────────────────────────────────────────────────────────────

/// Attribute-free tags only; anything carrying attributes never matches and is escaped.
static SIMPLE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*(/?)\s*([A-Za-z][A-Za-z0-9]*)\s*/?\s*>").expect("Invalid tag regex")
});

const INLINE_TAGS: [&str; 6] = ["b", "strong", "i", "em", "u", "br"];

/// Escapes all markup except bare inline emphasis tags (`b`, `strong`, `i`, `em`, `u`, `br`).
///
/// Output is always balanced: a close tag that does not match the innermost
/// open tag is escaped, and tags still open at the end are closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineMarkupSanitizer;

impl HtmlSanitizer for InlineMarkupSanitizer {
    fn sanitize(&self, raw: &str) -> SafeFragment {
        let mut out = String::with_capacity(raw.len());
        let mut open: Vec<String> = Vec::new();
        let mut last = 0;

        for caps in SIMPLE_TAG.captures_iter(raw) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&escape_text(&raw[last..whole.start()]));
            match inline_tag(&caps) {
                Some(InlineTag::Break) => out.push_str("<br>"),
                Some(InlineTag::Open(name)) => {
                    out.push_str(&format!("<{name}>"));
                    open.push(name);
                }
                Some(InlineTag::Close(name)) if open.last() == Some(&name) => {
                    out.push_str(&format!("</{name}>"));
                    open.pop();
                }
                Some(InlineTag::Close(_)) | None => out.push_str(&escape_text(whole.as_str())),
            }
            last = whole.end();
        }
        out.push_str(&escape_text(&raw[last..]));

        while let Some(name) = open.pop() {
            out.push_str(&format!("</{name}>"));
        }

        SafeFragment::from_sanitized(out)
    }
}

enum InlineTag {
    Break,
    Open(String),
    Close(String),
}

fn inline_tag(caps: &Captures<'_>) -> Option<InlineTag> {
    let name = caps[2].to_ascii_lowercase();
    if !INLINE_TAGS.contains(&name.as_str()) {
        return None;
    }
    if name == "br" {
        return Some(InlineTag::Break);
    }
    if &caps[1] == "/" {
        return Some(InlineTag::Close(name));
    }
    Some(InlineTag::Open(name))
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ────────────────────────────────────────────────────────────────────────────
// Custom sections
// ────────────────────────────────────────────────────────────────────────────

/// Renders nothing. For callers that do not support custom sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomSections;

impl CustomSectionRenderer for NoCustomSections {
    fn render_custom(
        &self,
        _meta: &SectionMeta,
        _data: &ResumeData,
    ) -> Result<Option<RenderedSection>, RenderError> {
        Ok(None)
    }
}

/// Renders the `customSections` payload stored under the section's id.
pub struct PayloadSectionRenderer {
    dates: Arc<dyn DateRangeFormatter>,
    sanitizer: Arc<dyn HtmlSanitizer>,
}

impl PayloadSectionRenderer {
    pub fn new(dates: Arc<dyn DateRangeFormatter>, sanitizer: Arc<dyn HtmlSanitizer>) -> Self {
        PayloadSectionRenderer { dates, sanitizer }
    }
}

impl CustomSectionRenderer for PayloadSectionRenderer {
    fn render_custom(
        &self,
        meta: &SectionMeta,
        data: &ResumeData,
    ) -> Result<Option<RenderedSection>, RenderError> {
        let Some(payload) = data.custom_sections.get(&meta.id) else {
            tracing::debug!(id = %meta.id, "no payload for custom section");
            return Ok(None);
        };

        let body = match payload {
            CustomSection::Text { text } => {
                (!text.trim().is_empty()).then(|| SectionBody::CustomText { text: text.clone() })
            }
            CustomSection::StringList { strings } => (!strings.is_empty()).then(|| {
                SectionBody::CustomStrings {
                    strings: strings.clone(),
                }
            }),
            CustomSection::ItemList { items } if items.is_empty() => None,
            CustomSection::ItemList { items } => {
                let items = items
                    .iter()
                    .map(|item| {
                        let date_range = match non_empty(item.years.as_deref()) {
                            Some(years) => Some(self.dates.format_range(years)?),
                            None => None,
                        };
                        Ok(CustomItemView {
                            id: item.id.clone(),
                            title: item.title.clone(),
                            subtitle: non_empty(item.subtitle.as_deref()).map(str::to_string),
                            date_range,
                            bullets: item
                                .description
                                .iter()
                                .map(|bullet| self.sanitizer.sanitize(bullet))
                                .collect(),
                        })
                    })
                    .collect::<Result<Vec<_>, RenderError>>()?;
                Some(SectionBody::CustomItems { items })
            }
        };

        let title = if meta.display_name.is_empty() {
            humanize_section_id(&meta.id)
        } else {
            meta.display_name.clone()
        };

        Ok(body.map(|body| RenderedSection {
            id: meta.id.clone(),
            key: meta.key.clone(),
            title,
            body,
        }))
    }
}
