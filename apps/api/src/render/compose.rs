//! Document Composer: header first, then every dispatched section in the
//! order the `SectionOrdering` collaborator supplies.
//!
//! The composer never sorts or deduplicates. Two metas with the same key
//! produce two sections.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::RenderError;
use crate::models::resume::{PersonalInfo, ResumeData, SectionKey, SectionMeta};
use crate::render::additional::{AdditionalLabelOverrides, AdditionalLabels};
use crate::render::collaborators::{
    CustomSectionRenderer, DateRangeFormatter, HtmlSanitizer, InlineMarkupSanitizer,
    MetaOrdering, PayloadSectionRenderer, SectionOrdering, YearRangeFormatter,
};
use crate::render::contact::{normalize_contact, ContactLabel, Icon, RenderedContact};
use crate::render::section::{non_empty, render_section, RenderedSection};
use crate::render::RenderContext;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "camelCase")]
pub enum RenderedBlock {
    Header(HeaderBlock),
    Section(RenderedSection),
}

/// Centered document header built from `PersonalInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderBlock {
    /// Uppercased.
    pub name: Option<String>,
    pub title: Option<String>,
    pub contacts: Vec<ContactRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRow {
    pub contact: RenderedContact,
    /// Present only when contact icons are enabled.
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeOptions {
    #[serde(default)]
    pub show_contact_icons: bool,
    #[serde(default)]
    pub additional_section_labels: AdditionalLabelOverrides,
}

// ────────────────────────────────────────────────────────────────────────────
// Composer
// ────────────────────────────────────────────────────────────────────────────

/// Render engine with its collaborators wired in. Stateless; share via `Arc`.
pub struct Composer {
    ordering: Arc<dyn SectionOrdering>,
    dates: Arc<dyn DateRangeFormatter>,
    sanitizer: Arc<dyn HtmlSanitizer>,
    custom: Arc<dyn CustomSectionRenderer>,
    labels: AdditionalLabels,
}

impl Default for Composer {
    fn default() -> Self {
        let dates: Arc<dyn DateRangeFormatter> = Arc::new(YearRangeFormatter);
        let sanitizer: Arc<dyn HtmlSanitizer> = Arc::new(InlineMarkupSanitizer);
        let custom = Arc::new(PayloadSectionRenderer::new(dates.clone(), sanitizer.clone()));
        Composer::new(Arc::new(MetaOrdering), dates, sanitizer, custom)
    }
}

impl Composer {
    pub fn new(
        ordering: Arc<dyn SectionOrdering>,
        dates: Arc<dyn DateRangeFormatter>,
        sanitizer: Arc<dyn HtmlSanitizer>,
        custom: Arc<dyn CustomSectionRenderer>,
    ) -> Self {
        Composer {
            ordering,
            dates,
            sanitizer,
            custom,
            labels: AdditionalLabels::default(),
        }
    }

    /// Replaces the base labels that per-call overrides are layered onto.
    pub fn with_labels(mut self, labels: AdditionalLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Renders a record using the ordering collaborator's section list.
    pub fn compose(
        &self,
        data: &ResumeData,
        options: &ComposeOptions,
    ) -> Result<Vec<RenderedBlock>, RenderError> {
        let sections = self.ordering.sorted_sections(data);
        self.compose_with_sections(data, &sections, options)
    }

    /// Renders a record against an explicit, already ordered section list.
    pub fn compose_with_sections(
        &self,
        data: &ResumeData,
        sections: &[SectionMeta],
        options: &ComposeOptions,
    ) -> Result<Vec<RenderedBlock>, RenderError> {
        let labels = self.labels.with_overrides(&options.additional_section_labels);
        let ctx = RenderContext {
            labels: &labels,
            dates: self.dates.as_ref(),
            sanitizer: self.sanitizer.as_ref(),
            custom: self.custom.as_ref(),
        };
        compose_sections(data, sections, options, &ctx)
    }
}

/// Header (when `personal_info` is present) followed by each non-header section
/// that has content, in the given order.
pub fn compose_sections(
    data: &ResumeData,
    sections: &[SectionMeta],
    options: &ComposeOptions,
    ctx: &RenderContext<'_>,
) -> Result<Vec<RenderedBlock>, RenderError> {
    let mut blocks = Vec::with_capacity(sections.len() + 1);

    if let Some(info) = &data.personal_info {
        blocks.push(RenderedBlock::Header(render_header(
            info,
            options.show_contact_icons,
        )));
    }

    for meta in sections
        .iter()
        .filter(|meta| meta.key != SectionKey::PersonalInfo)
    {
        if let Some(section) = render_section(meta, data, ctx)? {
            blocks.push(RenderedBlock::Section(section));
        }
    }

    debug!(
        blocks = blocks.len(),
        sections = sections.len(),
        "composed resume document"
    );
    Ok(blocks)
}

/// Builds the header: uppercased name and title, then contacts in
/// `ContactLabel::HEADER_ORDER`.
pub fn render_header(info: &PersonalInfo, show_contact_icons: bool) -> HeaderBlock {
    let value_for = |label: ContactLabel| match label {
        ContactLabel::Email => info.email.as_deref(),
        ContactLabel::Phone => info.phone.as_deref(),
        ContactLabel::Location => info.location.as_deref(),
        ContactLabel::Website => info.website.as_deref(),
        ContactLabel::LinkedIn => info.linkedin.as_deref(),
        ContactLabel::GitHub => info.github.as_deref(),
    };

    let contacts = ContactLabel::HEADER_ORDER
        .into_iter()
        .filter_map(|label| {
            normalize_contact(label, value_for(label), label.default_href_prefix()).map(
                |contact| ContactRow {
                    contact,
                    icon: show_contact_icons.then(|| label.icon()),
                },
            )
        })
        .collect();

    HeaderBlock {
        name: non_empty(info.name.as_deref()).map(str::to_uppercase),
        title: non_empty(info.title.as_deref()).map(str::to_uppercase),
        contacts,
    }
}
