// Resume render engine.
// Pure and synchronous: ResumeData + ordered section metadata → Vec<RenderedBlock>.
// No I/O here; policies it does not own (ordering, dates, sanitizing, custom sections)
// come in through the traits in `collaborators`.

pub mod additional;
pub mod collaborators;
pub mod compose;
pub mod contact;
pub mod section;

use crate::render::additional::AdditionalLabels;
use crate::render::collaborators::{CustomSectionRenderer, DateRangeFormatter, HtmlSanitizer};

// Re-export the public API consumed by handlers and library users.
pub use additional::{render_entries, AdditionalLabelOverrides, EntryPlan};
pub use compose::{ComposeOptions, Composer, RenderedBlock};
pub use contact::{normalize_contact, ContactLabel, RenderedContact};
pub use section::{render_section, RenderedSection, SectionBody};

/// Borrowed collaborators and resolved labels for one render pass.
pub struct RenderContext<'a> {
    pub labels: &'a AdditionalLabels,
    pub dates: &'a dyn DateRangeFormatter,
    pub sanitizer: &'a dyn HtmlSanitizer,
    pub custom: &'a dyn CustomSectionRenderer,
}
