// Resume Render: section composition and field formatting for resume documents.
// The engine lives in `render`; `routes` exposes it over HTTP.

pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod routes;
pub mod state;

pub use errors::{AppError, RenderError};
pub use models::resume::{ResumeData, SectionKey, SectionMeta};
pub use render::{ComposeOptions, Composer, RenderedBlock};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
