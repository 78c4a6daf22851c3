use anyhow::{bail, Context, Result};

use crate::render::AdditionalLabelOverrides;

/// Service configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Default for `showContactIcons` when a render request omits it.
    pub show_contact_icons: bool,
    /// Server-wide label overrides; per-request overrides are layered on top.
    pub label_overrides: AdditionalLabelOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            show_contact_icons: false,
            label_overrides: AdditionalLabelOverrides::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            show_contact_icons: match optional_env("RENDER_SHOW_CONTACT_ICONS") {
                Some(raw) => parse_flag(&raw)
                    .context("RENDER_SHOW_CONTACT_ICONS must be true/false/1/0")?,
                None => false,
            },
            label_overrides: AdditionalLabelOverrides {
                technical_skills: optional_env("RENDER_LABEL_TECHNICAL_SKILLS"),
                languages: optional_env("RENDER_LABEL_LANGUAGES"),
                certifications: optional_env("RENDER_LABEL_CERTIFICATIONS"),
                awards: optional_env("RENDER_LABEL_AWARDS"),
            },
        })
    }
}

/// Unset and empty variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => bail!("unrecognized flag value '{other}'"),
    }
}
