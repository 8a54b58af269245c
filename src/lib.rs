//! ainalyzer: structured-response parsing and annotation overlays for AI
//! accessibility analysis of UI screenshots.
//!
//! A vision model answers with prose followed by a JSON list of annotated
//! regions. This crate splits that reply, decodes the regions into
//! validated percentage boxes, parses the prose and each region's
//! description into structured blocks, and keeps the overlay state a host
//! needs to draw the boxes over the screenshot.
//!
//! Domains:
//!   - response/: split the reply, decode annotations
//!   - text/    : numbered sections, inline fields, parse cache
//!   - overlay/ : results, colors, visibility, selection
//!   - llm/     : provider seam, prompts, analysis pipeline
//!   - config.rs: settings file + env overrides

pub mod config;
pub mod error;
pub mod llm;
pub mod overlay;
pub mod response;
pub mod text;

pub use config::Settings;
pub use error::{AnalysisError, ConfigError, ParseWarning, PayloadError, ProviderError};
pub use overlay::AnnotationOverlay;
pub use response::{Annotation, AnnotationType, AnalysisResult};
pub use text::ParseCache;

/// Install the `env_logger` backend. Safe to call more than once.
pub fn init_logging() {
    if env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .is_ok()
    {
        log::debug!("[STARTUP] Logger initialized");
    }
}

/// Load `.env.local`, or `.env` if there is no `.env.local`, from the
/// current directory. Returns the file that was loaded.
pub fn load_env() -> Option<std::path::PathBuf> {
    load_env_from(std::path::Path::new("."))
}

pub fn load_env_from(dir: &std::path::Path) -> Option<std::path::PathBuf> {
    for env_file in [".env.local", ".env"] {
        let path = dir.join(env_file);
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(_) => log::info!("[STARTUP] Loaded {}", path.display()),
                Err(e) => log::warn!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            return Some(path);
        }
    }
    None
}
