//! Command implementations.

pub mod assets;
pub mod boutiques;
pub mod products;
pub mod profile;

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;
use wardrobe_storefront::{ConfigError, StorefrontError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error("Empty file ID")]
    EmptyFileId,

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Where command results go: text or JSON on stdout.
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or the text from `render`.
    pub fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        render: impl FnOnce(&T) -> String,
    ) -> Result<(), CliError> {
        let text = if self.json {
            serde_json::to_string_pretty(value)?
        } else {
            render(value)
        };
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text.trim_end())?;
        Ok(())
    }
}

/// Placeholder for fields Directus returned as null.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
