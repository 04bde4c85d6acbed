//! Utility functions and helpers.

pub mod http;
pub mod log;

use url::Url;

use crate::error::{AppError, Result};

/// Parse and validate a check target.
///
/// Only absolute `http`/`https` URLs with a host are accepted.
pub fn parse_target(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_target(raw, "URL is empty"));
    }

    let url = Url::parse(trimmed).map_err(|e| AppError::invalid_target(raw, e))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::invalid_target(
                raw,
                format!("unsupported scheme '{other}'"),
            ));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::invalid_target(raw, "URL has no host"));
    }

    Ok(url)
}
