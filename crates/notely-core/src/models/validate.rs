//! Field rules shared by the create/update payloads.
//!
//! These mirror the constraints the service enforces so obviously bad input
//! is rejected before a round trip.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

pub const MAX_TITLE_CHARS: usize = 255;
pub const MAX_CATEGORY_NAME_CHARS: usize = 100;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid regex"));

/// Require non-blank text of at most `max_chars` characters.
pub fn bounded_text(field: &str, value: &str, max_chars: Option<usize>) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{field} must not be empty")));
    }
    if let Some(max_chars) = max_chars {
        let count = value.chars().count();
        if count > max_chars {
            return Err(Error::InvalidInput(format!(
                "{field} must be at most {max_chars} characters (got {count})"
            )));
        }
    }
    Ok(())
}

pub fn hex_color(value: &str) -> Result<()> {
    if HEX_COLOR.is_match(value) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "color must look like #RRGGBB (got '{value}')"
        )))
    }
}
