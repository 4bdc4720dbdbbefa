//! Input validation shared by every resource. Failures are collected so a
//! single 400 response lists all of them.

use chrono::NaiveDate;

use crate::errors::AppError;

pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 50;

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn check(&mut self, ok: bool, msg: impl Into<String>) {
        if !ok {
            self.fail(msg);
        }
    }

    /// Trims `value`, requiring 1..=max characters.
    pub fn required(&mut self, field: &str, value: &str, max: usize) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.fail(format!("{field} is required"));
        } else if trimmed.chars().count() > max {
            self.fail(format!("{field} must be at most {max} characters"));
        }
        trimmed.to_string()
    }

    /// Trims `value`; blank becomes `None`.
    pub fn optional(&mut self, field: &str, value: Option<String>, max: usize) -> Option<String> {
        let trimmed = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;
        if trimmed.chars().count() > max {
            self.fail(format!("{field} must be at most {max} characters"));
        }
        Some(trimmed)
    }

    pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64) {
        if value < min || value > max {
            self.fail(format!("{field} must be between {min} and {max}"));
        }
    }

    /// Trims, drops blanks and duplicates (first occurrence wins).
    pub fn tags(&mut self, tags: Vec<String>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.trim();
            if tag.is_empty() || out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                continue;
            }
            if tag.chars().count() > MAX_TAG_LEN {
                self.fail(format!("tag '{tag}' must be at most {MAX_TAG_LEN} characters"));
                continue;
            }
            out.push(tag.to_string());
        }
        if out.len() > MAX_TAGS {
            self.fail(format!("at most {MAX_TAGS} tags are allowed"));
        }
        out
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// `#RGB` or `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// PINs are 4 to 8 ASCII digits.
pub fn is_valid_pin(value: &str) -> bool {
    (4..=8).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

/// Parses a `YYYY-MM-DD` path or query value.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}
