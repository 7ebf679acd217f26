//! 输入校验：在任何网络请求之前检查想法文本的空值与长度约束。
//!
//! Input validation.

use thiserror::Error;

/// Maximum accepted idea length, in characters, after trimming.
pub const MAX_IDEA_CHARS: usize = 5000;

/// Length above which a character counter should start warning.
pub const NEAR_LIMIT_CHARS: usize = 4500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("idea text is required")]
    EmptyInput,

    #[error("idea is {chars} characters long; the limit is {limit}")]
    TooLong { chars: usize, limit: usize },
}

impl ValidationFailure {
    /// User-facing message naming the violated constraint.
    pub fn user_message(&self) -> String {
        match self {
            ValidationFailure::EmptyInput => "Please describe your startup idea.".to_string(),
            ValidationFailure::TooLong { limit, .. } => format!(
                "Your idea description is too long. Please shorten it to under {} characters.",
                limit
            ),
        }
    }
}

/// Trim `text` and check it against the emptiness and length constraints.
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn validate_idea(text: &str) -> Result<String, ValidationFailure> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::EmptyInput);
    }

    let chars = trimmed.chars().count();
    if chars > MAX_IDEA_CHARS {
        return Err(ValidationFailure::TooLong {
            chars,
            limit: MAX_IDEA_CHARS,
        });
    }

    Ok(trimmed.to_string())
}

/// Character-counter reading for an idea being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputGauge {
    pub chars: usize,
    pub limit: usize,
    pub remaining: usize,
    pub near_limit: bool,
    pub over_limit: bool,
}

impl InputGauge {
    pub fn measure(text: &str) -> Self {
        let chars = text.trim().chars().count();
        Self {
            chars,
            limit: MAX_IDEA_CHARS,
            remaining: MAX_IDEA_CHARS.saturating_sub(chars),
            near_limit: chars > NEAR_LIMIT_CHARS,
            over_limit: chars > MAX_IDEA_CHARS,
        }
    }
}
