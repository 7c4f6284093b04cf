// ============================================================================
// domain/error.rs - VALIDATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

use crate::domain::value_objects::Field;

/// Root domain error type.
///
/// Each variant is one violated rule of the options model. Validation never
/// stops at the first problem; it collects every variant that applies so the
/// user can fix them all in one editing pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Presence
    // ========================================================================
    #[error("{field} cannot be empty")]
    EmptyField { field: Field },

    #[error("a style index is required when a style root is given")]
    StyleIndexRequired,

    // ========================================================================
    // Locale
    // ========================================================================
    #[error("no valid language in '{input}' (expected tags like en, fr-CA)")]
    NoValidLanguages { input: String },

    #[error("default locale '{locale}' is not one of: {}", langs.join(", "))]
    DefaultLocaleNotListed { locale: String, langs: Vec<String> },

    // ========================================================================
    // Content source
    // ========================================================================
    #[error("cannot specify both a repository and a local path")]
    ConflictingSources,

    #[error("branch '{branch}' was given without a repository")]
    BranchWithoutRepository { branch: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyField { field } => vec![format!(
                "Provide a value with {} or answer the prompt",
                field.flag()
            )],
            Self::StyleIndexRequired => vec![
                "Pass --style-index (e.g. index.scss)".into(),
                "Or drop --style-root if the site has no custom style".into(),
            ],
            Self::NoValidLanguages { .. } => vec![
                "Languages are separated by commas or spaces".into(),
                "Example: --langs \"en, fr-CA de\"".into(),
            ],
            Self::DefaultLocaleNotListed { langs, .. } => vec![format!(
                "Choose one of: {}",
                langs.join(", ")
            )],
            Self::ConflictingSources => vec![
                "Use --repository to clone content, or --path to copy a local folder".into(),
                "Omit both to start from the bundled sample site".into(),
            ],
            Self::BranchWithoutRepository { .. } => {
                vec!["--branch only applies together with --repository".into()]
            }
        }
    }
}
