//! Error handling for the create-yaspp binary.
//!
//! Everything that can end a run ends up as a [`CliError`]; `main` renders
//! it and picks the exit code.

use std::error::Error;

use owo_colors::{AnsiColors, OwoColorize};
use thiserror::Error;

use yaspp_core::error::{ErrorCategory, YasppError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// An error propagated from the provisioning pipeline.
    #[error(transparent)]
    Core(#[from] YasppError),

    /// Settings could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O operation outside the pipeline failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Core(core) => core.suggestions(),

            Self::ConfigError { .. } => vec![
                format!(
                    "Check the settings file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Check YASPP_* environment variables (YASPP_DEFAULTS__INIT_SCRIPT=init)".into(),
            ],

            Self::IoError { .. } => vec![
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Core(core) => core.category(),
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError { .. } => ErrorCategory::Io,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Error              | Code |
    /// |--------------------|------|
    /// | Unreadable settings|  4   |
    /// | Anything else      |  1   |
    ///
    /// Argument parse errors never reach here; `main` exits with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigError { .. } => 4,
            _ => 1,
        }
    }

    fn is_cancelled(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_cancelled())
    }

    /// Message, causes (when `verbose`) and suggestions, ready for stderr.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, c: AnsiColors| {
            if color {
                text.color(c).to_string()
            } else {
                text.to_string()
            }
        };

        if self.is_cancelled() {
            return format!("{}\n", paint(&self.to_string(), AnsiColors::Yellow));
        }

        let mut out = format!("\n{}\n", paint("Error:", AnsiColors::Red));
        for line in self.to_string().lines() {
            out.push_str(&format!("  {}\n", paint(line, AnsiColors::Red)));
        }

        if verbose {
            let mut cause = Error::source(self);
            while let Some(err) = cause {
                let text = format!("Caused by: {err}");
                out.push_str(&format!("  {}\n", paint(&text, AnsiColors::BrightBlack)));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", paint("Suggestions:", AnsiColors::Yellow)));
            for suggestion in &suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            let hint = "Use -v / --verbose for more details.";
            out.push_str(&format!("\n{}\n", paint(hint, AnsiColors::BrightBlack)));
        }
        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Precondition => {
                tracing::warn!("User error: {}", self)
            }
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Io | ErrorCategory::ToolExecution => {
                tracing::error!("Provisioning failed: {}", self)
            }
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Convert I/O errors into [`CliError`] at call-sites with a descriptive
/// context message.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}
