//! Terminal prompter.
//!
//! [`DialoguerPrompter`] asks on the terminal and is only compiled with the
//! `interactive` feature. [`NonInteractivePrompter`] is used for `--auto`,
//! for piped stdin and for builds without the feature.

use std::{io, path::Path, sync::Arc};

use yaspp_core::{
    application::ApplicationError,
    domain::{Confirmation, DomainError, Field, OptionsDraft},
    error::{YasppError, YasppResult},
    prelude::Prompter,
};

use crate::messages::Catalog;

/// Answers without a terminal: questions fail, reviews pass, nothing is
/// cleared or reused.
#[derive(Debug, Clone, Default)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn ask(&self, field: Field, _default: Option<String>) -> YasppResult<String> {
        Err(ApplicationError::InteractionUnavailable {
            what: format!("a value for {field} ({})", field.flag()),
        }
        .into())
    }

    fn review(&self, _draft: &OptionsDraft, _issues: &[DomainError]) -> YasppResult<Confirmation> {
        Ok(Confirmation::Accept)
    }

    fn confirm_clear(&self, _target: &Path, _reason: &str) -> YasppResult<bool> {
        Ok(false)
    }

    fn confirm_reuse(&self, _snapshot: &Path) -> YasppResult<bool> {
        Ok(false)
    }
}

/// Map a failed terminal interaction. Ctrl-C cancels the run.
#[cfg_attr(not(feature = "interactive"), allow(dead_code))]
fn interaction_failed(what: &str, err: io::Error) -> YasppError {
    if err.kind() == io::ErrorKind::Interrupted {
        ApplicationError::Cancelled.into()
    } else {
        tracing::debug!(error = %err, what, "Prompt failed");
        ApplicationError::InteractionUnavailable {
            what: what.to_string(),
        }
        .into()
    }
}

#[cfg(feature = "interactive")]
pub use interactive::DialoguerPrompter;

#[cfg(feature = "interactive")]
mod interactive {
    use std::path::Path;
    use std::sync::Arc;

    use console::Term;
    use dialoguer::{
        Confirm, Input, Select,
        theme::{ColorfulTheme, SimpleTheme, Theme},
    };
    use owo_colors::OwoColorize;
    use yaspp_core::{
        application::services::FIELD_ORDER,
        domain::{Confirmation, DomainError, Field, OptionsDraft},
        error::{YasppError, YasppResult},
        prelude::Prompter,
    };

    use super::interaction_failed;
    use crate::messages::Catalog;

    /// Asks on stderr's terminal with dialoguer.
    pub struct DialoguerPrompter {
        catalog: Arc<Catalog>,
        color: bool,
    }

    impl DialoguerPrompter {
        pub fn new(catalog: Arc<Catalog>, color: bool) -> Self {
            Self { catalog, color }
        }

        fn theme(&self) -> Box<dyn Theme> {
            if self.color {
                Box::new(ColorfulTheme::default())
            } else {
                Box::new(SimpleTheme)
            }
        }

        fn fail(&self, what: &str, err: dialoguer::Error) -> YasppError {
            let io = match err {
                dialoguer::Error::IO(io) => io,
                #[allow(unreachable_patterns)]
                other => std::io::Error::other(other.to_string()),
            };
            interaction_failed(what, io)
        }

        fn show_draft(&self, draft: &OptionsDraft, issues: &[DomainError]) {
            let term = Term::stderr();
            let unset = self.catalog.get("review.unset");
            let mut lines = vec![String::new(), self.catalog.get("review.title")];
            for field in FIELD_ORDER {
                let value = draft.get(field).unwrap_or(unset.as_str());
                lines.push(format!("  {:<16} {value}", field.label()));
            }
            if !issues.is_empty() {
                lines.push(String::new());
                lines.push(self.catalog.get("review.issues"));
                for issue in issues {
                    let line = format!("  - {issue}");
                    lines.push(if self.color {
                        line.red().to_string()
                    } else {
                        line
                    });
                }
            }
            lines.push(String::new());
            for line in lines {
                let _ = term.write_line(&line);
            }
        }
    }

    impl Prompter for DialoguerPrompter {
        fn ask(&self, field: Field, default: Option<String>) -> YasppResult<String> {
            let theme = self.theme();
            let mut input = Input::<String>::with_theme(theme.as_ref())
                .with_prompt(self.catalog.get(&format!("field.{}", field.key())))
                .allow_empty(true);
            if let Some(default) = default.filter(|d| !d.is_empty()) {
                input = input.default(default);
            }
            input
                .interact_text()
                .map(|answer| answer.trim().to_string())
                .map_err(|e| self.fail(field.label(), e))
        }

        fn review(
            &self,
            draft: &OptionsDraft,
            issues: &[DomainError],
        ) -> YasppResult<Confirmation> {
            self.show_draft(draft, issues);

            // Accepting a draft with issues would only restart the loop.
            let mut choices = Vec::new();
            if issues.is_empty() {
                choices.push(Confirmation::Accept);
            }
            choices.extend([Confirmation::Edit, Confirmation::Abort]);

            let labels: Vec<String> = choices
                .iter()
                .map(|c| {
                    self.catalog.get(match c {
                        Confirmation::Accept => "review.accept",
                        Confirmation::Edit => "review.edit",
                        Confirmation::Abort => "review.abort",
                    })
                })
                .collect();

            let theme = self.theme();
            let picked = Select::with_theme(theme.as_ref())
                .with_prompt(self.catalog.get("review.prompt"))
                .items(&labels)
                .default(0)
                .interact()
                .map_err(|e| self.fail("review", e))?;
            Ok(choices[picked])
        }

        fn confirm_clear(&self, target: &Path, reason: &str) -> YasppResult<bool> {
            let target = target.display().to_string();
            let theme = self.theme();
            Confirm::with_theme(theme.as_ref())
                .with_prompt(
                    self.catalog
                        .format("confirm.clear", &[("target", target.as_str()), ("reason", reason)]),
                )
                .default(false)
                .interact()
                .map_err(|e| self.fail("confirm clear", e))
        }

        fn confirm_reuse(&self, snapshot: &Path) -> YasppResult<bool> {
            let path = snapshot.display().to_string();
            let theme = self.theme();
            Confirm::with_theme(theme.as_ref())
                .with_prompt(self.catalog.format("confirm.reuse", &[("path", path.as_str())]))
                .default(true)
                .interact()
                .map_err(|e| self.fail("confirm reuse", e))
        }
    }
}

/// Pick the prompter for this run.
pub fn select(catalog: Arc<Catalog>, interactive: bool, color: bool) -> Box<dyn Prompter> {
    #[cfg(feature = "interactive")]
    if interactive {
        return Box::new(DialoguerPrompter::new(catalog, color));
    }
    let _ = (catalog, interactive, color);
    Box::new(NonInteractivePrompter)
}
