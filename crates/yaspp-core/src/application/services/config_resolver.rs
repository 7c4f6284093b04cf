//! Configuration resolver.
//!
//! Merges explicit values, persisted defaults and prompt answers into one
//! draft, validates it, and lets the user review and re-edit until the
//! result is accepted or the run is aborted.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Prompter},
    domain::{Confirmation, DomainValidator, Field, OptionsDraft, ResolvedOptions},
    error::YasppResult,
};

/// Order in which fields are collected.
pub const FIELD_ORDER: [Field; 11] = [
    Field::Repository,
    Field::LocalPath,
    Field::ContentRoot,
    Field::ContentIndex,
    Field::LocaleRoot,
    Field::StyleRoot,
    Field::StyleIndex,
    Field::AssetsRoot,
    Field::Langs,
    Field::DefaultLocale,
    Field::Branch,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveMode {
    /// Never prompt: missing values come from the defaults.
    pub auto: bool,
    /// Review the result even when it is valid.
    pub confirm: bool,
}

pub struct ConfigResolver<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Resolve options for `target`.
    ///
    /// In auto mode one pass is made and its validation result returned. In
    /// interactive mode a pass with issues (or any pass when `confirm` is
    /// set) goes to review; editing starts a new pass that offers every
    /// collected value as its default.
    #[instrument(skip_all, fields(auto = mode.auto, confirm = mode.confirm))]
    pub fn resolve(
        &self,
        explicit: &OptionsDraft,
        defaults: &OptionsDraft,
        target: &Path,
        clean: bool,
        mode: ResolveMode,
    ) -> YasppResult<ResolvedOptions> {
        let mut explicit = explicit.clone();
        let mut defaults = defaults.clone();
        let mut pass = 1u32;

        loop {
            debug!(pass, "Collecting options");
            let draft = self.collect(&explicit, &defaults, mode.auto)?;
            let result = DomainValidator::validate_options(&draft, target, clean);

            if mode.auto {
                return result.map_err(|issues| ApplicationError::ValidationFailed(issues).into());
            }

            let issues = match &result {
                Ok(_) => Vec::new(),
                Err(issues) => issues.clone(),
            };
            if issues.is_empty() && !mode.confirm {
                return result.map_err(|issues| ApplicationError::ValidationFailed(issues).into());
            }

            match self.prompter.review(&draft, &issues)? {
                Confirmation::Accept if issues.is_empty() => {
                    info!(pass, "Options accepted");
                    return result.map_err(|issues| ApplicationError::ValidationFailed(issues).into());
                }
                Confirmation::Accept | Confirmation::Edit => {
                    debug!(issues = issues.len(), "Re-editing options");
                }
                Confirmation::Abort => return Err(ApplicationError::Cancelled.into()),
            }

            explicit = OptionsDraft::default();
            defaults = draft;
            pass += 1;
        }
    }

    fn collect(
        &self,
        explicit: &OptionsDraft,
        defaults: &OptionsDraft,
        auto: bool,
    ) -> YasppResult<OptionsDraft> {
        let mut draft = OptionsDraft::default();
        for field in FIELD_ORDER {
            if !applies(field, &draft, explicit) {
                continue;
            }
            let value = match explicit.get(field) {
                Some(given) => Some(given.to_string()),
                None if auto => defaults.get(field).map(str::to_string),
                None => {
                    let default = defaults.get(field).map(str::to_string);
                    Some(self.prompter.ask(field, default)?)
                }
            };
            draft.set(field, value);
        }
        Ok(draft)
    }
}

/// Conditional fields are only asked for when they matter, but an explicit
/// value is always kept so validation can reject it.
fn applies(field: Field, draft: &OptionsDraft, explicit: &OptionsDraft) -> bool {
    let given = explicit.is_given(field);
    match field {
        Field::LocalPath => given || !draft.is_given(Field::Repository),
        Field::StyleIndex => given || draft.is_given(Field::StyleRoot),
        Field::Branch => given || draft.is_given(Field::Repository),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::application::ports::MockPrompter;
    use crate::domain::{ContentSource, DomainError};
    use crate::error::YasppError;

    fn complete() -> OptionsDraft {
        OptionsDraft::default()
            .with(Field::ContentRoot, "content")
            .with(Field::ContentIndex, "content/en")
            .with(Field::LocaleRoot, "locales")
            .with(Field::Langs, "en")
            .with(Field::DefaultLocale, "en")
    }

    fn auto() -> ResolveMode {
        ResolveMode {
            auto: true,
            confirm: false,
        }
    }

    fn interactive(confirm: bool) -> ResolveMode {
        ResolveMode {
            auto: false,
            confirm,
        }
    }

    #[test]
    fn auto_mode_never_prompts() {
        let prompter = MockPrompter::new();
        let resolver = ConfigResolver::new(&prompter);
        let options = resolver
            .resolve(
                &complete(),
                &OptionsDraft::default(),
                Path::new("/out"),
                false,
                auto(),
            )
            .unwrap();
        assert_eq!(options.content_root(), "content");
    }

    #[test]
    fn auto_mode_fills_from_defaults() {
        let prompter = MockPrompter::new();
        let resolver = ConfigResolver::new(&prompter);
        let explicit = OptionsDraft::default().with(Field::ContentRoot, "docs");
        let options = resolver
            .resolve(&explicit, &complete(), Path::new("/out"), false, auto())
            .unwrap();
        assert_eq!(options.content_root(), "docs");
        assert_eq!(options.locale_root(), "locales");
    }

    #[test]
    fn auto_mode_reports_validation_issues() {
        let prompter = MockPrompter::new();
        let resolver = ConfigResolver::new(&prompter);
        let explicit = complete()
            .with(Field::Repository, "https://example.com/site.git")
            .with(Field::LocalPath, "../docs");
        let err = resolver
            .resolve(
                &explicit,
                &OptionsDraft::default(),
                Path::new("/out"),
                false,
                auto(),
            )
            .unwrap_err();
        match err {
            YasppError::Application(ApplicationError::ValidationFailed(issues)) => {
                assert_eq!(issues, vec![DomainError::ConflictingSources]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn prompts_missing_fields_in_order() {
        let mut prompter = MockPrompter::new();
        let mut seq = mockall::Sequence::new();
        for (field, answer) in [
            (Field::Repository, "https://example.com/site.git"),
            (Field::ContentRoot, "content"),
            (Field::ContentIndex, "content/en"),
            (Field::LocaleRoot, "locales"),
            (Field::StyleRoot, ""),
            (Field::AssetsRoot, ""),
            (Field::Langs, "en"),
            (Field::DefaultLocale, "en"),
            (Field::Branch, "main"),
        ] {
            prompter
                .expect_ask()
                .with(eq(field), mockall::predicate::always())
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _| Ok(answer.to_string()));
        }

        let resolver = ConfigResolver::new(&prompter);
        let options = resolver
            .resolve(
                &OptionsDraft::default(),
                &OptionsDraft::default(),
                Path::new("/out"),
                false,
                interactive(false),
            )
            .unwrap();
        assert_eq!(
            options.source(),
            &ContentSource::Repository {
                url: "https://example.com/site.git".into(),
                branch: Some("main".into())
            }
        );
    }

    #[test]
    fn review_edit_restarts_with_collected_defaults() {
        let mut prompter = MockPrompter::new();
        let explicit = complete().with(Field::ContentRoot, "");

        // Pass 1: everything explicit except the optional fields.
        // Pass 2: every field is asked with the pass-1 value as default.
        prompter.expect_ask().returning(|field, default| {
            Ok(match field {
                Field::ContentRoot => "content".to_string(),
                _ => default.unwrap_or_default(),
            })
        });
        let mut seq = mockall::Sequence::new();
        prompter
            .expect_review()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, issues| {
                assert_eq!(issues.len(), 1);
                Ok(Confirmation::Edit)
            });
        prompter
            .expect_review()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|draft, issues| {
                assert!(issues.is_empty());
                assert_eq!(draft.content_index.as_deref(), Some("content/en"));
                Ok(Confirmation::Accept)
            });

        let resolver = ConfigResolver::new(&prompter);
        let options = resolver
            .resolve(
                &explicit,
                &OptionsDraft::default(),
                Path::new("/out"),
                false,
                interactive(true),
            )
            .unwrap();
        assert_eq!(options.content_root(), "content");
    }

    #[test]
    fn abort_cancels() {
        let mut prompter = MockPrompter::new();
        prompter.expect_ask().returning(|_, d| Ok(d.unwrap_or_default()));
        prompter
            .expect_review()
            .returning(|_, _| Ok(Confirmation::Abort));

        let resolver = ConfigResolver::new(&prompter);
        let err = resolver
            .resolve(
                &complete(),
                &OptionsDraft::default(),
                Path::new("/out"),
                false,
                interactive(true),
            )
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn explicit_branch_is_kept_without_repository() {
        let prompter = MockPrompter::new();
        let resolver = ConfigResolver::new(&prompter);
        let err = resolver
            .resolve(
                &complete().with(Field::Branch, "dev"),
                &OptionsDraft::default(),
                Path::new("/out"),
                false,
                auto(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("branch 'dev'"));
    }
}
