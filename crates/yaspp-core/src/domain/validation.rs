use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{ContentSource, OptionsDraft, ResolvedOptions, StyleOptions},
    error::DomainError,
    locale::{find_locale, parse_langs},
    value_objects::Field,
};

/// Extension appended to a style index given without one.
pub const DEFAULT_STYLE_EXTENSION: &str = "scss";

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Turn a draft into [`ResolvedOptions`], or report every rule it breaks.
    pub fn validate_options(
        draft: &OptionsDraft,
        target: &Path,
        clean: bool,
    ) -> Result<ResolvedOptions, Vec<DomainError>> {
        let mut errors = Vec::new();
        let value = |field: Field| draft.get(field).map(str::trim).unwrap_or_default();

        // Content source
        let repository = value(Field::Repository);
        let local_path = value(Field::LocalPath);
        let branch = value(Field::Branch);
        if !repository.is_empty() && !local_path.is_empty() {
            errors.push(DomainError::ConflictingSources);
        }
        if !branch.is_empty() && repository.is_empty() {
            errors.push(DomainError::BranchWithoutRepository {
                branch: branch.to_string(),
            });
        }
        let source = if !repository.is_empty() {
            ContentSource::Repository {
                url: repository.to_string(),
                branch: (!branch.is_empty()).then(|| branch.to_string()),
            }
        } else if !local_path.is_empty() {
            ContentSource::LocalPath {
                path: local_path.to_string(),
            }
        } else {
            ContentSource::Bundled
        };

        // Presence
        for field in [Field::ContentRoot, Field::ContentIndex, Field::LocaleRoot] {
            if value(field).is_empty() {
                errors.push(DomainError::EmptyField { field });
            }
        }

        // Style
        let style_root = value(Field::StyleRoot);
        let style = if style_root.is_empty() {
            None
        } else {
            let index = value(Field::StyleIndex);
            if index.is_empty() {
                errors.push(DomainError::StyleIndexRequired);
                None
            } else {
                Some(StyleOptions {
                    root: style_root.to_string(),
                    index: with_default_extension(index),
                })
            }
        };

        // Locale
        let langs_input = value(Field::Langs);
        let langs = parse_langs(langs_input);
        let requested_default = value(Field::DefaultLocale);
        let default_locale = if langs.is_empty() {
            errors.push(DomainError::NoValidLanguages {
                input: langs_input.to_string(),
            });
            String::new()
        } else if requested_default.is_empty() {
            langs[0].clone()
        } else {
            match find_locale(&langs, requested_default) {
                Some(listed) => listed.to_string(),
                None => {
                    errors.push(DomainError::DefaultLocaleNotListed {
                        locale: requested_default.to_string(),
                        langs: langs.clone(),
                    });
                    String::new()
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let assets_root = value(Field::AssetsRoot);
        Ok(ResolvedOptions::new(
            source,
            value(Field::ContentRoot).to_string(),
            value(Field::ContentIndex).to_string(),
            value(Field::LocaleRoot).to_string(),
            langs,
            default_locale,
            style,
            (!assets_root.is_empty()).then(|| assets_root.to_string()),
            PathBuf::from(target),
            clean,
        ))
    }
}

fn with_default_extension(index: &str) -> String {
    if Path::new(index).extension().is_some() {
        index.to_string()
    } else {
        format!("{index}.{DEFAULT_STYLE_EXTENSION}")
    }
}
