//! Localized user-facing strings.

use std::collections::HashMap;

const EN: &str = include_str!("../messages/en.json");

/// Message catalog, parsed once and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// The bundled English catalog.
    pub fn english() -> Result<Self, serde_json::Error> {
        Self::parse(EN)
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            messages: serde_json::from_str(text)?,
        })
    }

    /// The message for `key`, or the key itself when it is missing.
    pub fn get(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// The message for `key` with every `{name}` replaced.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.get(key), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}
