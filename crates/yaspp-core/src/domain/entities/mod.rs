pub mod options;
pub mod site_config;
pub mod tools;

pub use options::{ContentSource, OptionsDraft, OptionsSnapshot, ResolvedOptions, StyleOptions};
pub use site_config::{NAV_FILE, OPTIONS_FILE, SITE_CONFIG_FILE, SiteConfig};
pub use tools::{ToolAvailability, parse_version};
