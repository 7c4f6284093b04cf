// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for yaspp provisioning.
//!
//! Pure logic only: path arithmetic, locale parsing, the options model and
//! its validation, the site descriptor and tool availability. Filesystem,
//! process and terminal concerns are reached through ports defined in the
//! application layer.
//!
//! ## Rules
//!
//! - **No I/O**: no filesystem, network or process calls
//! - **Sync**: nothing here blocks or awaits
//! - **Staged construction**: `OptionsDraft` is collected, `ResolvedOptions`
//!   is only produced by `DomainValidator`
pub mod entities;
pub mod error;
pub mod locale;
pub mod paths;
pub mod value_objects;

mod validation;

pub use entities::{
    ContentSource, NAV_FILE, OPTIONS_FILE, OptionsDraft, OptionsSnapshot, ResolvedOptions,
    SITE_CONFIG_FILE, SiteConfig, StyleOptions, ToolAvailability, parse_version,
};
pub use error::DomainError;
pub use value_objects::{Confirmation, Field, FileKind, Stage, TargetPolicy, Tool};

pub use validation::{DEFAULT_STYLE_EXTENSION, DomainValidator};
