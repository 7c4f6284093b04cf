//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use yaspp_core::domain::{Field, OptionsDraft, TargetPolicy};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "create-yaspp",
    bin_name = "create-yaspp",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Provision a new yaspp site project",
    long_about = "create-yaspp prepares a target folder for a yaspp site: it stages \
                  content from a git repository, a local folder or the bundled \
                  sample, writes yaspp.config.json and installs dependencies.",
    after_help = "EXAMPLES:\n\
        \x20 create-yaspp --target my-site --auto\n\
        \x20 create-yaspp -T my-site -R https://github.com/me/site.git -B main --auto\n\
        \x20 create-yaspp -T my-site -P ../docs --content-root content --langs \"en he\"\n\
        \x20 create-yaspp -T my-site --refresh\n\
        \x20 create-yaspp --completions bash > ~/.local/share/bash-completion/completions/create-yaspp",
)]
pub struct Cli {
    /// Flags that control logging and output.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// What to provision and how.
    #[command(flatten)]
    pub create: CreateArgs,

    /// Print a completion script for SHELL and exit.
    #[arg(long = "completions", value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Run-mode flags and site options.
#[derive(Debug, Clone, Default, Args)]
pub struct CreateArgs {
    /// Simulate: inspect only, write nothing, run no mutating tool.
    #[arg(
        short = 'D',
        long = "dryrun",
        visible_alias = "dry-run",
        help = "Show what would be done without doing it"
    )]
    pub dry_run: bool,

    /// Destination directory.
    #[arg(
        short = 'T',
        long = "target",
        value_name = "DIR",
        default_value = ".",
        help = "Target directory"
    )]
    pub target: PathBuf,

    /// Accept supplied and default values without prompting.
    #[arg(long = "auto", help = "Never prompt; use supplied and default values")]
    pub auto: bool,

    /// Skip the final review in interactive mode.
    #[arg(short = 'y', long = "yes", help = "Skip the review step")]
    pub yes: bool,

    /// Re-run content acquisition with the options saved in the target.
    #[arg(long = "refresh", help = "Refresh content using the saved options")]
    pub refresh: bool,

    /// Load options from FILE instead of prompting.
    #[arg(long = "config", value_name = "FILE", help = "Options file to load")]
    pub config: Option<PathBuf>,

    /// Skip content acquisition and the framework clone.
    #[arg(long = "no-content", help = "Do not fetch or copy any content")]
    pub no_content: bool,

    /// Clear an unusable target without asking.
    #[arg(long = "clean", help = "Clear the target directory if it is not empty")]
    pub clean: bool,

    /// Which entries may already exist in the target.
    #[arg(long = "target-policy", value_enum, value_name = "POLICY")]
    pub target_policy: Option<PolicyArg>,

    // ── site options ──────────────────────────────────────────────────────
    #[arg(short = 'R', long = "repository", value_name = "URL", help = "Clone content from URL")]
    pub repository: Option<String>,

    #[arg(short = 'B', long = "branch", value_name = "NAME", help = "Branch to clone")]
    pub branch: Option<String>,

    #[arg(short = 'P', long = "path", value_name = "DIR", help = "Copy content from a local folder")]
    pub path: Option<String>,

    #[arg(long = "content-root", value_name = "PATH")]
    pub content_root: Option<String>,

    #[arg(long = "content-index", value_name = "PATH")]
    pub content_index: Option<String>,

    #[arg(long = "locale-root", value_name = "PATH")]
    pub locale_root: Option<String>,

    #[arg(long = "style-root", value_name = "PATH")]
    pub style_root: Option<String>,

    #[arg(long = "style-index", value_name = "FILE")]
    pub style_index: Option<String>,

    #[arg(long = "assets-root", value_name = "PATH")]
    pub assets_root: Option<String>,

    /// Languages, separated by spaces or commas.
    #[arg(long = "langs", value_name = "LIST")]
    pub langs: Option<String>,

    #[arg(long = "default-locale", value_name = "LANG")]
    pub default_locale: Option<String>,
}

impl CreateArgs {
    /// Site options given on the command line.
    pub fn draft(&self) -> OptionsDraft {
        let mut draft = OptionsDraft::default();
        for (field, value) in [
            (Field::Repository, &self.repository),
            (Field::Branch, &self.branch),
            (Field::LocalPath, &self.path),
            (Field::ContentRoot, &self.content_root),
            (Field::ContentIndex, &self.content_index),
            (Field::LocaleRoot, &self.locale_root),
            (Field::StyleRoot, &self.style_root),
            (Field::StyleIndex, &self.style_index),
            (Field::AssetsRoot, &self.assets_root),
            (Field::Langs, &self.langs),
            (Field::DefaultLocale, &self.default_locale),
        ] {
            draft.set(field, value.clone());
        }
        draft
    }
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Target directory policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// The target must be empty.
    Strict,
    /// Only the files create-yaspp writes must be absent.
    Collision,
}

impl From<PolicyArg> for TargetPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => TargetPolicy::Strict,
            PolicyArg::Collision => TargetPolicy::Collision,
        }
    }
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn target_defaults_to_current_directory() {
        let cli = Cli::parse_from(["create-yaspp"]);
        assert_eq!(cli.create.target, PathBuf::from("."));
        assert!(!cli.create.auto);
        assert!(cli.completions.is_none());
    }

    #[test]
    fn short_flags() {
        let cli = Cli::parse_from([
            "create-yaspp",
            "-D",
            "-T",
            "out",
            "-R",
            "https://example.com/site.git",
            "-B",
            "main",
        ]);
        assert!(cli.create.dry_run);
        assert_eq!(cli.create.target, PathBuf::from("out"));
        assert_eq!(cli.create.branch.as_deref(), Some("main"));
    }

    #[test]
    fn dry_run_alias() {
        let cli = Cli::parse_from(["create-yaspp", "--dry-run"]);
        assert!(cli.create.dry_run);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["create-yaspp", "--bogus"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["create-yaspp", "--quiet", "--verbose"]).is_err());
    }

    #[test]
    fn draft_carries_given_options_only() {
        let cli = Cli::parse_from([
            "create-yaspp",
            "-P",
            "../docs",
            "--langs",
            "en he",
            "--default-locale",
            "",
        ]);
        let draft = cli.create.draft();
        assert_eq!(draft.get(Field::LocalPath), Some("../docs"));
        assert_eq!(draft.get(Field::Langs), Some("en he"));
        assert!(!draft.is_given(Field::DefaultLocale));
        assert!(!draft.is_given(Field::Repository));
    }

    #[test]
    fn policy_maps_to_domain() {
        let cli = Cli::parse_from(["create-yaspp", "--target-policy", "collision"]);
        assert_eq!(
            cli.create.target_policy.map(TargetPolicy::from),
            Some(TargetPolicy::Collision)
        );
    }
}
