//! Terminal progress: stage headers, a spinner around long activities and
//! live tool output. Everything goes to stderr so stdout stays clean for
//! `--output-format json`.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use yaspp_core::{
    application::ports::{Activity, OutputLine, Reporter},
    domain::Stage,
};

use crate::messages::Catalog;

const TICK: Duration = Duration::from_millis(100);

pub struct ProgressReporter {
    catalog: Arc<Catalog>,
    target: String,
    color: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(catalog: Arc<Catalog>, target: String, color: bool) -> Self {
        Self {
            catalog,
            target,
            color,
            spinner: Mutex::new(None),
        }
    }

    fn stage_message(&self, stage: Stage) -> String {
        self.catalog
            .format(&format!("stage.{stage}"), &[("target", self.target.as_str())])
    }

    fn describe(&self, activity: &Activity) -> String {
        let c = &self.catalog;
        match activity {
            Activity::Clone { url } => c.format("activity.clone", &[("url", url.as_str())]),
            Activity::CopyContent { from } => {
                let from = from.display().to_string();
                c.format("activity.copy", &[("from", from.as_str())])
            }
            Activity::SampleSite => c.get("activity.sample"),
            Activity::FrameworkClone { url } => {
                c.format("activity.framework", &[("url", url.as_str())])
            }
            Activity::Install { manager } => {
                c.format("activity.install", &[("manager", manager.as_str())])
            }
            Activity::InitScript { manager, script } => c.format(
                "activity.init",
                &[("manager", manager.as_str()), ("script", script.as_str())],
            ),
        }
    }

    /// Print above the spinner when one is running.
    fn emit(&self, line: &str) {
        let spinner = self.spinner.lock().ok().and_then(|s| s.clone());
        match spinner {
            Some(bar) => bar.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }

    fn new_spinner(&self, message: String) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message);
        bar.enable_steady_tick(TICK);
        bar
    }
}

impl Reporter for ProgressReporter {
    fn stage(&self, stage: Stage) {
        tracing::debug!(%stage, "Stage");
        let message = self.stage_message(stage);
        self.emit(&if self.color {
            format!("{} {}", "==>".cyan().bold(), message.bold())
        } else {
            format!("==> {message}")
        });
    }

    fn activity_started(&self, activity: &Activity) {
        tracing::debug!(?activity, "Started");
        let bar = self.new_spinner(self.describe(activity));
        let previous = self
            .spinner
            .lock()
            .ok()
            .and_then(|mut slot| slot.replace(bar));
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    fn activity_finished(&self, activity: &Activity, ok: bool) {
        tracing::debug!(?activity, ok, "Finished");
        if let Some(bar) = self.spinner.lock().ok().and_then(|mut s| s.take()) {
            bar.finish_and_clear();
        }
        let message = self.describe(activity);
        let line = match (ok, self.color) {
            (true, true) => format!("{} {message}", "\u{2713}".green().bold()),
            (true, false) => format!("\u{2713} {message}"),
            (false, true) => format!("{} {message}", "\u{2717}".red().bold()),
            (false, false) => format!("\u{2717} {message}"),
        };
        eprintln!("{line}");
    }

    fn output_line(&self, line: &OutputLine) {
        let text = match line {
            OutputLine::Stdout(text) => text.clone(),
            OutputLine::Stderr(text) if self.color => text.dimmed().to_string(),
            OutputLine::Stderr(text) => text.clone(),
        };
        self.emit(&format!("    {text}"));
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
        self.emit(&if self.color {
            format!("{} {}", "\u{26a0}".yellow().bold(), message.yellow())
        } else {
            format!("\u{26a0} {message}")
        });
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn reporter() -> ProgressReporter {
        ProgressReporter::new(
            Arc::new(Catalog::english().unwrap()),
            "/work/site".into(),
            false,
        )
    }

    #[test]
    fn activities_are_described_from_the_catalog() {
        let r = reporter();
        assert_eq!(
            r.describe(&Activity::Clone {
                url: "https://example.com/a.git".into()
            }),
            "Cloning https://example.com/a.git"
        );
        assert_eq!(
            r.describe(&Activity::InitScript {
                manager: "yarn".into(),
                script: "init".into()
            }),
            "yarn run init"
        );
        assert!(
            r.describe(&Activity::CopyContent {
                from: PathBuf::from("/docs")
            })
            .contains("/docs")
        );
    }

    #[test]
    fn stage_message_names_the_target() {
        assert_eq!(reporter().stage_message(Stage::Target), "Preparing /work/site");
    }

    #[test]
    fn finishing_clears_the_spinner() {
        let r = reporter();
        r.activity_started(&Activity::SampleSite);
        assert!(r.spinner.lock().unwrap().is_some());
        r.activity_finished(&Activity::SampleSite, false);
        assert!(r.spinner.lock().unwrap().is_none());
    }
}
