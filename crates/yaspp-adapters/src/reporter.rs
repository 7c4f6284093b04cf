//! Non-interactive reporters.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use yaspp_core::{
    application::ports::{Activity, OutputLine, Reporter},
    domain::Stage,
};

/// Sends progress to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn stage(&self, stage: Stage) {
        debug!(%stage, "Stage");
    }

    fn activity_started(&self, activity: &Activity) {
        debug!(?activity, "Started");
    }

    fn activity_finished(&self, activity: &Activity, ok: bool) {
        debug!(?activity, ok, "Finished");
    }

    fn output_line(&self, line: &OutputLine) {
        debug!(line = line.text(), "Tool output");
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }
}

/// One reported event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Stage(Stage),
    Started(Activity),
    Finished(Activity, bool),
    Output(OutputLine),
    Warning(String),
}

/// Keeps every event for inspection in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Stage(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Warning(w) => Some(w),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Reporter for RecordingReporter {
    fn stage(&self, stage: Stage) {
        self.push(Event::Stage(stage));
    }

    fn activity_started(&self, activity: &Activity) {
        self.push(Event::Started(activity.clone()));
    }

    fn activity_finished(&self, activity: &Activity, ok: bool) {
        self.push(Event::Finished(activity.clone(), ok));
    }

    fn output_line(&self, line: &OutputLine) {
        self.push(Event::Output(line.clone()));
    }

    fn warn(&self, message: &str) {
        self.push(Event::Warning(message.to_string()));
    }
}
