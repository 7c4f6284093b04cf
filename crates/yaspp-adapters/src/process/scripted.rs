//! Scripted process runner for testing.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use yaspp_core::application::ports::{CommandSpec, OutputLine, ProcessResult, ProcessRunner};

type Handler = Arc<dyn Fn(&CommandSpec) -> ProcessResult + Send + Sync>;

/// Answers commands from per-program handlers and records every call.
///
/// Programs without a handler behave as if they were not installed.
#[derive(Clone, Default)]
pub struct ScriptedProcessRunner {
    handlers: Arc<Mutex<HashMap<String, Handler>>>,
    calls: Arc<Mutex<Vec<CommandSpec>>>,
}

impl ScriptedProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner where git, yarn, npm and npx are installed and every command
    /// succeeds.
    pub fn with_toolchain() -> Self {
        Self::new()
            .on("git", |spec| version_or_ok(spec, "git version 2.43.0"))
            .on("yarn", |spec| version_or_ok(spec, "1.22.22"))
            .on("npm", |spec| version_or_ok(spec, "10.5.0"))
            .on("npx", |spec| version_or_ok(spec, "10.5.0"))
    }

    /// Install or replace the handler for `program`.
    pub fn on<F>(self, program: &str, handler: F) -> Self
    where
        F: Fn(&CommandSpec) -> ProcessResult + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.insert(program.to_string(), Arc::new(handler));
        }
        self
    }

    /// Remove a program, as if it were not installed.
    pub fn without(self, program: &str) -> Self {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.remove(program);
        }
        self
    }

    /// Every command seen so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Calls rendered as command lines, skipping `--version` probes.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|c| c.args.first().map(String::as_str) != Some("--version"))
            .map(ToString::to_string)
            .collect()
    }
}

impl ProcessRunner for ScriptedProcessRunner {
    fn run(&self, spec: &CommandSpec, on_line: &mut dyn FnMut(&OutputLine)) -> ProcessResult {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(spec.clone());
        }
        let handler = self
            .handlers
            .lock()
            .ok()
            .and_then(|h| h.get(&spec.program).cloned());
        let Some(handler) = handler else {
            return ProcessResult::spawn_failed(format!("{}: not found", spec.program));
        };
        if spec.dry {
            return ProcessResult::dry();
        }

        let result = handler(spec);
        for line in &result.stdout {
            on_line(&OutputLine::Stdout(line.clone()));
        }
        for line in &result.stderr {
            on_line(&OutputLine::Stderr(line.clone()));
        }
        result
    }
}

/// Print `banner` for `--version`, succeed silently otherwise.
pub fn version_or_ok(spec: &CommandSpec, banner: &str) -> ProcessResult {
    if spec.args.first().map(String::as_str) == Some("--version") {
        ProcessResult {
            status: 0,
            stdout: vec![banner.to_string()],
            stderr: Vec::new(),
        }
    } else {
        ProcessResult::default()
    }
}

/// A failing result with one stderr line.
pub fn failure(status: i32, message: &str) -> ProcessResult {
    ProcessResult {
        status,
        stdout: Vec::new(),
        stderr: vec![message.to_string()],
    }
}
