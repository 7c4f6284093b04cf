//! Process runner backed by `std::process`.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

use tracing::{debug, info, instrument, warn};
use yaspp_core::application::ports::{CommandSpec, OutputLine, ProcessResult, ProcessRunner};

/// Spawns real processes and streams their output line by line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    #[instrument(skip_all, fields(command = %spec))]
    fn run(&self, spec: &CommandSpec, on_line: &mut dyn FnMut(&OutputLine)) -> ProcessResult {
        if spec.dry {
            info!("Dry run: not executing");
            return ProcessResult::dry();
        }

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }
        for (key, value) in &spec.env {
            command.env(key, value);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!(error = %e, "Spawn failed");
                return ProcessResult::spawn_failed(format!("{}: {}", spec.program, e));
            }
        };

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, tx.clone(), OutputLine::Stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, tx.clone(), OutputLine::Stderr));
        }
        drop(tx);

        let mut result = ProcessResult::default();
        for line in rx {
            on_line(&line);
            match line {
                OutputLine::Stdout(text) => result.stdout.push(text),
                OutputLine::Stderr(text) => result.stderr.push(text),
            }
        }
        for reader in readers {
            let _ = reader.join();
        }

        result.status = match child.wait() {
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => {
                warn!(error = %e, "Failed to wait for child");
                -1
            }
        };
        debug!(status = result.status, "Process exited");
        result
    }
}

fn forward_lines<R>(
    source: R,
    tx: mpsc::Sender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        for line in BufReader::new(source).lines() {
            let Ok(line) = line else { break };
            if tx.send(wrap(line)).is_err() {
                break;
            }
        }
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn streams_both_channels() {
        let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err 1>&2; exit 3"]);
        let mut seen = Vec::new();
        let result = SystemProcessRunner::new().run(&spec, &mut |line: &OutputLine| {
            seen.push(line.clone())
        });

        assert_eq!(result.status, 3);
        assert_eq!(result.stdout, vec!["out"]);
        assert_eq!(result.stderr, vec!["err"]);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn missing_program_reports_not_found() {
        let spec = CommandSpec::new("definitely-not-a-real-program-yaspp");
        let result = SystemProcessRunner::new().run(&spec, &mut |_: &OutputLine| {});
        assert_eq!(result.status, ProcessResult::NOT_FOUND);
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn dry_run_spawns_nothing() {
        let spec = CommandSpec::new("sh").args(["-c", "exit 1"]).dry(true);
        let result = SystemProcessRunner::new().run(&spec, &mut |_: &OutputLine| {});
        assert!(result.success());
    }

    #[test]
    fn honours_working_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let spec = CommandSpec::new("pwd").cwd(tmp.path());
        let result = SystemProcessRunner::new().run(&spec, &mut |_: &OutputLine| {});
        let reported = std::path::PathBuf::from(&result.stdout[0]);
        assert_eq!(
            reported.canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }
}
