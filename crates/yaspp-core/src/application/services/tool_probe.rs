use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandSpec, OutputLine, ProcessRunner},
    },
    domain::{Tool, ToolAvailability, parse_version},
    error::YasppResult,
};

/// Runs `<tool> --version` for every known tool.
pub struct ToolProbe<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> ToolProbe<'a> {
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self { runner }
    }

    #[instrument(skip_all)]
    pub fn probe(&self) -> ToolAvailability {
        let mut tools = ToolAvailability::default();
        for tool in Tool::ALL {
            let spec = CommandSpec::new(tool.program()).arg("--version");
            let result = self.runner.run(&spec, &mut |_: &OutputLine| {});
            let version = if result.success() {
                result.stdout.iter().find_map(|line| parse_version(line))
            } else {
                None
            };
            debug!(%tool, version = ?version, "Probed");
            tools.record(tool, version);
        }
        tools
    }

    /// Fail when git or every package manager is missing.
    pub fn require(tools: &ToolAvailability) -> YasppResult<()> {
        let missing = tools.missing_mandatory();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApplicationError::ToolMissing { tools: missing }.into())
        }
    }
}
