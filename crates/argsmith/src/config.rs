//! Parser configuration.

/// What happens when parsing is cut short by a help request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitMode {
    /// Print help and exit the process with status 0.
    #[default]
    Terminate,
    /// Print help and return `Error::Terminated`.
    Error,
    /// Print help and return a result whose only error is `HelpRequested`.
    Return,
}

/// Program metadata used by help rendering, plus the exit policy.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    program: String,
    usage: String,
    description: String,
    epilog: String,
    exit_mode: ExitMode,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Replaces the generated usage line.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Text printed after the argument list.
    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = epilog.into();
        self
    }

    pub fn on_exit_terminate(mut self) -> Self {
        self.exit_mode = ExitMode::Terminate;
        self
    }

    pub fn on_exit_error(mut self) -> Self {
        self.exit_mode = ExitMode::Error;
        self
    }

    pub fn on_exit_return(mut self) -> Self {
        self.exit_mode = ExitMode::Return;
        self
    }

    pub fn program_name(&self) -> &str {
        &self.program
    }

    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub fn epilog_text(&self) -> &str {
        &self.epilog
    }

    pub fn exit_mode(&self) -> ExitMode {
        self.exit_mode
    }
}
