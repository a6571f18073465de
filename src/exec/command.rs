// src/exec/command.rs

use std::fmt;

use crate::errors::{HarnessError, Result};

/// Program plus arguments, passed to the OS verbatim (no shell).
///
/// Always has a program: the only ways to build one are [`CommandSpec::new`]
/// and the fallible [`CommandSpec::from_argv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from `[program, arg1, arg2, ...]`.
    pub fn from_argv<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = argv.into_iter().map(Into::into);
        let program = iter.next().ok_or(HarnessError::EmptyCommand)?;
        Ok(Self {
            program,
            args: iter.collect(),
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl TryFrom<Vec<String>> for CommandSpec {
    type Error = HarnessError;

    fn try_from(argv: Vec<String>) -> Result<Self> {
        Self::from_argv(argv)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argv_is_rejected() {
        let argv: Vec<String> = Vec::new();
        assert!(matches!(
            CommandSpec::try_from(argv),
            Err(HarnessError::EmptyCommand)
        ));
    }

    #[test]
    fn argv_keeps_order() {
        let spec = CommandSpec::from_argv(["sh", "-c", "echo hi"]).unwrap();
        assert_eq!(spec.program(), "sh");
        assert_eq!(spec.arguments(), ["-c", "echo hi"]);
        assert_eq!(spec.to_string(), "sh -c echo hi");
    }
}
