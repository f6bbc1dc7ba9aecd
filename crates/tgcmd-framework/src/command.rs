//! Commands and command lines.
//!
//! - [`ExecutableCommand`] - a command registered with the engine
//! - [`CommandLine`] - a parsed `/name@bot arg1 arg2` invocation
//! - [`Invocation`] - one execution: actor, command, arguments and engine

use std::sync::Arc;

use tgcmd_core::SourceKind;

use crate::actor::BoxedActor;
use crate::engine::CommandEngine;

/// A command registered with the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableCommand {
    name: String,
    description: Option<String>,
}

impl ExecutableCommand {
    /// Creates a command. Names are matched case-insensitively.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim_start_matches('/').to_lowercase(),
            description: None,
        }
    }

    /// Sets the description shown in command listings.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the command name, without the leading `/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the command description, if set.
    pub fn about(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl From<&str> for ExecutableCommand {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ExecutableCommand {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A parsed command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    name: String,
    mention: Option<String>,
    args: Vec<String>,
}

impl CommandLine {
    /// Parses the execution text of a dispatch source.
    ///
    /// Message text must start with `/`; callback payloads may omit it. The
    /// first token names the command (lower-cased, with any `@botname`
    /// mention split off) and the remaining whitespace-separated tokens are
    /// its arguments. Returns `None` when the text holds no command.
    pub fn parse(text: &str, kind: SourceKind) -> Option<Self> {
        let text = text.trim_start();
        let body = match (text.strip_prefix('/'), kind) {
            (Some(rest), _) => rest,
            (None, SourceKind::Callback) => text,
            (None, SourceKind::Message) => return None,
        };

        let mut tokens = body.split_whitespace();
        let head = tokens.next()?;
        let (name, mention) = match head.split_once('@') {
            Some((name, mention)) => (name, Some(mention).filter(|m| !m.is_empty())),
            None => (head, None),
        };
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_lowercase(),
            mention: mention.map(str::to_string),
            args: tokens.map(str::to_string).collect(),
        })
    }

    /// Returns the command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `@botname` the command was addressed to, if any.
    pub fn mention(&self) -> Option<&str> {
        self.mention.as_deref()
    }

    /// Returns the positional arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns `true` unless the command mentions a different bot.
    pub fn is_addressed_to(&self, username: Option<&str>) -> bool {
        match (self.mention(), username) {
            (Some(mention), Some(username)) => mention.eq_ignore_ascii_case(username),
            _ => true,
        }
    }
}

/// A single command execution.
pub struct Invocation {
    actor: BoxedActor,
    command: ExecutableCommand,
    line: CommandLine,
    engine: Arc<CommandEngine>,
}

impl Invocation {
    pub(crate) fn new(
        actor: BoxedActor,
        command: ExecutableCommand,
        line: CommandLine,
        engine: Arc<CommandEngine>,
    ) -> Self {
        Self {
            actor,
            command,
            line,
            engine,
        }
    }

    /// Returns the actor executing the command.
    pub fn actor(&self) -> &BoxedActor {
        &self.actor
    }

    /// Returns the command being executed.
    pub fn command(&self) -> &ExecutableCommand {
        &self.command
    }

    /// Returns the parsed command line.
    pub fn line(&self) -> &CommandLine {
        &self.line
    }

    /// Returns the engine running this invocation.
    pub fn engine(&self) -> &Arc<CommandEngine> {
        &self.engine
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("actor", &self.actor.name())
            .field("command", &self.command)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}
