use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ClientConfig;

/// Errors raised while talking to tmux
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to execute {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid command line {command:?}: {source}")]
    Tokenize {
        command: String,
        source: shell_words::ParseError,
    },

    /// tmux exited unsuccessfully. `output` is what it printed.
    #[error("tmux {command} failed: {output}")]
    Failed { command: String, output: String },
}

/// Something that can run a tmux command and hand back its textual output
pub trait CommandChannel {
    /// Run `command` (scope flags and target included, binary excluded).
    /// Arguments are shell-quoted as [`join_command`] produces them.
    fn invoke(&self, command: &str) -> Result<String, ChannelError>;
}

impl<T: CommandChannel + ?Sized> CommandChannel for &T {
    fn invoke(&self, command: &str) -> Result<String, ChannelError> {
        (**self).invoke(command)
    }
}

/// Client for interacting with tmux via CLI
#[derive(Debug, Clone)]
pub struct TmuxClient {
    config: ClientConfig,
}

impl TmuxClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check if tmux server is running
    pub fn is_server_running(&self) -> bool {
        self.command()
            .arg("list-sessions")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.config.binary);
        if let Some(socket) = &self.config.socket {
            command.args(["-L", socket.as_str()]);
        }
        command
    }
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandChannel for TmuxClient {
    fn invoke(&self, command: &str) -> Result<String, ChannelError> {
        let args = split_command(command)?;
        if self.config.verbose {
            info!(binary = %self.config.binary, command, "invoking tmux");
        } else {
            debug!(binary = %self.config.binary, command, "invoking tmux");
        }

        let output = self
            .command()
            .args(&args)
            .output()
            .map_err(|source| ChannelError::Spawn {
                binary: self.config.binary.clone(),
                source,
            })?;

        // stdout and stderr are read as one stream, as `2>&1` would
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        check_output(&args, output.status.success(), text)
    }
}

/// Turn a finished tmux run into the channel result.
///
/// A failing `set-option` still yields its text, because the option store
/// reads the `value is invalid:` reply itself. Every other failure is an error.
fn check_output(args: &[String], success: bool, text: String) -> Result<String, ChannelError> {
    if let Some(rest) = text.strip_prefix("unknown command:") {
        return Err(ChannelError::UnknownCommand(rest.trim().to_string()));
    }

    let verb = args.first().map(String::as_str).unwrap_or_default();
    if !success && verb != "set-option" {
        return Err(ChannelError::Failed {
            command: verb.to_string(),
            output: text.trim_end().to_string(),
        });
    }
    Ok(text)
}

/// Split a command line into arguments with POSIX shell quoting rules
pub fn split_command(command: &str) -> Result<Vec<String>, ChannelError> {
    shell_words::split(command).map_err(|source| ChannelError::Tokenize {
        command: command.to_string(),
        source,
    })
}

/// Join arguments into a command line that [`split_command`] takes apart
/// into exactly the same arguments
pub fn join_command<S: AsRef<str>>(args: &[S]) -> String {
    shell_words::join(args)
}
