use derive_more::{AsRef, Deref, Display, From, Into};
use metaball::Clickable;
use serde::{Deserialize, Serialize};
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ShellCommand(String);

metaball::impl_string_newtype!(ShellCommand);

/// Starts `sh -c <command>` with output discarded. A waiter thread reaps the
/// child when it exits and yields its status.
fn spawn_reaped(command: &ShellCommand) -> io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command.as_str())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let name = command.to_string();
    Ok(thread::spawn(move || match child.wait() {
        Ok(status) => {
            if !status.success() {
                log::warn!("'{}' exited with {}", name, status);
            }
            Some(status)
        }
        Err(e) => {
            log::error!("Failed to wait for '{}': {}", name, e);
            None
        }
    }))
}

/// Click action that launches a shell command without waiting for it.
#[derive(Debug, Clone)]
pub struct ExecAction {
    command: ShellCommand,
}

impl ExecAction {
    pub fn new(command: ShellCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &ShellCommand {
        &self.command
    }
}

impl Clickable for ExecAction {
    fn on_click(&self) -> anyhow::Result<()> {
        if self.command.trim().is_empty() {
            anyhow::bail!("empty command");
        }

        log::info!("Running '{}'", self.command);
        spawn_reaped(&self.command)?;
        Ok(())
    }
}
