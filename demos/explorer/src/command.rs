//! Commands handlers send back to the host loop
//!
//! Handlers are synchronous; they only describe the work. The host loop
//! receives these commands, applies quick ones immediately and runs slow ones
//! on tokio tasks.

use actionkit::ActionContext;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deploy,
    Start,
    Stop,
    Restart,
    Refresh,
    PushImage,
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Deploy => "Deploying",
            Operation::Start => "Starting",
            Operation::Stop => "Stopping",
            Operation::Restart => "Restarting",
            Operation::Refresh => "Refreshing",
            Operation::PushImage => "Pushing image to",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Long-running work against a resource
    Run { op: Operation, name: String },
    OpenPortal(String),
    TogglePin(String),
    ToggleAdmin(String),
    CopyName(String),
}

/// Sender handed to handlers through the action context
#[derive(Debug, Clone)]
pub struct Commands(mpsc::UnboundedSender<Command>);

impl Commands {
    pub fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self(tx)
    }

    pub fn send(&self, command: Command) {
        if self.0.send(command).is_err() {
            tracing::debug!("Command channel closed, dropping command");
        }
    }
}

/// Send `command` through the context's [`Commands`], if any
pub fn send(ctx: &ActionContext, command: Command) {
    match ctx.get::<Commands>() {
        Some(commands) => commands.send(command),
        None => tracing::warn!(?command, "No command sender in context"),
    }
}
