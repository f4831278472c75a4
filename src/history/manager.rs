use super::command::Command;
use crate::core::error::Result;
use crate::core::project::Project;
use crate::core::view::ModelEvent;
use serde::Deserialize;
use tracing::{debug, warn};

/// What happens to undone commands when a new one is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedoPolicy {
    /// Undone commands stay in the log after the new one; a later redo may
    /// replay them on top of it.
    #[default]
    Keep,
    /// Undone commands are discarded, as most editors do.
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_steps: Option<usize>,
    pub redo_policy: RedoPolicy,
}

/// Command log with a cursor at the last applied command. Every successful
/// apply or revert is broadcast to the project's views.
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<Box<dyn Command>>,
    last_id: Option<usize>,
    config: HistoryConfig,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> HistoryConfig { self.config }
    pub fn len(&self) -> usize { self.commands.len() }
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }
    pub fn last_id(&self) -> Option<usize> { self.last_id }

    /// Number of commands currently applied.
    fn applied(&self) -> usize { self.last_id.map_or(0, |i| i + 1) }

    pub fn can_undo(&self) -> bool { self.last_id.is_some() }
    pub fn can_redo(&self) -> bool { self.applied() < self.commands.len() }

    pub fn labels(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.label()).collect()
    }

    /// Appends `command` and redoes once. Under [`RedoPolicy::Keep`] that
    /// redo runs the first pending command, which is only `command` itself
    /// when nothing was undone. `command` is dropped only if its own apply
    /// failed; a failing pending command leaves the log as it was.
    pub fn add_command(&mut self, project: &mut Project, command: Box<dyn Command>) -> Result<()> {
        if self.can_redo() {
            match self.config.redo_policy {
                RedoPolicy::Truncate => {
                    debug!(discarded = self.commands.len() - self.applied(), "Redo branch discarded");
                    self.commands.truncate(self.applied());
                }
                RedoPolicy::Keep => warn!(
                    pending = self.commands.len() - self.applied(),
                    label = %command.label(),
                    "Command added while undone commands are pending; redo replays those first"
                ),
            }
        }
        self.commands.push(command);
        let added = self.commands.len() - 1;
        if let Err(e) = self.redo(project) {
            if self.applied() == added {
                self.commands.pop();
            }
            return Err(e);
        }
        self.enforce_capacity();
        Ok(())
    }

    /// Returns whether a command was reapplied.
    pub fn redo(&mut self, project: &mut Project) -> Result<bool> {
        let next = self.applied();
        let Some(command) = self.commands.get_mut(next) else { return Ok(false) };
        command.apply(project)?;
        let label = command.label();
        self.last_id = Some(next);
        debug!(id = next, %label, "Command applied");
        project.notify(ModelEvent::Applied(label));
        Ok(true)
    }

    /// Returns whether a command was reverted. A no-op at the start of the
    /// log, without any broadcast.
    pub fn undo(&mut self, project: &mut Project) -> Result<bool> {
        let Some(current) = self.last_id else { return Ok(false) };
        let command = &mut self.commands[current];
        command.revert(project)?;
        let label = command.label();
        self.last_id = current.checked_sub(1);
        debug!(id = current, %label, "Command reverted");
        project.notify(ModelEvent::Reverted(label));
        Ok(true)
    }

    pub fn reset(&mut self) {
        debug!(dropped = self.commands.len(), "History reset");
        self.commands.clear();
        self.last_id = None;
    }

    /// Forgets the oldest applied commands beyond `max_steps`. They stay
    /// applied to the project.
    fn enforce_capacity(&mut self) {
        let Some(max) = self.config.max_steps else { return };
        let excess = self.applied().saturating_sub(max);
        if excess == 0 {
            return;
        }
        self.commands.drain(..excess);
        self.last_id = self.last_id.and_then(|i| i.checked_sub(excess));
        debug!(excess, max, "Oldest commands dropped from history");
    }
}
