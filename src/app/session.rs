use crate::app::command_handler::CommandHandler;
use crate::app::commands::AppCommand;
use crate::app::error::Result;
use crate::core::project::Project;
use crate::core::settings::ProjectSettings;
use crate::core::view::ViewHandle;
use crate::format::project_dir::ProjectDir;
use crate::history::command::Command;
use crate::history::manager::{CommandList, HistoryConfig};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{info, warn};

/// One editing session: the project, its undo history and a queue of
/// pending user intents.
#[derive(Debug, Default)]
pub struct EditorSession {
    project: Project,
    history: CommandList,
    command_queue: VecDeque<AppCommand>,
    is_dirty: bool,
    error_message: Option<String>,
}

impl EditorSession {
    pub fn new(settings: ProjectSettings, config: HistoryConfig) -> Self {
        Self {
            project: Project::with_settings(settings),
            history: CommandList::with_config(config),
            ..Self::default()
        }
    }

    pub fn project(&self) -> &Project { &self.project }
    pub fn history(&self) -> &CommandList { &self.history }
    pub fn is_dirty(&self) -> bool { self.is_dirty }
    pub fn error_message(&self) -> Option<&str> { self.error_message.as_deref() }

    pub fn register_view(&mut self, view: ViewHandle) {
        self.project.register_view(view);
    }

    /// Runs `command` through history. Nothing is recorded if it fails.
    pub fn commit(&mut self, command: Box<dyn Command>) -> Result<()> {
        self.history.add_command(&mut self.project, command)?;
        self.is_dirty = true;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool> {
        let changed = self.history.undo(&mut self.project)?;
        self.is_dirty |= changed;
        Ok(changed)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let changed = self.history.redo(&mut self.project)?;
        self.is_dirty |= changed;
        Ok(changed)
    }

    fn project_dir(&self, dir: &Path) -> ProjectDir {
        ProjectDir::new(dir, self.project.settings())
    }

    pub fn save(&mut self, dir: &Path) -> Result<()> {
        self.project_dir(dir).save(&self.project)?;
        self.is_dirty = false;
        Ok(())
    }

    /// Replaces the project's contents and starts a fresh history. On
    /// failure both are left as they were.
    pub fn load(&mut self, dir: &Path) -> Result<()> {
        self.project_dir(dir).load_into(&mut self.project)?;
        self.history.reset();
        self.is_dirty = false;
        info!(dir = %dir.display(), "Session loaded project");
        Ok(())
    }

    pub fn enqueue_command(&mut self, cmd: AppCommand) {
        self.command_queue.push_back(cmd);
    }

    /// Executes queued intents in order. A failing intent is logged and kept
    /// as the current error message; the rest of the queue still runs.
    /// Returns how many succeeded.
    pub fn process_queue(&mut self) -> usize {
        let mut succeeded = 0;
        while let Some(cmd) = self.command_queue.pop_front() {
            match CommandHandler::execute(self, cmd) {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    warn!(error = %e, "Command failed");
                    self.error_message = Some(e.to_string());
                }
            }
        }
        succeeded
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
