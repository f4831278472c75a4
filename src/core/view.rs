//! Observer side of the model: presentation surfaces register once and are
//! told, in registration order, whenever the observable state changed.

use super::project::Project;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// A command was applied; carries its label.
    Applied(String),
    /// A command was reverted; carries its label.
    Reverted(String),
    Loaded,
    Refresh,
}

pub type ViewResult = Result<(), Box<dyn std::error::Error>>;

pub trait View {
    fn on_model_changed(&mut self, project: &Project, event: &ModelEvent) -> ViewResult;

    fn name(&self) -> &str { "view" }
}

pub type ViewHandle = Rc<RefCell<dyn View>>;

#[derive(Default)]
pub struct ViewRegistry {
    views: Vec<ViewHandle>,
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry").field("views", &self.views.len()).finish()
    }
}

impl ViewRegistry {
    pub fn register(&mut self, view: ViewHandle) {
        self.views.push(view);
    }

    pub fn len(&self) -> usize { self.views.len() }
    pub fn is_empty(&self) -> bool { self.views.is_empty() }

    /// Calls every view in order. A view that fails, or is already borrowed
    /// because it triggered this broadcast itself, is logged and skipped.
    /// Returns how many views completed.
    pub fn notify(&self, project: &Project, event: &ModelEvent) -> usize {
        let mut delivered = 0;
        for (index, view) in self.views.iter().enumerate() {
            let Ok(mut view) = view.try_borrow_mut() else {
                warn!(index, ?event, "View is busy, skipping notification");
                continue;
            };
            match view.on_model_changed(project, event) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(index, view = view.name(), error = %e, "View failed to handle model change"),
            }
        }
        debug!(?event, delivered, total = self.views.len(), "Model change broadcast");
        delivered
    }
}
