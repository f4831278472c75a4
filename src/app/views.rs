use crate::core::project::{ActiveElement, Project};
use crate::core::view::{ModelEvent, View, ViewResult};
use crate::render::primitives::{primitives_for_active, Primitive};
use rust_i18n::t;

/// Text outline of the project, the model behind a tree widget. Rebuilt on
/// every change; the active element's line starts with `>`.
#[derive(Debug, Default)]
pub struct HierarchyView {
    lines: Vec<String>,
    updates: usize,
}

impl HierarchyView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] { &self.lines }
    pub fn updates(&self) -> usize { self.updates }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, depth: usize, active: bool, text: String) {
        let marker = if active { ">" } else { " " };
        self.lines.push(format!("{marker}{}{text}", "  ".repeat(depth)));
    }

    pub fn rebuild(&mut self, project: &Project) {
        self.lines.clear();
        let active = project.active_element();

        self.push(0, active == ActiveElement::Project, t!("tree.animations").to_string());
        for (a, anim) in project.animations().iter().enumerate() {
            let skeleton = anim.skeleton_name().unwrap_or("-");
            self.push(1, active == ActiveElement::Animation(a), format!("{} [{skeleton}]", anim.name()));
            for s in 0..anim.number_of_states() {
                let into = anim.transition_into(s).unwrap_or_default();
                let text = t!("tree.state", index = s, time = into).to_string();
                self.push(2, active == ActiveElement::State { animation: a, state: s }, text);
            }
        }

        self.push(0, false, t!("tree.skeletons").to_string());
        for (s, skeleton) in project.skeletons().iter().enumerate() {
            self.push(1, active == ActiveElement::Skeleton(s), skeleton.name().to_string());
            for (b, bone) in skeleton.bones().enumerate() {
                let text = format!("{} ({})", bone.name().unwrap_or("-"), bone.type_name());
                self.push(2, active == ActiveElement::Bone { skeleton: s, bone: b }, text);
            }
        }
    }
}

impl View for HierarchyView {
    fn on_model_changed(&mut self, project: &Project, _event: &ModelEvent) -> ViewResult {
        self.rebuild(project);
        self.updates += 1;
        Ok(())
    }

    fn name(&self) -> &str { "hierarchy" }
}

/// Keeps what the canvas would draw for the current selection.
#[derive(Debug, Default)]
pub struct CanvasView {
    primitives: Vec<Primitive>,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] { &self.primitives }
}

impl View for CanvasView {
    fn on_model_changed(&mut self, project: &Project, _event: &ModelEvent) -> ViewResult {
        self.primitives = primitives_for_active(project);
        Ok(())
    }

    fn name(&self) -> &str { "canvas" }
}
