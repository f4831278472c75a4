use crate::core::animation::bone::Bone;
use crate::core::animation::skeleton::Skeleton;
use crate::core::animation::state::SkeletonState;
use crate::core::animation::timeline::Animation;
use crate::core::error::{CoreError, Result};
use crate::core::patch::Patch;
use crate::core::project::{ActiveElement, Project};
use std::fmt::Debug;

/// A reversible edit. `apply` may run again after `revert` (redo), so each
/// command re-captures whatever it needs to undo itself on every apply.
pub trait Command: Debug {
    fn apply(&mut self, project: &mut Project) -> Result<()>;
    fn revert(&mut self, project: &mut Project) -> Result<()>;
    fn label(&self) -> String;
}

fn not_applied(label: String) -> CoreError {
    CoreError::NotApplied(label)
}

fn active_skeleton(project: &Project) -> Result<usize> {
    project
        .active_element()
        .skeleton_index()
        .ok_or_else(|| CoreError::InactiveElement("skeleton".into()))
}

fn active_animation(project: &Project) -> Result<usize> {
    project
        .active_element()
        .animation_index()
        .ok_or_else(|| CoreError::InactiveElement("animation".into()))
}

/// Patches the element that is active when the command first runs; redo
/// and undo keep addressing that same element.
#[derive(Debug, Clone)]
pub struct PatchCommand {
    changes: Patch,
    target: Option<ActiveElement>,
    inverse: Option<Patch>,
}

impl PatchCommand {
    pub fn new(changes: Patch) -> Self {
        Self { changes, target: None, inverse: None }
    }

    pub fn on(target: ActiveElement, changes: Patch) -> Self {
        Self { changes, target: Some(target), inverse: None }
    }

    pub fn target(&self) -> Option<ActiveElement> { self.target }
}

impl Command for PatchCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let target = self.target.unwrap_or_else(|| project.active_element());
        self.inverse = Some(project.patch_element(&target, &self.changes)?);
        self.target = Some(target);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let (Some(target), Some(inverse)) = (self.target, self.inverse.as_ref()) else {
            return Err(not_applied(self.label()));
        };
        project.patch_element(&target, inverse)?;
        Ok(())
    }

    fn label(&self) -> String {
        let fields: Vec<&str> = self.changes.iter().map(|(f, _)| f.as_str()).collect();
        format!("Change {}", fields.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct SelectCommand {
    element: ActiveElement,
    previous: Option<ActiveElement>,
}

impl SelectCommand {
    pub fn new(element: ActiveElement) -> Self {
        Self { element, previous: None }
    }
}

impl Command for SelectCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        self.previous = Some(project.set_active_element(self.element)?);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let previous = self.previous.ok_or_else(|| not_applied(self.label()))?;
        project.set_active_element(previous)?;
        Ok(())
    }

    fn label(&self) -> String { "Select".into() }
}

#[derive(Debug, Clone)]
pub struct AddSkeletonCommand {
    skeleton: Skeleton,
    added_id: Option<usize>,
}

impl AddSkeletonCommand {
    pub fn new(skeleton: Skeleton) -> Self {
        Self { skeleton, added_id: None }
    }
}

impl Command for AddSkeletonCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        self.added_id = Some(project.add_skeleton(self.skeleton.clone())?);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let index = self.added_id.ok_or_else(|| not_applied(self.label()))?;
        self.skeleton = project.remove_skeleton(index)?;
        Ok(())
    }

    fn label(&self) -> String { format!("Add skeleton {}", self.skeleton.name()) }
}

#[derive(Debug, Clone)]
pub struct RemoveSkeletonCommand {
    index: usize,
    removed: Option<Skeleton>,
    active: Option<ActiveElement>,
}

impl RemoveSkeletonCommand {
    pub fn new(index: usize) -> Self {
        Self { index, removed: None, active: None }
    }
}

impl Command for RemoveSkeletonCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let active = project.active_element();
        self.removed = Some(project.remove_skeleton(self.index)?);
        self.active = Some(active);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let skeleton = self.removed.take().ok_or_else(|| not_applied(self.label()))?;
        if let Err(e) = project.insert_skeleton(self.index, skeleton.clone()) {
            self.removed = Some(skeleton);
            return Err(e);
        }
        if let Some(active) = self.active.take() {
            project.set_active_element(active)?;
        }
        Ok(())
    }

    fn label(&self) -> String { format!("Remove skeleton {}", self.index) }
}

/// Appends a bone to the skeleton that is active when first applied.
#[derive(Debug, Clone)]
pub struct AddBoneCommand {
    bone: Bone,
    target: Option<usize>,
    added_id: Option<usize>,
}

impl AddBoneCommand {
    pub fn new(bone: Bone) -> Self {
        Self { bone, target: None, added_id: None }
    }

    pub fn to_skeleton(skeleton: usize, bone: Bone) -> Self {
        Self { bone, target: Some(skeleton), added_id: None }
    }
}

impl Command for AddBoneCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let skeleton = match self.target {
            Some(s) => s,
            None => active_skeleton(project)?,
        };
        self.added_id = Some(project.add_bone(skeleton, self.bone.clone())?);
        self.target = Some(skeleton);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let (Some(skeleton), Some(index)) = (self.target, self.added_id) else {
            return Err(not_applied(self.label()));
        };
        // keep the auto-assigned name so redo reproduces the same bone
        self.bone = project.remove_bone(skeleton, index)?;
        Ok(())
    }

    fn label(&self) -> String { format!("Add {} bone", self.bone.type_name().to_lowercase()) }
}

#[derive(Debug, Clone)]
pub struct RemoveBoneCommand {
    index: usize,
    target: Option<usize>,
    removed: Option<Bone>,
    active: Option<ActiveElement>,
}

impl RemoveBoneCommand {
    pub fn new(index: usize) -> Self {
        Self { index, target: None, removed: None, active: None }
    }

    pub fn from_skeleton(skeleton: usize, index: usize) -> Self {
        Self { index, target: Some(skeleton), removed: None, active: None }
    }
}

impl Command for RemoveBoneCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let skeleton = match self.target {
            Some(s) => s,
            None => active_skeleton(project)?,
        };
        let active = project.active_element();
        self.removed = Some(project.remove_bone(skeleton, self.index)?);
        self.target = Some(skeleton);
        self.active = Some(active);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let (Some(skeleton), Some(bone)) = (self.target, self.removed.take()) else {
            return Err(not_applied(self.label()));
        };
        if let Err(e) = project.insert_bone(skeleton, self.index, bone.clone()) {
            self.removed = Some(bone);
            return Err(e);
        }
        if let Some(active) = self.active.take() {
            project.set_active_element(active)?;
        }
        Ok(())
    }

    fn label(&self) -> String { format!("Remove bone {}", self.index) }
}

#[derive(Debug, Clone)]
pub struct AddAnimationCommand {
    animation: Animation,
    added_id: Option<usize>,
}

impl AddAnimationCommand {
    pub fn new(animation: Animation) -> Self {
        Self { animation, added_id: None }
    }
}

impl Command for AddAnimationCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        self.added_id = Some(project.add_animation(self.animation.clone())?);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let index = self.added_id.ok_or_else(|| not_applied(self.label()))?;
        self.animation = project.remove_animation(index)?;
        Ok(())
    }

    fn label(&self) -> String { format!("Add animation {}", self.animation.name()) }
}

#[derive(Debug, Clone)]
pub struct RemoveAnimationCommand {
    index: usize,
    removed: Option<Animation>,
    active: Option<ActiveElement>,
}

impl RemoveAnimationCommand {
    pub fn new(index: usize) -> Self {
        Self { index, removed: None, active: None }
    }
}

impl Command for RemoveAnimationCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let active = project.active_element();
        self.removed = Some(project.remove_animation(self.index)?);
        self.active = Some(active);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let animation = self.removed.take().ok_or_else(|| not_applied(self.label()))?;
        if let Err(e) = project.insert_animation(self.index, animation.clone()) {
            self.removed = Some(animation);
            return Err(e);
        }
        if let Some(active) = self.active.take() {
            project.set_active_element(active)?;
        }
        Ok(())
    }

    fn label(&self) -> String { format!("Remove animation {}", self.index) }
}

/// Appends a state to the active animation.
#[derive(Debug, Clone)]
pub struct AddStateCommand {
    state: SkeletonState,
    transition_time: f64,
    target: Option<usize>,
    added_id: Option<usize>,
}

impl AddStateCommand {
    pub fn new(state: SkeletonState, transition_time: f64) -> Self {
        Self { state, transition_time, target: None, added_id: None }
    }
}

impl Command for AddStateCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let animation = match self.target {
            Some(a) => a,
            None => active_animation(project)?,
        };
        self.added_id = Some(project.add_state(animation, self.state.clone(), self.transition_time)?);
        self.target = Some(animation);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let (Some(animation), Some(index)) = (self.target, self.added_id) else {
            return Err(not_applied(self.label()));
        };
        project.remove_state(animation, index)?;
        Ok(())
    }

    fn label(&self) -> String { "Add state".into() }
}

#[derive(Debug, Clone)]
pub struct UpdateStateCommand {
    index: usize,
    state: SkeletonState,
    target: Option<usize>,
    previous: Option<SkeletonState>,
}

impl UpdateStateCommand {
    pub fn new(index: usize, state: SkeletonState) -> Self {
        Self { index, state, target: None, previous: None }
    }
}

impl Command for UpdateStateCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let animation = match self.target {
            Some(a) => a,
            None => active_animation(project)?,
        };
        let previous = project.animation_mut(animation)?.update_state(self.index, self.state.clone())?;
        self.previous = Some(previous);
        self.target = Some(animation);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let (Some(animation), Some(previous)) = (self.target, self.previous.clone()) else {
            return Err(not_applied(self.label()));
        };
        project.animation_mut(animation)?.update_state(self.index, previous)?;
        Ok(())
    }

    fn label(&self) -> String { format!("Update state {}", self.index) }
}

#[derive(Debug, Clone)]
pub struct RemoveStateCommand {
    index: usize,
    target: Option<usize>,
    removed: Option<(SkeletonState, Option<f64>)>,
    active: Option<ActiveElement>,
}

impl RemoveStateCommand {
    pub fn new(index: usize) -> Self {
        Self { index, target: None, removed: None, active: None }
    }
}

impl Command for RemoveStateCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let animation = match self.target {
            Some(a) => a,
            None => active_animation(project)?,
        };
        let active = project.active_element();
        self.removed = Some(project.remove_state(animation, self.index)?);
        self.target = Some(animation);
        self.active = Some(active);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let (Some(animation), Some((state, transition))) = (self.target, self.removed.clone()) else {
            return Err(not_applied(self.label()));
        };
        project.insert_state(animation, self.index, state, transition)?;
        self.removed = None;
        if let Some(active) = self.active.take() {
            project.set_active_element(active)?;
        }
        Ok(())
    }

    fn label(&self) -> String { format!("Remove state {}", self.index) }
}

#[derive(Debug, Clone)]
pub struct ChangeTransitionCommand {
    index: usize,
    value: f64,
    target: Option<usize>,
    previous: Option<f64>,
}

impl ChangeTransitionCommand {
    pub fn new(index: usize, value: f64) -> Self {
        Self { index, value, target: None, previous: None }
    }
}

impl Command for ChangeTransitionCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let animation = match self.target {
            Some(a) => a,
            None => active_animation(project)?,
        };
        self.previous = Some(project.animation_mut(animation)?.change_transition_time(self.index, self.value)?);
        self.target = Some(animation);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let (Some(animation), Some(previous)) = (self.target, self.previous) else {
            return Err(not_applied(self.label()));
        };
        project.animation_mut(animation)?.change_transition_time(self.index, previous)?;
        Ok(())
    }

    fn label(&self) -> String { format!("Change transition {} to {}", self.index, self.value) }
}

/// Poses the skeleton with a stored state of the active animation.
#[derive(Debug, Clone)]
pub struct ApplyStateCommand {
    index: usize,
    target: Option<usize>,
    restore: Option<SkeletonState>,
}

impl ApplyStateCommand {
    pub fn new(index: usize) -> Self {
        Self { index, target: None, restore: None }
    }
}

impl Command for ApplyStateCommand {
    fn apply(&mut self, project: &mut Project) -> Result<()> {
        let animation = match self.target {
            Some(a) => a,
            None => active_animation(project)?,
        };
        let state = project.get_animation(animation)?.get_state(self.index)?.clone();
        self.restore = Some(project.apply_pose(&state)?);
        self.target = Some(animation);
        Ok(())
    }

    fn revert(&mut self, project: &mut Project) -> Result<()> {
        let restore = self.restore.as_ref().ok_or_else(|| not_applied(self.label()))?;
        project.apply_pose(restore)?;
        self.restore = None;
        Ok(())
    }

    fn label(&self) -> String { format!("Apply state {}", self.index) }
}
