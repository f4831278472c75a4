use super::animation::bone::Bone;
use super::animation::skeleton::Skeleton;
use super::animation::state::SkeletonState;
use super::animation::timeline::Animation;
use super::error::{check_index, Collection, CoreError, Result};
use super::patch::{Field, Patch};
use super::settings::ProjectSettings;
use super::view::{ModelEvent, ViewHandle, ViewRegistry};
use serde::Serialize;
use tracing::{debug, info};

/// What the user is currently editing. Positional, so anything that
/// removes or inserts entities goes through [`Project`] to keep it in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum ActiveElement {
    #[default]
    Project,
    Skeleton(usize),
    Bone { skeleton: usize, bone: usize },
    Animation(usize),
    State { animation: usize, state: usize },
}

impl ActiveElement {
    pub fn skeleton_index(&self) -> Option<usize> {
        match *self {
            ActiveElement::Skeleton(s) | ActiveElement::Bone { skeleton: s, .. } => Some(s),
            _ => None,
        }
    }

    pub fn animation_index(&self) -> Option<usize> {
        match *self {
            ActiveElement::Animation(a) | ActiveElement::State { animation: a, .. } => Some(a),
            _ => None,
        }
    }
}

/// Position shift applied to the active element when a collection changes.
#[derive(Clone, Copy)]
enum Shift {
    Removed(usize),
    Inserted(usize),
}

impl Shift {
    /// `None` when the active index itself was removed.
    fn apply(self, index: usize) -> Option<usize> {
        match self {
            Shift::Removed(at) if index == at => None,
            Shift::Removed(at) if index > at => Some(index - 1),
            Shift::Inserted(at) if index >= at => Some(index + 1),
            _ => Some(index),
        }
    }
}

/// Root aggregate of an editing session.
#[derive(Debug, Default)]
pub struct Project {
    settings: ProjectSettings,
    skeletons: Vec<Skeleton>,
    animations: Vec<Animation>,
    active: ActiveElement,
    views: ViewRegistry,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ProjectSettings) -> Self {
        Self { settings, ..Self::default() }
    }

    pub fn settings(&self) -> &ProjectSettings { &self.settings }

    // --- views ---

    pub fn register_view(&mut self, view: ViewHandle) {
        self.views.register(view);
    }

    pub fn number_of_views(&self) -> usize { self.views.len() }

    pub fn notify(&self, event: ModelEvent) -> usize {
        self.views.notify(self, &event)
    }

    pub fn update_views(&self) -> usize {
        self.notify(ModelEvent::Refresh)
    }

    // --- skeletons ---

    pub fn skeletons(&self) -> &[Skeleton] { &self.skeletons }
    pub fn number_of_skeletons(&self) -> usize { self.skeletons.len() }

    pub fn has_skeleton(&self, name: &str) -> bool {
        self.skeletons.iter().any(|s| s.name() == name)
    }

    pub fn skeleton_index(&self, name: &str) -> Option<usize> {
        self.skeletons.iter().position(|s| s.name() == name)
    }

    pub fn skeleton_by_name(&self, name: &str) -> Option<&Skeleton> {
        self.skeletons.iter().find(|s| s.name() == name)
    }

    pub fn get_skeleton(&self, index: usize) -> Result<&Skeleton> {
        check_index(Collection::Skeletons, index, self.skeletons.len())?;
        Ok(&self.skeletons[index])
    }

    /// Direct access for building content. Renames made here bypass the
    /// uniqueness check; use [`Project::patch_element`] for edits.
    pub fn skeleton_mut(&mut self, index: usize) -> Result<&mut Skeleton> {
        check_index(Collection::Skeletons, index, self.skeletons.len())?;
        Ok(&mut self.skeletons[index])
    }

    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> Result<usize> {
        let index = self.skeletons.len();
        self.insert_skeleton(index, skeleton)?;
        Ok(index)
    }

    pub fn insert_skeleton(&mut self, index: usize, skeleton: Skeleton) -> Result<()> {
        if self.has_skeleton(skeleton.name()) {
            return Err(CoreError::NameConflict { collection: Collection::Skeletons, name: skeleton.name().to_string() });
        }
        check_index(Collection::Skeletons, index, self.skeletons.len() + 1)?;
        debug!(skeleton = skeleton.name(), index, "Skeleton added");
        self.skeletons.insert(index, skeleton);
        self.shift_skeletons(Shift::Inserted(index));
        Ok(())
    }

    /// Fails while an animation is still bound to the skeleton.
    pub fn remove_skeleton(&mut self, index: usize) -> Result<Skeleton> {
        check_index(Collection::Skeletons, index, self.skeletons.len())?;
        let name = self.skeletons[index].name();
        if let Some(anim) = self.animations.iter().find(|a| a.skeleton_name() == Some(name)) {
            return Err(CoreError::SkeletonInUse { skeleton: name.to_string(), animation: anim.name().to_string() });
        }
        let skeleton = self.skeletons.remove(index);
        self.shift_skeletons(Shift::Removed(index));
        debug!(skeleton = skeleton.name(), index, "Skeleton removed");
        Ok(skeleton)
    }

    // --- bones ---

    pub fn add_bone(&mut self, skeleton: usize, bone: Bone) -> Result<usize> {
        let skel = self.skeleton_mut(skeleton)?;
        skel.add_bone(bone);
        Ok(skel.number_of_bones() - 1)
    }

    pub fn insert_bone(&mut self, skeleton: usize, index: usize, bone: Bone) -> Result<()> {
        self.skeleton_mut(skeleton)?.insert_bone(index, bone)?;
        self.shift_bones(skeleton, Shift::Inserted(index));
        Ok(())
    }

    pub fn remove_bone(&mut self, skeleton: usize, index: usize) -> Result<Bone> {
        let bone = self.skeleton_mut(skeleton)?.remove_bone(index)?;
        self.shift_bones(skeleton, Shift::Removed(index));
        Ok(bone)
    }

    // --- animations ---

    pub fn animations(&self) -> &[Animation] { &self.animations }
    pub fn number_of_animations(&self) -> usize { self.animations.len() }

    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.iter().any(|a| a.name() == name)
    }

    pub fn animation_by_name(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name() == name)
    }

    pub fn get_animation(&self, index: usize) -> Result<&Animation> {
        check_index(Collection::Animations, index, self.animations.len())?;
        Ok(&self.animations[index])
    }

    pub fn animation_mut(&mut self, index: usize) -> Result<&mut Animation> {
        check_index(Collection::Animations, index, self.animations.len())?;
        Ok(&mut self.animations[index])
    }

    pub fn add_animation(&mut self, animation: Animation) -> Result<usize> {
        let index = self.animations.len();
        self.insert_animation(index, animation)?;
        Ok(index)
    }

    /// The animation's skeleton, when bound, must be part of the project.
    pub fn insert_animation(&mut self, index: usize, animation: Animation) -> Result<()> {
        if self.has_animation(animation.name()) {
            return Err(CoreError::NameConflict { collection: Collection::Animations, name: animation.name().to_string() });
        }
        if let Some(skel) = animation.skeleton_name() {
            if !self.has_skeleton(skel) {
                return Err(CoreError::UnknownSkeleton(skel.to_string()));
            }
        }
        check_index(Collection::Animations, index, self.animations.len() + 1)?;
        debug!(animation = animation.name(), index, "Animation added");
        self.animations.insert(index, animation);
        self.shift_animations(Shift::Inserted(index));
        Ok(())
    }

    pub fn remove_animation(&mut self, index: usize) -> Result<Animation> {
        check_index(Collection::Animations, index, self.animations.len())?;
        let animation = self.animations.remove(index);
        self.shift_animations(Shift::Removed(index));
        debug!(animation = animation.name(), index, "Animation removed");
        Ok(animation)
    }

    // --- states ---

    pub fn add_state(&mut self, animation: usize, state: SkeletonState, transition_time: f64) -> Result<usize> {
        let anim = self.animation_mut(animation)?;
        anim.add_state(state, transition_time)?;
        Ok(anim.number_of_states() - 1)
    }

    pub fn insert_state(&mut self, animation: usize, index: usize, state: SkeletonState, transition: Option<f64>) -> Result<()> {
        self.animation_mut(animation)?.insert_state(index, state, transition)?;
        self.shift_states(animation, Shift::Inserted(index));
        Ok(())
    }

    pub fn remove_state(&mut self, animation: usize, index: usize) -> Result<(SkeletonState, Option<f64>)> {
        let removed = self.animation_mut(animation)?.remove_state(index)?;
        self.shift_states(animation, Shift::Removed(index));
        Ok(removed)
    }

    /// Writes a pose into the skeleton it names and returns the pose that
    /// restores the previous bone values.
    pub fn apply_pose(&mut self, state: &SkeletonState) -> Result<SkeletonState> {
        let name = state.skeleton_name().ok_or(CoreError::UnboundState)?;
        let index = self.skeleton_index(name).ok_or_else(|| CoreError::UnknownSkeleton(name.to_string()))?;
        state.apply(&mut self.skeletons[index])
    }

    // --- active element ---

    pub fn active_element(&self) -> ActiveElement { self.active }

    pub fn check_element(&self, element: &ActiveElement) -> Result<()> {
        match *element {
            ActiveElement::Project => Ok(()),
            ActiveElement::Skeleton(s) => self.get_skeleton(s).map(|_| ()),
            ActiveElement::Bone { skeleton, bone } => self.get_skeleton(skeleton)?.get_bone(bone).map(|_| ()),
            ActiveElement::Animation(a) => self.get_animation(a).map(|_| ()),
            ActiveElement::State { animation, state } => self.get_animation(animation)?.get_state(state).map(|_| ()),
        }
    }

    /// Makes `element` active and returns what was active before.
    pub fn set_active_element(&mut self, element: ActiveElement) -> Result<ActiveElement> {
        self.check_element(&element)?;
        Ok(std::mem::replace(&mut self.active, element))
    }

    pub fn active_skeleton(&self) -> Option<&Skeleton> {
        self.active.skeleton_index().and_then(|i| self.skeletons.get(i))
    }

    pub fn active_bone(&self) -> Option<&Bone> {
        match self.active {
            ActiveElement::Bone { skeleton, bone } => self.skeletons.get(skeleton)?.get_bone(bone).ok(),
            _ => None,
        }
    }

    pub fn active_animation(&self) -> Option<&Animation> {
        self.active.animation_index().and_then(|i| self.animations.get(i))
    }

    pub fn patch_active(&mut self, changes: &Patch) -> Result<Patch> {
        let target = self.active;
        self.patch_element(&target, changes)
    }

    /// Routes `changes` to the entity behind `target` and returns the inverse
    /// patch. Skeleton and animation renames keep names unique; a skeleton
    /// rename re-points every animation bound to the old name.
    pub fn patch_element(&mut self, target: &ActiveElement, changes: &Patch) -> Result<Patch> {
        match *target {
            // neither the project nor a state has patchable attributes
            ActiveElement::Project | ActiveElement::State { .. } => {
                self.check_element(target)?;
                Ok(Patch::new())
            }
            ActiveElement::Skeleton(index) => {
                check_index(Collection::Skeletons, index, self.skeletons.len())?;
                if let Some(new_name) = changes.text(Field::Name)? {
                    let taken = self.skeletons.iter().enumerate().any(|(i, s)| i != index && s.name() == new_name);
                    if taken {
                        return Err(CoreError::NameConflict { collection: Collection::Skeletons, name: new_name.to_string() });
                    }
                }
                let old_name = self.skeletons[index].name().to_string();
                let inverse = self.skeletons[index].process_patch(changes)?;
                let new_name = self.skeletons[index].name().to_string();
                if new_name != old_name {
                    for anim in self.animations.iter_mut().filter(|a| a.skeleton_name() == Some(old_name.as_str())) {
                        anim.rebind(Some(new_name.clone()));
                    }
                    info!(from = %old_name, to = %new_name, "Skeleton renamed");
                }
                Ok(inverse)
            }
            ActiveElement::Bone { skeleton, bone } => self.skeleton_mut(skeleton)?.update_bone(bone, changes),
            ActiveElement::Animation(index) => {
                check_index(Collection::Animations, index, self.animations.len())?;
                if let Some(new_name) = changes.text(Field::Name)? {
                    let taken = self.animations.iter().enumerate().any(|(i, a)| i != index && a.name() == new_name);
                    if taken {
                        return Err(CoreError::NameConflict { collection: Collection::Animations, name: new_name.to_string() });
                    }
                }
                self.animations[index].process_patch(changes)
            }
        }
    }

    fn shift_skeletons(&mut self, shift: Shift) {
        self.active = match self.active {
            ActiveElement::Skeleton(s) => shift.apply(s).map_or(ActiveElement::Project, ActiveElement::Skeleton),
            ActiveElement::Bone { skeleton, bone } => shift
                .apply(skeleton)
                .map_or(ActiveElement::Project, |skeleton| ActiveElement::Bone { skeleton, bone }),
            other => other,
        };
    }

    fn shift_bones(&mut self, skeleton: usize, shift: Shift) {
        if let ActiveElement::Bone { skeleton: s, bone } = self.active {
            if s == skeleton {
                self.active = shift
                    .apply(bone)
                    .map_or(ActiveElement::Skeleton(s), |bone| ActiveElement::Bone { skeleton: s, bone });
            }
        }
    }

    fn shift_animations(&mut self, shift: Shift) {
        self.active = match self.active {
            ActiveElement::Animation(a) => shift.apply(a).map_or(ActiveElement::Project, ActiveElement::Animation),
            ActiveElement::State { animation, state } => shift
                .apply(animation)
                .map_or(ActiveElement::Project, |animation| ActiveElement::State { animation, state }),
            other => other,
        };
    }

    fn shift_states(&mut self, animation: usize, shift: Shift) {
        if let ActiveElement::State { animation: a, state } = self.active {
            if a == animation {
                self.active = shift
                    .apply(state)
                    .map_or(ActiveElement::Animation(a), |state| ActiveElement::State { animation: a, state });
            }
        }
    }

    /// Swaps in freshly loaded content, selects the project and tells every
    /// view. Settings and views are kept.
    pub fn replace_contents(&mut self, skeletons: Vec<Skeleton>, animations: Vec<Animation>) {
        self.skeletons = skeletons;
        self.animations = animations;
        self.active = ActiveElement::Project;
        info!(skeletons = self.skeletons.len(), animations = self.animations.len(), "Project contents replaced");
        self.notify(ModelEvent::Loaded);
    }

    /// Observable state as JSON, for comparisons and debugging.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "skeletons": self.skeletons,
            "animations": self.animations,
            "active": self.active,
        })
    }
}

#[cfg(test)]
mod tests;
