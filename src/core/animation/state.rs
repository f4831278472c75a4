use super::skeleton::Skeleton;
use crate::core::error::{check_index, Collection, CoreError, Result};
use crate::core::patch::Patch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One pose: per-bone overrides for a single skeleton, which is referenced
/// by name and may be bound later.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkeletonState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skeleton_name: Option<String>,
    #[serde(default)]
    bone_updates: BTreeMap<usize, Patch>,
}

impl SkeletonState {
    pub fn new(skeleton: Option<&Skeleton>) -> Self {
        Self { skeleton_name: skeleton.map(|s| s.name().to_string()), bone_updates: BTreeMap::new() }
    }

    pub fn for_skeleton(name: impl Into<String>) -> Self {
        Self { skeleton_name: Some(name.into()), bone_updates: BTreeMap::new() }
    }

    pub fn with_update(mut self, bone_index: usize, changes: Patch) -> Self {
        self.bone_updates.insert(bone_index, changes);
        self
    }

    pub fn skeleton_name(&self) -> Option<&str> { self.skeleton_name.as_deref() }
    pub fn bone_updates(&self) -> &BTreeMap<usize, Patch> { &self.bone_updates }

    pub fn set_skeleton(&mut self, skeleton_name: Option<String>) {
        self.skeleton_name = skeleton_name;
    }

    /// Writes every override into `skeleton` through `update_bone` and
    /// returns the state that restores the previous pose. Either all bones
    /// are updated or none are.
    pub fn apply(&self, skeleton: &mut Skeleton) -> Result<SkeletonState> {
        if self.skeleton_name.as_deref() != Some(skeleton.name()) {
            return Err(CoreError::SkeletonMismatch {
                expected: skeleton.name().to_string(),
                found: self.skeleton_name.clone(),
            });
        }
        for &index in self.bone_updates.keys() {
            check_index(Collection::Bones, index, skeleton.number_of_bones())?;
        }

        let mut inverse = SkeletonState::new(Some(skeleton));
        for (&index, changes) in &self.bone_updates {
            match skeleton.update_bone(index, changes) {
                Ok(old) => { inverse.bone_updates.insert(index, old); }
                Err(e) => {
                    for (&done, old) in inverse.bone_updates.iter().rev() {
                        let _ = skeleton.update_bone(done, old);
                    }
                    return Err(e);
                }
            }
        }
        Ok(inverse)
    }
}
