use super::bone::Bone;
use crate::core::error::{check_index, Collection, CoreError, Result};
use crate::core::patch::{Field, Patch, PatchValue};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn unix_timestamp() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Named, ordered set of bones. Bone order is draw order and the index
/// states and commands address bones by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    #[serde(default)]
    name: String,
    bones: Vec<Bone>,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Skeleton {
    pub fn new(name: Option<String>) -> Self {
        let name = name.unwrap_or_else(|| format!("skeleton_{}", unix_timestamp()));
        Self { name, bones: Vec::new() }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()))
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn number_of_bones(&self) -> usize { self.bones.len() }
    pub fn is_empty(&self) -> bool { self.bones.is_empty() }
    pub fn bones(&self) -> impl Iterator<Item = &Bone> { self.bones.iter() }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn default_bone_name(&self, index: usize) -> String {
        format!("{}_bone_{}", self.name, index)
    }

    /// Names any unnamed bone after its index. Used after loading records
    /// that omit names.
    pub(crate) fn fill_default_names(&mut self) {
        for i in 0..self.bones.len() {
            if self.bones[i].name().is_none() {
                let name = self.default_bone_name(i);
                self.bones[i].common_mut().name = Some(name);
            }
        }
    }

    pub fn add_bone(&mut self, mut bone: Bone) {
        if bone.name().is_none() {
            bone.common_mut().name = Some(self.default_bone_name(self.bones.len()));
        }
        self.bones.push(bone);
    }

    /// Puts `bone` back at `index`, shifting later bones up.
    pub fn insert_bone(&mut self, index: usize, bone: Bone) -> Result<()> {
        check_index(Collection::Bones, index, self.bones.len() + 1)?;
        self.bones.insert(index, bone);
        Ok(())
    }

    pub fn remove_bone(&mut self, index: usize) -> Result<Bone> {
        check_index(Collection::Bones, index, self.bones.len())?;
        Ok(self.bones.remove(index))
    }

    pub fn update_bone(&mut self, index: usize, changes: &Patch) -> Result<Patch> {
        check_index(Collection::Bones, index, self.bones.len())?;
        self.bones[index].process_patch(changes)
    }

    pub fn get_bone(&self, index: usize) -> Result<&Bone> {
        check_index(Collection::Bones, index, self.bones.len())?;
        Ok(&self.bones[index])
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.bones.iter().try_for_each(Bone::validate)
    }

    /// Recognizes `name` only.
    pub fn process_patch(&mut self, changes: &Patch) -> Result<Patch> {
        let mut inverse = Patch::new();
        match changes.text(Field::Name)? {
            Some(name) if name.is_empty() => {
                return Err(CoreError::InvalidPatchValue { field: "name", reason: "skeleton name must not be empty".into() });
            }
            Some(name) => {
                inverse.insert(Field::Name, PatchValue::Text(std::mem::replace(&mut self.name, name.to_string())));
            }
            None => {}
        }
        Ok(inverse)
    }
}
