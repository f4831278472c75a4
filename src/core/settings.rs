use super::color::Color;
use serde::{Deserialize, Serialize};

/// Defaults applied when the user does not give a value, plus the
/// sub-directory names of a project on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub default_bone_color: Color,
    pub default_bone_thickness: f64,
    pub default_transition_time: f64,
    pub skeletons_dir: String,
    pub animations_dir: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            default_bone_color: Color::black(),
            default_bone_thickness: 1.0,
            default_transition_time: 1.0,
            skeletons_dir: "skeletons".into(),
            animations_dir: "animations".into(),
        }
    }
}
