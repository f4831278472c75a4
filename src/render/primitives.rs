use crate::core::animation::bone::Bone;
use crate::core::animation::skeleton::Skeleton;
use crate::core::project::Project;
use serde::Serialize;

/// Drawable produced for one bone. Colors are `#rrggbb` strings, ready for
/// a canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Primitive {
    Line { from: [f64; 2], to: [f64; 2], color: String, width: f64 },
    Circle { center: [f64; 2], radius: f64, outline: String, width: f64 },
}

impl Primitive {
    /// Axis-aligned `[left, top, right, bottom]` box.
    pub fn bounds(&self) -> [f64; 4] {
        match self {
            Primitive::Line { from, to, .. } => [from[0].min(to[0]), from[1].min(to[1]), from[0].max(to[0]), from[1].max(to[1])],
            Primitive::Circle { center: [x, y], radius, .. } => [x - radius, y - radius, x + radius, y + radius],
        }
    }
}

pub fn bone_primitive(bone: &Bone) -> Primitive {
    match bone {
        Bone::Segment(s) => Primitive::Line {
            from: s.common.position,
            to: s.end_point(),
            color: s.common.color.to_hex(),
            width: s.common.thickness,
        },
        Bone::Circle(c) => Primitive::Circle {
            center: c.common.position,
            radius: c.radius,
            outline: c.common.color.to_hex(),
            width: c.common.thickness,
        },
    }
}

/// Bones in draw order.
pub fn skeleton_primitives(skeleton: &Skeleton) -> Vec<Primitive> {
    skeleton.bones().map(bone_primitive).collect()
}

/// What the canvas shows: the active skeleton, or just the active bone.
/// Other selections draw nothing.
pub fn primitives_for_active(project: &Project) -> Vec<Primitive> {
    if let Some(bone) = project.active_bone() {
        return vec![bone_primitive(bone)];
    }
    project.active_skeleton().map(skeleton_primitives).unwrap_or_default()
}
