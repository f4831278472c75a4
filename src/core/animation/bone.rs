use crate::core::color::Color;
use crate::core::error::Result;
use crate::core::patch::{Domain, Field, Patch, PatchValue};
use crate::core::settings::ProjectSettings;
use serde::{Deserialize, Serialize};

/// Attributes every bone variant carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneCommon {
    pub position: [f64; 2],
    pub color: Color,
    pub thickness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl BoneCommon {
    pub fn new(position: [f64; 2]) -> Self {
        let defaults = ProjectSettings::default();
        Self { position, color: defaults.default_bone_color, thickness: defaults.default_bone_thickness, name: None }
    }

    /// Handles name, position, color and thickness. Everything is validated
    /// before the first write.
    fn process_patch(&mut self, changes: &Patch) -> Result<Patch> {
        let name = changes.optional_text(Field::Name)?;
        let position = changes.point(Field::Position)?;
        let color = changes.color_value(Field::Color)?;
        let thickness = changes.number(Field::Thickness, Domain::Positive)?;

        let mut inverse = Patch::new();
        if let Some(name) = name {
            let old = match self.name.take() {
                Some(old) => PatchValue::Text(old),
                None => PatchValue::Unset,
            };
            inverse.insert(Field::Name, old);
            self.name = name.map(str::to_string);
        }
        if let Some(position) = position {
            inverse.insert(Field::Position, PatchValue::Point(self.position));
            self.position = position;
        }
        if let Some(color) = color {
            inverse.insert(Field::Color, PatchValue::Color(self.color));
            self.color = color;
        }
        if let Some(thickness) = thickness {
            inverse.insert(Field::Thickness, PatchValue::Number(self.thickness));
            self.thickness = thickness;
        }
        Ok(inverse)
    }
}

/// Straight bone. `position` is one end; the other end lies `length` away
/// at `rotation` radians from the x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentBone {
    #[serde(flatten)]
    pub common: BoneCommon,
    pub length: f64,
    pub rotation: f64,
}

impl SegmentBone {
    fn process_patch(&mut self, changes: &Patch) -> Result<Patch> {
        let length = changes.number(Field::Length, Domain::NonNegative)?;
        let rotation = changes.number(Field::Rotation, Domain::Finite)?;
        let mut inverse = self.common.process_patch(changes)?;
        if let Some(length) = length {
            inverse.insert(Field::Length, PatchValue::Number(self.length));
            self.length = length;
        }
        if let Some(rotation) = rotation {
            inverse.insert(Field::Rotation, PatchValue::Number(self.rotation));
            self.rotation = rotation;
        }
        Ok(inverse)
    }

    pub fn end_point(&self) -> [f64; 2] {
        let [x, y] = self.common.position;
        [x + self.length * self.rotation.cos(), y + self.length * self.rotation.sin()]
    }
}

/// Round bone centered on `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleBone {
    #[serde(flatten)]
    pub common: BoneCommon,
    pub radius: f64,
}

impl CircleBone {
    fn process_patch(&mut self, changes: &Patch) -> Result<Patch> {
        let radius = changes.number(Field::Radius, Domain::NonNegative)?;
        let mut inverse = self.common.process_patch(changes)?;
        if let Some(radius) = radius {
            inverse.insert(Field::Radius, PatchValue::Number(self.radius));
            self.radius = radius;
        }
        Ok(inverse)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Bone {
    Segment(SegmentBone),
    Circle(CircleBone),
}

impl Bone {
    pub fn segment(length: f64, rotation: f64, position: [f64; 2]) -> Self {
        Bone::Segment(SegmentBone { common: BoneCommon::new(position), length, rotation })
    }

    pub fn circle(radius: f64, position: [f64; 2]) -> Self {
        Bone::Circle(CircleBone { common: BoneCommon::new(position), radius })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.common_mut().name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.common_mut().color = color;
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.common_mut().thickness = thickness;
        self
    }

    pub fn common(&self) -> &BoneCommon {
        match self {
            Bone::Segment(b) => &b.common,
            Bone::Circle(b) => &b.common,
        }
    }

    pub(crate) fn common_mut(&mut self) -> &mut BoneCommon {
        match self {
            Bone::Segment(b) => &mut b.common,
            Bone::Circle(b) => &mut b.common,
        }
    }

    pub fn name(&self) -> Option<&str> { self.common().name.as_deref() }
    pub fn position(&self) -> [f64; 2] { self.common().position }
    pub fn color(&self) -> Color { self.common().color }
    pub fn thickness(&self) -> f64 { self.common().thickness }

    pub fn type_name(&self) -> &'static str {
        match self {
            Bone::Segment(_) => "SEGMENT",
            Bone::Circle(_) => "CIRCLE",
        }
    }

    /// Holds a bone read from disk to the ranges patches enforce.
    pub(crate) fn validate(&self) -> Result<()> {
        let common = self.common();
        for c in common.position {
            Domain::Finite.check(Field::Position, c)?;
        }
        Domain::Positive.check(Field::Thickness, common.thickness)?;
        match self {
            Bone::Segment(b) => {
                Domain::NonNegative.check(Field::Length, b.length)?;
                Domain::Finite.check(Field::Rotation, b.rotation)?;
            }
            Bone::Circle(b) => {
                Domain::NonNegative.check(Field::Radius, b.radius)?;
            }
        }
        Ok(())
    }

    /// Applies the recognized subset of `changes` and returns the previous
    /// values of exactly those fields. Keys the variant does not know (a
    /// radius on a segment, say) are ignored.
    pub fn process_patch(&mut self, changes: &Patch) -> Result<Patch> {
        match self {
            Bone::Segment(b) => b.process_patch(changes),
            Bone::Circle(b) => b.process_patch(changes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CoreError;
    use serde_json::json;

    fn leg() -> Bone {
        Bone::segment(10.0, 1.0, [0.0, 0.0]).with_name("Leg")
    }

    #[test]
    fn test_bone_defaults() {
        let bone = Bone::circle(5.0, [1.0, 2.0]);
        assert_eq!(bone.name(), None);
        assert_eq!(bone.color(), Color::black());
        assert_eq!(bone.thickness(), 1.0);
        assert_eq!(bone.type_name(), "CIRCLE");
    }

    #[test]
    fn test_segment_patch_returns_old_values() {
        let mut bone = leg();
        let old = bone.process_patch(&Patch::new().name("Hand").length(120.0)).unwrap();
        assert_eq!(old, Patch::new().name("Leg").length(10.0));
        match &bone {
            Bone::Segment(s) => {
                assert_eq!(s.length, 120.0);
                assert_eq!(s.rotation, 1.0);
                assert_eq!(s.common.name.as_deref(), Some("Hand"));
            }
            _ => panic!("variant changed"),
        }
    }

    #[test]
    fn test_patch_then_inverse_restores_bone() {
        let original = leg().with_color(Color::new(10, 20, 30));
        let mut bone = original.clone();
        let changes = Patch::new()
            .name("Other")
            .position(4.0, -2.0)
            .color(Color::new(255, 255, 255))
            .thickness(3.5)
            .length(0.0)
            .rotation(-3.0);
        let inverse = bone.process_patch(&changes).unwrap();
        assert_ne!(bone, original);
        bone.process_patch(&inverse).unwrap();
        assert_eq!(bone, original);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut circle = Bone::circle(10.0, [0.0, 0.0]);
        let old = circle.process_patch(&Patch::new().length(3.0).rotation(1.0)).unwrap();
        assert!(old.is_empty());
        assert_eq!(circle, Bone::circle(10.0, [0.0, 0.0]));

        let mut segment = leg();
        assert!(segment.process_patch(&Patch::new().radius(2.0)).unwrap().is_empty());
        assert_eq!(segment, leg());
    }

    #[test]
    fn test_naming_an_unnamed_bone_inverts_to_unset() {
        let mut bone = Bone::circle(1.0, [0.0, 0.0]);
        let inverse = bone.process_patch(&Patch::new().name("Head")).unwrap();
        assert_eq!(bone.name(), Some("Head"));
        assert_eq!(inverse.get(Field::Name), Some(&PatchValue::Unset));
        bone.process_patch(&inverse).unwrap();
        assert_eq!(bone.name(), None);
    }

    #[test]
    fn test_invalid_value_leaves_bone_untouched() {
        let mut bone = leg();
        let err = bone.process_patch(&Patch::new().name("Changed").length(-1.0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPatchValue { field: "length", .. }));
        assert_eq!(bone, leg());

        let err = bone.process_patch(&Patch::new().position(1.0, 1.0).thickness(0.0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPatchValue { field: "thickness", .. }));
        assert_eq!(bone, leg());
    }

    #[test]
    fn test_segment_end_point() {
        let Bone::Segment(s) = Bone::segment(2.0, 0.0, [1.0, 1.0]) else { unreachable!() };
        assert_eq!(s.end_point(), [3.0, 1.0]);
    }

    #[test]
    fn test_bone_record_shape() {
        let value = serde_json::to_value(leg()).unwrap();
        assert_eq!(value, json!({
            "type": "SEGMENT",
            "position": [0.0, 0.0],
            "color": [0, 0, 0],
            "thickness": 1.0,
            "name": "Leg",
            "length": 10.0,
            "rotation": 1.0,
        }));
        let back: Bone = serde_json::from_value(value).unwrap();
        assert_eq!(back, leg());
    }

    #[test]
    fn test_bone_record_with_integer_coordinates() {
        let bone: Bone = serde_json::from_value(json!({
            "position": [150, 50],
            "color": [0, 0, 0],
            "thickness": 1.0,
            "name": "Head",
            "radius": 30.0,
            "type": "CIRCLE",
        })).unwrap();
        assert_eq!(bone, Bone::circle(30.0, [150.0, 50.0]).with_name("Head"));
    }
}
