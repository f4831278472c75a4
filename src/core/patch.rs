//! Partial attribute updates.
//!
//! A [`Patch`] maps a closed set of [`Field`]s to typed [`PatchValue`]s.
//! Entities apply the fields they recognize, in `Field` order, and hand back
//! a patch holding the previous values, which undoes the call when applied.

use crate::core::color::Color;
use crate::core::error::{CoreError, Result};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Position,
    Color,
    Thickness,
    Length,
    Rotation,
    Radius,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name, Field::Position, Field::Color, Field::Thickness,
        Field::Length, Field::Rotation, Field::Radius,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Position => "position",
            Field::Color => "color",
            Field::Thickness => "thickness",
            Field::Length => "length",
            Field::Rotation => "rotation",
            Field::Radius => "radius",
        }
    }
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL.into_iter().find(|f| f.as_str() == s).ok_or(())
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    Text(String),
    /// Clears an optional text field. Only bone names accept it.
    Unset,
    Point([f64; 2]),
    Color(Color),
    Number(f64),
}

impl PatchValue {
    fn kind(&self) -> &'static str {
        match self {
            PatchValue::Text(_) => "text",
            PatchValue::Unset => "null",
            PatchValue::Point(_) => "point",
            PatchValue::Color(_) => "color",
            PatchValue::Number(_) => "number",
        }
    }

    fn to_json(&self) -> Value {
        match self {
            PatchValue::Text(s) => Value::from(s.as_str()),
            PatchValue::Unset => Value::Null,
            PatchValue::Point([x, y]) => Value::from(vec![*x, *y]),
            PatchValue::Color(c) => Value::from(vec![c.r, c.g, c.b]),
            PatchValue::Number(n) => Value::from(*n),
        }
    }

    fn from_json(field: Field, value: &Value) -> std::result::Result<Self, String> {
        let number = |v: &Value| v.as_f64().ok_or_else(|| format!("expected a number, got {v}"));
        match field {
            Field::Name => match value {
                Value::String(s) => Ok(PatchValue::Text(s.clone())),
                Value::Null => Ok(PatchValue::Unset),
                other => Err(format!("expected a string, got {other}")),
            },
            Field::Position => match value.as_array().map(Vec::as_slice) {
                Some([x, y]) => Ok(PatchValue::Point([number(x)?, number(y)?])),
                _ => Err(format!("expected [x, y], got {value}")),
            },
            Field::Color => {
                let rgb: [u8; 3] = serde_json::from_value(value.clone())
                    .map_err(|_| format!("expected [r, g, b] with 0-255 components, got {value}"))?;
                Ok(PatchValue::Color(rgb.into()))
            }
            Field::Thickness | Field::Length | Field::Rotation | Field::Radius => {
                Ok(PatchValue::Number(number(value)?))
            }
        }
    }
}

/// Range a numeric field must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Domain {
    Finite,
    NonNegative,
    Positive,
}

impl Domain {
    pub(crate) fn check(self, field: Field, v: f64) -> Result<f64> {
        let ok = v.is_finite() && match self {
            Domain::Finite => true,
            Domain::NonNegative => v >= 0.0,
            Domain::Positive => v > 0.0,
        };
        if ok {
            return Ok(v);
        }
        let reason = match self {
            Domain::Finite => "must be finite",
            Domain::NonNegative => "must be finite and >= 0",
            Domain::Positive => "must be finite and > 0",
        };
        Err(CoreError::InvalidPatchValue { field: field.as_str(), reason: format!("{v} {reason}") })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patch(BTreeMap<Field, PatchValue>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(self, name: impl Into<String>) -> Self { self.with(Field::Name, PatchValue::Text(name.into())) }
    pub fn position(self, x: f64, y: f64) -> Self { self.with(Field::Position, PatchValue::Point([x, y])) }
    pub fn color(self, color: Color) -> Self { self.with(Field::Color, PatchValue::Color(color)) }
    pub fn thickness(self, v: f64) -> Self { self.with(Field::Thickness, PatchValue::Number(v)) }
    pub fn length(self, v: f64) -> Self { self.with(Field::Length, PatchValue::Number(v)) }
    pub fn rotation(self, v: f64) -> Self { self.with(Field::Rotation, PatchValue::Number(v)) }
    pub fn radius(self, v: f64) -> Self { self.with(Field::Radius, PatchValue::Number(v)) }

    pub fn with(mut self, field: Field, value: PatchValue) -> Self {
        self.0.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: Field, value: PatchValue) -> Option<PatchValue> {
        self.0.insert(field, value)
    }

    pub fn get(&self, field: Field) -> Option<&PatchValue> { self.0.get(&field) }
    pub fn contains(&self, field: Field) -> bool { self.0.contains_key(&field) }
    pub fn remove(&mut self, field: Field) -> Option<PatchValue> { self.0.remove(&field) }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &PatchValue)> {
        self.0.iter().map(|(f, v)| (*f, v))
    }

    /// Fields of `other` overwrite fields of `self`.
    pub fn merge(&mut self, other: Patch) {
        self.0.extend(other.0);
    }

    fn mistyped(field: Field, value: &PatchValue) -> CoreError {
        CoreError::InvalidPatchValue { field: field.as_str(), reason: format!("unexpected {} value", value.kind()) }
    }

    /// Required text, e.g. a skeleton name.
    pub(crate) fn text(&self, field: Field) -> Result<Option<&str>> {
        match self.get(field) {
            None => Ok(None),
            Some(PatchValue::Text(s)) => Ok(Some(s)),
            Some(other) => Err(Self::mistyped(field, other)),
        }
    }

    /// Optional text, where [`PatchValue::Unset`] clears the field.
    pub(crate) fn optional_text(&self, field: Field) -> Result<Option<Option<&str>>> {
        match self.get(field) {
            None => Ok(None),
            Some(PatchValue::Text(s)) => Ok(Some(Some(s))),
            Some(PatchValue::Unset) => Ok(Some(None)),
            Some(other) => Err(Self::mistyped(field, other)),
        }
    }

    pub(crate) fn point(&self, field: Field) -> Result<Option<[f64; 2]>> {
        match self.get(field) {
            None => Ok(None),
            Some(PatchValue::Point(p)) if p.iter().all(|c| c.is_finite()) => Ok(Some(*p)),
            Some(PatchValue::Point(_)) => Err(CoreError::InvalidPatchValue { field: field.as_str(), reason: "coordinates must be finite".into() }),
            Some(other) => Err(Self::mistyped(field, other)),
        }
    }

    pub(crate) fn color_value(&self, field: Field) -> Result<Option<Color>> {
        match self.get(field) {
            None => Ok(None),
            Some(PatchValue::Color(c)) => Ok(Some(*c)),
            Some(other) => Err(Self::mistyped(field, other)),
        }
    }

    pub(crate) fn number(&self, field: Field, domain: Domain) -> Result<Option<f64>> {
        match self.get(field) {
            None => Ok(None),
            Some(PatchValue::Number(v)) => domain.check(field, *v).map(Some),
            Some(other) => Err(Self::mistyped(field, other)),
        }
    }
}

impl FromIterator<(Field, PatchValue)> for Patch {
    fn from_iter<I: IntoIterator<Item = (Field, PatchValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, value) in &self.0 {
            map.serialize_entry(field.as_str(), &value.to_json())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Patch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut patch = Patch::new();
        for (key, value) in raw {
            // attributes this editor does not know are dropped
            let Ok(field) = key.parse::<Field>() else { continue };
            let value = PatchValue::from_json(field, &value)
                .map_err(|e| D::Error::custom(format!("field `{key}`: {e}")))?;
            patch.insert(field, value);
        }
        Ok(patch)
    }
}
