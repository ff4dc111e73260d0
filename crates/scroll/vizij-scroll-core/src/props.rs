//! Visual properties a transition can drive.
//!
//! Spatial values are fractions of the viewport (`x` of its width, `y` of its
//! height) so choreography is resolution-independent. Scale and opacity are
//! unitless.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::TargetHandle;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualProperty {
    X,
    Y,
    Scale,
    ScaleX,
    ScaleY,
    Opacity,
    ClipTop,
    ClipRight,
    ClipBottom,
    ClipLeft,
}

impl VisualProperty {
    /// Value an untouched element has for this property.
    #[inline]
    pub fn neutral(self) -> f32 {
        match self {
            VisualProperty::Scale
            | VisualProperty::ScaleX
            | VisualProperty::ScaleY
            | VisualProperty::Opacity => 1.0,
            _ => 0.0,
        }
    }

    /// CSS-ish name, as used in stored section JSON.
    pub fn name(self) -> &'static str {
        match self {
            VisualProperty::X => "x",
            VisualProperty::Y => "y",
            VisualProperty::Scale => "scale",
            VisualProperty::ScaleX => "scaleX",
            VisualProperty::ScaleY => "scaleY",
            VisualProperty::Opacity => "opacity",
            VisualProperty::ClipTop => "clipTop",
            VisualProperty::ClipRight => "clipRight",
            VisualProperty::ClipBottom => "clipBottom",
            VisualProperty::ClipLeft => "clipLeft",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "x" => VisualProperty::X,
            "y" => VisualProperty::Y,
            "scale" => VisualProperty::Scale,
            "scaleX" => VisualProperty::ScaleX,
            "scaleY" => VisualProperty::ScaleY,
            "opacity" => VisualProperty::Opacity,
            "clipTop" => VisualProperty::ClipTop,
            "clipRight" => VisualProperty::ClipRight,
            "clipBottom" => VisualProperty::ClipBottom,
            "clipLeft" => VisualProperty::ClipLeft,
            _ => return None,
        })
    }
}

/// Ordered property -> value map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    values: BTreeMap<VisualProperty, f32>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, prop: VisualProperty, value: f32) -> Self {
        self.values.insert(prop, value);
        self
    }

    pub fn set(&mut self, prop: VisualProperty, value: f32) {
        self.values.insert(prop, value);
    }

    pub fn get(&self, prop: VisualProperty) -> Option<f32> {
        self.values.get(&prop).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisualProperty, f32)> + '_ {
        self.values.iter().map(|(p, v)| (*p, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First property whose value is NaN or infinite.
    pub fn first_non_finite(&self) -> Option<VisualProperty> {
        self.values
            .iter()
            .find_map(|(p, v)| (!v.is_finite()).then_some(*p))
    }
}

impl FromIterator<(VisualProperty, f32)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (VisualProperty, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A property set bound to one element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementState {
    pub target: TargetHandle,
    pub props: PropertySet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_values() {
        assert_eq!(VisualProperty::Opacity.neutral(), 1.0);
        assert_eq!(VisualProperty::ScaleX.neutral(), 1.0);
        assert_eq!(VisualProperty::X.neutral(), 0.0);
        assert_eq!(VisualProperty::ClipRight.neutral(), 0.0);
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for p in [
            VisualProperty::X,
            VisualProperty::ScaleY,
            VisualProperty::ClipLeft,
        ] {
            assert_eq!(VisualProperty::from_name(p.name()), Some(p));
        }
        assert_eq!(VisualProperty::from_name("rotate"), None);
    }

    #[test]
    fn serializes_as_camel_case_map() {
        let set = PropertySet::new()
            .with(VisualProperty::ScaleX, 0.5)
            .with(VisualProperty::Opacity, 0.0);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!({ "scaleX": 0.5, "opacity": 0.0 }));
    }

    #[test]
    fn detects_non_finite_values() {
        let set = PropertySet::new().with(VisualProperty::Y, f32::NAN);
        assert_eq!(set.first_non_finite(), Some(VisualProperty::Y));
    }
}
