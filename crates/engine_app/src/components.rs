//! Demo component types and the wire type list they are written with.

use engine_component::Component;
use serde::{Deserialize, Serialize};

/// Wire index n is the nth name. Index 0 is reserved.
pub const COMPONENT_NAMES: [&str; 4] = ["NONE", Name::TYPE_NAME, Health::TYPE_NAME, Transform::TYPE_NAME];

/// Display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    const TYPE_NAME: &'static str = "NameDef";
}

impl Component for Name {
    fn type_name() -> &'static str {
        Self::TYPE_NAME
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    const TYPE_NAME: &'static str = "HealthDef";

    #[must_use]
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }
}

impl Component for Health {
    fn type_name() -> &'static str {
        Self::TYPE_NAME
    }
}

/// Position relative to the parent entity, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
}

impl Transform {
    const TYPE_NAME: &'static str = "TransformDef";
}

impl Component for Transform {
    fn type_name() -> &'static str {
        Self::TYPE_NAME
    }
}
