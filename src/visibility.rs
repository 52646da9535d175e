use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::keys::PropertyKey;
use crate::model::PropertyModel;

/// Structural categories the viewer can show or hide, in canonical order.
///
/// The order is load-bearing: the compiled hide list and the visibility map
/// both enumerate categories in exactly this sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralCategory {
    #[serde(rename = "polymer")]
    Polymer,
    #[serde(rename = "water")]
    Water,
    #[serde(rename = "het")]
    Het,
    #[serde(rename = "carbs")]
    Carbs,
    #[serde(rename = "nonStandard")]
    NonStandard,
    #[serde(rename = "coarse")]
    Coarse,
}

impl StructuralCategory {
    pub const CANONICAL_ORDER: [Self; 6] = [
        Self::Polymer,
        Self::Water,
        Self::Het,
        Self::Carbs,
        Self::NonStandard,
        Self::Coarse,
    ];

    /// Tag string used by the engine's visibility call sites.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Polymer => "polymer",
            Self::Water => "water",
            Self::Het => "het",
            Self::Carbs => "carbs",
            Self::NonStandard => "nonStandard",
            Self::Coarse => "coarse",
        }
    }
}

/// Category → visible mapping in canonical order.
pub type VisibilityMap = IndexMap<StructuralCategory, bool>;

/// The six boolean "hide" toggles exposed by the property model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HideFlags {
    pub polymer: bool,
    pub water: bool,
    pub het: bool,
    pub carbs: bool,
    pub non_standard: bool,
    pub coarse: bool,
}

impl HideFlags {
    /// Reads the six `hide_*` properties; absent properties count as visible.
    #[must_use]
    pub fn from_model<M: PropertyModel + ?Sized>(model: &M) -> Self {
        let flag = |key: PropertyKey| {
            model
                .get(key)
                .and_then(|value| value.as_bool())
                .unwrap_or(false)
        };
        Self {
            polymer: flag(PropertyKey::HidePolymer),
            water: flag(PropertyKey::HideWater),
            het: flag(PropertyKey::HideHeteroatoms),
            carbs: flag(PropertyKey::HideCarbs),
            non_standard: flag(PropertyKey::HideNonStandard),
            coarse: flag(PropertyKey::HideCoarse),
        }
    }

    #[must_use]
    pub const fn hides(self, category: StructuralCategory) -> bool {
        match category {
            StructuralCategory::Polymer => self.polymer,
            StructuralCategory::Water => self.water,
            StructuralCategory::Het => self.het,
            StructuralCategory::Carbs => self.carbs,
            StructuralCategory::NonStandard => self.non_standard,
            StructuralCategory::Coarse => self.coarse,
        }
    }

    /// Categories to hide, in canonical order, true-flagged only.
    #[must_use]
    pub fn hidden_categories(self) -> SmallVec<[StructuralCategory; 6]> {
        StructuralCategory::CANONICAL_ORDER
            .into_iter()
            .filter(|category| self.hides(*category))
            .collect()
    }

    /// Full category → visible map; the exact logical negation of the flags.
    #[must_use]
    pub fn visibility_map(self) -> VisibilityMap {
        StructuralCategory::CANONICAL_ORDER
            .into_iter()
            .map(|category| (category, !self.hides(category)))
            .collect()
    }
}
