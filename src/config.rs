use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use tracing::warn;

use crate::color::{Rgb, normalize_color};
use crate::keys::PropertyKey;
use crate::model::PropertyModel;
use crate::resources::{ResourceRef, ResourceStore};
use crate::visibility::{HideFlags, StructuralCategory};

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FF6699";
pub const DEFAULT_SELECT_COLOR: &str = "#33FF19";
pub const DEFAULT_PDBE_URL: &str = "https://www.ebi.ac.uk/pdbe/";

/// Initial scene preset applied after the subject is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Preset {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "unitcell")]
    Unitcell,
    #[serde(rename = "all-models")]
    AllModels,
    #[serde(rename = "supercell")]
    Supercell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualStyle {
    Cartoon,
    BallAndStick,
    Carbohydrate,
    Ellipsoid,
    GaussianSurface,
    MolecularSurface,
    Point,
    Putty,
    Spacefill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lighting {
    Flat,
    Matte,
    Glossy,
    Metallic,
    Plastic,
}

/// Wire encoding used when fetching the subject from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Bcif,
    Cif,
}

/// Picking granularity for pointer interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Granularity {
    Element,
    #[default]
    Residue,
    Chain,
    Entity,
    Model,
    Operator,
    Structure,
    ElementInstances,
    ResidueInstances,
    ChainInstances,
}

/// Externally materialized data resource standing in for an in-memory payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomData {
    pub resource: ResourceRef,
    pub format: String,
    pub binary: bool,
}

/// Ligand-centric initial view: load only the matching ligand instead of the
/// whole assembly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LigandView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_comp_id_list: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_asym_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_asym_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_comp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_seq_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_all: Option<bool>,
}

/// Tuning for the superposition view mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuperpositionParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_accession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superpose_complete_cluster: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ligand_view: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superpose_all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ligand_color: Option<Rgb>,
}

/// Immutable engine configuration derived from the property model.
///
/// Built fresh on construction and on every full-reconfiguration trigger.
/// Building a snapshot reads properties and materializes payloads; it never
/// calls the engine. Absent properties stay `None` so the engine applies its
/// own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub molecule_id: Option<String>,
    pub custom_data: Option<CustomData>,
    pub assembly_id: Option<String>,
    pub default_preset: Preset,
    pub ligand_view: Option<LigandView>,
    pub alphafold_view: bool,
    pub superposition: bool,
    pub superposition_params: Option<SuperpositionParams>,
    pub visual_style: Option<VisualStyle>,
    pub load_maps: bool,
    pub map_settings: Option<Value>,
    pub bg_color: Option<Rgb>,
    pub highlight_color: Option<Rgb>,
    pub select_color: Option<Rgb>,
    pub lighting: Option<Lighting>,
    pub validation_annotation: bool,
    pub domain_annotation: bool,
    pub symmetry_annotation: bool,
    pub pdbe_url: String,
    pub encoding: Encoding,
    pub low_precision_coords: bool,
    pub select_interaction: bool,
    pub granularity: Granularity,
    pub subscribe_events: bool,
    pub hide_controls: bool,
    pub hide_controls_icon: bool,
    pub hide_expand_icon: bool,
    pub hide_settings_icon: bool,
    pub hide_selection_icon: bool,
    pub hide_animation_icon: bool,
    pub sequence_panel: bool,
    pub pdbe_link: bool,
    pub loading_overlay: bool,
    pub expanded: bool,
    pub landscape: bool,
    pub hidden: SmallVec<[StructuralCategory; 6]>,
}

impl ViewerConfig {
    /// Builds a snapshot from the current property values.
    ///
    /// An in-memory payload under `custom_data` is materialized through
    /// `resources` into a dereferenceable reference; a snapshot without a
    /// payload releases any previously materialized one.
    pub fn from_model<M: PropertyModel + ?Sized>(
        model: &M,
        resources: &mut ResourceStore,
    ) -> Self {
        let reader = ModelReader { model };
        let custom_data = reader
            .value(PropertyKey::CustomData)
            .and_then(|value| materialize_custom_data(&value, resources));
        if custom_data.is_none() {
            resources.clear();
        }

        Self {
            molecule_id: reader.string(PropertyKey::MoleculeId),
            custom_data,
            assembly_id: reader.string(PropertyKey::AssemblyId),
            default_preset: reader.enumerated(PropertyKey::DefaultPreset).unwrap_or_default(),
            ligand_view: reader.enumerated(PropertyKey::LigandView),
            alphafold_view: reader.flag(PropertyKey::AlphafoldView, false),
            superposition: reader.flag(PropertyKey::Superposition, false),
            superposition_params: reader.enumerated(PropertyKey::SuperpositionParams),
            visual_style: reader.enumerated(PropertyKey::VisualStyle),
            load_maps: reader.flag(PropertyKey::LoadMaps, false),
            map_settings: reader.value(PropertyKey::MapSettings),
            bg_color: reader.color(PropertyKey::BgColor, None),
            highlight_color: reader.color(PropertyKey::HighlightColor, Some(DEFAULT_HIGHLIGHT_COLOR)),
            select_color: reader.color(PropertyKey::SelectColor, Some(DEFAULT_SELECT_COLOR)),
            lighting: reader.enumerated(PropertyKey::Lighting),
            validation_annotation: reader.flag(PropertyKey::ValidationAnnotation, false),
            domain_annotation: reader.flag(PropertyKey::DomainAnnotation, false),
            symmetry_annotation: reader.flag(PropertyKey::SymmetryAnnotation, false),
            pdbe_url: reader
                .string(PropertyKey::PdbeUrl)
                .unwrap_or_else(|| DEFAULT_PDBE_URL.to_owned()),
            encoding: reader.enumerated(PropertyKey::Encoding).unwrap_or_default(),
            low_precision_coords: reader.flag(PropertyKey::LowPrecisionCoords, false),
            select_interaction: reader.flag(PropertyKey::SelectInteraction, true),
            granularity: reader.enumerated(PropertyKey::Granularity).unwrap_or_default(),
            subscribe_events: reader.flag(PropertyKey::SubscribeEvents, false),
            hide_controls: reader.flag(PropertyKey::HideControls, true),
            hide_controls_icon: reader.flag(PropertyKey::HideControlsIcon, false),
            hide_expand_icon: reader.flag(PropertyKey::HideExpandIcon, false),
            hide_settings_icon: reader.flag(PropertyKey::HideSettingsIcon, false),
            hide_selection_icon: reader.flag(PropertyKey::HideSelectionIcon, false),
            hide_animation_icon: reader.flag(PropertyKey::HideAnimationIcon, false),
            sequence_panel: reader.flag(PropertyKey::SequencePanel, false),
            pdbe_link: reader.flag(PropertyKey::PdbeLink, true),
            loading_overlay: reader.flag(PropertyKey::LoadingOverlay, false),
            expanded: reader.flag(PropertyKey::Expanded, false),
            landscape: reader.flag(PropertyKey::Landscape, false),
            hidden: HideFlags::from_model(model).hidden_categories(),
        }
    }

    /// Serializes the snapshot to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

struct ModelReader<'a, M: PropertyModel + ?Sized> {
    model: &'a M,
}

impl<M: PropertyModel + ?Sized> ModelReader<'_, M> {
    fn value(&self, key: PropertyKey) -> Option<Value> {
        self.model.get(key).filter(|value| !value.is_null())
    }

    fn string(&self, key: PropertyKey) -> Option<String> {
        self.value(key)
            .and_then(|value| value.as_str().map(str::to_owned))
            .filter(|s| !s.is_empty())
    }

    fn flag(&self, key: PropertyKey, default: bool) -> bool {
        self.value(key)
            .and_then(|value| value.as_bool())
            .unwrap_or(default)
    }

    fn color(&self, key: PropertyKey, default: Option<&str>) -> Option<Rgb> {
        match self.string(key) {
            Some(spec) => normalize_color(Some(&spec)),
            None => normalize_color(default),
        }
    }

    fn enumerated<T: serde::de::DeserializeOwned>(&self, key: PropertyKey) -> Option<T> {
        let value = self.value(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(key = key.as_str(), %err, "ignoring unrecognized property value");
                None
            }
        }
    }
}

/// Turns a `custom_data` property value into a materialized resource.
///
/// Expects `{ "data": <string | byte array>, "format": <string>, "binary": <bool> }`.
/// A payload that cannot be interpreted is dropped with a warning, not an error.
fn materialize_custom_data(value: &Value, resources: &mut ResourceStore) -> Option<CustomData> {
    let object = value.as_object()?;
    let bytes = match object.get("data") {
        Some(Value::String(text)) => text.clone().into_bytes(),
        Some(Value::Array(items)) => {
            let mut bytes = Vec::with_capacity(items.len());
            for item in items {
                let byte = item.as_u64().filter(|b| *b <= u64::from(u8::MAX));
                match byte {
                    Some(byte) => bytes.push(byte as u8),
                    None => {
                        warn!("custom_data byte array holds a non-byte element; payload dropped");
                        return None;
                    }
                }
            }
            bytes
        }
        _ => {
            warn!("custom_data carries no payload; entry dropped");
            return None;
        }
    };

    let format = object
        .get("format")
        .and_then(Value::as_str)
        .unwrap_or("cif")
        .to_owned();
    let binary = object
        .get("binary")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(CustomData {
        resource: resources.supersede(bytes),
        format,
        binary,
    })
}
