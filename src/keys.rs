use serde::{Deserialize, Serialize};

/// Every property key the bridge recognizes on the host model.
///
/// This enum replaces the loosely-typed string bag of the original widget
/// protocol: every key the bridge reads, observes, or writes is declared
/// here, and [`PropertyKey::binding`] is the single table deciding how a
/// change to each key reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKey {
    // Configuration snapshot inputs.
    MoleculeId,
    CustomData,
    AssemblyId,
    DefaultPreset,
    LigandView,
    AlphafoldView,
    Superposition,
    SuperpositionParams,
    VisualStyle,
    HidePolymer,
    HideWater,
    HideHeteroatoms,
    HideCarbs,
    HideNonStandard,
    HideCoarse,
    LoadMaps,
    MapSettings,
    BgColor,
    HighlightColor,
    SelectColor,
    Lighting,
    ValidationAnnotation,
    DomainAnnotation,
    SymmetryAnnotation,
    PdbeUrl,
    Encoding,
    LowPrecisionCoords,
    SelectInteraction,
    Granularity,
    SubscribeEvents,
    HideControls,
    HideControlsIcon,
    HideExpandIcon,
    HideSettingsIcon,
    HideSelectionIcon,
    HideAnimationIcon,
    SequencePanel,
    PdbeLink,
    LoadingOverlay,
    Expanded,
    Landscape,

    // Imperative command channels (pulse with a payload, then reset to null).
    Spin,
    Focus,
    Highlight,
    ClearHighlight,
    ColorData,
    ClearSelection,
    Tooltips,
    ClearTooltips,
    SetColor,
    Reset,

    // Side-channel payload read by `ClearSelection`; never subscribed.
    Args,

    // Engine-originated event fields; written by the relay, never subscribed.
    MouseoverEvent,
    MouseoutEvent,
    ClickEvent,
}

/// Narrow capability invoked by a targeted mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetedOp {
    Spin,
    Visibility,
    BackgroundColor,
    HighlightColor,
    SelectColor,
    Focus,
    Highlight,
    ClearHighlight,
    SelectionColoring,
    ClearSelection,
    Tooltips,
    ClearTooltips,
    ColorPair,
    Reset,
}

/// How a change to a property key reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Exactly one capability call with the new value.
    Targeted(TargetedOp),
    /// Rebuild the configuration snapshot and reconfigure the engine.
    /// `full_load` forces a re-parse and re-preset of the scene.
    Reconfigure { full_load: bool },
}

impl PropertyKey {
    /// Keys the bridge subscribes to, one handler each per bridge instance.
    pub const SUBSCRIBED: [Self; 51] = [
        Self::MoleculeId,
        Self::CustomData,
        Self::AssemblyId,
        Self::DefaultPreset,
        Self::LigandView,
        Self::AlphafoldView,
        Self::Superposition,
        Self::SuperpositionParams,
        Self::VisualStyle,
        Self::HidePolymer,
        Self::HideWater,
        Self::HideHeteroatoms,
        Self::HideCarbs,
        Self::HideNonStandard,
        Self::HideCoarse,
        Self::LoadMaps,
        Self::MapSettings,
        Self::BgColor,
        Self::HighlightColor,
        Self::SelectColor,
        Self::Lighting,
        Self::ValidationAnnotation,
        Self::DomainAnnotation,
        Self::SymmetryAnnotation,
        Self::PdbeUrl,
        Self::Encoding,
        Self::LowPrecisionCoords,
        Self::SelectInteraction,
        Self::Granularity,
        Self::SubscribeEvents,
        Self::HideControls,
        Self::HideControlsIcon,
        Self::HideExpandIcon,
        Self::HideSettingsIcon,
        Self::HideSelectionIcon,
        Self::HideAnimationIcon,
        Self::SequencePanel,
        Self::PdbeLink,
        Self::LoadingOverlay,
        Self::Expanded,
        Self::Landscape,
        Self::Spin,
        Self::Focus,
        Self::Highlight,
        Self::ClearHighlight,
        Self::ColorData,
        Self::ClearSelection,
        Self::Tooltips,
        Self::ClearTooltips,
        Self::SetColor,
        Self::Reset,
    ];

    /// Wire name of the key in the host transport.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MoleculeId => "molecule_id",
            Self::CustomData => "custom_data",
            Self::AssemblyId => "assembly_id",
            Self::DefaultPreset => "default_preset",
            Self::LigandView => "ligand_view",
            Self::AlphafoldView => "alphafold_view",
            Self::Superposition => "superposition",
            Self::SuperpositionParams => "superposition_params",
            Self::VisualStyle => "visual_style",
            Self::HidePolymer => "hide_polymer",
            Self::HideWater => "hide_water",
            Self::HideHeteroatoms => "hide_heteroatoms",
            Self::HideCarbs => "hide_carbs",
            Self::HideNonStandard => "hide_non_standard",
            Self::HideCoarse => "hide_coarse",
            Self::LoadMaps => "load_maps",
            Self::MapSettings => "map_settings",
            Self::BgColor => "bg_color",
            Self::HighlightColor => "highlight_color",
            Self::SelectColor => "select_color",
            Self::Lighting => "lighting",
            Self::ValidationAnnotation => "validation_annotation",
            Self::DomainAnnotation => "domain_annotation",
            Self::SymmetryAnnotation => "symmetry_annotation",
            Self::PdbeUrl => "pdbe_url",
            Self::Encoding => "encoding",
            Self::LowPrecisionCoords => "low_precision_coords",
            Self::SelectInteraction => "select_interaction",
            Self::Granularity => "granularity",
            Self::SubscribeEvents => "subscribe_events",
            Self::HideControls => "hide_controls",
            Self::HideControlsIcon => "hide_controls_icon",
            Self::HideExpandIcon => "hide_expand_icon",
            Self::HideSettingsIcon => "hide_settings_icon",
            Self::HideSelectionIcon => "hide_selection_icon",
            Self::HideAnimationIcon => "hide_animation_icon",
            Self::SequencePanel => "sequence_panel",
            Self::PdbeLink => "pdbe_link",
            Self::LoadingOverlay => "loading_overlay",
            Self::Expanded => "expanded",
            Self::Landscape => "landscape",
            Self::Spin => "spin",
            Self::Focus => "focus",
            Self::Highlight => "highlight",
            Self::ClearHighlight => "clear_highlight",
            Self::ColorData => "color_data",
            Self::ClearSelection => "clear_selection",
            Self::Tooltips => "tooltips",
            Self::ClearTooltips => "clear_tooltips",
            Self::SetColor => "set_color",
            Self::Reset => "reset",
            Self::Args => "args",
            Self::MouseoverEvent => "mouseover_event",
            Self::MouseoutEvent => "mouseout_event",
            Self::ClickEvent => "click_event",
        }
    }

    /// The per-key dispatch table.
    ///
    /// The subject identifier and its payload require a re-parse of the scene,
    /// so they reconfigure with a full reload. Other snapshot-bearing keys
    /// reconfigure without one. Command channels map to a single capability.
    #[must_use]
    pub const fn binding(self) -> Binding {
        match self {
            Self::MoleculeId | Self::CustomData => Binding::Reconfigure { full_load: true },

            Self::Spin => Binding::Targeted(TargetedOp::Spin),
            Self::HidePolymer
            | Self::HideWater
            | Self::HideHeteroatoms
            | Self::HideCarbs
            | Self::HideNonStandard
            | Self::HideCoarse => Binding::Targeted(TargetedOp::Visibility),
            Self::BgColor => Binding::Targeted(TargetedOp::BackgroundColor),
            Self::HighlightColor => Binding::Targeted(TargetedOp::HighlightColor),
            Self::SelectColor => Binding::Targeted(TargetedOp::SelectColor),
            Self::Focus => Binding::Targeted(TargetedOp::Focus),
            Self::Highlight => Binding::Targeted(TargetedOp::Highlight),
            Self::ClearHighlight => Binding::Targeted(TargetedOp::ClearHighlight),
            Self::ColorData => Binding::Targeted(TargetedOp::SelectionColoring),
            Self::ClearSelection => Binding::Targeted(TargetedOp::ClearSelection),
            Self::Tooltips => Binding::Targeted(TargetedOp::Tooltips),
            Self::ClearTooltips => Binding::Targeted(TargetedOp::ClearTooltips),
            Self::SetColor => Binding::Targeted(TargetedOp::ColorPair),
            Self::Reset => Binding::Targeted(TargetedOp::Reset),

            _ => Binding::Reconfigure { full_load: false },
        }
    }
}
