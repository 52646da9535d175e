//! Typed parameter structs for the engine's selection-style capabilities.
//!
//! Field names follow the viewer's wire protocol, which mixes snake_case
//! (structure addressing) with camelCase (presentation options).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgb;

/// A structure query: addresses residues/atoms/chains plus optional
/// presentation overrides applied to the match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParam {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_seq_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_asym_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_asym_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residue_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_residue_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_residue_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_residue_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_ins_code_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_auth_residue_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_auth_ins_code_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_auth_residue_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_auth_ins_code_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atoms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_comp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(rename = "sideChain", skip_serializing_if = "Option::is_none")]
    pub side_chain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representation: Option<String>,
    #[serde(rename = "representationColor", skip_serializing_if = "Option::is_none")]
    pub representation_color: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom_id: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniprot_accession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniprot_residue_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_uniprot_residue_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_uniprot_residue_number: Option<i32>,
}

/// Payload of the engine's `select` capability (selection coloring).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectParams {
    pub data: Vec<QueryParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_selected_color: Option<Rgb>,
    pub keep_colors: bool,
    pub keep_representations: bool,
}

/// Payload of the engine's `setTooltips` capability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipParams {
    pub data: Vec<QueryParam>,
}

/// Highlight/select color pair for the engine's `setColor` capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPair {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Rgb>,
}

impl ColorPair {
    #[must_use]
    pub const fn highlight_only(color: Rgb) -> Self {
        Self {
            highlight: Some(color),
            select: None,
        }
    }

    #[must_use]
    pub const fn select_only(color: Rgb) -> Self {
        Self {
            highlight: None,
            select: Some(color),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.highlight.is_none() && self.select.is_none()
    }
}

/// Scope of the engine's `reset` capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_color: Option<bool>,
}
