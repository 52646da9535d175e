use serde::{Deserialize, Serialize};

/// RGB triple in the wire shape the viewer expects (`{"r": .., "g": .., "b": ..}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 4]> for Rgb {
    /// Drops the alpha channel; the viewer's color parameters are opaque.
    fn from(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2])
    }
}

/// Canonicalizes an arbitrary color specification into an [`Rgb`] triple.
///
/// Accepts named colors, hex notation, and functional notation (`rgb(..)`,
/// `hsl(..)`, ...). Absent or unparseable input yields `None` so the engine
/// falls back to its own default; a bad color never fails the bridge.
#[must_use]
pub fn normalize_color(spec: Option<&str>) -> Option<Rgb> {
    let spec = spec?.trim();
    if spec.is_empty() {
        return None;
    }
    csscolorparser::parse(spec)
        .ok()
        .map(|color| Rgb::from(color.to_rgba8()))
}
