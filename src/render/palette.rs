//! Palette lookup and the `label -> color` assignment shared by marks and
//! legend entries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_PALETTE_ID;
use crate::render::Color;

/// Used when a palette is empty or a label was never assigned.
pub const FALLBACK_COLOR: Color = Color::rgb(0.6, 0.6, 0.6);

const SHADE_STEP: f64 = 0.25;
const MAX_SHADE: f64 = 0.75;

const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];
const PASTEL: [&str; 9] = [
    "#fbb4ae", "#b3cde3", "#ccebc5", "#decbe4", "#fed9a6", "#ffffcc", "#e5d8bd", "#fddaec",
    "#f2f2f2",
];
const MONO_BLUE: [&str; 6] = ["#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6", "#9ecae1"];

/// Resolves a palette id to its ordered colors.
pub trait PaletteSource {
    fn palette(&self, palette_id: &str) -> Option<Vec<Color>>;
}

/// Palettes shipped with the engine: `category10`, `pastel`, `mono-blue`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPalettes;

impl BuiltinPalettes {
    pub const IDS: [&'static str; 3] = ["category10", "pastel", "mono-blue"];
}

impl PaletteSource for BuiltinPalettes {
    fn palette(&self, palette_id: &str) -> Option<Vec<Color>> {
        let hexes: &[&str] = match palette_id {
            "category10" => &CATEGORY10,
            "pastel" => &PASTEL,
            "mono-blue" => &MONO_BLUE,
            _ => return None,
        };
        Some(hexes.iter().filter_map(|hex| Color::from_hex(hex).ok()).collect())
    }
}

/// Host-supplied palettes keyed by id, checked before the built-ins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomPalettes {
    palettes: IndexMap<String, Vec<Color>>,
}

impl CustomPalettes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_palette(mut self, palette_id: impl Into<String>, colors: Vec<Color>) -> Self {
        self.palettes.insert(palette_id.into(), colors);
        self
    }
}

impl PaletteSource for CustomPalettes {
    fn palette(&self, palette_id: &str) -> Option<Vec<Color>> {
        self.palettes
            .get(palette_id)
            .cloned()
            .or_else(|| BuiltinPalettes.palette(palette_id))
    }
}

/// Looks up `palette_id`, falling back to the default palette.
#[must_use]
pub fn resolve_palette(source: &dyn PaletteSource, palette_id: &str) -> Vec<Color> {
    if let Some(colors) = source.palette(palette_id).filter(|colors| !colors.is_empty()) {
        return colors;
    }
    debug!(palette_id, fallback = DEFAULT_PALETTE_ID, "unknown or empty palette");
    source
        .palette(DEFAULT_PALETTE_ID)
        .or_else(|| BuiltinPalettes.palette(DEFAULT_PALETTE_ID))
        .unwrap_or_default()
}

/// Ordered `label -> color` mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorAssignment {
    colors: IndexMap<String, Color>,
}

impl ColorAssignment {
    /// Assigns palette colors round-robin in first-seen label order.
    ///
    /// With `extend`, every pass beyond the first uses regenerated shades:
    /// odd passes lighten and even passes darken, by a growing amount.
    #[must_use]
    pub fn resolve<'a>(labels: impl IntoIterator<Item = &'a str>, palette: &[Color], extend: bool) -> Self {
        let mut colors = IndexMap::new();
        for label in labels {
            if colors.contains_key(label) {
                continue;
            }
            let index = colors.len();
            colors.insert(label.to_owned(), color_at(palette, index, extend));
        }
        Self { colors }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<Color> {
        self.colors.get(label).copied()
    }

    #[must_use]
    pub fn color_for(&self, label: &str) -> Color {
        self.get(label).unwrap_or(FALLBACK_COLOR)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.colors.iter().map(|(label, color)| (label.as_str(), *color))
    }
}

fn color_at(palette: &[Color], index: usize, extend: bool) -> Color {
    if palette.is_empty() {
        return FALLBACK_COLOR;
    }
    let base = palette[index % palette.len()];
    let cycle = index / palette.len();
    if !extend || cycle == 0 {
        return base;
    }
    let magnitude = (SHADE_STEP * cycle.div_ceil(2) as f64).min(MAX_SHADE);
    if cycle % 2 == 1 {
        base.shade(magnitude)
    } else {
        base.shade(-magnitude)
    }
}
