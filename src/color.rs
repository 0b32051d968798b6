use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed colours for the usual sentiment labels, so "Negative" is always red.
fn sentiment_color(label: &str) -> Option<Color32> {
    match label {
        "Positive" => Some(Color32::from_rgb(46, 170, 95)),
        "Negative" => Some(Color32::from_rgb(220, 70, 70)),
        "Neutral" => Some(Color32::from_rgb(150, 150, 160)),
        _ => None,
    }
}

/// Linear blend from a dark background tone to `hot` for heatmap cells.
pub fn heat(t: f32, hot: Color32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let cold = Color32::from_rgb(30, 34, 48);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    Color32::from_rgb(mix(cold.r(), hot.r()), mix(cold.g(), hot.g()), mix(cold.b(), hot.b()))
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct labels of one categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the labels of a column.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a String>) -> Self {
        let labels: Vec<&String> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(l, c)| (l.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Like [`ColorMap::new`], but known sentiment labels keep fixed colours.
    pub fn for_sentiment<'a>(labels: impl IntoIterator<Item = &'a String>) -> Self {
        let mut map = Self::new(labels);
        for (label, color) in map.mapping.iter_mut() {
            if let Some(fixed) = sentiment_color(label) {
                *color = fixed;
            }
        }
        map
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
