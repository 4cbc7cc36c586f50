use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

use crate::data::model::{OptionList, Value};

/// An sRGB colour carried inside figures, independent of the UI toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const GRAY: Rgb = Rgb([160, 160, 160]);
    /// Single-series charts.
    pub const DEFAULT: Rgb = Rgb([99, 110, 250]);
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue of the first category, next to the single-series blue.
const FIRST_HUE: f32 = 236.0;

/// `n` colours at evenly spaced hues, starting from [`FIRST_HUE`].
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    let step = 360.0 / n.max(1) as f32;
    (0..n)
        .map(|i| {
            let hsl = Hsl::new(FIRST_HUE + i as f32 * step, 0.7, 0.6);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Rgb([rgb.red, rgb.green, rgb.blue])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Rgb
// ---------------------------------------------------------------------------

/// Maps every category of a column to a colour. Built from the full
/// table's option list so colours stay put when a filter drops categories.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Value, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    pub fn new(categories: &OptionList) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories.iter().cloned().zip(palette).collect();
        ColorMap {
            mapping,
            default_color: Rgb::GRAY,
        }
    }

    pub fn color_for(&self, value: &Value) -> Rgb {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(6);
        assert_eq!(colours.len(), 6);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn first_colour_is_blue() {
        let [r, g, b] = generate_palette(3)[0].0;
        assert!(b > r && b > g, "{r} {g} {b}");
    }

    #[test]
    fn unknown_category_gets_default() {
        let cats: OptionList = [Value::from("Male"), Value::from("Female")].into_iter().collect();
        let map = ColorMap::new(&cats);
        assert_ne!(map.color_for(&Value::from("Male")), map.color_for(&Value::from("Female")));
        assert_eq!(map.color_for(&Value::from("Other")), Rgb::GRAY);
    }
}
