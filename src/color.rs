use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Continuous colour scale: success rate → Color32
// ---------------------------------------------------------------------------

/// Hue at the low end (blue) and high end (red) of the scale, in degrees.
const LOW_HUE: f32 = 240.0;
const HIGH_HUE: f32 = 0.0;

/// Colour for points without a value.
pub const MISSING_COLOR: Color32 = Color32::GRAY;

fn hsl_to_color32(hue: f32) -> Color32 {
    let hsl = Hsl::new(hue, 0.75, 0.50);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Maps a numeric range onto a blue → red hue ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateColorScale {
    pub min: f64,
    pub max: f64,
}

impl RateColorScale {
    /// Scale spanning the given values, `None` if there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(RateColorScale { min: v, max: v }),
            Some(s) => Some(RateColorScale {
                min: s.min.min(v),
                max: s.max.max(v),
            }),
        })
    }

    /// Position of `value` in the range, clamped to `[0, 1]`.
    fn fraction(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: Option<f64>) -> Color32 {
        match value {
            Some(v) => {
                let t = self.fraction(v);
                hsl_to_color32(LOW_HUE + (HIGH_HUE - LOW_HUE) * t)
            }
            None => MISSING_COLOR,
        }
    }

    /// `n` evenly spaced (value, colour) stops for the legend.
    pub fn legend_entries(&self, n: usize) -> Vec<(String, Color32)> {
        if n == 0 {
            return Vec::new();
        }
        (0..n)
            .map(|i| {
                let t = if n == 1 { 0.5 } else { i as f64 / (n - 1) as f64 };
                let v = self.min + (self.max - self.min) * t;
                (format!("{v:.1}"), self.color_for(Some(v)))
            })
            .collect()
    }
}
