//! Distinct colors for an open-ended set of community labels.
//!
//! Hues are spread evenly around the color wheel while lightness and
//! saturation stay fixed, so any number of labels gets separable colors
//! without a predefined palette.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::matrix::Label;

const ONE_THIRD: f64 = 1.0 / 3.0;
const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

/// An RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn to_u8(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Convert hue, lightness, saturation (all in `[0, 1]`) to RGB.
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> Rgb {
    if s == 0.0 {
        return Rgb { r: l, g: l, b: l };
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    Rgb {
        r: channel(m1, m2, h + ONE_THIRD),
        g: channel(m1, m2, h),
        b: channel(m1, m2, h - ONE_THIRD),
    }
}

fn channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < ONE_SIXTH {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < TWO_THIRDS {
        m1 + (m2 - m1) * (TWO_THIRDS - hue) * 6.0
    } else {
        m1
    }
}

/// Inverse of [`hls_to_rgb`], returning `(h, l, s)`.
pub fn rgb_to_hls(c: Rgb) -> (f64, f64, f64) {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let sum = max + min;
    let range = max - min;
    let l = sum / 2.0;
    if range == 0.0 {
        return (0.0, l, 0.0);
    }
    let s = if l <= 0.5 {
        range / sum
    } else {
        range / (2.0 - sum)
    };
    let rc = (max - c.r) / range;
    let gc = (max - c.g) / range;
    let bc = (max - c.b) / range;
    let h = if c.r == max {
        bc - gc
    } else if c.g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScheme {
    /// Label `k` of `n` gets hue `k / n`.
    EvenHue { saturation: f64, lightness: f64 },
    /// Hue `(k + 1) * 0.9 / n`, with lightness and saturation drawn from a
    /// seeded generator.
    Jitter { seed: u64 },
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::EvenHue {
            saturation: 0.7,
            lightness: 0.5,
        }
    }
}

/// Color of every label present in a matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap(BTreeMap<Label, Rgb>);

impl ColorMap {
    pub fn get(&self, label: Label) -> Option<Rgb> {
        self.0.get(&label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, Rgb)> + '_ {
        self.0.iter().map(|(&label, &rgb)| (label, rgb))
    }

    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorAssigner {
    scheme: ColorScheme,
}

impl ColorAssigner {
    pub fn new(scheme: ColorScheme) -> Self {
        ColorAssigner { scheme }
    }

    /// Assign a color to each distinct label. Labels are enumerated in
    /// ascending order, so the result does not depend on input order.
    pub fn assign<I: IntoIterator<Item = Label>>(&self, labels: I) -> ColorMap {
        let labels: BTreeSet<Label> = labels.into_iter().collect();
        let n = labels.len() as f64;
        let colors = match self.scheme {
            ColorScheme::EvenHue {
                saturation,
                lightness,
            } => labels
                .into_iter()
                .enumerate()
                .map(|(k, label)| (label, hls_to_rgb(k as f64 / n, lightness, saturation)))
                .collect(),
            ColorScheme::Jitter { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                let step = 0.9 / n;
                labels
                    .into_iter()
                    .enumerate()
                    .map(|(k, label)| {
                        let lightness = rng.gen_range(0.0..1.0);
                        let saturation = rng.gen_range(0.0..1.0);
                        (label, hls_to_rgb((k + 1) as f64 * step, lightness, saturation))
                    })
                    .collect()
            }
        };
        ColorMap(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn primaries() {
        let red = hls_to_rgb(0.0, 0.5, 1.0);
        assert_eq!(red.to_u8(), [255, 0, 0]);
        assert_eq!(hls_to_rgb(ONE_THIRD, 0.5, 1.0).to_u8(), [0, 255, 0]);
        assert_eq!(hls_to_rgb(TWO_THIRDS, 0.5, 1.0).to_hex(), "#0000ff");
        assert_eq!(hls_to_rgb(0.3, 0.25, 0.0).to_u8(), [64, 64, 64]);
    }

    #[test]
    fn every_label_gets_one_color() {
        let colors = ColorAssigner::default().assign([40, 3, 3, 7, 1000]);
        assert_eq!(colors.labels().collect::<Vec<_>>(), vec![3, 7, 40, 1000]);
        assert!(colors.get(8).is_none());
    }

    #[test]
    fn hues_are_evenly_spaced() {
        let colors = ColorAssigner::default().assign([9, 2, 5, 11, 0]);
        for (k, (_, rgb)) in colors.iter().enumerate() {
            let (h, l, s) = rgb_to_hls(rgb);
            let d = (h - k as f64 / 5.0).rem_euclid(1.0);
            assert!(d.min(1.0 - d) < EPS, "label {k}: hue {h}");
            assert!((l - 0.5).abs() < EPS);
            assert!((s - 0.7).abs() < EPS);
        }
    }

    #[test]
    fn assignment_is_deterministic() {
        for scheme in [ColorScheme::default(), ColorScheme::Jitter { seed: 42 }] {
            let assigner = ColorAssigner::new(scheme);
            assert_eq!(assigner.assign([1, 2, 3]), assigner.assign([3, 2, 1]));
        }
    }

    #[test]
    fn jitter_stays_in_gamut() {
        let colors = ColorAssigner::new(ColorScheme::Jitter { seed: 7 }).assign(0..4);
        assert_eq!(colors.len(), 4);
        for (_, rgb) in colors.iter() {
            for c in [rgb.r, rgb.g, rgb.b] {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn no_labels_no_colors() {
        assert!(ColorAssigner::default().assign(std::iter::empty()).is_empty());
    }
}
