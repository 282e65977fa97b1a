//! Presentation colors. Never read by gameplay logic.

use crate::util::random_between;
use rand::Rng;
use std::fmt;

/// HSL color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f32,
    /// Saturation in percent.
    pub saturation: f32,
    /// Lightness in percent.
    pub lightness: f32,
}

impl Color {
    pub const fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// A color whose hue lies within ±20° of `base_hue`.
    pub fn random_near<R: Rng + ?Sized>(rng: &mut R, base_hue: f32) -> Self {
        let hue = (base_hue + random_between(rng, -20.0, 20.0) + 360.0).rem_euclid(360.0);
        Self {
            hue,
            saturation: random_between(rng, 66.0, 92.0),
            lightness: random_between(rng, 48.0, 66.0),
        }
    }

    /// A color with a fully random base hue.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let base = random_between(rng, 0.0, 360.0);
        Self::random_near(rng, base)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.0}, {:.0}%, {:.0}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}
