//! Augmentation Configuration
//!
//! The knobs of the pipeline: a global probability multiplier, one enable
//! weight per effect and the distribution parameters of each effect. All
//! weights default to zero, so a default configuration is the identity.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;
use core::str::FromStr;

use augpipe_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// AugmentConfig
// =============================================================================

/// Probabilities and distribution parameters of every augmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Global multiplier applied to every effect weight.
    pub p: f32,

    /// Probability multiplier for x-flip.
    pub xflip: f32,
    /// Probability multiplier for y-flip.
    pub yflip: f32,
    /// Probability multiplier for 90 degree rotations.
    pub rotate_int: f32,
    /// Probability multiplier for integer translation.
    pub translate_int: f32,
    /// Range of integer translation, relative to image dimensions.
    pub translate_int_max: f32,

    /// Probability multiplier for isotropic scaling.
    pub scale: f32,
    /// Probability multiplier for arbitrary rotation.
    pub rotate_frac: f32,
    /// Probability multiplier for anisotropic scaling.
    pub aniso: f32,
    /// Probability multiplier for fractional translation.
    pub translate_frac: f32,
    /// Log2 standard deviation of isotropic scaling.
    pub scale_std: f32,
    /// Range of arbitrary rotation, 1 = full circle.
    pub rotate_frac_max: f32,
    /// Log2 standard deviation of anisotropic scaling.
    pub aniso_std: f32,
    /// Probability that the anisotropic stretch axis is rotated.
    pub aniso_rotate_prob: f32,
    /// Standard deviation of fractional translation, relative to image dimensions.
    pub translate_frac_std: f32,

    /// Probability multiplier for brightness.
    pub brightness: f32,
    /// Probability multiplier for contrast.
    pub contrast: f32,
    /// Probability multiplier for luma flip.
    pub lumaflip: f32,
    /// Probability multiplier for hue rotation.
    pub hue: f32,
    /// Probability multiplier for saturation.
    pub saturation: f32,
    /// Standard deviation of brightness.
    pub brightness_std: f32,
    /// Log2 standard deviation of contrast.
    pub contrast_std: f32,
    /// Range of hue rotation, 1 = full circle.
    pub hue_max: f32,
    /// Log2 standard deviation of saturation.
    pub saturation_std: f32,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            p: 1.0,
            xflip: 0.0,
            yflip: 0.0,
            rotate_int: 0.0,
            translate_int: 0.0,
            translate_int_max: 0.125,
            scale: 0.0,
            rotate_frac: 0.0,
            aniso: 0.0,
            translate_frac: 0.0,
            scale_std: 0.2,
            rotate_frac_max: 1.0,
            aniso_std: 0.2,
            aniso_rotate_prob: 0.5,
            translate_frac_std: 0.125,
            brightness: 0.0,
            contrast: 0.0,
            lumaflip: 0.0,
            hue: 0.0,
            saturation: 0.0,
            brightness_std: 0.2,
            contrast_std: 0.5,
            hue_max: 1.0,
            saturation_std: 1.0,
        }
    }
}

impl AugmentConfig {
    /// Creates the identity configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from a named preset.
    pub fn preset(name: &str) -> Result<Self> {
        Ok(name.parse::<AugmentPreset>()?.config())
    }

    /// Sets the global probability multiplier.
    pub fn with_p(mut self, p: f32) -> Self {
        self.p = p;
        self
    }

    /// Sets the x-flip weight.
    pub fn with_xflip(mut self, weight: f32) -> Self {
        self.xflip = weight;
        self
    }

    /// Sets the y-flip weight.
    pub fn with_yflip(mut self, weight: f32) -> Self {
        self.yflip = weight;
        self
    }

    /// Sets the 90 degree rotation weight.
    pub fn with_rotate_int(mut self, weight: f32) -> Self {
        self.rotate_int = weight;
        self
    }

    /// Sets the integer translation weight and maximum fraction.
    pub fn with_translate_int(mut self, weight: f32, max: f32) -> Self {
        self.translate_int = weight;
        self.translate_int_max = max;
        self
    }

    /// Sets the isotropic scale weight and log2 std.
    pub fn with_scale(mut self, weight: f32, std: f32) -> Self {
        self.scale = weight;
        self.scale_std = std;
        self
    }

    /// Sets the arbitrary rotation weight and range.
    pub fn with_rotate_frac(mut self, weight: f32, max: f32) -> Self {
        self.rotate_frac = weight;
        self.rotate_frac_max = max;
        self
    }

    /// Sets the anisotropic scale weight, log2 std and axis rotation probability.
    pub fn with_aniso(mut self, weight: f32, std: f32, rotate_prob: f32) -> Self {
        self.aniso = weight;
        self.aniso_std = std;
        self.aniso_rotate_prob = rotate_prob;
        self
    }

    /// Sets the fractional translation weight and std.
    pub fn with_translate_frac(mut self, weight: f32, std: f32) -> Self {
        self.translate_frac = weight;
        self.translate_frac_std = std;
        self
    }

    /// Sets the brightness weight and std.
    pub fn with_brightness(mut self, weight: f32, std: f32) -> Self {
        self.brightness = weight;
        self.brightness_std = std;
        self
    }

    /// Sets the contrast weight and log2 std.
    pub fn with_contrast(mut self, weight: f32, std: f32) -> Self {
        self.contrast = weight;
        self.contrast_std = std;
        self
    }

    /// Sets the luma flip weight.
    pub fn with_lumaflip(mut self, weight: f32) -> Self {
        self.lumaflip = weight;
        self
    }

    /// Sets the hue rotation weight and range.
    pub fn with_hue(mut self, weight: f32, max: f32) -> Self {
        self.hue = weight;
        self.hue_max = max;
        self
    }

    /// Sets the saturation weight and log2 std.
    pub fn with_saturation(mut self, weight: f32, std: f32) -> Self {
        self.saturation = weight;
        self.saturation_std = std;
        self
    }

    /// Enabled effects, in application order, with their label widths.
    pub fn label_groups(&self) -> Vec<(&'static str, usize)> {
        [
            ("xflip", self.xflip, 1),
            ("yflip", self.yflip, 1),
            ("rotate_int", self.rotate_int, 2),
            ("translate_int", self.translate_int, 2),
            ("scale", self.scale, 1),
            ("rotate_frac", self.rotate_frac, 2),
            ("aniso", self.aniso, 2),
            ("translate_frac", self.translate_frac, 2),
            ("brightness", self.brightness, 1),
            ("contrast", self.contrast, 1),
            ("lumaflip", self.lumaflip, 1),
            ("hue", self.hue, 2),
            ("saturation", self.saturation, 1),
        ]
        .into_iter()
        .filter(|&(_, weight, _)| weight > 0.0)
        .map(|(name, _, width)| (name, width))
        .collect()
    }

    /// Number of label columns D produced for this configuration.
    pub fn label_width(&self) -> usize {
        self.label_groups().iter().map(|&(_, width)| width).sum()
    }

    /// True if any pixel blit is enabled.
    pub fn blit_enabled(&self) -> bool {
        self.xflip > 0.0 || self.yflip > 0.0 || self.rotate_int > 0.0 || self.translate_int > 0.0
    }

    /// True if the geometric resampling stage will run.
    pub fn geometric_enabled(&self) -> bool {
        self.scale > 0.0 || self.rotate_frac > 0.0 || self.aniso > 0.0 || self.translate_frac > 0.0
    }

    /// True if the color stage will run.
    pub fn color_enabled(&self) -> bool {
        self.brightness > 0.0
            || self.contrast > 0.0
            || self.lumaflip > 0.0
            || self.hue > 0.0
            || self.saturation > 0.0
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Named effect groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AugmentPreset {
    /// x-flip, 90 degree rotation, integer translation.
    Blit,
    /// Scale, rotation, anisotropic scale, fractional translation.
    Geom,
    /// Brightness, contrast, luma flip, hue, saturation.
    Color,
    /// Blit + geom.
    Bg,
    /// Blit + geom + color.
    Bgc,
}

impl AugmentPreset {
    /// Every preset.
    pub const ALL: [AugmentPreset; 5] = [Self::Blit, Self::Geom, Self::Color, Self::Bg, Self::Bgc];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blit => "blit",
            Self::Geom => "geom",
            Self::Color => "color",
            Self::Bg => "bg",
            Self::Bgc => "bgc",
        }
    }

    /// The configuration this preset enables, all weights 1.
    #[must_use]
    pub fn config(self) -> AugmentConfig {
        let blit = |c: AugmentConfig| {
            c.with_xflip(1.0).with_rotate_int(1.0).with_translate_int(1.0, 0.125)
        };
        let geom = |c: AugmentConfig| {
            c.with_scale(1.0, 0.2)
                .with_rotate_frac(1.0, 1.0)
                .with_aniso(1.0, 0.2, 0.5)
                .with_translate_frac(1.0, 0.125)
        };
        let color = |c: AugmentConfig| {
            c.with_brightness(1.0, 0.2)
                .with_contrast(1.0, 0.5)
                .with_lumaflip(1.0)
                .with_hue(1.0, 1.0)
                .with_saturation(1.0, 1.0)
        };

        let base = AugmentConfig::default();
        match self {
            Self::Blit => blit(base),
            Self::Geom => geom(base),
            Self::Color => color(base),
            Self::Bg => geom(blit(base)),
            Self::Bgc => color(geom(blit(base))),
        }
    }
}

impl fmt::Display for AugmentPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AugmentPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_operation(format!("unknown augmentation preset '{s}'")))
    }
}

impl From<AugmentPreset> for AugmentConfig {
    fn from(preset: AugmentPreset) -> Self {
        preset.config()
    }
}

// =============================================================================
// Tests
// =============================================================================
