//! Wavelet Filter Bank - Low-Pass Decomposition Filters
//!
//! Coefficients of the low-pass (scaling) filters of the Haar, Daubechies
//! and Symlet families. The geometric resampler uses one of these as both
//! the synthesis filter (2x upsampling) and the analysis filter (2x
//! downsampling).
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

#![allow(clippy::excessive_precision)]

use core::fmt;
use core::str::FromStr;

use augpipe_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Coefficient Tables
// =============================================================================

const HAAR: [f64; 2] = [
    0.7071067811865476,
    0.7071067811865476,
];

const DB2: [f64; 4] = [
    -0.12940952255092145,
    0.22414386804185735,
    0.836516303737469,
    0.48296291314469025,
];

const DB3: [f64; 6] = [
    0.035226291882100656,
    -0.08544127388224149,
    -0.13501102001039084,
    0.4598775021193313,
    0.8068915093133388,
    0.3326705529509569,
];

const DB4: [f64; 8] = [
    -0.010597401784997278,
    0.032883011666982945,
    0.030841381835986965,
    -0.18703481171888114,
    -0.02798376941698385,
    0.6308807679295904,
    0.7148465705525415,
    0.23037781330885523,
];

const DB5: [f64; 10] = [
    0.003335725285001549,
    -0.012580751999015526,
    -0.006241490213011705,
    0.07757149384006515,
    -0.03224486958502952,
    -0.24229488706619015,
    0.13842814590110342,
    0.7243085284385744,
    0.6038292697974729,
    0.160102397974125,
];

const DB6: [f64; 12] = [
    -0.00107730108499558,
    0.004777257511010651,
    0.0005538422009938016,
    -0.031582039318031156,
    0.02752286553001629,
    0.09750160558707936,
    -0.12976686756709563,
    -0.22626469396516913,
    0.3152503517092432,
    0.7511339080215775,
    0.4946238903983854,
    0.11154074335008017,
];

const DB7: [f64; 14] = [
    0.0003537138000010399,
    -0.0018016407039998328,
    0.00042957797300470274,
    0.012550998556013784,
    -0.01657454163101562,
    -0.03802993693503463,
    0.0806126091510659,
    0.07130921926705004,
    -0.22403618499416572,
    -0.14390600392910627,
    0.4697822874053586,
    0.7291320908465551,
    0.39653931948230575,
    0.07785205408506236,
];

const DB8: [f64; 16] = [
    -0.00011747678400228192,
    0.0006754494059985568,
    -0.0003917403729959771,
    -0.00487035299301066,
    0.008746094047015655,
    0.013981027917015516,
    -0.04408825393106472,
    -0.01736930100202211,
    0.128747426620186,
    0.00047248457399797254,
    -0.2840155429624281,
    -0.015829105256023893,
    0.5853546836548691,
    0.6756307362980128,
    0.3128715909144659,
    0.05441584224308161,
];

const SYM4: [f64; 8] = [
    -0.07576571478927333,
    -0.02963552764599851,
    0.49761866763201545,
    0.8037387518059161,
    0.29785779560527736,
    -0.09921954357684722,
    -0.012603967262037833,
    0.0322231006040427,
];

const SYM5: [f64; 10] = [
    0.027333068345077982,
    0.029519490925774643,
    -0.039134249302383094,
    0.1993975339773936,
    0.7234076904024206,
    0.6339789634582119,
    0.01660210576452232,
    -0.17532808990845047,
    -0.021101834024758855,
    0.019538882735286728,
];

const SYM6: [f64; 12] = [
    0.015404109327027373,
    0.0034907120842174702,
    -0.11799011114819057,
    -0.048311742585633,
    0.4910559419267466,
    0.787641141030194,
    0.3379294217276218,
    -0.07263752278646252,
    -0.021060292512300564,
    0.04472490177066578,
    0.0017677118642428036,
    -0.007800708325034148,
];

const SYM7: [f64; 14] = [
    0.002681814568257878,
    -0.0010473848886829163,
    -0.01263630340325193,
    0.03051551316596357,
    0.0678926935013727,
    -0.049552834937127255,
    0.017441255086855827,
    0.5361019170917628,
    0.767764317003164,
    0.2886296317515146,
    -0.14004724044296152,
    -0.10780823770381774,
    0.004010244871533663,
    0.010268176708511255,
];

const SYM8: [f64; 16] = [
    -0.0033824159510061256,
    -0.0005421323317911481,
    0.03169508781149298,
    0.007607487324917605,
    -0.1432942383508097,
    -0.061273359067658524,
    0.4813596512583722,
    0.7771857517005235,
    0.3644418948353314,
    -0.05194583810770904,
    -0.027219029917056003,
    0.049137179673607506,
    0.003808752013890615,
    -0.01495225833704823,
    -0.0003029205147213668,
    0.0018899503327594609,
];

// =============================================================================
// Wavelet
// =============================================================================

/// A named wavelet family whose low-pass filter can drive the resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wavelet {
    /// Haar (two taps).
    Haar,
    /// Daubechies 1 (same taps as Haar).
    Db1,
    /// Daubechies 2.
    Db2,
    /// Daubechies 3.
    Db3,
    /// Daubechies 4.
    Db4,
    /// Daubechies 5.
    Db5,
    /// Daubechies 6.
    Db6,
    /// Daubechies 7.
    Db7,
    /// Daubechies 8.
    Db8,
    /// Symlet 2 (same taps as Daubechies 2).
    Sym2,
    /// Symlet 3 (same taps as Daubechies 3).
    Sym3,
    /// Symlet 4.
    Sym4,
    /// Symlet 5.
    Sym5,
    /// Symlet 6, the resampler default.
    #[default]
    Sym6,
    /// Symlet 7.
    Sym7,
    /// Symlet 8.
    Sym8,
}

impl Wavelet {
    /// Every wavelet in the bank.
    pub const ALL: [Wavelet; 16] = [
        Self::Haar,
        Self::Db1,
        Self::Db2,
        Self::Db3,
        Self::Db4,
        Self::Db5,
        Self::Db6,
        Self::Db7,
        Self::Db8,
        Self::Sym2,
        Self::Sym3,
        Self::Sym4,
        Self::Sym5,
        Self::Sym6,
        Self::Sym7,
        Self::Sym8,
    ];

    /// Lowercase name, as used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Haar => "haar",
            Self::Db1 => "db1",
            Self::Db2 => "db2",
            Self::Db3 => "db3",
            Self::Db4 => "db4",
            Self::Db5 => "db5",
            Self::Db6 => "db6",
            Self::Db7 => "db7",
            Self::Db8 => "db8",
            Self::Sym2 => "sym2",
            Self::Sym3 => "sym3",
            Self::Sym4 => "sym4",
            Self::Sym5 => "sym5",
            Self::Sym6 => "sym6",
            Self::Sym7 => "sym7",
            Self::Sym8 => "sym8",
        }
    }

    /// The raw low-pass coefficients.
    #[must_use]
    pub const fn coefficients(self) -> &'static [f64] {
        match self {
            Self::Haar | Self::Db1 => &HAAR,
            Self::Db2 | Self::Sym2 => &DB2,
            Self::Db3 | Self::Sym3 => &DB3,
            Self::Db4 => &DB4,
            Self::Db5 => &DB5,
            Self::Db6 => &DB6,
            Self::Db7 => &DB7,
            Self::Db8 => &DB8,
            Self::Sym4 => &SYM4,
            Self::Sym5 => &SYM5,
            Self::Sym6 => &SYM6,
            Self::Sym7 => &SYM7,
            Self::Sym8 => &SYM8,
        }
    }

    /// Number of filter taps.
    #[must_use]
    pub const fn taps(self) -> usize {
        self.coefficients().len()
    }

    /// Padding margin of the 2x filter bank, `taps / 4` per side.
    #[must_use]
    pub const fn half_support(self) -> usize {
        self.taps() / 4
    }

    /// Coefficients scaled to unit sum, in `f32`.
    #[must_use]
    pub fn normalized(self) -> Vec<f32> {
        let coeffs = self.coefficients();
        let sum: f64 = coeffs.iter().sum();
        coeffs.iter().map(|&c| (c / sum) as f32).collect()
    }
}

impl fmt::Display for Wavelet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Wavelet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.name() == lower)
            .ok_or_else(|| Error::invalid_operation(format!("Unknown wavelet '{s}'")))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowpass_filters_sum_to_sqrt2() {
        for wavelet in Wavelet::ALL {
            let sum: f64 = wavelet.coefficients().iter().sum();
            assert!(
                (sum - std::f64::consts::SQRT_2).abs() < 1e-9,
                "{wavelet} sums to {sum}"
            );
        }
    }

    #[test]
    fn test_even_and_odd_phases_balance() {
        // Each polyphase component of a normalized filter carries half the
        // DC gain; constant images survive 2x up/down sampling because of it.
        for wavelet in Wavelet::ALL {
            let taps = wavelet.normalized();
            let even: f32 = taps.iter().step_by(2).sum();
            let odd: f32 = taps.iter().skip(1).step_by(2).sum();
            assert!((even - 0.5).abs() < 1e-5, "{wavelet} even phase {even}");
            assert!((odd - 0.5).abs() < 1e-5, "{wavelet} odd phase {odd}");
        }
    }

    #[test]
    fn test_half_support() {
        assert_eq!(Wavelet::Haar.half_support(), 0);
        assert_eq!(Wavelet::Sym6.taps(), 12);
        assert_eq!(Wavelet::Sym6.half_support(), 3);
        assert_eq!(Wavelet::Db8.half_support(), 4);
    }

    #[test]
    fn test_aliases_share_tables() {
        assert_eq!(Wavelet::Haar.coefficients(), Wavelet::Db1.coefficients());
        assert_eq!(Wavelet::Db2.coefficients(), Wavelet::Sym2.coefficients());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("SYM6".parse::<Wavelet>().unwrap(), Wavelet::Sym6);
        assert_eq!(Wavelet::Db4.to_string(), "db4");
        assert!("coif1".parse::<Wavelet>().is_err());
        assert_eq!(Wavelet::default(), Wavelet::Sym6);
    }
}
