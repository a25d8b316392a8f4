//! Interface modes of the console and their fixed readouts.

use std::fmt;
use std::str::FromStr;

/// Readout shown before any mode is selected.
pub const DEFAULT_READOUT: &str =
    "Γνῶθι σεαυτόν · Μηδὲν ἄγαν · Δ resonates where symmetry breaks and truth arrives as an echo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interpretation,
    Translation,
    ArgumentReality,
    NeuralSync,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::Interpretation,
        Mode::Translation,
        Mode::ArgumentReality,
        Mode::NeuralSync,
    ];

    pub fn readout(self) -> &'static str {
        match self {
            Mode::Interpretation => "Interpretation: symbols indicate constructive interference ahead.",
            Mode::Translation => "Echo Translation: partial comprehension achieved. Alignment not advised.",
            Mode::ArgumentReality => "Argument Reality: overlay ready. Keep distance from threshold.",
            Mode::NeuralSync => "Neural Sync: coherence at 100%. Proceed with caution.",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Mode::Interpretation => "interpretation",
            Mode::Translation => "translation",
            Mode::ArgumentReality => "ar",
            Mode::NeuralSync => "sync",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown mode '{0}' (expected interpretation, translation, ar or sync)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interpretation" => Ok(Mode::Interpretation),
            "translation" => Ok(Mode::Translation),
            "ar" | "argument-reality" => Ok(Mode::ArgumentReality),
            "sync" | "neural-sync" => Ok(Mode::NeuralSync),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}
