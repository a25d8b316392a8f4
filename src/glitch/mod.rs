//! # Glitch Text Engine
//!
//! Deterministic text corruption for the Δ Resonantia console. Every function here is a pure
//! function of its arguments: the same `(text, seed)` always renders the same way, while
//! advancing the seed animates the text.
//!
//! ## Passes
//!
//! - [`to_mixed`] - glues multi-script tokens (`λόγος`, `回响`, `echo`, ...) or block noise onto
//!   some words; whitespace runs are preserved verbatim
//! - [`scramble`] - swaps eligible characters for glyphs or block noise; code-point length is
//!   preserved
//! - [`glitch`] - the composition the console renders: `scramble(to_mixed(text, seed), seed, p)`
//!
//! ## Usage
//!
//! ```rust
//! use resonantia::glitch::{glitch, GlitchText, DEFAULT_SUBSTITUTION};
//!
//! let a = glitch("Echo Script", 3.0, DEFAULT_SUBSTITUTION);
//! let b = glitch("Echo Script", 3.0, DEFAULT_SUBSTITUTION);
//! assert_eq!(a, b);
//!
//! let script = GlitchText::echo_script();
//! assert_eq!(script.frame(7.0), script.frame(7.0));
//! ```
//!
//! ## Thread Safety
//!
//! No function in this module touches shared state, so they can be called from any task
//! without synchronization.

pub mod engine;
pub mod glyphs;
pub mod seed;

pub use engine::{is_eligible, scramble, to_mixed, Segment, Segments};
pub use glyphs::{CORRUPTION, GLYPHS, MIXED_TOKENS};
pub use seed::{selectors, SeedClock};

/// Substitution probability used by the console's dynamic panels.
pub const DEFAULT_SUBSTITUTION: f64 = 0.7;

/// Base text of the Echo Script panel.
pub const ECHO_SCRIPT: &str =
    "Echo Script: glyphs braid through languages — comprehension partial, alignment dangerous.";

/// The Echo Script panel renders far more aggressively than the rest of the console.
pub const ECHO_SCRIPT_SUBSTITUTION: f64 = 0.83;

/// Mix then scramble. The order matters: scrambling runs over the suffixed words.
pub fn glitch(text: &str, seed: f64, substitution_probability: f64) -> String {
    scramble(&to_mixed(text, seed), seed, substitution_probability)
}

/// A fixed base string rendered at a fixed substitution probability, one frame per seed.
#[derive(Debug, Clone, PartialEq)]
pub struct GlitchText {
    base: String,
    probability: f64,
}

impl GlitchText {
    pub fn new(base: impl Into<String>, probability: f64) -> Self {
        Self {
            base: base.into(),
            probability,
        }
    }

    pub fn echo_script() -> Self {
        Self::new(ECHO_SCRIPT, ECHO_SCRIPT_SUBSTITUTION)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Render the frame for `seed`.
    pub fn frame(&self, seed: f64) -> String {
        glitch(&self.base, seed, self.probability)
    }
}
