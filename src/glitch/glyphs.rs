//! Substitution pools used by the glitch engine.
//!
//! All three pools are immutable process-wide constants. Order matters: selectors index
//! into them directly, so reordering an entry changes the rendering for every seed.

/// Greek, mathematical, geometric and box-drawing symbols that replace eligible characters.
pub const GLYPHS: [char; 34] = [
    // Greek
    'Δ', 'Ξ', 'Ψ', 'Φ', 'Ω', 'λ', 'κ', 'γ', 'π', 'σ', 'ϕ', 'η', 'μ', 'τ', 'χ', 'θ',
    // Geometric
    '◬', '◇', '⋄', '◈', '◊', '⟟', '⟊',
    // Mathematical
    '∞', '∑', '∂', '∇', '≈', '∴',
    // Box drawing
    '╱', '╲', '╳', '┼', '╬',
];

/// Dense block/noise characters for the secondary corruption pass.
pub const CORRUPTION: [char; 10] = ['░', '▒', '▓', '█', '▌', '▐', '▀', '▄', '■', '▪'];

/// Multi-script decorative tokens appended to words by [`to_mixed`](super::to_mixed).
pub const MIXED_TOKENS: [&str; 16] = [
    "Δ",
    "echo",
    "afterimage",
    "λόγος",
    "συν",
    "memory",
    "phase",
    "φάσμα",
    "resonance",
    "mind",
    "θ",
    "回响",
    "残響",
    "こだま",
    "memoria",
    "resonantia",
];

/// Pick the pool entry addressed by a unit-interval selector.
///
/// `unit` is expected in `[0,1)`; anything outside is clamped onto the first or last entry.
pub(crate) fn pick<T: Copy>(pool: &[T], unit: f64) -> T {
    pool[slot(pool.len(), unit)]
}

/// Like [`pick`], but steps to the next entry (wrapping) when the addressed one is `current`.
///
/// Pool entries are distinct, so the result never equals `current`.
pub(crate) fn pick_replacement<T: Copy + PartialEq>(pool: &[T], unit: f64, current: T) -> T {
    let idx = slot(pool.len(), unit);
    if pool[idx] == current {
        pool[(idx + 1) % pool.len()]
    } else {
        pool[idx]
    }
}

fn slot(len: usize, unit: f64) -> usize {
    let idx = (unit * len as f64).floor();
    if idx.is_nan() || idx < 0.0 {
        0
    } else {
        (idx as usize).min(len - 1)
    }
}

/// True for CJK ideographs, Hiragana and Katakana (including the halfwidth forms).
pub fn is_cjk_or_kana(ch: char) -> bool {
    matches!(ch as u32,
        0x3040..=0x309F   // Hiragana
        | 0x30A0..=0x30FF // Katakana
        | 0x31F0..=0x31FF // Katakana phonetic extensions
        | 0x3400..=0x4DBF // CJK extension A
        | 0x4E00..=0x9FFF // CJK unified ideographs
        | 0xF900..=0xFAFF // CJK compatibility ideographs
        | 0xFF66..=0xFF9F // Halfwidth katakana
        | 0x20000..=0x2FA1F)
}
