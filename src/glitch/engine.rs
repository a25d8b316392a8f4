//! `scramble` and `to_mixed`: the two deterministic corruption passes.

use super::glyphs::{is_cjk_or_kana, pick, pick_replacement, CORRUPTION, GLYPHS, MIXED_TOKENS};
use super::seed::{selectors, MIXED_SALT, SCRAMBLE_SALT};

/// Corruption fallback threshold for characters that missed the glyph substitution.
pub const CHAR_CORRUPTION_THRESHOLD: f64 = 0.4;
/// Probability that a token receives a decorative mixed-script suffix.
pub const TOKEN_SUFFIX_THRESHOLD: f64 = 0.3;
/// Corruption suffix threshold for tokens that missed the mixed-script suffix.
pub const TOKEN_CORRUPTION_THRESHOLD: f64 = 0.25;

/// Characters the engine is allowed to rewrite.
pub fn is_eligible(ch: char) -> bool {
    ch.is_alphanumeric() || is_cjk_or_kana(ch)
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Replace eligible characters with glyphs or block noise, deterministically for `seed`.
///
/// Output length in code points always equals the input's. Whitespace and punctuation pass
/// through untouched. A substituted character never maps to itself, even when it is already
/// one of the glyphs. `substitution_probability` is clamped to `[0,1]`.
pub fn scramble(text: &str, seed: f64, substitution_probability: f64) -> String {
    let p = clamp_probability(substitution_probability);
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            if !is_eligible(ch) {
                return ch;
            }
            let (char_sel, corrupt_sel) = selectors(seed, i, SCRAMBLE_SALT);
            if char_sel < p {
                pick_replacement(&GLYPHS, char_sel / p, ch)
            } else if corrupt_sel < CHAR_CORRUPTION_THRESHOLD {
                pick_replacement(&CORRUPTION, corrupt_sel / CHAR_CORRUPTION_THRESHOLD, ch)
            } else {
                ch
            }
        })
        .collect()
}

/// Append mixed-script tokens (or a block glyph) to some words, deterministically for `seed`.
///
/// Whitespace runs are copied verbatim and words keep their order; a suffix is glued to the
/// word with no separating space.
pub fn to_mixed(text: &str, seed: f64) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 2);
    let mut token_index = 0usize;
    for segment in Segments::new(text) {
        match segment {
            Segment::Space(ws) => out.push_str(ws),
            Segment::Token(tok) => {
                out.push_str(tok);
                let (tok_sel, corrupt_sel) = selectors(seed, token_index, MIXED_SALT);
                if tok_sel < TOKEN_SUFFIX_THRESHOLD {
                    out.push_str(pick(&MIXED_TOKENS, tok_sel / TOKEN_SUFFIX_THRESHOLD));
                } else if corrupt_sel < TOKEN_CORRUPTION_THRESHOLD {
                    out.push(pick(&CORRUPTION, corrupt_sel / TOKEN_CORRUPTION_THRESHOLD));
                }
                token_index += 1;
            }
        }
    }
    out
}

/// A maximal run of whitespace or of non-whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Token(&'a str),
    Space(&'a str),
}

/// Splits text into alternating token/whitespace runs without dropping anything.
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let space = first.is_whitespace();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != space)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if space {
            Segment::Space(run)
        } else {
            Segment::Token(run)
        })
    }
}
