//! Algebra over glyphstrings.
//!
//! Every operation here works on symbol indices only; nothing is ever decoded to bytes. Operands
//! are normalized first, so anything outside the alphabet is invisible to the algebra. Binary
//! pointwise operations broadcast by cycling the shorter operand: for `N = max(|a|, |b|)`,
//! position `k` pairs `a[k % |a|]` with `b[k % |b|]`.

use crate::codec::Codec;

impl Codec {
    /// Keep only the characters that belong to the alphabet.
    pub fn normalize(&self, s: &str) -> String {
        s.chars().filter(|&c| self.alphabet().contains(c)).collect()
    }

    /// Number of glyphs after normalization.
    pub fn glyph_len(&self, s: &str) -> usize {
        s.chars().filter(|&c| self.alphabet().contains(c)).count()
    }

    pub fn concat(&self, a: &str, b: &str) -> String {
        let mut out = self.normalize(a);
        out.push_str(&self.normalize(b));
        out
    }

    fn add_idx(&self, i: usize, j: usize) -> usize {
        (i + j) % self.base()
    }

    fn sub_idx(&self, i: usize, j: usize) -> usize {
        (i + self.base() - j) % self.base()
    }

    fn broadcast<F>(&self, a: &[usize], b: &[usize], op: F) -> String
    where
        F: Fn(usize, usize) -> usize,
    {
        let n = a.len().max(b.len());
        self.from_indices((0..n).map(|k| op(a[k % a.len()], b[k % b.len()])))
    }

    /// Pointwise modular addition. An empty operand yields the other one unchanged.
    pub fn add(&self, a: &str, b: &str) -> String {
        let (ia, ib) = (self.indices(a), self.indices(b));
        if ia.is_empty() {
            return self.from_indices(ib);
        }
        if ib.is_empty() {
            return self.from_indices(ia);
        }
        self.broadcast(&ia, &ib, |i, j| self.add_idx(i, j))
    }

    /// Pointwise modular subtraction. Subtracting nothing returns `a`; subtracting from nothing
    /// returns nothing.
    pub fn sub(&self, a: &str, b: &str) -> String {
        let (ia, ib) = (self.indices(a), self.indices(b));
        if ia.is_empty() || ib.is_empty() {
            return self.from_indices(ia);
        }
        self.broadcast(&ia, &ib, |i, j| self.sub_idx(i, j))
    }

    /// Reflect every index: `i -> base - 1 - i`. Applying it twice is the identity.
    pub fn invert(&self, s: &str) -> String {
        let base = self.base();
        self.from_indices(self.indices(s).into_iter().map(|i| base - 1 - i))
    }

    /// Fraction of broadcast positions whose indices differ, in `[0, 1]`.
    pub fn distance(&self, a: &str, b: &str) -> f64 {
        let (ia, ib) = (self.indices(a), self.indices(b));
        match (ia.is_empty(), ib.is_empty()) {
            (true, true) => return 0.0,
            (true, false) | (false, true) => return 1.0,
            _ => (),
        }
        let n = ia.len().max(ib.len());
        let mismatches = (0..n)
            .filter(|k| ia[k % ia.len()] != ib[k % ib.len()])
            .count();
        mismatches as f64 / n as f64
    }

    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        1.0 - self.distance(a, b)
    }
}
