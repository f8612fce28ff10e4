//! Grammar expansion: rewrite an axiom through a [`RuleSet`] a fixed number of times.
//!
//! Expansion is total and deterministic. It is also exponential in the
//! iteration count whenever a rule grows the string, so bounding `iterations`
//! is the caller's job. [`RuleSet::projected_len`] predicts the final length
//! without building the string, which is what
//! [`PlantConfig::validate`](crate::PlantConfig::validate) uses for its ceiling.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// A single grammar symbol.
pub type Symbol = char;

/// Production rules: each symbol maps to at most one replacement string.
///
/// Symbols without an entry are terminal and rewrite to themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: BTreeMap<Symbol, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a production (builder pattern). A later rule for the same symbol replaces the earlier one.
    pub fn with_rule(mut self, symbol: Symbol, replacement: impl Into<String>) -> Self {
        self.insert(symbol, replacement);
        self
    }

    /// Inserts a production, returning the replacement it displaced, if any.
    pub fn insert(&mut self, symbol: Symbol, replacement: impl Into<String>) -> Option<String> {
        self.rules.insert(symbol, replacement.into())
    }

    pub fn get(&self, symbol: Symbol) -> Option<&str> {
        self.rules.get(&symbol).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Iterates `(symbol, replacement)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.rules.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Applies one rewriting round to `input`.
    pub fn rewrite(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            match self.rules.get(&c) {
                Some(replacement) => out.push_str(replacement),
                None => out.push(c),
            }
        }
        out
    }

    /// Number of symbols `expand(axiom, self, iterations)` would produce.
    ///
    /// Works on per-symbol counts so it never materializes the string.
    /// Saturates at `u128::MAX`.
    pub fn projected_len(&self, axiom: Symbol, iterations: usize) -> u128 {
        if self.rules.is_empty() {
            return 1;
        }
        let mut counts: HashMap<Symbol, u128> = HashMap::from([(axiom, 1)]);

        for _ in 0..iterations {
            let mut next: HashMap<Symbol, u128> = HashMap::with_capacity(counts.len());
            for (&sym, &n) in &counts {
                match self.rules.get(&sym) {
                    Some(replacement) => {
                        for c in replacement.chars() {
                            let slot = next.entry(c).or_insert(0);
                            *slot = slot.saturating_add(n);
                        }
                    }
                    None => {
                        let slot = next.entry(sym).or_insert(0);
                        *slot = slot.saturating_add(n);
                    }
                }
            }
            counts = next;
        }

        counts
            .values()
            .fold(0u128, |total, &n| total.saturating_add(n))
    }
}

impl<const N: usize> From<[(Symbol, &str); N]> for RuleSet {
    fn from(pairs: [(Symbol, &str); N]) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |set, (sym, rep)| set.with_rule(sym, rep))
    }
}

/// The fully rewritten symbol sequence handed to the turtle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedString(String);

impl ExpandedString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbols in walk order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.chars()
    }

    /// Number of symbols (not bytes).
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// How many times `symbol` occurs.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.0.chars().filter(|&c| c == symbol).count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for ExpandedString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ExpandedString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ExpandedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rewrites `axiom` through `rules` `iterations` times.
///
/// `iterations == 0` or an empty rule set returns the axiom unchanged.
/// Output length grows exponentially for expanding rules; the caller must
/// keep `iterations` bounded.
pub fn expand(axiom: Symbol, rules: &RuleSet, iterations: usize) -> ExpandedString {
    let mut current = axiom.to_string();
    if rules.is_empty() {
        return ExpandedString(current);
    }

    for round in 0..iterations {
        current = rules.rewrite(&current);
        debug!(round = round + 1, len = current.len(), "expanded grammar round");
    }

    ExpandedString(current)
}

/// Built-in plant shapes. All of them grow from the axiom `X`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// Climbing plant: `X -> [F-[[X]+X]+F[+FX]-X]`, `F -> FF`.
    #[default]
    Climbing,
    /// Bushy fan: `X -> F+[-F-XF-X][+FF][--XF[+X]][++F-X]`, `F -> FF`.
    Bushy,
    /// Dense tangle using the extra placeholder `Z`.
    Dense,
}

impl Preset {
    /// The axiom shared by every preset.
    pub const AXIOM: Symbol = 'X';

    /// Shape selector: `1` is [`Climbing`](Self::Climbing), `2` is
    /// [`Bushy`](Self::Bushy), anything else is [`Dense`](Self::Dense).
    pub fn from_index(shape: i32) -> Self {
        match shape {
            1 => Self::Climbing,
            2 => Self::Bushy,
            _ => Self::Dense,
        }
    }

    pub fn rules(self) -> RuleSet {
        match self {
            Self::Climbing => RuleSet::from([('X', "[F-[[X]+X]+F[+FX]-X]"), ('F', "FF")]),
            Self::Bushy => RuleSet::from([('X', "F+[-F-XF-X][+FF][--XF[+X]][++F-X]"), ('F', "FF")]),
            Self::Dense => RuleSet::from([
                ('X', "FF[+XZ++X-F[+ZX]][-X++F-X]"),
                ('Z', "[+F-X-F][++ZX]"),
                ('F', "FX[FX[+XF]]"),
            ]),
        }
    }
}
