//! Error taxonomy for configuration, expansion and interpretation.
//!
//! Every failure here is permanent: the walk is a deterministic pass over its
//! input, so nothing is retried. Positions are 0-based symbol indices into the
//! expanded string.

use thiserror::Error;

/// Failures raised while the turtle walks an expanded string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    /// The string contains a symbol the interpreter has no operation for.
    #[error("unrecognized symbol '{symbol}' at position {position}")]
    UnrecognizedSymbol { position: usize, symbol: char },

    /// A symbios symbol ID with no operation registered for it.
    #[error("unmapped symbol id {id} at position {position}")]
    UnmappedSymbolId { position: usize, id: u16 },

    /// A `]` was read while the pose stack was empty.
    #[error("unbalanced ']' at position {position}: pose stack is empty")]
    UnbalancedPop { position: usize },

    /// The string ended while saved poses were still on the stack.
    #[error("string ended with {open} unclosed '[' branch(es)")]
    UnclosedBranches { open: usize },

    /// A `[` would push the stack past its configured depth.
    #[error("pose stack overflow at position {position}: depth limit is {limit}")]
    StackOverflow { position: usize, limit: usize },
}

impl InterpretError {
    /// Index of the offending symbol, when the failure is tied to one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnrecognizedSymbol { position, .. }
            | Self::UnmappedSymbolId { position, .. }
            | Self::UnbalancedPop { position }
            | Self::StackOverflow { position, .. } => Some(*position),
            Self::UnclosedBranches { .. } => None,
        }
    }

    /// True for bracket-balance failures (as opposed to alphabet failures).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedPop { .. } | Self::UnclosedBranches { .. } | Self::StackOverflow { .. }
        )
    }
}

/// Defects in the configuration surface, detected before any walk starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("step length must be positive and finite, got {0}")]
    InvalidStepLength(f32),

    #[error("turn angle must be positive and finite, got {0} degrees")]
    InvalidTurnAngle(f32),

    #[error("adaptation strength must be finite, got {0}")]
    NonFiniteAdaptation(f32),

    /// A symbol reachable from the axiom or a rule has no turtle operation.
    #[error("symbol '{symbol}' in {context} has no turtle operation")]
    UnmappedSymbol { symbol: char, context: String },

    /// Expansion would produce more symbols than the configured ceiling.
    #[error("expansion would produce {projected} symbols, limit is {limit}")]
    GrowthLimitExceeded { projected: u128, limit: usize },
}

/// Top-level error for a full grow run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlantError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Interpret(#[from] InterpretError),
}
