//! The whole configuration surface, and a one-call grow run on top of it.

use crate::branch::BranchEmitter;
use crate::error::{ConfigError, PlantError};
use crate::grammar::{ExpandedString, Preset, RuleSet, Symbol, expand};
use crate::interpreter::{TurtleConfig, TurtleInterpreter, WalkReport};
use crate::pacing::SleepPacer;
use crate::surface::SurfaceOracle;
use crate::turtle::Pose;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Everything a grow run needs, fixed before expansion starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Starting symbol.
    pub axiom: Symbol,
    /// Production rules.
    pub rules: RuleSet,
    /// Rewriting rounds. Growth is exponential in this.
    pub iterations: usize,
    /// Step, turn and steering parameters.
    pub turtle: TurtleConfig,
    /// Where the turtle starts and which way it faces.
    pub initial_pose: Pose,
    /// Delay before each draw step. Zero means no pacing.
    pub step_delay: Duration,
    /// Ceiling on the expanded string length, checked before expanding.
    pub max_symbols: usize,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl PlantConfig {
    /// Default parameters with one of the built-in rule sets.
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            axiom: Preset::AXIOM,
            rules: preset.rules(),
            iterations: 4,
            turtle: TurtleConfig::default(),
            initial_pose: Pose::default(),
            step_delay: Duration::ZERO,
            max_symbols: 4_000_000,
        }
    }

    /// Checks parameters and grammar against the symbols `interpreter` knows.
    ///
    /// # Errors
    ///
    /// - step length or turn angle not positive and finite
    /// - adaptation strength not finite
    /// - a symbol in the axiom or in any rule with no turtle operation
    /// - projected expansion longer than `max_symbols`
    pub fn validate(&self, interpreter: &TurtleInterpreter) -> Result<(), ConfigError> {
        let t = &self.turtle;
        if !(t.step_length.is_finite() && t.step_length > 0.0) {
            return Err(ConfigError::InvalidStepLength(t.step_length));
        }
        if !(t.turn_angle.is_finite() && t.turn_angle > 0.0) {
            return Err(ConfigError::InvalidTurnAngle(t.turn_angle));
        }
        if !t.adaptation_strength.is_finite() {
            return Err(ConfigError::NonFiniteAdaptation(t.adaptation_strength));
        }

        if !interpreter.is_mapped(self.axiom) {
            return Err(ConfigError::UnmappedSymbol {
                symbol: self.axiom,
                context: "axiom".to_owned(),
            });
        }
        for (key, replacement) in self.rules.iter() {
            if let Some(symbol) = std::iter::once(key)
                .chain(replacement.chars())
                .find(|&c| !interpreter.is_mapped(c))
            {
                return Err(ConfigError::UnmappedSymbol {
                    symbol,
                    context: format!("rule '{key}'"),
                });
            }
        }

        let projected = self.rules.projected_len(self.axiom, self.iterations);
        if projected > self.max_symbols as u128 {
            return Err(ConfigError::GrowthLimitExceeded {
                projected,
                limit: self.max_symbols,
            });
        }
        Ok(())
    }

    /// Expands the grammar without validating it.
    pub fn expand(&self) -> ExpandedString {
        expand(self.axiom, &self.rules, self.iterations)
    }

    /// An interpreter with the standard alphabet and this config's turtle parameters.
    pub fn interpreter(&self) -> TurtleInterpreter {
        TurtleInterpreter::standard(self.turtle.clone())
    }
}

/// Validates `config`, expands its grammar and walks the result with the
/// standard alphabet, sleeping `step_delay` before each draw.
pub fn grow<E, S>(config: &PlantConfig, emitter: &mut E, oracle: &S) -> Result<WalkReport, PlantError>
where
    E: BranchEmitter + ?Sized,
    S: SurfaceOracle + ?Sized,
{
    grow_with(&config.interpreter(), config, emitter, oracle)
}

/// Like [`grow`], with a caller-supplied alphabet.
///
/// Only `interpreter`'s symbol map is used; turtle parameters come from `config.turtle`.
pub fn grow_with<E, S>(
    interpreter: &TurtleInterpreter,
    config: &PlantConfig,
    emitter: &mut E,
    oracle: &S,
) -> Result<WalkReport, PlantError>
where
    E: BranchEmitter + ?Sized,
    S: SurfaceOracle + ?Sized,
{
    let mut interpreter = interpreter.clone();
    *interpreter.config_mut() = config.turtle.clone();

    config.validate(&interpreter)?;
    let string = config.expand();
    debug!(
        iterations = config.iterations,
        symbols = string.len(),
        "grammar expanded"
    );

    let mut pacer = SleepPacer::new(config.step_delay);
    let report =
        interpreter.interpret_paced(&string, config.initial_pose, emitter, oracle, &mut pacer)?;
    Ok(report)
}
