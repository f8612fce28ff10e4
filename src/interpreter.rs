//! Interpreter that walks an expanded L-System string with a surface-adaptive turtle.
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`TurtleConfig`],
//! register symbol-to-operation mappings via [`TurtleInterpreter::set_op`] or
//! [`TurtleInterpreter::populate_standard_symbols`], then call
//! [`TurtleInterpreter::interpret`] with an [`ExpandedString`], or
//! [`TurtleInterpreter::interpret_state`] with a [`symbios::SymbiosState`].

use crate::branch::BranchEmitter;
use crate::error::InterpretError;
use crate::grammar::{ExpandedString, Symbol};
use crate::pacing::{NoPacing, Pacer};
use crate::surface::SurfaceOracle;
use crate::turtle::{Pose, TurtleOp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::ControlFlow;
use symbios::{SymbiosState, SymbolTable};
use tracing::{debug, trace, warn};

/// Configuration for turtle interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleConfig {
    /// Distance advanced by each draw step.
    pub step_length: f32,
    /// Rotation applied by `+`/`-`, in degrees.
    pub turn_angle: f32,
    /// How strongly each step bends against the reference surface. `0` disables steering.
    pub adaptation_strength: f32,
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            step_length: 1.0,
            turn_angle: 30.0,
            adaptation_strength: 0.0,
            max_stack_depth: 1024,
        }
    }
}

/// Summary of one walk.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkReport {
    /// Symbols fully processed, including placeholders.
    pub symbols_processed: usize,
    /// Branches handed to the emitter.
    pub branches_emitted: usize,
    /// Deepest the pose stack got.
    pub max_depth: usize,
    /// False when the pacer stopped the walk early.
    pub completed: bool,
    /// Pose after the last processed symbol.
    pub final_pose: Pose,
}

/// Maps symbols to [`TurtleOp`]s and walks strings with them.
#[derive(Clone, Debug)]
pub struct TurtleInterpreter {
    op_map: HashMap<Symbol, TurtleOp>,
    config: TurtleConfig,
}

impl Default for TurtleInterpreter {
    fn default() -> Self {
        Self::standard(TurtleConfig::default())
    }
}

impl TurtleInterpreter {
    /// Creates a new interpreter with the given configuration and an empty symbol map.
    ///
    /// Every symbol is unrecognized until it is registered with
    /// [`set_op`](Self::set_op) or
    /// [`populate_standard_symbols`](Self::populate_standard_symbols).
    pub fn new(config: TurtleConfig) -> Self {
        Self {
            op_map: HashMap::new(),
            config,
        }
    }

    /// An interpreter with the standard alphabet already registered.
    pub fn standard(config: TurtleConfig) -> Self {
        let mut interpreter = Self::new(config);
        interpreter.populate_standard_symbols();
        interpreter
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    pub fn with_map(mut self, map: HashMap<Symbol, TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol, replacing any previous mapping.
    pub fn set_op(&mut self, symbol: Symbol, op: TurtleOp) {
        self.op_map.insert(symbol, op);
    }

    /// Whitelists `symbol` as a placeholder the turtle skips.
    pub fn declare_placeholder(&mut self, symbol: Symbol) {
        self.set_op(symbol, TurtleOp::Ignore);
    }

    /// Registers the standard plant alphabet.
    ///
    /// | Symbol | Operation |
    /// |--------|-----------|
    /// | `F` | [`TurtleOp::Draw`] |
    /// | `+` | [`TurtleOp::Turn`]`(-1.0)` |
    /// | `-` | [`TurtleOp::Turn`]`(1.0)` |
    /// | `[` | [`TurtleOp::Push`] |
    /// | `]` | [`TurtleOp::Pop`] |
    /// | `X`, `Z` | [`TurtleOp::Ignore`] |
    pub fn populate_standard_symbols(&mut self) {
        let mappings = [
            ('F', TurtleOp::Draw),
            ('+', TurtleOp::Turn(-1.0)),
            ('-', TurtleOp::Turn(1.0)),
            ('[', TurtleOp::Push),
            (']', TurtleOp::Pop),
            // Grammar-only placeholders
            ('X', TurtleOp::Ignore),
            ('Z', TurtleOp::Ignore),
        ];

        for (sym, op) in mappings {
            self.set_op(sym, op);
        }
    }

    pub fn op(&self, symbol: Symbol) -> Option<TurtleOp> {
        self.op_map.get(&symbol).copied()
    }

    pub fn is_mapped(&self, symbol: Symbol) -> bool {
        self.op_map.contains_key(&symbol)
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TurtleConfig {
        &mut self.config
    }

    /// Walks `string` from `initial_pose` without pacing.
    ///
    /// See [`interpret_paced`](Self::interpret_paced).
    pub fn interpret<E, S>(
        &self,
        string: &ExpandedString,
        initial_pose: Pose,
        emitter: &mut E,
        oracle: &S,
    ) -> Result<WalkReport, InterpretError>
    where
        E: BranchEmitter + ?Sized,
        S: SurfaceOracle + ?Sized,
    {
        self.interpret_paced(string, initial_pose, emitter, oracle, &mut NoPacing)
    }

    /// Walks `string` left to right, one symbol at a time.
    ///
    /// Each draw symbol advances the turtle by `step_length` along its up
    /// axis, steers it against `oracle`'s nearest surface point and emits the
    /// segment it just covered. `pacer` runs before every draw and may stop
    /// the walk; a stopped walk returns `completed: false` and skips the
    /// bracket-balance check.
    ///
    /// # Errors
    ///
    /// Fails on the first symbol with no mapping, on a `]` with an empty
    /// stack, on a `[` past `max_stack_depth`, and when the string ends with
    /// unclosed `[`. Branches emitted before the failure are not retracted.
    pub fn interpret_paced<E, S, P>(
        &self,
        string: &ExpandedString,
        initial_pose: Pose,
        emitter: &mut E,
        oracle: &S,
        pacer: &mut P,
    ) -> Result<WalkReport, InterpretError>
    where
        E: BranchEmitter + ?Sized,
        S: SurfaceOracle + ?Sized,
        P: Pacer + ?Sized,
    {
        let mut walk = Walk::new(&self.config, initial_pose, emitter, oracle, pacer);

        for (position, symbol) in string.symbols().enumerate() {
            let op = self
                .op(symbol)
                .ok_or(InterpretError::UnrecognizedSymbol { position, symbol });
            if walk.step(position, op)?.is_break() {
                return Ok(walk.cancelled());
            }
        }

        walk.finish()
    }

    /// Walks a symbios state, resolving each symbol ID through `interner`.
    ///
    /// Only symbols present in both this interpreter's map and `interner`
    /// are recognized; any other ID fails with
    /// [`InterpretError::UnmappedSymbolId`]. Module parameters are ignored.
    pub fn interpret_state<E, S, P>(
        &self,
        state: &SymbiosState,
        interner: &SymbolTable,
        initial_pose: Pose,
        emitter: &mut E,
        oracle: &S,
        pacer: &mut P,
    ) -> Result<WalkReport, InterpretError>
    where
        E: BranchEmitter + ?Sized,
        S: SurfaceOracle + ?Sized,
        P: Pacer + ?Sized,
    {
        let mut id_map: Vec<Option<TurtleOp>> = Vec::new();
        for (sym, op) in &self.op_map {
            if let Some(id) = interner.resolve_id(&sym.to_string()) {
                let idx = id as usize;
                if idx >= id_map.len() {
                    id_map.resize(idx + 1, None);
                }
                id_map[idx] = Some(*op);
            }
        }

        let mut walk = Walk::new(&self.config, initial_pose, emitter, oracle, pacer);

        for position in 0..state.len() {
            let view = match state.get_view(position) {
                Some(v) => v,
                None => break,
            };
            let id = view.sym;
            let op = id_map
                .get(id as usize)
                .copied()
                .flatten()
                .ok_or(InterpretError::UnmappedSymbolId { position, id });
            if walk.step(position, op)?.is_break() {
                return Ok(walk.cancelled());
            }
        }

        walk.finish()
    }
}

/// Walks `string` with the standard alphabet.
///
/// Shorthand for a [`TurtleInterpreter::standard`] built from the given
/// parameters, with the default stack depth limit.
pub fn interpret<E, S>(
    string: &ExpandedString,
    initial_pose: Pose,
    step_length: f32,
    turn_angle: f32,
    adaptation_strength: f32,
    emitter: &mut E,
    oracle: &S,
) -> Result<WalkReport, InterpretError>
where
    E: BranchEmitter + ?Sized,
    S: SurfaceOracle + ?Sized,
{
    TurtleInterpreter::standard(TurtleConfig {
        step_length,
        turn_angle,
        adaptation_strength,
        ..Default::default()
    })
    .interpret(string, initial_pose, emitter, oracle)
}

/// The state of one walk: the current pose plus the pose stack.
struct Walk<'a, E: ?Sized, S: ?Sized, P: ?Sized> {
    config: &'a TurtleConfig,
    pose: Pose,
    stack: Vec<Pose>,
    emitter: &'a mut E,
    oracle: &'a S,
    pacer: &'a mut P,
    symbols_processed: usize,
    branches_emitted: usize,
    max_depth: usize,
}

impl<'a, E, S, P> Walk<'a, E, S, P>
where
    E: BranchEmitter + ?Sized,
    S: SurfaceOracle + ?Sized,
    P: Pacer + ?Sized,
{
    fn new(
        config: &'a TurtleConfig,
        initial_pose: Pose,
        emitter: &'a mut E,
        oracle: &'a S,
        pacer: &'a mut P,
    ) -> Self {
        Self {
            config,
            pose: initial_pose,
            stack: Vec::new(),
            emitter,
            oracle,
            pacer,
            symbols_processed: 0,
            branches_emitted: 0,
            max_depth: 0,
        }
    }

    /// Processes one symbol. `Break` means the pacer asked to stop before it.
    fn step(
        &mut self,
        position: usize,
        op: Result<TurtleOp, InterpretError>,
    ) -> Result<ControlFlow<()>, InterpretError> {
        let op = op.inspect_err(|e| warn!(%e, "turtle walk aborted"))?;

        match op {
            TurtleOp::Draw => {
                if self.pacer.before_step(self.branches_emitted).is_break() {
                    return Ok(ControlFlow::Break(()));
                }
                let start = self.pose.position;
                self.pose.advance(self.config.step_length);
                let nearest = self.oracle.nearest_point(self.pose.position);
                self.pose.steer(nearest, self.config.adaptation_strength);
                self.emitter.emit(start, self.pose.position);
                self.branches_emitted += 1;
                trace!(position, ?start, end = ?self.pose.position, "emitted branch");
            }
            TurtleOp::Turn(sign) => self.pose.rotate_local_z(self.config.turn_angle * sign),
            TurtleOp::Push => {
                if self.stack.len() >= self.config.max_stack_depth {
                    let err = InterpretError::StackOverflow {
                        position,
                        limit: self.config.max_stack_depth,
                    };
                    warn!(%err, "turtle walk aborted");
                    return Err(err);
                }
                self.stack.push(self.pose);
                self.max_depth = self.max_depth.max(self.stack.len());
            }
            TurtleOp::Pop => match self.stack.pop() {
                Some(saved) => self.pose = saved,
                None => {
                    let err = InterpretError::UnbalancedPop { position };
                    warn!(%err, "turtle walk aborted");
                    return Err(err);
                }
            },
            TurtleOp::Ignore => {}
        }

        self.symbols_processed += 1;
        Ok(ControlFlow::Continue(()))
    }

    fn report(&self, completed: bool) -> WalkReport {
        WalkReport {
            symbols_processed: self.symbols_processed,
            branches_emitted: self.branches_emitted,
            max_depth: self.max_depth,
            completed,
            final_pose: self.pose,
        }
    }

    fn cancelled(self) -> WalkReport {
        let report = self.report(false);
        warn!(
            symbols = report.symbols_processed,
            branches = report.branches_emitted,
            "turtle walk cancelled by pacer"
        );
        report
    }

    fn finish(self) -> Result<WalkReport, InterpretError> {
        if !self.stack.is_empty() {
            let err = InterpretError::UnclosedBranches {
                open: self.stack.len(),
            };
            warn!(%err, "turtle walk aborted");
            return Err(err);
        }
        let report = self.report(true);
        debug!(
            symbols = report.symbols_processed,
            branches = report.branches_emitted,
            max_depth = report.max_depth,
            "turtle walk complete"
        );
        Ok(report)
    }
}
