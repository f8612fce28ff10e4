// tests/basic_walk.rs
use glam::{Quat, Vec3};
use std::ops::ControlFlow;
use symbios::{SymbiosState, SymbolTable};
use symbios_plant::{
    BranchCollector, ExpandedString, InterpretError, NoPacing, NoSurface, Pose, RuleSet,
    StepLimit, TurtleConfig, TurtleInterpreter, TurtleOp, WalkReport, expand,
};

fn config(turn_angle: f32) -> TurtleConfig {
    TurtleConfig {
        step_length: 1.0,
        turn_angle,
        ..Default::default()
    }
}

fn walk(
    s: &str,
    interpreter: &TurtleInterpreter,
) -> (Result<WalkReport, InterpretError>, BranchCollector) {
    let mut branches = BranchCollector::new();
    let result = interpreter.interpret(
        &ExpandedString::from(s),
        Pose::default(),
        &mut branches,
        &NoSurface,
    );
    (result, branches)
}

#[test]
fn test_binary_tree_walk() {
    let rules = RuleSet::from([('X', "F[+X][-X]"), ('F', "F")]);
    let string = expand('X', &rules, 2);
    assert_eq!(string.as_str(), "F[+F[+X][-X]][-F[+X][-X]]");

    let interpreter = TurtleInterpreter::standard(config(30.0));
    let (result, branches) = walk(string.as_str(), &interpreter);
    let report = result.unwrap();

    assert_eq!(report.branches_emitted, 3, "one branch per F");
    assert_eq!(branches.len(), 3);
    assert!(report.completed);
    assert_eq!(report.max_depth, 2);
    assert_eq!(report.symbols_processed, string.len());

    // Trunk, then two children that both start at its tip.
    let trunk = branches.branches[0];
    assert_eq!(trunk.start, Vec3::ZERO);
    assert!(trunk.end.abs_diff_eq(Vec3::Y, 1e-6));
    assert_eq!(branches.branches[1].start, trunk.end);
    assert_eq!(branches.branches[2].start, trunk.end);

    // `+` and `-` mirror each other across the trunk.
    let left = branches.branches[1].end;
    let right = branches.branches[2].end;
    assert!((left.x + right.x).abs() < 1e-6);
    assert!((left.y - right.y).abs() < 1e-6);
}

#[test]
fn test_turn_geometry() {
    // Growth starts along +Y; `+` turns by -90 degrees around local Z.
    let interpreter = TurtleInterpreter::standard(config(90.0));
    let (result, branches) = walk("F+F", &interpreter);
    result.unwrap();

    let second = branches.branches[1];
    assert!(second.start.abs_diff_eq(Vec3::Y, 1e-6));
    assert!(second.end.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
}

#[test]
fn test_pop_restores_position_and_orientation() {
    let interpreter = TurtleInterpreter::standard(config(45.0));
    let (result, _) = walk("F[+F-F]", &interpreter);
    let report = result.unwrap();

    assert!(report.final_pose.position.abs_diff_eq(Vec3::Y, 1e-6));
    assert!(report.final_pose.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
}

#[test]
fn test_unrecognized_symbol_is_fatal() {
    let interpreter = TurtleInterpreter::standard(config(30.0));
    let (result, branches) = walk("FFQF", &interpreter);

    assert_eq!(
        result.unwrap_err(),
        InterpretError::UnrecognizedSymbol {
            position: 2,
            symbol: 'Q'
        }
    );
    // Branches before the failure stay emitted.
    assert_eq!(branches.len(), 2);
}

#[test]
fn test_placeholders_must_be_declared() {
    let mut interpreter = TurtleInterpreter::new(config(30.0));
    interpreter.set_op('F', TurtleOp::Draw);

    let (result, _) = walk("FZ", &interpreter);
    assert!(matches!(
        result,
        Err(InterpretError::UnrecognizedSymbol { symbol: 'Z', .. })
    ));

    interpreter.declare_placeholder('Z');
    let (result, branches) = walk("FZ", &interpreter);
    assert!(result.is_ok());
    assert_eq!(branches.len(), 1);
}

#[test]
fn test_bracket_errors() {
    let interpreter = TurtleInterpreter::standard(config(30.0));

    let (result, _) = walk("F[F]]F", &interpreter);
    let err = result.unwrap_err();
    assert_eq!(err, InterpretError::UnbalancedPop { position: 4 });
    assert_eq!(err.position(), Some(4));
    assert!(err.is_structural());

    let (result, _) = walk("[[F]", &interpreter);
    assert_eq!(result.unwrap_err(), InterpretError::UnclosedBranches { open: 1 });
}

#[test]
fn test_stack_depth_limit() {
    let interpreter = TurtleInterpreter::standard(TurtleConfig {
        max_stack_depth: 2,
        ..Default::default()
    });
    let (result, _) = walk("[[[F]]]", &interpreter);
    assert_eq!(
        result.unwrap_err(),
        InterpretError::StackOverflow {
            position: 2,
            limit: 2
        }
    );
}

#[test]
fn test_pacer_can_cancel() {
    let interpreter = TurtleInterpreter::standard(config(30.0));
    let mut branches = BranchCollector::new();
    let report = interpreter
        .interpret_paced(
            &ExpandedString::from("F[F[F[F]]]"),
            Pose::default(),
            &mut branches,
            &NoSurface,
            &mut StepLimit { limit: 2 },
        )
        .unwrap();

    // Cancelled mid-walk with brackets still open: not an error.
    assert!(!report.completed);
    assert_eq!(report.branches_emitted, 2);
    assert_eq!(branches.len(), 2);
}

#[test]
fn test_pacer_sees_every_step() {
    let interpreter = TurtleInterpreter::standard(config(30.0));
    let mut seen = Vec::new();
    let mut pacer = |step: usize| {
        seen.push(step);
        ControlFlow::Continue(())
    };
    let mut count = 0;
    let mut emitter = |_: Vec3, _: Vec3| count += 1;

    interpreter
        .interpret_paced(
            &ExpandedString::from("FX[+F]-F"),
            Pose::default(),
            &mut emitter,
            &NoSurface,
            &mut pacer,
        )
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn test_symbios_state_walk() {
    let mut interner = SymbolTable::new();
    interner.intern("F").unwrap();
    interner.intern("+").unwrap();
    interner.intern("[").unwrap();
    interner.intern("]").unwrap();
    interner.intern("Q").unwrap();

    let f_id = interner.resolve_id("F").unwrap();
    let plus_id = interner.resolve_id("+").unwrap();
    let push_id = interner.resolve_id("[").unwrap();
    let pop_id = interner.resolve_id("]").unwrap();
    let q_id = interner.resolve_id("Q").unwrap();

    // F [ + F ] F
    let mut state = SymbiosState::new();
    state.push(f_id, 0.0, &[]).unwrap();
    state.push(push_id, 0.0, &[]).unwrap();
    state.push(plus_id, 0.0, &[]).unwrap();
    state.push(f_id, 0.0, &[]).unwrap();
    state.push(pop_id, 0.0, &[]).unwrap();
    state.push(f_id, 0.0, &[]).unwrap();

    let interpreter = TurtleInterpreter::standard(config(30.0));
    let mut branches = BranchCollector::new();
    let report = interpreter
        .interpret_state(
            &state,
            &interner,
            Pose::default(),
            &mut branches,
            &NoSurface,
            &mut NoPacing,
        )
        .unwrap();

    assert_eq!(report.branches_emitted, 3);
    assert!(branches.branches[2].end.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));

    state.push(q_id, 0.0, &[]).unwrap();
    let err = interpreter
        .interpret_state(
            &state,
            &interner,
            Pose::default(),
            &mut BranchCollector::new(),
            &NoSurface,
            &mut NoPacing,
        )
        .unwrap_err();
    assert_eq!(err, InterpretError::UnmappedSymbolId { position: 6, id: q_id });
}
