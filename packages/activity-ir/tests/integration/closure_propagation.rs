//! Dependence-matrix closure across call sites
//!
//! Test scenarios:
//! - Formal-to-formal dependence becomes a PARAM edge and a caller pair
//! - Chains through several call levels are summarized bottom-up
//! - Mutual recursion: single sweep vs fixpoint

use activity_ir::config::{ActivityConfig, ClosureStrategy};
use activity_ir::{ActivityAnalysis, EdgeKind, ProcId, ProgramModel, SymbolId};
use pretty_assertions::assert_eq;

#[test]
fn test_param_edge_summarizes_callee() {
    // f(a, ref b) { t = a; b = t }   main { f(x, y); z = y }
    let mut program = ProgramModel::new();
    let main = program.add_procedure("main");
    let f = program.add_procedure("f");
    let a = program.add_formal(f, "a", false);
    let b = program.add_formal(f, "b", true);
    let t = program.add_local(f, "t");
    program.assign(f, t, &[a]);
    program.assign(f, b, &[t]);
    let x = program.add_local(main, "x");
    let y = program.add_local(main, "y");
    let z = program.add_local(main, "z");
    let ax = program.ref_expr(x);
    let ay = program.ref_expr(y);
    program.add_call(main, f, vec![ax, ay]);
    program.assign(main, z, &[y]);

    let result = ActivityAnalysis::default()
        .run(&program, &[x], &[z])
        .unwrap();
    let graph = result.graph();

    let params = graph.edges_between(a, b, EdgeKind::Param);
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].edge.source_proc, f);
    assert_eq!(params[0].edge.call_site, None);
    assert_eq!(graph.edge_count_by_kind(EdgeKind::Param), 1);

    let caller = result.matrix(main).unwrap();
    assert!(caller.depends(x, y));
    assert!(caller.depends(y, z));
    assert!(caller.depends(x, z));

    for sym in [x, a, t, b, y, z] {
        assert!(result.is_useful(sym), "{} should be active", sym);
    }
}

#[test]
fn test_summary_propagates_through_two_levels() {
    // leaf(ref p, q) { p = q }   mid(ref m, n) { leaf(m, n) }   main { mid(u, v) }
    let mut program = ProgramModel::new();
    let main = program.add_procedure("main");
    let mid = program.add_procedure("mid");
    let leaf = program.add_procedure("leaf");
    let p = program.add_formal(leaf, "p", true);
    let q = program.add_formal(leaf, "q", false);
    program.assign(leaf, p, &[q]);
    let m = program.add_formal(mid, "m", true);
    let n = program.add_formal(mid, "n", false);
    let rm = program.ref_expr(m);
    let rn = program.ref_expr(n);
    program.add_call(mid, leaf, vec![rm, rn]);
    let u = program.add_local(main, "u");
    let v = program.add_local(main, "v");
    let ru = program.ref_expr(u);
    let rv = program.ref_expr(v);
    program.add_call(main, mid, vec![ru, rv]);

    let result = ActivityAnalysis::default().run(&program, &[], &[]).unwrap();
    let graph = result.graph();

    assert!(graph.has_edge(q, p, EdgeKind::Param));
    assert!(graph.has_edge(n, m, EdgeKind::Param));
    assert!(result.matrix(mid).unwrap().depends(n, m));
    assert!(result.matrix(main).unwrap().depends(v, u));
    assert!(!result.matrix(main).unwrap().depends(u, v));
    assert_eq!(result.stats().closure.rounds, 1);
}

/// `main { P(a, b) }`, `P(x, ref y) { Q(x, y) }`, `Q(u, ref v) { v = u; P(u, v) }`
struct MutualRecursion {
    program: ProgramModel,
    main: ProcId,
    a: SymbolId,
    b: SymbolId,
    x: SymbolId,
    y: SymbolId,
    u: SymbolId,
    v: SymbolId,
}

impl MutualRecursion {
    fn new() -> Self {
        let mut program = ProgramModel::new();
        let main = program.add_procedure("main");
        let p = program.add_procedure("P");
        let q = program.add_procedure("Q");
        let x = program.add_formal(p, "x", false);
        let y = program.add_formal(p, "y", true);
        let u = program.add_formal(q, "u", false);
        let v = program.add_formal(q, "v", true);
        let a = program.add_local(main, "a");
        let b = program.add_local(main, "b");

        let ra = program.ref_expr(a);
        let rb = program.ref_expr(b);
        program.add_call(main, p, vec![ra, rb]);

        let rx = program.ref_expr(x);
        let ry = program.ref_expr(y);
        program.add_call(p, q, vec![rx, ry]);

        program.assign(q, v, &[u]);
        let ru = program.ref_expr(u);
        let rv = program.ref_expr(v);
        program.add_call(q, p, vec![ru, rv]);

        Self {
            program,
            main,
            a,
            b,
            x,
            y,
            u,
            v,
        }
    }
}

#[test]
fn test_single_sweep_under_approximates_recursion() {
    let fx = MutualRecursion::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[], &[])
        .unwrap();
    let graph = result.graph();

    // Q is summarized, but P was closed before Q's summary reached it
    assert!(graph.has_edge(fx.u, fx.v, EdgeKind::Param));
    assert!(!graph.has_edge(fx.x, fx.y, EdgeKind::Param));
    assert!(!result.matrix(fx.main).unwrap().depends(fx.a, fx.b));
    assert_eq!(result.stats().closure.rounds, 1);
    assert!(result.stats().closure.unconverged >= 1);
}

#[test]
fn test_fixpoint_closes_recursion() {
    let fx = MutualRecursion::new();
    let config = ActivityConfig::default().closure(|c| c.strategy(ClosureStrategy::Fixpoint));
    let result = ActivityAnalysis::new(config)
        .unwrap()
        .run(&fx.program, &[], &[])
        .unwrap();
    let graph = result.graph();

    assert!(graph.has_edge(fx.u, fx.v, EdgeKind::Param));
    assert!(graph.has_edge(fx.x, fx.y, EdgeKind::Param));
    assert_eq!(graph.edges_between(fx.x, fx.y, EdgeKind::Param).len(), 1);
    assert!(result.matrix(fx.main).unwrap().depends(fx.a, fx.b));
    assert_eq!(result.stats().closure.unconverged, 0);
    assert!(result.stats().closure.rounds > 1);
}

#[test]
fn test_fixpoint_respects_round_budget() {
    let fx = MutualRecursion::new();
    let config = ActivityConfig::default().closure(|c| {
        c.strategy(ClosureStrategy::Fixpoint)
            .max_fixpoint_rounds(1)
    });
    let result = ActivityAnalysis::new(config)
        .unwrap()
        .run(&fx.program, &[], &[])
        .unwrap();

    assert_eq!(result.stats().closure.rounds, 1);
    assert!(!result.graph().has_edge(fx.x, fx.y, EdgeKind::Param));
}
