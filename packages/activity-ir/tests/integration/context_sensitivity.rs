//! Call/return context sensitivity of the activity marker
//!
//! Test scenarios:
//! - A RETURN edge is only taken for the call site on top of the stack
//! - The useful pass applies the same rule to CALL edges
//! - A dependence entering a callee through a global loses context (GLOBAL)
//! - PARAM edges stay re-traversable for every seed of a pass
//! - A matched RETURN restores the caller's context through nested calls

#[path = "../common/mod.rs"]
mod common;

use activity_ir::{ActiveEntity, ActivityAnalysis, ActivityQuery, EdgeKind, ProgramModel};
use common::TwoCallSites;
use pretty_assertions::assert_eq;

#[test]
fn test_return_to_other_call_site_is_not_taken() {
    let fx = TwoCallSites::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.a1], &[fx.a2])
        .unwrap();

    assert!(result.is_varied(fx.a1));
    assert!(result.is_varied(fx.f));
    assert!(!result.is_varied(fx.a2));
    assert!(result.active_symbols().is_empty());
    assert!(result.stats().mark.context_rejected >= 1);
}

#[test]
fn test_useful_pass_does_not_leak_into_other_call_site() {
    let fx = TwoCallSites::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.a1, fx.a2], &[fx.a1])
        .unwrap();

    assert!(result.is_varied(fx.a2));
    assert!(result.is_useful(fx.f));
    assert!(!result.is_useful(fx.a2));

    let active: Vec<_> = result.active_symbols().iter().copied().collect();
    let mut expected = vec![fx.a1, fx.f, fx.t];
    expected.sort();
    assert_eq!(active, expected);
    assert!(!result.is_active(&ActiveEntity::from(fx.a2)));
}

/// `P { g = a1; Q(a1); Q(a2) }`, `Q(ref f) { f = g }`, `g` global
struct GlobalPath {
    program: ProgramModel,
    a1: activity_ir::SymbolId,
    a2: activity_ir::SymbolId,
    f: activity_ir::SymbolId,
    g: activity_ir::SymbolId,
}

impl GlobalPath {
    fn new() -> Self {
        let mut program = ProgramModel::new();
        let p = program.add_procedure("P");
        let q = program.add_procedure("Q");
        let g = program.add_global("g");
        let f = program.add_formal(q, "f", true);
        let a1 = program.add_local(p, "a1");
        let a2 = program.add_local(p, "a2");

        program.assign(p, g, &[a1]);
        let actual1 = program.ref_expr(a1);
        program.add_call(p, q, vec![actual1]);
        let actual2 = program.ref_expr(a2);
        program.add_call(p, q, vec![actual2]);
        program.assign(q, f, &[g]);

        Self {
            program,
            a1,
            a2,
            f,
            g,
        }
    }
}

#[test]
fn test_global_crossing_lets_any_return_through() {
    let fx = GlobalPath::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.a1], &[fx.a2])
        .unwrap();

    let graph = result.graph();
    let cross = graph.edges_between(fx.g, fx.f, EdgeKind::CFlow);
    assert_eq!(cross.len(), 1);
    // g was first seen in P, the assignment into f lives in Q
    assert_ne!(graph.node_by_symbol(fx.g).unwrap().proc, cross[0].edge.sink_proc);

    assert!(result.is_varied(fx.a2));
    for sym in [fx.a1, fx.a2, fx.f, fx.g] {
        assert!(result.is_active(&ActiveEntity::from(sym)), "{} should be active", sym);
    }
}

#[test]
fn test_global_location_is_published() {
    let fx = GlobalPath::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.a1], &[fx.a2])
        .unwrap();
    assert!(result.is_active(&ActiveEntity::from(activity_ir::Location::global(fx.g))));
    assert!(!result.is_active(&ActiveEntity::from(activity_ir::Location::named(fx.g))));
}

/// `P { Q(a1, b1); Q(a2, b2) }`, `Q(f1, ref f2) { t = f1; f2 = t }`
struct SummarizedCallee {
    program: ProgramModel,
    a1: activity_ir::SymbolId,
    a2: activity_ir::SymbolId,
    b1: activity_ir::SymbolId,
    f1: activity_ir::SymbolId,
    f2: activity_ir::SymbolId,
}

impl SummarizedCallee {
    fn new() -> Self {
        let mut program = ProgramModel::new();
        let p = program.add_procedure("P");
        let q = program.add_procedure("Q");
        let f1 = program.add_formal(q, "f1", false);
        let f2 = program.add_formal(q, "f2", true);
        let t = program.add_local(q, "t");
        let a1 = program.add_local(p, "a1");
        let b1 = program.add_local(p, "b1");
        let a2 = program.add_local(p, "a2");
        let b2 = program.add_local(p, "b2");

        let actuals1 = vec![program.ref_expr(a1), program.ref_expr(b1)];
        program.add_call(p, q, actuals1);
        let actuals2 = vec![program.ref_expr(a2), program.ref_expr(b2)];
        program.add_call(p, q, actuals2);
        program.assign(q, t, &[f1]);
        program.assign(q, f2, &[t]);

        Self {
            program,
            a1,
            a2,
            b1,
            f1,
            f2,
        }
    }
}

#[test]
fn test_param_edge_is_followed_again_by_later_seeds() {
    let fx = SummarizedCallee::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.a1, fx.a2], &[fx.b1])
        .unwrap();

    assert_eq!(
        result.graph().edges_between(fx.f1, fx.f2, EdgeKind::Param).len(),
        1
    );
    // varied: once from a1 and once more from a2; useful: once from b1
    assert_eq!(result.stats().mark.param_followed, 3);
    assert!(result.is_useful(fx.a1));
    assert!(!result.is_useful(fx.a2));
}

/// `main { mid(a, b) }`, `mid(x, ref y) { leaf(x, y) }`, `leaf(p, ref q) { q = p }`
struct NestedCalls {
    program: ProgramModel,
    a: activity_ir::SymbolId,
    b: activity_ir::SymbolId,
    x: activity_ir::SymbolId,
    y: activity_ir::SymbolId,
    p: activity_ir::SymbolId,
    q: activity_ir::SymbolId,
}

impl NestedCalls {
    fn new() -> Self {
        let mut program = ProgramModel::new();
        let main = program.add_procedure("main");
        let mid = program.add_procedure("mid");
        let leaf = program.add_procedure("leaf");
        let x = program.add_formal(mid, "x", false);
        let y = program.add_formal(mid, "y", true);
        let p = program.add_formal(leaf, "p", false);
        let q = program.add_formal(leaf, "q", true);
        let a = program.add_local(main, "a");
        let b = program.add_local(main, "b");

        let outer = vec![program.ref_expr(a), program.ref_expr(b)];
        program.add_call(main, mid, outer);
        let inner = vec![program.ref_expr(x), program.ref_expr(y)];
        program.add_call(mid, leaf, inner);
        program.assign(leaf, q, &[p]);

        Self {
            program,
            a,
            b,
            x,
            y,
            p,
            q,
        }
    }
}

#[test]
fn test_return_chain_unwinds_two_call_levels() {
    let fx = NestedCalls::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.a], &[fx.b])
        .unwrap();

    assert!(result.is_varied(fx.b));
    assert_eq!(result.stats().mark.context_rejected, 0);

    let active: Vec<_> = result.active_symbols().iter().copied().collect();
    let mut expected = vec![fx.a, fx.b, fx.x, fx.y, fx.p, fx.q];
    expected.sort();
    assert_eq!(active, expected);
}
