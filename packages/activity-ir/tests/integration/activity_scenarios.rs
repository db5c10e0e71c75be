//! End-to-end activity scenarios
//!
//! Test scenarios:
//! - Straight-line assignment `y = x + 1`
//! - By-reference call `P { Q(a) }`, `Q(ref f) { f = ... }`
//! - Two call sites of the same callee

#[path = "../common/mod.rs"]
mod common;

use activity_ir::config::BuilderConfig;
use activity_ir::features::dug::{
    ActivityMarker, CallContextStack, GraphBuilder, TraversalState,
};
use activity_ir::{
    ActiveEntity, ActiveSets, ActivityAnalysis, ActivityQuery, EdgeKind, ProgramModel,
};
use common::{Straightline, TwoCallSites};
use pretty_assertions::assert_eq;

// ========================================
// Scenario 1: intraprocedural
// ========================================

#[test]
fn test_straightline_assignment_is_active() {
    let fx = Straightline::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.x], &[fx.y])
        .unwrap();

    let graph = result.graph();
    assert!(graph.has_edge(fx.x, fx.y, EdgeKind::CFlow));
    assert_eq!(graph.edge_count(), 1);

    for sym in [fx.x, fx.y] {
        let node = graph.node_by_symbol(sym).unwrap();
        assert!(node.varied && node.useful, "{} should be varied and useful", sym);
        assert!(result.is_active(&ActiveEntity::from(sym)));
    }
    assert!(result.is_active(&ActiveEntity::from(fx.stmt)));
    assert_eq!(result.active_stmts().len(), 1);
    assert_eq!(result.active_mem_refs().len(), 2);
    assert_eq!(
        result.independent_symbols().iter().copied().collect::<Vec<_>>(),
        vec![fx.x]
    );
    assert_eq!(
        result.dependent_symbols().iter().copied().collect::<Vec<_>>(),
        vec![fx.y]
    );
}

#[test]
fn test_reverse_direction_is_not_active() {
    let fx = Straightline::new();
    // y does not flow into x
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.y], &[fx.x])
        .unwrap();
    assert!(result.is_varied(fx.y));
    assert!(!result.is_varied(fx.x));
    assert!(result.active_symbols().is_empty());
    assert!(!result.is_active(&ActiveEntity::from(fx.stmt)));
}

// ========================================
// Scenario 2: by-reference call
// ========================================

#[test]
fn test_by_reference_call_returns_to_actual() {
    let mut program = ProgramModel::new();
    let p = program.add_procedure("P");
    let q = program.add_procedure("Q");
    let f = program.add_formal(q, "f", true);
    let t = program.add_local(q, "t");
    let a = program.add_local(p, "a");
    let actual = program.ref_expr(a);
    let call = program.add_call(p, q, vec![actual]);
    program.assign(q, t, &[f]);
    program.assign(q, f, &[t]);

    let result = ActivityAnalysis::default()
        .run(&program, &[a], &[a])
        .unwrap();
    let graph = result.graph();

    let calls = graph.edges_between(a, f, EdgeKind::Call);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].edge.call_site, Some(call));
    let returns = graph.edges_between(f, a, EdgeKind::Return);
    assert_eq!(returns.len(), 1);
    assert_eq!(returns[0].edge.call_site, Some(call));

    for sym in [a, f, t] {
        assert!(result.is_varied(sym));
        assert!(result.is_active(&ActiveEntity::from(sym)));
    }
    // once forward (f -> a), once backward (a <- f)
    assert_eq!(result.stats().mark.return_followed, 2);
    assert_eq!(result.stats().mark.context_rejected, 0);
}

// ========================================
// Scenario 3: two call sites
// ========================================

#[test]
fn test_two_call_sites_share_formal_node() {
    let fx = TwoCallSites::new();
    let artifacts = GraphBuilder::new(&fx.program, BuilderConfig::default())
        .build()
        .unwrap();
    let graph = &artifacts.graph;

    assert_eq!(graph.edges_between(fx.a1, fx.f, EdgeKind::Call)[0].edge.call_site, Some(fx.c1));
    assert_eq!(graph.edges_between(fx.a2, fx.f, EdgeKind::Call)[0].edge.call_site, Some(fx.c2));
    assert_eq!(graph.edges_between(fx.f, fx.a1, EdgeKind::Return)[0].edge.call_site, Some(fx.c1));
    assert_eq!(graph.edges_between(fx.f, fx.a2, EdgeKind::Return)[0].edge.call_site, Some(fx.c2));

    let f_nodes = graph.nodes().filter(|(_, n)| n.symbol == fx.f).count();
    assert_eq!(f_nodes, 1);
    assert_eq!(graph.node_by_symbol(fx.f).unwrap().proc, fx.q);
}

#[test]
fn test_mark_varied_from_first_site_leaves_second_actual() {
    let fx = TwoCallSites::new();
    let mut artifacts = GraphBuilder::new(&fx.program, BuilderConfig::default())
        .build()
        .unwrap();
    let seed = artifacts.graph.node_for(fx.a1).unwrap();

    let mut active = ActiveSets::new();
    ActivityMarker::new(&mut artifacts.graph, &mut active)
        .mark_varied(seed, &mut CallContextStack::new(), &mut TraversalState::new(), fx.p)
        .unwrap();

    let graph = &artifacts.graph;
    assert!(graph.node_by_symbol(fx.a1).unwrap().varied);
    assert!(graph.node_by_symbol(fx.f).unwrap().varied);
    assert!(graph.node_by_symbol(fx.t).unwrap().varied);
    assert!(!graph.node_by_symbol(fx.a2).unwrap().varied);
}

#[test]
fn test_report_json_lists_active_symbols() {
    let fx = TwoCallSites::new();
    let result = ActivityAnalysis::default()
        .run(&fx.program, &[fx.a1], &[fx.a1])
        .unwrap();

    let report: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    let mut expected = vec![fx.a1.0, fx.f.0, fx.t.0];
    expected.sort();
    assert_eq!(report["active"]["symbols"], serde_json::json!(expected));
    assert_eq!(report["active"]["independent"], serde_json::json!([fx.a1.0]));
}
