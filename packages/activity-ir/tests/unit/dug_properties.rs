//! Property-based tests for the DUG and the activity marker
//!
//! Invariants that should hold for ALL generated programs:
//! - One node per symbol
//! - No self loops
//! - At most one CFLOW edge per (source, sink)
//! - CALL/RETURN edges always carry a call site
//! - Closed matrices are transitive
//! - Useful implies varied; active symbols are exactly the useful nodes

use std::collections::BTreeSet;

use activity_ir::{
    ActivityAnalysis, ActivityQuery, EdgeKind, ProcId, ProgramModel, SymbolId,
};
use proptest::prelude::*;

const MAIN_LOCALS: usize = 6;

/// `def = uses...` over main's locals
type Assign = (usize, Vec<usize>);

#[derive(Debug, Clone)]
struct ProgramShape {
    main_body: Vec<Assign>,
    /// Calls `helper(ref p, q)` with two actual locals
    calls: Vec<(usize, usize)>,
    /// Body of the helper over its two formals and one local
    helper_body: Vec<Assign>,
    independents: Vec<usize>,
    dependents: Vec<usize>,
}

fn assign_strategy(width: usize) -> impl Strategy<Value = Assign> {
    (0..width, prop::collection::vec(0..width, 0..3))
}

fn shape_strategy() -> impl Strategy<Value = ProgramShape> {
    (
        prop::collection::vec(assign_strategy(MAIN_LOCALS), 0..12),
        prop::collection::vec((0..MAIN_LOCALS, 0..MAIN_LOCALS), 0..4),
        prop::collection::vec(assign_strategy(3), 0..4),
        prop::collection::vec(0..MAIN_LOCALS, 0..3),
        prop::collection::vec(0..MAIN_LOCALS, 0..3),
    )
        .prop_map(
            |(main_body, calls, helper_body, independents, dependents)| ProgramShape {
                main_body,
                calls,
                helper_body,
                independents,
                dependents,
            },
        )
}

struct Built {
    program: ProgramModel,
    main: ProcId,
    helper: ProcId,
    locals: Vec<SymbolId>,
}

fn build(shape: &ProgramShape) -> Built {
    let mut program = ProgramModel::new();
    let main = program.add_procedure("main");
    let helper = program.add_procedure("helper");
    let p = program.add_formal(helper, "p", true);
    let q = program.add_formal(helper, "q", false);
    let h = program.add_local(helper, "h");
    let helper_syms = [p, q, h];
    let locals: Vec<SymbolId> = (0..MAIN_LOCALS)
        .map(|i| program.add_local(main, format!("v{}", i)))
        .collect();

    for (def, uses) in &shape.main_body {
        let uses: Vec<SymbolId> = uses.iter().map(|&u| locals[u]).collect();
        program.assign(main, locals[*def], &uses);
    }
    for &(first, second) in &shape.calls {
        let a1 = program.ref_expr(locals[first]);
        let a2 = program.ref_expr(locals[second]);
        program.add_call(main, helper, vec![a1, a2]);
    }
    for (def, uses) in &shape.helper_body {
        let uses: Vec<SymbolId> = uses.iter().map(|&u| helper_syms[u]).collect();
        program.assign(helper, helper_syms[*def], &uses);
    }

    Built {
        program,
        main,
        helper,
        locals,
    }
}

proptest! {
    #[test]
    fn prop_graph_structure(shape in shape_strategy()) {
        let built = build(&shape);
        let independents: Vec<SymbolId> = shape.independents.iter().map(|&i| built.locals[i]).collect();
        let dependents: Vec<SymbolId> = shape.dependents.iter().map(|&i| built.locals[i]).collect();
        let result = ActivityAnalysis::default()
            .run(&built.program, &independents, &dependents)
            .unwrap();
        let graph = result.graph();

        // one node per symbol
        let symbols: Vec<SymbolId> = graph.nodes().map(|(_, n)| n.symbol).collect();
        let distinct: BTreeSet<SymbolId> = symbols.iter().copied().collect();
        prop_assert_eq!(symbols.len(), distinct.len());

        let mut cflow = BTreeSet::new();
        for view in graph.edges() {
            prop_assert_ne!(view.source, view.sink);
            if view.edge.kind == EdgeKind::CFlow {
                prop_assert!(cflow.insert((view.source, view.sink)));
            }
            prop_assert_eq!(view.edge.kind.needs_call_site(), view.edge.call_site.is_some());
        }
    }

    #[test]
    fn prop_closed_matrices_are_transitive(shape in shape_strategy()) {
        let built = build(&shape);
        let result = ActivityAnalysis::default().run(&built.program, &[], &[]).unwrap();

        // helper is closed before main, so main sees its summary
        for proc in [built.helper, built.main] {
            let matrix = result.matrix(proc).unwrap();
            let syms = matrix.symbols().to_vec();
            for &a in &syms {
                for &b in &syms {
                    for &c in &syms {
                        if matrix.depends(a, b) && matrix.depends(b, c) {
                            prop_assert!(matrix.depends(a, c));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn prop_useful_implies_varied(shape in shape_strategy()) {
        let built = build(&shape);
        let independents: Vec<SymbolId> = shape.independents.iter().map(|&i| built.locals[i]).collect();
        let dependents: Vec<SymbolId> = shape.dependents.iter().map(|&i| built.locals[i]).collect();
        let result = ActivityAnalysis::default()
            .run(&built.program, &independents, &dependents)
            .unwrap();

        let mut useful = BTreeSet::new();
        for (_, node) in result.graph().nodes() {
            if node.useful {
                prop_assert!(node.varied);
                useful.insert(node.symbol);
            }
        }
        prop_assert_eq!(&useful, result.active_symbols());

        if independents.is_empty() || dependents.is_empty() {
            prop_assert!(result.active_symbols().is_empty());
        }
    }

    #[test]
    fn prop_analysis_is_deterministic(shape in shape_strategy()) {
        let built = build(&shape);
        let independents: Vec<SymbolId> = shape.independents.iter().map(|&i| built.locals[i]).collect();
        let dependents: Vec<SymbolId> = shape.dependents.iter().map(|&i| built.locals[i]).collect();
        let analysis = ActivityAnalysis::default();
        let first = analysis.run(&built.program, &independents, &dependents).unwrap();
        let second = analysis.run(&built.program, &independents, &dependents).unwrap();
        prop_assert_eq!(first.active(), second.active());
        prop_assert_eq!(first.graph().to_dto(), second.graph().to_dto());
    }
}
