use tokenpass::{DecodingGraph, GraphArc, GraphError, StateId, EPSILON};

fn arc(unit: u32, label: u32, weight: f32, next: StateId) -> GraphArc {
    GraphArc {
        unit,
        label,
        weight,
        next,
    }
}

#[test]
fn add_arc_rejects_unknown_states() {
    let mut g = DecodingGraph::new();
    let s = g.add_state();

    let err = g.add_arc(5, arc(1, 1, 0.0, s)).unwrap_err();
    assert_eq!(err, GraphError::UnknownState(5));

    let err = g.add_arc(s, arc(1, 1, 0.0, 9)).unwrap_err();
    assert_eq!(err, GraphError::UnknownState(9));
}

#[test]
fn set_start_rejects_unknown_state() {
    let mut g = DecodingGraph::new();
    assert_eq!(g.set_start(0).unwrap_err(), GraphError::UnknownState(0));

    let s = g.add_state();
    g.set_start(s).unwrap();
    assert_eq!(g.start(), s);
}

#[test]
fn final_weight_roundtrip() {
    let mut g = DecodingGraph::new();
    let s = g.add_state();
    let t = g.add_state();

    assert_eq!(g.final_weight(s).unwrap(), None);
    g.set_final(t, 1.5).unwrap();
    assert_eq!(g.final_weight(t).unwrap(), Some(1.5));
    assert_eq!(
        g.final_weight(7).unwrap_err(),
        GraphError::UnknownState(7)
    );
}

#[test]
fn arcs_are_enumerable_in_insertion_order() {
    let mut g = DecodingGraph::new();
    let s = g.add_state();
    let t = g.add_state();
    g.add_arc(s, arc(1, 10, 0.5, t)).unwrap();
    g.add_arc(s, arc(2, 11, 0.25, t)).unwrap();

    let arcs = g.arcs(s).unwrap();
    assert_eq!(arcs.len(), 2);
    assert_eq!(arcs[0].label, 10);
    assert_eq!(arcs[1].label, 11);
    assert!(g.arcs(t).unwrap().is_empty());
}

#[test]
fn epsilon_arcs_are_counted() {
    let mut g = DecodingGraph::new();
    let s = g.add_state();
    let t = g.add_state();
    g.add_arc(s, arc(EPSILON, 1, 0.0, t)).unwrap();
    g.add_arc(s, arc(3, 1, 0.0, t)).unwrap();
    assert_eq!(g.num_epsilon_arcs(), 1);
}

#[test]
fn epsilon_cycle_detected() {
    let mut g = DecodingGraph::new();
    let s = g.add_state();
    let t = g.add_state();
    g.add_arc(s, arc(EPSILON, 0, 0.0, t)).unwrap();
    g.add_arc(t, arc(EPSILON, 0, 0.0, s)).unwrap();
    assert_eq!(g.check_epsilon_cycles().unwrap_err(), GraphError::EpsilonCycle);
}

#[test]
fn epsilon_self_loop_detected() {
    let mut g = DecodingGraph::new();
    let s = g.add_state();
    g.add_arc(s, arc(EPSILON, 0, 0.0, s)).unwrap();
    assert_eq!(g.check_epsilon_cycles().unwrap_err(), GraphError::EpsilonCycle);
}

#[test]
fn acyclic_epsilon_structure_passes() {
    let mut g = DecodingGraph::new();
    let s = g.add_state();
    let t = g.add_state();
    let u = g.add_state();
    g.add_arc(s, arc(EPSILON, 0, 0.0, t)).unwrap();
    g.add_arc(s, arc(EPSILON, 0, 0.0, u)).unwrap();
    g.add_arc(t, arc(EPSILON, 0, 0.0, u)).unwrap();
    // non-epsilon cycles are fine
    g.add_arc(u, arc(4, 0, 0.0, s)).unwrap();
    assert!(g.check_epsilon_cycles().is_ok());
}
