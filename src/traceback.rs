use crate::decoder::BeamSearch;
use crate::decoder::state::TokenRef;
use crate::graph::{LabelId, UnitId, EPSILON};

/// Linear best path recovered from the final frontier. `units` is the
/// state-level alignment (non-epsilon input labels), `labels` the emitted
/// symbol sequence. `reached_final` distinguishes a path ending in an
/// accepting state from a partial traceback.
#[derive(Debug, Clone, PartialEq)]
pub struct BestPath {
    pub units: Vec<UnitId>,
    pub labels: Vec<LabelId>,
    pub weight: f32,
    pub reached_final: bool,
}

/// Picks the cheapest token in an accepting state (cost + final weight),
/// falling back to the globally cheapest live token when none reached an
/// accepting state, then walks predecessors back to the start token.
pub(crate) fn extract(search: &BeamSearch<'_>) -> Option<BestPath> {
    let mut best: Option<(f32, TokenRef)> = None;
    let mut reached_final = false;

    for (&state, &tok_ref) in &search.frontier {
        let final_weight = match search.graph.final_weight(state) {
            Ok(weight) => weight,
            Err(_) => continue,
        };
        if let Some(weight) = final_weight {
            let total = search.arena.get(tok_ref).cost + weight;
            if better(best, total, tok_ref) {
                best = Some((total, tok_ref));
            }
        }
    }

    if best.is_some() {
        reached_final = true;
    } else {
        for &tok_ref in search.frontier.values() {
            let total = search.arena.get(tok_ref).cost;
            if better(best, total, tok_ref) {
                best = Some((total, tok_ref));
            }
        }
    }

    let (weight, selected) = best?;
    let mut units = Vec::new();
    let mut labels = Vec::new();
    let mut cursor = selected;
    loop {
        let token = search.arena.get(cursor);
        if let Some(arc) = token.arc {
            if arc.unit != EPSILON {
                units.push(arc.unit);
            }
            if arc.label != EPSILON {
                labels.push(arc.label);
            }
        }
        match token.prev {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    units.reverse();
    labels.reverse();

    Some(BestPath {
        units,
        labels,
        weight,
        reached_final,
    })
}

// Frontier iteration order is arbitrary; ties break on creation order so
// the selected token does not depend on hashing.
fn better(best: Option<(f32, TokenRef)>, total: f32, tok_ref: TokenRef) -> bool {
    match best {
        None => true,
        Some((best_total, best_ref)) => {
            total < best_total || (total == best_total && tok_ref.slot < best_ref.slot)
        }
    }
}
