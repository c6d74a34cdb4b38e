use crate::error::DecodeError;
use crate::graph::{GraphError, EPSILON};
use crate::score::{ScoreError, ScoreProvider};

use super::session::BeamSearch;
use super::state::{Token, TokenRef};

/// Relaxes epsilon-input arcs until no token improves. Graph weight only,
/// no acoustic cost; new tokens land in the current arena frame. The pop
/// budget catches epsilon structure that keeps improving forever.
pub(crate) fn expand_nonemitting(search: &mut BeamSearch, frame: u32) -> Result<(), DecodeError> {
    let graph = search.graph;
    search.queue.clear();
    let mut seeds: Vec<TokenRef> = search.frontier.values().copied().collect();
    seeds.sort_unstable_by_key(|t| t.slot);
    for token in seeds {
        search.queue.push(search.arena.get(token).state);
    }

    let mut budget = search.eps_budget;
    while let Some(state) = search.queue.pop() {
        if budget == 0 {
            return Err(GraphError::EpsilonCycle.into());
        }
        budget -= 1;

        let Some(&tok_ref) = search.frontier.get(&state) else {
            continue;
        };
        let base_cost = search.arena.get(tok_ref).cost;

        for arc in graph.arcs(state)? {
            if arc.unit != EPSILON {
                continue;
            }
            let new_cost = base_cost + arc.weight;
            let improves = match search.frontier.get(&arc.next) {
                Some(&existing) => new_cost < search.arena.get(existing).cost,
                None => true,
            };
            if improves {
                let token = search.arena.push(
                    frame,
                    Token {
                        state: arc.next,
                        cost: new_cost,
                        prev: Some(tok_ref),
                        arc: Some(*arc),
                    },
                );
                search.frontier.insert(arc.next, token);
                search.queue.push(arc.next);
            }
        }
    }
    Ok(())
}

/// Drops tokens costlier than best + beam, then tightens to the
/// `max_active` cheapest if the frontier is still too wide. Ranking ties
/// break on creation order so pruning stays deterministic.
pub(crate) fn prune_frontier(search: &mut BeamSearch, frame: usize) {
    if search.frontier.is_empty() {
        return;
    }

    let mut best = f32::INFINITY;
    for &token in search.frontier.values() {
        best = best.min(search.arena.get(token).cost);
    }
    search.best_cost = best;
    let cutoff = best + search.config.beam;

    let before = search.frontier.len();
    let arena = &search.arena;
    search.frontier.retain(|_, token| arena.get(*token).cost <= cutoff);

    if search.frontier.len() > search.config.max_active {
        let mut ranked: Vec<TokenRef> = search.frontier.values().copied().collect();
        ranked.sort_unstable_by(|a, b| {
            search
                .arena
                .get(*a)
                .cost
                .total_cmp(&search.arena.get(*b).cost)
                .then(a.slot.cmp(&b.slot))
        });
        ranked.truncate(search.config.max_active);
        search.frontier.clear();
        for token in ranked {
            search.frontier.insert(search.arena.get(token).state, token);
        }
    }

    log::trace!(
        "Frame {}: best cost {:.3}, {} -> {} active tokens",
        frame,
        best,
        before,
        search.frontier.len()
    );
}

/// Consumes frame `frame`: every surviving token crosses every non-epsilon
/// outgoing arc, paying the arc weight plus the scaled acoustic cost.
/// Tokens reaching the same state merge, keeping the strictly cheaper
/// path (first-seen on ties). Out-of-selection units skip the arc.
pub(crate) fn expand_emitting<S: ScoreProvider>(
    search: &mut BeamSearch,
    scorer: &mut S,
    frame: usize,
) -> Result<(), DecodeError> {
    let graph = search.graph;
    let next_frame = search.arena.begin_frame();
    search.next_frontier.clear();

    let mut survivors: Vec<TokenRef> = search.frontier.values().copied().collect();
    survivors.sort_unstable_by_key(|t| t.slot);

    for tok_ref in survivors {
        let (state, cost) = {
            let token = search.arena.get(tok_ref);
            (token.state, token.cost)
        };
        for arc in graph.arcs(state)? {
            if arc.unit == EPSILON {
                continue;
            }
            let acoustic = match scorer.cost(frame, arc.unit) {
                Ok(cost) => cost,
                Err(ScoreError::OutOfSelection { .. }) => continue,
                Err(err) => return Err(err.into()),
            };
            let new_cost = cost + arc.weight + acoustic;
            let improves = match search.next_frontier.get(&arc.next) {
                Some(&existing) => new_cost < search.arena.get(existing).cost,
                None => true,
            };
            if improves {
                let token = search.arena.push(
                    next_frame,
                    Token {
                        state: arc.next,
                        cost: new_cost,
                        prev: Some(tok_ref),
                        arc: Some(*arc),
                    },
                );
                search.next_frontier.insert(arc.next, token);
            }
        }
    }

    std::mem::swap(&mut search.frontier, &mut search.next_frontier);
    Ok(())
}
