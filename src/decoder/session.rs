use std::time::Instant;

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::graph::{DecodingGraph, GraphError};
use crate::score::ScoreProvider;

use super::search;
use super::state::{EngineState, Frontier, SearchOutcome, Token, TokenArena};

/// Frame-synchronous token-passing engine over one decoding graph.
/// Holds all per-utterance search state; one instance decodes one
/// utterance at a time and can be reused across utterances.
#[derive(Debug)]
pub struct BeamSearch<'g> {
    pub(crate) graph: &'g DecodingGraph,
    pub(crate) config: DecoderConfig,
    pub(crate) arena: TokenArena,
    pub(crate) frontier: Frontier,
    pub(crate) next_frontier: Frontier,
    pub(crate) queue: Vec<crate::graph::StateId>,
    pub(crate) eps_budget: usize,
    pub(crate) best_cost: f32,
    pub(crate) state: EngineState,
}

impl<'g> BeamSearch<'g> {
    pub fn new(graph: &'g DecodingGraph, config: &DecoderConfig) -> Result<Self, DecodeError> {
        config.validate()?;
        if graph.num_states() == 0 {
            return Err(GraphError::NoStates.into());
        }
        if graph.start() as usize >= graph.num_states() {
            return Err(GraphError::UnknownState(graph.start()).into());
        }
        graph.check_epsilon_cycles()?;

        // Upper bound on worklist pops for an acyclic epsilon structure;
        // blowing it means the closure is not terminating.
        let eps_budget = (graph.num_states() + 1).saturating_mul(graph.num_epsilon_arcs() + 1);

        let mut engine = Self {
            graph,
            config: config.clone(),
            arena: TokenArena::default(),
            frontier: Frontier::default(),
            next_frontier: Frontier::default(),
            queue: Vec::new(),
            eps_budget,
            best_cost: f32::INFINITY,
            state: EngineState::Ready,
        };
        engine.init();
        Ok(engine)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Best cumulative cost among live tokens, as of the last pruning.
    pub fn best_cost(&self) -> f32 {
        self.best_cost
    }

    /// Runs the search over all of the scorer's frames.
    pub fn decode<S: ScoreProvider>(&mut self, scorer: &mut S) -> Result<SearchOutcome, DecodeError> {
        self.decode_limited(scorer, usize::MAX)
    }

    /// Like `decode`, but aborts the frame loop after `max_frames`. The
    /// engine still completes normally, so traceback yields a (possibly
    /// partial) path for the frames it did consume.
    pub fn decode_limited<S: ScoreProvider>(
        &mut self,
        scorer: &mut S,
        max_frames: usize,
    ) -> Result<SearchOutcome, DecodeError> {
        let decode_start = Instant::now();
        self.init();
        self.state = EngineState::Running;
        let num_frames = scorer.num_frames().min(max_frames);

        for frame in 0..num_frames {
            search::expand_nonemitting(self, frame as u32)?;
            search::prune_frontier(self, frame);
            search::expand_emitting(self, scorer, frame)?;

            if self.frontier.is_empty() {
                self.state = EngineState::Exhausted { frame };
                log::warn!("No token survived frame {}, search exhausted", frame);
                return Ok(SearchOutcome {
                    frames_decoded: frame,
                    state: self.state,
                });
            }
        }

        // Tokens emitted on the last frame still get their epsilon
        // closure, so accepting states behind epsilon arcs are reachable.
        search::expand_nonemitting(self, num_frames as u32)?;
        search::prune_frontier(self, num_frames);

        self.state = EngineState::Completed;
        log::debug!(
            "Decoded {} frames in {:?} ({} tokens, {} in final frontier)",
            num_frames,
            decode_start.elapsed(),
            self.arena.num_tokens(),
            self.frontier.len()
        );
        Ok(SearchOutcome {
            frames_decoded: num_frames,
            state: self.state,
        })
    }

    fn init(&mut self) {
        self.arena.clear();
        self.frontier.clear();
        self.next_frontier.clear();
        self.queue.clear();
        self.best_cost = f32::INFINITY;

        let frame = self.arena.begin_frame();
        let start = self.arena.push(
            frame,
            Token {
                state: self.graph.start(),
                cost: 0.0,
                prev: None,
                arc: None,
            },
        );
        self.frontier.insert(self.graph.start(), start);
        self.state = EngineState::Ready;
    }
}
