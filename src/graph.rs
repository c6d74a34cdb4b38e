use thiserror::Error;

/// Id of a graph state.
pub type StateId = u32;
/// Id of an acoustic unit (arc input label). `EPSILON` consumes no frame.
pub type UnitId = u32;
/// Id of an emitted output symbol (arc output label).
pub type LabelId = u32;

/// Reserved id for the empty input/output label.
pub const EPSILON: u32 = 0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Graph state {0} does not exist")]
    UnknownState(StateId),
    #[error("Epsilon arcs in the decoding graph do not terminate")]
    EpsilonCycle,
    #[error("Decoding graph has no states")]
    NoStates,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphArc {
    pub unit: UnitId,
    pub label: LabelId,
    pub weight: f32,
    pub next: StateId,
}

#[derive(Debug, Clone, Default)]
struct GraphState {
    arcs: Vec<GraphArc>,
    final_weight: Option<f32>,
}

/// Precompiled weighted automaton the search runs over. Built once, then
/// shared read-only across decoders; nothing here mutates after loading.
#[derive(Debug, Clone, Default)]
pub struct DecodingGraph {
    start: StateId,
    states: Vec<GraphState>,
    num_epsilon_arcs: usize,
}

impl DecodingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> StateId {
        self.states.push(GraphState::default());
        (self.states.len() - 1) as StateId
    }

    pub fn set_start(&mut self, state: StateId) -> Result<(), GraphError> {
        self.check_state(state)?;
        self.start = state;
        Ok(())
    }

    pub fn add_arc(&mut self, from: StateId, arc: GraphArc) -> Result<(), GraphError> {
        self.check_state(from)?;
        self.check_state(arc.next)?;
        if arc.unit == EPSILON {
            self.num_epsilon_arcs += 1;
        }
        self.states[from as usize].arcs.push(arc);
        Ok(())
    }

    pub fn set_final(&mut self, state: StateId, weight: f32) -> Result<(), GraphError> {
        self.check_state(state)?;
        self.states[state as usize].final_weight = Some(weight);
        Ok(())
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_epsilon_arcs(&self) -> usize {
        self.num_epsilon_arcs
    }

    pub fn arcs(&self, state: StateId) -> Result<&[GraphArc], GraphError> {
        self.states
            .get(state as usize)
            .map(|s| s.arcs.as_slice())
            .ok_or(GraphError::UnknownState(state))
    }

    pub fn final_weight(&self, state: StateId) -> Result<Option<f32>, GraphError> {
        self.states
            .get(state as usize)
            .map(|s| s.final_weight)
            .ok_or(GraphError::UnknownState(state))
    }

    /// DFS over epsilon-input arcs. Any cycle makes the non-emitting
    /// closure unbounded, so the graph is rejected up front.
    pub fn check_epsilon_cycles(&self) -> Result<(), GraphError> {
        const UNSEEN: u8 = 0;
        const OPEN: u8 = 1;
        const DONE: u8 = 2;

        let mut color = vec![UNSEEN; self.states.len()];
        let mut stack: Vec<(StateId, usize)> = Vec::new();

        for root in 0..self.states.len() as StateId {
            if color[root as usize] != UNSEEN {
                continue;
            }
            color[root as usize] = OPEN;
            stack.push((root, 0));

            while let Some(&(state, idx)) = stack.last() {
                let arcs = &self.states[state as usize].arcs;
                let mut next_eps = None;
                let mut j = idx;
                while j < arcs.len() {
                    let arc = arcs[j];
                    j += 1;
                    if arc.unit == EPSILON {
                        next_eps = Some(arc.next);
                        break;
                    }
                }
                if let Some(top) = stack.last_mut() {
                    top.1 = j;
                }
                match next_eps {
                    Some(next) => match color[next as usize] {
                        OPEN => return Err(GraphError::EpsilonCycle),
                        UNSEEN => {
                            color[next as usize] = OPEN;
                            stack.push((next, 0));
                        }
                        _ => {}
                    },
                    None => {
                        color[state as usize] = DONE;
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    fn check_state(&self, state: StateId) -> Result<(), GraphError> {
        if (state as usize) < self.states.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownState(state))
        }
    }
}
