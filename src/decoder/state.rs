use std::collections::HashMap;

use crate::graph::{GraphArc, StateId};

/// Index of a token in the arena: which frame it was created in, and its
/// slot within that frame. Slots grow in creation order, which is what
/// the first-seen tie-break keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRef {
    pub frame: u32,
    pub slot: u32,
}

/// One partial hypothesis: a path ending at `state` with accumulated
/// graph + acoustic cost. `prev` points into the arena (same frame for
/// epsilon moves, previous frame otherwise); `arc` is the arc taken into
/// this token, `None` only for the start token.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub state: StateId,
    pub cost: f32,
    pub prev: Option<TokenRef>,
    pub arc: Option<GraphArc>,
}

/// Backpointer storage for one decode. Tokens are appended per frame and
/// never moved, so `TokenRef`s stay valid until the whole arena is
/// dropped after traceback.
#[derive(Debug, Default)]
pub struct TokenArena {
    frames: Vec<Vec<Token>>,
}

impl TokenArena {
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn begin_frame(&mut self) -> u32 {
        self.frames.push(Vec::new());
        (self.frames.len() - 1) as u32
    }

    pub fn push(&mut self, frame: u32, token: Token) -> TokenRef {
        let slots = &mut self.frames[frame as usize];
        slots.push(token);
        TokenRef {
            frame,
            slot: (slots.len() - 1) as u32,
        }
    }

    pub fn get(&self, token: TokenRef) -> &Token {
        &self.frames[token.frame as usize][token.slot as usize]
    }

    pub fn num_tokens(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }
}

/// Live tokens at the current frame, one per graph state after merging.
pub type Frontier = HashMap<StateId, TokenRef>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Ready,
    Running,
    Completed,
    /// No token survived the named frame; decode reports no-path.
    Exhausted { frame: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    pub frames_decoded: usize,
    pub state: EngineState,
}

impl SearchOutcome {
    pub fn is_complete(&self) -> bool {
        self.state == EngineState::Completed
    }
}
