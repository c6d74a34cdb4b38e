pub(crate) mod search;
pub(crate) mod session;
pub(crate) mod state;

pub use session::BeamSearch;
pub use state::{EngineState, SearchOutcome};

use crate::traceback::{self, BestPath};

impl BeamSearch<'_> {
    /// Extracts the best surviving path from the final frontier, or
    /// `None` if the search exhausted (or never ran).
    pub fn best_path(&self) -> Option<BestPath> {
        traceback::extract(self)
    }
}
