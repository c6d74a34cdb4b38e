pub mod batch;
pub mod config;
pub mod decoder;
pub mod error;
pub mod graph;
pub mod score;
pub mod traceback;

pub use batch::{
    BatchDecoder, BatchStats, OutputSink, Utterance, UtteranceError, UtteranceOutput, VecSink,
};
pub use config::{ConfigError, DecoderConfig};
pub use decoder::{BeamSearch, EngineState, SearchOutcome};
pub use error::DecodeError;
pub use graph::{DecodingGraph, GraphArc, GraphError, LabelId, StateId, UnitId, EPSILON};
pub use score::{AcousticModel, FrameScorer, ScoreError, ScoreProvider};
pub use traceback::BestPath;
