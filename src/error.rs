use thiserror::Error;

use crate::batch::UtteranceError;
use crate::config::ConfigError;
use crate::graph::GraphError;
use crate::score::ScoreError;

/// Unified decoding errors.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Score: {0}")]
    Score(#[from] ScoreError),

    #[error("Config: {0}")]
    Config(#[from] ConfigError),

    #[error("Utterance: {0}")]
    Utterance(#[from] UtteranceError),
}

impl serde::Serialize for DecodeError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl DecodeError {
    /// Graph and configuration errors poison every utterance sharing
    /// them, so the batch stops; everything else skips one utterance.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Graph(_) | Self::Config(_))
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Graph(_) => "The decoding graph is malformed. Rebuild it before decoding.",
            Self::Config(_) => "Decoder options are invalid. Fix the configuration and retry.",
            Self::Score(_) => "Acoustic scores for this utterance were unusable, so it was skipped.",
            Self::Utterance(_) => "This utterance could not be decoded and was skipped.",
        }
    }
}
