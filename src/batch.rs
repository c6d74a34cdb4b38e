use ndarray::{s, Array2};
use thiserror::Error;

use crate::config::{ConfigError, DecoderConfig};
use crate::decoder::{BeamSearch, EngineState};
use crate::error::DecodeError;
use crate::graph::{DecodingGraph, LabelId, UnitId};
use crate::score::{AcousticModel, FrameScorer};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UtteranceError {
    #[error("Zero-length utterance")]
    EmptyUtterance,
    #[error("No token survived frame {frame}")]
    SearchFailed { frame: usize },
}

#[derive(Debug, Clone)]
pub struct Utterance {
    pub key: String,
    /// Per-frame feature vectors, frames x dim.
    pub features: Array2<f32>,
}

#[derive(Debug, Clone)]
pub struct UtteranceOutput {
    pub key: String,
    pub labels: Vec<LabelId>,
    pub alignment: Vec<UnitId>,
    pub weight: f32,
    pub log_like: f32,
    pub frames: usize,
    pub reached_final: bool,
}

/// Per-utterance consumer of decoding results.
pub trait OutputSink {
    fn write(&mut self, output: &UtteranceOutput);
}

/// Sink that keeps every output, for tests and embedding callers.
#[derive(Debug, Default)]
pub struct VecSink {
    pub outputs: Vec<UtteranceOutput>,
}

impl OutputSink for VecSink {
    fn write(&mut self, output: &UtteranceOutput) {
        self.outputs.push(output.clone());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchStats {
    pub num_success: usize,
    pub num_fail: usize,
    pub total_log_like: f64,
    pub frame_count: u64,
}

impl BatchStats {
    pub fn any_success(&self) -> bool {
        self.num_success > 0
    }

    pub fn avg_log_like(&self) -> f64 {
        if self.frame_count == 0 {
            0.0
        } else {
            self.total_log_like / self.frame_count as f64
        }
    }
}

/// Drives utterances end-to-end: scorer construction, search, traceback,
/// statistics. One utterance's search failure never aborts the batch.
#[derive(Debug)]
pub struct BatchDecoder<'a, M: AcousticModel> {
    graph: &'a DecodingGraph,
    model: &'a M,
    config: DecoderConfig,
}

impl<'a, M: AcousticModel> BatchDecoder<'a, M> {
    pub fn new(
        graph: &'a DecodingGraph,
        model: &'a M,
        config: DecoderConfig,
    ) -> Result<Self, DecodeError> {
        config.validate()?;
        graph.check_epsilon_cycles()?;
        Ok(Self {
            graph,
            model,
            config,
        })
    }

    pub fn decode_utterance(&self, utterance: &Utterance) -> Result<UtteranceOutput, DecodeError> {
        self.decode_utterance_selected(utterance, None)
    }

    /// Decodes one utterance, optionally restricting each frame to a
    /// sparse candidate set of units.
    pub fn decode_utterance_selected(
        &self,
        utterance: &Utterance,
        selection: Option<Vec<Vec<UnitId>>>,
    ) -> Result<UtteranceOutput, DecodeError> {
        let frames = utterance.features.nrows();
        if frames == 0 {
            return Err(UtteranceError::EmptyUtterance.into());
        }
        if utterance.features.ncols() != self.model.feature_dim() {
            return Err(ConfigError::FeatureDim {
                expected: self.model.feature_dim(),
                actual: utterance.features.ncols(),
            }
            .into());
        }

        let features = if self.config.time_reversed {
            reverse_frames(&utterance.features)
        } else {
            utterance.features.clone()
        };

        // Selection rows arrive in the caller's frame order, so they get
        // mirrored together with the features.
        let mut scorer = match selection {
            Some(mut selection) => {
                if self.config.time_reversed {
                    selection.reverse();
                }
                FrameScorer::with_selection(
                    self.model,
                    features,
                    self.config.acoustic_scale,
                    selection,
                )?
            }
            None => FrameScorer::new(self.model, features, self.config.acoustic_scale),
        };

        let mut search = BeamSearch::new(self.graph, &self.config)?;
        let outcome = search.decode(&mut scorer)?;
        if let EngineState::Exhausted { frame } = outcome.state {
            return Err(UtteranceError::SearchFailed { frame }.into());
        }

        let mut path = search
            .best_path()
            .ok_or(UtteranceError::SearchFailed { frame: frames })?;
        if !path.reached_final {
            log::warn!(
                "{}: no token reached an accepting state, outputting partial traceback",
                utterance.key
            );
        }
        if self.config.time_reversed {
            path.units.reverse();
            path.labels.reverse();
        }

        let log_like = -path.weight;
        log::info!(
            "Log-like per frame for utterance {} is {:.4} over {} frames",
            utterance.key,
            log_like / frames as f32,
            frames
        );

        Ok(UtteranceOutput {
            key: utterance.key.clone(),
            labels: path.labels,
            alignment: path.units,
            weight: path.weight,
            log_like,
            frames,
            reached_final: path.reached_final,
        })
    }

    /// Decodes a batch. Per-utterance failures warn and are counted;
    /// graph and configuration errors abort, since they are shared.
    pub fn run(
        &self,
        utterances: &[Utterance],
        sink: &mut dyn OutputSink,
    ) -> Result<BatchStats, DecodeError> {
        let mut stats = BatchStats::default();
        for utterance in utterances {
            match self.decode_utterance(utterance) {
                Ok(output) => {
                    stats.num_success += 1;
                    stats.total_log_like += output.log_like as f64;
                    stats.frame_count += output.frames as u64;
                    sink.write(&output);
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    log::warn!(
                        "Did not successfully decode utterance {}, len = {}: {}",
                        utterance.key,
                        utterance.features.nrows(),
                        err
                    );
                    stats.num_fail += 1;
                }
            }
        }
        log::info!(
            "Done {} utterances, failed for {}",
            stats.num_success,
            stats.num_fail
        );
        log::info!(
            "Overall log-likelihood per frame is {:.4} over {} frames",
            stats.avg_log_like(),
            stats.frame_count
        );
        Ok(stats)
    }
}

/// Mirrors the frame order so the search runs backwards in time.
fn reverse_frames(features: &Array2<f32>) -> Array2<f32> {
    features.slice(s![..;-1, ..]).to_owned()
}
