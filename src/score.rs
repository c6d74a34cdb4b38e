use std::collections::HashMap;

use ndarray::{Array2, ArrayView1};
use thiserror::Error;

use crate::graph::UnitId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Unit {unit} is outside frame {frame}'s selection")]
    OutOfSelection { frame: usize, unit: UnitId },
    #[error("Unit {unit} not present in the acoustic model")]
    UnknownUnit { unit: UnitId },
    #[error("Frame {frame} out of range, utterance has {frames} frames")]
    FrameOutOfRange { frame: usize, frames: usize },
    #[error("Selection covers {entries} frames but the utterance has {frames}")]
    SelectionMismatch { frames: usize, entries: usize },
}

/// The acoustic model behind the scorer. `cost` is a negative
/// log-likelihood, unscaled; whatever numeric machinery computes it stays
/// behind this trait.
pub trait AcousticModel {
    fn feature_dim(&self) -> usize;
    /// Number of acoustic units; valid unit ids are `1..=num_units()`
    /// (0 is the epsilon label).
    fn num_units(&self) -> usize;
    fn cost(&self, frame_features: ArrayView1<f32>, unit: UnitId) -> f32;
}

/// Per-(frame, unit) cost source consulted by the search engine.
pub trait ScoreProvider {
    fn num_frames(&self) -> usize;
    fn cost(&mut self, frame: usize, unit: UnitId) -> Result<f32, ScoreError>;
}

/// Caching adapter between one utterance's features and the acoustic
/// model. The search revisits the same unit many times within a frame, so
/// each (frame, unit) cost is computed once. The acoustic scale is folded
/// in here, exactly once.
#[derive(Debug)]
pub struct FrameScorer<'a, M: AcousticModel> {
    model: &'a M,
    features: Array2<f32>,
    acoustic_scale: f32,
    selection: Option<Vec<Vec<UnitId>>>,
    cache: HashMap<(usize, UnitId), f32>,
}

impl<'a, M: AcousticModel> FrameScorer<'a, M> {
    pub fn new(model: &'a M, features: Array2<f32>, acoustic_scale: f32) -> Self {
        Self {
            model,
            features,
            acoustic_scale,
            selection: None,
            cache: HashMap::new(),
        }
    }

    /// Restricts each frame to a sparse candidate set of units. Units
    /// outside a frame's selection score as `OutOfSelection`, which the
    /// engine treats as an inadmissible arc for that frame.
    pub fn with_selection(
        model: &'a M,
        features: Array2<f32>,
        acoustic_scale: f32,
        selection: Vec<Vec<UnitId>>,
    ) -> Result<Self, ScoreError> {
        if selection.len() != features.nrows() {
            return Err(ScoreError::SelectionMismatch {
                frames: features.nrows(),
                entries: selection.len(),
            });
        }
        Ok(Self {
            model,
            features,
            acoustic_scale,
            selection: Some(selection),
            cache: HashMap::new(),
        })
    }
}

impl<M: AcousticModel> ScoreProvider for FrameScorer<'_, M> {
    fn num_frames(&self) -> usize {
        self.features.nrows()
    }

    fn cost(&mut self, frame: usize, unit: UnitId) -> Result<f32, ScoreError> {
        if frame >= self.features.nrows() {
            return Err(ScoreError::FrameOutOfRange {
                frame,
                frames: self.features.nrows(),
            });
        }
        if unit == 0 || unit as usize > self.model.num_units() {
            return Err(ScoreError::UnknownUnit { unit });
        }
        if let Some(selection) = &self.selection {
            if !selection[frame].contains(&unit) {
                return Err(ScoreError::OutOfSelection { frame, unit });
            }
        }
        if let Some(&cached) = self.cache.get(&(frame, unit)) {
            return Ok(cached);
        }
        let cost = self.model.cost(self.features.row(frame), unit) * self.acoustic_scale;
        self.cache.insert((frame, unit), cost);
        Ok(cost)
    }
}
