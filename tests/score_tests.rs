use std::cell::Cell;

use ndarray::{Array2, ArrayView1};
use tokenpass::{AcousticModel, FrameScorer, ScoreError, ScoreProvider, UnitId};

#[derive(Debug)]
struct CountingModel {
    calls: Cell<usize>,
}

impl CountingModel {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
        }
    }
}

impl AcousticModel for CountingModel {
    fn feature_dim(&self) -> usize {
        1
    }

    fn num_units(&self) -> usize {
        4
    }

    fn cost(&self, _frame_features: ArrayView1<f32>, unit: UnitId) -> f32 {
        self.calls.set(self.calls.get() + 1);
        unit as f32
    }
}

fn features(frames: usize) -> Array2<f32> {
    Array2::from_shape_fn((frames, 1), |(i, _)| i as f32)
}

#[test]
fn repeated_lookups_hit_the_cache() {
    let model = CountingModel::new();
    let mut scorer = FrameScorer::new(&model, features(2), 1.0);

    assert_eq!(scorer.cost(0, 1).unwrap(), 1.0);
    assert_eq!(scorer.cost(0, 1).unwrap(), 1.0);
    assert_eq!(model.calls.get(), 1);

    scorer.cost(0, 2).unwrap();
    scorer.cost(1, 1).unwrap();
    assert_eq!(model.calls.get(), 3);
}

#[test]
fn acoustic_scale_applied_once() {
    let model = CountingModel::new();
    let mut scorer = FrameScorer::new(&model, features(1), 0.5);
    assert_eq!(scorer.cost(0, 2).unwrap(), 1.0);
    // cached value is already scaled
    assert_eq!(scorer.cost(0, 2).unwrap(), 1.0);
}

#[test]
fn selection_restricts_units_per_frame() {
    let model = CountingModel::new();
    let selection = vec![vec![2], vec![1, 2]];
    let mut scorer = FrameScorer::with_selection(&model, features(2), 1.0, selection).unwrap();

    assert_eq!(
        scorer.cost(0, 1).unwrap_err(),
        ScoreError::OutOfSelection { frame: 0, unit: 1 }
    );
    assert!(scorer.cost(0, 2).is_ok());
    assert!(scorer.cost(1, 1).is_ok());
}

#[test]
fn selection_length_must_match_frames() {
    let model = CountingModel::new();
    let err = FrameScorer::with_selection(&model, features(3), 1.0, vec![vec![1]]).unwrap_err();
    assert_eq!(
        err,
        ScoreError::SelectionMismatch {
            frames: 3,
            entries: 1
        }
    );
}

#[test]
fn unknown_units_rejected() {
    let model = CountingModel::new();
    let mut scorer = FrameScorer::new(&model, features(1), 1.0);
    assert_eq!(
        scorer.cost(0, 0).unwrap_err(),
        ScoreError::UnknownUnit { unit: 0 }
    );
    assert_eq!(
        scorer.cost(0, 5).unwrap_err(),
        ScoreError::UnknownUnit { unit: 5 }
    );
    assert!(scorer.cost(0, 4).is_ok());
}

#[test]
fn frame_out_of_range_rejected() {
    let model = CountingModel::new();
    let mut scorer = FrameScorer::new(&model, features(2), 1.0);
    assert_eq!(scorer.num_frames(), 2);
    assert_eq!(
        scorer.cost(2, 1).unwrap_err(),
        ScoreError::FrameOutOfRange { frame: 2, frames: 2 }
    );
}
