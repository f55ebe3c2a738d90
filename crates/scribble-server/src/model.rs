//! Sketch classification model.

use crate::preprocess::INPUT_LEN;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Labels in model output order.
pub const CLASS_NAMES: [&str; 9] = [
    "eye", "arm", "face", "finger", "hand", "leg", "mouth", "nose", "ear",
];

/// Model loading errors.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Cannot read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse model file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model shape: {0}")]
    Shape(String),
}

/// Anything that maps a preprocessed input to a class index.
pub trait Model: Send + Sync {
    fn predict(&self, input: &[f32]) -> usize;
}

/// One weight row and one bias per class; the prediction is the highest
/// scoring row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LinearModel {
    pub fn new(weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self, ModelError> {
        let model = Self { weights, bias };
        model.validate()?;
        Ok(model)
    }

    /// Load a model serialized as `{"weights": [[..]; 9], "bias": [..]}`.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)?;
        let model: LinearModel = serde_json::from_str(&text)?;
        Self::new(model.weights, model.bias)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.weights.len() != CLASS_NAMES.len() {
            return Err(ModelError::Shape(format!(
                "expected {} weight rows, got {}",
                CLASS_NAMES.len(),
                self.weights.len()
            )));
        }
        if let Some((i, row)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != INPUT_LEN)
        {
            return Err(ModelError::Shape(format!(
                "weight row {} has {} values, expected {}",
                i,
                row.len(),
                INPUT_LEN
            )));
        }
        if self.bias.len() != CLASS_NAMES.len() {
            return Err(ModelError::Shape(format!(
                "expected {} bias values, got {}",
                CLASS_NAMES.len(),
                self.bias.len()
            )));
        }
        Ok(())
    }

    /// Raw per-class scores.
    pub fn scores(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias)
            .collect()
    }
}

impl Model for LinearModel {
    fn predict(&self, input: &[f32]) -> usize {
        // First maximum wins ties.
        let mut best = 0;
        let scores = self.scores(input);
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Predicts "face" for anything with ink and "ear" for a blank input.
    pub(crate) fn face_or_ear() -> LinearModel {
        let mut weights = vec![vec![0.0; INPUT_LEN]; CLASS_NAMES.len()];
        weights[2] = vec![1.0; INPUT_LEN];
        let mut bias = vec![0.0; CLASS_NAMES.len()];
        bias[8] = 0.5;
        LinearModel::new(weights, bias).unwrap()
    }

    #[test]
    fn test_predict_argmax() {
        let model = face_or_ear();
        assert_eq!(CLASS_NAMES[model.predict(&vec![1.0; INPUT_LEN])], "face");
        assert_eq!(CLASS_NAMES[model.predict(&vec![0.0; INPUT_LEN])], "ear");
    }

    #[test]
    fn test_ties_pick_first_class() {
        let model = LinearModel::new(
            vec![vec![0.0; INPUT_LEN]; CLASS_NAMES.len()],
            vec![0.0; CLASS_NAMES.len()],
        )
        .unwrap();
        assert_eq!(model.predict(&vec![0.3; INPUT_LEN]), 0);
    }

    #[test]
    fn test_rejects_bad_shape() {
        assert!(matches!(
            LinearModel::new(vec![vec![0.0; INPUT_LEN]; 3], vec![0.0; 3]),
            Err(ModelError::Shape(_))
        ));
        assert!(matches!(
            LinearModel::new(
                vec![vec![0.0; 10]; CLASS_NAMES.len()],
                vec![0.0; CLASS_NAMES.len()]
            ),
            Err(ModelError::Shape(_))
        ));
        assert!(matches!(
            LinearModel::new(vec![vec![0.0; INPUT_LEN]; CLASS_NAMES.len()], vec![0.0; 2]),
            Err(ModelError::Shape(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&face_or_ear()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let model = LinearModel::load(file.path()).unwrap();
        assert_eq!(model.predict(&vec![1.0; INPUT_LEN]), 2);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LinearModel::load(&dir.path().join("missing.json")),
            Err(ModelError::Io(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"weights\": 3}").unwrap();
        assert!(matches!(
            LinearModel::load(file.path()),
            Err(ModelError::Parse(_))
        ));
    }
}
