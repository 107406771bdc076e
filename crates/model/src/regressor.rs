//! Regressor Capability

use crate::ModelError;
use ndarray::{Array1, Array2};

/// The regression capability the dataset builder and serving layer depend
/// on. Any algorithm satisfying this interface is substitutable without
/// changing either of them.
pub trait Regressor {
    /// Fit the model on a feature matrix and target vector
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError>;

    /// Predict one target value per input row
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// Predict for a single feature row
    fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError> {
        let x = Array2::from_shape_vec((1, row.len()), row.to_vec())
            .map_err(|e| ModelError::InvalidTrainingSet(e.to_string()))?;
        let y = self.predict(&x)?;
        y.first()
            .copied()
            .ok_or_else(|| ModelError::InvalidTrainingSet("empty prediction".to_string()))
    }
}
