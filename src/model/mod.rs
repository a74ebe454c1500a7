//! Inference adapters around the pretrained diabetes classifier.
//!
//! The rest of the crate only ever sees [`Classifier`]. Which backend sits
//! behind it is decided once, at startup, from the artifact's file extension.

use anyhow::{bail, Context, Result};
use std::{path::Path, sync::Arc};

use crate::error::InferenceError;

pub mod svm;
#[cfg(feature = "torch")]
pub mod torch;

pub use svm::SvmModel;
#[cfg(feature = "torch")]
pub use torch::TorchModel;

/// A binary classifier over a fixed-width feature vector.
///
/// `predict` and `predict_probability` are separate questions to the model.
/// Callers must not assume one can be derived from the other.
pub trait Classifier: Send + Sync {
    /// Class label for `features` (0 = non-diabetic, 1 = diabetic).
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError>;

    /// `[p(class 0), p(class 1)]` for `features`.
    fn predict_probability(&self, features: &[f64]) -> Result<[f64; 2], InferenceError>;

    /// Width of the feature vector the model was fitted on.
    fn n_features(&self) -> usize;

    /// Short backend name, for logs.
    fn kind(&self) -> &'static str;
}

pub(crate) fn check_features(features: &[f64], expected: usize) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::DimensionMismatch {
            expected,
            got: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(InferenceError::NonFiniteFeature { index });
    }
    Ok(())
}

/// Loads the classifier artifact at `path`.
///
/// `.json` is a scikit-learn SVC export; `.pt`/`.ts` is TorchScript and needs
/// the `torch` feature.
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let model: Arc<dyn Classifier> = match ext.as_str() {
        "json" => Arc::new(
            SvmModel::from_path(path)
                .with_context(|| format!("failed to load SVM artifact {}", path.display()))?,
        ),
        #[cfg(feature = "torch")]
        "pt" | "ts" => Arc::new(
            TorchModel::from_path(path)
                .with_context(|| format!("failed to load TorchScript {}", path.display()))?,
        ),
        #[cfg(not(feature = "torch"))]
        "pt" | "ts" => bail!(
            "{} is a TorchScript model; rebuild with `--features torch`",
            path.display()
        ),
        other => bail!("unsupported model artifact extension {:?}", other),
    };

    tracing::info!(
        path = %path.display(),
        kind = model.kind(),
        n_features = model.n_features(),
        "loaded classifier"
    );
    Ok(model)
}

/// Runs one forward pass on a neutral vector so a broken artifact fails at
/// startup rather than on the first submission.
pub fn warmup(model: &dyn Classifier) -> Result<()> {
    let zeros = vec![0.0; model.n_features()];
    let label = model.predict(&zeros).context("warmup predict failed")?;
    let probs = model
        .predict_probability(&zeros)
        .context("warmup predict_probability failed")?;
    tracing::info!(label, p_positive = probs[1], "warmup forward ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_features_reports_width_and_nan() {
        assert_eq!(
            check_features(&[1.0, 2.0], 3),
            Err(InferenceError::DimensionMismatch { expected: 3, got: 2 })
        );
        assert_eq!(
            check_features(&[1.0, f64::NAN, 3.0], 3),
            Err(InferenceError::NonFiniteFeature { index: 1 })
        );
        assert!(check_features(&[1.0, 2.0, 3.0], 3).is_ok());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_classifier(Path::new("models/model.pkl")).err().unwrap();
        assert!(err.to_string().contains("unsupported"));
    }

    #[cfg(not(feature = "torch"))]
    #[test]
    fn torchscript_needs_feature() {
        let err = load_classifier(Path::new("models/model.pt")).err().unwrap();
        assert!(err.to_string().contains("--features torch"));
    }
}
