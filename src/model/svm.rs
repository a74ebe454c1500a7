//! Support vector classifier re-hosted from a scikit-learn `SVC(probability=True)`.
//!
//! The JSON artifact carries the fitted attributes as scikit-learn exposes
//! them (`support_vectors_`, `dual_coef_`, `intercept_`, `probA_`, `probB_`),
//! plus an optional standard scaler that was fitted in front of the SVC.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use super::{check_features, Classifier};
use crate::error::InferenceError;

/// libsvm clamps pairwise probabilities to this distance from 0 and 1.
const MIN_PROB: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Rbf,
    Poly,
    Sigmoid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk layout of the artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct SvmParams {
    pub kernel: Kernel,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default)]
    pub coef0: f64,
    #[serde(default = "default_degree")]
    pub degree: i32,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    pub prob_a: f64,
    pub prob_b: f64,
    #[serde(default)]
    pub scaler: Option<Scaler>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

fn default_gamma() -> f64 {
    1.0
}

fn default_degree() -> i32 {
    3
}

#[derive(Debug, Clone)]
pub struct SvmModel {
    params: SvmParams,
    n_features: usize,
}

impl SvmModel {
    pub fn new(params: SvmParams) -> Result<Self> {
        let Some(first) = params.support_vectors.first() else {
            bail!("artifact has no support vectors");
        };
        let n_features = first.len();
        if n_features == 0 {
            bail!("support vectors are empty");
        }
        if let Some(i) = params
            .support_vectors
            .iter()
            .position(|sv| sv.len() != n_features)
        {
            bail!(
                "support vector {} has {} features, expected {}",
                i,
                params.support_vectors[i].len(),
                n_features
            );
        }
        if params.dual_coef.len() != params.support_vectors.len() {
            bail!(
                "dual_coef has {} entries for {} support vectors",
                params.dual_coef.len(),
                params.support_vectors.len()
            );
        }
        if let Some(scaler) = &params.scaler {
            if scaler.mean.len() != n_features || scaler.scale.len() != n_features {
                bail!("scaler width does not match {} features", n_features);
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                bail!("scaler has a zero or non-finite scale");
            }
        }
        if let Some(names) = &params.feature_names {
            if names.len() != n_features {
                bail!(
                    "feature_names lists {} columns, expected {}",
                    names.len(),
                    n_features
                );
            }
        }
        if !params.prob_a.is_finite() || !params.prob_b.is_finite() {
            bail!("Platt parameters must be finite");
        }
        Ok(Self { params, n_features })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: SvmParams =
            serde_json::from_str(json).context("failed to parse SVM artifact")?;
        Self::new(params)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("failed to read model at {}", path.display()))?;
        Self::from_json_str(&txt)
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.params.feature_names.as_deref()
    }

    fn scaled(&self, x: &[f64]) -> Vec<f64> {
        match &self.params.scaler {
            Some(s) => x
                .iter()
                .zip(s.mean.iter().zip(&s.scale))
                .map(|(v, (m, sc))| (v - m) / sc)
                .collect(),
            None => x.to_vec(),
        }
    }

    fn kernel(&self, a: &[f64], b: &[f64]) -> f64 {
        let p = &self.params;
        match p.kernel {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf => {
                let d2: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                (-p.gamma * d2).exp()
            }
            Kernel::Poly => (p.gamma * dot(a, b) + p.coef0).powi(p.degree),
            Kernel::Sigmoid => (p.gamma * dot(a, b) + p.coef0).tanh(),
        }
    }

    /// scikit-learn's `decision_function`: positive means class 1.
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, InferenceError> {
        check_features(features, self.n_features)?;
        let x = self.scaled(features);
        let sum: f64 = self
            .params
            .support_vectors
            .iter()
            .zip(&self.params.dual_coef)
            .map(|(sv, alpha)| alpha * self.kernel(sv, &x))
            .sum();
        let d = sum + self.params.intercept;
        if !d.is_finite() {
            return Err(InferenceError::Backend(format!(
                "decision value is not finite: {d}"
            )));
        }
        Ok(d)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// libsvm's numerically stable `1 / (1 + exp(A*f + B))`.
fn sigmoid_predict(dec: f64, a: f64, b: f64) -> f64 {
    let f_apb = dec * a + b;
    if f_apb >= 0.0 {
        (-f_apb).exp() / (1.0 + (-f_apb).exp())
    } else {
        1.0 / (1.0 + f_apb.exp())
    }
}

impl Classifier for SvmModel {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        let d = self.decision_function(features)?;
        Ok(if d > 0.0 { 1 } else { 0 })
    }

    fn predict_probability(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        // libsvm's decision value is oriented toward class 0, the reverse of
        // scikit-learn's public sign.
        let d = self.decision_function(features)?;
        let p_neg = sigmoid_predict(-d, self.params.prob_a, self.params.prob_b)
            .clamp(MIN_PROB, 1.0 - MIN_PROB);
        Ok([p_neg, 1.0 - p_neg])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "svm"
    }
}
