//! TorchScript backend. The module must map `[1, n_features]` float input to
//! `[1, 2]` logits over (non-diabetic, diabetic).

use anyhow::{bail, Context, Result};
use std::path::Path;
use tch::{kind::Kind, CModule, Device, Tensor};

use super::{check_features, Classifier};
use crate::error::InferenceError;

pub struct TorchModel {
    model: CModule,
    device: Device,
    n_features: usize,
}

impl TorchModel {
    pub fn from_path(path: &Path) -> Result<Self> {
        let device = Device::Cpu;
        let model = CModule::load_on_device(path, device)
            .with_context(|| format!("failed to load TorchScript {}", path.display()))?;

        // The artifact does not record its input width; try the form's.
        let n_features = crate::types::FEATURE_COUNT;
        let dummy = Tensor::zeros([1, n_features as i64], (Kind::Float, device));
        let out = model.forward_ts(&[dummy])?;
        let sz = out.size();
        if sz != [1, 2] {
            bail!("unexpected model output size: {:?}", sz);
        }

        Ok(Self {
            model,
            device,
            n_features,
        })
    }

    fn softmax(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        check_features(features, self.n_features)?;
        let x: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input = Tensor::from_slice(&x)
            .reshape([1, self.n_features as i64])
            .to_device(self.device);

        let logits = self
            .model
            .forward_ts(&[input])
            .map_err(|e| InferenceError::Backend(e.to_string()))?;
        let probs = logits.softmax(-1, Kind::Double);
        Ok([probs.double_value(&[0, 0]), probs.double_value(&[0, 1])])
    }
}

impl Classifier for TorchModel {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        let [p0, p1] = self.softmax(features)?;
        Ok(if p1 > p0 { 1 } else { 0 })
    }

    fn predict_probability(&self, features: &[f64]) -> Result<[f64; 2], InferenceError> {
        self.softmax(features)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "torchscript"
    }
}
