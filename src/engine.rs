//! Inference engine capability consumed by the detector.

use crate::error::Result;

/// Flat output buffer plus its declared shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorData {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// A loaded network that can be fed one input and run at a time.
///
/// Implementations are not required to be thread-safe; the detector
/// serializes every set-input / run / read-output round trip.
pub trait InferenceEngine: Send {
    fn input_names(&self) -> Vec<String>;

    fn output_names(&self) -> Vec<String>;

    /// Assign a shape and channel-planar, row-major data to a named input.
    fn set_input(&mut self, name: &str, shape: &[usize], data: Vec<f32>) -> Result<()>;

    /// Execute a forward pass over the current inputs.
    fn run(&mut self) -> Result<()>;

    /// Read a named output produced by the last [`run`](Self::run).
    fn output(&self, name: &str) -> Result<TensorData>;

    /// Independent handle over the same model, sharing no run-time state.
    fn clone_engine(&self) -> Result<Box<dyn InferenceEngine>>;
}

#[cfg(feature = "rten")]
pub use self::rten_backend::RtenEngine;

#[cfg(feature = "rten")]
mod rten_backend {
    use std::path::Path;
    use std::sync::Arc;

    use rten::Model;
    use rten_tensor::Tensor;
    use rten_tensor::prelude::*;
    use tracing::debug;

    use super::{InferenceEngine, TensorData};
    use crate::error::{DetectionError, Result};

    /// [`InferenceEngine`] backed by an `rten` model.
    ///
    /// The model graph is immutable once loaded and is shared between
    /// clones; input and output slots belong to each handle.
    pub struct RtenEngine {
        model: Arc<Model>,
        input: Option<(String, Tensor<f32>)>,
        outputs: Vec<(String, Tensor<f32>)>,
    }

    impl RtenEngine {
        pub fn new(model: Model) -> Self {
            Self {
                model: Arc::new(model),
                input: None,
                outputs: Vec::new(),
            }
        }

        /// Load a `.rten` model file.
        pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            if !path.exists() {
                return Err(DetectionError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
            let model = Model::load_file(path)
                .map_err(|e| DetectionError::ModelLoad(format!("{}: {}", path.display(), e)))?;
            debug!(path = %path.display(), "loaded detection model");
            Ok(Self::new(model))
        }

        fn node_names(&self, ids: &[rten::NodeId]) -> Vec<String> {
            ids.iter()
                .enumerate()
                .map(|(i, &id)| {
                    self.model
                        .node_info(id)
                        .and_then(|info| info.name().map(str::to_string))
                        .unwrap_or_else(|| format!("#{i}"))
                })
                .collect()
        }

        fn find_id(&self, ids: &[rten::NodeId], name: &str) -> Result<rten::NodeId> {
            self.node_names(ids)
                .iter()
                .position(|n| n == name)
                .map(|i| ids[i])
                .ok_or_else(|| DetectionError::Inference(format!("unknown tensor name: {name}")))
        }
    }

    impl InferenceEngine for RtenEngine {
        fn input_names(&self) -> Vec<String> {
            self.node_names(self.model.input_ids())
        }

        fn output_names(&self) -> Vec<String> {
            self.node_names(self.model.output_ids())
        }

        fn set_input(&mut self, name: &str, shape: &[usize], data: Vec<f32>) -> Result<()> {
            let expected: usize = shape.iter().product();
            if expected != data.len() {
                return Err(DetectionError::Inference(format!(
                    "input {name}: shape {shape:?} needs {expected} values, got {}",
                    data.len()
                )));
            }
            self.find_id(self.model.input_ids(), name)?;
            self.input = Some((name.to_string(), Tensor::from_data(shape, data)));
            Ok(())
        }

        fn run(&mut self) -> Result<()> {
            let (name, tensor) = self
                .input
                .as_ref()
                .ok_or_else(|| DetectionError::Inference("no input has been set".to_string()))?;
            let input_id = self.find_id(self.model.input_ids(), name)?;
            let output_ids = self.model.output_ids().to_vec();
            let output_names = self.node_names(&output_ids);

            let values = self
                .model
                .run(vec![(input_id, tensor.view().into())], &output_ids, None)
                .map_err(|e| DetectionError::Inference(e.to_string()))?;

            let mut outputs = Vec::with_capacity(values.len());
            for (name, value) in output_names.into_iter().zip(values) {
                let tensor: Tensor<f32> = value
                    .try_into()
                    .map_err(|e| DetectionError::Inference(format!("output {name}: {e}")))?;
                outputs.push((name, tensor));
            }
            self.outputs = outputs;
            Ok(())
        }

        fn output(&self, name: &str) -> Result<TensorData> {
            let (_, tensor) = self
                .outputs
                .iter()
                .find(|(n, _)| n == name)
                .ok_or_else(|| DetectionError::Inference(format!("no output named {name}")))?;
            Ok(TensorData {
                shape: tensor.shape().to_vec(),
                data: tensor.to_vec(),
            })
        }

        fn clone_engine(&self) -> Result<Box<dyn InferenceEngine>> {
            Ok(Box::new(Self {
                model: Arc::clone(&self.model),
                input: None,
                outputs: Vec::new(),
            }))
        }
    }
}
