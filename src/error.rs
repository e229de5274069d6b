use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("input image is empty: width={width}, height={height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("input image must have 3 or 1 channels, got {0}")]
    UnsupportedChannels(u8),

    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected output tensor: shape={shape:?}, len={len}")]
    OutputShape { shape: Vec<usize>, len: usize },

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("inference engine lock poisoned")]
    LockPoisoned,
}

impl DetectionError {
    /// True for errors raised by input validation, before any inference.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DetectionError::EmptyImage { .. } | DetectionError::UnsupportedChannels(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;
