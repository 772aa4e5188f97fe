use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("payload too large: {size} bytes, max {max}")]
    PayloadTooLarge { size: usize, max: usize },
}
