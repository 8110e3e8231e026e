use thiserror::Error;

/// Non-fatal viewport conditions. Callers log these and carry on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewportError {
    #[error("viewport has no area ({width}x{height})")]
    DegenerateViewport { width: f64, height: f64 },

    #[error("no {side} registered for facility #{index}")]
    MissingRegistryEntry { index: usize, side: &'static str },
}
