use crate::core::models::coordinates::CoordinateClass;
use crate::core::quantization::QuantizationError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompressionError {
    #[error(
        "Coordinate classes disagree on size: {lengths} lengths, {angles} angles, {dihedrals} dihedrals"
    )]
    ShapeMismatch {
        lengths: usize,
        angles: usize,
        dihedrals: usize,
    },

    #[error("Quantization of {class} failed: {source}")]
    Quantization {
        class: CoordinateClass,
        source: QuantizationError,
    },
}
