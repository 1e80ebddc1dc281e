//! # Quantization Module
//!
//! Affine maps between a continuous range and a fixed-width integer code range.
//!
//! - [`spec`] - The validated, immutable `QuantizationSpec` and its builder
//! - [`quantizer`] - `BitQuantizer`, the elementwise `discretize`/`decode` primitives
//!
//! The quantization error of a single value is bounded by half a step,
//! `(max_val - min_val) / (2 * (2^bits - 1))`. Bit width is the only precision knob.

pub mod quantizer;
pub mod spec;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantizationError {
    #[error("Invalid quantization spec: {reason}")]
    InvalidSpec { reason: String },

    #[error("Value {value} is outside the quantization range [{min_val}, {max_val}]")]
    OutOfRange {
        value: f64,
        min_val: f64,
        max_val: f64,
    },

    #[error("Code {code} is outside the representable range [{min_code}, {max_code}]")]
    CodeOutOfRange {
        code: i64,
        min_code: i64,
        max_code: i64,
    },
}
