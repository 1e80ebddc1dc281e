//! # Engine Module
//!
//! The codec proper: a validated per-class configuration and the compressors that apply it.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - `CompressorConfig`, its builder, presets and TOML loading
//! - **Compression** ([`compressor`]) - The `CoordinateCompressor` capability and `NaiveCompressor`
//! - **Error Handling** ([`error`]) - Shape and quantization failures raised at call time
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for long evaluations
//!
//! Compressors hold only their immutable configuration. `compress` and `decompress` are
//! pure functions of their argument, so one compressor can serve any number of threads.

pub mod compressor;
pub mod config;
pub mod error;
pub mod progress;
