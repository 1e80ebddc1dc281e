//! # icquant Core Library
//!
//! A small, auditable fixed-point codec for protein backbone internal coordinates:
//! bond lengths, bond angles and dihedral (torsion) angles. The codec trades a fixed
//! number of bits per residue for a bounded, predictable reconstruction error, in the
//! spirit of structure-compression formats such as Foldcomp.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that every numeric
//! decision can be tested in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless value types (`QuantizationSpec`,
//!   `InternalCoordinateSet`, `CompressedCoordinateSet`), the pure affine quantizer
//!   (`BitQuantizer`) and backbone geometry utilities (NeRF placement, Kabsch superposition).
//!
//! - **[`engine`]: The Codec.** Validated compressor configuration, the
//!   `CoordinateCompressor` capability and its `NaiveCompressor` variant, which
//!   quantizes lengths and angles as deviations from an idealized backbone.
//!
//! - **[`workflows`]: The Public API.** The collaborator seams (structure source,
//!   reconstruction, alignment) and the `RoundTripEvaluator`, which measures how much
//!   structural accuracy a given configuration costs.

pub mod core;
pub mod engine;
pub mod workflows;
