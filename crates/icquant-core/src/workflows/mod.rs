//! # Workflows Module
//!
//! The public, high-level entry points built on top of the codec.
//!
//! ## Architecture
//!
//! - **Collaborators** ([`collaborators`]) - The structure source, reconstructor and aligner
//!   seams, with in-memory, NeRF and Kabsch implementations
//! - **Evaluation** ([`evaluate`]) - `RoundTripEvaluator`, which compresses, restores and
//!   rebuilds reference structures and reports the backbone RMSD per structure
//!
//! The evaluator never reimplements geometry. Swapping a collaborator (a file-backed
//! structure source, a different alignment metric) requires no change to the codec.

pub mod collaborators;
pub mod evaluate;
