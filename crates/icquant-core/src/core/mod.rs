//! # Core Module
//!
//! This module provides the stateless building blocks of the codec: quantization
//! primitives, the coordinate data model, and backbone geometry.
//!
//! ## Architecture
//!
//! - **Quantization** ([`quantization`]) - `QuantizationSpec` and the `BitQuantizer` primitives
//! - **Data Model** ([`models`]) - Internal coordinate sets, their compressed form, idealized
//!   geometry and Cartesian backbone chains
//! - **Geometry** ([`utils`]) - Bond angles, dihedrals, NeRF atom placement, Kabsch superposition
//!
//! Everything in this layer is a pure function of its inputs. No component holds
//! state across calls, so all of it is safe to share across threads.

pub mod models;
pub mod quantization;
pub mod utils;
