//! # Core Models Module
//!
//! Value types describing a protein backbone, in both its internal-coordinate and its
//! Cartesian form, plus the compressed representation produced by the codec.
//!
//! ## Key Components
//!
//! - [`coordinates`] - `InternalCoordinateSet`, `CompressedCoordinateSet` and the
//!   per-residue layout
//! - [`ideal`] - `IdealGeometry`, the canonical backbone bond lengths and angles
//! - [`backbone`] - `BackboneChain`, N/CA/C Cartesian coordinates with NeRF conversions
//!
//! ## Per-residue layout
//!
//! Residue `i` carries the geometry that places its own N, CA and C atoms:
//!
//! | class      | `[0]`               | `[1]`             | `[2]`           |
//! |------------|---------------------|-------------------|-----------------|
//! | lengths    | C(i-1)–N(i)         | N(i)–CA(i)        | CA(i)–C(i)      |
//! | angles     | CA(i-1)–C(i-1)–N(i) | C(i-1)–N(i)–CA(i) | N(i)–CA(i)–C(i) |
//! | dihedrals  | phi(i)              | omega(i)          | psi(i)          |
//!
//! Residue 0 is the ghost residue: it has no predecessor, so its incoming components
//! are placeholders. The last residue's `psi` is a placeholder as well.

pub mod backbone;
pub mod coordinates;
pub mod ideal;
