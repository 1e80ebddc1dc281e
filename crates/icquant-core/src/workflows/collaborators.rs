use crate::core::models::backbone::{BackboneChain, ReconstructionMode};
use crate::core::models::coordinates::InternalCoordinateSet;
use crate::core::utils::geometry::{GeometryError, Superposition, superpose};
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("Structure '{id}' has no chain '{chain}'")]
    StructureNotFound { id: String, chain: char },

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// A reference structure: its Cartesian backbone and the internal coordinates extracted from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceStructure {
    pub backbone: BackboneChain,
    pub internal: InternalCoordinateSet,
}

impl ReferenceStructure {
    pub fn from_backbone(backbone: BackboneChain) -> Self {
        let internal = backbone.internal_coordinates();
        Self { backbone, internal }
    }
}

/// Resolves a structure identifier and chain selector to a reference structure.
pub trait StructureSource {
    fn load(&self, id: &str, chain: char) -> Result<ReferenceStructure, CollaboratorError>;
}

/// Rebuilds Cartesian backbone coordinates from internal coordinates.
pub trait Reconstructor {
    fn reconstruct(
        &self,
        coordinates: &InternalCoordinateSet,
        mode: ReconstructionMode,
    ) -> Result<BackboneChain, CollaboratorError>;
}

/// Rigid-body alignment and the RMSD metric used to judge reconstructions.
pub trait Aligner {
    fn superpose(
        &self,
        mobile: &[Point3<f64>],
        target: &[Point3<f64>],
    ) -> Result<Superposition, CollaboratorError>;

    fn rmsd(
        &self,
        mobile: &[Point3<f64>],
        target: &[Point3<f64>],
    ) -> Result<f64, CollaboratorError> {
        Ok(self.superpose(mobile, target)?.rmsd)
    }
}

/// Backbones held in memory, keyed by identifier and chain.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    structures: HashMap<(String, char), BackboneChain>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, chain: char, backbone: BackboneChain) {
        self.structures.insert((id.into(), chain), backbone);
    }

    pub fn with_structure(
        mut self,
        id: impl Into<String>,
        chain: char,
        backbone: BackboneChain,
    ) -> Self {
        self.insert(id, chain, backbone);
        self
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl StructureSource for InMemorySource {
    fn load(&self, id: &str, chain: char) -> Result<ReferenceStructure, CollaboratorError> {
        self.structures
            .get(&(id.to_string(), chain))
            .cloned()
            .map(ReferenceStructure::from_backbone)
            .ok_or_else(|| CollaboratorError::StructureNotFound {
                id: id.to_string(),
                chain,
            })
    }
}

/// NeRF chain growth.
#[derive(Debug, Clone, Copy, Default)]
pub struct NerfReconstructor;

impl Reconstructor for NerfReconstructor {
    fn reconstruct(
        &self,
        coordinates: &InternalCoordinateSet,
        mode: ReconstructionMode,
    ) -> Result<BackboneChain, CollaboratorError> {
        Ok(BackboneChain::from_internal(coordinates, mode)?)
    }
}

/// Kabsch superposition over all backbone atoms.
#[derive(Debug, Clone, Copy, Default)]
pub struct KabschAligner;

impl Aligner for KabschAligner {
    fn superpose(
        &self,
        mobile: &[Point3<f64>],
        target: &[Point3<f64>],
    ) -> Result<Superposition, CollaboratorError> {
        Ok(superpose(mobile, target)?)
    }
}
