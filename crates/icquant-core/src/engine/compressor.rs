use super::config::{CompressorConfig, ConfigError};
use super::error::CompressionError;
use crate::core::models::coordinates::{
    CA_C_N_ANGLE, C_N_CA_ANGLE, COMPONENTS_PER_RESIDUE, CompressedCoordinateSet, CoordinateClass,
    GHOST_RESIDUE, InternalCoordinateSet, OMEGA, PEPTIDE_BOND, PHI, ResidueTriple,
};
use crate::core::models::ideal::IdealGeometry;
use crate::core::quantization::quantizer::BitQuantizer;
use crate::core::quantization::spec::QuantizationSpec;
use itertools::Itertools;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Placeholder components of the ghost residue, per class.
const GHOST_LENGTHS: &[usize] = &[PEPTIDE_BOND];
const GHOST_ANGLES: &[usize] = &[CA_C_N_ANGLE, C_N_CA_ANGLE];
const GHOST_DIHEDRALS: &[usize] = &[PHI, OMEGA];

/// Dihedrals have no idealized baseline.
const NO_BASELINE: ResidueTriple = [0.0; 3];

/// A lossy codec between internal coordinates and their quantized form.
///
/// Implementations must be pure: the output depends only on the argument and the
/// compressor's immutable configuration.
pub trait CoordinateCompressor {
    fn config(&self) -> &CompressorConfig;

    fn compress(
        &self,
        coordinates: &InternalCoordinateSet,
    ) -> Result<CompressedCoordinateSet, CompressionError>;

    fn decompress(
        &self,
        compressed: &CompressedCoordinateSet,
    ) -> Result<InternalCoordinateSet, CompressionError>;

    /// `decompress(compress(coordinates))`.
    fn round_trip(
        &self,
        coordinates: &InternalCoordinateSet,
    ) -> Result<InternalCoordinateSet, CompressionError> {
        self.decompress(&self.compress(coordinates)?)
    }
}

/// Quantizes bond lengths and bond angles as deviations from an idealized backbone and
/// dihedrals directly over their natural range.
///
/// The ghost residue's placeholder components are replaced by their baseline (zero
/// deviation, zero torsion) before quantization, so they never trip the out-of-range
/// policy and decode to canonical geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct NaiveCompressor {
    config: CompressorConfig,
    ideal: IdealGeometry,
}

impl NaiveCompressor {
    pub fn new(config: CompressorConfig, ideal: IdealGeometry) -> Self {
        Self { config, ideal }
    }

    /// Builds a compressor from a class-keyed mapping, failing if any class is missing.
    pub fn from_specs(
        specs: HashMap<CoordinateClass, QuantizationSpec>,
        ideal: IdealGeometry,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(CompressorConfig::from_map(specs)?, ideal))
    }

    pub fn ideal_geometry(&self) -> &IdealGeometry {
        &self.ideal
    }

    fn quantize(
        &self,
        class: CoordinateClass,
        values: &[ResidueTriple],
        baseline: &ResidueTriple,
        ghost: &[usize],
    ) -> Result<Vec<i64>, CompressionError> {
        let deviations = deviations(values, baseline, ghost);
        BitQuantizer::discretize_all(&deviations, self.config.spec(class))
            .map_err(|source| CompressionError::Quantization { class, source })
    }
}

impl CoordinateCompressor for NaiveCompressor {
    fn config(&self) -> &CompressorConfig {
        &self.config
    }

    fn compress(
        &self,
        coordinates: &InternalCoordinateSet,
    ) -> Result<CompressedCoordinateSet, CompressionError> {
        let residues = coordinates.residue_count().ok_or_else(|| {
            let (lengths, angles, dihedrals) = coordinates.class_lengths();
            CompressionError::ShapeMismatch {
                lengths,
                angles,
                dihedrals,
            }
        })?;
        trace!(residues, "Compressing internal coordinates.");

        Ok(CompressedCoordinateSet {
            quantized_lengths: self.quantize(
                CoordinateClass::Lengths,
                &coordinates.bond_lengths,
                &self.ideal.bond_lengths,
                GHOST_LENGTHS,
            )?,
            quantized_angles: self.quantize(
                CoordinateClass::Angles,
                &coordinates.bond_angles,
                &self.ideal.bond_angles,
                GHOST_ANGLES,
            )?,
            quantized_dihedrals: self.quantize(
                CoordinateClass::Dihedrals,
                &coordinates.dihedrals,
                &NO_BASELINE,
                GHOST_DIHEDRALS,
            )?,
            length_spec: *self.config.lengths(),
            angle_spec: *self.config.angles(),
            dihedral_spec: *self.config.dihedrals(),
            reference_geometry: self.ideal,
        })
    }

    /// Decodes with the specs and reference geometry carried by `compressed`.
    fn decompress(
        &self,
        compressed: &CompressedCoordinateSet,
    ) -> Result<InternalCoordinateSet, CompressionError> {
        let residues = compressed
            .residue_count()
            .ok_or(CompressionError::ShapeMismatch {
                lengths: compressed.quantized_lengths.len(),
                angles: compressed.quantized_angles.len(),
                dihedrals: compressed.quantized_dihedrals.len(),
            })?;
        if compressed.length_spec != *self.config.lengths()
            || compressed.angle_spec != *self.config.angles()
            || compressed.dihedral_spec != *self.config.dihedrals()
        {
            debug!("Compressed set carries specs that differ from this compressor's config.");
        }
        trace!(residues, "Decompressing internal coordinates.");

        let decode = |class: CoordinateClass| {
            BitQuantizer::decode_all(compressed.codes(class), compressed.spec(class))
                .map_err(|source| CompressionError::Quantization { class, source })
        };
        let geometry = &compressed.reference_geometry;

        Ok(InternalCoordinateSet {
            bond_lengths: regroup(&decode(CoordinateClass::Lengths)?, &geometry.bond_lengths),
            bond_angles: regroup(&decode(CoordinateClass::Angles)?, &geometry.bond_angles),
            dihedrals: regroup(&decode(CoordinateClass::Dihedrals)?, &NO_BASELINE),
        })
    }
}

/// Flattens residue triples into deviations from `baseline`, zeroing the ghost placeholders.
fn deviations(values: &[ResidueTriple], baseline: &ResidueTriple, ghost: &[usize]) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .flat_map(|(residue, triple)| {
            (0..COMPONENTS_PER_RESIDUE).map(move |k| {
                if residue == GHOST_RESIDUE && ghost.contains(&k) {
                    0.0
                } else {
                    triple[k] - baseline[k]
                }
            })
        })
        .collect()
}

fn regroup(values: &[f64], baseline: &ResidueTriple) -> Vec<ResidueTriple> {
    values
        .iter()
        .tuples()
        .map(|(a, b, c)| [a + baseline[0], b + baseline[1], c + baseline[2]])
        .collect()
}
