use super::ideal::IdealGeometry;
use crate::core::quantization::spec::QuantizationSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three components of one coordinate class for one residue.
pub type ResidueTriple = [f64; 3];

/// Number of components per residue in every coordinate class.
pub const COMPONENTS_PER_RESIDUE: usize = 3;

// Component indices within `bond_lengths[i]`.
pub const PEPTIDE_BOND: usize = 0;
pub const N_CA_BOND: usize = 1;
pub const CA_C_BOND: usize = 2;

// Component indices within `bond_angles[i]`.
pub const CA_C_N_ANGLE: usize = 0;
pub const C_N_CA_ANGLE: usize = 1;
pub const N_CA_C_ANGLE: usize = 2;

// Component indices within `dihedrals[i]`.
pub const PHI: usize = 0;
pub const OMEGA: usize = 1;
pub const PSI: usize = 2;

/// Index of the synthetic first residue whose incoming geometry is a placeholder.
pub const GHOST_RESIDUE: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateClass {
    Lengths,
    Angles,
    Dihedrals,
}

impl CoordinateClass {
    pub const ALL: [CoordinateClass; 3] = [
        CoordinateClass::Lengths,
        CoordinateClass::Angles,
        CoordinateClass::Dihedrals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateClass::Lengths => "lengths",
            CoordinateClass::Angles => "angles",
            CoordinateClass::Dihedrals => "dihedrals",
        }
    }
}

impl fmt::Display for CoordinateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backbone geometry of one chain as bond lengths (Å), bond angles and dihedrals (radians).
///
/// The three sequences are indexed by residue in chain order and must share the same
/// length. Construction does not enforce this; consumers check it with
/// [`InternalCoordinateSet::residue_count`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InternalCoordinateSet {
    pub bond_lengths: Vec<ResidueTriple>,
    pub bond_angles: Vec<ResidueTriple>,
    pub dihedrals: Vec<ResidueTriple>,
}

impl InternalCoordinateSet {
    pub fn new(
        bond_lengths: Vec<ResidueTriple>,
        bond_angles: Vec<ResidueTriple>,
        dihedrals: Vec<ResidueTriple>,
    ) -> Self {
        Self {
            bond_lengths,
            bond_angles,
            dihedrals,
        }
    }

    /// Returns the shared residue count, or `None` if the classes disagree.
    pub fn residue_count(&self) -> Option<usize> {
        let n = self.bond_lengths.len();
        (self.bond_angles.len() == n && self.dihedrals.len() == n).then_some(n)
    }

    /// Lengths of the three sequences, in `lengths, angles, dihedrals` order.
    pub fn class_lengths(&self) -> (usize, usize, usize) {
        (
            self.bond_lengths.len(),
            self.bond_angles.len(),
            self.dihedrals.len(),
        )
    }

    pub fn class(&self, class: CoordinateClass) -> &[ResidueTriple] {
        match class {
            CoordinateClass::Lengths => &self.bond_lengths,
            CoordinateClass::Angles => &self.bond_angles,
            CoordinateClass::Dihedrals => &self.dihedrals,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bond_lengths.is_empty() && self.bond_angles.is_empty() && self.dihedrals.is_empty()
    }
}

/// Quantized codes of one structure together with everything needed to decode them.
///
/// Each code vector is flattened residue-major, three codes per residue. The specs and
/// the reference geometry travel with the codes; decoding with anything else is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedCoordinateSet {
    pub quantized_lengths: Vec<i64>,
    pub quantized_angles: Vec<i64>,
    pub quantized_dihedrals: Vec<i64>,
    pub length_spec: QuantizationSpec,
    pub angle_spec: QuantizationSpec,
    pub dihedral_spec: QuantizationSpec,
    /// Baseline that length and angle codes are deviations from.
    pub reference_geometry: IdealGeometry,
}

impl CompressedCoordinateSet {
    pub fn spec(&self, class: CoordinateClass) -> &QuantizationSpec {
        match class {
            CoordinateClass::Lengths => &self.length_spec,
            CoordinateClass::Angles => &self.angle_spec,
            CoordinateClass::Dihedrals => &self.dihedral_spec,
        }
    }

    pub fn codes(&self, class: CoordinateClass) -> &[i64] {
        match class {
            CoordinateClass::Lengths => &self.quantized_lengths,
            CoordinateClass::Angles => &self.quantized_angles,
            CoordinateClass::Dihedrals => &self.quantized_dihedrals,
        }
    }

    /// Returns the residue count, or `None` if the code vectors are not all
    /// the same length or are not a whole number of residues.
    pub fn residue_count(&self) -> Option<usize> {
        let n = self.quantized_lengths.len();
        let consistent = self.quantized_angles.len() == n
            && self.quantized_dihedrals.len() == n
            && n % COMPONENTS_PER_RESIDUE == 0;
        consistent.then_some(n / COMPONENTS_PER_RESIDUE)
    }

    /// Payload size in bits, excluding the specs.
    pub fn payload_bits(&self) -> u64 {
        CoordinateClass::ALL
            .iter()
            .map(|&class| self.codes(class).len() as u64 * self.spec(class).bits() as u64)
            .sum()
    }
}
