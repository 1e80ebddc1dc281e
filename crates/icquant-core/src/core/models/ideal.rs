use super::coordinates::ResidueTriple;

// Engh & Huber (1991) backbone parameters.
const PEPTIDE_BOND_LENGTH: f64 = 1.329;
const N_CA_BOND_LENGTH: f64 = 1.458;
const CA_C_BOND_LENGTH: f64 = 1.525;
const CA_C_N_ANGLE_DEGREES: f64 = 116.2;
const C_N_CA_ANGLE_DEGREES: f64 = 121.7;
const N_CA_C_ANGLE_DEGREES: f64 = 111.2;

/// Canonical backbone bond lengths (Å) and bond angles (radians) per bond type.
///
/// Component order matches [`super::coordinates::InternalCoordinateSet`], so the
/// deviation of residue `i` is simply `bond_lengths[i][k] - self.bond_lengths[k]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealGeometry {
    pub bond_lengths: ResidueTriple,
    pub bond_angles: ResidueTriple,
}

impl IdealGeometry {
    pub fn new(bond_lengths: ResidueTriple, bond_angles: ResidueTriple) -> Self {
        Self {
            bond_lengths,
            bond_angles,
        }
    }

    pub fn from_degrees(bond_lengths: ResidueTriple, bond_angles_degrees: ResidueTriple) -> Self {
        Self::new(bond_lengths, bond_angles_degrees.map(f64::to_radians))
    }
}

impl Default for IdealGeometry {
    fn default() -> Self {
        Self::from_degrees(
            [PEPTIDE_BOND_LENGTH, N_CA_BOND_LENGTH, CA_C_BOND_LENGTH],
            [
                CA_C_N_ANGLE_DEGREES,
                C_N_CA_ANGLE_DEGREES,
                N_CA_C_ANGLE_DEGREES,
            ],
        )
    }
}
