use super::coordinates::{
    CA_C_BOND, CA_C_N_ANGLE, C_N_CA_ANGLE, InternalCoordinateSet, N_CA_BOND, N_CA_C_ANGLE, OMEGA,
    PEPTIDE_BOND, PHI, PSI, ResidueTriple,
};
use crate::core::utils::geometry::{GeometryError, bond_angle, dihedral_angle, place_atom};
use nalgebra::Point3;

const ATOMS_PER_RESIDUE: usize = 3;

/// How Cartesian coordinates are grown from internal coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReconstructionMode {
    /// Place every atom from the three atoms before it, N-terminus to C-terminus.
    #[default]
    Sequential,
}

/// Cartesian N, CA, C coordinates of one chain, residue-major in chain order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackboneChain {
    atoms: Vec<Point3<f64>>,
}

impl BackboneChain {
    pub fn from_atoms(atoms: Vec<Point3<f64>>) -> Result<Self, GeometryError> {
        if atoms.len() % ATOMS_PER_RESIDUE != 0 {
            return Err(GeometryError::IncompleteResidue(atoms.len()));
        }
        Ok(Self { atoms })
    }

    pub fn from_residues(residues: &[[Point3<f64>; 3]]) -> Self {
        Self {
            atoms: residues.iter().flatten().copied().collect(),
        }
    }

    pub fn atoms(&self) -> &[Point3<f64>] {
        &self.atoms
    }

    pub fn residue_count(&self) -> usize {
        self.atoms.len() / ATOMS_PER_RESIDUE
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn n(&self, residue: usize) -> &Point3<f64> {
        &self.atoms[residue * ATOMS_PER_RESIDUE]
    }

    #[inline]
    pub fn ca(&self, residue: usize) -> &Point3<f64> {
        &self.atoms[residue * ATOMS_PER_RESIDUE + 1]
    }

    #[inline]
    pub fn c(&self, residue: usize) -> &Point3<f64> {
        &self.atoms[residue * ATOMS_PER_RESIDUE + 2]
    }

    /// Extracts bond lengths, bond angles and dihedrals.
    ///
    /// Components without a defining atom (the incoming geometry of residue 0 and the
    /// final `psi`) are written as `0.0`.
    pub fn internal_coordinates(&self) -> InternalCoordinateSet {
        let count = self.residue_count();
        let mut set = InternalCoordinateSet {
            bond_lengths: Vec::with_capacity(count),
            bond_angles: Vec::with_capacity(count),
            dihedrals: Vec::with_capacity(count),
        };

        for i in 0..count {
            let (n, ca, c) = (self.n(i), self.ca(i), self.c(i));

            let mut lengths: ResidueTriple = [0.0; 3];
            let mut angles: ResidueTriple = [0.0; 3];
            let mut torsions: ResidueTriple = [0.0; 3];

            lengths[N_CA_BOND] = (ca - n).norm();
            lengths[CA_C_BOND] = (c - ca).norm();
            angles[N_CA_C_ANGLE] = bond_angle(n, ca, c);

            if i > 0 {
                let (prev_ca, prev_c) = (self.ca(i - 1), self.c(i - 1));
                lengths[PEPTIDE_BOND] = (n - prev_c).norm();
                angles[CA_C_N_ANGLE] = bond_angle(prev_ca, prev_c, n);
                angles[C_N_CA_ANGLE] = bond_angle(prev_c, n, ca);
                torsions[PHI] = dihedral_angle(prev_c, n, ca, c);
                torsions[OMEGA] = dihedral_angle(prev_ca, prev_c, n, ca);
            }
            if i + 1 < count {
                torsions[PSI] = dihedral_angle(n, ca, c, self.n(i + 1));
            }

            set.bond_lengths.push(lengths);
            set.bond_angles.push(angles);
            set.dihedrals.push(torsions);
        }
        set
    }

    /// Rebuilds Cartesian coordinates from internal coordinates by NeRF chain growth.
    ///
    /// The first residue is anchored with N at the origin, CA on the +x axis and C in
    /// the xy-plane, so the result lives in an arbitrary frame and must be superposed
    /// before comparing against a reference.
    pub fn from_internal(
        set: &InternalCoordinateSet,
        mode: ReconstructionMode,
    ) -> Result<Self, GeometryError> {
        let count = set.residue_count().ok_or_else(|| {
            let (lengths, angles, dihedrals) = set.class_lengths();
            GeometryError::InconsistentShape {
                lengths,
                angles,
                dihedrals,
            }
        })?;

        match mode {
            ReconstructionMode::Sequential => Ok(Self::grow_sequential(set, count)),
        }
    }

    fn grow_sequential(set: &InternalCoordinateSet, count: usize) -> Self {
        let mut atoms = Vec::with_capacity(count * ATOMS_PER_RESIDUE);
        if count == 0 {
            return Self { atoms };
        }

        let lengths = &set.bond_lengths[0];
        let theta = set.bond_angles[0][N_CA_C_ANGLE];
        let n0 = Point3::origin();
        let ca0 = Point3::new(lengths[N_CA_BOND], 0.0, 0.0);
        let c0 = Point3::new(
            ca0.x - lengths[CA_C_BOND] * theta.cos(),
            lengths[CA_C_BOND] * theta.sin(),
            0.0,
        );
        atoms.extend([n0, ca0, c0]);

        for i in 1..count {
            let base = (i - 1) * ATOMS_PER_RESIDUE;
            let (prev_n, prev_ca, prev_c) = (atoms[base], atoms[base + 1], atoms[base + 2]);
            let lengths = &set.bond_lengths[i];
            let angles = &set.bond_angles[i];

            let n = place_atom(
                &prev_n,
                &prev_ca,
                &prev_c,
                lengths[PEPTIDE_BOND],
                angles[CA_C_N_ANGLE],
                set.dihedrals[i - 1][PSI],
            );
            let ca = place_atom(
                &prev_ca,
                &prev_c,
                &n,
                lengths[N_CA_BOND],
                angles[C_N_CA_ANGLE],
                set.dihedrals[i][OMEGA],
            );
            let c = place_atom(
                &prev_c,
                &n,
                &ca,
                lengths[CA_C_BOND],
                angles[N_CA_C_ANGLE],
                set.dihedrals[i][PHI],
            );
            atoms.extend([n, ca, c]);
        }

        Self { atoms }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::core::models::ideal::IdealGeometry;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Internal coordinates of an alpha helix with idealized bonds, in extractor layout.
    pub(crate) fn ideal_helix(residues: usize) -> InternalCoordinateSet {
        let ideal = IdealGeometry::default();
        let mut set = InternalCoordinateSet::default();
        for i in 0..residues {
            let mut lengths = ideal.bond_lengths;
            let mut angles = ideal.bond_angles;
            let mut torsions = [
                (-57.0f64).to_radians(),
                180.0f64.to_radians(),
                (-47.0f64).to_radians(),
            ];
            if i == 0 {
                lengths[PEPTIDE_BOND] = 0.0;
                angles[CA_C_N_ANGLE] = 0.0;
                angles[C_N_CA_ANGLE] = 0.0;
                torsions[PHI] = 0.0;
                torsions[OMEGA] = 0.0;
            }
            if i + 1 == residues {
                torsions[PSI] = 0.0;
            }
            set.bond_lengths.push(lengths);
            set.bond_angles.push(angles);
            set.dihedrals.push(torsions);
        }
        set
    }

    /// A deterministic, mildly distorted helix backbone.
    pub(crate) fn perturbed_backbone(residues: usize, seed: u64) -> BackboneChain {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut set = ideal_helix(residues);
        for i in 0..residues {
            for k in 0..3 {
                set.bond_lengths[i][k] += rng.gen_range(-0.02..0.02);
                set.bond_angles[i][k] += rng.gen_range(-0.04..0.04);
                set.dihedrals[i][k] += rng.gen_range(-0.3..0.3);
            }
        }
        BackboneChain::from_internal(&set, ReconstructionMode::Sequential).unwrap()
    }
}
