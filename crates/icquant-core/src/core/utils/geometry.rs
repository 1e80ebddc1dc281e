use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Coordinate arrays have different lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),

    #[error("Not enough atoms for superposition (need at least 3, got {0})")]
    TooFewAtoms(usize),

    #[error("Backbone atom count {0} is not a multiple of 3 (N, CA, C per residue)")]
    IncompleteResidue(usize),

    #[error(
        "Internal coordinate arrays disagree on residue count: {lengths} lengths, {angles} angles, {dihedrals} dihedrals"
    )]
    InconsistentShape {
        lengths: usize,
        angles: usize,
        dihedrals: usize,
    },

    #[error("SVD failed to produce singular vectors")]
    SvdFailed,
}

/// Angle at `b` formed by `a-b-c`, in radians.
pub fn bond_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    (a - b).angle(&(c - b))
}

/// Signed torsion about the `p1-p2` bond, in radians within `[-π, π]`.
pub fn dihedral_angle(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> f64 {
    let b1 = p1 - p0;
    let b2 = p2 - p1;
    let b3 = p3 - p2;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    y.atan2(x)
}

/// Natural Extension Reference Frame placement.
///
/// Returns the point `d` such that `|c-d| = bond_length`, the angle `b-c-d` equals
/// `bond_angle` and the dihedral `a-b-c-d` equals `torsion`. The three anchors must
/// not be collinear.
pub fn place_atom(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    bond_length: f64,
    bond_angle: f64,
    torsion: f64,
) -> Point3<f64> {
    let bc = (c - b).normalize();
    let n = (b - a).cross(&bc).normalize();
    let m = n.cross(&bc);

    let local = Vector3::new(
        -bond_length * bond_angle.cos(),
        bond_length * bond_angle.sin() * torsion.cos(),
        bond_length * bond_angle.sin() * torsion.sin(),
    );
    let frame = Matrix3::from_columns(&[bc, m, n]);

    c + frame * local
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// Best-fit rigid transform mapping a mobile point set onto a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
    /// RMSD between the transformed mobile set and the target.
    pub rmsd: f64,
}

impl Superposition {
    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    pub fn apply_all(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.apply(p)).collect()
    }
}

fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Point3::from(sum / points.len() as f64)
}

/// Kabsch superposition of `mobile` onto `target`, with reflection correction.
pub fn superpose(
    mobile: &[Point3<f64>],
    target: &[Point3<f64>],
) -> Result<Superposition, GeometryError> {
    if mobile.len() != target.len() {
        return Err(GeometryError::LengthMismatch(mobile.len(), target.len()));
    }
    if mobile.len() < 3 {
        return Err(GeometryError::TooFewAtoms(mobile.len()));
    }

    let mobile_center = centroid(mobile);
    let target_center = centroid(target);

    let covariance: Matrix3<f64> = mobile
        .iter()
        .zip(target.iter())
        .map(|(p, q)| (p - mobile_center) * (q - target_center).transpose())
        .sum();

    let svd = covariance.svd(true, true);
    let u = svd.u.ok_or(GeometryError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(GeometryError::SvdFailed)?;

    let mut correction = Matrix3::identity();
    if (v_t.transpose() * u.transpose()).determinant() < 0.0 {
        correction[(2, 2)] = -1.0;
    }
    let rotation = Rotation3::from_matrix_unchecked(v_t.transpose() * correction * u.transpose());
    let translation = target_center.coords - rotation * mobile_center.coords;

    let mut superposition = Superposition {
        rotation,
        translation,
        rmsd: 0.0,
    };
    let moved = superposition.apply_all(mobile);
    superposition.rmsd = calculate_rmsd(&moved, target).ok_or(GeometryError::TooFewAtoms(0))?;

    Ok(superposition)
}
