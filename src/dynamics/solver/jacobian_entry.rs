use crate::math::{Matrix, Real, Vector};

/// The cached effective-mass entry for one constraint axis, used by the
/// sequential-impulse path.
///
/// The angular Jacobians are stored in each body's local frame so the
/// effective-mass diagonal can be assembled from the local inverse-inertia
/// diagonals. Entries are plain values recomputed and overwritten at the start
/// of each step; nothing here persists across steps.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct JacobianEntry {
    /// The angular Jacobian of body A, in body A's local frame.
    pub ang_jac_a: Vector,
    /// The angular Jacobian of body B, in body B's local frame.
    pub ang_jac_b: Vector,
    /// `ang_jac_a` premultiplied by body A's local inverse-inertia diagonal.
    pub ii_ang_jac_a: Vector,
    /// `ang_jac_b` premultiplied by body B's local inverse-inertia diagonal.
    pub ii_ang_jac_b: Vector,
    diag: Real,
}

impl JacobianEntry {
    /// Builds the entry for a linear constraint axis applied at `rel_pos_a`/`rel_pos_b`
    /// relative to each body's center of mass.
    ///
    /// `rot_a_t`/`rot_b_t` are the transposed world rotations of the bodies
    /// (i.e. the world → body-local maps).
    pub fn linear(
        rot_a_t: &Matrix,
        rot_b_t: &Matrix,
        rel_pos_a: &Vector,
        rel_pos_b: &Vector,
        axis: &Vector,
        inv_inertia_diag_a: &Vector,
        inv_mass_a: Real,
        inv_inertia_diag_b: &Vector,
        inv_mass_b: Real,
    ) -> Self {
        let ang_jac_a = rot_a_t * rel_pos_a.cross(axis);
        let ang_jac_b = rot_b_t * rel_pos_b.cross(&-axis);
        let ii_ang_jac_a = inv_inertia_diag_a.component_mul(&ang_jac_a);
        let ii_ang_jac_b = inv_inertia_diag_b.component_mul(&ang_jac_b);
        let diag =
            inv_mass_a + ii_ang_jac_a.dot(&ang_jac_a) + inv_mass_b + ii_ang_jac_b.dot(&ang_jac_b);

        Self {
            ang_jac_a,
            ang_jac_b,
            ii_ang_jac_a,
            ii_ang_jac_b,
            diag,
        }
    }

    /// Builds the entry for an angular constraint axis.
    pub fn angular(
        axis: &Vector,
        rot_a_t: &Matrix,
        rot_b_t: &Matrix,
        inv_inertia_diag_a: &Vector,
        inv_inertia_diag_b: &Vector,
    ) -> Self {
        let ang_jac_a = rot_a_t * axis;
        let ang_jac_b = rot_b_t * (-axis);
        let ii_ang_jac_a = inv_inertia_diag_a.component_mul(&ang_jac_a);
        let ii_ang_jac_b = inv_inertia_diag_b.component_mul(&ang_jac_b);
        let diag = ii_ang_jac_a.dot(&ang_jac_a) + ii_ang_jac_b.dot(&ang_jac_b);

        Self {
            ang_jac_a,
            ang_jac_b,
            ii_ang_jac_a,
            ii_ang_jac_b,
            diag,
        }
    }

    /// The effective-mass diagonal of this entry.
    #[inline]
    pub fn diagonal(&self) -> Real {
        self.diag
    }
}
