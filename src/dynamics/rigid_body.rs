use crate::math::{Isometry, Matrix, Point, Real, Vector};

/// The subset of a rigid-body's state read by the joint constraint.
///
/// This is the interface boundary with the rigid-body collaborator: mass
/// properties and velocities are owned and integrated elsewhere, the
/// constraint only reads them. The [`position`](Self::position) isometry is
/// the center-of-mass transform of the body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBody {
    /// The center-of-mass transform of this body (rotation + translation).
    pub position: Isometry,
    /// The linear velocity of this body.
    pub linvel: Vector,
    /// The angular velocity of this body.
    pub angvel: Vector,
    /// The inverse mass of this body. Zero for a body with infinite mass.
    pub inv_mass: Real,
    /// The world-space inverse angular inertia tensor of this body.
    pub world_inv_inertia: Matrix,
    /// The local-space inverse angular inertia diagonal of this body.
    pub inv_inertia_local_diag: Vector,
}

impl RigidBody {
    /// A body with infinite mass and inertia, unaffected by impulses.
    pub fn fixed(position: Isometry) -> Self {
        Self {
            position,
            linvel: na::zero(),
            angvel: na::zero(),
            inv_mass: 0.0,
            world_inv_inertia: Matrix::zeros(),
            inv_inertia_local_diag: na::zero(),
        }
    }

    /// A dynamic body at rest, with its world-space inverse inertia tensor
    /// derived from the given local diagonal and the body's orientation.
    pub fn dynamic(position: Isometry, inv_mass: Real, inv_inertia_local_diag: Vector) -> Self {
        let mut result = Self {
            position,
            linvel: na::zero(),
            angvel: na::zero(),
            inv_mass,
            world_inv_inertia: Matrix::zeros(),
            inv_inertia_local_diag,
        };
        result.update_world_inv_inertia();
        result
    }

    /// The world-space center of mass of this body.
    #[inline]
    pub fn center_of_mass(&self) -> Point {
        Point::from(self.position.translation.vector)
    }

    /// Recomputes the world-space inverse inertia tensor from the local
    /// diagonal and the current orientation. Must be called after the body's
    /// orientation changed.
    pub fn update_world_inv_inertia(&mut self) {
        let rot = self.position.rotation.to_rotation_matrix().into_inner();
        self.world_inv_inertia =
            rot * Matrix::from_diagonal(&self.inv_inertia_local_diag) * rot.transpose();
    }
}
