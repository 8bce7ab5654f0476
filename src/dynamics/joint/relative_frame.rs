use crate::dynamics::RigidBody;
use crate::math::{Isometry, Matrix, Point, Real, Vector, ANG_DIM};

#[cfg(feature = "f32")]
pub(crate) use std::f32::consts::FRAC_PI_2;
#[cfg(feature = "f64")]
pub(crate) use std::f64::consts::FRAC_PI_2;

/// Decomposes a rotation matrix into an XYZ Euler-angle triple `(x, y, z)`
/// such that `mat == Rx(x) * Ry(y) * Rz(z)`, i.e. under the convention
///
/// ```text
/// rot =  cy*cz          -cy*sz           sy
///        cz*sx*sy+cx*sz  cx*cz-sx*sy*sz -cy*sx
///       -cx*cz*sy+sx*sz  cz*sx+cx*sy*sz  cx*cy
/// ```
///
/// Returns `false` on the gimbal-lock branches (`|sin(y)| >= 1`), where only
/// the sum (resp. difference) of `x` and `z` is determined: `z` is then pinned
/// to zero and `y` to `±90°`. The branch structure and the sign/element
/// choices below match the constraint axes computed by
/// [`RelativeFrames::update`]; reordering them destabilizes the constraint at
/// or near gimbal lock.
pub fn matrix_to_euler_xyz(mat: &Matrix, xyz: &mut Vector) -> bool {
    let r02 = mat[(0, 2)];
    if r02 < 1.0 {
        if r02 > -1.0 {
            xyz.x = (-mat[(1, 2)]).atan2(mat[(2, 2)]);
            xyz.y = r02.asin();
            xyz.z = (-mat[(0, 1)]).atan2(mat[(0, 0)]);
            true
        } else {
            // Not unique: x - z = -atan2(r10, r11).
            xyz.x = -mat[(1, 0)].atan2(mat[(1, 1)]);
            xyz.y = -FRAC_PI_2;
            xyz.z = 0.0;
            false
        }
    } else {
        // Not unique: x + z = atan2(r10, r11).
        xyz.x = mat[(1, 0)].atan2(mat[(1, 1)]);
        xyz.y = FRAC_PI_2;
        xyz.z = 0.0;
        false
    }
}

/// The per-step world-space geometry of a 6-DoF joint: the two world frames,
/// the relative-rotation Euler decomposition, the three angular constraint
/// axes and the shared anchor point.
///
/// Everything here is transient: it is recomputed from the bodies' current
/// transforms at the start of each solver step and never persisted.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RelativeFrames {
    /// World frame A: body A's transform composed with the joint's local frame A.
    pub frame_a: Isometry,
    /// World frame B: body B's transform composed with the joint's local frame B.
    pub frame_b: Isometry,
    /// The relative rotation `frame_a⁻¹ · frame_b` decomposed into XYZ Euler angles.
    pub euler_angles: Vector,
    /// `false` when the decomposition hit a gimbal-lock branch.
    pub euler_unique: bool,
    /// The three angular constraint axes.
    ///
    /// In Euler-angle mode the angular velocity difference is not actually
    /// constrained along `frame_a`'s and `frame_b`'s own basis vectors for
    /// angles 0 and 2 (although it is for angle 1):
    ///
    /// ```text
    /// to get              constrain w2-w1 along    ...not
    /// ------              ---------------------    ------
    /// d(angle[0])/dt = 0  axes[1] x axis2          axis0
    /// d(angle[1])/dt = 0  axes[1]
    /// d(angle[2])/dt = 0  axis0 x axes[1]          axis2
    /// ```
    ///
    /// Only the middle angular DoF is exactly rate-constrained by its own
    /// axis; this is a documented property of the decoupling, not a defect.
    pub axes: [Vector; ANG_DIM],
    /// The shared world-space application point of the linear constraint
    /// impulses, blended from the two frame origins by the inverse masses.
    pub anchor: Point,
}

impl Default for RelativeFrames {
    fn default() -> Self {
        Self {
            frame_a: Isometry::identity(),
            frame_b: Isometry::identity(),
            euler_angles: na::zero(),
            euler_unique: true,
            axes: [Vector::x(), Vector::y(), Vector::z()],
            anchor: Point::origin(),
        }
    }
}

impl RelativeFrames {
    /// Refreshes every derived quantity from the bodies' current transforms.
    pub fn update(
        &mut self,
        local_frame_a: &Isometry,
        local_frame_b: &Isometry,
        rb_a: &RigidBody,
        rb_b: &RigidBody,
    ) {
        self.frame_a = rb_a.position * local_frame_a;
        self.frame_b = rb_b.position * local_frame_b;

        let basis_a = self.frame_a.rotation.to_rotation_matrix().into_inner();
        let basis_b = self.frame_b.rotation.to_rotation_matrix().into_inner();

        let relative = basis_a.transpose() * basis_b;
        self.euler_unique = matrix_to_euler_xyz(&relative, &mut self.euler_angles);

        let axis0 = basis_b.column(0).into_owned();
        let axis2 = basis_a.column(2).into_owned();

        self.axes[1] = axis2.cross(&axis0);
        self.axes[0] = self.axes[1].cross(&axis2);
        self.axes[2] = axis0.cross(&self.axes[1]);

        self.update_anchor(rb_a.inv_mass, rb_b.inv_mass);
    }

    fn update_anchor(&mut self, inv_mass_a: Real, inv_mass_b: Real) {
        let weight = if inv_mass_b == 0.0 {
            1.0
        } else {
            inv_mass_a / (inv_mass_a + inv_mass_b)
        };
        let origin_a = self.frame_a.translation.vector;
        let origin_b = self.frame_b.translation.vector;
        self.anchor = Point::from(origin_a * weight + origin_b * (1.0 - weight));
    }
}

#[cfg(test)]
mod test {
    use super::{matrix_to_euler_xyz, RelativeFrames, FRAC_PI_2};
    use crate::dynamics::RigidBody;
    use crate::math::{Isometry, Matrix, Point, Real, Vector};
    use approx::assert_relative_eq;

    fn euler_xyz_matrix(x: Real, y: Real, z: Real) -> Matrix {
        let rx = na::Rotation3::from_axis_angle(&Vector::x_axis(), x);
        let ry = na::Rotation3::from_axis_angle(&Vector::y_axis(), y);
        let rz = na::Rotation3::from_axis_angle(&Vector::z_axis(), z);
        (rx * ry * rz).into_inner()
    }

    #[test]
    fn euler_round_trip_away_from_gimbal_lock() {
        let angles = [-1.2, -0.6, -0.1, 0.0, 0.3, 0.9, 1.4];
        for &x in &angles {
            for &y in &angles {
                for &z in &angles {
                    let mat = euler_xyz_matrix(x, y, z);
                    let mut xyz = Vector::zeros();
                    assert!(matrix_to_euler_xyz(&mat, &mut xyz));
                    let rebuilt = euler_xyz_matrix(xyz.x, xyz.y, xyz.z);
                    assert_relative_eq!(mat, rebuilt, epsilon = 1.0e-4);
                }
            }
        }
    }

    #[test]
    fn euler_gimbal_lock_positive() {
        let x = 0.7;
        let z = 0.4;
        let mut mat = euler_xyz_matrix(x, FRAC_PI_2, z);
        // Pin the singular entry exactly.
        mat[(0, 2)] = 1.0;

        let mut xyz = Vector::zeros();
        assert!(!matrix_to_euler_xyz(&mat, &mut xyz));
        assert_relative_eq!(xyz.y, FRAC_PI_2);
        assert_eq!(xyz.z, 0.0);
        // Only x + z is determined; it is reported entirely through x.
        assert_relative_eq!(xyz.x, x + z, epsilon = 1.0e-5);
    }

    #[test]
    fn euler_gimbal_lock_negative() {
        let x = 0.7;
        let z = 0.4;
        let mut mat = euler_xyz_matrix(x, -FRAC_PI_2, z);
        mat[(0, 2)] = -1.0;

        let mut xyz = Vector::zeros();
        assert!(!matrix_to_euler_xyz(&mat, &mut xyz));
        assert_relative_eq!(xyz.y, -FRAC_PI_2);
        assert_eq!(xyz.z, 0.0);
        // Only x - z is determined; it is reported entirely through x.
        assert_relative_eq!(xyz.x, x - z, epsilon = 1.0e-5);
    }

    #[test]
    fn anchor_favors_frame_a_against_a_fixed_body() {
        let rb_a = RigidBody::dynamic(
            Isometry::translation(1.0, 0.0, 0.0),
            2.0,
            Vector::new(1.0, 1.0, 1.0),
        );
        let rb_b = RigidBody::fixed(Isometry::translation(5.0, 0.0, 0.0));

        let mut frames = RelativeFrames::default();
        frames.update(&Isometry::identity(), &Isometry::identity(), &rb_a, &rb_b);
        assert_relative_eq!(frames.anchor, Point::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn anchor_is_the_midpoint_for_equal_masses() {
        let rb_a = RigidBody::dynamic(
            Isometry::translation(1.0, 0.0, 0.0),
            2.0,
            Vector::new(1.0, 1.0, 1.0),
        );
        let rb_b = RigidBody::dynamic(
            Isometry::translation(5.0, 2.0, 0.0),
            2.0,
            Vector::new(1.0, 1.0, 1.0),
        );

        let mut frames = RelativeFrames::default();
        frames.update(&Isometry::identity(), &Isometry::identity(), &rb_a, &rb_b);
        assert_relative_eq!(frames.anchor, Point::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn middle_axis_is_orthogonal_to_its_neighbors() {
        let rb_a = RigidBody::dynamic(
            Isometry::rotation(Vector::new(0.3, 0.0, 0.1)),
            1.0,
            Vector::new(1.0, 1.0, 1.0),
        );
        let rb_b = RigidBody::dynamic(
            Isometry::rotation(Vector::new(0.0, 0.4, -0.2)),
            1.0,
            Vector::new(1.0, 1.0, 1.0),
        );

        let mut frames = RelativeFrames::default();
        frames.update(&Isometry::identity(), &Isometry::identity(), &rb_a, &rb_b);

        assert_relative_eq!(frames.axes[1].dot(&frames.axes[0]), 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(frames.axes[1].dot(&frames.axes[2]), 0.0, epsilon = 1.0e-5);
    }
}
