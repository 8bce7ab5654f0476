//! Elementary mathematical entities (vectors, matrices, isometries, etc).

/// The scalar type used throughout this crate.
#[cfg(feature = "f32")]
pub type Real = f32;
/// The scalar type used throughout this crate.
#[cfg(feature = "f64")]
pub type Real = f64;

/// The dimension of the ambient space.
pub const DIM: usize = 3;
/// The number of rotational degrees of freedom of a rigid-body.
pub const ANG_DIM: usize = 3;
/// The maximum number of possible rotations and translations of a rigid-body.
pub const SPATIAL_DIM: usize = 6;

/// The vector type.
pub type Vector = na::Vector3<Real>;
/// The angular vector type.
pub type AngVector = na::Vector3<Real>;
/// The point type.
pub type Point = na::Point3<Real>;
/// The 3×3 matrix type.
pub type Matrix = na::Matrix3<Real>;
/// The transformation matrix type (rotation + translation).
pub type Isometry = na::Isometry3<Real>;
/// The rotation type.
pub type Rotation = na::UnitQuaternion<Real>;
/// The unit vector type.
pub type UnitVector = na::UnitVector3<Real>;
