bitflags::bitflags! {
    /// A bit mask identifying multiple degrees of freedom of a joint.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
    #[repr(transparent)]
    pub struct JointAxesMask: u8 {
        /// The translational degree of freedom along the local X axis.
        const LIN_X = 1 << 0;
        /// The translational degree of freedom along the local Y axis.
        const LIN_Y = 1 << 1;
        /// The translational degree of freedom along the local Z axis.
        const LIN_Z = 1 << 2;
        /// The rotational degree of freedom around the X Euler axis.
        const ANG_X = 1 << 3;
        /// The rotational degree of freedom around the Y Euler axis.
        const ANG_Y = 1 << 4;
        /// The rotational degree of freedom around the Z Euler axis.
        const ANG_Z = 1 << 5;
        /// All the translational degrees of freedom.
        const LIN_AXES = Self::LIN_X.bits() | Self::LIN_Y.bits() | Self::LIN_Z.bits();
        /// All the rotational degrees of freedom.
        const ANG_AXES = Self::ANG_X.bits() | Self::ANG_Y.bits() | Self::ANG_Z.bits();
    }
}

/// One of the six degrees of freedom of a joint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum JointAxis {
    /// The translational degree of freedom along the local X axis.
    LinX = 0,
    /// The translational degree of freedom along the local Y axis.
    LinY,
    /// The translational degree of freedom along the local Z axis.
    LinZ,
    /// The rotational degree of freedom around the X Euler axis.
    AngX,
    /// The rotational degree of freedom around the Y Euler axis.
    AngY,
    /// The rotational degree of freedom around the Z Euler axis.
    AngZ,
}

impl JointAxis {
    /// Is this one of the three rotational degrees of freedom?
    pub fn is_angular(self) -> bool {
        (self as usize) >= 3
    }

    /// The index of this axis within its translational or rotational triple.
    pub fn local_index(self) -> usize {
        (self as usize) % 3
    }
}

impl From<JointAxis> for JointAxesMask {
    fn from(axis: JointAxis) -> Self {
        JointAxesMask::from_bits(1 << axis as usize).unwrap()
    }
}
