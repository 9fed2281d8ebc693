use crate::Error;
use glam::{Quat, Vec3};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Order in which the three single-axis rotations are multiplied.
///
/// `Xyz` composes as `Rx * Ry * Rz`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum AxisOrder {
    #[default]
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl AxisOrder {
    pub const ALL: [AxisOrder; 6] = [
        AxisOrder::Xyz,
        AxisOrder::Xzy,
        AxisOrder::Yxz,
        AxisOrder::Yzx,
        AxisOrder::Zxy,
        AxisOrder::Zyx,
    ];

    pub fn axes(self) -> [Axis; 3] {
        match self {
            Self::Xyz => [Axis::X, Axis::Y, Axis::Z],
            Self::Xzy => [Axis::X, Axis::Z, Axis::Y],
            Self::Yxz => [Axis::Y, Axis::X, Axis::Z],
            Self::Yzx => [Axis::Y, Axis::Z, Axis::X],
            Self::Zxy => [Axis::Z, Axis::X, Axis::Y],
            Self::Zyx => [Axis::Z, Axis::Y, Axis::X],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xyz => "XYZ",
            Self::Xzy => "XZY",
            Self::Yxz => "YXZ",
            Self::Yzx => "YZX",
            Self::Zxy => "ZXY",
            Self::Zyx => "ZYX",
        }
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidValue {
                message: format!("unknown axis order '{s}'"),
            })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i8", into = "i8")
)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    pub fn value(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

impl TryFrom<i8> for Sign {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Positive),
            -1 => Ok(Self::Negative),
            other => Err(Error::InvalidValue {
                message: format!("axis sign must be 1 or -1, got {other}"),
            }),
        }
    }
}

impl From<Sign> for i8 {
    fn from(sign: Sign) -> Self {
        match sign {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }
}

/// How source Euler channels become a quaternion.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RotationMapping {
    pub order: AxisOrder,
    pub sign_x: Sign,
    pub sign_y: Sign,
    pub sign_z: Sign,
}

impl RotationMapping {
    pub fn new(order: AxisOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn with_signs(mut self, x: Sign, y: Sign, z: Sign) -> Self {
        self.sign_x = x;
        self.sign_y = y;
        self.sign_z = z;
        self
    }

    /// Converts X/Y/Z angles in degrees into one rotation.
    pub fn to_quat(&self, degrees: Vec3) -> Quat {
        let qx = Quat::from_rotation_x((self.sign_x.value() * degrees.x).to_radians());
        let qy = Quat::from_rotation_y((self.sign_y.value() * degrees.y).to_radians());
        let qz = Quat::from_rotation_z((self.sign_z.value() * degrees.z).to_radians());

        self.order
            .axes()
            .into_iter()
            .map(|axis| match axis {
                Axis::X => qx,
                Axis::Y => qy,
                Axis::Z => qz,
            })
            .fold(Quat::IDENTITY, |acc, q| acc * q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn same_orientation(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() >= 1.0 - 1.0e-5
    }

    #[test]
    fn xyz_composes_left_to_right() {
        let mapping = RotationMapping::default();
        let angles = Vec3::new(30.0, 45.0, 60.0);
        let expected = Quat::from_rotation_x(30f32.to_radians())
            * Quat::from_rotation_y(45f32.to_radians())
            * Quat::from_rotation_z(60f32.to_radians());
        assert!(same_orientation(mapping.to_quat(angles), expected));
    }

    #[test]
    fn order_matters_for_two_quarter_turns() {
        let angles = Vec3::new(90.0, 90.0, 0.0);
        let xyz = RotationMapping::new(AxisOrder::Xyz).to_quat(angles);
        let yxz = RotationMapping::new(AxisOrder::Yxz).to_quat(angles);
        assert!(!same_orientation(xyz, yxz));
    }

    #[test]
    fn every_order_differs_for_generic_angles() {
        let angles = Vec3::new(20.0, 35.0, 50.0);
        let quats: Vec<Quat> = AxisOrder::ALL
            .into_iter()
            .map(|order| RotationMapping::new(order).to_quat(angles))
            .collect();
        for i in 0..quats.len() {
            for j in (i + 1)..quats.len() {
                assert!(
                    !same_orientation(quats[i], quats[j]),
                    "{} and {} agree",
                    AxisOrder::ALL[i],
                    AxisOrder::ALL[j]
                );
            }
        }
    }

    #[test]
    fn negative_sign_flips_the_axis() {
        let mapping = RotationMapping::default().with_signs(Sign::Positive, Sign::Negative, Sign::Positive);
        let q = mapping.to_quat(Vec3::new(0.0, 90.0, 0.0));
        assert!(same_orientation(q, Quat::from_rotation_y(-90f32.to_radians())));
    }

    #[test]
    fn axis_order_from_str() {
        assert_eq!("zyx".parse::<AxisOrder>().unwrap(), AxisOrder::Zyx);
        assert_eq!("YXZ".parse::<AxisOrder>().unwrap(), AxisOrder::Yxz);
        assert!("XXY".parse::<AxisOrder>().is_err());
    }

    #[test]
    fn sign_from_int() {
        assert_eq!(Sign::try_from(-1).unwrap(), Sign::Negative);
        assert_eq!(i8::from(Sign::Positive), 1);
        assert!(Sign::try_from(0).is_err());
    }
}
