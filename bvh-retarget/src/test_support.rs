use glam::{Quat, Vec3};

pub(crate) const HIPS_SPINE: &str = "\
HIERARCHY
ROOT Hips
{
  OFFSET 0.0 0.0 0.0
  CHANNELS 6 Xposition Yposition Zposition Xrotation Yrotation Zrotation
  JOINT Spine
  {
    OFFSET 0.0 10.0 0.0
    CHANNELS 3 Xrotation Yrotation Zrotation
    End Site
    {
      OFFSET 0.0 5.0 0.0
    }
  }
}
MOTION
Frames: 1
Frame Time: 0.0333
0 0 0 0 90 0 0 0 0
";

pub(crate) const ARMS: &str = "\
HIERARCHY
ROOT Hips
{
\tOFFSET 1.0 2.0 3.0
\tCHANNELS 6 Xposition Yposition Zposition Xrotation Yrotation Zrotation
\tJOINT Spine
\t{
\t\tOFFSET 0.0 10.0 0.0
\t\tCHANNELS 3 Xrotation Yrotation Zrotation
\t\tJOINT LeftArm
\t\t{
\t\t\tOFFSET 5.0 0.0 0.0
\t\t\tCHANNELS 3 Xrotation Yrotation Zrotation
\t\t\tEnd Site
\t\t\t{
\t\t\t\tOFFSET 4.0 0.0 0.0
\t\t\t}
\t\t}
\t\tJOINT RightArm
\t\t{
\t\t\tOFFSET -5.0 0.0 0.0
\t\t\tCHANNELS 3 Xrotation Yrotation Zrotation
\t\t\tEnd site
\t\t\t{
\t\t\t\tOFFSET -4.0 0.0 0.0
\t\t\t}
\t\t}
\t}
}
MOTION
Frames: 2
Frame Time: 0.5
100 50 200 0 0 0 0 0 0 10 0 0 0 0 30
-100 50 -200 0 45 0 0 0 0 20 0 0 0 0 60
";

pub(crate) fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-4,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

pub(crate) fn assert_vec_approx(actual: Vec3, expected: Vec3) {
    let diff = (actual - expected).length();
    assert!(
        diff <= 1.0e-4,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

/// `q` and `-q` are the same orientation.
pub(crate) fn assert_rotation_approx(actual: Quat, expected: Quat) {
    let dot = actual.normalize().dot(expected.normalize()).abs();
    assert!(
        dot >= 1.0 - 1.0e-5,
        "expected {expected:?}, got {actual:?} (|dot| {dot})"
    );
}

pub(crate) fn degrees(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_rotation_x(x.to_radians())
        * Quat::from_rotation_y(y.to_radians())
        * Quat::from_rotation_z(z.to_radians())
}
