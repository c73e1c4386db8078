/// Joint angle calculation
///
/// The angle at a vertex B is taken between the rays B→A and B→C using the
/// dot product. The cosine is clamped to [-1, 1] before `acos`, because
/// rounding can push it just outside that range for valid inputs.

use crate::models::Keypoint;

/// Interior angle at `b` in degrees, in [0, 180]
///
/// Returns `None` when either ray has zero length or any coordinate is not
/// finite; callers treat that as "not detected".
pub fn angle_between(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Option<f32> {
    let (ba_x, ba_y) = (a.0 - b.0, a.1 - b.1);
    let (bc_x, bc_y) = (c.0 - b.0, c.1 - b.1);

    let dot_product = ba_x * bc_x + ba_y * bc_y;
    let mag_ba = (ba_x * ba_x + ba_y * ba_y).sqrt();
    let mag_bc = (bc_x * bc_x + bc_y * bc_y).sqrt();

    if !(mag_ba.is_finite() && mag_bc.is_finite() && dot_product.is_finite()) {
        return None;
    }
    if mag_ba == 0.0 || mag_bc == 0.0 {
        return None;
    }

    let cos_angle = dot_product / (mag_ba * mag_bc);
    let degrees = cos_angle.clamp(-1.0, 1.0).acos().to_degrees();

    degrees.is_finite().then_some(degrees)
}

/// Angle at keypoint `b` between `a` and `c`
pub fn joint_angle(a: &Keypoint, b: &Keypoint, c: &Keypoint) -> Option<f32> {
    angle_between((a.x, a.y), (b.x, b.y), (c.x, c.y))
}

/// Like [`joint_angle`], but treats low-confidence keypoints as absent
pub fn joint_angle_checked(
    a: &Keypoint,
    b: &Keypoint,
    c: &Keypoint,
    min_confidence: f32,
) -> Option<f32> {
    if [a, b, c].iter().all(|kp| kp.is_detected(min_confidence)) {
        joint_angle(a, b, c)
    } else {
        None
    }
}
