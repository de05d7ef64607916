use tracing::debug;

use crate::helper::eye_helper::EyeOffset;

/// dome evaluates the radial envelope exp(-k * (x^2 + y^2)): 1 at the origin,
/// decaying toward 0 with radius for positive k.
pub fn dome(x: f32, y: f32, k: f32) -> f32 {
    let r2 = x * x + y * y;
    (-k * r2).exp()
}

/// field_x is the x component of the decaying gaze field with decay `d`.
pub fn field_x(x: f32, y: f32, d: f32) -> f32 {
    x * (-((x * x + y * y) / d.powi(4))).exp()
}

/// field_y is the y component of the decaying gaze field with decay `d`.
pub fn field_y(x: f32, y: f32, d: f32) -> f32 {
    y * (-((x * x + y * y) / d.powi(4))).exp()
}

/// field_z is the depth component of the decaying gaze field with decay `d`.
pub fn field_z(x: f32, y: f32, d: f32) -> f32 {
    (x * (-((y * y) / d.powi(4))).exp() - y * (-((y * y) / d.powi(4))).exp())
        * (-((x * x) / d.powi(4))).exp()
}

/// depth_proxy collapses both eyes' dome values into a scalar measure of how
/// frontal the combined gaze is: 2 for a perfectly centered gaze, falling off
/// as either iris moves toward the eye corners.
pub fn depth_proxy(left: &EyeOffset, right: &EyeOffset, k: f32) -> f32 {
    (dome(left.x, left.y, k).powi(2) + dome(right.x, right.y, k).powi(2)).abs()
}

/// unit_gaze_vector averages the per-eye field components and normalizes the
/// result to unit length. A zero norm is clamped to 1.
///
/// # Arguments
/// * `left` - left eye normalized offset
/// * `right` - right eye normalized offset
/// * `d` - field decay parameter
///
/// # Returns
/// * `(f32, f32, f32)` - unit gaze direction
pub fn unit_gaze_vector(left: &EyeOffset, right: &EyeOffset, d: f32) -> (f32, f32, f32) {
    let gx = 0.5 * (field_x(left.x, left.y, d) + field_x(right.x, right.y, d));
    let gy = 0.5 * (field_y(left.x, left.y, d) + field_y(right.x, right.y, d));
    let gz = 0.5 * (field_z(left.x, left.y, d) + field_z(right.x, right.y, d));

    let mut norm = (gx * gx + gy * gy + gz * gz).sqrt();
    if norm == 0.0 {
        debug!("zero gaze field norm, clamping to 1");
        norm = 1.0;
    }
    (gx / norm, gy / norm, gz / norm)
}
