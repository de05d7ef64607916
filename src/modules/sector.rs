use nalgebra::{Rotation2, Vector2};

/// Angular sectors of the combined gaze angle that carry a systematic
/// vertical skew. Each band includes its upper edge: -135 degrees falls in
/// `LowerLeft` and 0 degrees in `LowerRight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasSector {
    /// theta in (-180, -135]
    LowerLeft,
    /// theta in (-45, 0]
    LowerRight,
    /// No correction applies.
    Neutral,
}

impl BiasSector {
    /// from_theta_deg classifies a gaze angle in degrees.
    pub fn from_theta_deg(theta_deg: f32) -> Self {
        if theta_deg > -180.0 && theta_deg <= -135.0 {
            BiasSector::LowerLeft
        } else if theta_deg > -45.0 && theta_deg <= 0.0 {
            BiasSector::LowerRight
        } else {
            BiasSector::Neutral
        }
    }
}

/// bias_from_theta returns the corrective rotation in degrees for a gaze
/// angle: theta + 90 inside the two skewed sectors, zero elsewhere.
pub fn bias_from_theta(theta_deg: f32) -> f32 {
    match BiasSector::from_theta_deg(theta_deg) {
        BiasSector::LowerLeft | BiasSector::LowerRight => theta_deg + 90.0,
        BiasSector::Neutral => 0.0,
    }
}

/// apply_bias rotates the offset by `bias_deg`. A zero bias returns the input
/// untouched so the uncorrected path cannot accumulate rounding drift.
pub fn apply_bias(x: f32, y: f32, bias_deg: f32) -> (f32, f32) {
    if bias_deg == 0.0 {
        return (x, y);
    }
    let rotated = Rotation2::new(bias_deg.to_radians()) * Vector2::new(x, y);
    (rotated.x, rotated.y)
}

/// Coarse screen region a gaze angle points at, for hosts that map the
/// direction onto on-screen targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GazeQuadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl GazeQuadrant {
    /// from_theta_deg classifies a gaze angle, or None when the angle points
    /// outside all four regions. Bands are checked in a fixed order so the
    /// shared -45 degree edge resolves to TopRight.
    pub fn from_theta_deg(theta_deg: f32) -> Option<Self> {
        if theta_deg < -105.0 && theta_deg > -135.0 {
            Some(GazeQuadrant::TopLeft)
        } else if theta_deg > -70.0 && theta_deg <= -45.0 {
            Some(GazeQuadrant::TopRight)
        } else if theta_deg <= -135.0 && theta_deg >= -180.0 {
            Some(GazeQuadrant::BottomLeft)
        } else if theta_deg <= 0.0 && theta_deg >= -45.0 {
            Some(GazeQuadrant::BottomRight)
        } else {
            None
        }
    }
}
