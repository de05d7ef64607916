use nalgebra::Vector2;
use tracing::debug;

use crate::config::config::{GazeConfig, GazeStrategy, PHI};
use crate::modules::field::dome;
use crate::utils::landmark::LANDMARK_COUNT;

/// Landmark indices describing one eye in the external face mesh topology.
///
/// The two instances below are fixed by the detector and never derived at
/// runtime.
#[derive(Debug, Clone, Copy)]
pub struct EyeSpec {
    pub pupil: usize,
    pub corner1: usize,
    pub corner2: usize,
    pub upper: usize,
    pub lower: usize,
    pub iris_ring: [usize; 4],
}

pub const RIGHT_EYE: EyeSpec = EyeSpec {
    pupil: 468,
    corner1: 33,
    corner2: 133,
    upper: 159,
    lower: 145,
    iris_ring: [469, 470, 471, 472],
};

pub const LEFT_EYE: EyeSpec = EyeSpec {
    pupil: 473,
    corner1: 263,
    corner2: 362,
    upper: 386,
    lower: 374,
    iris_ring: [474, 475, 476, 477],
};

/// Index pairs for the eye aspect ratio: two vertical lid gaps and the
/// horizontal corner span.
#[derive(Debug, Clone, Copy)]
pub struct EarSpec {
    pub vertical: [(usize, usize); 2],
    pub horizontal: (usize, usize),
}

pub const RIGHT_EYE_EAR: EarSpec = EarSpec {
    vertical: [(159, 145), (158, 153)],
    horizontal: (33, 133),
};

pub const LEFT_EYE_EAR: EarSpec = EarSpec {
    vertical: [(386, 374), (385, 380)],
    horizontal: (362, 263),
};

/// Normalized iris displacement of one eye plus its absolute iris center.
#[derive(Debug, Clone, Copy)]
pub struct EyeOffset {
    pub x: f32,
    pub y: f32,
    pub ix: f32,
    pub iy: f32,
}

#[inline]
fn point(buf: &[f32], i: usize) -> Vector2<f32> {
    Vector2::new(buf[2 * i], buf[2 * i + 1])
}

#[inline]
fn span(buf: &[f32], pair: (usize, usize)) -> f32 {
    (point(buf, pair.0) - point(buf, pair.1)).norm()
}

/// eye_center computes the centroid of the corner and eyelid landmarks,
/// approximating the socket position independent of where the iris sits.
pub fn eye_center(buf: &[f32], eye: &EyeSpec) -> Vector2<f32> {
    (point(buf, eye.corner1) + point(buf, eye.corner2) + point(buf, eye.upper)
        + point(buf, eye.lower))
        * 0.25
}

/// eye_radius computes the characteristic eye size as the mean distance from
/// the eye center to the corner and eyelid landmarks, scaled by phi^3.
/// A degenerate zero radius is clamped to 1.
pub fn eye_radius(buf: &[f32], center: &Vector2<f32>, eye: &EyeSpec) -> f32 {
    let d1 = (point(buf, eye.corner1) - center).norm();
    let d2 = (point(buf, eye.corner2) - center).norm();
    let d3 = (point(buf, eye.upper) - center).norm();
    let d4 = (point(buf, eye.lower) - center).norm();
    let radius = (d1 + d2 + d3 + d4) * 0.25 * PHI.powi(3);
    if radius == 0.0 {
        debug!("degenerate eye radius, clamping to 1");
        1.0
    } else {
        radius
    }
}

/// iris_center blends the pupil landmark with the mean of the iris ring,
/// damping single-landmark jitter while keeping the pupil dominant.
pub fn iris_center(buf: &[f32], eye: &EyeSpec, pupil_weight: f32, ring_weight: f32) -> Vector2<f32> {
    let pupil = point(buf, eye.pupil);
    let mut ring = Vector2::zeros();
    for &i in eye.iris_ring.iter() {
        ring += point(buf, i);
    }
    ring /= eye.iris_ring.len() as f32;
    pupil * pupil_weight + ring * ring_weight
}

/// normalized_eye_offset maps one eye's iris displacement into a
/// dimensionless, eye-radius-scaled coordinate.
///
/// With the `DepthProxy` strategy the offset is additionally divided by the
/// dome value at that offset, amplifying displacements near the edge of the
/// visual field; `VectorField` defers the nonlinearity to the field stage.
///
/// # Arguments
/// * `buf` - flat interleaved landmark coordinates
/// * `eye` - per-eye landmark table
/// * `config` - gaze tunables
///
/// # Returns
/// * `EyeOffset`
pub fn normalized_eye_offset(buf: &[f32], eye: &EyeSpec, config: &GazeConfig) -> EyeOffset {
    let center = eye_center(buf, eye);
    let radius = eye_radius(buf, &center, eye);
    let iris = iris_center(buf, eye, config.pupil_weight, config.ring_weight);

    let scale = radius / (PHI * PHI);
    let x_norm = (iris.x - center.x) / scale;
    let y_norm = (iris.y - center.y) / scale;

    match config.strategy {
        GazeStrategy::DepthProxy => {
            let mut envelope = dome(x_norm, y_norm, config.dome_k);
            if envelope == 0.0 {
                debug!("dome value underflowed to zero, clamping to 1");
                envelope = 1.0;
            }
            EyeOffset {
                x: x_norm / envelope,
                y: y_norm / envelope,
                ix: iris.x,
                iy: iris.y,
            }
        }
        GazeStrategy::VectorField => EyeOffset {
            x: x_norm,
            y: y_norm,
            ix: iris.x,
            iy: iris.y,
        },
    }
}

/// eye_aspect_ratio computes the openness ratio for one eye: the mean of two
/// vertical lid gaps over the horizontal corner span. A zero corner span is
/// clamped to 1.
pub fn eye_aspect_ratio(buf: &[f32], ear: &EarSpec) -> f32 {
    let v1 = span(buf, ear.vertical[0]);
    let v2 = span(buf, ear.vertical[1]);
    let mut h = span(buf, ear.horizontal);
    if h == 0.0 {
        debug!("degenerate eye corner span, clamping to 1");
        h = 1.0;
    }
    (v1 + v2) / (2.0 * h)
}

/// averaged_ear computes the mean eye aspect ratio over both eyes from a flat
/// landmark buffer.
///
/// # Arguments
/// * `buf` - flat interleaved landmark coordinates of a full mesh frame
///
/// # Returns
/// * `Option<f32>` - None when the buffer holds fewer than 478 landmarks
pub fn averaged_ear(buf: &[f32]) -> Option<f32> {
    if buf.len() < 2 * LANDMARK_COUNT {
        return None;
    }
    let right = eye_aspect_ratio(buf, &RIGHT_EYE_EAR);
    let left = eye_aspect_ratio(buf, &LEFT_EYE_EAR);
    Some((right + left) / 2.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::config::config::{GazeConfig, GazeStrategy, PHI};
    use crate::helper::eye_helper::{
        averaged_ear, eye_aspect_ratio, eye_center, eye_radius, iris_center,
        normalized_eye_offset, EyeSpec, LEFT_EYE, RIGHT_EYE, RIGHT_EYE_EAR,
    };
    use crate::utils::landmark::LANDMARK_COUNT;

    fn set(buf: &mut [f32], i: usize, x: f32, y: f32) {
        buf[2 * i] = x;
        buf[2 * i + 1] = y;
    }

    /// Flat buffer with a right eye box centered at (0.35, 0.40) and the iris
    /// shifted by `shift` from the box center. All other points sit at 0.5.
    fn right_eye_frame(shift: (f32, f32)) -> Vec<f32> {
        let mut buf = vec![0.5f32; 2 * LANDMARK_COUNT];
        set(&mut buf, 33, 0.30, 0.40);
        set(&mut buf, 133, 0.40, 0.40);
        set(&mut buf, 159, 0.35, 0.38);
        set(&mut buf, 145, 0.35, 0.42);
        set(&mut buf, 158, 0.37, 0.385);
        set(&mut buf, 153, 0.37, 0.415);
        let (px, py) = (0.35 + shift.0, 0.40 + shift.1);
        set(&mut buf, 468, px, py);
        set(&mut buf, 469, px + 0.01, py);
        set(&mut buf, 470, px, py + 0.01);
        set(&mut buf, 471, px - 0.01, py);
        set(&mut buf, 472, px, py - 0.01);
        buf
    }

    #[test]
    fn test_eye_center_is_four_point_centroid() {
        let buf = right_eye_frame((0.0, 0.0));
        let center = eye_center(&buf, &RIGHT_EYE);
        assert_relative_eq!(center.x, 0.35, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.40, epsilon = 1e-6);
    }

    #[test]
    fn test_eye_radius_scaled_by_phi_cubed() {
        let buf = right_eye_frame((0.0, 0.0));
        let center = eye_center(&buf, &RIGHT_EYE);
        // Distances: corners 0.05 each, lids 0.02 each, mean 0.035
        let expected = 0.035 * PHI.powi(3);
        assert_relative_eq!(eye_radius(&buf, &center, &RIGHT_EYE), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_eye_radius_degenerate_clamps_to_one() {
        // Every eye landmark collapsed onto a single point
        let mut buf = vec![0.5f32; 2 * LANDMARK_COUNT];
        for i in [33usize, 133, 159, 145, 468, 469, 470, 471, 472] {
            set(&mut buf, i, 0.35, 0.40);
        }
        let center = eye_center(&buf, &RIGHT_EYE);
        assert_relative_eq!(eye_radius(&buf, &center, &RIGHT_EYE), 1.0);
    }

    #[test]
    fn test_iris_center_blend() {
        let buf = right_eye_frame((0.01, 0.0));
        // Ring is symmetric around the pupil, so the blend lands on it
        let iris = iris_center(&buf, &RIGHT_EYE, 0.6, 0.4);
        assert_relative_eq!(iris.x, 0.36, epsilon = 1e-6);
        assert_relative_eq!(iris.y, 0.40, epsilon = 1e-6);
    }

    #[test]
    fn test_normalized_offset_centered_iris_is_zero() {
        let buf = right_eye_frame((0.0, 0.0));
        let config = GazeConfig::new();
        let offset = normalized_eye_offset(&buf, &RIGHT_EYE, &config);
        assert_relative_eq!(offset.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(offset.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(offset.ix, 0.35, epsilon = 1e-6);
        assert_relative_eq!(offset.iy, 0.40, epsilon = 1e-6);
    }

    #[test]
    fn test_normalized_offset_scales_with_eye_radius() {
        let buf = right_eye_frame((0.01, 0.0));
        let config = GazeConfig::new();
        let offset = normalized_eye_offset(&buf, &RIGHT_EYE, &config);
        // scale = radius / phi^2 = 0.035 * phi, shift 0.01
        let expected = 0.01 / (0.035 * PHI);
        assert_relative_eq!(offset.x, expected, epsilon = 1e-5);
        assert_relative_eq!(offset.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_depth_proxy_variant_amplifies_offset() {
        let buf = right_eye_frame((0.02, 0.01));
        let linear = normalized_eye_offset(&buf, &RIGHT_EYE, &GazeConfig::new());
        let rescaled = normalized_eye_offset(
            &buf,
            &RIGHT_EYE,
            &GazeConfig {
                strategy: GazeStrategy::DepthProxy,
                ..GazeConfig::new()
            },
        );
        // Positive dome decay means dividing by a value below 1
        assert!(rescaled.x.abs() > linear.x.abs());
        assert!(rescaled.y.abs() > linear.y.abs());
        assert_relative_eq!(rescaled.ix, linear.ix);
        assert_relative_eq!(rescaled.iy, linear.iy);
    }

    #[test]
    fn test_eye_spec_tables_match_mesh_topology() {
        let EyeSpec { pupil, corner1, .. } = RIGHT_EYE;
        assert_eq!(pupil, 468);
        assert_eq!(corner1, 33);
        assert_eq!(LEFT_EYE.pupil, 473);
        assert_eq!(LEFT_EYE.iris_ring, [474, 475, 476, 477]);
    }

    #[test]
    fn test_eye_aspect_ratio_fixture() {
        let buf = right_eye_frame((0.0, 0.0));
        // Lid gaps 0.04 and 0.03, corner span 0.10
        let expected = (0.04 + 0.03) / (2.0 * 0.10);
        assert_relative_eq!(eye_aspect_ratio(&buf, &RIGHT_EYE_EAR), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_averaged_ear_short_buffer_is_none() {
        let buf = vec![0.5f32; 2 * (LANDMARK_COUNT - 1)];
        assert!(averaged_ear(&buf).is_none());
    }

    #[test]
    fn test_averaged_ear_means_both_eyes() {
        let buf = right_eye_frame((0.0, 0.0));
        // Left eye landmarks all sit at 0.5: zero gaps over a zero span
        // clamped to 1, so the left EAR contributes 0.
        let right = eye_aspect_ratio(&buf, &RIGHT_EYE_EAR);
        assert_relative_eq!(averaged_ear(&buf).unwrap(), right / 2.0, epsilon = 1e-6);
    }
}
