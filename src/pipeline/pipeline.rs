use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::config::config::{GazeConfig, GazeStrategy};
use crate::helper::eye_helper::{normalized_eye_offset, EyeOffset, LEFT_EYE, RIGHT_EYE};
use crate::modules::field::{depth_proxy, unit_gaze_vector};
use crate::modules::sector::{apply_bias, bias_from_theta};
use crate::modules::smoother::Smoother;
use crate::utils::landmark::{Landmark, LandmarkBuffer, LANDMARK_COUNT};

/// Per-frame gaze estimate.
///
/// `x`, `y`, `z` carry the strategy-dependent direction; `theta_deg`,
/// `radius` and `bias_deg` describe the smoothed, bias-corrected 2D signal
/// used for angular classification. The two groups come from different stages
/// and are not interchangeable. `ox`, `oy` is the gaze origin (midpoint of
/// the iris centers); `lx`, `ly` and `rx`, `ry` are the per-eye iris centers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GazeResult {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub theta_deg: f32,
    pub radius: f32,
    pub bias_deg: f32,
    pub ox: f32,
    pub oy: f32,
    pub lx: f32,
    pub ly: f32,
    pub rx: f32,
    pub ry: f32,
}

/// Landmark-to-gaze pipeline. Owns all per-session mutable state: the
/// flattening scratch buffer and the temporal smoother. Independent sessions
/// use independent instances.
#[derive(Debug, Clone)]
pub struct GazePipeline {
    config: GazeConfig,
    smoother: Smoother,
    buffer: LandmarkBuffer,
}

impl GazePipeline {
    /// new initializes new instance of the gaze pipeline.
    pub fn new(config: GazeConfig) -> Self {
        let smoother = Smoother::new(config.alpha);
        GazePipeline {
            config,
            smoother,
            buffer: LandmarkBuffer::new(),
        }
    }

    /// process runs one frame of landmarks through the pipeline.
    ///
    /// A short landmark set yields None without touching any state; the face
    /// being out of frame is an expected per-frame outcome, not an error.
    ///
    /// # Arguments
    /// * `landmarks` - ordered landmark set from the external face mesh
    ///
    /// # Returns
    /// * `Option<GazeResult>`
    pub fn process(&mut self, landmarks: &[Landmark]) -> Option<GazeResult> {
        if landmarks.len() < LANDMARK_COUNT {
            return None;
        }
        self.buffer.flatten(landmarks);
        let left = normalized_eye_offset(self.buffer.as_slice(), &LEFT_EYE, &self.config);
        let right = normalized_eye_offset(self.buffer.as_slice(), &RIGHT_EYE, &self.config);
        Some(self.combine(left, right))
    }

    /// process_flat runs one frame from an already flattened buffer of `n`
    /// landmarks, skipping the copy into the scratch buffer.
    ///
    /// # Arguments
    /// * `buf` - interleaved x,y coordinates, at least `2 * n` long
    /// * `n` - number of landmarks in the buffer
    ///
    /// # Returns
    /// * `Option<GazeResult>`
    pub fn process_flat(&mut self, buf: &[f32], n: usize) -> Option<GazeResult> {
        if n < LANDMARK_COUNT || buf.len() < 2 * n {
            return None;
        }
        let left = normalized_eye_offset(buf, &LEFT_EYE, &self.config);
        let right = normalized_eye_offset(buf, &RIGHT_EYE, &self.config);
        Some(self.combine(left, right))
    }

    /// process_array runs one frame from an `(n, 2)` landmark array.
    pub fn process_array(&mut self, landmarks: &ArrayView2<f32>) -> Option<GazeResult> {
        if landmarks.nrows() < LANDMARK_COUNT {
            return None;
        }
        self.buffer.flatten_array(landmarks);
        let left = normalized_eye_offset(self.buffer.as_slice(), &LEFT_EYE, &self.config);
        let right = normalized_eye_offset(self.buffer.as_slice(), &RIGHT_EYE, &self.config);
        Some(self.combine(left, right))
    }

    fn combine(&mut self, left: EyeOffset, right: EyeOffset) -> GazeResult {
        let mean_x = 0.5 * (left.x + right.x);
        let mean_y = 0.5 * (left.y + right.y);

        let theta_deg = mean_y.atan2(mean_x).to_degrees();
        let bias_deg = bias_from_theta(theta_deg);
        let (bx, by) = apply_bias(mean_x, mean_y, bias_deg);
        let (gx, gy) = self.smoother.update(bx, by);
        let radius = gx.hypot(gy);

        let (x, y, z) = match self.config.strategy {
            GazeStrategy::DepthProxy => (gx, gy, depth_proxy(&left, &right, self.config.dome_k)),
            GazeStrategy::VectorField => {
                unit_gaze_vector(&left, &right, self.config.field_decay)
            }
        };

        let mut ox = 0.5 * (left.ix + right.ix);
        let oy = 0.5 * (left.iy + right.iy);
        if self.config.mirror_x {
            ox = 1.0 - ox;
        }

        GazeResult {
            x,
            y,
            z,
            theta_deg,
            radius,
            bias_deg,
            ox,
            oy,
            lx: left.ix,
            ly: left.iy,
            rx: right.ix,
            ry: right.iy,
        }
    }

    /// reset clears the smoothing history and releases the scratch buffer,
    /// used when a tracking session ends.
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.buffer.reset();
    }

    /// buffer_bytes reports the scratch memory currently retained.
    pub fn buffer_bytes(&self) -> usize {
        self.buffer.capacity_bytes()
    }

    pub fn config(&self) -> &GazeConfig {
        &self.config
    }
}
