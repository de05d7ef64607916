use anyhow::Error;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Number of points the external face mesh produces per frame.
pub const LANDMARK_COUNT: usize = 478;

/// A single 2D facial keypoint in normalized image coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// Reusable scratch buffer for flattened landmark coordinates.
///
/// One allocation grows monotonically across frames so that flattening a
/// landmark set does not allocate on the steady-state path. Owned by exactly
/// one pipeline instance.
#[derive(Debug, Clone, Default)]
pub struct LandmarkBuffer {
    buf: Vec<f32>,
}

impl LandmarkBuffer {
    pub fn new() -> Self {
        LandmarkBuffer { buf: Vec::new() }
    }

    /// ensure grows the buffer to hold at least `n` values. Never shrinks.
    pub fn ensure(&mut self, n: usize) {
        if self.buf.len() < n {
            self.buf.resize(n, 0.0);
        }
    }

    /// reset releases the allocation, used when a tracking session ends.
    pub fn reset(&mut self) {
        self.buf = Vec::new();
    }

    /// flatten interleaves the landmark coordinates into the scratch buffer
    /// and returns the filled prefix of length `2 * landmarks.len()`.
    pub fn flatten(&mut self, landmarks: &[Landmark]) -> &[f32] {
        let need = landmarks.len() * 2;
        self.ensure(need);
        for (i, lm) in landmarks.iter().enumerate() {
            self.buf[2 * i] = lm.x;
            self.buf[2 * i + 1] = lm.y;
        }
        &self.buf[..need]
    }

    /// flatten_array does the same for an `(n, 2)` coordinate array.
    pub fn flatten_array(&mut self, landmarks: &ArrayView2<f32>) -> &[f32] {
        let need = landmarks.nrows() * 2;
        self.ensure(need);
        for (i, row) in landmarks.rows().into_iter().enumerate() {
            self.buf[2 * i] = row[0];
            self.buf[2 * i + 1] = row[1];
        }
        &self.buf[..need]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.buf
    }

    /// capacity_bytes reports how much scratch memory is currently retained.
    pub fn capacity_bytes(&self) -> usize {
        self.buf.capacity() * std::mem::size_of::<f32>()
    }
}

/// landmarks_from_json parses a recorded landmark frame.
///
/// # Arguments
/// * `raw` - JSON array of `{"x": .., "y": ..}` objects
///
/// # Returns
/// * `Result<Vec<Landmark>, Error>`
pub fn landmarks_from_json(raw: &str) -> Result<Vec<Landmark>, Error> {
    let landmarks: Vec<Landmark> = serde_json::from_str(raw)?;
    Ok(landmarks)
}
