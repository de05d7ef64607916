use serde::{Deserialize, Serialize};

/// Square root of five, the base for the derived gaze constants.
pub const SQ5: f32 = 2.236_068;

/// Golden ratio.
pub const PHI: f32 = (1.0 + SQ5) / 2.0;

/// Radial decay constant derived from the golden ratio, (3*sqrt(5) - 7) / 2.
pub const DOME_K: f32 = (3.0 * SQ5 - 7.0) / 2.0;

/// Strategy for deriving the final gaze vector from the per-eye offsets.
///
/// `DepthProxy` rescales each eye offset through the dome envelope and reports
/// a scalar centeredness proxy as z, so x and y stay the smoothed 2D signal.
/// `VectorField` keeps the offsets linear and maps them through a decaying
/// exponential field to a full 3D unit direction. The two variants are not
/// equivalent and are never mixed within one pipeline instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GazeStrategy {
    DepthProxy,
    VectorField,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GazeConfig {
    pub strategy: GazeStrategy,
    /// Smoothing coefficient of the temporal filter, in (0, 1].
    pub alpha: f32,
    /// Reflect the gaze origin horizontally for selfie-mirrored hosts.
    pub mirror_x: bool,
    /// Decay constant fed to the dome envelope.
    pub dome_k: f32,
    /// Decay parameter of the 3D gaze field.
    pub field_decay: f32,
    pub pupil_weight: f32,
    pub ring_weight: f32,
}

impl GazeConfig {
    pub fn new() -> Self {
        GazeConfig {
            strategy: GazeStrategy::VectorField,
            alpha: 0.20,
            mirror_x: false,
            dome_k: PHI,
            field_decay: 1.681,
            pupil_weight: 0.6,
            ring_weight: 0.4,
        }
    }
}

impl Default for GazeConfig {
    fn default() -> Self {
        GazeConfig::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlinkConfig {
    /// Eye aspect ratio below which the eyes count as closed.
    pub threshold: f32,
    /// Refractory window between blink events, in milliseconds.
    pub cooldown_ms: f64,
}

impl BlinkConfig {
    pub fn new() -> Self {
        BlinkConfig {
            threshold: 0.21,
            cooldown_ms: 300.0,
        }
    }
}

impl Default for BlinkConfig {
    fn default() -> Self {
        BlinkConfig::new()
    }
}
