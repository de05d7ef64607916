use crate::config::config::BlinkConfig;

/// Monostable blink debouncer over the eye aspect ratio.
///
/// Fires when the EAR drops below the threshold while no blink sits within
/// the cooldown window, then stays refractory until the cooldown elapses. It
/// does not wait for the EAR to rise above the threshold before re-arming;
/// only the timer matters.
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    threshold: f32,
    cooldown_ms: f64,
    last_blink_ms: Option<f64>,
}

impl BlinkDetector {
    pub fn new(config: BlinkConfig) -> Self {
        BlinkDetector {
            threshold: config.threshold,
            cooldown_ms: config.cooldown_ms,
            last_blink_ms: None,
        }
    }

    /// detect feeds one EAR sample and reports whether a blink fired.
    /// Timestamps come from the caller, so the detector works at any frame
    /// cadence, including irregular ones.
    ///
    /// # Arguments
    /// * `ear` - averaged eye aspect ratio for the frame
    /// * `now_ms` - caller-supplied timestamp in milliseconds
    ///
    /// # Returns
    /// * `bool`
    pub fn detect(&mut self, ear: f32, now_ms: f64) -> bool {
        let armed = match self.last_blink_ms {
            None => true,
            Some(last) => now_ms - last > self.cooldown_ms,
        };
        if ear < self.threshold && armed {
            self.last_blink_ms = Some(now_ms);
            return true;
        }
        false
    }

    /// reset clears the last blink so the next low EAR fires immediately,
    /// used on session restart.
    pub fn reset(&mut self) {
        self.last_blink_ms = None;
    }
}
