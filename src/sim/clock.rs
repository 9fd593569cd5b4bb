//! Frame clock: turns display-frame timestamps into simulation steps

/// Converts monotonically increasing frame timestamps (milliseconds) into a
/// clamped delta time in seconds
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Forget the previous timestamp so the next frame yields dt = 0
    /// (used when a round starts after sitting idle).
    pub fn restart(&mut self) {
        self.last_ms = None;
    }

    /// Delta since the previous frame, clamped to `[0, max_dt]`
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }
}
