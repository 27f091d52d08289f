//! Target and live transform state with per-tick easing.
//!
//! The live transform chases the target at a fixed rate every render tick,
//! regardless of whether the target came from a gesture sample or the idle
//! drift. Keeping the integrator slower than input smoothing but faster than
//! idle drift gives the three-tier smoothing cascade the viewer relies on.

use super::mapping::lerp;

/// Easing rate from live transform toward the target, per render tick.
pub const EASE_RATE: f32 = 0.08;

/// Idle autorotation added to the target yaw each tick with no hand.
pub const IDLE_SPIN: f32 = 0.002;

/// Easing rate of pitch/scale back to neutral while idle.
pub const IDLE_RETURN_RATE: f32 = 0.02;

/// Continuous spin of the cloud overlay, independent of gesture state.
pub const CLOUD_SPIN: f32 = 0.0006;

/// The desired object pose, written by the gesture mapper or the idle drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetTransform {
    pub yaw: f32,
    pub pitch: f32,
    pub scale: f32,
}

impl Default for TargetTransform {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            scale: 1.0,
        }
    }
}

impl TargetTransform {
    /// Idle drift: slow constant spin, pitch and scale easing back to
    /// neutral. Runs once per render tick while no hand is detected.
    pub fn drift_idle(&mut self) {
        self.yaw += IDLE_SPIN;
        self.pitch = lerp(self.pitch, 0.0, IDLE_RETURN_RATE);
        self.scale = lerp(self.scale, 1.0, IDLE_RETURN_RATE);
    }
}

/// The pose actually applied to the rendered content. Only the per-tick
/// integrator writes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveTransform {
    pub yaw: f32,
    pub pitch: f32,
    pub scale: f32,
}

impl Default for LiveTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveTransform {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            scale: 1.0,
        }
    }

    /// Eases each channel toward the target. Called once per render tick.
    pub fn ease_toward(&mut self, target: &TargetTransform) {
        self.yaw = lerp(self.yaw, target.yaw, EASE_RATE);
        self.pitch = lerp(self.pitch, target.pitch, EASE_RATE);
        self.scale = lerp(self.scale, target.scale, EASE_RATE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_drift_spins_yaw_monotonically() {
        let mut target = TargetTransform {
            yaw: 1.0,
            pitch: 0.4,
            scale: 1.6,
        };
        let mut previous = target.yaw;
        for _ in 0..100 {
            target.drift_idle();
            assert!((target.yaw - previous - IDLE_SPIN).abs() < 1e-7);
            previous = target.yaw;
        }
    }

    #[test]
    fn idle_drift_returns_pitch_and_scale_to_neutral() {
        let mut target = TargetTransform {
            yaw: 0.0,
            pitch: -0.9,
            scale: 1.8,
        };
        for _ in 0..600 {
            target.drift_idle();
        }
        assert!(target.pitch.abs() < 1e-3);
        assert!((target.scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn live_transform_converges_on_steady_target() {
        let target = TargetTransform {
            yaw: 0.0,
            pitch: 0.0,
            scale: 1.275,
        };
        let mut live = LiveTransform::new();
        live.yaw = 1.2;
        live.pitch = -0.5;
        for _ in 0..300 {
            live.ease_toward(&target);
        }
        assert!(live.yaw.abs() < 1e-3);
        assert!(live.pitch.abs() < 1e-3);
        assert!((live.scale - 1.275).abs() < 1e-3);
    }

    #[test]
    fn easing_moves_a_fixed_fraction_per_tick() {
        let target = TargetTransform {
            yaw: 1.0,
            pitch: 0.0,
            scale: 1.0,
        };
        let mut live = LiveTransform::new();
        live.ease_toward(&target);
        assert!((live.yaw - EASE_RATE).abs() < 1e-6);
    }
}
