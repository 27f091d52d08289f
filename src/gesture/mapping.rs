//! Maps raw landmark samples to target transform parameters.
//!
//! Two smoothing stages live here: raw palm/pinch readings are exponentially
//! smoothed (alpha = 0.35) before being remapped to yaw/pitch/scale targets.
//! The third stage, easing the live transform toward those targets, is in
//! [`motion`](super::motion).

use std::f32::consts::PI;

use super::landmarks::LandmarkFrame;
use super::motion::TargetTransform;

/// Smoothing factor for raw palm and pinch input.
pub const INPUT_ALPHA: f32 = 0.35;

/// Yaw range mapped from palm x across the frame.
pub const MAX_YAW: f32 = PI * 0.6;

/// Pitch range mapped from palm y across the frame.
pub const MAX_PITCH: f32 = PI * 0.35;

/// Pinch distance input range (normalized frame units).
pub const PINCH_NEAR: f32 = 0.04;
pub const PINCH_FAR: f32 = 0.25;

/// Scale output range: fingers together shrink, spread grows.
pub const SCALE_MIN: f32 = 0.75;
pub const SCALE_MAX: f32 = 1.8;

/// Nominal pinch distance used before the first sample arrives.
pub const PINCH_REST: f32 = 0.12;

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Remaps `value` from `[in_min, in_max]` to `[out_min, out_max]`, clamping
/// the input to its range first. The output range may be inverted.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let t = ((value - in_min) / (in_max - in_min)).clamp(0.0, 1.0);
    out_min + (out_max - out_min) * t
}

/// Exponentially smoothed palm position and pinch distance, persisting
/// across detector frames.
#[derive(Clone, Debug)]
pub struct GestureMapper {
    palm_x: f32,
    palm_y: f32,
    pinch: f32,
}

impl Default for GestureMapper {
    fn default() -> Self {
        Self {
            // Frame center, so the first sample eases in from neutral
            palm_x: 0.5,
            palm_y: 0.5,
            pinch: PINCH_REST,
        }
    }
}

impl GestureMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one landmark sample into the smoothed state and writes the
    /// derived yaw/pitch (and, when pinch points are present, scale) targets.
    pub fn apply(&mut self, frame: &LandmarkFrame, target: &mut TargetTransform) {
        if let Some((x, y)) = frame.palm_center() {
            self.palm_x = lerp(self.palm_x, x, INPUT_ALPHA);
            self.palm_y = lerp(self.palm_y, y, INPUT_ALPHA);

            target.yaw = map_range(self.palm_x, 0.0, 1.0, -MAX_YAW, MAX_YAW);
            // Inverted output range: hand up tilts the object up
            target.pitch = map_range(self.palm_y, 0.0, 1.0, MAX_PITCH, -MAX_PITCH);
        }

        // A frame without both tips keeps the previous scale target
        if let Some(pinch) = frame.pinch_distance() {
            self.pinch = lerp(self.pinch, pinch, INPUT_ALPHA);
            target.scale = map_range(self.pinch, PINCH_NEAR, PINCH_FAR, SCALE_MIN, SCALE_MAX);
        }
    }

    /// Smoothed pinch distance, for the UI readout.
    pub fn smoothed_pinch(&self) -> f32 {
        self.pinch
    }
}

#[cfg(test)]
mod tests {
    use super::super::landmarks::{Landmark, INDEX_MCP, INDEX_TIP, PINKY_MCP, THUMB_TIP, WRIST};
    use super::*;

    /// Frame with every anchor at the palm position and tips `pinch` apart.
    fn gesture_frame(palm: (f32, f32), pinch: f32) -> LandmarkFrame {
        let mut frame = LandmarkFrame::default();
        for i in [WRIST, INDEX_MCP, PINKY_MCP] {
            frame.set(i, Landmark::new(palm.0, palm.1));
        }
        frame.set(THUMB_TIP, Landmark::new(0.5, 0.5));
        frame.set(INDEX_TIP, Landmark::new(0.5 + pinch, 0.5));
        frame
    }

    /// Frame with palm anchors only; no fingertips reported.
    fn palm_only_frame(palm: (f32, f32)) -> LandmarkFrame {
        let mut frame = gesture_frame(palm, PINCH_REST);
        frame.clear(THUMB_TIP);
        frame.clear(INDEX_TIP);
        frame
    }

    fn settled_target(palm: (f32, f32), pinch: f32) -> TargetTransform {
        let mut mapper = GestureMapper::new();
        let mut target = TargetTransform::default();
        for _ in 0..200 {
            mapper.apply(&gesture_frame(palm, pinch), &mut target);
        }
        target
    }

    #[test]
    fn yaw_is_clamped_and_monotonic_in_palm_x() {
        let mut previous = f32::NEG_INFINITY;
        for i in 0..=20 {
            let x = i as f32 / 20.0;
            let target = settled_target((x, 0.5), PINCH_REST);
            assert!(target.yaw >= -MAX_YAW - 1e-4 && target.yaw <= MAX_YAW + 1e-4);
            assert!(target.yaw > previous, "yaw not increasing at x={x}");
            previous = target.yaw;
        }
        assert!((settled_target((0.0, 0.5), PINCH_REST).yaw + MAX_YAW).abs() < 1e-3);
        assert!((settled_target((1.0, 0.5), PINCH_REST).yaw - MAX_YAW).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped_and_decreasing_in_palm_y() {
        let mut previous = f32::INFINITY;
        for i in 0..=20 {
            let y = i as f32 / 20.0;
            let target = settled_target((0.5, y), PINCH_REST);
            assert!(target.pitch >= -MAX_PITCH - 1e-4 && target.pitch <= MAX_PITCH + 1e-4);
            assert!(target.pitch < previous, "pitch not decreasing at y={y}");
            previous = target.pitch;
        }
        // Hand at the top of the frame tilts the object up
        assert!((settled_target((0.5, 0.0), PINCH_REST).pitch - MAX_PITCH).abs() < 1e-3);
        assert!((settled_target((0.5, 1.0), PINCH_REST).pitch + MAX_PITCH).abs() < 1e-3);
    }

    #[test]
    fn pinch_maps_to_clamped_scale_range() {
        assert!((settled_target((0.5, 0.5), 0.02).scale - SCALE_MIN).abs() < 1e-3);
        assert!((settled_target((0.5, 0.5), 0.04).scale - SCALE_MIN).abs() < 1e-3);
        assert!((settled_target((0.5, 0.5), 0.25).scale - SCALE_MAX).abs() < 1e-3);
        assert!((settled_target((0.5, 0.5), 0.40).scale - SCALE_MAX).abs() < 1e-3);
        // Midpoint of the input range lands mid-scale
        assert!((settled_target((0.5, 0.5), 0.145).scale - 1.275).abs() < 1e-3);
    }

    #[test]
    fn centered_palm_maps_to_neutral_rotation() {
        let target = settled_target((0.5, 0.5), PINCH_REST);
        assert!(target.yaw.abs() < 1e-3);
        assert!(target.pitch.abs() < 1e-3);
    }

    #[test]
    fn missing_pinch_points_retain_previous_scale() {
        let mut mapper = GestureMapper::new();
        let mut target = TargetTransform::default();
        for _ in 0..100 {
            mapper.apply(&gesture_frame((0.5, 0.5), 0.25), &mut target);
        }
        let wide = target.scale;

        for _ in 0..50 {
            mapper.apply(&palm_only_frame((0.2, 0.5)), &mut target);
        }
        // Rotation kept updating, scale froze
        assert!(target.yaw < -0.1);
        assert!((target.scale - wide).abs() < 1e-6);
    }

    #[test]
    fn smoothing_eases_toward_raw_value() {
        let mut mapper = GestureMapper::new();
        let mut target = TargetTransform::default();
        mapper.apply(&gesture_frame((1.0, 0.5), PINCH_REST), &mut target);
        // One step moves 35% of the way from 0.5 to 1.0
        let expected = map_range(0.675, 0.0, 1.0, -MAX_YAW, MAX_YAW);
        assert!((target.yaw - expected).abs() < 1e-5);
    }
}
