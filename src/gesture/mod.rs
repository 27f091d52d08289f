//! Gesture interpretation: landmark samples in, smoothed object pose out.
//!
//! [`GestureContext`] is the single piece of state shared between the two
//! asynchronous paths: the detector callback ([`GestureContext::on_detection`],
//! camera rate) and the render tick ([`GestureContext::tick`], display rate).
//! Both run on the event-loop thread, so no locking is involved; a port to a
//! multi-threaded setup must keep both paths on one logical thread or wrap
//! the context in explicit synchronization.

pub mod landmarks;
pub mod mapping;
pub mod motion;

pub use landmarks::{Landmark, LandmarkFrame};
pub use mapping::GestureMapper;
pub use motion::{LiveTransform, TargetTransform};

/// Shared gesture state: smoothing filters, the target pose and the live
/// pose eased toward it.
#[derive(Clone, Debug, Default)]
pub struct GestureContext {
    mapper: GestureMapper,
    target: TargetTransform,
    live: LiveTransform,
    hand_detected: bool,
}

impl GestureContext {
    pub fn new() -> Self {
        Self {
            mapper: GestureMapper::new(),
            target: TargetTransform::default(),
            live: LiveTransform::new(),
            hand_detected: false,
        }
    }

    /// Detector-rate entry point. `Some` folds the sample into the target
    /// pose; `None` is an explicit absence signal and clears the detected
    /// flag immediately (a single missed frame suffices, no debounce).
    pub fn on_detection(&mut self, result: Option<&LandmarkFrame>) {
        match result {
            Some(frame) => {
                self.hand_detected = true;
                self.mapper.apply(frame, &mut self.target);
            }
            None => {
                self.hand_detected = false;
            }
        }
    }

    /// Render-rate entry point. Applies idle drift to the target when no
    /// hand is detected, then eases the live pose toward the target. The
    /// target is never written by both the gesture path and the drift in
    /// the same tick.
    pub fn tick(&mut self) {
        if !self.hand_detected {
            self.target.drift_idle();
        }
        self.live.ease_toward(&self.target);
    }

    /// Clears the detected flag, e.g. when the camera session stops. The
    /// smoothed palm/pinch state is kept so a restarted session resumes
    /// from where the hand last was instead of easing in from neutral.
    pub fn clear_detection(&mut self) {
        self.hand_detected = false;
    }

    pub fn hand_detected(&self) -> bool {
        self.hand_detected
    }

    /// Smoothed pinch distance while a hand is present.
    pub fn pinch_readout(&self) -> Option<f32> {
        self.hand_detected.then(|| self.mapper.smoothed_pinch())
    }

    pub fn target(&self) -> &TargetTransform {
        &self.target
    }

    pub fn live(&self) -> &LiveTransform {
        &self.live
    }
}

#[cfg(test)]
mod tests {
    use super::landmarks::{INDEX_MCP, INDEX_TIP, PINKY_MCP, THUMB_TIP, WRIST};
    use super::motion::IDLE_SPIN;
    use super::*;

    fn steady_frame(palm: (f32, f32), pinch: f32) -> LandmarkFrame {
        let mut frame = LandmarkFrame::default();
        for i in [WRIST, INDEX_MCP, PINKY_MCP] {
            frame.set(i, Landmark::new(palm.0, palm.1));
        }
        frame.set(THUMB_TIP, Landmark::new(0.5, 0.5));
        frame.set(INDEX_TIP, Landmark::new(0.5 + pinch, 0.5));
        frame
    }

    #[test]
    fn steady_gesture_converges_live_transform() {
        let mut ctx = GestureContext::new();
        let frame = steady_frame((0.5, 0.5), 0.145);
        for _ in 0..500 {
            ctx.on_detection(Some(&frame));
            ctx.tick();
        }
        let live = ctx.live();
        assert!(live.yaw.abs() < 1e-3);
        assert!(live.pitch.abs() < 1e-3);
        assert!((live.scale - 1.275).abs() < 1e-3);
    }

    #[test]
    fn absence_signal_clears_detection_immediately() {
        let mut ctx = GestureContext::new();
        ctx.on_detection(Some(&steady_frame((0.3, 0.3), 0.1)));
        assert!(ctx.hand_detected());
        ctx.on_detection(None);
        assert!(!ctx.hand_detected());
        assert!(ctx.pinch_readout().is_none());
    }

    #[test]
    fn smoothing_state_survives_a_camera_restart() {
        let mut ctx = GestureContext::new();
        let frame = steady_frame((0.5, 0.5), 0.25);
        for _ in 0..200 {
            ctx.on_detection(Some(&frame));
        }
        let settled = ctx.pinch_readout().unwrap();
        assert!((settled - 0.25).abs() < 1e-3);

        ctx.clear_detection();
        assert!(ctx.pinch_readout().is_none());

        // First sample after restart reads near the retained value, not
        // eased up from the neutral rest distance
        ctx.on_detection(Some(&frame));
        let resumed = ctx.pinch_readout().unwrap();
        assert!((resumed - settled).abs() < 1e-3);
    }

    #[test]
    fn idle_ticks_spin_yaw_and_recover_neutral_pose() {
        let mut ctx = GestureContext::new();
        // Park the hand off-center and pinched wide, then lose it
        let frame = steady_frame((0.2, 0.2), 0.25);
        for _ in 0..200 {
            ctx.on_detection(Some(&frame));
            ctx.tick();
        }
        ctx.on_detection(None);

        let mut previous_yaw = ctx.target().yaw;
        for _ in 0..800 {
            ctx.tick();
            let yaw = ctx.target().yaw;
            assert!((yaw - previous_yaw - IDLE_SPIN).abs() < 1e-6);
            previous_yaw = yaw;
        }
        assert!(ctx.target().pitch.abs() < 1e-3);
        assert!((ctx.target().scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn idle_drift_pauses_while_hand_is_held() {
        let mut ctx = GestureContext::new();
        let frame = steady_frame((0.5, 0.5), 0.145);
        ctx.on_detection(Some(&frame));
        let yaw_before = ctx.target().yaw;
        for _ in 0..50 {
            ctx.tick();
        }
        assert!((ctx.target().yaw - yaw_before).abs() < 1e-6);
    }
}
