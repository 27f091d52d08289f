//! Camera session lifecycle.
//!
//! A two-state machine (off/on) around a frame source and a detector. Start
//! failures are reported through the status string and leave the session
//! off; nothing here returns an error to the caller. While on, each render
//! tick runs at most one detector invocation, so a slow detector naturally
//! skips frames instead of queueing work.

use log::{info, warn};

use crate::gesture::GestureContext;

use super::detector::{DetectorConfig, FrameSource, HandDetector};

/// Session state; there is no intermediate "starting" state because the
/// capture request is awaited before the session flips on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    CameraOff,
    CameraOn,
}

pub struct CameraSession {
    source: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    config: DetectorConfig,
    state: SessionState,
    status: String,
}

impl CameraSession {
    pub fn new(source: Box<dyn FrameSource>, detector: Box<dyn HandDetector>) -> Self {
        Self {
            source,
            detector,
            config: DetectorConfig::default(),
            state: SessionState::CameraOff,
            status: "Camera off".to_string(),
        }
    }

    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::CameraOn
    }

    /// Status line for the UI ("Camera off", "Camera on", failure text).
    pub fn status(&self) -> &str {
        &self.status
    }

    /// CameraOff -> CameraOn. Failures leave the session off with a status
    /// string; there are no retries, the user has to toggle again. The
    /// detector is probed before capture is requested, so an unavailable
    /// backend never holds the camera open.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        if let Err(err) = self.detector.configure(&self.config) {
            warn!("detector unavailable: {err}");
            self.status = "Hand tracking unavailable".to_string();
            return;
        }
        self.status = "Requesting access...".to_string();

        match self.source.start() {
            Ok(()) => {
                self.state = SessionState::CameraOn;
                self.status = "Camera on".to_string();
                info!("camera session started");
            }
            Err(err) => {
                warn!("camera start failed: {err}");
                self.status = match err {
                    super::detector::CaptureError::Unsupported => "Camera not supported",
                    _ => "Camera blocked",
                }
                .to_string();
            }
        }
    }

    /// CameraOn -> CameraOff. Stops capture and clears detection state so
    /// the UI drops back to "no hand" and an empty pinch readout.
    pub fn stop(&mut self, ctx: &mut GestureContext) {
        if !self.is_running() {
            return;
        }
        self.source.stop();
        self.state = SessionState::CameraOff;
        self.status = "Camera off".to_string();
        ctx.clear_detection();
        info!("camera session stopped");
    }

    /// Per-render-tick pump: grabs at most one frame and runs at most one
    /// detector invocation, feeding the result into the gesture context.
    /// The running check up front makes results that arrive after `stop`
    /// inert.
    pub fn poll(&mut self, ctx: &mut GestureContext) {
        if !self.is_running() {
            return;
        }

        let Some(frame) = self.source.next_frame() else {
            return;
        };

        match self.detector.detect(&frame) {
            Ok(result) => ctx.on_detection(result.as_ref()),
            Err(err) => {
                // Inference hiccups are dropped frames, not session failures
                warn!("detector error: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::super::detector::{CaptureError, DetectorError, VideoFrame};
    use super::*;
    use crate::gesture::landmarks::{INDEX_MCP, PINKY_MCP, WRIST};
    use crate::gesture::{Landmark, LandmarkFrame};

    fn hand_at(palm: (f32, f32)) -> LandmarkFrame {
        let mut frame = LandmarkFrame::default();
        for i in [WRIST, INDEX_MCP, PINKY_MCP] {
            frame.set(i, Landmark::new(palm.0, palm.1));
        }
        frame
    }

    struct ScriptedSource {
        fail_with: Option<CaptureError>,
        frames: Vec<VideoFrame>,
        started: Rc<Cell<bool>>,
        stopped: Rc<Cell<bool>>,
    }

    impl ScriptedSource {
        fn ok(frame_count: usize) -> Self {
            Self {
                fail_with: None,
                frames: (0..frame_count)
                    .map(|_| VideoFrame::new(4, 4, vec![0; 64]))
                    .collect(),
                started: Rc::new(Cell::new(false)),
                stopped: Rc::new(Cell::new(false)),
            }
        }

        fn failing(err: CaptureError) -> Self {
            let mut source = Self::ok(0);
            source.fail_with = Some(err);
            source
        }
    }

    impl FrameSource for ScriptedSource {
        fn start(&mut self) -> Result<(), CaptureError> {
            match self.fail_with.take() {
                Some(err) => Err(err),
                None => {
                    self.started.set(true);
                    Ok(())
                }
            }
        }

        fn stop(&mut self) {
            self.started.set(false);
            self.stopped.set(true);
        }

        fn next_frame(&mut self) -> Option<VideoFrame> {
            self.frames.pop()
        }
    }

    struct ScriptedDetector {
        unavailable: bool,
        results: Vec<Result<Option<LandmarkFrame>, DetectorError>>,
        invocations: Rc<Cell<u32>>,
    }

    impl ScriptedDetector {
        fn always(frame: Option<LandmarkFrame>) -> Self {
            Self {
                unavailable: false,
                results: (0..64).map(|_| Ok(frame.clone())).collect(),
                invocations: Rc::new(Cell::new(0)),
            }
        }

        fn unavailable() -> Self {
            let mut detector = Self::always(None);
            detector.unavailable = true;
            detector
        }
    }

    impl HandDetector for ScriptedDetector {
        fn configure(&mut self, _config: &DetectorConfig) -> Result<(), DetectorError> {
            if self.unavailable {
                return Err(DetectorError::Unavailable("no model backend".into()));
            }
            Ok(())
        }

        fn detect(&mut self, _frame: &VideoFrame) -> Result<Option<LandmarkFrame>, DetectorError> {
            self.invocations.set(self.invocations.get() + 1);
            self.results.pop().unwrap_or(Ok(None))
        }
    }

    #[test]
    fn start_failure_stays_off_with_status() {
        let source = ScriptedSource::failing(CaptureError::PermissionDenied("blocked".into()));
        let mut session = CameraSession::new(Box::new(source), Box::new(ScriptedDetector::always(None)));
        session.start();
        assert_eq!(session.state(), SessionState::CameraOff);
        assert_eq!(session.status(), "Camera blocked");
    }

    #[test]
    fn unavailable_detector_aborts_start_before_capture() {
        let source = ScriptedSource::ok(4);
        let started = source.started.clone();
        let mut session =
            CameraSession::new(Box::new(source), Box::new(ScriptedDetector::unavailable()));
        session.start();
        assert_eq!(session.state(), SessionState::CameraOff);
        assert_eq!(session.status(), "Hand tracking unavailable");
        assert!(!started.get());

        // Polling while aborted must not touch the gesture context
        let mut ctx = GestureContext::new();
        session.poll(&mut ctx);
        assert!(!ctx.hand_detected());
    }

    #[test]
    fn unsupported_capture_reports_capability_absent() {
        let source = ScriptedSource::failing(CaptureError::Unsupported);
        let mut session = CameraSession::new(Box::new(source), Box::new(ScriptedDetector::always(None)));
        session.start();
        assert_eq!(session.state(), SessionState::CameraOff);
        assert_eq!(session.status(), "Camera not supported");
    }

    #[test]
    fn poll_runs_at_most_one_detection_per_tick() {
        let detector = ScriptedDetector::always(Some(hand_at((0.5, 0.5))));
        let invocations = detector.invocations.clone();
        let mut session = CameraSession::new(Box::new(ScriptedSource::ok(8)), Box::new(detector));
        let mut ctx = GestureContext::new();

        session.start();
        session.poll(&mut ctx);
        assert_eq!(invocations.get(), 1);
        session.poll(&mut ctx);
        assert_eq!(invocations.get(), 2);
        assert!(ctx.hand_detected());
    }

    #[test]
    fn poll_without_frame_skips_detection() {
        let detector = ScriptedDetector::always(Some(hand_at((0.5, 0.5))));
        let invocations = detector.invocations.clone();
        let mut session = CameraSession::new(Box::new(ScriptedSource::ok(0)), Box::new(detector));
        let mut ctx = GestureContext::new();

        session.start();
        session.poll(&mut ctx);
        assert_eq!(invocations.get(), 0);
    }

    #[test]
    fn stop_clears_detection_and_blocks_late_results() {
        let detector = ScriptedDetector::always(Some(hand_at((0.2, 0.8))));
        let mut session = CameraSession::new(Box::new(ScriptedSource::ok(8)), Box::new(detector));
        let mut ctx = GestureContext::new();

        session.start();
        session.poll(&mut ctx);
        assert!(ctx.hand_detected());

        session.stop(&mut ctx);
        assert!(!ctx.hand_detected());
        assert!(ctx.pinch_readout().is_none());
        assert_eq!(session.status(), "Camera off");

        // Frames still queued in the source must not reach the context
        let target_before = *ctx.target();
        session.poll(&mut ctx);
        assert_eq!(*ctx.target(), target_before);
        assert!(!ctx.hand_detected());
    }

    #[test]
    fn stop_releases_the_capture_device() {
        let source = ScriptedSource::ok(1);
        let stopped = source.stopped.clone();
        let mut session =
            CameraSession::new(Box::new(source), Box::new(ScriptedDetector::always(None)));
        let mut ctx = GestureContext::new();
        session.start();
        session.stop(&mut ctx);
        assert!(stopped.get());
    }

    #[test]
    fn detector_error_drops_the_frame_but_keeps_running() {
        let mut detector = ScriptedDetector::always(None);
        detector.results = vec![Err(DetectorError::Inference("oom".into()))];
        let mut session = CameraSession::new(Box::new(ScriptedSource::ok(2)), Box::new(detector));
        let mut ctx = GestureContext::new();

        session.start();
        session.poll(&mut ctx);
        assert!(session.is_running());
        assert!(!ctx.hand_detected());
    }
}
