//! Capture and detection seams.
//!
//! Real camera capture and the hand-landmark model are external services.
//! They plug in behind [`FrameSource`] and [`HandDetector`] so the session
//! logic and the gesture math stay deterministic and testable without
//! hardware.

use thiserror::Error;

use crate::gesture::LandmarkFrame;

/// A single captured video frame, RGBA8.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}

/// Failures starting or reading a capture source.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera not supported on this system")]
    Unsupported,
    #[error("camera access denied: {0}")]
    PermissionDenied(String),
    #[error("capture device failed: {0}")]
    Device(String),
}

/// Failures inside a detector backend.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("detector backend unavailable: {0}")]
    Unavailable(String),
    #[error("detector inference failed: {0}")]
    Inference(String),
}

/// Tuning knobs passed to the detector backend on session start.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    pub max_hands: u32,
    pub model_complexity: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_hands: 1,
            model_complexity: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.6,
        }
    }
}

/// Produces video frames at its own pace.
pub trait FrameSource {
    /// Requests access and begins capture. Errors here abort the session
    /// start; they never tear down an already-running session.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stops capture and releases the device.
    fn stop(&mut self);

    /// Most recent frame, if one is available since the last call.
    fn next_frame(&mut self) -> Option<VideoFrame>;
}

/// Hand-landmark model: zero or one hand per frame.
pub trait HandDetector {
    /// Probes backend availability and applies the config. Called once per
    /// session start; an error aborts the start before capture begins.
    fn configure(&mut self, config: &DetectorConfig) -> Result<(), DetectorError>;

    /// Runs inference on one frame. `Ok(None)` is the explicit "no hand"
    /// signal.
    fn detect(&mut self, frame: &VideoFrame) -> Result<Option<LandmarkFrame>, DetectorError>;
}

/// Placeholder source for systems with no capture backend wired in; starting
/// it reports capability-absent and the session stays off.
#[derive(Debug, Default)]
pub struct UnsupportedCamera;

impl FrameSource for UnsupportedCamera {
    fn start(&mut self) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    fn stop(&mut self) {}

    fn next_frame(&mut self) -> Option<VideoFrame> {
        None
    }
}

/// Detector stand-in used when no model backend is plugged in.
#[derive(Debug, Default)]
pub struct NullDetector;

impl HandDetector for NullDetector {
    fn configure(&mut self, _config: &DetectorConfig) -> Result<(), DetectorError> {
        Ok(())
    }

    fn detect(&mut self, _frame: &VideoFrame) -> Result<Option<LandmarkFrame>, DetectorError> {
        Ok(None)
    }
}
