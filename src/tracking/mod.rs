//! Camera capture and hand-detection plumbing.

pub mod detector;
pub mod session;

pub use detector::{
    CaptureError, DetectorConfig, DetectorError, FrameSource, HandDetector, NullDetector,
    UnsupportedCamera, VideoFrame,
};
pub use session::{CameraSession, SessionState};
