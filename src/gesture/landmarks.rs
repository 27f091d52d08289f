//! Hand landmark data as reported by a detector backend.
//!
//! Indices follow the common 21-point hand topology: wrist at 0, then four
//! joints per finger from base to tip.

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of points in a full hand sample.
pub const LANDMARK_COUNT: usize = 21;

/// A single detector-reported point, normalized to [0, 1] relative to the
/// video frame. `z` is the detector's relative depth estimate and is unused
/// by the gesture mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean distance to another landmark in the frame plane.
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One hand's landmarks for a single video frame.
///
/// Detector bindings occasionally deliver partial samples, so every slot is
/// optional; lookups on missing points degrade to skipped updates rather
/// than panics.
#[derive(Clone, Debug)]
pub struct LandmarkFrame {
    points: [Option<Landmark>; LANDMARK_COUNT],
}

impl Default for LandmarkFrame {
    fn default() -> Self {
        Self {
            points: [None; LANDMARK_COUNT],
        }
    }
}

impl LandmarkFrame {
    /// Builds a frame from a complete sample.
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self {
            points: points.map(Some),
        }
    }

    /// Parses a flat `[x0, y0, z0, x1, y1, z1, ...]` buffer, the layout most
    /// detector bindings hand over. A short buffer yields a partial frame.
    pub fn from_flat(data: &[f32]) -> Self {
        let mut frame = Self::default();
        for (i, p) in data.chunks_exact(3).take(LANDMARK_COUNT).enumerate() {
            frame.points[i] = Some(Landmark {
                x: p[0],
                y: p[1],
                z: p[2],
            });
        }
        frame
    }

    pub fn set(&mut self, index: usize, point: Landmark) {
        if index < LANDMARK_COUNT {
            self.points[index] = Some(point);
        }
    }

    pub fn clear(&mut self, index: usize) {
        if index < LANDMARK_COUNT {
            self.points[index] = None;
        }
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index).and_then(|p| p.as_ref())
    }

    /// Number of points present in this sample.
    pub fn len(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.points.iter().all(|p| p.is_none())
    }

    /// Palm center: unweighted average of the wrist, index base and pinky
    /// base. Returns `None` if any anchor is missing from the sample.
    pub fn palm_center(&self) -> Option<(f32, f32)> {
        let wrist = self.get(WRIST)?;
        let index = self.get(INDEX_MCP)?;
        let pinky = self.get(PINKY_MCP)?;
        Some((
            (wrist.x + index.x + pinky.x) / 3.0,
            (wrist.y + index.y + pinky.y) / 3.0,
        ))
    }

    /// Distance between thumb tip and index tip, the zoom proxy. `None` if
    /// either tip is missing this frame.
    pub fn pinch_distance(&self) -> Option<f32> {
        let thumb = self.get(THUMB_TIP)?;
        let index = self.get(INDEX_TIP)?;
        Some(thumb.distance_2d(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(points: &[(usize, f32, f32)]) -> LandmarkFrame {
        let mut frame = LandmarkFrame::default();
        for &(i, x, y) in points {
            frame.set(i, Landmark::new(x, y));
        }
        frame
    }

    #[test]
    fn palm_center_averages_three_anchors() {
        let frame = frame_with(&[
            (WRIST, 0.3, 0.6),
            (INDEX_MCP, 0.6, 0.3),
            (PINKY_MCP, 0.3, 0.3),
        ]);
        let (x, y) = frame.palm_center().unwrap();
        assert!((x - 0.4).abs() < 1e-6);
        assert!((y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn palm_center_requires_all_anchors() {
        let frame = frame_with(&[(WRIST, 0.5, 0.5), (INDEX_MCP, 0.5, 0.5)]);
        assert!(frame.palm_center().is_none());
    }

    #[test]
    fn pinch_distance_is_euclidean() {
        let frame = frame_with(&[(THUMB_TIP, 0.1, 0.1), (INDEX_TIP, 0.4, 0.5)]);
        let d = frame.pinch_distance().unwrap();
        assert!((d - 0.5).abs() < 1e-6);
    }

    #[test]
    fn pinch_distance_missing_tip_is_none() {
        let frame = frame_with(&[(THUMB_TIP, 0.1, 0.1)]);
        assert!(frame.pinch_distance().is_none());
    }

    #[test]
    fn from_flat_parses_triples() {
        let data: Vec<f32> = (0..63).map(|i| i as f32 * 0.01).collect();
        let frame = LandmarkFrame::from_flat(&data);
        assert_eq!(frame.len(), LANDMARK_COUNT);
        let tip = frame.get(THUMB_TIP).unwrap();
        assert!((tip.x - 0.12).abs() < 1e-6);
        assert!((tip.y - 0.13).abs() < 1e-6);
    }

    #[test]
    fn short_flat_buffer_yields_partial_frame() {
        let data: Vec<f32> = vec![0.1; 9]; // three points only
        let frame = LandmarkFrame::from_flat(&data);
        assert_eq!(frame.len(), 3);
        assert!(frame.get(THUMB_TIP).is_none());
    }
}
