//! Device modes and closest-mode selection

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::ModeInfo;
use crate::formats::format_rank;

/// One supported resolution/format/frame-rate combination of a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMode {
    device: usize,
    index: usize,
    width: i32,
    height: i32,
    fps: f32,
    format: String,
}

impl DeviceMode {
    /// Create a mode from a backend description
    pub fn new(device: usize, index: usize, info: ModeInfo) -> Self {
        Self {
            device,
            index,
            width: info.width,
            height: info.height,
            fps: info.fps,
            format: info.format,
        }
    }

    /// Index of the owning device
    pub fn device_index(&self) -> usize {
        self.device
    }

    /// Index of this mode on its device
    pub fn index(&self) -> usize {
        self.index
    }

    /// Width in pixels
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Frame rate
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Format tag
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Pixel count
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

impl std::fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} @ {:.2}fps {}",
            self.width, self.height, self.fps, self.format
        )
    }
}

/// Float equality within a relative tolerance of 1e-6
pub fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(f32::MIN_POSITIVE * 8.0)
}

/// Pick the mode that best matches a requested size.
///
/// Exact size matches win, ties broken by [`FORMAT_PREFERENCE`](crate::formats::FORMAT_PREFERENCE).
/// Otherwise the mode with the smallest pixel-area difference wins, optionally
/// restricted to modes with the requested aspect ratio. Earlier modes win ties.
pub fn closest_mode(
    modes: &[DeviceMode],
    width: i32,
    height: i32,
    maintain_aspect_ratio: bool,
) -> Option<&DeviceMode> {
    if width <= 0 || height <= 0 {
        return None;
    }

    let exact = modes
        .iter()
        .filter(|mode| mode.width == width && mode.height == height)
        .min_by_key(|mode| format_rank(&mode.format));
    if let Some(mode) = exact {
        debug!("Exact mode match {} (#{})", mode, mode.index);
        return Some(mode);
    }

    let aspect = width as f32 / height as f32;
    let area = width as i64 * height as i64;
    let mut best: Option<(&DeviceMode, i64)> = None;
    for mode in modes {
        if maintain_aspect_ratio && !approximately(mode.aspect_ratio(), aspect) {
            continue;
        }
        let difference = (area - mode.area()).abs();
        if best.is_none_or(|(_, lowest)| difference < lowest) {
            best = Some((mode, difference));
        }
    }

    if let Some((mode, difference)) = best {
        debug!(
            "Closest mode to {}x{} is {} (#{}, area difference {})",
            width, height, mode, mode.index, difference
        );
    }
    best.map(|(mode, _)| mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(index: usize, width: i32, height: i32, format: &str) -> DeviceMode {
        DeviceMode::new(
            0,
            index,
            ModeInfo {
                width,
                height,
                fps: 30.0,
                format: format.to_string(),
            },
        )
    }

    #[test]
    fn test_rejects_non_positive_request() {
        let modes = vec![mode(0, 640, 480, "YUV_YUY2")];
        assert!(closest_mode(&modes, 0, 480, false).is_none());
        assert!(closest_mode(&modes, 640, -480, false).is_none());
    }

    #[test]
    fn test_single_exact_match() {
        let modes = vec![mode(0, 320, 240, "MJPG"), mode(1, 640, 480, "MJPG")];
        assert_eq!(closest_mode(&modes, 640, 480, false).map(|m| m.index()), Some(1));
    }

    #[test]
    fn test_exact_match_prefers_ranked_format() {
        let modes = vec![
            mode(0, 1280, 720, "MJPG"),
            mode(1, 1280, 720, "YUV_YUY2"),
            mode(2, 1280, 720, "YUV_UYVY"),
        ];
        assert_eq!(closest_mode(&modes, 1280, 720, false).map(|m| m.index()), Some(2));
    }

    #[test]
    fn test_exact_match_unranked_formats_keep_order() {
        let modes = vec![mode(0, 640, 480, "H264"), mode(1, 640, 480, "NV12")];
        assert_eq!(closest_mode(&modes, 640, 480, false).map(|m| m.index()), Some(0));
    }

    #[test]
    fn test_closest_area_first_wins_tie() {
        // 640x480 and 480x640 have the same area
        let modes = vec![mode(0, 640, 480, "MJPG"), mode(1, 480, 640, "MJPG")];
        assert_eq!(closest_mode(&modes, 600, 500, false).map(|m| m.index()), Some(0));
    }

    #[test]
    fn test_aspect_filter() {
        let modes = vec![
            mode(0, 640, 480, "MJPG"),
            mode(1, 1280, 720, "MJPG"),
            mode(2, 1920, 1080, "MJPG"),
        ];
        // 1024x576 is 16:9; 640x480 is closer in area but 4:3
        assert_eq!(closest_mode(&modes, 1024, 576, true).map(|m| m.index()), Some(1));
        assert_eq!(closest_mode(&modes, 800, 450, false).map(|m| m.index()), Some(0));
    }

    #[test]
    fn test_aspect_filter_no_candidates() {
        let modes = vec![mode(0, 640, 480, "MJPG")];
        assert!(closest_mode(&modes, 1280, 720, true).is_none());
    }

    #[test]
    fn test_approximately() {
        assert!(approximately(16.0 / 9.0, 1280.0 / 720.0));
        assert!(!approximately(4.0 / 3.0, 16.0 / 9.0));
    }
}
