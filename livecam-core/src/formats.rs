//! Pixel format tags and the mode format preference ranking
//!
//! Backends describe modes with a free-form format tag (`"YUV_YUY2"`,
//! `"MJPG"`, ...) and describe a running session with a [`VideoFrameFormat`],
//! the layout the format converter actually receives.

use serde::{Deserialize, Serialize};

/// Mode format tags, most preferred first.
///
/// Used to break ties between modes with identical dimensions. Tags missing
/// from this list rank after every listed tag.
pub const FORMAT_PREFERENCE: [&str; 9] = [
    "YUV_UYVY_HDYC",
    "YUV_UYVY",
    "YUV_YVYU",
    "YUV_YUY2",
    "ARGB32",
    "RGB32",
    "RGB24",
    "MJPG",
    "UNKNOWN",
];

/// Position of a mode format tag in [`FORMAT_PREFERENCE`]
///
/// Unlisted tags get `FORMAT_PREFERENCE.len()`, i.e. rank last.
pub fn format_rank(tag: &str) -> usize {
    FORMAT_PREFERENCE
        .iter()
        .position(|preferred| *preferred == tag)
        .unwrap_or(FORMAT_PREFERENCE.len())
}

/// Frame layout delivered to the format converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoFrameFormat {
    /// Packed YUV 4:2:2, Y0 U Y1 V
    Yuy2,
    /// Packed YUV 4:2:2, U Y0 V Y1
    Uyvy,
    /// Packed YUV 4:2:2, Y0 V Y1 U
    Yvyu,
    /// UYVY with BT.709 coefficients
    Hdyc,
    /// 32-bit BGRA
    Bgra32,
    /// 8-bit greyscale
    Mono8,
    /// Planar YUV 4:2:0, Y U V
    I420,
    /// Planar YUV 4:2:0, Y V U
    Yv12,
    /// Anything the converter does not understand
    #[default]
    Unknown,
}

impl VideoFrameFormat {
    /// Formats a converter can be built for
    pub const SUPPORTED: [VideoFrameFormat; 8] = [
        Self::Yuy2,
        Self::Uyvy,
        Self::Yvyu,
        Self::Hdyc,
        Self::Bgra32,
        Self::Mono8,
        Self::I420,
        Self::Yv12,
    ];

    /// Native name of the format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yuy2 => "YUV_422_YUY2",
            Self::Uyvy => "YUV_422_UYVY",
            Self::Yvyu => "YUV_422_YVYU",
            Self::Hdyc => "YUV_422_HDYC",
            Self::Bgra32 => "RAW_BGRA32",
            Self::Mono8 => "RAW_MONO8",
            Self::I420 => "YUV_420_PLANAR_I420",
            Self::Yv12 => "YUV_420_PLANAR_YV12",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Frame layout a capture in the given mode format tag is delivered in.
    ///
    /// Compressed and 24-bit tags are decoded to BGRA before delivery.
    pub fn from_mode_tag(tag: &str) -> Self {
        match tag {
            "YUV_YUY2" => Self::Yuy2,
            "YUV_UYVY" => Self::Uyvy,
            "YUV_YVYU" => Self::Yvyu,
            "YUV_UYVY_HDYC" => Self::Hdyc,
            "ARGB32" | "RGB32" | "RGB24" | "MJPG" => Self::Bgra32,
            "Y800" | "MONO8" => Self::Mono8,
            "I420" => Self::I420,
            "YV12" => Self::Yv12,
            _ => {
                tracing::debug!("Unknown mode format tag '{}'", tag);
                Self::Unknown
            }
        }
    }

    /// Whether the format is one of the YUV layouts
    pub fn is_yuv(&self) -> bool {
        matches!(
            self,
            Self::Yuy2 | Self::Uyvy | Self::Yvyu | Self::Hdyc | Self::I420 | Self::Yv12
        )
    }

    /// Whether a converter can be built for this format
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for VideoFrameFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for VideoFrameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "YUY2" | "YUV_422_YUY2" => Ok(Self::Yuy2),
            "UYVY" | "YUV_422_UYVY" => Ok(Self::Uyvy),
            "YVYU" | "YUV_422_YVYU" => Ok(Self::Yvyu),
            "HDYC" | "YUV_422_HDYC" => Ok(Self::Hdyc),
            "BGRA32" | "RAW_BGRA32" => Ok(Self::Bgra32),
            "MONO8" | "RAW_MONO8" => Ok(Self::Mono8),
            "I420" | "YUV_420_PLANAR_I420" => Ok(Self::I420),
            "YV12" | "YUV_420_PLANAR_YV12" => Ok(Self::Yv12),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(format!("Unknown pixel format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rank_order() {
        assert_eq!(format_rank("YUV_UYVY_HDYC"), 0);
        assert_eq!(format_rank("YUV_YUY2"), 3);
        assert_eq!(format_rank("MJPG"), 7);
        assert_eq!(format_rank("UNKNOWN"), 8);
    }

    #[test]
    fn test_unlisted_tag_ranks_last() {
        assert_eq!(format_rank("H264"), FORMAT_PREFERENCE.len());
        assert!(format_rank("H264") > format_rank("UNKNOWN"));
    }

    #[test]
    fn test_from_mode_tag() {
        assert_eq!(VideoFrameFormat::from_mode_tag("YUV_YUY2"), VideoFrameFormat::Yuy2);
        assert_eq!(VideoFrameFormat::from_mode_tag("YUV_UYVY_HDYC"), VideoFrameFormat::Hdyc);
        assert_eq!(VideoFrameFormat::from_mode_tag("MJPG"), VideoFrameFormat::Bgra32);
        assert_eq!(VideoFrameFormat::from_mode_tag("H264"), VideoFrameFormat::Unknown);
    }

    #[test]
    fn test_format_name_parses_back() {
        for format in VideoFrameFormat::SUPPORTED {
            assert_eq!(format.name().parse::<VideoFrameFormat>().ok(), Some(format));
        }
        assert!("NV21".parse::<VideoFrameFormat>().is_err());
    }

    #[test]
    fn test_is_yuv() {
        assert!(VideoFrameFormat::I420.is_yuv());
        assert!(!VideoFrameFormat::Bgra32.is_yuv());
        assert!(!VideoFrameFormat::Unknown.is_supported());
    }
}
