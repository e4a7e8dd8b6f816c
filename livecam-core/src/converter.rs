//! Format converter interface
//!
//! A converter turns raw captured frames of one [`VideoFrameFormat`] into a
//! display-ready texture. Converters are created by the capture backend and
//! owned exclusively by a [`Device`](crate::device::Device); dropping one
//! releases its GPU resources.

use crate::formats::VideoFrameFormat;
use crate::types::TextureHandle;

/// Parameters a converter is built with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterParams {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Layout of incoming frames
    pub format: VideoFrameFormat,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically (already combined with the session's row order)
    pub flip_y: bool,
    /// Apply the deinterlace pass
    pub deinterlace: bool,
}

/// Converts captured frames into a renderable texture
pub trait FormatConverter: Send {
    /// (Re)build for a new session. Returns false if the format is unsupported.
    fn build(&mut self, params: ConverterParams) -> bool;

    /// Pull the latest frame. Returns true if the output texture changed.
    fn update(&mut self) -> bool;

    /// Output texture, if the converter has been built
    fn output_texture(&self) -> Option<TextureHandle>;

    /// Whether the output texture holds at least one converted frame
    fn has_valid_picture(&self) -> bool;

    /// Change horizontal mirroring on a built converter
    fn set_flip_x(&mut self, flip: bool);

    /// Change vertical mirroring on a built converter
    fn set_flip_y(&mut self, flip: bool);
}
