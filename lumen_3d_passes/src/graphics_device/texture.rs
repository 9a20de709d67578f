//! Texture storage formats used by render target attachments

/// Storage format of a 2D texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// 8-bit RGBA, normalized (color attachments, readback format)
    Rgba8Unorm,
    /// 32-bit float depth (depth attachments, shadow maps)
    Depth32Float,
}

impl TextureFormat {
    /// Bytes per texel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Depth32Float => 4,
        }
    }

    /// Returns true for formats usable as a depth attachment
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth32Float)
    }
}
