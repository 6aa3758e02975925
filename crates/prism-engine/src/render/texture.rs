use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Decoded RGBA8 image, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TextureImage {
    /// Wraps raw RGBA8 pixels. Returns `None` if the buffer length does not
    /// match `width * height * 4` or either dimension is zero.
    pub fn from_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        (width > 0 && height > 0 && rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    /// Decodes a PNG or JPEG file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("failed to decode texture `{}`", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
            .with_context(|| format!("texture `{}` is empty", path.display()))
    }

    /// Two-tone checkerboard of `cells × cells` squares, each `cell_px` wide.
    pub fn checkerboard(cells: u32, cell_px: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let cells = cells.max(1);
        let cell_px = cell_px.max(1);
        let side = cells * cell_px;

        let mut rgba = Vec::with_capacity((side * side * 4) as usize);
        for y in 0..side {
            for x in 0..side {
                let odd = ((x / cell_px) + (y / cell_px)) % 2 == 1;
                rgba.extend_from_slice(if odd { &b } else { &a });
            }
        }

        Self {
            width: side,
            height: side,
            rgba,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Fails if either side exceeds the device's 2D texture dimension limit.
    pub fn check_fits(&self, limits: &wgpu::Limits) -> Result<()> {
        let max = limits.max_texture_dimension_2d;
        anyhow::ensure!(
            self.width <= max && self.height <= max,
            "texture is {}x{}, device allows at most {max}x{max}",
            self.width,
            self.height
        );
        Ok(())
    }

    /// Creates the GPU texture and uploads the pixels.
    ///
    /// The format follows the surface: an sRGB surface gets an sRGB texture
    /// so texels reach the screen with the same byte values either way.
    pub(crate) fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::Texture {
        let format = if surface_format.is_srgb() {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("prism mesh texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            size,
        );

        texture
    }
}

/// Where the mesh texture comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextureSource {
    /// Image file decoded at startup.
    File(PathBuf),
    /// Built-in checkerboard, used when no file is given.
    #[default]
    Checkerboard,
}

impl TextureSource {
    /// Resolves the source to pixels. Decode failures are setup errors.
    pub fn load(&self) -> Result<TextureImage> {
        match self {
            TextureSource::File(path) => TextureImage::from_path(path),
            TextureSource::Checkerboard => Ok(TextureImage::checkerboard(
                8,
                32,
                [230, 230, 230, 255],
                [40, 90, 160, 255],
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_checks_length() {
        assert!(TextureImage::from_rgba8(2, 2, vec![0; 16]).is_some());
        assert!(TextureImage::from_rgba8(2, 2, vec![0; 15]).is_none());
        assert!(TextureImage::from_rgba8(0, 2, vec![]).is_none());
    }

    #[test]
    fn checkerboard_dimensions_and_pattern() {
        let a = [255, 0, 0, 255];
        let b = [0, 0, 255, 255];
        let img = TextureImage::checkerboard(2, 3, a, b);
        assert_eq!((img.width(), img.height()), (6, 6));
        assert_eq!(img.rgba().len(), 6 * 6 * 4);

        let px = |x: usize, y: usize| &img.rgba()[(y * 6 + x) * 4..(y * 6 + x) * 4 + 4];
        assert_eq!(px(0, 0), a);
        assert_eq!(px(3, 0), b);
        assert_eq!(px(0, 3), b);
        assert_eq!(px(5, 5), a);
    }

    #[test]
    fn oversized_texture_is_rejected() {
        let limits = wgpu::Limits::default();
        let too_wide = limits.max_texture_dimension_2d + 808;
        let img = TextureImage::from_rgba8(too_wide, 1, vec![0; too_wide as usize * 4]).unwrap();

        let msg = format!("{:#}", img.check_fits(&limits).unwrap_err());
        assert!(msg.contains(&too_wide.to_string()), "{msg}");
        assert!(msg.contains(&limits.max_texture_dimension_2d.to_string()), "{msg}");
    }

    #[test]
    fn texture_at_the_limit_fits() {
        let limits = wgpu::Limits {
            max_texture_dimension_2d: 4,
            ..wgpu::Limits::default()
        };
        let img = TextureImage::checkerboard(2, 2, [0; 4], [255; 4]);
        assert!(img.check_fits(&limits).is_ok());

        let tall = TextureImage::from_rgba8(1, 5, vec![0; 20]).unwrap();
        assert!(tall.check_fits(&limits).is_err());
    }

    #[test]
    fn default_source_is_checkerboard() {
        let img = TextureSource::default().load().unwrap();
        assert_eq!((img.width(), img.height()), (256, 256));
    }

    #[test]
    fn missing_file_is_an_error() {
        let src = TextureSource::File(PathBuf::from("/nonexistent/prism-texture.png"));
        let err = src.load().unwrap_err();
        assert!(format!("{err:#}").contains("prism-texture.png"));
    }
}
