//! Depth attachment for the model pass and sampled model textures.

use crate::model::ModelImage;

/// Format shared by the depth texture and the pipeline depth state.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Base colour textures hold sRGB-encoded texels.
pub const COLOR_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba8UnormSrgb;

/// A depth texture sized to the output surface, and its default view.
pub struct DepthTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Create a depth texture with the given dimensions (clamped to 1).
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Texture size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

/// An uploaded [`ModelImage`] with a full mip chain.
pub struct ImageTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl ImageTexture {
    /// Upload `image`, or a white texel if the device cannot hold it.
    #[must_use]
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &ModelImage,
    ) -> Self {
        let max = device.limits().max_texture_dimension_2d;
        if fits(image, max) {
            Self::from_rgba(device, queue, image)
        } else {
            log::warn!(
                "{}x{} texture does not fit the {max} texel limit, using white",
                image.width,
                image.height
            );
            Self::white(device, queue)
        }
    }

    /// The 1×1 white texture bound to untextured materials.
    #[must_use]
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_rgba(device, queue, &ModelImage::white())
    }

    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &ModelImage,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Model Texture"),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_level_count(image.width, image.height),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let mut level = image.clone();
        for mip_level in 0..texture.mip_level_count() {
            if mip_level > 0 {
                level = downsample(&level);
            }
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(level.width * 4),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

fn fits(image: &ModelImage, max_dimension: u32) -> bool {
    image.width > 0
        && image.height > 0
        && image.width <= max_dimension
        && image.height <= max_dimension
}

/// Levels in a chain that halves down to 1×1.
fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

/// Halve an image with a 2×2 box filter. Odd trailing rows and columns
/// are dropped.
fn downsample(image: &ModelImage) -> ModelImage {
    let (w, h) = (image.width as usize, image.height as usize);
    let (nw, nh) = ((w / 2).max(1), (h / 2).max(1));
    let mut rgba = Vec::with_capacity(nw * nh * 4);
    for y in 0..nh {
        for x in 0..nw {
            let mut sum = [0u32; 4];
            let mut count = 0;
            for sy in (y * 2)..(y * 2 + 2).min(h) {
                for sx in (x * 2)..(x * 2 + 2).min(w) {
                    let i = (sy * w + sx) * 4;
                    let texel = &image.rgba[i..i + 4];
                    for (acc, &c) in sum.iter_mut().zip(texel) {
                        *acc += u32::from(c);
                    }
                    count += 1;
                }
            }
            rgba.extend(sum.map(|c| (c / count) as u8));
        }
    }
    ModelImage {
        width: nw as u32,
        height: nh as u32,
        rgba,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_chain_reaches_one_texel() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(256, 64), 9);
        assert_eq!(mip_level_count(5, 3), 3);
    }

    #[test]
    fn downsample_averages_blocks() {
        let rgba = [[255, 0, 0, 255], [0, 0, 0, 255]].concat().repeat(2);
        let image = ModelImage::from_rgba(2, 2, rgba).unwrap();
        let half = downsample(&image);
        assert_eq!((half.width, half.height), (1, 1));
        assert_eq!(half.rgba, vec![127, 0, 0, 255]);
    }

    #[test]
    fn downsample_of_odd_width_rounds_down() {
        let rgba = (0..3 * 4).map(|i| (i * 20) as u8).collect();
        let row = ModelImage::from_rgba(3, 1, rgba).unwrap();
        let half = downsample(&row);
        assert_eq!((half.width, half.height), (1, 1));
        assert_eq!(half.rgba, vec![40, 60, 80, 100]);
    }

    #[test]
    fn oversized_or_empty_images_do_not_fit() {
        let white = ModelImage::white();
        assert!(fits(&white, 2048));
        let wide = ModelImage {
            width: 4096,
            height: 1,
            rgba: Vec::new(),
        };
        assert!(!fits(&wide, 2048));
        let empty = ModelImage {
            width: 0,
            height: 0,
            rgba: Vec::new(),
        };
        assert!(!fits(&empty, 2048));
    }
}
