use anyhow::Context;
use gltf::image::Format;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

pub struct Texture {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    fn from_wgpu_texture(texture: wgpu::Texture) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }

    /// Uploads a decoded glTF image as an sRGB colour texture.
    pub fn from_gltf_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &gltf::image::Data,
        label: &str,
    ) -> anyhow::Result<Self> {
        let rgba = to_rgba8(data).with_context(|| format!("Failed to convert image {}", label))?;
        Ok(Self::from_rgba(device, queue, &rgba, label))
    }

    /// A 1×1 texture, used when a material has no base colour image.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, color: [u8; 4], label: &str) -> Self {
        Self::from_rgba(device, queue, &RgbaImage::from_pixel(1, 1, image::Rgba(color)), label)
    }

    fn from_rgba(device: &wgpu::Device, queue: &wgpu::Queue, rgba: &RgbaImage, label: &str) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: rgba.width(),
                    height: rgba.height(),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::wgt::TextureDataOrder::default(),
            rgba.as_raw(),
        );

        Self::from_wgpu_texture(texture)
    }
}

/// Expands 8-bit glTF pixel data to RGBA8.
pub fn to_rgba8(data: &gltf::image::Data) -> anyhow::Result<RgbaImage> {
    let (width, height, pixels) = (data.width, data.height, data.pixels.clone());
    let size_mismatch = || anyhow::anyhow!("Pixel data does not match {}x{}", width, height);

    let image = match data.format {
        Format::R8G8B8A8 => {
            return RgbaImage::from_raw(width, height, pixels).ok_or_else(size_mismatch);
        }
        Format::R8G8B8 => {
            DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, pixels).ok_or_else(size_mismatch)?)
        }
        Format::R8G8 => DynamicImage::ImageLumaA8(
            GrayAlphaImage::from_raw(width, height, pixels).ok_or_else(size_mismatch)?,
        ),
        Format::R8 => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, pixels).ok_or_else(size_mismatch)?)
        }
        other => return Err(anyhow::anyhow!("Unsupported image format: {:?}", other)),
    };

    Ok(image.to_rgba8())
}

pub struct DepthTexture {
    texture: Texture,
    label: String,
}

impl DepthTexture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>, label: impl Into<String>) -> Self {
        let label: String = label.into();
        let texture = Self::create_wgpu_texture(device, size, &label);

        DepthTexture {
            texture: Texture::from_wgpu_texture(texture),
            label,
        }
    }

    fn create_wgpu_texture(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        label: &str,
    ) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.texture = Texture::from_wgpu_texture(Self::create_wgpu_texture(device, size, &self.label));
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.texture.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(format: Format, pixels: Vec<u8>) -> gltf::image::Data {
        gltf::image::Data {
            pixels,
            format,
            width: 2,
            height: 1,
        }
    }

    #[test]
    fn rgb_gains_opaque_alpha() {
        let rgba = to_rgba8(&data(Format::R8G8B8, vec![1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(rgba.as_raw(), &vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn grayscale_is_splatted() {
        let rgba = to_rgba8(&data(Format::R8, vec![10, 20])).unwrap();
        assert_eq!(rgba.as_raw(), &vec![10, 10, 10, 255, 20, 20, 20, 255]);
    }

    #[test]
    fn short_pixel_buffer_is_an_error() {
        assert!(to_rgba8(&data(Format::R8G8B8A8, vec![0; 4])).is_err());
    }

    #[test]
    fn wide_formats_are_rejected() {
        assert!(to_rgba8(&data(Format::R16G16B16, vec![0; 12])).is_err());
    }
}
