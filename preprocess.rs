use crate::config::{InputScaling, PipelineConfig};
use crate::error::Result;
use crate::models::ImageReference;
use image::imageops::FilterType;
use image::RgbaImage;
use ndarray::Array4;

/// Resolve an image reference to a decoded RGBA8 buffer. Any failure here
/// (missing file, revoked access, unsupported format, corrupt data) is a
/// decode error; the original resolution is preserved.
pub fn decode(image_ref: &ImageReference) -> Result<RgbaImage> {
    let img = image::open(image_ref.path())?;
    Ok(img.to_rgba8())
}

/// Decode, resize and normalize an image into the NHWC float tensor the
/// engine expects. The decoded buffer is dropped as soon as the tensor is
/// built.
pub fn preprocess(image_ref: &ImageReference, config: &PipelineConfig) -> Result<Array4<f32>> {
    let decoded = decode(image_ref)?;
    Ok(to_input_tensor(&decoded, config))
}

/// Resize an RGBA buffer to the configured input size and lay it out as a
/// `(1, H, W, 3)` float tensor; the alpha channel is discarded.
pub fn to_input_tensor(decoded: &RgbaImage, config: &PipelineConfig) -> Array4<f32> {
    let (w, h) = (config.input_width, config.input_height);
    let resized = image::imageops::resize(decoded, w, h, FilterType::Triangle);

    let mut tensor = Array4::<f32>::zeros((1, h as usize, w as usize, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, y as usize, x as usize, c]] = scale_channel(pixel[c], config.scaling);
        }
    }
    tensor
}

fn scale_channel(value: u8, scaling: InputScaling) -> f32 {
    match scaling {
        InputScaling::ZeroToOne => value as f32 / 255.0,
        InputScaling::RawByte => value as f32,
        InputScaling::MinusOneToOne => (value as f32 / 255.0) * 2.0 - 1.0,
    }
}
