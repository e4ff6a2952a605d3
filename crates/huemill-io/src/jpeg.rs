//! JPEG format support.
//!
//! 8-bit RGB and grayscale decode via `jpeg-decoder`; encode via
//! `jpeg-encoder`. JPEG carries no alpha, so 4-channel rasters drop their
//! alpha byte on the way out.

use crate::{swap_red_blue, IoError, IoResult, Raster};
use huemill_core::ImageMeta;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const QUALITY: u8 = 90;

/// Reads a JPEG file into a BGR raster.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let file = File::open(path.as_ref())?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::Decode(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::Decode("decoder produced no image info".into()))?;

    let mut data = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        other => return Err(IoError::UnsupportedColorType(format!("{other:?}"))),
    };
    swap_red_blue(&mut data, 3);

    Raster::new(
        ImageMeta::new(u32::from(info.width), u32::from(info.height), 3)?,
        data,
    )
}

/// Writes a raster to a JPEG file, converting BGR(A) to RGB.
pub fn write<P: AsRef<Path>>(path: P, raster: &Raster) -> IoResult<()> {
    let stride = raster.meta.pixel_stride();
    if stride < 3 {
        return Err(IoError::Encode(format!(
            "unsupported channel count: {}",
            raster.meta.channels
        )));
    }
    let width = u16::try_from(raster.meta.width)
        .map_err(|_| IoError::Encode(format!("width {} exceeds JPEG limit", raster.meta.width)))?;
    let height = u16::try_from(raster.meta.height).map_err(|_| {
        IoError::Encode(format!("height {} exceeds JPEG limit", raster.meta.height))
    })?;

    let rgb: Vec<u8> = raster
        .data
        .chunks_exact(stride)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect();

    let encoder = jpeg_encoder::Encoder::new_file(path.as_ref(), QUALITY)
        .map_err(|e| IoError::Encode(e.to_string()))?;
    encoder
        .encode(&rgb, width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| IoError::Encode(e.to_string()))?;

    Ok(())
}
