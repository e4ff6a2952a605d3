//! PNG format support.
//!
//! 8-bit RGB/RGBA plus the grayscale variants; 16-bit files are narrowed to
//! 8 bits at decode. Output is always 8-bit with an sRGB chunk.

use crate::{swap_red_blue, IoError, IoResult, Raster};
use huemill_core::ImageMeta;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Reads a PNG file into a BGR(A) raster.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let file = File::open(path.as_ref())?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::Decode(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::Decode("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::Decode(e.to_string()))?;

    let bytes = &buf[..info.buffer_size()];
    let bytes: Vec<u8> = match info.bit_depth {
        png::BitDepth::Eight => bytes.to_vec(),
        // 16-bit samples are big-endian; keep the high bytes.
        png::BitDepth::Sixteen => bytes.iter().step_by(2).copied().collect(),
        other => return Err(IoError::UnsupportedBitDepth(format!("{other:?}"))),
    };

    let (channels, mut data) = match info.color_type {
        png::ColorType::Rgb => (3, bytes),
        png::ColorType::Rgba => (4, bytes),
        png::ColorType::Grayscale => (3, bytes.iter().flat_map(|&g| [g, g, g]).collect()),
        png::ColorType::GrayscaleAlpha => (
            4,
            bytes
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect(),
        ),
        other => return Err(IoError::UnsupportedColorType(format!("{other:?}"))),
    };
    swap_red_blue(&mut data, channels as usize);

    Raster::new(ImageMeta::new(info.width, info.height, channels)?, data)
}

/// Writes a BGR(A) raster to an 8-bit PNG file.
pub fn write<P: AsRef<Path>>(path: P, raster: &Raster) -> IoResult<()> {
    let color_type = match raster.meta.channels {
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => {
            return Err(IoError::Encode(format!("unsupported channel count: {n}")));
        }
    };

    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, raster.meta.width, raster.meta.height);
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::Encode(e.to_string()))?;

    let mut data = raster.data.clone();
    swap_red_blue(&mut data, raster.meta.pixel_stride());

    png_writer
        .write_image_data(&data)
        .map_err(|e| IoError::Encode(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_raster(width: u32, height: u32, channels: u8) -> Raster {
        let meta = ImageMeta::new(width, height, channels).unwrap();
        let data = (0..meta.total_bytes()).map(|i| (i % 251) as u8).collect();
        Raster::new(meta, data).unwrap()
    }

    #[test]
    fn test_roundtrip_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip_rgb.png");
        let original = gradient_raster(32, 32, 3);

        write(&path, &original).expect("failed to write PNG");
        let loaded = read(&path).expect("failed to read PNG");

        assert_eq!(loaded.meta, original.meta);
        assert_eq!(loaded.data, original.data);
    }

    #[test]
    fn test_roundtrip_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip_rgba.png");
        let original = gradient_raster(16, 9, 4);

        write(&path, &original).expect("failed to write PNG");
        let loaded = read(&path).expect("failed to read PNG");

        assert_eq!(loaded.meta, original.meta);
        assert_eq!(loaded.data, original.data);
    }

    #[test]
    fn test_decoded_order_is_bgr() {
        // A pure red pixel on disk must come back with the red byte at
        // channel index 2.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");

        let file = File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 1, 1);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[255, 0, 0]).unwrap();
        drop(writer);

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.data, [0, 0, 255]);
    }

    #[test]
    fn test_grayscale_is_promoted_to_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");

        let file = File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[7, 200]).unwrap();
        drop(writer);

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.meta.channels, 3);
        assert_eq!(loaded.data, [7, 7, 7, 200, 200, 200]);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = read("definitely/not/here.png");
        assert!(matches!(result, Err(IoError::Io(_))));
    }
}
