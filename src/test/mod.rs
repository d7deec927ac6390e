//! Fixtures shared by unit tests.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::modules::media::model::{DataUri, MediaKind, RawMedia};

fn encode_png(img: &RgbImage) -> String {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    DataUri::encode("image/png", &buf.into_inner())
}

/// Flat-colored PNG; compresses to a few hundred bytes.
pub fn png_data_uri(width: u32, height: u32) -> String {
    encode_png(&RgbImage::from_pixel(width, height, Rgb([200, 40, 40])))
}

/// PNG filled with pseudo-random pixels so it stays large after compression.
pub fn noise_png_data_uri(width: u32, height: u32) -> String {
    let mut state: u32 = 0x2545_f491;
    let img = RgbImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    encode_png(&img)
}

/// Data URI whose base64 payload is `payload_len` characters of zero bytes.
pub fn padded_data_uri(mime: &str, payload_len: usize) -> String {
    format!("data:{mime};base64,{}", "A".repeat(payload_len))
}

/// Data URI whose estimated decoded size is at least `bytes`.
pub fn sized_data_uri(mime: &str, bytes: u64) -> String {
    let groups = bytes.div_ceil(3) as usize;
    padded_data_uri(mime, groups * 4)
}

pub fn image_media(data: String) -> RawMedia {
    RawMedia { kind: MediaKind::Image, size: 0, data, name: None }
}
