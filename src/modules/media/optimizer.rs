use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};
use serde::Serialize;

use crate::modules::media::{
    MediaError,
    model::{
        DataUri, MediaKind, MediaOptimizationOptions, OptimizedMedia, PreparedMedia, RawMedia,
        estimate_size, format_mb,
    },
};

#[derive(Debug, Clone, Serialize)]
pub struct OptimizedMediaSet {
    pub media: Vec<PreparedMedia>,
    pub report: String,
    pub processed_images: usize,
    pub skipped_images: usize,
    pub failed_images: usize,
}

/// Scales `(width, height)` so the longer side is at most `max_dimension`.
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max_dimension || longer == 0 {
        return (width, height);
    }

    let scale = |side: u32| -> u32 {
        let scaled = (side as u64 * max_dimension as u64 + longer as u64 / 2) / longer as u64;
        (scaled as u32).clamp(1, max_dimension)
    };

    if width >= height {
        (max_dimension, scale(height))
    } else {
        (scale(width), max_dimension)
    }
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, MediaError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(MediaError::Encode)?;
    Ok(buf)
}

/// Recompresses one image data URI when its estimated size exceeds the ceiling.
pub fn optimize_image(
    data: &str,
    options: &MediaOptimizationOptions,
) -> Result<OptimizedMedia, MediaError> {
    let original_size = estimate_size(data);
    if original_size as f64 <= options.max_size_bytes() {
        return Ok(OptimizedMedia {
            data: data.to_string(),
            original_size,
            size: original_size,
            optimized: false,
        });
    }

    let uri = DataUri::parse(data)?;
    let bytes = uri.decode()?;
    let img = image::load_from_memory(&bytes).map_err(MediaError::Decode)?;

    let (width, height) = scaled_dimensions(img.width(), img.height(), options.max_dimension);
    let img = if (width, height) != (img.width(), img.height()) {
        img.resize_exact(width, height, FilterType::Triangle)
    } else {
        img
    };

    let jpeg = encode_jpeg(&img, options.image_quality)?;
    let data = DataUri::encode("image/jpeg", &jpeg);
    let size = estimate_size(&data);

    log::debug!(
        "Optimized image {} -> {} ({}x{})",
        format_mb(original_size),
        format_mb(size),
        width,
        height
    );

    Ok(OptimizedMedia { data, original_size, size, optimized: true })
}

fn passthrough(item: &RawMedia) -> PreparedMedia {
    let size = item.estimated_size();
    PreparedMedia {
        kind: item.kind,
        name: item.name.clone(),
        data: item.data.clone(),
        original_size: size,
        size,
        optimized: false,
    }
}

/// Optimizes the first `max_images` images of a batch and passes everything else through.
///
/// Images past the limit are dropped. An image that fails to optimize is
/// logged, noted in the report and left out of the result; the rest of the
/// batch is unaffected. Output keeps the input order.
pub fn optimize_media_set(
    media: &[RawMedia],
    options: &MediaOptimizationOptions,
) -> OptimizedMediaSet {
    let mut prepared = Vec::with_capacity(media.len());
    let mut report = Vec::new();
    let mut image_index = 0usize;
    let mut processed_images = 0usize;
    let mut failed_images = 0usize;

    for item in media {
        if item.kind != MediaKind::Image {
            prepared.push(passthrough(item));
            continue;
        }

        image_index += 1;
        if image_index > options.max_images {
            continue;
        }
        processed_images += 1;

        let label = match &item.name {
            Some(name) => format!("Image {image_index} ({name})"),
            None => format!("Image {image_index}"),
        };

        match optimize_image(&item.data, options) {
            Ok(result) => {
                if result.optimized {
                    let reduction = if result.original_size > 0 {
                        100.0 - (result.size as f64 / result.original_size as f64) * 100.0
                    } else {
                        0.0
                    };
                    report.push(format!(
                        "{label}: {} -> {} ({:.0}% reduction)",
                        format_mb(result.original_size),
                        format_mb(result.size),
                        reduction.max(0.0)
                    ));
                } else {
                    report.push(format!(
                        "{label}: {} within limit, unchanged",
                        format_mb(result.original_size)
                    ));
                }
                prepared.push(PreparedMedia {
                    kind: item.kind,
                    name: item.name.clone(),
                    data: result.data,
                    original_size: result.original_size,
                    size: result.size,
                    optimized: result.optimized,
                });
            }
            Err(err) => {
                failed_images += 1;
                log::warn!("{label} optimization failed: {err}");
                report.push(format!("{label}: optimization failed ({err}), skipped"));
            }
        }
    }

    let skipped_images = image_index.saturating_sub(options.max_images);
    if skipped_images > 0 {
        report.push(format!(
            "{skipped_images} additional image(s) omitted (limit: {} images)",
            options.max_images
        ));
    }

    OptimizedMediaSet {
        media: prepared,
        report: report.join("\n"),
        processed_images,
        skipped_images,
        failed_images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{image_media, noise_png_data_uri, padded_data_uri, png_data_uri};

    fn tiny_ceiling() -> MediaOptimizationOptions {
        MediaOptimizationOptions { max_size_mb: 0.0001, max_dimension: 100, ..Default::default() }
    }

    #[test]
    fn scaled_dimensions_preserves_aspect_ratio() {
        assert_eq!(scaled_dimensions(4000, 2000, 1024), (1024, 512));
        assert_eq!(scaled_dimensions(1500, 3000, 1000), (500, 1000));
        assert_eq!(scaled_dimensions(800, 600, 1024), (800, 600));
        assert_eq!(scaled_dimensions(5000, 1, 100), (100, 1));
    }

    #[test]
    fn small_image_is_returned_unchanged() {
        let data = png_data_uri(20, 20);
        let result = optimize_image(&data, &MediaOptimizationOptions::default()).unwrap();

        assert!(!result.optimized);
        assert_eq!(result.data, data);
        assert_eq!(result.size, result.original_size);
    }

    #[test]
    fn oversized_image_is_scaled_below_max_dimension() {
        let data = noise_png_data_uri(400, 200);
        let result = optimize_image(&data, &tiny_ceiling()).unwrap();

        assert!(result.optimized);
        assert!(result.data.starts_with("data:image/jpeg;base64,"));

        let bytes = DataUri::parse(&result.data).unwrap().decode().unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (100, 50));
    }

    #[test]
    fn undecodable_image_fails() {
        let data = padded_data_uri("image/png", 4096);
        let err = optimize_image(&data, &tiny_ceiling()).unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[test]
    fn batch_caps_images_and_reports_omissions() {
        let media: Vec<RawMedia> = (0..5).map(|_| image_media(png_data_uri(10, 10))).collect();
        let options = MediaOptimizationOptions { max_images: 3, ..Default::default() };

        let set = optimize_media_set(&media, &options);

        assert_eq!(set.processed_images, 3);
        assert_eq!(set.skipped_images, 2);
        assert_eq!(set.media.len(), 3);
        assert!(set.report.contains("2 additional image(s) omitted"));
    }

    #[test]
    fn batch_passes_non_images_through_and_survives_failures() {
        let audio = RawMedia {
            kind: MediaKind::Audio,
            data: padded_data_uri("audio/mpeg", 64),
            size: 48,
            name: Some("walkthrough.mp3".into()),
        };
        let broken = RawMedia {
            name: Some("broken.png".into()),
            ..image_media(padded_data_uri("image/png", 4096))
        };
        let good = image_media(noise_png_data_uri(300, 300));

        let set = optimize_media_set(&[audio.clone(), broken, good], &tiny_ceiling());

        assert_eq!(set.failed_images, 1);
        assert_eq!(set.media.len(), 2);
        assert_eq!(set.media[0].kind, MediaKind::Audio);
        assert_eq!(set.media[0].data, audio.data);
        assert!(set.media[1].optimized);
        assert!(set.report.contains("broken.png"));
        assert!(set.report.contains("failed"));
    }
}
