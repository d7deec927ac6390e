use serde::Serialize;

use crate::modules::media::model::{
    BYTES_PER_MB, MediaKind, MediaOptimizationOptions, RawMedia, format_mb,
};

pub const MAX_RECOMMENDED_IMAGES: usize = 5;
pub const MAX_TOTAL_SIZE_MB: f64 = 10.0;
pub const MAX_IMAGE_SIZE_MB: f64 = 5.0;

#[derive(Debug, Clone, Serialize)]
pub struct MediaValidation {
    pub valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub image_count: usize,
    pub total_size_mb: f64,
}

/// Pre-flight check of the image attachments in a submission.
pub fn validate_media(media: &[RawMedia], options: &MediaOptimizationOptions) -> MediaValidation {
    let images: Vec<&RawMedia> = media.iter().filter(|m| m.kind == MediaKind::Image).collect();
    let image_count = images.len();

    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    let mut total_size = 0u64;
    let mut oversized = false;

    for (idx, image) in images.iter().enumerate() {
        let size = image.estimated_size();
        total_size += size;

        if size as f64 > MAX_IMAGE_SIZE_MB * BYTES_PER_MB {
            oversized = true;
            let label = image.name.clone().unwrap_or_else(|| format!("Image {}", idx + 1));
            issues.push(format!(
                "{label} is too large ({}). Maximum per image: {MAX_IMAGE_SIZE_MB}MB",
                format_mb(size)
            ));
        }
    }

    if image_count > MAX_RECOMMENDED_IMAGES {
        issues.push(format!(
            "Too many images ({image_count}). Maximum recommended: {MAX_RECOMMENDED_IMAGES}"
        ));
    }

    let total_size_mb = total_size as f64 / BYTES_PER_MB;
    if total_size_mb > MAX_TOTAL_SIZE_MB {
        oversized = true;
        issues.push(format!(
            "Total image size too large ({}). Maximum: {MAX_TOTAL_SIZE_MB}MB",
            format_mb(total_size)
        ));
    }

    if image_count > options.max_images {
        recommendations.push(format!(
            "Only the first {} of {image_count} images will be analyzed; \
             select the most relevant ones",
            options.max_images
        ));
    }
    if oversized {
        recommendations.push(format!(
            "Images will be compressed to about {}MB each and at most {}px before analysis",
            options.max_size_mb, options.max_dimension
        ));
    }

    MediaValidation {
        valid: issues.is_empty(),
        issues,
        recommendations,
        image_count,
        total_size_mb: (total_size_mb * 100.0).round() / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{image_media, sized_data_uri};

    const MB: u64 = 1024 * 1024;

    fn image_of(bytes: u64) -> RawMedia {
        image_media(sized_data_uri("image/jpeg", bytes))
    }

    #[test]
    fn small_batch_is_valid() {
        let media = vec![image_of(MB), image_of(MB)];
        let result = validate_media(&media, &MediaOptimizationOptions::default());

        assert!(result.valid);
        assert!(result.issues.is_empty());
        assert!(result.recommendations.is_empty());
        assert_eq!(result.image_count, 2);
        assert_eq!(result.total_size_mb, 2.0);
    }

    #[test]
    fn four_three_megabyte_images_exceed_aggregate_limit() {
        let media: Vec<RawMedia> = (0..4).map(|_| image_of(3 * MB)).collect();
        let result = validate_media(&media, &MediaOptimizationOptions::default());

        assert!(!result.valid);
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].starts_with("Total image size too large"));
        assert!(result.recommendations.iter().any(|r| r.contains("first 3 of 4 images")));
    }

    #[test]
    fn single_large_image_is_invalid() {
        let result =
            validate_media(&[image_of(6 * MB)], &MediaOptimizationOptions::default());

        assert!(!result.valid);
        assert!(result.issues[0].contains("too large"));
    }

    #[test]
    fn more_than_five_images_is_invalid() {
        let media: Vec<RawMedia> = (0..6).map(|_| image_of(1024)).collect();
        let result = validate_media(&media, &MediaOptimizationOptions::default());

        assert!(!result.valid);
        assert!(result.issues.iter().any(|i| i.starts_with("Too many images (6)")));
    }

    #[test]
    fn non_images_are_not_counted() {
        let video = RawMedia {
            kind: MediaKind::Video,
            data: sized_data_uri("video/mp4", 11 * MB),
            size: 11 * MB,
            name: None,
        };
        let result = validate_media(&[video], &MediaOptimizationOptions::default());

        assert!(result.valid);
        assert_eq!(result.image_count, 0);
    }
}
