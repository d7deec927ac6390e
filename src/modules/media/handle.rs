use actix_web::{post, web};

use crate::{
    api::{error, success},
    modules::media::{
        MediaValidation, classify_media,
        model::{MediaBatchModel, MediaOptimizeResponse},
        optimize_media_set, validate_media,
    },
    utils::ValidatedJson,
};

#[post("/validate")]
pub async fn validate_media_batch(
    body: ValidatedJson<MediaBatchModel>,
) -> Result<success::Success<MediaValidation>, error::Error> {
    let MediaBatchModel { media, options } = body.0;
    let result = validate_media(&media, &options);
    Ok(success::Success::ok(Some(result)).message("Media validated"))
}

#[post("/optimize")]
pub async fn optimize_media_batch(
    body: ValidatedJson<MediaBatchModel>,
) -> Result<success::Success<MediaOptimizeResponse>, error::Error> {
    let MediaBatchModel { media, options } = body.0;

    let set = web::block(move || optimize_media_set(&media, &options)).await.map_err(|e| {
        log::error!("Media optimization task failed: {e}");
        error::Error::InternalServer
    })?;

    let classification = classify_media(&set.media);
    let response = MediaOptimizeResponse {
        report: set.report,
        processed_images: set.processed_images,
        skipped_images: set.skipped_images,
        failed_images: set.failed_images,
        classification,
    };

    Ok(success::Success::ok(Some(response)).message("Media optimized"))
}
