use crate::modules::media::handle::*;
use actix_web::web::{self, ServiceConfig, scope};

/// Media batches travel as base64 JSON, well past the default 32KB body limit.
pub const MEDIA_JSON_LIMIT: usize = 64 * 1024 * 1024;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/media")
            .app_data(web::JsonConfig::default().limit(MEDIA_JSON_LIMIT))
            .service(validate_media_batch)
            .service(optimize_media_batch),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use crate::test::png_data_uri;

    fn image(data: String) -> Value {
        json!({ "kind": "image", "data": data })
    }

    #[actix_web::test]
    async fn validate_flags_too_many_images() {
        let app = test::init_service(App::new().service(scope("/api").configure(configure))).await;
        let media: Vec<Value> = (0..6).map(|_| image(png_data_uri(4, 4))).collect();

        let req = test::TestRequest::post()
            .uri("/api/media/validate")
            .set_json(json!({ "media": media }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["valid"], false);
        assert_eq!(body["data"]["image_count"], 6);
    }

    #[actix_web::test]
    async fn optimize_caps_images_and_classifies() {
        let app = test::init_service(App::new().service(scope("/api").configure(configure))).await;
        let mut media: Vec<Value> = (0..4).map(|_| image(png_data_uri(8, 8))).collect();
        media.push(json!({
            "kind": "audio",
            "data": "data:audio/mpeg;base64,AAAA",
            "name": "note.mp3"
        }));

        let req = test::TestRequest::post()
            .uri("/api/media/optimize")
            .set_json(json!({ "media": media, "options": { "max_images": 3 } }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let data = &body["data"];

        assert_eq!(data["processed_images"], 3);
        assert_eq!(data["skipped_images"], 1);
        assert_eq!(data["classification"]["processable"].as_array().unwrap().len(), 3);
        assert_eq!(
            data["classification"]["contextual"][0]["processing_method"],
            "contextual_description"
        );
    }

    #[actix_web::test]
    async fn empty_batch_is_rejected() {
        let app = test::init_service(App::new().service(scope("/api").configure(configure))).await;

        let req = test::TestRequest::post()
            .uri("/api/media/validate")
            .set_json(json!({ "media": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
