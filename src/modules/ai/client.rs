use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{api::error, modules::checklist::model::FieldModel};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize)]
pub struct InspectionContext {
    pub title: String,
    pub location: Option<String>,
    pub status: String,
    pub items: Vec<String>,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub inspection: InspectionContext,
    /// Data URIs of the images sent for vision analysis.
    pub images: Vec<String>,
    /// Descriptions standing in for media the model cannot see.
    pub context_notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
    #[serde(default)]
    pub findings: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistDraft {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<FieldModel>,
}

#[async_trait::async_trait]
pub trait AiClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResponse, error::SystemError>;

    async fn generate_checklist(
        &self,
        request: &ChecklistRequest,
    ) -> Result<ChecklistDraft, error::SystemError>;
}

/// JSON-over-HTTP client for the inspection AI service.
#[derive(Clone)]
pub struct HttpAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, error::SystemError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(HttpAiClient { http, base_url: base_url.trim_end_matches('/').to_string(), api_key })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, error::SystemError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let url = self.endpoint(path);
        log::debug!("POST {}", url);

        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::warn!("AI service {} returned {}: {}", url, status, body);
            return Err(error::SystemError::unavailable(format!("AI service returned {status}")));
        }

        Ok(response.json::<Res>().await?)
    }
}

#[async_trait::async_trait]
impl AiClient for HttpAiClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResponse, error::SystemError> {
        self.post("analyze", request).await
    }

    async fn generate_checklist(
        &self,
        request: &ChecklistRequest,
    ) -> Result<ChecklistDraft, error::SystemError> {
        self.post("checklist", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = HttpAiClient::new("https://ai.example.com/v1/", None).unwrap();
        assert_eq!(client.endpoint("analyze"), "https://ai.example.com/v1/analyze");
        assert_eq!(client.endpoint("/checklist"), "https://ai.example.com/v1/checklist");
    }

    #[test]
    fn checklist_draft_accepts_missing_name() {
        let draft: ChecklistDraft = serde_json::from_str(
            r#"{"fields":[{"label":"Guard rails installed","field_type":"checkbox"}]}"#,
        )
        .unwrap();
        assert!(draft.name.is_none());
        assert_eq!(draft.fields.len(), 1);
        assert!(!draft.fields[0].required);
    }
}
