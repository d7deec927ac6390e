use std::sync::Arc;

use actix_web::web;
use log::{info, warn};
use uuid::Uuid;

use crate::{
    ENV,
    api::error,
    modules::{
        ai::{
            client::{AiClient, AnalysisRequest, InspectionContext},
            model::{
                AnalyzeModel, AnalyzeResponse, CreateAssistantModel, NewAssistant,
                OptimizationSummary, UpdateAssistantModel, count_by_method,
            },
            repository::AssistantRepository,
            schema::AiAssistantEntity,
        },
        auth::session::SessionContext,
        inspection::{model::InspectionDetail, service::InspectionService},
        media::{
            MediaOptimizationOptions, RawMedia, classify_media, optimize_media_set, validate_media,
        },
    },
};

const DEFAULT_PROMPT: &str =
    "Review this safety inspection. Identify hazards and recommend corrective actions.";

/// Flattens an inspection into the text context sent alongside its images.
pub fn inspection_context(detail: &InspectionDetail) -> InspectionContext {
    let items = detail
        .items
        .iter()
        .map(|item| {
            let value = item.value.as_deref().unwrap_or("(no value)");
            let mut line = format!("{}: {}", item.label, value);
            match item.passed {
                Some(true) => line.push_str(" [pass]"),
                Some(false) => line.push_str(" [fail]"),
                None => {}
            }
            if let Some(notes) = item.notes.as_deref().filter(|n| !n.trim().is_empty()) {
                line.push_str(&format!(" ({notes})"));
            }
            line
        })
        .collect();

    let action_items = detail
        .action_items
        .iter()
        .map(|a| format!("[{}] {} ({})", a.priority.as_str(), a.title, a.status.as_str()))
        .collect();

    InspectionContext {
        title: detail.inspection.title.clone(),
        location: detail.inspection.location.clone(),
        status: detail.inspection.status.as_str().to_string(),
        items,
        action_items,
    }
}

#[derive(Clone)]
pub struct AiService {
    repo: Arc<dyn AssistantRepository + Send + Sync>,
    inspections: InspectionService,
    ai: Option<Arc<dyn AiClient + Send + Sync>>,
}

impl AiService {
    pub fn with_dependencies(
        repo: Arc<dyn AssistantRepository + Send + Sync>,
        inspections: InspectionService,
        ai: Option<Arc<dyn AiClient + Send + Sync>>,
    ) -> Self {
        if ai.is_none() {
            warn!("AI_API_URL is not set; AI endpoints will answer 503");
        }
        info!("AiService initialized with dependencies");
        AiService { repo, inspections, ai }
    }

    pub async fn list_assistants(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<AiAssistantEntity>, error::SystemError> {
        self.repo.list(&session.filter()).await
    }

    pub async fn get_assistant(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<AiAssistantEntity, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .filter(|a| {
                a.organization_id.is_none() || session.can_see(a.organization_id, a.created_by)
            })
            .ok_or_else(|| error::SystemError::not_found("Assistant not found"))
    }

    pub async fn create_assistant(
        &self,
        session: &SessionContext,
        model: CreateAssistantModel,
    ) -> Result<AiAssistantEntity, error::SystemError> {
        let organization_id = model.organization_id.or(session.profile.organization_id);
        if organization_id.is_some() && !session.scope.allows(organization_id) {
            return Err(error::SystemError::forbidden("Organization is outside your scope"));
        }

        let assistant = self
            .repo
            .create(&NewAssistant {
                name: model.name.trim().to_string(),
                description: model.description,
                system_prompt: model.system_prompt,
                model: model.model.unwrap_or_else(|| ENV.ai_model.clone()),
                organization_id,
                created_by: session.user_id(),
            })
            .await?;
        info!("Assistant {} created by {}", assistant.id, session.user_id());
        Ok(assistant)
    }

    /// Shared assistants (no organization) can only be changed with an unrestricted scope.
    fn ensure_writable(
        session: &SessionContext,
        assistant: &AiAssistantEntity,
    ) -> Result<(), error::SystemError> {
        if assistant.organization_id.is_none() && !session.scope.allows(None) {
            return Err(error::SystemError::forbidden("Shared assistants are read-only"));
        }
        Ok(())
    }

    pub async fn update_assistant(
        &self,
        session: &SessionContext,
        id: Uuid,
        model: UpdateAssistantModel,
    ) -> Result<AiAssistantEntity, error::SystemError> {
        let assistant = self.get_assistant(session, id).await?;
        Self::ensure_writable(session, &assistant)?;
        self.repo.update(&id, &model).await
    }

    pub async fn delete_assistant(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<(), error::SystemError> {
        let assistant = self.get_assistant(session, id).await?;
        Self::ensure_writable(session, &assistant)?;
        if !self.repo.delete(&id).await? {
            return Err(error::SystemError::not_found("Assistant not found"));
        }
        Ok(())
    }

    pub async fn analyze(
        &self,
        session: &SessionContext,
        model: AnalyzeModel,
    ) -> Result<AnalyzeResponse, error::SystemError> {
        let ai = self
            .ai
            .clone()
            .ok_or_else(|| error::SystemError::unavailable("AI service is not configured"))?;

        let assistant = match model.assistant_id {
            Some(id) => {
                let assistant = self.get_assistant(session, id).await?;
                if !assistant.is_active {
                    return Err(error::SystemError::bad_request("Assistant is not active"));
                }
                Some(assistant)
            }
            None => None,
        };

        let detail = self.inspections.get_detail(session, model.inspection_id).await?;
        let attachments = self.inspections.media(session, model.inspection_id).await?;
        let raw: Vec<RawMedia> = attachments.iter().map(RawMedia::from).collect();

        let options = MediaOptimizationOptions::default();
        let validation = validate_media(&raw, &options);
        if !validation.valid {
            warn!(
                "Inspection {} media failed pre-flight checks: {}",
                model.inspection_id,
                validation.issues.join("; ")
            );
        }

        let set = web::block(move || optimize_media_set(&raw, &options))
            .await
            .map_err(|e| error::SystemError::InternalError(Box::new(e)))?;

        let classification = classify_media(&set.media);
        let (vision, contextual, excluded) = count_by_method(&classification);
        info!(
            "Analyzing inspection {}: {} image(s), {} contextual, {} excluded",
            model.inspection_id, vision, contextual, excluded
        );

        let context_notes: Vec<String> =
            classification.notes().into_iter().map(str::to_string).collect();
        let images = classification.processable.into_iter().map(|c| c.item.data).collect();

        let (system_prompt, ai_model) = match assistant {
            Some(a) => (Some(a.system_prompt), a.model),
            None => (None, ENV.ai_model.clone()),
        };
        let request = AnalysisRequest {
            model: ai_model,
            system_prompt,
            prompt: model.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            inspection: inspection_context(&detail),
            images,
            context_notes: context_notes.clone(),
        };
        let analysis = ai.analyze(&request).await?;

        Ok(AnalyzeResponse {
            analysis,
            optimization: OptimizationSummary {
                report: set.report,
                processed_images: set.processed_images,
                skipped_images: set.skipped_images,
                failed_images: set.failed_images,
            },
            validation,
            context_notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        modules::{
            ai::client::{AnalysisResponse, ChecklistDraft, ChecklistRequest},
            checklist::{
                model::{FieldModel, NewTemplate, TemplateDetail, UpdateTemplateModel},
                repository::ChecklistRepository,
                schema::{ChecklistFieldEntity, ChecklistTemplateEntity},
                service::ChecklistService,
            },
            inspection::{
                model::{
                    CreateActionItemModel, CreateItemModel, InspectionPatch, NewInspection,
                    NewMedia, UpdateActionItemModel,
                },
                repository::InspectionRepository,
                schema::{
                    ActionItemEntity, ActionPriority, ActionStatus, InspectionEntity,
                    InspectionItemEntity, InspectionMediaEntity, InspectionStatus,
                },
            },
            media::MediaKind,
            organization::scope::{OrgScope, ScopeFilter},
            user::schema::{UserEntity, UserRole},
        },
        test::{png_data_uri, sized_data_uri},
        utils::Claims,
    };

    #[derive(Default)]
    struct RecordingAi {
        requests: Mutex<Vec<AnalysisRequest>>,
    }

    #[async_trait::async_trait]
    impl AiClient for RecordingAi {
        async fn analyze(
            &self,
            request: &AnalysisRequest,
        ) -> Result<AnalysisResponse, error::SystemError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(AnalysisResponse {
                analysis: "Blocked exit near dock 4".into(),
                findings: vec![],
                recommendations: vec![],
            })
        }

        async fn generate_checklist(
            &self,
            _request: &ChecklistRequest,
        ) -> Result<ChecklistDraft, error::SystemError> {
            Err(error::SystemError::unavailable("not used"))
        }
    }

    struct MemoryInspections {
        inspection: InspectionEntity,
        media: Vec<InspectionMediaEntity>,
    }

    #[async_trait::async_trait]
    impl InspectionRepository for MemoryInspections {
        async fn find_by_id(
            &self,
            id: &Uuid,
        ) -> Result<Option<InspectionEntity>, error::SystemError> {
            Ok(Some(self.inspection.clone()).filter(|i| i.id == *id))
        }

        async fn list(
            &self,
            _scope: &ScopeFilter,
            _status: Option<InspectionStatus>,
            _template_id: Option<Uuid>,
            _limit: i64,
        ) -> Result<Vec<InspectionEntity>, error::SystemError> {
            Ok(vec![self.inspection.clone()])
        }

        async fn create(
            &self,
            _inspection: &NewInspection,
        ) -> Result<InspectionEntity, error::SystemError> {
            unimplemented!()
        }

        async fn update(
            &self,
            _id: &Uuid,
            _patch: &InspectionPatch,
        ) -> Result<InspectionEntity, error::SystemError> {
            unimplemented!()
        }

        async fn delete(&self, _id: &Uuid) -> Result<bool, error::SystemError> {
            unimplemented!()
        }

        async fn set_signature(
            &self,
            _id: &Uuid,
            _signature: &str,
        ) -> Result<InspectionEntity, error::SystemError> {
            unimplemented!()
        }

        async fn find_items(
            &self,
            _inspection_id: &Uuid,
        ) -> Result<Vec<InspectionItemEntity>, error::SystemError> {
            Ok(vec![])
        }

        async fn insert_items(
            &self,
            _inspection_id: &Uuid,
            _items: &[CreateItemModel],
        ) -> Result<Vec<InspectionItemEntity>, error::SystemError> {
            unimplemented!()
        }

        async fn find_action_items(
            &self,
            _inspection_id: &Uuid,
        ) -> Result<Vec<ActionItemEntity>, error::SystemError> {
            Ok(vec![])
        }

        async fn create_action_item(
            &self,
            _inspection_id: &Uuid,
            _item: &CreateActionItemModel,
        ) -> Result<ActionItemEntity, error::SystemError> {
            unimplemented!()
        }

        async fn update_action_item(
            &self,
            _inspection_id: &Uuid,
            _id: &Uuid,
            _item: &UpdateActionItemModel,
        ) -> Result<ActionItemEntity, error::SystemError> {
            unimplemented!()
        }

        async fn delete_action_item(
            &self,
            _inspection_id: &Uuid,
            _id: &Uuid,
        ) -> Result<bool, error::SystemError> {
            unimplemented!()
        }

        async fn find_media(
            &self,
            inspection_id: &Uuid,
        ) -> Result<Vec<InspectionMediaEntity>, error::SystemError> {
            Ok(self.media.iter().filter(|m| m.inspection_id == *inspection_id).cloned().collect())
        }

        async fn insert_media(
            &self,
            _media: &NewMedia,
        ) -> Result<InspectionMediaEntity, error::SystemError> {
            unimplemented!()
        }

        async fn delete_media(
            &self,
            _inspection_id: &Uuid,
            _id: &Uuid,
        ) -> Result<bool, error::SystemError> {
            unimplemented!()
        }
    }

    struct NoChecklists;

    #[async_trait::async_trait]
    impl ChecklistRepository for NoChecklists {
        async fn find_by_id(
            &self,
            _id: &Uuid,
        ) -> Result<Option<ChecklistTemplateEntity>, error::SystemError> {
            Ok(None)
        }

        async fn list(
            &self,
            _scope: &ScopeFilter,
            _category: Option<&str>,
            _active: Option<bool>,
        ) -> Result<Vec<ChecklistTemplateEntity>, error::SystemError> {
            Ok(vec![])
        }

        async fn create(
            &self,
            _template: &NewTemplate,
            _fields: &[FieldModel],
        ) -> Result<TemplateDetail, error::SystemError> {
            unimplemented!()
        }

        async fn update(
            &self,
            _id: &Uuid,
            _model: &UpdateTemplateModel,
        ) -> Result<ChecklistTemplateEntity, error::SystemError> {
            unimplemented!()
        }

        async fn delete(&self, _id: &Uuid) -> Result<bool, error::SystemError> {
            unimplemented!()
        }

        async fn find_fields(
            &self,
            _template_id: &Uuid,
        ) -> Result<Vec<ChecklistFieldEntity>, error::SystemError> {
            Ok(vec![])
        }

        async fn replace_fields(
            &self,
            _template_id: &Uuid,
            _fields: &[FieldModel],
        ) -> Result<Vec<ChecklistFieldEntity>, error::SystemError> {
            unimplemented!()
        }

        async fn duplicate(
            &self,
            _id: &Uuid,
            _created_by: &Uuid,
        ) -> Result<TemplateDetail, error::SystemError> {
            unimplemented!()
        }
    }

    struct OneAssistant(AiAssistantEntity);

    #[async_trait::async_trait]
    impl AssistantRepository for OneAssistant {
        async fn find_by_id(
            &self,
            id: &Uuid,
        ) -> Result<Option<AiAssistantEntity>, error::SystemError> {
            Ok(Some(self.0.clone()).filter(|a| a.id == *id))
        }

        async fn list(
            &self,
            _scope: &ScopeFilter,
        ) -> Result<Vec<AiAssistantEntity>, error::SystemError> {
            Ok(vec![self.0.clone()])
        }

        async fn create(
            &self,
            _assistant: &NewAssistant,
        ) -> Result<AiAssistantEntity, error::SystemError> {
            unimplemented!()
        }

        async fn update(
            &self,
            _id: &Uuid,
            _model: &UpdateAssistantModel,
        ) -> Result<AiAssistantEntity, error::SystemError> {
            unimplemented!()
        }

        async fn delete(&self, _id: &Uuid) -> Result<bool, error::SystemError> {
            unimplemented!()
        }
    }

    fn session() -> SessionContext {
        let now = chrono::Utc::now();
        let profile = UserEntity {
            id: Uuid::now_v7(),
            email: "inspector@example.com".into(),
            full_name: None,
            role: UserRole::Inspector,
            organization_id: None,
            created_at: now,
            updated_at: now,
        };
        let claims = Claims {
            sub: profile.id,
            email: Some(profile.email.clone()),
            iat: now.timestamp() as u64,
            exp: now.timestamp() as u64 + 600,
            session_id: None,
            aud: None,
        };
        SessionContext { claims, profile, scope: OrgScope::All }
    }

    fn attachment(
        inspection_id: Uuid,
        kind: MediaKind,
        name: &str,
        data: String,
    ) -> InspectionMediaEntity {
        InspectionMediaEntity {
            id: Uuid::now_v7(),
            inspection_id,
            media_type: kind,
            file_name: name.into(),
            mime_type: data[5..data.find(';').unwrap_or(5)].to_string(),
            size_bytes: data.len() as i64,
            data_uri: data,
            created_at: chrono::Utc::now(),
        }
    }

    fn assistant() -> AiAssistantEntity {
        let now = chrono::Utc::now();
        AiAssistantEntity {
            id: Uuid::now_v7(),
            name: "Site safety".into(),
            description: None,
            system_prompt: "You are a site safety auditor.".into(),
            model: "vision-small".into(),
            organization_id: None,
            is_active: true,
            created_by: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service(
        media: impl FnOnce(Uuid) -> Vec<InspectionMediaEntity>,
        assistant: AiAssistantEntity,
        ai: Option<Arc<dyn AiClient + Send + Sync>>,
    ) -> (AiService, Uuid) {
        let inspection = detail().inspection;
        let id = inspection.id;
        let repo = MemoryInspections { media: media(id), inspection };

        let checklists = ChecklistService::with_dependencies(Arc::new(NoChecklists), None);
        let inspections = InspectionService::with_dependencies(Arc::new(repo), checklists);
        let service =
            AiService::with_dependencies(Arc::new(OneAssistant(assistant)), inspections, ai);
        (service, id)
    }

    fn analyze_model(inspection_id: Uuid, assistant_id: Uuid) -> AnalyzeModel {
        AnalyzeModel { inspection_id, assistant_id: Some(assistant_id), prompt: None }
    }

    #[actix_web::test]
    async fn analyze_sends_capped_images_and_context_notes() {
        let ai = Arc::new(RecordingAi::default());
        let assistant = assistant();
        let assistant_id = assistant.id;
        let (service, id) = service(
            |id| {
                let mut media: Vec<InspectionMediaEntity> = (1..=5)
                    .map(|n| {
                        let name = format!("photo{n}.png");
                        attachment(id, MediaKind::Image, &name, png_data_uri(32, 32))
                    })
                    .collect();
                media.push(attachment(
                    id,
                    MediaKind::Audio,
                    "walkthrough.mp3",
                    "data:audio/mpeg;base64,AAAA".into(),
                ));
                media.push(attachment(
                    id,
                    MediaKind::Document,
                    "permit.pdf",
                    "data:application/pdf;base64,AAAA".into(),
                ));
                media
            },
            assistant,
            Some(ai.clone() as Arc<dyn AiClient + Send + Sync>),
        );

        let model = analyze_model(id, assistant_id);
        let response = service.analyze(&session(), model).await.unwrap();

        let requests = ai.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.images.len(), 3);
        assert!(request.images.iter().all(|img| img.starts_with("data:image/")));
        assert_eq!(request.model, "vision-small");
        assert_eq!(request.system_prompt.as_deref(), Some("You are a site safety auditor."));
        assert_eq!(request.prompt, DEFAULT_PROMPT);

        assert_eq!(request.context_notes.len(), 2);
        assert!(request.context_notes[0].contains("walkthrough.mp3"));
        assert!(request.context_notes[1].contains("permit.pdf"));
        assert_eq!(response.context_notes, request.context_notes);

        assert_eq!(response.optimization.processed_images, 3);
        assert_eq!(response.optimization.skipped_images, 2);
        assert_eq!(response.optimization.failed_images, 0);
        assert_eq!(response.validation.image_count, 5);
        assert_eq!(response.analysis.analysis, "Blocked exit near dock 4");
    }

    #[actix_web::test]
    async fn analyze_counts_broken_images_and_keeps_the_rest() {
        let ai = Arc::new(RecordingAi::default());
        let assistant = assistant();
        let assistant_id = assistant.id;
        let (service, id) = service(
            |id| {
                // Over the 1 MB ceiling, so it must be decoded and fails.
                let broken = sized_data_uri("image/png", 1_200_000);
                vec![
                    attachment(id, MediaKind::Image, "broken.png", broken),
                    attachment(id, MediaKind::Image, "ok.png", png_data_uri(16, 16)),
                ]
            },
            assistant,
            Some(ai.clone() as Arc<dyn AiClient + Send + Sync>),
        );

        let model = AnalyzeModel {
            prompt: Some("Focus on trip hazards".into()),
            ..analyze_model(id, assistant_id)
        };
        let response = service.analyze(&session(), model).await.unwrap();

        assert_eq!(response.optimization.processed_images, 2);
        assert_eq!(response.optimization.failed_images, 1);
        assert!(response.optimization.report.contains("broken.png"));

        let requests = ai.requests.lock().unwrap();
        assert_eq!(requests[0].images.len(), 1);
        assert_eq!(requests[0].prompt, "Focus on trip hazards");
        assert!(requests[0].context_notes.is_empty());
    }

    #[actix_web::test]
    async fn analyze_without_client_is_unavailable() {
        let assistant = assistant();
        let assistant_id = assistant.id;
        let (service, id) = service(|_| vec![], assistant, None);

        let model = analyze_model(id, assistant_id);
        let err = service.analyze(&session(), model).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Unavailable(_)));
    }

    #[actix_web::test]
    async fn analyze_rejects_inactive_assistant() {
        let ai = Arc::new(RecordingAi::default());
        let mut assistant = assistant();
        assistant.is_active = false;
        let assistant_id = assistant.id;
        let (service, id) =
            service(|_| vec![], assistant, Some(ai.clone() as Arc<dyn AiClient + Send + Sync>));

        let model = analyze_model(id, assistant_id);
        let err = service.analyze(&session(), model).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
        assert!(ai.requests.lock().unwrap().is_empty());
    }

    fn detail() -> InspectionDetail {
        let id = Uuid::now_v7();
        let now = chrono::Utc::now();
        InspectionDetail {
            inspection: InspectionEntity {
                id,
                title: "Warehouse B monthly walk".into(),
                description: None,
                location: Some("Dock 4".into()),
                status: InspectionStatus::InProgress,
                template_id: None,
                organization_id: None,
                inspector_id: Uuid::now_v7(),
                scheduled_at: None,
                completed_at: None,
                signature: None,
                created_at: now,
                updated_at: now,
            },
            items: vec![InspectionItemEntity {
                id: Uuid::now_v7(),
                inspection_id: id,
                field_id: None,
                label: "Fire exits clear".into(),
                value: Some("No".into()),
                notes: Some("Pallets blocking east exit".into()),
                passed: Some(false),
                created_at: now,
            }],
            action_items: vec![ActionItemEntity {
                id: Uuid::now_v7(),
                inspection_id: id,
                title: "Clear east exit".into(),
                description: None,
                priority: ActionPriority::Critical,
                status: ActionStatus::Open,
                assigned_to: None,
                due_date: None,
                created_at: now,
                updated_at: now,
            }],
        }
    }

    #[test]
    fn context_summarizes_items_and_actions() {
        let ctx = inspection_context(&detail());

        assert_eq!(ctx.status, "in_progress");
        assert_eq!(ctx.location.as_deref(), Some("Dock 4"));
        assert_eq!(ctx.items, vec!["Fire exits clear: No [fail] (Pallets blocking east exit)"]);
        assert_eq!(ctx.action_items, vec!["[critical] Clear east exit (open)"]);
    }
}
