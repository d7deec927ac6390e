use serde::Serialize;

use crate::modules::media::model::{MediaKind, PreparedMedia, RawMedia, format_mb};

/// Read access to the attributes classification needs.
pub trait MediaDescriptor {
    fn kind(&self) -> MediaKind;
    fn name(&self) -> Option<&str>;
    fn size(&self) -> u64;
}

impl MediaDescriptor for RawMedia {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn size(&self) -> u64 {
        self.estimated_size()
    }
}

impl MediaDescriptor for PreparedMedia {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    Vision,
    ContextualDescription,
    Excluded,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedMedia<T> {
    #[serde(flatten)]
    pub item: T,
    pub ai_processable: bool,
    pub processing_method: ProcessingMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaClassification<T> {
    pub processable: Vec<ClassifiedMedia<T>>,
    pub contextual: Vec<ClassifiedMedia<T>>,
    pub excluded: Vec<ClassifiedMedia<T>>,
}

impl<T> MediaClassification<T> {
    /// Notes for contextual and excluded items, in that order.
    pub fn notes(&self) -> Vec<&str> {
        self.contextual
            .iter()
            .chain(self.excluded.iter())
            .filter_map(|c| c.note.as_deref())
            .collect()
    }
}

/// Splits media by how an AI consumer can use it. Input is left untouched.
pub fn classify_media<T>(media: &[T]) -> MediaClassification<T>
where
    T: MediaDescriptor + Clone,
{
    let mut processable = Vec::new();
    let mut contextual = Vec::new();
    let mut excluded = Vec::new();

    for item in media {
        let name = item.name().unwrap_or("unnamed");
        let size = format_mb(item.size());

        match item.kind() {
            MediaKind::Image => processable.push(ClassifiedMedia {
                item: item.clone(),
                ai_processable: true,
                processing_method: ProcessingMethod::Vision,
                note: None,
            }),
            kind @ (MediaKind::Audio | MediaKind::Video) => {
                let label = if kind == MediaKind::Audio { "Audio" } else { "Video" };
                contextual.push(ClassifiedMedia {
                    item: item.clone(),
                    ai_processable: false,
                    processing_method: ProcessingMethod::ContextualDescription,
                    note: Some(format!(
                        "{label} recording \"{name}\" ({size}) is attached to this inspection; \
                         its content cannot be analyzed directly"
                    )),
                })
            }
            MediaKind::Document => excluded.push(ClassifiedMedia {
                item: item.clone(),
                ai_processable: false,
                processing_method: ProcessingMethod::Excluded,
                note: Some(format!("Document \"{name}\" ({size}) was excluded from analysis")),
            }),
        }
    }

    MediaClassification { processable, contextual, excluded }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(kind: MediaKind, name: &str) -> RawMedia {
        RawMedia { kind, data: String::new(), size: 2048, name: Some(name.into()) }
    }

    #[test]
    fn only_images_are_processable() {
        let input = vec![
            media(MediaKind::Image, "crack.jpg"),
            media(MediaKind::Audio, "notes.m4a"),
            media(MediaKind::Video, "walk.mp4"),
            media(MediaKind::Document, "permit.pdf"),
        ];

        let result = classify_media(&input);

        assert_eq!(result.processable.len(), 1);
        assert!(result.processable[0].ai_processable);
        assert_eq!(result.processable[0].processing_method, ProcessingMethod::Vision);

        assert_eq!(result.contextual.len(), 2);
        for item in &result.contextual {
            assert!(!item.ai_processable);
            assert_eq!(item.processing_method, ProcessingMethod::ContextualDescription);
            assert!(item.note.is_some());
        }

        assert_eq!(result.excluded.len(), 1);
        assert_eq!(result.excluded[0].item.name.as_deref(), Some("permit.pdf"));
        assert_eq!(result.notes().len(), 3);
        assert_eq!(input.len(), 4);
    }

    #[test]
    fn processing_method_serializes_snake_case() {
        let result = classify_media(&[media(MediaKind::Video, "walk.mp4")]);
        let json = serde_json::to_value(&result.contextual[0]).unwrap();

        assert_eq!(json["processing_method"], "contextual_description");
        assert_eq!(json["ai_processable"], false);
        assert_eq!(json["kind"], "video");
    }
}
