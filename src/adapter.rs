use crate::config::DefaultPrompts;
use crate::converters::helpers::encode_base64;
use crate::error::GenerationError;
use axum::extract::Multipart;
use bytes::Bytes;
use std::fmt;
use tracing::debug;

const PROMPT_FIELD: &str = "prompt";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Image,
    Document,
    Audio,
}

impl AttachmentKind {
    /// Multipart field the file is uploaded under.
    pub fn field_name(self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Document => "document",
            AttachmentKind::Audio => "audio",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub data: Bytes,
    pub mime_type: String,
    pub kind: AttachmentKind,
}

impl Attachment {
    pub fn encode_inline(&self) -> String {
        encode_base64(&self.data)
    }
}

/// A single normalized generation call. At least one of the two fields is set.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: Option<String>,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub content_type: String,
}

/// Raw fields pulled out of a multipart upload, before validation.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub prompt: Option<String>,
    pub file: Option<UploadedFile>,
}

fn non_blank(prompt: Option<String>) -> Option<String> {
    prompt.filter(|p| !p.trim().is_empty())
}

pub fn normalize_text(prompt: Option<String>) -> Result<GenerationRequest, GenerationError> {
    let prompt = non_blank(prompt).ok_or_else(|| GenerationError::missing_field(PROMPT_FIELD))?;
    Ok(GenerationRequest {
        prompt: Some(prompt),
        attachment: None,
    })
}

pub fn normalize_upload(
    kind: AttachmentKind,
    form: UploadForm,
    defaults: &DefaultPrompts,
) -> Result<GenerationRequest, GenerationError> {
    let file = form
        .file
        .ok_or_else(|| GenerationError::missing_field(kind.field_name()))?;

    let prompt = non_blank(form.prompt).or_else(|| defaults.for_kind(kind).map(str::to_string));

    Ok(GenerationRequest {
        prompt,
        attachment: Some(Attachment {
            data: file.data,
            mime_type: file.content_type,
            kind,
        }),
    })
}

/// Drains the multipart stream, keeping the first file sent under the kind's
/// field name and the `prompt` text field. A plain text part under the kind's
/// name is not a file and is ignored.
pub async fn read_upload_form(
    kind: AttachmentKind,
    multipart: &mut Multipart,
) -> Result<UploadForm, GenerationError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GenerationError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        // Only a part with a filename counts as the upload
        let is_file = field.file_name().is_some();
        if name == kind.field_name() && is_file && form.file.is_none() {
            let content_type = field
                .content_type()
                .unwrap_or(FALLBACK_MIME_TYPE)
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| GenerationError::Validation(e.body_text()))?;
            debug!("Received {} upload: {} bytes of {}", kind, data.len(), content_type);
            form.file = Some(UploadedFile { data, content_type });
        } else if name == PROMPT_FIELD {
            let text = field
                .text()
                .await
                .map_err(|e| GenerationError::Validation(e.body_text()))?;
            form.prompt = Some(text);
        } else {
            debug!("Ignoring multipart field '{}'", name);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_AUDIO_PROMPT, DEFAULT_DOCUMENT_PROMPT};
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use base64::{Engine, engine::general_purpose::STANDARD};

    fn upload(prompt: Option<&str>, with_file: bool) -> UploadForm {
        UploadForm {
            prompt: prompt.map(str::to_string),
            file: with_file.then(|| UploadedFile {
                data: Bytes::from_static(b"%PDF-1.4 fake"),
                content_type: "application/pdf".to_string(),
            }),
        }
    }

    #[test]
    fn test_text_prompt_is_required() {
        assert!(matches!(normalize_text(None), Err(GenerationError::Validation(_))));
        assert!(matches!(
            normalize_text(Some("   ".to_string())),
            Err(GenerationError::Validation(_))
        ));

        let request = normalize_text(Some("Write a haiku".to_string())).unwrap();
        assert_eq!(request.prompt.as_deref(), Some("Write a haiku"));
        assert!(request.attachment.is_none());
    }

    #[test]
    fn test_missing_file_is_rejected_for_every_kind() {
        let defaults = DefaultPrompts::default();
        for kind in [AttachmentKind::Image, AttachmentKind::Document, AttachmentKind::Audio] {
            let err = normalize_upload(kind, upload(Some("describe"), false), &defaults).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("missing required field '{}'", kind.field_name())
            );
        }
    }

    #[test]
    fn test_document_and_audio_fall_back_to_default_prompt() {
        let defaults = DefaultPrompts::default();

        let doc = normalize_upload(AttachmentKind::Document, upload(None, true), &defaults).unwrap();
        assert_eq!(doc.prompt.as_deref(), Some(DEFAULT_DOCUMENT_PROMPT));

        let audio = normalize_upload(AttachmentKind::Audio, upload(Some(""), true), &defaults).unwrap();
        assert_eq!(audio.prompt.as_deref(), Some(DEFAULT_AUDIO_PROMPT));

        let image = normalize_upload(AttachmentKind::Image, upload(None, true), &defaults).unwrap();
        assert!(image.prompt.is_none());
        assert_eq!(image.attachment.unwrap().kind, AttachmentKind::Image);
    }

    #[test]
    fn test_caller_prompt_wins_over_default() {
        let defaults = DefaultPrompts::default();
        let doc = normalize_upload(AttachmentKind::Document, upload(Some("List the authors"), true), &defaults)
            .unwrap();
        assert_eq!(doc.prompt.as_deref(), Some("List the authors"));
        assert_eq!(doc.attachment.unwrap().mime_type, "application/pdf");
    }

    #[test]
    fn test_inline_encoding_round_trip() {
        let raw: Vec<u8> = (0..=255u8).chain([0, 0, 1]).collect();
        let attachment = Attachment {
            data: Bytes::from(raw.clone()),
            mime_type: "audio/mpeg".to_string(),
            kind: AttachmentKind::Audio,
        };
        let encoded = attachment.encode_inline();
        assert_eq!(STANDARD.decode(encoded).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_read_upload_form() {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             ignored\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"prompt\"\r\n\r\n\
             What is in this picture?\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"cat.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let req = Request::builder()
            .method("POST")
            .uri("/generate-from-image")
            .header("content-type", format!("multipart/form-data; boundary={}", boundary))
            .body(Body::from(body))
            .unwrap();
        let mut multipart = Multipart::from_request(req, &()).await.unwrap();

        let form = read_upload_form(AttachmentKind::Image, &mut multipart).await.unwrap();
        assert_eq!(form.prompt.as_deref(), Some("What is in this picture?"));
        let file = form.file.unwrap();
        assert_eq!(file.content_type, "image/png");
        assert_eq!(&file.data[..], b"PNGDATA");
    }

    #[tokio::test]
    async fn test_read_upload_form_without_content_type() {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"audio\"; filename=\"clip\"\r\n\r\n\
             RIFF\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let req = Request::builder()
            .method("POST")
            .uri("/generate-from-audio")
            .header("content-type", format!("multipart/form-data; boundary={}", boundary))
            .body(Body::from(body))
            .unwrap();
        let mut multipart = Multipart::from_request(req, &()).await.unwrap();

        let form = read_upload_form(AttachmentKind::Audio, &mut multipart).await.unwrap();
        assert!(form.prompt.is_none());
        assert_eq!(form.file.unwrap().content_type, FALLBACK_MIME_TYPE);
    }

    #[tokio::test]
    async fn test_text_part_under_file_name_is_not_an_upload() {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"image\"\r\n\r\n\
             not a file\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"prompt\"\r\n\r\n\
             Describe it\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let req = Request::builder()
            .method("POST")
            .uri("/generate-from-image")
            .header("content-type", format!("multipart/form-data; boundary={}", boundary))
            .body(Body::from(body))
            .unwrap();
        let mut multipart = Multipart::from_request(req, &()).await.unwrap();

        let form = read_upload_form(AttachmentKind::Image, &mut multipart).await.unwrap();
        assert!(form.file.is_none());
        assert_eq!(form.prompt.as_deref(), Some("Describe it"));

        let err = normalize_upload(AttachmentKind::Image, form, &DefaultPrompts::default()).unwrap_err();
        assert_eq!(err.to_string(), "missing required field 'image'");
    }
}
