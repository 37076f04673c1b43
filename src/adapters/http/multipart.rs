//! Schema-driven multipart/form-data decoding.
//!
//! Parts are streamed chunk by chunk; the body size limit and the read
//! timeout are enforced while reading, before anything is buffered past the
//! limit.

use std::time::Duration;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::UploadConfig;
use crate::domain::submission::{Attachment, DecodedFields, FieldKind, SubmissionSchema};

/// Bounds applied while decoding one request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_body_bytes: usize,
    pub read_timeout: Duration,
}

impl From<&UploadConfig> for UploadLimits {
    fn from(config: &UploadConfig) -> Self {
        Self {
            max_body_bytes: config.max_body_bytes,
            read_timeout: config.read_timeout(),
        }
    }
}

/// Why a multipart body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected a multipart/form-data body")]
    NotMultipart,

    #[error("missing required field: {label}")]
    MissingField {
        name: &'static str,
        label: &'static str,
    },

    #[error("field '{name}' may only be sent once")]
    DuplicateField { name: &'static str },

    #[error("request body exceeds the limit of {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("timed out reading the request body after {0:?}")]
    Timeout(Duration),

    #[error("malformed multipart body: {0}")]
    Malformed(String),
}

impl ParseError {
    /// HTTP status reported for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotMultipart => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::MissingField { .. } | Self::DuplicateField { .. } | Self::Malformed(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn from_multipart(err: MultipartError, limit: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::BodyTooLarge { limit }
        } else {
            Self::Malformed(err.body_text())
        }
    }
}

/// Decodes `multipart` against `schema`.
///
/// Unknown parts are skipped. A file part with neither a filename nor
/// content counts as absent. Files without a declared content type get one
/// guessed from their filename.
pub async fn parse(
    multipart: Multipart,
    schema: &SubmissionSchema,
    limits: &UploadLimits,
) -> Result<DecodedFields, ParseError> {
    match timeout(limits.read_timeout, decode(multipart, schema, limits.max_body_bytes)).await {
        Ok(result) => result,
        Err(_) => Err(ParseError::Timeout(limits.read_timeout)),
    }
}

async fn decode(
    mut multipart: Multipart,
    schema: &SubmissionSchema,
    limit: usize,
) -> Result<DecodedFields, ParseError> {
    let mut fields = DecodedFields::new();
    let mut total_bytes = 0usize;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ParseError::from_multipart(e, limit))?
    {
        let Some(spec) = field.name().and_then(|name| schema.field(name)) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ParseError::from_multipart(e, limit))?
        {
            total_bytes = total_bytes.saturating_add(chunk.len());
            if total_bytes > limit {
                return Err(ParseError::BodyTooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        match spec.kind {
            FieldKind::Text => {
                let value = String::from_utf8(data).map_err(|_| {
                    ParseError::Malformed(format!("field '{}' is not valid UTF-8", spec.name))
                })?;
                if !fields.insert_text(spec.name, value) {
                    return Err(ParseError::DuplicateField { name: spec.name });
                }
            }
            FieldKind::Files | FieldKind::SingleFile => {
                let file_name = file_name.unwrap_or_default();
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                if spec.kind == FieldKind::SingleFile && fields.file_count(spec.name) > 0 {
                    return Err(ParseError::DuplicateField { name: spec.name });
                }
                let mime_type = content_type
                    .filter(|mime| !mime.trim().is_empty())
                    .unwrap_or_else(|| {
                        mime_guess::from_path(&file_name)
                            .first_or_octet_stream()
                            .to_string()
                    });
                fields.push_file(spec.name, Attachment::new(file_name, mime_type, data));
            }
        }
    }

    if let Some(spec) = schema
        .required_fields()
        .find(|spec| !fields.contains(spec.name))
    {
        return Err(ParseError::MissingField {
            name: spec.name,
            label: spec.label,
        });
    }

    tracing::debug!(
        category = %schema.category(),
        bytes = total_bytes,
        "multipart body decoded"
    );
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::SubmissionCategory;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use futures::stream::{self, StreamExt};

    const BOUNDARY: &str = "XBOUNDARYX";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, Option<&'a str>, &'a [u8]),
    }

    fn body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut out = Vec::new();
        for part in parts {
            out.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    out.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, mime, content) => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                            name, file_name
                        )
                        .as_bytes(),
                    );
                    if let Some(mime) = mime {
                        out.extend_from_slice(format!("Content-Type: {}\r\n", mime).as_bytes());
                    }
                    out.extend_from_slice(b"\r\n");
                    out.extend_from_slice(content);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        out
    }

    async fn multipart(parts: &[Part<'_>]) -> Multipart {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body(parts)))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn limits() -> UploadLimits {
        UploadLimits {
            max_body_bytes: 1024,
            read_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn decodes_repeated_files_in_order() {
        let mp = multipart(&[
            Part::Text("titulo", "Week 1"),
            Part::File("files", "a.txt", Some("text/plain"), b"first"),
            Part::File("files", "b.png", Some("image/png"), b"second"),
        ])
        .await;

        let mut fields = parse(mp, SubmissionCategory::Materials.schema(), &limits())
            .await
            .unwrap();

        assert_eq!(fields.text("titulo"), "Week 1");
        let files = fields.take_files("files");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename(), "a.txt");
        assert_eq!(files[1].filename(), "b.png");
        assert_eq!(files[1].content(), b"second");
    }

    #[tokio::test]
    async fn missing_pdf_file_names_its_label() {
        let mp = multipart(&[Part::Text("title", "Handbook")]).await;

        let err = parse(mp, SubmissionCategory::Pdf.schema(), &limits())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ParseError::MissingField {
                name: "file",
                label: "PDF file"
            }
        );
        assert!(err.to_string().contains("PDF"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_file_input_counts_as_absent() {
        let mp = multipart(&[
            Part::Text("titulo", "Notice"),
            Part::Text("texto", "Body"),
            Part::File("imagem", "", Some("application/octet-stream"), b""),
        ])
        .await;

        let mut fields = parse(mp, SubmissionCategory::Announcement.schema(), &limits())
            .await
            .unwrap();

        assert!(fields.take_file("imagem").is_none());
    }

    #[tokio::test]
    async fn second_single_file_is_duplicate() {
        let mp = multipart(&[
            Part::File("file", "a.pdf", Some("application/pdf"), b"%PDF"),
            Part::File("file", "b.pdf", Some("application/pdf"), b"%PDF"),
        ])
        .await;

        let err = parse(mp, SubmissionCategory::Pdf.schema(), &limits())
            .await
            .unwrap_err();

        assert_eq!(err, ParseError::DuplicateField { name: "file" });
    }

    #[tokio::test]
    async fn repeated_text_is_duplicate() {
        let mp = multipart(&[Part::Text("title", "a"), Part::Text("title", "b")]).await;

        let err = parse(mp, SubmissionCategory::Pdf.schema(), &limits())
            .await
            .unwrap_err();

        assert_eq!(err, ParseError::DuplicateField { name: "title" });
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let big = vec![b'x'; 2048];
        let mp = multipart(&[Part::File("files", "big.bin", None, &big)]).await;

        let err = parse(mp, SubmissionCategory::Materials.schema(), &limits())
            .await
            .unwrap_err();

        assert_eq!(err, ParseError::BodyTooLarge { limit: 1024 });
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_parts_are_skipped() {
        let mp = multipart(&[
            Part::Text("csrf", "token"),
            Part::File("file", "doc.pdf", Some("application/pdf"), b"%PDF"),
        ])
        .await;

        let fields = parse(mp, SubmissionCategory::Pdf.schema(), &limits())
            .await
            .unwrap();

        assert!(!fields.contains("csrf"));
        assert_eq!(fields.file_count("file"), 1);
    }

    #[tokio::test]
    async fn missing_content_type_is_guessed_from_name() {
        let mp = multipart(&[
            Part::File("file", "doc.pdf", None, b"%PDF"),
        ])
        .await;

        let mut fields = parse(mp, SubmissionCategory::Pdf.schema(), &limits())
            .await
            .unwrap();

        let file = fields.take_file("file").unwrap();
        assert_eq!(file.mime_type(), "application/pdf");
    }

    #[tokio::test]
    async fn unknown_extension_falls_back_to_octet_stream() {
        let mp = multipart(&[Part::File("files", "blob", None, b"data")]).await;

        let mut fields = parse(mp, SubmissionCategory::Materials.schema(), &limits())
            .await
            .unwrap();

        let files = fields.take_files("files");
        assert_eq!(files[0].mime_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn stalled_body_times_out() {
        let first_part = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"titulo\"\r\n\r\nWeek 1\r\n",
            BOUNDARY
        );
        let stream = stream::once(async move { Ok::<_, std::io::Error>(first_part.into_bytes()) })
            .chain(stream::pending());
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from_stream(stream))
            .unwrap();
        let mp = Multipart::from_request(request, &()).await.unwrap();
        let limits = UploadLimits {
            read_timeout: Duration::from_millis(50),
            ..limits()
        };

        let err = parse(mp, SubmissionCategory::Materials.schema(), &limits)
            .await
            .unwrap_err();

        assert_eq!(err, ParseError::Timeout(Duration::from_millis(50)));
        assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn status_codes_match_causes() {
        assert_eq!(
            ParseError::NotMultipart.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ParseError::Timeout(Duration::from_secs(1)).status(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            ParseError::Malformed("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
