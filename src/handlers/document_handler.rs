use actix_multipart::Multipart;
use actix_web::{http::header::CONTENT_TYPE, post, web, HttpRequest, HttpResponse};
use futures::TryStreamExt;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    middleware::get_request_id,
    services::document_service::UploadedFile,
};

const PDF_FIELD: &str = "pdf";

/// Accepts a `multipart/form-data` upload carrying the PDF in its `pdf` field.
#[post("/process-pdf")]
pub async fn process_pdf(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();

    let upload = if is_multipart(&req) {
        let multipart = Multipart::new(req.headers(), payload);
        read_pdf_field(multipart, state.config.max_upload_bytes).await?
    } else {
        None
    };

    if let Some(file) = &upload {
        log::info!(
            "[{}] Received '{}' ({} bytes)",
            request_id,
            file.file_name.as_deref().unwrap_or_default(),
            file.bytes.len()
        );
    }

    let document = state.document_service.process(upload)?;

    Ok(HttpResponse::Ok().json(document))
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("multipart/form-data"))
}

/// Buffers the first `pdf` part, skipping every other field.
async fn read_pdf_field(
    mut multipart: Multipart,
    max_bytes: usize,
) -> AppResult<Option<UploadedFile>> {
    let mut upload = None;

    while let Some(mut field) = multipart.try_next().await? {
        if upload.is_some() || field.name() != Some(PDF_FIELD) {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > max_bytes {
                log::warn!("Rejected upload larger than {} bytes", max_bytes);
                return Err(AppError::ValidationError(
                    "PDF exceeds the maximum upload size".to_string(),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        upload = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(upload)
}
