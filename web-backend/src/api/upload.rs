use actix_multipart::Multipart;
use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures_util::TryStreamExt;
use uploadscan_core::error::CoreError;
use uploadscan_core::{extension_of, secure_filename, ScanResult};

use crate::error::ApiError;
use crate::render::render_page;
use crate::state::AppState;

/// Script types scored as `application/*` even where `mime_guess` reports
/// the newer `text/*` registration.
const MIME_OVERRIDES: &[(&str, &str)] = &[
    (".js", "application/javascript"),
    (".mjs", "application/javascript"),
];

/// The `file` part of an upload form.
#[derive(Debug)]
pub struct UploadedFile {
    /// Already passed through [`secure_filename`], never empty.
    pub filename: String,
    pub data: Vec<u8>,
    pub declared_type: Option<mime::Mime>,
}

impl UploadedFile {
    /// MIME type guessed from the filename; the client's declared type is
    /// not trusted for scoring.
    pub fn guessed_mime(&self) -> Option<String> {
        let extension = extension_of(&self.filename);
        if let Some((_, mime)) = MIME_OVERRIDES.iter().find(|(ext, _)| *ext == extension) {
            return Some(mime.to_string());
        }

        mime_guess::from_path(&self.filename)
            .first()
            .map(|m| m.essence_str().to_string())
    }
}

pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/scan", web::post().to(api_scan));
}

/// GET / - 空白上传表单
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_page(None))
}

/// POST / - 上传、保存并扫描，然后渲染结果页面
pub async fn upload_and_scan(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    check_content_length(&req, state.max_upload_bytes)?;

    let upload = match read_upload(payload, state.max_upload_bytes).await? {
        Some(upload) => upload,
        None => return Ok(redirect_to_form()),
    };

    let result = store_and_scan(&state, upload).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_page(Some(&result))))
}

/// POST /api/scan - 同样的表单，返回 JSON
pub async fn api_scan(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    check_content_length(&req, state.max_upload_bytes)?;

    let upload = read_upload(payload, state.max_upload_bytes)
        .await?
        .ok_or(ApiError::MissingFile)?;

    let result = store_and_scan(&state, upload).await?;
    Ok(HttpResponse::Ok().json(result))
}

fn redirect_to_form() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

fn check_content_length(req: &HttpRequest, limit: usize) -> Result<(), ApiError> {
    let length = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok());

    match length {
        Some(len) if len > limit => Err(ApiError::PayloadTooLarge(limit)),
        _ => Ok(()),
    }
}

/// Reads one multipart field, charging its bytes against the request-wide
/// budget in `consumed`.
async fn read_field(
    field: &mut actix_multipart::Field,
    consumed: &mut usize,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        *consumed += chunk.len();
        if *consumed > limit {
            return Err(ApiError::PayloadTooLarge(limit));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Pulls the first `file` part with a usable filename out of the form.
/// Returns `None` when there is no such part. Every field, skipped ones
/// included, counts toward `limit`, so the cap holds without a
/// `Content-Length` header.
pub async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Option<UploadedFile>, ApiError> {
    let mut upload: Option<UploadedFile> = None;
    let mut consumed = 0usize;

    while let Some(mut field) = payload.try_next().await? {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "file" || upload.is_some() {
            tracing::debug!("Skipping field: {}", field_name);
            read_field(&mut field, &mut consumed, limit).await?;
            continue;
        }

        let raw_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("")
            .to_string();
        let declared_type = field.content_type().cloned();

        let data = read_field(&mut field, &mut consumed, limit).await?;

        let filename = secure_filename(&raw_name);
        if filename.is_empty() {
            tracing::info!("Ignoring upload without a usable filename: {:?}", raw_name);
            continue;
        }

        tracing::info!("Receiving file: {} ({} bytes)", filename, data.len());

        upload = Some(UploadedFile {
            filename,
            data,
            declared_type,
        });
    }

    Ok(upload)
}

/// Stores the upload under its content address and scans the stored copy.
/// Runs on the blocking pool since hashing reads the file synchronously.
async fn store_and_scan(state: &AppState, upload: UploadedFile) -> Result<ScanResult, ApiError> {
    let scanner = state.scanner.clone();
    let store = state.store.clone();

    let result = web::block(move || -> Result<ScanResult, CoreError> {
        let mime_type = upload.guessed_mime();
        if let Some(declared) = &upload.declared_type {
            if mime_type.as_deref() != Some(declared.essence_str()) {
                tracing::debug!(
                    "Declared type {} differs from guessed {:?} for {}",
                    declared,
                    mime_type,
                    upload.filename
                );
            }
        }
        let stored = store.put(&upload.data, &extension_of(&upload.filename))?;

        let mut result = scanner.scan_file(&stored.path, &upload.filename, mime_type.as_deref())?;
        result.stored_as = Some(stored.object_name);
        Ok(result)
    })
    .await??;

    tracing::info!(
        scan_id = %result.scan_id,
        sha256 = %result.sha256,
        score = result.score.value(),
        "Scanned {}: {} risk",
        result.filename,
        result.risk
    );

    Ok(result)
}
