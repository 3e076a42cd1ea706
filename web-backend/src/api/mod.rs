use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

pub mod upload;

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; style-src 'self'; form-action 'self'; frame-ancestors 'none'";

/// Registers the page routes, the JSON API and the health check.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(upload::index))
            .route(web::post().to(upload::upload_and_scan)),
    )
    .service(web::scope("/api").configure(upload::configure_api_routes))
    .route("/health", web::get().to(health_check));
}

/// 安全响应头，作用于所有响应
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY))
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "DENY"))
        .add((header::REFERRER_POLICY, "no-referrer"))
}

/// 未匹配路由返回 JSON 404
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    tracing::debug!("No route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Route not found"
    }))
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
