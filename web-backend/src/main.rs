use actix_cors::Cors;
use actix_files::Files;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod render;
mod state;

use api::{configure_routes, not_found, security_headers};
use config::ServerConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uploadscan_web=debug,uploadscan_core=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // 初始化状态（扫描器和上传目录）
    let state = AppState::new(&config)?;

    let bind_address = config.bind_address.clone();
    let static_dir = config.static_dir.clone();
    tracing::info!(
        max_upload_bytes = config.max_upload_bytes,
        "Upload scanner listening on {}",
        bind_address
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(security_headers())
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            // 页面、API 和健康检查
            .configure(configure_routes)
            // 静态文件服务
            .service(Files::new("/static", static_dir.clone()))
            // 未匹配路由
            .default_service(web::to(not_found))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
