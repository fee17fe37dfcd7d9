use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .merge(file_routes())
        .merge(upload_routes(config.upload.max_body_bytes))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::google_login))
        .routes(routes!(handlers::auth::email_login))
        .routes(routes!(handlers::auth::email_signup))
}

fn file_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::search::search_files))
        .routes(routes!(handlers::keywords::frequent_keywords))
        .routes(routes!(handlers::download::download_single_file))
        .routes(routes!(handlers::download::download_selected_files))
        .routes(routes!(handlers::delete::delete_file))
}

fn upload_routes(max_body_bytes: usize) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_files))
        .layer(handlers::upload::upload_body_limit(max_body_bytes))
}
