use crate::{docs, handlers, middleware};
use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::services::ServeDir;
use userbase_app::domain::UPLOADS_ROUTE;
use userbase_app::AppContext;

/// Room for the text fields and multipart framing on top of the file limit.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// The `/api` routes.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppContext> {
    Router::new()
        .route("/create-user", post(handlers::create_user))
        .route("/single-user/{id}", get(handlers::single_user))
        .route("/update-user/{id}", put(handlers::update_user))
        .route("/delete-user/{id}", delete(handlers::delete_user))
        .route("/allusers", get(handlers::all_users))
        .route("/checkemailexists", post(handlers::check_email_exists))
        .method_not_allowed_fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes + FORM_OVERHEAD_BYTES))
}

/// Full application: API, uploaded files, docs, public assets, 404 fallback.
pub fn app(ctx: AppContext) -> Router {
    let uploads = ServeDir::new(ctx.storage.root())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    let public = ServeDir::new(&ctx.config.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    let router = Router::new()
        .nest("/api", api_routes(ctx.storage.max_file_bytes()))
        .nest_service(UPLOADS_ROUTE, uploads)
        .route("/api-docs", get(docs::swagger_ui))
        .route(docs::OPENAPI_PATH, get(docs::openapi_json))
        .method_not_allowed_fallback(handlers::not_found)
        .fallback_service(public)
        .with_state(ctx);

    middleware::apply(router)
}
