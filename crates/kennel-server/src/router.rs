//! Axum router construction.
//!
//! Builds the application router with the photo and dog routes, the OpenAPI
//! document, and the middleware stack.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::photos::{CreatePhotoForm, EditPhotoForm};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::photos::list_photos,
        routes::photos::photo_details_missing,
        routes::photos::photo_details,
        routes::photos::create_form,
        routes::photos::create_photo,
        routes::photos::edit_form_missing,
        routes::photos::edit_form,
        routes::photos::update_photo,
        routes::photos::delete_form_missing,
        routes::photos::delete_form,
        routes::photos::delete_photo,
        routes::photos::photo_image,
        routes::dogs::list_dogs,
    ),
    components(schemas(
        routes::photos::PhotoResponse,
        routes::photos::PhotoDetailResponse,
        routes::photos::DogChoiceResponse,
        routes::photos::CreateFormResponse,
        routes::photos::EditFormResponse,
        routes::photos::InvalidFormResponse,
        routes::dogs::DogResponse,
        CreatePhotoForm,
        EditPhotoForm,
    ))
)]
pub struct ApiDoc;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload = ctx.config.photos.max_upload_bytes;

    let photos = Router::new()
        .route("/", get(routes::photos::list_photos))
        .route("/details", get(routes::photos::photo_details_missing))
        .route("/details/{id}", get(routes::photos::photo_details))
        .route(
            "/create",
            get(routes::photos::create_form).post(routes::photos::create_photo),
        )
        .route("/edit", get(routes::photos::edit_form_missing))
        .route(
            "/edit/{id}",
            get(routes::photos::edit_form).post(routes::photos::update_photo),
        )
        .route("/delete", get(routes::photos::delete_form_missing))
        .route(
            "/delete/{id}",
            get(routes::photos::delete_form).post(routes::photos::delete_photo),
        )
        .route("/image/{id}", get(routes::photos::photo_image))
        .layer(DefaultBodyLimit::max(max_upload));

    let api = Router::new()
        .nest("/photos", photos)
        .route("/dogs", get(routes::dogs::list_dogs));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
