//! Photograph record route handlers.
//!
//! Every successful submission, and every details lookup that finds nothing,
//! answers `303 See Other` pointing back at the listing. Rejected forms come
//! back as `422` with the submitted values and the dog choices to redisplay.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;
use serde_json::json;

use kennel_core::{Error, ImageContentType, PhotoId, UploadedFile};
use kennel_db::models::{Photo, PhotoWithDog};

use crate::context::AppContext;
use crate::error::AppError;
use crate::photos::{
    CreatePhotoForm, DogChoice, EditForm, EditPhotoForm, FormOutcome, InvalidForm,
};
use crate::routes::dogs::DogResponse;

/// Where every successful submission sends the client.
pub const LIST_PATH: &str = "/api/photos";

/// Multipart field carrying the image on create.
const PHOTO_FIELD: &str = "photo";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A photograph record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    pub id: i64,
    pub dog_id: i64,
    pub file_name: Option<String>,
    /// `YYYY-MM-DD`
    pub date_taken: String,
    pub location: String,
    /// Where the stored image is served, when the record has one.
    pub image_url: Option<String>,
}

impl PhotoResponse {
    pub(crate) fn from_model(photo: &Photo) -> Self {
        Self {
            id: photo.id.get(),
            dog_id: photo.dog_id.get(),
            file_name: photo.file_name.clone(),
            date_taken: photo.date_taken.format("%Y-%m-%d").to_string(),
            location: photo.location.clone(),
            image_url: photo
                .file_name
                .as_ref()
                .map(|_| format!("{LIST_PATH}/image/{}", photo.id)),
        }
    }
}

/// A photograph record with the dog it shows.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PhotoDetailResponse {
    pub photo: PhotoResponse,
    pub dog: DogResponse,
}

impl PhotoDetailResponse {
    fn from_model(p: &PhotoWithDog) -> Self {
        Self {
            photo: PhotoResponse::from_model(&p.photo),
            dog: DogResponse::from_model(&p.dog),
        }
    }
}

/// One entry of a form's dog selector.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DogChoiceResponse {
    pub id: i64,
    pub label: String,
}

impl DogChoiceResponse {
    fn list(choices: &[DogChoice]) -> Vec<Self> {
        choices
            .iter()
            .map(|c| Self {
                id: c.id.get(),
                label: c.label.clone(),
            })
            .collect()
    }
}

/// Data for an empty create form.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreateFormResponse {
    pub dog_choices: Vec<DogChoiceResponse>,
}

/// Data for the edit form.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EditFormResponse {
    pub photo: PhotoResponse,
    pub dog_choices: Vec<DogChoiceResponse>,
}

/// A rejected submission.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InvalidFormResponse {
    pub errors: Vec<String>,
    /// The submitted fields, echoed back unchanged.
    #[schema(value_type = Object)]
    pub form: serde_json::Value,
    pub dog_choices: Vec<DogChoiceResponse>,
}

impl InvalidFormResponse {
    fn respond<F: Serialize>(invalid: InvalidForm<F>) -> Result<Response, AppError> {
        let form = serde_json::to_value(&invalid.form)
            .map_err(|e| Error::Internal(format!("Failed to encode form: {e}")))?;
        let body = Self {
            errors: invalid.errors,
            form,
            dog_choices: DogChoiceResponse::list(&invalid.dog_choices),
        };
        Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A path segment that is not a number is treated like a missing ID.
fn parse_id(raw: &str) -> Option<PhotoId> {
    raw.parse().ok()
}

fn back_to_list() -> Response {
    Redirect::to(LIST_PATH).into_response()
}

fn edit_response(edit: EditForm) -> Json<EditFormResponse> {
    Json(EditFormResponse {
        photo: PhotoResponse::from_model(&edit.photo),
        dog_choices: DogChoiceResponse::list(&edit.dog_choices),
    })
}

fn upload_rejection(e: MultipartError) -> Response {
    tracing::debug!("Rejected multipart body: {}", e.body_text());
    (
        e.status(),
        Json(json!({
            "error": e.body_text(),
            "code": "invalid_upload",
        })),
    )
        .into_response()
}

/// Pull the allow-listed create fields and the image part out of a
/// multipart body. Unknown parts are skipped.
async fn read_create_form(
    multipart: &mut Multipart,
) -> Result<(CreatePhotoForm, Option<UploadedFile>), MultipartError> {
    let mut form = CreatePhotoForm::default();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            PHOTO_FIELD => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(String::from);
                let data = field.bytes().await?;
                upload = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            "date_taken" => form.date_taken = Some(field.text().await?),
            "location" => form.location = Some(field.text().await?),
            "dog_id" => form.dog_id = Some(field.text().await?),
            _ => {}
        }
    }

    Ok((form, upload))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/photos
#[utoipa::path(
    get,
    path = "/api/photos",
    responses(
        (status = 200, description = "All photograph records with their dogs", body = Vec<PhotoDetailResponse>)
    )
)]
pub async fn list_photos(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<PhotoDetailResponse>>, AppError> {
    let photos = ctx.photos.list_photos()?;
    Ok(Json(photos.iter().map(PhotoDetailResponse::from_model).collect()))
}

/// GET /api/photos/details
#[utoipa::path(
    get,
    path = "/api/photos/details",
    responses((status = 303, description = "No ID given; back to the listing"))
)]
pub async fn photo_details_missing() -> Response {
    back_to_list()
}

/// GET /api/photos/details/{id}
#[utoipa::path(
    get,
    path = "/api/photos/details/{id}",
    params(("id" = String, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photograph record with its dog", body = PhotoDetailResponse),
        (status = 303, description = "Unknown ID; back to the listing")
    )
)]
pub async fn photo_details(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    match ctx.photos.get_photo(parse_id(&id))? {
        Some(p) => Ok(Json(PhotoDetailResponse::from_model(&p)).into_response()),
        None => Ok(back_to_list()),
    }
}

/// GET /api/photos/create
#[utoipa::path(
    get,
    path = "/api/photos/create",
    responses((status = 200, description = "Dog choices ordered by name", body = CreateFormResponse))
)]
pub async fn create_form(
    State(ctx): State<AppContext>,
) -> Result<Json<CreateFormResponse>, AppError> {
    let choices = ctx.photos.prepare_create_form()?;
    Ok(Json(CreateFormResponse {
        dog_choices: DogChoiceResponse::list(&choices),
    }))
}

/// POST /api/photos/create
#[utoipa::path(
    post,
    path = "/api/photos/create",
    request_body(content = CreatePhotoForm, content_type = "multipart/form-data",
        description = "Record fields plus the image in a `photo` part"),
    responses(
        (status = 303, description = "Record and image stored"),
        (status = 422, description = "Submission rejected", body = InvalidFormResponse),
        (status = 413, description = "Upload too large")
    )
)]
pub async fn create_photo(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let (form, upload) = match read_create_form(&mut multipart).await {
        Ok(parts) => parts,
        Err(e) => return Ok(upload_rejection(e)),
    };

    match ctx.photos.create_photo(form, upload)? {
        FormOutcome::Saved(_) => Ok(back_to_list()),
        FormOutcome::Invalid(invalid) => InvalidFormResponse::respond(invalid),
    }
}

/// GET /api/photos/edit
#[utoipa::path(
    get,
    path = "/api/photos/edit",
    responses((status = 404, description = "No ID given"))
)]
pub async fn edit_form_missing(
    State(ctx): State<AppContext>,
) -> Result<Json<EditFormResponse>, AppError> {
    Ok(edit_response(ctx.photos.prepare_edit_form(None)?))
}

/// GET /api/photos/edit/{id}
#[utoipa::path(
    get,
    path = "/api/photos/edit/{id}",
    params(("id" = String, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Record and dog choices labelled by ID", body = EditFormResponse),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn edit_form(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<EditFormResponse>, AppError> {
    Ok(edit_response(ctx.photos.prepare_edit_form(parse_id(&id))?))
}

/// POST /api/photos/edit/{id}
#[utoipa::path(
    post,
    path = "/api/photos/edit/{id}",
    params(("id" = String, Path, description = "Photo ID")),
    request_body(content = EditPhotoForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Record updated"),
        (status = 404, description = "Photo not found or ID mismatch"),
        (status = 409, description = "Concurrent update"),
        (status = 422, description = "Submission rejected", body = InvalidFormResponse)
    )
)]
pub async fn update_photo(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Form(form): Form<EditPhotoForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&id).ok_or_else(|| Error::not_found("photo", id))?;

    match ctx.photos.update_photo(id, form)? {
        FormOutcome::Saved(_) => Ok(back_to_list()),
        FormOutcome::Invalid(invalid) => InvalidFormResponse::respond(invalid),
    }
}

/// GET /api/photos/delete
#[utoipa::path(
    get,
    path = "/api/photos/delete",
    responses((status = 404, description = "No ID given"))
)]
pub async fn delete_form_missing(
    State(ctx): State<AppContext>,
) -> Result<Json<PhotoDetailResponse>, AppError> {
    let photo = ctx.photos.prepare_delete_form(None)?;
    Ok(Json(PhotoDetailResponse::from_model(&photo)))
}

/// GET /api/photos/delete/{id}
#[utoipa::path(
    get,
    path = "/api/photos/delete/{id}",
    params(("id" = String, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Record to confirm deletion of", body = PhotoDetailResponse),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn delete_form(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<PhotoDetailResponse>, AppError> {
    let photo = ctx.photos.prepare_delete_form(parse_id(&id))?;
    Ok(Json(PhotoDetailResponse::from_model(&photo)))
}

/// POST /api/photos/delete/{id}
#[utoipa::path(
    post,
    path = "/api/photos/delete/{id}",
    params(("id" = String, Path, description = "Photo ID")),
    responses(
        (status = 303, description = "Record deleted"),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn delete_photo(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id).ok_or_else(|| Error::not_found("photo", id))?;
    ctx.photos.confirm_delete(id)?;
    Ok(back_to_list())
}

/// GET /api/photos/image/{id}
#[utoipa::path(
    get,
    path = "/api/photos/image/{id}",
    params(("id" = String, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Stored image bytes"),
        (status = 404, description = "Photo or image not found")
    )
)]
pub async fn photo_image(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id).ok_or_else(|| Error::not_found("photo", id))?;
    let path = ctx.photos.image_path(id)?;

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::not_found("image", id).into())
        }
        Err(e) => return Err(Error::from(e).into()),
    };

    let content_type = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(ImageContentType::from_file_name)
        .map(|t| t.mime())
        .unwrap_or("application/octet-stream");

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], data))
}
