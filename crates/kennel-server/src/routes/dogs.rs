//! Dog route handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use kennel_db::models::Dog;

use crate::context::AppContext;
use crate::error::AppError;

/// Dog response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DogResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

impl DogResponse {
    pub(crate) fn from_model(dog: &Dog) -> Self {
        Self {
            id: dog.id.get(),
            name: dog.name.clone(),
            created_at: dog.created_at.clone(),
        }
    }
}

/// GET /api/dogs
#[utoipa::path(
    get,
    path = "/api/dogs",
    responses(
        (status = 200, description = "All dogs ordered by name", body = Vec<DogResponse>)
    )
)]
pub async fn list_dogs(State(ctx): State<AppContext>) -> Result<Json<Vec<DogResponse>>, AppError> {
    let conn = kennel_db::pool::get_conn(&ctx.db)?;
    let dogs = kennel_db::queries::dogs::list_dogs_by_name(&conn)?;
    Ok(Json(dogs.iter().map(DogResponse::from_model).collect()))
}
