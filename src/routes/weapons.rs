use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::dto::weapon_dto::{UpdateWeapon, Weapon};
use crate::error::ApiError;
use crate::services::catalogue::SqliteCatalogue;

pub async fn get_weapons(
    Extension(catalogue): Extension<SqliteCatalogue>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching weapons.");
    Ok(Json(catalogue.list_weapons().await?))
}

pub async fn get_weapon(
    Extension(catalogue): Extension<SqliteCatalogue>,
    Path(weapon_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(catalogue.get_weapon_by_id(&weapon_id).await?))
}

pub async fn upsert_weapon(
    Extension(catalogue): Extension<SqliteCatalogue>,
    Json(payload): Json<Weapon>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Saving weapon {}", payload.id);
    catalogue.upsert_weapon(&payload).await?;
    Ok((StatusCode::OK, format!("Saved {}.", payload.name)))
}

pub async fn update_weapon(
    Extension(catalogue): Extension<SqliteCatalogue>,
    Path(weapon_id): Path<String>,
    Json(payload): Json<UpdateWeapon>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Updating weapon {}", weapon_id);
    Ok(Json(catalogue.update_weapon(&weapon_id, &payload).await?))
}
