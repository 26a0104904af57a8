use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tokio::sync::broadcast;
use tracing::info;

use crate::dto::character_dto::{Character, UpdateCharacter};
use crate::error::ApiError;
use crate::services::catalogue::SqliteCatalogue;
use crate::services::websocket::send_characters_update;

/**
 * GET request to get every catalogued character.
 */
pub async fn get_characters(
    Extension(catalogue): Extension<SqliteCatalogue>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching characters.");
    Ok(Json(catalogue.list_characters().await?))
}

pub async fn get_character(
    Extension(catalogue): Extension<SqliteCatalogue>,
    Path(character_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(catalogue.get_character_by_id(&character_id).await?))
}

/**
 * POST request to add a character or replace its record.
 */
pub async fn upsert_character(
    Extension(catalogue): Extension<SqliteCatalogue>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Json(payload): Json<Character>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Saving character {}", payload.id);
    catalogue.upsert_character(&payload).await?;
    send_characters_update(&tx, catalogue.list_characters().await?);
    Ok((StatusCode::OK, format!("Saved {}.", payload.name)))
}

/**
 * PUT request to change ownership, level, constellation or the equipped weapon.
 */
pub async fn update_character(
    Extension(catalogue): Extension<SqliteCatalogue>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Path(character_id): Path<String>,
    Json(payload): Json<UpdateCharacter>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Updating character {}", character_id);
    let character = catalogue.update_character(&character_id, &payload).await?;
    send_characters_update(&tx, catalogue.list_characters().await?);
    Ok(Json(character))
}
