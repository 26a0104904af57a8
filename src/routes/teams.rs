use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use sqlx::{SqlitePool, types::Json as SqlxJson};
use tokio::sync::broadcast;
use tracing::{info, error, warn};

use crate::dto::team_dto::{CreateTeam, Team};
use crate::error::ApiError;
use crate::services::catalogue::SqliteCatalogue;
use crate::services::cost_model::SettingsCostModel;
use crate::services::session_registry::SharedRegistry;
use crate::services::team_rules::validate_team;
use crate::services::websocket::send_team_update;

/**
 * GET request to get all the teams.
 */
pub async fn get_teams(Extension(pool): Extension<SqlitePool>,) -> impl IntoResponse {
    info!("Fetching teams.");

    let teams_result = sqlx::query_as::<_, Team>("SELECT * FROM teams ORDER BY id")
        .fetch_all(&pool)
        .await;

    match teams_result {
        Ok(teams) => (StatusCode::OK, Json(teams)),
        Err(e) => {
            error!("DB query error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::<Team>::new()))
        }
    }
}

/**
 * POST request to create a new team.
 */
pub async fn create_team(
    Extension(pool): Extension<SqlitePool>,
    Extension(catalogue): Extension<SqliteCatalogue>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Json(payload): Json<CreateTeam>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Creating a team {}", payload.name);

    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("A team needs a name.".to_string()));
    }

    let mut character_ids: Vec<String> = Vec::with_capacity(payload.character_ids.len());
    for id in payload.character_ids {
        if character_ids.contains(&id) {
            warn!("Dropping duplicate character {} from team {}", id, payload.name);
            continue;
        }
        catalogue.get_character_by_id(&id).await?;
        character_ids.push(id);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO teams (name, character_ids, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&payload.name)
    .bind(SqlxJson(&character_ids))
    .bind(Utc::now().to_rfc3339())
    .execute(&pool)
    .await?;

    send_team_update(&pool, &tx).await;
    Ok((
        StatusCode::CREATED,
        Json(result.last_insert_rowid()),
    ))
}

/**
 * DELETE request to delete a team by its id.
 */
pub async fn delete_team(
    Extension(pool): Extension<SqlitePool>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Path(team_id): Path<i64>
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting the team {}", team_id);

    let result = sqlx::query("DELETE FROM teams WHERE id = ?")
        .bind(team_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Team was not found.".to_string()));
    }

    send_team_update(&pool, &tx).await;
    Ok((StatusCode::OK, "Team was successfully removed.".to_string()))
}

/**
 * GET request to check a team against the roster minimums.
 */
pub async fn get_team_validation(
    Extension(pool): Extension<SqlitePool>,
    Extension(catalogue): Extension<SqliteCatalogue>,
    Extension(registry): Extension<SharedRegistry>,
    Path(team_id): Path<i64>
) -> Result<impl IntoResponse, ApiError> {
    let team = sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = ?")
        .bind(team_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team was not found.".to_string()))?;

    let snapshot = catalogue.snapshot().await?;
    let settings = registry.read().await.settings().clone();
    Ok(Json(validate_team(&team, &snapshot, &SettingsCostModel::new(&settings))))
}
