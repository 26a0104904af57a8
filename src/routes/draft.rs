use axum::{
    extract::{Extension, Path, Json},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, error};
use tokio::sync::broadcast;

use crate::dto::draft_dto::{CharacterTarget, CreateDraft, CreatedDraft, DraftSnapshot, DraftState, SetWinner};
use crate::dto::score_dto::DraftScore;
use crate::error::ApiError;
use crate::services::catalogue::SqliteCatalogue;
use crate::services::cost_model::SettingsCostModel;
use crate::services::draft_engine::DraftAction;
use crate::services::draft_score::score_draft;
use crate::services::draft_store::DraftStore;
use crate::services::session_registry::{SessionRecord, SharedRegistry};
use crate::services::turn_timer::spawn_timer;
use crate::services::websocket::send_draft_update;

async fn run_action(
    registry: &SharedRegistry,
    store: &DraftStore,
    tx: &broadcast::Sender<String>,
    draft_id: &str,
    action: DraftAction,
) -> Result<Json<DraftState>, ApiError> {
    let record = store.apply(registry, draft_id, &action).await?;
    send_draft_update(tx, &record.state);
    Ok(Json(record.state))
}

async fn score_for(record: &SessionRecord, catalogue: &SqliteCatalogue) -> Result<DraftScore, ApiError> {
    let snapshot = catalogue.snapshot().await?;
    Ok(score_draft(&record.state, &snapshot, &SettingsCostModel::new(&record.settings)))
}

pub async fn create_draft(
    Extension(registry): Extension<SharedRegistry>,
    Extension(store): Extension<DraftStore>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Json(payload): Json<CreateDraft>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Creating draft {} vs {}", payload.side_a_name, payload.side_b_name);
    if payload.side_a_name.trim().is_empty() || payload.side_b_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Both sides need a name.".to_string()));
    }

    let record = {
        let mut guard = registry.write().await;
        let id = guard.create_draft(&payload.side_a_name, &payload.side_b_name);
        let task = spawn_timer(registry.clone(), store.clone(), tx.clone(), id.clone());
        guard.attach_timer(&id, task)?;
        let record = guard.get(&id)?.record();
        // Saved before the lock drops so the timer cannot write first.
        if let Err(e) = store.save(&record).await {
            error!("Failed to save draft {}: {:?}", id, e);
        }
        record
    };

    send_draft_update(&tx, &record.state);
    Ok((StatusCode::CREATED, Json(CreatedDraft { id: record.state.id })))
}

pub async fn list_drafts(
    Extension(registry): Extension<SharedRegistry>,
) -> impl IntoResponse {
    let guard = registry.read().await;
    let drafts: Vec<DraftState> = guard.list().into_iter().cloned().collect();
    (StatusCode::OK, Json(drafts))
}

pub async fn get_draft(
    Extension(registry): Extension<SharedRegistry>,
    Extension(catalogue): Extension<SqliteCatalogue>,
    Path(draft_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = registry.read().await.get(&draft_id)?.record();

    // The draft is still usable without a score.
    let score = match score_for(&record, &catalogue).await {
        Ok(score) => Some(score),
        Err(e) => {
            error!("Failed to score draft {}: {}", draft_id, e);
            None
        }
    };

    Ok(Json(DraftSnapshot { state: record.state, timer: record.timer, score }))
}

pub async fn get_score(
    Extension(registry): Extension<SharedRegistry>,
    Extension(catalogue): Extension<SqliteCatalogue>,
    Path(draft_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = registry.read().await.get(&draft_id)?.record();
    Ok(Json(score_for(&record, &catalogue).await?))
}

pub async fn ban_character(
    Extension(registry): Extension<SharedRegistry>,
    Extension(store): Extension<DraftStore>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Path(draft_id): Path<String>,
    Json(payload): Json<CharacterTarget>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Draft {}: ban {}", draft_id, payload.character_id);
    run_action(&registry, &store, &tx, &draft_id, DraftAction::Ban(payload.character_id)).await
}

pub async fn select_character(
    Extension(registry): Extension<SharedRegistry>,
    Extension(store): Extension<DraftStore>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Path(draft_id): Path<String>,
    Json(payload): Json<CharacterTarget>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Draft {}: pick {}", draft_id, payload.character_id);
    run_action(&registry, &store, &tx, &draft_id, DraftAction::Pick(payload.character_id)).await
}

pub async fn skip_turn(
    Extension(registry): Extension<SharedRegistry>,
    Extension(store): Extension<DraftStore>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Path(draft_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Draft {}: skip", draft_id);
    run_action(&registry, &store, &tx, &draft_id, DraftAction::Skip).await
}

pub async fn set_winner(
    Extension(registry): Extension<SharedRegistry>,
    Extension(store): Extension<DraftStore>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Path(draft_id): Path<String>,
    Json(payload): Json<SetWinner>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Draft {}: winner {:?}", draft_id, payload.side);
    run_action(&registry, &store, &tx, &draft_id, DraftAction::SetWinner(payload.side)).await
}

pub async fn reset_draft(
    Extension(registry): Extension<SharedRegistry>,
    Extension(store): Extension<DraftStore>,
    Extension(tx): Extension<broadcast::Sender<String>>,
    Path(draft_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Resetting draft {}", draft_id);

    let record = {
        let mut guard = registry.write().await;
        let record = guard.reset(&draft_id)?;
        let task = spawn_timer(registry.clone(), store.clone(), tx.clone(), draft_id.clone());
        guard.attach_timer(&draft_id, task)?;
        if let Err(e) = store.save(&record).await {
            error!("Failed to save draft {}: {:?}", draft_id, e);
        }
        record
    };

    send_draft_update(&tx, &record.state);
    Ok(Json(record.state))
}

pub async fn delete_draft(
    Extension(registry): Extension<SharedRegistry>,
    Extension(store): Extension<DraftStore>,
    Path(draft_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting draft {}", draft_id);
    store.remove(&registry, &draft_id).await?;

    Ok((StatusCode::OK, format!("Draft {} was removed.", draft_id)))
}
