use axum::{
    extract::Extension, routing::{get, post}, Router
};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;

pub mod config;
pub mod error;

pub mod dto {
    pub mod character_dto;
    pub mod draft_dto;
    pub mod score_dto;
    pub mod settings_dto;
    pub mod team_dto;
    pub mod weapon_dto;
}

pub mod routes {
    pub mod characters;
    pub mod draft;
    pub mod teams;
    pub mod weapons;
}

pub mod services {
    pub mod catalogue;
    pub mod cost_model;
    pub mod draft_engine;
    pub mod draft_score;
    pub mod draft_store;
    pub mod pick_order;
    pub mod schema;
    pub mod session_registry;
    pub mod team_rules;
    pub mod turn_timer;
    pub mod websocket;
}

use routes::{characters, draft, teams, weapons};
use services::{catalogue::SqliteCatalogue, draft_store::DraftStore, session_registry::SharedRegistry};

pub fn app(pool: SqlitePool, registry: SharedRegistry, tx: broadcast::Sender<String>) -> Router {
    Router::new()
        .route("/drafts", get(draft::list_drafts).post(draft::create_draft))
        .route("/drafts/{id}", get(draft::get_draft).delete(draft::delete_draft))
        .route("/drafts/{id}/ban", post(draft::ban_character))
        .route("/drafts/{id}/pick", post(draft::select_character))
        .route("/drafts/{id}/skip", post(draft::skip_turn))
        .route("/drafts/{id}/winner", post(draft::set_winner))
        .route("/drafts/{id}/reset", post(draft::reset_draft))
        .route("/drafts/{id}/score", get(draft::get_score))
        .route("/characters", get(characters::get_characters).post(characters::upsert_character))
        .route("/characters/{id}", get(characters::get_character).put(characters::update_character))
        .route("/weapons", get(weapons::get_weapons).post(weapons::upsert_weapon))
        .route("/weapons/{id}", get(weapons::get_weapon).put(weapons::update_weapon))
        .route("/teams", get(teams::get_teams).post(teams::create_team))
        .route("/teams/{id}", axum::routing::delete(teams::delete_team))
        .route("/teams/{id}/validation", get(teams::get_team_validation))
        .route("/ws", get(services::websocket::websocket_handler))
        .layer(Extension(SqliteCatalogue::new(pool.clone())))
        .layer(Extension(DraftStore::new(pool.clone())))
        .layer(Extension(pool))
        .layer(Extension(registry))
        .layer(Extension(tx))
        .layer(CorsLayer::permissive())
}
