use crate::state::AppState;
use axum::Router;

pub mod client;
mod dto;
pub mod handlers;
mod services;

pub fn router() -> Router<AppState> {
    handlers::generate_routes()
}
