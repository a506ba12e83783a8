use crate::error::AppError;
use crate::models::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, http::Uri, Json};

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: match_engine::SERVICE_VERSION,
        cycle: state.store.cycle(),
        loop_state: state.loop_state(),
    })
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{empty_state, state_with_one_match};
    use match_engine::LoopState;

    #[tokio::test]
    async fn test_health_reports_cycle() {
        let Json(body) = health(State(state_with_one_match())).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.cycle, 1);
        assert_eq!(body.loop_state, LoopState::Idle);
    }

    #[tokio::test]
    async fn test_health_before_first_cycle() {
        let Json(body) = health(State(empty_state())).await;
        assert_eq!(body.cycle, 0);
    }
}
