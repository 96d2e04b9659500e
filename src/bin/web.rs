//! Single binary web server exposing the tournament engine as a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. See `swiss_tournament::config` for the
//! environment variables (HOST, PORT, STORAGE, ...).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use swiss_tournament::{Config, EngineError, GameId, PlayerId, Scorecard, TournamentEngine, TournamentError};
use tokio::sync::Mutex;

/// One engine, one writer at a time: every command locks it for the mutation and the save.
type AppState = Data<Mutex<TournamentEngine>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct AssignPlayerBody {
    game_id: GameId,
}

/// Path segment: player id (e.g. /api/players/{player_id})
#[derive(Deserialize)]
struct PlayerPath {
    player_id: PlayerId,
}

/// Path segment: game id (e.g. /api/games/{game_id})
#[derive(Deserialize)]
struct GamePath {
    game_id: GameId,
}

fn error_response(err: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        EngineError::Tournament(TournamentError::PlayerNotFound(_) | TournamentError::GameNotFound(_)) => {
            HttpResponse::NotFound().json(body)
        }
        EngineError::Tournament(_) => HttpResponse::BadRequest().json(body),
        EngineError::Storage(_) => HttpResponse::InternalServerError().json(body),
    }
}

/// Full tournament view on success, error JSON otherwise.
fn command_response<T>(engine: &TournamentEngine, result: Result<T, EngineError>) -> HttpResponse {
    match result {
        Ok(_) => HttpResponse::Ok().json(engine.view()),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-tournament",
    })
}

#[get("/api/tournament")]
async fn api_get_tournament(state: AppState) -> HttpResponse {
    let engine = state.lock().await;
    HttpResponse::Ok().json(engine.view())
}

/// Reload from storage, discarding in-memory state.
#[post("/api/tournament/refresh")]
async fn api_refresh(state: AppState) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.refresh().await;
    command_response(&engine, result)
}

#[post("/api/tournament/reset")]
async fn api_reset_tournament(state: AppState) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.reset_tournament().await;
    command_response(&engine, result)
}

/// Cut to the top 32 and start the finals.
#[post("/api/tournament/phase-two")]
async fn api_advance_to_phase_two(state: AppState) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.advance_to_phase_two().await;
    command_response(&engine, result)
}

#[post("/api/rounds/next")]
async fn api_start_new_round(state: AppState) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.start_new_round().await;
    command_response(&engine, result)
}

#[post("/api/players")]
async fn api_register_player(state: AppState, body: Json<RegisterPlayerBody>) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.register_player(&body.name).await;
    command_response(&engine, result)
}

#[delete("/api/players")]
async fn api_clear_players(state: AppState) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.clear_all_players().await;
    command_response(&engine, result)
}

#[get("/api/players/unassigned")]
async fn api_unassigned_players(state: AppState) -> HttpResponse {
    let engine = state.lock().await;
    HttpResponse::Ok().json(engine.unassigned_players())
}

#[delete("/api/players/{player_id}")]
async fn api_delete_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.delete_player(path.player_id).await;
    command_response(&engine, result)
}

#[put("/api/players/{player_id}/game")]
async fn api_assign_player(
    state: AppState,
    path: Path<PlayerPath>,
    body: Json<AssignPlayerBody>,
) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.assign_player(path.player_id, body.game_id).await;
    command_response(&engine, result)
}

#[delete("/api/players/{player_id}/game")]
async fn api_unassign_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.unassign_player(path.player_id).await;
    command_response(&engine, result)
}

#[post("/api/games")]
async fn api_add_game(state: AppState) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.add_game().await;
    command_response(&engine, result)
}

#[delete("/api/games")]
async fn api_clear_games(state: AppState) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.clear_all_games().await;
    command_response(&engine, result)
}

#[post("/api/games/auto-assign")]
async fn api_auto_assign(state: AppState) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.auto_assign().await;
    command_response(&engine, result)
}

#[delete("/api/games/{game_id}")]
async fn api_delete_game(state: AppState, path: Path<GamePath>) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.delete_game(path.game_id).await;
    command_response(&engine, result)
}

#[post("/api/scorecards")]
async fn api_save_scorecard(state: AppState, body: Json<Scorecard>) -> HttpResponse {
    let mut engine = state.lock().await;
    let result = engine.save_scorecard(body.into_inner()).await;
    command_response(&engine, result)
}

#[get("/api/standings")]
async fn api_standings(state: AppState) -> HttpResponse {
    let engine = state.lock().await;
    HttpResponse::Ok().json(engine.swiss_standings())
}

#[get("/api/standings.csv")]
async fn api_standings_csv(state: AppState) -> HttpResponse {
    let engine = state.lock().await;
    let mut out = Vec::new();
    match swiss_tournament::write_standings_csv(&engine.swiss_standings(), &mut out) {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(("Content-Disposition", "attachment; filename=\"standings.csv\""))
            .body(out),
        Err(e) => {
            log::error!("Error writing standings CSV: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

#[get("/api/rankings")]
async fn api_rankings(state: AppState) -> HttpResponse {
    let engine = state.lock().await;
    HttpResponse::Ok().json(engine.rankings())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let mut engine = TournamentEngine::from_config(&config);
    // An unreadable stored tournament must not be replaced by an empty one on the first save.
    engine.refresh().await.map_err(std::io::Error::other)?;

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state: AppState = Data::new(Mutex::new(engine));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_get_tournament)
            .service(api_refresh)
            .service(api_reset_tournament)
            .service(api_advance_to_phase_two)
            .service(api_start_new_round)
            .service(api_register_player)
            .service(api_clear_players)
            .service(api_unassigned_players)
            .service(api_delete_player)
            .service(api_assign_player)
            .service(api_unassign_player)
            .service(api_add_game)
            .service(api_clear_games)
            .service(api_auto_assign)
            .service(api_delete_game)
            .service(api_save_scorecard)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_rankings)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use swiss_tournament::{MemoryStorage, PlacementPoints, StorageError};

    fn state_over(storage: &MemoryStorage) -> AppState {
        let engine = TournamentEngine::new(
            Box::new(storage.clone()),
            PlacementPoints::default(),
            StdRng::seed_from_u64(1),
        );
        Data::new(Mutex::new(engine))
    }

    #[::core::prelude::v1::test]
    fn error_kinds_map_to_status_codes() {
        let cases = [
            (EngineError::from(TournamentError::PlayerNotFound(uuid::Uuid::new_v4())), StatusCode::NOT_FOUND),
            (EngineError::from(TournamentError::GameNotFound(uuid::Uuid::new_v4())), StatusCode::NOT_FOUND),
            (EngineError::from(TournamentError::EmptyPlayerName), StatusCode::BAD_REQUEST),
            (EngineError::from(TournamentError::AlreadyInFinals), StatusCode::BAD_REQUEST),
            (
                EngineError::from(StorageError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(&err).status(), status, "{err}");
        }
    }

    #[actix_web::test]
    async fn routes_report_errors_with_matching_status() {
        let storage = MemoryStorage::new();
        let app = test::init_service(
            App::new()
                .app_data(state_over(&storage))
                .service(api_register_player)
                .service(api_delete_player)
                .service(api_add_game),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/players/{}", uuid::Uuid::new_v4()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/players")
            .set_json(serde_json::json!({ "name": "   " }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post().uri("/api/games").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        storage.set_failing(true);
        let req = test::TestRequest::post().uri("/api/games").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().is_some());
    }
}
