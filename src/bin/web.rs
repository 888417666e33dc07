//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set DATA_FILE to keep tournaments across restarts, SESSION_KEY (64+ bytes) to keep sessions.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tournament_scheduler::config::ServerConfig;
use tournament_scheduler::{
    cancel_match, create_tournament, delete_tournament, find_conflicts, generate_fixtures,
    list_matches, load_tournament, parse_roster, schedule_matches, update_match_slot, BatchMode,
    InMemoryStore, KeyStrategy, MatchId, MatchStore, ScheduleError, ScheduleSubmission,
    SlotProposal, TournamentForm, TournamentId,
};

/// Shared store plus where to snapshot it.
struct SharedStore {
    store: RwLock<InMemoryStore>,
    data_file: Option<PathBuf>,
    /// Held while a snapshot is taken and written, so writes land one at a time.
    snapshot: tokio::sync::Mutex<()>,
}

impl SharedStore {
    fn new(store: InMemoryStore, data_file: Option<PathBuf>) -> Self {
        Self {
            store: RwLock::new(store),
            data_file,
            snapshot: tokio::sync::Mutex::new(()),
        }
    }
}

type AppState = Data<SharedStore>;

/// Session key holding the tournament the operator is working on.
const SESSION_TOURNAMENT: &str = "tournament_id";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct GenerateBody {
    /// Comma-separated team names.
    teams: String,
}

#[derive(Deserialize)]
struct ScheduleBody {
    #[serde(default)]
    mode: BatchMode,
    #[serde(default)]
    slots: ScheduleSubmission,
}

#[derive(Deserialize)]
struct ConflictQuery {
    #[serde(default)]
    key: KeyStrategy,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn read_store(state: &AppState) -> Result<RwLockReadGuard<'_, InMemoryStore>, ScheduleError> {
    state
        .store
        .read()
        .map_err(|_| ScheduleError::StoreUnavailable("lock error".to_string()))
}

fn write_store(state: &AppState) -> Result<RwLockWriteGuard<'_, InMemoryStore>, ScheduleError> {
    state
        .store
        .write()
        .map_err(|_| ScheduleError::StoreUnavailable("lock error".to_string()))
}

/// Write the snapshot file, if one is configured. Failures are logged, not returned:
/// the change is already live in memory.
///
/// The snapshot is taken after waiting for any earlier write, then written to `<path>.tmp`
/// and renamed over `path`, so the file always holds one complete, latest snapshot.
async fn persist(state: &AppState) {
    let Some(path) = &state.data_file else {
        return;
    };
    let _writing = state.snapshot.lock().await;
    let json = match read_store(state).and_then(|store| store.to_json().map_err(ScheduleError::from)) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Could not snapshot store: {}", e);
            return;
        }
    };
    let tmp = snapshot_tmp_path(path);
    if let Err(e) = tokio::fs::write(&tmp, json).await {
        log::error!("Could not write {}: {}", tmp.display(), e);
        return;
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        log::error!("Could not replace {}: {}", path.display(), e);
    }
}

fn snapshot_tmp_path(path: &std::path::Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Map a schedule error to a JSON response. Validation failures echo the submitted values.
fn error_response(e: &ScheduleError) -> HttpResponse {
    let mut builder = match e {
        ScheduleError::TournamentNotFound(_) | ScheduleError::MatchNotFound(_) => HttpResponse::NotFound(),
        ScheduleError::StoreUnavailable(_) => HttpResponse::InternalServerError(),
        _ => HttpResponse::BadRequest(),
    };
    let body = match e {
        ScheduleError::Validation {
            match_id,
            error,
            submitted,
        } => serde_json::json!({
            "error": e.to_string(),
            "kind": error.kind(),
            "match_id": match_id,
            "submitted": submitted,
        }),
        _ => serde_json::json!({ "error": e.to_string() }),
    };
    builder.json(body)
}

fn remember_tournament(session: &Session, id: TournamentId) {
    if let Err(e) = session.insert(SESSION_TOURNAMENT, id) {
        log::warn!("Could not store tournament {} in session: {}", id, e);
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-scheduler",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a tournament and make it the session's current one.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, session: Session, body: Json<TournamentForm>) -> HttpResponse {
    let today = Local::now().date_naive();
    let result = write_store(&state).and_then(|mut store| create_tournament(&mut *store, &body, today));
    match result {
        Ok(t) => {
            remember_tournament(&session, t.id);
            persist(&state).await;
            HttpResponse::Ok().json(t)
        }
        Err(e) => error_response(&e),
    }
}

/// All tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let result = read_store(&state).and_then(|store| store.tournaments().map_err(ScheduleError::from));
    match result {
        Ok(ts) => HttpResponse::Ok().json(ts),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match read_store(&state).and_then(|store| load_tournament(&*store, path.id)) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Delete a tournament and all its matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, session: Session, path: Path<TournamentPath>) -> HttpResponse {
    match write_store(&state).and_then(|mut store| delete_tournament(&mut *store, path.id)) {
        Ok(()) => {
            if let Ok(Some(current)) = session.get::<TournamentId>(SESSION_TOURNAMENT) {
                if current == path.id {
                    session.remove(SESSION_TOURNAMENT);
                }
            }
            persist(&state).await;
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(&e),
    }
}

/// Make an existing tournament the session's current one.
#[post("/api/tournaments/{id}/select")]
async fn api_select_tournament(state: AppState, session: Session, path: Path<TournamentPath>) -> HttpResponse {
    match read_store(&state).and_then(|store| load_tournament(&*store, path.id)) {
        Ok(t) => {
            remember_tournament(&session, t.id);
            HttpResponse::Ok().json(t)
        }
        Err(e) => error_response(&e),
    }
}

/// The session's current tournament (404 if none or if it was deleted).
#[get("/api/current")]
async fn api_current_tournament(state: AppState, session: Session) -> HttpResponse {
    let id = match session.get::<TournamentId>(SESSION_TOURNAMENT) {
        Ok(Some(id)) => id,
        Ok(None) => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
        Err(e) => {
            log::warn!("Unreadable session: {}", e);
            session.purge();
            return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }));
        }
    };
    match read_store(&state).and_then(|store| load_tournament(&*store, id)) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => {
            if matches!(e, ScheduleError::TournamentNotFound(_)) {
                session.remove(SESSION_TOURNAMENT);
            }
            error_response(&e)
        }
    }
}

/// Generate round-robin matches from a comma-separated roster (replaces existing matches).
#[post("/api/tournaments/{id}/matches/generate")]
async fn api_generate_matches(state: AppState, path: Path<TournamentPath>, body: Json<GenerateBody>) -> HttpResponse {
    let teams = parse_roster(&body.teams);
    match write_store(&state).and_then(|mut store| generate_fixtures(&mut *store, path.id, &teams)) {
        Ok(matches) => {
            persist(&state).await;
            HttpResponse::Ok().json(matches)
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match read_store(&state).and_then(|store| list_matches(&*store, path.id)) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Submit slots for every match at once. Stops at the first invalid match.
#[put("/api/tournaments/{id}/schedule")]
async fn api_schedule_matches(state: AppState, path: Path<TournamentPath>, body: Json<ScheduleBody>) -> HttpResponse {
    let result = write_store(&state)
        .and_then(|mut store| schedule_matches(&mut *store, path.id, &body.slots, body.mode));
    // Partial apply may have written matches before failing.
    if result.is_ok() || body.mode == BatchMode::PartialApply {
        persist(&state).await;
    }
    match result {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Set date, time, venue and duration of one match.
#[put("/api/tournaments/{id}/matches/{match_id}")]
async fn api_update_match(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<SlotProposal>,
) -> HttpResponse {
    match write_store(&state).and_then(|mut store| update_match_slot(&mut *store, path.id, path.match_id, &body)) {
        Ok(m) => {
            persist(&state).await;
            HttpResponse::Ok().json(m)
        }
        Err(e) => error_response(&e),
    }
}

/// Cancel (remove) one match.
#[delete("/api/tournaments/{id}/matches/{match_id}")]
async fn api_cancel_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    match write_store(&state).and_then(|mut store| cancel_match(&mut *store, path.id, path.match_id)) {
        Ok(m) => {
            persist(&state).await;
            HttpResponse::Ok().json(m)
        }
        Err(e) => error_response(&e),
    }
}

/// Conflict groups; `?key=loose` compares only date and time.
#[get("/api/tournaments/{id}/conflicts")]
async fn api_conflicts(state: AppState, path: Path<TournamentPath>, query: Query<ConflictQuery>) -> HttpResponse {
    match read_store(&state).and_then(|store| find_conflicts(&*store, path.id, query.key)) {
        Ok(groups) => HttpResponse::Ok().json(groups),
        Err(e) => error_response(&e),
    }
}

async fn load_store(data_file: Option<&PathBuf>) -> std::io::Result<InMemoryStore> {
    let Some(path) = data_file else {
        return Ok(InMemoryStore::new());
    };
    match tokio::fs::read_to_string(path).await {
        Ok(json) => InMemoryStore::from_json(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("{} does not exist yet, starting empty", path.display());
            Ok(InMemoryStore::new())
        }
        Err(e) => Err(e),
    }
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

/// Index page and every API route.
fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_index_async))
        .service(api_health)
        .service(favicon)
        .service(api_create_tournament)
        .service(api_list_tournaments)
        .service(api_get_tournament)
        .service(api_delete_tournament)
        .service(api_select_tournament)
        .service(api_current_tournament)
        .service(api_generate_matches)
        .service(api_list_matches)
        .service(api_schedule_matches)
        .service(api_update_match)
        .service(api_cancel_match)
        .service(api_conflicts);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = load_store(config.data_file.as_ref()).await?;
    let state = Data::new(SharedStore::new(store, config.data_file.clone()));

    let session_key = match &config.session_key {
        Some(bytes) => Key::from(bytes.as_slice()),
        None => Key::generate(),
    };

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(session_key.clone()))
            .configure(routes)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
