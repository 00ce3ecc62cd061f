use axum::http::HeaderValue;
use axum::{
    middleware as capas,
    routing::{delete, get},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use planta_api::config::{self, Environment};
use planta_api::db::{self, AppState};
use planta_api::handlers;
use planta_api::middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Iniciando planta-api en modo {:?}", config.environment);

    let pool = db::connect()
        .await
        .unwrap_or_else(|e| panic!("no se pudo conectar a la base de datos: {}", e));
    db::migrate(&pool).await.expect("verificacion de esquema");
    db::seed_admin(&pool).await.expect("usuario inicial");

    let state = AppState { pool };
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.http.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("planta-api escuchando en http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    let protegidas = Router::new()
        .merge(auth_routes())
        .merge(recurso_routes())
        .route("/api/dashboard", get(handlers::dashboard::resumen))
        // permisos corre despues de auth: primero identidad, luego rol
        .route_layer(capas::from_fn(middleware::permisos::permisos_middleware))
        .route_layer(capas::from_fn_with_state(
            state.clone(),
            middleware::auth::sesion_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", axum::routing::post(handlers::auth::login))
        // Everything else requires a session
        .merge(protegidas)
        // Global middleware
        .layer(capa_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/yo", get(auth::yo))
        .route("/api/auth/sesion", delete(auth::logout))
}

fn recurso_routes() -> Router<AppState> {
    use handlers::{recursos, usuarios, ventas};

    Router::new()
        // Entities with behavior of their own; static paths win over captures
        .route("/api/usuarios", get(usuarios::listar).post(usuarios::crear))
        .route(
            "/api/usuarios/:id",
            get(usuarios::obtener).put(usuarios::actualizar).delete(usuarios::eliminar),
        )
        .route("/api/ventas", get(ventas::listar).post(ventas::crear))
        .route(
            "/api/ventas/:id",
            get(ventas::obtener).put(ventas::actualizar).delete(ventas::eliminar),
        )
        // Every other registry resource goes through the generic engine
        .route("/api/:recurso", get(recursos::listar).post(recursos::crear))
        .route(
            "/api/:recurso/:id",
            get(recursos::obtener).put(recursos::actualizar).delete(recursos::eliminar),
        )
}

fn capa_cors() -> CorsLayer {
    let config = config::config();
    if !config.http.enable_cors {
        return CorsLayer::new();
    }
    if matches!(config.environment, Environment::Development) {
        return CorsLayer::permissive();
    }

    let origenes: Vec<HeaderValue> = config
        .http
        .cors_origins
        .iter()
        .filter_map(|origen| origen.parse().ok())
        .collect();
    CorsLayer::new().allow_origin(origenes).allow_methods(Any).allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "nombre": "planta-api",
        "version": version,
        "descripcion": "API REST para un ERP de manufactura",
        "endpoints": {
            "salud": "/health (publico)",
            "login": "/auth/login (publico)",
            "sesion": "/api/auth/yo, /api/auth/sesion (requiere sesion)",
            "recursos": "/api/:recurso[/:id] (requiere sesion)",
            "dashboard": "/api/dashboard (requiere sesion)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match db::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
