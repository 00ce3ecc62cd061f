use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth;
use crate::config;
use crate::db::AppState;
use crate::error::ApiError;

/// The session id behind the current request, kept for logout.
#[derive(Clone, Debug)]
pub struct SesionId(pub Uuid);

/// Resolves the session cookie to a user and injects it into the request.
///
/// Everything under /api sits behind this layer; requests without a live
/// session never reach a handler.
pub async fn sesion_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_name = &config::config().session.cookie_name;
    let sesion_id = auth::leer_cookie(request.headers(), cookie_name)
        .and_then(|v| Uuid::parse_str(&v).ok())
        .ok_or_else(|| ApiError::no_autenticado("sesion requerida"))?;

    let usuario = auth::buscar_usuario_por_sesion(&state.pool, sesion_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::no_autenticado("sesion invalida o expirada"))?;

    request.extensions_mut().insert(usuario);
    request.extensions_mut().insert(SesionId(sesion_id));

    Ok(next.run(request).await)
}
