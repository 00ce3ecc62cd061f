//! Session endpoints: login, logout, current user.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
    Extension,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::auth::Usuario;
use crate::db::AppState;
use crate::error::ApiError;
use crate::middleware::auth::SesionId;

#[derive(Debug, Deserialize)]
pub struct Credenciales {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - verify credentials and bind a session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(credenciales): Json<Credenciales>,
) -> Result<impl IntoResponse, ApiError> {
    let mut faltantes = Vec::new();
    if credenciales.email.trim().is_empty() {
        faltantes.push("email".to_string());
    }
    if credenciales.password.is_empty() {
        faltantes.push("password".to_string());
    }
    if !faltantes.is_empty() {
        return Err(ApiError::validacion("faltan campos requeridos", faltantes));
    }

    let usuario = auth::buscar_usuario_por_email(&state.pool, &credenciales.email)
        .await?
        .filter(|u| auth::verify_password(&credenciales.password, &u.password_hash))
        .ok_or_else(|| ApiError::no_autenticado("credenciales invalidas"))?;

    let sesion_id = auth::crear_sesion(&state.pool, usuario.id).await?;
    tracing::info!("sesion iniciada para {}", usuario.email);

    Ok((
        [(header::SET_COOKIE, auth::cookie_de_sesion(sesion_id))],
        Json(json!({ "usuario": usuario })),
    ))
}

/// DELETE /api/auth/sesion - invalidate the active session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(SesionId(sesion_id)): Extension<SesionId>,
    Extension(usuario): Extension<Usuario>,
) -> Result<impl IntoResponse, ApiError> {
    auth::eliminar_sesion(&state.pool, sesion_id).await?;
    tracing::info!("sesion cerrada para {}", usuario.email);

    Ok((
        [(header::SET_COOKIE, auth::cookie_de_borrado())],
        Json(json!({ "mensaje": "sesion cerrada" })),
    ))
}

/// GET /api/auth/yo - identity bound to the active session.
pub async fn yo(Extension(usuario): Extension<Usuario>) -> Json<Usuario> {
    Json(usuario)
}
