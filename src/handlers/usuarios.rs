//! Account management. Same contract as the generic resource handlers plus
//! password intake: `password` rides on the payload, is hashed here, and the
//! stored hash never leaves the server (hidden column).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::Value;

use crate::auth;
use crate::db::AppState;
use crate::error::ApiError;
use crate::recursos::{buscar, consultas, Recurso};
use crate::validacion;

use super::recursos::objeto;

fn definicion() -> &'static Recurso {
    buscar("usuarios").expect("usuarios registrado")
}

/// GET /api/usuarios
pub async fn listar(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let filas = consultas::listar_filas(&state.pool, definicion(), None).await?;
    Ok(Json(Value::Array(filas)))
}

/// GET /api/usuarios/:id
pub async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let fila = consultas::obtener_fila(&state.pool, definicion(), id)
        .await?
        .ok_or_else(|| ApiError::no_encontrado(format!("usuarios {} no existe", id)))?;
    Ok(Json(fila))
}

/// DELETE /api/usuarios/:id - the account's sessions go with it.
pub async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    consultas::eliminar_fila(&state.pool, definicion(), id).await?;
    Ok(Json(serde_json::json!({ "mensaje": format!("usuarios {} eliminado", id) })))
}

/// POST /api/usuarios
pub async fn crear(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let rec = definicion();
    let payload = objeto(payload)?;

    let password = match payload.get("password").and_then(Value::as_str) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => {
            return Err(ApiError::validacion(
                "faltan campos requeridos",
                vec!["password".to_string()],
            ))
        }
    };

    let mut datos = validacion::filtrar_columnas(rec, &payload);
    validacion::validar_creacion(rec, &datos)?;
    consultas::verificar_referencias(&state.pool, rec, &datos).await?;

    let hash = auth::hash_password(&password).map_err(ApiError::interno)?;
    datos.insert("password_hash".to_string(), Value::String(hash));

    let id = consultas::insertar_fila(&state.pool, rec, &datos).await?;
    let fila = consultas::obtener_fila(&state.pool, rec, id)
        .await?
        .ok_or_else(|| ApiError::interno(format!("usuario recien creado {} ausente", id)))?;
    Ok((StatusCode::CREATED, Json(fila)))
}

/// PUT /api/usuarios/:id - merge semantics; password only changes when sent.
pub async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let rec = definicion();
    let payload = objeto(payload)?;

    let mut datos = validacion::filtrar_columnas(rec, &payload);
    validacion::validar_actualizacion(rec, &datos)?;
    consultas::verificar_referencias(&state.pool, rec, &datos).await?;

    if let Some(password) = payload.get("password").and_then(Value::as_str) {
        if password.is_empty() {
            return Err(ApiError::validacion(
                "campos requeridos no pueden ser nulos",
                vec!["password".to_string()],
            ));
        }
        let hash = auth::hash_password(password).map_err(ApiError::interno)?;
        datos.insert("password_hash".to_string(), Value::String(hash));
    }

    if !consultas::actualizar_fila(&state.pool, rec, id, &datos).await? {
        return Err(ApiError::no_encontrado(format!("usuarios {} no existe", id)));
    }

    let fila = consultas::obtener_fila(&state.pool, rec, id)
        .await?
        .ok_or_else(|| ApiError::no_encontrado(format!("usuarios {} no existe", id)))?;
    Ok(Json(fila))
}
