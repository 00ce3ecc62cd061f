//! Generic CRUD handlers for every registry resource.
//!
//! All five operations share one shape: resolve the registry entry from the
//! path, validate against the shared schema, check references, then run the
//! engine. Entities with extra behavior (ventas, usuarios) register their
//! own routes, which win over the `:recurso` captures.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::{json, Map, Value};

use crate::auth::{Rol, Usuario};
use crate::db::AppState;
use crate::error::ApiError;
use crate::recursos::{buscar, consultas, Recurso};
use crate::validacion;

pub fn recurso(nombre: &str) -> Result<&'static Recurso, ApiError> {
    buscar(nombre)
        .ok_or_else(|| ApiError::no_encontrado(format!("recurso desconocido: {}", nombre)))
}

pub fn objeto(payload: Value) -> Result<Map<String, Value>, ApiError> {
    match payload {
        Value::Object(mapa) => Ok(mapa),
        _ => Err(ApiError::solicitud("se esperaba un objeto JSON")),
    }
}

/// GET /api/:recurso
pub async fn listar(
    State(state): State<AppState>,
    Extension(usuario): Extension<Usuario>,
    Path(nombre): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let rec = recurso(&nombre)?;
    let filas = listar_para(&state, rec, &usuario).await?;
    Ok(Json(Value::Array(filas)))
}

/// Collection read with empleado row-subsetting applied.
pub async fn listar_para(
    state: &AppState,
    rec: &'static Recurso,
    usuario: &Usuario,
) -> Result<Vec<Value>, ApiError> {
    if rec.propietario.is_some() && usuario.rol() == Rol::Empleado {
        // An account with no linked employee owns nothing.
        let Some(empleado_id) = usuario.empleado_id else {
            return Ok(Vec::new());
        };
        return consultas::listar_filas(&state.pool, rec, Some(empleado_id)).await;
    }
    consultas::listar_filas(&state.pool, rec, None).await
}

/// GET /api/:recurso/:id
pub async fn obtener(
    State(state): State<AppState>,
    Extension(usuario): Extension<Usuario>,
    Path((nombre, id)): Path<(String, i64)>,
) -> Result<Json<Value>, ApiError> {
    let rec = recurso(&nombre)?;
    let fila = consultas::obtener_fila(&state.pool, rec, id)
        .await?
        .ok_or_else(|| ApiError::no_encontrado(format!("{} {} no existe", rec.nombre, id)))?;
    proteger_fila_ajena(rec, &usuario, &fila)?;
    Ok(Json(fila))
}

/// On owned resources the empleado role cannot read someone else's row.
pub fn proteger_fila_ajena(
    rec: &Recurso,
    usuario: &Usuario,
    fila: &Value,
) -> Result<(), ApiError> {
    let Some(col) = rec.propietario else { return Ok(()) };
    if usuario.rol() != Rol::Empleado {
        return Ok(());
    }

    let dueno = fila.get(col).and_then(Value::as_i64);
    if dueno.is_some() && dueno == usuario.empleado_id {
        Ok(())
    } else {
        Err(ApiError::prohibido(format!("sin acceso a este registro de {}", rec.nombre)))
    }
}

/// POST /api/:recurso - 201 with the full serialized row.
pub async fn crear(
    State(state): State<AppState>,
    Path(nombre): Path<String>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let rec = recurso(&nombre)?;
    let datos = validacion::filtrar_columnas(rec, &objeto(payload)?);
    validacion::validar_creacion(rec, &datos)?;
    consultas::verificar_referencias(&state.pool, rec, &datos).await?;

    let id = consultas::insertar_fila(&state.pool, rec, &datos).await?;
    let fila = consultas::obtener_fila(&state.pool, rec, id)
        .await?
        .ok_or_else(|| ApiError::interno(format!("fila recien creada {} {} ausente", nombre, id)))?;
    Ok((StatusCode::CREATED, Json(fila)))
}

/// PUT /api/:recurso/:id - merge semantics, omitted fields keep prior values.
pub async fn actualizar(
    State(state): State<AppState>,
    Path((nombre, id)): Path<(String, i64)>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let rec = recurso(&nombre)?;
    let datos = validacion::filtrar_columnas(rec, &objeto(payload)?);
    validacion::validar_actualizacion(rec, &datos)?;
    consultas::verificar_referencias(&state.pool, rec, &datos).await?;

    if !consultas::actualizar_fila(&state.pool, rec, id, &datos).await? {
        return Err(ApiError::no_encontrado(format!("{} {} no existe", rec.nombre, id)));
    }

    let fila = consultas::obtener_fila(&state.pool, rec, id)
        .await?
        .ok_or_else(|| ApiError::no_encontrado(format!("{} {} no existe", rec.nombre, id)))?;
    Ok(Json(fila))
}

/// DELETE /api/:recurso/:id - refused while dependents reference the row.
pub async fn eliminar(
    State(state): State<AppState>,
    Path((nombre, id)): Path<(String, i64)>,
) -> Result<Json<Value>, ApiError> {
    let rec = recurso(&nombre)?;
    consultas::eliminar_fila(&state.pool, rec, id).await?;
    Ok(Json(json!({ "mensaje": format!("{} {} eliminado", rec.nombre, id) })))
}
