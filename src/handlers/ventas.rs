//! Sales: the one resource whose payload nests line items.
//!
//! A sale references a client and carries lineas, each pointing at a
//! product. Line rows live in detalle_ventas and go away with their sale,
//! which is what unblocks deleting a client after its sales are removed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::{json, Map, Value};
use sqlx::{PgPool, Row};

use crate::auth::Usuario;
use crate::db::AppState;
use crate::error::ApiError;
use crate::recursos::{buscar, consultas, Recurso};
use crate::validacion;

use super::recursos::{listar_para, objeto};

fn definicion() -> &'static Recurso {
    buscar("ventas").expect("ventas registrado")
}

const CAMPOS_LINEA: &[&str] = &["producto_id", "cantidad", "precio_unitario"];

/// GET /api/ventas
pub async fn listar(
    State(state): State<AppState>,
    Extension(usuario): Extension<Usuario>,
) -> Result<Json<Value>, ApiError> {
    let filas = listar_para(&state, definicion(), &usuario).await?;
    Ok(Json(Value::Array(filas)))
}

/// GET /api/ventas/:id - the sale plus its lineas.
pub async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(venta_completa(&state.pool, id).await?))
}

/// POST /api/ventas
pub async fn crear(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let rec = definicion();
    let payload = objeto(payload)?;
    let lineas = lineas_del_payload(&payload)?;

    let mut datos = validacion::filtrar_columnas(rec, &payload);
    validacion::validar_creacion(rec, &datos)?;
    consultas::verificar_referencias(&state.pool, rec, &datos).await?;
    verificar_productos(&state.pool, &lineas).await?;

    // The total follows the lines unless the payload fixes it.
    if !datos.contains_key("total") {
        datos.insert("total".to_string(), json!(total_de_lineas(&lineas)));
    }

    let id = consultas::insertar_fila(&state.pool, rec, &datos).await?;
    insertar_lineas(&state.pool, id, &lineas).await?;

    Ok((StatusCode::CREATED, Json(venta_completa(&state.pool, id).await?)))
}

/// PUT /api/ventas/:id - merge semantics on the sale fields; when lineas are
/// provided they replace the previous set.
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

    let lineas = match payload.get("lineas") {
        Some(_) => Some(lineas_del_payload(&payload)?),
        None => None,
    };

    if let Some(lineas) = &lineas {
        verificar_productos(&state.pool, lineas).await?;
        if !datos.contains_key("total") {
            datos.insert("total".to_string(), json!(total_de_lineas(lineas)));
        }
    }

    if !consultas::actualizar_fila(&state.pool, rec, id, &datos).await? {
        return Err(ApiError::no_encontrado(format!("ventas {} no existe", id)));
    }

    if let Some(lineas) = &lineas {
        sqlx::query("DELETE FROM detalle_ventas WHERE venta_id = $1")
            .bind(id)
            .execute(&state.pool)
            .await?;
        insertar_lineas(&state.pool, id, lineas).await?;
    }

    Ok(Json(venta_completa(&state.pool, id).await?))
}

/// DELETE /api/ventas/:id - lineas go with the sale.
pub async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    consultas::eliminar_fila(&state.pool, definicion(), id).await?;
    Ok(Json(json!({ "mensaje": format!("ventas {} eliminado", id) })))
}

// ── internals ──

async fn venta_completa(pool: &PgPool, id: i64) -> Result<Value, ApiError> {
    let mut venta = consultas::obtener_fila(pool, definicion(), id)
        .await?
        .ok_or_else(|| ApiError::no_encontrado(format!("ventas {} no existe", id)))?;

    let filas = sqlx::query(
        "SELECT row_to_json(x) AS fila FROM (
            SELECT d.*, p.nombre AS producto_nombre
            FROM detalle_ventas d LEFT JOIN productos p ON p.id = d.producto_id
            WHERE d.venta_id = $1 ORDER BY d.id
        ) x",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let mut lineas = Vec::with_capacity(filas.len());
    for fila in filas {
        lineas.push(fila.try_get::<Value, _>("fila")?);
    }

    if let Value::Object(mapa) = &mut venta {
        mapa.insert("lineas".to_string(), Value::Array(lineas));
    }
    Ok(venta)
}

/// Pull and validate the lineas array. Absent means no lines.
fn lineas_del_payload(payload: &Map<String, Value>) -> Result<Vec<Map<String, Value>>, ApiError> {
    let lineas = match payload.get("lineas") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ApiError::solicitud("lineas debe ser una lista")),
    };

    let mut resultado = Vec::with_capacity(lineas.len());
    for (i, item) in lineas.iter().enumerate() {
        let Value::Object(linea) = item else {
            return Err(ApiError::solicitud(format!("linea {} debe ser un objeto", i)));
        };

        let faltantes: Vec<String> = CAMPOS_LINEA
            .iter()
            .filter(|campo| {
                !matches!(linea.get(**campo), Some(v) if v.is_number())
            })
            .map(|campo| format!("lineas[{}].{}", i, campo))
            .collect();
        if !faltantes.is_empty() {
            return Err(ApiError::validacion("faltan campos requeridos", faltantes));
        }

        let mut depurada = Map::new();
        for campo in CAMPOS_LINEA {
            depurada.insert((*campo).to_string(), linea[*campo].clone());
        }
        resultado.push(depurada);
    }
    Ok(resultado)
}

async fn verificar_productos(
    pool: &PgPool,
    lineas: &[Map<String, Value>],
) -> Result<(), ApiError> {
    for linea in lineas {
        let producto_id = linea["producto_id"].as_i64().ok_or_else(|| {
            ApiError::validacion(
                "producto_id debe ser un id numerico",
                vec!["lineas".to_string()],
            )
        })?;
        let fila = sqlx::query("SELECT EXISTS(SELECT 1 FROM productos WHERE id = $1) AS hay")
            .bind(producto_id)
            .fetch_one(pool)
            .await?;
        let hay: bool = fila.try_get("hay")?;
        if !hay {
            return Err(ApiError::no_encontrado(format!("productos {} no existe", producto_id)));
        }
    }
    Ok(())
}

fn total_de_lineas(lineas: &[Map<String, Value>]) -> f64 {
    lineas
        .iter()
        .map(|l| {
            let cantidad = l["cantidad"].as_f64().unwrap_or(0.0);
            let precio = l["precio_unitario"].as_f64().unwrap_or(0.0);
            cantidad * precio
        })
        .sum()
}

async fn insertar_lineas(
    pool: &PgPool,
    venta_id: i64,
    lineas: &[Map<String, Value>],
) -> Result<(), ApiError> {
    if lineas.is_empty() {
        return Ok(());
    }

    let valores: Vec<Value> = lineas.iter().cloned().map(Value::Object).collect();
    sqlx::query(
        "INSERT INTO detalle_ventas (venta_id, producto_id, cantidad, precio_unitario)
         SELECT $1, p.producto_id, p.cantidad, p.precio_unitario
         FROM jsonb_populate_recordset(NULL::detalle_ventas, $2) AS p",
    )
    .bind(venta_id)
    .bind(Value::Array(valores))
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapa(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn lineas_ausentes_son_lista_vacia() {
        let payload = mapa(json!({"cliente_id": 1}));
        assert!(lineas_del_payload(&payload).unwrap().is_empty());
    }

    #[test]
    fn linea_incompleta_lista_el_campo() {
        let payload = mapa(json!({"lineas": [{"producto_id": 1, "cantidad": 2}]}));
        let err = lineas_del_payload(&payload).unwrap_err();
        match err {
            ApiError::Validacion { campos, .. } => {
                assert_eq!(campos, vec!["lineas[0].precio_unitario"]);
            }
            otro => panic!("esperaba Validacion, llego {:?}", otro),
        }
    }

    #[test]
    fn lineas_descartan_campos_extra() {
        let payload = mapa(json!({
            "lineas": [{"producto_id": 1, "cantidad": 2, "precio_unitario": 3, "nota": "x"}]
        }));
        let lineas = lineas_del_payload(&payload).unwrap();
        assert_eq!(lineas[0].len(), 3);
        assert!(!lineas[0].contains_key("nota"));
    }

    #[test]
    fn total_es_suma_de_lineas() {
        let payload = mapa(json!({
            "lineas": [
                {"producto_id": 1, "cantidad": 2, "precio_unitario": 10.5},
                {"producto_id": 2, "cantidad": 1, "precio_unitario": 4.0}
            ]
        }));
        let lineas = lineas_del_payload(&payload).unwrap();
        assert_eq!(total_de_lineas(&lineas), 25.0);
    }
}
