//! The single validation schema, consumed by the server handlers before any
//! write and by the CLI client before any request.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::recursos::Recurso;

/// Keep only writable columns. `id` and server-stamped columns are never
/// writable, and unknown keys are dropped so payloads copied from GET
/// responses (which carry view aliases) remain usable.
pub fn filtrar_columnas(rec: &Recurso, payload: &Map<String, Value>) -> Map<String, Value> {
    let mut datos = Map::new();
    for campo in rec.campos {
        if let Some(valor) = payload.get(campo.nombre) {
            datos.insert(campo.nombre.to_string(), valor.clone());
        }
    }
    datos
}

/// Create rules: every required field present and non-null, enums within
/// their allow-lists.
pub fn validar_creacion(rec: &Recurso, datos: &Map<String, Value>) -> Result<(), ApiError> {
    let faltantes: Vec<String> = rec
        .campos
        .iter()
        .filter(|c| c.requerido)
        .filter(|c| matches!(datos.get(c.nombre), None | Some(Value::Null)))
        .map(|c| c.nombre.to_string())
        .collect();

    if !faltantes.is_empty() {
        return Err(ApiError::validacion("faltan campos requeridos", faltantes));
    }

    validar_valores(rec, datos)
}

/// Update rules: only provided fields are checked; a required field may be
/// omitted (merge semantics) but not set to null.
pub fn validar_actualizacion(rec: &Recurso, datos: &Map<String, Value>) -> Result<(), ApiError> {
    let anulados: Vec<String> = rec
        .campos
        .iter()
        .filter(|c| c.requerido)
        .filter(|c| matches!(datos.get(c.nombre), Some(Value::Null)))
        .map(|c| c.nombre.to_string())
        .collect();

    if !anulados.is_empty() {
        return Err(ApiError::validacion("campos requeridos no pueden ser nulos", anulados));
    }

    validar_valores(rec, datos)
}

fn validar_valores(rec: &Recurso, datos: &Map<String, Value>) -> Result<(), ApiError> {
    let mut invalidos = Vec::new();
    for campo in rec.campos {
        let Some(permitidos) = campo.valores else { continue };
        match datos.get(campo.nombre) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if permitidos.contains(&s.as_str()) => {}
            Some(_) => invalidos.push(campo.nombre.to_string()),
        }
    }

    if invalidos.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validacion("valores fuera del catalogo permitido", invalidos))
    }
}
