//! Generic SQL engine driven by the resource registry.
//!
//! Rows travel as JSON: reads go through `row_to_json` so dates, times and
//! numerics serialize in their wire formats straight from Postgres, and
//! writes go through `jsonb_populate_record` so Postgres performs the
//! inverse coercions. Bad values surface as data-exception errors and map
//! to 400 at the boundary.

use serde_json::{Map, Value};
use sqlx::{PgPool, Row};

use crate::error::ApiError;
use crate::recursos::{buscar, Recurso};

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Projection for reads: every own column plus the registered view joins.
fn proyeccion(rec: &Recurso) -> String {
    let mut partes = vec!["t.*".to_string()];
    for (i, v) in rec.vistas.iter().enumerate() {
        partes.push(format!("v{}.{} AS {}", i, quote(v.columna), quote(v.alias)));
    }
    partes.join(", ")
}

fn joins(rec: &Recurso) -> String {
    rec.vistas
        .iter()
        .enumerate()
        .map(|(i, v)| {
            format!(" LEFT JOIN {} v{} ON v{}.id = t.{}", quote(v.tabla), i, i, quote(v.campo))
        })
        .collect()
}

/// SELECT for the full collection, optionally restricted to an owner.
fn sql_listar(rec: &Recurso, con_propietario: bool) -> String {
    let filtro = match (con_propietario, rec.propietario) {
        (true, Some(col)) => format!(" WHERE t.{} = $1", quote(col)),
        _ => String::new(),
    };
    format!(
        "SELECT row_to_json(x) AS fila FROM (SELECT {} FROM {} t{}{} ORDER BY t.id) x",
        proyeccion(rec),
        quote(rec.tabla),
        joins(rec),
        filtro
    )
}

fn sql_obtener(rec: &Recurso) -> String {
    format!(
        "SELECT row_to_json(x) AS fila FROM (SELECT {} FROM {} t{} WHERE t.id = $1) x",
        proyeccion(rec),
        quote(rec.tabla),
        joins(rec)
    )
}

/// INSERT over the payload's columns only, so column defaults survive.
fn sql_insertar(rec: &Recurso, columnas: &[&str]) -> String {
    let destino: Vec<String> = columnas.iter().map(|c| quote(c)).collect();
    let origen: Vec<String> = columnas.iter().map(|c| format!("p.{}", quote(c))).collect();
    format!(
        "INSERT INTO {} ({}) SELECT {} FROM jsonb_populate_record(NULL::{}, $1) AS p RETURNING id",
        quote(rec.tabla),
        destino.join(", "),
        origen.join(", "),
        quote(rec.tabla)
    )
}

/// UPDATE over the payload's columns only: merge semantics, omitted fields
/// keep their prior values.
fn sql_actualizar(rec: &Recurso, columnas: &[&str]) -> String {
    let set = if columnas.len() == 1 {
        format!(
            "{} = (SELECT p.{} FROM jsonb_populate_record(NULL::{}, $2) AS p)",
            quote(columnas[0]),
            quote(columnas[0]),
            quote(rec.tabla)
        )
    } else {
        let destino: Vec<String> = columnas.iter().map(|c| quote(c)).collect();
        let origen: Vec<String> = columnas.iter().map(|c| format!("p.{}", quote(c))).collect();
        format!(
            "({}) = (SELECT {} FROM jsonb_populate_record(NULL::{}, $2) AS p)",
            destino.join(", "),
            origen.join(", "),
            quote(rec.tabla)
        )
    };
    format!("UPDATE {} SET {} WHERE id = $1", quote(rec.tabla), set)
}

fn quitar_ocultos(rec: &Recurso, mut fila: Value) -> Value {
    if let Value::Object(mapa) = &mut fila {
        for oculto in rec.ocultos {
            mapa.remove(*oculto);
        }
    }
    fila
}

pub async fn listar_filas(
    pool: &PgPool,
    rec: &Recurso,
    propietario: Option<i64>,
) -> Result<Vec<Value>, ApiError> {
    let sql = sql_listar(rec, propietario.is_some());
    let mut consulta = sqlx::query(&sql);
    if let Some(empleado_id) = propietario {
        consulta = consulta.bind(empleado_id);
    }

    let filas = consulta.fetch_all(pool).await?;
    let mut resultado = Vec::with_capacity(filas.len());
    for fila in filas {
        let valor: Value = fila.try_get("fila")?;
        resultado.push(quitar_ocultos(rec, valor));
    }
    Ok(resultado)
}

pub async fn obtener_fila(
    pool: &PgPool,
    rec: &Recurso,
    id: i64,
) -> Result<Option<Value>, ApiError> {
    let fila = sqlx::query(&sql_obtener(rec)).bind(id).fetch_optional(pool).await?;
    match fila {
        Some(f) => {
            let valor: Value = f.try_get("fila")?;
            Ok(Some(quitar_ocultos(rec, valor)))
        }
        None => Ok(None),
    }
}

/// Insert the (already validated and filtered) payload, returning the new id.
pub async fn insertar_fila(
    pool: &PgPool,
    rec: &Recurso,
    datos: &Map<String, Value>,
) -> Result<i64, ApiError> {
    let columnas: Vec<&str> = datos.keys().map(String::as_str).collect();
    let fila = sqlx::query(&sql_insertar(rec, &columnas))
        .bind(Value::Object(datos.clone()))
        .fetch_one(pool)
        .await?;
    let id: i64 = fila.try_get("id")?;
    Ok(id)
}

/// Overwrite the provided fields on one row. Returns false when the row is
/// gone. An empty payload touches nothing.
pub async fn actualizar_fila(
    pool: &PgPool,
    rec: &Recurso,
    id: i64,
    datos: &Map<String, Value>,
) -> Result<bool, ApiError> {
    if datos.is_empty() {
        return Ok(obtener_fila(pool, rec, id).await?.is_some());
    }

    let columnas: Vec<&str> = datos.keys().map(String::as_str).collect();
    let resultado = sqlx::query(&sql_actualizar(rec, &columnas))
        .bind(id)
        .bind(Value::Object(datos.clone()))
        .execute(pool)
        .await?;
    Ok(resultado.rows_affected() > 0)
}

/// Total number of child rows still pointing at this row.
pub async fn contar_dependientes(
    pool: &PgPool,
    rec: &Recurso,
    id: i64,
) -> Result<i64, ApiError> {
    let mut total = 0i64;
    for dep in rec.dependientes {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM {} WHERE {} = $1",
            quote(dep.tabla),
            quote(dep.columna)
        );
        let fila = sqlx::query(&sql).bind(id).fetch_one(pool).await?;
        let n: i64 = fila.try_get("n")?;
        total += n;
    }
    Ok(total)
}

/// Delete one row, refusing while dependents exist.
pub async fn eliminar_fila(pool: &PgPool, rec: &Recurso, id: i64) -> Result<(), ApiError> {
    if obtener_fila(pool, rec, id).await?.is_none() {
        return Err(ApiError::no_encontrado(format!("{} {} no existe", rec.nombre, id)));
    }

    let dependientes = contar_dependientes(pool, rec, id).await?;
    if dependientes > 0 {
        return Err(ApiError::ReferenciasActivas {
            recurso: format!("{}/{}", rec.nombre, id),
            dependientes,
        });
    }

    sqlx::query(&format!("DELETE FROM {} WHERE id = $1", quote(rec.tabla)))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Every FK present in the payload must point at an existing parent row.
pub async fn verificar_referencias(
    pool: &PgPool,
    rec: &Recurso,
    datos: &Map<String, Value>,
) -> Result<(), ApiError> {
    for campo in rec.campos {
        let Some(destino) = campo.referencia else { continue };
        let Some(valor) = datos.get(campo.nombre) else { continue };
        if valor.is_null() {
            continue;
        }

        let id = valor.as_i64().ok_or_else(|| {
            ApiError::validacion(
                format!("el campo {} debe ser un id numerico", campo.nombre),
                vec![campo.nombre.to_string()],
            )
        })?;

        let tabla = buscar(destino)
            .map(|r| r.tabla)
            .ok_or_else(|| ApiError::interno(format!("recurso desconocido {}", destino)))?;
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1) AS hay", quote(tabla));
        let fila = sqlx::query(&sql).bind(id).fetch_one(pool).await?;
        let hay: bool = fila.try_get("hay")?;
        if !hay {
            return Err(ApiError::no_encontrado(format!("{} {} no existe", destino, id)));
        }
    }
    Ok(())
}
