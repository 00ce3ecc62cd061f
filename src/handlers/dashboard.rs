//! Dashboard aggregation: recomputed from scratch on every request.
//!
//! Current-month totals, a 5-month trailing series re-queried per month, and
//! a recent-activity feed merging the latest sales and production orders.

use axum::{extract::State, response::Json};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};

use crate::db::AppState;
use crate::error::ApiError;

const MESES_TENDENCIA: u32 = 5;
const ACTIVIDAD_MAXIMA: usize = 10;

#[derive(Debug, Serialize)]
pub struct Resumen {
    pub mes_actual: TotalesMes,
    pub tendencia: Vec<TotalesMes>,
    pub actividad_reciente: Vec<Actividad>,
}

#[derive(Debug, Serialize)]
pub struct TotalesMes {
    /// Month label, "YYYY-MM".
    pub mes: String,
    pub ventas_total: f64,
    pub produccion_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Actividad {
    pub tipo: &'static str,
    pub id: i64,
    pub descripcion: String,
    /// Formatted "YYYY-MM-DD HH:MM:SS"; the feed sorts on this string.
    pub fecha: String,
}

/// GET /api/dashboard
pub async fn resumen(State(state): State<AppState>) -> Result<Json<Resumen>, ApiError> {
    let hoy = Utc::now().date_naive();

    let mes_actual = totales_del_mes(&state.pool, hoy, 0).await?;

    // Trailing window, oldest month first, re-queried per month.
    let mut tendencia = Vec::with_capacity(MESES_TENDENCIA as usize);
    for atras in (0..MESES_TENDENCIA).rev() {
        tendencia.push(totales_del_mes(&state.pool, hoy, atras).await?);
    }

    let actividad_reciente = actividad_reciente(&state.pool).await?;

    Ok(Json(Resumen { mes_actual, tendencia, actividad_reciente }))
}

/// Calendar-month window, first day inclusive to next month's first day
/// exclusive, `atras` months before the anchor date's month.
pub fn ventana_mes(ancla: NaiveDate, atras: u32) -> (NaiveDate, NaiveDate) {
    let meses = ancla.year() * 12 + ancla.month0() as i32 - atras as i32;
    let (anio, mes0) = (meses.div_euclid(12), meses.rem_euclid(12) as u32);
    let inicio = NaiveDate::from_ymd_opt(anio, mes0 + 1, 1).expect("primer dia del mes");

    let siguiente = meses + 1;
    let (anio_fin, mes0_fin) = (siguiente.div_euclid(12), siguiente.rem_euclid(12) as u32);
    let fin = NaiveDate::from_ymd_opt(anio_fin, mes0_fin + 1, 1).expect("primer dia del mes");

    (inicio, fin)
}

async fn totales_del_mes(
    pool: &PgPool,
    ancla: NaiveDate,
    atras: u32,
) -> Result<TotalesMes, ApiError> {
    let (inicio, fin) = ventana_mes(ancla, atras);

    let ventas = suma_en_ventana(
        pool,
        "SELECT COALESCE(SUM(total), 0) AS suma FROM ventas WHERE fecha >= $1 AND fecha < $2",
        inicio,
        fin,
    )
    .await?;
    let produccion = suma_en_ventana(
        pool,
        "SELECT COALESCE(SUM(cantidad), 0) AS suma FROM ordenes_produccion \
         WHERE fecha_inicio >= $1 AND fecha_inicio < $2",
        inicio,
        fin,
    )
    .await?;

    Ok(TotalesMes {
        mes: inicio.format("%Y-%m").to_string(),
        ventas_total: ventas,
        produccion_total: produccion,
    })
}

async fn suma_en_ventana(
    pool: &PgPool,
    sql: &str,
    inicio: NaiveDate,
    fin: NaiveDate,
) -> Result<f64, ApiError> {
    let fila = sqlx::query(sql).bind(inicio).bind(fin).fetch_one(pool).await?;
    let suma: BigDecimal = fila.try_get("suma")?;
    Ok(suma.to_f64().unwrap_or(0.0))
}

async fn actividad_reciente(pool: &PgPool) -> Result<Vec<Actividad>, ApiError> {
    let mut items = Vec::new();

    let ventas = sqlx::query(
        "SELECT v.id, v.creado_en, c.nombre AS cliente
         FROM ventas v LEFT JOIN clientes c ON c.id = v.cliente_id
         ORDER BY v.creado_en DESC LIMIT 5",
    )
    .fetch_all(pool)
    .await?;
    for fila in ventas {
        let id: i64 = fila.try_get("id")?;
        let creado_en: DateTime<Utc> = fila.try_get("creado_en")?;
        let cliente: Option<String> = fila.try_get("cliente")?;
        items.push(Actividad {
            tipo: "venta",
            id,
            descripcion: format!(
                "Venta a {}",
                cliente.unwrap_or_else(|| "cliente desconocido".to_string())
            ),
            fecha: creado_en.format("%Y-%m-%d %H:%M:%S").to_string(),
        });
    }

    let ordenes = sqlx::query(
        "SELECT o.id, o.creado_en, p.nombre AS producto
         FROM ordenes_produccion o LEFT JOIN productos p ON p.id = o.producto_id
         ORDER BY o.creado_en DESC LIMIT 5",
    )
    .fetch_all(pool)
    .await?;
    for fila in ordenes {
        let id: i64 = fila.try_get("id")?;
        let creado_en: DateTime<Utc> = fila.try_get("creado_en")?;
        let producto: Option<String> = fila.try_get("producto")?;
        items.push(Actividad {
            tipo: "orden_produccion",
            id,
            descripcion: format!(
                "Orden de produccion de {}",
                producto.unwrap_or_else(|| "producto desconocido".to_string())
            ),
            fecha: creado_en.format("%Y-%m-%d %H:%M:%S").to_string(),
        });
    }

    Ok(mezclar_actividad(items))
}

/// Newest first by the formatted timestamp string, capped to the feed size.
/// The fixed zero-padded format makes the string order the time order.
pub fn mezclar_actividad(mut items: Vec<Actividad>) -> Vec<Actividad> {
    items.sort_by(|a, b| b.fecha.cmp(&a.fecha));
    items.truncate(ACTIVIDAD_MAXIMA);
    items
}
