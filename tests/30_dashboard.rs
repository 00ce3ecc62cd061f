mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn dashboard_agrega_el_mes_en_curso() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let cookie = common::login_admin(server).await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let hoy = chrono::Utc::now().date_naive();

    // una venta y una orden con fecha de hoy deben entrar en el mes actual
    let res = client
        .post(format!("{}/api/clientes", base))
        .header("cookie", &cookie)
        .json(&json!({ "nombre": "Cliente Tablero", "email": "t@t.com", "tipo": "minorista" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cliente_id = res.json::<Value>().await?["id"].as_i64().unwrap();

    let res = client
        .post(format!("{}/api/productos", base))
        .header("cookie", &cookie)
        .json(&json!({ "nombre": "Pieza tablero", "precio": 10 }))
        .send()
        .await?;
    let producto_id = res.json::<Value>().await?["id"].as_i64().unwrap();

    let res = client
        .post(format!("{}/api/ventas", base))
        .header("cookie", &cookie)
        .json(&json!({ "cliente_id": cliente_id, "fecha": hoy.to_string(), "total": 250.0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/api/ordenes_produccion", base))
        .header("cookie", &cookie)
        .json(&json!({
            "producto_id": producto_id,
            "cantidad": 40,
            "fecha_inicio": hoy.to_string()
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/api/dashboard", base))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let resumen = res.json::<Value>().await?;

    let ventas_mes = resumen["mes_actual"]["ventas_total"].as_f64().unwrap();
    let produccion_mes = resumen["mes_actual"]["produccion_total"].as_f64().unwrap();
    assert!(ventas_mes >= 250.0, "ventas del mes: {}", ventas_mes);
    assert!(produccion_mes >= 40.0, "produccion del mes: {}", produccion_mes);

    // serie de 5 meses, en orden y terminando en el mes actual
    let tendencia = resumen["tendencia"].as_array().unwrap();
    assert_eq!(tendencia.len(), 5);
    let mes_actual = hoy.format("%Y-%m").to_string();
    assert_eq!(tendencia[4]["mes"], json!(mes_actual));
    assert_eq!(tendencia[4]["ventas_total"], resumen["mes_actual"]["ventas_total"]);

    // la actividad reciente incluye lo recien creado, lo mas nuevo primero
    let actividad = resumen["actividad_reciente"].as_array().unwrap();
    assert!(!actividad.is_empty());
    let fechas: Vec<&str> = actividad.iter().map(|a| a["fecha"].as_str().unwrap()).collect();
    let mut ordenadas = fechas.clone();
    ordenadas.sort_by(|a, b| b.cmp(a));
    assert_eq!(fechas, ordenadas, "la actividad debe venir en orden descendente");

    Ok(())
}

#[tokio::test]
async fn dashboard_requiere_sesion() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/dashboard", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
