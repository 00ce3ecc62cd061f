mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn cliente_crud_redondo() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let cookie = common::login_admin(server).await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    // create devuelve 201 con la fila completa
    let res = client
        .post(format!("{}/api/clientes", base))
        .header("cookie", &cookie)
        .json(&json!({ "nombre": "Acme", "email": "a@acme.com", "tipo": "distribuidor" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let creado = res.json::<Value>().await?;
    let id = creado["id"].as_i64().expect("id asignado");
    assert_eq!(creado["nombre"], "Acme");
    assert_eq!(creado["email"], "a@acme.com");
    assert_eq!(creado["tipo"], "distribuidor");

    // get(create(payload)) regresa los mismos campos
    let res = client
        .get(format!("{}/api/clientes/{}", base, id))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let leido = res.json::<Value>().await?;
    assert_eq!(leido["nombre"], "Acme");
    assert_eq!(leido["tipo"], "distribuidor");

    // actualizacion parcial: los campos omitidos no cambian
    let res = client
        .put(format!("{}/api/clientes/{}", base, id))
        .header("cookie", &cookie)
        .json(&json!({ "telefono": "555-0101" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let actualizado = res.json::<Value>().await?;
    assert_eq!(actualizado["telefono"], "555-0101");
    assert_eq!(actualizado["nombre"], "Acme");
    assert_eq!(actualizado["email"], "a@acme.com");

    // payload vacio: ningun campo cambia
    let res = client
        .put(format!("{}/api/clientes/{}", base, id))
        .header("cookie", &cookie)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let intacto = res.json::<Value>().await?;
    assert_eq!(intacto["nombre"], "Acme");
    assert_eq!(intacto["telefono"], "555-0101");

    // delete y luego 404
    let res = client
        .delete(format!("{}/api/clientes/{}", base, id))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/clientes/{}", base, id))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/clientes/{}", base, id))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn eliminar_cliente_bloqueado_por_venta() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let cookie = common::login_admin(server).await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let res = client
        .post(format!("{}/api/clientes", base))
        .header("cookie", &cookie)
        .json(&json!({ "nombre": "Industrias Beta", "email": "b@beta.com", "tipo": "mayorista" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cliente_id = res.json::<Value>().await?["id"].as_i64().unwrap();

    let res = client
        .post(format!("{}/api/productos", base))
        .header("cookie", &cookie)
        .json(&json!({ "nombre": "Tornillo M8", "precio": 0.75 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let producto_id = res.json::<Value>().await?["id"].as_i64().unwrap();

    let res = client
        .post(format!("{}/api/ventas", base))
        .header("cookie", &cookie)
        .json(&json!({
            "cliente_id": cliente_id,
            "fecha": "2026-08-07",
            "lineas": [
                { "producto_id": producto_id, "cantidad": 100, "precio_unitario": 0.75 }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let venta = res.json::<Value>().await?;
    let venta_id = venta["id"].as_i64().unwrap();
    assert_eq!(venta["total"], json!(75.0));
    assert_eq!(venta["lineas"].as_array().unwrap().len(), 1);

    // el cliente no se puede eliminar mientras la venta lo referencia
    let res = client
        .delete(format!("{}/api/clientes/{}", base, cliente_id))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let cuerpo = res.json::<Value>().await?;
    let mensaje = cuerpo["error"].as_str().unwrap();
    assert!(mensaje.starts_with("no se puede eliminar"), "mensaje inesperado: {}", mensaje);

    // y la fila sigue intacta
    let res = client
        .get(format!("{}/api/clientes/{}", base, cliente_id))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // al quitar la venta (sus lineas van con ella), el delete procede
    let res = client
        .delete(format!("{}/api/ventas/{}", base, venta_id))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/api/clientes/{}", base, cliente_id))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn rol_empleado_recibe_403_y_no_hay_cambios() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let cookie_admin = common::login_admin(server).await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let email = format!("operario{}@planta.local", common::sufijo_unico());
    let res = client
        .post(format!("{}/api/usuarios", base))
        .header("cookie", &cookie_admin)
        .json(&json!({
            "nombre": "Operario",
            "email": email,
            "password": "secreto123",
            "rol": "empleado"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let usuario = res.json::<Value>().await?;
    assert!(usuario.get("password_hash").is_none());

    let cookie_empleado = common::login(server, &email, "secreto123").await?;

    // mutacion vetada por rol: 403 y ninguna fila nueva
    let nombre_unico = format!("Cliente prohibido {}", common::sufijo_unico());
    let res = client
        .post(format!("{}/api/clientes", base))
        .header("cookie", &cookie_empleado)
        .json(&json!({ "nombre": nombre_unico, "email": "x@x.com", "tipo": "minorista" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/api/clientes", base))
        .header("cookie", &cookie_admin)
        .send()
        .await?;
    let lista = res.json::<Value>().await?;
    let aparece = lista
        .as_array()
        .unwrap()
        .iter()
        .any(|fila| fila["nombre"] == json!(nombre_unico));
    assert!(!aparece, "el 403 no debe dejar estado");

    // la lectura general sigue abierta para cualquier sesion
    let res = client
        .get(format!("{}/api/clientes", base))
        .header("cookie", &cookie_empleado)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn fk_inexistente_devuelve_404() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let cookie = common::login_admin(server).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/inventario", server.base_url))
        .header("cookie", &cookie)
        .json(&json!({ "material_id": 999_999_999, "cantidad": 5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn validacion_lista_los_campos_faltantes() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let cookie = common::login_admin(server).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/clientes", server.base_url))
        .header("cookie", &cookie)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let cuerpo = res.json::<Value>().await?;
    assert_eq!(cuerpo["campos"], json!(["nombre", "email", "tipo"]));
    Ok(())
}

#[tokio::test]
async fn enum_fuera_de_catalogo_devuelve_400() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let cookie = common::login_admin(server).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/clientes", server.base_url))
        .header("cookie", &cookie)
        .json(&json!({ "nombre": "Acme", "email": "a@acme.com", "tipo": "socio" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
