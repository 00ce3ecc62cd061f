mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn api_sin_sesion_devuelve_401() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/clientes", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("error").is_some(), "cuerpo sin campo error: {}", body);
    Ok(())
}

#[tokio::test]
async fn login_con_credenciales_invalidas_devuelve_401() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": "admin@planta.local", "password": "incorrecta" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_sin_campos_devuelve_400() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": "", "password": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    let campos = body["campos"].as_array().expect("lista de campos");
    assert_eq!(campos.len(), 2);
    Ok(())
}

#[tokio::test]
async fn sesion_completa_login_yo_logout() -> Result<()> {
    if !common::database_disponible() {
        eprintln!("omitido: DATABASE_URL no definido");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let cookie = common::login_admin(server).await?;
    let client = reqwest::Client::new();

    // whoami refleja la identidad de la sesion
    let res = client
        .get(format!("{}/api/auth/yo", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["email"], "admin@planta.local");
    assert_eq!(body["rol"], "admin");
    assert!(body.get("password_hash").is_none(), "el hash no debe salir del servidor");

    // logout invalida la sesion del lado servidor
    let res = client
        .delete(format!("{}/api/auth/sesion", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/auth/yo", server.base_url))
        .header("cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
