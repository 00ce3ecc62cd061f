//! HTTP client wrapper: the controller layer of the CLI.
//!
//! Payloads run through the same validation schema the server enforces, so
//! obvious mistakes never leave the machine.

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use reqwest::{header, RequestBuilder, Response};
use serde_json::{json, Value};

use crate::cli::config::{self, SesionGuardada};
use crate::error::ApiError;
use crate::recursos::{buscar, Recurso};
use crate::validacion;

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    sesion: Option<SesionGuardada>,
}

impl ApiClient {
    pub fn nuevo() -> Result<Self> {
        let servidor = config::load_servidor_config()?;
        let sesion = config::load_sesion()?;
        Ok(Self {
            base_url: servidor.base_url,
            http: reqwest::Client::new(),
            sesion,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn con_sesion(&self, solicitud: RequestBuilder) -> RequestBuilder {
        match &self.sesion {
            Some(s) => solicitud.header(
                header::COOKIE,
                format!("{}={}", s.cookie_nombre, s.cookie_valor),
            ),
            None => solicitud,
        }
    }

    /// Unwrap a response: 2xx parses as JSON, anything else surfaces the
    /// server's {"error": ...} message.
    async fn cuerpo(respuesta: Response) -> Result<Value> {
        let status = respuesta.status();
        let cuerpo: Value = respuesta.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(cuerpo);
        }

        let mensaje = cuerpo
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("error sin detalle")
            .to_string();
        bail!("{} ({})", mensaje, status)
    }

    // ── auth ──

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Value> {
        let respuesta = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let cookie = respuesta
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(parsear_set_cookie);

        let cuerpo = Self::cuerpo(respuesta).await?;

        let (cookie_nombre, cookie_valor) =
            cookie.ok_or_else(|| anyhow!("el servidor no envio cookie de sesion"))?;
        let sesion = SesionGuardada {
            cookie_nombre,
            cookie_valor,
            usuario: cuerpo.get("usuario").cloned().unwrap_or(Value::Null),
            iniciada_en: Utc::now(),
        };
        config::save_sesion(&sesion)?;
        self.sesion = Some(sesion);

        Ok(cuerpo)
    }

    pub async fn logout(&mut self) -> Result<Value> {
        let respuesta = self
            .con_sesion(self.http.delete(self.url("/api/auth/sesion")))
            .send()
            .await?;
        let cuerpo = Self::cuerpo(respuesta).await?;

        config::borrar_sesion()?;
        self.sesion = None;
        Ok(cuerpo)
    }

    pub async fn yo(&self) -> Result<Value> {
        let respuesta = self.con_sesion(self.http.get(self.url("/api/auth/yo"))).send().await?;
        Self::cuerpo(respuesta).await
    }

    // ── resources ──

    pub async fn listar(&self, recurso: &str) -> Result<Value> {
        definicion(recurso)?;
        let respuesta = self
            .con_sesion(self.http.get(self.url(&format!("/api/{}", recurso))))
            .send()
            .await?;
        Self::cuerpo(respuesta).await
    }

    pub async fn obtener(&self, recurso: &str, id: i64) -> Result<Value> {
        definicion(recurso)?;
        let respuesta = self
            .con_sesion(self.http.get(self.url(&format!("/api/{}/{}", recurso, id))))
            .send()
            .await?;
        Self::cuerpo(respuesta).await
    }

    pub async fn crear(&self, recurso: &str, payload: &Value) -> Result<Value> {
        validar_local(recurso, payload, true)?;
        let respuesta = self
            .con_sesion(self.http.post(self.url(&format!("/api/{}", recurso))))
            .json(payload)
            .send()
            .await?;
        Self::cuerpo(respuesta).await
    }

    pub async fn actualizar(&self, recurso: &str, id: i64, payload: &Value) -> Result<Value> {
        validar_local(recurso, payload, false)?;
        let respuesta = self
            .con_sesion(self.http.put(self.url(&format!("/api/{}/{}", recurso, id))))
            .json(payload)
            .send()
            .await?;
        Self::cuerpo(respuesta).await
    }

    pub async fn eliminar(&self, recurso: &str, id: i64) -> Result<Value> {
        definicion(recurso)?;
        let respuesta = self
            .con_sesion(self.http.delete(self.url(&format!("/api/{}/{}", recurso, id))))
            .send()
            .await?;
        Self::cuerpo(respuesta).await
    }

    // ── other surfaces ──

    pub async fn dashboard(&self) -> Result<Value> {
        let respuesta = self
            .con_sesion(self.http.get(self.url("/api/dashboard")))
            .send()
            .await?;
        Self::cuerpo(respuesta).await
    }

    pub async fn salud(&self) -> Result<Value> {
        let respuesta = self.http.get(self.url("/health")).send().await?;
        Self::cuerpo(respuesta).await
    }
}

fn definicion(recurso: &str) -> Result<&'static Recurso> {
    buscar(recurso).ok_or_else(|| anyhow!("recurso desconocido: {}", recurso))
}

/// Same rules as the server, before the request goes out.
fn validar_local(recurso: &str, payload: &Value, es_creacion: bool) -> Result<()> {
    let rec = definicion(recurso)?;
    let Some(objeto) = payload.as_object() else {
        bail!("el payload debe ser un objeto JSON");
    };

    let datos = validacion::filtrar_columnas(rec, objeto);
    let resultado = if es_creacion {
        validacion::validar_creacion(rec, &datos)
    } else {
        validacion::validar_actualizacion(rec, &datos)
    };

    resultado.map_err(|e| match e {
        ApiError::Validacion { mensaje, campos } => {
            anyhow!("{}: {}", mensaje, campos.join(", "))
        }
        otro => anyhow!(otro.to_string()),
    })
}

/// First name=value pair of a Set-Cookie header.
fn parsear_set_cookie(valor: &str) -> Option<(String, String)> {
    let par = valor.split(';').next()?;
    let (nombre, valor) = par.split_once('=')?;
    if valor.is_empty() {
        return None;
    }
    Some((nombre.trim().to_string(), valor.trim().to_string()))
}
