//! Credentials, roles, and the server-side session store.
//!
//! Identity travels as an opaque session id in an HttpOnly cookie; the row
//! behind it lives in the sesiones table and is removed on logout.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config;

/// Access roles, checked per endpoint against the resource registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    Supervisor,
    Empleado,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "admin",
            Rol::Supervisor => "supervisor",
            Rol::Empleado => "empleado",
        }
    }

    pub fn parse(s: &str) -> Option<Rol> {
        match s {
            "admin" => Some(Rol::Admin),
            "supervisor" => Some(Rol::Supervisor),
            "empleado" => Some(Rol::Empleado),
            _ => None,
        }
    }
}

/// Allowed values for the usuarios.rol column.
pub const ROLES: &[&str] = &["admin", "supervisor", "empleado"];

/// An account row. The hash never serializes into responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Usuario {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub rol: String,
    pub empleado_id: Option<i64>,
}

impl Usuario {
    /// Parsed role; unknown values degrade to the least-privileged role.
    pub fn rol(&self) -> Rol {
        Rol::parse(&self.rol).unwrap_or(Rol::Empleado)
    }
}

// ── Password helpers ──

/// Hash a plain password with argon2id.
pub fn hash_password(password: &str) -> Result<String, String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::Argon2;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| e.to_string())
}

/// Verify a password against an argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// ── Session store ──

pub async fn buscar_usuario_por_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Usuario>, sqlx::Error> {
    sqlx::query_as::<_, Usuario>(
        "SELECT id, nombre, email, password_hash, rol, empleado_id FROM usuarios WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Insert a session row and return its id.
pub async fn crear_sesion(pool: &PgPool, usuario_id: i64) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let ttl = config::config().session.ttl_hours as i64;
    let expira_en = Utc::now() + Duration::hours(ttl);

    sqlx::query("INSERT INTO sesiones (id, usuario_id, expira_en) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(usuario_id)
        .bind(expira_en)
        .execute(pool)
        .await?;

    Ok(id)
}

/// Resolve a session id to its account, ignoring expired rows.
pub async fn buscar_usuario_por_sesion(
    pool: &PgPool,
    sesion_id: Uuid,
) -> Result<Option<Usuario>, sqlx::Error> {
    sqlx::query_as::<_, Usuario>(
        "SELECT u.id, u.nombre, u.email, u.password_hash, u.rol, u.empleado_id
         FROM sesiones s JOIN usuarios u ON u.id = s.usuario_id
         WHERE s.id = $1 AND s.expira_en > now()",
    )
    .bind(sesion_id)
    .fetch_optional(pool)
    .await
}

pub async fn eliminar_sesion(pool: &PgPool, sesion_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sesiones WHERE id = $1")
        .bind(sesion_id)
        .execute(pool)
        .await?;
    Ok(())
}

// ── Cookie helpers ──

/// Extract a cookie value from the Cookie request header.
pub fn leer_cookie(headers: &HeaderMap, nombre: &str) -> Option<String> {
    let header = headers.get("cookie")?.to_str().ok()?;
    for par in header.split(';') {
        if let Some((clave, valor)) = par.trim().split_once('=') {
            if clave == nombre {
                return Some(valor.to_string());
            }
        }
    }
    None
}

/// Set-Cookie value binding a session id to the client.
pub fn cookie_de_sesion(sesion_id: Uuid) -> String {
    let cfg = &config::config().session;
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        cfg.cookie_name,
        sesion_id,
        cfg.ttl_hours * 3600
    )
}

/// Set-Cookie value that clears the session cookie on logout.
pub fn cookie_de_borrado() -> String {
    let cfg = &config::config().session;
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", cfg.cookie_name)
}
