// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with an explicit status code per failure cause.
///
/// Validation and authorization are checked before any write, so a 4xx
/// response never leaves partial state behind.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{mensaje}")]
    Validacion { mensaje: String, campos: Vec<String> },

    #[error("{0}")]
    Solicitud(String),

    /// Delete refused while foreign keys still point at the row.
    #[error("no se puede eliminar {recurso}: tiene {dependientes} registro(s) asociado(s)")]
    ReferenciasActivas { recurso: String, dependientes: i64 },

    // 401 Unauthorized
    #[error("{0}")]
    NoAutenticado(String),

    // 403 Forbidden
    #[error("{0}")]
    Prohibido(String),

    // 404 Not Found
    #[error("{0}")]
    NoEncontrado(String),

    // 500 Internal Server Error
    #[error("{0}")]
    Interno(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validacion { .. } => StatusCode::BAD_REQUEST,
            ApiError::Solicitud(_) => StatusCode::BAD_REQUEST,
            ApiError::ReferenciasActivas { .. } => StatusCode::BAD_REQUEST,
            ApiError::NoAutenticado(_) => StatusCode::UNAUTHORIZED,
            ApiError::Prohibido(_) => StatusCode::FORBIDDEN,
            ApiError::NoEncontrado(_) => StatusCode::NOT_FOUND,
            ApiError::Interno(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response body. Internal causes are logged, never echoed.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validacion { mensaje, campos } => json!({
                "error": mensaje,
                "campos": campos,
            }),
            ApiError::Interno(causa) => {
                tracing::error!("error interno: {}", causa);
                json!({ "error": "error interno del servidor" })
            }
            other => json!({ "error": other.to_string() }),
        }
    }

    pub fn validacion(mensaje: impl Into<String>, campos: Vec<String>) -> Self {
        ApiError::Validacion { mensaje: mensaje.into(), campos }
    }

    pub fn solicitud(mensaje: impl Into<String>) -> Self {
        ApiError::Solicitud(mensaje.into())
    }

    pub fn no_autenticado(mensaje: impl Into<String>) -> Self {
        ApiError::NoAutenticado(mensaje.into())
    }

    pub fn prohibido(mensaje: impl Into<String>) -> Self {
        ApiError::Prohibido(mensaje.into())
    }

    pub fn no_encontrado(mensaje: impl Into<String>) -> Self {
        ApiError::NoEncontrado(mensaje.into())
    }

    pub fn interno(mensaje: impl Into<String>) -> Self {
        ApiError::Interno(mensaje.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::no_encontrado("registro no encontrado"),
            sqlx::Error::Database(db_err) => {
                // Class 22 = data exception (bad date/number in a payload),
                // class 23 = integrity violation (duplicates, FK breakage).
                // Both originate in client input.
                let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
                if code.starts_with("22") || code.starts_with("23") {
                    ApiError::solicitud(format!("datos invalidos: {}", db_err.message()))
                } else {
                    ApiError::interno(err.to_string())
                }
            }
            _ => ApiError::interno(err.to_string()),
        }
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::validacion("faltan campos", vec!["nombre".into()]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ReferenciasActivas { recurso: "clientes/1".into(), dependientes: 2 }
                .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::no_autenticado("sin sesion").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::prohibido("rol").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::no_encontrado("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::interno("y").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn referencias_activas_message_is_stable() {
        let err = ApiError::ReferenciasActivas { recurso: "clientes/7".into(), dependientes: 1 };
        assert!(err.to_string().starts_with("no se puede eliminar"));
    }

    #[test]
    fn validacion_body_lists_fields() {
        let err = ApiError::validacion("faltan campos requeridos", vec!["nombre".into(), "email".into()]);
        let body = err.to_json();
        assert_eq!(body["campos"], serde_json::json!(["nombre", "email"]));
    }

    #[test]
    fn interno_body_hides_cause() {
        let err = ApiError::interno("pg: relation does not exist");
        let body = err.to_json();
        assert_eq!(body["error"], "error interno del servidor");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
