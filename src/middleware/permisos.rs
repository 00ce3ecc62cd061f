//! The role gate: one interceptor for every resource route, parameterized by
//! the per-action allow-lists in the registry.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::auth::{Rol, Usuario};
use crate::error::ApiError;
use crate::recursos::{buscar, Recurso};

/// Gate mutating verbs before any handler (and thus before any write) runs.
pub async fn permisos_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    if let Some(recurso) = recurso_de_ruta(request.uri().path()) {
        let usuario = request
            .extensions()
            .get::<Usuario>()
            .ok_or_else(|| ApiError::no_autenticado("sesion requerida"))?;
        autorizar(recurso, request.method(), usuario.rol())?;
    }

    Ok(next.run(request).await)
}

/// Resolve the registry entry from an /api path. Non-resource routes
/// (auth, dashboard) carry no per-role gate beyond the session itself.
pub fn recurso_de_ruta(path: &str) -> Option<&'static Recurso> {
    let resto = path.strip_prefix("/api/")?;
    let nombre = resto.split('/').next()?;
    buscar(nombre)
}

/// Method → action mapping against the resource's allow-lists.
pub fn autorizar(recurso: &Recurso, metodo: &Method, rol: Rol) -> Result<(), ApiError> {
    let permitidos = match *metodo {
        Method::POST => recurso.permisos.crear,
        Method::PUT => recurso.permisos.actualizar,
        Method::DELETE => recurso.permisos.eliminar,
        // reads are open to any authenticated session
        _ => return Ok(()),
    };

    if permitidos.contains(&rol) {
        Ok(())
    } else {
        Err(ApiError::prohibido(format!(
            "el rol {} no puede modificar {}",
            rol.as_str(),
            recurso.nombre
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empleado_no_puede_mutar_clientes() {
        let rec = buscar("clientes").unwrap();
        assert!(autorizar(rec, &Method::POST, Rol::Empleado).is_err());
        assert!(autorizar(rec, &Method::PUT, Rol::Empleado).is_err());
        assert!(autorizar(rec, &Method::DELETE, Rol::Empleado).is_err());
        assert!(autorizar(rec, &Method::GET, Rol::Empleado).is_ok());
    }

    #[test]
    fn supervisor_crea_pero_no_elimina() {
        let rec = buscar("clientes").unwrap();
        assert!(autorizar(rec, &Method::POST, Rol::Supervisor).is_ok());
        assert!(autorizar(rec, &Method::DELETE, Rol::Supervisor).is_err());
    }

    #[test]
    fn admin_puede_todo() {
        for rec in crate::recursos::RECURSOS {
            for metodo in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
                assert!(autorizar(rec, &metodo, Rol::Admin).is_ok());
            }
        }
    }

    #[test]
    fn empleado_puede_reportar_incidencias() {
        let rec = buscar("incidencias").unwrap();
        assert!(autorizar(rec, &Method::POST, Rol::Empleado).is_ok());
        assert!(autorizar(rec, &Method::PUT, Rol::Empleado).is_err());
    }

    #[test]
    fn rutas_resuelven_recurso() {
        assert_eq!(recurso_de_ruta("/api/clientes").unwrap().nombre, "clientes");
        assert_eq!(recurso_de_ruta("/api/clientes/15").unwrap().nombre, "clientes");
        assert!(recurso_de_ruta("/api/auth/yo").is_none());
        assert!(recurso_de_ruta("/api/dashboard").is_none());
        assert!(recurso_de_ruta("/health").is_none());
    }
}
