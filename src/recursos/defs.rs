//! Declarative registry of every business resource.
//!
//! One entry per entity drives the generic CRUD engine: column set and
//! validation rules, read-time join views, delete-blocking dependents, and
//! the per-action role allow-lists enforced by the permisos middleware.

use crate::auth::{Rol, ROLES};

/// A writable column.
#[derive(Debug, Clone, Copy)]
pub struct Campo {
    pub nombre: &'static str,
    /// Must be present and non-null on create.
    pub requerido: bool,
    /// Fixed allow-list checked at the API boundary.
    pub valores: Option<&'static [&'static str]>,
    /// Resource whose row the value must point at.
    pub referencia: Option<&'static str>,
}

impl Campo {
    const fn plano(nombre: &'static str, requerido: bool) -> Self {
        Self { nombre, requerido, valores: None, referencia: None }
    }

    const fn enumerado(
        nombre: &'static str,
        requerido: bool,
        valores: &'static [&'static str],
    ) -> Self {
        Self { nombre, requerido, valores: Some(valores), referencia: None }
    }

    const fn referencia(nombre: &'static str, requerido: bool, recurso: &'static str) -> Self {
        Self { nombre, requerido, valores: None, referencia: Some(recurso) }
    }
}

/// A related display field flattened into read responses, never stored
/// denormalized.
#[derive(Debug, Clone, Copy)]
pub struct Vista {
    /// FK column on this resource.
    pub campo: &'static str,
    pub tabla: &'static str,
    pub columna: &'static str,
    pub alias: &'static str,
}

/// A child table whose rows block deletion of a parent.
#[derive(Debug, Clone, Copy)]
pub struct Dependiente {
    pub tabla: &'static str,
    pub columna: &'static str,
}

/// Role allow-lists per mutating action. Reads are open to any session.
#[derive(Debug, Clone, Copy)]
pub struct Permisos {
    pub crear: &'static [Rol],
    pub actualizar: &'static [Rol],
    pub eliminar: &'static [Rol],
}

const GESTION: &[Rol] = &[Rol::Admin, Rol::Supervisor];
const SOLO_ADMIN: &[Rol] = &[Rol::Admin];
const CUALQUIERA: &[Rol] = &[Rol::Admin, Rol::Supervisor, Rol::Empleado];

impl Permisos {
    /// create/update for admin+supervisor, delete for admin.
    const fn gestion() -> Self {
        Self { crear: GESTION, actualizar: GESTION, eliminar: SOLO_ADMIN }
    }

    const fn solo_admin() -> Self {
        Self { crear: SOLO_ADMIN, actualizar: SOLO_ADMIN, eliminar: SOLO_ADMIN }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Recurso {
    pub nombre: &'static str,
    pub tabla: &'static str,
    pub campos: &'static [Campo],
    pub vistas: &'static [Vista],
    pub dependientes: &'static [Dependiente],
    pub permisos: Permisos,
    /// Column tying a row to the employee that owns it; the empleado role
    /// only sees its own rows on resources that set this.
    pub propietario: Option<&'static str>,
    /// Columns stripped from every response.
    pub ocultos: &'static [&'static str],
}

const AREAS: &[&str] = &["produccion", "mantenimiento", "administracion", "ventas"];
const TIPOS_CLIENTE: &[&str] = &["distribuidor", "minorista", "mayorista"];
const UNIDADES: &[&str] = &["kg", "litro", "unidad", "metro"];
const ESTADOS_VENTA: &[&str] = &["pendiente", "pagada", "cancelada"];
const ESTADOS_ORDEN: &[&str] = &["pendiente", "en_proceso", "terminada"];
const TIPOS_MANTENIMIENTO: &[&str] = &["preventivo", "correctivo"];
const TIPOS_INCIDENCIA: &[&str] = &["seguridad", "calidad", "maquinaria"];
const ESTADOS_INCIDENCIA: &[&str] = &["abierta", "en_revision", "cerrada"];
const AMBITOS: &[&str] = &["seguridad", "ambiental", "laboral"];

pub const RECURSOS: &[Recurso] = &[
    Recurso {
        nombre: "usuarios",
        tabla: "usuarios",
        campos: &[
            Campo::plano("nombre", true),
            Campo::plano("email", true),
            Campo::enumerado("rol", true, ROLES),
            Campo::referencia("empleado_id", false, "empleados"),
        ],
        vistas: &[],
        dependientes: &[],
        permisos: Permisos::solo_admin(),
        propietario: None,
        ocultos: &["password_hash"],
    },
    Recurso {
        nombre: "empleados",
        tabla: "empleados",
        campos: &[
            Campo::plano("nombre", true),
            Campo::plano("apellido", true),
            Campo::plano("email", true),
            Campo::plano("puesto", false),
            Campo::enumerado("area", false, AREAS),
            Campo::plano("fecha_ingreso", false),
            Campo::plano("salario", false),
            Campo::plano("activo", false),
        ],
        vistas: &[],
        dependientes: &[
            Dependiente { tabla: "usuarios", columna: "empleado_id" },
            Dependiente { tabla: "asistencias", columna: "empleado_id" },
            Dependiente { tabla: "nominas", columna: "empleado_id" },
            Dependiente { tabla: "mantenimientos", columna: "empleado_id" },
            Dependiente { tabla: "incidencias", columna: "empleado_id" },
        ],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "clientes",
        tabla: "clientes",
        campos: &[
            Campo::plano("nombre", true),
            Campo::plano("email", true),
            Campo::enumerado("tipo", true, TIPOS_CLIENTE),
            Campo::plano("telefono", false),
            Campo::plano("direccion", false),
        ],
        vistas: &[],
        dependientes: &[Dependiente { tabla: "ventas", columna: "cliente_id" }],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "materiales",
        tabla: "materiales",
        campos: &[
            Campo::plano("nombre", true),
            Campo::plano("descripcion", false),
            Campo::enumerado("unidad", true, UNIDADES),
            Campo::plano("costo_unitario", false),
            Campo::plano("proveedor", false),
        ],
        vistas: &[],
        dependientes: &[Dependiente { tabla: "inventario", columna: "material_id" }],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "productos",
        tabla: "productos",
        campos: &[
            Campo::plano("nombre", true),
            Campo::plano("descripcion", false),
            Campo::plano("precio", true),
            Campo::plano("categoria", false),
        ],
        vistas: &[],
        dependientes: &[
            Dependiente { tabla: "detalle_ventas", columna: "producto_id" },
            Dependiente { tabla: "ordenes_produccion", columna: "producto_id" },
        ],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "maquinas",
        tabla: "maquinas",
        campos: &[
            Campo::plano("nombre", true),
            Campo::plano("modelo", false),
            Campo::enumerado("area", false, AREAS),
            Campo::plano("fecha_compra", false),
        ],
        vistas: &[],
        dependientes: &[Dependiente { tabla: "mantenimientos", columna: "maquina_id" }],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "inventario",
        tabla: "inventario",
        campos: &[
            Campo::referencia("material_id", true, "materiales"),
            Campo::plano("cantidad", true),
            Campo::plano("ubicacion", false),
            Campo::plano("fecha_actualizacion", false),
        ],
        vistas: &[Vista {
            campo: "material_id",
            tabla: "materiales",
            columna: "nombre",
            alias: "material_nombre",
        }],
        dependientes: &[],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "ventas",
        tabla: "ventas",
        campos: &[
            Campo::referencia("cliente_id", true, "clientes"),
            Campo::plano("fecha", true),
            Campo::plano("total", false),
            Campo::enumerado("estado", false, ESTADOS_VENTA),
        ],
        vistas: &[Vista {
            campo: "cliente_id",
            tabla: "clientes",
            columna: "nombre",
            alias: "cliente_nombre",
        }],
        // detalle_ventas rows are part of the sale and go with it.
        dependientes: &[],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "ordenes_produccion",
        tabla: "ordenes_produccion",
        campos: &[
            Campo::referencia("producto_id", true, "productos"),
            Campo::plano("cantidad", true),
            Campo::plano("fecha_inicio", true),
            Campo::plano("fecha_fin", false),
            Campo::enumerado("estado", false, ESTADOS_ORDEN),
        ],
        vistas: &[Vista {
            campo: "producto_id",
            tabla: "productos",
            columna: "nombre",
            alias: "producto_nombre",
        }],
        dependientes: &[],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "mantenimientos",
        tabla: "mantenimientos",
        campos: &[
            Campo::referencia("maquina_id", true, "maquinas"),
            Campo::referencia("empleado_id", true, "empleados"),
            Campo::plano("fecha", true),
            Campo::enumerado("tipo", false, TIPOS_MANTENIMIENTO),
            Campo::plano("descripcion", false),
            Campo::plano("costo", false),
        ],
        vistas: &[
            Vista { campo: "maquina_id", tabla: "maquinas", columna: "nombre", alias: "maquina_nombre" },
            Vista { campo: "empleado_id", tabla: "empleados", columna: "nombre", alias: "empleado_nombre" },
        ],
        dependientes: &[],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
    Recurso {
        nombre: "asistencias",
        tabla: "asistencias",
        campos: &[
            Campo::referencia("empleado_id", true, "empleados"),
            Campo::plano("fecha", true),
            Campo::plano("hora_entrada", false),
            Campo::plano("hora_salida", false),
        ],
        vistas: &[Vista {
            campo: "empleado_id",
            tabla: "empleados",
            columna: "nombre",
            alias: "empleado_nombre",
        }],
        dependientes: &[],
        permisos: Permisos { crear: CUALQUIERA, actualizar: GESTION, eliminar: SOLO_ADMIN },
        propietario: Some("empleado_id"),
        ocultos: &[],
    },
    Recurso {
        nombre: "nominas",
        tabla: "nominas",
        campos: &[
            Campo::referencia("empleado_id", true, "empleados"),
            Campo::plano("mes", true),
            Campo::plano("salario_base", true),
            Campo::plano("bonos", false),
            Campo::plano("deducciones", false),
            Campo::plano("salario_neto", false),
        ],
        vistas: &[Vista {
            campo: "empleado_id",
            tabla: "empleados",
            columna: "nombre",
            alias: "empleado_nombre",
        }],
        dependientes: &[],
        permisos: Permisos::gestion(),
        propietario: Some("empleado_id"),
        ocultos: &[],
    },
    Recurso {
        nombre: "incidencias",
        tabla: "incidencias",
        campos: &[
            Campo::referencia("empleado_id", false, "empleados"),
            Campo::plano("fecha", true),
            Campo::enumerado("tipo", true, TIPOS_INCIDENCIA),
            Campo::plano("descripcion", true),
            Campo::enumerado("estado", false, ESTADOS_INCIDENCIA),
        ],
        vistas: &[Vista {
            campo: "empleado_id",
            tabla: "empleados",
            columna: "nombre",
            alias: "empleado_nombre",
        }],
        dependientes: &[],
        permisos: Permisos { crear: CUALQUIERA, actualizar: GESTION, eliminar: SOLO_ADMIN },
        propietario: Some("empleado_id"),
        ocultos: &[],
    },
    Recurso {
        nombre: "normativas",
        tabla: "normativas",
        campos: &[
            Campo::plano("nombre", true),
            Campo::plano("descripcion", false),
            Campo::plano("fecha_vigencia", false),
            Campo::enumerado("ambito", false, AMBITOS),
        ],
        vistas: &[],
        dependientes: &[],
        permisos: Permisos::gestion(),
        propietario: None,
        ocultos: &[],
    },
];

/// Look up a resource by its URL name.
pub fn buscar(nombre: &str) -> Option<&'static Recurso> {
    RECURSOS.iter().find(|r| r.nombre == nombre)
}
