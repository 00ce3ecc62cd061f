//! Table definitions, applied idempotently at startup.
//!
//! Surrogate integer keys, scalar attributes, and plain REFERENCES between
//! entities. Enum-like string columns (rol, tipo, estado) are validated at
//! the API boundary, not by the storage layer.

/// Statements are ordered so referenced tables exist before their referrers.
pub const TABLAS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS empleados (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        apellido TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        puesto TEXT,
        area TEXT,
        fecha_ingreso DATE,
        salario NUMERIC(12,2),
        activo BOOLEAN NOT NULL DEFAULT TRUE,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS usuarios (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        rol TEXT NOT NULL,
        empleado_id BIGINT REFERENCES empleados(id),
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS sesiones (
        id UUID PRIMARY KEY,
        usuario_id BIGINT NOT NULL REFERENCES usuarios(id) ON DELETE CASCADE,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now(),
        expira_en TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS clientes (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        email TEXT NOT NULL,
        tipo TEXT NOT NULL,
        telefono TEXT,
        direccion TEXT,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS materiales (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        descripcion TEXT,
        unidad TEXT NOT NULL,
        costo_unitario NUMERIC(12,2),
        proveedor TEXT,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS productos (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        descripcion TEXT,
        precio NUMERIC(12,2) NOT NULL,
        categoria TEXT,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS maquinas (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        modelo TEXT,
        area TEXT,
        fecha_compra DATE,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS inventario (
        id BIGSERIAL PRIMARY KEY,
        material_id BIGINT NOT NULL REFERENCES materiales(id),
        cantidad NUMERIC(12,2) NOT NULL,
        ubicacion TEXT,
        fecha_actualizacion DATE,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS ventas (
        id BIGSERIAL PRIMARY KEY,
        cliente_id BIGINT NOT NULL REFERENCES clientes(id),
        fecha DATE NOT NULL,
        total NUMERIC(12,2),
        estado TEXT,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS detalle_ventas (
        id BIGSERIAL PRIMARY KEY,
        venta_id BIGINT NOT NULL REFERENCES ventas(id) ON DELETE CASCADE,
        producto_id BIGINT NOT NULL REFERENCES productos(id),
        cantidad NUMERIC(12,2) NOT NULL,
        precio_unitario NUMERIC(12,2) NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS ordenes_produccion (
        id BIGSERIAL PRIMARY KEY,
        producto_id BIGINT NOT NULL REFERENCES productos(id),
        cantidad NUMERIC(12,2) NOT NULL,
        fecha_inicio DATE NOT NULL,
        fecha_fin DATE,
        estado TEXT,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS mantenimientos (
        id BIGSERIAL PRIMARY KEY,
        maquina_id BIGINT NOT NULL REFERENCES maquinas(id),
        empleado_id BIGINT NOT NULL REFERENCES empleados(id),
        fecha DATE NOT NULL,
        tipo TEXT,
        descripcion TEXT,
        costo NUMERIC(12,2),
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS asistencias (
        id BIGSERIAL PRIMARY KEY,
        empleado_id BIGINT NOT NULL REFERENCES empleados(id),
        fecha DATE NOT NULL,
        hora_entrada TIME,
        hora_salida TIME,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS nominas (
        id BIGSERIAL PRIMARY KEY,
        empleado_id BIGINT NOT NULL REFERENCES empleados(id),
        mes DATE NOT NULL,
        salario_base NUMERIC(12,2) NOT NULL,
        bonos NUMERIC(12,2),
        deducciones NUMERIC(12,2),
        salario_neto NUMERIC(12,2),
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS incidencias (
        id BIGSERIAL PRIMARY KEY,
        empleado_id BIGINT REFERENCES empleados(id),
        fecha DATE NOT NULL,
        tipo TEXT NOT NULL,
        descripcion TEXT NOT NULL,
        estado TEXT,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS normativas (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        descripcion TEXT,
        fecha_vigencia DATE,
        ambito TEXT,
        creado_en TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];
