pub mod consultas;
pub mod defs;

pub use defs::{buscar, Campo, Dependiente, Permisos, Recurso, Vista, RECURSOS};
