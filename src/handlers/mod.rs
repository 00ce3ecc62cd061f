pub mod auth;
pub mod dashboard;
pub mod recursos;
pub mod usuarios;
pub mod ventas;
