pub mod auth;
pub mod dashboard;
pub mod recursos;
pub mod servidor;

use serde_json::Value;

use crate::cli::OutputFormat;

/// Shared output path: raw JSON for machines, a titled pretty print for
/// humans.
pub(crate) fn imprimir(valor: &Value, formato: &OutputFormat, titulo: &str) {
    match formato {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(valor).unwrap_or_default());
        }
        OutputFormat::Text => {
            if !titulo.is_empty() {
                println!("{}", titulo);
            }
            println!("{}", serde_json::to_string_pretty(valor).unwrap_or_default());
        }
    }
}
