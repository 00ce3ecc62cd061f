use std::io::Read;

use anyhow::Context;
use clap::Subcommand;
use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::OutputFormat;

use super::imprimir;

#[derive(Subcommand)]
pub enum RecursoCommands {
    #[command(about = "Listar todas las filas de un recurso")]
    Listar {
        #[arg(help = "Nombre del recurso (clientes, empleados, ventas, ...)")]
        recurso: String,
    },

    #[command(about = "Obtener una fila por id")]
    Obtener {
        #[arg(help = "Nombre del recurso")]
        recurso: String,
        #[arg(help = "Id de la fila")]
        id: i64,
    },

    #[command(about = "Crear una fila (JSON como argumento o por stdin)")]
    Crear {
        #[arg(help = "Nombre del recurso")]
        recurso: String,
        #[arg(help = "Payload JSON; si se omite se lee de stdin")]
        datos: Option<String>,
    },

    #[command(about = "Actualizar una fila; los campos omitidos no cambian")]
    Actualizar {
        #[arg(help = "Nombre del recurso")]
        recurso: String,
        #[arg(help = "Id de la fila")]
        id: i64,
        #[arg(help = "Payload JSON; si se omite se lee de stdin")]
        datos: Option<String>,
    },

    #[command(about = "Eliminar una fila por id")]
    Eliminar {
        #[arg(help = "Nombre del recurso")]
        recurso: String,
        #[arg(help = "Id de la fila")]
        id: i64,
    },
}

pub async fn handle(cmd: RecursoCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::nuevo()?;

    match cmd {
        RecursoCommands::Listar { recurso } => {
            let cuerpo = client.listar(&recurso).await?;
            let cuantos = cuerpo.as_array().map(Vec::len).unwrap_or(0);
            imprimir(&cuerpo, &output_format, &format!("{} filas en {}", cuantos, recurso));
        }
        RecursoCommands::Obtener { recurso, id } => {
            let cuerpo = client.obtener(&recurso, id).await?;
            imprimir(&cuerpo, &output_format, &format!("{}/{}", recurso, id));
        }
        RecursoCommands::Crear { recurso, datos } => {
            let payload = leer_payload(datos)?;
            let cuerpo = client.crear(&recurso, &payload).await?;
            imprimir(&cuerpo, &output_format, &format!("Creado en {}", recurso));
        }
        RecursoCommands::Actualizar { recurso, id, datos } => {
            let payload = leer_payload(datos)?;
            let cuerpo = client.actualizar(&recurso, id, &payload).await?;
            imprimir(&cuerpo, &output_format, &format!("Actualizado {}/{}", recurso, id));
        }
        RecursoCommands::Eliminar { recurso, id } => {
            let cuerpo = client.eliminar(&recurso, id).await?;
            imprimir(&cuerpo, &output_format, &format!("Eliminado {}/{}", recurso, id));
        }
    }

    Ok(())
}

fn leer_payload(datos: Option<String>) -> anyhow::Result<Value> {
    let crudo = match datos {
        Some(s) => s,
        None => {
            let mut s = String::new();
            std::io::stdin().read_to_string(&mut s)?;
            s
        }
    };
    serde_json::from_str(&crudo).context("payload JSON invalido")
}
