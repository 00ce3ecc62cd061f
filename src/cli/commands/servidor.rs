use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::{load_servidor_config, save_servidor_config, ServidorConfig};
use crate::cli::OutputFormat;

use super::imprimir;

#[derive(Subcommand)]
pub enum ServidorCommands {
    #[command(about = "Fijar la URL del servidor")]
    Set {
        #[arg(help = "URL base, por ejemplo http://localhost:3000")]
        url: String,
    },

    #[command(about = "Mostrar la configuracion actual")]
    Mostrar,

    #[command(about = "Verificar que el servidor responde")]
    Ping,
}

pub async fn handle(cmd: ServidorCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServidorCommands::Set { url } => {
            let config = ServidorConfig { base_url: url, added_at: Utc::now() };
            save_servidor_config(&config)?;
            imprimir(
                &json!({ "base_url": config.base_url }),
                &output_format,
                "Servidor configurado",
            );
        }
        ServidorCommands::Mostrar => {
            let config = load_servidor_config()?;
            imprimir(&serde_json::to_value(&config)?, &output_format, "Servidor");
        }
        ServidorCommands::Ping => {
            let client = ApiClient::nuevo()?;
            let cuerpo = client.salud().await?;
            imprimir(&cuerpo, &output_format, &format!("Servidor {} responde", client.base_url()));
        }
    }

    Ok(())
}
