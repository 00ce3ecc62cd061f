pub mod client;
pub mod commands;
pub mod config;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "planta")]
#[command(about = "Planta CLI - cliente de linea de comandos para el ERP de manufactura")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Salida en texto legible")]
    pub text: bool,

    #[arg(long, global = true, help = "Salida en formato JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Configuracion del servidor remoto")]
    Servidor {
        #[command(subcommand)]
        cmd: commands::servidor::ServidorCommands,
    },

    #[command(about = "Inicio y cierre de sesion")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Operaciones CRUD sobre los recursos del ERP")]
    Recurso {
        #[command(subcommand)]
        cmd: commands::recursos::RecursoCommands,
    },

    #[command(about = "Resumen de ventas y produccion")]
    Dashboard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Servidor { cmd } => commands::servidor::handle(cmd, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Recurso { cmd } => commands::recursos::handle(cmd, output_format).await,
        Commands::Dashboard => commands::dashboard::handle(output_format).await,
    }
}
