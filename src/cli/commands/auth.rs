use clap::Subcommand;

use crate::cli::client::ApiClient;
use crate::cli::OutputFormat;

use super::imprimir;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Iniciar sesion y guardar la cookie localmente")]
    Login {
        #[arg(help = "Email de la cuenta")]
        email: String,
        #[arg(help = "Password de la cuenta")]
        password: String,
    },

    #[command(about = "Cerrar la sesion activa")]
    Logout,

    #[command(about = "Mostrar la identidad de la sesion activa")]
    Yo,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut client = ApiClient::nuevo()?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let cuerpo = client.login(&email, &password).await?;
            imprimir(&cuerpo, &output_format, &format!("Sesion iniciada como {}", email));
        }
        AuthCommands::Logout => {
            let cuerpo = client.logout().await?;
            imprimir(&cuerpo, &output_format, "Sesion cerrada");
        }
        AuthCommands::Yo => {
            let cuerpo = client.yo().await?;
            imprimir(&cuerpo, &output_format, "Sesion activa");
        }
    }

    Ok(())
}
