use crate::cli::client::ApiClient;
use crate::cli::OutputFormat;

use super::imprimir;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::nuevo()?;
    let cuerpo = client.dashboard().await?;
    imprimir(&cuerpo, &output_format, "Resumen de ventas y produccion");
    Ok(())
}
