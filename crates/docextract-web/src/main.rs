use clap::Parser;

use docextract_web::{ServeArgs, ServerConfig};

/// Document text extraction service (PDF, DOC/DOCX, images with OCR)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    docextract_web::init_tracing("info,tower_http=debug");

    let cli = Cli::parse();
    let config = ServerConfig::load(&cli.serve)?;
    tracing::debug!(?config, "resolved configuration");

    docextract_web::serve(config).await
}
