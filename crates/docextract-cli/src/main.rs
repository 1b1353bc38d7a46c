use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use docextract_core::config_file;
use docextract_core::{ExtractorSettings, PdfPolicy, Strictness};
use docextract_web::{ServeArgs, ServerConfig};

mod detect;
mod output;

use output::ColorMode;

/// Document text extraction - PDF, DOC/DOCX and images, with OCR fallback
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text from a local file and print it to stdout
    Extract(ExtractArgs),

    /// Run the HTTP extraction service
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Path to the PDF, DOC/DOCX or image file
    file_path: PathBuf,

    /// Declared media type (default: guessed from the extension)
    #[arg(long)]
    media_type: Option<String>,

    /// Accepted PDF labels: "strict" or "permissive"
    #[arg(long, env = "DOCEXTRACT_STRICTNESS")]
    strictness: Option<Strictness>,

    /// Shorthand for --strictness strict
    #[arg(long, conflicts_with = "strictness")]
    strict: bool,

    /// PDF handling: "basic" or "fallback-aware"
    #[arg(long, env = "DOCEXTRACT_PDF_POLICY")]
    pdf_policy: Option<PdfPolicy>,

    /// Shorthand for --pdf-policy basic
    #[arg(long, conflicts_with = "pdf_policy")]
    basic_pdf: bool,

    /// Tesseract languages, e.g. "fra+eng"
    #[arg(long, env = "DOCEXTRACT_OCR_LANGUAGES")]
    lang: Option<String>,

    /// Rendering resolution for OCR of PDF pages
    #[arg(long, env = "DOCEXTRACT_OCR_DPI")]
    dpi: Option<u32>,

    /// Directory containing Tesseract traineddata files
    #[arg(long, env = "TESSDATA_PREFIX")]
    tessdata_dir: Option<PathBuf>,

    /// Print the HTTP-style JSON body instead of raw text
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl ExtractArgs {
    /// Layer flags and environment over the config-file settings.
    fn settings(&self, mut settings: ExtractorSettings) -> ExtractorSettings {
        if let Some(strictness) = self.strictness {
            settings.strictness = strictness;
        }
        if self.strict {
            settings.strictness = Strictness::Strict;
        }
        if let Some(policy) = self.pdf_policy {
            settings.pdf_policy = policy;
        }
        if self.basic_pdf {
            settings.pdf_policy = PdfPolicy::Basic;
        }
        if let Some(lang) = &self.lang {
            settings.ocr.languages = lang.clone();
        }
        if let Some(dpi) = self.dpi {
            settings.ocr.dpi = dpi;
        }
        if let Some(dir) = &self.tessdata_dir {
            settings.ocr.tessdata_dir = Some(dir.clone());
        }
        settings
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    docextract_web::init_tracing("warn");
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let config = ServerConfig::load(&args)?;
            docextract_web::serve(config).await
        }
        Command::Extract(args) => {
            let settings = args.settings(config_file::load_config().extractor_settings());
            let color = ColorMode(!args.no_color);
            let ok = extract(args.file_path, args.media_type, settings, args.json, color).await?;
            if !ok {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Returns `Ok(false)` when extraction itself failed (already reported).
async fn extract(
    file_path: PathBuf,
    media_type: Option<String>,
    settings: ExtractorSettings,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<bool> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    if settings.ocr.dpi == 0 {
        anyhow::bail!("--dpi must be at least 1");
    }

    let media_type =
        media_type.unwrap_or_else(|| detect::guess_media_type(&file_path).to_string());
    let data = std::fs::read(&file_path)?;
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    tracing::debug!(file = %file_name, %media_type, bytes = data.len(), "extracting");

    let extractor = docextract_ingest::build_extractor(&settings);
    let declared = media_type.clone();
    let result = tokio::task::spawn_blocking(move || extractor.extract(&data, &declared))
        .await
        .map_err(|e| anyhow::anyhow!("Extraction task failed: {}", e))?;

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();

    if json {
        writeln!(stdout, "{}", output::json_body(&result))?;
        return Ok(result.is_ok());
    }

    match result {
        Ok(text) => {
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            output::print_summary(
                &mut stderr,
                &file_name,
                &media_type,
                text.chars().count(),
                color,
            )?;
            Ok(true)
        }
        Err(e) => {
            output::print_failure(&mut stderr, &e, color)?;
            Ok(false)
        }
    }
}
