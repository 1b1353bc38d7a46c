use std::path::PathBuf;

use clap::Args;
use thiserror::Error;

use docextract_core::config_file::{self, ConfigFile};
use docextract_core::{ExtractorSettings, PdfPolicy, Strictness};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 50;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config file {0} could not be read or parsed")]
    UnreadableFile(PathBuf),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Command-line / environment overrides for the service.
///
/// Resolution order: these values, then the config file, then defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "DOCEXTRACT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "DOCEXTRACT_PORT")]
    pub port: Option<u16>,

    /// Maximum request body size, in MiB
    #[arg(long, env = "DOCEXTRACT_MAX_UPLOAD_MB")]
    pub max_upload_mb: Option<u64>,

    /// Accepted PDF labels: "strict" or "permissive"
    #[arg(long, env = "DOCEXTRACT_STRICTNESS")]
    pub strictness: Option<Strictness>,

    /// PDF handling: "basic" or "fallback-aware"
    #[arg(long, env = "DOCEXTRACT_PDF_POLICY")]
    pub pdf_policy: Option<PdfPolicy>,

    /// Tesseract languages, e.g. "fra+eng"
    #[arg(long, env = "DOCEXTRACT_OCR_LANGUAGES")]
    pub ocr_languages: Option<String>,

    /// Rendering resolution for OCR of PDF pages
    #[arg(long, env = "DOCEXTRACT_OCR_DPI")]
    pub ocr_dpi: Option<u32>,

    /// Directory containing Tesseract traineddata files
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_dir: Option<PathBuf>,

    /// Read this TOML file instead of the default config locations
    #[arg(long, env = "DOCEXTRACT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Process-wide service configuration, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub extractor: ExtractorSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: mib_to_bytes(DEFAULT_MAX_UPLOAD_MB),
            extractor: ExtractorSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load the config file named by `args.config` (or the default cascade)
    /// and apply `args` on top.
    pub fn load(args: &ServeArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => config_file::load_from_path(path)
                .ok_or_else(|| ConfigError::UnreadableFile(path.clone()))?,
            None => config_file::load_config(),
        };
        Self::resolve(&file, args)
    }

    /// Combine a parsed config file with overrides. Pure; no I/O.
    pub fn resolve(file: &ConfigFile, args: &ServeArgs) -> Result<Self, ConfigError> {
        let server = file.server.clone().unwrap_or_default();
        let mut extractor = file.extractor_settings();

        if let Some(strictness) = args.strictness {
            extractor.strictness = strictness;
        }
        if let Some(policy) = args.pdf_policy {
            extractor.pdf_policy = policy;
        }
        if let Some(languages) = &args.ocr_languages {
            extractor.ocr.languages = languages.clone();
        }
        if let Some(dpi) = args.ocr_dpi {
            extractor.ocr.dpi = dpi;
        }
        if let Some(dir) = &args.tessdata_dir {
            extractor.ocr.tessdata_dir = Some(dir.clone());
        }

        let max_upload_mb = args
            .max_upload_mb
            .or(server.max_upload_mb)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        let config = Self {
            host: args
                .host
                .clone()
                .or(server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(server.port).unwrap_or(DEFAULT_PORT),
            max_upload_bytes: mib_to_bytes(max_upload_mb),
            extractor,
        };
        config.validate(max_upload_mb)?;
        Ok(config)
    }

    fn validate(&self, max_upload_mb: u64) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "host",
                reason: "must not be empty".into(),
            });
        }
        if max_upload_mb == 0 {
            return Err(ConfigError::Invalid {
                field: "max_upload_mb",
                reason: "must be at least 1".into(),
            });
        }
        if self.extractor.ocr.dpi == 0 {
            return Err(ConfigError::Invalid {
                field: "ocr dpi",
                reason: "must be at least 1".into(),
            });
        }
        if self.extractor.ocr.languages.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "ocr languages",
                reason: "must name at least one language".into(),
            });
        }
        Ok(())
    }
}

fn mib_to_bytes(mib: u64) -> usize {
    usize::try_from(mib.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docextract_core::config_file::{ExtractionSection, OcrSection, ServerSection};

    #[test]
    fn defaults_without_file_or_args() {
        let config = ServerConfig::resolve(&ConfigFile::default(), &ServeArgs::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8001);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn args_override_file() {
        let file = ConfigFile {
            server: Some(ServerSection {
                host: Some("127.0.0.1".into()),
                port: Some(9000),
                max_upload_mb: Some(10),
            }),
            extraction: Some(ExtractionSection {
                strictness: Some(Strictness::Strict),
                pdf_policy: Some(PdfPolicy::Basic),
            }),
            ocr: Some(OcrSection {
                languages: Some("eng".into()),
                dpi: Some(200),
                tessdata_dir: None,
            }),
        };
        let args = ServeArgs {
            port: Some(9100),
            pdf_policy: Some(PdfPolicy::FallbackAware),
            ocr_languages: Some("deu+eng".into()),
            ..Default::default()
        };

        let config = ServerConfig::resolve(&file, &args).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9100);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.extractor.strictness, Strictness::Strict);
        assert_eq!(config.extractor.pdf_policy, PdfPolicy::FallbackAware);
        assert_eq!(config.extractor.ocr.languages, "deu+eng");
        assert_eq!(config.extractor.ocr.dpi, 200);
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let args = ServeArgs {
            ocr_dpi: Some(0),
            ..Default::default()
        };
        let err = ServerConfig::resolve(&ConfigFile::default(), &args).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ocr dpi", .. }));
    }

    #[test]
    fn zero_upload_limit_is_rejected() {
        let args = ServeArgs {
            max_upload_mb: Some(0),
            ..Default::default()
        };
        assert!(ServerConfig::resolve(&ConfigFile::default(), &args).is_err());
    }

    #[test]
    fn blank_languages_are_rejected() {
        let args = ServeArgs {
            ocr_languages: Some("  ".into()),
            ..Default::default()
        };
        assert!(ServerConfig::resolve(&ConfigFile::default(), &args).is_err());
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let args = ServeArgs {
            config: Some(missing.clone()),
            ..Default::default()
        };
        assert_eq!(
            ServerConfig::load(&args).unwrap_err(),
            ConfigError::UnreadableFile(missing)
        );
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docextract.toml");
        std::fs::write(&path, "[server]\nport = 8123\n[ocr]\ndpi = 150\n").unwrap();
        let args = ServeArgs {
            config: Some(path),
            ..Default::default()
        };
        let config = ServerConfig::load(&args).unwrap();
        assert_eq!(config.port, 8123);
        assert_eq!(config.extractor.ocr.dpi, 150);
    }
}
