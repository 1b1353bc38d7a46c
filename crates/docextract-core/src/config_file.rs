use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ExtractorSettings, OcrSettings, PdfPolicy, Strictness};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerSection>,
    pub extraction: Option<ExtractionSection>,
    pub ocr: Option<OcrSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSection {
    pub strictness: Option<Strictness>,
    pub pdf_policy: Option<PdfPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSection {
    pub languages: Option<String>,
    pub dpi: Option<u32>,
    pub tessdata_dir: Option<String>,
}

impl ConfigFile {
    /// Extraction settings from the file, with defaults for anything unset.
    pub fn extractor_settings(&self) -> ExtractorSettings {
        let defaults = OcrSettings::default();
        let extraction = self.extraction.clone().unwrap_or_default();
        let ocr = self.ocr.clone().unwrap_or_default();

        ExtractorSettings {
            strictness: extraction.strictness.unwrap_or_default(),
            pdf_policy: extraction.pdf_policy.unwrap_or_default(),
            ocr: OcrSettings {
                languages: ocr.languages.unwrap_or(defaults.languages),
                dpi: ocr.dpi.unwrap_or(defaults.dpi),
                tessdata_dir: ocr.tessdata_dir.map(PathBuf::from),
            },
        }
    }
}

/// Platform config directory path: `<config_dir>/docextract/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("docextract").join("config.toml"))
}

/// Load config by cascading CWD `.docextract.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".docextract.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_server = base.server.unwrap_or_default();
    let base_extraction = base.extraction.unwrap_or_default();
    let base_ocr = base.ocr.unwrap_or_default();
    let server = overlay.server.unwrap_or_default();
    let extraction = overlay.extraction.unwrap_or_default();
    let ocr = overlay.ocr.unwrap_or_default();

    ConfigFile {
        server: Some(ServerSection {
            host: server.host.or(base_server.host),
            port: server.port.or(base_server.port),
            max_upload_mb: server.max_upload_mb.or(base_server.max_upload_mb),
        }),
        extraction: Some(ExtractionSection {
            strictness: extraction.strictness.or(base_extraction.strictness),
            pdf_policy: extraction.pdf_policy.or(base_extraction.pdf_policy),
        }),
        ocr: Some(OcrSection {
            languages: ocr.languages.or(base_ocr.languages),
            dpi: ocr.dpi.or(base_ocr.dpi),
            tessdata_dir: ocr.tessdata_dir.or(base_ocr.tessdata_dir),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_parses() {
        let toml_str = "[ocr]\nlanguages = \"eng\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.ocr.unwrap().languages.as_deref(), Some("eng"));
        assert!(parsed.server.is_none());
    }

    #[test]
    fn enums_use_lowercase_names() {
        let toml_str = "[extraction]\nstrictness = \"strict\"\npdf_policy = \"basic\"\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let extraction = parsed.extraction.unwrap();
        assert_eq!(extraction.strictness, Some(Strictness::Strict));
        assert_eq!(extraction.pdf_policy, Some(PdfPolicy::Basic));

        let parsed: ConfigFile =
            toml::from_str("[extraction]\npdf_policy = \"fallback\"\n").unwrap();
        assert_eq!(
            parsed.extraction.unwrap().pdf_policy,
            Some(PdfPolicy::FallbackAware)
        );
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            server: Some(ServerSection {
                port: Some(9000),
                host: Some("127.0.0.1".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerSection {
                port: Some(9100),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let server = merged.server.unwrap();
        assert_eq!(server.port, Some(9100));
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            ocr: Some(OcrSection {
                dpi: Some(150),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.ocr.unwrap().dpi, Some(150));
    }

    #[test]
    fn settings_fill_defaults() {
        let config = ConfigFile {
            ocr: Some(OcrSection {
                tessdata_dir: Some("/usr/share/tessdata".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = config.extractor_settings();
        assert_eq!(settings.strictness, Strictness::Permissive);
        assert_eq!(settings.pdf_policy, PdfPolicy::FallbackAware);
        assert_eq!(settings.ocr.languages, "fra+eng");
        assert_eq!(settings.ocr.dpi, 300);
        assert_eq!(
            settings.ocr.tessdata_dir,
            Some(PathBuf::from("/usr/share/tessdata"))
        );
    }

    #[test]
    fn load_from_path_reads_file_and_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[server]\nport = 8080\n").unwrap();
        let loaded = load_from_path(&good).unwrap();
        assert_eq!(loaded.server.unwrap().port, Some(8080));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[server\nport = ").unwrap();
        assert!(load_from_path(&bad).is_none());

        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}
