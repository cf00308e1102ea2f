//! File I/O for flat xform lists
//!
//! A genome is stored as a small JSON document:
//!
//! ```json
//! { "version": "1.0.0", "final_xform": false, "xforms": [ ... ] }
//! ```
//!
//! Saving an existing file first copies it to `<name>.backup`.

use crate::genome::{Genome, XForm};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File format version
pub const XFORM_FILE_VERSION: &str = "1.0.0";

/// On-disk form of a genome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XformFile {
    /// File format version
    pub version: String,

    /// Whether the last record is the final xform
    #[serde(default)]
    pub final_xform: bool,

    pub xforms: Vec<XForm>,
}

impl XformFile {
    pub fn from_genome(genome: &Genome) -> Self {
        Self {
            version: XFORM_FILE_VERSION.to_string(),
            final_xform: genome.final_xform_enabled(),
            xforms: genome.xforms().to_vec(),
        }
    }

    pub fn into_genome(self) -> Genome {
        Genome::from_xforms(self.xforms, self.final_xform)
    }
}

#[derive(Debug, Error)]
pub enum FlameFileError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid xform file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported file version: {found} (expected {expected})")]
    UnsupportedVersion { found: String, expected: &'static str },
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Parse a genome from JSON text
///
/// Files with a different major version are rejected. An empty xform list
/// is accepted; the editor inserts a default record on reset.
pub fn genome_from_str(text: &str) -> Result<Genome, FlameFileError> {
    let file: XformFile = serde_json::from_str(text)?;
    if major(&file.version) != major(XFORM_FILE_VERSION) {
        return Err(FlameFileError::UnsupportedVersion {
            found: file.version,
            expected: XFORM_FILE_VERSION,
        });
    }
    Ok(file.into_genome())
}

pub fn genome_to_string(genome: &Genome) -> Result<String, FlameFileError> {
    Ok(serde_json::to_string_pretty(&XformFile::from_genome(genome))?)
}

/// Load a genome from a file
pub fn load_genome(path: &Path) -> Result<Genome, FlameFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| FlameFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let genome = genome_from_str(&text)?;
    log::info!(
        "Loaded {} xforms from {}",
        genome.num_xforms(),
        path.display()
    );
    Ok(genome)
}

/// Save a genome to a file, backing up any previous version
pub fn save_genome(path: &Path, genome: &Genome) -> Result<(), FlameFileError> {
    let io_err = |source| FlameFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        let backup = backup_path(path);
        std::fs::copy(path, &backup).map_err(io_err)?;
        log::debug!("Backed up {} to {}", path.display(), backup.display());
    }

    let text = genome_to_string(genome)?;
    std::fs::write(path, text).map_err(io_err)?;
    log::info!("Saved {} xforms to {}", genome.num_xforms(), path.display());
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_file() {
        let text = r#"{
            "version": "1.0.0",
            "xforms": [
                { "coefs": [[0.5, 0.0], [0.0, 0.5], [0.25, 0.0]],
                  "post": [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
                  "density": 0.5, "color": 0.0,
                  "variations": { "linear": 1.0 } }
            ]
        }"#;
        let genome = genome_from_str(text).unwrap();
        assert_eq!(genome.num_xforms(), 1);
        assert!(!genome.final_xform_enabled());
        assert_eq!(genome.xforms()[0].coefs[2], [0.25, 0.0]);
    }

    #[test]
    fn test_final_flag_round_trip() {
        let mut genome = Genome::with_default_xforms(2);
        genome.add_xforms(1, true);
        let text = genome_to_string(&genome).unwrap();
        let back = genome_from_str(&text).unwrap();
        assert_eq!(back, genome);
        assert!(back.is_final(2));
    }

    #[test]
    fn test_rejects_other_major_version() {
        let text = r#"{ "version": "2.0.0", "xforms": [] }"#;
        let err = genome_from_str(text).unwrap_err();
        assert!(matches!(err, FlameFileError::UnsupportedVersion { .. }));
        assert!(err.to_string().contains("2.0.0"));
    }

    #[test]
    fn test_accepts_minor_version_and_empty_list() {
        let genome = genome_from_str(r#"{ "version": "1.3", "xforms": [] }"#).unwrap();
        assert!(genome.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(genome_from_str("{"), Err(FlameFileError::Json(_))));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/tmp/flame.json")),
            PathBuf::from("/tmp/flame.json.backup")
        );
    }
}
