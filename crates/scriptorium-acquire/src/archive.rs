use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// What happened to the archives in one extraction pass.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Final (renamed) paths of successfully extracted archives.
    pub extracted: Vec<PathBuf>,
    /// Archives that failed to open or extract.
    pub skipped: Vec<PathBuf>,
}

/// Unzip every `.zip` directly inside `dir` into `dir`, then rename each
/// archive to its percent-decoded name.
///
/// Archive names arrive URL-encoded from the download step (e.g.
/// `SF_Luther%201912.zip`); after extraction the archive itself is
/// renamed to the decoded form. Invalid archives are logged and skipped
/// and the pass continues with the remaining files.
pub fn extract_archives(dir: &Path) -> Result<ExtractReport> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    // Collect before extracting: renames must not perturb the listing.
    let mut archives: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("zip") {
            archives.push(path);
        }
    }

    let mut report = ExtractReport::default();
    for path in archives {
        match extract_one(&path, dir) {
            Ok(renamed) => {
                tracing::info!(archive = %renamed.display(), "Extracted archive");
                report.extracted.push(renamed);
            }
            Err(e) => {
                tracing::warn!(archive = %path.display(), error = %e, "Skipping archive");
                report.skipped.push(path);
            }
        }
    }

    tracing::info!(
        extracted = report.extracted.len(),
        skipped = report.skipped.len(),
        "Extraction pass complete"
    );
    Ok(report)
}

/// Extract one archive into `dir`, then rename it to its decoded name.
fn extract_one(path: &Path, dir: &Path) -> Result<PathBuf> {
    {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).context("Not a valid zip archive")?;
        archive.extract(dir).context("Failed to extract archive")?;
    }

    let target = dir.join(decoded_archive_name(path)?);
    if target != path {
        fs::rename(path, &target)
            .with_context(|| format!("Failed to rename to {}", target.display()))?;
    }
    Ok(target)
}

/// Percent-decode an archive's basename, keeping the `.zip` extension.
fn decoded_archive_name(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Archive name is not valid UTF-8: {}", path.display()))?;
    let base = name.strip_suffix(".zip").unwrap_or(name);

    let decoded = percent_decode_str(base)
        .decode_utf8()
        .with_context(|| format!("Decoded archive name is not valid UTF-8: {name}"))?;

    Ok(format!("{decoded}.zip"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, inner_name: &str, contents: &[u8]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(inner_name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_and_rename() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("SF_Luther%201912.zip");
        write_zip(&archive, "luther.xml", b"<XMLBIBLE></XMLBIBLE>");

        let report = extract_archives(dir.path()).unwrap();
        assert_eq!(report.extracted.len(), 1);
        assert!(report.skipped.is_empty());

        // Inner file landed in the directory; the archive now carries its
        // decoded name.
        assert!(dir.path().join("luther.xml").is_file());
        assert!(dir.path().join("SF_Luther 1912.zip").is_file());
        assert!(!archive.exists());
    }

    #[test]
    fn test_plain_name_not_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("SF_KJV.zip");
        write_zip(&archive, "kjv.xml", b"<XMLBIBLE></XMLBIBLE>");

        let report = extract_archives(dir.path()).unwrap();
        assert_eq!(report.extracted, vec![archive.clone()]);
        assert!(archive.is_file());
        assert!(dir.path().join("kjv.xml").is_file());
    }

    #[test]
    fn test_invalid_archive_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.zip"), b"this is not a zip file").unwrap();
        let good = dir.path().join("good.zip");
        write_zip(&good, "good.xml", b"<XMLBIBLE></XMLBIBLE>");

        let report = extract_archives(dir.path()).unwrap();
        assert_eq!(report.extracted.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(dir.path().join("good.xml").is_file());
        assert!(dir.path().join("broken.zip").is_file());
    }

    #[test]
    fn test_decoded_archive_name() {
        let name =
            decoded_archive_name(Path::new("SF_Luther%20Bibel%20%281912%29.zip")).unwrap();
        assert_eq!(name, "SF_Luther Bibel (1912).zip");
    }
}
