// Batch conversion of Zefania XML documents into flat CSV record files.
//
// One working directory in, one `csv/` subdirectory out: every `.xml`
// document directly inside the working directory is converted to a
// same-named `.csv` record file, and the original is copied alongside it
// for archival. Documents are processed strictly one at a time; errors
// are contained per document and collected into a batch report.

use anyhow::{Context, Result};
use scriptorium_model::{BatchReport, ConvertError, DocumentReport, DocumentStatus};
use std::fs;
use std::path::Path;

pub mod records;
pub mod xml;

/// Extension of input documents (exact match, as the discovery step does
/// not case-fold).
pub const DOCUMENT_EXT: &str = "xml";
/// Extension of flat record output files.
pub const RECORD_EXT: &str = "csv";
/// Output subdirectory created inside the working directory.
pub const OUTPUT_SUBDIR: &str = "csv";

/// Convert one document to a flat record file.
///
/// The document is fully parsed before any output is written, so a
/// malformed document leaves no output file behind. Returns the number
/// of verse records written.
pub fn convert_document(input: &Path, output: &Path) -> Result<usize, ConvertError> {
    let text = match fs::read_to_string(input) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConvertError::NotFound(input.to_path_buf()));
        }
        Err(e) => return Err(ConvertError::Io(e)),
    };

    let doc = xml::parse_document(&text)?;
    records::write_records(&doc, output)
}

/// Run the converter over every document in `working_dir`.
///
/// Discovers `.xml` files directly inside the working directory (no
/// recursion into subdirectories, filesystem order), ensures the `csv/`
/// output subdirectory exists, and processes the documents sequentially.
/// A failure on one document never aborts the batch; each outcome lands
/// in the returned [`BatchReport`].
pub fn run(working_dir: &Path) -> Result<BatchReport> {
    let out_dir = working_dir.join(OUTPUT_SUBDIR);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let entries = fs::read_dir(working_dir)
        .with_context(|| format!("Failed to read working directory {}", working_dir.display()))?;

    let mut report = BatchReport::default();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to list {}", working_dir.display()))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXT) {
            continue;
        }
        report.push(process_document(&path, &out_dir));
    }

    tracing::info!(
        documents = report.documents.len(),
        converted = report.converted(),
        failed = report.failed(),
        "Batch complete"
    );
    Ok(report)
}

/// Convert one discovered document and archive the original, yielding the
/// per-document report entry.
fn process_document(input: &Path, out_dir: &Path) -> DocumentReport {
    let output = out_dir
        .join(input.file_name().unwrap_or_default())
        .with_extension(RECORD_EXT);

    let outcome = convert_document(input, &output);

    // The original is mirrored into the output directory whenever it
    // exists, whether or not its conversion succeeded.
    let archived = match &outcome {
        Err(ConvertError::NotFound(_)) => Ok(()),
        _ => archive_copy(input, out_dir),
    };

    match (outcome, archived) {
        (Ok(verses), Ok(())) => {
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                verses,
                "Converted document"
            );
            DocumentReport {
                input: input.to_path_buf(),
                output: Some(output),
                status: DocumentStatus::Converted { verses },
            }
        }
        (Ok(_), Err(e)) => {
            tracing::warn!(input = %input.display(), error = %e, "Failed to archive original");
            DocumentReport {
                input: input.to_path_buf(),
                output: Some(output),
                status: DocumentStatus::failed(&e),
            }
        }
        (Err(e), _) => {
            tracing::warn!(input = %input.display(), error = %e, "Skipping document");
            DocumentReport {
                input: input.to_path_buf(),
                output: None,
                status: DocumentStatus::failed(&e),
            }
        }
    }
}

/// Copy `input` into `out_dir`, carrying the source timestamps onto the
/// copy.
fn archive_copy(input: &Path, out_dir: &Path) -> Result<(), ConvertError> {
    let dest = out_dir.join(input.file_name().unwrap_or_default());
    let metadata = fs::metadata(input)?;
    fs::copy(input, &dest)?;

    let mut times = fs::FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    let dest_file = fs::OpenOptions::new().write(true).open(&dest)?;
    dest_file.set_times(times)?;

    Ok(())
}
