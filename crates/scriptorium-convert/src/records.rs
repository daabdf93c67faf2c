use scriptorium_model::{BibleDocument, ConvertError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the flat record file for a parsed document.
///
/// One line per verse in the form `book,chapter,verse,"text"`, newline
/// terminated, no header row. An existing file at `path` is overwritten.
/// Returns the number of records written.
pub fn write_records(doc: &BibleDocument, path: &Path) -> Result<usize, ConvertError> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    let mut written = 0;
    for record in doc.records() {
        out.write_all(record.csv_line().as_bytes())?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;

    Ok(written)
}
