use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use std::fs;
use std::path::Path;
use url::Url;

/// Derive the local archive filename for a download link.
///
/// SourceForge download URLs end in `/<archive>.zip/download`, so the
/// filename is the second-to-last path segment. It is percent-decoded,
/// spaces become underscores, and parentheses are dropped so the name is
/// shell-friendly.
pub fn archive_filename(link: &str) -> Result<String> {
    let url = Url::parse(link).with_context(|| format!("Invalid URL: {link}"))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();
    let raw = segments
        .iter()
        .rev()
        .nth(1)
        .copied()
        .with_context(|| format!("No archive segment in URL: {link}"))?;

    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .with_context(|| format!("Archive name is not valid UTF-8: {raw}"))?;

    Ok(decoded.replace(' ', "_").replace(['(', ')'], ""))
}

/// Build the `curl` command line that downloads `link` to its cleaned
/// local filename.
pub fn curl_command(link: &str) -> Result<String> {
    let filename = archive_filename(link)?;
    Ok(format!("curl -L -o \"{filename}\" {link}"))
}

/// Read a link list (one URL per line, blank lines skipped) and write one
/// curl command per link to `output`.
pub fn write_curl_commands(input: &Path, output: &Path) -> Result<usize> {
    let contents = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut commands = Vec::new();
    for line in contents.lines() {
        let link = line.trim();
        if link.is_empty() {
            continue;
        }
        commands.push(curl_command(link)?);
    }

    let mut body = commands.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(output, body)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(path = %output.display(), commands = commands.len(), "Wrote curl commands");
    Ok(commands.len())
}
