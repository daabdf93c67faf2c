use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::fs;
use std::path::Path;

/// Anchors inside the SourceForge file-listing timeline.
const LINK_SELECTOR: &str = ".timeline li h1 a";

/// Accepted download links: Zefania Bible module archives on SourceForge.
const LINK_PATTERN: &str =
    r"^http://sourceforge\.net/projects/zefania-sharp/files/Bibles.*\.zip/download$";

/// Extract archive download links from a saved listing page, in page
/// order.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(LINK_SELECTOR).expect("valid selector");
    let pattern = Regex::new(LINK_PATTERN).unwrap();

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| pattern.is_match(href))
        .map(|href| href.to_string())
        .collect()
}

/// Read a saved HTML listing page and write the extracted links to
/// `output`, one URL per line.
pub fn links_from_file(input: &Path, output: &Path) -> Result<usize> {
    let html = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let links = extract_links(&html);
    let mut body = links.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(output, body)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(path = %output.display(), links = links.len(), "Wrote link list");
    Ok(links.len())
}
