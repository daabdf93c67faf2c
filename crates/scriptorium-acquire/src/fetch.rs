use crate::download;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Provenance for one fetched archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedArchive {
    pub url: String,
    pub file: String,
    pub bytes: u64,
    pub fetched_at: String,
}

/// Provenance manifest written next to the downloaded archives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchManifest {
    pub source: String,
    pub archives: Vec<FetchedArchive>,
}

/// Download every archive in the link list into `output_dir`.
///
/// Links are fetched strictly one at a time. A failing link is logged
/// and skipped so the rest of the list still downloads, mirroring the
/// converter's per-item containment. Writes `manifest.json` with
/// per-archive provenance and returns the manifest.
pub async fn fetch_archives(links_file: &Path, output_dir: &Path) -> Result<FetchManifest> {
    let contents = fs::read_to_string(links_file)
        .with_context(|| format!("Failed to read {}", links_file.display()))?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let client = reqwest::Client::builder()
        .user_agent("scriptorium/0.1 (bible corpus tool)")
        .build()?;

    let mut manifest = FetchManifest {
        source: links_file.display().to_string(),
        archives: Vec::new(),
    };

    for line in contents.lines() {
        let link = line.trim();
        if link.is_empty() {
            continue;
        }
        match fetch_one(&client, link, output_dir).await {
            Ok(archive) => {
                tracing::info!(
                    url = link,
                    file = %archive.file,
                    bytes = archive.bytes,
                    "Fetched archive"
                );
                manifest.archives.push(archive);
            }
            Err(e) => {
                tracing::warn!(url = link, error = %e, "Skipping link");
            }
        }
    }

    let manifest_path = output_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&manifest_path, &json)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;
    tracing::info!(
        path = %manifest_path.display(),
        archives = manifest.archives.len(),
        "Wrote fetch manifest"
    );

    Ok(manifest)
}

async fn fetch_one(
    client: &reqwest::Client,
    link: &str,
    output_dir: &Path,
) -> Result<FetchedArchive> {
    let filename = download::archive_filename(link)?;

    let response = client
        .get(link)
        .send()
        .await
        .context("Failed to fetch archive")?;
    let status = response.status();
    anyhow::ensure!(status.is_success(), "HTTP {status} for {link}");

    let body = response
        .bytes()
        .await
        .context("Failed to read response body")?;
    fs::write(output_dir.join(&filename), &body)?;

    Ok(FetchedArchive {
        url: link.to_string(),
        file: filename,
        bytes: body.len() as u64,
        fetched_at: chrono::Utc::now().to_rfc3339(),
    })
}
