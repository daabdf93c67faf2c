// Acquisition tools for the Zefania Bible corpus: link scraping from a
// saved SourceForge listing page, download-command generation, in-process
// archive fetching, and zip extraction.

pub mod archive;
pub mod download;
pub mod fetch;
pub mod links;
