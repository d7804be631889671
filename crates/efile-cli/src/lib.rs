//! # efile-cli — Handler Modules
//!
//! One module per subcommand. File I/O lives here, outside the core: the
//! engine crates operate on in-memory documents only.

use std::path::Path;

use anyhow::Context as _;

use efile_batch::BatchEnvelope;

pub mod convert;
pub mod renumber;
pub mod validate;

/// Read and decode a batch document, XML or JSON, auto-detected by the
/// two-phase decoder.
pub fn load_batch(path: &Path) -> anyhow::Result<BatchEnvelope> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = raw.len(), "loaded batch file");
    BatchEnvelope::from_bytes(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Write `content` to `output`, or to stdout when no path is given.
pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote batch document");
        }
        None => println!("{content}"),
    }
    Ok(())
}
