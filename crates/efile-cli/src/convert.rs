//! `efile convert` — re-encode a batch document in the requested wire
//! format. XML output always carries the canonical namespace attributes.

use std::path::PathBuf;

use efile_batch::BatchEnvelope;

/// Target wire format.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// The primary tag-annotated format.
    Xml,
    /// The secondary keyed-map format.
    Json,
}

/// Arguments for `efile convert`.
#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Batch document (XML or JSON, auto-detected).
    pub file: PathBuf,

    /// Output format.
    #[arg(long, value_enum)]
    pub to: OutputFormat,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Encode a decoded batch in the requested format.
pub fn encode(batch: &BatchEnvelope, format: OutputFormat) -> anyhow::Result<String> {
    let encoded = match format {
        OutputFormat::Xml => batch.encode_xml()?,
        OutputFormat::Json => batch.encode_json()?,
    };
    Ok(encoded)
}

/// Decode, re-encode, and write.
pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let batch = crate::load_batch(&args.file)?;
    let encoded = encode(&batch, args.to)?;
    crate::write_output(args.output.as_deref(), &encoded)
}
