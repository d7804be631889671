//! `efile renumber` — assign depth-first sequence numbers and regenerate
//! the aggregate attribute bundle, then write the result out.

use std::path::PathBuf;

use efile_batch::assign_sequence_numbers;

use crate::convert::OutputFormat;

/// Arguments for `efile renumber`.
#[derive(clap::Args, Debug)]
pub struct RenumberArgs {
    /// Batch document (XML or JSON, auto-detected).
    pub file: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value = "xml")]
    pub to: OutputFormat,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Renumber the tree, refresh the aggregates, and write.
pub fn run(args: RenumberArgs) -> anyhow::Result<()> {
    let mut batch = crate::load_batch(&args.file)?;
    assign_sequence_numbers(&mut batch);
    batch.generate_attributes();
    tracing::debug!(
        activities = batch.activities.len(),
        total_amount = batch.total_amount,
        "regenerated aggregate attributes"
    );
    let encoded = crate::convert::encode(&batch, args.to)?;
    crate::write_output(args.output.as_deref(), &encoded)
}
