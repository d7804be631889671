//! `efile validate` — run the validation orchestrator over a batch file.

use std::path::PathBuf;

use efile_batch::ValidationOptions;

/// Arguments for `efile validate`.
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Batch document (XML or JSON, auto-detected).
    pub file: PathBuf,

    /// Skip aggregate attribute verification.
    #[arg(long)]
    pub skip_attributes: bool,
}

/// Validate the batch and report the outcome.
pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let batch = crate::load_batch(&args.file)?;
    let options = ValidationOptions {
        verify_attributes: !args.skip_attributes,
    };
    batch
        .validate(&options)
        .map_err(|err| anyhow::anyhow!("{}: {err}", args.file.display()))?;

    println!(
        "{}: valid {} batch ({} activities)",
        args.file.display(),
        batch.kind(),
        batch.activities.len()
    );
    Ok(())
}
