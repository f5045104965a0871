//! Export command implementation.

use super::FilterArgs;
use requiva_core::{export_file_name, write_csv};
use requiva_storage::RecordStore;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use time::OffsetDateTime;

/// Runs the export command.
///
/// Writes the filtered orders with the canonical header. Without `output`
/// the file is named after today's date in the current directory.
pub fn run(
    store: &RecordStore,
    filter: &FilterArgs,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch = filter.to_filter()?.apply(&store.load()?);
    let path = output.unwrap_or_else(|| {
        let today = OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .date();
        PathBuf::from(export_file_name(today))
    });

    let mut writer = BufWriter::new(File::create(&path)?);
    write_csv(&batch, &mut writer)?;
    writer.flush()?;

    println!("Exported {} orders to {}", batch.len(), path.display());
    Ok(())
}
