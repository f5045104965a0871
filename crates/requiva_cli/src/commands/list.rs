//! List command implementation.

use super::FilterArgs;
use requiva_core::{write_csv, Field, RecordBatch};
use requiva_storage::RecordStore;
use std::fmt::Write as _;

const TEXT_COLUMNS: [(Field, usize); 6] = [
    (Field::ReqId, 14),
    (Field::Item, 28),
    (Field::Quantity, 6),
    (Field::Total, 10),
    (Field::Vendor, 20),
    (Field::PoSource, 15),
];

/// Runs the list command.
pub fn run(
    store: &RecordStore,
    filter: &FilterArgs,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch = filter.to_filter()?.apply(&store.load()?);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&batch)?);
        }
        "csv" => {
            write_csv(&batch, std::io::stdout().lock())?;
        }
        _ => {
            print!("{}", render_text(&batch));
        }
    }

    Ok(())
}

/// Renders a fixed-width table followed by a count and spend line.
pub fn render_text(batch: &RecordBatch) -> String {
    let mut out = String::new();
    for (field, width) in TEXT_COLUMNS {
        let _ = write!(out, "{:<width$} ", field.name());
    }
    out.push('\n');

    for record in batch {
        for (field, width) in TEXT_COLUMNS {
            let cell = clip(&record.get(field).to_string(), width);
            let _ = write!(out, "{cell:<width$} ");
        }
        out.push('\n');
    }

    let spend: f64 = batch
        .iter()
        .filter_map(|r| r.get(Field::Total).as_number())
        .sum();
    let _ = writeln!(out, "\n{} orders, total spend {spend:.2}", batch.len());
    out
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}
