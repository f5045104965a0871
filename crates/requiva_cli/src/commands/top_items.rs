//! Top-items command implementation.

use requiva_core::top_items;
use requiva_storage::RecordStore;

/// Runs the top-items command.
pub fn run(store: &RecordStore, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let batch = store.load()?;
    let items = top_items(&batch, limit);

    if items.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    println!("Top {} items", items.len());
    println!("============");
    for (rank, (item, count)) in items.iter().enumerate() {
        println!("{:>3}. {item} ({count})", rank + 1);
    }
    Ok(())
}
