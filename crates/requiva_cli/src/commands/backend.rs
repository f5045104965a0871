//! Backend status command implementation.

use requiva_storage::{RecordStore, StoreConfig};

/// Runs the backend command.
pub fn run(store: &RecordStore, config: &StoreConfig) {
    println!("{}", store.backend_kind().describe());
    println!("  Backend:  {}", store.backend_kind());
    println!("  Location: {}", store.backend().location());

    let present = config.credentials.present_keys();
    if present.is_empty() {
        println!("  Credentials: none");
    } else {
        println!("  Credentials: {}", present.join(", "));
    }
}
