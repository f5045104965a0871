//! # Requiva Core
//!
//! Order record model for Requiva, a lab purchase-order tracker.
//!
//! This crate provides:
//! - The canonical record schema ([`Field`])
//! - Loosely-typed cell values and untyped rows
//! - The schema normalizer, the only path from untyped rows to records
//! - `REQ#` generation, total computation and input validation
//! - New-order assembly, filtering, item frequency and CSV encoding
//!
//! Storage backends live in `requiva_storage`.
//!
//! ## Example
//!
//! ```rust
//! use requiva_core::{generate_id_for_year, normalize, Field, NewOrder, RecordBatch};
//!
//! let existing = RecordBatch::new();
//! let id = generate_id_for_year(&existing, 2025);
//! assert_eq!(id, "REQ-2025-0001");
//!
//! let record = NewOrder::new("Tubes", 3.0, 19.995, "Acme").into_record(id).unwrap();
//! assert_eq!(record.get(Field::Total).as_number(), Some(59.99));
//!
//! let batch = normalize(vec![record]);
//! assert_eq!(batch.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod id;
mod normalize;
mod order;
mod query;
mod record;
mod schema;
mod tabular;
mod validate;
mod value;

pub use error::{CoreError, CoreResult};
pub use id::{current_year, generate_id, generate_id_for_year, id_prefix};
pub use normalize::{normalize, normalize_batch, normalize_row};
pub use order::{split_grants, NewOrder, PoSource, Receipt};
pub use query::{top_items, OrderFilter};
pub use record::{OrderRecord, RawRow, RecordBatch, Row};
pub use schema::{column_names, Field, FIELD_COUNT};
pub use tabular::{export_file_name, read_rows, to_csv_bytes, write_csv};
pub use validate::{compute_total, validate, validation_outcome, ValidationError};
pub use value::Value;
