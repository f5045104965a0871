//! Assembly of new order records from form input.

use crate::error::{CoreError, CoreResult};
use crate::record::OrderRecord;
use crate::schema::Field;
use crate::validate::{compute_total, validate, ValidationError};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, Time};

/// Where a purchase order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PoSource {
    /// The university purchasing portal.
    #[default]
    ShopBlue,
    /// The departmental stock room.
    StockRoom,
    /// Any other vendor.
    ExternalVendor,
}

impl PoSource {
    /// All sources in form order.
    pub const ALL: [PoSource; 3] = [PoSource::ShopBlue, PoSource::StockRoom, PoSource::ExternalVendor];

    /// The stored label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PoSource::ShopBlue => "ShopBlue",
            PoSource::StockRoom => "Stock Room",
            PoSource::ExternalVendor => "External Vendor",
        }
    }
}

impl fmt::Display for PoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PoSource {
    type Err = CoreError;

    /// Accepts the stored label, case-insensitively, with `-`/`_` for spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        PoSource::ALL
            .iter()
            .copied()
            .find(|src| {
                src.label().eq_ignore_ascii_case(&wanted)
                    || src.label().replace(' ', "").eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| CoreError::unknown_po_source(s))
    }
}

/// Receipt details, present once an item has arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Date the item arrived.
    pub date: Date,
    /// Time the item arrived, if recorded.
    pub time: Option<Time>,
    /// Who signed for it.
    pub received_by: String,
    /// Where it is stored.
    pub location: String,
}

/// Form input for a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Item name.
    pub item: String,
    /// Number of items.
    pub quantity: Value,
    /// Price per item.
    pub unit_price: Value,
    /// Vendor name.
    pub vendor: String,
    /// Catalog number.
    pub catalog_number: String,
    /// Grant reference(s), comma separated.
    pub grant_used: String,
    /// Purchase-order source.
    pub po_source: PoSource,
    /// Purchase-order number.
    pub po_number: String,
    /// Free-text notes.
    pub notes: String,
    /// Who placed the order.
    pub ordered_by: String,
    /// Who asked for the item.
    pub requested_by: String,
    /// Order date.
    pub date_ordered: Option<Date>,
    /// Receipt details if already received.
    pub receipt: Option<Receipt>,
}

impl NewOrder {
    /// Creates an order with the required fields and empty optionals.
    pub fn new(
        item: impl Into<String>,
        quantity: impl Into<Value>,
        unit_price: impl Into<Value>,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            vendor: vendor.into(),
            catalog_number: String::new(),
            grant_used: String::new(),
            po_source: PoSource::default(),
            po_number: String::new(),
            notes: String::new(),
            ordered_by: String::new(),
            requested_by: String::new(),
            date_ordered: None,
            receipt: None,
        }
    }

    /// Validates the required inputs.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(
            Some(self.item.as_str()),
            &self.quantity,
            &self.unit_price,
            Some(self.vendor.as_str()),
        )
    }

    /// Splits the grant list on commas, dropping blanks.
    #[must_use]
    pub fn grants(&self) -> Vec<&str> {
        split_grants(&self.grant_used)
    }

    /// Validates and builds the canonical record under `req_id`.
    ///
    /// `TOTAL` is computed here, once. Receipt fields stay null unless the
    /// order carries a [`Receipt`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the input is rejected.
    pub fn into_record(self, req_id: impl Into<String>) -> CoreResult<OrderRecord> {
        self.validate()?;

        let req_id: String = req_id.into();
        let total = compute_total(&self.quantity, &self.unit_price);
        let quantity = self.quantity.as_number().map_or(Value::Null, Value::Number);
        let unit_price = self.unit_price.as_number().map_or(Value::Null, Value::Number);

        let mut record = OrderRecord::new()
            .with(Field::ReqId, req_id)
            .with(Field::Item, self.item)
            .with(Field::Quantity, quantity)
            .with(Field::UnitPrice, unit_price)
            .with(Field::Total, total)
            .with(Field::Vendor, self.vendor)
            .with(Field::CatalogNumber, Value::text_or_null(self.catalog_number))
            .with(Field::GrantUsed, Value::text_or_null(self.grant_used))
            .with(Field::PoSource, self.po_source.label())
            .with(Field::PoNumber, Value::text_or_null(self.po_number))
            .with(Field::Notes, Value::text_or_null(self.notes))
            .with(Field::OrderedBy, Value::text_or_null(self.ordered_by))
            .with(Field::RequestedBy, Value::text_or_null(self.requested_by))
            .with(Field::DateOrdered, self.date_ordered.map(|d| d.to_string()));

        if let Some(receipt) = self.receipt {
            record.set(Field::DateReceived, receipt.date.to_string());
            record.set(Field::TimeReceived, receipt.time.and_then(format_time));
            record.set(Field::ReceivedBy, Value::text_or_null(receipt.received_by));
            record.set(Field::LocationKept, Value::text_or_null(receipt.location));
        }

        Ok(record)
    }
}

/// Splits a comma-separated grant list, trimming entries and dropping blanks.
#[must_use]
pub fn split_grants(grants: &str) -> Vec<&str> {
    grants
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .collect()
}

fn format_time(t: Time) -> Option<String> {
    t.format(format_description!("[hour]:[minute]")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn po_source_parsing() {
        assert_eq!("ShopBlue".parse::<PoSource>().unwrap(), PoSource::ShopBlue);
        assert_eq!("stock room".parse::<PoSource>().unwrap(), PoSource::StockRoom);
        assert_eq!("external-vendor".parse::<PoSource>().unwrap(), PoSource::ExternalVendor);
        assert_eq!("StockRoom".parse::<PoSource>().unwrap(), PoSource::StockRoom);
        assert!(matches!(
            "Amazon".parse::<PoSource>(),
            Err(CoreError::UnknownPoSource { .. })
        ));
    }

    #[test]
    fn record_from_minimal_order() {
        let record = NewOrder::new("Tubes", 3.0, 19.995, "Acme")
            .into_record("REQ-2025-0001")
            .unwrap();

        assert_eq!(record.req_id(), &Value::text("REQ-2025-0001"));
        assert_eq!(record.get(Field::Total), &Value::Number(59.99));
        assert_eq!(record.get(Field::PoSource), &Value::text("ShopBlue"));
        assert!(record.get(Field::Notes).is_null());
        assert!(record.get(Field::DateReceived).is_null());
        assert!(record.get(Field::LocationKept).is_null());
    }

    #[test]
    fn numeric_text_inputs_are_stored_as_numbers() {
        let record = NewOrder::new("Tubes", "2", "4.5", "Acme")
            .into_record("REQ-2025-0002")
            .unwrap();
        assert_eq!(record.get(Field::Quantity), &Value::Number(2.0));
        assert_eq!(record.get(Field::UnitPrice), &Value::Number(4.5));
        assert_eq!(record.get(Field::Total), &Value::Number(9.0));
    }

    #[test]
    fn received_order_fills_receipt_fields() {
        let mut order = NewOrder::new("FBS 500 mL", 1.0, 450.0, "Thermo Fisher");
        order.date_ordered = Some(date!(2025 - 03 - 01));
        order.receipt = Some(Receipt {
            date: date!(2025 - 03 - 04),
            time: Some(time!(9:30)),
            received_by: "J. Doe".to_string(),
            location: "Freezer A, Shelf 2".to_string(),
        });

        let record = order.into_record("REQ-2025-0003").unwrap();
        assert_eq!(record.get(Field::DateOrdered), &Value::text("2025-03-01"));
        assert_eq!(record.get(Field::DateReceived), &Value::text("2025-03-04"));
        assert_eq!(record.get(Field::TimeReceived), &Value::text("09:30"));
        assert_eq!(record.get(Field::ReceivedBy), &Value::text("J. Doe"));
        assert_eq!(record.get(Field::LocationKept), &Value::text("Freezer A, Shelf 2"));
    }

    #[test]
    fn invalid_order_is_rejected() {
        let err = NewOrder::new("Tubes", -1.0, 1.0, "Acme")
            .into_record("REQ-2025-0004")
            .unwrap_err();
        assert_eq!(err.to_string(), "NUMBER OF ITEM must be >= 0.");
    }

    #[test]
    fn grant_list() {
        let mut order = NewOrder::new("Tubes", 1.0, 1.0, "Acme");
        order.grant_used = "R01CA12345, , U54-9 ".to_string();
        assert_eq!(order.grants(), vec!["R01CA12345", "U54-9"]);
    }
}
