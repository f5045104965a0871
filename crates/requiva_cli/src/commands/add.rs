//! Add command implementation.

use clap::Args;
use requiva_core::{Field, NewOrder, PoSource, Receipt, Value};
use requiva_storage::RecordStore;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

/// Inputs for a new order.
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Item description
    #[arg(long)]
    pub item: String,

    /// Number of items
    #[arg(short, long)]
    pub quantity: String,

    /// Price per item
    #[arg(short, long)]
    pub price: String,

    /// Vendor name
    #[arg(long)]
    pub vendor: String,

    /// Catalog number
    #[arg(long, default_value = "")]
    pub cat: String,

    /// Grant(s) used, comma separated
    #[arg(long, default_value = "")]
    pub grant: String,

    /// PO source (ShopBlue, Stock Room, External Vendor)
    #[arg(long, default_value = "ShopBlue")]
    pub po_source: String,

    /// PO number
    #[arg(long, default_value = "")]
    pub po_number: String,

    /// Notes
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Who placed the order
    #[arg(long, default_value = "")]
    pub ordered_by: String,

    /// Who requested the item
    #[arg(long, default_value = "")]
    pub requested_by: String,

    /// Order date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date_ordered: Option<String>,

    /// Date received, YYYY-MM-DD; marks the order as received
    #[arg(long)]
    pub date_received: Option<String>,

    /// Time received, HH:MM
    #[arg(long, requires = "date_received")]
    pub time_received: Option<String>,

    /// Who received the item
    #[arg(long, default_value = "", requires = "date_received")]
    pub received_by: String,

    /// Where the item is kept
    #[arg(long, default_value = "", requires = "date_received")]
    pub location: String,
}

impl AddArgs {
    /// Converts the arguments into a new order.
    pub fn to_order(&self, today: Date) -> Result<NewOrder, Box<dyn std::error::Error>> {
        let mut order = NewOrder::new(
            self.item.as_str(),
            Value::text(self.quantity.as_str()),
            Value::text(self.price.as_str()),
            self.vendor.as_str(),
        );
        order.catalog_number = self.cat.clone();
        order.grant_used = self.grant.clone();
        order.po_source = self.po_source.parse::<PoSource>()?;
        order.po_number = self.po_number.clone();
        order.notes = self.notes.clone();
        order.ordered_by = self.ordered_by.clone();
        order.requested_by = self.requested_by.clone();
        order.date_ordered = Some(match &self.date_ordered {
            Some(date) => parse_date(date)?,
            None => today,
        });

        if let Some(date) = &self.date_received {
            order.receipt = Some(Receipt {
                date: parse_date(date)?,
                time: self.time_received.as_deref().map(parse_time).transpose()?,
                received_by: self.received_by.clone(),
                location: self.location.clone(),
            });
        }
        Ok(order)
    }
}

/// Runs the add command.
pub fn run(store: &RecordStore, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let order = args.to_order(today())?;
    if let Err(err) = order.validate() {
        eprintln!("{err}");
        return Err(err.into());
    }

    let record = store.append(order)?;
    println!(
        "Added {} ({} x {}, total {})",
        record.req_id(),
        record.get(Field::Item),
        record.get(Field::Quantity),
        record.get(Field::Total)
    );
    Ok(())
}

fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn parse_date(text: &str) -> Result<Date, Box<dyn std::error::Error>> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("invalid date {text:?}: {e}").into())
}

fn parse_time(text: &str) -> Result<Time, Box<dyn std::error::Error>> {
    Time::parse(text.trim(), format_description!("[hour]:[minute]"))
        .map_err(|e| format!("invalid time {text:?}: {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use requiva_storage::{Backend, LocalTable};
    use time::macros::{date, time};

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: AddArgs,
    }

    fn args(extra: &[&str]) -> AddArgs {
        let mut argv = vec![
            "add", "--item", "Tubes", "--quantity", "3", "--price", "19.995", "--vendor", "Acme",
        ];
        argv.extend_from_slice(extra);
        Harness::parse_from(argv).args
    }

    #[test]
    fn defaults_date_ordered_to_today() {
        let order = args(&[]).to_order(date!(2025 - 03 - 04)).unwrap();
        assert_eq!(order.date_ordered, Some(date!(2025 - 03 - 04)));
        assert_eq!(order.po_source, PoSource::ShopBlue);
        assert!(order.receipt.is_none());
    }

    #[test]
    fn parses_receipt() {
        let order = args(&[
            "--date-received",
            "2025-03-06",
            "--time-received",
            "14:05",
            "--received-by",
            "Sam",
            "--location",
            "Freezer B",
        ])
        .to_order(date!(2025 - 03 - 04))
        .unwrap();
        let receipt = order.receipt.unwrap();
        assert_eq!(receipt.date, date!(2025 - 03 - 06));
        assert_eq!(receipt.time, Some(time!(14:05)));
        assert_eq!(receipt.location, "Freezer B");
    }

    #[test]
    fn rejects_bad_inputs() {
        let today = date!(2025 - 03 - 04);
        assert!(args(&["--po-source", "petty cash"]).to_order(today).is_err());
        assert!(args(&["--date-ordered", "03/04/2025"]).to_order(today).is_err());
    }

    #[test]
    fn non_numeric_quantity_fails_validation() {
        let mut bad = args(&[]);
        bad.quantity = "three".to_string();
        let err = bad.to_order(date!(2025 - 03 - 04)).unwrap().validate().unwrap_err();
        assert_eq!(err.to_string(), "NUMBER OF ITEM must be a number.");
    }

    #[test]
    fn run_appends_to_local_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(Backend::local(LocalTable::new(dir.path().join("orders.csv"))));

        run(&store, args(&["--grant", "NIH-1, NSF-2"])).unwrap();
        let batch = store.load().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records()[0].get(Field::Total), &Value::Number(59.99));
        assert_eq!(batch.records()[0].get(Field::GrantUsed), &Value::text("NIH-1, NSF-2"));
    }
}
