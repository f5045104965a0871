//! CLI command implementations.

pub mod add;
pub mod backend;
pub mod export;
pub mod list;
pub mod top_items;

pub use add::AddArgs;

use clap::Args;
use requiva_core::{OrderFilter, PoSource};

/// Filters shared by `list` and `export`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only orders whose vendor contains this text
    #[arg(long)]
    pub vendor: Option<String>,

    /// Only orders whose grant contains this text
    #[arg(long)]
    pub grant: Option<String>,

    /// Only orders from this PO source (ShopBlue, Stock Room, External Vendor)
    #[arg(long)]
    pub po_source: Option<String>,
}

impl FilterArgs {
    /// Builds the record filter.
    pub fn to_filter(&self) -> Result<OrderFilter, Box<dyn std::error::Error>> {
        let mut filter = OrderFilter::new();
        if let Some(vendor) = &self.vendor {
            filter = filter.vendor(vendor.as_str());
        }
        if let Some(grant) = &self.grant {
            filter = filter.grant(grant.as_str());
        }
        if let Some(source) = &self.po_source {
            filter = filter.po_source(source.parse::<PoSource>()?);
        }
        Ok(filter)
    }
}
