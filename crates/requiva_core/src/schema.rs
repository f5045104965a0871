//! Canonical record schema.
//!
//! Every order record carries exactly these fields, in this order. Older
//! tables and schema-less documents are brought to this shape by the
//! normalizer.

use std::fmt;

/// Number of canonical fields.
pub const FIELD_COUNT: usize = 18;

/// One column of the canonical order schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// `REQ#`, the record key.
    ReqId,
    /// `ITEM`.
    Item,
    /// `NUMBER OF ITEM`.
    Quantity,
    /// `AMOUNT PER ITEM`.
    UnitPrice,
    /// `TOTAL`, quantity times unit price.
    Total,
    /// `VENDOR`.
    Vendor,
    /// `CAT #`.
    CatalogNumber,
    /// `GRANT USED`, a comma-separated list.
    GrantUsed,
    /// `PO SOURCE`.
    PoSource,
    /// `PO #`.
    PoNumber,
    /// `NOTES`.
    Notes,
    /// `ORDERED BY`.
    OrderedBy,
    /// `DATE ORDERED`.
    DateOrdered,
    /// `DATE RECEIVED`.
    DateReceived,
    /// `RECEIVED BY`.
    ReceivedBy,
    /// `LOCATION KEPT`.
    LocationKept,
    /// `REQUESTED BY`.
    RequestedBy,
    /// `TIME RECEIVED`.
    TimeReceived,
}

impl Field {
    /// All fields in canonical order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::ReqId,
        Field::Item,
        Field::Quantity,
        Field::UnitPrice,
        Field::Total,
        Field::Vendor,
        Field::CatalogNumber,
        Field::GrantUsed,
        Field::PoSource,
        Field::PoNumber,
        Field::Notes,
        Field::OrderedBy,
        Field::DateOrdered,
        Field::DateReceived,
        Field::ReceivedBy,
        Field::LocationKept,
        Field::RequestedBy,
        Field::TimeReceived,
    ];

    /// Returns the column name used in tables and documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::ReqId => "REQ#",
            Field::Item => "ITEM",
            Field::Quantity => "NUMBER OF ITEM",
            Field::UnitPrice => "AMOUNT PER ITEM",
            Field::Total => "TOTAL",
            Field::Vendor => "VENDOR",
            Field::CatalogNumber => "CAT #",
            Field::GrantUsed => "GRANT USED",
            Field::PoSource => "PO SOURCE",
            Field::PoNumber => "PO #",
            Field::Notes => "NOTES",
            Field::OrderedBy => "ORDERED BY",
            Field::DateOrdered => "DATE ORDERED",
            Field::DateReceived => "DATE RECEIVED",
            Field::ReceivedBy => "RECEIVED BY",
            Field::LocationKept => "LOCATION KEPT",
            Field::RequestedBy => "REQUESTED BY",
            Field::TimeReceived => "TIME RECEIVED",
        }
    }

    /// Looks up a field by its exact column name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Position of this field in canonical order.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether values of this column are numeric.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Field::Quantity | Field::UnitPrice | Field::Total)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the canonical column names in order.
#[must_use]
pub fn column_names() -> [&'static str; FIELD_COUNT] {
    Field::ALL.map(Field::name)
}
