use core::cmp::Ordering;
use core::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use invoicedesk_core::Entity;
use invoicedesk_invoicing::Invoice;

/// Invoice attributes addressable by name in filters and sorts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InvoiceField {
    Id,
    InvoiceNumber,
    FromName,
    FromAddress,
    ToName,
    ToAddress,
    InvoiceDate,
    Items,
    TotalAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown invoice field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for InvoiceField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "id" => InvoiceField::Id,
            "invoiceNumber" => InvoiceField::InvoiceNumber,
            "fromName" => InvoiceField::FromName,
            "fromAddress" => InvoiceField::FromAddress,
            "toName" => InvoiceField::ToName,
            "toAddress" => InvoiceField::ToAddress,
            "invoiceDate" => InvoiceField::InvoiceDate,
            "items" => InvoiceField::Items,
            "totalAmount" => InvoiceField::TotalAmount,
            other => return Err(UnknownField(other.to_string())),
        })
    }
}

/// Typed view of one field of one invoice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Integer(u64),
    Number(f64),
    Text(&'a str),
    Date(NaiveDate),
    /// Fields with no scalar form (the item list).
    Unsupported,
}

impl InvoiceField {
    pub fn value_of(self, invoice: &Invoice) -> FieldValue<'_> {
        match self {
            InvoiceField::Id => FieldValue::Integer(invoice.id().get()),
            InvoiceField::InvoiceNumber => FieldValue::Text(invoice.invoice_number()),
            InvoiceField::FromName => FieldValue::Text(invoice.from_name()),
            InvoiceField::FromAddress => FieldValue::Text(invoice.from_address()),
            InvoiceField::ToName => FieldValue::Text(invoice.to_name()),
            InvoiceField::ToAddress => FieldValue::Text(invoice.to_address()),
            InvoiceField::InvoiceDate => FieldValue::Date(invoice.invoice_date()),
            InvoiceField::Items => FieldValue::Unsupported,
            InvoiceField::TotalAmount => FieldValue::Number(invoice.total_amount()),
        }
    }

    /// Whether the field has a scalar value to filter or sort on.
    pub fn is_scalar(self) -> bool {
        self != InvoiceField::Items
    }
}

impl FieldValue<'_> {
    /// Lower-cased text used for substring matching.
    ///
    /// Numbers use their plain decimal form (`200`, `12.5`), dates ISO `YYYY-MM-DD`.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::Integer(n) => Some(n.to_string()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Text(s) => Some(s.to_lowercase()),
            FieldValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            FieldValue::Unsupported => None,
        }
    }

    /// Natural ordering: dates by instant, numbers numerically, text by raw
    /// (case-sensitive) code point order.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}
