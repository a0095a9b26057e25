use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use invoicedesk_core::{DomainError, DomainResult, Entity, InvoiceId, ValueObject};

use crate::aggregation::{self, LineAmount};

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A single billable line.
///
/// `total` is derived on construction and always equals `quantity * rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "InvoiceItemPayload")]
pub struct InvoiceItem {
    item_name: String,
    quantity: u32,
    rate: f64,
    total: f64,
}

/// Wire shape of an item; any supplied `total` is ignored and recomputed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceItemPayload {
    item_name: String,
    quantity: u32,
    rate: f64,
}

impl TryFrom<InvoiceItemPayload> for InvoiceItem {
    type Error = DomainError;

    fn try_from(payload: InvoiceItemPayload) -> Result<Self, Self::Error> {
        InvoiceItem::new(payload.item_name, payload.quantity, payload.rate)
    }
}

impl InvoiceItem {
    pub fn new(item_name: impl Into<String>, quantity: u32, rate: f64) -> DomainResult<Self> {
        let item_name = item_name.into();
        if is_blank(&item_name) {
            return Err(DomainError::validation("item name is required"));
        }
        if quantity < 1 {
            return Err(DomainError::validation("item quantity must be at least 1"));
        }
        if !rate.is_finite() || rate < 0.0 {
            return Err(DomainError::validation(
                "item rate must be a non-negative number",
            ));
        }

        Ok(Self {
            total: aggregation::item_total(i64::from(quantity), rate),
            item_name,
            quantity,
            rate,
        })
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

impl LineAmount for InvoiceItem {
    fn quantity(&self) -> i64 {
        i64::from(self.quantity)
    }

    fn rate(&self) -> f64 {
        self.rate
    }
}

impl ValueObject for InvoiceItem {}

/// Parties and date of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceHeader {
    pub from_name: String,
    pub from_address: String,
    pub to_name: String,
    pub to_address: String,
    pub invoice_date: NaiveDate,
}

impl InvoiceHeader {
    /// Every text field is required.
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("fromName", &self.from_name),
            ("fromAddress", &self.from_address),
            ("toName", &self.to_name),
            ("toAddress", &self.to_address),
        ];
        for (name, value) in fields {
            if is_blank(value) {
                return Err(DomainError::validation(format!("{name} is required")));
            }
        }
        Ok(())
    }
}

/// Validated form values submitted for creation.
///
/// The repository assigns the id, and the invoice number when none is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "InvoiceDraftPayload")]
pub struct InvoiceDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    invoice_number: Option<String>,
    #[serde(flatten)]
    header: InvoiceHeader,
    items: Vec<InvoiceItem>,
    total_amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceDraftPayload {
    #[serde(default)]
    invoice_number: Option<String>,
    #[serde(flatten)]
    header: InvoiceHeader,
    items: Vec<InvoiceItem>,
}

impl TryFrom<InvoiceDraftPayload> for InvoiceDraft {
    type Error = DomainError;

    fn try_from(payload: InvoiceDraftPayload) -> Result<Self, Self::Error> {
        let draft = InvoiceDraft::new(payload.header, payload.items)?;
        match payload.invoice_number {
            Some(number) => draft.with_invoice_number(number),
            None => Ok(draft),
        }
    }
}

impl InvoiceDraft {
    pub fn new(header: InvoiceHeader, items: Vec<InvoiceItem>) -> DomainResult<Self> {
        header.validate()?;
        if items.is_empty() {
            return Err(DomainError::validation(
                "an invoice needs at least one item",
            ));
        }

        Ok(Self {
            invoice_number: None,
            total_amount: aggregation::invoice_total(&items),
            header,
            items,
        })
    }

    pub fn with_invoice_number(mut self, invoice_number: impl Into<String>) -> DomainResult<Self> {
        let invoice_number = invoice_number.into();
        if is_blank(&invoice_number) {
            return Err(DomainError::validation("invoice number must not be blank"));
        }
        self.invoice_number = Some(invoice_number);
        Ok(self)
    }

    pub fn invoice_number(&self) -> Option<&str> {
        self.invoice_number.as_deref()
    }

    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }
}

/// A persisted invoice.
///
/// Read-only once created: the only way to build one is from a validated draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    id: InvoiceId,
    invoice_number: String,
    #[serde(flatten)]
    header: InvoiceHeader,
    items: Vec<InvoiceItem>,
    total_amount: f64,
}

impl Invoice {
    /// Materialize a draft under a repository-assigned identity.
    pub fn from_draft(id: InvoiceId, invoice_number: impl Into<String>, draft: InvoiceDraft) -> Self {
        Self {
            id,
            invoice_number: invoice_number.into(),
            header: draft.header,
            items: draft.items,
            total_amount: draft.total_amount,
        }
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    pub fn from_name(&self) -> &str {
        &self.header.from_name
    }

    pub fn from_address(&self) -> &str {
        &self.header.from_address
    }

    pub fn to_name(&self) -> &str {
        &self.header.to_name
    }

    pub fn to_address(&self) -> &str {
        &self.header.to_address
    }

    pub fn invoice_date(&self) -> NaiveDate {
        self.header.invoice_date
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> InvoiceId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> InvoiceHeader {
        InvoiceHeader {
            from_name: "ABC Corp".to_string(),
            from_address: "1 Main St".to_string(),
            to_name: "XYZ Ltd".to_string(),
            to_address: "2 High St".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn item_total_is_derived() {
        let item = InvoiceItem::new("Widget", 3, 12.5).unwrap();
        assert_eq!(item.total(), 37.5);
    }

    #[test]
    fn item_rejects_invalid_values() {
        assert!(matches!(
            InvoiceItem::new("  ", 1, 1.0),
            Err(DomainError::Validation(_))
        ));
        assert!(InvoiceItem::new("Widget", 0, 1.0).is_err());
        assert!(InvoiceItem::new("Widget", 1, -0.01).is_err());
        assert!(InvoiceItem::new("Widget", 1, f64::NAN).is_err());
    }

    #[test]
    fn draft_total_is_sum_of_items() {
        let draft = InvoiceDraft::new(
            header(),
            vec![
                InvoiceItem::new("A", 2, 100.0).unwrap(),
                InvoiceItem::new("B", 1, 50.0).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(draft.total_amount(), 250.0);
    }

    #[test]
    fn draft_requires_items_and_header() {
        let err = InvoiceDraft::new(header(), Vec::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("at least one item")));

        let mut blank = header();
        blank.to_address = String::new();
        let err = InvoiceDraft::new(blank, vec![InvoiceItem::new("A", 1, 1.0).unwrap()])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("toAddress")));
    }

    #[test]
    fn draft_payload_recomputes_totals() {
        let json = serde_json::json!({
            "fromName": "ABC Corp",
            "fromAddress": "1 Main St",
            "toName": "XYZ Ltd",
            "toAddress": "2 High St",
            "invoiceDate": "2025-01-01",
            "items": [{ "itemName": "A", "quantity": 2, "rate": 10.0, "total": 999.0 }],
            "totalAmount": 999.0
        });

        let draft: InvoiceDraft = serde_json::from_value(json).unwrap();
        assert_eq!(draft.items()[0].total(), 20.0);
        assert_eq!(draft.total_amount(), 20.0);
        assert_eq!(draft.invoice_number(), None);
    }

    #[test]
    fn draft_payload_rejects_invalid_items() {
        let json = serde_json::json!({
            "fromName": "ABC Corp",
            "fromAddress": "1 Main St",
            "toName": "XYZ Ltd",
            "toAddress": "2 High St",
            "invoiceDate": "2025-01-01",
            "items": [{ "itemName": "", "quantity": 2, "rate": 10.0 }]
        });

        assert!(serde_json::from_value::<InvoiceDraft>(json).is_err());
    }

    #[test]
    fn invoice_serializes_camel_case() {
        let draft =
            InvoiceDraft::new(header(), vec![InvoiceItem::new("A", 2, 100.0).unwrap()]).unwrap();
        let invoice = Invoice::from_draft(InvoiceId::new(7), "INV007", draft);

        let value = serde_json::to_value(&invoice).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["invoiceNumber"], "INV007");
        assert_eq!(value["fromName"], "ABC Corp");
        assert_eq!(value["invoiceDate"], "2025-01-01");
        assert_eq!(value["items"][0]["total"], 200.0);
        assert_eq!(value["totalAmount"], 200.0);
    }
}
