//! Sample dataset used to seed development repositories.

use chrono::NaiveDate;

use invoicedesk_core::{DomainError, DomainResult, InvoiceId};
use invoicedesk_invoicing::{Invoice, InvoiceDraft, InvoiceHeader, InvoiceItem};

/// Default invoice number for an id: `INV` + at least three digits.
pub fn invoice_number(id: InvoiceId) -> String {
    format!("INV{:03}", id.get())
}

/// `count` deterministic invoices with ids `1..=count`.
///
/// Senders cycle through `Company A`..`Company Z`, dates cycle through 2025
/// (month `i % 12 + 1`, day `i % 28 + 1`) and every invoice has a single line
/// with quantity `i % 5 + 1` and rate `10 * (i + 1)`.
pub fn sample_invoices(count: usize) -> DomainResult<Vec<Invoice>> {
    (0..count).map(sample_invoice).collect()
}

fn sample_invoice(i: usize) -> DomainResult<Invoice> {
    let n = i + 1;
    let letter = char::from(b'A' + (i % 26) as u8);
    let invoice_date = NaiveDate::from_ymd_opt(2025, (i % 12 + 1) as u32, (i % 28 + 1) as u32)
        .ok_or_else(|| DomainError::invariant("sample invoice date out of range"))?;
    let quantity = (i % 5 + 1) as u32;

    let header = InvoiceHeader {
        from_name: format!("Company {letter}"),
        from_address: format!("Address {n}"),
        to_name: format!("Client {n}"),
        to_address: format!("Client Address {n}"),
        invoice_date,
    };
    let item = InvoiceItem::new(format!("Item {n}"), quantity, 10.0 * n as f64)?;
    let draft = InvoiceDraft::new(header, vec![item])?;

    let id = InvoiceId::new(n as u64);
    Ok(Invoice::from_draft(id, invoice_number(id), draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicedesk_core::Entity;

    #[test]
    fn generates_the_expected_shape() {
        let invoices = sample_invoices(50).unwrap();
        assert_eq!(invoices.len(), 50);

        let first = &invoices[0];
        assert_eq!(first.id(), InvoiceId::new(1));
        assert_eq!(first.invoice_number(), "INV001");
        assert_eq!(first.from_name(), "Company A");
        assert_eq!(first.to_name(), "Client 1");
        assert_eq!(first.invoice_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(first.total_amount(), 10.0);

        // i = 27: quantity 3, rate 280, month 4, day 28, letter B
        let inv = &invoices[27];
        assert_eq!(inv.invoice_number(), "INV028");
        assert_eq!(inv.from_name(), "Company B");
        assert_eq!(inv.invoice_date(), NaiveDate::from_ymd_opt(2025, 4, 28).unwrap());
        assert_eq!(inv.total_amount(), 840.0);
    }

    #[test]
    fn wide_ids_keep_all_digits() {
        assert_eq!(invoice_number(InvoiceId::new(1234)), "INV1234");
    }
}
