//! Invoice form controller.
//!
//! A create/view editing session over one invoice. The mode is fixed at
//! construction:
//!
//! - **Create** starts with one blank line. Every quantity/rate edit goes through
//!   [`InvoiceFormController::on_item_mutated`], which recomputes the line total
//!   and then the invoice total before the edit method returns.
//! - **View** is populated from a persisted [`Invoice`] and refuses every mutation.
//!
//! `save` and `close` terminate the session and yield a [`FormOutcome`].

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use invoicedesk_core::DomainError;

use crate::aggregation::{self, LineAmount};
use crate::invoice::{Invoice, InvoiceDraft, InvoiceHeader, InvoiceItem, is_blank};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    View,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HeaderField {
    FromName,
    FromAddress,
    ToName,
    ToAddress,
    InvoiceDate,
}

impl HeaderField {
    pub const ALL: [HeaderField; 5] = [
        HeaderField::FromName,
        HeaderField::FromAddress,
        HeaderField::ToName,
        HeaderField::ToAddress,
        HeaderField::InvoiceDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HeaderField::FromName => "fromName",
            HeaderField::FromAddress => "fromAddress",
            HeaderField::ToName => "toName",
            HeaderField::ToAddress => "toAddress",
            HeaderField::InvoiceDate => "invoiceDate",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ItemField {
    ItemName,
    Quantity,
    Rate,
}

impl ItemField {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemField::ItemName => "itemName",
            ItemField::Quantity => "quantity",
            ItemField::Rate => "rate",
        }
    }
}

/// Location of a form control.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Header(HeaderField),
    Item { index: usize, field: ItemField },
    /// The item list as a whole.
    Items,
}

impl core::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldPath::Header(field) => f.write_str(field.as_str()),
            FieldPath::Item { index, field } => write!(f, "items[{index}].{}", field.as_str()),
            FieldPath::Items => f.write_str("items"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum FieldErrorKind {
    #[error("is required")]
    Required,
    #[error("must be at least 1")]
    QuantityBelowOne,
    #[error("is too large")]
    QuantityTooLarge,
    #[error("must not be negative")]
    NegativeRate,
    #[error("must be a number")]
    NotANumber,
    #[error("needs at least one item")]
    NoItems,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("{field} {kind}")]
pub struct FieldError {
    pub field: FieldPath,
    pub kind: FieldErrorKind,
}

/// Every validation failure found in one pass, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation: {}", .0.len(), join(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: FieldPath) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("form is read-only")]
    ReadOnly,

    #[error("form is closed")]
    Closed,

    #[error("item index {index} out of range (items: {len})")]
    ItemOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result handed back to whoever opened the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Saved(InvoiceDraft),
    Cancelled,
}

impl FormOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, FormOutcome::Saved(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ItemTouched {
    item_name: bool,
    quantity: bool,
    rate: bool,
}

/// One editable line. Values are raw form input and may be invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct FormItem {
    item_name: String,
    quantity: i64,
    rate: f64,
    total: f64,
    touched: ItemTouched,
}

impl FormItem {
    fn blank() -> Self {
        Self {
            item_name: String::new(),
            quantity: 1,
            rate: 0.0,
            total: 0.0,
            touched: ItemTouched::default(),
        }
    }

    fn from_item(item: &InvoiceItem) -> Self {
        Self {
            item_name: item.item_name().to_string(),
            quantity: i64::from(item.quantity()),
            rate: item.rate(),
            total: item.total(),
            touched: ItemTouched::default(),
        }
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    fn is_touched(&self, field: ItemField) -> bool {
        match field {
            ItemField::ItemName => self.touched.item_name,
            ItemField::Quantity => self.touched.quantity,
            ItemField::Rate => self.touched.rate,
        }
    }

    fn errors(&self, index: usize, out: &mut Vec<FieldError>) {
        let at = |field| FieldPath::Item { index, field };

        if is_blank(&self.item_name) {
            out.push(FieldError {
                field: at(ItemField::ItemName),
                kind: FieldErrorKind::Required,
            });
        }
        if self.quantity < 1 {
            out.push(FieldError {
                field: at(ItemField::Quantity),
                kind: FieldErrorKind::QuantityBelowOne,
            });
        } else if u32::try_from(self.quantity).is_err() {
            out.push(FieldError {
                field: at(ItemField::Quantity),
                kind: FieldErrorKind::QuantityTooLarge,
            });
        }
        if !self.rate.is_finite() {
            out.push(FieldError {
                field: at(ItemField::Rate),
                kind: FieldErrorKind::NotANumber,
            });
        } else if self.rate < 0.0 {
            out.push(FieldError {
                field: at(ItemField::Rate),
                kind: FieldErrorKind::NegativeRate,
            });
        }
    }
}

impl LineAmount for FormItem {
    fn quantity(&self) -> i64 {
        self.quantity
    }

    fn rate(&self) -> f64 {
        self.rate
    }
}

#[derive(Debug, Clone)]
pub struct InvoiceFormController {
    mode: FormMode,
    invoice_number: Option<String>,
    from_name: String,
    from_address: String,
    to_name: String,
    to_address: String,
    invoice_date: Option<NaiveDate>,
    items: Vec<FormItem>,
    total_amount: f64,
    header_touched: Vec<HeaderField>,
    items_touched: bool,
    closed: bool,
}

impl InvoiceFormController {
    /// Start a create session dated today (UTC).
    pub fn create() -> Self {
        Self::create_dated(Utc::now().date_naive())
    }

    /// Start a create session with an explicit default invoice date.
    pub fn create_dated(invoice_date: NaiveDate) -> Self {
        let mut form = Self {
            mode: FormMode::Create,
            invoice_number: None,
            from_name: String::new(),
            from_address: String::new(),
            to_name: String::new(),
            to_address: String::new(),
            invoice_date: Some(invoice_date),
            items: Vec::new(),
            total_amount: 0.0,
            header_touched: Vec::new(),
            items_touched: false,
            closed: false,
        };
        form.push_blank_item();
        form
    }

    /// Open a persisted invoice read-only. No recomputation happens here: the
    /// stored totals are displayed as-is.
    pub fn view(invoice: &Invoice) -> Self {
        let header = invoice.header();
        Self {
            mode: FormMode::View,
            invoice_number: Some(invoice.invoice_number().to_string()),
            from_name: header.from_name.clone(),
            from_address: header.from_address.clone(),
            to_name: header.to_name.clone(),
            to_address: header.to_address.clone(),
            invoice_date: Some(header.invoice_date),
            items: invoice.items().iter().map(FormItem::from_item).collect(),
            total_amount: invoice.total_amount(),
            header_touched: Vec::new(),
            items_touched: false,
            closed: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// The whole form is disabled in view mode.
    pub fn is_disabled(&self) -> bool {
        self.mode == FormMode::View
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Dialog title.
    pub fn title(&self) -> String {
        match (&self.mode, &self.invoice_number) {
            (FormMode::View, Some(number)) => format!("#{number}"),
            _ => "Create Invoice".to_string(),
        }
    }

    pub fn from_name(&self) -> &str {
        &self.from_name
    }

    pub fn from_address(&self) -> &str {
        &self.from_address
    }

    pub fn to_name(&self) -> &str {
        &self.to_name
    }

    pub fn to_address(&self) -> &str {
        &self.to_address
    }

    pub fn invoice_date(&self) -> Option<NaiveDate> {
        self.invoice_date
    }

    pub fn items(&self) -> &[FormItem] {
        &self.items
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn set_from_name(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        self.edit_header(HeaderField::FromName, |form| form.from_name = value)
    }

    pub fn set_from_address(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        self.edit_header(HeaderField::FromAddress, |form| form.from_address = value)
    }

    pub fn set_to_name(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        self.edit_header(HeaderField::ToName, |form| form.to_name = value)
    }

    pub fn set_to_address(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        self.edit_header(HeaderField::ToAddress, |form| form.to_address = value)
    }

    pub fn set_invoice_date(&mut self, value: Option<NaiveDate>) -> Result<(), FormError> {
        self.edit_header(HeaderField::InvoiceDate, |form| form.invoice_date = value)
    }

    /// Append a blank line and return its index.
    pub fn add_item(&mut self) -> Result<usize, FormError> {
        self.ensure_editable()?;
        self.items_touched = true;
        Ok(self.push_blank_item())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<FormItem, FormError> {
        self.ensure_editable()?;
        self.ensure_index(index)?;
        let removed = self.items.remove(index);
        self.items_touched = true;
        self.recompute_total();
        Ok(removed)
    }

    pub fn set_item_name(&mut self, index: usize, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.ensure_index(index)?;
        let item = &mut self.items[index];
        item.item_name = value.into();
        item.touched.item_name = true;
        Ok(())
    }

    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.ensure_index(index)?;
        let item = &mut self.items[index];
        item.quantity = quantity;
        item.touched.quantity = true;
        self.on_item_mutated(index);
        Ok(())
    }

    pub fn set_rate(&mut self, index: usize, rate: f64) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.ensure_index(index)?;
        let item = &mut self.items[index];
        item.rate = rate;
        item.touched.rate = true;
        self.on_item_mutated(index);
        Ok(())
    }

    /// Re-establish `item.total` and `total_amount` after a line changed.
    fn on_item_mutated(&mut self, index: usize) {
        let item = &mut self.items[index];
        item.total = item.line_total();
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total_amount = aggregation::invoice_total(&self.items);
    }

    /// All failures, regardless of whether the user has interacted with the field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        for field in HeaderField::ALL {
            if self.header_is_missing(field) {
                errors.push(FieldError {
                    field: FieldPath::Header(field),
                    kind: FieldErrorKind::Required,
                });
            }
        }

        if self.items.is_empty() {
            errors.push(FieldError {
                field: FieldPath::Items,
                kind: FieldErrorKind::NoItems,
            });
        }
        for (index, item) in self.items.iter().enumerate() {
            item.errors(index, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Failures the user should currently see: only those on touched fields.
    pub fn visible_errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .0
                .into_iter()
                .filter(|e| self.is_touched(e.field))
                .collect(),
        }
    }

    pub fn is_touched(&self, field: FieldPath) -> bool {
        match field {
            FieldPath::Header(field) => self.header_touched.contains(&field),
            FieldPath::Item { index, field } => {
                self.items.get(index).is_some_and(|item| item.is_touched(field))
            }
            FieldPath::Items => self.items_touched,
        }
    }

    /// Mark every control as interacted with so all failures become visible.
    pub fn mark_all_touched(&mut self) {
        self.header_touched = HeaderField::ALL.to_vec();
        self.items_touched = true;
        for item in &mut self.items {
            item.touched = ItemTouched {
                item_name: true,
                quantity: true,
                rate: true,
            };
        }
    }

    /// Validate and, on success, terminate the session with the form values.
    ///
    /// On failure every field is marked touched and nothing is saved.
    pub fn save(&mut self) -> Result<FormOutcome, FormError> {
        self.ensure_editable()?;

        if let Err(errors) = self.validate() {
            self.mark_all_touched();
            tracing::debug!(failures = errors.len(), "invoice form save refused");
            return Err(FormError::Invalid(errors));
        }

        let draft = self.to_draft()?;
        self.closed = true;
        tracing::info!(
            items = draft.items().len(),
            total_amount = draft.total_amount(),
            "invoice form saved"
        );
        Ok(FormOutcome::Saved(draft))
    }

    /// Dismiss the form without saving.
    pub fn close(&mut self) -> Result<FormOutcome, FormError> {
        if self.closed {
            return Err(FormError::Closed);
        }
        self.closed = true;
        Ok(FormOutcome::Cancelled)
    }

    fn to_draft(&self) -> Result<InvoiceDraft, FormError> {
        let invoice_date = self.invoice_date.ok_or_else(|| {
            DomainError::invariant("invoice date missing after validation")
        })?;
        let header = InvoiceHeader {
            from_name: self.from_name.clone(),
            from_address: self.from_address.clone(),
            to_name: self.to_name.clone(),
            to_address: self.to_address.clone(),
            invoice_date,
        };

        let mut items = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let quantity = u32::try_from(item.quantity)
                .map_err(|_| DomainError::invariant("item quantity out of range"))?;
            items.push(InvoiceItem::new(item.item_name.clone(), quantity, item.rate)?);
        }

        Ok(InvoiceDraft::new(header, items)?)
    }

    fn header_is_missing(&self, field: HeaderField) -> bool {
        match field {
            HeaderField::FromName => is_blank(&self.from_name),
            HeaderField::FromAddress => is_blank(&self.from_address),
            HeaderField::ToName => is_blank(&self.to_name),
            HeaderField::ToAddress => is_blank(&self.to_address),
            HeaderField::InvoiceDate => self.invoice_date.is_none(),
        }
    }

    fn edit_header(
        &mut self,
        field: HeaderField,
        apply: impl FnOnce(&mut Self),
    ) -> Result<(), FormError> {
        self.ensure_editable()?;
        apply(self);
        if !self.header_touched.contains(&field) {
            self.header_touched.push(field);
        }
        Ok(())
    }

    fn push_blank_item(&mut self) -> usize {
        self.items.push(FormItem::blank());
        let index = self.items.len() - 1;
        self.on_item_mutated(index);
        index
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        if self.closed {
            return Err(FormError::Closed);
        }
        if self.mode == FormMode::View {
            return Err(FormError::ReadOnly);
        }
        Ok(())
    }

    fn ensure_index(&self, index: usize) -> Result<(), FormError> {
        if index >= self.items.len() {
            return Err(FormError::ItemOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}
