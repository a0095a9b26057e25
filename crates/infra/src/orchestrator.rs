//! List orchestration: turns table page-change events into queries and keeps
//! the displayed page, the total count and the loading flag consistent.
//!
//! Requests are numbered as they are issued. Only the response to the most
//! recently issued request may update the displayed state; older responses that
//! arrive late are returned to their caller but otherwise discarded.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use invoicedesk_invoicing::{FormOutcome, Invoice};

use crate::data_source::{DataSourceError, InvoiceDataSource};
use crate::query::{DEFAULT_SORT_FIELD, QueryParams, QueryResult, SortOrder};

/// Field filters shown in the list header, initially empty.
const DEFAULT_FILTER_FIELDS: [&str; 3] = ["invoiceNumber", "fromName", "toName"];

/// Lazy-load event emitted by a paginated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChangeEvent {
    /// Zero-based offset of the first row.
    pub first: u32,
    /// Page size.
    pub rows: u32,
    #[serde(default)]
    pub sort_field: Option<String>,
    /// `1` for ascending, anything else for descending.
    #[serde(default = "ascending")]
    pub sort_order: i8,
}

fn ascending() -> i8 {
    1
}

impl PageChangeEvent {
    pub fn new(first: u32, rows: u32) -> Self {
        Self {
            first,
            rows,
            sort_field: None,
            sort_order: ascending(),
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, sort_order: i8) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = sort_order;
        self
    }

    /// Translate into query parameters carrying the given filters.
    pub fn to_params(&self, global_filter: &str, filters: &BTreeMap<String, String>) -> QueryParams {
        let page = if self.rows == 0 {
            tracing::warn!(first = self.first, "page change event with 0 rows");
            1
        } else {
            (self.first / self.rows).saturating_add(1)
        };

        QueryParams {
            page,
            limit: self.rows,
            sort_field: self
                .sort_field
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_SORT_FIELD.to_string()),
            sort_order: if self.sort_order == 1 {
                SortOrder::Asc
            } else {
                SortOrder::Desc
            },
            global_filter: global_filter.to_string(),
            field_filters: filters.clone(),
        }
    }
}

/// What the list view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    pub invoices: Vec<Invoice>,
    pub total_records: usize,
    pub loading: bool,
}

#[derive(Debug)]
struct State {
    view: ListView,
    last_event: Option<PageChangeEvent>,
    global_filter: String,
    filters: BTreeMap<String, String>,
    /// Sequence number of the most recently issued request.
    issued: u64,
}

/// Clears `loading` if a request is abandoned before its response arrives.
struct InFlight<'a> {
    state: &'a Mutex<State>,
    seq: u64,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.issued == self.seq {
            tracing::debug!(seq = self.seq, "invoice query abandoned");
            state.view.loading = false;
        }
    }
}

#[derive(Debug)]
pub struct QueryOrchestrator<D> {
    source: D,
    state: Mutex<State>,
}

impl<D> QueryOrchestrator<D>
where
    D: InvoiceDataSource,
{
    pub fn new(source: D) -> Self {
        let filters = DEFAULT_FILTER_FIELDS
            .iter()
            .map(|f| (f.to_string(), String::new()))
            .collect();

        Self {
            source,
            state: Mutex::new(State {
                view: ListView::default(),
                last_event: None,
                global_filter: String::new(),
                filters,
                issued: 0,
            }),
        }
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    // The guarded state is plain data and every update leaves it consistent,
    // so a poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> ListView {
        self.lock().view.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().view.loading
    }

    pub fn invoices(&self) -> Vec<Invoice> {
        self.lock().view.invoices.clone()
    }

    pub fn total_records(&self) -> usize {
        self.lock().view.total_records
    }

    pub fn last_event(&self) -> Option<PageChangeEvent> {
        self.lock().last_event.clone()
    }

    pub fn global_filter(&self) -> String {
        self.lock().global_filter.clone()
    }

    pub fn field_filters(&self) -> BTreeMap<String, String> {
        self.lock().filters.clone()
    }

    pub fn set_global_filter(&self, filter: impl Into<String>) {
        self.lock().global_filter = filter.into();
    }

    pub fn set_field_filter(&self, field: impl Into<String>, value: impl Into<String>) {
        self.lock().filters.insert(field.into(), value.into());
    }

    /// Empty the global filter and every field filter (field names are kept).
    pub fn clear_filters(&self) {
        let mut state = self.lock();
        state.global_filter.clear();
        state.filters.values_mut().for_each(String::clear);
    }

    /// Load the page described by `event` with the current filters.
    ///
    /// `loading` is set before the data source is called and cleared when the
    /// latest request completes, whether it succeeded or failed. A failure
    /// leaves the displayed page untouched. Dropping the returned future while
    /// it is the latest request also clears `loading`.
    pub async fn run_query(&self, event: PageChangeEvent) -> Result<QueryResult, DataSourceError> {
        let (seq, params) = {
            let mut state = self.lock();
            state.issued += 1;
            state.view.loading = true;
            let params = event.to_params(&state.global_filter, &state.filters);
            state.last_event = Some(event);
            (state.issued, params)
        };
        let mut in_flight = InFlight {
            state: &self.state,
            seq,
            armed: true,
        };

        let outcome = self.source.fetch_invoices(params).await;
        in_flight.armed = false;

        let mut state = self.lock();
        if seq != state.issued {
            tracing::debug!(seq, latest = state.issued, "discarding stale invoice page");
            return outcome;
        }

        state.view.loading = false;
        match &outcome {
            Ok(result) => {
                state.view.invoices = result.data.clone();
                state.view.total_records = result.total;
            }
            Err(err) => {
                tracing::warn!(error = %err, "invoice query failed; keeping previous page");
            }
        }
        outcome
    }

    /// Re-run the last query from the first page, e.g. after the filters changed.
    ///
    /// Returns `None` when no page has been requested yet.
    pub async fn search(&self) -> Option<Result<QueryResult, DataSourceError>> {
        let event = {
            let mut state = self.lock();
            let event = state.last_event.as_mut()?;
            event.first = 0;
            event.clone()
        };
        Some(self.run_query(event).await)
    }

    /// React to the create form closing: persist a saved draft and reload the
    /// current page. Returns the created invoice, if any.
    pub async fn handle_form_outcome(
        &self,
        outcome: FormOutcome,
    ) -> Result<Option<Invoice>, DataSourceError> {
        let draft = match outcome {
            FormOutcome::Saved(draft) => draft,
            FormOutcome::Cancelled => return Ok(None),
        };

        let invoice = self.source.save_invoice(draft).await?;

        // The invoice is persisted at this point; a failed reload only leaves
        // the previous page on screen.
        let event = self.last_event();
        if let Some(event) = event {
            if let Err(err) = self.run_query(event).await {
                tracing::warn!(
                    error = %err,
                    invoice_number = invoice.invoice_number(),
                    "reload after invoice creation failed"
                );
            }
        }
        Ok(Some(invoice))
    }
}
