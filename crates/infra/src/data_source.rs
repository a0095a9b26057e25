//! Data sources the list orchestrator pulls invoices from.
//!
//! The query itself is synchronous; a source may suspend around it (network
//! round trip, simulated latency) but never exposes intermediate state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use invoicedesk_core::{DomainError, Entity};
use invoicedesk_invoicing::{Invoice, InvoiceDraft};

use crate::config::DeskConfig;
use crate::query::{self, QueryParams, QueryResult};
use crate::repository::InvoiceRepository;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataSourceError {
    /// The backing service failed or could not be reached.
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Repository(#[from] DomainError),
}

/// Request/response contract between the list view and whatever serves invoices.
#[async_trait]
pub trait InvoiceDataSource: Send + Sync {
    async fn fetch_invoices(&self, params: QueryParams) -> Result<QueryResult, DataSourceError>;

    /// Create an invoice from validated form values.
    async fn save_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, DataSourceError>;
}

#[async_trait]
impl<T> InvoiceDataSource for Arc<T>
where
    T: InvoiceDataSource + ?Sized,
{
    async fn fetch_invoices(&self, params: QueryParams) -> Result<QueryResult, DataSourceError> {
        (**self).fetch_invoices(params).await
    }

    async fn save_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, DataSourceError> {
        (**self).save_invoice(draft).await
    }
}

/// Serves queries straight from a repository, optionally delaying each
/// response to mimic a remote backend.
#[derive(Debug)]
pub struct LocalDataSource<R> {
    repository: R,
    latency: Duration,
}

impl<R> LocalDataSource<R>
where
    R: InvoiceRepository,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            latency: Duration::ZERO,
        }
    }

    pub fn from_config(repository: R, config: &DeskConfig) -> Self {
        Self::new(repository).with_latency(config.latency())
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

#[async_trait]
impl<R> InvoiceDataSource for LocalDataSource<R>
where
    R: InvoiceRepository,
{
    async fn fetch_invoices(&self, params: QueryParams) -> Result<QueryResult, DataSourceError> {
        let result = query::execute(self.repository.snapshot(), &params);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        tracing::debug!(
            page = params.page,
            limit = params.limit,
            returned = result.data.len(),
            total = result.total,
            "invoice query completed"
        );
        Ok(result)
    }

    async fn save_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, DataSourceError> {
        let invoice = self.repository.append(draft)?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        tracing::info!(
            invoice_id = %invoice.id(),
            invoice_number = invoice.invoice_number(),
            total_amount = invoice.total_amount(),
            "invoice created"
        );
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortOrder;
    use crate::repository::InMemoryInvoiceRepository;
    use chrono::NaiveDate;
    use invoicedesk_invoicing::{InvoiceHeader, InvoiceItem};

    fn source(count: usize) -> LocalDataSource<Arc<InMemoryInvoiceRepository>> {
        LocalDataSource::new(Arc::new(InMemoryInvoiceRepository::seeded(count).unwrap()))
    }

    #[tokio::test]
    async fn fetch_runs_the_query_engine() {
        let source = source(50);
        let params = QueryParams::page(2, 5).sorted_by("id", SortOrder::Asc);

        let result = source.fetch_invoices(params).await.unwrap();
        assert_eq!(result.total, 50);
        let ids: Vec<u64> = result.data.iter().map(|i| i.id().get()).collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10]);
    }

    #[tokio::test]
    async fn save_appends_to_the_repository() {
        let source = source(2);
        let draft = InvoiceDraft::new(
            InvoiceHeader {
                from_name: "ABC Corp".to_string(),
                from_address: "1 Main St".to_string(),
                to_name: "XYZ Ltd".to_string(),
                to_address: "2 High St".to_string(),
                invoice_date: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
            },
            vec![InvoiceItem::new("Audit", 3, 40.0).unwrap()],
        )
        .unwrap();

        let saved = source.save_invoice(draft).await.unwrap();
        assert_eq!(saved.invoice_number(), "INV003");
        assert_eq!(saved.total_amount(), 120.0);
        assert_eq!(source.repository().len(), 3);

        let found = source
            .fetch_invoices(QueryParams::page(1, 5).with_global_filter("xyz"))
            .await
            .unwrap();
        assert_eq!(found.total, 1);
    }

    #[tokio::test]
    async fn latency_is_applied() {
        let source = source(1).with_latency(Duration::from_millis(20));
        let started = std::time::Instant::now();
        source.fetch_invoices(QueryParams::default()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
