//! Wiring of the in-process invoice desk.

use std::sync::Arc;

use invoicedesk_core::{DomainResult, InvoiceId};
use invoicedesk_invoicing::InvoiceFormController;

use crate::config::DeskConfig;
use crate::data_source::LocalDataSource;
use crate::orchestrator::{PageChangeEvent, QueryOrchestrator};
use crate::repository::{InMemoryInvoiceRepository, InvoiceRepository};

pub type DeskDataSource = LocalDataSource<Arc<InMemoryInvoiceRepository>>;

/// Shared repository plus the list orchestrator reading from it.
pub struct DeskServices {
    pub repository: Arc<InMemoryInvoiceRepository>,
    pub orchestrator: QueryOrchestrator<DeskDataSource>,
    initial_page: PageChangeEvent,
}

impl DeskServices {
    /// The event the list issues when it is first shown: page 1, default sort.
    pub fn initial_page(&self) -> PageChangeEvent {
        self.initial_page.clone()
    }

    /// Open a stored invoice in a read-only form, or `None` for an unknown id.
    pub fn open_invoice(&self, id: InvoiceId) -> Option<InvoiceFormController> {
        let invoice = self.repository.get(id)?;
        Some(InvoiceFormController::view(&invoice))
    }
}

pub fn build_services(config: &DeskConfig) -> DomainResult<DeskServices> {
    let repository = Arc::new(InMemoryInvoiceRepository::seeded(config.seed_count)?);
    let source = LocalDataSource::from_config(Arc::clone(&repository), config);

    tracing::info!(
        seed_count = config.seed_count,
        page_size = config.page_size,
        latency_ms = config.latency_ms,
        "invoice desk services ready"
    );

    Ok(DeskServices {
        repository,
        orchestrator: QueryOrchestrator::new(source),
        initial_page: PageChangeEvent::new(0, config.page_size),
    })
}
