//! Infrastructure layer: invoice repository, query engine, data sources,
//! list orchestration and configuration.

pub mod config;
pub mod data_source;
pub mod orchestrator;
pub mod query;
pub mod repository;
pub mod services;

pub use config::DeskConfig;
pub use data_source::{DataSourceError, InvoiceDataSource, LocalDataSource};
pub use orchestrator::{ListView, PageChangeEvent, QueryOrchestrator};
pub use query::{QueryParams, QueryResult, SortOrder};
pub use repository::{InMemoryInvoiceRepository, InvoiceRepository};
pub use services::{DeskServices, build_services};
