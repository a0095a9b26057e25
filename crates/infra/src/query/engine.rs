use std::collections::BTreeMap;

use invoicedesk_invoicing::Invoice;

use crate::query::field::{FieldValue, InvoiceField};
use crate::query::params::{QueryParams, QueryResult, SortOrder};

/// Fields searched by the global filter (OR-combined).
const GLOBAL_FILTER_FIELDS: [InvoiceField; 4] = [
    InvoiceField::InvoiceNumber,
    InvoiceField::FromName,
    InvoiceField::ToName,
    InvoiceField::TotalAmount,
];

/// Run a query over an owned snapshot of the record set.
///
/// Preconditions: `params.limit >= 1` and `params.page >= 1`. A zero limit
/// yields an empty page (with the correct `total`), a zero page is read as
/// page 1; both are logged.
pub fn execute(snapshot: Vec<Invoice>, params: &QueryParams) -> QueryResult {
    let mut records = snapshot;

    apply_global_filter(&mut records, &params.global_filter);
    apply_field_filters(&mut records, &params.field_filters);
    sort(&mut records, &params.sort_field, params.sort_order);

    paginate(records, params.page, params.limit)
}

fn contains(value: FieldValue<'_>, needle: &str) -> bool {
    value
        .search_text()
        .is_some_and(|text| text.contains(needle))
}

fn apply_global_filter(records: &mut Vec<Invoice>, filter: &str) {
    if filter.is_empty() {
        return;
    }
    let needle = filter.to_lowercase();
    records.retain(|inv| {
        GLOBAL_FILTER_FIELDS
            .iter()
            .any(|field| contains(field.value_of(inv), &needle))
    });
}

fn apply_field_filters(records: &mut Vec<Invoice>, filters: &BTreeMap<String, String>) {
    for (name, value) in filters {
        if value.is_empty() {
            continue;
        }
        let field = match name.parse::<InvoiceField>() {
            Ok(field) if field.is_scalar() => field,
            Ok(_) | Err(_) => {
                tracing::debug!(field = %name, "ignoring filter on unsupported field");
                continue;
            }
        };
        let needle = value.to_lowercase();
        records.retain(|inv| contains(field.value_of(inv), &needle));
    }
}

fn sort(records: &mut [Invoice], sort_field: &str, order: SortOrder) {
    let field = match sort_field.parse::<InvoiceField>() {
        Ok(field) if field.is_scalar() => field,
        Ok(_) | Err(_) => {
            tracing::warn!(field = %sort_field, "unsupported sort field; keeping original order");
            return;
        }
    };

    // `sort_by` is stable; flipping the comparison keeps ties in original order
    // for both directions.
    records.sort_by(|a, b| {
        let ord = field.value_of(a).compare(&field.value_of(b));
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

fn paginate(records: Vec<Invoice>, page: u32, limit: u32) -> QueryResult {
    let total = records.len();

    if limit == 0 {
        tracing::warn!(total, "query with page size 0; returning an empty page");
        return QueryResult {
            data: Vec::new(),
            total,
        };
    }
    let page = if page == 0 {
        tracing::warn!("query with page 0; reading page 1");
        1
    } else {
        page
    };

    let limit = limit as usize;
    let start = (page as usize - 1).saturating_mul(limit);
    let data = records.into_iter().skip(start).take(limit).collect();

    QueryResult { data, total }
}
