use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use invoicedesk_invoicing::Invoice;

pub const DEFAULT_SORT_FIELD: &str = "invoiceDate";
const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filter, sort and page parameters for one query.
///
/// Unrecognized keys are ignored on deserialization. Field names are kept as
/// text so unknown names can be reported and skipped instead of failing the
/// whole request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// 1-based page index.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Page size. Callers must send at least 1.
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub global_filter: String,
    /// Field name to substring; empty values are ignored.
    #[serde(default, rename = "filters", alias = "fieldFilters")]
    pub field_filters: BTreeMap<String, String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_field() -> String {
    DEFAULT_SORT_FIELD.to_string()
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            sort_field: default_sort_field(),
            sort_order: SortOrder::default(),
            global_filter: String::new(),
            field_filters: BTreeMap::new(),
        }
    }
}

impl QueryParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = field.into();
        self.sort_order = order;
        self
    }

    pub fn with_global_filter(mut self, filter: impl Into<String>) -> Self {
        self.global_filter = filter.into();
        self
    }

    pub fn with_field_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.field_filters.insert(field.into(), value.into());
        self
    }
}

/// One page of matching invoices plus the number of matches across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub data: Vec<Invoice>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_shape_with_defaults() {
        let params: QueryParams = serde_json::from_value(serde_json::json!({
            "page": 2,
            "limit": 10,
            "sortOrder": "desc",
            "globalFilter": "abc",
            "filters": { "fromName": "corp", "toName": "" },
            "somethingElse": true
        }))
        .unwrap();

        assert_eq!(params.page, 2);
        assert_eq!(params.limit, 10);
        assert_eq!(params.sort_field, "invoiceDate");
        assert_eq!(params.sort_order, SortOrder::Desc);
        assert_eq!(params.global_filter, "abc");
        assert_eq!(params.field_filters.get("fromName").map(String::as_str), Some("corp"));
    }

    #[test]
    fn accepts_field_filters_alias() {
        let params: QueryParams = serde_json::from_value(serde_json::json!({
            "fieldFilters": { "toName": "ltd" }
        }))
        .unwrap();

        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 5);
        assert_eq!(params.field_filters.len(), 1);
    }

    #[test]
    fn serializes_filters_under_wire_key() {
        let params = QueryParams::page(1, 5).with_field_filter("invoiceNumber", "INV");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["filters"]["invoiceNumber"], "INV");
        assert_eq!(value["sortOrder"], "asc");
    }
}
