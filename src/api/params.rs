//! Typed query parameters, one struct per endpoint.
//!
//! Optional inputs are `Option`s and are left out of the query string when
//! `None`; nothing is ever sent as an explicit null.

use super::models::{DistinctMode, FieldCategory, SearchType};
use crate::core::filters::FilterExpression;
use serde_json::Value;

pub type QueryPairs = Vec<(&'static str, String)>;

/// Renders a parameter struct as ordered query pairs.
pub trait QueryParams {
    fn query_pairs(&self) -> QueryPairs;
}

fn push_opt<T: ToString>(pairs: &mut QueryPairs, name: &'static str, value: &Option<T>) {
    if let Some(v) = value {
        pairs.push((name, v.to_string()));
    }
}

pub const DEFAULT_K: u32 = 10;
pub const DEFAULT_VECTOR_WEIGHT: f64 = 0.7;
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.7;
pub const DEFAULT_CHUNK_MULTIPLIER: f64 = 2.0;

/// `GET /search`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub query: String,
    pub search_type: SearchType,
    pub k: u32,
    pub distinct: DistinctMode,
    pub rerank: bool,
    pub vector_weight: f64,
    pub distance_threshold: f64,
    pub chunk_multiplier: f64,
    pub cohort_ids: Option<String>,
    pub include_noise: bool,
    pub top_k_retrieval: Option<u32>,
    pub min_quality_score: Option<f64>,
    pub min_chunk_quality_score: Option<f64>,
    pub filters: Option<FilterExpression>,
    pub entity_filters: Option<Value>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_type: SearchType::default(),
            k: DEFAULT_K,
            distinct: DistinctMode::default(),
            rerank: true,
            vector_weight: DEFAULT_VECTOR_WEIGHT,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            chunk_multiplier: DEFAULT_CHUNK_MULTIPLIER,
            cohort_ids: None,
            include_noise: false,
            top_k_retrieval: None,
            min_quality_score: None,
            min_chunk_quality_score: None,
            filters: None,
            entity_filters: None,
        }
    }
}

impl QueryParams for SearchParams {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs: QueryPairs = vec![
            ("query", self.query.clone()),
            ("search-type", self.search_type.as_str().to_string()),
            ("k", self.k.to_string()),
            ("distinct", self.distinct.as_str().to_string()),
            ("rerank", self.rerank.to_string()),
            ("vector_weight", self.vector_weight.to_string()),
            ("distance_threshold", self.distance_threshold.to_string()),
            ("chunk-multiplier", self.chunk_multiplier.to_string()),
        ];

        push_opt(&mut pairs, "cohort-ids", &self.cohort_ids);
        if self.include_noise {
            pairs.push(("include-noise", "true".to_string()));
        }
        push_opt(&mut pairs, "top_k_retrieval", &self.top_k_retrieval);
        push_opt(&mut pairs, "min-quality-score", &self.min_quality_score);
        push_opt(
            &mut pairs,
            "min-chunk-quality-score",
            &self.min_chunk_quality_score,
        );
        if let Some(filters) = &self.filters {
            pairs.push(("filters", filters.to_json_string()));
        }
        push_opt(&mut pairs, "entity-filters", &self.entity_filters);

        pairs
    }
}

/// `GET /cohorts/indexed`
#[derive(Debug, Clone, PartialEq)]
pub struct CohortsParams {
    pub limit: u32,
}

impl QueryParams for CohortsParams {
    fn query_pairs(&self) -> QueryPairs {
        vec![("limit", self.limit.to_string())]
    }
}

/// `GET /note-types`
#[derive(Debug, Clone, PartialEq)]
pub struct NoteTypesParams {
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl QueryParams for NoteTypesParams {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs: QueryPairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        push_opt(&mut pairs, "search", &self.search);
        pairs
    }
}

/// `GET /search-history`
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryListParams {
    pub page: u32,
    pub page_size: u32,
    pub user_id: Option<String>,
    pub search_type: Option<SearchType>,
    pub query: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl QueryParams for HistoryListParams {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs: QueryPairs = vec![
            ("page", self.page.to_string()),
            ("page-size", self.page_size.to_string()),
        ];
        push_opt(&mut pairs, "user-id", &self.user_id);
        if let Some(search_type) = self.search_type {
            pairs.push(("search-type", search_type.as_str().to_string()));
        }
        push_opt(&mut pairs, "query", &self.query);
        push_opt(&mut pairs, "date-from", &self.date_from);
        push_opt(&mut pairs, "date-to", &self.date_to);
        pairs
    }
}

/// `GET /search-history/stats/summary`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStatsParams {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl QueryParams for HistoryStatsParams {
    fn query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_opt(&mut pairs, "date-from", &self.date_from);
        push_opt(&mut pairs, "date-to", &self.date_to);
        pairs
    }
}

/// `GET /namespaces/{ns}/filter-fields`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterFieldsParams {
    pub field_category: Option<FieldCategory>,
}

impl QueryParams for FilterFieldsParams {
    fn query_pairs(&self) -> QueryPairs {
        self.field_category
            .map(|category| vec![("field_category", category.as_str().to_string())])
            .unwrap_or_default()
    }
}

/// `GET /namespaces/{ns}/filter-values/{field}`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterValuesParams {
    pub limit: u32,
}

impl QueryParams for FilterValuesParams {
    fn query_pairs(&self) -> QueryPairs {
        vec![("limit", self.limit.to_string())]
    }
}
