use crate::api::models::list_items;
use crate::api::params::SearchParams;
use crate::cli::main_types::SearchArgs;
use crate::core::context::AppContext;
use crate::core::filters::{NamedFilters, build_filters, is_blank_json};
use crate::display::formats::SEARCH_CSV_FIELDS;
use crate::display::{OutputFormat, TableDisplay, render_csv, render_json};
use crate::error::{AppError, CliError};
use crate::utils::validation::parse_json_arg;
use serde_json::{Value, json};

/// Turn `search` flags into request parameters.
///
/// JSON arguments are parsed here, so malformed `--filters` or
/// `--entity-filters` fail before any client exists.
pub fn build_search_params(args: &SearchArgs) -> Result<SearchParams, CliError> {
    let user_filters = parse_json_arg(non_empty(&args.filters), "--filters")?;
    let entity_filters = parse_json_arg(non_empty(&args.entity_filters), "--entity-filters")?
        .filter(|v| !is_blank_json(v));

    let named = NamedFilters {
        patient_id: args.patient_id.clone(),
        encounter_id: args.encounter_id.clone(),
        note_types: args.note_types.clone(),
        date_from: args.date_from.clone(),
        date_to: args.date_to.clone(),
    };

    Ok(SearchParams {
        query: args.query.clone(),
        search_type: args.search_type,
        k: args.k,
        distinct: args.distinct,
        rerank: args.rerank,
        vector_weight: args.vector_weight,
        distance_threshold: args.distance_threshold,
        chunk_multiplier: args.chunk_multiplier,
        cohort_ids: non_empty(&args.cohort_ids).map(str::to_string),
        include_noise: args.include_noise,
        top_k_retrieval: args.top_k_retrieval.filter(|&n| n > 0),
        min_quality_score: args.min_quality_score,
        min_chunk_quality_score: args.min_chunk_quality_score,
        filters: build_filters(&named, user_filters),
        entity_filters,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Default)]
pub struct SearchHandler;

impl SearchHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, args: SearchArgs, context: &AppContext) -> Result<(), AppError> {
        let params = build_search_params(&args)?;
        if let Some(filters) = &params.filters {
            log::debug!("Compiled filters: {}", filters.to_json_string());
        }

        let client = context.create_client()?;
        let response = client.search(&params).await?;

        let results = list_items(&response, "results");
        let empty = json!({});
        let metadata: &Value = response.get("metadata").unwrap_or(&empty);

        let output = match args.format {
            OutputFormat::Json => render_json(&response)?,
            OutputFormat::Csv => render_csv(results, SEARCH_CSV_FIELDS)?,
            OutputFormat::Table => {
                TableDisplay::new().render_search_results(results, metadata, args.full_text)
            }
        };

        println!("{}", output);
        Ok(())
    }
}
