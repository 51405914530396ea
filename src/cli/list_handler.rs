use crate::api::models::list_items;
use crate::api::params::{
    CohortsParams, FilterFieldsParams, FilterValuesParams, HistoryListParams, NoteTypesParams,
};
use crate::cli::main_types::{HistoryListArgs, ListCommands};
use crate::core::context::AppContext;
use crate::core::entities::{ASSERTION_TYPES, ENTITY_TYPES, catalog_as_json, entries_as_json};
use crate::display::formats::{
    CATALOG_CSV_FIELDS, COHORT_CSV_FIELDS, FILTER_FIELD_CSV_FIELDS, FILTER_VALUE_CSV_FIELDS,
    HISTORY_CSV_FIELDS, NOTE_TYPE_CSV_FIELDS,
};
use crate::display::{OutputFormat, TableDisplay, render_csv, render_json};
use crate::error::AppError;

#[derive(Default)]
pub struct ListHandler;

impl ListHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, command: ListCommands, context: &AppContext) -> Result<(), AppError> {
        let output = match command {
            ListCommands::Cohorts { limit, format } => {
                let client = context.create_client()?;
                let response = client
                    .list_indexed_cohorts(&CohortsParams { limit })
                    .await?;
                let items = list_items(&response, "items");
                match format {
                    OutputFormat::Json => render_json(&response)?,
                    OutputFormat::Csv => render_csv(items, COHORT_CSV_FIELDS)?,
                    OutputFormat::Table => TableDisplay::new().render_cohorts(&response, items),
                }
            }
            ListCommands::Notetypes {
                search,
                limit,
                offset,
                format,
            } => {
                let params = NoteTypesParams {
                    search: search.filter(|s| !s.is_empty()),
                    limit,
                    offset,
                };
                let client = context.create_client()?;
                let response = client.list_note_types(&params).await?;
                let items = list_items(&response, "items");
                match format {
                    OutputFormat::Json => render_json(&response)?,
                    OutputFormat::Csv => render_csv(items, NOTE_TYPE_CSV_FIELDS)?,
                    OutputFormat::Table => TableDisplay::new().render_note_types(&response, items),
                }
            }
            ListCommands::History(args) => {
                let format = args.format;
                let client = context.create_client()?;
                let response = client
                    .list_search_history(&history_params(args))
                    .await?;
                let items = list_items(&response, "items");
                match format {
                    OutputFormat::Json => render_json(&response)?,
                    OutputFormat::Csv => render_csv(items, HISTORY_CSV_FIELDS)?,
                    OutputFormat::Table => {
                        TableDisplay::new().render_history_list(&response, items)
                    }
                }
            }
            ListCommands::Entities { format } => entity_catalog(format)?,
            ListCommands::Filters {
                namespace,
                field,
                category,
                limit,
                format,
            } => {
                let client = context.create_client()?;
                match field.filter(|f| !f.is_empty()) {
                    Some(field) => {
                        let response = client
                            .list_filter_values(&namespace, &field, &FilterValuesParams { limit })
                            .await?;
                        let values = list_items(&response, "values");
                        match format {
                            OutputFormat::Json => render_json(&response)?,
                            OutputFormat::Csv => render_csv(values, FILTER_VALUE_CSV_FIELDS)?,
                            OutputFormat::Table => {
                                TableDisplay::new().render_filter_values(&response, values, &field)
                            }
                        }
                    }
                    None => {
                        let params = FilterFieldsParams {
                            field_category: category,
                        };
                        let response = client.list_filter_fields(&namespace, &params).await?;
                        let fields = list_items(&response, "fields");
                        match format {
                            OutputFormat::Json => render_json(&response)?,
                            OutputFormat::Csv => render_csv(fields, FILTER_FIELD_CSV_FIELDS)?,
                            OutputFormat::Table => {
                                TableDisplay::new().render_filter_fields(fields, &namespace)
                            }
                        }
                    }
                }
            }
        };

        println!("{}", output);
        Ok(())
    }
}

fn history_params(args: HistoryListArgs) -> HistoryListParams {
    let non_empty = |value: Option<String>| value.filter(|s| !s.is_empty());
    HistoryListParams {
        page: args.page,
        page_size: args.page_size,
        user_id: non_empty(args.user_id),
        search_type: args.search_type,
        query: non_empty(args.query),
        date_from: non_empty(args.date_from),
        date_to: non_empty(args.date_to),
    }
}

// Static data; no client is created.
fn entity_catalog(format: OutputFormat) -> Result<String, AppError> {
    let output = match format {
        OutputFormat::Json => render_json(&catalog_as_json())?,
        OutputFormat::Csv => format!(
            "# Entity Types\n{}\n\n# Assertion Types\n{}",
            render_csv(&entries_as_json(ENTITY_TYPES), CATALOG_CSV_FIELDS)?,
            render_csv(&entries_as_json(ASSERTION_TYPES), CATALOG_CSV_FIELDS)?
        ),
        OutputFormat::Table => TableDisplay::new().render_entity_catalog(),
    };
    Ok(output)
}
