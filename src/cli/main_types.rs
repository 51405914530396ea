use crate::api::models::{DistinctMode, FieldCategory, SearchType};
use crate::api::params::{
    DEFAULT_CHUNK_MULTIPLIER, DEFAULT_DISTANCE_THRESHOLD, DEFAULT_K, DEFAULT_VECTOR_WEIGHT,
};
use crate::display::{OutputFormat, ReportFormat};
use crate::utils::validation::{parse_bool_flag, parse_timeout_secs};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "trioexplorer")]
#[command(about = "Command-line interface for the Search API")]
#[command(version)]
#[command(after_help = "Examples:
  trioexplorer search \"chest pain\"                      # Hybrid search, top 10
  trioexplorer search \"sepsis\" -k 25 -t semantic        # Semantic search, top 25
  trioexplorer search \"fever\" --note-types \"Progress Note,Discharge Summary\"
  trioexplorer search \"copd\" -o json                    # Output as JSON
  trioexplorer list cohorts                             # List indexed cohorts
  trioexplorer list history --page 2                    # Browse search history
  trioexplorer get history <ID>                         # Show one history entry
  trioexplorer stats history                            # Search history statistics

Environment Variables:
  TRIOEXPLORER_API_KEY   Search API key (required for API commands)
  TRIOEXPLORER_API_URL   Search API base URL")]
pub struct Cli {
    /// Enable request/response logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override TRIOEXPLORER_API_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (default: 60)
    #[arg(long, global = true, value_name = "SECS", value_parser = parse_timeout_secs)]
    pub timeout: Option<Duration>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search clinical notes
    Search(SearchArgs),
    /// List resources (cohorts, notetypes, history, entities, filters)
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Get a specific resource by ID
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },
    /// Get statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },
    /// Configuration management (show, set)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Search clinical notes with various filters and options
#[derive(Args, Debug, Clone)]
#[command(after_help = "Examples:
  trioexplorer search \"chest pain\" --patient-id 7f3c...     # One patient
  trioexplorer search \"pneumonia\" --date-from 2024-01-01 --date-to 2024-06-30
  trioexplorer search \"diabetes\" -f '[\"note_type\",\"Eq\",\"Progress Note\"]'
  trioexplorer search \"cough\" -e '{\"symptoms_present\":[\"cough\"]}'
  trioexplorer search \"falls\" -o csv > falls.csv")]
pub struct SearchArgs {
    /// Search query text
    pub query: String,

    /// Number of results to return (1-300)
    #[arg(short, value_name = "NUM", default_value_t = DEFAULT_K)]
    pub k: u32,

    /// Search type
    #[arg(short = 't', long = "type", value_enum, default_value_t = SearchType::Hybrid)]
    pub search_type: SearchType,

    /// De-duplication mode
    #[arg(short, long, value_enum, default_value_t = DistinctMode::Encounter)]
    pub distinct: DistinctMode,

    /// Comma-separated cohort IDs
    #[arg(short, long, value_name = "IDS")]
    pub cohort_ids: Option<String>,

    /// Filter to specific patient UUID
    #[arg(long, value_name = "UUID", help_heading = "Filters")]
    pub patient_id: Option<String>,

    /// Filter to specific encounter UUID
    #[arg(long, value_name = "UUID", help_heading = "Filters")]
    pub encounter_id: Option<String>,

    /// Comma-separated note types (e.g. 'Progress Note,Discharge Summary')
    #[arg(long, value_name = "TYPES", help_heading = "Filters")]
    pub note_types: Option<String>,

    /// Filter from date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE", help_heading = "Filters")]
    pub date_from: Option<String>,

    /// Filter to date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE", help_heading = "Filters")]
    pub date_to: Option<String>,

    /// Metadata filters (JSON format)
    #[arg(short, long, value_name = "JSON", help_heading = "Filters")]
    pub filters: Option<String>,

    /// Entity/assertion filters (JSON format)
    #[arg(short, long, value_name = "JSON", help_heading = "Filters")]
    pub entity_filters: Option<String>,

    /// Include notes marked as noise
    #[arg(long, help_heading = "Ranking Options")]
    pub include_noise: bool,

    /// Apply reranking (true/false, yes/no, 1/0)
    #[arg(long, value_name = "BOOL", default_value = "true", value_parser = parse_bool_flag, action = clap::ArgAction::Set, help_heading = "Ranking Options")]
    pub rerank: bool,

    /// Vector weight in fusion (0.0-1.0)
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_VECTOR_WEIGHT, help_heading = "Ranking Options")]
    pub vector_weight: f64,

    /// Pre-reranking retrieval count
    #[arg(long, value_name = "NUM", help_heading = "Ranking Options")]
    pub top_k_retrieval: Option<u32>,

    /// Cosine distance cutoff (0.0-2.0)
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_DISTANCE_THRESHOLD, help_heading = "Ranking Options")]
    pub distance_threshold: f64,

    /// Initial retrieval multiplier (1.0-5.0)
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_CHUNK_MULTIPLIER, help_heading = "Ranking Options")]
    pub chunk_multiplier: f64,

    /// Minimum note quality score (0.0-1.0)
    #[arg(long, value_name = "FLOAT", help_heading = "Ranking Options")]
    pub min_quality_score: Option<f64>,

    /// Minimum chunk quality score (0.0-1.0)
    #[arg(long, value_name = "FLOAT", help_heading = "Ranking Options")]
    pub min_chunk_quality_score: Option<f64>,

    /// Output format
    #[arg(short = 'o', long = "format", value_enum, default_value_t = OutputFormat::Table, help_heading = "Output Options")]
    pub format: OutputFormat,

    /// Show full note text instead of the matching chunk
    #[arg(long, help_heading = "Output Options")]
    pub full_text: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// List indexed cohorts
    Cohorts {
        /// Maximum number of cohorts to return
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Output format
        #[arg(short = 'o', long = "format", value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List available note types
    Notetypes {
        /// Search note types by name
        #[arg(long, value_name = "TEXT")]
        search: Option<String>,
        /// Maximum number of note types to return
        #[arg(long, default_value_t = 100)]
        limit: u32,
        /// Number of note types to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Output format
        #[arg(short = 'o', long = "format", value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List search history
    History(HistoryListArgs),
    /// List available entity types for filtering (no API access needed)
    Entities {
        /// Output format
        #[arg(short = 'o', long = "format", value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List available filter fields, or the values of one field
    #[command(after_help = "Examples:
  trioexplorer list filters                              # Fields in the default namespace
  trioexplorer list filters --category entity_assertion  # Only entity/assertion fields
  trioexplorer list filters --field symptoms_present     # Values of one field")]
    Filters {
        /// Search index namespace
        #[arg(long, value_name = "NS", default_value = "default")]
        namespace: String,
        /// Get values for a specific field
        #[arg(long, value_name = "NAME")]
        field: Option<String>,
        /// Filter by field category
        #[arg(long, value_enum)]
        category: Option<FieldCategory>,
        /// Maximum values per field
        #[arg(long, default_value_t = 100)]
        limit: u32,
        /// Output format
        #[arg(short = 'o', long = "format", value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Args, Debug, Clone)]
pub struct HistoryListArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Number of items per page
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,
    /// Filter by user ID
    #[arg(long, value_name = "ID")]
    pub user_id: Option<String>,
    /// Filter by search type
    #[arg(long = "type", value_enum)]
    pub search_type: Option<SearchType>,
    /// Filter by query text
    #[arg(long, value_name = "TEXT")]
    pub query: Option<String>,
    /// Filter from date (ISO format)
    #[arg(long, value_name = "DATE")]
    pub date_from: Option<String>,
    /// Filter to date (ISO format)
    #[arg(long, value_name = "DATE")]
    pub date_to: Option<String>,
    /// Output format
    #[arg(short = 'o', long = "format", value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum GetCommands {
    /// Get a search history entry by ID
    History {
        /// Search history entry ID
        history_id: String,
        /// Output format
        #[arg(short = 'o', long = "format", value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// Get search history statistics
    History {
        /// Filter from date (ISO format)
        #[arg(long, value_name = "DATE")]
        date_from: Option<String>,
        /// Filter to date (ISO format)
        #[arg(long, value_name = "DATE")]
        date_to: Option<String>,
        /// Output format
        #[arg(short = 'o', long = "format", value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,
    /// Persist configuration values to ~/.trioexplorer/config.toml
    #[command(after_help = "Examples:
  trioexplorer config set --url http://localhost:8001
  trioexplorer config set --timeout-seconds 120")]
    Set {
        /// Search API base URL
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        /// Default request timeout in whole seconds
        #[arg(long, value_name = "SECS")]
        timeout_seconds: Option<u64>,
    },
}
