use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rize_align_directory::config::{Config, RosterSource};
use rize_align_directory::query::{
    self, QuerySpec, ResultSummary, SortDirection, SortField, YearFilter,
};
use rize_align_directory::store::RecordStore;
use rize_align_directory::{detail, report};

#[derive(Parser)]
#[command(name = "rize-align")]
#[command(about = "Browse, filter and inspect the Rize Align student roster", long_about = None)]
struct Cli {
    /// Roster JSON document (falls back to RIZE_ALIGN_DATA, then the bundled roster)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct QueryArgs {
    /// Case-insensitive match against name, email or skill tags
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    major: String,
    #[arg(long, default_value = "all")]
    year: String,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_score: i64,
    /// name, matchScore, proactivity, communication, presentationSkills,
    /// recommendationRate or graduationYear
    #[arg(long, default_value = "matchScore")]
    sort: String,
    #[arg(long, default_value = "desc")]
    direction: String,
}

impl QueryArgs {
    fn to_spec(&self) -> QuerySpec {
        let sort_field = SortField::parse(&self.sort);
        if sort_field.is_none() {
            warn!(sort = %self.sort, "unknown sort field, keeping roster order");
        }
        let sort_direction = SortDirection::parse(&self.direction).unwrap_or_else(|| {
            warn!(direction = %self.direction, "unknown sort direction, using desc");
            SortDirection::Descending
        });

        QuerySpec {
            search_text: self.search.clone(),
            major_filter: QuerySpec::major(&self.major),
            year_filter: YearFilter::parse(&self.year),
            min_match_score: self.min_score.clamp(0, 100),
            sort_field,
            sort_direction,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the filtered and sorted roster
    List {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long)]
        limit: Option<usize>,
        /// Print matching records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one student's full profile
    Show {
        /// Student id or a /student/<id> address
        target: String,
    },
    /// List every major and graduation year in the roster
    Facets,
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Export the visible rows as CSV
    Export {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long, default_value = "roster.csv")]
        out: PathBuf,
    },
    /// Load the roster and report out-of-range values
    Validate,
}

fn load_store(config: &Config) -> anyhow::Result<RecordStore> {
    let store = match &config.source {
        RosterSource::File(path) => RecordStore::load(path)
            .with_context(|| format!("failed to load roster from {}", path.display()))?,
        RosterSource::Bundled => RecordStore::seed().context("bundled roster is invalid")?,
    };
    Ok(store)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.data);
    let store = load_store(&config)?;

    match cli.command {
        Commands::List { query: args, limit, json } => {
            let spec = args.to_spec();
            let mut rows = query::filter_and_sort(store.all(), &spec);
            let matched = rows.len();
            let summary = ResultSummary {
                shown: matched,
                total: store.len(),
            };
            if let Some(limit) = limit {
                rows.truncate(limit);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", report::render_table(&rows, summary, &spec));
                if rows.len() < matched {
                    println!("({} more not shown)", matched - rows.len());
                }
            }
        }
        Commands::Show { target } => match detail::lookup(&store, &target) {
            Some(student) => print!("{}", report::render_profile(student)),
            None => {
                info!(target = %target, "student not found");
                print!("{}", report::render_not_found(&target));
            }
        },
        Commands::Facets => {
            let majors = query::distinct_majors(store.all());
            let years = query::distinct_years(store.all());
            print!("{}", report::render_facets(&majors, &years));
        }
        Commands::Report { query: args, out, limit } => {
            let spec = args.to_spec();
            let markdown = report::build_report(store.all(), &spec, Utc::now().date_naive(), limit);
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { query: args, out } => {
            let spec = args.to_spec();
            let rows = query::filter_and_sort(store.all(), &spec);
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            report::write_csv(&rows, file)?;
            println!("Exported {} students to {}.", rows.len(), out.display());
        }
        Commands::Validate => {
            let warnings = store.validate();
            if warnings.is_empty() {
                println!("{} students, all values within range.", store.len());
            } else {
                println!("{} students, {} out-of-range values:", store.len(), warnings.len());
                for warning in &warnings {
                    println!(
                        "- {} {} = {} (expected 0-{})",
                        warning.student_id,
                        warning.field,
                        report::fmt_score(warning.value),
                        report::fmt_score(warning.max)
                    );
                }
            }
        }
    }

    Ok(())
}
