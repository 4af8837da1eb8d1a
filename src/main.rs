use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use edlens::analytics::insights::build_insights_report;
use edlens::analytics::pipeline::{analyze_posts, AnalyticsConfig};
use edlens::config::Config;
use edlens::ed::client::EdClient;
use edlens::ed::{merge, threads};
use edlens::output::{files, terminal};

/// Base name for scraped participation posts.
const SCRAPED_STEM: &str = "special_participation_a";
/// Base name for posts merged with the settled CSV.
const MERGED_STEM: &str = "special_participation_a_merged";
const REPORT_FILE: &str = "advanced_analysis.json";
const INSIGHTS_FILE: &str = "insights.json";

/// Edlens: what students found when they tried LLMs on course homework.
///
/// Scrapes "Special Participation A" write-ups from Ed Discussion and runs
/// deterministic keyword analytics over them, grouped by homework and model.
#[derive(Parser)]
#[command(name = "edlens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch participation threads from Ed and write them as JSON and CSV
    Scrape {
        /// Server-side search query (default: every thread in the course)
        #[arg(long)]
        query: Option<String>,

        /// Output directory (default: EDLENS_DATA_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Fill a hand-settled CSV with post bodies fetched from Ed
    Merge {
        /// CSV with canonical model/homework labels keyed by thread id
        #[arg(long)]
        settled: PathBuf,

        /// Output directory (default: EDLENS_DATA_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Run the homework x model analytics and write the report
    Analyze {
        /// Posts JSON (default: merged posts, else scraped posts)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Report path (default: EDLENS_DATA_DIR/advanced_analysis.json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of global top terms to keep (default: 20)
        #[arg(long, default_value = "20")]
        top_terms: usize,
    },

    /// Build the insights summary from posts and, if present, the report
    Insights {
        /// Posts JSON (default: merged posts, else scraped posts)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Analytics report to draw per-model findings from
        #[arg(long)]
        report: Option<PathBuf>,

        /// Insights path (default: EDLENS_DATA_DIR/insights.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print a saved analytics report
    Show {
        /// Report path (default: EDLENS_DATA_DIR/advanced_analysis.json)
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("edlens=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Scrape { query, out_dir } => {
            config.require_ed_token()?;
            let out_dir = out_dir.unwrap_or_else(|| config.data_dir.clone());
            let client = ed_client(&config)?;

            println!("Fetching threads for course {}...", config.ed_course_id);
            let all_threads = client.list_threads(query.as_deref()).await?;
            let posts = threads::process_threads(&all_threads, config.ed_course_id);

            files::write_posts(&out_dir, SCRAPED_STEM, &posts)?;

            println!("\n{}", "Scrape complete.".bold());
            println!("  Threads fetched:     {}", all_threads.len());
            println!("  Participation posts: {}", posts.len());
            println!("  Written to:          {}", out_dir.display());
        }

        Commands::Merge { settled, out_dir } => {
            config.require_ed_token()?;
            let out_dir = out_dir.unwrap_or_else(|| config.data_dir.clone());
            let client = ed_client(&config)?;

            let rows = merge::load_settled_csv(&settled)?;
            println!("Merging {} settled rows with thread details...", rows.len());
            let outcome = merge::merge_settled(&client, &rows).await;

            files::write_posts(&out_dir, MERGED_STEM, &outcome.posts)?;

            println!("\n{}", "Merge complete.".bold());
            println!("  Posts merged: {}", outcome.posts.len());
            if outcome.failures > 0 {
                println!(
                    "  {} {} threads could not be fetched",
                    "Warning:".yellow(),
                    outcome.failures
                );
            }
        }

        Commands::Analyze {
            input,
            output,
            top_terms,
        } => {
            let input = resolve_input(input, &config.data_dir)?;
            let output = output.unwrap_or_else(|| config.data_dir.join(REPORT_FILE));

            let posts = files::read_posts(&input)?;
            let analytics = AnalyticsConfig {
                global_top_terms: top_terms,
                ..AnalyticsConfig::default()
            };
            let report = analyze_posts(&posts, &analytics);
            files::write_json(&output, &report)?;

            terminal::display_report(&report);
            println!(
                "\n{}",
                format!("Report saved to: {}", output.display()).bold()
            );
        }

        Commands::Insights {
            input,
            report,
            output,
        } => {
            let input = resolve_input(input, &config.data_dir)?;
            let output = output.unwrap_or_else(|| config.data_dir.join(INSIGHTS_FILE));
            let report_path = report.unwrap_or_else(|| config.data_dir.join(REPORT_FILE));

            let posts = files::read_posts(&input)?;
            let report = if report_path.exists() {
                Some(files::read_report(&report_path)?)
            } else {
                info!(path = %report_path.display(), "No analytics report, skipping model insights");
                None
            };

            let insights = build_insights_report(&posts, report.as_ref());
            files::write_json(&output, &insights)?;

            terminal::display_insights(&insights);
            println!(
                "\n{}",
                format!("Insights saved to: {}", output.display()).bold()
            );
        }

        Commands::Show { report } => {
            let path = report.unwrap_or_else(|| config.data_dir.join(REPORT_FILE));
            if !path.exists() {
                anyhow::bail!(
                    "No report at {}. Run `edlens analyze` first.",
                    path.display()
                );
            }
            let report = files::read_report(&path)?;
            terminal::display_report(&report);
        }
    }

    Ok(())
}

fn ed_client(config: &Config) -> Result<EdClient> {
    EdClient::new(&config.ed_api_url, &config.ed_api_token, config.ed_course_id)
}

/// Pick the posts file: an explicit path, else merged posts, else scraped posts.
fn resolve_input(explicit: Option<PathBuf>, data_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    [MERGED_STEM, SCRAPED_STEM]
        .iter()
        .map(|stem| data_dir.join(format!("{stem}.json")))
        .find(|path| path.exists())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No posts found in {}. Run `edlens scrape` or `edlens merge` first, \
                 or pass --input.",
                data_dir.display()
            )
        })
}
