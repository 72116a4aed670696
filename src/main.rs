use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use lexitag_api::{AnalysisDefaults, RestApi};
use lexitag_core::{
    apply_classifier, apply_scorer, filter_by_label, ClassificationSummary, DictionarySet,
    SentimentDictionary, SentimentLabel, SentimentSummary, Table,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Annotate CSV text with lexicon sentiment scores or dictionary matches
#[derive(Parser, Debug)]
#[command(name = "lexitag")]
#[command(about = "Annotate CSV text with sentiment scores or dictionary matches", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add sentiment_score and sentiment_label columns
    Sentiment {
        /// Input CSV with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Text column to analyze
        #[arg(short, long)]
        column: String,

        /// Dictionary file(s) with `term[,tag]` lines; later files win on conflicts
        #[arg(short, long)]
        dictionary: Vec<PathBuf>,

        /// Keep only rows with this label (Positive, Neutral, Negative)
        #[arg(long)]
        label: Option<SentimentLabel>,

        /// Output CSV (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add <name>_count, <name>_present and <name>_matches columns per dictionary
    Classify {
        /// Input CSV with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Text column to classify
        #[arg(short, long)]
        column: String,

        /// JSON file mapping dictionary names to term lists (replaces the built-ins)
        #[arg(long)]
        dictionaries: Option<PathBuf>,

        /// Add or replace one dictionary from a file with one term per line
        #[arg(long = "dict", value_name = "NAME=FILE")]
        dict: Vec<String>,

        /// Output CSV (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the columns of a CSV and which of them hold text
    Columns {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the built-in dictionaries
    Dictionaries {
        /// Print the sentiment word lists instead of the classifier dictionaries
        #[arg(long)]
        sentiment: bool,
    },

    /// Run the HTTP API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8501)]
        http_port: u16,

        /// Default sentiment dictionary file(s)
        #[arg(long)]
        dictionary: Vec<PathBuf>,

        /// Default classifier dictionaries (JSON)
        #[arg(long)]
        dictionaries: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Sentiment { input, column, dictionary, label, output } => {
            let table = load_table(&input)?;
            let dictionary = load_sentiment_dictionary(&dictionary)?;
            info!(
                "Using dictionary: {} positive, {} negative words",
                dictionary.positive_count(),
                dictionary.negative_count()
            );

            let scored = apply_scorer(&table, &column, &dictionary)?;
            info!("{}", SentimentSummary::compute(&scored)?);

            let scored = match label {
                Some(label) => filter_by_label(&scored, label)?,
                None => scored,
            };
            write_table(&scored, output.as_deref())?;
        }
        Command::Classify { input, column, dictionaries, dict, output } => {
            let table = load_table(&input)?;
            let dictionaries = load_dictionary_set(dictionaries.as_deref(), &dict)?;
            for (name, terms) in dictionaries.iter() {
                info!("Dictionary {}: {} terms", name, terms.len());
            }

            let classified = apply_classifier(&table, &column, &dictionaries)?;
            for entry in ClassificationSummary::compute(&classified, &dictionaries)?.entries {
                info!(
                    "{}: {}/{} ({:.1}%)",
                    entry.display_name, entry.present, entry.total, entry.percentage
                );
            }
            write_table(&classified, output.as_deref())?;
        }
        Command::Columns { input } => {
            let table = load_table(&input)?;
            for column in table.columns() {
                println!("{}\t{:?}", column.name, column.kind);
            }
            println!("text columns: {}", table.text_columns().join(", "));
        }
        Command::Dictionaries { sentiment } => {
            if sentiment {
                let terms = SentimentDictionary::default().to_terms();
                println!("{}", serde_json::to_string_pretty(&terms)?);
            } else {
                println!("{}", DictionarySet::default().to_json()?);
            }
        }
        Command::Serve { http_port, dictionary, dictionaries } => {
            let defaults = Arc::new(AnalysisDefaults {
                sentiment: load_sentiment_dictionary(&dictionary)?,
                dictionaries: load_dictionary_set(dictionaries.as_deref(), &[])?,
            });
            serve(defaults, http_port).await;
        }
    }

    Ok(())
}

/// Load a dataset and make sure there is something to analyze
fn load_table(path: &Path) -> anyhow::Result<Table> {
    let table = Table::from_csv_path(path)
        .with_context(|| format!("Error reading file {:?}", path))?;
    let text_columns = table.require_text_columns()?;
    info!(
        "Loaded dataset with {} rows and {} columns (text columns: {})",
        table.len(),
        table.columns().len(),
        text_columns.join(", ")
    );
    Ok(table)
}

fn load_sentiment_dictionary(paths: &[PathBuf]) -> anyhow::Result<SentimentDictionary> {
    if paths.is_empty() {
        return Ok(SentimentDictionary::default());
    }

    let mut dictionary = SentimentDictionary::empty();
    for path in paths {
        let loaded = SentimentDictionary::from_file(path)
            .with_context(|| format!("Error reading dictionary {:?}", path))?;
        dictionary.merge(&loaded);
    }
    Ok(dictionary)
}

fn load_dictionary_set(json: Option<&Path>, extra: &[String]) -> anyhow::Result<DictionarySet> {
    let mut dictionaries = match json {
        Some(path) => DictionarySet::load_json(path)
            .with_context(|| format!("Error reading dictionaries {:?}", path))?,
        None => DictionarySet::default(),
    };

    for entry in extra {
        let (name, path) = parse_dictionary_arg(entry)?;
        let terms = std::fs::read_to_string(path)
            .with_context(|| format!("Error reading dictionary {:?}", path))?;
        if dictionaries.insert(name, &terms)? {
            info!("Replaced dictionary {}", name);
        }
    }

    Ok(dictionaries)
}

/// Split a `--dict NAME=FILE` argument
fn parse_dictionary_arg(entry: &str) -> anyhow::Result<(&str, &str)> {
    match entry.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.is_empty() => {
            Ok((name.trim(), path))
        }
        _ => Err(anyhow!("Expected NAME=FILE, got {:?}", entry)),
    }
}

fn write_table(table: &Table, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            table.to_csv_path(path)?;
            info!("Wrote {} rows to {:?}", table.len(), path);
        }
        None => table.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

async fn serve(defaults: Arc<AnalysisDefaults>, http_port: u16) {
    info!("Starting lexitag v{}", env!("CARGO_PKG_VERSION"));

    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(defaults, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_dictionary_arg() {
        assert_eq!(parse_dictionary_arg("pricing=terms.txt").unwrap(), ("pricing", "terms.txt"));
        assert_eq!(parse_dictionary_arg(" vip =a=b.txt").unwrap(), ("vip", "a=b.txt"));

        for bad in ["pricing", "=terms.txt", "pricing=", ""] {
            assert!(parse_dictionary_arg(bad).is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn test_load_dictionary_set_adds_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let urgency = dir.path().join("urgency.txt");
        let pricing = dir.path().join("pricing.txt");
        fs::write(&urgency, "Now\nsoon\n").unwrap();
        fs::write(&pricing, "sale\n").unwrap();

        let extra = vec![
            format!("urgency_marketing={}", urgency.display()),
            format!("pricing={}", pricing.display()),
        ];
        let dictionaries = load_dictionary_set(None, &extra).unwrap();

        assert_eq!(
            dictionaries.names().collect::<Vec<_>>(),
            vec!["urgency_marketing", "exclusive_marketing", "pricing"]
        );
        assert_eq!(dictionaries.terms_text("urgency_marketing").unwrap(), "now\nsoon");
        assert_eq!(dictionaries.terms_text("pricing").unwrap(), "sale");
    }

    #[test]
    fn test_load_dictionary_set_errors() {
        assert!(load_dictionary_set(None, &["no-separator".to_string()]).is_err());
        assert!(load_dictionary_set(None, &["x=/nonexistent/terms.txt".to_string()]).is_err());
    }
}
