mod display;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use safecontractor_client::{
    DetailResolver, DetailScreen, DetailState, HandoffStore, SearchClient, SearchOutcome,
    SearchSession,
};
use safecontractor_core::config::DEFAULT_BASE_URL;
use safecontractor_core::query::DEFAULT_FUZZ_RATIO;
use safecontractor_core::{ClientConfig, SearchInput};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "safecontractor",
    version,
    about = "Look up contractors and their permit history"
)]
struct Cli {
    #[arg(long, global = true, env = "SAFECONTRACTOR_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,
    #[arg(
        long,
        global = true,
        env = "SAFECONTRACTOR_FUZZ_RATIO",
        default_value_t = DEFAULT_FUZZ_RATIO,
        value_parser = clap::value_parser!(u8).range(0..=100),
        help = "Similarity threshold for fuzzy name search (0-100)"
    )]
    fuzz_ratio: u8,
    #[arg(long, global = true, help = "Use the fuzzy-match endpoint for name searches")]
    fuzzy: bool,
    #[arg(long, global = true, env = "SAFECONTRACTOR_DEBOUNCE_MS", default_value_t = 300)]
    debounce_ms: u64,
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,
    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search by name, or by license ID when no name is given.
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        license_id: Option<String>,
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Show a contractor's project history and analysis.
    Show {
        name: String,
        #[arg(long, help = "Output machine-readable JSON")]
        json: bool,
    },
    /// Type queries line by line; `:open N` shows result N, `:q` quits.
    Interactive {
        #[arg(long, help = "Fetch the detail view only after navigating")]
        no_prefetch: bool,
    },
}

impl Cli {
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let config = ClientConfig {
            base_url: self.api_url.clone(),
            fuzz_ratio: self.fuzz_ratio,
            fuzzy: self.fuzzy,
            debounce: Duration::from_millis(self.debounce_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
        .normalized();
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("safecontractor v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.config()?;
    let client = Arc::new(SearchClient::new(config.clone()).context("building HTTP client")?);

    match cli.command {
        Commands::Search {
            name,
            license_id,
            json,
        } => {
            let input = SearchInput::new(name.unwrap_or_default(), license_id.unwrap_or_default());
            if input.is_blank() {
                bail!("provide --name or --license-id");
            }
            let items = client
                .search_input(&input)
                .await
                .context("searching contractors")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                display::print_results(&items);
            }
        }
        Commands::Show { name, json } => {
            let resolver = DetailResolver::new(Arc::new(HandoffStore::new()), client);
            let screen = DetailScreen::new(resolver);
            let state = screen.mount(&name).await.unwrap_or(DetailState::Loading);
            match (&state, json) {
                (DetailState::Resolved(detail), true) => {
                    println!("{}", serde_json::to_string_pretty(detail)?);
                }
                (DetailState::Failed(message), _) => bail!("{message}"),
                _ => display::print_detail_state(&name, &state),
            }
        }
        Commands::Interactive { no_prefetch } => {
            run_interactive(client, &config, !no_prefetch).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Each stdin line is the current content of the search fields:
/// `name`, `| license-id`, or `name | license-id`.
fn parse_fields(line: &str) -> SearchInput {
    match line.split_once('|') {
        Some((name, license_id)) => SearchInput::new(name.trim(), license_id.trim()),
        None => SearchInput::by_name(line.trim()),
    }
}

async fn run_interactive(
    client: Arc<SearchClient>,
    config: &ClientConfig,
    prefetch: bool,
) -> anyhow::Result<()> {
    let handoff = Arc::new(HandoffStore::new());
    let session = SearchSession::from_config(Arc::clone(&client), Arc::clone(&handoff), config);
    let screen = DetailScreen::new(DetailResolver::new(handoff, client));

    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            match snapshot.outcome {
                SearchOutcome::Idle => {}
                SearchOutcome::Results(items) => display::print_results(&items),
                SearchOutcome::Failed(message) => {
                    println!("Failed to fetch contractors: {message}");
                }
            }
        }
    });

    eprintln!("Type a name (or `| license-id`). `:open N` shows result N, `:q` quits.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line == ":q" || line == ":quit" {
            break;
        }
        if let Some(arg) = line.strip_prefix(":open") {
            let SearchOutcome::Results(items) = session.snapshot().outcome else {
                println!("No results to open.");
                continue;
            };
            let Some(item) = arg
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| items.get(i))
            else {
                println!("Pick a result between 1 and {}.", items.len());
                continue;
            };

            let target = session.select_and_handoff(item, prefetch).await;
            if let Some(state) = screen.mount(&target.key).await {
                display::print_detail_state(&target.key, &state);
            }
            continue;
        }
        session.input_changed(parse_fields(line));
    }

    session.dispose();
    printer.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_from_line() {
        assert_eq!(parse_fields("Acme"), SearchInput::by_name("Acme"));
        assert_eq!(parse_fields("| X1"), SearchInput::by_license_id("X1"));
        assert_eq!(parse_fields("Acme | X1"), SearchInput::new("Acme", "X1"));
        assert!(parse_fields("   ").is_blank());
    }

    #[test]
    fn cli_maps_onto_config() {
        let cli = Cli::parse_from([
            "safecontractor",
            "--api-url",
            "http://example.test/",
            "--fuzzy",
            "--fuzz-ratio",
            "60",
            "--debounce-ms",
            "150",
            "search",
            "--name",
            "Acme",
        ]);
        let config = cli.config().unwrap();
        assert_eq!(config.base_url, "http://example.test");
        assert!(config.fuzzy);
        assert_eq!(config.fuzz_ratio, 60);
        assert_eq!(config.debounce, Duration::from_millis(150));
    }

    #[test]
    fn fuzz_ratio_out_of_range_rejected() {
        let parsed = Cli::try_parse_from([
            "safecontractor",
            "--fuzz-ratio",
            "101",
            "show",
            "Acme Co",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_debounce_rejected() {
        let cli = Cli::parse_from(["safecontractor", "--debounce-ms", "0", "interactive"]);
        assert!(cli.config().is_err());
    }
}
