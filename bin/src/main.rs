//! barvault CLI - intraday price bar downloader and archiver.

use anyhow::Result;
use barvault_lib::Provider;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;
mod logging;
mod settings;

use settings::{QueryArgs, RetryArgs};

#[derive(Parser)]
#[command(name = "barvault")]
#[command(about = "Intraday price bar downloader and archiver", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Root directory of the archive. Defaults to <data dir>/warehouse
    #[arg(long, env = "BARVAULT_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Directory for run reports. Defaults to the platform data directory
    #[arg(long, env = "BARVAULT_STATE_DIR", global = true)]
    state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download one symbol
    Fetch {
        /// Symbol as understood by the provider (e.g., SPX, AAPL, BTC)
        symbol: String,

        /// Provider (google_finance, alpha_vantage, avantage_crypto)
        #[arg(short, long)]
        provider: Provider,

        /// Category subfolder. Defaults to the catalog category
        #[arg(short, long)]
        category: Option<String>,

        /// Display name used in messages
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Download every symbol of a list file
    Batch {
        /// Delimited file with a `symbol` column
        list_file: PathBuf,

        /// Providers to download from, in order
        #[arg(short, long = "provider", required = true, num_args = 1..)]
        providers: Vec<Provider>,

        /// Category subfolder below each provider folder (e.g., S&P500/symbols)
        #[arg(short, long)]
        subpath: String,

        /// Symbol to resume from; earlier symbols are skipped
        #[arg(long)]
        from: Option<String>,

        /// Delimiter of the list file
        #[arg(long, default_value_t = ';')]
        delimiter: char,

        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Download every catalog instrument
    Catalog {
        /// Only download from this provider
        #[arg(short, long)]
        provider: Option<Provider>,

        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        retry: RetryArgs,
    },

    /// List catalog instruments
    List {
        /// Filter by provider
        #[arg(short, long)]
        provider: Option<Provider>,

        /// Search pattern
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show batch run reports
    Status {
        /// Specific run ID to show
        run_id: Option<String>,

        /// Show all runs (including old finished ones)
        #[arg(long)]
        all: bool,
    },

    /// Resume a batch run from its first unfinished symbol
    Resume {
        /// Run ID to resume. Prompts when omitted
        run_id: Option<String>,

        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Delete finished run reports
    Clean {
        /// Clean all finished runs (not just old ones)
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let root = settings::output_root(cli.root.as_deref());
    let state_dir = cli.state_dir.as_deref();

    match command {
        Commands::Fetch {
            symbol,
            provider,
            category,
            name,
            query,
            retry,
        } => {
            commands::fetch::fetch(
                &root,
                &symbol,
                provider,
                category.as_deref(),
                name.as_deref(),
                &query,
                &retry,
                cli.quiet,
            )
            .await
        }
        Commands::Batch {
            list_file,
            providers,
            subpath,
            from,
            delimiter,
            query,
            retry,
        } => {
            let state = settings::open_state(state_dir)?;
            commands::batch::batch(
                &root,
                &state,
                &list_file,
                &providers,
                &subpath,
                from.as_deref(),
                delimiter,
                &query,
                &retry,
                cli.quiet,
            )
            .await
        }
        Commands::Catalog {
            provider,
            query,
            retry,
        } => commands::catalog::run_catalog(&root, provider, &query, &retry, cli.quiet).await,
        Commands::List { provider, search } => {
            commands::list::list_instruments(provider, search.as_deref())
        }
        Commands::Status { run_id, all } => {
            let state = settings::open_state(state_dir)?;
            commands::status::status(&state, run_id.as_deref(), all)
        }
        Commands::Resume { run_id, retry } => {
            let state = settings::open_state(state_dir)?;
            commands::resume::resume(&state, run_id.as_deref(), &retry, cli.quiet).await
        }
        Commands::Clean { all } => {
            let state = settings::open_state(state_dir)?;
            commands::clean::clean_runs(&state, all)
        }
    }
}
