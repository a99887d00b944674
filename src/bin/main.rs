// Command-line browser for launchpad records
//
// Renders one page of a record list the way a scrolling UI would: only the
// rows inside the viewport fetch, the rest stay placeholders.

use std::fmt::Display;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use launchpad_sdk::config::ConfigurationManager;
use launchpad_sdk::loader::{RowTicker, Viewport};
use launchpad_sdk::logging::init_logging;
use launchpad_sdk::protocols::evm::EthAddress;
use launchpad_sdk::{
    EnvironmentConfig, LaunchpadClient, LaunchpadClientBuilder, LockListQuery, RecordAccessor,
    RecordList, RenderRecord,
};

const ROW_HEIGHT: f64 = 120.0;

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Browse launchpad locks, tokens and NFT launches", long_about = None)]
#[command(version)]
struct Cli {
    /// Chain to read from; defaults to the configured chain
    #[arg(long, global = true)]
    chain_id: Option<u64>,

    /// RPC URL; defaults to the configured or built-in endpoint
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Token locks
    Locks {
        #[command(flatten)]
        query: LockQueryArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Liquidity token locks
    LpLocks {
        #[command(flatten)]
        query: LockQueryArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Trading tokens created through the launchpad
    Tokens {
        #[command(flatten)]
        page: PageArgs,
    },
    /// NFT presales
    Nfts {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Check whether an address holds contract code
    IsContract {
        address: String,
        /// Skip the lookup; the caller already knows it is a contract
        #[arg(long)]
        known: bool,
    },
    /// Show the effective network and configured contracts
    Network,
    /// Write a configuration file with every default filled in
    InitConfig {
        #[arg(default_value = "config/launchpad.toml")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct LockQueryArgs {
    /// Locks owned by this account
    #[arg(long, conflicts_with_all = ["filter", "watchlist"])]
    owner: Option<String>,
    /// Search text; only an address yields results
    #[arg(long, conflicts_with = "watchlist")]
    filter: Option<String>,
    /// Comma-separated lock ids
    #[arg(long, value_delimiter = ',')]
    watchlist: Option<Vec<u64>>,
}

#[derive(Args)]
struct PageArgs {
    /// Rows visible in the viewport
    #[arg(long, default_value_t = 5)]
    rows: usize,
    /// First visible row
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Keep re-rendering for this many seconds
    #[arg(long, default_value_t = 0)]
    follow: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let env_config = EnvironmentConfig::load().context("loading configuration")?;
    init_logging(&env_config.logging)?;

    if let Commands::InitConfig { path } = &cli.command {
        EnvironmentConfig::generate_default_config().save_to_file(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let mut builder = LaunchpadClientBuilder::new()
        .with_config_manager(ConfigurationManager::from_env_config(env_config)?)
        .with_chain_id(cli.chain_id);
    if let Some(rpc_url) = cli.rpc_url {
        builder = builder.with_rpc_url(rpc_url);
    }
    let client = builder.build().await.context("connecting to chain")?;

    match cli.command {
        Commands::Locks { query, page } => {
            let query = query.into_query(client.token_lock_count()).await?;
            let ids = client.token_lock_ids(&query).await?;
            show_page(&client, client.token_lock_accessor(), ids, &page).await
        }
        Commands::LpLocks { query, page } => {
            let query = query.into_query(client.lp_lock_count()).await?;
            let ids = client.lp_lock_ids(&query).await?;
            show_page(&client, client.lp_lock_accessor(), ids, &page).await
        }
        Commands::Tokens { page } => {
            let ids = client.trading_token_ids().await?;
            show_page(&client, client.trading_token_accessor(), ids, &page).await
        }
        Commands::Nfts { page } => {
            let ids = client.nft_launch_addresses().await?;
            show_page(&client, Some(client.nft_launch_accessor()), ids, &page).await
        }
        Commands::IsContract { address, known } => {
            let address: Address = EthAddress::parse(&address)?.into();
            let is_contract = client.is_contract(address, known).await;
            println!(
                "{} {} on chain {}",
                address,
                if is_contract {
                    "is a contract"
                } else {
                    "is not a contract"
                },
                client.chain_id()
            );
            Ok(())
        }
        Commands::Network => {
            println!("{}", serde_json::to_string_pretty(&client.get_summary())?);
            Ok(())
        }
        Commands::InitConfig { .. } => Ok(()),
    }
}

impl LockQueryArgs {
    async fn into_query(
        self,
        count: impl std::future::Future<Output = Result<u64, launchpad_sdk::Error>>,
    ) -> Result<LockListQuery> {
        if let Some(owner) = self.owner {
            let owner: Address = EthAddress::parse(&owner)?.into();
            return Ok(LockListQuery::Owner(owner));
        }
        if let Some(filter) = self.filter {
            return Ok(LockListQuery::Filter(filter));
        }
        if let Some(ids) = self.watchlist {
            return Ok(LockListQuery::Watchlist(ids));
        }
        Ok(LockListQuery::All { count: count.await? })
    }
}

async fn show_page<A>(
    client: &LaunchpadClient,
    accessor: Option<Arc<A>>,
    ids: Vec<A::Id>,
    page: &PageArgs,
) -> Result<()>
where
    A: RecordAccessor,
    A::Id: Display,
    A::Record: RenderRecord,
    <A::Record as RenderRecord>::View: Display,
{
    let config = client.loader_config();
    let settle_limit = config.fetch_timeout + config.debounce;
    let mut list = RecordList::new(accessor, config.clone(), ROW_HEIGHT);
    list.sync(ids);

    let viewport = Viewport::new(page.offset as f64 * ROW_HEIGHT, page.rows as f64 * ROW_HEIGHT);
    let visible = list.scroll(viewport);
    info!(rows = list.len(), visible, "rendering page");

    if !list.settle(settle_limit).await {
        info!("some rows are still loading");
    }
    print_page(&list, client, page);

    if page.follow == 0 {
        return Ok(());
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(page.follow);
    let mut ticker = RowTicker::new(config.tick);
    let mut recheck = tokio::time::interval(config.visibility_recheck);
    recheck.tick().await;
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => break,
            _ = recheck.tick() => list.tick(),
            _ = ticker.tick() => print_page(&list, client, page),
        }
    }
    Ok(())
}

/// Rows of a `len`-row list that a page starting at `offset` covers
fn page_range(offset: usize, rows: usize, len: usize) -> Range<usize> {
    let end = offset.saturating_add(rows).min(len);
    offset.min(end)..end
}

fn print_page<A>(list: &RecordList<A>, client: &LaunchpadClient, page: &PageArgs)
where
    A: RecordAccessor,
    A::Id: Display,
    A::Record: RenderRecord,
    <A::Record as RenderRecord>::View: Display,
{
    let ctx = client.render_context();
    let shown = page_range(page.offset, page.rows, list.len());
    println!(
        "-- {} rows, showing {}..{} --",
        list.len(),
        shown.start,
        shown.end
    );
    for (id, view) in list
        .views(&ctx)
        .into_iter()
        .skip(page.offset)
        .take(page.rows)
    {
        println!("{:>8}  {}", id, view);
    }
}
