use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use version_gate::check::action::{UserAction, alert_for_offer, handle_user_action};
use version_gate::check::engine::DecisionEngine;
use version_gate::config::{GateConfig, data_dir, db_path, log_path};
use version_gate::logging;
use version_gate::version::cache::Cache;
use version_gate::version::registries::HttpFetcher;
use version_gate::version::semver::SemanticVersion;
use version_gate::version::state::MemoryState;
use version_gate::version::throttle::CheckPolicy;

#[derive(Parser)]
#[command(name = "version-gate")]
#[command(version, about = "Decide whether an installed app should prompt for an update")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bundle identifier (overrides the config file)
    #[arg(long, global = true)]
    bundle_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate once and print the decision as JSON
    Check(CheckArgs),
    /// Record the user's answer to an alert
    Respond(RespondArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Installed version
    #[arg(long)]
    installed: String,

    /// Store country code
    #[arg(long)]
    country: Option<String>,

    /// Custom manifest URL
    #[arg(long)]
    manifest_url: Option<String>,

    /// Check frequency: immediately, daily or weekly
    #[arg(long)]
    policy: Option<CheckPolicy>,
}

#[derive(Args)]
struct RespondArgs {
    /// launch, dismiss or skip
    action: UserAction,

    /// Version the alert offered
    #[arg(long)]
    version: String,

    /// Installed version, used to find the alert tier of the offer
    #[arg(long)]
    installed: String,

    /// The alert was a forced update
    #[arg(long)]
    forced: bool,

    /// Store application id of the alert
    #[arg(long, required_if_eq("action", "launch"))]
    track_id: Option<u64>,
}

fn load_config(cli: &Cli) -> anyhow::Result<GateConfig> {
    let mut config = match &cli.config {
        Some(path) => GateConfig::load(path)?,
        None => GateConfig::default(),
    };
    if let Some(bundle_id) = &cli.bundle_id {
        config.bundle_id = Some(bundle_id.clone());
    }
    Ok(config)
}

fn open_state(config: &GateConfig) -> anyhow::Result<Cache> {
    let scope = config
        .resolve_bundle_id()
        .ok_or_else(|| anyhow::anyhow!("no bundle identifier configured"))?;
    std::fs::create_dir_all(data_dir())?;
    Ok(Cache::new(&db_path(), &scope)?)
}

async fn run_check(config: GateConfig, args: CheckArgs) -> anyhow::Result<()> {
    let mut config = config;
    if args.country.is_some() {
        config.country_code = args.country;
    }
    if args.manifest_url.is_some() {
        config.manifest_url = args.manifest_url;
    }
    let policy = args.policy.unwrap_or(config.check_policy);

    let settings = config.check_settings(&args.installed);
    let fetcher = Arc::new(HttpFetcher::new(&config.store_base_url)?);

    // A missing bundle identifier is reported as a decision, not a failure
    let decision = match settings.bundle_id {
        Some(_) => {
            let engine = DecisionEngine::new(settings, fetcher, open_state(&config)?);
            engine.evaluate(policy).await
        }
        None => {
            let engine = DecisionEngine::new(settings, fetcher, MemoryState::new());
            engine.evaluate(policy).await
        }
    };

    println!("{}", serde_json::to_string(&decision)?);
    Ok(())
}

fn run_respond(config: GateConfig, args: RespondArgs) -> anyhow::Result<()> {
    let store = open_state(&config)?;
    let alert = alert_for_offer(
        &SemanticVersion::parse(&args.installed),
        &args.version,
        args.track_id.unwrap_or_default(),
        &config.alerts.tier_assignment(),
        args.forced,
    );

    let outcome = handle_user_action(&store, args.action, &alert)?;
    println!("{}", serde_json::to_string(&outcome)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let _guard = logging::init(&log_path(), config.log_format)?;

    match cli.command {
        Command::Check(args) => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(run_check(config, args)),
        Command::Respond(args) => run_respond(config, args),
    }
}
