//! Loads a policy seed file into the SQLite store and prints what was stored
//!
//! ```bash
//! cargo run --bin seed-policies -- data/policies/ai_logistics_policies.json
//! ```
//!
//! The database URL comes from `API_DATABASE_URL` like the server's. The seed
//! path defaults to `API_POLICY_SEED_PATH` when no argument is given.

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_policy::{load_policies_from_file, seed_store, PolicyPort, DEFAULT_LIST_LIMIT};
use infra_db::{DatabaseConfig, SqlitePolicyRepository};
use interface_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("invalid API configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = match std::env::args().nth(1).or(config.policy_seed_path.clone()) {
        Some(path) => path,
        None => bail!("usage: seed-policies <seed.json>"),
    };

    let policies = load_policies_from_file(&path).with_context(|| format!("failed to load {}", path))?;
    let store = SqlitePolicyRepository::connect(DatabaseConfig::new(&config.database_url))
        .await
        .with_context(|| format!("failed to open policy store at {}", config.database_url))?;
    let count = seed_store(&store, &policies).await?;

    println!("Seeded {} policies from {} into {}", count, path, config.database_url);
    for policy in store.list_all(DEFAULT_LIST_LIMIT).await? {
        println!(
            "  {:<16} {:<28} limit {:>10} deductible {:>8} covers {}",
            policy.policy_number,
            policy.named_insured,
            policy.limit_amount,
            policy.deductible,
            policy.covered_type_names().join(", ")
        );
    }

    Ok(())
}
