use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{info, warn};

use tmux_opts::options::{OptionKind, OptionMap, OptionStore};
use tmux_opts::{ClientConfig, TmuxClient};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = ClientConfig::load().context("Failed to load configuration")?;
    let client = TmuxClient::with_config(config);

    if !client.is_server_running() {
        warn!(binary = %client.config().binary, "no tmux server running");
        anyhow::bail!("no tmux server running; start one with `tmux new-session -d`");
    }

    let stores = [
        OptionStore::server(&client),
        OptionStore::session_global(&client),
        OptionStore::window_global(&client),
    ];

    let mut tables: BTreeMap<OptionKind, OptionMap> = BTreeMap::new();
    for store in &stores {
        let options = store
            .all()
            .with_context(|| format!("Failed to read global {} options", store.kind()))?;
        info!(kind = %store.kind(), count = options.len(), "read options");
        tables.insert(store.kind(), options);
    }

    let json = serde_json::to_string_pretty(&tables).context("Failed to serialize options")?;
    println!("{}", json);
    Ok(())
}
