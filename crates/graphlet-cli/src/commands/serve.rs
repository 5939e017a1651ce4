//! Serve command

use std::sync::Arc;

use clap::Args;
use graphlet_server::run_server;
use graphlet_storage::MemoryStorage;

use crate::config::Config;

#[derive(Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides config file)
    #[arg(long, env = "GRAPHLET_HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "GRAPHLET_PORT")]
    pub port: Option<u16>,

    /// Largest accepted request body in bytes (overrides config file)
    #[arg(long)]
    pub max_body_bytes: Option<usize>,
}

impl ServeArgs {
    /// Apply command line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(max) = self.max_body_bytes {
            config.server.max_body_bytes = max;
        }
    }
}

pub async fn run(args: &ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    tracing::debug!("Server config: {:?}", config.server);

    let storage = Arc::new(MemoryStorage::new());
    run_server(storage, &config.server).await
}
