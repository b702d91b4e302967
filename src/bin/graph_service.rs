//! Graph-backed real-estate REST service.

use anyhow::Context;
use realestate::config::{ServiceConfig, GRAPH_SERVICE_PORT};
use realestate::graph::GraphService;
use realestate::server;
use realestate::storage::MemoryGraph;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env(GRAPH_SERVICE_PORT)
        .context("expected to be able to read graph service config")?;
    server::init_tracing(config.log_format);
    tracing::trace!(?config, "initialized config");

    let service = GraphService::new(MemoryGraph::new());
    server::serve(server::graph::router(service), &config).await
}
