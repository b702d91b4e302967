//! Document-backed real-estate REST service.

use anyhow::Context;
use realestate::config::{ServiceConfig, DOCUMENT_SERVICE_PORT};
use realestate::document::{DocumentService, MemoryDocumentStore};
use realestate::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env(DOCUMENT_SERVICE_PORT)
        .context("expected to be able to read document service config")?;
    server::init_tracing(config.log_format);
    tracing::trace!(?config, "initialized config");

    let service = DocumentService::new(MemoryDocumentStore::new());
    server::serve(server::document::router(service), &config).await
}
