//! Quest tree engine - graph build entry point.
//!
//! Reads a quest table (JSON array of rows) plus an optional scraped
//! link-map file, assembles the dependency graph, and writes the serialized
//! payload for rendering collaborators.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use questtree_domain::QuestRow;
use questtree_engine::graph::build_graph;
use questtree_engine::payload::GraphPayload;

/// One scraped wiki link record.
#[derive(Debug, Deserialize)]
struct LinkRecord {
    title: String,
    href: String,
    #[allow(dead_code)]
    #[serde(default)]
    trader: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "questtree_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let rows_path: PathBuf = args
        .next()
        .context("usage: questtree-engine <rows.json> [links.json] [out.json]")?
        .into();
    let links_path: Option<PathBuf> = args.next().map(Into::into);
    let out_path: PathBuf = args
        .next()
        .map(Into::into)
        .unwrap_or_else(|| PathBuf::from("quest_graph.json"));

    let rows_text = std::fs::read_to_string(&rows_path)
        .with_context(|| format!("reading quest rows from {}", rows_path.display()))?;
    let rows: Vec<QuestRow> = serde_json::from_str(&rows_text)
        .with_context(|| format!("parsing quest rows in {}", rows_path.display()))?;
    tracing::info!(rows = rows.len(), path = %rows_path.display(), "Loaded quest rows");

    let link_map = match &links_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading link map from {}", path.display()))?;
            let records: Vec<LinkRecord> = serde_json::from_str(&text)
                .with_context(|| format!("parsing link map in {}", path.display()))?;
            tracing::info!(links = records.len(), path = %path.display(), "Loaded link map");
            records
                .into_iter()
                .map(|record| (record.title, record.href))
                .collect()
        }
        None => HashMap::new(),
    };

    let graph = build_graph(&rows, &link_map);
    tracing::info!(
        nodes = graph.len(),
        edges = graph.edges().len(),
        "Assembled quest graph"
    );

    let payload = GraphPayload::from_graph(&graph);
    let json = serde_json::to_string_pretty(&payload).context("serializing graph payload")?;
    std::fs::write(&out_path, json)
        .with_context(|| format!("writing payload to {}", out_path.display()))?;
    tracing::info!(path = %out_path.display(), "Wrote graph payload");

    Ok(())
}
