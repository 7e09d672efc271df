use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use fleetflow_lib::types::{Resource, ResourceKind};
use fleetflow_lib::{Client, Debouncer, ListResource};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::list::build_query;
use crate::output::{print_resources, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    /// Resource to search
    pub resource: ResourceKind,

    /// Extra query filter as key=value (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Results per page
    #[arg(long)]
    pub per_page: Option<i64>,

    /// Debounce delay in milliseconds (defaults to the configured value)
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

/// Reads search terms from stdin, one per line. Only the last term typed
/// within the debounce window is sent; results print as they arrive.
pub async fn run(
    args: &SearchArgs,
    client: Arc<Client>,
    format: &OutputFormat,
    default_delay: Duration,
) -> Result<()> {
    let kind = args.resource;
    let delay = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or(default_delay);
    let list: Arc<ListResource<Resource>> = Arc::new(ListResource::for_kind(client, kind));
    let mut debouncer = Debouncer::new(delay);

    eprintln!("Type a search term and press Enter (Ctrl-D to quit).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let query = build_query(kind, Some(&line), &args.filters, None, args.per_page)?;
        let list = Arc::clone(&list);
        let format = format.clone();
        debouncer.call(async move {
            list.fetch_query(&query).await;
            let state = list.state();
            if let Some(err) = &state.error {
                eprintln!("Error: {}", err);
                return;
            }
            if let Err(e) = print_resources(kind, &state.items, &state.pagination, &format) {
                tracing::error!("Failed to print results: {}", e);
            }
        });
    }
    debouncer.settle().await;
    list.close();
    Ok(())
}
