use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Args;
use fleetflow_lib::types::{Resource, ResourceKind};
use fleetflow_lib::{Client, ListQuery, ListResource, Query};

use crate::commands::parse_pairs;
use crate::output::{print_resources, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Resource to list, e.g. customers, vehicle-types, invoice-items
    pub resource: ResourceKind,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Extra query filter as key=value, e.g. --filter invoice_id=4 (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Page number
    #[arg(long)]
    pub page: Option<i64>,

    /// Results per page
    #[arg(long)]
    pub per_page: Option<i64>,

    /// Follow `next` links and print every page
    #[arg(long)]
    pub all: bool,
}

pub(crate) fn build_query(
    kind: ResourceKind,
    search: Option<&str>,
    filters: &[String],
    page: Option<i64>,
    per_page: Option<i64>,
) -> Result<ListQuery> {
    let mut query = ListQuery::for_kind(kind).with_filters(&parse_pairs(filters)?);
    if let Some(search) = search {
        query = query.with_search(search);
    }
    if let Some(page) = page {
        query = query.with_page(page);
    }
    if let Some(per_page) = per_page {
        query = query.with_per_page(per_page);
    }
    Ok(query)
}

pub async fn run(args: &ListArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let query = build_query(
        args.resource,
        args.search.as_deref(),
        &args.filters,
        args.page,
        args.per_page,
    )?;
    let list: ListResource<Resource> = ListResource::for_kind(client, args.resource);
    list.fetch_query(&query).await;

    let mut state = list.state();
    if let Some(err) = &state.error {
        return Err(anyhow!("{}", err));
    }

    if args.all {
        let mut items = std::mem::take(&mut state.items);
        while list.next_page().await {
            let page = list.state();
            if let Some(err) = &page.error {
                return Err(anyhow!("{}", err));
            }
            tracing::debug!("Fetched {}", page.last_requested_url);
            items.extend(page.items);
        }
        let pagination = Default::default();
        return print_resources(args.resource, &items, &pagination, format);
    }

    print_resources(args.resource, &state.items, &state.pagination, format)
}
