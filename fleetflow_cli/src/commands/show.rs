use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Args;
use fleetflow_lib::fleetflow_api::normalize::unwrap_data_object;
use fleetflow_lib::types::{Resource, ResourceId, ResourceKind};
use fleetflow_lib::{Client, SingleResource};
use serde_json::Value;

use crate::output::{print_json, print_resources, OutputFormat};

#[derive(Args)]
pub struct ShowArgs {
    /// Resource kind, e.g. invoices
    pub resource: ResourceKind,

    /// Record id
    pub id: String,
}

/// Loads `/{resource}/{id}` and unwraps a `{"data": {...}}` wrapper if present.
pub(crate) async fn load_record(
    client: Arc<Client>,
    kind: ResourceKind,
    id: &ResourceId,
) -> Result<Value> {
    let record: SingleResource<Value> = SingleResource::open(client, kind.member(id)).await;
    let state = record.state();
    if let Some(err) = &state.error {
        return Err(anyhow!("{}", err));
    }
    let data = state
        .data
        .ok_or_else(|| anyhow!("{} {} not found.", kind.title(), id))?;
    Ok(unwrap_data_object(data))
}

pub async fn run(args: &ShowArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let id = ResourceId::parse(&args.id);
    let data = load_record(client, args.resource, &id).await?;
    if *format == OutputFormat::Json {
        print_json(&data);
        return Ok(());
    }
    let items: Vec<Resource> = match data {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?,
        other => vec![serde_json::from_value(other)?],
    };
    print_resources(args.resource, &items, &Default::default(), format)
}
