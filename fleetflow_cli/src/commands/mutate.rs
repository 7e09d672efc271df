use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::Args;
use fleetflow_lib::types::{Resource, ResourceId, ResourceKind};
use fleetflow_lib::{Client, ListResource};
use serde_json::Value;

use crate::commands::{build_body, parse_pairs};
use crate::output::{print_json, print_resources, OutputFormat};

#[derive(Args)]
pub struct CreateArgs {
    /// Resource kind, e.g. customers
    pub resource: ResourceKind,

    /// Record fields as a JSON object
    #[arg(long)]
    pub data: Option<String>,

    /// Single field as key=value (repeatable, overrides --data)
    #[arg(long)]
    pub set: Vec<String>,

    /// Create a child line under its parent, e.g. --parent credit_note_id=4
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Resource kind, e.g. customers
    pub resource: ResourceKind,

    /// Record id
    pub id: String,

    /// Record fields as a JSON object
    #[arg(long)]
    pub data: Option<String>,

    /// Single field as key=value (repeatable, overrides --data)
    #[arg(long)]
    pub set: Vec<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Resource kind, e.g. drivers
    pub resource: ResourceKind,

    /// Record id
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn create(args: &CreateArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let body = build_body(args.data.as_deref(), &args.set)?;
    if body.is_empty() {
        bail!("Nothing to create: pass --data or --set.");
    }
    let list: ListResource = match &args.parent {
        Some(parent) => {
            let (key, id) = parse_pairs(std::slice::from_ref(parent))?
                .pop()
                .ok_or_else(|| anyhow!("Expected --parent key=value"))?;
            ListResource::scoped(client, args.resource, &key, &ResourceId::parse(&id))
        }
        None => ListResource::for_kind(client, args.resource),
    };
    let created = list.create(&Value::Object(body)).await?;
    eprintln!("Item added successfully.");
    report(&list, args.resource, &created, format)
}

pub async fn update(args: &UpdateArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let fields = build_body(args.data.as_deref(), &args.set)?;
    if fields.is_empty() {
        bail!("Nothing to update: pass --data or --set.");
    }
    let item = Resource {
        id: ResourceId::parse(&args.id),
        fields,
    };
    let list: ListResource = ListResource::for_kind(client, args.resource);
    let updated = list.update(&item).await?;
    eprintln!("Item updated successfully.");
    report(&list, args.resource, &updated, format)
}

pub async fn delete(args: &DeleteArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    if !args.yes && !confirm(&format!("Delete {} {}?", args.resource, args.id))? {
        bail!("Cancelled.");
    }
    let list: ListResource = ListResource::for_kind(client, args.resource);
    let deleted = list.delete(&ResourceId::parse(&args.id)).await?;
    eprintln!("Item deleted successfully.");
    report(&list, args.resource, &deleted, format)
}

/// Prints the server's answer as JSON, otherwise the refreshed list.
fn report(
    list: &ListResource,
    kind: ResourceKind,
    response: &Value,
    format: &OutputFormat,
) -> Result<()> {
    if *format == OutputFormat::Json {
        print_json(response);
        return Ok(());
    }
    let state = list.state();
    match &state.error {
        Some(err) => {
            tracing::warn!("Could not reload {}: {}", kind, err);
            Ok(())
        }
        None => print_resources(kind, &state.items, &state.pagination, format),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} [y/N] ", prompt);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
