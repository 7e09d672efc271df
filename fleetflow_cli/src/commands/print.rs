use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use fleetflow_lib::datetime::format_date_for_print;
use fleetflow_lib::types::{
    format_amount, CreditNote, CreditNoteItem, Customer, Invoice, InvoiceItem, ResourceId,
    ResourceKind,
};
use fleetflow_lib::{print_pages, Client, ListResource};
use serde::de::DeserializeOwned;

use crate::commands::show::load_record;
use crate::output::{print_document, CreditLineRow, InvoiceLineRow, OutputFormat, PrintHeader};

#[derive(Args)]
pub struct PrintArgs {
    #[command(subcommand)]
    pub target: PrintTarget,

    /// Line items per printed page (defaults to the configured value)
    #[arg(long, global = true)]
    pub page_size: Option<usize>,
}

#[derive(Subcommand)]
pub enum PrintTarget {
    /// Print an invoice with its delivery lines
    Invoice {
        /// Invoice id
        id: String,
    },
    /// Print a credit note with its lines
    CreditNote {
        /// Credit note id
        id: String,
    },
}

pub async fn run(
    args: &PrintArgs,
    client: Arc<Client>,
    format: &OutputFormat,
    default_page_size: usize,
) -> Result<()> {
    let page_size = args.page_size.unwrap_or(default_page_size);
    match &args.target {
        PrintTarget::Invoice { id } => print_invoice(client, id, page_size, format).await,
        PrintTarget::CreditNote { id } => print_credit_note(client, id, page_size, format).await,
    }
}

async fn print_invoice(
    client: Arc<Client>,
    id: &str,
    page_size: usize,
    format: &OutputFormat,
) -> Result<()> {
    let id = ResourceId::parse(id);
    let record = load_record(Arc::clone(&client), ResourceKind::Invoices, &id).await?;
    let invoice: Invoice = serde_json::from_value(record)?;

    let items = if invoice.invoice_items.is_empty() {
        load_lines::<InvoiceItem>(client, ResourceKind::InvoiceItems, "invoice_id", &id).await?
    } else {
        invoice.invoice_items.clone()
    };

    let currency = invoice.currency.as_deref();
    let rows: Vec<InvoiceLineRow> = items
        .iter()
        .map(|item| InvoiceLineRow {
            delivery_date: item.delivery_date.as_deref().map(print_date).unwrap_or_default(),
            destination: item.destination.clone().unwrap_or_default(),
            driver: item
                .driver
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            trip_charge: format_amount(currency, item.actual_trip_charge),
        })
        .collect();
    let total = invoice
        .total_amount
        .unwrap_or_else(|| items.iter().filter_map(|i| i.actual_trip_charge).sum());

    let number = invoice
        .invoice_number
        .as_deref()
        .or(invoice.code.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string());
    let header = PrintHeader {
        title: format!("Invoice {}", number),
        date: invoice.issue_date.as_deref().map(print_date).unwrap_or_default(),
        bill_to: bill_to(invoice.customer.as_ref()),
        total: format!("Order total: {}", format_amount(currency, Some(total))),
    };
    print_document(&header, &print_pages(&rows, page_size), format)
}

async fn print_credit_note(
    client: Arc<Client>,
    id: &str,
    page_size: usize,
    format: &OutputFormat,
) -> Result<()> {
    let id = ResourceId::parse(id);
    let record = load_record(Arc::clone(&client), ResourceKind::CreditNotes, &id).await?;
    let note: CreditNote = serde_json::from_value(record)?;
    let items =
        load_lines::<CreditNoteItem>(client, ResourceKind::CreditNoteItems, "credit_note_id", &id)
            .await?;

    let currency = note.currency.as_deref();
    let rows: Vec<CreditLineRow> = items
        .iter()
        .map(|item| CreditLineRow {
            description: item.description.clone(),
            amount: format_amount(currency, item.credit_note_amount),
        })
        .collect();
    let total = note
        .total_amount
        .unwrap_or_else(|| items.iter().filter_map(|i| i.credit_note_amount).sum());

    let header = PrintHeader {
        title: format!("Credit Note {}", note.code.clone().unwrap_or_else(|| id.to_string())),
        date: note.issue_date.as_deref().map(print_date).unwrap_or_default(),
        bill_to: bill_to(note.customer.as_ref()),
        total: format!("Order total: {}", format_amount(currency, Some(total))),
    };
    print_document(&header, &print_pages(&rows, page_size), format)
}

/// Loads a scoped child list such as `/invoice_items?invoice_id=4`.
async fn load_lines<T>(
    client: Arc<Client>,
    kind: ResourceKind,
    parent_key: &str,
    parent: &ResourceId,
) -> Result<Vec<T>>
where
    T: DeserializeOwned + Clone,
{
    let list: ListResource<T> = ListResource::scoped(client, kind, parent_key, parent);
    list.fetch(None).await;
    let state = list.state();
    match state.error {
        Some(err) => Err(anyhow!("{}", err)),
        None => Ok(state.items),
    }
}

fn bill_to(customer: Option<&Customer>) -> Vec<String> {
    let Some(customer) = customer else {
        return Vec::new();
    };
    [
        Some(customer.name.clone()),
        customer.address.clone(),
        customer.location.clone(),
        customer.country.clone(),
    ]
    .into_iter()
    .flatten()
    .filter(|line| !line.trim().is_empty())
    .collect()
}

fn print_date(raw: &str) -> String {
    format_date_for_print(raw).unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bill_to_skips_blank_lines() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 3,
            "name": "Acme Haulage",
            "address": "",
            "location": "Mombasa Rd",
            "country": "Kenya"
        }))
        .unwrap();
        assert_eq!(
            bill_to(Some(&customer)),
            vec!["Acme Haulage", "Mombasa Rd", "Kenya"]
        );
        assert!(bill_to(None).is_empty());
    }

    #[test]
    fn print_date_keeps_unparsable_input() {
        assert_eq!(print_date("2024-06-01 10:00:00"), "2024-06-01");
        assert_eq!(print_date("2024-06-01"), "2024-06-01");
        assert_eq!(print_date("June 1st"), "June 1st");
    }
}
