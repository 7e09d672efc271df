use std::io::Write;

use anyhow::{bail, Result};
use fleetflow_lib::print::PrintPage;
use fleetflow_lib::types::{
    format_amount, Document, Driver, Journal, JournalType, Pagination, Resource, ResourceKind,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => bail!("Unknown output format: {} (expected table, json, csv or markdown)", other),
        }
    }
}

// -- Columns --

enum Cell {
    /// Top-level field, blank when missing.
    Field(&'static str),
    /// Dotted path into an embedded relation, `N/A` when missing.
    Related(&'static str),
    /// Amount field shown with the record's `currency`.
    Money(&'static str),
    Computed(fn(&Resource) -> String),
}

pub struct Column {
    pub header: &'static str,
    cell: Cell,
}

fn col(header: &'static str, cell: Cell) -> Column {
    Column { header, cell }
}

/// The columns each list screen shows.
pub fn columns(kind: ResourceKind) -> Vec<Column> {
    use Cell::*;
    match kind {
        ResourceKind::Customers => vec![
            col("Code", Field("code")),
            col("Name", Field("name")),
            col("Phone", Field("phone")),
            col("Address", Field("address")),
            col("Location", Field("location")),
            col("Country", Field("country")),
        ],
        ResourceKind::Vehicles => vec![
            col("Code", Field("code")),
            col("Reg. Number", Field("registration_number")),
            col("Brand", Field("brand")),
            col("Model", Field("model")),
            col("Vehicle Type", Related("vehicle_type.name")),
        ],
        ResourceKind::VehicleTypes => vec![
            col("Code", Field("code")),
            col("Name", Field("name")),
            col("Size", Field("size")),
            col("Description", Field("description")),
        ],
        ResourceKind::Drivers => vec![
            col("Code", Field("code")),
            col("Name", Field("name")),
            col("National ID", Field("national_id")),
            col("Phone", Field("phone")),
            col("Assigned Vehicle", Computed(assigned_vehicle)),
        ],
        ResourceKind::RouteCharges => vec![
            col("Code", Field("code")),
            col("Route", Field("route")),
            col("Vehicle Type", Related("vehicle_type.name")),
            col("Trip Charge", Computed(|r| kes(r, &["trip_charge"]))),
            col("Driver Wage", Computed(|r| kes(r, &["driver_wage"]))),
            col("Loading Charge", Computed(|r| kes(r, &["loading_charge"]))),
            col(
                "Total Charge",
                Computed(|r| kes(r, &["trip_charge", "driver_wage", "loading_charge"])),
            ),
        ],
        ResourceKind::Invoices => vec![
            col("Number", Computed(invoice_number)),
            col("Customer", Related("customer.name")),
            col("Issue Date", Field("issue_date")),
            col("Due Date", Field("due_date")),
            col("Total", Money("total_amount")),
            col("Status", Field("status")),
        ],
        ResourceKind::InvoiceItems => vec![
            col("Code", Field("code")),
            col("Delivery Date", Field("delivery_date")),
            col("Destination", Field("destination")),
            col("Driver", Related("driver.name")),
            col("Trip Charge", Computed(|r| plain_amount(r, "actual_trip_charge"))),
            col("Driver Charge", Computed(|r| plain_amount(r, "actual_driver_charge"))),
            col("Loading Charge", Computed(|r| plain_amount(r, "actual_loading_charge"))),
        ],
        ResourceKind::CreditNotes => vec![
            col("Number", Field("code")),
            col("Customer", Related("customer.name")),
            col("Issue Date", Field("issue_date")),
            col("Amount", Money("total_amount")),
            col("Status", Field("status")),
        ],
        ResourceKind::CreditNoteItems => vec![
            col("Description", Field("description")),
            col("Amount", Computed(|r| plain_amount(r, "credit_note_amount"))),
        ],
        ResourceKind::Expenses => vec![
            col("Code", Field("code")),
            col("Vehicle", Computed(expense_vehicle)),
            col("Type", Computed(|r| text(r.get("type")).replace('_', " "))),
            col("Date", Field("expense_date")),
            col("Amount", Money("amount")),
            col("Invoice Item", Related("invoice_item.code")),
        ],
        ResourceKind::Payments => vec![
            col("Code", Field("code")),
            col("Customer", Related("customer.name")),
            col("Payment Date", Field("payment_date")),
            col("Amount", Money("total_amount")),
        ],
        ResourceKind::Journals => vec![
            col("Date", Field("created_at")),
            col("Customer", Related("customer.name")),
            col("Description", Computed(journal_description)),
            col("Debit", Computed(|r| journal_amount(r, JournalType::Debit))),
            col("Credit", Computed(|r| journal_amount(r, JournalType::Credit))),
        ],
        ResourceKind::Documents => vec![
            col("Code", Field("code")),
            col("Type", Field("file_type")),
            col("Owner", Computed(document_owner)),
            col("Upload Date", Field("upload_date")),
        ],
        ResourceKind::Users => vec![
            col("Name", Field("name")),
            col("Email", Field("email")),
            col("Status", Field("status")),
        ],
    }
}

impl Column {
    fn render(&self, item: &Resource) -> String {
        match &self.cell {
            Cell::Field(field) => text(item.get(field)),
            Cell::Related(path) => {
                let value = text(item.lookup(path));
                if value.is_empty() {
                    "N/A".to_string()
                } else {
                    value
                }
            }
            Cell::Money(field) => {
                let currency = item.get("currency").and_then(Value::as_str);
                format_amount(currency, amount(item.get(field)))
            }
            Cell::Computed(f) => f(item),
        }
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn amount(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn plain_amount(item: &Resource, field: &str) -> String {
    format_amount(None, amount(item.get(field)))
}

fn kes(item: &Resource, fields: &[&str]) -> String {
    let sum: f64 = fields
        .iter()
        .map(|f| amount(item.get(f)).unwrap_or(0.0))
        .sum();
    format_amount(Some("KES"), Some(sum))
}

fn decode<T: DeserializeOwned>(item: &Resource) -> Option<T> {
    serde_json::to_value(item)
        .and_then(serde_json::from_value)
        .ok()
}

fn invoice_number(item: &Resource) -> String {
    let number = text(item.get("invoice_number"));
    if number.is_empty() {
        text(item.get("code"))
    } else {
        number
    }
}

fn assigned_vehicle(item: &Resource) -> String {
    decode::<Driver>(item)
        .and_then(|d| d.vehicle)
        .map(|v| v.display_name())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "N/A".to_string())
}

fn expense_vehicle(item: &Resource) -> String {
    let brand = text(item.lookup("vehicle.brand"));
    let reg = text(item.lookup("vehicle.registration_number"));
    match (brand.is_empty(), reg.is_empty()) {
        (true, true) => "N/A".to_string(),
        (false, true) => brand,
        (true, false) => reg,
        (false, false) => format!("{} ({})", brand, reg),
    }
}

fn journal_description(item: &Resource) -> String {
    decode::<Journal>(item)
        .map(|j| j.description())
        .unwrap_or_else(|| "Entry recorded for customer".to_string())
}

fn journal_amount(item: &Resource, side: JournalType) -> String {
    match decode::<Journal>(item) {
        Some(j) if j.direction() == Some(side) => format_amount(j.currency.as_deref(), j.amount),
        _ => String::new(),
    }
}

fn document_owner(item: &Resource) -> String {
    decode::<Document>(item)
        .and_then(|d| d.owner)
        .map(|o| o.label)
        .unwrap_or_else(|| "N/A".to_string())
}

// -- Row builders --

pub fn build_rows(kind: ResourceKind, items: &[Resource]) -> (Vec<String>, Vec<Vec<String>>) {
    let columns = columns(kind);
    let headers = columns.iter().map(|c| c.header.to_string()).collect();
    let rows = items
        .iter()
        .map(|item| columns.iter().map(|c| c.render(item)).collect())
        .collect();
    (headers, rows)
}

fn render_table(headers: Vec<String>, rows: Vec<Vec<String>>, markdown: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

fn write_csv<W: Write>(writer: W, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- List output --

/// Prints a page of records in `format`. Table and markdown output end with
/// the pagination summary when the server sent one.
pub fn print_resources(
    kind: ResourceKind,
    items: &[Resource],
    pagination: &Pagination,
    format: &OutputFormat,
) -> Result<()> {
    if *format == OutputFormat::Json {
        print_json(&items);
        return Ok(());
    }
    let (headers, rows) = build_rows(kind, items);
    match format {
        OutputFormat::Csv => write_csv(std::io::stdout(), &headers, &rows)?,
        _ => {
            if rows.is_empty() {
                println!("No {} found.", kind.title().to_lowercase());
            } else {
                println!(
                    "{}",
                    render_table(headers, rows, *format == OutputFormat::Markdown)
                );
            }
            if pagination.shows_controls() {
                println!("{}", pagination.summary());
            }
        }
    }
    Ok(())
}

/// Prints typed rows; used where a command has its own row shape.
pub fn print_rows<R>(rows: &[R], empty: &str, format: &OutputFormat) -> Result<()>
where
    R: Tabled + Serialize,
{
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        _ if rows.is_empty() => println!("{}", empty),
        OutputFormat::Table | OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            if *format == OutputFormat::Markdown {
                table.with(Style::markdown());
            }
            println!("{}", table);
        }
    }
    Ok(())
}

// -- Print view --

/// Heading repeated on every printed page.
#[derive(Debug, Clone, Serialize)]
pub struct PrintHeader {
    pub title: String,
    pub date: String,
    pub bill_to: Vec<String>,
    /// "Order total: KES 2500.00", shown on the last page only.
    pub total: String,
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct InvoiceLineRow {
    #[tabled(rename = "Delivery Date")]
    #[serde(rename = "Delivery Date")]
    pub delivery_date: String,
    #[tabled(rename = "Destination")]
    #[serde(rename = "Destination")]
    pub destination: String,
    #[tabled(rename = "Driver")]
    #[serde(rename = "Driver")]
    pub driver: String,
    #[tabled(rename = "Trip Charge")]
    #[serde(rename = "Trip Charge")]
    pub trip_charge: String,
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CreditLineRow {
    #[tabled(rename = "Description")]
    #[serde(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Amount")]
    #[serde(rename = "Amount")]
    pub amount: String,
}

/// Renders one printed page: the header, this page's rows, the total when
/// it is the last page, and the page footer.
pub fn render_print_page<R>(header: &PrintHeader, page: &PrintPage<R>, markdown: bool) -> String
where
    R: Tabled + Clone,
{
    let mut out = String::new();
    out.push_str("FleetFlow\n");
    out.push_str(&format!("{}    Date: {}\n", header.title, header.date));
    if !header.bill_to.is_empty() {
        out.push_str("Bill to:\n");
        for line in header.bill_to.iter().filter(|l| !l.is_empty()) {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out.push('\n');
    if page.items.is_empty() {
        out.push_str("No items\n");
    } else {
        let mut table = Table::new(page.items.clone());
        if markdown {
            table.with(Style::markdown());
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }
    if page.is_last {
        out.push('\n');
        out.push_str(&header.total);
        out.push('\n');
    }
    out.push_str(&page.label());
    out.push('\n');
    out
}

#[derive(Serialize)]
struct PrintView<'a, R> {
    header: &'a PrintHeader,
    pages: &'a [PrintPage<R>],
}

pub fn print_document<R>(header: &PrintHeader, pages: &[PrintPage<R>], format: &OutputFormat) -> Result<()>
where
    R: Tabled + Serialize + Clone,
{
    match format {
        OutputFormat::Json => print_json(&PrintView { header, pages }),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for page in pages {
                for row in &page.items {
                    wtr.serialize(row)?;
                }
            }
            wtr.flush()?;
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            let markdown = *format == OutputFormat::Markdown;
            let rendered: Vec<String> = pages
                .iter()
                .map(|page| render_print_page(header, page, markdown))
                .collect();
            // Form feed between pages, as a printer expects.
            println!("{}", rendered.join("\u{000C}\n"));
        }
    }
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetflow_lib::print::print_pages;
    use serde_json::json;

    fn resources(value: Value) -> Vec<Resource> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(OutputFormat::parse("csv").unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_customer_rows() {
        let items = resources(json!([
            {"id": 1, "code": "CUS-0001", "name": "Acme", "phone": "0700", "country": "Kenya"}
        ]));
        let (headers, rows) = build_rows(ResourceKind::Customers, &items);
        assert_eq!(
            headers,
            vec!["Code", "Name", "Phone", "Address", "Location", "Country"]
        );
        assert_eq!(rows[0], vec!["CUS-0001", "Acme", "0700", "", "", "Kenya"]);
    }

    #[test]
    fn test_related_columns_fall_back_to_na() {
        let items = resources(json!([
            {"id": 1, "registration_number": "KCA 1", "vehicle_type": {"name": "Truck"}},
            {"id": 2, "registration_number": "KCA 2"}
        ]));
        let (_, rows) = build_rows(ResourceKind::Vehicles, &items);
        assert_eq!(rows[0][4], "Truck");
        assert_eq!(rows[1][4], "N/A");
    }

    #[test]
    fn test_route_charge_totals() {
        let items = resources(json!([
            {"id": 1, "route": "MSA-NBI", "trip_charge": "1000", "driver_wage": 250.5, "loading_charge": null}
        ]));
        let (_, rows) = build_rows(ResourceKind::RouteCharges, &items);
        assert_eq!(rows[0][3], "KES 1000.00");
        assert_eq!(rows[0][5], "KES 0.00");
        assert_eq!(rows[0][6], "KES 1250.50");
    }

    #[test]
    fn test_journal_columns() {
        let items = resources(json!([
            {
                "id": 1, "journal_type": "LICENSE", "currency": "KES", "amount": 500,
                "customer": {"id": 3, "name": "Acme"},
                "journalable_type": "App\\Models\\Payment"
            },
            {"id": 2, "journal_type": "CREDIT", "currency": "KES", "amount": "75.5"}
        ]));
        let (_, rows) = build_rows(ResourceKind::Journals, &items);
        assert_eq!(rows[0][2], "Payment recorded for Acme");
        assert_eq!(rows[0][3], "KES 500.00");
        assert_eq!(rows[0][4], "");
        assert_eq!(rows[1][2], "Entry recorded for customer");
        assert_eq!(rows[1][3], "");
        assert_eq!(rows[1][4], "KES 75.50");
    }

    #[test]
    fn test_driver_and_document_computed_columns() {
        let drivers = resources(json!([
            {"id": 1, "name": "Jane", "vehicle": {"id": 2, "brand": "Isuzu", "model": "FRR", "registration_number": "KCA 123A"}},
            {"id": 2, "name": "John"}
        ]));
        let (_, rows) = build_rows(ResourceKind::Drivers, &drivers);
        assert_eq!(rows[0][4], "Isuzu FRR (KCA 123A)");
        assert_eq!(rows[1][4], "N/A");

        let docs = resources(json!([
            {"id": 1, "code": "DOC-1", "documentable": {"id": 4, "code": "DRI-0004", "name": "Jane"}}
        ]));
        let (_, rows) = build_rows(ResourceKind::Documents, &docs);
        assert_eq!(rows[0][2], "Driver: Jane");
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        write_csv(
            &mut buf,
            &["Code".to_string(), "Name".to_string()],
            &[vec!["CUS-1".to_string(), "Acme, Ltd".to_string()]],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Code,Name\nCUS-1,\"Acme, Ltd\"\n"
        );
    }

    #[test]
    fn test_markdown_table() {
        let out = render_table(
            vec!["Code".into(), "Name".into()],
            vec![vec!["C1".into(), "Acme".into()]],
            true,
        );
        assert!(out.contains("| Code | Name |"));
        assert!(out.contains("| C1   | Acme |"));
    }

    fn header() -> PrintHeader {
        PrintHeader {
            title: "Invoice #INV-0001".into(),
            date: "2024-05-01".into(),
            bill_to: vec!["Acme".into(), "Nairobi, Kenya".into()],
            total: "Order total: KES 2500.00".into(),
        }
    }

    fn line(n: usize) -> CreditLineRow {
        CreditLineRow {
            description: format!("Line {}", n),
            amount: "10.00".into(),
        }
    }

    #[test]
    fn test_print_pages_repeat_header_and_total_once() {
        let lines: Vec<CreditLineRow> = (1..=25).map(line).collect();
        let pages = print_pages(&lines, 10);
        let rendered: Vec<String> = pages
            .iter()
            .map(|p| render_print_page(&header(), p, false))
            .collect();

        assert_eq!(rendered.len(), 3);
        for page in &rendered {
            assert!(page.contains("Invoice #INV-0001"));
            assert!(page.contains("Acme"));
        }
        assert!(!rendered[0].contains("Order total"));
        assert!(!rendered[1].contains("Order total"));
        assert!(rendered[2].contains("Order total: KES 2500.00"));
        assert!(rendered[0].contains("Line 10"));
        assert!(!rendered[0].contains("Line 11"));
        assert!(rendered[2].contains("Line 25"));
        assert!(rendered[2].ends_with("Page 3 of 3\n"));
    }

    #[test]
    fn test_empty_document_prints_one_page() {
        let pages = print_pages::<CreditLineRow>(&[], 10);
        let out = render_print_page(&header(), &pages[0], false);
        assert!(out.contains("No items"));
        assert!(out.contains("Order total"));
        assert!(out.contains("Page 1 of 1"));
    }
}
