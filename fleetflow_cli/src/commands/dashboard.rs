use std::sync::Arc;

use anyhow::{anyhow, Result};
use fleetflow_lib::{load_dashboard, Client, DashboardStats};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_json, print_rows, OutputFormat};

#[derive(Tabled, Serialize)]
struct StatRow {
    #[tabled(rename = "Stat")]
    stat: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn stat_rows(stats: &DashboardStats) -> Vec<StatRow> {
    vec![
        StatRow { stat: "Total Vehicles", value: stats.vehicles.to_string() },
        StatRow { stat: "Active Customers", value: stats.customers.to_string() },
        StatRow { stat: "Available Drivers", value: stats.drivers.to_string() },
        StatRow { stat: "Total Expenses", value: stats.total_expenses_label() },
    ]
}

pub async fn run(client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let stats = load_dashboard(client).await.map_err(|e| anyhow!("{}", e))?;
    match format {
        OutputFormat::Json => print_json(&stats),
        _ => print_rows(&stat_rows(&stats), "No figures.", format)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_card_order() {
        let stats = DashboardStats {
            vehicles: 12,
            customers: 4,
            drivers: 9,
            total_expenses: 3000.0,
        };
        let rows = stat_rows(&stats);
        let labels: Vec<_> = rows.iter().map(|r| r.stat).collect();
        assert_eq!(
            labels,
            ["Total Vehicles", "Active Customers", "Available Drivers", "Total Expenses"]
        );
        assert_eq!(rows[3].value, "KES 3000.00");
    }
}
