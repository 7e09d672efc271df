//! Headline figures for the dashboard: fleet size, customers, drivers and
//! what has been spent.

use std::sync::Arc;

use fleetflow_api::types::{format_amount, Expense, ResourceKind};
use fleetflow_api::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::FleetError;
use crate::single::SingleResource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub vehicles: usize,
    pub customers: usize,
    pub drivers: usize,
    /// Sum of expense amounts, all treated as KES.
    pub total_expenses: f64,
}

impl DashboardStats {
    /// `KES 12500.00`
    pub fn total_expenses_label(&self) -> String {
        format_amount(Some("KES"), Some(self.total_expenses))
    }
}

/// Loads the four collections concurrently. Counts are of what the server
/// returns for each collection, so a paginated endpoint counts its first
/// page. The first failure is returned.
pub async fn load_dashboard(client: Arc<Client>) -> Result<DashboardStats, Arc<FleetError>> {
    let vehicles: SingleResource<Vec<Value>> =
        SingleResource::new(Arc::clone(&client), ResourceKind::Vehicles.endpoint());
    let customers: SingleResource<Vec<Value>> =
        SingleResource::new(Arc::clone(&client), ResourceKind::Customers.endpoint());
    let drivers: SingleResource<Vec<Value>> =
        SingleResource::new(Arc::clone(&client), ResourceKind::Drivers.endpoint());
    let expenses: SingleResource<Vec<Expense>> =
        SingleResource::new(client, ResourceKind::Expenses.endpoint());

    tokio::join!(
        vehicles.fetch(),
        customers.fetch(),
        drivers.fetch(),
        expenses.fetch()
    );

    Ok(DashboardStats {
        vehicles: settled(&vehicles)?.len(),
        customers: settled(&customers)?.len(),
        drivers: settled(&drivers)?.len(),
        total_expenses: settled(&expenses)?
            .iter()
            .filter_map(|expense| expense.amount)
            .sum(),
    })
}

fn settled<T>(resource: &SingleResource<Vec<T>>) -> Result<Vec<T>, Arc<FleetError>>
where
    T: DeserializeOwned + Clone,
{
    let state = resource.state();
    match state.error {
        Some(err) => Err(err),
        None => Ok(state.data.unwrap_or_default()),
    }
}
