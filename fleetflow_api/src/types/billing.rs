use serde::{Deserialize, Serialize};

use super::de;
use super::fleet::{Customer, Driver, RouteCharge, Vehicle};
use super::resource::ResourceId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: ResourceId,
    pub code: Option<String>,
    pub invoice_number: Option<String>,
    pub customer_id: Option<ResourceId>,
    pub vehicle_id: Option<ResourceId>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    pub total_amount: Option<f64>,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub customer: Option<Customer>,
    pub vehicle: Option<Vehicle>,
    pub payment_condition: Option<String>,
    pub delivery_date: Option<String>,
    pub reference: Option<String>,
    pub additional_info: Option<String>,
    pub vat_applicable: Option<bool>,
    #[serde(default, deserialize_with = "de::amount")]
    pub subtotal: Option<f64>,
    #[serde(default, deserialize_with = "de::amount")]
    pub tax: Option<f64>,
    #[serde(default)]
    pub invoice_items: Vec<InvoiceItem>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: ResourceId,
    pub code: Option<String>,
    pub invoice_id: Option<ResourceId>,
    pub driver_id: Option<ResourceId>,
    pub route_charge_id: Option<ResourceId>,
    pub delivery_date: Option<String>,
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    pub actual_trip_charge: Option<f64>,
    #[serde(default, deserialize_with = "de::amount")]
    pub actual_driver_charge: Option<f64>,
    #[serde(default, deserialize_with = "de::amount")]
    pub actual_loading_charge: Option<f64>,
    pub driver: Option<Driver>,
    pub route_charge: Option<RouteCharge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditNote {
    pub id: ResourceId,
    pub code: Option<String>,
    pub customer_id: Option<ResourceId>,
    pub issue_date: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    pub total_amount: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditNoteItem {
    pub id: ResourceId,
    pub credit_note_id: Option<ResourceId>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de::amount")]
    pub credit_note_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ResourceId,
    pub code: Option<String>,
    pub vehicle_id: Option<ResourceId>,
    pub invoice_item_id: Option<ResourceId>,
    #[serde(rename = "type")]
    pub expense_type: Option<String>,
    pub expense_date: Option<String>,
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    pub amount: Option<f64>,
    pub vehicle: Option<Vehicle>,
    pub invoice_item: Option<InvoiceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: ResourceId,
    pub code: Option<String>,
    pub customer_id: Option<ResourceId>,
    pub payment_date: Option<String>,
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    pub total_amount: Option<f64>,
    pub notes: Option<String>,
    pub customer: Option<Customer>,
}

/// Formats an amount the way the screens do: `KES 1200.50`.
pub fn format_amount(currency: Option<&str>, amount: Option<f64>) -> String {
    let amount = amount.unwrap_or(0.0);
    match currency.filter(|c| !c.is_empty()) {
        Some(currency) => format!("{} {:.2}", currency, amount),
        None => format!("{:.2}", amount),
    }
}
