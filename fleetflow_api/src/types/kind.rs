use std::fmt;
use std::str::FromStr;

/// The back-office screens and the collection endpoint behind each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Customers,
    Vehicles,
    VehicleTypes,
    Drivers,
    RouteCharges,
    Invoices,
    InvoiceItems,
    CreditNotes,
    CreditNoteItems,
    Expenses,
    Payments,
    Journals,
    Documents,
    Users,
}

impl ResourceKind {
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Customers,
        ResourceKind::Vehicles,
        ResourceKind::VehicleTypes,
        ResourceKind::Drivers,
        ResourceKind::RouteCharges,
        ResourceKind::Invoices,
        ResourceKind::InvoiceItems,
        ResourceKind::CreditNotes,
        ResourceKind::CreditNoteItems,
        ResourceKind::Expenses,
        ResourceKind::Payments,
        ResourceKind::Journals,
        ResourceKind::Documents,
        ResourceKind::Users,
    ];

    /// Collection path relative to the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceKind::Customers => "/customers",
            ResourceKind::Vehicles => "/vehicles",
            ResourceKind::VehicleTypes => "/vehicle_types",
            ResourceKind::Drivers => "/drivers",
            ResourceKind::RouteCharges => "/route_charges",
            ResourceKind::Invoices => "/invoices",
            ResourceKind::InvoiceItems => "/invoice_items",
            ResourceKind::CreditNotes => "/credit_notes",
            ResourceKind::CreditNoteItems => "/credit_note_items",
            ResourceKind::Expenses => "/expenses",
            ResourceKind::Payments => "/payments",
            ResourceKind::Journals => "/journals",
            ResourceKind::Documents => "/documents",
            ResourceKind::Users => "/users",
        }
    }

    /// Member path: `/customers/42`.
    pub fn member(&self, id: &impl fmt::Display) -> String {
        format!("{}/{}", self.endpoint(), id)
    }

    /// Human title used in headings, e.g. `Vehicle Types`.
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Customers => "Customers",
            ResourceKind::Vehicles => "Vehicles",
            ResourceKind::VehicleTypes => "Vehicle Types",
            ResourceKind::Drivers => "Drivers",
            ResourceKind::RouteCharges => "Route Charges",
            ResourceKind::Invoices => "Invoices",
            ResourceKind::InvoiceItems => "Invoice Items",
            ResourceKind::CreditNotes => "Credit Notes",
            ResourceKind::CreditNoteItems => "Credit Note Items",
            ResourceKind::Expenses => "Expenses",
            ResourceKind::Payments => "Payments",
            ResourceKind::Journals => "Journals",
            ResourceKind::Documents => "Documents",
            ResourceKind::Users => "Users",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.endpoint().trim_start_matches('/').replace('_', "-");
        write!(f, "{}", name)
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Accepts `vehicle-types`, `vehicle_types` and `/vehicle_types`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('/').replace('-', "_").to_ascii_lowercase();
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.endpoint().trim_start_matches('/') == wanted)
            .ok_or_else(|| format!("unknown resource: {}", s))
    }
}
