use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;
use super::resource::ResourceId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Body of a successful `/auth/access-token` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: ResourceId,
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    pub id: ResourceId,
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    pub size: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: ResourceId,
    pub code: Option<String>,
    #[serde(default)]
    pub brand: String,
    pub model: Option<String>,
    pub chassis_number: Option<String>,
    pub registration_number: Option<String>,
    pub vehicle_type_id: Option<ResourceId>,
    pub vehicle_type: Option<VehicleType>,
    pub metadata: Option<Value>,
}

impl Vehicle {
    /// "Isuzu FRR (KCA 123A)", dropping whatever parts are missing.
    pub fn display_name(&self) -> String {
        let mut name = self.brand.clone();
        if let Some(model) = self.model.as_deref().filter(|m| !m.is_empty()) {
            if !name.is_empty() {
                name.push(' ');
            }
            name.push_str(model);
        }
        if let Some(reg) = self.registration_number.as_deref().filter(|r| !r.is_empty()) {
            name.push_str(&format!(" ({})", reg));
        }
        name.trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: ResourceId,
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub vehicle: Option<Vehicle>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCharge {
    pub id: ResourceId,
    pub code: Option<String>,
    #[serde(default)]
    pub route: String,
    #[serde(default, deserialize_with = "de::amount")]
    pub trip_charge: Option<f64>,
    #[serde(default, deserialize_with = "de::amount")]
    pub driver_wage: Option<f64>,
    #[serde(default, deserialize_with = "de::amount")]
    pub loading_charge: Option<f64>,
    pub vehicle_type_id: Option<ResourceId>,
    pub vehicle_type: Option<VehicleType>,
    pub metadata: Option<Value>,
}

impl RouteCharge {
    /// Trip charge plus driver wage plus loading charge; missing parts count as zero.
    pub fn total_charge(&self) -> f64 {
        self.trip_charge.unwrap_or(0.0)
            + self.driver_wage.unwrap_or(0.0)
            + self.loading_charge.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn route_charge_accepts_string_amounts() {
        let rc: RouteCharge = serde_json::from_value(json!({
            "id": 1,
            "route": "Mombasa - Nairobi",
            "trip_charge": "1000.50",
            "driver_wage": 200,
            "loading_charge": null
        }))
        .unwrap();
        assert_eq!(rc.trip_charge, Some(1000.5));
        assert_eq!(rc.driver_wage, Some(200.0));
        assert_eq!(rc.loading_charge, None);
        assert_eq!(rc.total_charge(), 1200.5);
    }

    #[test]
    fn vehicle_display_name() {
        let v: Vehicle = serde_json::from_value(json!({
            "id": "v1",
            "brand": "Isuzu",
            "model": "FRR",
            "registration_number": "KCA 123A"
        }))
        .unwrap();
        assert_eq!(v.display_name(), "Isuzu FRR (KCA 123A)");
    }
}
