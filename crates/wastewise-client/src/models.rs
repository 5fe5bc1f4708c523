//! API Models
//!
//! Wire shapes of the backend entities the console displays. The backend
//! owns and validates all of these; fields the console does not render are
//! ignored on decode.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Id = u64;

/// Coarse authorization tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[serde(alias = "OPS")]
    Supervisor,
    Crew,
    Citizen,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Supervisor, Role::Crew, Role::Citizen];

    /// First path segment under `/app`
    pub fn slug(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "ops",
            Role::Crew => "crew",
            Role::Citizen => "citizen",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.slug() == slug)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Supervisor => "Supervisor",
            Role::Crew => "Crew",
            Role::Citizen => "Citizen",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub zone_id: Option<Id>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.email)
    }
}

fn default_true() -> bool {
    true
}

// ========================
// Auth
// ========================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub refresh_expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

/// Token rotation result; the refresh token is only replaced when sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

// ========================
// Admin catalogue
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub collection_days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: Id,
    pub address: String,
    #[serde(default)]
    pub zone_id: Option<Id>,
    #[serde(default)]
    pub owner_id: Option<Id>,
    #[serde(default)]
    pub billing_plan_id: Option<Id>,
    #[serde(default)]
    pub membership_plan_id: Option<Id>,
    #[serde(default)]
    pub collection_days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    pub id: Id,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub bin_type: Option<String>,
    #[serde(default)]
    pub capacity_liters: Option<f64>,
    #[serde(default)]
    pub fill_level: Option<f64>,
    #[serde(default)]
    pub household_id: Option<Id>,
    #[serde(default)]
    pub zone_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualBin {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub zone_id: Option<Id>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Id,
    pub plate_number: String,
    #[serde(default)]
    pub capacity_kg: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPlan {
    pub id: Id,
    pub name: String,
    pub monthly_fee: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPlan {
    pub id: Id,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub reward_multiplier: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRate {
    pub id: Id,
    pub category: String,
    pub points_per_kg: f64,
}

// ========================
// Operations
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: Id,
    #[serde(default)]
    pub case_type: Option<String>,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub zone_id: Option<Id>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Id,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub case_id: Option<Id>,
    #[serde(default)]
    pub assignee_id: Option<Id>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub sequence: u32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub task_id: Option<Id>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Id,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub zone_id: Option<Id>,
    #[serde(default)]
    pub vehicle_id: Option<Id>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stops: Vec<RouteStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalTwinCell {
    pub row: u32,
    pub col: u32,
    pub score: f64,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalTwin {
    #[serde(default)]
    pub zone_id: Option<Id>,
    #[serde(default)]
    pub cells: Vec<DigitalTwinCell>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLocation {
    pub vehicle_id: Id,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardClaim {
    pub id: Id,
    pub status: String,
    pub points: f64,
    #[serde(default)]
    pub citizen_id: Option<Id>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingRun {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub invoices_created: u64,
}

// ========================
// Crew
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewException {
    pub id: Id,
    #[serde(default)]
    pub task_id: Option<Id>,
    pub reason: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ========================
// Citizen
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LitterReport {
    pub id: Id,
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkyRequest {
    pub id: Id,
    pub items: String,
    pub status: String,
    #[serde(default)]
    pub preferred_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub balance: f64,
    #[serde(default)]
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: Id,
    pub amount: f64,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Id,
    pub amount: f64,
    pub status: String,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl Invoice {
    pub fn is_payable(&self) -> bool {
        matches!(self.status.to_ascii_uppercase().as_str(), "UNPAID" | "OVERDUE" | "PENDING")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclableSubmission {
    pub id: Id,
    pub category: String,
    pub status: String,
    #[serde(default)]
    pub estimated_weight_kg: Option<f64>,
    #[serde(default)]
    pub verified_weight_kg: Option<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

// ========================
// Payments
// ========================

/// Instructions for the hosted gateway form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRedirect {
    pub action_url: String,
    #[serde(default = "default_post")]
    pub method: String,
    #[serde(default)]
    pub fields: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub reference: Option<String>,
}

fn default_post() -> String {
    "POST".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub reference: String,
    pub status: PaymentState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_wire_values() {
        let role: Role = serde_json::from_value(json!("OPS")).unwrap();
        assert_eq!(role, Role::Supervisor);
        assert_eq!(serde_json::to_value(Role::Citizen).unwrap(), json!("CITIZEN"));
        assert_eq!(Role::from_slug("ops"), Some(Role::Supervisor));
        assert_eq!(Role::from_slug("mayor"), None);
    }

    #[test]
    fn test_login_response_decodes_camel_case() {
        let body = json!({
            "accessToken": "A",
            "refreshToken": "B",
            "refreshExpiresAt": "2030-01-01T00:00:00Z",
            "user": {"id": 1, "email": "admin@example.com", "role": "ADMIN", "lastLogin": "ignored"}
        });
        let parsed: LoginResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.access_token, "A");
        assert_eq!(parsed.user.role, Role::Admin);
        assert!(parsed.user.active);
        assert_eq!(parsed.user.display_name(), "admin@example.com");
    }

    #[test]
    fn test_invoice_payable() {
        let invoice: Invoice =
            serde_json::from_value(json!({"id": 9, "amount": 12.5, "status": "unpaid"})).unwrap();
        assert!(invoice.is_payable());
        let paid = Invoice { status: "PAID".into(), ..invoice };
        assert!(!paid.is_payable());
    }
}
