//! Citizen endpoints

use serde::Serialize;
use serde_json::json;

use super::segment;
use crate::error::ApiResult;
use crate::models::{
    BillingPlan, BulkyRequest, Case, Household, Id, Invoice, LitterReport, MembershipPlan, Notification,
    PaymentRedirect, PaymentStatus, RecyclableSubmission, RewardClaim, Wallet, WalletTransaction,
};
use crate::transport::{FormPart, UploadFile};
use crate::ApiClient;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLitterReport {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBulkyRequest {
    pub items: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdPlanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_plan_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_plan_id: Option<Id>,
}

#[derive(Debug, Clone)]
pub struct NewRecyclable {
    pub category: String,
    pub estimated_weight_kg: Option<f64>,
    pub photo: Option<UploadFile>,
}

// ========================
// Reports & requests
// ========================

pub async fn list_litter_reports(client: &ApiClient) -> ApiResult<Vec<LitterReport>> {
    client.get("/citizen/litter-reports").await
}

pub async fn create_litter_report(client: &ApiClient, report: &NewLitterReport) -> ApiResult<LitterReport> {
    client.post("/citizen/litter-reports", report).await
}

pub async fn list_bulky_requests(client: &ApiClient) -> ApiResult<Vec<BulkyRequest>> {
    client.get("/citizen/bulky-requests").await
}

pub async fn create_bulky_request(client: &ApiClient, request: &NewBulkyRequest) -> ApiResult<BulkyRequest> {
    client.post("/citizen/bulky-requests", request).await
}

pub async fn list_cases(client: &ApiClient) -> ApiResult<Vec<Case>> {
    client.get("/citizen/cases").await
}

// ========================
// Rewards & wallet
// ========================

pub async fn list_reward_claims(client: &ApiClient) -> ApiResult<Vec<RewardClaim>> {
    client.get("/citizen/reward-claims").await
}

pub async fn create_reward_claim(client: &ApiClient, points: f64, note: Option<&str>) -> ApiResult<RewardClaim> {
    client
        .post("/citizen/reward-claims", &json!({ "points": points, "note": note }))
        .await
}

pub async fn wallet(client: &ApiClient) -> ApiResult<Wallet> {
    client.get("/citizen/wallet").await
}

pub async fn wallet_transactions(client: &ApiClient) -> ApiResult<Vec<WalletTransaction>> {
    client.get("/citizen/wallet/transactions").await
}

// ========================
// Billing & household
// ========================

pub async fn list_invoices(client: &ApiClient) -> ApiResult<Vec<Invoice>> {
    client.get("/citizen/invoices").await
}

pub async fn billing_plans(client: &ApiClient) -> ApiResult<Vec<BillingPlan>> {
    client.get("/citizen/billing-plans").await
}

pub async fn membership_plans(client: &ApiClient) -> ApiResult<Vec<MembershipPlan>> {
    client.get("/citizen/membership-plans").await
}

pub async fn update_household_plan(client: &ApiClient, update: &HouseholdPlanUpdate) -> ApiResult<Household> {
    client.put("/citizen/household/plan", update).await
}

/// Replace the household's collection days (e.g. `["MON", "THU"]`)
pub async fn update_household_schedule(client: &ApiClient, collection_days: &[String]) -> ApiResult<Household> {
    client
        .put("/citizen/household/schedule", &json!({ "collectionDays": collection_days }))
        .await
}

// ========================
// Recyclables
// ========================

/// Submit recyclables for verification (multipart, optional photo)
pub async fn submit_recyclable(client: &ApiClient, submission: NewRecyclable) -> ApiResult<RecyclableSubmission> {
    let mut parts = vec![FormPart::text("category", submission.category)];
    if let Some(weight) = submission.estimated_weight_kg {
        parts.push(FormPart::text("estimatedWeightKg", weight.to_string()));
    }
    if let Some(photo) = submission.photo {
        parts.push(photo.into_part("photo"));
    }
    client.upload("/citizen/recyclables", parts).await
}

pub async fn list_recyclables(client: &ApiClient) -> ApiResult<Vec<RecyclableSubmission>> {
    client.get("/citizen/recyclables").await
}

// ========================
// Notifications
// ========================

pub async fn notifications(client: &ApiClient) -> ApiResult<Vec<Notification>> {
    client.get("/citizen/notifications").await
}

pub async fn mark_notification_read(client: &ApiClient, id: Id) -> ApiResult<()> {
    client
        .execute_unit(crate::transport::ApiRequest::post(format!("/citizen/notifications/{id}/read")))
        .await
}

// ========================
// Payments
// ========================

/// Ask the backend for the hosted gateway form for an invoice
pub async fn initiate_payment(client: &ApiClient, invoice_id: Id) -> ApiResult<PaymentRedirect> {
    client
        .post("/citizen/payments/initiate", &json!({ "invoiceId": invoice_id }))
        .await
}

pub async fn payment_status(client: &ApiClient, reference: &str) -> ApiResult<PaymentStatus> {
    client
        .get(&format!("/citizen/payments/{}/status", segment(reference)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockReply;
    use crate::models::{PaymentState, Role};
    use crate::sdk::test_support::{client_as, json_body};
    use crate::transport::Body;

    #[tokio::test]
    async fn test_payment_status_encodes_reference() {
        let (client, transport) = client_as(Role::Citizen, |_, _| {
            MockReply::ok(json!({ "reference": "INV 7/1", "status": "PAID" }))
        });
        let status = payment_status(&client, "INV 7/1").await.unwrap();
        assert_eq!(status.status, PaymentState::Paid);
        assert_eq!(transport.calls()[0].path, "/citizen/payments/INV%207%2F1/status");
    }

    #[tokio::test]
    async fn test_initiate_payment_decodes_gateway_form() {
        let (client, transport) = client_as(Role::Citizen, |_, _| {
            MockReply::ok(json!({
                "actionUrl": "https://pay.example.com/checkout",
                "fields": { "amount": "1200", "txnref": "T-1" },
                "reference": "T-1"
            }))
        });
        let redirect = initiate_payment(&client, 42).await.unwrap();
        assert_eq!(redirect.method, "POST");
        assert_eq!(redirect.fields["txnref"], "T-1");
        assert_eq!(json_body(&transport.calls()[0].body), json!({ "invoiceId": 42 }));
    }

    #[tokio::test]
    async fn test_submit_recyclable_parts() {
        let (client, transport) = client_as(Role::Citizen, |_, _| {
            MockReply::ok(json!({ "id": 3, "category": "PET", "status": "PENDING" }))
        });
        submit_recyclable(
            &client,
            NewRecyclable {
                category: "PET".into(),
                estimated_weight_kg: Some(2.5),
                photo: None,
            },
        )
        .await
        .unwrap();

        let Body::Multipart(parts) = &transport.calls()[0].body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts[1], FormPart::text("estimatedWeightKg", "2.5"));
    }

    #[tokio::test]
    async fn test_schedule_update_body() {
        let (client, transport) = client_as(Role::Citizen, |_, _| {
            MockReply::ok(json!({ "id": 1, "address": "12 Palm Rd", "collectionDays": ["TUE"] }))
        });
        let household = update_household_schedule(&client, &["TUE".to_string()]).await.unwrap();
        assert_eq!(household.collection_days, vec!["TUE"]);
        assert_eq!(json_body(&transport.calls()[0].body), json!({ "collectionDays": ["TUE"] }));
    }
}
