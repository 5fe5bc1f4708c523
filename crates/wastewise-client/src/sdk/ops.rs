//! Operations (supervisor) endpoints

use serde::Serialize;
use serde_json::json;

use crate::error::ApiResult;
use crate::models::{BillingRun, Case, DigitalTwin, Id, RewardClaim, Route, Task, VehicleLocation};
use crate::ApiClient;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
}

// ========================
// Cases
// ========================

pub async fn list_cases(client: &ApiClient) -> ApiResult<Vec<Case>> {
    client.get("/ops/cases").await
}

pub async fn update_case_status(client: &ApiClient, id: Id, status: &str, note: Option<&str>) -> ApiResult<Case> {
    client
        .patch(&format!("/ops/cases/{id}"), &json!({ "status": status, "note": note }))
        .await
}

// ========================
// Tasks
// ========================

pub async fn list_tasks(client: &ApiClient) -> ApiResult<Vec<Task>> {
    client.get("/ops/tasks").await
}

pub async fn create_task(client: &ApiClient, task: &NewTask) -> ApiResult<Task> {
    client.post("/ops/tasks", task).await
}

pub async fn assign_task(client: &ApiClient, id: Id, assignee_id: Id) -> ApiResult<Task> {
    client
        .patch(&format!("/ops/tasks/{id}/assign"), &json!({ "assigneeId": assignee_id }))
        .await
}

// ========================
// Routes & digital twin
// ========================

pub async fn list_routes(client: &ApiClient) -> ApiResult<Vec<Route>> {
    client.get("/ops/routes").await
}

/// Ask the backend to plan routes for a zone and day (`YYYY-MM-DD`)
pub async fn generate_routes(client: &ApiClient, zone_id: Id, date: &str) -> ApiResult<Vec<Route>> {
    client
        .post("/ops/routes/generate", &json!({ "zoneId": zone_id, "date": date }))
        .await
}

pub async fn digital_twin(client: &ApiClient, zone_id: Option<Id>) -> ApiResult<DigitalTwin> {
    let query: Vec<(&str, String)> = zone_id.map(|z| ("zoneId", z.to_string())).into_iter().collect();
    client.get_with("/ops/digital-twin", &query).await
}

pub async fn vehicle_locations(client: &ApiClient) -> ApiResult<Vec<VehicleLocation>> {
    client.get("/ops/vehicles/locations").await
}

// ========================
// Rewards & billing
// ========================

pub async fn list_reward_claims(client: &ApiClient) -> ApiResult<Vec<RewardClaim>> {
    client.get("/ops/reward-claims").await
}

pub async fn approve_reward_claim(client: &ApiClient, id: Id) -> ApiResult<RewardClaim> {
    client
        .post(&format!("/ops/reward-claims/{id}/approve"), &json!({}))
        .await
}

pub async fn reject_reward_claim(client: &ApiClient, id: Id, reason: Option<&str>) -> ApiResult<RewardClaim> {
    client
        .post(&format!("/ops/reward-claims/{id}/reject"), &json!({ "reason": reason }))
        .await
}

/// Generate invoices for a billing period (`YYYY-MM`)
pub async fn generate_billing(client: &ApiClient, period: &str) -> ApiResult<BillingRun> {
    client
        .post("/ops/billing/generate", &json!({ "period": period }))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockReply;
    use crate::models::Role;
    use crate::sdk::test_support::{client_as, json_body};

    #[tokio::test]
    async fn test_digital_twin_passes_zone_query() {
        let (client, _) = client_as(Role::Supervisor, |req, _| {
            assert_eq!(req.query, vec![("zoneId".to_string(), "4".to_string())]);
            MockReply::ok(json!({ "zoneId": 4, "cells": [{ "row": 0, "col": 1, "score": 0.5 }] }))
        });
        let twin = digital_twin(&client, Some(4)).await.unwrap();
        assert_eq!(twin.cells.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_and_generate_bodies() {
        let (client, transport) = client_as(Role::Supervisor, |req, _| {
            if req.path.ends_with("/assign") {
                MockReply::ok(json!({ "id": 2, "title": "Pick up sofa", "status": "ASSIGNED", "assigneeId": 8 }))
            } else {
                MockReply::ok(json!({ "period": "2024-06", "invoicesCreated": 120 }))
            }
        });

        let task = assign_task(&client, 2, 8).await.unwrap();
        assert_eq!(task.assignee_id, Some(8));
        let run = generate_billing(&client, "2024-06").await.unwrap();
        assert_eq!(run.invoices_created, 120);

        let calls = transport.calls();
        assert_eq!(calls[0].path, "/ops/tasks/2/assign");
        assert_eq!(json_body(&calls[0].body), json!({ "assigneeId": 8 }));
        assert_eq!(calls[1].path, "/ops/billing/generate");
    }
}
