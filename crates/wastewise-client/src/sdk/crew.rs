//! Crew endpoints

use serde::Serialize;

use crate::error::ApiResult;
use crate::models::{CrewException, Id, RecyclableSubmission, Route, Task};
use crate::transport::{FormPart, UploadFile};
use crate::ApiClient;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclableVerification {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewException {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Id>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Today's assigned route, if any
pub async fn todays_route(client: &ApiClient) -> ApiResult<Option<Route>> {
    client.get("/crew/routes/today").await
}

pub async fn list_tasks(client: &ApiClient) -> ApiResult<Vec<Task>> {
    client.get("/crew/tasks").await
}

pub async fn start_task(client: &ApiClient, id: Id) -> ApiResult<Task> {
    client.post(&format!("/crew/tasks/{id}/start"), &serde_json::json!({})).await
}

pub async fn complete_task(client: &ApiClient, id: Id) -> ApiResult<Task> {
    client.post(&format!("/crew/tasks/{id}/complete"), &serde_json::json!({})).await
}

/// Attach a proof-of-service photo to a task (multipart)
pub async fn upload_proof(client: &ApiClient, task_id: Id, file: UploadFile, note: Option<&str>) -> ApiResult<Task> {
    let mut parts = vec![file.into_part("proof")];
    if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
        parts.push(FormPart::text("note", note));
    }
    client.upload(&format!("/crew/tasks/{task_id}/proof"), parts).await
}

pub async fn pending_recyclables(client: &ApiClient) -> ApiResult<Vec<RecyclableSubmission>> {
    client.get("/crew/recyclables/pending").await
}

pub async fn verify_recyclable(
    client: &ApiClient,
    id: Id,
    verification: &RecyclableVerification,
) -> ApiResult<RecyclableSubmission> {
    client
        .post(&format!("/crew/recyclables/{id}/verify"), verification)
        .await
}

pub async fn report_exception(client: &ApiClient, exception: &NewException) -> ApiResult<CrewException> {
    client.post("/crew/exceptions", exception).await
}

pub async fn list_exceptions(client: &ApiClient) -> ApiResult<Vec<CrewException>> {
    client.get("/crew/exceptions").await
}
