//! Admin endpoints
//!
//! Catalogue CRUD under `/admin/<resource>`. Create and update bodies are
//! passed through as JSON objects built by the console's schema forms.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiResult;
use crate::models::{
    BillingPlan, Bin, Household, Id, MembershipPlan, RewardRate, User, Vehicle, VirtualBin, Zone,
};
use crate::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminResource {
    Users,
    Zones,
    Households,
    Bins,
    VirtualBins,
    Vehicles,
    BillingPlans,
    MembershipPlans,
    RewardRates,
}

impl AdminResource {
    pub const ALL: [AdminResource; 9] = [
        AdminResource::Users,
        AdminResource::Zones,
        AdminResource::Households,
        AdminResource::Bins,
        AdminResource::VirtualBins,
        AdminResource::Vehicles,
        AdminResource::BillingPlans,
        AdminResource::MembershipPlans,
        AdminResource::RewardRates,
    ];

    pub fn collection_path(self) -> &'static str {
        match self {
            AdminResource::Users => "/admin/users",
            AdminResource::Zones => "/admin/zones",
            AdminResource::Households => "/admin/households",
            AdminResource::Bins => "/admin/bins",
            AdminResource::VirtualBins => "/admin/virtual-bins",
            AdminResource::Vehicles => "/admin/vehicles",
            AdminResource::BillingPlans => "/admin/billing-plans",
            AdminResource::MembershipPlans => "/admin/membership-plans",
            AdminResource::RewardRates => "/admin/reward-rates",
        }
    }

    pub fn item_path(self, id: Id) -> String {
        format!("{}/{}", self.collection_path(), id)
    }

    pub fn label(self) -> &'static str {
        match self {
            AdminResource::Users => "Users",
            AdminResource::Zones => "Zones",
            AdminResource::Households => "Households",
            AdminResource::Bins => "Bins",
            AdminResource::VirtualBins => "Virtual Bins",
            AdminResource::Vehicles => "Vehicles",
            AdminResource::BillingPlans => "Billing Plans",
            AdminResource::MembershipPlans => "Membership Plans",
            AdminResource::RewardRates => "Reward Rates",
        }
    }
}

// ========================
// Generic CRUD
// ========================

pub async fn list<T: DeserializeOwned>(client: &ApiClient, resource: AdminResource) -> ApiResult<Vec<T>> {
    client.get(resource.collection_path()).await
}

pub async fn create<T: DeserializeOwned>(client: &ApiClient, resource: AdminResource, body: &Value) -> ApiResult<T> {
    client.post(resource.collection_path(), body).await
}

pub async fn update<T: DeserializeOwned>(
    client: &ApiClient,
    resource: AdminResource,
    id: Id,
    body: &Value,
) -> ApiResult<T> {
    client.put(&resource.item_path(id), body).await
}

pub async fn delete(client: &ApiClient, resource: AdminResource, id: Id) -> ApiResult<()> {
    client.delete(&resource.item_path(id)).await
}

// ========================
// Typed lists
// ========================

pub async fn list_users(client: &ApiClient) -> ApiResult<Vec<User>> {
    list(client, AdminResource::Users).await
}

pub async fn list_zones(client: &ApiClient) -> ApiResult<Vec<Zone>> {
    list(client, AdminResource::Zones).await
}

pub async fn list_households(client: &ApiClient) -> ApiResult<Vec<Household>> {
    list(client, AdminResource::Households).await
}

pub async fn list_bins(client: &ApiClient) -> ApiResult<Vec<Bin>> {
    list(client, AdminResource::Bins).await
}

pub async fn list_virtual_bins(client: &ApiClient) -> ApiResult<Vec<VirtualBin>> {
    list(client, AdminResource::VirtualBins).await
}

pub async fn list_vehicles(client: &ApiClient) -> ApiResult<Vec<Vehicle>> {
    list(client, AdminResource::Vehicles).await
}

pub async fn list_billing_plans(client: &ApiClient) -> ApiResult<Vec<BillingPlan>> {
    list(client, AdminResource::BillingPlans).await
}

pub async fn list_membership_plans(client: &ApiClient) -> ApiResult<Vec<MembershipPlan>> {
    list(client, AdminResource::MembershipPlans).await
}

pub async fn list_reward_rates(client: &ApiClient) -> ApiResult<Vec<RewardRate>> {
    list(client, AdminResource::RewardRates).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockReply;
    use crate::models::Role;
    use crate::sdk::test_support::{client_as, json_body};
    use serde_json::json;

    #[test]
    fn test_resource_paths_are_unique() {
        let mut paths: Vec<_> = AdminResource::ALL.iter().map(|r| r.collection_path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), AdminResource::ALL.len());
        assert_eq!(AdminResource::VirtualBins.item_path(5), "/admin/virtual-bins/5");
    }

    #[tokio::test]
    async fn test_list_zones_unwraps_envelope() {
        let (client, _) = client_as(Role::Admin, |_, _| {
            MockReply::ok(json!({
                "success": true,
                "data": [{ "id": 1, "name": "North", "collectionDays": ["MON", "THU"] }]
            }))
        });
        let zones = list_zones(&client).await.unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].collection_days, vec!["MON", "THU"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_hit_item_paths() {
        let (client, transport) = client_as(Role::Admin, |req, _| match req.method.as_str() {
            "PUT" => MockReply::ok(json!({ "id": 9, "plateNumber": "KJA-123", "status": "ACTIVE" })),
            _ => MockReply::empty(204),
        });

        let body = json!({ "plateNumber": "KJA-123", "status": "ACTIVE" });
        let vehicle: Vehicle = update(&client, AdminResource::Vehicles, 9, &body).await.unwrap();
        assert_eq!(vehicle.plate_number, "KJA-123");
        delete(&client, AdminResource::Vehicles, 9).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].path, "/admin/vehicles/9");
        assert_eq!(json_body(&calls[0].body), body);
        assert_eq!(calls[1].path, "/admin/vehicles/9");
        assert_eq!(calls[1].method, reqwest::Method::DELETE);
    }
}
