//! Admin Pages
//!
//! Catalogue CRUD: every admin resource shares one table + modal form page,
//! configured by a `ResourceSpec`.

use leptos::prelude::*;
use serde_json::Value;
use wastewise_client::models::{Bin, Id, Role, User, Vehicle};
use wastewise_client::sdk::admin::{self, AdminResource};

use super::{load_state, reloading, run_action, NotFoundPage, PageHeader};
use crate::components::{from_json, to_json, Column, DataTable, DeleteConfirmButton, EntityForm, Modal};
use crate::context::use_app;
use crate::routes::Page;
use crate::validation::{
    FormValues, Schema, BILLING_PLAN_SCHEMA, BIN_SCHEMA, HOUSEHOLD_SCHEMA, MEMBERSHIP_PLAN_SCHEMA,
    REWARD_RATE_SCHEMA, USER_SCHEMA, VEHICLE_SCHEMA, VIRTUAL_BIN_SCHEMA, ZONE_SCHEMA,
};

/// Bins at or above this fill level count as "needs pickup"
const FULL_BIN_THRESHOLD: f64 = 80.0;

#[derive(Clone, Copy)]
pub struct ResourceSpec {
    pub resource: AdminResource,
    pub singular: &'static str,
    pub schema: Schema,
    /// (header, JSON key)
    pub columns: &'static [(&'static str, &'static str)],
}

pub fn spec_for(page: Page) -> Option<ResourceSpec> {
    let spec = match page {
        Page::AdminUsers => ResourceSpec {
            resource: AdminResource::Users,
            singular: "user",
            schema: USER_SCHEMA,
            columns: &[("Name", "name"), ("Email", "email"), ("Role", "role"), ("Phone", "phone"), ("Active", "active")],
        },
        Page::AdminZones => ResourceSpec {
            resource: AdminResource::Zones,
            singular: "zone",
            schema: ZONE_SCHEMA,
            columns: &[("Name", "name"), ("Code", "code"), ("Collection days", "collectionDays")],
        },
        Page::AdminHouseholds => ResourceSpec {
            resource: AdminResource::Households,
            singular: "household",
            schema: HOUSEHOLD_SCHEMA,
            columns: &[("Address", "address"), ("Zone", "zoneId"), ("Owner", "ownerId"), ("Billing plan", "billingPlanId")],
        },
        Page::AdminBins => ResourceSpec {
            resource: AdminResource::Bins,
            singular: "bin",
            schema: BIN_SCHEMA,
            columns: &[("Label", "label"), ("Type", "binType"), ("Capacity (L)", "capacityLiters"), ("Fill %", "fillLevel"), ("Household", "householdId")],
        },
        Page::AdminVirtualBins => ResourceSpec {
            resource: AdminResource::VirtualBins,
            singular: "virtual bin",
            schema: VIRTUAL_BIN_SCHEMA,
            columns: &[("Name", "name"), ("Zone", "zoneId"), ("Latitude", "latitude"), ("Longitude", "longitude")],
        },
        Page::AdminVehicles => ResourceSpec {
            resource: AdminResource::Vehicles,
            singular: "vehicle",
            schema: VEHICLE_SCHEMA,
            columns: &[("Plate", "plateNumber"), ("Capacity (kg)", "capacityKg"), ("Status", "status")],
        },
        Page::AdminBillingPlans => ResourceSpec {
            resource: AdminResource::BillingPlans,
            singular: "billing plan",
            schema: BILLING_PLAN_SCHEMA,
            columns: &[("Name", "name"), ("Monthly fee", "monthlyFee"), ("Description", "description")],
        },
        Page::AdminMembershipPlans => ResourceSpec {
            resource: AdminResource::MembershipPlans,
            singular: "membership plan",
            schema: MEMBERSHIP_PLAN_SCHEMA,
            columns: &[("Name", "name"), ("Price", "price"), ("Reward multiplier", "rewardMultiplier")],
        },
        Page::AdminRewardRates => ResourceSpec {
            resource: AdminResource::RewardRates,
            singular: "reward rate",
            schema: REWARD_RATE_SCHEMA,
            columns: &[("Category", "category"), ("Points per kg", "pointsPerKg")],
        },
        _ => return None,
    };
    Some(spec)
}

pub fn resource_page(page: Page) -> AnyView {
    match spec_for(page) {
        Some(spec) => view! { <AdminResourcePage spec=spec /> }.into_any(),
        None => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
fn AdminResourcePage(spec: ResourceSpec) -> impl IntoView {
    let ctx = use_app();
    let resource = spec.resource;
    let schema = spec.schema;

    let rows = reloading(ctx, move |client| async move { admin::list::<Value>(&client, resource).await });
    let creating = RwSignal::new(false);
    let editing = RwSignal::new(None::<(Id, FormValues)>);

    let on_create = move |values: FormValues| {
        let body = to_json(&schema, &values);
        creating.set(false);
        run_action(ctx, "admin create", Some("Created"), move |client| async move {
            admin::create::<Value>(&client, resource, &body).await
        });
    };

    let on_update = move |values: FormValues| {
        let Some((id, _)) = editing.get_untracked() else {
            return;
        };
        let body = to_json(&schema, &values);
        editing.set(None);
        run_action(ctx, "admin update", Some("Saved"), move |client| async move {
            admin::update::<Value>(&client, resource, id, &body).await
        });
    };

    let row_actions = Callback::new(move |row: Value| {
        let Some(id) = row.get("id").and_then(Value::as_u64) else {
            return ().into_any();
        };
        let initial = from_json(&schema, &row);
        view! {
            <button class="secondary-btn" on:click=move |_| editing.set(Some((id, initial.clone())))>"Edit"</button>
            <DeleteConfirmButton on_confirm=move |_| {
                run_action(ctx, "admin delete", Some("Deleted"), move |client| async move {
                    admin::delete(&client, resource, id).await
                });
            } />
        }
        .into_any()
    });

    view! {
        <section class="page">
            <PageHeader title=resource.label()>
                <button class="primary-btn" on:click=move |_| creating.set(true)>
                    {format!("New {}", spec.singular)}
                </button>
            </PageHeader>

            {move || load_state(rows.get(), |records| {
                let columns: Vec<Column<Value>> =
                    spec.columns.iter().map(|&(header, key)| Column::field(header, key)).collect();
                view! { <DataTable rows=records columns=columns actions=row_actions /> }.into_any()
            })}

            <Modal
                open=creating
                on_close=move |_| creating.set(false)
                title=format!("New {}", spec.singular)
            >
                <EntityForm schema=schema on_submit=on_create submit_label="Create" />
            </Modal>

            <Modal
                open=Signal::derive(move || editing.with(|e| e.is_some()))
                on_close=move |_| editing.set(None)
                title=format!("Edit {}", spec.singular)
            >
                {move || editing.get().map(|(_, initial)| view! {
                    <EntityForm schema=schema on_submit=on_update initial=initial />
                })}
            </Modal>
        </section>
    }
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let ctx = use_app();
    let users = reloading(ctx, |client| async move { admin::list_users(&client).await });
    let zones = reloading(ctx, |client| async move { admin::list_zones(&client).await });
    let households = reloading(ctx, |client| async move { admin::list_households(&client).await });
    let bins = reloading(ctx, |client| async move { admin::list_bins(&client).await });
    let vehicles = reloading(ctx, |client| async move { admin::list_vehicles(&client).await });

    view! {
        <section class="page">
            <PageHeader title="Admin dashboard" />
            <div class="stat-grid">
                <div class="stat-card">
                    <h3>"Users"</h3>
                    {move || load_state(users.get(), |list| {
                        let breakdown = role_breakdown(&list);
                        view! {
                            <p class="stat-value">{list.len()}</p>
                            <p class="stat-detail">{breakdown}</p>
                        }.into_any()
                    })}
                </div>
                <div class="stat-card">
                    <h3>"Zones"</h3>
                    {move || load_state(zones.get(), |list| view! { <p class="stat-value">{list.len()}</p> }.into_any())}
                </div>
                <div class="stat-card">
                    <h3>"Households"</h3>
                    {move || load_state(households.get(), |list| view! { <p class="stat-value">{list.len()}</p> }.into_any())}
                </div>
                <div class="stat-card">
                    <h3>"Bins"</h3>
                    {move || load_state(bins.get(), |list| {
                        let full = full_bins(&list);
                        view! {
                            <p class="stat-value">{list.len()}</p>
                            <p class="stat-detail">{format!("{} at {}%+ fill", full, FULL_BIN_THRESHOLD)}</p>
                        }.into_any()
                    })}
                </div>
                <div class="stat-card">
                    <h3>"Vehicles"</h3>
                    {move || load_state(vehicles.get(), |list| {
                        let active = active_vehicles(&list);
                        view! {
                            <p class="stat-value">{list.len()}</p>
                            <p class="stat-detail">{format!("{} active", active)}</p>
                        }.into_any()
                    })}
                </div>
            </div>
        </section>
    }
}

fn role_breakdown(users: &[User]) -> String {
    Role::ALL
        .iter()
        .map(|role| format!("{} {}", users.iter().filter(|u| u.role == *role).count(), role.label()))
        .collect::<Vec<_>>()
        .join(" · ")
}

fn full_bins(bins: &[Bin]) -> usize {
    bins.iter().filter(|b| b.fill_level.is_some_and(|f| f >= FULL_BIN_THRESHOLD)).count()
}

fn active_vehicles(vehicles: &[Vehicle]) -> usize {
    vehicles
        .iter()
        .filter(|v| v.status.as_deref().map_or(true, |s| s.eq_ignore_ascii_case("ACTIVE")))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::nav_for;

    #[test]
    fn test_every_admin_page_has_a_spec() {
        for entry in nav_for(Role::Admin).iter().skip(1) {
            let spec = spec_for(entry.page).unwrap_or_else(|| panic!("no spec for {:?}", entry.page));
            assert_eq!(spec.resource.label(), entry.label);
            assert!(!spec.columns.is_empty());
        }
        assert!(spec_for(Page::AdminDashboard).is_none());
    }

    #[test]
    fn test_dashboard_counters() {
        let bins: Vec<Bin> = serde_json::from_value(serde_json::json!([
            {"id": 1, "fillLevel": 95.0},
            {"id": 2, "fillLevel": 40.0},
            {"id": 3}
        ]))
        .unwrap();
        assert_eq!(full_bins(&bins), 1);

        let vehicles: Vec<Vehicle> = serde_json::from_value(serde_json::json!([
            {"id": 1, "plateNumber": "A", "status": "ACTIVE"},
            {"id": 2, "plateNumber": "B", "status": "MAINTENANCE"},
            {"id": 3, "plateNumber": "C"}
        ]))
        .unwrap();
        assert_eq!(active_vehicles(&vehicles), 2);
    }
}
