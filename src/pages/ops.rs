//! Operations (Supervisor) Pages

use leptos::prelude::*;
use leptos::task::spawn_local;
use wastewise_client::models::{BillingRun, Case, Id, RewardClaim, Route, Task, VehicleLocation};
use wastewise_client::sdk::ops::{self, NewTask};

use super::{fmt_time, load_state, reloading, run_action, PageHeader};
use crate::components::{field_id, field_text, or_dash, Column, DataTable, EntityForm, Heatmap, Modal};
use crate::context::use_app;
use crate::heatmap::build_grid;
use crate::routes::{path_for, Page, APP_PATH};
use crate::validation::{FormValues, BILLING_RUN_SCHEMA, CASE_STATUSES, GENERATE_ROUTES_SCHEMA, NEW_TASK_SCHEMA};

fn is_open(status: &str) -> bool {
    !matches!(status.to_ascii_uppercase().as_str(), "RESOLVED" | "CLOSED" | "COMPLETED" | "CANCELLED")
}

fn is_pending(status: &str) -> bool {
    status.eq_ignore_ascii_case("PENDING")
}

fn new_task(values: &FormValues) -> NewTask {
    NewTask {
        title: field_text(values, "title").unwrap_or_default(),
        case_id: field_id(values, "caseId"),
        address: field_text(values, "address"),
        due_at: field_text(values, "dueAt"),
    }
}

#[component]
pub fn OpsDashboard() -> impl IntoView {
    let ctx = use_app();
    let cases = reloading(ctx, |client| async move { ops::list_cases(&client).await });
    let tasks = reloading(ctx, |client| async move { ops::list_tasks(&client).await });
    let claims = reloading(ctx, |client| async move { ops::list_reward_claims(&client).await });
    let twin = reloading(ctx, |client| async move { ops::digital_twin(&client, None).await });

    let stat = move |title: &'static str, value: Option<Result<usize, String>>, page: Page| {
        let path = path_for(page).unwrap_or(APP_PATH);
        view! {
            <div class="stat-card">
                <h3>{title}</h3>
                <p class="stat-value">
                    {match value {
                        None => "…".to_string(),
                        Some(Ok(n)) => n.to_string(),
                        Some(Err(message)) => message,
                    }}
                </p>
                <a href=path on:click=move |ev| {
                    ev.prevent_default();
                    ctx.navigate(path);
                }>"Open"</a>
            </div>
        }
    };

    view! {
        <section class="page">
            <PageHeader title="Operations dashboard" />
            <div class="stat-grid">
                {move || stat(
                    "Open cases",
                    cases.get().map(|r| r.map(|l| l.iter().filter(|c| is_open(&c.status)).count()).map_err(|e| e.user_message())),
                    Page::OpsCases,
                )}
                {move || stat(
                    "Open tasks",
                    tasks.get().map(|r| r.map(|l| l.iter().filter(|t| is_open(&t.status)).count()).map_err(|e| e.user_message())),
                    Page::OpsTasks,
                )}
                {move || stat(
                    "Pending reward claims",
                    claims.get().map(|r| r.map(|l| l.iter().filter(|c| is_pending(&c.status)).count()).map_err(|e| e.user_message())),
                    Page::OpsRewardClaims,
                )}
            </div>
            <h2>"Digital twin"</h2>
            {move || load_state(twin.get(), |twin| view! { <Heatmap grid=build_grid(&twin.cells) /> }.into_any())}
        </section>
    }
}

#[component]
pub fn CasesPage() -> impl IntoView {
    let ctx = use_app();
    let cases = reloading(ctx, |client| async move { ops::list_cases(&client).await });

    let actions = Callback::new(move |case: Case| {
        let id = case.id;
        view! {
            <select
                class="inline-select"
                prop:value=case.status.clone()
                on:change=move |ev| {
                    let status = event_target_value(&ev);
                    run_action(ctx, "update case", Some("Case updated"), move |client| async move {
                        ops::update_case_status(&client, id, &status, None).await
                    });
                }
            >
                {CASE_STATUSES.iter().map(|s| view! { <option value=*s>{*s}</option> }).collect_view()}
            </select>
        }
        .into_any()
    });

    view! {
        <section class="page">
            <PageHeader title="Cases" />
            {move || load_state(cases.get(), |list| {
                let columns = vec![
                    Column::new("#", |c: &Case| c.id.to_string()),
                    Column::new("Type", |c: &Case| or_dash(c.case_type.clone())),
                    Column::badge("Status", |c: &Case| c.status.clone()),
                    Column::new("Description", |c: &Case| or_dash(c.description.clone())),
                    Column::new("Zone", |c: &Case| or_dash(c.zone_id)),
                    Column::new("Opened", |c: &Case| fmt_time(c.created_at)),
                ];
                view! { <DataTable rows=list columns=columns actions=actions empty_text="No cases." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn TasksPage() -> impl IntoView {
    let ctx = use_app();
    let tasks = reloading(ctx, |client| async move { ops::list_tasks(&client).await });
    let creating = RwSignal::new(false);

    let on_create = move |values: FormValues| {
        let task = new_task(&values);
        creating.set(false);
        run_action(ctx, "create task", Some("Task created"), move |client| async move {
            ops::create_task(&client, &task).await
        });
    };

    let actions = Callback::new(move |task: Task| {
        let id = task.id;
        let assignee = RwSignal::new(task.assignee_id.map(|a| a.to_string()).unwrap_or_default());
        view! {
            <form class="inline-form" on:submit=move |ev| {
                ev.prevent_default();
                let Ok(assignee_id) = assignee.get_untracked().trim().parse::<Id>() else {
                    ctx.toasts.error("Enter a crew member ID");
                    return;
                };
                run_action(ctx, "assign task", Some("Task assigned"), move |client| async move {
                    ops::assign_task(&client, id, assignee_id).await
                });
            }>
                <input
                    type="number"
                    placeholder="Crew ID"
                    prop:value=move || assignee.get()
                    on:input=move |ev| assignee.set(event_target_value(&ev))
                />
                <button type="submit" class="secondary-btn">"Assign"</button>
            </form>
        }
        .into_any()
    });

    view! {
        <section class="page">
            <PageHeader title="Tasks">
                <button class="primary-btn" on:click=move |_| creating.set(true)>"New task"</button>
            </PageHeader>
            {move || load_state(tasks.get(), |list| {
                let columns = vec![
                    Column::new("#", |t: &Task| t.id.to_string()),
                    Column::new("Title", |t: &Task| t.title.clone()),
                    Column::badge("Status", |t: &Task| t.status.clone()),
                    Column::new("Case", |t: &Task| or_dash(t.case_id)),
                    Column::new("Address", |t: &Task| or_dash(t.address.clone())),
                    Column::new("Due", |t: &Task| fmt_time(t.due_at)),
                ];
                view! { <DataTable rows=list columns=columns actions=actions empty_text="No tasks." /> }.into_any()
            })}
            <Modal open=creating on_close=move |_| creating.set(false) title="New task".to_string()>
                <EntityForm schema=NEW_TASK_SCHEMA on_submit=on_create submit_label="Create task" />
            </Modal>
        </section>
    }
}

#[component]
pub fn RoutesPage() -> impl IntoView {
    let ctx = use_app();
    let routes = reloading(ctx, |client| async move { ops::list_routes(&client).await });

    let on_generate = move |values: FormValues| {
        let Some(zone_id) = field_id(&values, "zoneId") else {
            return;
        };
        let date = field_text(&values, "date").unwrap_or_default();
        let client = ctx.client();
        spawn_local(async move {
            match ops::generate_routes(&client, zone_id, &date).await {
                Ok(generated) => {
                    ctx.toasts.success(format!("Generated {} route(s)", generated.len()));
                    ctx.reload();
                }
                Err(e) => ctx.report("generate routes", &e),
            }
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Routes" />
            <div class="panel">
                <h2>"Generate routes"</h2>
                <EntityForm schema=GENERATE_ROUTES_SCHEMA on_submit=on_generate submit_label="Generate" />
            </div>
            {move || load_state(routes.get(), |list| {
                let columns = vec![
                    Column::new("#", |r: &Route| r.id.to_string()),
                    Column::new("Date", |r: &Route| or_dash(r.date.clone())),
                    Column::new("Zone", |r: &Route| or_dash(r.zone_id)),
                    Column::new("Vehicle", |r: &Route| or_dash(r.vehicle_id)),
                    Column::badge("Status", |r: &Route| r.status.clone().unwrap_or_default()),
                    Column::new("Stops", |r: &Route| {
                        let done = r.stops.iter().filter(|s| s.completed).count();
                        format!("{}/{}", done, r.stops.len())
                    }),
                ];
                view! { <DataTable rows=list columns=columns empty_text="No routes planned." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn DigitalTwinPage() -> impl IntoView {
    let ctx = use_app();
    let (zone_input, set_zone_input) = signal(String::new());
    let zone = Memo::new(move |_| zone_input.with(|z| z.trim().parse::<Id>().ok()));

    let twin = LocalResource::new(move || {
        ctx.reload_trigger.track();
        let zone_id = zone.get();
        let client = ctx.client();
        async move { ops::digital_twin(&client, zone_id).await }
    });

    view! {
        <section class="page">
            <PageHeader title="Digital twin">
                <input
                    type="number"
                    placeholder="All zones"
                    prop:value=move || zone_input.get()
                    on:change=move |ev| set_zone_input.set(event_target_value(&ev))
                />
                <button class="secondary-btn" on:click=move |_| ctx.reload()>"Refresh"</button>
            </PageHeader>
            {move || load_state(twin.get(), |twin| view! {
                <p class="muted">{format!("Generated {}", fmt_time(twin.generated_at))}</p>
                <Heatmap grid=build_grid(&twin.cells) />
            }.into_any())}
        </section>
    }
}

#[component]
pub fn RewardClaimsPage() -> impl IntoView {
    let ctx = use_app();
    let claims = reloading(ctx, |client| async move { ops::list_reward_claims(&client).await });

    let actions = Callback::new(move |claim: RewardClaim| {
        if !is_pending(&claim.status) {
            return ().into_any();
        }
        let id = claim.id;
        view! {
            <button class="primary-btn" on:click=move |_| {
                run_action(ctx, "approve claim", Some("Claim approved"), move |client| async move {
                    ops::approve_reward_claim(&client, id).await
                });
            }>"Approve"</button>
            <button class="secondary-btn" on:click=move |_| {
                run_action(ctx, "reject claim", Some("Claim rejected"), move |client| async move {
                    ops::reject_reward_claim(&client, id, None).await
                });
            }>"Reject"</button>
        }
        .into_any()
    });

    view! {
        <section class="page">
            <PageHeader title="Reward claims" />
            {move || load_state(claims.get(), |list| {
                let columns = vec![
                    Column::new("#", |c: &RewardClaim| c.id.to_string()),
                    Column::new("Citizen", |c: &RewardClaim| or_dash(c.citizen_id)),
                    Column::new("Points", |c: &RewardClaim| format!("{:.0}", c.points)),
                    Column::badge("Status", |c: &RewardClaim| c.status.clone()),
                    Column::new("Note", |c: &RewardClaim| or_dash(c.note.clone())),
                ];
                view! { <DataTable rows=list columns=columns actions=actions empty_text="No claims." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn BillingPage() -> impl IntoView {
    let ctx = use_app();
    let (last_run, set_last_run) = signal::<Option<BillingRun>>(None);

    let on_generate = move |values: FormValues| {
        let period = field_text(&values, "period").unwrap_or_default();
        let client = ctx.client();
        spawn_local(async move {
            match ops::generate_billing(&client, &period).await {
                Ok(run) => {
                    ctx.toasts.success(format!("{} invoice(s) created", run.invoices_created));
                    set_last_run.set(Some(run));
                    ctx.reload();
                }
                Err(e) => ctx.report("generate billing", &e),
            }
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Billing" />
            <div class="panel">
                <h2>"Generate invoices"</h2>
                <EntityForm schema=BILLING_RUN_SCHEMA on_submit=on_generate submit_label="Run billing" />
            </div>
            {move || last_run.get().map(|run| view! {
                <div class="panel">
                    <h3>"Last run"</h3>
                    <p>{format!("Period {}: {} invoice(s)", or_dash(run.period), run.invoices_created)}</p>
                </div>
            })}
        </section>
    }
}

#[component]
pub fn VehicleTrackingPage() -> impl IntoView {
    let ctx = use_app();
    let locations = reloading(ctx, |client| async move { ops::vehicle_locations(&client).await });

    view! {
        <section class="page">
            <PageHeader title="Vehicle tracking">
                <button class="secondary-btn" on:click=move |_| ctx.reload()>"Refresh"</button>
            </PageHeader>
            {move || load_state(locations.get(), |list| {
                let columns = vec![
                    Column::new("Vehicle", |v: &VehicleLocation| v.plate_number.clone().unwrap_or_else(|| v.vehicle_id.to_string())),
                    Column::new("Latitude", |v: &VehicleLocation| format!("{:.5}", v.latitude)),
                    Column::new("Longitude", |v: &VehicleLocation| format!("{:.5}", v.longitude)),
                    Column::new("Last seen", |v: &VehicleLocation| fmt_time(v.recorded_at)),
                ];
                view! { <DataTable rows=list columns=columns empty_text="No vehicles reporting." /> }.into_any()
            })}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filters() {
        assert!(is_open("OPEN"));
        assert!(is_open("in_progress"));
        assert!(!is_open("Resolved"));
        assert!(is_pending("pending"));
        assert!(!is_pending("APPROVED"));
    }

    #[test]
    fn test_new_task_from_form() {
        let values: FormValues = [("title", "Clear dump"), ("caseId", "12"), ("address", " "), ("dueAt", "2026-05-01T09:00")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let task = new_task(&values);
        assert_eq!(task.title, "Clear dump");
        assert_eq!(task.case_id, Some(12));
        assert_eq!(task.address, None);
        assert_eq!(task.due_at.as_deref(), Some("2026-05-01T09:00"));
    }
}
