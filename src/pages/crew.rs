//! Crew Pages

use leptos::prelude::*;
use wastewise_client::models::{CrewException, Id, RecyclableSubmission, Route, RouteStop, Task};
use wastewise_client::sdk::crew::{self, NewException, RecyclableVerification};
use wastewise_client::UploadFile;

use super::{fmt_time, load_state, reloading, run_action, PageHeader};
use crate::components::{field_id, field_text, or_dash, Column, DataTable, EntityForm, FileInput, Modal};
use crate::context::use_app;
use crate::validation::{FormValues, EXCEPTION_SCHEMA};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskStep {
    Start,
    Complete,
    Done,
}

fn next_step(status: &str) -> TaskStep {
    match status.to_ascii_uppercase().as_str() {
        "IN_PROGRESS" | "STARTED" => TaskStep::Complete,
        "COMPLETED" | "DONE" | "CANCELLED" => TaskStep::Done,
        _ => TaskStep::Start,
    }
}

fn ordered_stops(route: &Route) -> Vec<RouteStop> {
    let mut stops = route.stops.clone();
    stops.sort_by_key(|s| s.sequence);
    stops
}

fn new_exception(values: &FormValues) -> NewException {
    NewException {
        task_id: field_id(values, "taskId"),
        reason: field_text(values, "reason").unwrap_or_default(),
        note: field_text(values, "note"),
    }
}

#[component]
pub fn TodaysRoutePage() -> impl IntoView {
    let ctx = use_app();
    let route = reloading(ctx, |client| async move { crew::todays_route(&client).await });

    view! {
        <section class="page">
            <PageHeader title="Today's route">
                <button class="secondary-btn" on:click=move |_| ctx.reload()>"Refresh"</button>
            </PageHeader>
            {move || load_state(route.get(), |route| match route {
                None => view! { <p class="empty-state">"No route assigned for today."</p> }.into_any(),
                Some(route) => {
                    let stops = ordered_stops(&route);
                    let done = stops.iter().filter(|s| s.completed).count();
                    view! {
                        <div class="panel">
                            <p>{format!("Route #{} · {} · vehicle {}", route.id, or_dash(route.date.clone()), or_dash(route.vehicle_id))}</p>
                            <p class="stat-detail">{format!("{} of {} stops completed", done, stops.len())}</p>
                        </div>
                        <ol class="route-stops">
                            {stops.into_iter().map(|stop| view! {
                                <li class="route-stop" class:completed=stop.completed>
                                    <span class="stop-seq">{stop.sequence}</span>
                                    <span class="stop-address">{or_dash(stop.address)}</span>
                                    {stop.task_id.map(|id| view! { <span class="stop-task">{format!("Task #{id}")}</span> })}
                                </li>
                            }).collect_view()}
                        </ol>
                    }.into_any()
                }
            })}
        </section>
    }
}

#[component]
pub fn CrewTasksPage() -> impl IntoView {
    let ctx = use_app();
    let tasks = reloading(ctx, |client| async move { crew::list_tasks(&client).await });
    let proof_for = RwSignal::new(None::<Id>);
    let proof_file = RwSignal::new(None::<UploadFile>);
    let proof_note = RwSignal::new(String::new());

    let close_proof = move || {
        proof_for.set(None);
        proof_file.set(None);
        proof_note.set(String::new());
    };

    let submit_proof = move |_: web_sys::MouseEvent| {
        let Some(task_id) = proof_for.get_untracked() else {
            return;
        };
        let Some(file) = proof_file.get_untracked() else {
            ctx.toasts.error("Choose a photo first");
            return;
        };
        let note = proof_note.get_untracked();
        close_proof();
        run_action(ctx, "upload proof", Some("Proof uploaded"), move |client| async move {
            let note = note.trim();
            crew::upload_proof(&client, task_id, file, (!note.is_empty()).then_some(note)).await
        });
    };

    let actions = Callback::new(move |task: Task| {
        let id = task.id;
        let step = match next_step(&task.status) {
            TaskStep::Start => view! {
                <button class="primary-btn" on:click=move |_| {
                    run_action(ctx, "start task", Some("Task started"), move |client| async move {
                        crew::start_task(&client, id).await
                    });
                }>"Start"</button>
            }
            .into_any(),
            TaskStep::Complete => view! {
                <button class="primary-btn" on:click=move |_| {
                    run_action(ctx, "complete task", Some("Task completed"), move |client| async move {
                        crew::complete_task(&client, id).await
                    });
                }>"Complete"</button>
            }
            .into_any(),
            TaskStep::Done => ().into_any(),
        };
        view! {
            {step}
            <button class="secondary-btn" on:click=move |_| proof_for.set(Some(id))>"Upload proof"</button>
        }
        .into_any()
    });

    view! {
        <section class="page">
            <PageHeader title="My tasks" />
            {move || load_state(tasks.get(), |list| {
                let columns = vec![
                    Column::new("#", |t: &Task| t.id.to_string()),
                    Column::new("Title", |t: &Task| t.title.clone()),
                    Column::badge("Status", |t: &Task| t.status.clone()),
                    Column::new("Address", |t: &Task| or_dash(t.address.clone())),
                    Column::new("Due", |t: &Task| fmt_time(t.due_at)),
                ];
                view! { <DataTable rows=list columns=columns actions=actions empty_text="No tasks assigned." /> }.into_any()
            })}
            <Modal
                open=Signal::derive(move || proof_for.with(|p| p.is_some()))
                on_close=move |_| close_proof()
                title=Signal::derive(move || format!("Proof for task #{}", or_dash(proof_for.get())))
            >
                <div class="form-field">
                    <label>"Photo"</label>
                    <FileInput on_file={move |file: Option<UploadFile>| proof_file.set(file)} />
                </div>
                <div class="form-field">
                    <label>"Note"</label>
                    <textarea
                        prop:value=move || proof_note.get()
                        on:input=move |ev| proof_note.set(event_target_value(&ev))
                    ></textarea>
                </div>
                <button
                    class="primary-btn"
                    disabled=move || proof_file.with(|f| f.is_none())
                    on:click=submit_proof
                >"Upload"</button>
            </Modal>
        </section>
    }
}

#[component]
pub fn RecyclableVerificationPage() -> impl IntoView {
    let ctx = use_app();
    let pending = reloading(ctx, |client| async move { crew::pending_recyclables(&client).await });

    let actions = Callback::new(move |submission: RecyclableSubmission| {
        let id = submission.id;
        let weight = RwSignal::new(submission.estimated_weight_kg.map(|w| w.to_string()).unwrap_or_default());
        let verify = move |approved: bool| {
            let verified_weight_kg = weight.get_untracked().trim().parse::<f64>().ok().filter(|w| *w > 0.0);
            if approved && verified_weight_kg.is_none() {
                ctx.toasts.error("Enter the measured weight");
                return;
            }
            let verification = RecyclableVerification { approved, verified_weight_kg, note: None };
            let message = if approved { "Submission approved" } else { "Submission rejected" };
            run_action(ctx, "verify recyclable", Some(message), move |client| async move {
                crew::verify_recyclable(&client, id, &verification).await
            });
        };
        view! {
            <input
                type="number"
                step="0.1"
                class="inline-input"
                placeholder="kg"
                prop:value=move || weight.get()
                on:input=move |ev| weight.set(event_target_value(&ev))
            />
            <button class="primary-btn" on:click=move |_| verify(true)>"Approve"</button>
            <button class="secondary-btn" on:click=move |_| verify(false)>"Reject"</button>
        }
        .into_any()
    });

    view! {
        <section class="page">
            <PageHeader title="Recyclable verification" />
            {move || load_state(pending.get(), |list| {
                let columns = vec![
                    Column::new("#", |r: &RecyclableSubmission| r.id.to_string()),
                    Column::new("Category", |r: &RecyclableSubmission| r.category.clone()),
                    Column::new("Estimated (kg)", |r: &RecyclableSubmission| or_dash(r.estimated_weight_kg)),
                    Column::badge("Status", |r: &RecyclableSubmission| r.status.clone()),
                    Column::new("Photo", |r: &RecyclableSubmission| if r.photo_url.is_some() { "Yes" } else { "No" }.to_string()),
                ];
                view! { <DataTable rows=list columns=columns actions=actions empty_text="Nothing waiting for verification." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn ExceptionsPage() -> impl IntoView {
    let ctx = use_app();
    let exceptions = reloading(ctx, |client| async move { crew::list_exceptions(&client).await });

    let on_report = move |values: FormValues| {
        let exception = new_exception(&values);
        run_action(ctx, "report exception", Some("Exception reported"), move |client| async move {
            crew::report_exception(&client, &exception).await
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Exceptions" />
            <div class="panel">
                <h2>"Report an exception"</h2>
                <EntityForm schema=EXCEPTION_SCHEMA on_submit=on_report submit_label="Report" />
            </div>
            {move || load_state(exceptions.get(), |list| {
                let columns = vec![
                    Column::new("#", |e: &CrewException| e.id.to_string()),
                    Column::new("Task", |e: &CrewException| or_dash(e.task_id)),
                    Column::badge("Reason", |e: &CrewException| e.reason.clone()),
                    Column::new("Note", |e: &CrewException| or_dash(e.note.clone())),
                    Column::new("Reported", |e: &CrewException| fmt_time(e.created_at)),
                ];
                view! { <DataTable rows=list columns=columns empty_text="No exceptions reported." /> }.into_any()
            })}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_next_step() {
        assert_eq!(next_step("ASSIGNED"), TaskStep::Start);
        assert_eq!(next_step("open"), TaskStep::Start);
        assert_eq!(next_step("IN_PROGRESS"), TaskStep::Complete);
        assert_eq!(next_step("Completed"), TaskStep::Done);
    }

    #[test]
    fn test_stops_follow_sequence() {
        let route: Route = serde_json::from_value(json!({
            "id": 4,
            "stops": [
                {"sequence": 3, "address": "C"},
                {"sequence": 1, "address": "A", "completed": true},
                {"sequence": 2, "address": "B"}
            ]
        }))
        .unwrap();
        let addresses: Vec<_> = ordered_stops(&route).into_iter().filter_map(|s| s.address).collect();
        assert_eq!(addresses, ["A", "B", "C"]);
    }

    #[test]
    fn test_new_exception_from_form() {
        let values: FormValues = [("taskId", "7"), ("reason", "BIN_MISSING"), ("note", "")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let exception = new_exception(&values);
        assert_eq!(exception.task_id, Some(7));
        assert_eq!(exception.reason, "BIN_MISSING");
        assert_eq!(exception.note, None);
    }
}
