//! Citizen Pages

use leptos::prelude::*;
use leptos::task::spawn_local;
use wastewise_client::models::{
    BulkyRequest, Case, Id, Invoice, LitterReport, Notification, RecyclableSubmission, RewardClaim, WalletTransaction,
};
use wastewise_client::sdk::citizen::{self, HouseholdPlanUpdate, NewBulkyRequest, NewLitterReport, NewRecyclable};
use wastewise_client::UploadFile;

use super::{fmt_time, load_state, money, reloading, run_action, PageHeader};
use crate::components::{
    field_number, field_text, or_dash, Column, DataTable, EntityForm, FileInput, StatusBadge,
};
use crate::context::use_app;
use crate::payments::submit_gateway_form;
use crate::routes::{path_for, Page, APP_PATH};
use crate::validation::{
    FormValues, BULKY_REQUEST_SCHEMA, LITTER_REPORT_SCHEMA, RECYCLABLE_SCHEMA, REWARD_CLAIM_SCHEMA,
};

const WEEKDAYS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// (count, total amount) of invoices still to pay
fn outstanding(invoices: &[Invoice]) -> (usize, f64) {
    invoices
        .iter()
        .filter(|i| i.is_payable())
        .fold((0, 0.0), |(n, total), i| (n + 1, total + i.amount))
}

fn unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Toggle `day` in a schedule, keeping weekday order
fn toggle_day(days: &[String], day: &str) -> Vec<String> {
    let on = days.iter().any(|d| d == day);
    WEEKDAYS
        .iter()
        .filter(|w| if **w == day { !on } else { days.iter().any(|d| d == *w) })
        .map(|w| w.to_string())
        .collect()
}

fn parse_plan_id(value: &str) -> Option<Id> {
    value.trim().parse().ok()
}

#[component]
fn NavLink(page: Page, label: &'static str) -> impl IntoView {
    let ctx = use_app();
    let path = path_for(page).unwrap_or(APP_PATH);
    view! {
        <a href=path on:click=move |ev| {
            ev.prevent_default();
            ctx.navigate(path);
        }>{label}</a>
    }
}

#[component]
pub fn CitizenDashboard() -> impl IntoView {
    let ctx = use_app();
    let wallet = reloading(ctx, |client| async move { citizen::wallet(&client).await });
    let invoices = reloading(ctx, |client| async move { citizen::list_invoices(&client).await });
    let notifications = reloading(ctx, |client| async move { citizen::notifications(&client).await });

    view! {
        <section class="page">
            <PageHeader title="My dashboard" />
            <div class="stat-grid">
                <div class="stat-card">
                    <h3>"Wallet"</h3>
                    {move || load_state(wallet.get(), |w| view! {
                        <p class="stat-value">{money(w.balance)}</p>
                        <p class="stat-detail">{format!("{:.0} reward points", w.points)}</p>
                    }.into_any())}
                    <NavLink page=Page::CitizenWallet label="Open wallet" />
                </div>
                <div class="stat-card">
                    <h3>"Unpaid invoices"</h3>
                    {move || load_state(invoices.get(), |list| {
                        let (count, total) = outstanding(&list);
                        view! {
                            <p class="stat-value">{count}</p>
                            <p class="stat-detail">{format!("{} due", money(total))}</p>
                        }.into_any()
                    })}
                    <NavLink page=Page::CitizenInvoices label="View invoices" />
                </div>
                <div class="stat-card">
                    <h3>"Notifications"</h3>
                    {move || load_state(notifications.get(), |list| view! {
                        <p class="stat-value">{unread(&list)}</p>
                        <p class="stat-detail">"unread"</p>
                    }.into_any())}
                    <NavLink page=Page::CitizenNotifications label="Read" />
                </div>
            </div>
            <div class="quick-actions">
                <NavLink page=Page::CitizenReports label="Report litter" />
                <NavLink page=Page::CitizenBulky label="Book a bulky pickup" />
                <NavLink page=Page::CitizenRecyclables label="Submit recyclables" />
            </div>
        </section>
    }
}

#[component]
pub fn LitterReportsPage() -> impl IntoView {
    let ctx = use_app();
    let reports = reloading(ctx, |client| async move { citizen::list_litter_reports(&client).await });

    let on_submit = move |values: FormValues| {
        let report = NewLitterReport {
            description: field_text(&values, "description").unwrap_or_default(),
            location: field_text(&values, "location"),
            latitude: None,
            longitude: None,
        };
        run_action(ctx, "report litter", Some("Report submitted"), move |client| async move {
            citizen::create_litter_report(&client, &report).await
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Litter reports" />
            <div class="panel">
                <h2>"New report"</h2>
                <EntityForm schema=LITTER_REPORT_SCHEMA on_submit=on_submit submit_label="Submit report" />
            </div>
            {move || load_state(reports.get(), |list| {
                let columns = vec![
                    Column::new("#", |r: &LitterReport| r.id.to_string()),
                    Column::new("Description", |r: &LitterReport| r.description.clone()),
                    Column::new("Location", |r: &LitterReport| or_dash(r.location.clone())),
                    Column::badge("Status", |r: &LitterReport| r.status.clone()),
                    Column::new("Reported", |r: &LitterReport| fmt_time(r.created_at)),
                ];
                view! { <DataTable rows=list columns=columns empty_text="You have not reported anything yet." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn BulkyPickupPage() -> impl IntoView {
    let ctx = use_app();
    let requests = reloading(ctx, |client| async move { citizen::list_bulky_requests(&client).await });

    let on_submit = move |values: FormValues| {
        let request = NewBulkyRequest {
            items: field_text(&values, "items").unwrap_or_default(),
            preferred_date: field_text(&values, "preferredDate"),
        };
        run_action(ctx, "request bulky pickup", Some("Pickup requested"), move |client| async move {
            citizen::create_bulky_request(&client, &request).await
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Bulky pickup" />
            <div class="panel">
                <h2>"Request a pickup"</h2>
                <EntityForm schema=BULKY_REQUEST_SCHEMA on_submit=on_submit submit_label="Request pickup" />
            </div>
            {move || load_state(requests.get(), |list| {
                let columns = vec![
                    Column::new("#", |r: &BulkyRequest| r.id.to_string()),
                    Column::new("Items", |r: &BulkyRequest| r.items.clone()),
                    Column::new("Preferred date", |r: &BulkyRequest| or_dash(r.preferred_date.clone())),
                    Column::badge("Status", |r: &BulkyRequest| r.status.clone()),
                ];
                view! { <DataTable rows=list columns=columns empty_text="No pickup requests." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn MyCasesPage() -> impl IntoView {
    let ctx = use_app();
    let cases = reloading(ctx, |client| async move { citizen::list_cases(&client).await });

    view! {
        <section class="page">
            <PageHeader title="My cases" />
            {move || load_state(cases.get(), |list| {
                let columns = vec![
                    Column::new("#", |c: &Case| c.id.to_string()),
                    Column::new("Type", |c: &Case| or_dash(c.case_type.clone())),
                    Column::new("Description", |c: &Case| or_dash(c.description.clone())),
                    Column::badge("Status", |c: &Case| c.status.clone()),
                    Column::new("Opened", |c: &Case| fmt_time(c.created_at)),
                ];
                view! { <DataTable rows=list columns=columns empty_text="No open cases." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn RewardsPage() -> impl IntoView {
    let ctx = use_app();
    let wallet = reloading(ctx, |client| async move { citizen::wallet(&client).await });
    let claims = reloading(ctx, |client| async move { citizen::list_reward_claims(&client).await });

    let on_claim = move |values: FormValues| {
        let Some(points) = field_number(&values, "points") else {
            return;
        };
        let note = field_text(&values, "note");
        run_action(ctx, "claim reward", Some("Claim submitted"), move |client| async move {
            citizen::create_reward_claim(&client, points, note.as_deref()).await
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Rewards" />
            <div class="panel">
                {move || load_state(wallet.get(), |w| view! {
                    <p>{format!("You have {:.0} points to redeem.", w.points)}</p>
                }.into_any())}
                <EntityForm schema=REWARD_CLAIM_SCHEMA on_submit=on_claim submit_label="Claim" />
            </div>
            {move || load_state(claims.get(), |list| {
                let columns = vec![
                    Column::new("#", |c: &RewardClaim| c.id.to_string()),
                    Column::new("Points", |c: &RewardClaim| format!("{:.0}", c.points)),
                    Column::badge("Status", |c: &RewardClaim| c.status.clone()),
                    Column::new("Note", |c: &RewardClaim| or_dash(c.note.clone())),
                ];
                view! { <DataTable rows=list columns=columns empty_text="No claims yet." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn WalletPage() -> impl IntoView {
    let ctx = use_app();
    let wallet = reloading(ctx, |client| async move { citizen::wallet(&client).await });
    let transactions = reloading(ctx, |client| async move { citizen::wallet_transactions(&client).await });

    view! {
        <section class="page">
            <PageHeader title="Wallet" />
            <div class="stat-grid">
                {move || load_state(wallet.get(), |w| view! {
                    <div class="stat-card">
                        <h3>"Balance"</h3>
                        <p class="stat-value">{money(w.balance)}</p>
                    </div>
                    <div class="stat-card">
                        <h3>"Points"</h3>
                        <p class="stat-value">{format!("{:.0}", w.points)}</p>
                    </div>
                }.into_any())}
            </div>
            <h2>"Transactions"</h2>
            {move || load_state(transactions.get(), |list| {
                let columns = vec![
                    Column::new("Date", |t: &WalletTransaction| fmt_time(t.created_at)),
                    Column::new("Type", |t: &WalletTransaction| or_dash(t.kind.clone())),
                    Column::new("Description", |t: &WalletTransaction| or_dash(t.description.clone())),
                    Column::new("Amount", |t: &WalletTransaction| money(t.amount)),
                ];
                view! { <DataTable rows=list columns=columns empty_text="No transactions." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn InvoicesPage() -> impl IntoView {
    let ctx = use_app();
    let invoices = reloading(ctx, |client| async move { citizen::list_invoices(&client).await });
    let (paying, set_paying) = signal(None::<Id>);

    let pay = move |invoice_id: Id| {
        set_paying.set(Some(invoice_id));
        let client = ctx.client();
        spawn_local(async move {
            match citizen::initiate_payment(&client, invoice_id).await {
                Ok(redirect) => {
                    if let Err(e) = submit_gateway_form(&redirect) {
                        tracing::error!(error = %e, invoice_id, "gateway redirect failed");
                        ctx.toasts.error("Could not open the payment page");
                        set_paying.try_set(None);
                    }
                }
                Err(e) => {
                    ctx.report("initiate payment", &e);
                    set_paying.try_set(None);
                }
            }
        });
    };

    let actions = Callback::new(move |invoice: Invoice| {
        if !invoice.is_payable() {
            return ().into_any();
        }
        let id = invoice.id;
        view! {
            <button
                class="primary-btn"
                disabled=move || paying.get().is_some()
                on:click=move |_| pay(id)
            >
                {move || if paying.get() == Some(id) { "Redirecting…" } else { "Pay" }}
            </button>
        }
        .into_any()
    });

    view! {
        <section class="page">
            <PageHeader title="Invoices" />
            {move || load_state(invoices.get(), |list| {
                let columns = vec![
                    Column::new("#", |i: &Invoice| i.id.to_string()),
                    Column::new("Period", |i: &Invoice| or_dash(i.period.clone())),
                    Column::new("Amount", |i: &Invoice| money(i.amount)),
                    Column::new("Due", |i: &Invoice| or_dash(i.due_date.clone())),
                    Column::badge("Status", |i: &Invoice| i.status.clone()),
                ];
                view! { <DataTable rows=list columns=columns actions=actions empty_text="No invoices." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn PlansPage() -> impl IntoView {
    let ctx = use_app();
    let billing_plans = reloading(ctx, |client| async move { citizen::billing_plans(&client).await });
    let membership_plans = reloading(ctx, |client| async move { citizen::membership_plans(&client).await });

    let billing_choice = RwSignal::new(String::new());
    let membership_choice = RwSignal::new(String::new());
    let days = RwSignal::new(Vec::<String>::new());

    let save_plan = move |_: web_sys::MouseEvent| {
        let update = HouseholdPlanUpdate {
            billing_plan_id: parse_plan_id(&billing_choice.get_untracked()),
            membership_plan_id: parse_plan_id(&membership_choice.get_untracked()),
        };
        if update.billing_plan_id.is_none() && update.membership_plan_id.is_none() {
            ctx.toasts.error("Pick a plan first");
            return;
        }
        run_action(ctx, "update plan", Some("Plan updated"), move |client| async move {
            citizen::update_household_plan(&client, &update).await
        });
    };

    let save_schedule = move |_: web_sys::MouseEvent| {
        let selected = days.get_untracked();
        if selected.is_empty() {
            ctx.toasts.error("Pick at least one collection day");
            return;
        }
        run_action(ctx, "update schedule", Some("Schedule updated"), move |client| async move {
            citizen::update_household_schedule(&client, &selected).await
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Plans & schedule" />
            <div class="panel">
                <h2>"Plans"</h2>
                <div class="form-field">
                    <label>"Billing plan"</label>
                    {move || load_state(billing_plans.get(), |plans| view! {
                        <select on:change=move |ev| billing_choice.set(event_target_value(&ev))>
                            <option value="">"Keep current"</option>
                            {plans.into_iter().map(|p| view! {
                                <option value=p.id.to_string()>{format!("{} ({}/month)", p.name, money(p.monthly_fee))}</option>
                            }).collect_view()}
                        </select>
                    }.into_any())}
                </div>
                <div class="form-field">
                    <label>"Membership"</label>
                    {move || load_state(membership_plans.get(), |plans| view! {
                        <select on:change=move |ev| membership_choice.set(event_target_value(&ev))>
                            <option value="">"Keep current"</option>
                            {plans.into_iter().map(|p| view! {
                                <option value=p.id.to_string()>{format!("{} ({})", p.name, money(p.price))}</option>
                            }).collect_view()}
                        </select>
                    }.into_any())}
                </div>
                <button class="primary-btn" on:click=save_plan>"Save plan"</button>
            </div>
            <div class="panel">
                <h2>"Collection days"</h2>
                <div class="day-picker">
                    {WEEKDAYS.iter().map(|day| {
                        let day = *day;
                        view! {
                            <label class="day-option">
                                <input
                                    type="checkbox"
                                    prop:checked=move || days.with(|d| d.iter().any(|x| x == day))
                                    on:change=move |_| days.update(|d| *d = toggle_day(d, day))
                                />
                                {day}
                            </label>
                        }
                    }).collect_view()}
                </div>
                <button class="primary-btn" on:click=save_schedule>"Save schedule"</button>
            </div>
        </section>
    }
}

#[component]
pub fn RecyclablesPage() -> impl IntoView {
    let ctx = use_app();
    let submissions = reloading(ctx, |client| async move { citizen::list_recyclables(&client).await });
    let photo = RwSignal::new(None::<UploadFile>);

    let on_submit = move |values: FormValues| {
        let submission = NewRecyclable {
            category: field_text(&values, "category").unwrap_or_default(),
            estimated_weight_kg: field_number(&values, "estimatedWeightKg"),
            photo: photo.get_untracked(),
        };
        photo.set(None);
        run_action(ctx, "submit recyclables", Some("Submitted for verification"), move |client| async move {
            citizen::submit_recyclable(&client, submission).await
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Recyclables" />
            <div class="panel">
                <h2>"Submit recyclables"</h2>
                <div class="form-field">
                    <label>"Photo (optional)"</label>
                    <FileInput on_file={move |file: Option<UploadFile>| photo.set(file)} />
                    {move || photo.with(|p| p.as_ref().map(|f| view! { <span class="file-name">{f.file_name.clone()}</span> }))}
                </div>
                <EntityForm schema=RECYCLABLE_SCHEMA on_submit=on_submit submit_label="Submit" />
            </div>
            {move || load_state(submissions.get(), |list| {
                let columns = vec![
                    Column::new("#", |r: &RecyclableSubmission| r.id.to_string()),
                    Column::new("Category", |r: &RecyclableSubmission| r.category.clone()),
                    Column::new("Estimated (kg)", |r: &RecyclableSubmission| or_dash(r.estimated_weight_kg)),
                    Column::new("Verified (kg)", |r: &RecyclableSubmission| or_dash(r.verified_weight_kg)),
                    Column::badge("Status", |r: &RecyclableSubmission| r.status.clone()),
                ];
                view! { <DataTable rows=list columns=columns empty_text="No submissions yet." /> }.into_any()
            })}
        </section>
    }
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let ctx = use_app();
    let notifications = reloading(ctx, |client| async move { citizen::notifications(&client).await });

    let mark_read = move |id: Id| {
        run_action(ctx, "mark notification read", None, move |client| async move {
            citizen::mark_notification_read(&client, id).await
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Notifications" />
            {move || load_state(notifications.get(), |list| {
                if list.is_empty() {
                    return view! { <p class="empty-state">"You're all caught up."</p> }.into_any();
                }
                view! {
                    <ul class="notification-list">
                        {list.into_iter().map(|n| {
                            let id = n.id;
                            view! {
                                <li class="notification" class:unread=!n.read>
                                    <div class="notification-head">
                                        <strong>{n.title}</strong>
                                        <span class="muted">{fmt_time(n.created_at)}</span>
                                        {(!n.read).then(|| view! { <StatusBadge status="NEW" /> })}
                                    </div>
                                    {n.body.map(|body| view! { <p>{body}</p> })}
                                    {(!n.read).then(|| view! {
                                        <button class="secondary-btn" on:click=move |_| mark_read(id)>"Mark read"</button>
                                    })}
                                </li>
                            }
                        }).collect_view()}
                    </ul>
                }.into_any()
            })}
        </section>
    }
}
