//! Pages
//!
//! One view per navigation entry plus the public and payment pages.

mod admin;
mod citizen;
mod crew;
mod login;
mod ops;
mod payment;
mod register;

use std::future::Future;

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wastewise_client::{ApiClient, ApiResult};

use crate::context::AppContext;
use crate::routes::Page;

use admin::AdminDashboard;
use citizen::{
    BulkyPickupPage, CitizenDashboard, InvoicesPage, LitterReportsPage, MyCasesPage, NotificationsPage, PlansPage,
    RecyclablesPage, RewardsPage, WalletPage,
};
use crew::{CrewTasksPage, ExceptionsPage, RecyclableVerificationPage, TodaysRoutePage};
use ops::{BillingPage, CasesPage, DigitalTwinPage, OpsDashboard, RewardClaimsPage, RoutesPage, TasksPage, VehicleTrackingPage};

pub use login::LoginPage;
pub use payment::{PaymentFailedPage, PaymentPendingPage, PaymentSuccessPage};
pub use register::RegisterPage;

/// Content for a navigation page
pub fn render_page(page: Page) -> AnyView {
    match page {
        Page::AdminDashboard => view! { <AdminDashboard /> }.into_any(),
        Page::AdminUsers
        | Page::AdminZones
        | Page::AdminHouseholds
        | Page::AdminBins
        | Page::AdminVirtualBins
        | Page::AdminVehicles
        | Page::AdminBillingPlans
        | Page::AdminMembershipPlans
        | Page::AdminRewardRates => admin::resource_page(page),

        Page::OpsDashboard => view! { <OpsDashboard /> }.into_any(),
        Page::OpsCases => view! { <CasesPage /> }.into_any(),
        Page::OpsTasks => view! { <TasksPage /> }.into_any(),
        Page::OpsRoutes => view! { <RoutesPage /> }.into_any(),
        Page::OpsDigitalTwin => view! { <DigitalTwinPage /> }.into_any(),
        Page::OpsRewardClaims => view! { <RewardClaimsPage /> }.into_any(),
        Page::OpsBilling => view! { <BillingPage /> }.into_any(),
        Page::OpsVehicles => view! { <VehicleTrackingPage /> }.into_any(),

        Page::CrewRoute => view! { <TodaysRoutePage /> }.into_any(),
        Page::CrewTasks => view! { <CrewTasksPage /> }.into_any(),
        Page::CrewRecyclables => view! { <RecyclableVerificationPage /> }.into_any(),
        Page::CrewExceptions => view! { <ExceptionsPage /> }.into_any(),

        Page::CitizenDashboard => view! { <CitizenDashboard /> }.into_any(),
        Page::CitizenReports => view! { <LitterReportsPage /> }.into_any(),
        Page::CitizenBulky => view! { <BulkyPickupPage /> }.into_any(),
        Page::CitizenCases => view! { <MyCasesPage /> }.into_any(),
        Page::CitizenRewards => view! { <RewardsPage /> }.into_any(),
        Page::CitizenWallet => view! { <WalletPage /> }.into_any(),
        Page::CitizenInvoices => view! { <InvoicesPage /> }.into_any(),
        Page::CitizenPlans => view! { <PlansPage /> }.into_any(),
        Page::CitizenRecyclables => view! { <RecyclablesPage /> }.into_any(),
        Page::CitizenNotifications => view! { <NotificationsPage /> }.into_any(),
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="page not-found">
            <h1>"Page not found"</h1>
            <p>"The page you asked for does not exist."</p>
            <a href="/app">"Back to the console"</a>
        </section>
    }
}

/// Query-cache style fetch: re-runs whenever the app reload trigger fires
pub fn reloading<T, F, Fut>(ctx: AppContext, fetch: F) -> LocalResource<ApiResult<T>>
where
    T: 'static,
    F: Fn(ApiClient) -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    LocalResource::new(move || {
        ctx.reload_trigger.track();
        fetch(ctx.client())
    })
}

/// Fire a mutation; success toasts (when given) and reloads, failure reports
pub fn run_action<T, F, Fut>(ctx: AppContext, action: &'static str, success: Option<&'static str>, call: F)
where
    T: 'static,
    F: FnOnce(ApiClient) -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    let client = ctx.client();
    spawn_local(async move {
        match call(client).await {
            Ok(_) => {
                if let Some(message) = success {
                    ctx.toasts.success(message);
                }
                ctx.reload();
            }
            Err(e) => ctx.report(action, &e),
        }
    });
}

/// Loading, error or content for a resource value
pub fn load_state<T>(result: Option<ApiResult<T>>, render: impl FnOnce(T) -> AnyView) -> AnyView {
    match result {
        None => view! { <p class="loading">"Loading…"</p> }.into_any(),
        Some(Err(e)) => view! { <p class="error-state">{e.user_message()}</p> }.into_any(),
        Some(Ok(value)) => render(value),
    }
}

#[component]
pub fn PageHeader(#[prop(into)] title: String, #[prop(optional)] children: Option<Children>) -> impl IntoView {
    view! {
        <header class="page-header">
            <h1>{title}</h1>
            <div class="page-actions">{children.map(|c| c())}</div>
        </header>
    }
}

/// Money with two decimals
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn fmt_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(12.0), "12.00");
        assert_eq!(money(0.126), "0.13");
    }

    #[test]
    fn test_fmt_time() {
        let at = "2026-03-04T05:06:07Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(fmt_time(Some(at)), "2026-03-04 05:06");
        assert_eq!(fmt_time(None), "—");
    }
}
