//! Payment Return Pages
//!
//! Landing pages for the gateway's return URLs. The pending page polls the
//! payment status until the gateway settles or polling runs out.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wastewise_client::sdk::citizen;

use crate::context::{use_app, AppContext};
use crate::payments::{next_payment_route, query_param, MAX_POLLS, POLL_INTERVAL_MS};
use crate::routes::{normalize, path_for, Page, APP_PATH, PAYMENT_PENDING_PATH};

fn invoices_path() -> &'static str {
    path_for(Page::CitizenInvoices).unwrap_or(APP_PATH)
}

/// Still on the pending page (the user may have navigated away mid-poll)
fn on_pending_page(ctx: AppContext) -> bool {
    ctx.path
        .try_get_untracked()
        .is_some_and(|p| normalize(&p) == PAYMENT_PENDING_PATH)
}

#[component]
fn PaymentResult(title: &'static str, message: &'static str, #[prop(optional)] failed: bool) -> impl IntoView {
    let ctx = use_app();
    let path = invoices_path();
    view! {
        <section class="page payment-result" class:failed=failed>
            <h1>{title}</h1>
            <p>{message}</p>
            <a href=path class="primary-btn" on:click=move |ev| {
                ev.prevent_default();
                ctx.navigate(path);
            }>"Back to invoices"</a>
        </section>
    }
}

#[component]
pub fn PaymentSuccessPage() -> impl IntoView {
    view! {
        <PaymentResult
            title="Payment received"
            message="Thank you. Your invoice has been marked as paid."
        />
    }
}

#[component]
pub fn PaymentFailedPage() -> impl IntoView {
    view! {
        <PaymentResult
            title="Payment failed"
            message="The payment was declined or cancelled. No money was taken; you can try again from your invoices."
            failed=true
        />
    }
}

#[component]
pub fn PaymentPendingPage() -> impl IntoView {
    let ctx = use_app();
    let reference = query_param(&ctx.path.get_untracked(), "ref");
    let (polls, set_polls) = signal(0u32);
    let (gave_up, set_gave_up) = signal(false);

    if let Some(reference) = reference.clone() {
        let client = ctx.client();
        spawn_local(async move {
            for attempt in 1..=MAX_POLLS {
                if !on_pending_page(ctx) {
                    return;
                }
                match citizen::payment_status(&client, &reference).await {
                    Ok(status) => {
                        if let Some(route) = next_payment_route(status.status) {
                            tracing::info!(reference = %reference, state = ?status.status, "payment settled");
                            if on_pending_page(ctx) {
                                ctx.redirect(route);
                            }
                            return;
                        }
                    }
                    Err(e) => tracing::warn!(reference = %reference, attempt, error = %e, "payment status poll failed"),
                }
                set_polls.try_set(attempt);
                TimeoutFuture::new(POLL_INTERVAL_MS).await;
            }
            tracing::warn!(reference = %reference, "payment still pending after polling");
            set_gave_up.try_set(true);
        });
    }

    view! {
        <section class="page payment-result">
            <h1>"Payment processing"</h1>
            {match reference {
                None => view! { <p class="error-state">"Missing payment reference."</p> }.into_any(),
                Some(reference) => view! {
                    <p>{format!("Reference {reference}")}</p>
                    <Show
                        when=move || gave_up.get()
                        fallback=move || view! {
                            <p class="loading">
                                {move || format!("Waiting for the gateway to confirm… (check {} of {})", (polls.get() + 1).min(MAX_POLLS), MAX_POLLS)}
                            </p>
                        }
                    >
                        <p>"Your payment is still pending. We'll notify you when it completes; you can check your invoices later."</p>
                    </Show>
                }.into_any(),
            }}
            <a href=invoices_path() on:click=move |ev| {
                ev.prevent_default();
                ctx.navigate(invoices_path());
            }>"Back to invoices"</a>
        </section>
    }
}
