//! Login Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use wastewise_client::sdk::auth;
use wastewise_client::ApiError;

use crate::context::use_app;
use crate::routes::{APP_PATH, REGISTER_PATH};
use crate::validation::{FormErrors, FormValues, LOGIN_SCHEMA};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Inline message under the login form
pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized { .. } => INVALID_CREDENTIALS.to_string(),
        other => other.user_message(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (errors, set_errors) = signal(FormErrors::new());
    let (form_error, set_form_error) = signal::<Option<String>>(None);
    let (busy, set_busy) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let values: FormValues = [
            ("email".to_string(), email.get_untracked()),
            ("password".to_string(), password.get_untracked()),
        ]
        .into_iter()
        .collect();
        let found = LOGIN_SCHEMA.validate(&values);
        let valid = found.is_empty();
        set_errors.set(found);
        set_form_error.set(None);
        if !valid {
            return;
        }

        set_busy.set(true);
        let client = ctx.client();
        let email = email.get_untracked().trim().to_string();
        let password = password.get_untracked();
        spawn_local(async move {
            match auth::login(&client, &email, &password).await {
                Ok(user) => {
                    tracing::info!(role = ?user.role, "signed in");
                    // back would only land on the login page again
                    ctx.redirect(APP_PATH);
                }
                Err(e) => {
                    set_form_error.set(Some(login_error_message(&e)));
                    set_busy.set(false);
                }
            }
        });
    };

    let field_error = move |name: &'static str| move || errors.with(|e| e.get(name).cloned());

    view! {
        <main class="auth-page">
            <form class="auth-card" on:submit=on_submit novalidate=true>
                <h1>"WasteWise Console"</h1>
                <p class="auth-subtitle">"Sign in to continue"</p>

                {move || form_error.get().map(|message| view! { <div class="form-error" role="alert">{message}</div> })}

                <div class="form-field">
                    <label for="email">"Email"</label>
                    <input
                        id="email"
                        type="email"
                        autocomplete="username"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    {move || field_error("email")().map(|m| view! { <p class="field-error">{m}</p> })}
                </div>

                <div class="form-field">
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                    {move || field_error("password")().map(|m| view! { <p class="field-error">{m}</p> })}
                </div>

                <button type="submit" class="primary-btn" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in…" } else { "Sign in" }}
                </button>

                <p class="auth-switch">
                    "No account? "
                    <a href=REGISTER_PATH on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(REGISTER_PATH);
                    }>"Register"</a>
                </p>
            </form>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_message() {
        assert_eq!(
            login_error_message(&ApiError::Unauthorized { message: Some("bad creds".into()) }),
            INVALID_CREDENTIALS
        );
        assert_eq!(
            login_error_message(&ApiError::Status { status: 500, message: Some("db down".into()) }),
            "db down"
        );
        assert_eq!(login_error_message(&ApiError::Timeout), wastewise_client::error::TIMEOUT_MESSAGE);
    }
}
