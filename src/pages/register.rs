//! Citizen Registration Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use wastewise_client::models::RegisterRequest;
use wastewise_client::sdk::auth;

use crate::components::{field_text, EntityForm};
use crate::context::use_app;
use crate::routes::LOGIN_PATH;
use crate::validation::{FormValues, REGISTER_SCHEMA};

fn register_request(values: &FormValues) -> RegisterRequest {
    RegisterRequest {
        name: field_text(values, "name").unwrap_or_default(),
        email: field_text(values, "email").unwrap_or_default(),
        password: values.get("password").cloned().unwrap_or_default(),
        phone: field_text(values, "phone"),
        address: field_text(values, "address"),
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_app();
    let (form_error, set_form_error) = signal::<Option<String>>(None);

    let on_submit = move |values: FormValues| {
        let request = register_request(&values);
        let client = ctx.client();
        set_form_error.set(None);
        spawn_local(async move {
            match auth::register(&client, &request).await {
                Ok(user) => {
                    tracing::info!(email = %user.email, "registered");
                    ctx.toasts.success("Account created. Please sign in.");
                    ctx.navigate(LOGIN_PATH);
                }
                Err(e) => set_form_error.set(Some(e.user_message())),
            }
        });
    };

    view! {
        <main class="auth-page">
            <div class="auth-card">
                <h1>"Create an account"</h1>
                <p class="auth-subtitle">"Residents can register to report issues, book pickups and pay bills."</p>
                {move || form_error.get().map(|message| view! { <div class="form-error" role="alert">{message}</div> })}
                <EntityForm schema=REGISTER_SCHEMA on_submit=on_submit submit_label="Register" />
                <p class="auth-switch">
                    "Already registered? "
                    <a href=LOGIN_PATH on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(LOGIN_PATH);
                    }>"Sign in"</a>
                </p>
            </div>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_trims_and_drops_blanks() {
        let values: FormValues = [
            ("name", " Ada "),
            ("email", "ada@example.com"),
            ("password", " spaced pass "),
            ("phone", ""),
            ("address", "1 Main St"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let request = register_request(&values);
        assert_eq!(request.name, "Ada");
        assert_eq!(request.password, " spaced pass ");
        assert_eq!(request.phone, None);
        assert_eq!(request.address.as_deref(), Some("1 Main St"));
    }
}
