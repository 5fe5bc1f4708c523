//! Payment Gateway Redirect
//!
//! The backend hands back a hosted-checkout form; the browser posts it to
//! the gateway, which later returns to one of the `/payment/*` routes.

use percent_encoding::percent_decode_str;
use wasm_bindgen::JsCast;
use wastewise_client::models::{PaymentRedirect, PaymentState};

use crate::routes::{PAYMENT_FAILED_PATH, PAYMENT_SUCCESS_PATH};

/// Pending page polls the status endpoint on this interval
pub const POLL_INTERVAL_MS: u32 = 5_000;
/// ~2 minutes of polling before giving up
pub const MAX_POLLS: u32 = 24;

/// Where a polled status sends the user; `None` keeps polling
pub fn next_payment_route(state: PaymentState) -> Option<&'static str> {
    match state {
        PaymentState::Pending => None,
        PaymentState::Paid => Some(PAYMENT_SUCCESS_PATH),
        PaymentState::Failed | PaymentState::Cancelled => Some(PAYMENT_FAILED_PATH),
    }
}

/// Value of `key` in a `path?query` string
pub fn query_param(location: &str, key: &str) -> Option<String> {
    let (_, query) = location.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| percent_decode_str(&v.replace('+', " ")).decode_utf8_lossy().into_owned())
        .filter(|v| !v.is_empty())
}

/// Build the hidden gateway form and submit it, leaving the app
pub fn submit_gateway_form(redirect: &PaymentRedirect) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;

    let form = document
        .create_element("form")
        .map_err(|e| format!("create form: {:?}", e))?
        .dyn_into::<web_sys::HtmlFormElement>()
        .map_err(|_| "form element cast failed".to_string())?;
    form.set_action(&redirect.action_url);
    form.set_method(&redirect.method);
    form.set_attribute("style", "display:none").ok();

    for (name, value) in &redirect.fields {
        let input = document
            .create_element("input")
            .map_err(|e| format!("create input: {:?}", e))?
            .dyn_into::<web_sys::HtmlInputElement>()
            .map_err(|_| "input element cast failed".to_string())?;
        input.set_type("hidden");
        input.set_name(name);
        input.set_value(value);
        form.append_child(&input).map_err(|e| format!("append input: {:?}", e))?;
    }

    let body = document.body().ok_or("no body")?;
    body.append_child(&form).map_err(|e| format!("append form: {:?}", e))?;
    tracing::info!(action = %redirect.action_url, reference = ?redirect.reference, "redirecting to payment gateway");
    form.submit().map_err(|e| format!("submit: {:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_payment_route() {
        assert_eq!(next_payment_route(PaymentState::Pending), None);
        assert_eq!(next_payment_route(PaymentState::Paid), Some("/payment/success"));
        assert_eq!(next_payment_route(PaymentState::Failed), Some("/payment/failed"));
        assert_eq!(next_payment_route(PaymentState::Cancelled), Some("/payment/failed"));
    }

    #[test]
    fn test_query_param() {
        let loc = "/payment/pending?ref=INV%207%2F1&flag&x=1";
        assert_eq!(query_param(loc, "ref").as_deref(), Some("INV 7/1"));
        assert_eq!(query_param(loc, "x").as_deref(), Some("1"));
        assert_eq!(query_param(loc, "flag"), None);
        assert_eq!(query_param("/payment/pending", "ref"), None);
    }
}
