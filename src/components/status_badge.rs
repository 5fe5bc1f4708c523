//! Status Badge Component

use leptos::prelude::*;

/// Colour family for a backend status string
pub fn tone(status: &str) -> &'static str {
    match status.to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
        "PAID" | "COMPLETED" | "APPROVED" | "RESOLVED" | "ACTIVE" | "VERIFIED" | "DONE" | "CLOSED" => "success",
        "PENDING" | "OPEN" | "ASSIGNED" | "IN_PROGRESS" | "SCHEDULED" | "UNPAID" | "SUBMITTED" | "MAINTENANCE" => {
            "warning"
        }
        "FAILED" | "REJECTED" | "CANCELLED" | "OVERDUE" | "RETIRED" | "INACTIVE" => "danger",
        _ => "neutral",
    }
}

/// Human form of an enum-ish status (`IN_PROGRESS` -> `In progress`)
pub fn status_label(status: &str) -> String {
    let lower = status.replace('_', " ").to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[component]
pub fn StatusBadge(#[prop(into)] status: String) -> impl IntoView {
    let class = format!("status-badge status-{}", tone(&status));
    view! { <span class=class>{status_label(&status)}</span> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone() {
        assert_eq!(tone("PAID"), "success");
        assert_eq!(tone("in progress"), "warning");
        assert_eq!(tone("In-Progress"), "warning");
        assert_eq!(tone("rejected"), "danger");
        assert_eq!(tone("mystery"), "neutral");
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label("IN_PROGRESS"), "In progress");
        assert_eq!(status_label(""), "");
    }
}
