//! Data Table Component
//!
//! Plain list rendering for API collections: one row per record, one cell
//! per column, optional per-row actions.

use std::rc::Rc;

use leptos::prelude::*;
use serde_json::Value;

use super::StatusBadge;

/// Column header plus how to render a record's cell
pub struct Column<T> {
    pub header: &'static str,
    pub cell: Rc<dyn Fn(&T) -> String>,
    /// Render the text as a `StatusBadge`
    pub badge: bool,
}

impl<T> Column<T> {
    pub fn new(header: &'static str, cell: impl Fn(&T) -> String + 'static) -> Self {
        Self { header, cell: Rc::new(cell), badge: false }
    }

    pub fn badge(header: &'static str, cell: impl Fn(&T) -> String + 'static) -> Self {
        Self { badge: true, ..Self::new(header, cell) }
    }
}

impl Column<Value> {
    /// Column showing `record[key]` of a JSON record
    pub fn field(header: &'static str, key: &'static str) -> Self {
        Self::new(header, move |row| display_value(row.get(key)))
    }
}

/// Table text for an arbitrary JSON value
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "—".to_string(),
        Some(Value::String(s)) if s.is_empty() => "—".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => if *b { "Yes" } else { "No" }.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|i| i.as_str().map(str::to_string).unwrap_or_else(|| i.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

/// `Some(x)` as text, `—` for missing values
pub fn or_dash<V: ToString>(value: Option<V>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}

#[component]
pub fn DataTable<T>(
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    /// Rendered in a trailing cell for each row
    #[prop(optional)]
    actions: Option<Callback<T, AnyView>>,
    #[prop(optional)] empty_text: Option<&'static str>,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    if rows.is_empty() {
        return view! { <p class="empty-state">{empty_text.unwrap_or("Nothing here yet.")}</p> }.into_any();
    }

    let has_actions = actions.is_some();
    view! {
        <table class="data-table">
            <thead>
                <tr>
                    {columns.iter().map(|c| view! { <th>{c.header}</th> }).collect_view()}
                    {has_actions.then_some(view! { <th class="row-actions"></th> })}
                </tr>
            </thead>
            <tbody>
                {rows.into_iter().map(|row| {
                    let cells = columns.iter().map(|c| {
                        let text = (c.cell)(&row);
                        if c.badge {
                            view! { <td><StatusBadge status=text /></td> }.into_any()
                        } else {
                            view! { <td>{text}</td> }.into_any()
                        }
                    }).collect_view();
                    let action_cell = actions.map(|a| view! { <td class="row-actions">{a.run(row.clone())}</td> });
                    view! { <tr>{cells}{action_cell}</tr> }
                }).collect_view()}
            </tbody>
        </table>
    }.into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(3)), "3");
        assert_eq!(or_dash(None::<String>), "—");
    }

    #[test]
    fn test_display_value() {
        let row = json!({"name": "North", "days": ["MON", "THU"], "active": false, "code": null, "n": 4});
        assert_eq!(display_value(row.get("name")), "North");
        assert_eq!(display_value(row.get("days")), "MON, THU");
        assert_eq!(display_value(row.get("active")), "No");
        assert_eq!(display_value(row.get("code")), "—");
        assert_eq!(display_value(row.get("missing")), "—");
        assert_eq!((Column::field("N", "n").cell)(&row), "4");
    }

    #[test]
    fn test_column_cell() {
        let col: Column<(u32, &str)> = Column::new("Name", |r: &(u32, &str)| r.1.to_uppercase());
        assert_eq!((col.cell)(&(1, "north")), "NORTH");
    }
}
