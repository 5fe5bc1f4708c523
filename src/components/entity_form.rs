//! Entity Form Component
//!
//! Renders one input per schema field, validates on submit and hands the
//! raw values to the caller.

use leptos::prelude::*;
use serde_json::{Map, Number, Value};
use wastewise_client::models::Id;

use crate::context::use_app;
use crate::validation::{FieldRule, FieldSchema, FormErrors, FormValues, Schema};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputKind {
    Text,
    Email,
    Password,
    Number,
    Date,
    DateTime,
    TextArea,
    Select(&'static [&'static str]),
}

/// Widget for a field, inferred from its rules and name
pub fn input_kind(field: &FieldSchema) -> InputKind {
    for rule in field.rules {
        match *rule {
            FieldRule::OneOf(options) => return InputKind::Select(options),
            FieldRule::Email => return InputKind::Email,
            FieldRule::Numeric | FieldRule::Positive => return InputKind::Number,
            _ => {}
        }
    }
    let name = field.name;
    if name.to_ascii_lowercase().contains("password") {
        InputKind::Password
    } else if name == "date" || name.ends_with("Date") {
        InputKind::Date
    } else if name.ends_with("At") {
        InputKind::DateTime
    } else if matches!(name, "description" | "note") {
        InputKind::TextArea
    } else {
        InputKind::Text
    }
}

fn is_numeric(field: &FieldSchema) -> bool {
    input_kind(field) == InputKind::Number || field.name.ends_with("Id")
}

/// Request body from validated values
///
/// Blank fields are omitted, numeric fields become JSON numbers and
/// `...Days` fields become string arrays. Passwords are sent untrimmed.
pub fn to_json(schema: &Schema, values: &FormValues) -> Value {
    let mut body = Map::new();
    for field in schema.fields {
        let Some(value) = values.get(field.name).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let raw = value.trim();
        let value = if input_kind(field) == InputKind::Password {
            Value::String(value.clone())
        } else if field.name.ends_with("Days") {
            Value::Array(
                raw.split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(|d| Value::String(d.to_string()))
                    .collect(),
            )
        } else if is_numeric(field) {
            match raw.parse::<i64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => raw
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(raw.to_string())),
            }
        } else {
            Value::String(raw.to_string())
        };
        body.insert(field.name.to_string(), value);
    }
    Value::Object(body)
}

/// Form values from an existing record, for edit forms
pub fn from_json(schema: &Schema, record: &Value) -> FormValues {
    schema
        .fields
        .iter()
        .filter_map(|field| {
            let text = match record.get(field.name)? {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(|i| i.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.to_string(),
            };
            Some((field.name.to_string(), text))
        })
        .collect()
}

pub fn field_text(values: &FormValues, name: &str) -> Option<String> {
    values.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn field_number(values: &FormValues, name: &str) -> Option<f64> {
    field_text(values, name).and_then(|v| v.parse().ok())
}

pub fn field_id(values: &FormValues, name: &str) -> Option<Id> {
    field_text(values, name).and_then(|v| v.parse().ok())
}

/// Schema-driven form
///
/// Values reset whenever the app reload trigger fires, i.e. after any
/// successful mutation.
#[component]
pub fn EntityForm(
    schema: Schema,
    #[prop(into)] on_submit: Callback<FormValues>,
    #[prop(optional, into)] submit_label: Option<String>,
    #[prop(optional)] initial: FormValues,
) -> impl IntoView {
    let ctx = use_app();
    let values = RwSignal::new(initial.clone());
    let errors = RwSignal::new(FormErrors::new());
    let initial = StoredValue::new(initial);

    Effect::new(move |prev: Option<u32>| {
        let trigger = ctx.reload_trigger.get();
        if prev.is_some_and(|p| p != trigger) {
            values.set(initial.get_value());
            errors.set(FormErrors::new());
        }
        trigger
    });

    let handle_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let current = values.get_untracked();
        let found = schema.validate(&current);
        let ok = found.is_empty();
        errors.set(found);
        if ok {
            on_submit.run(current);
        }
    };

    let label = submit_label.unwrap_or_else(|| "Save".to_string());

    view! {
        <form class="entity-form" on:submit=handle_submit novalidate=true>
            {schema.fields.iter().map(move |field| {
                let name = field.name;
                let required = field.rules.contains(&FieldRule::Required);
                let current = move || values.with(|v| v.get(name).cloned().unwrap_or_default());
                let set = move |value: String| {
                    values.update(|v| {
                        v.insert(name.to_string(), value);
                    });
                };
                let input = match input_kind(field) {
                    InputKind::Select(options) => view! {
                        <select id=name prop:value=current on:change=move |ev| set(event_target_value(&ev))>
                            <option value="">"Select…"</option>
                            {options.iter().map(|o| view! { <option value=*o>{*o}</option> }).collect_view()}
                        </select>
                    }.into_any(),
                    InputKind::TextArea => view! {
                        <textarea id=name prop:value=current on:input=move |ev| set(event_target_value(&ev))></textarea>
                    }.into_any(),
                    kind => {
                        let input_type = match kind {
                            InputKind::Email => "email",
                            InputKind::Password => "password",
                            InputKind::Number => "number",
                            InputKind::Date => "date",
                            InputKind::DateTime => "datetime-local",
                            _ => "text",
                        };
                        view! {
                            <input
                                id=name
                                type=input_type
                                step=(kind == InputKind::Number).then_some("any")
                                prop:value=current
                                on:input=move |ev| set(event_target_value(&ev))
                            />
                        }.into_any()
                    }
                };
                view! {
                    <div class="form-field">
                        <label for=name>
                            {field.label}
                            {required.then_some(view! { <span class="required">"*"</span> })}
                        </label>
                        {input}
                        {move || errors.with(|e| e.get(name).cloned()).map(|message| view! {
                            <p class="field-error">{message}</p>
                        })}
                    </div>
                }
            }).collect_view()}
            <button type="submit" class="primary-btn">{label}</button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{BIN_SCHEMA, LOGIN_SCHEMA, REGISTER_SCHEMA, USER_SCHEMA, ZONE_SCHEMA};
    use serde_json::json;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_input_kind() {
        assert_eq!(input_kind(&LOGIN_SCHEMA.fields[0]), InputKind::Email);
        assert_eq!(input_kind(&LOGIN_SCHEMA.fields[1]), InputKind::Password);
        assert_eq!(input_kind(&REGISTER_SCHEMA.fields[4]), InputKind::Password);
        assert!(matches!(input_kind(&BIN_SCHEMA.fields[1]), InputKind::Select(_)));
        assert_eq!(input_kind(&BIN_SCHEMA.fields[2]), InputKind::Number);
        assert_eq!(input_kind(&ZONE_SCHEMA.fields[0]), InputKind::Text);
    }

    #[test]
    fn test_to_json() {
        let body = to_json(
            &BIN_SCHEMA,
            &values(&[("label", " Front "), ("binType", "GENERAL"), ("capacityLiters", "120.5"), ("householdId", "7"), ("zoneId", "")]),
        );
        assert_eq!(
            body,
            json!({"label": "Front", "binType": "GENERAL", "capacityLiters": 120.5, "householdId": 7})
        );

        let body = to_json(&ZONE_SCHEMA, &values(&[("name", "North"), ("collectionDays", "MON, THU,")]));
        assert_eq!(body, json!({"name": "North", "collectionDays": ["MON", "THU"]}));
    }

    #[test]
    fn test_to_json_keeps_password_whitespace() {
        let body = to_json(
            &USER_SCHEMA,
            &values(&[("name", " Ada "), ("email", "ada@example.com"), ("password", " pass phrase ")]),
        );
        assert_eq!(body["name"], "Ada");
        assert_eq!(body["password"], " pass phrase ");

        // blank keeps the current password on edit
        let body = to_json(&USER_SCHEMA, &values(&[("name", "Ada"), ("password", "   ")]));
        assert!(body.get("password").is_none());
    }

    #[test]
    fn test_from_json() {
        let form = from_json(&ZONE_SCHEMA, &json!({"id": 3, "name": "North", "code": null, "collectionDays": ["MON", "THU"]}));
        assert_eq!(form, values(&[("name", "North"), ("collectionDays", "MON, THU")]));

        let form = from_json(&BIN_SCHEMA, &json!({"capacityLiters": 240, "householdId": 9}));
        assert_eq!(form["capacityLiters"], "240");
        assert_eq!(form["householdId"], "9");
    }

    #[test]
    fn test_field_helpers() {
        let v = values(&[("points", " 12.5 "), ("taskId", "4"), ("note", "  ")]);
        assert_eq!(field_number(&v, "points"), Some(12.5));
        assert_eq!(field_id(&v, "taskId"), Some(4));
        assert_eq!(field_text(&v, "note"), None);
        assert_eq!(field_id(&v, "missing"), None);
    }
}
