//! Form Validation
//!
//! Declarative per-field rules checked before any request is sent.
//! Only the first failing rule of a field is reported.

use std::collections::BTreeMap;

/// Field name -> submitted (raw) value
pub type FormValues = BTreeMap<String, String>;
/// Field name -> error message
pub type FormErrors = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldRule {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Numeric,
    Positive,
    /// Must equal another field (password confirmation)
    Matches(&'static str),
    OneOf(&'static [&'static str]),
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSchema {
    pub name: &'static str,
    pub label: &'static str,
    pub rules: &'static [FieldRule],
}

#[derive(Clone, Copy, Debug)]
pub struct Schema {
    pub fields: &'static [FieldSchema],
}

impl Schema {
    pub const fn new(fields: &'static [FieldSchema]) -> Self {
        Self { fields }
    }

    pub fn validate(&self, values: &FormValues) -> FormErrors {
        let mut errors = FormErrors::new();
        for field in self.fields {
            let value = values.get(field.name).map(|v| v.trim()).unwrap_or("");
            if let Some(message) = check_field(field, value, values) {
                errors.insert(field.name.to_string(), message);
            }
        }
        errors
    }
}

fn check_field(field: &FieldSchema, value: &str, values: &FormValues) -> Option<String> {
    let label = field.label;
    for rule in field.rules {
        // empty optional fields only answer to `Required`
        if value.is_empty() && *rule != FieldRule::Required {
            continue;
        }
        let failure = match *rule {
            FieldRule::Required if value.is_empty() => Some(format!("{label} is required")),
            FieldRule::Email if !is_email(value) => Some("Enter a valid email address".to_string()),
            FieldRule::MinLength(n) if value.chars().count() < n => {
                Some(format!("{label} must be at least {n} characters"))
            }
            FieldRule::MaxLength(n) if value.chars().count() > n => {
                Some(format!("{label} must be at most {n} characters"))
            }
            FieldRule::Numeric if value.parse::<f64>().is_err() => Some(format!("{label} must be a number")),
            FieldRule::Positive if !value.parse::<f64>().is_ok_and(|n| n > 0.0) => {
                Some(format!("{label} must be greater than zero"))
            }
            FieldRule::Matches(other) if values.get(other).map(|v| v.trim()) != Some(value) => {
                Some(format!("{label} does not match"))
            }
            FieldRule::OneOf(options) if !options.contains(&value) => {
                Some(format!("{label} must be one of {}", options.join(", ")))
            }
            _ => None,
        };
        if failure.is_some() {
            return failure;
        }
    }
    None
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

// ========================
// Schemas
// ========================

pub const LOGIN_SCHEMA: Schema = Schema::new(&[
    FieldSchema {
        name: "email",
        label: "Email",
        rules: &[FieldRule::Required, FieldRule::Email],
    },
    FieldSchema {
        name: "password",
        label: "Password",
        rules: &[FieldRule::Required, FieldRule::MinLength(6)],
    },
]);

pub const REGISTER_SCHEMA: Schema = Schema::new(&[
    FieldSchema {
        name: "name",
        label: "Name",
        rules: &[FieldRule::Required, FieldRule::MaxLength(80)],
    },
    FieldSchema {
        name: "email",
        label: "Email",
        rules: &[FieldRule::Required, FieldRule::Email],
    },
    FieldSchema {
        name: "phone",
        label: "Phone",
        rules: &[FieldRule::MinLength(7), FieldRule::MaxLength(20)],
    },
    FieldSchema {
        name: "password",
        label: "Password",
        rules: &[FieldRule::Required, FieldRule::MinLength(8)],
    },
    FieldSchema {
        name: "confirmPassword",
        label: "Password confirmation",
        rules: &[FieldRule::Required, FieldRule::Matches("password")],
    },
    FieldSchema {
        name: "address",
        label: "Home address",
        rules: &[FieldRule::MaxLength(200)],
    },
]);

const ROLES: &[&str] = &["ADMIN", "SUPERVISOR", "CREW", "CITIZEN"];
const BIN_TYPES: &[&str] = &["GENERAL", "RECYCLABLE", "ORGANIC", "HAZARDOUS"];
const VEHICLE_STATUSES: &[&str] = &["ACTIVE", "MAINTENANCE", "RETIRED"];
pub const CASE_STATUSES: &[&str] = &["OPEN", "IN_PROGRESS", "RESOLVED", "CLOSED"];
const EXCEPTION_REASONS: &[&str] = &["BLOCKED_ACCESS", "BIN_MISSING", "VEHICLE_ISSUE", "CONTAMINATION", "OTHER"];
const RECYCLABLE_CATEGORIES: &[&str] = &["PLASTIC", "PAPER", "GLASS", "METAL", "E_WASTE"];

const fn field(name: &'static str, label: &'static str, rules: &'static [FieldRule]) -> FieldSchema {
    FieldSchema { name, label, rules }
}

// admin catalogue

pub const USER_SCHEMA: Schema = Schema::new(&[
    field("name", "Name", &[FieldRule::Required, FieldRule::MaxLength(80)]),
    field("email", "Email", &[FieldRule::Required, FieldRule::Email]),
    field("role", "Role", &[FieldRule::Required, FieldRule::OneOf(ROLES)]),
    field("phone", "Phone", &[FieldRule::MinLength(7), FieldRule::MaxLength(20)]),
    field("zoneId", "Zone ID", &[FieldRule::Numeric]),
    field("password", "Password", &[FieldRule::MinLength(8)]),
]);

pub const ZONE_SCHEMA: Schema = Schema::new(&[
    field("name", "Name", &[FieldRule::Required]),
    field("code", "Code", &[FieldRule::MaxLength(16)]),
    field("collectionDays", "Collection days", &[]),
]);

pub const HOUSEHOLD_SCHEMA: Schema = Schema::new(&[
    field("address", "Address", &[FieldRule::Required]),
    field("zoneId", "Zone ID", &[FieldRule::Numeric]),
    field("ownerId", "Owner ID", &[FieldRule::Numeric]),
    field("billingPlanId", "Billing plan ID", &[FieldRule::Numeric]),
    field("membershipPlanId", "Membership plan ID", &[FieldRule::Numeric]),
]);

pub const BIN_SCHEMA: Schema = Schema::new(&[
    field("label", "Label", &[FieldRule::MaxLength(40)]),
    field("binType", "Type", &[FieldRule::Required, FieldRule::OneOf(BIN_TYPES)]),
    field("capacityLiters", "Capacity (L)", &[FieldRule::Numeric, FieldRule::Positive]),
    field("householdId", "Household ID", &[FieldRule::Numeric]),
    field("zoneId", "Zone ID", &[FieldRule::Numeric]),
]);

pub const VIRTUAL_BIN_SCHEMA: Schema = Schema::new(&[
    field("name", "Name", &[FieldRule::Required]),
    field("zoneId", "Zone ID", &[FieldRule::Numeric]),
    field("latitude", "Latitude", &[FieldRule::Numeric]),
    field("longitude", "Longitude", &[FieldRule::Numeric]),
]);

pub const VEHICLE_SCHEMA: Schema = Schema::new(&[
    field("plateNumber", "Plate number", &[FieldRule::Required, FieldRule::MaxLength(16)]),
    field("capacityKg", "Capacity (kg)", &[FieldRule::Numeric, FieldRule::Positive]),
    field("status", "Status", &[FieldRule::OneOf(VEHICLE_STATUSES)]),
]);

pub const BILLING_PLAN_SCHEMA: Schema = Schema::new(&[
    field("name", "Name", &[FieldRule::Required]),
    field("monthlyFee", "Monthly fee", &[FieldRule::Required, FieldRule::Numeric, FieldRule::Positive]),
    field("description", "Description", &[FieldRule::MaxLength(500)]),
]);

pub const MEMBERSHIP_PLAN_SCHEMA: Schema = Schema::new(&[
    field("name", "Name", &[FieldRule::Required]),
    field("price", "Price", &[FieldRule::Required, FieldRule::Numeric, FieldRule::Positive]),
    field("rewardMultiplier", "Reward multiplier", &[FieldRule::Numeric, FieldRule::Positive]),
    field("description", "Description", &[FieldRule::MaxLength(500)]),
]);

pub const REWARD_RATE_SCHEMA: Schema = Schema::new(&[
    field("category", "Category", &[FieldRule::Required, FieldRule::OneOf(RECYCLABLE_CATEGORIES)]),
    field("pointsPerKg", "Points per kg", &[FieldRule::Required, FieldRule::Numeric, FieldRule::Positive]),
]);

// operations

pub const NEW_TASK_SCHEMA: Schema = Schema::new(&[
    field("title", "Title", &[FieldRule::Required, FieldRule::MaxLength(120)]),
    field("caseId", "Case ID", &[FieldRule::Numeric]),
    field("address", "Address", &[]),
    field("dueAt", "Due", &[]),
]);

pub const GENERATE_ROUTES_SCHEMA: Schema = Schema::new(&[
    field("zoneId", "Zone ID", &[FieldRule::Required, FieldRule::Numeric]),
    field("date", "Date", &[FieldRule::Required]),
]);

pub const BILLING_RUN_SCHEMA: Schema = Schema::new(&[field(
    "period",
    "Billing period (YYYY-MM)",
    &[FieldRule::Required, FieldRule::MinLength(7), FieldRule::MaxLength(7)],
)]);

// crew

pub const EXCEPTION_SCHEMA: Schema = Schema::new(&[
    field("taskId", "Task ID", &[FieldRule::Numeric]),
    field("reason", "Reason", &[FieldRule::Required, FieldRule::OneOf(EXCEPTION_REASONS)]),
    field("note", "Note", &[FieldRule::MaxLength(500)]),
]);

// citizen

pub const LITTER_REPORT_SCHEMA: Schema = Schema::new(&[
    field("description", "Description", &[FieldRule::Required, FieldRule::MinLength(10)]),
    field("location", "Location", &[]),
]);

pub const BULKY_REQUEST_SCHEMA: Schema = Schema::new(&[
    field("items", "Items", &[FieldRule::Required]),
    field("preferredDate", "Preferred date", &[]),
]);

pub const REWARD_CLAIM_SCHEMA: Schema = Schema::new(&[
    field("points", "Points", &[FieldRule::Required, FieldRule::Numeric, FieldRule::Positive]),
    field("note", "Note", &[FieldRule::MaxLength(200)]),
]);

pub const RECYCLABLE_SCHEMA: Schema = Schema::new(&[
    field("category", "Category", &[FieldRule::Required, FieldRule::OneOf(RECYCLABLE_CATEGORIES)]),
    field("estimatedWeightKg", "Estimated weight (kg)", &[FieldRule::Numeric, FieldRule::Positive]),
]);

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_login_schema() {
        let errors = LOGIN_SCHEMA.validate(&values(&[("email", ""), ("password", "123")]));
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["password"], "Password must be at least 6 characters");

        let errors = LOGIN_SCHEMA.validate(&values(&[("email", "admin@example"), ("password", "secret123")]));
        assert_eq!(errors["email"], "Enter a valid email address");
        assert!(!errors.contains_key("password"));

        let ok = LOGIN_SCHEMA.validate(&values(&[("email", " admin@example.com "), ("password", "secret123")]));
        assert!(ok.is_empty());
    }

    #[test]
    fn test_optional_fields_skip_rules_when_empty() {
        let errors = REGISTER_SCHEMA.validate(&values(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("phone", ""),
            ("password", "longenough"),
            ("confirmPassword", "longenough"),
        ]));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_matches_rule() {
        let errors = REGISTER_SCHEMA.validate(&values(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("password", "longenough"),
            ("confirmPassword", "different"),
        ]));
        assert_eq!(errors["confirmPassword"], "Password confirmation does not match");
    }

    #[test]
    fn test_numeric_rules_report_first_failure() {
        const SCHEMA: Schema = Schema::new(&[FieldSchema {
            name: "fee",
            label: "Monthly fee",
            rules: &[FieldRule::Required, FieldRule::Numeric, FieldRule::Positive],
        }]);
        assert_eq!(SCHEMA.validate(&values(&[("fee", "abc")]))["fee"], "Monthly fee must be a number");
        assert_eq!(SCHEMA.validate(&values(&[("fee", "-2")]))["fee"], "Monthly fee must be greater than zero");
        assert!(SCHEMA.validate(&values(&[("fee", "12.5")])).is_empty());
    }

    #[test]
    fn test_one_of() {
        const SCHEMA: Schema = Schema::new(&[FieldSchema {
            name: "role",
            label: "Role",
            rules: &[FieldRule::OneOf(&["ADMIN", "CREW"])],
        }]);
        assert_eq!(SCHEMA.validate(&values(&[("role", "MAYOR")]))["role"], "Role must be one of ADMIN, CREW");
    }

    #[test]
    fn test_admin_schemas() {
        let errors = BILLING_PLAN_SCHEMA.validate(&values(&[("name", "Basic"), ("monthlyFee", "0")]));
        assert_eq!(errors["monthlyFee"], "Monthly fee must be greater than zero");

        let errors = BIN_SCHEMA.validate(&values(&[("binType", "GENERAL"), ("householdId", "x")]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["householdId"], "Household ID must be a number");

        // blank password is allowed so edits keep the current one
        let ok = USER_SCHEMA.validate(&values(&[("name", "Ada"), ("email", "ada@example.com"), ("role", "CREW")]));
        assert!(ok.is_empty(), "{ok:?}");
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@@b.co"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a b@c.io"));
        assert!(!is_email("a@.io"));
    }
}
