//! UI Components
//!
//! Reusable Leptos components.

mod data_table;
mod delete_confirm_button;
mod entity_form;
mod file_input;
mod heatmap_grid;
mod modal;
mod search_palette;
mod sidebar;
mod status_badge;

pub use data_table::{display_value, or_dash, Column, DataTable};
pub use delete_confirm_button::DeleteConfirmButton;
pub use entity_form::{field_id, field_number, field_text, from_json, to_json, EntityForm};
pub use file_input::FileInput;
pub use heatmap_grid::Heatmap;
pub use modal::Modal;
pub use search_palette::SearchPalette;
pub use sidebar::Sidebar;
pub use status_badge::StatusBadge;
