//! Heatmap Component
//!
//! CSS-grid rendering of a normalized digital twin.

use leptos::prelude::*;

use crate::heatmap::{HeatGrid, LEVELS};

#[component]
pub fn Heatmap(grid: HeatGrid) -> impl IntoView {
    if grid.cells.is_empty() {
        return view! { <p class="empty-state">"No digital-twin data for this zone yet."</p> }.into_any();
    }

    let style = format!("grid-template-columns: repeat({}, minmax(2rem, 1fr))", grid.cols);
    let cells = (0..grid.rows)
        .flat_map(|row| (0..grid.cols).map(move |col| (row, col)))
        .map(|(row, col)| match grid.cell(row, col) {
            Some(cell) => {
                let title = format!("{}: {:.0}%", cell.label, cell.intensity * 100.0);
                view! { <div class=format!("heat-cell heat-{}", cell.level) title=title></div> }.into_any()
            }
            None => view! { <div class="heat-cell heat-none"></div> }.into_any(),
        })
        .collect_view();

    view! {
        <div class="heatmap">
            <div class="heatmap-grid" style=style>{cells}</div>
            <div class="heatmap-legend">
                {(0..LEVELS).map(|level| view! { <span class=format!("heat-cell heat-{}", level)></span> }).collect_view()}
                <span class="legend-label">"low → high"</span>
            </div>
        </div>
    }.into_any()
}
