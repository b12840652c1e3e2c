//! Shared UI widgets for strata applications
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State**: lives in [`strata_core::Editor`]; widgets only borrow it
//! - **View functions**: take the editor (or parts of it) plus callbacks,
//!   return `Element<Message>`
//! - **Canvas Program**: paints a core [`Scene`](strata_core::Scene) and
//!   translates pointer input into [`ColumnEvent`]s
//!
//! ## View Functions
//!
//! - `column_view`: the interactive column canvas
//! - `legend_view`: formation legend with click / double-click

pub mod column;
pub mod legend;
pub mod theme;

pub use column::{column_view, ColumnCanvas, ColumnEvent, ColumnInteraction};
pub use legend::legend_view;
pub use theme::{to_color, with_alpha};
