//! Pure projections of [`ViewState`](crate::dashboard::ViewState).
//!
//! - [`text`]: colored terminal output for the CLI
//! - [`html`]: the page served by `clinic-dash serve`

pub mod html;
pub mod text;

use crate::api::Scalar;

/// Display an optional field, `-` when absent.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub(crate) fn scalar_or_dash(value: Option<&Scalar>) -> String {
    value.map_or_else(|| "-".to_string(), Scalar::to_string)
}
