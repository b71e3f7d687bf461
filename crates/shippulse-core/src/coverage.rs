//! Sync coverage percentages.
//!
//! Expresses "linked out of total" with two deliberately independent rules:
//! the textual percent (which may say `<1%`) and the visual bar width
//! (which floors at 1 whenever any linking occurred). Merging the two into
//! one value loses the distinction, so both travel together in
//! [`CoverageDisplay`].

use serde::Serialize;

use crate::types::{CoverageRow, PLACEHOLDER};

/// Render-ready coverage: textual percent plus bar width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageDisplay {
    /// Textual percent: `"42%"`, `"<1%"`, or the placeholder when totals
    /// are unknown.
    pub percent_label: String,
    /// Bar width in percent, `0..=100`. Never 0 when any item is linked.
    pub bar_percent: u8,
}

/// Compute both coverage displays for `linked` of `total`.
///
/// `total == 0` yields the placeholder and an empty bar; no percentage
/// claim is made. Rounded percentages of zero with nonzero links render
/// `"<1%"` textually while the bar floors at 1.
#[must_use]
pub fn coverage_display(linked: u64, total: u64) -> CoverageDisplay {
    if total == 0 {
        return CoverageDisplay {
            percent_label: PLACEHOLDER.to_owned(),
            bar_percent: 0,
        };
    }

    let pct = rounded_percent(linked, total);
    let percent_label = if pct == 0 && linked > 0 {
        "<1%".to_owned()
    } else {
        format!("{pct}%")
    };
    let floor = if linked > 0 { 1 } else { 0 };
    CoverageDisplay {
        percent_label,
        bar_percent: pct.max(floor),
    }
}

impl CoverageRow {
    /// Render-ready coverage for this row.
    #[must_use]
    pub fn display(&self) -> CoverageDisplay {
        coverage_display(self.linked_count, self.total_count)
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rounded_percent(linked: u64, total: u64) -> u8 {
    let pct = (linked as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
