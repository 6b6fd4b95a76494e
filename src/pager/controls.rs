//! Page-control strip: previous/next buttons, a window of page numbers around the
//! current page, and ellipses toward the first and last pages.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

/// Maximum number of consecutive page numbers shown around the current page.
pub const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageControl {
    Previous { disabled: bool },
    Page { number: usize, active: bool },
    Ellipsis,
    Next { disabled: bool },
}

impl fmt::Display for PageControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageControl::Previous { .. } => f.write_str("«"),
            PageControl::Next { .. } => f.write_str("»"),
            PageControl::Ellipsis => f.write_str("…"),
            PageControl::Page {
                number,
                active: true,
            } => write!(f, "[{number}]"),
            PageControl::Page { number, .. } => write!(f, "{number}"),
        }
    }
}

/// Build the control strip for `current` of `total` pages.
///
/// Nothing is produced for a single page or none. A `current` outside `1..=total` is
/// clamped to the nearest page.
pub fn page_controls(current: usize, total: usize) -> Vec<PageControl> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    let (start, end) = visible_window(current, total);
    let mut controls = Vec::with_capacity(MAX_VISIBLE_PAGES + 6);

    controls.push(PageControl::Previous {
        disabled: current == 1,
    });

    if start > 1 {
        controls.push(PageControl::Page {
            number: 1,
            active: false,
        });
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    controls.extend((start..=end).map(|number| PageControl::Page {
        number,
        active: number == current,
    }));

    if end < total {
        if end < total - 1 {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(PageControl::Page {
            number: total,
            active: false,
        });
    }

    controls.push(PageControl::Next {
        disabled: current == total,
    });
    controls
}

/// First and last page numbers of the window centered on `current`.
///
/// When the window runs into the last page it is pulled back toward the start so it
/// stays full width where possible. `current` is clamped into `1..=total`.
pub fn visible_window(current: usize, total: usize) -> (usize, usize) {
    let total = total.max(1);
    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = total.min(start + MAX_VISIBLE_PAGES - 1);
    if end + 1 - start < MAX_VISIBLE_PAGES && start > 1 {
        start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
    }
    (start, end)
}

/// Plain-text rendering, e.g. `« 1 … 4 5 [6] 7 8 … 12 »`.
pub fn render_controls(controls: &[PageControl]) -> String {
    controls.iter().join(" ")
}
