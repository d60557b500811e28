//! Event time model.
//! Pure conversion, drag recomputation, multi-day expansion and list
//! helpers, organized across focused submodules. Nothing here touches a
//! store.

pub mod codec;
pub mod drag;
pub mod expansion;
pub mod list;

pub use codec::{to_canonical, to_canonical_with, to_display, to_display_list, CanonicalInterval};
pub use drag::{recompute_after_drop, DropGeometry};
pub use expansion::{expand_daily, plan_save, SaveContext};
pub use list::{apply_time_change, filter_by_date};
