//! Theme state: the reconciliation record and the store that owns it.
//!
//! - [`ThemeRecord`]: the override/current/previous triple.
//! - [`ThemeState`]: observable single-slot store owning one record.
//! - [`Subscription`]: idempotent unsubscribe handle.
//! - [`StateRegistry`]: hands out exactly one state per key.

mod record;
mod registry;
mod store;

pub use record::ThemeRecord;
pub use registry::StateRegistry;
pub use store::{Subscription, ThemeState};
