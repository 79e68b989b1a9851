//! Version token extraction and update comparison.
//!
//! Release pages publish version strings in wildly inconsistent shapes:
//! `v2.3.4`, `23.5.0.23`, `1.0.0_RC1`, `2.2.9b`. The [`extract`] submodule
//! digs those tokens out of link text and filenames; the [`compare`]
//! submodule decides whether an extracted token is newer than the last one
//! recorded for the same tracking id.

mod compare;
mod extract;

pub use compare::{NEVER_SEEN_VERSION, is_update};
pub use extract::extract_version;
