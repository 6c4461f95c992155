//! `egress-replay` — deterministic action recording and replay for the
//! `rust_egress` evacuation framework.
//!
//! # What lives here
//!
//! | Module        | Contents                                             |
//! |---------------|------------------------------------------------------|
//! | [`action`]    | `Action` — the recorded mutation vocabulary          |
//! | [`config`]    | `InitialConfiguration` — the frozen snapshot         |
//! | [`recorder`]  | `Recorder` — identity maps + time-bucketed log       |
//! | [`recording`] | `Recording` — the packaged, read-only result         |
//! | [`replay`]    | `apply` — re-enacting actions on a rebuilt state     |
//! | [`error`]     | `ReplayError`, `ReplayResult`                        |

pub mod action;
pub mod config;
pub mod error;
pub mod recorder;
pub mod recording;
pub mod replay;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use action::Action;
pub use config::InitialConfiguration;
pub use error::{ReplayError, ReplayResult};
pub use recorder::Recorder;
pub use recording::Recording;
