//! The worker actor and depth sorter.
//!
//! The worker owns the packed scene buffer on a dedicated thread and
//! communicates with the render context exclusively through typed,
//! ownership-transferring messages — no shared mutable memory, no locks.

mod error;
mod message;
mod sort;
mod state;
mod worker;

pub use error::WorkerError;
pub use message::{WorkerRequest, WorkerResponse};
pub use sort::{sort_visible, SortOutput};
pub use state::{SceneState, ThrottleState};
pub use worker::Worker;
