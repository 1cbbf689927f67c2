// CTFd API client — challenge listing and per-challenge solve lists.
//
// CTFd's bulk challenge endpoint only exposes a solve count, so finding
// out who took first blood costs a second request per challenge.

pub mod client;
pub mod models;
pub mod traits;

pub use client::CtfdClient;
pub use models::{Challenge, Solve};
pub use traits::Scoreboard;
