//! Event processors.
//!
//! - `NotificationDispatcher`: Receives `MatchEvent`, publishes it through a
//!   `NotificationPort`

pub mod notification_dispatcher;

pub use notification_dispatcher::{DispatchError, NotificationDispatcher, NotificationPort};
