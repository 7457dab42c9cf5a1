mod domain_events;
mod event_sink;
mod watch_lists;

pub use domain_events::*;
pub(crate) use event_sink::*;
pub(crate) use watch_lists::*;
