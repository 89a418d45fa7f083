//! Inspection engine
//!
//! - **message**: the reported unit and its grouping keys
//! - **inspect**: dispatching active checks over session objects, per file and per folder
//! - **organize**: nested grouping of messages for reports

mod inspect;
mod message;
mod organize;

pub use inspect::{
  Inspection, READ_SESSION, inspect, inspect_all, inspect_all_with, inspect_session, install_panic_hook, invoke_check,
  run_check, session_paths,
};
pub use message::{GroupKey, Message, MessageField};
pub use organize::{OrganizedMessages, organize};
