//! CLI commands for nwb-inspector
//!
//! - **inspect**: inspect a session file or a folder of them and report
//! - **list**: show which checks a run would execute

pub mod inspect;
pub mod list;

pub use inspect::{InspectOptions, run_inspect};
pub use list::run_list_checks;
