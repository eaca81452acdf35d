//! Resource explorer built on actionkit
//!
//! Feature modules contribute actions for web apps, function apps and
//! container registries; the tree renders one shared context menu against
//! whichever resource is selected.

pub mod app;
pub mod command;
pub mod contributors;
pub mod events;
pub mod logging;
pub mod resources;
pub mod ui;

pub use app::App;
pub use command::{Command, Commands, Operation};
pub use resources::{sample_resources, Resource};
