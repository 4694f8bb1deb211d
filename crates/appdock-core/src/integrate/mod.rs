//! Applying and removing access points on the local desktop.
//!
//! The [`Integrator`] turns the declarative access-point model into calls on
//! per-OS-family collaborator traits; [`RecordingBackend`] and
//! [`FailingBackend`] stand in for those collaborators in tests.

mod dispatcher;
mod mock;
mod traits;

pub use dispatcher::Integrator;
pub use mock::{FailingBackend, RecordingBackend};
pub use traits::{
    ShortcutLocation, SilentHandler, TaskHandler, UnixIntegration, WindowsIntegration,
};
