//! AppDock Core - Headless desktop-integration engine for distributed
//! applications.
//!
//! This crate models what an application *can* do (capabilities), what the
//! user *wants* integrated (access points), detects conflicts between
//! applications over shared desktop resources, and dispatches apply/unapply
//! work to per-OS-family collaborators. It performs no UI and no feed
//! fetching; callers hand in feeds and persist the resulting app list
//! themselves.
//!
//! # Example
//!
//! ```rust,ignore
//! use appdock_core::access_points::{AccessPoint, AppCommand, CapabilityRef};
//! use appdock_core::{AppList, Feed, IntegrationManager, Integrator, Platform, SilentHandler};
//!
//! fn main() -> appdock_core::Result<()> {
//!     let platform = Platform::current();
//!     let integrator = Integrator::new(platform, windows_backend, unix_backend);
//!     let mut manager = IntegrationManager::new(AppList::new(), integrator, false);
//!
//!     let feed = Feed::new(uri, "My Editor");
//!     manager.add_app(&feed, capability_lists)?;
//!     manager.add_access_points(
//!         &feed.uri,
//!         &feed,
//!         vec![
//!             AccessPoint::CapabilityRegistration,
//!             AccessPoint::DesktopIcon(AppCommand::new("My Editor")),
//!         ],
//!         &SilentHandler::new(),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod access_points;
pub mod app_entry;
pub mod app_list;
pub mod cancel;
pub mod conflict;
pub mod error;
pub mod integrate;
pub mod manager;
pub mod model;
pub mod platform;

// Re-export commonly used types
pub use access_points::{AccessPoint, AccessPointList};
pub use app_entry::AppEntry;
pub use app_list::AppList;
pub use cancel::{CancellationToken, CancelledError};
pub use error::{IntegrationError, Result};
pub use integrate::{Integrator, SilentHandler, TaskHandler};
pub use manager::IntegrationManager;
pub use model::{Capability, CapabilityKind, CapabilityList, Feed};
pub use platform::{OsFamily, Platform};
