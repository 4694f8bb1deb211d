//! Declarative model of what an installed program offers.
//!
//! Feeds declare *capabilities* (handle a file type, a URL scheme, act as an
//! AutoPlay handler, ...). Capabilities are immutable records grouped into
//! architecture-filtered [`CapabilityList`]s; they never touch the desktop
//! by themselves. Access points (see [`crate::access_points`]) reference
//! them by ID to request concrete desktop artifacts.

mod arch;
mod capability;
mod capability_list;
mod feed;
mod icon;
mod verb;

pub use arch::Architecture;
pub use capability::{
    AppRegistrationCapability, AutoPlayCapability, AutoPlayEvent, Capability, CapabilityKind,
    CapabilityVariant, ComServerCapability, ContextMenuCapability, DefaultPolicy,
    DefaultProgramCapability, FileTypeCapability, FileTypeExtension, GamesExplorerCapability,
    Presentation, UrlProtocolCapability,
};
pub use capability_list::CapabilityList;
pub use feed::{Command, Feed, FeedTarget};
pub use icon::{Icon, LocalizedString};
pub use verb::Verb;
