//! Platform collaborator traits and the task handler interface.
//!
//! Collaborators are black boxes to the core: they perform the actual
//! registry/filesystem mutation for one OS family. The dispatcher guarantees
//! each call has already passed capability resolution and scope gating; a
//! collaborator only ever sees work it is responsible for.

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::model::{
    AppRegistrationCapability, AutoPlayCapability, Capability, ComServerCapability,
    ContextMenuCapability, DefaultProgramCapability, FeedTarget, FileTypeCapability,
    UrlProtocolCapability,
};
use std::fmt;

/// Progress and cancellation surface for long-running collaborator work
/// (icon downloads, stub builds).
///
/// The dispatcher forwards the handler unchanged; it has no timeout or
/// retry logic of its own.
pub trait TaskHandler: Send + Sync {
    /// Token collaborators should poll during long operations.
    fn cancellation(&self) -> CancellationToken;

    /// Announce a unit of work. Default implementation discards.
    fn report(&self, _message: &str) {}
}

/// A handler that reports nothing and is never cancelled externally.
#[derive(Debug, Clone, Default)]
pub struct SilentHandler {
    token: CancellationToken,
}

impl SilentHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token handed out by this handler, for cancelling from tests.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl TaskHandler for SilentHandler {
    fn cancellation(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Where a shortcut artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutLocation {
    Desktop,
    Menu { category: String },
    AutoStart,
    QuickLaunch,
    SendTo,
}

impl fmt::Display for ShortcutLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutLocation::Desktop => write!(f, "desktop"),
            ShortcutLocation::Menu { category } => write!(f, "menu/{category}"),
            ShortcutLocation::AutoStart => write!(f, "autostart"),
            ShortcutLocation::QuickLaunch => write!(f, "quick-launch"),
            ShortcutLocation::SendTo => write!(f, "send-to"),
        }
    }
}

/// Windows-family collaborator: registry-based capability registration plus
/// `.lnk` shortcut management.
///
/// Every `unregister_*`/`remove_shortcut` implementation must be idempotent:
/// an already-absent artifact is success, only genuine I/O or permission
/// failures are errors. `set_default` distinguishes an explicit
/// default-access-point request from bulk capability registration.
pub trait WindowsIntegration: Send + Sync {
    fn register_file_type(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &FileTypeCapability,
        machine_wide: bool,
        set_default: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_file_type(
        &self,
        id: &str,
        capability: &FileTypeCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()>;

    fn register_url_protocol(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &UrlProtocolCapability,
        machine_wide: bool,
        set_default: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_url_protocol(
        &self,
        id: &str,
        capability: &UrlProtocolCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()>;

    fn register_auto_play(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &AutoPlayCapability,
        machine_wide: bool,
        set_default: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_auto_play(
        &self,
        id: &str,
        capability: &AutoPlayCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()>;

    fn register_com_server(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &ComServerCapability,
        machine_wide: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_com_server(
        &self,
        id: &str,
        capability: &ComServerCapability,
        machine_wide: bool,
    ) -> Result<()>;

    /// `verb_capabilities` carries the verb-bearing capabilities of the same
    /// capability list, published below the registration's capability path.
    fn register_app_registration(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &AppRegistrationCapability,
        verb_capabilities: &[&Capability],
        machine_wide: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_app_registration(
        &self,
        id: &str,
        capability: &AppRegistrationCapability,
        machine_wide: bool,
    ) -> Result<()>;

    /// Machine scope is implied: the dispatcher only routes machine-wide
    /// requests here.
    fn register_default_program(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &DefaultProgramCapability,
        set_default: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_default_program(
        &self,
        id: &str,
        capability: &DefaultProgramCapability,
        set_default: bool,
    ) -> Result<()>;

    fn register_context_menu(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &ContextMenuCapability,
        machine_wide: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_context_menu(
        &self,
        id: &str,
        capability: &ContextMenuCapability,
        machine_wide: bool,
    ) -> Result<()>;

    fn create_shortcut(
        &self,
        location: &ShortcutLocation,
        target: &FeedTarget<'_>,
        name: &str,
        command: &str,
        machine_wide: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn remove_shortcut(
        &self,
        location: &ShortcutLocation,
        name: &str,
        machine_wide: bool,
    ) -> Result<()>;
}

/// Unix-family collaborator: FreeDesktop MIME/launcher registration.
///
/// Same idempotency contract as [`WindowsIntegration`]. AutoPlay, COM
/// servers and app registration have no Unix counterpart; the dispatcher
/// never routes them here.
pub trait UnixIntegration: Send + Sync {
    fn register_file_type(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &FileTypeCapability,
        machine_wide: bool,
        set_default: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_file_type(
        &self,
        id: &str,
        capability: &FileTypeCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()>;

    fn register_url_protocol(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &UrlProtocolCapability,
        machine_wide: bool,
        set_default: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_url_protocol(
        &self,
        id: &str,
        capability: &UrlProtocolCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()>;

    fn register_default_program(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &DefaultProgramCapability,
        machine_wide: bool,
        set_default: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_default_program(
        &self,
        id: &str,
        capability: &DefaultProgramCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()>;

    fn register_context_menu(
        &self,
        target: &FeedTarget<'_>,
        id: &str,
        capability: &ContextMenuCapability,
        machine_wide: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn unregister_context_menu(
        &self,
        id: &str,
        capability: &ContextMenuCapability,
        machine_wide: bool,
    ) -> Result<()>;

    fn create_shortcut(
        &self,
        location: &ShortcutLocation,
        target: &FeedTarget<'_>,
        name: &str,
        command: &str,
        machine_wide: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()>;
    fn remove_shortcut(
        &self,
        location: &ShortcutLocation,
        name: &str,
        machine_wide: bool,
    ) -> Result<()>;
}
