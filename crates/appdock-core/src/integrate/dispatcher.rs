//! Routing of access points to platform collaborators.
//!
//! Each apply/unapply resolves any capability reference first (referential
//! integrity is checked even when the dispatch itself is a no-op), then
//! selects exactly one collaborator from the access point variant, the OS
//! family and the integration scope. Unsupported combinations are silent
//! no-ops so one access point list can be applied unchanged across
//! heterogeneous machines. No rollback happens here; failures propagate
//! immediately to the caller.

use super::traits::{ShortcutLocation, TaskHandler, UnixIntegration, WindowsIntegration};
use crate::access_points::{AccessPoint, AppCommand};
use crate::app_entry::AppEntry;
use crate::error::Result;
use crate::model::{
    AutoPlayCapability, Capability, CapabilityKind, ContextMenuCapability,
    DefaultProgramCapability, Feed, FeedTarget, FileTypeCapability, UrlProtocolCapability,
};
use crate::platform::{OsFamily, Platform};
use tracing::debug;

/// The apply/unapply dispatcher for one machine.
///
/// Owns the collaborator set for both supported OS families; which one is
/// consulted follows from the injected [`Platform`], never from a global
/// query, so any combination can be exercised in tests.
pub struct Integrator {
    platform: Platform,
    windows: Box<dyn WindowsIntegration>,
    unix: Box<dyn UnixIntegration>,
}

impl Integrator {
    pub fn new(
        platform: Platform,
        windows: Box<dyn WindowsIntegration>,
        unix: Box<dyn UnixIntegration>,
    ) -> Self {
        Self {
            platform,
            windows,
            unix,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Install the desktop artifact for one access point.
    ///
    /// May fail on capability resolution or when the underlying platform
    /// operation fails (I/O, permissions, network for icon downloads).
    pub fn apply(
        &self,
        access_point: &AccessPoint,
        entry: &AppEntry,
        feed: &Feed,
        handler: &dyn TaskHandler,
        machine_wide: bool,
    ) -> Result<()> {
        handler.cancellation().check()?;
        debug!(access_point = %access_point, app = %entry, machine_wide, "applying access point");
        let target = FeedTarget {
            interface_uri: &entry.interface_uri,
            feed,
        };

        match access_point {
            AccessPoint::CapabilityRegistration => {
                self.register_capabilities(entry, &target, handler, machine_wide)
            }
            AccessPoint::FileType(reference) => {
                let capability = entry
                    .get_capability::<FileTypeCapability>(&self.platform, &reference.capability)?;
                match self.platform.family {
                    OsFamily::Windows => self.windows.register_file_type(
                        &target,
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                        handler,
                    ),
                    OsFamily::Unix => self.unix.register_file_type(
                        &target,
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                        handler,
                    ),
                    OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::UrlProtocol(reference) => {
                let capability = entry.get_capability::<UrlProtocolCapability>(
                    &self.platform,
                    &reference.capability,
                )?;
                match self.platform.family {
                    OsFamily::Windows => self.windows.register_url_protocol(
                        &target,
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                        handler,
                    ),
                    OsFamily::Unix => self.unix.register_url_protocol(
                        &target,
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                        handler,
                    ),
                    OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::AutoPlay(reference) => {
                let capability = entry
                    .get_capability::<AutoPlayCapability>(&self.platform, &reference.capability)?;
                match self.platform.family {
                    OsFamily::Windows => self.windows.register_auto_play(
                        &target,
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                        handler,
                    ),
                    // AutoPlay has no counterpart outside Windows.
                    OsFamily::Unix | OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::ContextMenu(reference) => {
                let capability = entry.get_capability::<ContextMenuCapability>(
                    &self.platform,
                    &reference.capability,
                )?;
                match self.platform.family {
                    OsFamily::Windows => self.windows.register_context_menu(
                        &target,
                        &reference.capability,
                        capability,
                        machine_wide,
                        handler,
                    ),
                    OsFamily::Unix => self.unix.register_context_menu(
                        &target,
                        &reference.capability,
                        capability,
                        machine_wide,
                        handler,
                    ),
                    OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::DefaultProgram(reference) => {
                let capability = entry.get_capability::<DefaultProgramCapability>(
                    &self.platform,
                    &reference.capability,
                )?;
                match self.platform.family {
                    // The Windows client registry is machine-scoped.
                    OsFamily::Windows if machine_wide => self.windows.register_default_program(
                        &target,
                        &reference.capability,
                        capability,
                        true,
                        handler,
                    ),
                    OsFamily::Windows => Ok(()),
                    OsFamily::Unix => self.unix.register_default_program(
                        &target,
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                        handler,
                    ),
                    OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::AutoStart(command) => self.create_shortcut(
                ShortcutLocation::AutoStart,
                command,
                &target,
                machine_wide,
                handler,
            ),
            AccessPoint::DesktopIcon(command) => self.create_shortcut(
                ShortcutLocation::Desktop,
                command,
                &target,
                machine_wide,
                handler,
            ),
            AccessPoint::MenuEntry(menu) => self.create_shortcut(
                ShortcutLocation::Menu {
                    category: menu.category.clone(),
                },
                &menu.launch,
                &target,
                machine_wide,
                handler,
            ),
            AccessPoint::QuickLaunch(command) => {
                // Windows-only and inherently per-user.
                if self.platform.family == OsFamily::Windows && !machine_wide {
                    self.windows.create_shortcut(
                        &ShortcutLocation::QuickLaunch,
                        &target,
                        &command.name,
                        command.command_name(),
                        false,
                        handler,
                    )
                } else {
                    Ok(())
                }
            }
            AccessPoint::SendTo(command) => {
                if self.platform.family == OsFamily::Windows && !machine_wide {
                    self.windows.create_shortcut(
                        &ShortcutLocation::SendTo,
                        &target,
                        &command.name,
                        command.command_name(),
                        false,
                        handler,
                    )
                } else {
                    Ok(())
                }
            }
            AccessPoint::Mock(mock) => mock.apply(entry, &self.platform),
        }
    }

    /// Remove the desktop artifact for one access point.
    ///
    /// Same resolution and routing rules as [`apply`](Self::apply), but an
    /// already-absent artifact is never an error: repeated unapply is a
    /// no-op success.
    pub fn unapply(
        &self,
        access_point: &AccessPoint,
        entry: &AppEntry,
        machine_wide: bool,
    ) -> Result<()> {
        debug!(access_point = %access_point, app = %entry, machine_wide, "unapplying access point");

        match access_point {
            AccessPoint::CapabilityRegistration => {
                self.unregister_capabilities(entry, machine_wide)
            }
            AccessPoint::FileType(reference) => {
                let capability = entry
                    .get_capability::<FileTypeCapability>(&self.platform, &reference.capability)?;
                match self.platform.family {
                    OsFamily::Windows => self.windows.unregister_file_type(
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                    ),
                    OsFamily::Unix => self.unix.unregister_file_type(
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                    ),
                    OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::UrlProtocol(reference) => {
                let capability = entry.get_capability::<UrlProtocolCapability>(
                    &self.platform,
                    &reference.capability,
                )?;
                match self.platform.family {
                    OsFamily::Windows => self.windows.unregister_url_protocol(
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                    ),
                    OsFamily::Unix => self.unix.unregister_url_protocol(
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                    ),
                    OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::AutoPlay(reference) => {
                let capability = entry
                    .get_capability::<AutoPlayCapability>(&self.platform, &reference.capability)?;
                match self.platform.family {
                    OsFamily::Windows => self.windows.unregister_auto_play(
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                    ),
                    OsFamily::Unix | OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::ContextMenu(reference) => {
                let capability = entry.get_capability::<ContextMenuCapability>(
                    &self.platform,
                    &reference.capability,
                )?;
                match self.platform.family {
                    OsFamily::Windows => self.windows.unregister_context_menu(
                        &reference.capability,
                        capability,
                        machine_wide,
                    ),
                    OsFamily::Unix => self.unix.unregister_context_menu(
                        &reference.capability,
                        capability,
                        machine_wide,
                    ),
                    OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::DefaultProgram(reference) => {
                let capability = entry.get_capability::<DefaultProgramCapability>(
                    &self.platform,
                    &reference.capability,
                )?;
                match self.platform.family {
                    OsFamily::Windows if machine_wide => self.windows.unregister_default_program(
                        &reference.capability,
                        capability,
                        true,
                    ),
                    OsFamily::Windows => Ok(()),
                    OsFamily::Unix => self.unix.unregister_default_program(
                        &reference.capability,
                        capability,
                        machine_wide,
                        true,
                    ),
                    OsFamily::Unknown => Ok(()),
                }
            }
            AccessPoint::AutoStart(command) => {
                self.remove_shortcut(ShortcutLocation::AutoStart, command, machine_wide)
            }
            AccessPoint::DesktopIcon(command) => {
                self.remove_shortcut(ShortcutLocation::Desktop, command, machine_wide)
            }
            AccessPoint::MenuEntry(menu) => self.remove_shortcut(
                ShortcutLocation::Menu {
                    category: menu.category.clone(),
                },
                &menu.launch,
                machine_wide,
            ),
            AccessPoint::QuickLaunch(command) => {
                if self.platform.family == OsFamily::Windows && !machine_wide {
                    self.windows
                        .remove_shortcut(&ShortcutLocation::QuickLaunch, &command.name, false)
                } else {
                    Ok(())
                }
            }
            AccessPoint::SendTo(command) => {
                if self.platform.family == OsFamily::Windows && !machine_wide {
                    self.windows
                        .remove_shortcut(&ShortcutLocation::SendTo, &command.name, false)
                } else {
                    Ok(())
                }
            }
            AccessPoint::Mock(mock) => mock.unapply(entry, &self.platform),
        }
    }

    fn create_shortcut(
        &self,
        location: ShortcutLocation,
        command: &AppCommand,
        target: &FeedTarget<'_>,
        machine_wide: bool,
        handler: &dyn TaskHandler,
    ) -> Result<()> {
        match self.platform.family {
            OsFamily::Windows => self.windows.create_shortcut(
                &location,
                target,
                &command.name,
                command.command_name(),
                machine_wide,
                handler,
            ),
            OsFamily::Unix => self.unix.create_shortcut(
                &location,
                target,
                &command.name,
                command.command_name(),
                machine_wide,
                handler,
            ),
            OsFamily::Unknown => Ok(()),
        }
    }

    fn remove_shortcut(
        &self,
        location: ShortcutLocation,
        command: &AppCommand,
        machine_wide: bool,
    ) -> Result<()> {
        match self.platform.family {
            OsFamily::Windows => {
                self.windows
                    .remove_shortcut(&location, &command.name, machine_wide)
            }
            OsFamily::Unix => self
                .unix
                .remove_shortcut(&location, &command.name, machine_wide),
            OsFamily::Unknown => Ok(()),
        }
    }

    /// Register every compatible capability of the entry, routed per
    /// capability variant.
    ///
    /// No partial-application rollback: if a collaborator fails midway the
    /// capabilities registered so far stay registered and the error
    /// propagates.
    fn register_capabilities(
        &self,
        entry: &AppEntry,
        target: &FeedTarget<'_>,
        handler: &dyn TaskHandler,
        machine_wide: bool,
    ) -> Result<()> {
        for list in entry
            .capability_lists
            .iter()
            .filter(|list| list.is_compatible(&self.platform))
        {
            let verb_capabilities: Vec<&Capability> = list
                .entries
                .iter()
                .filter(|capability| capability.is_verb_capability())
                .collect();

            for capability in &list.entries {
                handler.cancellation().check()?;
                let id = capability.id.as_str();
                match (&capability.kind, self.platform.family) {
                    (CapabilityKind::FileType(payload), OsFamily::Windows) => self
                        .windows
                        .register_file_type(target, id, payload, machine_wide, false, handler)?,
                    (CapabilityKind::FileType(payload), OsFamily::Unix) => self
                        .unix
                        .register_file_type(target, id, payload, machine_wide, false, handler)?,
                    (CapabilityKind::UrlProtocol(payload), OsFamily::Windows) => self
                        .windows
                        .register_url_protocol(target, id, payload, machine_wide, false, handler)?,
                    (CapabilityKind::UrlProtocol(payload), OsFamily::Unix) => self
                        .unix
                        .register_url_protocol(target, id, payload, machine_wide, false, handler)?,
                    (CapabilityKind::AutoPlay(payload), OsFamily::Windows) => self
                        .windows
                        .register_auto_play(target, id, payload, machine_wide, false, handler)?,
                    (CapabilityKind::ComServer(payload), OsFamily::Windows) => self
                        .windows
                        .register_com_server(target, id, payload, machine_wide, handler)?,
                    (CapabilityKind::AppRegistration(payload), OsFamily::Windows)
                        if machine_wide || self.platform.modern_windows =>
                    {
                        self.windows.register_app_registration(
                            target,
                            id,
                            payload,
                            &verb_capabilities,
                            machine_wide,
                            handler,
                        )?
                    }
                    (CapabilityKind::DefaultProgram(payload), OsFamily::Windows)
                        if machine_wide =>
                    {
                        self.windows
                            .register_default_program(target, id, payload, false, handler)?
                    }
                    (CapabilityKind::DefaultProgram(payload), OsFamily::Unix) => {
                        self.unix.register_default_program(
                            target,
                            id,
                            payload,
                            machine_wide,
                            false,
                            handler,
                        )?
                    }
                    // Remaining combinations have no integration on this
                    // family or scope.
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn unregister_capabilities(&self, entry: &AppEntry, machine_wide: bool) -> Result<()> {
        for list in entry
            .capability_lists
            .iter()
            .filter(|list| list.is_compatible(&self.platform))
        {
            for capability in &list.entries {
                let id = capability.id.as_str();
                match (&capability.kind, self.platform.family) {
                    (CapabilityKind::FileType(payload), OsFamily::Windows) => self
                        .windows
                        .unregister_file_type(id, payload, machine_wide, false)?,
                    (CapabilityKind::FileType(payload), OsFamily::Unix) => self
                        .unix
                        .unregister_file_type(id, payload, machine_wide, false)?,
                    (CapabilityKind::UrlProtocol(payload), OsFamily::Windows) => self
                        .windows
                        .unregister_url_protocol(id, payload, machine_wide, false)?,
                    (CapabilityKind::UrlProtocol(payload), OsFamily::Unix) => self
                        .unix
                        .unregister_url_protocol(id, payload, machine_wide, false)?,
                    (CapabilityKind::AutoPlay(payload), OsFamily::Windows) => self
                        .windows
                        .unregister_auto_play(id, payload, machine_wide, false)?,
                    (CapabilityKind::ComServer(payload), OsFamily::Windows) => {
                        self.windows.unregister_com_server(id, payload, machine_wide)?
                    }
                    (CapabilityKind::AppRegistration(payload), OsFamily::Windows)
                        if machine_wide || self.platform.modern_windows =>
                    {
                        self.windows
                            .unregister_app_registration(id, payload, machine_wide)?
                    }
                    (CapabilityKind::DefaultProgram(payload), OsFamily::Windows)
                        if machine_wide =>
                    {
                        self.windows.unregister_default_program(id, payload, false)?
                    }
                    (CapabilityKind::DefaultProgram(payload), OsFamily::Unix) => self
                        .unix
                        .unregister_default_program(id, payload, machine_wide, false)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_points::CapabilityRef;
    use crate::integrate::mock::RecordingBackend;
    use crate::integrate::traits::SilentHandler;
    use crate::model::{
        AppRegistrationCapability, AutoPlayEvent, CapabilityList, ComServerCapability,
        DefaultPolicy, FileTypeExtension, Presentation, Verb,
    };
    use url::Url;

    fn feed() -> Feed {
        Feed::new(Url::parse("https://example.com/app.xml").unwrap(), "App")
    }

    fn entry_with(capabilities: Vec<Capability>) -> AppEntry {
        let mut entry =
            AppEntry::new(Url::parse("https://example.com/app.xml").unwrap(), "App");
        entry
            .capability_lists
            .push(capabilities.into_iter().collect::<CapabilityList>());
        entry
    }

    fn integrator(platform: Platform) -> (Integrator, RecordingBackend) {
        let backend = RecordingBackend::new();
        let integrator = Integrator::new(
            platform,
            Box::new(backend.clone()),
            Box::new(backend.clone()),
        );
        (integrator, backend)
    }

    fn text_file_type() -> Capability {
        Capability::new(
            "text/plain",
            CapabilityKind::FileType(FileTypeCapability {
                extensions: vec![FileTypeExtension::new(".txt")],
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_file_type_routes_by_family() {
        let entry = entry_with(vec![text_file_type()]);
        let point = AccessPoint::FileType(CapabilityRef::new("text/plain"));
        let handler = SilentHandler::new();

        let (wintegrator, winlog) = integrator(Platform::windows());
        wintegrator
            .apply(&point, &entry, &feed(), &handler, false)
            .unwrap();
        assert_eq!(
            winlog.calls(),
            vec!["windows.register_file_type id=text/plain machine_wide=false set_default=true"]
        );

        let (unixtegrator, unixlog) = integrator(Platform::unix());
        unixtegrator
            .apply(&point, &entry, &feed(), &handler, false)
            .unwrap();
        assert_eq!(
            unixlog.calls(),
            vec!["unix.register_file_type id=text/plain machine_wide=false set_default=true"]
        );
    }

    #[test]
    fn test_resolution_checked_even_for_no_op_variants() {
        // AutoPlay never acts on Unix, but a dangling reference must still
        // fail so referential integrity holds everywhere.
        let entry = entry_with(vec![]);
        let point = AccessPoint::AutoPlay(CapabilityRef::new("missing"));
        let handler = SilentHandler::new();

        let (integ, log) = integrator(Platform::unix());
        let err = integ
            .apply(&point, &entry, &feed(), &handler, false)
            .unwrap_err();
        assert!(err.is_resolution_failure());
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_auto_play_no_op_on_unix_with_valid_reference() {
        let entry = entry_with(vec![Capability::new(
            "ap1",
            CapabilityKind::AutoPlay(AutoPlayCapability {
                policy: DefaultPolicy::default(),
                presentation: Presentation::default(),
                provider: "Player".to_string(),
                prog_id: "Player.File".to_string(),
                verb: Verb::new(Verb::NAME_PLAY),
                events: vec![AutoPlayEvent::new(AutoPlayEvent::PLAY_MUSIC_ON_ARRIVAL)],
            }),
        )]);
        let point = AccessPoint::AutoPlay(CapabilityRef::new("ap1"));
        let handler = SilentHandler::new();

        let (integ, log) = integrator(Platform::unix());
        integ.apply(&point, &entry, &feed(), &handler, false).unwrap();
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_quick_launch_gated_to_per_user_windows() {
        let entry = entry_with(vec![]);
        let point = AccessPoint::QuickLaunch(AppCommand::new("App"));
        let handler = SilentHandler::new();

        let (integ, log) = integrator(Platform::windows());
        integ.apply(&point, &entry, &feed(), &handler, true).unwrap();
        assert!(log.calls().is_empty());

        integ.apply(&point, &entry, &feed(), &handler, false).unwrap();
        assert_eq!(
            log.calls(),
            vec!["windows.create_shortcut location=quick-launch name=App command=run machine_wide=false"]
        );

        let (unix_integ, unix_log) = integrator(Platform::unix());
        unix_integ
            .apply(&point, &entry, &feed(), &handler, false)
            .unwrap();
        assert!(unix_log.calls().is_empty());
    }

    #[test]
    fn test_default_program_machine_wide_only_on_windows() {
        let entry = entry_with(vec![Capability::new(
            "mailer",
            CapabilityKind::DefaultProgram(DefaultProgramCapability {
                policy: DefaultPolicy::default(),
                presentation: Presentation::default(),
                verbs: vec![Verb::new(Verb::NAME_OPEN)],
                service: DefaultProgramCapability::SERVICE_MAIL.to_string(),
            }),
        )]);
        let point = AccessPoint::DefaultProgram(CapabilityRef::new("mailer"));
        let handler = SilentHandler::new();

        let (integ, log) = integrator(Platform::windows());
        integ.apply(&point, &entry, &feed(), &handler, false).unwrap();
        assert!(log.calls().is_empty());

        integ.apply(&point, &entry, &feed(), &handler, true).unwrap();
        assert_eq!(
            log.calls(),
            vec!["windows.register_default_program id=mailer set_default=true"]
        );
    }

    #[test]
    fn test_capability_registration_windows_dispatch() {
        let entry = entry_with(vec![
            text_file_type(),
            Capability::new("com1", CapabilityKind::ComServer(ComServerCapability {})),
            Capability::new(
                "reg1",
                CapabilityKind::AppRegistration(AppRegistrationCapability {
                    capability_reg_path: r"Software\App\Capabilities".to_string(),
                }),
            ),
        ]);
        let handler = SilentHandler::new();

        let (integ, log) = integrator(Platform::windows());
        integ
            .apply(
                &AccessPoint::CapabilityRegistration,
                &entry,
                &feed(),
                &handler,
                false,
            )
            .unwrap();
        assert_eq!(
            log.calls(),
            vec![
                "windows.register_file_type id=text/plain machine_wide=false set_default=false",
                "windows.register_com_server id=com1 machine_wide=false",
                "windows.register_app_registration id=reg1 verb_capabilities=1 machine_wide=false",
            ]
        );
    }

    #[test]
    fn test_capability_registration_app_registration_gated_on_legacy_windows() {
        let entry = entry_with(vec![Capability::new(
            "reg1",
            CapabilityKind::AppRegistration(AppRegistrationCapability::default()),
        )]);
        let handler = SilentHandler::new();

        let (integ, log) = integrator(Platform::legacy_windows());
        integ
            .apply(
                &AccessPoint::CapabilityRegistration,
                &entry,
                &feed(),
                &handler,
                false,
            )
            .unwrap();
        assert!(log.calls().is_empty());

        integ
            .apply(
                &AccessPoint::CapabilityRegistration,
                &entry,
                &feed(),
                &handler,
                true,
            )
            .unwrap();
        assert_eq!(
            log.calls(),
            vec!["windows.register_app_registration id=reg1 verb_capabilities=0 machine_wide=true"]
        );
    }

    #[test]
    fn test_capability_registration_unix_subset() {
        let entry = entry_with(vec![
            text_file_type(),
            Capability::new("com1", CapabilityKind::ComServer(ComServerCapability {})),
        ]);
        let handler = SilentHandler::new();

        let (integ, log) = integrator(Platform::unix());
        integ
            .apply(
                &AccessPoint::CapabilityRegistration,
                &entry,
                &feed(),
                &handler,
                false,
            )
            .unwrap();
        // ComServer is Windows-only and silently skipped.
        assert_eq!(
            log.calls(),
            vec!["unix.register_file_type id=text/plain machine_wide=false set_default=false"]
        );
    }

    #[test]
    fn test_unapply_mirrors_apply_routing() {
        let entry = entry_with(vec![text_file_type()]);
        let point = AccessPoint::FileType(CapabilityRef::new("text/plain"));

        let (integ, log) = integrator(Platform::unix());
        integ.unapply(&point, &entry, false).unwrap();
        assert_eq!(
            log.calls(),
            vec!["unix.unregister_file_type id=text/plain machine_wide=false set_default=true"]
        );
    }

    #[test]
    fn test_unapply_idempotent_against_mock_backend() {
        let entry = entry_with(vec![text_file_type()]);
        let point = AccessPoint::FileType(CapabilityRef::new("text/plain"));

        let (integ, log) = integrator(Platform::unix());
        integ.unapply(&point, &entry, false).unwrap();
        integ.unapply(&point, &entry, false).unwrap();
        assert_eq!(log.calls().len(), 2);
    }

    #[test]
    fn test_everything_no_ops_on_unknown_platform() {
        let entry = entry_with(vec![text_file_type()]);
        let handler = SilentHandler::new();
        let (integ, log) = integrator(Platform::unknown());

        for point in [
            AccessPoint::CapabilityRegistration,
            AccessPoint::FileType(CapabilityRef::new("text/plain")),
            AccessPoint::DesktopIcon(AppCommand::new("App")),
        ] {
            integ.apply(&point, &entry, &feed(), &handler, false).unwrap();
            integ.unapply(&point, &entry, false).unwrap();
        }
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_url_protocol_routes_by_family() {
        let entry = entry_with(vec![Capability::new(
            "http",
            CapabilityKind::UrlProtocol(UrlProtocolCapability {
                known_prefixes: vec!["http".to_string()],
                ..Default::default()
            }),
        )]);
        let point = AccessPoint::UrlProtocol(CapabilityRef::new("http"));
        let handler = SilentHandler::new();

        let (wintegrator, winlog) = integrator(Platform::windows());
        wintegrator
            .apply(&point, &entry, &feed(), &handler, false)
            .unwrap();
        assert_eq!(
            winlog.calls(),
            vec!["windows.register_url_protocol id=http machine_wide=false set_default=true"]
        );

        let (unixtegrator, unixlog) = integrator(Platform::unix());
        unixtegrator
            .apply(&point, &entry, &feed(), &handler, false)
            .unwrap();
        unixtegrator.unapply(&point, &entry, false).unwrap();
        assert_eq!(
            unixlog.calls(),
            vec![
                "unix.register_url_protocol id=http machine_wide=false set_default=true",
                "unix.unregister_url_protocol id=http machine_wide=false set_default=true",
            ]
        );
    }

    #[test]
    fn test_context_menu_routes_by_family() {
        let entry = entry_with(vec![Capability::new(
            "edit-with",
            CapabilityKind::ContextMenu(ContextMenuCapability {
                policy: DefaultPolicy::default(),
                presentation: Presentation::default(),
                all_objects: false,
                verb: Verb::new(Verb::NAME_EDIT),
            }),
        )]);
        let point = AccessPoint::ContextMenu(CapabilityRef::new("edit-with"));
        let handler = SilentHandler::new();

        let (wintegrator, winlog) = integrator(Platform::windows());
        wintegrator
            .apply(&point, &entry, &feed(), &handler, true)
            .unwrap();
        assert_eq!(
            winlog.calls(),
            vec!["windows.register_context_menu id=edit-with machine_wide=true"]
        );

        let (unixtegrator, unixlog) = integrator(Platform::unix());
        unixtegrator
            .apply(&point, &entry, &feed(), &handler, false)
            .unwrap();
        unixtegrator.unapply(&point, &entry, false).unwrap();
        assert_eq!(
            unixlog.calls(),
            vec![
                "unix.register_context_menu id=edit-with machine_wide=false",
                "unix.unregister_context_menu id=edit-with machine_wide=false",
            ]
        );
    }

    #[test]
    fn test_collaborator_failure_surfaces_as_platform_error() {
        use crate::integrate::mock::FailingBackend;

        let entry = entry_with(vec![text_file_type()]);
        let point = AccessPoint::FileType(CapabilityRef::new("text/plain"));
        let handler = SilentHandler::new();
        let integ = Integrator::new(
            Platform::unix(),
            Box::new(FailingBackend),
            Box::new(FailingBackend),
        );

        let err = integ
            .apply(&point, &entry, &feed(), &handler, false)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::IntegrationError::Platform { .. }
        ));
        assert!(err.to_string().contains("register_file_type"));

        let err = integ.unapply(&point, &entry, false).unwrap_err();
        assert!(matches!(
            err,
            crate::error::IntegrationError::Platform { .. }
        ));
    }

    #[test]
    fn test_cancellation_stops_apply() {
        let entry = entry_with(vec![text_file_type()]);
        let handler = SilentHandler::new();
        handler.token().cancel();

        let (integ, log) = integrator(Platform::unix());
        let err = integ
            .apply(
                &AccessPoint::CapabilityRegistration,
                &entry,
                &feed(),
                &handler,
                false,
            )
            .unwrap_err();
        assert!(matches!(err, crate::error::IntegrationError::Cancelled));
        assert!(log.calls().is_empty());
    }
}
