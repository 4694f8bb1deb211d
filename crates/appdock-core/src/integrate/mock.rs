//! Recording collaborators for tests.

use super::traits::{ShortcutLocation, TaskHandler, UnixIntegration, WindowsIntegration};
use crate::error::Result;
use crate::model::{
    AppRegistrationCapability, AutoPlayCapability, Capability, ComServerCapability,
    ContextMenuCapability, DefaultProgramCapability, FeedTarget, FileTypeCapability,
    UrlProtocolCapability,
};
use std::sync::{Arc, Mutex};

/// A collaborator for both OS families that performs no desktop mutation
/// and instead records every call as a formatted line, in call order.
///
/// Clones share the same log, so the same backend can be handed to an
/// [`Integrator`](super::Integrator) twice and inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, line: String) {
        self.calls.lock().unwrap().push(line);
    }
}

impl WindowsIntegration for RecordingBackend {
    fn register_file_type(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &FileTypeCapability,
        machine_wide: bool,
        set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "windows.register_file_type id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn unregister_file_type(
        &self,
        id: &str,
        _capability: &FileTypeCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()> {
        self.record(format!(
            "windows.unregister_file_type id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn register_url_protocol(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &UrlProtocolCapability,
        machine_wide: bool,
        set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "windows.register_url_protocol id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn unregister_url_protocol(
        &self,
        id: &str,
        _capability: &UrlProtocolCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()> {
        self.record(format!(
            "windows.unregister_url_protocol id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn register_auto_play(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &AutoPlayCapability,
        machine_wide: bool,
        set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "windows.register_auto_play id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn unregister_auto_play(
        &self,
        id: &str,
        _capability: &AutoPlayCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()> {
        self.record(format!(
            "windows.unregister_auto_play id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn register_com_server(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &ComServerCapability,
        machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "windows.register_com_server id={id} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn unregister_com_server(
        &self,
        id: &str,
        _capability: &ComServerCapability,
        machine_wide: bool,
    ) -> Result<()> {
        self.record(format!(
            "windows.unregister_com_server id={id} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn register_app_registration(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &AppRegistrationCapability,
        verb_capabilities: &[&Capability],
        machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "windows.register_app_registration id={id} verb_capabilities={} machine_wide={machine_wide}",
            verb_capabilities.len()
        ));
        Ok(())
    }

    fn unregister_app_registration(
        &self,
        id: &str,
        _capability: &AppRegistrationCapability,
        machine_wide: bool,
    ) -> Result<()> {
        self.record(format!(
            "windows.unregister_app_registration id={id} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn register_default_program(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &DefaultProgramCapability,
        set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "windows.register_default_program id={id} set_default={set_default}"
        ));
        Ok(())
    }

    fn unregister_default_program(
        &self,
        id: &str,
        _capability: &DefaultProgramCapability,
        set_default: bool,
    ) -> Result<()> {
        self.record(format!(
            "windows.unregister_default_program id={id} set_default={set_default}"
        ));
        Ok(())
    }

    fn register_context_menu(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &ContextMenuCapability,
        machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "windows.register_context_menu id={id} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn unregister_context_menu(
        &self,
        id: &str,
        _capability: &ContextMenuCapability,
        machine_wide: bool,
    ) -> Result<()> {
        self.record(format!(
            "windows.unregister_context_menu id={id} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn create_shortcut(
        &self,
        location: &ShortcutLocation,
        _target: &FeedTarget<'_>,
        name: &str,
        command: &str,
        machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "windows.create_shortcut location={location} name={name} command={command} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn remove_shortcut(
        &self,
        location: &ShortcutLocation,
        name: &str,
        machine_wide: bool,
    ) -> Result<()> {
        self.record(format!(
            "windows.remove_shortcut location={location} name={name} machine_wide={machine_wide}"
        ));
        Ok(())
    }
}

impl UnixIntegration for RecordingBackend {
    fn register_file_type(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &FileTypeCapability,
        machine_wide: bool,
        set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "unix.register_file_type id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn unregister_file_type(
        &self,
        id: &str,
        _capability: &FileTypeCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()> {
        self.record(format!(
            "unix.unregister_file_type id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn register_url_protocol(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &UrlProtocolCapability,
        machine_wide: bool,
        set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "unix.register_url_protocol id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn unregister_url_protocol(
        &self,
        id: &str,
        _capability: &UrlProtocolCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()> {
        self.record(format!(
            "unix.unregister_url_protocol id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn register_default_program(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &DefaultProgramCapability,
        machine_wide: bool,
        set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "unix.register_default_program id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn unregister_default_program(
        &self,
        id: &str,
        _capability: &DefaultProgramCapability,
        machine_wide: bool,
        set_default: bool,
    ) -> Result<()> {
        self.record(format!(
            "unix.unregister_default_program id={id} machine_wide={machine_wide} set_default={set_default}"
        ));
        Ok(())
    }

    fn register_context_menu(
        &self,
        _target: &FeedTarget<'_>,
        id: &str,
        _capability: &ContextMenuCapability,
        machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "unix.register_context_menu id={id} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn unregister_context_menu(
        &self,
        id: &str,
        _capability: &ContextMenuCapability,
        machine_wide: bool,
    ) -> Result<()> {
        self.record(format!(
            "unix.unregister_context_menu id={id} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn create_shortcut(
        &self,
        location: &ShortcutLocation,
        _target: &FeedTarget<'_>,
        name: &str,
        command: &str,
        machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.record(format!(
            "unix.create_shortcut location={location} name={name} command={command} machine_wide={machine_wide}"
        ));
        Ok(())
    }

    fn remove_shortcut(
        &self,
        location: &ShortcutLocation,
        name: &str,
        machine_wide: bool,
    ) -> Result<()> {
        self.record(format!(
            "unix.remove_shortcut location={location} name={name} machine_wide={machine_wide}"
        ));
        Ok(())
    }
}

/// A backend that fails every mutating call, for rollback tests.
#[derive(Debug, Clone, Default)]
pub struct FailingBackend;

impl FailingBackend {
    fn fail(&self, operation: &'static str) -> Result<()> {
        Err(crate::error::IntegrationError::platform(
            operation,
            "simulated platform failure",
        ))
    }
}

impl WindowsIntegration for FailingBackend {
    fn register_file_type(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &FileTypeCapability,
        _machine_wide: bool,
        _set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_file_type")
    }

    fn unregister_file_type(
        &self,
        _id: &str,
        _capability: &FileTypeCapability,
        _machine_wide: bool,
        _set_default: bool,
    ) -> Result<()> {
        self.fail("unregister_file_type")
    }

    fn register_url_protocol(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &UrlProtocolCapability,
        _machine_wide: bool,
        _set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_url_protocol")
    }

    fn unregister_url_protocol(
        &self,
        _id: &str,
        _capability: &UrlProtocolCapability,
        _machine_wide: bool,
        _set_default: bool,
    ) -> Result<()> {
        self.fail("unregister_url_protocol")
    }

    fn register_auto_play(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &AutoPlayCapability,
        _machine_wide: bool,
        _set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_auto_play")
    }

    fn unregister_auto_play(
        &self,
        _id: &str,
        _capability: &AutoPlayCapability,
        _machine_wide: bool,
        _set_default: bool,
    ) -> Result<()> {
        self.fail("unregister_auto_play")
    }

    fn register_com_server(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &ComServerCapability,
        _machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_com_server")
    }

    fn unregister_com_server(
        &self,
        _id: &str,
        _capability: &ComServerCapability,
        _machine_wide: bool,
    ) -> Result<()> {
        self.fail("unregister_com_server")
    }

    fn register_app_registration(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &AppRegistrationCapability,
        _verb_capabilities: &[&Capability],
        _machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_app_registration")
    }

    fn unregister_app_registration(
        &self,
        _id: &str,
        _capability: &AppRegistrationCapability,
        _machine_wide: bool,
    ) -> Result<()> {
        self.fail("unregister_app_registration")
    }

    fn register_default_program(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &DefaultProgramCapability,
        _set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_default_program")
    }

    fn unregister_default_program(
        &self,
        _id: &str,
        _capability: &DefaultProgramCapability,
        _set_default: bool,
    ) -> Result<()> {
        self.fail("unregister_default_program")
    }

    fn register_context_menu(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &ContextMenuCapability,
        _machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_context_menu")
    }

    fn unregister_context_menu(
        &self,
        _id: &str,
        _capability: &ContextMenuCapability,
        _machine_wide: bool,
    ) -> Result<()> {
        self.fail("unregister_context_menu")
    }

    fn create_shortcut(
        &self,
        _location: &ShortcutLocation,
        _target: &FeedTarget<'_>,
        _name: &str,
        _command: &str,
        _machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("create_shortcut")
    }

    fn remove_shortcut(
        &self,
        _location: &ShortcutLocation,
        _name: &str,
        _machine_wide: bool,
    ) -> Result<()> {
        self.fail("remove_shortcut")
    }
}

impl UnixIntegration for FailingBackend {
    fn register_file_type(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &FileTypeCapability,
        _machine_wide: bool,
        _set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_file_type")
    }

    fn unregister_file_type(
        &self,
        _id: &str,
        _capability: &FileTypeCapability,
        _machine_wide: bool,
        _set_default: bool,
    ) -> Result<()> {
        self.fail("unregister_file_type")
    }

    fn register_url_protocol(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &UrlProtocolCapability,
        _machine_wide: bool,
        _set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_url_protocol")
    }

    fn unregister_url_protocol(
        &self,
        _id: &str,
        _capability: &UrlProtocolCapability,
        _machine_wide: bool,
        _set_default: bool,
    ) -> Result<()> {
        self.fail("unregister_url_protocol")
    }

    fn register_default_program(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &DefaultProgramCapability,
        _machine_wide: bool,
        _set_default: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_default_program")
    }

    fn unregister_default_program(
        &self,
        _id: &str,
        _capability: &DefaultProgramCapability,
        _machine_wide: bool,
        _set_default: bool,
    ) -> Result<()> {
        self.fail("unregister_default_program")
    }

    fn register_context_menu(
        &self,
        _target: &FeedTarget<'_>,
        _id: &str,
        _capability: &ContextMenuCapability,
        _machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("register_context_menu")
    }

    fn unregister_context_menu(
        &self,
        _id: &str,
        _capability: &ContextMenuCapability,
        _machine_wide: bool,
    ) -> Result<()> {
        self.fail("unregister_context_menu")
    }

    fn create_shortcut(
        &self,
        _location: &ShortcutLocation,
        _target: &FeedTarget<'_>,
        _name: &str,
        _command: &str,
        _machine_wide: bool,
        _handler: &dyn TaskHandler,
    ) -> Result<()> {
        self.fail("create_shortcut")
    }

    fn remove_shortcut(
        &self,
        _location: &ShortcutLocation,
        _name: &str,
        _machine_wide: bool,
    ) -> Result<()> {
        self.fail("remove_shortcut")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrate::traits::SilentHandler;
    use crate::model::Feed;
    use url::Url;

    #[test]
    fn test_clones_share_the_log() {
        let backend = RecordingBackend::new();
        let clone = backend.clone();
        let feed = Feed::new(Url::parse("https://example.com/app.xml").unwrap(), "App");
        let uri = Url::parse("https://example.com/app.xml").unwrap();
        let target = FeedTarget {
            interface_uri: &uri,
            feed: &feed,
        };

        WindowsIntegration::create_shortcut(
            &clone,
            &ShortcutLocation::Desktop,
            &target,
            "App",
            "run",
            false,
            &SilentHandler::new(),
        )
        .unwrap();
        assert_eq!(backend.calls().len(), 1);
    }

    #[test]
    fn test_failing_backend_reports_platform_error() {
        let backend = FailingBackend;
        let err = WindowsIntegration::remove_shortcut(
            &backend,
            &ShortcutLocation::Desktop,
            "App",
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("remove_shortcut"));
    }
}
