//! The transactional surface tying the app list, conflict detection and the
//! dispatcher together.
//!
//! Every mutating operation follows the same shape: validate against the
//! current list, perform the desktop side effects, and only then commit the
//! list mutation. A failed side effect rolls back the artifacts applied so
//! far in the same batch, so the stored list never claims desktop state
//! that was not reached.

use crate::access_points::{AccessPoint, AccessPointList};
use crate::app_entry::AppEntry;
use crate::app_list::AppList;
use crate::conflict;
use crate::error::{IntegrationError, Result};
use crate::integrate::{Integrator, TaskHandler};
use crate::model::{CapabilityList, Feed};
use chrono::Utc;
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

/// Manages the integration state of one scope (per-user or machine-wide).
///
/// Owns the [`AppList`] for the duration of a session; persisting the list
/// and locking it against concurrent managers is the caller's concern.
pub struct IntegrationManager {
    app_list: AppList,
    integrator: Integrator,
    machine_wide: bool,
}

impl IntegrationManager {
    pub fn new(app_list: AppList, integrator: Integrator, machine_wide: bool) -> Self {
        Self {
            app_list,
            integrator,
            machine_wide,
        }
    }

    pub fn app_list(&self) -> &AppList {
        &self.app_list
    }

    /// Hand the (possibly modified) list back for persistence.
    pub fn into_app_list(self) -> AppList {
        self.app_list
    }

    pub fn machine_wide(&self) -> bool {
        self.machine_wide
    }

    /// Add an application to the list without integrating anything yet.
    ///
    /// The entry starts with the feed's identity and capability lists and no
    /// access points. Fails when the interface URI is already known.
    pub fn add_app(&mut self, feed: &Feed, capability_lists: Vec<CapabilityList>) -> Result<()> {
        if self.app_list.contains(&feed.uri) {
            return Err(IntegrationError::Validation {
                field: "interface_uri".to_string(),
                message: format!("app '{}' is already in the list", feed.uri),
            });
        }
        let mut entry = AppEntry::new(feed.uri.clone(), feed.name.clone());
        entry.capability_lists = capability_lists;
        info!(app = %entry, machine_wide = self.machine_wide, "adding app");
        self.app_list.entries.push(entry);
        Ok(())
    }

    /// Apply a batch of access points for an application and record them.
    ///
    /// The whole batch is checked for conflicts up front; nothing is applied
    /// when any element conflicts. On a mid-batch apply failure, elements
    /// applied earlier in the batch are unapplied again, except those that
    /// were already recorded on the entry before this call (re-application
    /// must not destroy what the user already had).
    pub fn add_access_points(
        &mut self,
        interface_uri: &Url,
        feed: &Feed,
        access_points: Vec<AccessPoint>,
        handler: &dyn TaskHandler,
    ) -> Result<()> {
        let index = self
            .app_list
            .position(interface_uri)
            .ok_or_else(|| IntegrationError::AppNotFound {
                uri: interface_uri.to_string(),
            })?;
        let entry = self.app_list.entries[index].clone();

        conflict::check_for_conflicts(
            &self.app_list,
            &entry,
            &access_points,
            self.integrator.platform(),
        )?;

        if self.hostname_matches(&entry)? {
            self.apply_with_rollback(&entry, feed, &access_points, handler)?;
        } else {
            debug!(app = %entry, "hostname filter does not match, recording without applying");
        }

        let slot = &mut self.app_list.entries[index];
        let list = slot.access_points.get_or_insert_with(AccessPointList::new);
        list.entries
            .retain(|existing| !access_points.contains(existing));
        list.entries.extend(access_points);
        slot.timestamp = Utc::now();
        Ok(())
    }

    /// Unapply a batch of access points and drop them from the entry.
    ///
    /// Unapplying an access point that was never recorded is not an error;
    /// the collaborators' idempotency contract makes the removal a no-op.
    pub fn remove_access_points(
        &mut self,
        interface_uri: &Url,
        access_points: &[AccessPoint],
    ) -> Result<()> {
        let index = self
            .app_list
            .position(interface_uri)
            .ok_or_else(|| IntegrationError::AppNotFound {
                uri: interface_uri.to_string(),
            })?;
        let entry = self.app_list.entries[index].clone();

        if self.hostname_matches(&entry)? {
            for access_point in access_points {
                self.integrator
                    .unapply(access_point, &entry, self.machine_wide)?;
            }
        }

        let slot = &mut self.app_list.entries[index];
        if let Some(list) = &mut slot.access_points {
            list.entries
                .retain(|existing| !access_points.contains(existing));
            if list.is_empty() {
                slot.access_points = None;
            }
        }
        slot.timestamp = Utc::now();
        Ok(())
    }

    /// Remove an application: unapply all its access points, then drop the
    /// entry. Returns the removed entry.
    pub fn remove_app(&mut self, interface_uri: &Url) -> Result<AppEntry> {
        let index = self
            .app_list
            .position(interface_uri)
            .ok_or_else(|| IntegrationError::AppNotFound {
                uri: interface_uri.to_string(),
            })?;
        let entry = self.app_list.entries[index].clone();

        if self.hostname_matches(&entry)? {
            if let Some(list) = &entry.access_points {
                for access_point in &list.entries {
                    self.integrator
                        .unapply(access_point, &entry, self.machine_wide)?;
                }
            }
        }

        info!(app = %entry, "removing app");
        Ok(self.app_list.entries.remove(index))
    }

    fn apply_with_rollback(
        &self,
        entry: &AppEntry,
        feed: &Feed,
        access_points: &[AccessPoint],
        handler: &dyn TaskHandler,
    ) -> Result<()> {
        let mut applied: Vec<&AccessPoint> = Vec::new();
        for access_point in access_points {
            if let Err(err) = self
                .integrator
                .apply(access_point, entry, feed, handler, self.machine_wide)
            {
                self.rollback(entry, &applied);
                return Err(err);
            }
            applied.push(access_point);
        }
        Ok(())
    }

    fn rollback(&self, entry: &AppEntry, applied: &[&AccessPoint]) {
        for access_point in applied.iter().rev() {
            let pre_existing = entry
                .access_points
                .as_ref()
                .is_some_and(|list| list.contains(access_point));
            if pre_existing {
                // The artifact existed before this batch; a re-application
                // failure must not remove it.
                continue;
            }
            if let Err(err) = self.integrator.unapply(access_point, entry, self.machine_wide) {
                warn!(access_point = %access_point, error = %err, "rollback failed");
            }
        }
    }

    fn hostname_matches(&self, entry: &AppEntry) -> Result<bool> {
        let Some(filter) = &entry.hostname_filter else {
            return Ok(true);
        };
        let regex = Regex::new(filter).map_err(|err| IntegrationError::Validation {
            field: "hostname_filter".to_string(),
            message: format!("invalid hostname filter '{filter}': {err}"),
        })?;
        Ok(regex.is_match(&self.integrator.platform().hostname))
    }
}
