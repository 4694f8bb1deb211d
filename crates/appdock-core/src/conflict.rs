//! Global conflict detection across app entries.
//!
//! Every access point claims a set of string identifiers; two different
//! applications must never simultaneously hold access points whose claims
//! intersect. Conflict IDs are regenerated from live data on every check;
//! they are never stored, so their format can evolve freely.

use crate::access_points::AccessPoint;
use crate::app_entry::AppEntry;
use crate::app_list::AppList;
use crate::error::{IntegrationError, Result};
use crate::platform::Platform;
use std::collections::BTreeMap;
use tracing::debug;

/// The current holder of a conflict identifier.
#[derive(Debug, Clone, Copy)]
pub struct ConflictSource<'a> {
    pub app: &'a AppEntry,
    pub access_point: &'a AccessPoint,
}

/// Build the map from conflict ID to its current holder across all active
/// access points in the list.
///
/// On duplicate claims the first holder in list order is kept; a valid list
/// only contains duplicates for value-equal access points of one entry.
pub fn conflict_map<'a>(
    app_list: &'a AppList,
    platform: &Platform,
) -> Result<BTreeMap<String, ConflictSource<'a>>> {
    let mut map = BTreeMap::new();
    for app in &app_list.entries {
        let Some(access_points) = &app.access_points else {
            continue;
        };
        for access_point in &access_points.entries {
            for id in access_point.conflict_ids(app, platform)? {
                map.entry(id)
                    .or_insert(ConflictSource { app, access_point });
            }
        }
    }
    Ok(map)
}

/// Check a batch of new access points for `entry` against every access
/// point already active on any app in the list.
///
/// Re-adding a value-equal access point to the same entry is not a conflict
/// (idempotent re-application). Two *different* access points claiming the
/// same identifier are rejected even within one entry, so unapply never
/// becomes order-dependent.
pub fn check_for_conflicts(
    app_list: &AppList,
    entry: &AppEntry,
    new_access_points: &[AccessPoint],
    platform: &Platform,
) -> Result<()> {
    let existing = conflict_map(app_list, platform)?;
    let mut claimed_in_batch: BTreeMap<String, &AccessPoint> = BTreeMap::new();

    for access_point in new_access_points {
        for id in access_point.conflict_ids(entry, platform)? {
            if let Some(holder) = existing.get(&id) {
                let same_app = holder.app.interface_uri == entry.interface_uri;
                if !(same_app && holder.access_point == access_point) {
                    debug!(conflict_id = %id, holder = %holder.app, "rejecting conflicting access point");
                    return Err(conflict_error(&id, holder, entry, access_point));
                }
            }
            if let Some(previous) = claimed_in_batch.get(&id) {
                if *previous != access_point {
                    return Err(IntegrationError::ConflictDetected {
                        conflict_id: id,
                        existing_app: entry.to_string(),
                        existing_access_point: previous.to_string(),
                        new_app: entry.to_string(),
                        new_access_point: access_point.to_string(),
                    });
                }
            } else {
                claimed_in_batch.insert(id, access_point);
            }
        }
    }
    Ok(())
}

fn conflict_error(
    id: &str,
    holder: &ConflictSource<'_>,
    entry: &AppEntry,
    access_point: &AccessPoint,
) -> IntegrationError {
    IntegrationError::ConflictDetected {
        conflict_id: id.to_string(),
        existing_app: holder.app.to_string(),
        existing_access_point: holder.access_point.to_string(),
        new_app: entry.to_string(),
        new_access_point: access_point.to_string(),
    }
}
