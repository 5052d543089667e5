//! ETag helpers for conditional snapshot reads.
//!
//! A group snapshot is identified by its `(version, tick)` ordering marker, so
//! the entity tag changes exactly when a newer snapshot exists.

use crate::domain::{GroupId, SyncSnapshot};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Generate the ETag for a group snapshot.
///
/// Format: `"group-{groupId}-v{version}-t{tick}"` (quoted, per RFC 9110)
pub fn group_etag(group_id: GroupId, version: u64, tick: u64) -> String {
    format!(r#""group-{group_id}-v{version}-t{tick}""#)
}

pub fn snapshot_etag(snapshot: &SyncSnapshot) -> String {
    let (version, tick) = snapshot.marker();
    group_etag(snapshot.group_id(), version, tick)
}

/// Parse the `(version, tick)` marker from a group ETag value.
///
/// # Errors
/// Returns `AppError::bad_request` with `ErrorCode::InvalidHeader` if the tag
/// is malformed.
pub fn parse_marker_from_etag(s: &str) -> Result<(u64, u64), AppError> {
    let s = s.trim().trim_start_matches("W/").trim_matches('"');

    let invalid = |why: &str| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!(
                "Invalid ETag format: {why}. Expected \"group-{{id}}-v{{version}}-t{{tick}}\", got: \"{s}\""
            ),
        )
    };

    if !s.starts_with("group-") {
        return Err(invalid("missing group prefix"));
    }
    let tick_at = s.rfind("-t").ok_or_else(|| invalid("missing tick marker"))?;
    let version_at = s[..tick_at]
        .rfind("-v")
        .ok_or_else(|| invalid("missing version marker"))?;

    let version = s[version_at + 2..tick_at]
        .parse::<u64>()
        .map_err(|_| invalid("version must be an unsigned integer"))?;
    let tick = s[tick_at + 2..]
        .parse::<u64>()
        .map_err(|_| invalid("tick must be an unsigned integer"))?;
    Ok((version, tick))
}

/// True when any tag in an `If-None-Match` value matches `etag`.
pub fn if_none_match_hits(header: &str, etag: &str) -> bool {
    let wanted = etag.trim_matches('"');
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.trim_start_matches("W/").trim_matches('"') == wanted
    })
}
