/// Custom-id detection: map component and modal ids back to a session control.
///
/// Ids look like `embedtool:<session>:<control>`; header buttons use
/// `embedtool:<session>:header:<row>` and never route anywhere.
use crate::controls::ControlRow;
use crate::types::{ControlId, SessionId};

pub const CUSTOM_ID_PREFIX: &str = "embedtool";

pub fn control_custom_id(session: SessionId, control: ControlId) -> String {
    format!("{CUSTOM_ID_PREFIX}:{session}:{}", control.key())
}

pub fn header_custom_id(session: SessionId, row: ControlRow) -> String {
    format!("{CUSTOM_ID_PREFIX}:{session}:header:{}", row.key())
}

/// Detect which session control an interaction targets.
/// Returns `None` for foreign ids, header buttons and unknown controls.
pub fn detect_control(custom_id: &str) -> Option<(SessionId, ControlId)> {
    let mut parts = custom_id.splitn(3, ':');
    if parts.next()? != CUSTOM_ID_PREFIX {
        return None;
    }
    let session = parts.next()?.parse().ok()?;
    let control = ControlId::from_key(parts.next()?)?;
    Some((session, control))
}

/// True if the id belongs to this tool at all, even if it no longer routes.
pub fn is_embedtool_id(custom_id: &str) -> bool {
    custom_id
        .split_once(':')
        .is_some_and(|(prefix, _)| prefix == CUSTOM_ID_PREFIX)
}
