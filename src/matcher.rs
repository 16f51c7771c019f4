//! Tolerance-based anchor lookup
//!
//! Records only remember where an anchor was. Both lookups are linear
//! scans returning the first anchor inside tolerance; when several anchors
//! overlap within tolerance the result depends on scan order.

use glam::{Quat, Vec3};

use crate::world::{Anchor, AnchorId};
use crate::{angle_degrees, distance};

/// First anchor strictly closer than `tolerance` to `target`
pub fn find_anchor_by_position<'a, I>(anchors: I, target: Vec3, tolerance: f32) -> Option<AnchorId>
where
    I: IntoIterator<Item = &'a Anchor>,
{
    anchors
        .into_iter()
        .find(|a| distance(a.position, target) < tolerance)
        .map(|a| a.id)
}

/// First anchor within both the position and angular tolerance.
///
/// Stricter than [`find_anchor_by_position`]: a false match here wipes the
/// anchor's current contents.
pub fn find_anchor_by_pose<'a, I>(
    anchors: I,
    position: Vec3,
    rotation: Quat,
    position_tolerance: f32,
    rotation_tolerance_deg: f32,
) -> Option<AnchorId>
where
    I: IntoIterator<Item = &'a Anchor>,
{
    anchors
        .into_iter()
        .find(|a| {
            distance(a.position, position) < position_tolerance
                && angle_degrees(a.rotation, rotation) < rotation_tolerance_deg
        })
        .map(|a| a.id)
}
