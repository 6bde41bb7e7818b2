//! Creation and traversal of container chains.

use crate::{Context, Error};

/// Walks `segments` below `start`, creating missing branches.
///
/// Existing branches are reused, so several bags can share one path. A
/// segment already bound to a leaf fails with [`Error::StructuralClash`].
pub fn resolve<'a, S: AsRef<str>>(segments: &[S], start: &'a mut Context) -> Result<&'a mut Context, Error> {
    let mut current = start;
    for segment in segments {
        current = current.subcontext(segment.as_ref())?;
    }
    Ok(current)
}
