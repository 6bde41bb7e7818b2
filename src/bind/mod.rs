//! Materializes flat property bags into a naming tree.
//!
//! Binding runs in two passes per bag. The first pass finds every `type`
//! pseudo-attribute and so every typed node. The second pass classifies the
//! remaining keys against that fixed set: keys owned by a typed node are
//! gathered into its attributes, all others are bound directly. Typed nodes
//! are converted and bound only after the second pass has finished.

mod binder;
pub mod dispatch;
pub mod path;
pub mod subcontext;
pub mod typed;

pub use binder::{Binder, Disposition, ObjectSlot, Placement};
pub use path::{Delimiter, DelimiterMatch, NodePath};
pub use typed::{extract_type_nodes, TypeNode};
