//! Repository tree: arena-backed hierarchy and its display linearization.
//!
//! - `node`: `Tree` arena, node construction from scanner entries, ordering
//! - `flatten`: `DisplayRow` derivation from the tree and expansion state

pub mod flatten;
pub mod node;

pub use flatten::{DisplayRow, flatten};
pub use node::{NodeId, Tree, TreeNode};
