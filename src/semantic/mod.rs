//! Name and scope checking for Mini
//!
//! The parser consults a [`ScopeTable`] inline while it builds the tree, so declaration
//! order and duplicate declarations are validated in the same pass.

mod scope;

pub use scope::ScopeTable;
