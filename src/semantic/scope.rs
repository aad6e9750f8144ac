use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::lexer::VarType;

/// Lexically scoped declaration table
///
/// Frames form a strict stack. The root frame is the global scope and is never popped.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    /// Stack of nested frames, innermost last
    frames: Vec<Frame>,
}

/// Single frame in the table
#[derive(Debug, Clone)]
struct Frame {
    /// Names declared directly in this frame
    symbols: HashMap<String, VarType>,
    /// Index of parent frame (None for global scope)
    parent: Option<usize>,
}

impl ScopeTable {
    /// Creates a new table holding only the global scope
    pub fn new() -> Self {
        ScopeTable {
            frames: vec![Frame {
                symbols: HashMap::new(),
                parent: None,
            }],
        }
    }

    /// Enters a new nested scope
    pub fn enter_scope(&mut self) {
        let parent_idx = self.frames.len() - 1;
        self.frames.push(Frame {
            symbols: HashMap::new(),
            parent: Some(parent_idx),
        });
        tracing::trace!(depth = self.frames.len(), "enter scope");
    }

    /// Exits the current scope, discarding all of its bindings
    pub fn exit_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
        tracing::trace!(depth = self.frames.len(), "exit scope");
    }

    /// Declares `name` in the innermost scope
    ///
    /// Fails when the same frame already holds the name. Outer bindings are shadowed.
    pub fn define(&mut self, name: &str, var_type: VarType) -> Result<()> {
        let frame = self.innermost_mut();
        if frame.symbols.contains_key(name) {
            return Err(Error::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        frame.symbols.insert(name.to_string(), var_type);
        Ok(())
    }

    /// Finds the type of `name`, searching from the innermost scope outward
    pub fn resolve(&self, name: &str) -> Option<VarType> {
        let mut frame_idx = self.frames.len() - 1;
        loop {
            let frame = &self.frames[frame_idx];
            if let Some(var_type) = frame.symbols.get(name) {
                return Some(*var_type);
            }
            match frame.parent {
                Some(parent) => frame_idx = parent,
                None => return None,
            }
        }
    }

    /// Like [`resolve`](Self::resolve) but reports a missing name as an error
    pub fn lookup(&self, name: &str) -> Result<VarType> {
        self.resolve(name).ok_or_else(|| Error::UndeclaredVariable {
            name: name.to_string(),
        })
    }

    fn innermost_mut(&mut self) -> &mut Frame {
        let idx = self.frames.len() - 1;
        &mut self.frames[idx]
    }
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}
