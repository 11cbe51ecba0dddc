//! Name-keyed lookup of operation instances.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::block::Block;
use crate::descriptor::OpDescriptor;
use crate::error::OpError;
use crate::op::{DeclarableOp, Execute};
use crate::ops;
use crate::status::Status;
use crate::Result;

/// Process-wide registry, pre-loaded with the built-in operations.
static GLOBAL: OnceLock<OpRegistry> = OnceLock::new();

/// Thread-safe map from operation name to a shared operation instance.
///
/// Operations are stateless between calls, so one instance serves every
/// caller.
#[derive(Default)]
pub struct OpRegistry {
    ops: RwLock<HashMap<String, Arc<dyn DeclarableOp>>>,
}

impl OpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in operation.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for op in ops::builtin() {
            if let Err(err) = registry.register_arc(op) {
                tracing::error!(%err, "built-in operation skipped");
                debug_assert!(false, "built-in registration failed: {err}");
            }
        }
        registry
    }

    /// The shared process-wide registry.
    pub fn global() -> &'static OpRegistry {
        GLOBAL.get_or_init(Self::with_builtins)
    }

    /// Register `op` under its descriptor name.
    pub fn register<O: DeclarableOp + 'static>(&self, op: O) -> Result<()> {
        self.register_arc(Arc::new(op))
    }

    pub fn register_arc(&self, op: Arc<dyn DeclarableOp>) -> Result<()> {
        let name = op.op_name().to_string();
        let mut map = self.ops.write();
        if map.contains_key(&name) {
            return Err(OpError::DuplicateOp(name));
        }
        tracing::debug!(op = %name, "registered operation");
        map.insert(name, op);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DeclarableOp>> {
        self.ops.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ops.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Descriptors of every registered operation, sorted by name.
    pub fn descriptors(&self) -> Vec<OpDescriptor> {
        let mut descriptors: Vec<OpDescriptor> = self
            .ops
            .read()
            .values()
            .map(|op| op.descriptor().clone())
            .collect();
        descriptors.sort_by(|a, b| a.name().cmp(b.name()));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.ops.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.read().is_empty()
    }

    /// Look up `name` and execute it on `block`.
    ///
    /// The read lock is released before the operation runs.
    pub fn execute(&self, name: &str, block: &mut Block) -> Result<Status> {
        let op = self
            .get(name)
            .ok_or_else(|| OpError::UnknownOp(name.to_string()))?;
        op.execute(Some(block))
    }
}

impl std::fmt::Debug for OpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpRegistry").field("ops", &self.names()).finish()
    }
}
