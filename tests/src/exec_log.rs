use crate::logging_adapter::AdapterOp;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tideline_core::adapter::{AdapterMethod, Operation, Rows};

/// Read side of the operations recorded by a `LoggingAdapter`.
///
/// Operations come out in the order the engine issued them. `pop` and
/// `drain` consume them, so a test can assert on one step at a time.
pub struct ExecLog {
    ops: Arc<Mutex<VecDeque<AdapterOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<VecDeque<AdapterOp>>>) -> Self {
        Self { ops }
    }

    fn ops(&self) -> MutexGuard<'_, VecDeque<AdapterOp>> {
        self.ops.lock().unwrap()
    }

    pub fn len(&self) -> usize {
        self.ops().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops().is_empty()
    }

    pub fn any(&self, predicate: impl Fn(&Operation) -> bool) -> bool {
        self.ops().iter().any(|op| predicate(&op.operation))
    }

    pub fn count(&self, predicate: impl Fn(&Operation) -> bool) -> usize {
        self.ops().iter().filter(|op| predicate(&op.operation)).count()
    }

    /// Operations of `method` sent for `table`.
    pub fn count_method(&self, method: AdapterMethod, table: &str) -> usize {
        self.count(|op| op.method() == method && op.using() == table)
    }

    /// Adapter methods in issue order.
    pub fn methods(&self) -> Vec<AdapterMethod> {
        self.ops().iter().map(|op| op.operation.method()).collect()
    }

    pub fn clear(&mut self) {
        self.ops().clear();
    }

    /// Take the oldest operation along with the rows the adapter answered
    /// it with. `None` when the adapter failed.
    pub fn pop(&mut self) -> Option<(Operation, Option<Rows>)> {
        self.ops().pop_front().map(|op| (op.operation, op.rows))
    }

    /// Take every remaining operation.
    pub fn drain(&mut self) -> Vec<Operation> {
        self.ops().drain(..).map(|op| op.operation).collect()
    }

    /// Run `f` over the recorded operations without consuming them.
    pub fn with_ops<R>(&self, f: impl FnOnce(&[AdapterOp]) -> R) -> R {
        let mut ops = self.ops();
        f(ops.make_contiguous())
    }
}
