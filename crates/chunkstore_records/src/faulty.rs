//! Fault-injecting record store wrapper.
//!
//! Wraps any [`RecordStore`] and fails selected calls on demand. Used to
//! exercise rollback and cancellation paths that a healthy store never hits.

use crate::backend::RecordStore;
use crate::context::{CancelHandle, Context};
use crate::error::{RecordError, RecordResult};
use crate::record::{Record, Selector};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct FaultPlan {
    fail_create_at: Option<usize>,
    cancel_at_create: Option<(usize, CancelHandle)>,
    fail_deletes: bool,
    fail_lists: bool,
}

/// A record store wrapper that injects failures.
///
/// Create calls are counted from zero across the wrapper's lifetime; a fault
/// scheduled "at create `n`" fires on the `n`-th create call only.
///
/// # Example
///
/// ```rust
/// use chunkstore_records::{Context, FaultInjectingStore, InMemoryRecordStore, Record, RecordStore};
///
/// let store = FaultInjectingStore::new(InMemoryRecordStore::new());
/// store.fail_create_at(1);
/// let ctx = Context::background();
/// assert!(store.create(&ctx, Record::named("default", "a", vec![])).is_ok());
/// assert!(store.create(&ctx, Record::named("default", "b", vec![])).is_err());
/// assert!(store.create(&ctx, Record::named("default", "c", vec![])).is_ok());
/// ```
#[derive(Debug)]
pub struct FaultInjectingStore<S> {
    inner: S,
    plan: Mutex<FaultPlan>,
    creates: AtomicUsize,
    deletes: AtomicUsize,
    lists: AtomicUsize,
    gets: AtomicUsize,
}

impl<S: RecordStore> FaultInjectingStore<S> {
    /// Wraps `inner` with no faults scheduled.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            plan: Mutex::new(FaultPlan::default()),
            creates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
        }
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fails the `n`-th create call (zero-based).
    pub fn fail_create_at(&self, n: usize) {
        self.plan.lock().fail_create_at = Some(n);
    }

    /// Cancels `handle` just before the `n`-th create call (zero-based).
    pub fn cancel_at_create(&self, n: usize, handle: CancelHandle) {
        self.plan.lock().cancel_at_create = Some((n, handle));
    }

    /// Makes every delete call fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.plan.lock().fail_deletes = fail;
    }

    /// Makes every list call fail.
    pub fn fail_lists(&self, fail: bool) {
        self.plan.lock().fail_lists = fail;
    }

    /// Removes every scheduled fault.
    pub fn heal(&self) {
        *self.plan.lock() = FaultPlan::default();
    }

    /// Number of create calls seen.
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Number of delete calls seen.
    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Number of list calls seen.
    pub fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Number of get calls seen.
    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

impl<S: RecordStore> RecordStore for FaultInjectingStore<S> {
    fn create(&self, ctx: &Context, record: Record) -> RecordResult<Record> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst);
        {
            let plan = self.plan.lock();
            if let Some((at, handle)) = &plan.cancel_at_create {
                if *at == n {
                    handle.cancel();
                }
            }
            if plan.fail_create_at == Some(n) {
                return Err(RecordError::Injected {
                    operation: "create",
                });
            }
        }
        self.inner.create(ctx, record)
    }

    fn get(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<Record> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(ctx, namespace, name)
    }

    fn list(&self, ctx: &Context, selector: &Selector) -> RecordResult<Vec<Record>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.plan.lock().fail_lists {
            return Err(RecordError::Injected { operation: "list" });
        }
        self.inner.list(ctx, selector)
    }

    fn delete(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.plan.lock().fail_deletes {
            return Err(RecordError::Injected {
                operation: "delete",
            });
        }
        self.inner.delete(ctx, namespace, name)
    }

    fn max_record_size(&self) -> usize {
        self.inner.max_record_size()
    }
}
