//! Per-entity-type hook registry.
//!
//! `HookRegistry<T>` holds one ordered sequence of hooks per [`Phase`] and runs
//! them around persistence operations on `T`:
//!
//! | Operation               | Sequences run, in order        |
//! |-------------------------|--------------------------------|
//! | `execute_before_create` | before_create, then before_save |
//! | `execute_after_create`  | after_create, then after_save   |
//! | `execute_before_update` | before_update, then before_save |
//! | `execute_after_update`  | after_update, then after_save   |
//! | `execute_before_delete` | before_delete                   |
//! | `execute_after_delete`  | after_delete                    |
//!
//! Registration needs `&mut self` and execution only `&self`, so a registry is
//! built during setup and then shared read-only, typically behind an `Arc`.

use super::scope::CallScope;
use super::traits::{EntityHook, HookError, Phase};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Entry in one phase sequence
struct HookEntry<T> {
    hook: Arc<dyn EntityHook<T>>,
}

impl<T> Clone for HookEntry<T> {
    fn clone(&self) -> Self {
        Self {
            hook: Arc::clone(&self.hook),
        }
    }
}

/// Registry of lifecycle hooks for a single entity type.
///
/// # Ordering
///
/// Hooks run in registration order. Nothing is reordered or deduplicated, so
/// registering the same hook twice runs it twice.
///
/// # Failure
///
/// The first hook to fail halts the invocation. Later hooks in the same
/// invocation do not run, and the error is returned to the caller exactly as
/// the hook produced it. Mutations already applied to the entity are kept;
/// the registry does not roll anything back.
pub struct HookRegistry<T> {
    phases: [Vec<HookEntry<T>>; 8],
}

impl<T> HookRegistry<T>
where
    T: Send,
{
    /// Create a registry with every phase empty
    pub fn new() -> Self {
        Self {
            phases: Default::default(),
        }
    }

    /// Append a hook to `phase`
    pub fn register<H>(&mut self, phase: Phase, hook: H) -> &mut Self
    where
        H: EntityHook<T> + 'static,
    {
        self.register_arc(phase, Arc::new(hook))
    }

    /// Append an already shared hook to `phase`
    pub fn register_arc(&mut self, phase: Phase, hook: Arc<dyn EntityHook<T>>) -> &mut Self {
        debug!(phase = %phase, hook = hook.name(), "Hook registered");
        self.phases[phase.index()].push(HookEntry { hook });
        self
    }

    pub fn register_before_create<H: EntityHook<T> + 'static>(&mut self, hook: H) -> &mut Self {
        self.register(Phase::BeforeCreate, hook)
    }

    pub fn register_after_create<H: EntityHook<T> + 'static>(&mut self, hook: H) -> &mut Self {
        self.register(Phase::AfterCreate, hook)
    }

    pub fn register_before_update<H: EntityHook<T> + 'static>(&mut self, hook: H) -> &mut Self {
        self.register(Phase::BeforeUpdate, hook)
    }

    pub fn register_after_update<H: EntityHook<T> + 'static>(&mut self, hook: H) -> &mut Self {
        self.register(Phase::AfterUpdate, hook)
    }

    pub fn register_before_delete<H: EntityHook<T> + 'static>(&mut self, hook: H) -> &mut Self {
        self.register(Phase::BeforeDelete, hook)
    }

    pub fn register_after_delete<H: EntityHook<T> + 'static>(&mut self, hook: H) -> &mut Self {
        self.register(Phase::AfterDelete, hook)
    }

    /// Register a hook that runs on both create and update, after the
    /// operation-specific before-hooks.
    pub fn register_before_save<H: EntityHook<T> + 'static>(&mut self, hook: H) -> &mut Self {
        self.register(Phase::BeforeSave, hook)
    }

    /// Register a hook that runs on both create and update, after the
    /// operation-specific after-hooks.
    pub fn register_after_save<H: EntityHook<T> + 'static>(&mut self, hook: H) -> &mut Self {
        self.register(Phase::AfterSave, hook)
    }

    /// Run before-create hooks, then before-save hooks
    pub async fn execute_before_create(
        &self,
        scope: &CallScope,
        entity: &mut T,
    ) -> Result<(), HookError> {
        self.run_sequences(&[Phase::BeforeCreate, Phase::BeforeSave], scope, entity)
            .await
    }

    /// Run after-create hooks, then after-save hooks
    pub async fn execute_after_create(
        &self,
        scope: &CallScope,
        entity: &mut T,
    ) -> Result<(), HookError> {
        self.run_sequences(&[Phase::AfterCreate, Phase::AfterSave], scope, entity)
            .await
    }

    /// Run before-update hooks, then before-save hooks
    pub async fn execute_before_update(
        &self,
        scope: &CallScope,
        entity: &mut T,
    ) -> Result<(), HookError> {
        self.run_sequences(&[Phase::BeforeUpdate, Phase::BeforeSave], scope, entity)
            .await
    }

    /// Run after-update hooks, then after-save hooks
    pub async fn execute_after_update(
        &self,
        scope: &CallScope,
        entity: &mut T,
    ) -> Result<(), HookError> {
        self.run_sequences(&[Phase::AfterUpdate, Phase::AfterSave], scope, entity)
            .await
    }

    /// Run before-delete hooks. Delete is not a variant of save, so no save
    /// hooks run.
    pub async fn execute_before_delete(
        &self,
        scope: &CallScope,
        entity: &mut T,
    ) -> Result<(), HookError> {
        self.run_sequences(&[Phase::BeforeDelete], scope, entity)
            .await
    }

    /// Run after-delete hooks
    pub async fn execute_after_delete(
        &self,
        scope: &CallScope,
        entity: &mut T,
    ) -> Result<(), HookError> {
        self.run_sequences(&[Phase::AfterDelete], scope, entity)
            .await
    }

    async fn run_sequences(
        &self,
        phases: &[Phase],
        scope: &CallScope,
        entity: &mut T,
    ) -> Result<(), HookError> {
        for phase in phases {
            let hooks = &self.phases[phase.index()];
            trace!(phase = %phase, count = hooks.len(), "Running hook sequence");

            for (position, entry) in hooks.iter().enumerate() {
                let name = entry.hook.name();
                match entry.hook.call(scope, entity).await {
                    Ok(()) => {
                        debug!(phase = %phase, hook = name, position, "Hook completed");
                    }
                    Err(err) => {
                        warn!(
                            phase = %phase,
                            hook = name,
                            position,
                            error = %err,
                            "Hook failed; halting phase"
                        );
                        return Err(err);
                    }
                }
            }
        }

        Ok(())
    }

    /// Number of hooks registered for `phase`
    pub fn hook_count(&self, phase: Phase) -> usize {
        self.phases[phase.index()].len()
    }

    /// Number of hooks registered across all phases
    pub fn total_hooks(&self) -> usize {
        self.phases.iter().map(Vec::len).sum()
    }

    /// Names of the hooks registered for `phase`, in execution order
    pub fn list_hooks(&self, phase: Phase) -> Vec<String> {
        self.phases[phase.index()]
            .iter()
            .map(|entry| entry.hook.name().to_string())
            .collect()
    }

    /// Remove every registered hook from every phase
    pub fn clear(&mut self) {
        for sequence in self.phases.iter_mut() {
            sequence.clear();
        }
        debug!("All hooks cleared from registry");
    }
}

impl<T: Send> Default for HookRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HookRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            phases: self.phases.clone(),
        }
    }
}

impl<T> fmt::Debug for HookRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for phase in Phase::ALL {
            let names: Vec<&str> = self.phases[phase.index()]
                .iter()
                .map(|entry| entry.hook.name())
                .collect();
            map.entry(&phase.as_str(), &names);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::hook_fn;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    #[derive(Debug, Default)]
    struct Doc {
        steps: Vec<&'static str>,
    }

    fn logging_hook(log: &Log, label: &'static str) -> impl EntityHook<Doc> + 'static {
        let log = Arc::clone(log);
        hook_fn(label, move |_scope: &CallScope, doc: &mut Doc| {
            log.lock().unwrap().push(label.to_string());
            doc.steps.push(label);
            Ok(())
        })
    }

    fn failing_hook(message: &'static str) -> impl EntityHook<Doc> + 'static {
        hook_fn("fails", move |_scope: &CallScope, _doc: &mut Doc| {
            Err(HookError::failed(message))
        })
    }

    fn new_log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_hook_registration() {
        let mut registry = HookRegistry::<Doc>::new();
        assert_eq!(registry.total_hooks(), 0);

        let log = new_log();
        registry
            .register_before_create(logging_hook(&log, "a"))
            .register_before_save(logging_hook(&log, "b"));

        assert_eq!(registry.hook_count(Phase::BeforeCreate), 1);
        assert_eq!(registry.hook_count(Phase::BeforeSave), 1);
        assert_eq!(registry.hook_count(Phase::AfterSave), 0);
        assert_eq!(registry.total_hooks(), 2);
    }

    #[tokio::test]
    async fn test_hooks_run_in_registration_order() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        for label in ["one", "two", "three", "four"] {
            registry.register_after_delete(logging_hook(&log, label));
        }

        let mut doc = Doc::default();
        registry
            .execute_after_delete(&CallScope::new(), &mut doc)
            .await
            .unwrap();

        assert_eq!(entries(&log), vec!["one", "two", "three", "four"]);
        assert_eq!(doc.steps, vec!["one", "two", "three", "four"]);
        assert_eq!(
            registry.list_hooks(Phase::AfterDelete),
            vec!["one", "two", "three", "four"]
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_runs_twice() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        let shared: Arc<dyn EntityHook<Doc>> = Arc::new(logging_hook(&log, "dup"));
        registry.register_arc(Phase::BeforeDelete, Arc::clone(&shared));
        registry.register_arc(Phase::BeforeDelete, shared);

        registry
            .execute_before_delete(&CallScope::new(), &mut Doc::default())
            .await
            .unwrap();

        assert_eq!(entries(&log), vec!["dup", "dup"]);
    }

    #[tokio::test]
    async fn test_failure_halts_remaining_hooks() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        registry
            .register_before_update(logging_hook(&log, "a"))
            .register_before_update(failing_hook("boom"))
            .register_before_update(logging_hook(&log, "never"))
            .register_before_save(logging_hook(&log, "save"));

        let mut doc = Doc::default();
        let err = registry
            .execute_before_update(&CallScope::new(), &mut doc)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "boom");
        assert_eq!(entries(&log), vec!["a"]);
        // mutation from the hook that ran before the failure is kept
        assert_eq!(doc.steps, vec!["a"]);
    }

    #[tokio::test]
    async fn test_create_runs_specific_then_save() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        // save registered first to show ordering is by phase, not registration
        registry
            .register_before_save(logging_hook(&log, "save-1"))
            .register_before_create(logging_hook(&log, "create-1"))
            .register_before_create(logging_hook(&log, "create-2"))
            .register_before_save(logging_hook(&log, "save-2"));

        registry
            .execute_before_create(&CallScope::new(), &mut Doc::default())
            .await
            .unwrap();

        assert_eq!(
            entries(&log),
            vec!["create-1", "create-2", "save-1", "save-2"]
        );
    }

    #[tokio::test]
    async fn test_save_runs_with_empty_specific_sequence() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        registry.register_before_save(logging_hook(&log, "save"));

        registry
            .execute_before_create(&CallScope::new(), &mut Doc::default())
            .await
            .unwrap();

        assert_eq!(entries(&log), vec!["save"]);
    }

    #[tokio::test]
    async fn test_update_and_create_sequences_are_isolated() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        registry
            .register_before_create(logging_hook(&log, "bc"))
            .register_after_create(logging_hook(&log, "ac"))
            .register_before_update(logging_hook(&log, "bu"))
            .register_after_update(logging_hook(&log, "au"))
            .register_after_save(logging_hook(&log, "as"));

        let scope = CallScope::new();
        let mut doc = Doc::default();
        registry.execute_before_update(&scope, &mut doc).await.unwrap();
        registry.execute_after_update(&scope, &mut doc).await.unwrap();
        assert_eq!(entries(&log), vec!["bu", "au", "as"]);

        log.lock().unwrap().clear();
        registry.execute_before_create(&scope, &mut doc).await.unwrap();
        registry.execute_after_create(&scope, &mut doc).await.unwrap();
        assert_eq!(entries(&log), vec!["bc", "ac", "as"]);
    }

    #[tokio::test]
    async fn test_delete_never_runs_save_hooks() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        registry
            .register_before_save(logging_hook(&log, "bs"))
            .register_after_save(logging_hook(&log, "as"))
            .register_before_delete(logging_hook(&log, "bd"))
            .register_after_delete(logging_hook(&log, "ad"));

        let scope = CallScope::new();
        let mut doc = Doc::default();
        registry.execute_before_delete(&scope, &mut doc).await.unwrap();
        registry.execute_after_delete(&scope, &mut doc).await.unwrap();

        assert_eq!(entries(&log), vec!["bd", "ad"]);
    }

    #[tokio::test]
    async fn test_failure_in_specific_sequence_skips_save() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        registry
            .register_after_create(failing_hook("after-create failed"))
            .register_after_save(logging_hook(&log, "as"));

        let err = registry
            .execute_after_create(&CallScope::new(), &mut Doc::default())
            .await
            .unwrap_err();

        assert!(matches!(err, HookError::Failed(ref m) if m == "after-create failed"));
        assert!(entries(&log).is_empty());
    }

    #[tokio::test]
    async fn test_empty_registry_succeeds() {
        let registry = HookRegistry::<Doc>::new();
        let mut doc = Doc::default();
        registry
            .execute_before_create(&CallScope::new(), &mut doc)
            .await
            .unwrap();
        assert!(doc.steps.is_empty());
    }

    #[test]
    fn test_clear_hooks() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        for phase in Phase::ALL {
            registry.register(phase, logging_hook(&log, "x"));
        }
        assert_eq!(registry.total_hooks(), 8);

        registry.clear();
        assert_eq!(registry.total_hooks(), 0);
    }

    #[derive(Debug)]
    struct QuotaHook;

    fn check_quota(doc: &Doc) -> anyhow::Result<()> {
        if !doc.steps.is_empty() {
            anyhow::bail!("quota exceeded after {} steps", doc.steps.len());
        }
        Ok(())
    }

    #[async_trait::async_trait]
    impl EntityHook<Doc> for QuotaHook {
        async fn call(&self, _scope: &CallScope, doc: &mut Doc) -> Result<(), HookError> {
            check_quota(doc)?;
            Ok(())
        }

        fn name(&self) -> &str {
            "quota"
        }
    }

    #[tokio::test]
    async fn test_anyhow_error_passes_through_unchanged() {
        let log = new_log();
        let mut registry = HookRegistry::new();
        registry
            .register_before_update(logging_hook(&log, "first"))
            .register_before_update(QuotaHook)
            .register_before_save(logging_hook(&log, "save"));

        let mut doc = Doc::default();
        let err = registry
            .execute_before_update(&CallScope::new(), &mut doc)
            .await
            .unwrap_err();

        match &err {
            HookError::Other(inner) => {
                assert_eq!(inner.to_string(), "quota exceeded after 1 steps")
            }
            other => panic!("expected HookError::Other, got {other:?}"),
        }
        assert_eq!(err.to_string(), "quota exceeded after 1 steps");
        assert!(!err.is_cancellation());
        assert_eq!(entries(&log), vec!["first"]);
    }
}
