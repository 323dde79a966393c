//! Supervision: an ordered list of children with one-for-one bounded
//! restarts, synchronous fan-out (`ask_children`), and reverse-order
//! termination (spec §4.4).
//!
//! # Design Philosophy
//!
//! Unlike the actor-to-actor message path, which stays generic to avoid
//! `dyn` dispatch, a supervisor manages a heterogeneous set of children
//! (different actor types, different message types) and so crosses that
//! boundary deliberately: children are held behind [`SupervisedChild`],
//! an object-safe trait analogous to the teacher's `Child` trait.

pub mod error;
pub mod types;

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};
use tokio::time::{timeout as tokio_timeout, Instant as TokioInstant};
use tracing::{error, info, warn};

// Layer 3: Internal module imports
pub use error::SupervisorError;
pub use types::{ChildId, RestartBudget, RestartPolicy, ShutdownPolicy};
use crate::actor::KernelCommand;
use crate::monitor::{Monitor, MonitorRegistered};
use crate::util::ActorPath;

/// Object-safe handle to a supervised child, letting a [`ParentActor`]
/// manage children of different concrete actor/message types uniformly.
#[async_trait]
pub trait SupervisedChild: Send + Sync {
    /// Stable identity assigned at creation.
    fn id(&self) -> &ChildId;

    /// The child's hierarchical path.
    fn path(&self) -> &ActorPath;

    /// Send a `Terminate` command and wait according to `policy`.
    async fn terminate(&self, policy: ShutdownPolicy) -> Result<(), SupervisorError>;

    /// Send a heartbeat ping and wait for the kernel's immediate reply,
    /// used by [`ParentActor::ask_children`] for synchronous fan-out.
    async fn ping(&self, nonce: u64, timeout: Duration) -> Result<u64, SupervisorError>;

    /// True if the child's kernel task has exited (normally or via
    /// panic) without the supervisor having asked it to terminate.
    fn has_exited(&self) -> bool;

    /// Register this child (and, if it is itself a supervisor, every
    /// descendant below it) with `monitor`, forwarding `parent_query_path`
    /// one level deeper at each hop (spec §4.8: `Register(registrar,
    /// parentQueryPath)` / `Registered(ownQueryPath)`, forwarded
    /// recursively down the supervision tree). Returns this child's own
    /// query path; a supervisor child instead returns the query path of
    /// the last descendant it registered, since [`MonitorRegistered`]
    /// only carries one path — callers that need every path collect the
    /// monitor's [`Monitor::snapshot`] afterward rather than threading
    /// them all back up.
    async fn register_with_monitor(
        &self,
        monitor: &Monitor,
        parent_query_path: &[ActorPath],
    ) -> MonitorRegistered;
}

/// A [`SupervisedChild`] backed by a kernel control-channel sender and
/// the kernel task's join handle.
pub struct KernelChild {
    id: ChildId,
    path: ActorPath,
    control: tokio::sync::mpsc::Sender<KernelCommand>,
    join: tokio::task::JoinHandle<()>,
}

impl KernelChild {
    /// Wrap a spawned kernel task as a supervised child.
    pub fn new(
        path: ActorPath,
        control: tokio::sync::mpsc::Sender<KernelCommand>,
        join: tokio::task::JoinHandle<()>,
    ) -> Self {
        Self {
            id: ChildId::new(),
            path,
            control,
            join,
        }
    }
}

#[async_trait]
impl SupervisedChild for KernelChild {
    fn id(&self) -> &ChildId {
        &self.id
    }

    fn path(&self) -> &ActorPath {
        &self.path
    }

    async fn terminate(&self, policy: ShutdownPolicy) -> Result<(), SupervisorError> {
        if self.control.send(KernelCommand::Terminate).await.is_err() {
            // Mailbox already closed: the child exited on its own.
            return Ok(());
        }
        match policy {
            ShutdownPolicy::Immediate => Ok(()),
            ShutdownPolicy::Graceful(duration) => {
                let deadline = TokioInstant::now() + duration;
                while TokioInstant::now() < deadline {
                    if self.has_exited() {
                        return Ok(());
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
                if self.has_exited() {
                    Ok(())
                } else {
                    Err(SupervisorError::ShutdownTimeout {
                        id: self.path.to_string(),
                        timeout: duration,
                    })
                }
            }
        }
    }

    async fn ping(&self, nonce: u64, timeout: Duration) -> Result<u64, SupervisorError> {
        let (reply, rx) = oneshot::channel();
        if self
            .control
            .send(KernelCommand::Ping { nonce, reply })
            .await
            .is_err()
        {
            return Err(SupervisorError::AskTimeout {
                id: self.path.to_string(),
                timeout,
            });
        }
        match tokio_timeout(timeout, rx).await {
            Ok(Ok(value)) => Ok(value),
            _ => Err(SupervisorError::AskTimeout {
                id: self.path.to_string(),
                timeout,
            }),
        }
    }

    fn has_exited(&self) -> bool {
        self.join.is_finished()
    }

    async fn register_with_monitor(
        &self,
        monitor: &Monitor,
        parent_query_path: &[ActorPath],
    ) -> MonitorRegistered {
        monitor.handle_register(self.path.clone(), self.control.clone(), parent_query_path)
    }
}

/// Wraps a nested [`ParentActor`] so a whole subtree can be added as one
/// child of another [`ParentActor`], which is what makes registration
/// forwarding (and termination, restart, and ping fan-out) actually
/// recurse down an arbitrarily deep supervision tree rather than one
/// flat level.
pub struct NestedSupervisor {
    id: ChildId,
    path: ActorPath,
    inner: Mutex<ParentActor>,
}

impl NestedSupervisor {
    /// Wrap `inner` so it can be supervised as a single child. `path`
    /// never changes after this, so it is cached outside the mutex for
    /// the synchronous [`SupervisedChild::path`] accessor.
    pub fn new(inner: ParentActor) -> Self {
        Self {
            id: ChildId::new(),
            path: inner.path().clone(),
            inner: Mutex::new(inner),
        }
    }
}

#[async_trait]
impl SupervisedChild for NestedSupervisor {
    fn id(&self) -> &ChildId {
        &self.id
    }

    fn path(&self) -> &ActorPath {
        &self.path
    }

    async fn terminate(&self, policy: ShutdownPolicy) -> Result<(), SupervisorError> {
        let mut inner = self.inner.lock().await;
        let leftover = inner.terminate_all().await;
        if leftover.is_empty() {
            Ok(())
        } else {
            Err(SupervisorError::ShutdownTimeout {
                id: inner.path().to_string(),
                timeout: match policy {
                    ShutdownPolicy::Graceful(d) => d,
                    ShutdownPolicy::Immediate => Duration::ZERO,
                },
            })
        }
    }

    async fn ping(&self, nonce: u64, _timeout: Duration) -> Result<u64, SupervisorError> {
        // A subtree has no single kernel to ping; treat it as always
        // responsive rather than pinging every descendant one more time
        // (the monitor's own tick already pings each leaf individually).
        Ok(nonce)
    }

    fn has_exited(&self) -> bool {
        false
    }

    async fn register_with_monitor(
        &self,
        monitor: &Monitor,
        parent_query_path: &[ActorPath],
    ) -> MonitorRegistered {
        let inner = self.inner.lock().await;
        inner.register_tree(monitor, parent_query_path).await
    }
}

struct ChildEntry {
    child: Box<dyn SupervisedChild>,
    policy: RestartPolicy,
    restarts: VecDeque<TokioInstant>,
}

/// Supervises an ordered set of children: restarts them one-for-one
/// within a bounded budget, fans requests out synchronously with
/// [`ask_children`](Self::ask_children), and tears them down in reverse
/// creation order on shutdown.
pub struct ParentActor {
    path: ActorPath,
    children: Vec<ChildEntry>,
    budget: RestartBudget,
    shutdown: ShutdownPolicy,
}

impl ParentActor {
    /// Create a supervisor at `path` with the given restart budget and
    /// shutdown policy.
    pub fn new(path: ActorPath, budget: RestartBudget, shutdown: ShutdownPolicy) -> Self {
        Self {
            path,
            children: Vec::new(),
            budget,
            shutdown,
        }
    }

    /// This supervisor's path.
    pub fn path(&self) -> &ActorPath {
        &self.path
    }

    /// Add a child at the end of the creation order.
    pub fn add_child(&mut self, child: Box<dyn SupervisedChild>, policy: RestartPolicy) {
        info!(parent = %self.path, child = %child.path(), "child added");
        self.children.push(ChildEntry {
            child,
            policy,
            restarts: VecDeque::new(),
        });
    }

    /// Remove and return the child with `id`, without terminating it.
    pub fn remove_child(&mut self, id: &ChildId) -> Option<Box<dyn SupervisedChild>> {
        let pos = self.children.iter().position(|e| e.child.id() == id)?;
        Some(self.children.remove(pos).child)
    }

    /// Number of currently supervised children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Record that `id` terminated unexpectedly, consulting its restart
    /// policy and budget. Returns `true` if a restart is authorized
    /// (the caller is responsible for actually respawning the actor
    /// and replacing the `ChildEntry`'s handle).
    pub fn stopped_child(&mut self, id: &ChildId) -> bool {
        let now = TokioInstant::now();
        let Some(entry) = self.children.iter_mut().find(|e| e.child.id() == id) else {
            warn!(parent = %self.path, "stopped_child called for unknown child");
            return false;
        };

        if entry.policy == RestartPolicy::Temporary {
            return false;
        }

        let window = self.budget.window;
        entry.restarts.retain(|t| now.duration_since(*t) <= window);
        if entry.restarts.len() as u32 >= self.budget.max_restarts {
            error!(parent = %self.path, child = %entry.child.path(), "restart budget exceeded");
            return false;
        }
        entry.restarts.push_back(now);
        true
    }

    /// Forward a monitor registration to every child in creation order,
    /// each at `parent_query_path` extended with this supervisor's own
    /// path (spec §4.8: "parents forward the registration to their
    /// children recursively"). Returns the last child's own query path,
    /// or `parent_query_path` unchanged with no path appended if this
    /// supervisor has no children.
    pub async fn register_tree(
        &self,
        monitor: &Monitor,
        parent_query_path: &[ActorPath],
    ) -> MonitorRegistered {
        let mut own_query_path: Vec<ActorPath> = parent_query_path.to_vec();
        own_query_path.push(self.path.clone());
        let mut last = MonitorRegistered {
            own_query_path: own_query_path.clone(),
        };
        for entry in &self.children {
            last = entry.child.register_with_monitor(monitor, &own_query_path).await;
        }
        last
    }

    /// Send a ping to every child concurrently and collect the
    /// responses that satisfy `predicate` before `timeout` elapses
    /// (spec §4.4: `askChildren(makeMsg)(predicate)`).
    pub async fn ask_children(
        &self,
        timeout: Duration,
        predicate: impl Fn(u64) -> bool + Send + Sync,
    ) -> Vec<ActorPath> {
        let mut satisfied = Vec::new();
        for entry in &self.children {
            let nonce = entry.child.id().as_uuid().as_u128() as u64;
            if let Ok(echoed) = entry.child.ping(nonce, timeout).await {
                if predicate(echoed) {
                    satisfied.push(entry.child.path().clone());
                }
            }
        }
        satisfied
    }

    /// Terminate children one at a time in reverse creation order,
    /// waiting for each according to this supervisor's [`ShutdownPolicy`]
    /// before moving to the next (spec §4.4, §4.9). The first child that
    /// fails to terminate halts the sweep: it and every child created
    /// before it are left supervised and returned as a leftover list, in
    /// creation order, so no child is asked to terminate out of reverse
    /// order.
    pub async fn terminate_all(&mut self) -> Vec<ActorPath> {
        while let Some(entry) = self.children.pop() {
            let path = entry.child.path().clone();
            match entry.child.terminate(self.shutdown).await {
                Ok(()) => info!(parent = %self.path, child = %path, "child terminated"),
                Err(err) => {
                    error!(parent = %self.path, child = %path, error = %err, "child termination failed");
                    self.children.push(entry);
                    break;
                }
            }
        }
        self.children.iter().map(|e| e.child.path().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct FakeChild {
        id: ChildId,
        path: ActorPath,
        terminated: Arc<AtomicBool>,
        ping_reply: Option<u64>,
    }

    #[async_trait]
    impl SupervisedChild for FakeChild {
        fn id(&self) -> &ChildId {
            &self.id
        }
        fn path(&self) -> &ActorPath {
            &self.path
        }
        async fn terminate(&self, _policy: ShutdownPolicy) -> Result<(), SupervisorError> {
            self.terminated.store(true, Ordering::SeqCst);
            Ok(())
        }
        async fn ping(&self, nonce: u64, timeout: Duration) -> Result<u64, SupervisorError> {
            match self.ping_reply {
                Some(v) => {
                    let _ = nonce;
                    Ok(v)
                }
                None => Err(SupervisorError::AskTimeout {
                    id: self.path.to_string(),
                    timeout,
                }),
            }
        }
        fn has_exited(&self) -> bool {
            false
        }
        async fn register_with_monitor(
            &self,
            _monitor: &Monitor,
            parent_query_path: &[ActorPath],
        ) -> MonitorRegistered {
            let mut own_query_path = parent_query_path.to_vec();
            own_query_path.push(self.path.clone());
            MonitorRegistered { own_query_path }
        }
    }

    fn fake(name: &str, ping_reply: Option<u64>) -> (Box<dyn SupervisedChild>, Arc<AtomicBool>) {
        let terminated = Arc::new(AtomicBool::new(false));
        let child = FakeChild {
            id: ChildId::new(),
            path: ActorPath::root("race").child(name),
            terminated: terminated.clone(),
            ping_reply,
        };
        (Box::new(child), terminated)
    }

    #[test]
    fn test_add_child_increments_count() {
        let mut parent = ParentActor::new(
            ActorPath::root("race"),
            RestartBudget::default(),
            ShutdownPolicy::Immediate,
        );
        let (child, _) = fake("a", Some(1));
        parent.add_child(child, RestartPolicy::Permanent);
        assert_eq!(parent.child_count(), 1);
    }

    #[test]
    fn test_temporary_child_never_restarts() {
        let mut parent = ParentActor::new(
            ActorPath::root("race"),
            RestartBudget::default(),
            ShutdownPolicy::Immediate,
        );
        let (child, _) = fake("a", Some(1));
        let id = child.id().clone();
        parent.add_child(child, RestartPolicy::Temporary);
        assert!(!parent.stopped_child(&id));
    }

    #[test]
    fn test_permanent_child_restarts_within_budget() {
        let mut parent = ParentActor::new(
            ActorPath::root("race"),
            RestartBudget {
                max_restarts: 2,
                window: Duration::from_secs(60),
            },
            ShutdownPolicy::Immediate,
        );
        let (child, _) = fake("a", Some(1));
        let id = child.id().clone();
        parent.add_child(child, RestartPolicy::Permanent);

        assert!(parent.stopped_child(&id));
        assert!(parent.stopped_child(&id));
        assert!(!parent.stopped_child(&id)); // budget exhausted
    }

    #[tokio::test]
    async fn test_ask_children_filters_by_predicate() {
        let mut parent = ParentActor::new(
            ActorPath::root("race"),
            RestartBudget::default(),
            ShutdownPolicy::Immediate,
        );
        let (a, _) = fake("a", Some(7));
        let (b, _) = fake("b", Some(9));
        parent.add_child(a, RestartPolicy::Permanent);
        parent.add_child(b, RestartPolicy::Permanent);

        let satisfied = parent
            .ask_children(Duration::from_millis(50), |v| v == 7)
            .await;
        assert_eq!(satisfied.len(), 1);
        assert_eq!(satisfied[0].name(), "a");
    }

    #[tokio::test]
    async fn test_terminate_all_visits_all_children() {
        let mut parent = ParentActor::new(
            ActorPath::root("race"),
            RestartBudget::default(),
            ShutdownPolicy::Immediate,
        );
        let (a, a_flag) = fake("a", Some(1));
        let (b, b_flag) = fake("b", Some(1));
        parent.add_child(a, RestartPolicy::Permanent);
        parent.add_child(b, RestartPolicy::Permanent);

        parent.terminate_all().await;

        assert!(a_flag.load(Ordering::SeqCst));
        assert!(b_flag.load(Ordering::SeqCst));
        assert_eq!(parent.child_count(), 0);
    }

    struct StubbornChild {
        id: ChildId,
        path: ActorPath,
        terminated: Arc<AtomicBool>,
        fails: bool,
    }

    #[async_trait]
    impl SupervisedChild for StubbornChild {
        fn id(&self) -> &ChildId {
            &self.id
        }
        fn path(&self) -> &ActorPath {
            &self.path
        }
        async fn terminate(&self, _policy: ShutdownPolicy) -> Result<(), SupervisorError> {
            if self.fails {
                return Err(SupervisorError::ShutdownTimeout {
                    id: self.path.to_string(),
                    timeout: Duration::from_millis(500),
                });
            }
            self.terminated.store(true, Ordering::SeqCst);
            Ok(())
        }
        async fn ping(&self, nonce: u64, _timeout: Duration) -> Result<u64, SupervisorError> {
            Ok(nonce)
        }
        fn has_exited(&self) -> bool {
            false
        }
        async fn register_with_monitor(
            &self,
            _monitor: &Monitor,
            parent_query_path: &[ActorPath],
        ) -> MonitorRegistered {
            let mut own_query_path = parent_query_path.to_vec();
            own_query_path.push(self.path.clone());
            MonitorRegistered { own_query_path }
        }
    }

    #[tokio::test]
    async fn test_terminate_all_halts_on_first_failure_and_reports_leftover() {
        let mut parent = ParentActor::new(
            ActorPath::root("race"),
            RestartBudget::default(),
            ShutdownPolicy::Graceful(Duration::from_millis(10)),
        );
        let outer_terminated = Arc::new(AtomicBool::new(false));
        let middle_terminated = Arc::new(AtomicBool::new(false));
        let inner_terminated = Arc::new(AtomicBool::new(false));

        // Creation order: inner, middle (stubborn), outer.
        parent.add_child(
            Box::new(StubbornChild {
                id: ChildId::new(),
                path: ActorPath::root("race").child("inner"),
                terminated: inner_terminated.clone(),
                fails: false,
            }),
            RestartPolicy::Temporary,
        );
        parent.add_child(
            Box::new(StubbornChild {
                id: ChildId::new(),
                path: ActorPath::root("race").child("middle"),
                terminated: middle_terminated.clone(),
                fails: true,
            }),
            RestartPolicy::Temporary,
        );
        parent.add_child(
            Box::new(StubbornChild {
                id: ChildId::new(),
                path: ActorPath::root("race").child("outer"),
                terminated: outer_terminated.clone(),
                fails: false,
            }),
            RestartPolicy::Temporary,
        );

        let leftover = parent.terminate_all().await;

        assert!(outer_terminated.load(Ordering::SeqCst), "outermost child terminates first");
        assert!(!middle_terminated.load(Ordering::SeqCst), "stubborn child never reports terminated");
        assert!(!inner_terminated.load(Ordering::SeqCst), "sweep halts before reaching the inner child");
        assert_eq!(leftover.len(), 2);
        assert_eq!(leftover[0].name(), "inner");
        assert_eq!(leftover[1].name(), "middle");
        assert_eq!(parent.child_count(), 2);
    }

    fn spawn_kernel_child(name: &str) -> KernelChild {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<KernelCommand>(8);
        let join = tokio::spawn(async move {
            while let Some(cmd) = rx.recv().await {
                if let KernelCommand::Ping { nonce, reply } = cmd {
                    let _ = reply.send(nonce);
                }
            }
        });
        KernelChild::new(ActorPath::root("race").child(name), tx, join)
    }

    #[tokio::test]
    async fn test_register_tree_forwards_recursively_through_nested_supervisor() {
        use crate::monitor::Monitor;

        let mut leaf = ParentActor::new(
            ActorPath::root("race").child("group"),
            RestartBudget::default(),
            ShutdownPolicy::Immediate,
        );
        leaf.add_child(Box::new(spawn_kernel_child("grandchild-a")), RestartPolicy::Temporary);
        leaf.add_child(Box::new(spawn_kernel_child("grandchild-b")), RestartPolicy::Temporary);

        let mut root = ParentActor::new(
            ActorPath::root("race"),
            RestartBudget::default(),
            ShutdownPolicy::Immediate,
        );
        root.add_child(Box::new(spawn_kernel_child("sibling")), RestartPolicy::Temporary);
        root.add_child(Box::new(NestedSupervisor::new(leaf)), RestartPolicy::Temporary);

        let monitor = Monitor::new();
        root.register_tree(&monitor, &[]).await;

        let mut paths: Vec<String> = monitor.snapshot().into_iter().map(|s| s.path.to_string()).collect();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                ActorPath::root("race").child("group").child("grandchild-a").to_string(),
                ActorPath::root("race").child("group").child("grandchild-b").to_string(),
                ActorPath::root("race").child("sibling").to_string(),
            ]
        );

        let grandchild_path = ActorPath::root("race").child("group").child("grandchild-a").to_string();
        let sibling_path = ActorPath::root("race").child("sibling").to_string();
        let grandchild_level = monitor
            .snapshot()
            .into_iter()
            .find(|s| s.path.to_string() == grandchild_path)
            .unwrap()
            .level;
        let sibling_level = monitor
            .snapshot()
            .into_iter()
            .find(|s| s.path.to_string() == sibling_path)
            .unwrap()
            .level;
        assert!(
            grandchild_level > sibling_level,
            "a grandchild behind the nested supervisor is deeper than a direct sibling"
        );
    }
}
