//! The applier: owns the live widget and serializes diff application onto it
use crate::diff_engine::diff;
use crate::registration::RegistrationCache;
use crate::snapshot::Snapshot;
use crate::types::{DiffResult, Id};
use crate::view_model::CollectionViewModel;
use crate::widget::CollectionWidget;
use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

/// Behavior switches for a [`CollectionViewDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Hard-reload instead of diffing when a new model's container id differs
    /// from the previous one (a *replacement*).
    pub reload_on_replacement: bool,
    /// Forwarded to the widget with every batch of operations.
    pub animate_updates: bool,
    /// Compute diffs on a dedicated worker thread. Results are handed back
    /// to the widget-owning context through [`CollectionViewDriver::pump`].
    pub background_diffing: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        DriverOptions {
            reload_on_replacement: false,
            animate_updates: true,
            background_diffing: false,
        }
    }
}

/// Where the driver currently is in its update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No update in progress.
    Idle,
    /// A diff is being computed on the worker thread.
    Diffing,
    /// A diff or reload is being applied to the widget.
    Applying,
}

/// Called after each completed apply or reload, on the widget-owning context.
pub type DidUpdate = Box<dyn FnMut()>;

/// Called by the diff worker after posting a result, from the worker thread.
/// Hosts use this to schedule a [`CollectionViewDriver::pump`] on their event
/// loop.
pub type WakeHandler = Box<dyn Fn() + Send>;

/// Drives a [`CollectionWidget`] from a declarative model.
///
/// The driver owns the widget, the current model, and its identity snapshot.
/// Every model update is reduced to a minimal diff against the previous
/// snapshot and applied incrementally; replacing the container id can
/// optionally trigger a full reload instead.
///
/// All driver methods must be called from the widget-owning context. The only
/// work that ever leaves that context is diff computation itself, which is a
/// pure function over two immutable snapshots. Updates are serialized with an
/// at-most-one-in-flight discipline: a model set while another update is in
/// progress is held as the sole pending model, each newcomer replacing the
/// last, so only the latest pending model is ever applied.
///
/// The driver holds no reference back to the host controller; completion and
/// wake callbacks are plain closures the caller keeps alive.
pub struct CollectionViewDriver<W: CollectionWidget> {
    widget: W,
    options: DriverOptions,
    model: CollectionViewModel,
    snapshot: Snapshot,
    registrations: RegistrationCache,
    state: DriverState,
    generation: u64,
    in_flight: Option<InFlight>,
    pending: Option<CollectionViewModel>,
    worker: Option<DiffWorker>,
    did_update: Option<DidUpdate>,
}

struct InFlight {
    generation: u64,
    model: CollectionViewModel,
    snapshot: Snapshot,
    visible: Option<Vec<Id>>,
}

impl<W: CollectionWidget> CollectionViewDriver<W> {
    /// Takes ownership of the widget, registers the model's view kinds, and
    /// populates the widget with an initial full reload.
    pub fn new(mut widget: W, model: CollectionViewModel, options: DriverOptions) -> Self {
        let mut registrations = RegistrationCache::new();
        registrations.register_new(&mut widget, model.all_registrations());
        widget.reload(&model);

        let snapshot = Snapshot::of(&model);
        let worker = options.background_diffing.then(DiffWorker::spawn);

        CollectionViewDriver {
            widget,
            options,
            model,
            snapshot,
            registrations,
            state: DriverState::Idle,
            generation: 0,
            in_flight: None,
            pending: None,
            worker,
            did_update: None,
        }
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The model currently applied to (or being applied to) the widget.
    pub fn model(&self) -> &CollectionViewModel {
        &self.model
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn num_sections(&self) -> usize {
        self.model.num_sections()
    }

    /// Number of cells in the section at `index`. Panics when out of range.
    pub fn num_cells(&self, index: usize) -> usize {
        self.model.num_cells(index)
    }

    /// Sets the closure invoked after every completed apply or reload.
    pub fn set_did_update(&mut self, callback: Option<DidUpdate>) {
        self.did_update = callback;
    }

    /// Sets the closure the diff worker calls after posting a result.
    ///
    /// Has no effect unless the driver was created with
    /// [`DriverOptions::background_diffing`].
    pub fn set_wake_handler(&mut self, handler: Option<WakeHandler>) {
        match &self.worker {
            Some(worker) => worker.set_wake(handler),
            None => log::debug!("wake handler ignored; no diff worker"),
        }
    }

    /// Replaces the model, diffing against the previous one and driving the
    /// widget through the resulting operations.
    ///
    /// New view kinds are registered immediately. If an update is already in
    /// flight the model is parked as the pending model, superseding any
    /// previously parked one; it begins once the in-flight update settles.
    pub fn set_model(&mut self, model: CollectionViewModel) {
        self.registrations.register_new(&mut self.widget, model.all_registrations());

        if self.state != DriverState::Idle {
            log::debug!("update in flight; coalescing to model '{}'", model.id());
            self.pending = Some(model);
            return;
        }
        self.begin_update(model);
    }

    /// Drains completed background diffs and applies them to the widget.
    ///
    /// Must be called from the widget-owning context; hosts typically call it
    /// from their event loop, prompted by the wake handler. Returns the
    /// number of updates applied. A no-op for synchronous drivers.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(outcome) = self.worker.as_ref().and_then(DiffWorker::try_recv) else {
                break;
            };
            let Some(in_flight) = self.in_flight.take() else {
                log::debug!("dropping orphan diff result (generation {})", outcome.generation);
                continue;
            };
            if outcome.generation != in_flight.generation {
                log::debug!("dropping superseded diff result (generation {})", outcome.generation);
                self.in_flight = Some(in_flight);
                continue;
            }

            if let Some(pending) = self.pending.take() {
                // A newer model arrived while this diff was computing. Skip
                // the stale result entirely and diff from the snapshot still
                // on screen straight to the newest model.
                log::debug!(
                    "discarding stale diff (generation {}); newer model '{}' pending",
                    outcome.generation,
                    pending.id()
                );
                self.state = DriverState::Idle;
                self.begin_update(pending);
                continue;
            }

            self.apply(outcome.diff, in_flight.model, in_flight.snapshot, in_flight.visible);
            applied += 1;
        }
        applied
    }

    fn begin_update(&mut self, model: CollectionViewModel) {
        let snapshot = Snapshot::of(&model);

        let replaced = model.id() != self.model.id();
        if replaced && self.options.reload_on_replacement {
            log::debug!("container replaced ({} -> {}); reloading", self.model.id(), model.id());
            self.state = DriverState::Applying;
            self.widget.reload(&model);
            self.model = model;
            self.snapshot = snapshot;
            self.finish_update();
            return;
        }

        // Visibility is widget state, so it must be captured here, before
        // the diff possibly leaves the widget-owning context.
        let visible = self.widget.visible_items();
        self.generation += 1;

        match &self.worker {
            Some(worker) => {
                self.state = DriverState::Diffing;
                worker.submit(DiffJob {
                    generation: self.generation,
                    old: self.snapshot.clone(),
                    new: snapshot.clone(),
                });
                self.in_flight = Some(InFlight {
                    generation: self.generation,
                    model,
                    snapshot,
                    visible,
                });
            }
            None => {
                let result = diff(&self.snapshot, &snapshot);
                self.apply(result, model, snapshot, visible);
            }
        }
    }

    fn apply(
        &mut self,
        mut diff: DiffResult,
        model: CollectionViewModel,
        snapshot: Snapshot,
        visible: Option<Vec<Id>>,
    ) {
        self.state = DriverState::Applying;

        if let Some(visible) = visible {
            let visible: HashSet<Id> = visible.into_iter().collect();
            diff.retain_cell_reconfigures(|id| visible.contains(id));
        }

        log::debug!("applying to '{}': {}", model.id(), diff);
        if log::log_enabled!(log::Level::Trace) {
            if let Ok(payload) = serde_json::to_string(&diff) {
                log::trace!("diff payload: {payload}");
            }
        }

        self.widget.apply_diff(&diff, &model, self.options.animate_updates);

        // Headers, footers, and custom supplementary views are outside the
        // batch operation surface, so they get an explicit second pass.
        let supplementary: Vec<(Id, Id)> = diff
            .supplementary_reconfigures()
            .map(|(section, view)| (section.clone(), view.clone()))
            .collect();
        for (section, view) in &supplementary {
            self.widget.reconfigure_supplementary(section, view, &model);
        }

        self.model = model;
        self.snapshot = snapshot;
        self.finish_update();
    }

    fn finish_update(&mut self) {
        self.state = DriverState::Idle;

        if let Some(mut callback) = self.did_update.take() {
            callback();
            self.did_update = Some(callback);
        }

        if let Some(pending) = self.pending.take() {
            log::debug!("starting coalesced update for model '{}'", pending.id());
            self.begin_update(pending);
        }
    }
}

struct DiffJob {
    generation: u64,
    old: Snapshot,
    new: Snapshot,
}

struct DiffOutcome {
    generation: u64,
    diff: DiffResult,
}

/// A single worker thread computing diffs off the widget-owning context.
///
/// Jobs flow in and results flow out over channels; the worker never touches
/// the widget. Dropping the worker closes the job channel and joins the
/// thread.
struct DiffWorker {
    job_tx: Option<mpsc::Sender<DiffJob>>,
    outcome_rx: mpsc::Receiver<DiffOutcome>,
    wake: Arc<Mutex<Option<WakeHandler>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DiffWorker {
    fn spawn() -> Self {
        let (job_tx, job_rx) = mpsc::channel::<DiffJob>();
        let (outcome_tx, outcome_rx) = mpsc::channel();
        let wake: Arc<Mutex<Option<WakeHandler>>> = Arc::new(Mutex::new(None));

        let thread_wake = Arc::clone(&wake);
        let handle = thread::Builder::new()
            .name("collection-diff".into())
            .spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    let result = diff(&job.old, &job.new);
                    let outcome = DiffOutcome { generation: job.generation, diff: result };
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                    if let Some(wake) = thread_wake.lock().unwrap().as_ref() {
                        wake();
                    }
                }
            })
            .expect("failed to spawn diff worker thread");

        DiffWorker {
            job_tx: Some(job_tx),
            outcome_rx,
            wake,
            handle: Some(handle),
        }
    }

    fn submit(&self, job: DiffJob) {
        if let Some(tx) = &self.job_tx {
            // Send only fails when the worker thread has exited, which only
            // happens during teardown.
            let _ = tx.send(job);
        }
    }

    fn try_recv(&self) -> Option<DiffOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    fn set_wake(&self, handler: Option<WakeHandler>) {
        *self.wake.lock().unwrap() = handler;
    }
}

impl Drop for DiffWorker {
    fn drop(&mut self) {
        self.job_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
