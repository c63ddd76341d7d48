//! Bridge between storage views, live equipment and the store.
//!
//! Runtime notifications arrive through the `on_*` entry points. Anything that
//! must observe the runtime *after* it finished applying a change (view edits,
//! native armor stand manipulation, the startup scan) is queued on the turn
//! scheduler and runs from [`Synchronizer::tick`].

use crate::config::{Config, MSG_BLOCKED_WORLD, MSG_NO_PERMISSION};
use crate::scheduler::TurnScheduler;
use crate::session::SessionTable;
use standvault_core::{
    gather_from_equipment, split_to_equipment, ActorId, ContainerView, EntityRef, EquipmentModel,
    Host, Inventory, ItemStack, Posture, SimTick, SpatialKey, STORAGE_SLOTS,
};
use standvault_store::EquipmentStore;
use tracing::{debug, info, warn};

/// A player's request to interact with an entity.
#[derive(Debug, Clone)]
pub struct InteractRequest {
    /// Interacting player.
    pub actor: ActorId,
    /// Player name, for logs.
    pub actor_name: String,
    /// Player posture at interaction time.
    pub posture: Posture,
    /// Entity that was interacted with.
    pub target: EntityRef,
}

/// Where an opened view got its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// A non-empty stored inventory.
    Stored,
    /// The entity's live equipment, now also stored.
    LiveEquipment,
    /// The entity's live equipment, not stored because the existing record
    /// could not be read.
    LiveSnapshot,
    /// Nothing stored and no equipment interface.
    Empty,
}

/// Result of a session open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Target is not a tracked entity.
    Ignored,
    /// Target's world has storage disabled; the actor was told.
    BlockedWorld,
    /// Actor is not in the trigger posture; native handling applies.
    PassThrough,
    /// Actor lacks the use permission; the actor was told.
    Denied,
    /// Storage view opened.
    Opened(SeedSource),
}

impl OpenOutcome {
    /// Whether the runtime's native handling of the interaction must be cancelled.
    pub fn cancels_native(self) -> bool {
        matches!(self, OpenOutcome::Opened(_))
    }
}

/// Kind of committed edit in a storage view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Slot click.
    Click,
    /// Drag across slots.
    Drag,
}

#[derive(Debug, Clone)]
enum Task {
    /// Register every armor stand that already exists.
    Backfill,
    /// Apply and persist the actor's view after an edit.
    SyncView { actor: ActorId, entity: EntityRef },
    /// Persist live equipment after native manipulation.
    CaptureEquipment { entity: EntityRef },
}

impl Task {
    fn targets(&self, key: &SpatialKey) -> bool {
        match self {
            Task::Backfill => false,
            Task::SyncView { entity, .. } | Task::CaptureEquipment { entity } => {
                entity.key == *key
            }
        }
    }
}

/// Session/state bridge. Owns the store, the session table and the turn queue.
pub struct Synchronizer {
    store: EquipmentStore,
    config: Config,
    model: EquipmentModel,
    sessions: SessionTable,
    scheduler: TurnScheduler<Task>,
}

impl Synchronizer {
    /// Create a synchronizer over an opened store. `model` is the runtime's
    /// equipment model, resolved once by the caller.
    pub fn new(store: EquipmentStore, config: Config, model: EquipmentModel) -> Self {
        Self {
            store,
            config,
            model,
            sessions: SessionTable::new(),
            scheduler: TurnScheduler::new(),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &EquipmentStore {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Equipment model in use.
    pub fn model(&self) -> EquipmentModel {
        self.model
    }

    /// Open sessions.
    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Current scheduling turn.
    pub fn now(&self) -> SimTick {
        self.scheduler.now()
    }

    /// Number of queued deferred tasks.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Queue the startup registration scan after the configured delay.
    pub fn schedule_backfill(&mut self) {
        self.scheduler
            .schedule(self.config.storage.startup_scan_delay_ticks, Task::Backfill);
    }

    /// Register every live armor stand. Returns how many were seen.
    pub fn backfill<H: Host>(&mut self, host: &H) -> usize {
        let mut count = 0;
        for entity in host.entities().into_iter().filter(EntityRef::is_tracked) {
            self.store.register(&entity.key);
            count += 1;
        }
        info!("Registered all existing armor stands! ({count} found)");
        count
    }

    /// An entity appeared (spawned or placed).
    pub fn on_register_candidate(&mut self, entity: &EntityRef) {
        if !entity.is_tracked() {
            return;
        }
        self.store.register(&entity.key);
        debug!("New armor stand registered at: {}", entity.key);
    }

    /// An entity was destroyed.
    pub fn on_remove_candidate(&mut self, entity: &EntityRef) {
        if !entity.is_tracked() {
            return;
        }

        if self.store.is_registered(&entity.key) {
            self.store.remove(&entity.key);
            info!("Registered armor stand removed at: {}", entity.key);
        } else {
            info!("Unregistered armor stand removed at: {}", entity.key);
        }

        let released = self.sessions.release_entity(&entity.key);
        if released > 0 {
            debug!("Released {released} session(s) bound to removed armor stand");
        }
        self.scheduler.retain(|task| !task.targets(&entity.key));
    }

    /// A player interacted with an entity.
    pub fn on_session_open_request<H: Host>(
        &mut self,
        host: &mut H,
        request: &InteractRequest,
    ) -> OpenOutcome {
        let target = &request.target;
        if !target.is_tracked() {
            return OpenOutcome::Ignored;
        }

        if self.config.is_world_disabled(target.key.world()) {
            host.send_message(request.actor, &self.config.message(MSG_BLOCKED_WORLD));
            return OpenOutcome::BlockedWorld;
        }

        if request.posture != Posture::Sneaking {
            return OpenOutcome::PassThrough;
        }

        if !host.has_permission(request.actor, &self.config.permissions.use_node) {
            host.send_message(request.actor, &self.config.message(MSG_NO_PERMISSION));
            return OpenOutcome::Denied;
        }

        let mut view = ContainerView::new(
            self.config.storage.inventory_title.clone(),
            self.config.view_size(),
        );

        let stored = match self.store.try_load(&target.key) {
            Ok(stored) => Some(stored),
            Err(err) => {
                warn!("Failed to load armor stand inventory at {}: {err}", target.key);
                None
            }
        };
        let source = match (stored, host.equipment(target.id)) {
            (Some(stored), _) if !stored.is_empty() => {
                fill_view(&mut view, &stored);
                SeedSource::Stored
            }
            (Some(_), Some(equipment)) => {
                let packed = gather_from_equipment(&equipment, self.model);
                fill_view(&mut view, &packed);
                self.store.save(&target.key, &packed);
                SeedSource::LiveEquipment
            }
            // An unreadable record stays as it is until an edit is committed.
            (None, Some(equipment)) => {
                fill_view(&mut view, &gather_from_equipment(&equipment, self.model));
                SeedSource::LiveSnapshot
            }
            (_, None) => SeedSource::Empty,
        };

        host.open_view(request.actor, view);
        if let Some(previous) = self.sessions.bind(request.actor, target.clone()) {
            debug!(
                "Replaced session of {} bound to {}",
                request.actor_name, previous.key
            );
        }
        debug!(
            "Opened armor stand storage for {} at {} ({source:?})",
            request.actor_name, target.key
        );

        OpenOutcome::Opened(source)
    }

    /// A committed edit happened in a view. Returns whether a sync was queued.
    pub fn on_view_mutated(
        &mut self,
        actor: ActorId,
        actor_name: &str,
        view_title: &str,
        kind: MutationKind,
    ) -> bool {
        let Some(entity) = self.sessions.get(actor).cloned() else {
            return false;
        };
        if view_title != self.config.storage.inventory_title {
            return false;
        }

        match kind {
            MutationKind::Click => debug!("Player {actor_name} clicked in armor stand inventory"),
            MutationKind::Drag => debug!("Player {actor_name} dragged in armor stand inventory"),
        }
        self.scheduler.schedule(1, Task::SyncView { actor, entity });
        true
    }

    /// A view was closed with its final `contents`. The session ends
    /// regardless; the contents are committed only for our storage view.
    pub fn on_session_close<H: Host>(
        &mut self,
        host: &mut H,
        actor: ActorId,
        actor_name: &str,
        view_title: &str,
        contents: &[Option<ItemStack>],
    ) -> bool {
        let Some(entity) = self.sessions.release(actor) else {
            return false;
        };
        if view_title != self.config.storage.inventory_title {
            return false;
        }

        let item_count = contents
            .iter()
            .flatten()
            .filter(|stack| !stack.is_empty())
            .count();
        let committed = self.commit_view(host, &entity, contents);

        debug!("Saving inventory with {} slots", contents.len());
        debug!("Found {item_count} items to save");
        if committed {
            debug!("Saved armor stand inventory for {actor_name}");
        }
        committed
    }

    /// Equipment changed through the runtime's native manipulation.
    /// Returns whether a capture was queued.
    pub fn on_passive_equipment_change(&mut self, posture: Posture, entity: &EntityRef) -> bool {
        // The sneaking path belongs to the storage view.
        if posture == Posture::Sneaking || !entity.is_tracked() {
            return false;
        }
        self.scheduler.schedule(
            1,
            Task::CaptureEquipment {
                entity: entity.clone(),
            },
        );
        true
    }

    /// Advance one scheduling turn and run the work that became due.
    pub fn tick<H: Host>(&mut self, host: &mut H) {
        for task in self.scheduler.advance() {
            match task {
                Task::Backfill => {
                    self.backfill(&*host);
                }
                Task::SyncView { actor, entity } => self.sync_view(host, actor, &entity),
                Task::CaptureEquipment { entity } => self.capture_equipment(&*host, &entity),
            }
        }
    }

    /// Drop sessions and queued work, then close the store.
    pub fn shutdown(&mut self) {
        self.sessions.clear();
        self.scheduler.clear();
        self.store.close();
    }

    fn sync_view<H: Host>(&mut self, host: &mut H, actor: ActorId, entity: &EntityRef) {
        // The session may have ended or moved to another stand since the edit.
        if self.sessions.get(actor).map(|bound| &bound.key) != Some(&entity.key) {
            return;
        }
        let Some(view) = host.current_view(actor) else {
            return;
        };
        if view.title != self.config.storage.inventory_title {
            return;
        }
        self.commit_view(host, entity, &view.contents);
    }

    fn capture_equipment<H: Host>(&mut self, host: &H, entity: &EntityRef) {
        if !self.store.is_registered(&entity.key) {
            self.store.register(&entity.key);
        }
        let Some(equipment) = host.equipment(entity.id) else {
            return;
        };
        let packed = gather_from_equipment(&equipment, self.model);
        self.store.save(&entity.key, &packed);
        debug!("Saved armor stand equipment after manual interaction");
    }

    /// Apply the view to live equipment, then persist it. Nothing is persisted
    /// unless the runtime accepted the equipment.
    fn commit_view<H: Host>(
        &mut self,
        host: &mut H,
        entity: &EntityRef,
        contents: &[Option<ItemStack>],
    ) -> bool {
        if host.equipment(entity.id).is_none() {
            debug!("Armor stand at {} has no equipment, skipping sync", entity.key);
            return false;
        }

        let equipment = split_to_equipment(contents, self.model);
        if let Err(err) = host.set_equipment(entity.id, equipment) {
            warn!("Error setting armor stand equipment at {}: {err}", entity.key);
            return false;
        }

        let overflow = contents
            .iter()
            .skip(STORAGE_SLOTS)
            .flatten()
            .filter(|stack| !stack.is_empty())
            .count();
        if overflow > 0 {
            debug!("{overflow} item(s) beyond slot {STORAGE_SLOTS} are not persisted");
        }

        self.store
            .save(&entity.key, &Inventory::from_slots(contents));
        true
    }
}

fn fill_view(view: &mut ContainerView, inventory: &Inventory) {
    for (slot, stack) in inventory.occupied() {
        if let Some(cell) = view.contents.get_mut(slot) {
            *cell = Some(stack.clone());
        }
    }
}
