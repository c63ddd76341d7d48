//! In-memory host runtime.
//!
//! Models just enough of the game runtime for synchronizer tests: armor
//! stands with optional equipment, players with permission nodes, one open
//! container view per player, and chat messages. Every side effect the core
//! triggers is appended to a journal.

use standvault_core::{
    ActorId, ContainerView, EntityId, EntityKind, EntityRef, Equipment, EquipmentModel, Host,
    HostError, ItemStack, SpatialKey,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::trace;

/// Side effect recorded by [`FakeHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A view was opened for an actor.
    ViewOpened {
        /// Viewer.
        actor: ActorId,
        /// View title.
        title: String,
        /// View size in slots.
        size: usize,
    },
    /// An entity's equipment was replaced.
    EquipmentSet {
        /// Target entity.
        entity: EntityId,
    },
    /// A chat message was sent.
    MessageSent {
        /// Recipient.
        actor: ActorId,
        /// Message text.
        message: String,
    },
}

#[derive(Debug, Clone)]
struct FakeEntity {
    entity: EntityRef,
    equipment: Option<Equipment>,
    locked: bool,
}

/// In-memory [`Host`] implementation.
#[derive(Debug, Default)]
pub struct FakeHost {
    model: EquipmentModel,
    entities: BTreeMap<EntityId, FakeEntity>,
    permissions: HashMap<ActorId, HashSet<String>>,
    views: HashMap<ActorId, ContainerView>,
    journal: Vec<HostEvent>,
    next_entity: u64,
}

impl FakeHost {
    /// Host with separate main and off hands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with a single hand slot.
    pub fn legacy() -> Self {
        Self {
            model: EquipmentModel::Legacy,
            ..Self::default()
        }
    }

    fn spawn(&mut self, kind: EntityKind, key: SpatialKey, equipment: Option<Equipment>) -> EntityRef {
        self.next_entity += 1;
        let entity = EntityRef {
            id: EntityId(self.next_entity),
            kind,
            key,
        };
        self.entities.insert(
            entity.id,
            FakeEntity {
                entity: entity.clone(),
                equipment,
                locked: false,
            },
        );
        entity
    }

    /// Spawn an armor stand with empty equipment.
    pub fn spawn_armor_stand(&mut self, key: SpatialKey) -> EntityRef {
        self.spawn(EntityKind::ArmorStand, key, Some(Equipment::new()))
    }

    /// Spawn an armor stand wearing `equipment`.
    pub fn spawn_equipped_armor_stand(&mut self, key: SpatialKey, equipment: Equipment) -> EntityRef {
        self.spawn(EntityKind::ArmorStand, key, Some(equipment))
    }

    /// Spawn an armor stand without an equipment interface.
    pub fn spawn_bare_armor_stand(&mut self, key: SpatialKey) -> EntityRef {
        self.spawn(EntityKind::ArmorStand, key, None)
    }

    /// Spawn an untracked entity.
    pub fn spawn_other(&mut self, key: SpatialKey) -> EntityRef {
        self.spawn(EntityKind::Other, key, Some(Equipment::new()))
    }

    /// Remove an entity from the world.
    pub fn despawn(&mut self, entity: EntityId) {
        self.entities.remove(&entity);
    }

    /// Change an entity's equipment the way native interaction would.
    pub fn equip(&mut self, entity: EntityId, equipment: Equipment) {
        if let Some(fake) = self.entities.get_mut(&entity) {
            fake.equipment = Some(equipment);
        }
    }

    /// Make the runtime reject equipment changes for an entity.
    pub fn lock_equipment(&mut self, entity: EntityId) {
        if let Some(fake) = self.entities.get_mut(&entity) {
            fake.locked = true;
        }
    }

    /// Current live equipment.
    pub fn live_equipment(&self, entity: EntityId) -> Option<&Equipment> {
        self.entities
            .get(&entity)
            .and_then(|fake| fake.equipment.as_ref())
    }

    /// Grant a permission node.
    pub fn grant(&mut self, actor: ActorId, permission: &str) {
        self.permissions
            .entry(actor)
            .or_default()
            .insert(permission.to_string());
    }

    /// The actor's open view.
    pub fn view(&self, actor: ActorId) -> Option<&ContainerView> {
        self.views.get(&actor)
    }

    /// Place an item in the actor's open view, as a click would.
    pub fn place(&mut self, actor: ActorId, slot: usize, stack: Option<ItemStack>) {
        if let Some(view) = self.views.get_mut(&actor) {
            if slot < view.contents.len() {
                view.contents[slot] = stack;
            }
        }
    }

    /// Close the actor's view, returning its final state.
    pub fn close_view(&mut self, actor: ActorId) -> Option<ContainerView> {
        self.views.remove(&actor)
    }

    /// Messages sent to an actor, oldest first.
    pub fn messages_for(&self, actor: ActorId) -> Vec<&str> {
        self.journal
            .iter()
            .filter_map(|event| match event {
                HostEvent::MessageSent {
                    actor: recipient,
                    message,
                } if *recipient == actor => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every recorded side effect.
    pub fn journal(&self) -> &[HostEvent] {
        &self.journal
    }

    /// Number of views opened so far.
    pub fn views_opened(&self) -> usize {
        self.journal
            .iter()
            .filter(|event| matches!(event, HostEvent::ViewOpened { .. }))
            .count()
    }

    fn record(&mut self, event: HostEvent) {
        trace!(?event, "fake host event");
        self.journal.push(event);
    }
}

impl Host for FakeHost {
    fn equipment_model(&self) -> EquipmentModel {
        self.model
    }

    fn entities(&self) -> Vec<EntityRef> {
        self.entities
            .values()
            .map(|fake| fake.entity.clone())
            .collect()
    }

    fn equipment(&self, entity: EntityId) -> Option<Equipment> {
        self.live_equipment(entity).cloned()
    }

    fn set_equipment(&mut self, entity: EntityId, equipment: Equipment) -> Result<(), HostError> {
        let fake = self
            .entities
            .get_mut(&entity)
            .ok_or(HostError::EntityGone(entity))?;
        if fake.locked {
            return Err(HostError::Rejected(entity));
        }
        let slot = fake
            .equipment
            .as_mut()
            .ok_or(HostError::NoEquipment(entity))?;
        *slot = equipment;
        self.record(HostEvent::EquipmentSet { entity });
        Ok(())
    }

    fn has_permission(&self, actor: ActorId, permission: &str) -> bool {
        self.permissions
            .get(&actor)
            .is_some_and(|granted| granted.contains(permission))
    }

    fn open_view(&mut self, actor: ActorId, view: ContainerView) {
        self.record(HostEvent::ViewOpened {
            actor,
            title: view.title.clone(),
            size: view.size(),
        });
        self.views.insert(actor, view);
    }

    fn current_view(&self, actor: ActorId) -> Option<ContainerView> {
        self.views.get(&actor).cloned()
    }

    fn send_message(&mut self, actor: ActorId, message: &str) {
        self.record(HostEvent::MessageSent {
            actor,
            message: message.to_string(),
        });
    }
}
