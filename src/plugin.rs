//! Plugin lifecycle: enable, event forwarding, disable.

use crate::config::Config;
use crate::logging;
use crate::sync::{InteractRequest, MutationKind, OpenOutcome, Synchronizer};
use anyhow::{Context, Result};
use standvault_core::{ActorId, EntityRef, EquipmentModel, Host, ItemStack, Posture};
use standvault_store::EquipmentStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// An enabled plugin instance.
pub struct Plugin {
    data_dir: PathBuf,
    sync: Synchronizer,
}

impl Plugin {
    /// Enable the plugin.
    ///
    /// Creates the data directory and default config when missing, installs
    /// logging, opens the store and schedules the startup registration scan.
    /// A store that fails to open is logged; the plugin then runs without
    /// persistence.
    pub fn enable<H: Host>(data_dir: impl Into<PathBuf>, host: &H) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let config_path = data_dir.join(CONFIG_FILE);
        Config::write_default_if_missing(&config_path)?;
        let config = Config::load_from_path(&config_path);
        logging::init(config.debug);

        let db_path = data_dir.join(&config.storage.database_file);
        let store = match EquipmentStore::open(&db_path) {
            Ok(store) => store,
            Err(err) => {
                error!("Failed to open database {}: {err}", db_path.display());
                EquipmentStore::detached()
            }
        };

        let model = host.equipment_model();
        info!("Equipment model: {model:?}");
        if config.disabled_worlds.is_empty() {
            info!("Armor stand storage enabled in all worlds");
        } else {
            info!("Disabled worlds: {}", config.disabled_worlds.join(", "));
        }

        let mut plugin = Self::with_parts(data_dir, config, store, model);
        plugin.sync.schedule_backfill();
        info!("ArmorStandStorage enabled");
        Ok(plugin)
    }

    /// Assemble a plugin from already-built parts. No scan is scheduled.
    pub fn with_parts(
        data_dir: impl Into<PathBuf>,
        config: Config,
        store: EquipmentStore,
        model: EquipmentModel,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            sync: Synchronizer::new(store, config, model),
        }
    }

    /// Close the store and drop all sessions.
    pub fn disable(mut self) {
        self.sync.shutdown();
        info!("ArmorStandStorage disabled");
    }

    /// Data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The synchronizer.
    pub fn synchronizer(&self) -> &Synchronizer {
        &self.sync
    }

    /// Run one scheduling turn.
    pub fn tick<H: Host>(&mut self, host: &mut H) {
        self.sync.tick(host);
    }

    /// Entity spawned or placed.
    pub fn on_entity_spawn(&mut self, entity: &EntityRef) {
        self.sync.on_register_candidate(entity);
    }

    /// Entity destroyed.
    pub fn on_entity_death(&mut self, entity: &EntityRef) {
        self.sync.on_remove_candidate(entity);
    }

    /// Player interacted with an entity. The caller cancels native handling
    /// when [`OpenOutcome::cancels_native`] is true.
    pub fn on_interact<H: Host>(&mut self, host: &mut H, request: &InteractRequest) -> OpenOutcome {
        self.sync.on_session_open_request(host, request)
    }

    /// Player clicked in a view.
    pub fn on_view_click(&mut self, actor: ActorId, actor_name: &str, view_title: &str) -> bool {
        self.sync
            .on_view_mutated(actor, actor_name, view_title, MutationKind::Click)
    }

    /// Player dragged items across a view.
    pub fn on_view_drag(&mut self, actor: ActorId, actor_name: &str, view_title: &str) -> bool {
        self.sync
            .on_view_mutated(actor, actor_name, view_title, MutationKind::Drag)
    }

    /// Player closed a view.
    pub fn on_view_close<H: Host>(
        &mut self,
        host: &mut H,
        actor: ActorId,
        actor_name: &str,
        view_title: &str,
        contents: &[Option<ItemStack>],
    ) -> bool {
        self.sync
            .on_session_close(host, actor, actor_name, view_title, contents)
    }

    /// Native armor stand manipulation.
    pub fn on_armor_stand_manipulate(&mut self, posture: Posture, entity: &EntityRef) -> bool {
        self.sync.on_passive_equipment_change(posture, entity)
    }
}
