//! Plugin enable/disable against a real data directory.

use standvault::{Config, InteractRequest, OpenOutcome, Plugin, SeedSource, CONFIG_FILE};
use standvault_core::{ActorId, EntityRef, Equipment, Posture, SpatialKey};
use standvault_testkit::{item, FakeHost};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const ALEX: ActorId = ActorId(42);

fn temp_data_dir(label: &str) -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    env::temp_dir().join(format!("standvault_test_plugin_{label}_{timestamp}"))
}

fn sneak(target: &EntityRef) -> InteractRequest {
    InteractRequest {
        actor: ALEX,
        actor_name: "Alex".to_string(),
        posture: Posture::Sneaking,
        target: target.clone(),
    }
}

#[test]
fn enable_writes_default_config_and_database() {
    let dir = temp_data_dir("defaults");
    let host = FakeHost::new();

    let plugin = Plugin::enable(&dir, &host).unwrap();
    assert_eq!(plugin.data_dir(), dir.as_path());
    assert!(dir.join(CONFIG_FILE).is_file());
    assert!(dir.join("armorstands.db").exists());
    assert!(plugin.synchronizer().store().is_open());
    assert_eq!(plugin.synchronizer().config(), &Config::default());
    plugin.disable();

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn existing_config_is_respected() {
    let dir = temp_data_dir("custom");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(CONFIG_FILE),
        "disabled-worlds = [\"creative\"]\n[storage]\ndatabase-file = \"stands.db\"\nstartup-scan-delay-ticks = 2\n",
    )
    .unwrap();

    let mut host = FakeHost::new();
    let stand = host.spawn_armor_stand(SpatialKey::new("world", 0.0, 70.0, 0.0));

    let mut plugin = Plugin::enable(&dir, &host).unwrap();
    assert!(dir.join("stands.db").exists());
    assert!(plugin.synchronizer().config().is_world_disabled("creative"));

    plugin.tick(&mut host);
    assert!(!plugin.synchronizer().store().is_registered(&stand.key));
    plugin.tick(&mut host);
    assert!(plugin.synchronizer().store().is_registered(&stand.key));

    plugin.disable();
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn stored_equipment_survives_restart() {
    let dir = temp_data_dir("restart");
    let key = SpatialKey::new("world", -31.5, 68.0, 204.5);

    {
        let mut host = FakeHost::new();
        host.grant(ALEX, "armorstandstorage.use");
        let stand = host.spawn_equipped_armor_stand(
            key.clone(),
            Equipment {
                helmet: Some(item("CARVED_PUMPKIN")),
                ..Equipment::default()
            },
        );
        let mut plugin = Plugin::enable(&dir, &host).unwrap();
        plugin.on_entity_spawn(&stand);

        let outcome = plugin.on_interact(&mut host, &sneak(&stand));
        assert_eq!(outcome, OpenOutcome::Opened(SeedSource::LiveEquipment));

        host.place(ALEX, 0, Some(item("DIAMOND_HELMET")));
        host.place(ALEX, 13, Some(item("GOLDEN_APPLE")));
        let view = host.close_view(ALEX).unwrap();
        assert!(plugin.on_view_close(&mut host, ALEX, "Alex", &view.title, &view.contents));
        plugin.disable();
    }

    let mut host = FakeHost::new();
    host.grant(ALEX, "armorstandstorage.use");
    let stand = host.spawn_armor_stand(key.clone());
    let mut plugin = Plugin::enable(&dir, &host).unwrap();

    let outcome = plugin.on_interact(&mut host, &sneak(&stand));
    assert_eq!(outcome, OpenOutcome::Opened(SeedSource::Stored));
    let view = host.view(ALEX).unwrap();
    assert_eq!(view.contents[0], Some(item("DIAMOND_HELMET")));
    assert_eq!(view.contents[13], Some(item("GOLDEN_APPLE")));
    assert!(plugin.synchronizer().store().record(&key).is_some());

    plugin.disable();
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn unopenable_database_runs_without_persistence() {
    let dir = temp_data_dir("blocked");
    fs::create_dir_all(&dir).unwrap();
    // A regular file where the database directory should be.
    fs::write(dir.join("armorstands.db"), b"not a database").unwrap();

    let mut host = FakeHost::new();
    host.grant(ALEX, "armorstandstorage.use");
    let stand = host.spawn_armor_stand(SpatialKey::new("world", 1.0, 1.0, 1.0));

    let mut plugin = Plugin::enable(&dir, &host).unwrap();
    assert!(!plugin.synchronizer().store().is_open());

    let outcome = plugin.on_interact(&mut host, &sneak(&stand));
    assert_eq!(outcome, OpenOutcome::Opened(SeedSource::LiveSnapshot));
    assert!(plugin.on_view_click(ALEX, "Alex", "Armor Stand Storage"));
    plugin.tick(&mut host);
    assert!(!plugin.synchronizer().store().is_registered(&stand.key));

    plugin.disable();
    fs::remove_dir_all(&dir).ok();
}
