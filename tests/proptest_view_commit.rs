//! Property-based tests for committing storage views
//!
//! Validates:
//! - Closing a view persists exactly its first 27 slots
//! - Live equipment equals the split of the whole view

use proptest::prelude::*;
use standvault::{Config, InteractRequest, Synchronizer};
use standvault_core::{
    split_to_equipment, ActorId, EquipmentModel, Inventory, ItemStack, Posture, SpatialKey,
};
use standvault_store::EquipmentStore;
use standvault_testkit::FakeHost;

const ACTOR: ActorId = ActorId(9);

fn placements(view_size: usize) -> impl Strategy<Value = Vec<(usize, ItemStack)>> {
    const MATERIALS: &[&str] = &[
        "DIAMOND_HELMET",
        "IRON_CHESTPLATE",
        "ELYTRA",
        "LEATHER_LEGGINGS",
        "NETHERITE_BOOTS",
        "ZOMBIE_HEAD",
        "STICK",
        "SHIELD",
        "COBBLESTONE",
        "AIR",
    ];
    prop::collection::vec(
        (
            0..view_size,
            prop::sample::select(MATERIALS),
            0u8..=64,
        )
            .prop_map(|(slot, material, amount)| (slot, ItemStack::new(material, amount))),
        0..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn close_persists_first_27_slots(
        rows in 3u32..=6,
        edits in placements(54),
        legacy in any::<bool>(),
    ) {
        let model = if legacy { EquipmentModel::Legacy } else { EquipmentModel::Modern };
        let mut config = Config::default();
        config.storage.inventory_rows = rows;
        let view_size = config.view_size();
        let title = config.storage.inventory_title.clone();

        let mut sync = Synchronizer::new(EquipmentStore::temporary().unwrap(), config, model);
        let mut host = if legacy { FakeHost::legacy() } else { FakeHost::new() };
        host.grant(ACTOR, "armorstandstorage.use");
        let stand = host.spawn_armor_stand(SpatialKey::new("world", 0.5, 80.0, 0.5));

        sync.on_session_open_request(&mut host, &InteractRequest {
            actor: ACTOR,
            actor_name: "Tester".to_string(),
            posture: Posture::Sneaking,
            target: stand.clone(),
        });

        for (slot, stack) in edits {
            host.place(ACTOR, slot % view_size, Some(stack));
        }
        let view = host.close_view(ACTOR).unwrap();
        prop_assert!(sync.on_session_close(&mut host, ACTOR, "Tester", &title, &view.contents));

        prop_assert_eq!(sync.store().load(&stand.key), Inventory::from_slots(&view.contents));
        prop_assert_eq!(
            host.live_equipment(stand.id).cloned(),
            Some(split_to_equipment(&view.contents, model))
        );
    }
}
