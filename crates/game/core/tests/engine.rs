mod common;

use common::{P, chest, engine, engine_with, inv, record, tree, world};
use survival_core::{
    CancelReason, ContainerError, CraftOutcome, EquipOutcome, EquipSlot, ExecuteError, GameConfig,
    GameEvent, InteractOutcome, Interaction, RecipeId, StackLocation, TransferOutcome,
};

fn cancellations(events: &[GameEvent]) -> Vec<CancelReason> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::ActionCancelled { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect()
}

#[test]
fn timed_merge_blocks_the_actor_until_it_fires() {
    let mut engine = engine(&[("axe", 1)]);

    let outcome = engine
        .interact(Interaction::new(P).using(inv(0)).on_object(tree()))
        .unwrap();
    let InteractOutcome::Started { due, .. } = outcome else {
        panic!("chopping takes time");
    };
    assert_eq!(due.seconds(), 3.0);
    assert!(engine.is_busy(P));

    let again = engine.interact(Interaction::new(P).using(inv(0)).on_object(tree()));
    assert!(matches!(again, Err(ExecuteError::ActorBusy { .. })));
    let craft = engine.craft(P, "stone_axe");
    assert!(matches!(craft, Err(ExecuteError::ActorBusy { .. })));

    engine.tick(1.0);
    assert_eq!(engine.state().total_quantity("log"), 0);

    engine.tick(2.0);
    assert!(!engine.is_busy(P));
    assert_eq!(engine.state().total_quantity("log"), 2);
    assert_eq!(engine.state().stack(&inv(0)).unwrap().durability, 1.0);
}

#[test]
fn moving_cancels_the_pending_action() {
    let mut engine = engine(&[("axe", 1)]);
    let events = record(&mut engine);

    engine
        .interact(Interaction::new(P).using(inv(0)).on_object(tree()))
        .unwrap();
    assert!(engine.actor_moved(P));
    assert!(!engine.is_busy(P));

    engine.tick(5.0);
    assert_eq!(engine.state().total_quantity("log"), 0);
    assert_eq!(
        cancellations(&events.lock().unwrap()),
        [CancelReason::ActorMoved]
    );
}

#[test]
fn removed_target_cancels_at_fire_time() {
    let world = world();
    let mut engine = engine_with(world.clone(), GameConfig::default(), &[("axe", 1)]);
    let events = record(&mut engine);

    engine
        .interact(Interaction::new(P).using(inv(0)).on_object(tree()))
        .unwrap();
    assert!(world.remove(&tree().uid));

    engine.tick(3.0);
    assert_eq!(engine.state().total_quantity("log"), 0);
    assert_eq!(engine.state().stack(&inv(0)).unwrap().durability, 2.0);
    assert_eq!(
        cancellations(&events.lock().unwrap()),
        [CancelReason::TargetDestroyed]
    );
}

#[test]
fn object_destroyed_cancels_and_reports_count() {
    let mut engine = engine(&[("axe", 1)]);
    engine
        .interact(Interaction::new(P).using(inv(0)).on_object(tree()))
        .unwrap();

    assert_eq!(engine.object_destroyed(&tree().uid), 1);
    assert!(!engine.is_busy(P));
}

#[test]
fn chest_menu_opens_storage_and_smashing_spills_it() {
    let mut engine = engine(&[("stone", 5)]);
    let events = record(&mut engine);

    let outcome = engine.interact(Interaction::new(P).on_object(chest())).unwrap();
    let InteractOutcome::Choices(options) = outcome else {
        panic!("expected the chest menu");
    };
    let titles: Vec<_> = options.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, ["open", "smash"]);

    engine.choose(P, 0).unwrap();
    assert_eq!(engine.state().storage("chest-1").unwrap().capacity(), 4);
    assert!(
        events
            .lock()
            .unwrap()
            .iter()
            .any(|e| matches!(e, GameEvent::StorageOpened { .. }))
    );

    let moved = engine
        .transfer(&inv(0), &StackLocation::storage("chest-1", 0), None)
        .unwrap();
    assert_eq!(moved, TransferOutcome::Moved(5));
    assert_eq!(engine.state().inventory(P).unwrap().count("stone"), 0);

    engine.interact(Interaction::new(P).on_object(chest())).unwrap();
    engine.choose(P, 1).unwrap();

    assert!(engine.state().storage("chest-1").is_none());
    assert_eq!(engine.state().total_quantity("stone"), 5);
    let dropped: Vec<_> = engine.state().world_drops().collect();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].1.quantity, 5);
    assert!(
        events
            .lock()
            .unwrap()
            .iter()
            .any(|e| matches!(e, GameEvent::RemoveObjectRequested { uid } if uid.as_str() == "chest-1"))
    );
}

#[test]
fn choosing_without_a_menu_or_out_of_range_fails() {
    let mut engine = engine(&[]);
    assert!(matches!(
        engine.choose(P, 0),
        Err(ExecuteError::NoChoicePending(_))
    ));

    engine.interact(Interaction::new(P).on_object(chest())).unwrap();
    assert!(matches!(
        engine.choose(P, 7),
        Err(ExecuteError::InvalidChoice { index: 7, .. })
    ));
    // The menu survives a bad index.
    assert!(engine.choose(P, 0).is_ok());
}

#[test]
fn timed_craft_rechecks_ingredients_when_due() {
    let mut engine = engine(&[("log", 3)]);
    let events = record(&mut engine);

    let outcome = engine.craft(P, "campfire").unwrap();
    assert!(matches!(outcome, CraftOutcome::Started { .. }));
    engine.drop_item(&inv(0), Some(1)).unwrap();

    engine.tick(5.0);
    assert_eq!(engine.state().inventory(P).unwrap().count("log"), 2);
    let events = events.lock().unwrap();
    assert_eq!(cancellations(&events), [CancelReason::Invalidated]);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, GameEvent::PlaceObjectRequested { .. }))
    );
}

#[test]
fn timed_craft_places_its_object_when_due() {
    let mut engine = engine(&[("log", 3)]);
    let events = record(&mut engine);

    engine.craft(P, "campfire").unwrap();
    engine.tick(4.0);
    assert_eq!(engine.state().total_quantity("log"), 3);

    engine.tick(1.0);
    assert_eq!(engine.state().total_quantity("log"), 0);
    assert!(events.lock().unwrap().iter().any(|e| matches!(
        e,
        GameEvent::PlaceObjectRequested { object, .. } if object.as_str() == "campfire"
    )));
}

#[test]
fn instant_craft_consumes_and_produces() {
    let mut engine = engine(&[("stone", 3), ("log", 1)]);
    assert_eq!(engine.craftable_recipes(P), vec![RecipeId::from("stone_axe")]);

    let outcome = engine.craft(P, "stone_axe").unwrap();
    assert!(matches!(outcome, CraftOutcome::Completed(_)));

    let state = engine.state();
    assert_eq!(state.total_quantity("stone"), 1);
    assert_eq!(state.total_quantity("log"), 0);
    assert_eq!(state.total_quantity("axe"), 1);
}

#[test]
fn spoilage_reverts_exactly_once() {
    let config = GameConfig::default().with_time_multiplier(3600.0);
    let mut engine = engine_with(world(), config, &[("waterskin", 1)]);
    let events = record(&mut engine);

    for _ in 0..4 {
        engine.tick(1.0);
    }

    let exhausted = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, GameEvent::StackExhausted { .. }))
        .count();
    assert_eq!(exhausted, 1);
    let inventory = engine.state().inventory(P).unwrap();
    assert_eq!(inventory.count("waterskin"), 0);
    assert_eq!(inventory.count("waterskin_empty"), 1);
}

#[test]
fn idle_wielded_tool_returns_to_the_inventory() {
    let mut engine = engine(&[("machete", 1)]);
    let events = record(&mut engine);

    let outcome = engine.interact(Interaction::new(P).using(inv(0))).unwrap();
    assert!(matches!(outcome, InteractOutcome::Choices(ref options) if options.len() == 1));
    engine.choose(P, 0).unwrap();

    let hand = StackLocation::equipment(P, EquipSlot::Hand);
    assert_eq!(engine.state().stack(&hand).unwrap().item.as_str(), "machete");

    engine.tick(6.0);
    assert!(engine.state().stack(&hand).is_some());
    engine.tick(6.0);
    assert!(engine.state().stack(&hand).is_none());
    assert_eq!(engine.state().inventory(P).unwrap().count("machete"), 1);
    assert!(events.lock().unwrap().iter().any(|e| matches!(
        e,
        GameEvent::WieldExpired {
            slot: EquipSlot::Hand,
            ..
        }
    )));
}

#[test]
fn equip_swaps_single_units_and_conserves_items() {
    let mut engine = engine(&[("machete", 1), ("axe", 1), ("stone", 4)]);
    let hand = StackLocation::equipment(P, EquipSlot::Hand);

    let first = engine.equip(P, &inv(0)).unwrap();
    assert_eq!(
        first,
        EquipOutcome::Equipped {
            slot: EquipSlot::Hand
        }
    );
    assert!(engine.state().stack(&inv(0)).is_none());

    let second = engine.equip(P, &inv(1)).unwrap();
    assert!(matches!(second, EquipOutcome::Swapped { ref previous, .. } if previous.item.as_str() == "machete"));
    assert_eq!(engine.state().stack(&hand).unwrap().item.as_str(), "axe");
    assert_eq!(engine.state().stack(&inv(1)).unwrap().item.as_str(), "machete");

    let refused = engine.equip(P, &inv(2));
    assert!(matches!(
        refused,
        Err(ExecuteError::Container(ContainerError::NotEquippable(_)))
    ));

    for item in ["machete", "axe"] {
        assert_eq!(engine.state().total_quantity(item), 1);
    }
    assert_eq!(engine.state().total_quantity("stone"), 4);
}

#[test]
fn loading_a_state_drops_in_flight_actions() {
    let mut engine = engine(&[("axe", 1)]);
    engine
        .interact(Interaction::new(P).using(inv(0)).on_object(tree()))
        .unwrap();

    let snapshot = engine.state().clone();
    engine.load_state(snapshot);
    assert!(!engine.is_busy(P));

    engine.tick(3.0);
    assert_eq!(engine.state().total_quantity("log"), 0);
}

#[test]
fn busy_actor_can_still_rearrange_unrelated_stacks() {
    let mut engine = engine(&[("axe", 1), ("stone", 4)]);
    engine
        .interact(Interaction::new(P).using(inv(0)).on_object(tree()))
        .unwrap();

    engine.transfer(&inv(1), &inv(2), Some(2)).unwrap();
    engine.drop_item(&inv(2), Some(1)).unwrap();
    assert!(engine.is_busy(P));

    engine.tick(3.0);
    assert_eq!(engine.state().total_quantity("log"), 2);
    assert_eq!(engine.state().inventory(P).unwrap().count("stone"), 3);
}

#[test]
fn moving_the_bound_tool_cancels_the_pending_action() {
    let mut engine = engine(&[("axe", 1)]);
    let events = record(&mut engine);
    engine
        .interact(Interaction::new(P).using(inv(0)).on_object(tree()))
        .unwrap();

    engine.equip(P, &inv(0)).unwrap();
    assert!(!engine.is_busy(P));
    assert_eq!(
        cancellations(&events.lock().unwrap()),
        [CancelReason::Invalidated]
    );

    engine.tick(3.0);
    assert_eq!(engine.state().total_quantity("log"), 0);
    let hand = StackLocation::equipment(P, EquipSlot::Hand);
    assert_eq!(engine.state().stack(&hand).unwrap().durability, 2.0);
}
