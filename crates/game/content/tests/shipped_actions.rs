//! Drives the shipped item and object handlers through the engine.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use survival_content::ContentFactory;
use survival_core::{
    ActorId, CancelReason, Catalog, GameConfig, GameEngine, GameEvent, InteractOutcome,
    Interaction, ItemOracle, ObjectOracle, ObjectUid, PlayerData, StackLocation, StaticWorld,
    WorldObjectRef,
};

const P: ActorId = ActorId::PLAYER;

struct Session {
    engine: GameEngine,
    world: Arc<StaticWorld>,
    events: Arc<Mutex<Vec<GameEvent>>>,
}

fn shipped() -> (Catalog, GameConfig) {
    let factory = ContentFactory::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"));
    (factory.load_catalog().unwrap(), factory.load_config().unwrap())
}

/// Engine over the shipped content with `items` in the player's inventory.
fn session_with(
    objects: &[(&str, &str, f32)],
    items: &[(&str, u32)],
    tweak: impl FnOnce(&mut PlayerData),
) -> Session {
    let (catalog, config) = shipped();
    let mut state = PlayerData::new(&config);
    for (item, quantity) in items {
        let def = catalog.definition(item).unwrap();
        state
            .give(P, def, *quantity, def.initial_durability())
            .unwrap();
    }
    tweak(&mut state);

    let world = Arc::new(StaticWorld::new());
    for (uid, object, distance) in objects {
        let groups = catalog.object_definition(object).unwrap().groups.clone();
        world.place(WorldObjectRef::new(*uid, *object), groups, *distance);
    }

    let mut engine =
        GameEngine::new(Arc::new(catalog), world.clone(), config).with_state(state);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    engine.subscribe(move |event: &GameEvent| sink.lock().unwrap().push(event.clone()));
    Session {
        engine,
        world,
        events,
    }
}

fn session(objects: &[(&str, &str, f32)], items: &[(&str, u32)]) -> Session {
    session_with(objects, items, |_| {})
}

fn inv(slot: u16) -> StackLocation {
    StackLocation::inventory(P, slot)
}

fn use_alone(engine: &mut GameEngine, slot: u16) -> InteractOutcome {
    let outcome = engine.interact(Interaction::new(P).using(inv(slot))).unwrap();
    assert!(
        matches!(outcome, InteractOutcome::Choices(ref options) if options.len() == 1),
        "expected a one-entry menu, got {outcome:?}"
    );
    engine.choose(P, 0).unwrap()
}

#[test]
fn sowing_the_last_seed_places_a_bush() {
    let mut s = session(&[], &[("berry_seed", 1)]);

    let outcome = use_alone(&mut s.engine, 0);
    assert!(matches!(outcome, InteractOutcome::Completed { .. }));
    assert_eq!(s.engine.state().total_quantity("berry_seed"), 0);
    assert!(s.events.lock().unwrap().iter().any(|e| matches!(
        e,
        GameEvent::PlaceObjectRequested { object, .. } if object.as_str() == "berry_bush"
    )));
}

#[test]
fn sowing_from_a_stack_keeps_the_rest() {
    let mut s = session(&[], &[("berry_seed", 3)]);

    use_alone(&mut s.engine, 0);
    assert_eq!(s.engine.state().total_quantity("berry_seed"), 2);
}

#[test]
fn drinking_restores_thirst_and_empties_the_waterskin() {
    let mut s = session_with(&[], &[("waterskin", 1)], |state| {
        state.actor_mut(P).unwrap().attributes.thirst = 50.0;
    });

    use_alone(&mut s.engine, 0);
    let state = s.engine.state();
    assert_eq!(state.actor(P).unwrap().attributes.thirst, 90.0);
    assert_eq!(state.total_quantity("waterskin"), 0);
    assert_eq!(state.stack(&inv(0)).unwrap().item.as_str(), "waterskin_empty");
}

#[test]
fn a_quenched_player_is_offered_nothing_to_drink() {
    let mut s = session(&[], &[("waterskin", 1)]);

    let outcome = s.engine.interact(Interaction::new(P).using(inv(0))).unwrap();
    assert_eq!(outcome, InteractOutcome::NoOp);
}

#[test]
fn filling_at_the_stream_takes_time() {
    let mut s = session(&[("stream-1", "stream", 1.0)], &[("waterskin_empty", 1)]);

    let outcome = s
        .engine
        .interact(
            Interaction::new(P)
                .using(inv(0))
                .on_object(WorldObjectRef::new("stream-1", "stream")),
        )
        .unwrap();
    assert!(matches!(outcome, InteractOutcome::Started { .. }));

    s.engine.tick(1.0);
    assert_eq!(s.engine.state().total_quantity("waterskin"), 0);
    s.engine.tick(0.5);
    assert_eq!(s.engine.state().total_quantity("waterskin"), 1);
    assert_eq!(s.engine.state().total_quantity("waterskin_empty"), 0);
}

#[test]
fn shaking_the_palm_tree_needs_no_tool() {
    let mut s = session(&[("tree-1", "palm_tree", 1.0)], &[]);

    let outcome = s
        .engine
        .interact(Interaction::new(P).on_object(WorldObjectRef::new("tree-1", "palm_tree")))
        .unwrap();
    assert!(matches!(outcome, InteractOutcome::Started { .. }));

    s.engine.tick(1.0);
    assert_eq!(s.engine.state().total_quantity("coconut"), 1);
}

#[test]
fn cooking_needs_a_fire_within_range() {
    let mut s = session(&[("fire-1", "campfire", 10.0)], &[("raw_fish", 2)]);

    let outcome = s.engine.interact(Interaction::new(P).using(inv(0))).unwrap();
    assert_eq!(outcome, InteractOutcome::NoOp);

    s.world.set_distance(&ObjectUid::from("fire-1"), 1.0);
    let outcome = use_alone(&mut s.engine, 0);
    assert!(matches!(outcome, InteractOutcome::Started { .. }));
    s.engine.tick(4.0);
    assert_eq!(s.engine.state().total_quantity("cooked_fish"), 2);
    assert_eq!(s.engine.state().total_quantity("raw_fish"), 0);
}

#[test]
fn a_fire_moved_away_mid_cook_spoils_the_action() {
    let mut s = session(&[("fire-1", "campfire", 1.0)], &[("raw_fish", 1)]);

    use_alone(&mut s.engine, 0);
    s.world.set_distance(&ObjectUid::from("fire-1"), 10.0);
    s.engine.tick(4.0);

    assert!(!s.engine.is_busy(P));
    assert_eq!(s.engine.state().total_quantity("raw_fish"), 1);
    assert!(s.events.lock().unwrap().iter().any(|e| matches!(
        e,
        GameEvent::ActionCancelled {
            reason: CancelReason::Invalidated,
            ..
        }
    )));
}

#[test]
fn the_journal_can_only_be_read_once() {
    let mut s = session(&[], &[("journal", 1)]);

    use_alone(&mut s.engine, 0);
    assert!(s.engine.state().is_unlocked("shelter_plans"));
    assert_eq!(s.engine.state().counter("pages_read"), 1);

    let again = s.engine.interact(Interaction::new(P).using(inv(0))).unwrap();
    assert_eq!(again, InteractOutcome::NoOp);
    assert_eq!(s.engine.state().counter("pages_read"), 1);
}

#[test]
fn eating_the_last_berry_clears_the_slot() {
    let mut s = session_with(&[], &[("berries", 1)], |state| {
        state.actor_mut(P).unwrap().attributes.hunger = 50.0;
    });

    use_alone(&mut s.engine, 0);
    let state = s.engine.state();
    assert_eq!(state.total_quantity("berries"), 0);
    assert!(state.stack(&inv(0)).is_none());
    assert_eq!(state.actor(P).unwrap().attributes.hunger, 55.0);
}
