#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use survival_core::{
    ActionEffect, ActorId, AttributeKind, Catalog, DurabilitySpec, EquipSlot, GameConfig,
    GameEngine, GameEvent, GroupTag, ItemDefinition, ItemOracle, MergeAction, PlayerData,
    RecipeDefinition, RecipeOutput, SelfAction, StackLocation, StaticWorld, WorldObjectDefinition,
    WorldObjectRef,
};

pub const P: ActorId = ActorId::PLAYER;

pub fn catalog() -> Catalog {
    Catalog::new(
        vec![
            ItemDefinition::new("stone", "Stone", 20).with_groups(["stone"]),
            ItemDefinition::new("coconut", "Coconut", 5)
                .with_groups(["fruit", "coconut"])
                .with_action(
                    SelfAction::new("eat")
                        .then(ActionEffect::RestoreAttribute {
                            attribute: AttributeKind::Hunger,
                            amount: 10.0,
                        })
                        .then(ActionEffect::ConsumeSource { quantity: 1 })
                        .into_handler(),
                ),
            ItemDefinition::new("coconut_half", "Coconut half", 10).with_groups(["food"]),
            ItemDefinition::new("machete", "Machete", 1)
                .with_equip_slot(EquipSlot::Hand)
                .with_durability(DurabilitySpec::usage_count(3.0))
                .with_groups(["blade", "tool"])
                .with_action(
                    MergeAction::new("cut", ["coconut"])
                        .then(ActionEffect::ConsumeTarget { quantity: 1 })
                        .then(ActionEffect::Produce {
                            item: "coconut_half".into(),
                            quantity: 2,
                        })
                        .then(ActionEffect::UseSource)
                        .into_merge(),
                )
                .with_action(
                    SelfAction::new("wield")
                        .then(ActionEffect::WieldSource)
                        .into_handler(),
                ),
            ItemDefinition::new("axe", "Axe", 1)
                .with_equip_slot(EquipSlot::Hand)
                .with_durability(DurabilitySpec::usage_count(2.0))
                .with_groups(["tool"])
                .with_action(
                    MergeAction::new("chop", ["tree"])
                        .then(ActionEffect::UseSource)
                        .then(ActionEffect::Produce {
                            item: "log".into(),
                            quantity: 2,
                        })
                        .taking(3.0)
                        .into_merge(),
                ),
            ItemDefinition::new("log", "Log", 10).with_groups(["wood"]),
            ItemDefinition::new("waterskin", "Waterskin", 1)
                .with_durability(DurabilitySpec::spoilage(3.0, 1.0).reverting())
                .with_empty_form("waterskin_empty"),
            ItemDefinition::new("waterskin_empty", "Empty waterskin", 1),
        ],
        vec![
            RecipeDefinition::new(
                "stone_axe",
                RecipeOutput::Item {
                    item: "axe".into(),
                    quantity: 1,
                },
            )
            .with_item("stone", 2)
            .with_item("log", 1),
            RecipeDefinition::new(
                "campfire",
                RecipeOutput::WorldObject {
                    object: "campfire".into(),
                },
            )
            .with_item("log", 3)
            .with_duration(5.0),
        ],
        vec![
            WorldObjectDefinition::new("tree", "Tree")
                .with_groups(["tree"])
                .with_action(
                    MergeAction::new("shake", Vec::<GroupTag>::new())
                        .then(ActionEffect::Produce {
                            item: "coconut".into(),
                            quantity: 1,
                        })
                        .into_auto(),
                ),
            WorldObjectDefinition::new("chest", "Chest")
                .with_groups(["container"])
                .with_storage(4)
                .with_action(
                    SelfAction::new("open")
                        .then(ActionEffect::OpenStorage)
                        .into_handler(),
                )
                .with_action(
                    SelfAction::new("smash")
                        .then(ActionEffect::RemoveObject)
                        .into_handler(),
                ),
            WorldObjectDefinition::new("campfire", "Campfire").with_groups(["fire"]),
        ],
    )
    .unwrap()
}

/// Fresh player state holding `items`, given in order.
pub fn seeded(catalog: &Catalog, config: &GameConfig, items: &[(&str, u32)]) -> PlayerData {
    let mut data = PlayerData::new(config);
    for (item, quantity) in items {
        let def = catalog.definition(item).unwrap();
        data.give(P, def, *quantity, def.initial_durability())
            .unwrap();
    }
    data
}

pub fn tree() -> WorldObjectRef {
    WorldObjectRef::new("tree-1", "tree")
}

pub fn chest() -> WorldObjectRef {
    WorldObjectRef::new("chest-1", "chest")
}

/// World with one tree and one chest next to the player.
pub fn world() -> Arc<StaticWorld> {
    let world = StaticWorld::new();
    world.place(tree(), ["tree"], 1.0);
    world.place(chest(), ["container"], 1.0);
    Arc::new(world)
}

pub fn engine_with(
    world: Arc<StaticWorld>,
    config: GameConfig,
    items: &[(&str, u32)],
) -> GameEngine {
    let catalog = catalog();
    let state = seeded(&catalog, &config, items);
    GameEngine::new(Arc::new(catalog), world, config).with_state(state)
}

pub fn engine(items: &[(&str, u32)]) -> GameEngine {
    engine_with(world(), GameConfig::default(), items)
}

/// Records every published event.
pub fn record(engine: &mut GameEngine) -> Arc<Mutex<Vec<GameEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    engine.subscribe(move |event: &GameEvent| sink.lock().unwrap().push(event.clone()));
    log
}

pub fn inv(slot: u16) -> StackLocation {
    StackLocation::inventory(P, slot)
}
