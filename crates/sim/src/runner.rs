//! Drives a [`GameEngine`] through a script.
//!
//! The runner also plays the world collaborator: it answers placement and
//! removal requests raised by the engine against a [`StaticWorld`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use survival_core::{
    ActorId, Catalog, ContainerRef, DropId, ExecuteError, GameConfig, GameEngine, GameError,
    GameEvent, Interaction, ItemOracle, ObjectDefId, ObjectOracle, ObjectUid, PlayerData,
    StaticWorld, WorldObjectRef, WorldOracle,
};

use crate::script::{Script, ScriptObject, Step};

const PLAYER: ActorId = ActorId::PLAYER;

/// What the world collaborator was asked to do.
#[derive(Clone, Debug, PartialEq)]
enum WorldRequest {
    Place(ObjectDefId),
    Remove(ObjectUid),
}

/// Outcome counters of one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub rejected: usize,
    pub events: usize,
}

pub struct Runner {
    engine: GameEngine,
    world: Arc<StaticWorld>,
    catalog: Arc<Catalog>,
    requests: Arc<Mutex<Vec<WorldRequest>>>,
    events: Arc<AtomicUsize>,
    tick: f32,
    placed: u32,
}

impl Runner {
    /// Builds the session. A fresh run seeds the script's start items; a
    /// resumed run keeps the loaded inventory as is.
    pub fn new(
        catalog: Arc<Catalog>,
        config: GameConfig,
        script: &Script,
        resumed: Option<PlayerData>,
    ) -> Self {
        let world = Arc::new(StaticWorld::new());
        let state = match resumed {
            Some(state) => state,
            None => seeded_state(&catalog, &config, script),
        };

        let mut engine =
            GameEngine::new(Arc::clone(&catalog), world.clone(), config).with_state(state);

        let requests = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(AtomicUsize::new(0));
        let (request_sink, event_count) = (Arc::clone(&requests), Arc::clone(&events));
        engine.subscribe(move |event: &GameEvent| {
            log_event(event);
            event_count.fetch_add(1, Ordering::Relaxed);
            let request = match event {
                GameEvent::PlaceObjectRequested { object, .. } => {
                    WorldRequest::Place(object.clone())
                }
                GameEvent::RemoveObjectRequested { uid } => WorldRequest::Remove(uid.clone()),
                _ => return,
            };
            request_sink
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);
        });

        let mut runner = Self {
            engine,
            world,
            catalog,
            requests,
            events,
            tick: script.tick,
            placed: 0,
        };
        for object in &script.world {
            runner.place(object);
        }
        runner
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn world(&self) -> &StaticWorld {
        &self.world
    }

    pub fn into_state(self) -> PlayerData {
        self.engine.into_state()
    }

    /// Runs every step in order. Rejected steps are logged and skipped.
    pub fn run(&mut self, steps: &[Step]) -> RunSummary {
        let mut summary = RunSummary::default();
        for (index, step) in steps.iter().enumerate() {
            summary.steps += 1;
            tracing::debug!(index, ?step, "step");
            if let Err(err) = self.step(step) {
                summary.rejected += 1;
                tracing::warn!(
                    index,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    %err,
                    "step rejected"
                );
            }
            self.serve_world_requests();
        }
        summary.events = self.events.load(Ordering::Relaxed);
        summary
    }

    fn step(&mut self, step: &Step) -> Result<(), ExecuteError> {
        match step {
            Step::Use(slot) => {
                let interaction = Interaction::new(PLAYER).using(slot.location(PLAYER));
                self.engine.interact(interaction)?;
            }
            Step::UseOn(primary, target) => {
                let interaction = Interaction::new(PLAYER)
                    .using(primary.location(PLAYER))
                    .on_stack(target.location(PLAYER));
                self.engine.interact(interaction)?;
            }
            Step::UseOnObject { using, object } => {
                let Some(target) = self.world.object(&ObjectUid::from(object.as_str())) else {
                    tracing::warn!(%object, "no such object in the world");
                    return Ok(());
                };
                let mut interaction = Interaction::new(PLAYER).on_object(target);
                if let Some(slot) = using {
                    interaction = interaction.using(slot.location(PLAYER));
                }
                self.engine.interact(interaction)?;
            }
            Step::Choose(index) => {
                self.engine.choose(PLAYER, *index)?;
            }
            Step::Craft(recipe) => {
                self.engine.craft(PLAYER, recipe.as_str())?;
            }
            Step::Equip(slot) => {
                self.engine.equip(PLAYER, &slot.location(PLAYER))?;
            }
            Step::Unequip(slot) => {
                self.engine
                    .unequip(PLAYER, *slot, &ContainerRef::Inventory(PLAYER))?;
            }
            Step::Transfer { from, to, quantity } => {
                self.engine
                    .transfer(&from.location(PLAYER), &to.location(PLAYER), *quantity)?;
            }
            Step::Split(slot, quantity) => {
                self.engine.split(&slot.location(PLAYER), *quantity)?;
            }
            Step::Drop(slot, quantity) => {
                self.engine.drop_item(&slot.location(PLAYER), *quantity)?;
            }
            Step::PickUpAll => {
                let drops: Vec<DropId> = self
                    .engine
                    .state()
                    .world_drops()
                    .map(|(id, _)| id)
                    .collect();
                for drop in drops {
                    self.engine.pick_up(PLAYER, drop)?;
                }
            }
            Step::Move => {
                self.engine.actor_moved(PLAYER);
            }
            Step::Cancel => {
                self.engine.cancel(PLAYER);
            }
            Step::Destroy(uid) => {
                let uid = ObjectUid::from(uid.as_str());
                if self.world.remove(&uid) {
                    self.engine.object_destroyed(&uid);
                }
            }
            Step::Place(object) => self.place(object),
            Step::Wait(seconds) => self.wait(*seconds),
        }
        Ok(())
    }

    /// Ticks in fixed steps until `seconds` of simulated time have passed.
    fn wait(&mut self, seconds: f32) {
        let seconds = seconds.max(0.0);
        let whole = (seconds / self.tick).floor() as u32;
        let remainder = seconds - whole as f32 * self.tick;
        for _ in 0..whole {
            self.engine.tick(self.tick);
            self.serve_world_requests();
        }
        if remainder > f32::EPSILON {
            self.engine.tick(remainder);
            self.serve_world_requests();
        }
    }

    fn place(&mut self, object: &ScriptObject) {
        let Some(definition) = self.catalog.object_definition(object.object.as_str()) else {
            tracing::warn!(object = %object.object, "cannot place unknown world object");
            return;
        };
        self.world.place(
            WorldObjectRef::new(object.uid.as_str(), definition.id.clone()),
            definition.groups.iter().cloned(),
            object.distance,
        );
        tracing::info!(uid = %object.uid, object = %object.object, "placed");
    }

    fn serve_world_requests(&mut self) {
        let requests =
            std::mem::take(&mut *self.requests.lock().unwrap_or_else(PoisonError::into_inner));
        for request in requests {
            match request {
                WorldRequest::Place(object) => {
                    self.placed += 1;
                    let uid = format!("{object}-{}", self.placed);
                    self.place(&ScriptObject {
                        uid,
                        object,
                        distance: 1.0,
                    });
                }
                WorldRequest::Remove(uid) => {
                    if self.world.remove(&uid) {
                        tracing::info!(%uid, "removed");
                    }
                    self.engine.object_destroyed(&uid);
                }
            }
        }
    }

    /// Logs the player's carried items and attributes.
    pub fn log_summary(&self) {
        let state = self.engine.state();
        let Some(player) = state.actor(PLAYER) else {
            return;
        };
        for (slot, stack) in player.inventory.iter() {
            let title = self
                .catalog
                .definition(stack.item.as_str())
                .map_or(stack.item.as_str(), |def| def.title.as_str());
            tracing::info!(%slot, item = title, quantity = stack.quantity, durability = stack.durability, "inventory");
        }
        for (slot, stack) in player.equipment.iter() {
            tracing::info!(%slot, item = %stack.item, durability = stack.durability, "equipped");
        }
        let a = &player.attributes;
        tracing::info!(
            health = a.health,
            hunger = a.hunger,
            thirst = a.thirst,
            energy = a.energy,
            play_time = state.play_time.seconds(),
            "attributes"
        );
    }
}

fn seeded_state(catalog: &Catalog, config: &GameConfig, script: &Script) -> PlayerData {
    let mut state = PlayerData::new(config);
    for (item, quantity) in &script.start {
        let Some(def) = catalog.definition(item.as_str()) else {
            tracing::warn!(%item, "unknown start item skipped");
            continue;
        };
        if let Err(err) = state.give_or_drop(PLAYER, def, *quantity, def.initial_durability()) {
            tracing::warn!(%item, %err, "start item not given");
        }
    }
    state
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::StackChanged { .. } => tracing::trace!(?event, "event"),
        _ => tracing::info!(?event, "event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use survival_content::ContentFactory;

    fn catalog() -> Arc<Catalog> {
        let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../game/content/data");
        Arc::new(ContentFactory::new(data).load_catalog().unwrap())
    }

    fn script(text: &str) -> Script {
        Script::parse(text).unwrap()
    }

    #[test]
    fn crafted_campfire_is_placed_into_the_world() {
        let script = script(
            r#"(
                start: [("log", 2), ("stick", 2), ("stone", 3)],
                steps: [Craft("campfire"), Wait(5.0)],
            )"#,
        );
        let mut runner = Runner::new(catalog(), GameConfig::default(), &script, None);
        let summary = runner.run(&script.steps);

        assert_eq!(summary.rejected, 0);
        assert_eq!(runner.world().len(), 1);
        assert!(runner.world().object(&ObjectUid::from("campfire-1")).is_some());
        assert_eq!(runner.engine().state().total_quantity("log"), 0);
    }

    #[test]
    fn dismantling_a_chest_removes_it_from_the_world() {
        let script = script(
            r#"(
                world: [(uid: "chest-1", object: "chest")],
                start: [("stone", 4)],
                steps: [
                    UseOnObject(using: None, object: "chest-1"),
                    Choose(0),
                    Transfer(from: Inventory(0), to: Storage("chest-1", 0)),
                    UseOnObject(using: None, object: "chest-1"),
                    Choose(1),
                    Wait(3.0),
                    PickUpAll,
                ],
            )"#,
        );
        let mut runner = Runner::new(catalog(), GameConfig::default(), &script, None);
        let summary = runner.run(&script.steps);

        assert_eq!(summary.rejected, 0);
        assert!(runner.world().is_empty());
        let state = runner.engine().state();
        assert!(state.storage("chest-1").is_none());
        assert_eq!(state.inventory(PLAYER).unwrap().count("stone"), 4);
        assert_eq!(state.inventory(PLAYER).unwrap().count("log"), 2);
    }

    #[test]
    fn rejected_steps_are_counted_and_skipped() {
        let script = script(r#"(steps: [Choose(0), Craft("rope"), Use(Inventory(3))])"#);
        let mut runner = Runner::new(catalog(), GameConfig::default(), &script, None);
        let summary = runner.run(&script.steps);
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.rejected, 2);
    }

    #[test]
    fn resumed_state_skips_the_start_items() {
        let dir = tempfile::tempdir().unwrap();
        let store = survival_content::SaveStore::new(dir.path()).unwrap();
        let script = script(r#"(start: [("fiber", 3)], steps: [Craft("rope")])"#);

        let mut first = Runner::new(catalog(), GameConfig::default(), &script, None);
        assert_eq!(first.run(&script.steps).rejected, 0);
        store.save("run", &first.into_state()).unwrap();

        let resumed = store.load("run").unwrap();
        let mut second = Runner::new(catalog(), GameConfig::default(), &script, resumed);
        assert_eq!(second.engine().state().total_quantity("fiber"), 0);
        assert_eq!(second.engine().state().total_quantity("rope"), 1);
        assert_eq!(second.run(&script.steps).rejected, 1);
    }
}
