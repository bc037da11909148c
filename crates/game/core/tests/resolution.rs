mod common;

use common::{P, catalog, chest, inv, seeded, tree};
use survival_core::{
    ActionBinding, ActionError, ActionHandler, EmptyWorld, GameConfig, GameEnv, HandlerKind,
    HandlerOwner, HandlerRef, Interaction, Operand, Resolution, StaticWorld, can_do_action,
    do_action, resolve,
};

fn item_handler(item: &str, index: usize) -> HandlerRef {
    HandlerRef::new(HandlerOwner::Item(item.into()), index)
}

#[test]
fn merge_wins_over_target_auto() {
    let catalog = catalog();
    let config = GameConfig::default();
    let state = seeded(&catalog, &config, &[("axe", 1)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let interaction = Interaction::new(P).using(inv(0)).on_object(tree());
    let Resolution::Merge(action) = resolve(&state, &env, &interaction) else {
        panic!("expected the axe's merge handler");
    };
    assert_eq!(action.handler_ref, item_handler("axe", 0));
    assert_eq!(action.binding.source, Operand::Stack(inv(0)));
    assert_eq!(action.binding.target, Some(Operand::Object(tree())));
}

#[test]
fn auto_applies_when_no_merge_matches() {
    let catalog = catalog();
    let config = GameConfig::default();
    let state = seeded(&catalog, &config, &[("machete", 1)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let interaction = Interaction::new(P).using(inv(0)).on_object(tree());
    let Resolution::Auto(action) = resolve(&state, &env, &interaction) else {
        panic!("expected the tree's auto handler");
    };
    assert_eq!(action.handler.kind(), HandlerKind::Auto);
    assert_eq!(action.binding.source, Operand::Object(tree()));
    assert_eq!(action.binding.target, Some(Operand::Stack(inv(0))));
}

#[test]
fn reverse_merge_binds_target_as_source() {
    let catalog = catalog();
    let config = GameConfig::default();
    let state = seeded(&catalog, &config, &[("coconut", 3), ("machete", 1)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let interaction = Interaction::new(P).using(inv(0)).on_stack(inv(1));
    let Resolution::Merge(action) = resolve(&state, &env, &interaction) else {
        panic!("expected the machete's merge handler");
    };
    assert_eq!(action.handler_ref, item_handler("machete", 0));
    assert_eq!(action.binding.source, Operand::Stack(inv(1)));
    assert_eq!(action.binding.target, Some(Operand::Stack(inv(0))));
}

#[test]
fn target_self_handlers_form_a_menu_in_declaration_order() {
    let catalog = catalog();
    let config = GameConfig::default();
    let state = seeded(&catalog, &config, &[]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let interaction = Interaction::new(P).on_object(chest());
    let Resolution::Menu(options) = resolve(&state, &env, &interaction) else {
        panic!("expected a menu");
    };
    let titles: Vec<_> = options.iter().map(|o| o.title()).collect();
    assert_eq!(titles, ["open", "smash"]);
}

#[test]
fn primary_alone_offers_its_own_self_handlers() {
    let catalog = catalog();
    let config = GameConfig::default();
    let state = seeded(&catalog, &config, &[("coconut", 1)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let Resolution::Menu(options) = resolve(&state, &env, &Interaction::new(P).using(inv(0)))
    else {
        panic!("expected a menu");
    };
    assert_eq!(options.len(), 1);
    assert!(matches!(options[0].handler, ActionHandler::SelfAction(_)));
}

#[test]
fn empty_operand_or_unrelated_pair_resolves_to_nothing() {
    let catalog = catalog();
    let config = GameConfig::default();
    let state = seeded(&catalog, &config, &[("stone", 1), ("log", 1)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let empty = Interaction::new(P).using(inv(9));
    assert!(resolve(&state, &env, &empty).is_none());

    let unrelated = Interaction::new(P).using(inv(0)).on_stack(inv(1));
    assert!(resolve(&state, &env, &unrelated).is_none());
}

#[test]
fn do_action_applies_consumption_and_production_together() {
    let catalog = catalog();
    let config = GameConfig::default();
    let mut state = seeded(&catalog, &config, &[("coconut", 3), ("machete", 1)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let handler = item_handler("machete", 0);
    let binding = ActionBinding::new(P, Operand::Stack(inv(1)), Some(Operand::Stack(inv(0))));
    assert!(can_do_action(&state, &env, &handler, &binding));

    do_action(&mut state, &env, &handler, &binding).unwrap();

    let inventory = state.inventory(P).unwrap();
    assert_eq!(inventory.count("coconut"), 2);
    assert_eq!(inventory.count("coconut_half"), 2);
    assert_eq!(state.stack(&inv(1)).unwrap().durability, 2.0);
}

#[test]
fn failed_effect_rolls_back_earlier_consumption() {
    use survival_core::{ActionEffect, Catalog, ItemDefinition, SelfAction};

    let catalog = Catalog::new(
        vec![ItemDefinition::new("odd_seed", "Odd seed", 5).with_action(
            SelfAction::new("plant")
                .then(ActionEffect::ConsumeSource { quantity: 1 })
                .then(ActionEffect::Produce {
                    item: "ghost".into(),
                    quantity: 1,
                })
                .into_handler(),
        )],
        Vec::new(),
        Vec::new(),
    )
    .unwrap();
    let config = GameConfig::default();
    let mut state = seeded(&catalog, &config, &[("odd_seed", 2)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let handler = item_handler("odd_seed", 0);
    let binding = ActionBinding::new(P, Operand::Stack(inv(0)), None);
    assert!(can_do_action(&state, &env, &handler, &binding));

    let before = state.clone();
    let err = do_action(&mut state, &env, &handler, &binding).unwrap_err();
    assert_eq!(err, ActionError::UnknownItem("ghost".into()));
    assert_eq!(state, before);
    assert_eq!(state.stack(&inv(0)).unwrap().quantity, 2);
}

#[test]
fn oversized_consumption_totals_are_rejected_not_overflowed() {
    use survival_core::{ActionEffect, Catalog, ItemDefinition, SelfAction};

    let catalog = Catalog::new(
        vec![ItemDefinition::new("pebble", "Pebble", 20).with_action(
            SelfAction::new("grind")
                .then(ActionEffect::ConsumeSource { quantity: u32::MAX })
                .then(ActionEffect::ConsumeSource { quantity: u32::MAX })
                .into_handler(),
        )],
        Vec::new(),
        Vec::new(),
    )
    .unwrap();
    let config = GameConfig::default();
    let mut state = seeded(&catalog, &config, &[("pebble", 20)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let handler = item_handler("pebble", 0);
    let binding = ActionBinding::new(P, Operand::Stack(inv(0)), None);
    let err = do_action(&mut state, &env, &handler, &binding).unwrap_err();
    assert!(matches!(
        err,
        ActionError::InsufficientQuantity {
            required: u32::MAX,
            available: 20,
            ..
        }
    ));
    assert_eq!(state.stack(&inv(0)).unwrap().quantity, 20);
}

#[test]
fn handler_bound_to_a_foreign_owner_is_not_applicable() {
    let catalog = catalog();
    let config = GameConfig::default();
    let mut state = seeded(&catalog, &config, &[("coconut", 1), ("machete", 1)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let handler = item_handler("machete", 0);
    let wrong_owner = ActionBinding::new(P, Operand::Stack(inv(0)), Some(Operand::Stack(inv(1))));
    let before = state.clone();
    let err = do_action(&mut state, &env, &handler, &wrong_owner).unwrap_err();
    assert_eq!(err, ActionError::NotApplicable(handler.clone()));
    assert_eq!(state, before);
}

#[test]
fn insufficient_target_quantity_is_rejected_without_mutation() {
    let catalog = catalog();
    let config = GameConfig::default();
    let mut state = seeded(&catalog, &config, &[("machete", 1)]);
    let env = GameEnv::from_catalog(&catalog, &EmptyWorld, &config);

    let handler = item_handler("machete", 0);
    // The target slot is empty.
    let binding = ActionBinding::new(P, Operand::Stack(inv(0)), Some(Operand::Stack(inv(4))));
    assert!(!can_do_action(&state, &env, &handler, &binding));

    let before = state.clone();
    assert!(do_action(&mut state, &env, &handler, &binding).is_err());
    assert_eq!(state, before);
}

#[test]
fn near_condition_uses_the_world_oracle() {
    use survival_core::{ActionEffect, Catalog, Condition, ItemDefinition, SelfAction};

    let catalog = Catalog::new(
        vec![
            ItemDefinition::new("raw_fish", "Raw fish", 5).with_action(
                SelfAction::new("cook")
                    .when(Condition::Near("fire".into()))
                    .then(ActionEffect::ConvertSource {
                        into: "cooked_fish".into(),
                    })
                    .into_handler(),
            ),
            ItemDefinition::new("cooked_fish", "Cooked fish", 5),
        ],
        Vec::new(),
        Vec::new(),
    )
    .unwrap();
    let config = GameConfig::default();
    let mut state = seeded(&catalog, &config, &[("raw_fish", 2)]);
    let handler = item_handler("raw_fish", 0);
    let binding = ActionBinding::new(P, Operand::Stack(inv(0)), None);

    let world = StaticWorld::new();
    let env = GameEnv::from_catalog(&catalog, &world, &config);
    assert!(!can_do_action(&state, &env, &handler, &binding));

    world.place(
        survival_core::WorldObjectRef::new("fire-1", "campfire"),
        ["fire"],
        1.5,
    );
    assert!(can_do_action(&state, &env, &handler, &binding));
    do_action(&mut state, &env, &handler, &binding).unwrap();

    let stack = state.stack(&inv(0)).unwrap();
    assert_eq!(stack.item.as_str(), "cooked_fish");
    assert_eq!(stack.quantity, 2);
}
