//! Cross-reference checks over a loaded catalog.
//!
//! The engine tolerates dangling ids (they resolve to absent data), so these
//! checks never fail a load. They surface authoring mistakes early as
//! warnings.

use std::collections::BTreeSet;

use survival_core::{
    ActionEffect, ActionHandler, Catalog, Condition, ExhaustBehavior, GroupTag, ItemId,
    ItemOracle, ObjectDefId, ObjectLink, ObjectOracle, RecipeOracle, RecipeOutput,
};

/// One authoring problem found in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogIssue {
    #[error("{owner} references unknown item '{item}'")]
    UnknownItem { owner: String, item: ItemId },

    #[error("{owner} references unknown world object '{object}'")]
    UnknownObject { owner: String, object: ObjectDefId },

    #[error("item '{0}' reverts when exhausted but declares no empty form")]
    MissingEmptyForm(ItemId),

    #[error(
        "item '{item}' stacks to {item_cap} but its empty form '{empty}' only to {empty_cap}"
    )]
    EmptyFormStackCap {
        item: ItemId,
        empty: ItemId,
        item_cap: u32,
        empty_cap: u32,
    },

    #[error("item '{item}' places its {link:?} object but declares none")]
    MissingLink { item: ItemId, link: ObjectLink },

    #[error("{owner} needs group '{group}' that nothing carries")]
    UnmatchedGroup { owner: String, group: GroupTag },
}

/// Collects every issue and logs each one at `warn`.
pub fn validate_catalog(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut checker = Checker {
        catalog,
        groups: carried_groups(catalog),
        issues: Vec::new(),
    };

    for item in catalog.all_definitions() {
        let owner = format!("item '{}'", item.id);
        if let Some(empty) = &item.links.empty_form {
            checker.item(&owner, empty);
            // Reverting a full stack in place would exceed the smaller cap.
            if let Some(form) = catalog.definition(empty.as_str())
                && form.max_stack < item.max_stack
            {
                checker.push(CatalogIssue::EmptyFormStackCap {
                    item: item.id.clone(),
                    empty: empty.clone(),
                    item_cap: item.max_stack,
                    empty_cap: form.max_stack,
                });
            }
        }
        if item.durability.on_exhausted == ExhaustBehavior::RevertToEmptyForm
            && item.links.empty_form.is_none()
        {
            checker.push(CatalogIssue::MissingEmptyForm(item.id.clone()));
        }
        for object in [&item.links.sowable, &item.links.buildable].into_iter().flatten() {
            checker.object(&owner, object);
        }

        for handler in &item.actions {
            let owner = format!("item '{}' handler '{}'", item.id, handler.id());
            checker.handler(&owner, handler);
            for effect in handler.effects() {
                if let ActionEffect::PlaceLinked(link) = effect {
                    let declared = match link {
                        ObjectLink::Sowable => item.links.sowable.is_some(),
                        ObjectLink::Buildable => item.links.buildable.is_some(),
                    };
                    if !declared {
                        checker.push(CatalogIssue::MissingLink {
                            item: item.id.clone(),
                            link: *link,
                        });
                    }
                }
            }
        }
    }

    for recipe in catalog.all_recipes() {
        let owner = format!("recipe '{}'", recipe.id);
        for ingredient in &recipe.items {
            checker.item(&owner, &ingredient.item);
        }
        match &recipe.output {
            RecipeOutput::Item { item, .. } => checker.item(&owner, item),
            RecipeOutput::WorldObject { object } => checker.object(&owner, object),
            RecipeOutput::Unlock { .. } => {}
        }
        if let Some(group) = &recipe.near_group {
            checker.group(&owner, group);
        }
    }

    for object in catalog.objects() {
        for handler in &object.actions {
            let owner = format!("object '{}' handler '{}'", object.id, handler.id());
            checker.handler(&owner, handler);
        }
    }

    for issue in &checker.issues {
        tracing::warn!(%issue, "catalog issue");
    }
    checker.issues
}

fn carried_groups(catalog: &Catalog) -> BTreeSet<GroupTag> {
    let items = catalog
        .all_definitions()
        .into_iter()
        .flat_map(|item| item.groups.iter().cloned());
    let objects = catalog
        .objects()
        .flat_map(|object| object.groups.iter().cloned());
    items.chain(objects).collect()
}

struct Checker<'a> {
    catalog: &'a Catalog,
    groups: BTreeSet<GroupTag>,
    issues: Vec<CatalogIssue>,
}

impl Checker<'_> {
    fn push(&mut self, issue: CatalogIssue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    fn item(&mut self, owner: &str, item: &ItemId) {
        if self.catalog.definition(item.as_str()).is_none() {
            self.push(CatalogIssue::UnknownItem {
                owner: owner.to_owned(),
                item: item.clone(),
            });
        }
    }

    fn object(&mut self, owner: &str, object: &ObjectDefId) {
        if self.catalog.object_definition(object.as_str()).is_none() {
            self.push(CatalogIssue::UnknownObject {
                owner: owner.to_owned(),
                object: object.clone(),
            });
        }
    }

    fn group(&mut self, owner: &str, group: &GroupTag) {
        if !self.groups.contains(group) {
            self.push(CatalogIssue::UnmatchedGroup {
                owner: owner.to_owned(),
                group: group.clone(),
            });
        }
    }

    fn handler(&mut self, owner: &str, handler: &ActionHandler) {
        for group in handler.target_groups() {
            self.group(owner, group);
        }
        for condition in handler.conditions() {
            self.condition(owner, condition);
        }
        for effect in handler.effects() {
            match effect {
                ActionEffect::ConvertSource { into } | ActionEffect::ConvertTarget { into } => {
                    self.item(owner, into)
                }
                ActionEffect::Produce { item, .. } => self.item(owner, item),
                ActionEffect::PlaceObject { object } => self.object(owner, object),
                _ => {}
            }
        }
    }

    fn condition(&mut self, owner: &str, condition: &Condition) {
        match condition {
            Condition::HasItem { item, .. } => self.item(owner, item),
            Condition::Near(group) => self.group(owner, group),
            Condition::Not(inner) => self.condition(owner, inner),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survival_core::{
        DurabilitySpec, ItemDefinition, MergeAction, RecipeDefinition, SelfAction,
        WorldObjectDefinition,
    };

    #[test]
    fn clean_catalog_has_no_issues() {
        let catalog = Catalog::new(
            vec![
                ItemDefinition::new("log", "Log", 10).with_groups(["wood"]),
                ItemDefinition::new("axe", "Axe", 1).with_action(
                    MergeAction::new("chop", ["tree"])
                        .then(ActionEffect::Produce {
                            item: "log".into(),
                            quantity: 1,
                        })
                        .into_merge(),
                ),
            ],
            vec![
                RecipeDefinition::new(
                    "fire",
                    RecipeOutput::WorldObject {
                        object: "campfire".into(),
                    },
                )
                .with_item("log", 3),
            ],
            vec![
                WorldObjectDefinition::new("tree", "Tree").with_groups(["tree"]),
                WorldObjectDefinition::new("campfire", "Campfire"),
            ],
        )
        .unwrap();
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn dangling_references_are_reported_once() {
        let catalog = Catalog::new(
            vec![
                ItemDefinition::new("flask", "Flask", 1)
                    .with_durability(DurabilitySpec::spoilage(2.0, 1.0).reverting()),
                ItemDefinition::new("seed", "Seed", 10).with_action(
                    SelfAction::new("sow")
                        .then(ActionEffect::PlaceLinked(ObjectLink::Sowable))
                        .then(ActionEffect::Produce {
                            item: "husk".into(),
                            quantity: 1,
                        })
                        .then(ActionEffect::Produce {
                            item: "husk".into(),
                            quantity: 1,
                        })
                        .into_handler(),
                ),
            ],
            vec![RecipeDefinition::new(
                "oven",
                RecipeOutput::WorldObject {
                    object: "oven".into(),
                },
            )
            .near("forge")],
            Vec::new(),
        )
        .unwrap();

        let issues = validate_catalog(&catalog);
        assert_eq!(issues.len(), 5, "{issues:?}");
        assert!(issues.contains(&CatalogIssue::MissingEmptyForm("flask".into())));
        assert!(issues.contains(&CatalogIssue::MissingLink {
            item: "seed".into(),
            link: ObjectLink::Sowable,
        }));
        assert!(issues.contains(&CatalogIssue::UnknownItem {
            owner: "item 'seed' handler 'sow'".into(),
            item: "husk".into(),
        }));
        assert!(issues.contains(&CatalogIssue::UnknownObject {
            owner: "recipe 'oven'".into(),
            object: "oven".into(),
        }));
        assert!(issues.contains(&CatalogIssue::UnmatchedGroup {
            owner: "recipe 'oven'".into(),
            group: "forge".into(),
        }));
    }

    #[test]
    fn smaller_empty_form_cap_is_reported() {
        let catalog = Catalog::new(
            vec![
                ItemDefinition::new("jar", "Jar of honey", 10)
                    .with_durability(DurabilitySpec::spoilage(1.0, 1.0).reverting())
                    .with_empty_form("empty_jar"),
                ItemDefinition::new("empty_jar", "Empty jar", 2),
            ],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();

        assert_eq!(
            validate_catalog(&catalog),
            [CatalogIssue::EmptyFormStackCap {
                item: "jar".into(),
                empty: "empty_jar".into(),
                item_cap: 10,
                empty_cap: 2,
            }]
        );
    }
}
