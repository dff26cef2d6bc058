//! Entities and their components.
//!
//! The component set is small and closed, so components are a sum type and
//! event dispatch is pattern matching; priority ordering and handler
//! absence fall out of the match. Events are plain records mutated in
//! place as they pass through the component list.

pub mod event;

use std::collections::BTreeSet;

use slotmap::{new_key_type, SlotMap};

use crate::render::color::Color;
use event::{damage, Event};

new_key_type! {
    /// Stable handle into a plane's entity storage.
    pub struct EntityId;
}

/// Handle to one component of one entity, returned by
/// [`EntityStore::add_component`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentId(u64);

/// Dispatch order. Components run in ascending priority value, insertion
/// order within a bucket.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Last,
    Neutral,
    BonusModifier,
    BaseModifier,
    First,
}

#[derive(Clone, Debug)]
pub enum Component {
    /// Visually and physically exist: a glyph to draw, and a place in the
    /// containment tree (held by `superentity`, holding `subentities`).
    Existence {
        glyph: &'static str,
        fg_color: Color,
        superentity: Option<EntityId>,
        subentities: BTreeSet<EntityId>,
    },
    /// Can be hurt.
    Fragility { hp: i32 },
}

impl Component {
    pub fn existence(glyph: &'static str, fg_color: Color) -> Self {
        Component::Existence {
            glyph,
            fg_color,
            superentity: None,
            subentities: BTreeSet::new(),
        }
    }

    pub fn fragility(hp: i32) -> Self {
        Component::Fragility { hp }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Component::Existence { .. } | Component::Fragility { .. } => Priority::Neutral,
        }
    }

    #[allow(dead_code)]
    pub fn name(&self) -> &'static str {
        match self {
            Component::Existence { .. } => "Existence",
            Component::Fragility { .. } => "Fragility",
        }
    }
}

/// A polymorphic actor: an ordered multiset of components.
#[derive(Clone, Debug, Default)]
pub struct Entity {
    /// Sorted by priority ascending; stable within a bucket.
    components: Vec<(ComponentId, Component)>,
}

impl Entity {
    #[allow(dead_code)]
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().map(|(_, c)| c)
    }

    fn index_of(&self, handle: ComponentId) -> Option<usize> {
        self.components.iter().position(|(h, _)| *h == handle)
    }
}

/// Arena for a plane's entities. Like tiles, entities are owned by the
/// plane and live exactly as long as it does.
pub struct EntityStore {
    entities: SlotMap<EntityId, Entity>,
    next_component: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            next_component: 0,
        }
    }

    pub fn spawn(&mut self) -> EntityId {
        self.entities.insert(Entity::default())
    }

    #[allow(dead_code)]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Attach a component, keeping the list sorted by priority with the
    /// newcomer at the end of its bucket.
    pub fn add_component(&mut self, id: EntityId, component: Component) -> ComponentId {
        let handle = ComponentId(self.next_component);
        self.next_component += 1;

        let entity = &mut self.entities[id];
        let pos = entity
            .components
            .partition_point(|(_, c)| c.priority() <= component.priority());
        entity.components.insert(pos, (handle, component));
        handle
    }

    #[allow(dead_code)]
    pub fn remove_component(&mut self, id: EntityId, handle: ComponentId) {
        let entity = &mut self.entities[id];
        if let Some(pos) = entity.index_of(handle) {
            entity.components.remove(pos);
        }
    }

    /// Run `event` through every component of `id` in priority order,
    /// mutating it in place, and hand back the final value.
    pub fn dispatch(&mut self, id: EntityId, mut event: Event) -> Event {
        // Components may mutate their own entity mid-dispatch (MoveTo
        // re-seats the containment tree), so walk a snapshot of handles.
        let handles: Vec<ComponentId> = self.entities[id]
            .components
            .iter()
            .map(|(h, _)| *h)
            .collect();
        for handle in handles {
            self.handle(id, handle, &mut event);
        }
        event
    }

    fn handle(&mut self, id: EntityId, handle: ComponentId, event: &mut Event) {
        let Some(idx) = self.entities[id].index_of(handle) else {
            return; // removed by an earlier handler
        };
        // MoveTo re-dispatches against other entities, so it can't run
        // while a component is borrowed out of the store.
        if matches!(
            (&self.entities[id].components[idx].1, &*event),
            (Component::Existence { .. }, Event::MoveTo { .. })
        ) {
            self.existence_move_to(id, handle, event);
            return;
        }
        match (&mut self.entities[id].components[idx].1, &mut *event) {
            (Component::Existence { glyph, fg_color, .. }, Event::GetRendered { glyph: out, fg_color: fg, .. }) => {
                *out = Some(*glyph);
                *fg = *fg_color;
            }
            (Component::Existence { subentities, .. }, Event::AddSubentity { entity, success, .. }) => {
                if let Some(e) = entity {
                    subentities.insert(*e);
                    *success = true;
                }
            }
            (Component::Existence { subentities, .. }, Event::RemoveSubentity { entity, success, .. }) => {
                if let Some(e) = entity {
                    subentities.remove(e);
                    *success = true;
                }
            }
            (Component::Fragility { hp }, Event::TakeDamage { amount, .. }) => {
                *hp -= *amount;
                log::debug!("damage taken: {amount}, hp remaining: {hp}");
            }
            (Component::Fragility { .. }, Event::DealDamage { amount, kind }) => {
                // Fist!
                *amount = 10;
                *kind |= damage::PHYSICAL | damage::BLUNT;
            }
            _ => {}
        }
    }

    /// Two-phase transaction: leave the current superentity, enter the
    /// destination. If entering fails the origin must take us back; a
    /// failed restore would leave the entity held by nothing, which is an
    /// unrecoverable state.
    fn existence_move_to(&mut self, id: EntityId, handle: ComponentId, event: &mut Event) {
        let Event::MoveTo { dest: Some(dest), force, .. } = *event else {
            return;
        };
        let Some(idx) = self.entities[id].index_of(handle) else {
            return;
        };
        let Component::Existence { superentity: Some(origin), .. } =
            self.entities[id].components[idx].1
        else {
            return; // held by nothing, nowhere to move from
        };

        let rem = self.dispatch(
            origin,
            Event::RemoveSubentity {
                entity: Some(id),
                force,
                success: false,
            },
        );
        if !rem.succeeded() {
            return;
        }

        let add = self.dispatch(
            dest,
            Event::AddSubentity {
                entity: Some(id),
                force,
                success: false,
            },
        );
        if !add.succeeded() {
            let readd = self.dispatch(
                origin,
                Event::AddSubentity {
                    entity: Some(id),
                    force: true,
                    success: false,
                },
            );
            assert!(
                readd.succeeded(),
                "could not add entity to destination, could not return it to origin"
            );
            return;
        }

        if let Some(idx) = self.entities[id].index_of(handle) {
            if let Component::Existence { superentity, .. } =
                &mut self.entities[id].components[idx].1
            {
                *superentity = Some(dest);
            }
        }
        if let Event::MoveTo { success, .. } = event {
            *success = true;
        }
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existence_with_super(store: &mut EntityStore, id: EntityId, holder: EntityId) -> ComponentId {
        let component = Component::Existence {
            glyph: "x",
            fg_color: Color::WHITE,
            superentity: Some(holder),
            subentities: BTreeSet::new(),
        };
        store.add_component(id, component)
    }

    #[test]
    fn test_get_rendered_uses_existence() {
        let mut store = EntityStore::new();
        let e = store.spawn();
        store.add_component(e, Component::existence("@", Color::hex(0xDDA24E)));

        let Event::GetRendered { glyph, fg_color, .. } = store.dispatch(e, Event::get_rendered())
        else {
            unreachable!()
        };
        assert_eq!(glyph, Some("@"));
        assert_eq!(fg_color, Color::hex(0xDDA24E));
    }

    #[test]
    fn test_get_rendered_without_existence_sets_nothing() {
        let mut store = EntityStore::new();
        let e = store.spawn();
        store.add_component(e, Component::fragility(10));

        let Event::GetRendered { glyph, .. } = store.dispatch(e, Event::get_rendered()) else {
            unreachable!()
        };
        assert_eq!(glyph, None);
    }

    #[test]
    fn test_take_damage_subtracts_hp() {
        let mut store = EntityStore::new();
        let e = store.spawn();
        let handle = store.add_component(e, Component::fragility(10));

        store.dispatch(e, Event::take_damage(3, damage::PHYSICAL));
        store.dispatch(e, Event::take_damage(4, damage::FIRE));

        let idx = store.entities[e].index_of(handle).unwrap();
        let Component::Fragility { hp } = store.entities[e].components[idx].1 else {
            unreachable!()
        };
        assert_eq!(hp, 3);
    }

    #[test]
    fn test_deal_damage_is_a_fist() {
        let mut store = EntityStore::new();
        let e = store.spawn();
        store.add_component(e, Component::fragility(10));

        let Event::DealDamage { amount, kind } = store.dispatch(e, Event::deal_damage()) else {
            unreachable!()
        };
        assert_eq!(amount, 10);
        assert_eq!(kind, damage::PHYSICAL | damage::BLUNT);
    }

    #[test]
    fn test_add_and_remove_subentity() {
        let mut store = EntityStore::new();
        let bag = store.spawn();
        let coin = store.spawn();
        store.add_component(bag, Component::existence("(", Color::WHITE));

        let add = store.dispatch(bag, Event::add_subentity(coin));
        assert!(add.succeeded());

        let rem = store.dispatch(bag, Event::remove_subentity(coin));
        assert!(rem.succeeded());
    }

    #[test]
    fn test_subentity_event_without_target_is_ignored() {
        let mut store = EntityStore::new();
        let bag = store.spawn();
        store.add_component(bag, Component::existence("(", Color::WHITE));

        let add = store.dispatch(
            bag,
            Event::AddSubentity {
                entity: None,
                force: false,
                success: false,
            },
        );
        assert!(!add.succeeded());
    }

    #[test]
    fn test_move_to_reseats_entity() {
        let mut store = EntityStore::new();
        let chest = store.spawn();
        let bag = store.spawn();
        let coin = store.spawn();
        store.add_component(chest, Component::existence("=", Color::WHITE));
        store.add_component(bag, Component::existence("(", Color::WHITE));
        let handle = existence_with_super(&mut store, coin, chest);
        store.dispatch(chest, Event::add_subentity(coin));

        let moved = store.dispatch(coin, Event::move_to(bag));
        assert!(moved.succeeded());

        let idx = store.entities[coin].index_of(handle).unwrap();
        let Component::Existence { superentity, .. } = &store.entities[coin].components[idx].1
        else {
            unreachable!()
        };
        assert_eq!(*superentity, Some(bag));

        let Some(Component::Existence { subentities, .. }) =
            store.get(bag).unwrap().components().next()
        else {
            unreachable!()
        };
        assert!(subentities.contains(&coin));
        let Some(Component::Existence { subentities, .. }) =
            store.get(chest).unwrap().components().next()
        else {
            unreachable!()
        };
        assert!(!subentities.contains(&coin));
    }

    #[test]
    fn test_move_to_restores_origin_when_destination_refuses() {
        let mut store = EntityStore::new();
        let chest = store.spawn();
        let rock = store.spawn(); // no components: cannot hold anything
        let coin = store.spawn();
        store.add_component(chest, Component::existence("=", Color::WHITE));
        let handle = existence_with_super(&mut store, coin, chest);
        store.dispatch(chest, Event::add_subentity(coin));

        let moved = store.dispatch(coin, Event::move_to(rock));
        assert!(!moved.succeeded());

        // Still held by the chest.
        let idx = store.entities[coin].index_of(handle).unwrap();
        let Component::Existence { superentity, .. } = &store.entities[coin].components[idx].1
        else {
            unreachable!()
        };
        assert_eq!(*superentity, Some(chest));
        let Some(Component::Existence { subentities, .. }) =
            store.get(chest).unwrap().components().next()
        else {
            unreachable!()
        };
        assert!(subentities.contains(&coin));
    }

    #[test]
    fn test_move_to_without_holder_is_refused() {
        let mut store = EntityStore::new();
        let bag = store.spawn();
        let loose = store.spawn();
        store.add_component(bag, Component::existence("(", Color::WHITE));
        store.add_component(loose, Component::existence("*", Color::WHITE));

        let moved = store.dispatch(loose, Event::move_to(bag));
        assert!(!moved.succeeded());
    }

    #[test]
    fn test_dispatch_runs_in_priority_order() {
        // Two Fragility components: both see TakeDamage, in insertion
        // order since they share a priority bucket.
        let mut store = EntityStore::new();
        let e = store.spawn();
        let first = store.add_component(e, Component::fragility(10));
        let second = store.add_component(e, Component::fragility(100));

        store.dispatch(e, Event::take_damage(1, 0));

        let entity = store.get(e).unwrap();
        assert_eq!(entity.index_of(first), Some(0));
        assert_eq!(entity.index_of(second), Some(1));
        let hps: Vec<i32> = entity
            .components()
            .map(|c| match c {
                Component::Fragility { hp } => *hp,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(hps, vec![9, 99]);
    }

    #[test]
    fn test_removed_component_stops_handling() {
        let mut store = EntityStore::new();
        let e = store.spawn();
        let handle = store.add_component(e, Component::fragility(10));
        store.remove_component(e, handle);

        let Event::DealDamage { amount, .. } = store.dispatch(e, Event::deal_damage()) else {
            unreachable!()
        };
        assert_eq!(amount, 0);
    }
}
