use crate::render::color::Color;

use super::EntityId;

/// Damage category bits, combined in an event's `kind` field.
#[allow(dead_code)]
pub mod damage {
    pub const PHYSICAL: u16 = 1 << 0;
    pub const BLUNT: u16 = 1 << 1;
    pub const PIERCE: u16 = 1 << 2;
    pub const SLASH: u16 = 1 << 3;
    pub const MENTAL: u16 = 1 << 4;
    pub const FIRE: u16 = 1 << 5;
    pub const ICE: u16 = 1 << 6;
    pub const BULLET: u16 = 1 << 7;
    pub const SHOCKWAVE: u16 = 1 << 8;
}

/// Something which happens to an entity: you stab something or get
/// stabbed, you are drawn on screen, you are picked up.
///
/// An event is passed through the entity's components in priority order;
/// handlers express themselves by mutating its fields, and the final value
/// is handed back to the dispatcher's caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    DealDamage {
        amount: i32,
        kind: u16,
    },
    TakeDamage {
        amount: i32,
        kind: u16,
    },
    GetRendered {
        /// Set by the first component that knows how to draw the entity.
        glyph: Option<&'static str>,
        fg_color: Color,
        bg_color: Color,
    },
    AddSubentity {
        entity: Option<EntityId>,
        force: bool,
        success: bool,
    },
    RemoveSubentity {
        entity: Option<EntityId>,
        force: bool,
        success: bool,
    },
    /// Re-seat the receiving entity inside `dest`. Two-phase: remove from
    /// the current superentity, then add to the destination, restoring the
    /// origin if the add fails.
    MoveTo {
        dest: Option<EntityId>,
        force: bool,
        success: bool,
    },
}

impl Event {
    pub fn deal_damage() -> Self {
        Event::DealDamage { amount: 0, kind: 0 }
    }

    pub fn take_damage(amount: i32, kind: u16) -> Self {
        Event::TakeDamage { amount, kind }
    }

    pub fn get_rendered() -> Self {
        Event::GetRendered {
            glyph: None,
            fg_color: Color::hex(0xFF0000),
            bg_color: Color::hex(0xFF0000),
        }
    }

    pub fn add_subentity(entity: EntityId) -> Self {
        Event::AddSubentity {
            entity: Some(entity),
            force: false,
            success: false,
        }
    }

    pub fn remove_subentity(entity: EntityId) -> Self {
        Event::RemoveSubentity {
            entity: Some(entity),
            force: false,
            success: false,
        }
    }

    pub fn move_to(dest: EntityId) -> Self {
        Event::MoveTo {
            dest: Some(dest),
            force: false,
            success: false,
        }
    }

    /// The `success` flag shared by the subentity events.
    pub fn succeeded(&self) -> bool {
        match self {
            Event::AddSubentity { success, .. }
            | Event::RemoveSubentity { success, .. }
            | Event::MoveTo { success, .. } => *success,
            _ => false,
        }
    }
}
