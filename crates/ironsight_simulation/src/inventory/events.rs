//! Owner-level intents (host шлёт по вводу игрока / решениям AI)
//!
//! Inventory роутит их на активное оружие владельца; weapon-слой
//! owner-level событий не знает.

use bevy::prelude::*;

/// Intent: зажать триггер активного оружия
#[derive(Event, Debug, Clone, Copy)]
pub struct StartFireIntent {
    pub owner: Entity,
}

/// Intent: отпустить триггер
#[derive(Event, Debug, Clone, Copy)]
pub struct StopFireIntent {
    pub owner: Entity,
}

/// Intent: перезарядить активное оружие
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadIntent {
    pub owner: Entity,
}

/// Intent: переключиться на конкретный slot
///
/// No-op если slot пуст или уже активен.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwapWeaponIntent {
    pub owner: Entity,
    pub slot: usize,
}

/// Intent: листать оружие колесом (wraparound по занятым слотам)
#[derive(Event, Debug, Clone, Copy)]
pub struct ScrollWeaponIntent {
    pub owner: Entity,
    pub forward: bool,
}

/// Intent: подобрать оружие с земли в slot
///
/// `spawn_pickup_for_old = true` — старое оружие слота выбрасывается
/// пикапом перед владельцем; `false` — уничтожается без следа
/// (scripted-замены, выдача стартового loadout).
#[derive(Event, Debug, Clone, Copy)]
pub struct EquipWeaponIntent {
    pub owner: Entity,
    pub slot: usize,
    pub pickup: Entity,
    pub spawn_pickup_for_old: bool,
}
