//! Inventory — слоты оружия владельца, swap/scroll/equip, пикапы
//!
//! # Архитектура
//!
//! Владелец держит `WeaponSlots`: slot index → weapon entity, максимум
//! один активный slot. Активное оружие несёт marker `ActiveWeapon` —
//! host зеркалит с него visibility/tick, симуляция роутит на него
//! owner-level intents.
//!
//! Оружие на земле — это `WeaponPickup` entity с кэшем
//! `RuntimeWeaponData`: drop → equip переносит состояние без потерь.

pub mod events;
pub mod systems;

use bevy::prelude::*;
use std::collections::HashMap;

pub use events::{
    EquipWeaponIntent, ReloadIntent, ScrollWeaponIntent, StartFireIntent, StopFireIntent,
    SwapWeaponIntent,
};

use crate::ammo::{collect_ammo_pickups, AmmoReserves, CollectAmmoPickupIntent};
use crate::catalog::WeaponId;
use crate::logger::log_warning;
use crate::weapon::components::RuntimeWeaponData;
use crate::weapon::resolve_weapon_configs;

/// Слоты оружия владельца
#[derive(Component, Debug, Clone)]
pub struct WeaponSlots {
    slots: HashMap<usize, Entity>,
    active: Option<usize>,
    slot_count: usize,
}

impl WeaponSlots {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: HashMap::new(),
            active: None,
            slot_count,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn active_slot(&self) -> Option<usize> {
        self.active
    }

    pub fn weapon_in(&self, slot: usize) -> Option<Entity> {
        self.slots.get(&slot).copied()
    }

    pub fn active_weapon(&self) -> Option<Entity> {
        self.active.and_then(|slot| self.weapon_in(slot))
    }

    /// Положить оружие в slot (вернёт вытесненное, если было)
    ///
    /// Slot за пределами `slot_count` отвергается: оружие там было бы
    /// недостижимо для scroll.
    pub fn insert(&mut self, slot: usize, weapon: Entity) -> Option<Entity> {
        if slot >= self.slot_count {
            log_warning(&format!(
                "Slot {} out of range (slot_count {}), weapon {:?} not stored",
                slot, self.slot_count, weapon
            ));
            return None;
        }
        self.slots.insert(slot, weapon)
    }

    pub fn set_active(&mut self, slot: Option<usize>) {
        self.active = slot;
    }

    /// Убрать оружие из слотов (деактивирует, если было активным)
    pub fn remove_weapon(&mut self, weapon: Entity) {
        let Some((&slot, _)) = self.slots.iter().find(|(_, &e)| e == weapon) else {
            return;
        };
        self.slots.remove(&slot);
        if self.active == Some(slot) {
            self.active = None;
        }
    }

    /// Следующий занятый slot с wraparound (scroll)
    ///
    /// `forward = false` — листаем назад. `None` если другого занятого нет.
    pub fn next_occupied(&self, forward: bool) -> Option<usize> {
        let current = self.active.unwrap_or(0);
        for step in 1..=self.slot_count {
            let candidate = if forward {
                (current + step) % self.slot_count
            } else {
                (current + self.slot_count - step) % self.slot_count
            };
            if candidate != current && self.slots.contains_key(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Оружие на земле: кэш состояния + позиция в мире
///
/// `runtime_spawned = false` — пикап расставлен контентом, его
/// `RuntimeWeaponData` ещё не засеян (`seed_weapon_pickups` заполнит
/// из Magazine row). Выброшенное игроком оружие приходит с
/// `runtime_spawned = true` и кэш не трогается.
#[derive(Component, Debug, Clone)]
pub struct WeaponPickup {
    pub weapon_id: WeaponId,
    pub runtime: RuntimeWeaponData,
    pub runtime_spawned: bool,
    pub position: Vec3,
}

/// Настройки inventory-слоя
#[derive(Resource, Debug, Clone)]
pub struct InventorySettings {
    /// Насколько впереди владельца материализуется выброшенное оружие
    pub weapon_spawn_distance: f32,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            weapon_spawn_distance: 1.5,
        }
    }
}

/// Ошибка запроса остатка патронов (HUD показывает заглушку)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmoQueryError {
    NoActiveWeapon,
    NoReserves,
}

/// Остаток патронов активного оружия: (клип, резерв владельца)
pub fn remaining_ammo(
    slots: &WeaponSlots,
    weapons: &Query<&RuntimeWeaponData>,
    reserves: Option<&AmmoReserves>,
) -> Result<(u32, u32), AmmoQueryError> {
    let active = slots.active_weapon().ok_or(AmmoQueryError::NoActiveWeapon)?;
    let runtime = weapons
        .get(active)
        .map_err(|_| AmmoQueryError::NoActiveWeapon)?;
    let reserves = reserves.ok_or(AmmoQueryError::NoReserves)?;
    Ok((runtime.clip_size, reserves.get(runtime.ammo_type)))
}

/// Plugin inventory-слоя
///
/// Все системы идут строго ДО weapon-систем: equip/swap этого тика
/// виден fire-control в том же тике.
pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InventorySettings>()
            .add_event::<StartFireIntent>()
            .add_event::<StopFireIntent>()
            .add_event::<ReloadIntent>()
            .add_event::<SwapWeaponIntent>()
            .add_event::<ScrollWeaponIntent>()
            .add_event::<EquipWeaponIntent>()
            .add_event::<CollectAmmoPickupIntent>()
            .add_systems(
                FixedUpdate,
                (
                    systems::seed_weapon_pickups,
                    collect_ammo_pickups,
                    systems::process_scroll_weapon,
                    systems::process_swap_weapon,
                    systems::process_equip_weapon,
                    systems::route_weapon_intents,
                    systems::process_weapon_destroyed,
                    systems::tick_despawn_timers,
                )
                    .chain()
                    .before(resolve_weapon_configs),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_insert_and_activate() {
        let mut slots = WeaponSlots::new(3);
        let weapon = Entity::from_raw(7);
        assert!(slots.insert(1, weapon).is_none());
        assert_eq!(slots.active_weapon(), None);

        slots.set_active(Some(1));
        assert_eq!(slots.active_weapon(), Some(weapon));
    }

    #[test]
    fn test_remove_weapon_clears_active() {
        let mut slots = WeaponSlots::new(2);
        let weapon = Entity::from_raw(3);
        slots.insert(0, weapon);
        slots.set_active(Some(0));

        slots.remove_weapon(weapon);
        assert_eq!(slots.active_weapon(), None);
        assert_eq!(slots.weapon_in(0), None);
    }

    #[test]
    fn test_scroll_wraps_around() {
        let mut slots = WeaponSlots::new(3);
        let a = Entity::from_raw(1);
        let c = Entity::from_raw(2);
        slots.insert(0, a);
        slots.insert(2, c);
        slots.set_active(Some(2));

        // Вперёд с последнего занятого — wrap на первый
        assert_eq!(slots.next_occupied(true), Some(0));
        // Назад с последнего — тоже slot 0 (slot 1 пуст)
        assert_eq!(slots.next_occupied(false), Some(0));

        slots.set_active(Some(0));
        assert_eq!(slots.next_occupied(true), Some(2));
        assert_eq!(slots.next_occupied(false), Some(2));
    }

    #[test]
    fn test_insert_out_of_range_rejected() {
        let mut slots = WeaponSlots::new(2);
        let weapon = Entity::from_raw(9);
        assert!(slots.insert(2, weapon).is_none());
        assert_eq!(slots.weapon_in(2), None);
        // Scroll не видит призрачный slot
        slots.insert(0, Entity::from_raw(1));
        slots.set_active(Some(0));
        assert_eq!(slots.next_occupied(true), None);
    }

    #[test]
    fn test_scroll_single_weapon_is_none() {
        let mut slots = WeaponSlots::new(3);
        slots.insert(1, Entity::from_raw(5));
        slots.set_active(Some(1));
        assert_eq!(slots.next_occupied(true), None);
        assert_eq!(slots.next_occupied(false), None);
    }
}
