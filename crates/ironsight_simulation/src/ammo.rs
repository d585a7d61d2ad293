//! Ammo reserves — общий пул боеприпасов владельца
//!
//! # Архитектура
//!
//! Один `AmmoReserves` компонент на владельца (player/AI actor), общий для
//! всех его оружий. Мутируется ровно в двух местах:
//! - reload вычитает (`weapon::fire::update_ammo`)
//! - сбор ammo pickup добавляет (`collect_ammo_pickups`)
//!
//! u32 + saturating math: резерв никогда не уходит в минус.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::catalog::AmmoType;
use crate::log_info;

/// Пул боеприпасов владельца (ammo type → reserve)
#[derive(Component, Debug, Clone, Default)]
pub struct AmmoReserves {
    reserves: HashMap<AmmoType, u32>,
}

impl AmmoReserves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Стартовый loadout
    pub fn with(pairs: impl IntoIterator<Item = (AmmoType, u32)>) -> Self {
        Self {
            reserves: pairs.into_iter().collect(),
        }
    }

    /// Текущий резерв типа (0 если тип не встречался)
    pub fn get(&self, ammo_type: AmmoType) -> u32 {
        self.reserves.get(&ammo_type).copied().unwrap_or(0)
    }

    pub fn add(&mut self, ammo_type: AmmoType, amount: u32) {
        let entry = self.reserves.entry(ammo_type).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Забрать до `amount` патронов; возвращает сколько реально забрали
    pub fn take_up_to(&mut self, ammo_type: AmmoType, amount: u32) -> u32 {
        let available = self.get(ammo_type);
        let taken = available.min(amount);
        if taken > 0 {
            self.reserves.insert(ammo_type, available - taken);
        }
        taken
    }

    /// Выставить резерв напрямую (reload math пишет результат целиком)
    pub fn set(&mut self, ammo_type: AmmoType, amount: u32) {
        self.reserves.insert(ammo_type, amount);
    }
}

// ============================================================================
// Ammo pickups
// ============================================================================

/// Pickup-сущность с боеприпасами (лежит в мире, host рендерит)
#[derive(Component, Debug, Clone)]
pub struct AmmoPickup {
    pub ammo_type: AmmoType,
    pub amount: u32,
}

/// Intent: актор подбирает ammo pickup (host шлёт по interact input)
#[derive(Event, Debug, Clone)]
pub struct CollectAmmoPickupIntent {
    pub collector: Entity,
    pub pickup: Entity,
}

/// Система сбора ammo pickups: добавить в резерв, деспавнить pickup
pub fn collect_ammo_pickups(
    mut events: EventReader<CollectAmmoPickupIntent>,
    pickups: Query<&AmmoPickup>,
    mut reserves: Query<&mut AmmoReserves>,
    mut commands: Commands,
) {
    for event in events.read() {
        let Ok(pickup) = pickups.get(event.pickup) else {
            continue;
        };
        let Ok(mut owner_reserves) = reserves.get_mut(event.collector) else {
            continue;
        };

        owner_reserves.add(pickup.ammo_type, pickup.amount);
        log_info(&format!(
            "Collected {} rounds of {:?} ammo",
            pickup.amount, pickup.ammo_type
        ));

        commands.entity(event.pickup).despawn();
    }
}
