//! Inventory-системы: роутинг intents, swap/scroll/equip, пикапы,
//! уничтоженное оружие

use bevy::prelude::*;

use crate::catalog::{AttachmentSlot, SlotOverrides, WeaponCatalog};
use crate::components::AimOrigin;
use crate::inventory::events::{
    EquipWeaponIntent, ReloadIntent, ScrollWeaponIntent, StartFireIntent, StopFireIntent,
    SwapWeaponIntent,
};
use crate::inventory::{InventorySettings, WeaponPickup, WeaponSlots};
use crate::logger::{log, log_warning};
use crate::weapon::components::{
    ActiveWeapon, DespawnAfter, FireControl, RecoilState, RuntimeWeaponData, WeaponInstance,
    WeaponOwner,
};
use crate::weapon::config::ResolvedWeaponConfig;
use crate::weapon::events::{
    MontageRequest, WeaponDestroyed, WeaponReload, WeaponStartFire, WeaponStopFire,
};

/// System: роутинг owner-level intents на активное оружие
pub fn route_weapon_intents(
    mut start_events: EventReader<StartFireIntent>,
    mut stop_events: EventReader<StopFireIntent>,
    mut reload_events: EventReader<ReloadIntent>,
    owners: Query<&WeaponSlots>,
    mut start_fire: EventWriter<WeaponStartFire>,
    mut stop_fire: EventWriter<WeaponStopFire>,
    mut reload: EventWriter<WeaponReload>,
) {
    for event in start_events.read() {
        let Ok(slots) = owners.get(event.owner) else {
            continue;
        };
        let Some(weapon) = slots.active_weapon() else {
            continue;
        };
        start_fire.write(WeaponStartFire { weapon });
    }
    for event in stop_events.read() {
        let Ok(slots) = owners.get(event.owner) else {
            continue;
        };
        let Some(weapon) = slots.active_weapon() else {
            continue;
        };
        stop_fire.write(WeaponStopFire { weapon });
    }
    for event in reload_events.read() {
        let Ok(slots) = owners.get(event.owner) else {
            continue;
        };
        let Some(weapon) = slots.active_weapon() else {
            continue;
        };
        reload.write(WeaponReload { weapon });
    }
}

/// System: засев контентных пикапов из Magazine row
///
/// Пикап, расставленный контентом (`runtime_spawned == false`), ещё не
/// знает свой боезапас: Magazine attachment задаёт ammo type, ёмкость
/// и стартовый клип, прочность полная. Выброшенное оружие
/// (`runtime_spawned == true`) сохраняет кэш как есть.
pub fn seed_weapon_pickups(
    mut pickups: Query<&mut WeaponPickup, Added<WeaponPickup>>,
    catalog: Res<WeaponCatalog>,
) {
    for mut pickup in pickups.iter_mut() {
        if pickup.runtime_spawned {
            continue;
        }
        pickup.runtime_spawned = true;
        pickup.runtime.health = 100.0;

        let magazine = pickup.runtime.attachments.iter().find_map(|id| {
            let row = catalog.attachment_row(id)?;
            if row.slot != AttachmentSlot::Magazine {
                return None;
            }
            match &row.overrides {
                SlotOverrides::Magazine(overrides) => Some(overrides.as_ref()),
                _ => None,
            }
        });

        if let Some(magazine) = magazine {
            pickup.runtime.ammo_type = magazine.ammo_type;
            pickup.runtime.clip_capacity = magazine.clip_capacity;
            pickup.runtime.clip_size = magazine.clip_size;
        } else if let Some(weapon) = catalog.weapon_row(&pickup.weapon_id) {
            // Оружие без attachments сеется из собственного row
            pickup.runtime.ammo_type = weapon.ammo_type;
            pickup.runtime.clip_capacity = weapon.clip_capacity;
            pickup.runtime.clip_size = weapon.clip_capacity;
        } else {
            log_warning(&format!(
                "Weapon pickup references unknown row {:?}",
                pickup.weapon_id
            ));
        }
    }
}

/// System: scroll → swap intent на следующий занятый slot
pub fn process_scroll_weapon(
    mut events: EventReader<ScrollWeaponIntent>,
    owners: Query<&WeaponSlots>,
    mut swaps: EventWriter<SwapWeaponIntent>,
) {
    for event in events.read() {
        let Ok(slots) = owners.get(event.owner) else {
            continue;
        };
        let Some(slot) = slots.next_occupied(event.forward) else {
            continue;
        };
        swaps.write(SwapWeaponIntent {
            owner: event.owner,
            slot,
        });
    }
}

/// System: смена активного slot
///
/// Marker `ActiveWeapon` переезжает; старому оружию отменяется огонь,
/// новое играет equip montage.
pub fn process_swap_weapon(
    mut events: EventReader<SwapWeaponIntent>,
    mut owners: Query<&mut WeaponSlots>,
    configs: Query<&ResolvedWeaponConfig>,
    mut commands: Commands,
    mut stop_fire: EventWriter<WeaponStopFire>,
    mut montages: EventWriter<MontageRequest>,
) {
    for event in events.read() {
        let Ok(mut slots) = owners.get_mut(event.owner) else {
            continue;
        };
        if slots.active_slot() == Some(event.slot) {
            continue;
        }
        let Some(new_weapon) = slots.weapon_in(event.slot) else {
            // Пустой slot — no-op
            continue;
        };

        if let Some(old_weapon) = slots.active_weapon() {
            stop_fire.write(WeaponStopFire { weapon: old_weapon });
            commands.entity(old_weapon).remove::<ActiveWeapon>();
        }

        slots.set_active(Some(event.slot));
        commands.entity(new_weapon).insert(ActiveWeapon);

        if let Ok(config) = configs.get(new_weapon) {
            if let Some(montage) = &config.equip_montage {
                montages.write(MontageRequest {
                    owner: event.owner,
                    montage: montage.montage.clone(),
                    duration: montage.duration,
                });
            }
        }

        log(&format!(
            "Owner {:?} swapped to slot {} ({:?})",
            event.owner, event.slot, new_weapon
        ));
    }
}

/// System: подбор оружия с земли
///
/// Кэш пикапа становится живым weapon entity; старое оружие слота
/// материализуется пикапом перед владельцем (drop-as-pickup).
pub fn process_equip_weapon(
    mut events: EventReader<EquipWeaponIntent>,
    mut owners: Query<(&mut WeaponSlots, Option<&AimOrigin>)>,
    pickups: Query<&WeaponPickup>,
    weapons: Query<(&WeaponInstance, &RuntimeWeaponData)>,
    settings: Res<InventorySettings>,
    mut commands: Commands,
    mut swaps: EventWriter<SwapWeaponIntent>,
) {
    for event in events.read() {
        let Ok((mut slots, aim_origin)) = owners.get_mut(event.owner) else {
            continue;
        };
        if event.slot >= slots.slot_count() {
            log_warning(&format!(
                "Equip into slot {} ignored: owner {:?} has {} slots",
                event.slot,
                event.owner,
                slots.slot_count()
            ));
            continue;
        }
        let Ok(pickup) = pickups.get(event.pickup) else {
            continue;
        };

        // Старое оружие слота: пикапом перед владельцем или в утиль
        if let Some(old_weapon) = slots.weapon_in(event.slot) {
            if event.spawn_pickup_for_old {
                if let Ok((instance, runtime)) = weapons.get(old_weapon) {
                    let origin = aim_origin.copied().unwrap_or_default();
                    let drop_position =
                        origin.position + origin.forward * settings.weapon_spawn_distance;
                    commands.spawn(WeaponPickup {
                        weapon_id: instance.0.clone(),
                        runtime: runtime.clone(),
                        runtime_spawned: true,
                        position: drop_position,
                    });
                }
            }
            slots.remove_weapon(old_weapon);
            commands.entity(old_weapon).despawn();
        }

        let new_weapon = commands
            .spawn((
                WeaponInstance(pickup.weapon_id.clone()),
                pickup.runtime.clone(),
                WeaponOwner(event.owner),
                FireControl::ready(),
                RecoilState::default(),
            ))
            .id();
        slots.insert(event.slot, new_weapon);
        commands.entity(event.pickup).despawn();

        log(&format!(
            "Owner {:?} equipped {:?} into slot {}",
            event.owner, pickup.weapon_id, event.slot
        ));

        // Свежеподнятое оружие сразу становится активным
        swaps.write(SwapWeaponIntent {
            owner: event.owner,
            slot: event.slot,
        });
    }
}

/// System: прочность упала до нуля
///
/// Оружие покидает слоты сразу (стрелять из него больше нельзя),
/// destroy montage играет, entity доживает до его конца.
pub fn process_weapon_destroyed(
    mut events: EventReader<WeaponDestroyed>,
    mut owners: Query<&mut WeaponSlots>,
    configs: Query<&ResolvedWeaponConfig>,
    mut commands: Commands,
    mut montages: EventWriter<MontageRequest>,
) {
    for event in events.read() {
        if let Ok(mut slots) = owners.get_mut(event.owner) {
            slots.remove_weapon(event.weapon);
        }
        commands.entity(event.weapon).remove::<ActiveWeapon>();

        let linger = match configs.get(event.weapon) {
            Ok(config) => match &config.destroyed_montage {
                Some(montage) => {
                    montages.write(MontageRequest {
                        owner: event.owner,
                        montage: montage.montage.clone(),
                        duration: montage.duration,
                    });
                    montage.duration
                }
                None => 0.0,
            },
            Err(_) => 0.0,
        };
        commands
            .entity(event.weapon)
            .insert(DespawnAfter { remaining: linger });

        log(&format!(
            "Weapon {:?} destroyed, owner {:?}",
            event.weapon, event.owner
        ));
    }
}

/// System: тик отложенных despawn
pub fn tick_despawn_timers(
    mut timers: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time>,
    mut commands: Commands,
) {
    let delta = time.delta_secs();
    for (entity, mut timer) in timers.iter_mut() {
        timer.remaining -= delta;
        if timer.remaining <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
