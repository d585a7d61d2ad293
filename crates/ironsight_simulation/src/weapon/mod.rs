//! Weapon subsystem — конфигурация, fire control, отдача, AI-стрельба
//!
//! # Архитектура
//!
//! - `config` — resolve статики + attachments в эффективные параметры
//! - `components` — состояние инстанса (runtime data, fire control, recoil)
//! - `fire` — чистое ядро выстрела и reload math (без ECS)
//! - `systems` — FixedUpdate-обвязка поверх ядра
//! - `ai` — AI-вариант стрельбы
//! - `events` — команды и side-effect requests

pub mod ai;
pub mod components;
pub mod config;
pub mod events;
pub mod fire;
pub mod systems;

use bevy::prelude::*;

pub use ai::{AiStartFire, AiStopFire, AiWeaponControl};
pub use components::{
    ActiveWeapon, CountdownTimer, DespawnAfter, FireControl, RecoilState, RuntimeWeaponData,
    WeaponInstance, WeaponOwner,
};
pub use config::{fov_from_magnification, resolve, ResolvedWeaponConfig};
pub use events::{
    AimInput, DamageDealt, DamageKind, EffectRequest, MontageRequest, ShotFired, WeaponDestroyed,
    WeaponEmpty, WeaponReload, WeaponStartFire, WeaponStopFire,
};
pub use fire::{fire_once, update_ammo, AmmoUpdate, FireOutcome, PelletImpact};
pub use systems::ExecuteShot;

use crate::catalog::WeaponCatalog;
use crate::logger::log_error;

/// Plugin подсистемы оружия
///
/// Порядок систем фиксирован `.chain()`: детерминизм тика важнее
/// параллелизма (оружий на сцене десятки, не тысячи).
pub struct WeaponPlugin;

impl Plugin for WeaponPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WeaponStartFire>()
            .add_event::<WeaponStopFire>()
            .add_event::<WeaponReload>()
            .add_event::<ExecuteShot>()
            .add_event::<ShotFired>()
            .add_event::<WeaponEmpty>()
            .add_event::<WeaponDestroyed>()
            .add_event::<DamageDealt>()
            .add_event::<EffectRequest>()
            .add_event::<MontageRequest>()
            .add_event::<AimInput>()
            .add_event::<AiStartFire>()
            .add_event::<AiStopFire>()
            .add_systems(
                FixedUpdate,
                (
                    resolve_weapon_configs,
                    systems::process_start_fire,
                    systems::tick_fire_timers,
                    ai::process_ai_start_fire,
                    ai::process_ai_stop_fire,
                    ai::tick_ai_fire,
                    systems::fire_shots,
                    systems::process_stop_fire,
                    systems::process_reload,
                    systems::tick_reload_timers,
                    systems::process_aim_input,
                    systems::tick_recoil,
                    systems::apply_bullet_damage,
                )
                    .chain(),
            );
    }
}

/// System: пересчёт ResolvedWeaponConfig
///
/// Триггерится на spawn оружия и любую мутацию RuntimeWeaponData
/// (смена attachments в том числе). Пересчёт всегда целиком — дешёвый
/// и не накапливает дрейф.
pub fn resolve_weapon_configs(
    mut commands: Commands,
    weapons: Query<(Entity, &WeaponInstance, &RuntimeWeaponData), Changed<RuntimeWeaponData>>,
    catalog: Res<WeaponCatalog>,
) {
    for (entity, instance, runtime) in weapons.iter() {
        match resolve(&catalog, &instance.0, &runtime.attachments) {
            Some(config) => {
                commands.entity(entity).insert(config);
            }
            None => {
                log_error(&format!(
                    "Weapon {:?} references unknown catalog row {:?}",
                    entity, instance.0
                ));
            }
        }
    }
}
