//! Чистое ядро выстрела и reload math
//!
//! # Архитектура
//!
//! Весь недетерминизм (RNG, ray cast) приходит параметрами — функции
//! здесь тестируются без ECS и без host-движка:
//! - `fire_once` — один выстрел: клип, прочность, разброс, traces
//! - `update_ammo` — перенос патронов из резерва в клип в конце reload
//!
//! Системы в `weapon::systems` оборачивают их в events.

use bevy::prelude::*;
use rand::Rng;

use crate::catalog::SurfaceTag;
use crate::external::RayCaster;
use crate::weapon::components::RuntimeWeaponData;
use crate::weapon::config::ResolvedWeaponConfig;

/// Попадание одного pellet
#[derive(Clone, Copy, Debug)]
pub struct PelletImpact {
    pub point: Vec3,
    pub normal: Vec3,
    pub surface: SurfaceTag,
    pub entity: Option<Entity>,
    /// Урон с учётом headshot multiplier
    pub damage: f32,
}

/// Исход одного нажатия Fire
#[derive(Debug)]
pub enum FireOutcome {
    /// Клип пуст: выстрела не было
    Empty,
    Fired {
        impacts: Vec<PelletImpact>,
        /// Прочность упала до нуля этим выстрелом
        destroyed: bool,
    },
}

/// Один выстрел
///
/// Клип декрементируется ровно на 1 независимо от числа pellets.
/// Прочность деградирует на выстрел; пересечение нуля отдаётся
/// наружу флагом `destroyed` (обработка — на вызывающем).
pub fn fire_once<R: Rng>(
    config: &ResolvedWeaponConfig,
    runtime: &mut RuntimeWeaponData,
    origin: Vec3,
    forward: Vec3,
    is_aiming: bool,
    rng: &mut R,
    caster: &dyn RayCaster,
) -> FireOutcome {
    if runtime.clip_size == 0 {
        return FireOutcome::Empty;
    }

    runtime.clip_size -= 1;
    runtime.health = (runtime.health - config.per_shot_degradation).max(0.0);
    let destroyed = runtime.is_destroyed();

    // Hip fire штрафуется множителем разброса
    let debuff = if is_aiming {
        1.0
    } else {
        config.accuracy_debuff
    };
    let pitch_spread = config.pitch_variation.max(0.0) * debuff;
    let yaw_spread = config.yaw_variation.max(0.0) * debuff;

    let (pellet_count, range) = if config.is_shotgun {
        (config.shotgun_pellets.max(1), config.shotgun_range)
    } else {
        (1, config.range)
    };

    let mut impacts = Vec::new();
    for _ in 0..pellet_count {
        let direction = jitter_direction(forward, pitch_spread, yaw_spread, rng);
        if let Some(hit) = caster.cast_ray(origin, direction, range) {
            let damage = if hit.surface == SurfaceTag::Head {
                config.damage * config.headshot_multiplier
            } else {
                config.damage
            };
            impacts.push(PelletImpact {
                point: hit.point,
                normal: hit.normal,
                surface: hit.surface,
                entity: hit.entity,
                damage,
            });
        }
    }

    FireOutcome::Fired { impacts, destroyed }
}

/// Отклонить направление на случайные pitch/yaw (градусы)
pub fn jitter_direction<R: Rng>(
    forward: Vec3,
    pitch_spread: f32,
    yaw_spread: f32,
    rng: &mut R,
) -> Vec3 {
    let pitch = if pitch_spread > 0.0 {
        rng.gen_range(-pitch_spread..=pitch_spread)
    } else {
        0.0
    };
    let yaw = if yaw_spread > 0.0 {
        rng.gen_range(-yaw_spread..=yaw_spread)
    } else {
        0.0
    };

    let forward = forward.normalize_or_zero();
    let right = if forward.abs_diff_eq(Vec3::Y, 1e-4) {
        Vec3::X
    } else {
        forward.cross(Vec3::Y).normalize()
    };
    let rotation =
        Quat::from_axis_angle(Vec3::Y, yaw.to_radians()) * Quat::from_axis_angle(right, pitch.to_radians());
    rotation * forward
}

/// Результат reload math
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmmoUpdate {
    pub clip_size: u32,
    pub reserve: u32,
}

/// Перенос патронов резерв → клип в конце reload
///
/// Chamberable-оружие добирает +1 сверх ёмкости магазина (патрон в
/// патроннике). При недостатке резерва высыпаем в клип всё что есть.
pub fn update_ammo(
    clip_size: u32,
    clip_capacity: u32,
    reserve: u32,
    can_be_chambered: bool,
) -> AmmoUpdate {
    let chamber_bonus = if can_be_chambered { 1 } else { 0 };
    let target = clip_capacity + chamber_bonus;
    let needed = target.saturating_sub(clip_size);

    if reserve >= needed {
        AmmoUpdate {
            clip_size: target,
            reserve: reserve - needed,
        }
    } else {
        AmmoUpdate {
            clip_size: clip_size + reserve,
            reserve: 0,
        }
    }
}
