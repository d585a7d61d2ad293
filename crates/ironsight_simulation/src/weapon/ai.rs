//! AI-вариант стрельбы — «пристрелка» по цели
//!
//! # Архитектура
//!
//! AI не пользуется player fire-control: свой repeating-таймер из
//! rounds-per-minute, trace от дула к цели с jitter, плоский AI-урон.
//! Разброс стартует на максимуме и ужимается каждым выстрелом
//! (clamped к минимуму) — чем дольше очередь, тем точнее AI.
//!
//! Пустой клип: сухой щелчок + `WeaponEmpty`; AI-контроллер
//! перезаряжается по этому событию обычным `WeaponReload`.

use bevy::prelude::*;

use crate::components::AimOrigin;
use crate::external::RayCastService;
use crate::weapon::components::{CountdownTimer, RuntimeWeaponData, WeaponOwner};
use crate::weapon::config::ResolvedWeaponConfig;
use crate::weapon::events::{DamageDealt, DamageKind, EffectRequest, WeaponDestroyed, WeaponEmpty};
use crate::weapon::fire::jitter_direction;
use crate::DeterministicRng;

/// AI fire state на weapon entity (только у оружия в руках AI)
#[derive(Component, Debug, Clone, Default)]
pub struct AiWeaponControl {
    pub target: Option<Entity>,
    pub current_pitch_variation: f32,
    pub current_yaw_variation: f32,
    pub shot_timer: Option<CountdownTimer>,
}

/// Команда: AI открывает огонь по цели
#[derive(Event, Debug, Clone, Copy)]
pub struct AiStartFire {
    pub weapon: Entity,
    pub target: Entity,
}

/// Команда: AI прекращает огонь
#[derive(Event, Debug, Clone, Copy)]
pub struct AiStopFire {
    pub weapon: Entity,
}

/// System: старт AI-очереди
///
/// Разброс сбрасывается на максимум; первый выстрел уходит по таймеру
/// (AI не стреляет в тот же тик, что получил команду).
pub fn process_ai_start_fire(
    mut events: EventReader<AiStartFire>,
    mut weapons: Query<(&ResolvedWeaponConfig, &mut AiWeaponControl)>,
) {
    for event in events.read() {
        let Ok((config, mut control)) = weapons.get_mut(event.weapon) else {
            continue;
        };
        let params = &config.ai_params;
        control.target = Some(event.target);
        control.current_pitch_variation = params.max_pitch_variation;
        control.current_yaw_variation = params.max_yaw_variation;
        control.shot_timer = Some(CountdownTimer::repeating(
            60.0 / params.rounds_per_minute.max(1.0),
        ));
    }
}

/// System: остановка AI-очереди
pub fn process_ai_stop_fire(
    mut events: EventReader<AiStopFire>,
    mut weapons: Query<&mut AiWeaponControl>,
) {
    for event in events.read() {
        let Ok(mut control) = weapons.get_mut(event.weapon) else {
            continue;
        };
        control.target = None;
        control.shot_timer = None;
    }
}

/// System: тик AI-таймеров и исполнение AI-выстрелов
#[allow(clippy::too_many_arguments)]
pub fn tick_ai_fire(
    mut weapons: Query<(
        Entity,
        &WeaponOwner,
        &ResolvedWeaponConfig,
        &mut RuntimeWeaponData,
        &mut AiWeaponControl,
    )>,
    origins: Query<&AimOrigin>,
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    caster: Res<RayCastService>,
    mut effects: EventWriter<EffectRequest>,
    mut damage: EventWriter<DamageDealt>,
    mut empty: EventWriter<WeaponEmpty>,
    mut destroyed: EventWriter<WeaponDestroyed>,
) {
    let delta = time.delta_secs();
    for (entity, owner, config, mut runtime, mut control) in weapons.iter_mut() {
        let Some(timer) = control.shot_timer.as_mut() else {
            continue;
        };
        if !timer.tick(delta) {
            continue;
        }
        let Some(target) = control.target else {
            control.shot_timer = None;
            continue;
        };

        if runtime.clip_size == 0 {
            let position = origins.get(owner.0).map(|o| o.position).unwrap_or(Vec3::ZERO);
            effects.write(EffectRequest::Sound {
                cue: config.empty_fire_sound.clone(),
                position,
            });
            empty.write(WeaponEmpty {
                weapon: entity,
                owner: owner.0,
            });
            control.shot_timer = None;
            continue;
        }

        // Дуло и цель должны быть известны симуляции
        let Ok(muzzle) = origins.get(owner.0) else {
            continue;
        };
        let Ok(target_origin) = origins.get(target) else {
            continue;
        };

        runtime.clip_size -= 1;
        runtime.health = (runtime.health - config.per_shot_degradation).max(0.0);

        let params = &config.ai_params;
        let to_target = target_origin.position - muzzle.position;
        let direction = jitter_direction(
            to_target,
            control.current_pitch_variation,
            control.current_yaw_variation,
            &mut rng.rng,
        );

        let fire_cue = if config.silenced {
            config.silenced_fire_sound.clone()
        } else {
            config.fire_sound.clone()
        };
        effects.write(EffectRequest::Sound {
            cue: fire_cue,
            position: muzzle.position,
        });
        effects.write(EffectRequest::MuzzleFlash {
            weapon: entity,
            socket: config.muzzle_socket.clone(),
        });

        if let Some(hit) = caster.cast_ray(muzzle.position, direction, config.range) {
            effects.write(EffectRequest::Trace {
                start: muzzle.position,
                end: hit.point,
            });
            effects.write(EffectRequest::Impact {
                point: hit.point,
                normal: hit.normal,
                surface: hit.surface,
            });
            if let Some(hit_entity) = hit.entity {
                damage.write(DamageDealt {
                    target: hit_entity,
                    amount: params.damage,
                    direction: direction.normalize_or_zero(),
                    instigator: owner.0,
                    kind: DamageKind::AiBullet,
                });
            }
        }

        // Пристрелка: разброс ужимается с каждым выстрелом
        control.current_pitch_variation = (control.current_pitch_variation
            - params.per_shot_accuracy_improvement)
            .max(params.min_pitch_variation);
        control.current_yaw_variation = (control.current_yaw_variation
            - params.per_shot_accuracy_improvement)
            .max(params.min_yaw_variation);

        // Износ добил оружие: выстрел состоялся, но очередь обрывается
        if runtime.is_destroyed() {
            control.shot_timer = None;
            control.target = None;
            destroyed.write(WeaponDestroyed {
                weapon: entity,
                owner: owner.0,
            });
        }
    }
}
