//! Fire-control системы (FixedUpdate, chained)
//!
//! # Архитектура
//!
//! Единственное место, где выстрел реально исполняется — `fire_shots`.
//! `process_start_fire` и `tick_fire_timers` только шлют внутренний
//! `ExecuteShot`: первый выстрел нажатия и повторы очереди проходят
//! через один и тот же код.
//!
//! Поток одного тика:
//! StartFire → тик таймеров → исполнение выстрелов → StopFire →
//! reload → recoil/recovery → зеркалирование урона на Health.

use bevy::prelude::*;

use crate::ammo::AmmoReserves;
use crate::components::{AimMode, AimOrigin, AimRotation, Health, MovementState};
use crate::curves::PlaybackClock;
use crate::external::RayCastService;
use crate::logger::log;
use crate::weapon::components::{
    CountdownTimer, FireControl, RecoilState, RuntimeWeaponData, WeaponOwner,
};
use crate::weapon::config::ResolvedWeaponConfig;
use crate::weapon::events::{
    AimInput, DamageDealt, DamageKind, EffectRequest, MontageRequest, ShotFired, WeaponDestroyed,
    WeaponEmpty, WeaponReload, WeaponStartFire, WeaponStopFire,
};
use crate::weapon::fire::{fire_once, update_ammo, FireOutcome};
use crate::DeterministicRng;

/// Внутреннее событие: исполнить один выстрел на этом тике
#[derive(Event, Debug, Clone, Copy)]
pub struct ExecuteShot {
    pub weapon: Entity,
}

/// System: нажатие триггера
///
/// Первый выстрел уходит в этот же тик; automatic-оружие армирует
/// repeating-таймер на повторы. Recoil-клоки стартуют с нуля, прицел
/// владельца снимается в snapshot для recovery.
pub fn process_start_fire(
    mut events: EventReader<WeaponStartFire>,
    mut weapons: Query<(
        &WeaponOwner,
        &ResolvedWeaponConfig,
        &mut FireControl,
        &mut RecoilState,
    )>,
    owners: Query<(&MovementState, &AimRotation)>,
    mut shots: EventWriter<ExecuteShot>,
) {
    for event in events.read() {
        let Ok((owner, config, mut fire, mut recoil)) = weapons.get_mut(event.weapon) else {
            continue;
        };
        if !fire.can_fire || fire.is_reloading {
            continue;
        }
        let Ok((movement, aim)) = owners.get(owner.0) else {
            continue;
        };
        if !movement.allows_firing() {
            log(&format!(
                "StartFire ignored for {:?}: movement state {:?}",
                event.weapon, movement
            ));
            continue;
        }

        // Очередь начинается с позиции 0 recoil-кривых
        recoil.vertical_clock = PlaybackClock::with_duration(config.vertical_recoil_curve.duration());
        recoil.vertical_clock.play_from_start();
        recoil.horizontal_clock =
            PlaybackClock::with_duration(config.horizontal_recoil_curve.duration());
        recoil.horizontal_clock.play_from_start();
        recoil.recovery_clock.stop();
        recoil.snapshot = Some(*aim);
        recoil.recovery_start = None;
        recoil.should_recover = true;

        fire.trigger_held = true;
        fire.can_fire = false;
        fire.shots_fired = 0;
        fire.shot_timer = Some(CountdownTimer::repeating(config.rate_of_fire));

        shots.write(ExecuteShot {
            weapon: event.weapon,
        });
    }
}

/// System: тик таймеров очереди
///
/// Automatic-оружие с зажатым триггером стреляет снова; иначе истёкший
/// таймер просто возвращает готовность к следующему нажатию.
pub fn tick_fire_timers(
    mut weapons: Query<(Entity, &ResolvedWeaponConfig, &mut FireControl)>,
    time: Res<Time>,
    mut shots: EventWriter<ExecuteShot>,
) {
    let delta = time.delta_secs();
    for (entity, config, mut fire) in weapons.iter_mut() {
        let Some(timer) = fire.shot_timer.as_mut() else {
            continue;
        };
        if !timer.tick(delta) {
            continue;
        }
        if config.automatic_fire && fire.trigger_held {
            shots.write(ExecuteShot { weapon: entity });
        } else {
            fire.shot_timer = None;
            if !fire.is_reloading {
                fire.can_fire = true;
            }
        }
    }
}

/// System: исполнение выстрелов
///
/// Клип декрементируется в `fire_once` ровно на 1 независимо от числа
/// pellets. Пустой клип: звук сухого щелчка, очередь обрывается,
/// recovery стартует. Прочность 0: стрельба останавливается на этом
/// выстреле, уведомление уходит в inventory.
#[allow(clippy::too_many_arguments)]
pub fn fire_shots(
    mut events: EventReader<ExecuteShot>,
    mut weapons: Query<(
        &WeaponOwner,
        &ResolvedWeaponConfig,
        &mut RuntimeWeaponData,
        &mut FireControl,
        &mut RecoilState,
    )>,
    mut owners: Query<(&AimOrigin, &mut AimRotation, Option<&AimMode>)>,
    mut rng: ResMut<DeterministicRng>,
    caster: Res<RayCastService>,
    mut effects: EventWriter<EffectRequest>,
    mut damage: EventWriter<DamageDealt>,
    mut shot_fired: EventWriter<ShotFired>,
    mut empty: EventWriter<WeaponEmpty>,
    mut destroyed_events: EventWriter<WeaponDestroyed>,
) {
    for event in events.read() {
        let Ok((owner, config, mut runtime, mut fire, mut recoil)) =
            weapons.get_mut(event.weapon)
        else {
            continue;
        };
        let Ok((aim_origin, mut aim, aim_mode)) = owners.get_mut(owner.0) else {
            continue;
        };
        let is_aiming = aim_mode.map(|mode| mode.is_aiming()).unwrap_or(false);

        let outcome = fire_once(
            config,
            &mut runtime,
            aim_origin.position,
            aim_origin.forward,
            is_aiming,
            &mut rng.rng,
            caster.0.as_ref(),
        );

        match outcome {
            FireOutcome::Empty => {
                effects.write(EffectRequest::Sound {
                    cue: config.empty_fire_sound.clone(),
                    position: aim_origin.position,
                });
                empty.write(WeaponEmpty {
                    weapon: event.weapon,
                    owner: owner.0,
                });
                fire.shot_timer = None;
                fire.can_fire = true;
                begin_recovery(&mut recoil, config, *aim);
            }
            FireOutcome::Fired {
                impacts,
                destroyed,
            } => {
                fire.shots_fired += 1;

                // Recoil-импульс: кривые на текущей позиции клока
                let pitch_kick = config
                    .vertical_recoil_curve
                    .sample(recoil.vertical_clock.position)
                    * config.vertical_recoil_multiplier;
                let yaw_kick = config
                    .horizontal_recoil_curve
                    .sample(recoil.horizontal_clock.position)
                    * config.horizontal_recoil_multiplier;
                aim.pitch += pitch_kick;
                aim.yaw += yaw_kick;

                let fire_cue = if config.silenced {
                    config.silenced_fire_sound.clone()
                } else {
                    config.fire_sound.clone()
                };
                effects.write(EffectRequest::Sound {
                    cue: fire_cue,
                    position: aim_origin.position,
                });
                effects.write(EffectRequest::MuzzleFlash {
                    weapon: event.weapon,
                    socket: config.muzzle_socket.clone(),
                });
                effects.write(EffectRequest::CameraShake {
                    owner: owner.0,
                    kind: config.camera_shake,
                });

                for impact in &impacts {
                    effects.write(EffectRequest::Trace {
                        start: aim_origin.position,
                        end: impact.point,
                    });
                    effects.write(EffectRequest::Impact {
                        point: impact.point,
                        normal: impact.normal,
                        surface: impact.surface,
                    });
                    if let Some(target) = impact.entity {
                        damage.write(DamageDealt {
                            target,
                            amount: impact.damage,
                            direction: (impact.point - aim_origin.position).normalize_or_zero(),
                            instigator: owner.0,
                            kind: DamageKind::Bullet,
                        });
                    }
                }

                shot_fired.write(ShotFired {
                    weapon: event.weapon,
                    owner: owner.0,
                });

                if destroyed {
                    fire.shot_timer = None;
                    fire.trigger_held = false;
                    fire.can_fire = false;
                    destroyed_events.write(WeaponDestroyed {
                        weapon: event.weapon,
                        owner: owner.0,
                    });
                }
            }
        }
    }
}

/// System: отпускание триггера
///
/// Очередь обрывается мгновенно; recovery возвращает прицел к snapshot,
/// если владелец не трогал его руками.
pub fn process_stop_fire(
    mut events: EventReader<WeaponStopFire>,
    mut weapons: Query<(&WeaponOwner, &ResolvedWeaponConfig, &mut FireControl, &mut RecoilState)>,
    owners: Query<&AimRotation>,
) {
    for event in events.read() {
        let Ok((owner, config, mut fire, mut recoil)) = weapons.get_mut(event.weapon) else {
            continue;
        };
        fire.trigger_held = false;
        fire.shot_timer = None;
        fire.shots_fired = 0;
        if !fire.is_reloading {
            fire.can_fire = true;
        }

        recoil.vertical_clock.stop();
        recoil.horizontal_clock.stop();
        if let Ok(aim) = owners.get(owner.0) {
            begin_recovery(&mut recoil, config, *aim);
        }
    }
}

/// System: запрос перезарядки
///
/// Guard-style no-op на полном клипе, пустом резерве или уже идущей
/// перезарядке. Таймер армируется длительностью reload montage
/// (пустой клип играет более длинный empty-вариант).
pub fn process_reload(
    mut events: EventReader<WeaponReload>,
    mut weapons: Query<(
        &WeaponOwner,
        &ResolvedWeaponConfig,
        &RuntimeWeaponData,
        &mut FireControl,
    )>,
    owners: Query<&AmmoReserves>,
    mut montages: EventWriter<MontageRequest>,
) {
    for event in events.read() {
        let Ok((owner, config, runtime, mut fire)) = weapons.get_mut(event.weapon) else {
            continue;
        };
        if fire.is_reloading {
            continue;
        }
        let Ok(reserves) = owners.get(owner.0) else {
            continue;
        };
        if reserves.get(runtime.ammo_type) == 0 {
            log(&format!("Reload ignored for {:?}: reserve empty", event.weapon));
            continue;
        }
        let chamber_bonus = if config.can_be_chambered { 1 } else { 0 };
        if runtime.clip_size >= runtime.clip_capacity + chamber_bonus {
            continue;
        }

        let montage = if runtime.clip_size == 0 {
            config.empty_reload_montage.as_ref()
        } else {
            config.reload_montage.as_ref()
        };
        // Без montage в каталоге reload всё равно занимает время
        let duration = montage.map(|m| m.duration).unwrap_or(2.0);

        fire.is_reloading = true;
        fire.can_fire = false;
        fire.trigger_held = false;
        fire.shot_timer = None;
        fire.reload_timer = Some(duration);

        if let Some(montage) = montage {
            montages.write(MontageRequest {
                owner: owner.0,
                montage: montage.montage.clone(),
                duration: montage.duration,
            });
        }
    }
}

/// System: тик reload-таймеров
///
/// По истечении — перенос патронов из резерва владельца в клип;
/// готовность к стрельбе возвращается только если movement state
/// владельца это позволяет.
pub fn tick_reload_timers(
    mut weapons: Query<(
        &WeaponOwner,
        &ResolvedWeaponConfig,
        &mut RuntimeWeaponData,
        &mut FireControl,
    )>,
    mut owners: Query<(&mut AmmoReserves, &MovementState)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    for (owner, config, mut runtime, mut fire) in weapons.iter_mut() {
        let Some(remaining) = fire.reload_timer.as_mut() else {
            continue;
        };
        *remaining -= delta;
        if *remaining > 0.0 {
            continue;
        }
        fire.reload_timer = None;
        fire.is_reloading = false;

        let Ok((mut reserves, movement)) = owners.get_mut(owner.0) else {
            continue;
        };
        let result = update_ammo(
            runtime.clip_size,
            runtime.clip_capacity,
            reserves.get(runtime.ammo_type),
            config.can_be_chambered,
        );
        runtime.clip_size = result.clip_size;
        reserves.set(runtime.ammo_type, result.reserve);

        fire.can_fire = movement.allows_firing();
    }
}

/// System: тик recoil-клоков и recovery-лерп прицела
pub fn tick_recoil(
    mut weapons: Query<(&WeaponOwner, &ResolvedWeaponConfig, &mut RecoilState)>,
    mut owners: Query<&mut AimRotation>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();
    for (owner, config, mut recoil) in weapons.iter_mut() {
        recoil.vertical_clock.tick(delta);
        recoil.horizontal_clock.tick(delta);

        if !recoil.recovery_clock.playing {
            continue;
        }
        recoil.recovery_clock.tick(delta);

        let (Some(snapshot), Some(start)) = (recoil.snapshot, recoil.recovery_start) else {
            recoil.recovery_clock.stop();
            continue;
        };
        let Ok(mut aim) = owners.get_mut(owner.0) else {
            continue;
        };

        let alpha = config
            .recovery_curve
            .sample(recoil.recovery_clock.position)
            .clamp(0.0, 1.0);
        aim.pitch = start.pitch + (snapshot.pitch - start.pitch) * alpha;
        aim.yaw = start.yaw + (snapshot.yaw - start.yaw) * alpha;

        if recoil.recovery_clock.is_finished() {
            recoil.snapshot = None;
            recoil.recovery_start = None;
            recoil.should_recover = false;
        }
    }
}

/// System: ручной ввод прицела
///
/// Владелец скомпенсировал отдачу сам — recovery для его оружия
/// отменяется, иначе прицел «утащило» бы обратно.
pub fn process_aim_input(
    mut events: EventReader<AimInput>,
    mut owners: Query<&mut AimRotation>,
    mut weapons: Query<(&WeaponOwner, &mut RecoilState)>,
) {
    for event in events.read() {
        let Ok(mut aim) = owners.get_mut(event.owner) else {
            continue;
        };
        aim.pitch += event.pitch_delta;
        aim.yaw += event.yaw_delta;

        for (owner, mut recoil) in weapons.iter_mut() {
            if owner.0 != event.owner {
                continue;
            }
            recoil.should_recover = false;
            recoil.recovery_clock.stop();
            recoil.snapshot = None;
            recoil.recovery_start = None;
        }
    }
}

/// System: зеркалирование урона на Health-компоненты симуляции
///
/// Host применяет `DamageDealt` к своим объектам; акторам, которых
/// симуляция знает сама, урон приходит здесь.
pub fn apply_bullet_damage(
    mut events: EventReader<DamageDealt>,
    mut targets: Query<&mut Health>,
) {
    for event in events.read() {
        if event.target == event.instigator {
            // Self-hit не проходит
            continue;
        }
        let Ok(mut health) = targets.get_mut(event.target) else {
            continue;
        };
        health.take_damage(event.amount);
    }
}

/// Запустить recovery от текущего прицела к snapshot
fn begin_recovery(recoil: &mut RecoilState, config: &ResolvedWeaponConfig, current: AimRotation) {
    if !recoil.should_recover || recoil.snapshot.is_none() {
        return;
    }
    recoil.recovery_start = Some(current);
    recoil.recovery_clock = PlaybackClock::with_duration(config.recovery_curve.duration());
    recoil.recovery_clock.play_from_start();
}
