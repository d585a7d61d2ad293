//! Компоненты инстанса оружия: runtime data, fire control, recoil state
//!
//! Таймеры — поля компонентов, тикаются FixedUpdate-системами
//! (никаких engine-side timer objects).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{AmmoType, AttachmentId, WeaponId};
use crate::components::AimRotation;
use crate::curves::PlaybackClock;

/// Тип оружия инстанса (ключ в каталог)
#[derive(Component, Debug, Clone)]
pub struct WeaponInstance(pub WeaponId);

/// Владелец оружия (actor entity)
#[derive(Component, Debug, Clone, Copy)]
pub struct WeaponOwner(pub Entity);

/// Marker активного оружия владельца (host зеркалит visibility/tick)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ActiveWeapon;

/// Мутабельное состояние инстанса оружия
///
/// Переезжает вместе с оружием: drop → pickup кэширует struct,
/// equip переносит обратно. `health` не растёт во время стрельбы.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeWeaponData {
    pub ammo_type: AmmoType,
    pub clip_capacity: u32,
    pub clip_size: u32,
    /// Прочность оружия, 0-100
    pub health: f32,
    /// Установленные attachments (максимум один на slot по построению)
    pub attachments: Vec<AttachmentId>,
}

impl RuntimeWeaponData {
    pub fn new(ammo_type: AmmoType, clip_capacity: u32) -> Self {
        Self {
            ammo_type,
            clip_capacity,
            clip_size: clip_capacity,
            health: 100.0,
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<AttachmentId>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }
}

/// Countdown-таймер (тикается системой, не движком)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownTimer {
    pub remaining: f32,
    pub interval: f32,
    pub repeating: bool,
}

impl CountdownTimer {
    pub fn repeating(interval: f32) -> Self {
        Self {
            remaining: interval,
            interval,
            repeating: true,
        }
    }

    pub fn one_shot(duration: f32) -> Self {
        Self {
            remaining: duration,
            interval: duration,
            repeating: false,
        }
    }

    /// Продвинуть таймер; `true` на тике истечения.
    /// Repeating-таймер сам ре-армится на interval.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            if self.repeating {
                self.remaining += self.interval;
            } else {
                self.remaining = 0.0;
            }
            true
        } else {
            false
        }
    }
}

/// Fire-control state machine инстанса оружия
///
/// Инварианты:
/// - `shot_timer == Some` только пока зажат триггер automatic-оружия
/// - `is_reloading` ⇒ `can_fire == false`
/// - reload не отменяется; StopFire отменяет очередь мгновенно
#[derive(Component, Debug, Clone, Default)]
pub struct FireControl {
    pub can_fire: bool,
    pub is_reloading: bool,
    /// Триггер зажат (automatic продолжает очередь по таймеру)
    pub trigger_held: bool,
    /// Выстрелов в текущей очереди (сбрасывается StopFire)
    pub shots_fired: u32,
    /// Repeating-таймер автоматической очереди
    pub shot_timer: Option<CountdownTimer>,
    /// Оставшееся время reload montage
    pub reload_timer: Option<f32>,
}

impl FireControl {
    pub fn ready() -> Self {
        Self {
            can_fire: true,
            ..Default::default()
        }
    }

    pub fn is_firing(&self) -> bool {
        self.shot_timer.is_some()
    }
}

/// Состояние отдачи инстанса оружия
///
/// Клоки двигаются FixedUpdate-тиком; выстрел сэмплирует кривые на
/// текущей позиции. `snapshot` — прицел владельца перед очередью,
/// recovery лерпит обратно к нему. Ручной ввод прицела посреди очереди
/// сбрасывает `should_recover` (игрок сам скомпенсировал).
#[derive(Component, Debug, Clone, Default)]
pub struct RecoilState {
    pub vertical_clock: PlaybackClock,
    pub horizontal_clock: PlaybackClock,
    pub recovery_clock: PlaybackClock,
    pub should_recover: bool,
    /// Прицел владельца перед очередью (цель recovery)
    pub snapshot: Option<AimRotation>,
    /// Прицел в момент старта recovery (начало лерпа)
    pub recovery_start: Option<AimRotation>,
}

/// Отложенный despawn (уничтоженное оружие живёт до конца destroy montage)
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    pub remaining: f32,
}
