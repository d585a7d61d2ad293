//! События fire-control слоя
//!
//! Два яруса:
//! - weapon-level команды (`WeaponStartFire`, ...) — inventory роутит сюда
//!   owner-level intents для активного оружия
//! - side-effect requests (`EffectRequest`, `MontageRequest`, `DamageDealt`) —
//!   единственный канал наружу, host bridge их исполняет

use bevy::prelude::*;

use crate::catalog::{CameraShakeKind, SurfaceTag};

// ============================================================================
// Weapon-level команды
// ============================================================================

/// Команда: начать стрельбу из конкретного оружия
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponStartFire {
    pub weapon: Entity,
}

/// Команда: отпустить триггер
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponStopFire {
    pub weapon: Entity,
}

/// Команда: перезарядить оружие
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponReload {
    pub weapon: Entity,
}

// ============================================================================
// Уведомления о состоянии оружия
// ============================================================================

/// Выстрел состоялся (клип уже декрементирован)
#[derive(Event, Debug, Clone, Copy)]
pub struct ShotFired {
    pub weapon: Entity,
    pub owner: Entity,
}

/// Триггер зажат на пустом клипе (AI перезаряжается по этому событию)
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponEmpty {
    pub weapon: Entity,
    pub owner: Entity,
}

/// Прочность оружия упала до нуля посреди очереди
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponDestroyed {
    pub weapon: Entity,
    pub owner: Entity,
}

// ============================================================================
// Side-effect requests (host bridge исполняет)
// ============================================================================

/// Источник урона (разные damage numbers у player/AI выстрелов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Bullet,
    AiBullet,
}

/// Урон нанесён: host применяет к своим объектам, симуляция зеркалит
/// на `Health`-компоненты, которые знает сама
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: f32,
    pub direction: Vec3,
    pub instigator: Entity,
    pub kind: DamageKind,
}

/// Запрос визуального/звукового эффекта
#[derive(Event, Debug, Clone)]
pub enum EffectRequest {
    /// Частицы попадания (выбор по surface tag)
    Impact {
        point: Vec3,
        normal: Vec3,
        surface: SurfaceTag,
    },
    /// Вспышка на дульном сокете оружия
    MuzzleFlash { weapon: Entity, socket: String },
    /// Трассер от дула до точки попадания
    Trace { start: Vec3, end: Vec3 },
    /// Звук (cue + позиция в мире)
    Sound { cue: String, position: Vec3 },
    /// Тряска камеры владельца
    CameraShake { owner: Entity, kind: CameraShakeKind },
}

/// Запрос проигрывания animation montage на владельце
///
/// Длительность — данные каталога; симуляция армирует по ней свои
/// таймеры, host играет сам montage.
#[derive(Event, Debug, Clone)]
pub struct MontageRequest {
    pub owner: Entity,
    pub montage: String,
    pub duration: f32,
}

/// Ручной ввод прицела владельца (сбрасывает recoil recovery)
#[derive(Event, Debug, Clone, Copy)]
pub struct AimInput {
    pub owner: Entity,
    pub pitch_delta: f32,
    pub yaw_delta: f32,
}
