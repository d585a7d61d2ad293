//! Базовые компоненты акторов: Health, MovementState, aim state

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Состояние движения владельца оружия
///
/// Стрельба запрещена в Sprinting/Sliding: системы fire-control проверяют
/// `allows_firing()` перед StartFire и при ре-арме после reload.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovementState {
    #[default]
    Idle,
    Walking,
    Sprinting,
    Sliding,
}

impl MovementState {
    pub fn allows_firing(&self) -> bool {
        matches!(self, MovementState::Idle | MovementState::Walking)
    }
}

/// Прицельная ориентация владельца (pitch/yaw, градусы)
///
/// Recoil-системы пишут импульсы сюда; recovery лерпит обратно к snapshot.
/// Host зеркалит в camera controller.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct AimRotation {
    pub pitch: f32,
    pub yaw: f32,
}

/// Режим прицеливания владельца
///
/// HipFire → разброс умножается на accuracy debuff оружия.
/// Ads (aim down sights) → полная точность, host меняет FOV.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AimMode {
    #[default]
    HipFire,
    Ads,
}

impl AimMode {
    pub fn is_aiming(&self) -> bool {
        matches!(self, AimMode::Ads)
    }
}

/// Точка и направление прицеливания владельца (муzzle origin для trace)
///
/// Host обновляет из camera transform каждый кадр.
#[derive(Component, Debug, Clone, Copy)]
pub struct AimOrigin {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Default for AimOrigin {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_floors_at_zero() {
        let mut health = Health::new(100.0);
        health.take_damage(30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        health.take_damage(100.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_movement_state_firing_rules() {
        assert!(MovementState::Idle.allows_firing());
        assert!(MovementState::Walking.allows_firing());
        assert!(!MovementState::Sprinting.allows_firing());
        assert!(!MovementState::Sliding.allows_firing());
    }
}
