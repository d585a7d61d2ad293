//! Внешние collaborators симуляции (dependency injection)
//!
//! # Архитектура
//!
//! Симуляция никогда не делает ambient lookups в host-движок.
//! Всё что ей нужно снаружи — это ray cast для hit detection,
//! и он приходит как trait object resource (`RayCastService`).
//!
//! Headless запуски (тесты, demo binary) используют `NullRayCaster`.

use bevy::prelude::*;

use crate::catalog::SurfaceTag;

/// Результат ray cast из host-мира
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Точка попадания (мировые координаты)
    pub point: Vec3,
    /// Нормаль поверхности в точке попадания
    pub normal: Vec3,
    /// Tag поверхности (выбор impact-эффекта, headshot detection)
    pub surface: SurfaceTag,
    /// Entity, в которую попали (если host её знает)
    pub entity: Option<Entity>,
}

/// Trace service: единственный канал hit detection
///
/// Host предоставляет реализацию поверх своей физики.
pub trait RayCaster: Send + Sync {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Resource-обёртка над injected ray caster
#[derive(Resource)]
pub struct RayCastService(pub Box<dyn RayCaster>);

impl RayCastService {
    pub fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.0.cast_ray(origin, direction, max_distance)
    }
}

/// No-op caster для headless симуляции: всё уходит в молоко
pub struct NullRayCaster;

impl RayCaster for NullRayCaster {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
        None
    }
}

/// Тестовый caster: всегда попадает в фиксированную цель
pub struct FixedHitCaster {
    pub surface: SurfaceTag,
    pub entity: Option<Entity>,
}

impl RayCaster for FixedHitCaster {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        Some(RayHit {
            point: origin + direction.normalize_or_zero() * max_distance,
            normal: -direction.normalize_or_zero(),
            surface: self.surface,
            entity: self.entity,
        })
    }
}
