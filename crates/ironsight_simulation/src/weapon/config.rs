//! Resolved weapon configuration — статика + attachments → эффективные параметры
//!
//! # Архитектура
//!
//! `resolve()` — чистая функция, пересчитывается целиком при spawn оружия
//! и любой смене attachments (никаких инкрементальных патчей):
//!
//! 1. Старт с копии `WeaponStaticData`
//! 2. Один проход по каноническому порядку слотов
//!    Barrel→Magazine→Sights→Stock→Grip: числовые дельты суммируются,
//!    per-slot overrides применяются last-writer-wins (по построению
//!    randomizer в slot максимум один attachment). Фиксированный
//!    порядок суммирования делает результат независимым от порядка
//!    входного массива
//!
//! Неизвестные attachment IDs пропускаются с warning: кривой контент
//! не должен ронять симуляцию.

use bevy::prelude::*;

use crate::catalog::{
    AiWeaponParams, AmmoType, AttachmentId, AttachmentSlot, CameraShakeKind, GripAnimSet,
    MontageRef, SlotOverrides, WeaponCatalog, WeaponId, WeaponStaticData,
};
use crate::curves::CurveSampler;
use crate::log_warning;

/// Эффективная конфигурация инстанса оружия (компонент на weapon entity)
///
/// Делится на "modifiers" (суммы дельт поверх базы) и "overridden"
/// (последний attachment в каноническом порядке победил).
#[derive(Component, Clone, Debug, PartialEq)]
pub struct ResolvedWeaponConfig {
    pub name: String,

    // === Суммированные модификаторы ===
    pub damage: f32,
    pub headshot_multiplier: f32,
    pub pitch_variation: f32,
    pub yaw_variation: f32,
    /// 1.0 + сумма дельт attachments
    pub vertical_recoil_multiplier: f32,
    pub horizontal_recoil_multiplier: f32,

    // === Fire control (может быть переопределён Magazine) ===
    pub rate_of_fire: f32,
    pub automatic_fire: bool,
    pub is_shotgun: bool,
    pub shotgun_pellets: u32,
    pub shotgun_range: f32,
    pub range: f32,
    pub accuracy_debuff: f32,
    pub per_shot_degradation: f32,

    // === Ammo seed (Magazine) ===
    pub ammo_type: AmmoType,
    pub clip_capacity: u32,
    pub can_be_chambered: bool,

    // === Sockets / sound (Barrel + Magazine) ===
    pub muzzle_socket: String,
    pub particle_socket: String,
    pub silenced: bool,
    pub fire_sound: String,
    pub silenced_fire_sound: String,
    pub empty_fire_sound: String,

    // === Recoil timelines ===
    pub vertical_recoil_curve: CurveSampler,
    pub horizontal_recoil_curve: CurveSampler,
    pub recovery_curve: CurveSampler,
    pub camera_shake: CameraShakeKind,

    // === Montages ===
    pub equip_montage: Option<MontageRef>,
    pub reload_montage: Option<MontageRef>,
    pub empty_reload_montage: Option<MontageRef>,
    pub destroyed_montage: Option<MontageRef>,

    // === Анимации владельца (Grip) ===
    pub anim_set: GripAnimSet,

    // === Scope / FOV (Sights) ===
    pub aiming_fov: bool,
    pub aiming_fov_change: f32,
    pub is_scope: bool,
    pub scope_magnification: f32,
    pub unmagnified_lfov: f32,
    pub vertical_camera_offset: f32,

    // === AI fire variant ===
    pub ai_params: AiWeaponParams,
}

/// Свернуть статику оружия с attachment rows в эффективную конфигурацию
///
/// `None` только если сам weapon row отсутствует в каталоге.
pub fn resolve(
    catalog: &WeaponCatalog,
    weapon_id: &WeaponId,
    attachment_ids: &[AttachmentId],
) -> Option<ResolvedWeaponConfig> {
    let base = catalog.weapon_row(weapon_id)?;
    let mut config = ResolvedWeaponConfig::from_static(base);

    // Известные rows (неизвестные ID — warning и skip)
    let rows: Vec<(&AttachmentId, &_)> = attachment_ids
        .iter()
        .filter_map(|id| match catalog.attachment_row(id) {
            Some(row) => Some((id, row)),
            None => {
                log_warning(&format!(
                    "Weapon {:?}: unknown attachment id {:?}, skipping",
                    weapon_id, id
                ));
                None
            }
        })
        .collect();

    // Дельты и overrides идут в каноническом порядке слотов:
    // float-сложение не ассоциативно, порядок входного массива не
    // должен влиять на результат. Внутри slot — last-writer-wins.
    for slot in AttachmentSlot::CANONICAL_ORDER {
        for (_, row) in rows.iter().filter(|(_, row)| row.slot == slot) {
            config.damage += row.base_damage_impact;
            config.pitch_variation += row.pitch_variation_impact;
            config.yaw_variation += row.yaw_variation_impact;
            config.vertical_recoil_multiplier += row.vertical_recoil_multiplier;
            config.horizontal_recoil_multiplier += row.horizontal_recoil_multiplier;
            config.apply_overrides(&row.overrides);
        }
    }

    Some(config)
}

/// FOV увеличенного прицела из linear FOV и кратности
///
/// lfov — ширина видимой области на 100 единицах дистанции без увеличения.
pub fn fov_from_magnification(unmagnified_lfov: f32, magnification: f32) -> f32 {
    ((unmagnified_lfov / magnification) / 2.0 / 100.0).atan().to_degrees() * 2.0
}

impl ResolvedWeaponConfig {
    fn from_static(base: &WeaponStaticData) -> Self {
        Self {
            name: base.name.clone(),
            damage: base.base_damage,
            headshot_multiplier: base.headshot_multiplier,
            pitch_variation: base.pitch_variation,
            yaw_variation: base.yaw_variation,
            vertical_recoil_multiplier: 1.0,
            horizontal_recoil_multiplier: 1.0,
            rate_of_fire: base.rate_of_fire,
            automatic_fire: base.automatic_fire,
            is_shotgun: base.is_shotgun,
            shotgun_pellets: base.shotgun_pellets,
            shotgun_range: base.shotgun_range,
            range: base.range,
            accuracy_debuff: base.accuracy_debuff,
            per_shot_degradation: base.per_shot_degradation,
            ammo_type: base.ammo_type,
            clip_capacity: base.clip_capacity,
            can_be_chambered: base.can_be_chambered,
            muzzle_socket: base.muzzle_socket.clone(),
            particle_socket: base.particle_socket.clone(),
            silenced: base.silenced,
            fire_sound: base.fire_sound.clone(),
            silenced_fire_sound: base.silenced_fire_sound.clone(),
            empty_fire_sound: base.empty_fire_sound.clone(),
            vertical_recoil_curve: base.vertical_recoil_curve.clone(),
            horizontal_recoil_curve: base.horizontal_recoil_curve.clone(),
            recovery_curve: base.recovery_curve.clone(),
            camera_shake: base.camera_shake,
            equip_montage: base.equip_montage.clone(),
            reload_montage: base.reload_montage.clone(),
            empty_reload_montage: base.empty_reload_montage.clone(),
            destroyed_montage: base.destroyed_montage.clone(),
            anim_set: base.anim_set.clone(),
            aiming_fov: base.aiming_fov,
            aiming_fov_change: base.aiming_fov_change,
            is_scope: base.is_scope,
            scope_magnification: base.scope_magnification,
            unmagnified_lfov: base.unmagnified_lfov,
            vertical_camera_offset: 0.0,
            ai_params: base.ai_params.clone(),
        }
    }

    fn apply_overrides(&mut self, overrides: &SlotOverrides) {
        match overrides {
            SlotOverrides::Barrel(barrel) => {
                self.muzzle_socket = barrel.muzzle_socket.clone();
                self.particle_socket = barrel.particle_socket.clone();
                self.silenced = barrel.silenced;
            }
            SlotOverrides::Magazine(magazine) => {
                self.fire_sound = magazine.fire_sound.clone();
                self.silenced_fire_sound = magazine.silenced_fire_sound.clone();
                self.rate_of_fire = magazine.rate_of_fire;
                self.automatic_fire = magazine.automatic_fire;
                self.per_shot_degradation = magazine.per_shot_degradation;
                self.vertical_recoil_curve = magazine.vertical_recoil_curve.clone();
                self.horizontal_recoil_curve = magazine.horizontal_recoil_curve.clone();
                self.camera_shake = magazine.camera_shake;
                self.is_shotgun = magazine.is_shotgun;
                self.shotgun_range = magazine.shotgun_range;
                self.shotgun_pellets = magazine.shotgun_pellets;
                self.accuracy_debuff = magazine.accuracy_debuff;
                self.reload_montage = magazine.reload_montage.clone();
                self.empty_reload_montage = magazine.empty_reload_montage.clone();
                self.destroyed_montage = magazine.destroyed_montage.clone();
                self.ammo_type = magazine.ammo_type;
                self.clip_capacity = magazine.clip_capacity;
                self.ai_params = magazine.ai_params.clone();
            }
            SlotOverrides::Sights(sights) => {
                self.aiming_fov = sights.aiming_fov;
                self.aiming_fov_change = sights.aiming_fov_change;
                self.is_scope = sights.is_scope;
                self.scope_magnification = sights.scope_magnification;
                self.unmagnified_lfov = sights.unmagnified_lfov;
                self.vertical_camera_offset = sights.vertical_camera_offset;
            }
            SlotOverrides::Stock => {}
            SlotOverrides::Grip(anim_set) => {
                // Grip переопределяет только объявленные анимации
                if anim_set.idle.is_some() {
                    self.anim_set.idle = anim_set.idle.clone();
                }
                if anim_set.walk_blend_space.is_some() {
                    self.anim_set.walk_blend_space = anim_set.walk_blend_space.clone();
                }
                if anim_set.sprint.is_some() {
                    self.anim_set.sprint = anim_set.sprint.clone();
                }
                if anim_set.ads_idle.is_some() {
                    self.anim_set.ads_idle = anim_set.ads_idle.clone();
                }
                if anim_set.ads_walk_blend_space.is_some() {
                    self.anim_set.ads_walk_blend_space = anim_set.ads_walk_blend_space.clone();
                }
            }
        }
    }

    /// FOV в режиме прицеливания для scope-оптики
    pub fn scoped_fov(&self) -> Option<f32> {
        if self.is_scope && self.scope_magnification > 0.0 {
            Some(fov_from_magnification(
                self.unmagnified_lfov,
                self.scope_magnification,
            ))
        } else {
            None
        }
    }
}
