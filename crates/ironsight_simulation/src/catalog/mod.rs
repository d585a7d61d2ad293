//! Weapon & attachment catalog — статические данные (keyed row store)
//!
//! # Архитектура
//!
//! **WeaponStaticData** — immutable row на тип оружия:
//! - Хранится в `WeaponCatalog` resource (HashMap lookup)
//! - Immutable данные (damage, rate of fire, clip capacity, curves, sockets)
//! - Создаются hardcoded в `WeaponCatalog::default()` (позже из RON)
//!
//! **AttachmentData** — immutable row на attachment:
//! - Ровно один slot type на attachment (Barrel/Magazine/Sights/Stock/Grip)
//! - Числовые дельты суммируются, per-slot overrides применяются
//!   last-writer-wins в `weapon::config::resolve`
//!
//! Lookup всегда возвращает `Option` — отсутствующая строка это
//! предупреждение (content-authoring mistake), а не crash.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::curves::CurveSampler;

// ============================================================================
// Identifiers
// ============================================================================

/// Weapon row identifier (unique string ID)
///
/// # Examples
/// - "service_pistol"
/// - "battle_rifle"
/// - "pump_shotgun"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponId(pub String);

impl From<&str> for WeaponId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Attachment row identifier (unique string ID)
///
/// # Examples
/// - "barrel_suppressor"
/// - "mag_extended"
/// - "sights_scope_4x"
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttachmentId(pub String);

impl From<&str> for AttachmentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Тип боеприпаса (общий пул на владельца, см. `AmmoReserves`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmmoType {
    Pistol,
    Rifle,
    Shotgun,
    Special,
}

/// Attachment slot — не больше одного attachment на slot на оружие
///
/// `CANONICAL_ORDER` фиксирует порядок применения overrides при resolve:
/// результат детерминирован независимо от порядка массива attachments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttachmentSlot {
    Barrel,
    Magazine,
    Sights,
    Stock,
    Grip,
}

impl AttachmentSlot {
    pub const CANONICAL_ORDER: [AttachmentSlot; 5] = [
        AttachmentSlot::Barrel,
        AttachmentSlot::Magazine,
        AttachmentSlot::Sights,
        AttachmentSlot::Stock,
        AttachmentSlot::Grip,
    ];
}

/// Surface tag из ray cast — выбор impact-эффекта и headshot detection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceTag {
    Flesh,
    Head,
    Ground,
    Rock,
    Default,
}

/// Camera shake kind (исполняется host-слоем)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraShakeKind {
    LightRecoil,
    MediumRecoil,
    HeavyRecoil,
}

// ============================================================================
// WeaponStaticData
// ============================================================================

/// Параметры AI-варианта стрельбы (из AI weapon row)
///
/// AI стартует с max variation и улучшает точность каждым выстрелом
/// (clamped к min), имитируя "пристрелку" по цели.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiWeaponParams {
    /// Темп стрельбы AI (выстрелов в минуту)
    pub rounds_per_minute: f32,
    /// Плоский урон AI-выстрела (не зависит от attachments)
    pub damage: f32,
    pub max_pitch_variation: f32,
    pub min_pitch_variation: f32,
    pub max_yaw_variation: f32,
    pub min_yaw_variation: f32,
    /// Насколько variation уменьшается за выстрел
    pub per_shot_accuracy_improvement: f32,
}

impl Default for AiWeaponParams {
    fn default() -> Self {
        Self {
            rounds_per_minute: 300.0,
            damage: 8.0,
            max_pitch_variation: 4.0,
            min_pitch_variation: 0.5,
            max_yaw_variation: 4.0,
            min_yaw_variation: 0.5,
            per_shot_accuracy_improvement: 0.5,
        }
    }
}

/// Static weapon row (immutable template, shared всеми инстансами типа)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponStaticData {
    /// Локализованное название
    pub name: String,

    // === Damage ===
    pub base_damage: f32,
    pub headshot_multiplier: f32,

    // === Accuracy ===
    /// Базовый разброс (градусы) по pitch/yaw
    pub pitch_variation: f32,
    pub yaw_variation: f32,
    /// Множитель разброса когда владелец НЕ целится (hip fire)
    pub accuracy_debuff: f32,

    // === Fire control ===
    /// Интервал между выстрелами (секунды)
    pub rate_of_fire: f32,
    pub automatic_fire: bool,
    pub is_shotgun: bool,
    pub shotgun_pellets: u32,
    pub shotgun_range: f32,
    /// Дальность trace для не-shotgun выстрела (метры)
    pub range: f32,

    // === Ammo ===
    pub ammo_type: AmmoType,
    pub clip_capacity: u32,
    /// Может ли держать патрон в патроннике (+1 к максимуму клипа)
    pub can_be_chambered: bool,

    // === Degradation ===
    /// Урон прочности оружия за выстрел (health 0-100)
    pub per_shot_degradation: f32,

    // === Attachments ===
    pub has_attachments: bool,

    // === Sockets / visuals (исполняются host-слоем) ===
    pub muzzle_socket: String,
    pub particle_socket: String,
    pub silenced: bool,

    // === Sounds ===
    pub fire_sound: String,
    pub silenced_fire_sound: String,
    pub empty_fire_sound: String,

    // === Recoil ===
    pub vertical_recoil_curve: CurveSampler,
    pub horizontal_recoil_curve: CurveSampler,
    pub recovery_curve: CurveSampler,
    pub camera_shake: CameraShakeKind,

    // === Animation montages (идентификаторы + длительности для таймеров) ===
    pub equip_montage: Option<MontageRef>,
    pub reload_montage: Option<MontageRef>,
    pub empty_reload_montage: Option<MontageRef>,
    pub destroyed_montage: Option<MontageRef>,

    // === Grip animation set (может быть переопределён Grip attachment) ===
    pub anim_set: GripAnimSet,

    // === Scope / FOV ===
    pub aiming_fov: bool,
    pub aiming_fov_change: f32,
    pub is_scope: bool,
    pub scope_magnification: f32,
    pub unmagnified_lfov: f32,

    // === AI fire variant ===
    pub ai_params: AiWeaponParams,
}

/// Ссылка на animation montage + длительность (секунды)
///
/// Длительность — данные каталога: симуляция армирует таймеры по ней,
/// host играет сам montage по идентификатору.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MontageRef {
    pub montage: String,
    pub duration: f32,
}

impl MontageRef {
    pub fn new(montage: impl Into<String>, duration: f32) -> Self {
        Self {
            montage: montage.into(),
            duration,
        }
    }
}

/// Набор анимаций владельца, зависящий от хвата (idle/walk/sprint/ADS)
///
/// Поля опциональны: Grip attachment переопределяет только те, что объявил.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GripAnimSet {
    pub idle: Option<String>,
    pub walk_blend_space: Option<String>,
    pub sprint: Option<String>,
    pub ads_idle: Option<String>,
    pub ads_walk_blend_space: Option<String>,
}

// ============================================================================
// AttachmentData
// ============================================================================

/// Barrel-specific overrides
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BarrelOverrides {
    pub muzzle_socket: String,
    pub particle_socket: String,
    pub silenced: bool,
}

/// Magazine-specific overrides (функциональное "сердце" оружия)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagazineOverrides {
    pub fire_sound: String,
    pub silenced_fire_sound: String,
    pub rate_of_fire: f32,
    pub automatic_fire: bool,
    pub per_shot_degradation: f32,
    pub vertical_recoil_curve: CurveSampler,
    pub horizontal_recoil_curve: CurveSampler,
    pub camera_shake: CameraShakeKind,
    pub is_shotgun: bool,
    pub shotgun_range: f32,
    pub shotgun_pellets: u32,
    pub accuracy_debuff: f32,
    pub reload_montage: Option<MontageRef>,
    pub empty_reload_montage: Option<MontageRef>,
    pub destroyed_montage: Option<MontageRef>,
    /// Seed для RuntimeWeaponData при ПЕРВОМ spawn пикапа
    /// (runtime-spawned пикапы сохраняют свой кэш)
    pub ammo_type: AmmoType,
    pub clip_capacity: u32,
    pub clip_size: u32,
    pub ai_params: AiWeaponParams,
}

/// Sights-specific overrides
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SightsOverrides {
    pub aiming_fov: bool,
    pub aiming_fov_change: f32,
    pub is_scope: bool,
    pub scope_magnification: f32,
    pub unmagnified_lfov: f32,
    pub vertical_camera_offset: f32,
}

/// Per-slot функциональные overrides
///
/// Инвариант данных: вариант соответствует `slot` (Stock не несёт overrides —
/// только числовые дельты).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SlotOverrides {
    Barrel(BarrelOverrides),
    Magazine(Box<MagazineOverrides>),
    Sights(SightsOverrides),
    Stock,
    Grip(GripAnimSet),
}

/// Static attachment row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttachmentData {
    pub name: String,
    /// Ровно один slot type на attachment
    pub slot: AttachmentSlot,

    // === Числовые дельты (суммируются, порядок не важен) ===
    pub base_damage_impact: f32,
    pub pitch_variation_impact: f32,
    pub yaw_variation_impact: f32,
    pub vertical_recoil_multiplier: f32,
    pub horizontal_recoil_multiplier: f32,

    /// Attachments, несовместимые с этим (для ReplaceIncompatible)
    pub incompatible_attachments: Vec<AttachmentId>,

    /// Функциональные overrides, зависящие от slot
    pub overrides: SlotOverrides,
}

// ============================================================================
// Catalogs (Resources)
// ============================================================================

/// Weapon + attachment row store (resource)
///
/// Создаётся один раз при старте (hardcoded или из RON на host-стороне).
/// Никогда не мутируется в процессе симуляции.
#[derive(Resource, Clone, Debug)]
pub struct WeaponCatalog {
    weapons: HashMap<WeaponId, WeaponStaticData>,
    attachments: HashMap<AttachmentId, AttachmentData>,
}

impl WeaponCatalog {
    pub fn new() -> Self {
        Self {
            weapons: HashMap::new(),
            attachments: HashMap::new(),
        }
    }

    /// Получить weapon row по ID (`None` = missing row, caller логирует)
    pub fn weapon_row(&self, id: &WeaponId) -> Option<&WeaponStaticData> {
        self.weapons.get(id)
    }

    /// Получить attachment row по ID
    pub fn attachment_row(&self, id: &AttachmentId) -> Option<&AttachmentData> {
        self.attachments.get(id)
    }

    pub fn add_weapon(&mut self, id: impl Into<WeaponId>, row: WeaponStaticData) {
        self.weapons.insert(id.into(), row);
    }

    pub fn add_attachment(&mut self, id: impl Into<AttachmentId>, row: AttachmentData) {
        self.attachments.insert(id.into(), row);
    }

    /// Все attachment keys, отсортированные для детерминизма
    /// (HashMap iteration order недетерминирован)
    pub fn attachment_ids_sorted(&self) -> Vec<AttachmentId> {
        let mut ids: Vec<_> = self.attachments.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Attachment keys одного slot, отсортированные
    pub fn attachments_for_slot(&self, slot: AttachmentSlot) -> Vec<AttachmentId> {
        let mut ids: Vec<_> = self
            .attachments
            .iter()
            .filter(|(_, row)| row.slot == slot)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

impl Default for WeaponCatalog {
    /// Hardcoded rows (базовый арсенал)
    fn default() -> Self {
        let mut catalog = Self::new();

        // === WEAPONS ===

        catalog.add_weapon("service_pistol", WeaponStaticData::service_pistol());
        catalog.add_weapon("battle_rifle", WeaponStaticData::battle_rifle());
        catalog.add_weapon("pump_shotgun", WeaponStaticData::pump_shotgun());

        // === ATTACHMENTS (для battle_rifle) ===

        // Barrels
        catalog.add_attachment(
            "barrel_standard",
            AttachmentData {
                name: "Standard Barrel".to_string(),
                slot: AttachmentSlot::Barrel,
                base_damage_impact: 0.0,
                pitch_variation_impact: 0.0,
                yaw_variation_impact: 0.0,
                vertical_recoil_multiplier: 0.0,
                horizontal_recoil_multiplier: 0.0,
                incompatible_attachments: vec![],
                overrides: SlotOverrides::Barrel(BarrelOverrides {
                    muzzle_socket: "muzzle_standard".to_string(),
                    particle_socket: "particle_standard".to_string(),
                    silenced: false,
                }),
            },
        );
        catalog.add_attachment(
            "barrel_suppressor",
            AttachmentData {
                name: "Suppressor".to_string(),
                slot: AttachmentSlot::Barrel,
                base_damage_impact: -2.0,
                pitch_variation_impact: -0.1,
                yaw_variation_impact: -0.1,
                vertical_recoil_multiplier: -0.1,
                horizontal_recoil_multiplier: -0.05,
                // Rapid magazine перегревает suppressor
                incompatible_attachments: vec!["mag_rapid".into()],
                overrides: SlotOverrides::Barrel(BarrelOverrides {
                    muzzle_socket: "muzzle_suppressed".to_string(),
                    particle_socket: "particle_suppressed".to_string(),
                    silenced: true,
                }),
            },
        );

        // Magazines
        catalog.add_attachment(
            "mag_standard",
            AttachmentData {
                name: "Standard Magazine".to_string(),
                slot: AttachmentSlot::Magazine,
                base_damage_impact: 0.0,
                pitch_variation_impact: 0.0,
                yaw_variation_impact: 0.0,
                vertical_recoil_multiplier: 0.0,
                horizontal_recoil_multiplier: 0.0,
                incompatible_attachments: vec![],
                overrides: SlotOverrides::Magazine(Box::new(MagazineOverrides {
                    fire_sound: "sfx_rifle_shot".to_string(),
                    silenced_fire_sound: "sfx_rifle_shot_suppressed".to_string(),
                    rate_of_fire: 0.1,
                    automatic_fire: true,
                    per_shot_degradation: 0.25,
                    vertical_recoil_curve: CurveSampler::new(vec![
                        (0.0, 1.2),
                        (0.3, 0.7),
                        (1.0, 0.4),
                    ]),
                    horizontal_recoil_curve: CurveSampler::new(vec![
                        (0.0, 0.3),
                        (0.5, 0.15),
                        (1.0, 0.1),
                    ]),
                    camera_shake: CameraShakeKind::MediumRecoil,
                    is_shotgun: false,
                    shotgun_range: 0.0,
                    shotgun_pellets: 0,
                    accuracy_debuff: 1.5,
                    reload_montage: Some(MontageRef::new("am_rifle_reload", 2.1)),
                    empty_reload_montage: Some(MontageRef::new("am_rifle_reload_empty", 2.7)),
                    destroyed_montage: Some(MontageRef::new("am_rifle_destroyed", 1.8)),
                    ammo_type: AmmoType::Rifle,
                    clip_capacity: 30,
                    clip_size: 30,
                    ai_params: AiWeaponParams::default(),
                })),
            },
        );
        catalog.add_attachment(
            "mag_rapid",
            AttachmentData {
                name: "Rapid Magazine".to_string(),
                slot: AttachmentSlot::Magazine,
                base_damage_impact: -1.0,
                pitch_variation_impact: 0.3,
                yaw_variation_impact: 0.3,
                vertical_recoil_multiplier: 0.25,
                horizontal_recoil_multiplier: 0.15,
                incompatible_attachments: vec!["barrel_suppressor".into()],
                overrides: SlotOverrides::Magazine(Box::new(MagazineOverrides {
                    fire_sound: "sfx_rifle_shot_rapid".to_string(),
                    silenced_fire_sound: "sfx_rifle_shot_suppressed".to_string(),
                    rate_of_fire: 0.06,
                    automatic_fire: true,
                    per_shot_degradation: 0.4,
                    vertical_recoil_curve: CurveSampler::new(vec![
                        (0.0, 1.5),
                        (0.3, 1.0),
                        (1.0, 0.6),
                    ]),
                    horizontal_recoil_curve: CurveSampler::new(vec![
                        (0.0, 0.5),
                        (0.5, 0.3),
                        (1.0, 0.2),
                    ]),
                    camera_shake: CameraShakeKind::HeavyRecoil,
                    is_shotgun: false,
                    shotgun_range: 0.0,
                    shotgun_pellets: 0,
                    accuracy_debuff: 1.8,
                    reload_montage: Some(MontageRef::new("am_rifle_reload_rapid", 1.7)),
                    empty_reload_montage: Some(MontageRef::new("am_rifle_reload_rapid_empty", 2.2)),
                    destroyed_montage: Some(MontageRef::new("am_rifle_destroyed", 1.8)),
                    ammo_type: AmmoType::Rifle,
                    clip_capacity: 20,
                    clip_size: 20,
                    ai_params: AiWeaponParams::default(),
                })),
            },
        );

        // Sights
        catalog.add_attachment(
            "sights_iron",
            AttachmentData {
                name: "Iron Sights".to_string(),
                slot: AttachmentSlot::Sights,
                base_damage_impact: 0.0,
                pitch_variation_impact: 0.0,
                yaw_variation_impact: 0.0,
                vertical_recoil_multiplier: 0.0,
                horizontal_recoil_multiplier: 0.0,
                incompatible_attachments: vec![],
                overrides: SlotOverrides::Sights(SightsOverrides {
                    aiming_fov: false,
                    aiming_fov_change: 0.0,
                    is_scope: false,
                    scope_magnification: 1.0,
                    unmagnified_lfov: 0.0,
                    vertical_camera_offset: 0.0,
                }),
            },
        );
        catalog.add_attachment(
            "sights_scope_4x",
            AttachmentData {
                name: "4x Scope".to_string(),
                slot: AttachmentSlot::Sights,
                base_damage_impact: 0.0,
                pitch_variation_impact: -0.2,
                yaw_variation_impact: -0.2,
                vertical_recoil_multiplier: 0.05,
                horizontal_recoil_multiplier: 0.0,
                incompatible_attachments: vec![],
                overrides: SlotOverrides::Sights(SightsOverrides {
                    aiming_fov: true,
                    aiming_fov_change: -15.0,
                    is_scope: true,
                    scope_magnification: 4.0,
                    unmagnified_lfov: 20.0,
                    vertical_camera_offset: 2.5,
                }),
            },
        );

        // Stocks (только числовые дельты)
        catalog.add_attachment(
            "stock_polymer",
            AttachmentData {
                name: "Polymer Stock".to_string(),
                slot: AttachmentSlot::Stock,
                base_damage_impact: 0.0,
                pitch_variation_impact: -0.1,
                yaw_variation_impact: -0.1,
                vertical_recoil_multiplier: -0.15,
                horizontal_recoil_multiplier: -0.1,
                incompatible_attachments: vec![],
                overrides: SlotOverrides::Stock,
            },
        );
        catalog.add_attachment(
            "stock_skeleton",
            AttachmentData {
                name: "Skeleton Stock".to_string(),
                slot: AttachmentSlot::Stock,
                base_damage_impact: 0.0,
                pitch_variation_impact: 0.1,
                yaw_variation_impact: 0.1,
                vertical_recoil_multiplier: 0.1,
                horizontal_recoil_multiplier: 0.05,
                incompatible_attachments: vec![],
                overrides: SlotOverrides::Stock,
            },
        );

        // Grips
        catalog.add_attachment(
            "grip_vertical",
            AttachmentData {
                name: "Vertical Grip".to_string(),
                slot: AttachmentSlot::Grip,
                base_damage_impact: 0.0,
                pitch_variation_impact: -0.15,
                yaw_variation_impact: 0.0,
                vertical_recoil_multiplier: -0.2,
                horizontal_recoil_multiplier: 0.0,
                incompatible_attachments: vec![],
                overrides: SlotOverrides::Grip(GripAnimSet {
                    idle: Some("anim_idle_vgrip".to_string()),
                    walk_blend_space: Some("bs_walk_vgrip".to_string()),
                    sprint: None,
                    ads_idle: Some("anim_ads_idle_vgrip".to_string()),
                    ads_walk_blend_space: None,
                }),
            },
        );
        catalog.add_attachment(
            "grip_angled",
            AttachmentData {
                name: "Angled Grip".to_string(),
                slot: AttachmentSlot::Grip,
                base_damage_impact: 0.0,
                pitch_variation_impact: 0.0,
                yaw_variation_impact: -0.15,
                vertical_recoil_multiplier: 0.0,
                horizontal_recoil_multiplier: -0.2,
                incompatible_attachments: vec![],
                overrides: SlotOverrides::Grip(GripAnimSet::default()),
            },
        );

        catalog
    }
}

// ============================================================================
// Weapon presets
// ============================================================================

impl WeaponStaticData {
    /// Service pistol preset (без attachments, semi-auto)
    pub fn service_pistol() -> Self {
        Self {
            name: "Service Pistol".to_string(),
            base_damage: 12.0,
            headshot_multiplier: 2.0,
            pitch_variation: 0.4,
            yaw_variation: 0.4,
            accuracy_debuff: 1.3,
            rate_of_fire: 0.2,
            automatic_fire: false,
            is_shotgun: false,
            shotgun_pellets: 0,
            shotgun_range: 0.0,
            range: 40.0,
            ammo_type: AmmoType::Pistol,
            clip_capacity: 12,
            can_be_chambered: true,
            per_shot_degradation: 0.1,
            has_attachments: false,
            muzzle_socket: "muzzle".to_string(),
            particle_socket: "particle_spawn".to_string(),
            silenced: false,
            fire_sound: "sfx_pistol_shot".to_string(),
            silenced_fire_sound: "sfx_pistol_shot_suppressed".to_string(),
            empty_fire_sound: "sfx_dry_fire".to_string(),
            vertical_recoil_curve: CurveSampler::new(vec![(0.0, 0.8), (1.0, 0.8)]),
            horizontal_recoil_curve: CurveSampler::new(vec![(0.0, 0.2), (1.0, 0.2)]),
            recovery_curve: CurveSampler::new(vec![(0.0, 0.0), (0.3, 1.0)]),
            camera_shake: CameraShakeKind::LightRecoil,
            equip_montage: Some(MontageRef::new("am_pistol_equip", 0.6)),
            reload_montage: Some(MontageRef::new("am_pistol_reload", 1.6)),
            empty_reload_montage: Some(MontageRef::new("am_pistol_reload_empty", 2.0)),
            destroyed_montage: Some(MontageRef::new("am_pistol_destroyed", 1.4)),
            anim_set: GripAnimSet {
                idle: Some("anim_pistol_idle".to_string()),
                walk_blend_space: Some("bs_pistol_walk".to_string()),
                sprint: Some("anim_pistol_sprint".to_string()),
                ads_idle: Some("anim_pistol_ads_idle".to_string()),
                ads_walk_blend_space: Some("bs_pistol_ads_walk".to_string()),
            },
            aiming_fov: false,
            aiming_fov_change: 0.0,
            is_scope: false,
            scope_magnification: 1.0,
            unmagnified_lfov: 0.0,
            ai_params: AiWeaponParams {
                rounds_per_minute: 120.0,
                damage: 5.0,
                ..AiWeaponParams::default()
            },
        }
    }

    /// Battle rifle preset (attachments-driven: magazine определяет fire mode)
    pub fn battle_rifle() -> Self {
        Self {
            name: "Battle Rifle".to_string(),
            base_damage: 20.0,
            headshot_multiplier: 1.8,
            pitch_variation: 0.6,
            yaw_variation: 0.6,
            accuracy_debuff: 1.5,
            rate_of_fire: 0.1,
            automatic_fire: true,
            is_shotgun: false,
            shotgun_pellets: 0,
            shotgun_range: 0.0,
            range: 120.0,
            ammo_type: AmmoType::Rifle,
            clip_capacity: 30,
            can_be_chambered: true,
            per_shot_degradation: 0.25,
            has_attachments: true,
            muzzle_socket: "muzzle".to_string(),
            particle_socket: "particle_spawn".to_string(),
            silenced: false,
            fire_sound: "sfx_rifle_shot".to_string(),
            silenced_fire_sound: "sfx_rifle_shot_suppressed".to_string(),
            empty_fire_sound: "sfx_dry_fire".to_string(),
            vertical_recoil_curve: CurveSampler::new(vec![(0.0, 1.2), (0.3, 0.7), (1.0, 0.4)]),
            horizontal_recoil_curve: CurveSampler::new(vec![(0.0, 0.3), (0.5, 0.15), (1.0, 0.1)]),
            recovery_curve: CurveSampler::new(vec![(0.0, 0.0), (0.5, 1.0)]),
            camera_shake: CameraShakeKind::MediumRecoil,
            equip_montage: Some(MontageRef::new("am_rifle_equip", 0.8)),
            reload_montage: Some(MontageRef::new("am_rifle_reload", 2.1)),
            empty_reload_montage: Some(MontageRef::new("am_rifle_reload_empty", 2.7)),
            destroyed_montage: Some(MontageRef::new("am_rifle_destroyed", 1.8)),
            anim_set: GripAnimSet {
                idle: Some("anim_rifle_idle".to_string()),
                walk_blend_space: Some("bs_rifle_walk".to_string()),
                sprint: Some("anim_rifle_sprint".to_string()),
                ads_idle: Some("anim_rifle_ads_idle".to_string()),
                ads_walk_blend_space: Some("bs_rifle_ads_walk".to_string()),
            },
            aiming_fov: false,
            aiming_fov_change: 0.0,
            is_scope: false,
            scope_magnification: 1.0,
            unmagnified_lfov: 0.0,
            ai_params: AiWeaponParams::default(),
        }
    }

    /// Pump shotgun preset (pellets, не automatic)
    pub fn pump_shotgun() -> Self {
        Self {
            name: "Pump Shotgun".to_string(),
            base_damage: 6.0,
            headshot_multiplier: 1.5,
            pitch_variation: 1.5,
            yaw_variation: 1.5,
            accuracy_debuff: 1.2,
            rate_of_fire: 0.9,
            automatic_fire: false,
            is_shotgun: true,
            shotgun_pellets: 8,
            shotgun_range: 25.0,
            range: 25.0,
            ammo_type: AmmoType::Shotgun,
            clip_capacity: 6,
            can_be_chambered: false,
            per_shot_degradation: 0.5,
            has_attachments: false,
            muzzle_socket: "muzzle".to_string(),
            particle_socket: "particle_spawn".to_string(),
            silenced: false,
            fire_sound: "sfx_shotgun_shot".to_string(),
            silenced_fire_sound: "sfx_shotgun_shot".to_string(),
            empty_fire_sound: "sfx_dry_fire".to_string(),
            vertical_recoil_curve: CurveSampler::new(vec![(0.0, 3.0), (1.0, 3.0)]),
            horizontal_recoil_curve: CurveSampler::new(vec![(0.0, 0.6), (1.0, 0.6)]),
            recovery_curve: CurveSampler::new(vec![(0.0, 0.0), (0.6, 1.0)]),
            camera_shake: CameraShakeKind::HeavyRecoil,
            equip_montage: Some(MontageRef::new("am_shotgun_equip", 0.9)),
            reload_montage: Some(MontageRef::new("am_shotgun_reload", 2.5)),
            empty_reload_montage: Some(MontageRef::new("am_shotgun_reload_empty", 3.0)),
            destroyed_montage: Some(MontageRef::new("am_shotgun_destroyed", 1.8)),
            anim_set: GripAnimSet::default(),
            aiming_fov: false,
            aiming_fov_change: 0.0,
            is_scope: false,
            scope_magnification: 1.0,
            unmagnified_lfov: 0.0,
            ai_params: AiWeaponParams {
                rounds_per_minute: 40.0,
                damage: 12.0,
                ..AiWeaponParams::default()
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_default_rows() {
        let catalog = WeaponCatalog::default();

        // Weapons
        assert!(catalog.weapon_row(&"service_pistol".into()).is_some());
        assert!(catalog.weapon_row(&"battle_rifle".into()).is_some());
        assert!(catalog.weapon_row(&"pump_shotgun".into()).is_some());
        assert!(catalog.weapon_row(&"unknown".into()).is_none());

        // Attachments: хотя бы по одному на каждый slot
        for slot in AttachmentSlot::CANONICAL_ORDER {
            assert!(
                !catalog.attachments_for_slot(slot).is_empty(),
                "no attachments for slot {:?}",
                slot
            );
        }
    }

    #[test]
    fn test_attachment_partition_is_sorted() {
        let catalog = WeaponCatalog::default();
        let barrels = catalog.attachments_for_slot(AttachmentSlot::Barrel);
        let mut sorted = barrels.clone();
        sorted.sort();
        assert_eq!(barrels, sorted);
    }

    #[test]
    fn test_attachment_declares_single_slot() {
        let catalog = WeaponCatalog::default();
        for id in catalog.attachment_ids_sorted() {
            let row = catalog.attachment_row(&id).unwrap();
            // Вариант overrides соответствует объявленному slot
            let matches = matches!(
                (&row.overrides, row.slot),
                (SlotOverrides::Barrel(_), AttachmentSlot::Barrel)
                    | (SlotOverrides::Magazine(_), AttachmentSlot::Magazine)
                    | (SlotOverrides::Sights(_), AttachmentSlot::Sights)
                    | (SlotOverrides::Stock, AttachmentSlot::Stock)
                    | (SlotOverrides::Grip(_), AttachmentSlot::Grip)
            );
            assert!(matches, "attachment {:?} overrides/slot mismatch", id);
        }
    }

    #[test]
    fn test_incompatibility_declared_symmetrically_in_defaults() {
        // Дефолтный каталог объявляет suppressor ↔ rapid mag с обеих сторон
        let catalog = WeaponCatalog::default();
        let suppressor = catalog.attachment_row(&"barrel_suppressor".into()).unwrap();
        let rapid = catalog.attachment_row(&"mag_rapid".into()).unwrap();
        assert!(suppressor
            .incompatible_attachments
            .contains(&"mag_rapid".into()));
        assert!(rapid
            .incompatible_attachments
            .contains(&"barrel_suppressor".into()));
    }
}
