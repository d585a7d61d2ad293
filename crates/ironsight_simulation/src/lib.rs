//! IRONSIGHT Simulation Core
//!
//! ECS-симуляция оружейного слоя шутера на Bevy 0.16:
//! конфигурация оружия через attachments, fire control, боезапас,
//! инвентарь слотов, AI-стрельба.
//!
//! Архитектура engine-agnostic: host (рендер, физика, ввод) общается
//! с симуляцией только через events и injected collaborators
//! (`RayCastService`). Никаких ambient lookups в движок.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ammo;
pub mod attachments;
pub mod catalog;
pub mod components;
pub mod curves;
pub mod external;
pub mod inventory;
pub mod logger;
pub mod weapon;

// Re-export базовых типов для удобства
pub use ammo::{AmmoPickup, AmmoReserves, CollectAmmoPickupIntent};
pub use attachments::{randomize_all, replace_incompatible};
pub use catalog::{
    AmmoType, AttachmentData, AttachmentId, AttachmentSlot, WeaponCatalog, WeaponId,
    WeaponStaticData,
};
pub use components::{AimMode, AimOrigin, AimRotation, Health, MovementState};
pub use external::{NullRayCaster, RayCastService, RayCaster, RayHit};
pub use inventory::{
    remaining_ammo, AmmoQueryError, InventoryPlugin, InventorySettings, WeaponPickup, WeaponSlots,
};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_logger, set_logger_if_needed,
    ConsoleLogger, LogLevel, LogPrinter,
};
pub use weapon::{
    fire_once, resolve, update_ammo, ActiveWeapon, DamageDealt, EffectRequest, FireControl,
    MontageRequest, RecoilState, ResolvedWeaponConfig, RuntimeWeaponData, WeaponDestroyed,
    WeaponInstance, WeaponOwner, WeaponPlugin,
};

/// Главный plugin симуляции (объединяет подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
        if !app.world().contains_resource::<WeaponCatalog>() {
            app.insert_resource(WeaponCatalog::default());
        }
        // Host подменяет своим caster'ом до добавления plugin
        if !app.world().contains_resource::<RayCastService>() {
            app.insert_resource(RayCastService(Box::new(NullRayCaster)));
        }

        app.add_plugins((InventoryPlugin, WeaponPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}
