//! Headless симуляция IRONSIGHT
//!
//! Запускает Bevy App без рендера: собирает случайное оружие из
//! каталога, прогоняет очереди стрельбы и перезарядки

use bevy::prelude::*;

use ironsight_simulation::inventory::{EquipWeaponIntent, ReloadIntent, StartFireIntent};
use ironsight_simulation::weapon::components::RuntimeWeaponData;
use ironsight_simulation::{
    create_headless_app, randomize_all, AimMode, AimOrigin, AimRotation, AmmoReserves, AmmoType,
    DeterministicRng, MovementState, WeaponCatalog, WeaponPickup, WeaponSlots,
};

fn main() {
    let seed = 42;
    println!("Starting IRONSIGHT headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    // Владелец с резервом и случайно собранной винтовкой на земле
    let (owner, pickup) = {
        let world = app.world_mut();
        let attachments = {
            let catalog = world.resource::<WeaponCatalog>().clone();
            let mut rng = world.resource_mut::<DeterministicRng>();
            randomize_all(&catalog, &mut rng.rng).expect("default catalog covers every slot")
        };
        println!("Randomised attachment set: {:?}", attachments);

        let owner = world
            .spawn((
                WeaponSlots::new(3),
                AmmoReserves::with([(AmmoType::Rifle, 120)]),
                AimOrigin::default(),
                AimRotation::default(),
                AimMode::HipFire,
                MovementState::Idle,
            ))
            .id();
        let pickup = world
            .spawn(WeaponPickup {
                weapon_id: "battle_rifle".into(),
                runtime: RuntimeWeaponData::new(AmmoType::Rifle, 30).with_attachments(attachments),
                runtime_spawned: false,
                position: Vec3::ZERO,
            })
            .id();
        (owner, pickup)
    };

    app.world_mut().send_event(EquipWeaponIntent {
        owner,
        slot: 0,
        pickup,
        spawn_pickup_for_old: true,
    });

    // 600 тиков: очередь → перезарядка → очередь
    for tick in 0..600 {
        if tick == 10 {
            app.world_mut().send_event(StartFireIntent { owner });
        }
        if tick == 200 {
            app.world_mut().send_event(ReloadIntent { owner });
        }
        if tick == 400 {
            app.world_mut().send_event(StartFireIntent { owner });
        }

        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
}
