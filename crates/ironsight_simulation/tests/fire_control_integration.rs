//! Integration-тесты fire-control поверх headless App
//!
//! Тики шагаются вручную: advance_by на Time + run_schedule(FixedUpdate).
//! Никакой зависимости от wall clock — тесты детерминированы.

use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use ironsight_simulation::inventory::{
    EquipWeaponIntent, ReloadIntent, ScrollWeaponIntent, StartFireIntent, StopFireIntent,
};
use ironsight_simulation::weapon::components::{ActiveWeapon, RuntimeWeaponData};
use ironsight_simulation::weapon::events::{WeaponDestroyed, WeaponEmpty};
use ironsight_simulation::weapon::{AiStartFire, AiWeaponControl};
use ironsight_simulation::{
    remaining_ammo, AimMode, AimOrigin, AimRotation, AmmoQueryError, AmmoReserves, AmmoType,
    DeterministicRng, MovementState, RayCastService, SimulationPlugin, WeaponPickup, WeaponSlots,
};

fn test_app(seed: u64) -> App {
    let mut app = App::new();
    app.insert_resource(Time::<()>::default())
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);
    app
}

/// Один simulation tick с заданной дельтой
fn step(app: &mut App, dt: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(dt));
    app.world_mut().run_schedule(FixedUpdate);
}

fn spawn_owner(app: &mut App, reserve: u32) -> Entity {
    app.world_mut()
        .spawn((
            WeaponSlots::new(3),
            AmmoReserves::with([(AmmoType::Rifle, reserve)]),
            AimOrigin::default(),
            AimRotation::default(),
            AimMode::Ads,
            MovementState::Idle,
        ))
        .id()
}

fn spawn_rifle_pickup(app: &mut App, clip_size: u32) -> Entity {
    let mut runtime = RuntimeWeaponData::new(AmmoType::Rifle, 30)
        .with_attachments(vec!["barrel_standard".into(), "mag_standard".into()]);
    runtime.clip_size = clip_size;
    app.world_mut()
        .spawn(WeaponPickup {
            weapon_id: "battle_rifle".into(),
            runtime,
            // Кэш как есть, без засева из Magazine row
            runtime_spawned: true,
            position: Vec3::ZERO,
        })
        .id()
}

/// Equip + тик на активацию; возвращает weapon entity
fn equip(app: &mut App, owner: Entity, slot: usize, pickup: Entity) -> Entity {
    app.world_mut().send_event(EquipWeaponIntent {
        owner,
        slot,
        pickup,
        spawn_pickup_for_old: true,
    });
    step(app, 1.0 / 60.0); // Equip + spawn
    step(app, 1.0 / 60.0); // Активация (swap intent со следующего тика)
    app.world()
        .get::<WeaponSlots>(owner)
        .and_then(|slots| slots.weapon_in(slot))
        .expect("weapon equipped")
}

#[test]
fn test_equip_resolves_config_and_activates() {
    let mut app = test_app(1);
    let owner = spawn_owner(&mut app, 90);
    let pickup = spawn_rifle_pickup(&mut app, 30);

    let weapon = equip(&mut app, owner, 0, pickup);

    // Пикап исчез, конфигурация свёрнута, marker на месте
    assert!(app.world().get::<WeaponPickup>(pickup).is_none());
    assert!(app
        .world()
        .get::<ironsight_simulation::ResolvedWeaponConfig>(weapon)
        .is_some());
    assert!(app.world().get::<ActiveWeapon>(weapon).is_some());
    assert_eq!(
        app.world().get::<WeaponSlots>(owner).unwrap().active_slot(),
        Some(0)
    );
}

#[test]
fn test_automatic_burst_and_reload_cycle() {
    let mut app = test_app(2);
    let owner = spawn_owner(&mut app, 120);
    let pickup = spawn_rifle_pickup(&mut app, 30);
    let weapon = equip(&mut app, owner, 0, pickup);

    // Первый выстрел в тик нажатия
    app.world_mut().send_event(StartFireIntent { owner });
    step(&mut app, 1.0 / 60.0);
    assert_eq!(
        app.world().get::<RuntimeWeaponData>(weapon).unwrap().clip_size,
        29
    );

    // mag_standard: rate 0.1s, automatic. 5 тиков по 0.1 → ещё 5 выстрелов
    for _ in 0..5 {
        step(&mut app, 0.1);
    }
    assert_eq!(
        app.world().get::<RuntimeWeaponData>(weapon).unwrap().clip_size,
        24
    );

    app.world_mut().send_event(StopFireIntent { owner });
    step(&mut app, 1.0 / 60.0);
    // Очередь оборвана: большой шаг времени не стреляет
    step(&mut app, 1.0);
    assert_eq!(
        app.world().get::<RuntimeWeaponData>(weapon).unwrap().clip_size,
        24
    );

    // Reload: battle_rifle chamberable → клип добирается до 31
    app.world_mut().send_event(ReloadIntent { owner });
    step(&mut app, 1.0 / 60.0);
    step(&mut app, 2.5); // mag_standard reload montage 2.1s

    let runtime = app.world().get::<RuntimeWeaponData>(weapon).unwrap();
    assert_eq!(runtime.clip_size, 31);
    // needed = 31 - 24 = 7
    let reserves = app.world().get::<AmmoReserves>(owner).unwrap();
    assert_eq!(reserves.get(AmmoType::Rifle), 113);
}

#[test]
fn test_empty_clip_dry_fires() {
    let mut app = test_app(3);
    let owner = spawn_owner(&mut app, 0);
    let pickup = spawn_rifle_pickup(&mut app, 0);
    let weapon = equip(&mut app, owner, 0, pickup);

    app.world_mut().send_event(StartFireIntent { owner });
    step(&mut app, 1.0 / 60.0);

    // Выстрела не было, уведомление ушло
    assert_eq!(
        app.world().get::<RuntimeWeaponData>(weapon).unwrap().clip_size,
        0
    );
    let empty_events = app.world().resource::<Events<WeaponEmpty>>();
    assert!(!empty_events.is_empty());
}

#[test]
fn test_sprint_blocks_fire() {
    let mut app = test_app(4);
    let owner = spawn_owner(&mut app, 90);
    let pickup = spawn_rifle_pickup(&mut app, 30);
    let weapon = equip(&mut app, owner, 0, pickup);

    *app.world_mut().get_mut::<MovementState>(owner).unwrap() = MovementState::Sprinting;
    app.world_mut().send_event(StartFireIntent { owner });
    step(&mut app, 1.0 / 60.0);

    assert_eq!(
        app.world().get::<RuntimeWeaponData>(weapon).unwrap().clip_size,
        30
    );
}

#[test]
fn test_degradation_destroys_weapon_mid_burst() {
    let mut app = test_app(5);
    let owner = spawn_owner(&mut app, 90);
    let pickup = spawn_rifle_pickup(&mut app, 30);
    let weapon = equip(&mut app, owner, 0, pickup);

    // Прочности хватает ровно на два выстрела (0.25 за выстрел)
    app.world_mut()
        .get_mut::<RuntimeWeaponData>(weapon)
        .unwrap()
        .health = 0.5;

    app.world_mut().send_event(StartFireIntent { owner });
    step(&mut app, 1.0 / 60.0);
    step(&mut app, 0.1); // Второй выстрел пересекает ноль

    let clip_at_destroy = app.world().get::<RuntimeWeaponData>(weapon).unwrap().clip_size;
    assert_eq!(clip_at_destroy, 28);
    assert!(!app
        .world()
        .resource::<Events<WeaponDestroyed>>()
        .is_empty());

    // Очередь остановлена: клип больше не убывает
    step(&mut app, 0.1);
    step(&mut app, 0.1);
    if let Some(runtime) = app.world().get::<RuntimeWeaponData>(weapon) {
        assert_eq!(runtime.clip_size, clip_at_destroy);
    }
    // Оружие покинуло слоты
    assert_eq!(
        app.world().get::<WeaponSlots>(owner).unwrap().active_weapon(),
        None
    );
}

#[test]
fn test_equip_replacement_discards_old_without_pickup() {
    let mut app = test_app(8);
    let owner = spawn_owner(&mut app, 90);
    let first = spawn_rifle_pickup(&mut app, 12);
    equip(&mut app, owner, 0, first);

    // Scripted-замена: старое оружие слота исчезает без пикапа
    let second = spawn_rifle_pickup(&mut app, 30);
    app.world_mut().send_event(EquipWeaponIntent {
        owner,
        slot: 0,
        pickup: second,
        spawn_pickup_for_old: false,
    });
    step(&mut app, 1.0 / 60.0);
    step(&mut app, 1.0 / 60.0);

    let pickups = app
        .world_mut()
        .query::<&WeaponPickup>()
        .iter(app.world())
        .count();
    assert_eq!(pickups, 0);
    assert!(app
        .world()
        .get::<WeaponSlots>(owner)
        .unwrap()
        .weapon_in(0)
        .is_some());
}

#[test]
fn test_equip_replacement_drops_old_as_pickup() {
    let mut app = test_app(9);
    let owner = spawn_owner(&mut app, 90);
    let first = spawn_rifle_pickup(&mut app, 12);
    equip(&mut app, owner, 0, first);

    let second = spawn_rifle_pickup(&mut app, 30);
    app.world_mut().send_event(EquipWeaponIntent {
        owner,
        slot: 0,
        pickup: second,
        spawn_pickup_for_old: true,
    });
    step(&mut app, 1.0 / 60.0);
    step(&mut app, 1.0 / 60.0);

    // Старое оружие материализовалось пикапом с живым кэшем
    let dropped: Vec<WeaponPickup> = app
        .world_mut()
        .query::<&WeaponPickup>()
        .iter(app.world())
        .cloned()
        .collect();
    assert_eq!(dropped.len(), 1);
    assert!(dropped[0].runtime_spawned);
    assert_eq!(dropped[0].runtime.clip_size, 12);
}

#[test]
fn test_ai_burst_stops_when_weapon_breaks() {
    let mut app = test_app(10);
    let owner = spawn_owner(&mut app, 90);
    let pickup = spawn_rifle_pickup(&mut app, 30);
    let weapon = equip(&mut app, owner, 0, pickup);
    let target = app
        .world_mut()
        .spawn(AimOrigin {
            position: Vec3::new(0.0, 0.0, -10.0),
            forward: Vec3::NEG_Z,
        })
        .id();

    app.world_mut()
        .entity_mut(weapon)
        .insert(AiWeaponControl::default());
    // Прочности хватает ровно на два AI-выстрела
    app.world_mut()
        .get_mut::<RuntimeWeaponData>(weapon)
        .unwrap()
        .health = 0.5;

    app.world_mut().send_event(AiStartFire { weapon, target });
    step(&mut app, 1.0 / 60.0);
    // 300 rpm → 0.2s между выстрелами
    step(&mut app, 0.2);
    step(&mut app, 0.2);

    let clip_at_destroy = app.world().get::<RuntimeWeaponData>(weapon).unwrap().clip_size;
    assert_eq!(clip_at_destroy, 28);
    assert!(!app
        .world()
        .resource::<Events<WeaponDestroyed>>()
        .is_empty());

    // Таймер сброшен: оружие больше не стреляет
    step(&mut app, 0.2);
    step(&mut app, 0.2);
    if let Some(runtime) = app.world().get::<RuntimeWeaponData>(weapon) {
        assert_eq!(runtime.clip_size, clip_at_destroy);
    }
    assert_eq!(
        app.world().get::<WeaponSlots>(owner).unwrap().active_weapon(),
        None
    );
}

#[test]
fn test_scroll_cycles_between_slots() {
    let mut app = test_app(6);
    let owner = spawn_owner(&mut app, 90);
    let first = spawn_rifle_pickup(&mut app, 30);
    equip(&mut app, owner, 0, first);
    let second = spawn_rifle_pickup(&mut app, 30);
    equip(&mut app, owner, 1, second);

    // После второго equip активен slot 1
    assert_eq!(
        app.world().get::<WeaponSlots>(owner).unwrap().active_slot(),
        Some(1)
    );

    app.world_mut().send_event(ScrollWeaponIntent {
        owner,
        forward: true,
    });
    step(&mut app, 1.0 / 60.0);
    assert_eq!(
        app.world().get::<WeaponSlots>(owner).unwrap().active_slot(),
        Some(0)
    );

    // Ещё раз вперёд — wrap обратно
    app.world_mut().send_event(ScrollWeaponIntent {
        owner,
        forward: true,
    });
    step(&mut app, 1.0 / 60.0);
    assert_eq!(
        app.world().get::<WeaponSlots>(owner).unwrap().active_slot(),
        Some(1)
    );
}

#[test]
fn test_remaining_ammo_sentinel_without_reserves() {
    let mut app = test_app(7);
    // Владелец без AmmoReserves
    let owner = app
        .world_mut()
        .spawn((
            WeaponSlots::new(3),
            AimOrigin::default(),
            AimRotation::default(),
            MovementState::Idle,
        ))
        .id();
    let pickup = spawn_rifle_pickup(&mut app, 12);
    let _weapon = equip(&mut app, owner, 0, pickup);

    let result = app
        .world_mut()
        .run_system_once(
            move |owners: Query<&WeaponSlots>, weapons: Query<&RuntimeWeaponData>| {
                let slots = owners.get(owner).unwrap();
                remaining_ammo(slots, &weapons, None)
            },
        )
        .unwrap();
    assert_eq!(result, Err(AmmoQueryError::NoReserves));
}

#[test]
fn test_burst_is_deterministic_across_runs() {
    let run = |seed: u64| -> (u32, AimRotation) {
        let mut app = test_app(seed);
        // Попадания нужны для RNG-потока разброса
        app.insert_resource(RayCastService(Box::new(
            ironsight_simulation::external::FixedHitCaster {
                surface: ironsight_simulation::catalog::SurfaceTag::Ground,
                entity: None,
            },
        )));
        let owner = spawn_owner(&mut app, 120);
        let pickup = spawn_rifle_pickup(&mut app, 30);
        let weapon = equip(&mut app, owner, 0, pickup);

        app.world_mut().send_event(StartFireIntent { owner });
        for _ in 0..10 {
            step(&mut app, 0.1);
        }
        (
            app.world().get::<RuntimeWeaponData>(weapon).unwrap().clip_size,
            *app.world().get::<AimRotation>(owner).unwrap(),
        )
    };

    let (clip_a, aim_a) = run(777);
    let (clip_b, aim_b) = run(777);
    assert_eq!(clip_a, clip_b);
    assert_eq!(aim_a, aim_b);
}
