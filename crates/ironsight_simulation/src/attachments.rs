//! Attachment randomisation — случайная сборка оружия из каталога
//!
//! # Архитектура
//!
//! Две чистые функции поверх `WeaponCatalog`:
//! - `randomize_all` — один равномерный draw на каждый slot
//! - `replace_incompatible` — один проход удаления+redraw конфликтующих
//!
//! Обе детерминированы при фиксированном seed: партиции каталога
//! отсортированы (HashMap iteration order недетерминирован), RNG
//! приходит снаружи (`DeterministicRng`).
//!
//! Транзитивные конфликты после redraw сознательно не перепроверяются:
//! каталог объявляет конфликты симметрично и неглубоко, одного прохода
//! достаточно.

use rand::Rng;
use std::collections::HashSet;

use crate::catalog::{AttachmentId, AttachmentSlot, WeaponCatalog};
use crate::log_warning;

/// Собрать полный случайный набор: ровно один attachment на slot
///
/// Возвращает `None` если у какого-то slot пустая партиция —
/// это ошибка наполнения каталога, логируем и не собираем ничего.
pub fn randomize_all<R: Rng>(catalog: &WeaponCatalog, rng: &mut R) -> Option<Vec<AttachmentId>> {
    let mut result = Vec::with_capacity(AttachmentSlot::CANONICAL_ORDER.len());

    for slot in AttachmentSlot::CANONICAL_ORDER {
        let partition = catalog.attachments_for_slot(slot);
        if partition.is_empty() {
            log_warning(&format!(
                "Attachment randomisation failed: no attachments in catalog for slot {:?}",
                slot
            ));
            return None;
        }
        let index = rng.gen_range(0..partition.len());
        result.push(partition[index].clone());
    }

    Some(result)
}

/// Один проход разрешения конфликтов в наборе attachments
///
/// 1. Собираем union всех incompatible-списков текущего набора
/// 2. Attachments, попавшие в union, выкидываем
/// 3. Redraw только на slots, которые реально опустели (выживший
///    attachment того же slot закрывает дыру сам); пул — партиция slot
///    минус выбитые IDs и минус всё, что конфликтует с выжившими
///
/// Если redraw-пул пуст, slot остаётся пустым (логируем warning).
pub fn replace_incompatible<R: Rng>(
    catalog: &WeaponCatalog,
    current: &[AttachmentId],
    rng: &mut R,
) -> Vec<AttachmentId> {
    // Union incompatible-списков всего текущего набора
    let mut banned: HashSet<AttachmentId> = HashSet::new();
    for id in current {
        let Some(row) = catalog.attachment_row(id) else {
            continue;
        };
        banned.extend(row.incompatible_attachments.iter().cloned());
    }

    // Разделяем набор на выживших и выбитых
    let mut kept: Vec<AttachmentId> = Vec::new();
    let mut occupied: HashSet<AttachmentSlot> = HashSet::new();
    let mut vacated_slots: Vec<AttachmentSlot> = Vec::new();
    for id in current {
        let Some(row) = catalog.attachment_row(id) else {
            // Неизвестный ID не переживает проход
            log_warning(&format!("Unknown attachment id {:?} dropped", id));
            continue;
        };
        if banned.contains(id) {
            vacated_slots.push(row.slot);
        } else {
            kept.push(id.clone());
            occupied.insert(row.slot);
        }
    }

    // Redraw на каждый опустевший slot. Выбитые IDs в пул не
    // возвращаются — иначе взаимный бан воскресил бы обоих.
    vacated_slots.sort();
    vacated_slots.dedup();
    for slot in vacated_slots {
        if occupied.contains(&slot) {
            // Slot всё ещё занят выжившим — второго attachment не будет
            continue;
        }
        let pool: Vec<AttachmentId> = catalog
            .attachments_for_slot(slot)
            .into_iter()
            .filter(|candidate| {
                !banned.contains(candidate)
                    && is_compatible_with_set(catalog, candidate, &kept)
            })
            .collect();

        if pool.is_empty() {
            log_warning(&format!(
                "No compatible replacement for slot {:?}, leaving it empty",
                slot
            ));
            continue;
        }
        let index = rng.gen_range(0..pool.len());
        kept.push(pool[index].clone());
        occupied.insert(slot);
    }

    kept
}

/// Кандидат совместим с набором: ни одна сторона не объявляет конфликт
fn is_compatible_with_set(
    catalog: &WeaponCatalog,
    candidate: &AttachmentId,
    set: &[AttachmentId],
) -> bool {
    let Some(candidate_row) = catalog.attachment_row(candidate) else {
        return false;
    };
    for kept_id in set {
        if candidate_row.incompatible_attachments.contains(kept_id) {
            return false;
        }
        if let Some(kept_row) = catalog.attachment_row(kept_id) {
            if kept_row.incompatible_attachments.contains(candidate) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttachmentData, SlotOverrides, WeaponCatalog};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn stock_row(slot: AttachmentSlot, incompatible: Vec<AttachmentId>) -> AttachmentData {
        AttachmentData {
            name: "test".to_string(),
            slot,
            base_damage_impact: 0.0,
            pitch_variation_impact: 0.0,
            yaw_variation_impact: 0.0,
            vertical_recoil_multiplier: 0.0,
            horizontal_recoil_multiplier: 0.0,
            incompatible_attachments: incompatible,
            overrides: SlotOverrides::Stock,
        }
    }

    #[test]
    fn test_randomize_all_one_per_slot() {
        let catalog = WeaponCatalog::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let set = randomize_all(&catalog, &mut rng).unwrap();
        assert_eq!(set.len(), AttachmentSlot::CANONICAL_ORDER.len());

        // Каждый ID из партиции своего slot
        for (id, slot) in set.iter().zip(AttachmentSlot::CANONICAL_ORDER) {
            assert_eq!(catalog.attachment_row(id).unwrap().slot, slot);
        }
    }

    #[test]
    fn test_randomize_all_deterministic_with_seed() {
        let catalog = WeaponCatalog::default();
        let a = randomize_all(&catalog, &mut ChaCha8Rng::seed_from_u64(1234)).unwrap();
        let b = randomize_all(&catalog, &mut ChaCha8Rng::seed_from_u64(1234)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_randomize_all_empty_partition_returns_none() {
        let mut catalog = WeaponCatalog::new();
        // Только Stock заполнен — остальные партиции пусты
        catalog.add_attachment("stock_a", stock_row(AttachmentSlot::Stock, vec![]));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(randomize_all(&catalog, &mut rng).is_none());
    }

    #[test]
    fn test_replace_incompatible_survivor_keeps_slot() {
        // Два magazines, M2 объявляет M1 несовместимым: M1 выбит,
        // slot остаётся за M2 — без второго redraw-magazine
        let mut catalog = WeaponCatalog::new();
        catalog.add_attachment("m1", stock_row(AttachmentSlot::Magazine, vec![]));
        catalog.add_attachment("m2", stock_row(AttachmentSlot::Magazine, vec!["m1".into()]));

        let current: Vec<AttachmentId> = vec!["m1".into(), "m2".into()];
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let resolved = replace_incompatible(&catalog, &current, &mut rng);

        assert_eq!(resolved, vec![AttachmentId::from("m2")]);
    }

    #[test]
    fn test_replace_incompatible_at_most_one_per_slot() {
        // Смешанный набор с конфликтами: на каждый slot максимум один ID
        let mut catalog = WeaponCatalog::new();
        catalog.add_attachment("b1", stock_row(AttachmentSlot::Barrel, vec!["m1".into()]));
        catalog.add_attachment("m1", stock_row(AttachmentSlot::Magazine, vec![]));
        catalog.add_attachment("m2", stock_row(AttachmentSlot::Magazine, vec![]));

        let current: Vec<AttachmentId> = vec!["b1".into(), "m1".into(), "m2".into()];
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let resolved = replace_incompatible(&catalog, &current, &mut rng);
            for slot in AttachmentSlot::CANONICAL_ORDER {
                let per_slot = resolved
                    .iter()
                    .filter(|id| catalog.attachment_row(id).unwrap().slot == slot)
                    .count();
                assert!(per_slot <= 1, "seed {}: slot {:?} holds {}", seed, slot, per_slot);
            }
        }
    }

    #[test]
    fn test_replace_incompatible_mutual_ban_not_resurrected() {
        // Взаимный бан: оба выбиты, выбитые IDs в redraw-пул не попадают
        let mut catalog = WeaponCatalog::new();
        catalog.add_attachment("b1", stock_row(AttachmentSlot::Barrel, vec!["m1".into()]));
        catalog.add_attachment("m1", stock_row(AttachmentSlot::Magazine, vec!["b1".into()]));
        catalog.add_attachment("m2", stock_row(AttachmentSlot::Magazine, vec![]));

        let current: Vec<AttachmentId> = vec!["b1".into(), "m1".into()];
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let resolved = replace_incompatible(&catalog, &current, &mut rng);

        // Barrel-пул без b1 пуст → slot пустой; magazine redraw даёт m2
        assert_eq!(resolved, vec![AttachmentId::from("m2")]);
    }

    #[test]
    fn test_replace_incompatible_keeps_clean_set() {
        let catalog = WeaponCatalog::default();
        let current: Vec<AttachmentId> = vec![
            "barrel_standard".into(),
            "mag_standard".into(),
            "sights_iron".into(),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut resolved = replace_incompatible(&catalog, &current, &mut rng);
        resolved.sort();
        let mut expected = current.clone();
        expected.sort();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_replace_incompatible_default_catalog_never_leaves_conflicts() {
        // Randomised draw из дефолтного каталога + проход разрешения:
        // suppressor и rapid mag не должны сосуществовать
        let catalog = WeaponCatalog::default();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let set = randomize_all(&catalog, &mut rng).unwrap();
            let resolved = replace_incompatible(&catalog, &set, &mut rng);
            let has_suppressor = resolved.contains(&"barrel_suppressor".into());
            let has_rapid = resolved.contains(&"mag_rapid".into());
            assert!(
                !(has_suppressor && has_rapid),
                "conflict survived for seed {}",
                seed
            );
        }
    }

    #[test]
    fn test_replace_incompatible_drops_unknown_ids() {
        let catalog = WeaponCatalog::default();
        let current: Vec<AttachmentId> = vec!["barrel_standard".into(), "no_such".into()];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let resolved = replace_incompatible(&catalog, &current, &mut rng);
        assert!(!resolved.contains(&"no_such".into()));
        assert!(resolved.contains(&"barrel_standard".into()));
    }
}
