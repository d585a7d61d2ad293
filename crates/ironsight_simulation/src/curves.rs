//! Sampled curves + playback clocks (recoil / recovery timelines)
//!
//! Architecture:
//! - `CurveSampler` — immutable keyframe list, linear interpolation
//! - `PlaybackClock` — playback position, advanced once per FixedUpdate tick
//!
//! Вместе они заменяют engine-side timeline objects: fire-control системы
//! сэмплируют кривую на текущей позиции клока, clock тикается отдельной
//! системой. Никакого скрытого глобального времени.

use serde::{Deserialize, Serialize};

/// Immutable sampled curve (time → value), linear interpolation between keys.
///
/// Keys обязаны быть отсортированы по времени (конструктор сортирует сам).
/// Сэмплирование за пределами диапазона клампится к крайним значениям.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSampler {
    keys: Vec<(f32, f32)>,
}

impl CurveSampler {
    pub fn new(mut keys: Vec<(f32, f32)>) -> Self {
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    /// Constant curve (один ключ) — удобно для тестов и дефолтов
    pub fn constant(value: f32) -> Self {
        Self::new(vec![(0.0, value)])
    }

    /// Время последнего ключа (длительность timeline)
    pub fn duration(&self) -> f32 {
        self.keys.last().map(|k| k.0).unwrap_or(0.0)
    }

    /// Сэмплировать значение на позиции `t`
    pub fn sample(&self, t: f32) -> f32 {
        match self.keys.len() {
            0 => 0.0,
            1 => self.keys[0].1,
            _ => {
                let first = self.keys[0];
                let last = *self.keys.last().unwrap();
                if t <= first.0 {
                    return first.1;
                }
                if t >= last.0 {
                    return last.1;
                }
                // Ищем сегмент, содержащий t
                let mut result = last.1;
                for window in self.keys.windows(2) {
                    let (t0, v0) = window[0];
                    let (t1, v1) = window[1];
                    if t >= t0 && t <= t1 {
                        let alpha = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
                        result = v0 + (v1 - v0) * alpha;
                        break;
                    }
                }
                result
            }
        }
    }
}

/// Playback clock для timeline-driven эффектов (recoil, recovery)
///
/// Clock не знает про кривую — только позицию и длительность.
/// `tick()` вызывается один раз за FixedUpdate; по достижении конца
/// клок останавливается сам.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackClock {
    pub position: f32,
    pub duration: f32,
    pub playing: bool,
}

impl PlaybackClock {
    pub fn with_duration(duration: f32) -> Self {
        Self {
            position: 0.0,
            duration,
            playing: false,
        }
    }

    /// Перезапустить с нуля (timeline PlayFromStart)
    pub fn play_from_start(&mut self) {
        self.position = 0.0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Продвинуть клок; на конце timeline останавливается
    pub fn tick(&mut self, delta: f32) {
        if !self.playing {
            return;
        }
        self.position += delta;
        if self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
        }
    }

    pub fn is_finished(&self) -> bool {
        !self.playing && self.position >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_sample_interpolation() {
        let curve = CurveSampler::new(vec![(0.0, 1.0), (1.0, 0.0)]);
        assert_eq!(curve.sample(0.0), 1.0);
        assert_eq!(curve.sample(1.0), 0.0);
        assert!((curve.sample(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_curve_sample_clamps_out_of_range() {
        let curve = CurveSampler::new(vec![(0.0, 2.0), (0.5, 4.0)]);
        assert_eq!(curve.sample(-1.0), 2.0);
        assert_eq!(curve.sample(10.0), 4.0);
    }

    #[test]
    fn test_curve_unsorted_keys() {
        // Конструктор сортирует ключи сам
        let curve = CurveSampler::new(vec![(1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(curve.sample(0.0), 1.0);
        assert_eq!(curve.duration(), 1.0);
    }

    #[test]
    fn test_clock_tick_and_finish() {
        let mut clock = PlaybackClock::with_duration(1.0);
        assert!(!clock.playing);

        clock.play_from_start();
        clock.tick(0.4);
        assert!(clock.playing);
        assert!((clock.position - 0.4).abs() < 1e-6);

        clock.tick(0.7);
        assert!(!clock.playing);
        assert_eq!(clock.position, 1.0);
        assert!(clock.is_finished());
    }

    #[test]
    fn test_clock_stop() {
        let mut clock = PlaybackClock::with_duration(2.0);
        clock.play_from_start();
        clock.tick(0.5);
        clock.stop();
        let position = clock.position;
        clock.tick(1.0); // Не двигается после stop
        assert_eq!(clock.position, position);
    }
}
