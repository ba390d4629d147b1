//! Time-based property animation.
//!
//! A [`Storyboard`] groups [`Tween`]s that run in parallel from the same
//! start instant. The platform layer drives it from a frame timer and
//! writes the sampled values into an [`Animatable`] target; completion is
//! reported once every tween has reached its end value.

use std::time::{Duration, Instant};

/// Interpolation curve applied to normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Decelerates towards the end.
    #[default]
    QuadraticOut,
    /// Accelerates from the start.
    QuadraticIn,
    QuadraticInOut,
}

impl Easing {
    /// Maps normalized time `t` in [0, 1] to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::QuadraticIn => t * t,
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Animatable properties of the two windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Opacity,
    Scale,
    Top,
    Width,
    Height,
    ShadowOpacity,
    ShadowDepth,
    BlurRadius,
}

/// Something a storyboard can write animated values into.
pub trait Animatable {
    /// Current value, used as the start of tweens without an explicit `from`.
    fn property(&self, property: Property) -> f64;

    fn set_property(&mut self, property: Property, value: f64);
}

/// A single property transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub property: Property,
    /// Start value; `None` starts from the target's current value.
    pub from: Option<f64>,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    /// A tween with an explicit start value and quadratic ease-out.
    pub fn new(property: Property, from: f64, to: f64, duration: Duration) -> Self {
        Self {
            property,
            from: Some(from),
            to,
            duration,
            easing: Easing::default(),
        }
    }

    /// A tween that starts wherever the property currently is.
    pub fn to(property: Property, to: f64, duration: Duration) -> Self {
        Self {
            property,
            from: None,
            to,
            duration,
            easing: Easing::default(),
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

/// A running group of tweens.
#[derive(Debug, Clone)]
pub struct Storyboard {
    tweens: Vec<(Tween, f64)>,
    started: Instant,
}

impl Storyboard {
    /// Starts the tweens at `now`, resolving implicit start values from
    /// `target`.
    pub fn begin(tweens: Vec<Tween>, target: &dyn Animatable, now: Instant) -> Self {
        let tweens = tweens
            .into_iter()
            .map(|t| {
                let from = t.from.unwrap_or_else(|| target.property(t.property));
                (t, from)
            })
            .collect();
        Self {
            tweens,
            started: now,
        }
    }

    /// Writes the values for `now` into `target`.
    ///
    /// Returns `true` once every tween has finished; the final values are
    /// written exactly on that call.
    pub fn apply(&self, target: &mut dyn Animatable, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started);
        let mut done = true;
        for (tween, from) in &self.tweens {
            let p = tween.progress(elapsed);
            if p < 1.0 {
                done = false;
            }
            let value = if p >= 1.0 {
                tween.to
            } else {
                from + (tween.to - from) * tween.easing.apply(p)
            };
            target.set_property(tween.property, value);
        }
        done
    }

    /// Longest tween duration.
    pub fn duration(&self) -> Duration {
        self.tweens
            .iter()
            .map(|(t, _)| t.duration)
            .max()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        opacity: f64,
        top: f64,
    }

    impl Animatable for Sample {
        fn property(&self, property: Property) -> f64 {
            match property {
                Property::Opacity => self.opacity,
                Property::Top => self.top,
                _ => 0.0,
            }
        }

        fn set_property(&mut self, property: Property, value: f64) {
            match property {
                Property::Opacity => self.opacity = value,
                Property::Top => self.top = value,
                _ => {}
            }
        }
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::QuadraticOut,
            Easing::QuadraticIn,
            Easing::QuadraticInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn quadratic_out_leads_linear() {
        assert_eq!(Easing::QuadraticOut.apply(0.5), 0.75);
        assert_eq!(Easing::QuadraticIn.apply(0.5), 0.25);
        assert_eq!(Easing::QuadraticInOut.apply(0.5), 0.5);
    }

    #[test]
    fn storyboard_interpolates_and_completes() {
        // Arrange
        let start = Instant::now();
        let mut sample = Sample {
            opacity: 1.0,
            top: 0.0,
        };
        let ms500 = Duration::from_millis(500);
        let board = Storyboard::begin(
            vec![
                Tween::new(Property::Opacity, 1.0, 0.0, ms500).eased(Easing::Linear),
                Tween::new(Property::Top, -300.0, 100.0, ms500),
            ],
            &sample,
            start,
        );

        // Act
        let halfway_done = board.apply(&mut sample, start + Duration::from_millis(250));

        // Assert
        assert!(!halfway_done);
        assert_eq!(sample.opacity, 0.5);
        assert_eq!(sample.top, -300.0 + 400.0 * 0.75);

        // Act
        let done = board.apply(&mut sample, start + Duration::from_millis(600));

        // Assert
        assert!(done);
        assert_eq!(sample.opacity, 0.0);
        assert_eq!(sample.top, 100.0);
    }

    #[test]
    fn implicit_from_uses_current_value() {
        // Arrange
        let start = Instant::now();
        let mut sample = Sample {
            opacity: 0.4,
            top: 0.0,
        };
        let board = Storyboard::begin(
            vec![
                Tween::to(Property::Opacity, 1.0, Duration::from_millis(100))
                    .eased(Easing::Linear),
            ],
            &sample,
            start,
        );

        // Act
        board.apply(&mut sample, start + Duration::from_millis(50));

        // Assert
        assert!((sample.opacity - 0.7).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        // Arrange
        let start = Instant::now();
        let mut sample = Sample::default();
        let board = Storyboard::begin(
            vec![Tween::new(Property::Top, 0.0, 42.0, Duration::ZERO)],
            &sample,
            start,
        );

        // Act / Assert
        assert!(board.apply(&mut sample, start));
        assert_eq!(sample.top, 42.0);
        assert_eq!(board.duration(), Duration::ZERO);
    }
}
