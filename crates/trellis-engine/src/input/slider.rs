use super::InputEvent;

/// Keyboard-driven range input.
///
/// Holds a value in `[min, max]` that moves in `step` increments and reports every
/// change as an [`InputEvent`] for its input name.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    input: String,
    value: f32,
    min: f32,
    max: f32,
    step: f32,
}

impl Slider {
    /// `value` is clamped into `[min, max]`; `min` and `max` are swapped if reversed.
    pub fn new(input: impl Into<String>, value: f32, min: f32, max: f32, step: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            input: input.into(),
            value: value.max(min).min(max),
            min,
            max,
            step: step.abs(),
        }
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Event carrying the current value.
    pub fn event(&self) -> InputEvent {
        InputEvent::new(self.input.clone(), self.value)
    }

    pub fn increase(&mut self) -> InputEvent {
        self.set(self.value + self.step)
    }

    pub fn decrease(&mut self) -> InputEvent {
        self.set(self.value - self.step)
    }

    /// Moves to `value` (clamped) and reports it.
    pub fn set(&mut self, value: f32) -> InputEvent {
        self.value = value.max(self.min).min(self.max);
        self.event()
    }
}
