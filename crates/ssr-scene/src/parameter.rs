//! Dual-representation parameter values

use std::fmt;
use std::sync::Arc;

/// Translation from the discrete to the continuous representation.
pub type ToContinuous<D, C> = Arc<dyn Fn(D) -> C + Send + Sync>;

/// Translation from the continuous to the discrete representation.
pub type ToDiscrete<C, D> = Arc<dyn Fn(C) -> D + Send + Sync>;

/// A value held in two representations at once: the discrete, physically
/// meaningful one (meters, linear gain, radians, flags) and the normalized
/// continuous one the host automation interface speaks. Every setter
/// recomputes the other side through the injected translation functions, so
/// the two representations never drift apart.
pub struct Parameter<D, C> {
    discrete_value: D,
    continuous_value: C,
    default_discrete_value: D,
    translate_to_continuous: ToContinuous<D, C>,
    translate_to_discrete: ToDiscrete<C, D>,
    name: String,
}

impl<D: Copy, C: Copy> Parameter<D, C> {
    /// Create a parameter; the continuous side is derived immediately.
    pub fn new(
        initial: D,
        default: D,
        translate_to_continuous: ToContinuous<D, C>,
        translate_to_discrete: ToDiscrete<C, D>,
        name: &str,
    ) -> Self {
        let continuous_value = (*translate_to_continuous)(initial);
        Self {
            discrete_value: initial,
            continuous_value,
            default_discrete_value: default,
            translate_to_continuous,
            translate_to_discrete,
            name: name.to_string(),
        }
    }

    pub fn discrete_value(&self) -> D {
        self.discrete_value
    }

    pub fn continuous_value(&self) -> C {
        self.continuous_value
    }

    pub fn default_discrete_value(&self) -> D {
        self.default_discrete_value
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the discrete side and rederive the continuous side.
    pub fn set_discrete_value(&mut self, value: D) {
        self.discrete_value = value;
        self.continuous_value = (*self.translate_to_continuous)(value);
    }

    /// Set the continuous side and rederive the discrete side.
    pub fn set_continuous_value(&mut self, value: C) {
        self.continuous_value = value;
        self.discrete_value = (*self.translate_to_discrete)(value);
    }

    /// Reset to the constructed default.
    pub fn set_to_default(&mut self) {
        self.set_discrete_value(self.default_discrete_value);
    }
}

impl<D: Copy, C: Copy> Clone for Parameter<D, C> {
    fn clone(&self) -> Self {
        Self {
            discrete_value: self.discrete_value,
            continuous_value: self.continuous_value,
            default_discrete_value: self.default_discrete_value,
            translate_to_continuous: Arc::clone(&self.translate_to_continuous),
            translate_to_discrete: Arc::clone(&self.translate_to_discrete),
            name: self.name.clone(),
        }
    }
}

impl<D: PartialEq, C: PartialEq> PartialEq for Parameter<D, C> {
    /// Compares the two value representations; names and translation
    /// functions are left out.
    fn eq(&self, other: &Self) -> bool {
        self.discrete_value == other.discrete_value
            && self.continuous_value == other.continuous_value
    }
}

impl<D: fmt::Debug, C: fmt::Debug> fmt::Debug for Parameter<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("discrete_value", &self.discrete_value)
            .field("continuous_value", &self.continuous_value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate;

    fn gain_parameter(initial: f32) -> Parameter<f32, f32> {
        Parameter::new(
            initial,
            1.0,
            Arc::new(translate::gain_discrete_to_continuous),
            Arc::new(translate::gain_continuous_to_discrete),
            "Gain",
        )
    }

    #[test]
    fn setting_discrete_updates_continuous() {
        let mut gain = gain_parameter(1.0);
        assert_eq!(gain.continuous_value(), 0.25);

        gain.set_discrete_value(2.0);
        assert_eq!(gain.discrete_value(), 2.0);
        assert_eq!(gain.continuous_value(), 0.5);
    }

    #[test]
    fn setting_continuous_updates_discrete() {
        let mut gain = gain_parameter(1.0);
        gain.set_continuous_value(0.75);
        assert_eq!(gain.discrete_value(), 3.0);
    }

    #[test]
    fn reset_restores_the_constructed_default() {
        let mut gain = gain_parameter(2.0);
        assert_eq!(gain.default_discrete_value(), 1.0);

        gain.set_to_default();
        assert_eq!(gain.discrete_value(), 1.0);
        assert_eq!(gain.continuous_value(), 0.25);
    }

    #[test]
    fn equality_ignores_the_name() {
        let renamed = Parameter::new(
            2.0,
            1.0,
            Arc::new(translate::gain_discrete_to_continuous),
            Arc::new(translate::gain_continuous_to_discrete),
            "Other",
        );
        assert_eq!(gain_parameter(2.0), renamed);

        let mut changed = gain_parameter(2.0);
        changed.set_discrete_value(3.0);
        assert_ne!(gain_parameter(2.0), changed);
    }

    #[test]
    fn clones_do_not_share_values() {
        let mut original = gain_parameter(1.0);
        let clone = original.clone();

        original.set_discrete_value(4.0);
        assert_eq!(original.continuous_value(), 1.0);
        assert_eq!(clone.discrete_value(), 1.0);
        assert_eq!(clone.continuous_value(), 0.25);
    }
}
