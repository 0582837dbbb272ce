//! A single spatial audio source mirrored from the remote renderer

use std::sync::Arc;

use rand::Rng;

use crate::Decibels;
use crate::parameter::Parameter;
use crate::translate;

/// Jack capture port new sources are wired to unless told otherwise.
pub const DEFAULT_JACKPORT: &str = "capture_2";

/// Index of one automatable source parameter, in host automation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceParameter {
    XPosition,
    YPosition,
    Gain,
    Orientation,
    Mute,
    ModelPoint,
    Fixed,
}

impl SourceParameter {
    /// Number of automatable parameters per source.
    pub const COUNT: usize = 7;

    /// All parameters in automation order.
    pub const ALL: [SourceParameter; SourceParameter::COUNT] = [
        SourceParameter::XPosition,
        SourceParameter::YPosition,
        SourceParameter::Gain,
        SourceParameter::Orientation,
        SourceParameter::Mute,
        SourceParameter::ModelPoint,
        SourceParameter::Fixed,
    ];
}

/// One spatial audio source as known to the remote renderer: seven
/// dual-representation parameters plus plain identity fields.
///
/// The position translation functions close over the scene range captured at
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    id: u32,
    name: String,
    x_position: Parameter<f32, f32>,
    y_position: Parameter<f32, f32>,
    gain: Parameter<f32, f32>,
    orientation: Parameter<f32, f32>,
    mute: Parameter<bool, f32>,
    model_point: Parameter<bool, f32>,
    fixed: Parameter<bool, f32>,
    properties_file: String,
    jackport: String,
}

impl Source {
    /// Create a source wired to the default jack port.
    pub fn new(id: u32, name: &str, scene_range: f32, rng: &mut impl Rng) -> Self {
        Self::with_jackport(id, name, scene_range, DEFAULT_JACKPORT, rng)
    }

    /// Create a source with an explicit jack port.
    ///
    /// All parameters start at their defaults, then the position is
    /// overwritten with a random point in [-1, +1] meters so freshly created
    /// sources do not pile up at the origin.
    pub fn with_jackport(
        id: u32,
        name: &str,
        scene_range: f32,
        jackport: &str,
        rng: &mut impl Rng,
    ) -> Self {
        let mut source = Self {
            id,
            name: name.to_string(),
            x_position: x_position_parameter(scene_range),
            y_position: y_position_parameter(scene_range),
            gain: gain_parameter(),
            orientation: orientation_parameter(),
            mute: flag_parameter("Mute", false),
            model_point: flag_parameter("Model", true),
            fixed: flag_parameter("Fixed", false),
            properties_file: String::new(),
            jackport: jackport.to_string(),
        };
        source.set_all_parameters_on_default();
        source.x_position.set_discrete_value(rng.random_range(-1.0..=1.0));
        source.y_position.set_discrete_value(rng.random_range(-1.0..=1.0));
        source
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn x_position(&self) -> &Parameter<f32, f32> {
        &self.x_position
    }

    pub fn set_x_position_discrete(&mut self, position: f32) {
        self.x_position.set_discrete_value(position);
    }

    pub fn set_x_position_continuous(&mut self, relative: f32) {
        self.x_position.set_continuous_value(relative);
    }

    pub fn y_position(&self) -> &Parameter<f32, f32> {
        &self.y_position
    }

    pub fn set_y_position_discrete(&mut self, position: f32) {
        self.y_position.set_discrete_value(position);
    }

    pub fn set_y_position_continuous(&mut self, relative: f32) {
        self.y_position.set_continuous_value(relative);
    }

    pub fn gain(&self) -> &Parameter<f32, f32> {
        &self.gain
    }

    /// Set the gain either as linear amplitude or as a dB value that is
    /// converted to linear before storing.
    pub fn set_gain_discrete(&mut self, value: f32, linear: bool) {
        if linear {
            self.gain.set_discrete_value(value);
        } else {
            self.gain.set_discrete_value(Decibels(value).to_gain());
        }
    }

    pub fn set_gain_continuous(&mut self, relative: f32) {
        self.gain.set_continuous_value(relative);
    }

    pub fn orientation(&self) -> &Parameter<f32, f32> {
        &self.orientation
    }

    pub fn set_orientation_discrete(&mut self, azimuth: f32) {
        self.orientation.set_discrete_value(azimuth);
    }

    pub fn set_orientation_continuous(&mut self, relative: f32) {
        self.orientation.set_continuous_value(relative);
    }

    pub fn mute(&self) -> &Parameter<bool, f32> {
        &self.mute
    }

    pub fn set_mute_discrete(&mut self, value: bool) {
        self.mute.set_discrete_value(value);
    }

    pub fn set_mute_continuous(&mut self, relative: f32) {
        self.mute.set_continuous_value(relative);
    }

    pub fn model_point(&self) -> &Parameter<bool, f32> {
        &self.model_point
    }

    pub fn set_model_point_discrete(&mut self, value: bool) {
        self.model_point.set_discrete_value(value);
    }

    pub fn set_model_point_continuous(&mut self, relative: f32) {
        self.model_point.set_continuous_value(relative);
    }

    pub fn fixed(&self) -> &Parameter<bool, f32> {
        &self.fixed
    }

    pub fn set_fixed_discrete(&mut self, value: bool) {
        self.fixed.set_discrete_value(value);
    }

    pub fn set_fixed_continuous(&mut self, relative: f32) {
        self.fixed.set_continuous_value(relative);
    }

    pub fn properties_file(&self) -> &str {
        &self.properties_file
    }

    pub fn set_properties_file(&mut self, file: &str) {
        self.properties_file = file.to_string();
    }

    pub fn jackport(&self) -> &str {
        &self.jackport
    }

    pub fn set_jackport(&mut self, port: &str) {
        self.jackport = port.to_string();
    }

    /// Reset every parameter to its constructed default.
    pub fn set_all_parameters_on_default(&mut self) {
        self.x_position.set_to_default();
        self.y_position.set_to_default();
        self.gain.set_to_default();
        self.orientation.set_to_default();
        self.mute.set_to_default();
        self.model_point.set_to_default();
        self.fixed.set_to_default();
    }

    /// Continuous value of one parameter, for automation-index access.
    pub fn continuous_value_of(&self, parameter: SourceParameter) -> f32 {
        match parameter {
            SourceParameter::XPosition => self.x_position.continuous_value(),
            SourceParameter::YPosition => self.y_position.continuous_value(),
            SourceParameter::Gain => self.gain.continuous_value(),
            SourceParameter::Orientation => self.orientation.continuous_value(),
            SourceParameter::Mute => self.mute.continuous_value(),
            SourceParameter::ModelPoint => self.model_point.continuous_value(),
            SourceParameter::Fixed => self.fixed.continuous_value(),
        }
    }

    /// Set one parameter from its continuous representation.
    pub fn set_continuous_value_of(&mut self, parameter: SourceParameter, relative: f32) {
        match parameter {
            SourceParameter::XPosition => self.x_position.set_continuous_value(relative),
            SourceParameter::YPosition => self.y_position.set_continuous_value(relative),
            SourceParameter::Gain => self.gain.set_continuous_value(relative),
            SourceParameter::Orientation => self.orientation.set_continuous_value(relative),
            SourceParameter::Mute => self.mute.set_continuous_value(relative),
            SourceParameter::ModelPoint => self.model_point.set_continuous_value(relative),
            SourceParameter::Fixed => self.fixed.set_continuous_value(relative),
        }
    }
}

fn x_position_parameter(scene_range: f32) -> Parameter<f32, f32> {
    Parameter::new(
        0.0,
        0.0,
        Arc::new(move |position| translate::x_position_discrete_to_continuous(position, scene_range)),
        Arc::new(move |relative| translate::x_position_continuous_to_discrete(relative, scene_range)),
        "X Position",
    )
}

fn y_position_parameter(scene_range: f32) -> Parameter<f32, f32> {
    Parameter::new(
        0.0,
        0.0,
        Arc::new(move |position| translate::y_position_discrete_to_continuous(position, scene_range)),
        Arc::new(move |relative| translate::y_position_continuous_to_discrete(relative, scene_range)),
        "Y Position",
    )
}

fn gain_parameter() -> Parameter<f32, f32> {
    Parameter::new(
        1.0,
        1.0,
        Arc::new(translate::gain_discrete_to_continuous),
        Arc::new(translate::gain_continuous_to_discrete),
        "Gain",
    )
}

fn orientation_parameter() -> Parameter<f32, f32> {
    Parameter::new(
        0.0,
        0.0,
        Arc::new(translate::orientation_discrete_to_continuous),
        Arc::new(translate::orientation_continuous_to_discrete),
        "Orientation",
    )
}

fn flag_parameter(name: &str, default: bool) -> Parameter<bool, f32> {
    Parameter::new(
        default,
        default,
        Arc::new(translate::bool_discrete_to_continuous),
        Arc::new(translate::bool_continuous_to_discrete),
        name,
    )
}
