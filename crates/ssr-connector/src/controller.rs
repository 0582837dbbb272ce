//! Controller glue: local edits out, renderer updates in

use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use ssr_scene::{Decibels, Scene, SceneResult};

use crate::config::NetworkConfig;
use crate::connection::{Connection, TcpConnection};
use crate::requests::{self, UpdateSpecificator};

/// Meters covered by the full normalized position range.
pub const DEFAULT_SCENE_RANGE: f32 = 20.0;

/// Orchestrates the scene against the renderer connection.
///
/// Single-threaded by design of the wire layer: the owner calls
/// `poll_messages` periodically and reads state back through `scene()` when
/// the dirty flag is raised. Every local mutation sends exactly one request,
/// in call order.
pub struct Controller<C: Connection = TcpConnection> {
    scene: Scene,
    connection: C,
    ui_update_required: bool,
    rng: StdRng,
}

impl Controller<TcpConnection> {
    /// Controller over a TCP connection with the given settings.
    pub fn new(config: NetworkConfig) -> Self {
        Self::with_connection(TcpConnection::new(config))
    }
}

impl<C: Connection> Controller<C> {
    /// Controller over an injected connection.
    pub fn with_connection(connection: C) -> Self {
        Self {
            scene: Scene::new(DEFAULT_SCENE_RANGE),
            connection,
            ui_update_required: false,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Re-read the network settings and establish the connection, so config
    /// file edits take effect without recreating the controller.
    pub fn connect(&mut self) -> bool {
        self.connection.reconfigure(&NetworkConfig::load());
        self.connection.connect()
    }

    pub fn disconnect(&mut self) {
        self.connection.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Scene state for the GUI's read path.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Whether scene state changed since the GUI last repainted.
    pub fn ui_needs_update(&self) -> bool {
        self.ui_update_required
    }

    pub fn mark_ui_updated(&mut self) {
        self.ui_update_required = false;
    }

    /// Force a repaint cycle, for GUI-side state the scene does not track.
    pub fn request_ui_update(&mut self) {
        self.ui_update_required = true;
    }

    /// Drain all complete inbound messages without blocking.
    pub fn poll_messages(&mut self) {
        while let Some(message) = self.connection.receive_message(Duration::ZERO) {
            self.scene.interpret_xml_message(&message);
            self.ui_update_required = true;
        }
    }

    /// Create a randomly named source and announce it to the renderer.
    pub fn new_source(&mut self) -> u32 {
        let name = random_source_name(&mut self.rng);
        let id = self.scene.new_source(&name);
        self.update_ssr(UpdateSpecificator::NewSource);
        id
    }

    /// Re-target the selection cursor; purely local.
    pub fn select_source(&mut self, id: u32) -> bool {
        self.scene.select_source(id)
    }

    /// Renumber the selected source; purely local, the dialect has no
    /// id-change request.
    pub fn set_id_of_selected_source(&mut self, new_id: u32) -> SceneResult<()> {
        let outcome = self.scene.set_id_of_selected_source(new_id);
        if outcome.is_ok() {
            self.ui_update_required = true;
        }
        outcome
    }

    pub fn set_name_of_selected_source(&mut self, name: &str) {
        self.scene.set_name_of_selected_source(name);
        self.update_ssr(UpdateSpecificator::Name);
    }

    pub fn set_x_position_discrete_of_selected_source(&mut self, position: f32) {
        self.scene.set_x_position_discrete_of_selected_source(position);
        self.update_ssr(UpdateSpecificator::Position);
    }

    pub fn set_x_position_continuous_of_selected_source(&mut self, relative: f32) {
        self.scene.set_x_position_continuous_of_selected_source(relative);
        self.update_ssr(UpdateSpecificator::Position);
    }

    pub fn set_y_position_discrete_of_selected_source(&mut self, position: f32) {
        self.scene.set_y_position_discrete_of_selected_source(position);
        self.update_ssr(UpdateSpecificator::Position);
    }

    pub fn set_y_position_continuous_of_selected_source(&mut self, relative: f32) {
        self.scene.set_y_position_continuous_of_selected_source(relative);
        self.update_ssr(UpdateSpecificator::Position);
    }

    /// Set the selected source's gain, as linear amplitude or as dB. The
    /// outgoing request always carries dB.
    pub fn set_gain_discrete_of_selected_source(&mut self, value: f32, linear: bool) {
        self.scene.set_gain_discrete_of_selected_source(value, linear);
        self.update_ssr(UpdateSpecificator::Gain);
    }

    pub fn set_gain_continuous_of_selected_source(&mut self, relative: f32) {
        self.scene.set_gain_continuous_of_selected_source(relative);
        self.update_ssr(UpdateSpecificator::Gain);
    }

    /// Orientation changes stay local: the dialect has no orientation
    /// request, the renderer only reports it.
    pub fn set_orientation_discrete_of_selected_source(&mut self, azimuth: f32) {
        self.scene.set_orientation_discrete_of_selected_source(azimuth);
        self.ui_update_required = true;
    }

    pub fn set_orientation_continuous_of_selected_source(&mut self, relative: f32) {
        self.scene.set_orientation_continuous_of_selected_source(relative);
        self.ui_update_required = true;
    }

    pub fn set_mute_discrete_of_selected_source(&mut self, value: bool) {
        self.scene.set_mute_discrete_of_selected_source(value);
        self.update_ssr(UpdateSpecificator::Mute);
    }

    pub fn set_mute_continuous_of_selected_source(&mut self, relative: f32) {
        self.scene.set_mute_continuous_of_selected_source(relative);
        self.update_ssr(UpdateSpecificator::Mute);
    }

    pub fn set_model_point_discrete_of_selected_source(&mut self, value: bool) {
        self.scene.set_model_point_discrete_of_selected_source(value);
        self.update_ssr(UpdateSpecificator::Model);
    }

    pub fn set_model_point_continuous_of_selected_source(&mut self, relative: f32) {
        self.scene.set_model_point_continuous_of_selected_source(relative);
        self.update_ssr(UpdateSpecificator::Model);
    }

    pub fn set_fixed_discrete_of_selected_source(&mut self, value: bool) {
        self.scene.set_fixed_discrete_of_selected_source(value);
        self.update_ssr(UpdateSpecificator::Fixed);
    }

    pub fn set_fixed_continuous_of_selected_source(&mut self, relative: f32) {
        self.scene.set_fixed_continuous_of_selected_source(relative);
        self.update_ssr(UpdateSpecificator::Fixed);
    }

    pub fn set_properties_file_of_selected_source(&mut self, file: &str) {
        self.scene.set_properties_file_of_selected_source(file);
        self.update_ssr(UpdateSpecificator::PropertiesFile);
    }

    pub fn set_jackport_of_selected_source(&mut self, port: &str) {
        self.scene.set_jackport_of_selected_source(port);
        self.update_ssr(UpdateSpecificator::Port);
    }

    /// Serialize the selected facet of the selected source and fire it at
    /// the renderer. Failed sends are logged and dropped; the renderer's
    /// next update re-synchronizes.
    fn update_ssr(&mut self, specificator: UpdateSpecificator) {
        let source = self.scene.selected_source();
        let id = source.id();
        let message = match specificator {
            UpdateSpecificator::Gain => {
                let gain_db = Decibels::from_gain(source.gain().discrete_value()).0;
                requests::gain(id, gain_db)
            }
            UpdateSpecificator::Position => requests::position(
                id,
                source.x_position().discrete_value(),
                source.y_position().discrete_value(),
            ),
            UpdateSpecificator::Mute => requests::mute(id, source.mute().discrete_value()),
            UpdateSpecificator::Fixed => requests::fixed(id, source.fixed().discrete_value()),
            UpdateSpecificator::Model => {
                requests::model(id, source.model_point().discrete_value())
            }
            UpdateSpecificator::PropertiesFile => {
                requests::properties_file(id, source.properties_file())
            }
            UpdateSpecificator::Port => requests::port(id, source.jackport()),
            UpdateSpecificator::Name => requests::name(id, source.name()),
            UpdateSpecificator::NewSource => requests::new_source(
                source.name(),
                source.jackport(),
                source.x_position().discrete_value(),
                source.y_position().discrete_value(),
            ),
        };

        if !self.connection.send_message(&message, Duration::ZERO) {
            log::warn!("[Controller] Dropped request: {message}");
        }
        self.ui_update_required = true;
    }
}

/// "Source" plus five random uppercase letters.
fn random_source_name(rng: &mut StdRng) -> String {
    let mut name = String::from("Source");
    for _ in 0..5 {
        name.push(rng.random_range(b'A'..=b'Z') as char);
    }
    name
}
