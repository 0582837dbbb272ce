//! Scene state: the source collection mirrored from the remote renderer

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{SceneError, SceneResult};
use crate::parameter::Parameter;
use crate::source::Source;
use crate::updates::{self, SourceChild, SourceUpdate};

/// Name of the source every scene starts with.
pub const DEFAULT_SOURCE_NAME: &str = "Default Source";

/// The set of sources known to this plugin instance plus the selection
/// cursor the GUI operates on.
///
/// Sources are append-only, so an index into the collection stays valid for
/// the lifetime of the scene and the selection follows its source across id
/// renumbering. Local edits mutate the selected source; inbound renderer
/// messages address sources by id and may adopt unknown ids as new sources.
pub struct Scene {
    sources: Vec<Source>,
    ids_and_names: Vec<(u32, String)>,
    selected: usize,
    scene_range: f32,
    rng: StdRng,
}

impl Scene {
    /// Create a scene covering `scene_range` meters, seeded from the OS.
    pub fn new(scene_range: f32) -> Self {
        Self::with_rng(scene_range, StdRng::from_os_rng())
    }

    /// Create a scene with an injected RNG, deterministic in tests.
    pub fn with_rng(scene_range: f32, rng: StdRng) -> Self {
        let mut scene = Self {
            sources: Vec::new(),
            ids_and_names: Vec::new(),
            selected: 0,
            scene_range,
            rng,
        };
        scene.new_source(DEFAULT_SOURCE_NAME);
        scene
    }

    /// Allocate the smallest unused positive id and create a source with it.
    /// The new source becomes the selected one.
    pub fn new_source(&mut self, name: &str) -> u32 {
        let id = self.next_free_id();
        let source = Source::new(id, name, self.scene_range, &mut self.rng);
        self.register(source);
        id
    }

    /// Adopt a renderer-assigned id. Returns false without touching anything
    /// when the id is already taken.
    pub fn new_source_with_id(&mut self, name: &str, id: u32) -> bool {
        if self.id_already_in_use(id) {
            return false;
        }
        let source = Source::new(id, name, self.scene_range, &mut self.rng);
        self.register(source);
        true
    }

    /// Adopt a renderer-assigned id with an explicit jack port.
    pub fn new_source_with_jackport(&mut self, name: &str, id: u32, jackport: &str) -> bool {
        if self.id_already_in_use(id) {
            return false;
        }
        let source = Source::with_jackport(id, name, self.scene_range, jackport, &mut self.rng);
        self.register(source);
        true
    }

    /// Re-target the selection cursor. False when the id is unknown.
    pub fn select_source(&mut self, id: u32) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Rename a source by id, keeping the id/name projection in sync.
    pub fn set_name_of_source(&mut self, id: u32, name: &str) -> SceneResult<()> {
        let index = self.index_of(id).ok_or(SceneError::SourceNotFound(id))?;
        self.sources[index].set_name(name);
        self.rename_projection(id, name);
        Ok(())
    }

    /// Renumber a source, keeping the projection in sync. The selection
    /// follows the source across the renumbering.
    pub fn set_id_of_source(&mut self, id: u32, new_id: u32) -> SceneResult<()> {
        let index = self.index_of(id).ok_or(SceneError::SourceNotFound(id))?;
        if new_id != id && self.id_already_in_use(new_id) {
            return Err(SceneError::DuplicateId(new_id));
        }
        self.sources[index].set_id(new_id);
        for (used, _) in &mut self.ids_and_names {
            if *used == id {
                *used = new_id;
            }
        }
        Ok(())
    }

    /// Apply one inbound renderer message.
    ///
    /// Source elements that cannot be used (missing id, unknown id without a
    /// name) are skipped; the rest of the message is still applied.
    pub fn interpret_xml_message(&mut self, xml_message: &str) {
        let Some(source_updates) = updates::parse_update_message(xml_message) else {
            return;
        };
        for update in source_updates {
            self.apply_source_update(update);
        }
    }

    fn apply_source_update(&mut self, update: SourceUpdate) {
        let index = match self.index_of(update.id) {
            Some(index) => index,
            None => match &update.name {
                Some(name) => {
                    let source = Source::new(update.id, name, self.scene_range, &mut self.rng);
                    self.register(source);
                    self.sources.len() - 1
                }
                None => {
                    log::debug!(
                        "[Scene] Dropping update for unknown source {} without a name",
                        update.id
                    );
                    return;
                }
            },
        };
        self.manipulate_source(index, update);
    }

    fn manipulate_source(&mut self, index: usize, update: SourceUpdate) {
        if let Some(volume_db) = update.volume_db {
            self.sources[index].set_gain_discrete(volume_db, false);
        }
        if let Some(name) = update.name {
            let id = self.sources[index].id();
            self.sources[index].set_name(&name);
            self.rename_projection(id, &name);
        }
        if let Some(mute) = update.mute {
            self.sources[index].set_mute_discrete(mute);
        }
        if let Some(model) = update.model {
            self.sources[index].set_model_point_discrete(model == "point");
        }
        if let Some(properties_file) = update.properties_file {
            self.sources[index].set_properties_file(&properties_file);
        }
        for child in update.children {
            match child {
                SourceChild::Position { x, y, fixed } => {
                    if let Some(x) = x {
                        self.sources[index].set_x_position_discrete(x);
                    }
                    if let Some(y) = y {
                        self.sources[index].set_y_position_discrete(y);
                    }
                    // A position element without a fixed attribute resets the flag.
                    self.sources[index].set_fixed_discrete(fixed.unwrap_or(false));
                }
                SourceChild::Orientation { azimuth } => {
                    if let Some(azimuth) = azimuth {
                        self.sources[index].set_orientation_discrete(azimuth);
                    }
                }
                SourceChild::Port(port) => {
                    self.sources[index].set_jackport(&port);
                }
            }
        }
    }

    fn register(&mut self, source: Source) {
        self.ids_and_names.push((source.id(), source.name().to_string()));
        self.sources.push(source);
        self.selected = self.sources.len() - 1;
    }

    fn rename_projection(&mut self, id: u32, name: &str) {
        for (used, used_name) in &mut self.ids_and_names {
            if *used == id {
                *used_name = name.to_string();
            }
        }
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.sources.iter().position(|source| source.id() == id)
    }

    fn id_already_in_use(&self, id: u32) -> bool {
        self.ids_and_names.iter().any(|(used, _)| *used == id)
    }

    fn next_free_id(&self) -> u32 {
        let mut id = 1;
        while self.id_already_in_use(id) {
            id += 1;
        }
        id
    }

    /// The source the selection cursor points at.
    pub fn selected_source(&self) -> &Source {
        &self.sources[self.selected]
    }

    fn selected_source_mut(&mut self) -> &mut Source {
        &mut self.sources[self.selected]
    }

    pub fn id_of_selected_source(&self) -> u32 {
        self.selected_source().id()
    }

    /// Renumber the selected source. See [`Scene::set_id_of_source`].
    pub fn set_id_of_selected_source(&mut self, new_id: u32) -> SceneResult<()> {
        self.set_id_of_source(self.id_of_selected_source(), new_id)
    }

    pub fn name_of_selected_source(&self) -> &str {
        self.selected_source().name()
    }

    /// Rename the selected source, keeping the projection in sync.
    pub fn set_name_of_selected_source(&mut self, name: &str) {
        let id = self.id_of_selected_source();
        self.selected_source_mut().set_name(name);
        self.rename_projection(id, name);
    }

    pub fn x_position_of_selected_source(&self) -> &Parameter<f32, f32> {
        self.selected_source().x_position()
    }

    pub fn set_x_position_discrete_of_selected_source(&mut self, position: f32) {
        self.selected_source_mut().set_x_position_discrete(position);
    }

    pub fn set_x_position_continuous_of_selected_source(&mut self, relative: f32) {
        self.selected_source_mut().set_x_position_continuous(relative);
    }

    pub fn y_position_of_selected_source(&self) -> &Parameter<f32, f32> {
        self.selected_source().y_position()
    }

    pub fn set_y_position_discrete_of_selected_source(&mut self, position: f32) {
        self.selected_source_mut().set_y_position_discrete(position);
    }

    pub fn set_y_position_continuous_of_selected_source(&mut self, relative: f32) {
        self.selected_source_mut().set_y_position_continuous(relative);
    }

    pub fn gain_of_selected_source(&self) -> &Parameter<f32, f32> {
        self.selected_source().gain()
    }

    /// Set the selected source's gain, as linear amplitude or as dB.
    pub fn set_gain_discrete_of_selected_source(&mut self, value: f32, linear: bool) {
        self.selected_source_mut().set_gain_discrete(value, linear);
    }

    pub fn set_gain_continuous_of_selected_source(&mut self, relative: f32) {
        self.selected_source_mut().set_gain_continuous(relative);
    }

    pub fn orientation_of_selected_source(&self) -> &Parameter<f32, f32> {
        self.selected_source().orientation()
    }

    pub fn set_orientation_discrete_of_selected_source(&mut self, azimuth: f32) {
        self.selected_source_mut().set_orientation_discrete(azimuth);
    }

    pub fn set_orientation_continuous_of_selected_source(&mut self, relative: f32) {
        self.selected_source_mut().set_orientation_continuous(relative);
    }

    pub fn mute_of_selected_source(&self) -> &Parameter<bool, f32> {
        self.selected_source().mute()
    }

    pub fn set_mute_discrete_of_selected_source(&mut self, value: bool) {
        self.selected_source_mut().set_mute_discrete(value);
    }

    pub fn set_mute_continuous_of_selected_source(&mut self, relative: f32) {
        self.selected_source_mut().set_mute_continuous(relative);
    }

    pub fn model_point_of_selected_source(&self) -> &Parameter<bool, f32> {
        self.selected_source().model_point()
    }

    pub fn set_model_point_discrete_of_selected_source(&mut self, value: bool) {
        self.selected_source_mut().set_model_point_discrete(value);
    }

    pub fn set_model_point_continuous_of_selected_source(&mut self, relative: f32) {
        self.selected_source_mut().set_model_point_continuous(relative);
    }

    pub fn fixed_of_selected_source(&self) -> &Parameter<bool, f32> {
        self.selected_source().fixed()
    }

    pub fn set_fixed_discrete_of_selected_source(&mut self, value: bool) {
        self.selected_source_mut().set_fixed_discrete(value);
    }

    pub fn set_fixed_continuous_of_selected_source(&mut self, relative: f32) {
        self.selected_source_mut().set_fixed_continuous(relative);
    }

    pub fn properties_file_of_selected_source(&self) -> &str {
        self.selected_source().properties_file()
    }

    pub fn set_properties_file_of_selected_source(&mut self, file: &str) {
        self.selected_source_mut().set_properties_file(file);
    }

    pub fn jackport_of_selected_source(&self) -> &str {
        self.selected_source().jackport()
    }

    pub fn set_jackport_of_selected_source(&mut self, port: &str) {
        self.selected_source_mut().set_jackport(port);
    }

    /// Id/name projection used to populate the source picker.
    pub fn source_ids_and_names(&self) -> &[(u32, String)] {
        &self.ids_and_names
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn scene_range(&self) -> f32 {
        self.scene_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_scene() -> Scene {
        Scene::with_rng(20.0, StdRng::seed_from_u64(99))
    }

    #[test]
    fn starts_with_a_selected_default_source() {
        let scene = test_scene();
        assert_eq!(scene.sources().len(), 1);
        assert_eq!(scene.id_of_selected_source(), 1);
        assert_eq!(scene.name_of_selected_source(), DEFAULT_SOURCE_NAME);
        assert_eq!(
            scene.source_ids_and_names(),
            &[(1, DEFAULT_SOURCE_NAME.to_string())]
        );
    }

    #[test]
    fn ids_fill_gaps() {
        let mut scene = test_scene();
        assert!(scene.new_source_with_id("Three", 3));
        assert_eq!(scene.new_source("Two"), 2);
        assert_eq!(scene.new_source("Four"), 4);
    }

    #[test]
    fn adopting_a_taken_id_is_rejected() {
        let mut scene = test_scene();
        assert!(scene.new_source_with_id("First", 7));
        assert!(!scene.new_source_with_id("Again", 7));
        assert_eq!(scene.sources().len(), 2);
        assert_eq!(scene.name_of_selected_source(), "First");
    }

    #[test]
    fn adoption_can_carry_a_jackport() {
        let mut scene = test_scene();
        assert!(scene.new_source_with_jackport("Mic", 4, "system:capture_3"));
        assert_eq!(scene.jackport_of_selected_source(), "system:capture_3");
        assert!(!scene.new_source_with_jackport("Again", 4, "system:capture_4"));
    }

    #[test]
    fn selection_requires_a_known_id() {
        let mut scene = test_scene();
        scene.new_source("Second");
        assert!(scene.select_source(1));
        assert_eq!(scene.id_of_selected_source(), 1);
        assert!(!scene.select_source(42));
        assert_eq!(scene.id_of_selected_source(), 1);
    }

    #[test]
    fn renaming_updates_the_projection() {
        let mut scene = test_scene();
        let id = scene.new_source("Before");
        scene.set_name_of_source(id, "After").unwrap();
        assert_eq!(scene.name_of_selected_source(), "After");
        assert!(scene.source_ids_and_names().contains(&(id, "After".to_string())));
    }

    #[test]
    fn renumbering_keeps_projection_and_selection() {
        let mut scene = test_scene();
        let id = scene.new_source("Movable");
        scene.set_id_of_source(id, 9).unwrap();
        assert_eq!(scene.id_of_selected_source(), 9);
        assert!(scene.source_ids_and_names().contains(&(9, "Movable".to_string())));
        assert!(!scene.source_ids_and_names().iter().any(|(used, _)| *used == id));
    }

    #[test]
    fn renumbering_to_the_same_id_is_allowed() {
        let mut scene = test_scene();
        assert_eq!(scene.set_id_of_source(1, 1), Ok(()));
        assert_eq!(scene.id_of_selected_source(), 1);
    }

    #[test]
    fn unknown_ids_are_typed_errors() {
        let mut scene = test_scene();
        let before = scene.source_ids_and_names().to_vec();
        assert_eq!(
            scene.set_name_of_source(42, "Ghost"),
            Err(SceneError::SourceNotFound(42))
        );
        assert_eq!(
            scene.set_id_of_source(42, 43),
            Err(SceneError::SourceNotFound(42))
        );
        assert_eq!(scene.source_ids_and_names(), &before[..]);
    }

    #[test]
    fn renumbering_onto_a_taken_id_is_rejected() {
        let mut scene = test_scene();
        let id = scene.new_source("Second");
        assert_eq!(
            scene.set_id_of_selected_source(1),
            Err(SceneError::DuplicateId(1))
        );
        assert_eq!(scene.id_of_selected_source(), id);
    }

    #[test]
    fn selected_source_setters_delegate() {
        let mut scene = test_scene();

        scene.set_x_position_discrete_of_selected_source(4.0);
        assert_eq!(scene.x_position_of_selected_source().discrete_value(), 4.0);

        scene.set_gain_discrete_of_selected_source(2.0, true);
        assert_eq!(scene.gain_of_selected_source().discrete_value(), 2.0);

        scene.set_mute_discrete_of_selected_source(true);
        assert!(scene.mute_of_selected_source().discrete_value());

        scene.set_fixed_continuous_of_selected_source(1.0);
        assert!(scene.fixed_of_selected_source().discrete_value());

        scene.set_name_of_selected_source("Renamed");
        assert!(scene.source_ids_and_names().contains(&(1, "Renamed".to_string())));
    }
}
