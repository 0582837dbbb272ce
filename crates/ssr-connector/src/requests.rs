//! Outbound request dialect
//!
//! The renderer accepts ad hoc XML fragments wrapped in `<request>`. The
//! fragments are built by plain string formatting; the server owns the
//! dialect and there is no schema to validate against. Flag attributes go
//! out as `1`/`0`; only the new-source marker is a spelled-out word.

/// Facet of the selected source to serialize after a local mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSpecificator {
    Gain,
    Position,
    Mute,
    Fixed,
    Model,
    PropertiesFile,
    Port,
    Name,
    NewSource,
}

fn wrap(fragment: String) -> String {
    format!("<request>{fragment}</request>")
}

/// Position update for one source.
pub fn position(id: u32, x: f32, y: f32) -> String {
    wrap(format!(r#"<source id="{id}"><position x="{x}" y="{y}"/></source>"#))
}

/// Gain update; `gain_db` must already be converted to dB.
pub fn gain(id: u32, gain_db: f32) -> String {
    wrap(format!(r#"<source id="{id}" volume="{gain_db}"/>"#))
}

/// Mute update.
pub fn mute(id: u32, muted: bool) -> String {
    wrap(format!(r#"<source id="{id}" mute="{}"/>"#, u8::from(muted)))
}

/// Position-fixed update.
pub fn fixed(id: u32, fixed: bool) -> String {
    wrap(format!(
        r#"<source id="{id}"><position fixed="{}"/></source>"#,
        u8::from(fixed)
    ))
}

/// Source model update.
pub fn model(id: u32, point: bool) -> String {
    let model = if point { "point" } else { "plane" };
    wrap(format!(r#"<source id="{id}" model="{model}"/>"#))
}

/// Name update.
pub fn name(id: u32, name: &str) -> String {
    wrap(format!(r#"<source id="{id}" name="{name}"/>"#))
}

/// Properties-file update.
pub fn properties_file(id: u32, file: &str) -> String {
    wrap(format!(r#"<source id="{id}" properties_file="{file}"/>"#))
}

/// Jack port update.
pub fn port(id: u32, port: &str) -> String {
    wrap(format!(r#"<source id="{id}" port="{port}"/>"#))
}

/// Announce a locally created source; the renderer assigns its own id and
/// echoes the source back in an update.
pub fn new_source(name: &str, port: &str, x: f32, y: f32) -> String {
    wrap(format!(
        r#"<source new="true" name="{name}" port="{port}"><position x="{x}" y="{y}"/></source>"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_match_the_renderer_dialect() {
        assert_eq!(
            position(1, 2.5, -3.0),
            r#"<request><source id="1"><position x="2.5" y="-3"/></source></request>"#
        );
        assert_eq!(gain(2, -6.0), r#"<request><source id="2" volume="-6"/></request>"#);
        assert_eq!(mute(3, true), r#"<request><source id="3" mute="1"/></request>"#);
        assert_eq!(
            fixed(4, false),
            r#"<request><source id="4"><position fixed="0"/></source></request>"#
        );
        assert_eq!(model(5, true), r#"<request><source id="5" model="point"/></request>"#);
        assert_eq!(model(5, false), r#"<request><source id="5" model="plane"/></request>"#);
        assert_eq!(name(6, "Lead"), r#"<request><source id="6" name="Lead"/></request>"#);
        assert_eq!(
            properties_file(7, "a.prop"),
            r#"<request><source id="7" properties_file="a.prop"/></request>"#
        );
        assert_eq!(
            port(8, "capture_1"),
            r#"<request><source id="8" port="capture_1"/></request>"#
        );
    }

    #[test]
    fn new_source_carries_name_port_and_position() {
        assert_eq!(
            new_source("Source A", "capture_2", 0.5, -0.25),
            r#"<request><source new="true" name="Source A" port="capture_2"><position x="0.5" y="-0.25"/></source></request>"#
        );
    }

    #[test]
    fn flags_are_encoded_as_numbers() {
        assert_eq!(mute(1, true), r#"<request><source id="1" mute="1"/></request>"#);
        assert_eq!(mute(1, false), r#"<request><source id="1" mute="0"/></request>"#);
        assert_eq!(
            fixed(2, true),
            r#"<request><source id="2"><position fixed="1"/></source></request>"#
        );
        assert_eq!(
            fixed(2, false),
            r#"<request><source id="2"><position fixed="0"/></source></request>"#
        );
        // The new-source marker alone is a spelled-out word.
        assert!(new_source("A", "capture_2", 0.0, 0.0).contains(r#"new="true""#));
    }

    #[test]
    fn whole_numbers_format_without_a_fraction() {
        assert_eq!(gain(1, 0.0), r#"<request><source id="1" volume="0"/></request>"#);
        assert_eq!(
            position(1, -10.0, 10.0),
            r#"<request><source id="1"><position x="-10" y="10"/></source></request>"#
        );
    }
}
