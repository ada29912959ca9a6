// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene sink trait defining the emission contract.

use crate::stage::{Area, StageObject};

/// Receiver of a finished level.
///
/// [`crate::Level::emit`] streams the stage-level objects and areas first,
/// then each zone as a [`SceneSink::begin_zone`] call followed by its
/// objects. Everything before the first `begin_zone` belongs to the stage
/// itself.
///
/// Objects arrive with their owned links attached. Objects marked
/// `link_dest` are still emitted; adapters decide whether to nest them under
/// the objects that link to them.
pub trait SceneSink {
    /// Starts a zone; following objects belong to it.
    fn begin_zone(&mut self, name: &str);

    /// Receives one object.
    fn object(&mut self, object: &StageObject);

    /// Receives one area.
    fn area(&mut self, area: &Area);
}

/// One call received by a recording sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// [`SceneSink::begin_zone`].
    BeginZone(String),
    /// [`SceneSink::object`].
    Object(StageObject),
    /// [`SceneSink::area`].
    Area(Area),
}

/// Records every call, in order.
impl SceneSink for Vec<SceneEvent> {
    fn begin_zone(&mut self, name: &str) {
        self.push(SceneEvent::BeginZone(name.to_owned()));
    }

    fn object(&mut self, object: &StageObject) {
        self.push(SceneEvent::Object(object.clone()));
    }

    fn area(&mut self, area: &Area) {
        self.push(SceneEvent::Area(area.clone()));
    }
}
