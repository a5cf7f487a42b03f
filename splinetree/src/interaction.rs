//! Routing of normalized pointer input to the selected objects.
//!
//! The router is stateless: every event goes to every object in the
//! selection model, and objects decide for themselves whether it hits.

use crate::document::{Document, Handle};
use crate::error::Result;
use crate::events::ModelEvent;
use crate::geometry::limits;
use crate::model::Vec2;
use crate::objects::Object;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    NoButton,
    Left,
    Right,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Press,
    Release,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickKind {
    #[default]
    NoClick,
    SingleClick,
    DoubleClick,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Shift or control turn a click into an extending one.
    pub fn extends_selection(self) -> bool {
        self.shift || self.control
    }
}

/// A pointer event in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub button: MouseButton,
    pub position: Vec2,
    pub phase: Phase,
    #[serde(default)]
    pub click: ClickKind,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Set for pointer motion: the offset since the previous event.
    #[serde(default)]
    pub delta: Option<Vec2>,
}

impl Interaction {
    pub fn press(button: MouseButton, position: Vec2, click: ClickKind, modifiers: Modifiers) -> Self {
        Interaction { button, position, phase: Phase::Press, click, modifiers, delta: None }
    }

    pub fn release(button: MouseButton, position: Vec2) -> Self {
        Interaction {
            button,
            position,
            phase: Phase::Release,
            click: ClickKind::NoClick,
            modifiers: Modifiers::default(),
            delta: None,
        }
    }

    pub fn moved(position: Vec2, delta: Vec2) -> Self {
        Interaction {
            button: MouseButton::NoButton,
            position,
            phase: Phase::Release,
            click: ClickKind::NoClick,
            modifiers: Modifiers::default(),
            delta: Some(delta),
        }
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.delta.map_or(true, Vec2::is_finite)
    }
}

impl Document {
    // ---- selection model ----

    pub fn select(&mut self, handle: Handle) -> Result<bool> {
        let key = self.resolve(handle)?;
        Ok(self.selection.select(key))
    }

    pub fn deselect(&mut self, handle: Handle) -> Result<bool> {
        let key = self.resolve(handle)?;
        Ok(self.selection.deselect(key))
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    pub fn is_selected(&self, handle: Handle) -> bool {
        self.selection.contains(handle.node)
    }

    pub fn selected(&self) -> Vec<Handle> {
        self.selection.keys().iter().filter_map(|k| self.handle_for(*k)).collect()
    }

    // ---- routing ----

    /// Deliver `event` to every selected object. Returns whether any of
    /// them changed.
    pub fn process_interaction(&mut self, event: &Interaction) -> bool {
        if !event.is_finite() {
            log::warn!("event=interaction_rejected module=interaction reason=non_finite");
            return false;
        }
        if let Some(delta) = event.delta {
            return self.dispatch("move", |o| o.move_selected(delta));
        }
        match (event.phase, event.click) {
            (Phase::Press, ClickKind::SingleClick | ClickKind::DoubleClick) => {
                let extended = event.modifiers.extends_selection();
                let radius = self.config.pick_radius;
                let pos = event.position;
                self.dispatch("select", |o| o.select_at(pos, extended, radius))
            }
            _ => self.dispatch("release", |_| false),
        }
    }

    /// Add a point at `pos` to every selected object that holds points.
    pub fn insert(&mut self, pos: Vec2) -> bool {
        if !limits::in_coord_bounds(pos.x) || !limits::in_coord_bounds(pos.y) {
            log::warn!("event=insert_rejected module=interaction reason=out_of_bounds");
            return false;
        }
        self.dispatch("insert", |o| o.insert(pos))
    }

    pub fn remove_selected(&mut self) -> bool {
        self.dispatch("remove_selected", |o| o.remove_selected())
    }

    pub fn remove_at(&mut self, pos: Vec2) -> bool {
        if !pos.is_finite() {
            return false;
        }
        let radius = self.config.pick_radius;
        self.dispatch("remove_at", |o| o.remove_at(pos, radius))
    }

    fn dispatch<F>(&mut self, what: &str, mut f: F) -> bool
    where
        F: FnMut(&mut dyn Object) -> bool,
    {
        let mut changed = false;
        let targets = self.selection.keys().to_vec();
        for key in &targets {
            if let Some(node) = self.tree.get_mut(*key) {
                changed |= f(node.object_mut());
            }
        }
        log::debug!("event=dispatch module=interaction op={} targets={} changed={}", what, targets.len(), changed);
        if changed {
            self.events.push(ModelEvent::Changed);
        }
        changed
    }
}
