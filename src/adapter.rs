//! Toolkit adapter boundary.
//!
//! The engine never owns UI elements. Everything it knows about the live
//! tree comes through [`ElementTree`], and every handle it holds may be dead
//! by the next call.

use crate::error::AdapterError;
use crate::geom::{Direction, Rect};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Identifies a rendering surface (window, popup, context menu).
pub type SurfaceId = u64;

/// Snapshot of the element properties a sync pass needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementInfo {
    /// Human-assigned name. May be empty.
    pub name: String,
    /// Toolkit type name, e.g. `Button`.
    pub type_name: String,
    /// Developer-assigned automation id.
    pub automation_id: Option<String>,
    /// Literal content, e.g. a caption.
    pub content: Option<String>,
    pub visible: bool,
    pub loaded: bool,
    pub focusable: bool,
    pub enabled: bool,
    /// Toolkit marks the element as an input control.
    pub interactive: bool,
    /// `Some` for expandable elements (combo boxes, expanders, tree items).
    pub expanded: Option<bool>,
    /// Rendering surface the element draws on.
    pub surface: SurfaceId,
}

impl ElementInfo {
    /// Visible and loaded.
    pub fn is_presentable(&self) -> bool {
        self.visible && self.loaded
    }

    /// Automation id if present, else a non-empty name.
    pub fn stable_name(&self) -> Option<&str> {
        self.automation_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| Some(self.name.as_str()).filter(|name| !name.is_empty()))
    }
}

/// Value of an adjustable control, captured for cancel/revert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlValue {
    Number(f64),
    Text(String),
    Toggle(bool),
}

impl ControlValue {
    /// Stepped with directional input while in interaction mode.
    pub fn is_adjustable(&self) -> bool {
        matches!(self, ControlValue::Number(_))
    }
}

/// Host toolkit adapter.
///
/// All calls happen on the UI-affine thread that owns the engine.
pub trait ElementTree {
    /// Non-owning element handle.
    type Element: Clone + Eq + Hash + Debug;

    /// True while the handle still refers to a live element.
    fn is_alive(&self, element: &Self::Element) -> bool;

    /// Read the properties of one element.
    fn describe(&self, element: &Self::Element) -> Result<ElementInfo, AdapterError>;

    /// Enumerate direct children in visual order.
    fn children(&self, element: &Self::Element) -> Result<Vec<Self::Element>, AdapterError>;

    /// Current on-screen bounds, `None` if unknown or dead.
    fn bounds(&self, element: &Self::Element) -> Option<Rect>;

    /// Default action: click, toggle, select or expand.
    fn invoke(&mut self, element: &Self::Element) -> Result<(), AdapterError>;

    /// Close affordance of a modal element (collapse, dismiss).
    fn close(&mut self, element: &Self::Element) -> Result<(), AdapterError>;

    fn read_value(&self, _element: &Self::Element) -> Option<ControlValue> {
        None
    }

    fn write_value(
        &mut self,
        _element: &Self::Element,
        _value: &ControlValue,
    ) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported("write_value"))
    }

    /// Nudge an adjustable control. Returns whether the value changed.
    fn step_value(
        &mut self,
        _element: &Self::Element,
        _direction: Direction,
    ) -> Result<bool, AdapterError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_name_prefers_automation_id() {
        let mut info = ElementInfo {
            name: "Save".into(),
            automation_id: Some("SaveButton".into()),
            ..ElementInfo::default()
        };
        assert_eq!(info.stable_name(), Some("SaveButton"));

        info.automation_id = Some(String::new());
        assert_eq!(info.stable_name(), Some("Save"));

        info.name.clear();
        assert_eq!(info.stable_name(), None);
    }

    #[test]
    fn only_numbers_are_adjustable() {
        assert!(ControlValue::Number(1.0).is_adjustable());
        assert!(!ControlValue::Toggle(true).is_adjustable());
        assert!(!ControlValue::Text("a".into()).is_adjustable());
    }
}
