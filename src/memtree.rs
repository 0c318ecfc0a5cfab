//! In-memory element tree.
//!
//! Backs the tests, the matcher bench and the `padnav-sim` binary. Trees can
//! be built in code with [`ElementSpec`] or loaded from a YAML
//! [`TreeFixture`].

use crate::adapter::{ControlValue, ElementInfo, ElementTree, SurfaceId};
use crate::error::AdapterError;
use crate::geom::{Direction, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle into a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemElementId(u32);

impl fmt::Display for MemElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Properties of an element to add.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub name: String,
    pub type_name: String,
    pub automation_id: Option<String>,
    pub content: Option<String>,
    pub bounds: Option<Rect>,
    pub visible: bool,
    pub enabled: bool,
    pub focusable: bool,
    pub interactive: bool,
    pub expanded: Option<bool>,
    pub value: Option<ControlValue>,
    /// Renders on its own surface (popup, dropdown).
    pub own_surface: bool,
}

impl ElementSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            automation_id: None,
            content: None,
            bounds: None,
            visible: true,
            enabled: true,
            focusable: false,
            interactive: false,
            expanded: None,
            value: None,
            own_surface: false,
        }
    }

    pub fn automation_id(mut self, id: impl Into<String>) -> Self {
        self.automation_id = Some(id.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.bounds = Some(Rect::new(x, y, width, height));
        self
    }

    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn value(mut self, value: ControlValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn popup(mut self) -> Self {
        self.own_surface = true;
        self
    }
}

#[derive(Debug, Clone)]
struct MemElement {
    spec: ElementSpec,
    parent: Option<MemElementId>,
    children: Vec<MemElementId>,
    surface: SurfaceId,
    alive: bool,
    fail_describe: bool,
    fail_children: bool,
}

/// [`ElementTree`] over plain owned data.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    elements: Vec<MemElement>,
    next_surface: SurfaceId,
    step: f64,
    invocations: Vec<MemElementId>,
    closes: Vec<MemElementId>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            next_surface: 1,
            step: 1.0,
            invocations: Vec::new(),
            closes: Vec::new(),
        }
    }

    /// Amount `step_value` adds or subtracts.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Add a top-level element on a fresh surface.
    pub fn add_root(&mut self, spec: ElementSpec) -> MemElementId {
        let surface = self.fresh_surface();
        self.push(spec, None, surface)
    }

    /// Add `spec` as the last child of `parent`.
    ///
    /// The child shares the parent's surface unless the spec asks for its
    /// own.
    pub fn add_child(&mut self, parent: MemElementId, spec: ElementSpec) -> MemElementId {
        let surface = if spec.own_surface {
            self.fresh_surface()
        } else {
            self.element(parent).map(|e| e.surface).unwrap_or(0)
        };
        let id = self.push(spec, Some(parent), surface);
        if let Some(parent) = self.element_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    /// First live element with this name or automation id.
    pub fn find(&self, name: &str) -> Option<MemElementId> {
        self.elements
            .iter()
            .enumerate()
            .find(|(_, e)| {
                e.alive
                    && (e.spec.name == name || e.spec.automation_id.as_deref() == Some(name))
            })
            .map(|(index, _)| MemElementId(index as u32))
    }

    pub fn spec(&self, id: MemElementId) -> Option<&ElementSpec> {
        self.element(id).map(|e| &e.spec)
    }

    pub fn set_expanded(&mut self, id: MemElementId, expanded: bool) {
        if let Some(e) = self.element_mut(id) {
            e.spec.expanded = Some(expanded);
        }
    }

    pub fn set_visible(&mut self, id: MemElementId, visible: bool) {
        if let Some(e) = self.element_mut(id) {
            e.spec.visible = visible;
        }
    }

    pub fn set_bounds(&mut self, id: MemElementId, bounds: Rect) {
        if let Some(e) = self.element_mut(id) {
            e.spec.bounds = Some(bounds);
        }
    }

    pub fn set_value(&mut self, id: MemElementId, value: ControlValue) {
        if let Some(e) = self.element_mut(id) {
            e.spec.value = Some(value);
        }
    }

    pub fn value(&self, id: MemElementId) -> Option<&ControlValue> {
        self.element(id).and_then(|e| e.spec.value.as_ref())
    }

    /// Destroy an element and its subtree.
    pub fn kill(&mut self, id: MemElementId) {
        let parent = self.element(id).and_then(|e| e.parent);
        if let Some(parent) = parent.and_then(|p| self.element_mut(p)) {
            parent.children.retain(|child| *child != id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(e) = self.element_mut(current) {
                e.alive = false;
                stack.extend(e.children.iter().copied());
            }
        }
    }

    /// Make `describe` fail with a toolkit error.
    pub fn fail_describe(&mut self, id: MemElementId, fail: bool) {
        if let Some(e) = self.element_mut(id) {
            e.fail_describe = fail;
        }
    }

    /// Make `children` fail with a toolkit error.
    pub fn fail_children(&mut self, id: MemElementId, fail: bool) {
        if let Some(e) = self.element_mut(id) {
            e.fail_children = fail;
        }
    }

    /// Elements invoked so far, in order.
    pub fn invocations(&self) -> &[MemElementId] {
        &self.invocations
    }

    /// Elements closed so far, in order.
    pub fn closes(&self) -> &[MemElementId] {
        &self.closes
    }

    /// Build a tree from a fixture. Returns the tree and its roots.
    pub fn from_fixture(fixture: &TreeFixture) -> (Self, Vec<MemElementId>) {
        let mut tree = Self::new();
        let roots = fixture
            .roots
            .iter()
            .map(|root| {
                let id = tree.add_root(root.to_spec());
                tree.add_fixture_children(id, &root.children);
                id
            })
            .collect();
        (tree, roots)
    }

    fn add_fixture_children(&mut self, parent: MemElementId, children: &[FixtureElement]) {
        for child in children {
            let id = self.add_child(parent, child.to_spec());
            self.add_fixture_children(id, &child.children);
        }
    }

    fn fresh_surface(&mut self) -> SurfaceId {
        let surface = self.next_surface;
        self.next_surface += 1;
        surface
    }

    fn push(
        &mut self,
        spec: ElementSpec,
        parent: Option<MemElementId>,
        surface: SurfaceId,
    ) -> MemElementId {
        let id = MemElementId(self.elements.len() as u32);
        self.elements.push(MemElement {
            spec,
            parent,
            children: Vec::new(),
            surface,
            alive: true,
            fail_describe: false,
            fail_children: false,
        });
        id
    }

    fn element(&self, id: MemElementId) -> Option<&MemElement> {
        self.elements.get(id.0 as usize)
    }

    fn element_mut(&mut self, id: MemElementId) -> Option<&mut MemElement> {
        self.elements.get_mut(id.0 as usize)
    }

    fn live(&self, id: MemElementId) -> Result<&MemElement, AdapterError> {
        self.element(id)
            .filter(|e| e.alive)
            .ok_or(AdapterError::ElementGone)
    }

    fn live_mut(&mut self, id: MemElementId) -> Result<&mut MemElement, AdapterError> {
        self.element_mut(id)
            .filter(|e| e.alive)
            .ok_or(AdapterError::ElementGone)
    }
}

impl ElementTree for MemoryTree {
    type Element = MemElementId;

    fn is_alive(&self, element: &MemElementId) -> bool {
        self.live(*element).is_ok()
    }

    fn describe(&self, element: &MemElementId) -> Result<ElementInfo, AdapterError> {
        let e = self.live(*element)?;
        if e.fail_describe {
            return Err(AdapterError::Toolkit(format!("describe failed for {element}")));
        }
        let spec = &e.spec;
        Ok(ElementInfo {
            name: spec.name.clone(),
            type_name: spec.type_name.clone(),
            automation_id: spec.automation_id.clone(),
            content: spec.content.clone(),
            visible: spec.visible,
            loaded: true,
            focusable: spec.focusable,
            enabled: spec.enabled,
            interactive: spec.interactive,
            expanded: spec.expanded,
            surface: e.surface,
        })
    }

    fn children(&self, element: &MemElementId) -> Result<Vec<MemElementId>, AdapterError> {
        let e = self.live(*element)?;
        if e.fail_children {
            return Err(AdapterError::Toolkit(format!("children failed for {element}")));
        }
        Ok(e.children.clone())
    }

    fn bounds(&self, element: &MemElementId) -> Option<Rect> {
        self.live(*element).ok().and_then(|e| e.spec.bounds)
    }

    fn invoke(&mut self, element: &MemElementId) -> Result<(), AdapterError> {
        let e = self.live_mut(*element)?;
        if let Some(expanded) = e.spec.expanded.as_mut() {
            *expanded = !*expanded;
        }
        if let Some(ControlValue::Toggle(on)) = e.spec.value.as_mut() {
            *on = !*on;
        }
        self.invocations.push(*element);
        Ok(())
    }

    fn close(&mut self, element: &MemElementId) -> Result<(), AdapterError> {
        let e = self.live_mut(*element)?;
        match e.spec.expanded {
            Some(true) => e.spec.expanded = Some(false),
            _ => e.spec.visible = false,
        }
        self.closes.push(*element);
        Ok(())
    }

    fn read_value(&self, element: &MemElementId) -> Option<ControlValue> {
        self.live(*element).ok().and_then(|e| e.spec.value.clone())
    }

    fn write_value(
        &mut self,
        element: &MemElementId,
        value: &ControlValue,
    ) -> Result<(), AdapterError> {
        let e = self.live_mut(*element)?;
        e.spec.value = Some(value.clone());
        Ok(())
    }

    fn step_value(
        &mut self,
        element: &MemElementId,
        direction: Direction,
    ) -> Result<bool, AdapterError> {
        let step = self.step;
        let e = self.live_mut(*element)?;
        match e.spec.value.as_mut() {
            Some(ControlValue::Number(value)) => {
                match direction {
                    Direction::Up | Direction::Right => *value += step,
                    Direction::Down | Direction::Left => *value -= step,
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// YAML description of a tree.
///
/// ```yaml
/// roots:
///   - name: Main
///     type: Window
///     bounds: { x: 0, y: 0, width: 800, height: 600 }
///     children:
///       - { name: Save, type: Button, bounds: { x: 10, y: 10, width: 80, height: 24 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeFixture {
    #[serde(default)]
    pub roots: Vec<FixtureElement>,
}

impl TreeFixture {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

fn yes() -> bool {
    true
}

/// One element of a [`TreeFixture`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureElement {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub automation_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub bounds: Option<Rect>,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default = "yes")]
    pub enabled: bool,
    #[serde(default)]
    pub focusable: bool,
    #[serde(default)]
    pub interactive: bool,
    #[serde(default)]
    pub expanded: Option<bool>,
    #[serde(default)]
    pub value: Option<ControlValue>,
    #[serde(default)]
    pub popup: bool,
    #[serde(default)]
    pub children: Vec<FixtureElement>,
}

impl FixtureElement {
    fn to_spec(&self) -> ElementSpec {
        ElementSpec {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            automation_id: self.automation_id.clone(),
            content: self.content.clone(),
            bounds: self.bounds,
            visible: self.visible,
            enabled: self.enabled,
            focusable: self.focusable,
            interactive: self.interactive,
            expanded: self.expanded,
            value: self.value.clone(),
            own_surface: self.popup,
        }
    }
}
