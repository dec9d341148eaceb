//! Registry of component definitions.

use super::Component;
use kurbo::{Point, Vec2};
use std::collections::BTreeMap;

/// Template a [`Component`] is instantiated from.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    pub name: String,
    pub width: f64,
    pub height: f64,
    /// SVG markup drawn into the component box.
    pub glyph: String,
    /// Terminal names and offsets from the top-left corner.
    pub terminals: Vec<(String, Point)>,
    pub terminals_follow_transform: bool,
}

impl ComponentDefinition {
    pub fn new(name: impl Into<String>, width: f64, height: f64, glyph: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            glyph: glyph.into(),
            terminals: Vec::new(),
            terminals_follow_transform: true,
        }
    }

    pub fn terminal(mut self, name: impl Into<String>, x: f64, y: f64) -> Self {
        self.terminals.push((name.into(), Point::new(x, y)));
        self
    }

    /// Create a component with its top-left corner at `position`.
    pub fn instantiate(&self, position: Point) -> Component {
        let mut component =
            Component::new(&self.name, position, self.width, self.height, &self.glyph);
        component.set_terminals_follow_transform(self.terminals_follow_transform);
        for (name, offset) in &self.terminals {
            component = component.with_terminal(name, *offset);
        }
        component
    }
}

fn glyph(width: u32, height: u32, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" fill="none" stroke="black" stroke-width="2">{body}</svg>"#
    )
}

/// Named component definitions.
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    definitions: BTreeMap<String, ComponentDefinition>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the standard circuit symbols.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let defs = [
            ComponentDefinition::new(
                "terminal",
                20.0,
                20.0,
                glyph(20, 20, r#"<circle cx="10" cy="10" r="6"/>"#),
            )
            .terminal("node", 10.0, 10.0),
            ComponentDefinition::new(
                "resistor",
                60.0,
                20.0,
                glyph(
                    60,
                    20,
                    r#"<path d="M0 10 H12 L16 3 L22 17 L28 3 L34 17 L40 3 L44 10 H60"/>"#,
                ),
            )
            .terminal("a", 0.0, 10.0)
            .terminal("b", 60.0, 10.0),
            ComponentDefinition::new(
                "capacitor",
                40.0,
                30.0,
                glyph(40, 30, r#"<path d="M0 15 H17 M17 3 V27 M23 3 V27 M23 15 H40"/>"#),
            )
            .terminal("a", 0.0, 15.0)
            .terminal("b", 40.0, 15.0),
            ComponentDefinition::new(
                "inductor",
                60.0,
                20.0,
                glyph(
                    60,
                    20,
                    r#"<path d="M0 14 H10 A5 5 0 0 1 20 14 A5 5 0 0 1 30 14 A5 5 0 0 1 40 14 A5 5 0 0 1 50 14 H60"/>"#,
                ),
            )
            .terminal("a", 0.0, 14.0)
            .terminal("b", 60.0, 14.0),
            ComponentDefinition::new(
                "voltage-source",
                40.0,
                60.0,
                glyph(
                    40,
                    60,
                    r#"<path d="M20 0 V12 M20 48 V60 M20 20 V28 M16 24 H24 M16 38 H24"/><circle cx="20" cy="30" r="18"/>"#,
                ),
            )
            .terminal("+", 20.0, 0.0)
            .terminal("-", 20.0, 60.0),
            ComponentDefinition::new(
                "ground",
                30.0,
                25.0,
                glyph(30, 25, r#"<path d="M15 0 V12 M3 12 H27 M8 18 H22 M12 24 H18"/>"#),
            )
            .terminal("gnd", 15.0, 0.0),
            ComponentDefinition::new(
                "switch",
                60.0,
                20.0,
                glyph(
                    60,
                    20,
                    r#"<path d="M0 15 H15 L42 3 M45 15 H60"/><circle cx="15" cy="15" r="2"/><circle cx="45" cy="15" r="2"/>"#,
                ),
            )
            .terminal("a", 0.0, 15.0)
            .terminal("b", 60.0, 15.0),
            ComponentDefinition::new(
                "led",
                60.0,
                30.0,
                glyph(
                    60,
                    30,
                    r#"<path d="M0 15 H20 M40 15 H60 M20 5 V25 L40 15 Z M40 5 V25 M44 6 L52 0 M48 10 L56 4"/>"#,
                ),
            )
            .terminal("anode", 0.0, 15.0)
            .terminal("cathode", 60.0, 15.0),
            ComponentDefinition::new(
                "and-gate",
                60.0,
                40.0,
                glyph(
                    60,
                    40,
                    r#"<path d="M0 10 H15 M0 30 H15 M15 2 H30 A18 18 0 0 1 30 38 H15 Z M48 20 H60"/>"#,
                ),
            )
            .terminal("in1", 0.0, 10.0)
            .terminal("in2", 0.0, 30.0)
            .terminal("out", 60.0, 20.0),
            ComponentDefinition::new(
                "or-gate",
                60.0,
                40.0,
                glyph(
                    60,
                    40,
                    r#"<path d="M0 10 H18 M0 30 H18 M12 2 Q24 20 12 38 Q40 38 48 20 Q40 2 12 2 Z M48 20 H60"/>"#,
                ),
            )
            .terminal("in1", 0.0, 10.0)
            .terminal("in2", 0.0, 30.0)
            .terminal("out", 60.0, 20.0),
            ComponentDefinition::new(
                "not-gate",
                60.0,
                30.0,
                glyph(
                    60,
                    30,
                    r#"<path d="M0 15 H15 M15 3 V27 L40 15 Z M48 15 H60"/><circle cx="44" cy="15" r="4"/>"#,
                ),
            )
            .terminal("in", 0.0, 15.0)
            .terminal("out", 60.0, 15.0),
        ];
        for def in defs {
            catalog.register(def);
        }
        catalog
    }

    /// Add a definition, replacing any previous one with the same name.
    /// Definitions with a non-positive size are refused.
    pub fn register(&mut self, definition: ComponentDefinition) -> bool {
        let valid_size = |v: f64| v.is_finite() && v > 0.0;
        if !valid_size(definition.width) || !valid_size(definition.height) {
            log::warn!(
                "refusing component definition {} with size {}x{}",
                definition.name,
                definition.width,
                definition.height
            );
            return false;
        }
        if self.definitions.contains_key(&definition.name) {
            log::debug!("replacing component definition {}", definition.name);
        }
        self.definitions.insert(definition.name.clone(), definition);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDefinition> {
        self.definitions.get(name)
    }

    /// Definition names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Create a component with its top-left corner at `position`.
    pub fn instantiate(&self, name: &str, position: Point) -> Option<Component> {
        self.get(name).map(|def| def.instantiate(position))
    }

    /// Create a component centered on `center`.
    pub fn instantiate_centered(&self, name: &str, center: Point) -> Option<Component> {
        self.get(name).map(|def| {
            def.instantiate(center - Vec2::new(def.width / 2.0, def.height / 2.0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeTrait;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = ComponentCatalog::builtin();
        for name in [
            "terminal",
            "resistor",
            "capacitor",
            "inductor",
            "voltage-source",
            "ground",
            "switch",
            "led",
            "and-gate",
            "or-gate",
            "not-gate",
        ] {
            let def = catalog.get(name).unwrap();
            assert!(!def.terminals.is_empty(), "{name} has terminals");
            assert!(def.glyph.starts_with("<svg"));
        }
    }

    #[test]
    fn test_instantiate_centered() {
        let catalog = ComponentCatalog::builtin();
        let r = catalog.instantiate_centered("resistor", Point::new(100.0, 100.0)).unwrap();
        assert_eq!(r.position(), Point::new(70.0, 90.0));
        assert_eq!(r.terminals().len(), 2);
        assert_eq!(r.definition(), "resistor");
        assert!(catalog.instantiate("flux-capacitor", Point::ZERO).is_none());
    }

    #[test]
    fn test_register_rejects_bad_size() {
        let mut catalog = ComponentCatalog::new();
        assert!(!catalog.register(ComponentDefinition::new("bad", 0.0, 10.0, "")));
        assert!(catalog.register(ComponentDefinition::new("ok", 10.0, 10.0, "")));
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["ok"]);
    }
}
