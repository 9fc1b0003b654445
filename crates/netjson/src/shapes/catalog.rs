//! Built-in shape catalog
//!
//! Shapes referenced by name from the GUNNS drawio library. Markup is parsed
//! once on first use and shared.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, error};

use super::markup::parse_shape;
use super::model::ShapeDefinition;

/// Name of a built-in catalog shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeName {
    Ellipse,
    Resistor2,
    Capacitor1,
    VoltageSource,
    CurrentSource,
    Valve,
    Ground,
    Reference,
    Spotter,
}

impl ShapeName {
    pub fn all() -> &'static [ShapeName] {
        &[
            ShapeName::Ellipse,
            ShapeName::Resistor2,
            ShapeName::Capacitor1,
            ShapeName::VoltageSource,
            ShapeName::CurrentSource,
            ShapeName::Valve,
            ShapeName::Ground,
            ShapeName::Reference,
            ShapeName::Spotter,
        ]
    }

    /// Name as it appears in the last segment of a `shape=` value
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeName::Ellipse => "ellipse",
            ShapeName::Resistor2 => "resistor_2",
            ShapeName::Capacitor1 => "capacitor_1",
            ShapeName::VoltageSource => "voltage_source",
            ShapeName::CurrentSource => "current_source",
            ShapeName::Valve => "valve",
            ShapeName::Ground => "ground",
            ShapeName::Reference => "reference",
            ShapeName::Spotter => "spotter",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|shape| shape.as_str() == name.trim())
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShapeName::Ellipse => "Circular network node",
            ShapeName::Resistor2 => "Zig-zag conductor link",
            ShapeName::Capacitor1 => "Parallel plate capacitor link",
            ShapeName::VoltageSource => "Voltage source link",
            ShapeName::CurrentSource => "Current source link",
            ShapeName::Valve => "Bow-tie valve link",
            ShapeName::Ground => "Ground symbol",
            ShapeName::Reference => "Reference node symbol",
            ShapeName::Spotter => "Spotter badge",
        }
    }

    /// Embedded shape markup
    pub fn markup(&self) -> &'static str {
        match self {
            ShapeName::Ellipse => ELLIPSE,
            ShapeName::Resistor2 => RESISTOR_2,
            ShapeName::Capacitor1 => CAPACITOR_1,
            ShapeName::VoltageSource => VOLTAGE_SOURCE,
            ShapeName::CurrentSource => CURRENT_SOURCE,
            ShapeName::Valve => VALVE,
            ShapeName::Ground => GROUND,
            ShapeName::Reference => REFERENCE,
            ShapeName::Spotter => SPOTTER,
        }
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static CATALOG: OnceLock<HashMap<ShapeName, Arc<ShapeDefinition>>> = OnceLock::new();

fn catalog() -> &'static HashMap<ShapeName, Arc<ShapeDefinition>> {
    CATALOG.get_or_init(|| {
        let mut shapes = HashMap::new();
        for name in ShapeName::all() {
            match parse_shape(name.markup()) {
                Ok(shape) => {
                    shapes.insert(*name, Arc::new(shape));
                }
                Err(e) => error!(shape = %name, error = %e, "Built-in shape failed to parse"),
            }
        }
        debug!(count = shapes.len(), "Built-in shape catalog loaded");
        shapes
    })
}

/// Parsed definition of a built-in shape
pub fn builtin(name: ShapeName) -> Option<Arc<ShapeDefinition>> {
    catalog().get(&name).cloned()
}

const ELLIPSE: &str = r#"<shape name="ellipse" w="40" h="40" aspect="fixed" strokewidth="inherit">
  <connections>
    <constraint x="0.5" y="0" perimeter="0" name="N"/>
    <constraint x="1" y="0.5" perimeter="0" name="E"/>
    <constraint x="0.5" y="1" perimeter="0" name="S"/>
    <constraint x="0" y="0.5" perimeter="0" name="W"/>
  </connections>
  <background>
    <ellipse x="0" y="0" w="40" h="40"/>
  </background>
  <foreground>
    <fillstroke/>
  </foreground>
</shape>"#;

const RESISTOR_2: &str = r#"<shape name="resistor_2" w="100" h="20" aspect="variable" strokewidth="inherit">
  <connections>
    <constraint x="0" y="0.5" perimeter="0" name="in"/>
    <constraint x="1" y="0.5" perimeter="0" name="out"/>
  </connections>
  <background>
    <path>
      <move x="0" y="10"/>
      <line x="18" y="10"/>
      <line x="22" y="0"/>
      <line x="30" y="20"/>
      <line x="38" y="0"/>
      <line x="46" y="20"/>
      <line x="54" y="0"/>
      <line x="62" y="20"/>
      <line x="70" y="0"/>
      <line x="78" y="20"/>
      <line x="82" y="10"/>
      <line x="100" y="10"/>
    </path>
  </background>
  <foreground>
    <stroke/>
  </foreground>
</shape>"#;

const CAPACITOR_1: &str = r#"<shape name="capacitor_1" w="60" h="40" aspect="variable" strokewidth="inherit">
  <connections>
    <constraint x="0" y="0.5" perimeter="0" name="in"/>
    <constraint x="1" y="0.5" perimeter="0" name="out"/>
  </connections>
  <background>
    <path>
      <move x="0" y="20"/>
      <line x="26" y="20"/>
      <move x="26" y="0"/>
      <line x="26" y="40"/>
      <move x="34" y="0"/>
      <line x="34" y="40"/>
      <move x="34" y="20"/>
      <line x="60" y="20"/>
    </path>
  </background>
  <foreground>
    <stroke/>
  </foreground>
</shape>"#;

const VOLTAGE_SOURCE: &str = r#"<shape name="voltage_source" w="60" h="60" aspect="fixed" strokewidth="inherit">
  <connections>
    <constraint x="0.5" y="0" perimeter="0" name="+"/>
    <constraint x="0.5" y="1" perimeter="0" name="-"/>
  </connections>
  <background>
    <ellipse x="0" y="0" w="60" h="60"/>
  </background>
  <foreground>
    <fillstroke/>
    <fontsize size="16"/>
    <fontstyle style="1"/>
    <text str="V" x="30" y="30" align="center" valign="middle"/>
  </foreground>
</shape>"#;

const CURRENT_SOURCE: &str = r#"<shape name="current_source" w="60" h="60" aspect="fixed" strokewidth="inherit">
  <connections>
    <constraint x="0.5" y="1" perimeter="0" name="in"/>
    <constraint x="0.5" y="0" perimeter="0" name="out"/>
  </connections>
  <background>
    <ellipse x="0" y="0" w="60" h="60"/>
  </background>
  <foreground>
    <fillstroke/>
    <path>
      <move x="30" y="48"/>
      <line x="30" y="14"/>
    </path>
    <stroke/>
    <path>
      <move x="24" y="22"/>
      <line x="30" y="12"/>
      <line x="36" y="22"/>
      <close/>
    </path>
    <fill/>
  </foreground>
</shape>"#;

const VALVE: &str = r#"<shape name="valve" w="60" h="40" aspect="variable" strokewidth="inherit">
  <connections>
    <constraint x="0" y="0.5" perimeter="0" name="in"/>
    <constraint x="1" y="0.5" perimeter="0" name="out"/>
  </connections>
  <foreground>
    <path>
      <move x="0" y="0"/>
      <line x="30" y="20"/>
      <line x="0" y="40"/>
      <close/>
    </path>
    <fillstroke/>
    <path>
      <move x="60" y="0"/>
      <line x="30" y="20"/>
      <line x="60" y="40"/>
      <close/>
    </path>
    <fillstroke/>
  </foreground>
</shape>"#;

const GROUND: &str = r#"<shape name="ground" w="40" h="30" aspect="fixed" strokewidth="inherit">
  <connections>
    <constraint x="0.5" y="0" perimeter="0" name="N"/>
  </connections>
  <foreground>
    <path>
      <move x="20" y="0"/>
      <line x="20" y="10"/>
      <move x="0" y="10"/>
      <line x="40" y="10"/>
      <move x="8" y="20"/>
      <line x="32" y="20"/>
      <move x="16" y="30"/>
      <line x="24" y="30"/>
    </path>
    <stroke/>
  </foreground>
</shape>"#;

const REFERENCE: &str = r#"<shape name="reference" w="40" h="30" aspect="fixed" strokewidth="inherit">
  <connections>
    <constraint x="0.5" y="0" perimeter="0" name="N"/>
  </connections>
  <foreground>
    <path>
      <move x="20" y="0"/>
      <line x="20" y="10"/>
    </path>
    <stroke/>
    <path>
      <move x="0" y="10"/>
      <line x="40" y="10"/>
      <line x="20" y="30"/>
      <close/>
    </path>
    <fillstroke/>
  </foreground>
</shape>"#;

const SPOTTER: &str = r#"<shape name="spotter" w="80" h="30" aspect="variable" strokewidth="inherit">
  <connections/>
  <background>
    <roundrect x="0" y="0" w="80" h="30" arcsize="20"/>
  </background>
  <foreground>
    <fillstroke/>
    <fontsize size="11"/>
    <text str="S" x="40" y="15" align="center" valign="middle"/>
  </foreground>
</shape>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_parses() {
        for name in ShapeName::all() {
            let shape = builtin(*name).unwrap_or_else(|| panic!("{} missing", name));
            assert_eq!(shape.name, name.as_str());
            assert!(shape.width > 0.0 && shape.height > 0.0, "{} has no size", name);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for name in ShapeName::all() {
            assert_eq!(ShapeName::from_name(name.as_str()), Some(*name));
        }
        assert_eq!(ShapeName::from_name("resistor_3"), None);
    }

    #[test]
    fn test_catalog_is_shared() {
        let a = builtin(ShapeName::Valve).unwrap();
        let b = builtin(ShapeName::Valve).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_ground_has_north_port() {
        let ground = builtin(ShapeName::Ground).unwrap();
        assert_eq!(ground.port_names(), vec!["N"]);
        assert!(builtin(ShapeName::Spotter).unwrap().connections.is_empty());
    }
}
