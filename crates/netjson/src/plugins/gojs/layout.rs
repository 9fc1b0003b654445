//! Layout mapping
//!
//! drawio geometry is top-left anchored and rotates about the cell centre;
//! GoJS positions nodes by centre and rotates the unrotated (natural) size.

use tracing::warn;

use crate::core::{format_number, CardinalDirection, DiagramElement, Style};

/// Position, size and angle of one node record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRecord {
    /// `"cx cy"`
    pub pos: String,
    /// Natural `"w h"`
    pub size: String,
    pub angle: String,
}

/// Maps diagram element geometry onto the layout schema
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutMapper;

impl LayoutMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map_element(&self, element: &DiagramElement) -> LayoutRecord {
        let style = Style::parse(&element.style).unwrap_or_else(|e| {
            warn!(element_id = %element.id, error = %e, "Unreadable element style, using defaults");
            Style::default()
        });
        self.map_with_style(element, &style)
    }

    pub fn map_with_style(&self, element: &DiagramElement, style: &Style) -> LayoutRecord {
        let direction = CardinalDirection::from_style(style.get("direction"));
        let geometry = &element.geometry;

        let (cx, cy) = geometry.center();
        let (width, height) = if direction.is_quarter_turn() {
            (geometry.height, geometry.width)
        } else {
            (geometry.width, geometry.height)
        };

        LayoutRecord {
            pos: format!("{} {}", format_number(cx), format_number(cy)),
            size: format!("{} {}", format_number(width), format_number(height)),
            angle: format_number(resolve_angle(style)),
        }
    }
}

/// `rotation` plus the `direction` offset, sign dropped
pub fn resolve_angle(style: &Style) -> f64 {
    let rotation = style.get_f64("rotation").unwrap_or(0.0);
    let direction = CardinalDirection::from_style(style.get("direction"));
    let angle = rotation + direction.offset_degrees();
    if angle < 0.0 {
        -angle
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ElementKind, Geometry};

    fn element(style: &str, geometry: Geometry) -> DiagramElement {
        DiagramElement::with_style("e", "E", ElementKind::Link, geometry, style)
    }

    #[test]
    fn test_centre_position() {
        let record = LayoutMapper::new().map_element(&element(
            "ellipse;",
            Geometry::new(100.0, 100.0, 40.0, 40.0),
        ));
        assert_eq!(record.pos, "120 120");
        assert_eq!(record.size, "40 40");
        assert_eq!(record.angle, "0");
    }

    #[test]
    fn test_direction_swaps_natural_size() {
        let record = LayoutMapper::new().map_element(&element(
            "shape=resistor_2;direction=south;",
            Geometry::new(0.0, 0.0, 20.0, 100.0),
        ));
        assert_eq!(record.pos, "10 50");
        assert_eq!(record.size, "100 20");
        assert_eq!(record.angle, "90");
    }

    #[test]
    fn test_rotation_plus_direction() {
        let style = Style::parse("rotation=30;direction=west").unwrap();
        assert_eq!(resolve_angle(&style), 210.0);
    }

    #[test]
    fn test_negative_angle_is_negated() {
        let record = LayoutMapper::new().map_element(&element(
            "rotation=-45",
            Geometry::new(0.0, 0.0, 10.0, 10.0),
        ));
        assert_eq!(record.angle, "45");
        // Free rotation keeps the stored extent
        assert_eq!(record.size, "10 10");
    }

    #[test]
    fn test_fractional_values() {
        let record = LayoutMapper::new().map_element(&element(
            "rotation=12.5",
            Geometry::new(0.5, 0.0, 3.0, 5.0),
        ));
        assert_eq!(record.pos, "2 2.5");
        assert_eq!(record.angle, "12.5");
    }

    #[test]
    fn test_bad_style_uses_defaults() {
        let record =
            LayoutMapper::new().map_element(&element("=broken", Geometry::new(0.0, 0.0, 2.0, 2.0)));
        assert_eq!(record.angle, "0");
        assert_eq!(record.pos, "1 1");
    }
}
