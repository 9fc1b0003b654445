//! Geometry compiler
//!
//! Flattens a [`ShapeDefinition`]'s drawing programs into a GoJS geometry
//! path string and a list of text annotations.
//!
//! Path mini-language, one segment per geometric instruction:
//!
//! ```text
//! M x y | L x y | Q x1 y1 x y | C x1 y1 x2 y2 x y | A rx ry rot large sweep x y | z
//! ```
//!
//! The command letter is glued to its first number (`M0 10`). A filled
//! segment is wrapped as `F <segment> x`.

use std::fmt::{self, Write as _};

use tracing::{debug, span, trace, warn, Level};

use super::model::{
    FillKind, PathCommand, PathInstruction, ShapeDefinition, TextRun, TextStyle, FONT_BOLD,
    FONT_ITALIC,
};
use crate::core::format_number;

/// drawio default arc size for `roundrect`, percent of the shorter side
pub const DEFAULT_ARC_SIZE: f64 = 15.0;
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// One compiled path segment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    /// Path commands, no trailing whitespace
    pub body: String,
    pub fill: Option<FillKind>,
}

impl Segment {
    pub fn is_filled(&self) -> bool {
        self.fill.is_some()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_filled() {
            write!(f, "F {} x", self.body)
        } else {
            write!(f, "{}", self.body)
        }
    }
}

/// Text placed inside a shape
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// CSS font shorthand, e.g. `bold 16px Helvetica`
    pub font: String,
    pub color: Option<String>,
    pub angle: f64,
    pub align: Option<String>,
    pub valign: Option<String>,
}

/// Non-fatal problem met while compiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileWarning {
    UnrecognizedInstruction { tag: String },
    FillWithoutSegment { kind: FillKind },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileWarning::UnrecognizedInstruction { tag } => {
                write!(f, "unrecognized instruction <{}>", tag)
            }
            CompileWarning::FillWithoutSegment { kind } => {
                write!(f, "<{}> before any path segment", kind)
            }
        }
    }
}

/// Result of compiling a shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledShape {
    pub segments: Vec<Segment>,
    pub text: Vec<TextAnnotation>,
    pub warnings: Vec<CompileWarning>,
}

impl CompiledShape {
    /// GoJS geometry string: each non-empty segment followed by one space
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .filter(|s| !s.body.is_empty())
            .fold(String::new(), |mut out, segment| {
                let _ = write!(out, "{} ", segment);
                out
            })
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn has_geometry(&self) -> bool {
        self.segments.iter().any(|s| !s.body.is_empty())
    }
}

/// Text style accumulated before a `text` instruction
#[derive(Debug, Clone, Default)]
struct PendingText {
    family: Option<String>,
    size: Option<f64>,
    mask: u32,
    weight: Option<String>,
    variant: Option<String>,
    color: Option<String>,
}

impl PendingText {
    fn apply(&mut self, style: &TextStyle) {
        match style {
            TextStyle::Family(family) => self.family = Some(family.clone()),
            TextStyle::Size(size) => self.size = Some(*size),
            TextStyle::Style(mask) => self.mask = *mask,
            TextStyle::Weight(weight) => self.weight = Some(weight.clone()),
            TextStyle::Variant(variant) => self.variant = Some(variant.clone()),
            TextStyle::Color(color) => self.color = Some(color.clone()),
        }
    }

    fn font(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.mask & FONT_ITALIC != 0 {
            parts.push("italic".to_string());
        }
        if let Some(variant) = self.variant.as_deref().filter(|v| *v != "normal") {
            parts.push(variant.to_string());
        }
        match self.weight.as_deref() {
            Some(weight) if weight != "normal" => parts.push(weight.to_string()),
            Some(_) => {}
            None if self.mask & FONT_BOLD != 0 => parts.push("bold".to_string()),
            None => {}
        }
        parts.push(format!(
            "{}px",
            format_number(self.size.unwrap_or(DEFAULT_FONT_SIZE))
        ));
        parts.push(
            self.family
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
        );
        parts.join(" ")
    }

    fn finish(self, run: &TextRun) -> TextAnnotation {
        TextAnnotation {
            text: run.text.clone(),
            x: run.x,
            y: run.y,
            font: self.font(),
            color: self.color,
            angle: run.rotation.unwrap_or(0.0),
            align: run.align.clone(),
            valign: run.valign.clone(),
        }
    }
}

/// Compiles shape drawing programs
#[derive(Debug, Default)]
pub struct GeometryCompiler {
    compiled: CompiledShape,
    pending: PendingText,
}

impl GeometryCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile both layers of a shape, background first
    pub fn compile(mut self, shape: &ShapeDefinition) -> CompiledShape {
        let span = span!(
            Level::DEBUG,
            "compile_shape",
            shape = %shape.name,
            primitives = shape.geometric_count()
        );
        let _enter = span.enter();

        for instruction in shape.instructions() {
            self.instruction(instruction);
        }

        debug!(
            segments = self.compiled.segments.len(),
            text = self.compiled.text.len(),
            warnings = self.compiled.warnings.len(),
            "Compiled shape"
        );
        self.compiled
    }

    fn instruction(&mut self, instruction: &PathInstruction) {
        match instruction {
            PathInstruction::Path(commands) => self.path(commands),
            PathInstruction::Rect { x, y, w, h } => self.push(rect(*x, *y, *w, *h)),
            PathInstruction::RoundRect {
                x,
                y,
                w,
                h,
                arcsize,
            } => self.push(round_rect(
                *x,
                *y,
                *w,
                *h,
                arcsize.unwrap_or(DEFAULT_ARC_SIZE),
            )),
            PathInstruction::Ellipse { x, y, w, h } => self.push(ellipse(*x, *y, *w, *h)),
            PathInstruction::Fill(kind) => self.fill(*kind),
            PathInstruction::TextStyle(style) => self.pending.apply(style),
            PathInstruction::Text(run) => {
                let pending = std::mem::take(&mut self.pending);
                self.compiled.text.push(pending.finish(run));
            }
            PathInstruction::StyleAttribute(tag) => trace!(tag = %tag, "Skipping style tag"),
            PathInstruction::Unknown(tag) => self.unrecognized(tag),
        }
    }

    fn path(&mut self, commands: &[PathCommand]) {
        let mut body = String::new();
        for command in commands {
            match command {
                PathCommand::Move { x, y } => emit(&mut body, 'M', &[*x, *y]),
                PathCommand::Line { x, y } => emit(&mut body, 'L', &[*x, *y]),
                PathCommand::Quad { x1, y1, x2, y2 } => emit(&mut body, 'Q', &[*x1, *y1, *x2, *y2]),
                PathCommand::Curve {
                    x1,
                    y1,
                    x2,
                    y2,
                    x3,
                    y3,
                } => emit(&mut body, 'C', &[*x1, *y1, *x2, *y2, *x3, *y3]),
                PathCommand::Arc {
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => emit(
                    &mut body,
                    'A',
                    &[*rx, *ry, *rotation, flag(*large_arc), flag(*sweep), *x, *y],
                ),
                PathCommand::Close => close(&mut body),
                PathCommand::Unknown(tag) => self.unrecognized(tag),
            }
        }
        self.push(body);
    }

    fn push(&mut self, body: String) {
        self.compiled.segments.push(Segment {
            body: body.trim_end().to_string(),
            fill: None,
        });
    }

    fn fill(&mut self, kind: FillKind) {
        match self.compiled.segments.last_mut() {
            Some(segment) => segment.fill = Some(kind),
            None => {
                warn!(kind = %kind, "Fill directive before any path segment, ignoring");
                self.compiled
                    .warnings
                    .push(CompileWarning::FillWithoutSegment { kind });
            }
        }
    }

    fn unrecognized(&mut self, tag: &str) {
        warn!(tag = %tag, "Tag not recognized, skipping");
        self.compiled
            .warnings
            .push(CompileWarning::UnrecognizedInstruction {
                tag: tag.to_string(),
            });
    }
}

/// Compile a shape with a fresh compiler
pub fn compile(shape: &ShapeDefinition) -> CompiledShape {
    GeometryCompiler::new().compile(shape)
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn emit(body: &mut String, letter: char, values: &[f64]) {
    body.push(letter);
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            body.push(' ');
        }
        body.push_str(&format_number(*value));
    }
    body.push(' ');
}

fn close(body: &mut String) {
    body.push_str("z ");
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> String {
    let mut body = String::new();
    emit(&mut body, 'M', &[x, y]);
    emit(&mut body, 'L', &[x + w, y]);
    emit(&mut body, 'L', &[x + w, y + h]);
    emit(&mut body, 'L', &[x, y + h]);
    close(&mut body);
    body
}

fn round_rect(x: f64, y: f64, w: f64, h: f64, arcsize: f64) -> String {
    let r = w.min(h) * arcsize / 100.0;
    let corner = |body: &mut String, ex: f64, ey: f64| emit(body, 'A', &[r, r, 0.0, 0.0, 1.0, ex, ey]);

    let mut body = String::new();
    emit(&mut body, 'M', &[x + r, y]);
    emit(&mut body, 'L', &[x + w - r, y]);
    corner(&mut body, x + w, y + r);
    emit(&mut body, 'L', &[x + w, y + h - r]);
    corner(&mut body, x + w - r, y + h);
    emit(&mut body, 'L', &[x + r, y + h]);
    corner(&mut body, x, y + h - r);
    emit(&mut body, 'L', &[x, y + r]);
    corner(&mut body, x + r, y);
    close(&mut body);
    body
}

fn ellipse(x: f64, y: f64, w: f64, h: f64) -> String {
    let (rx, ry) = (w / 2.0, h / 2.0);
    let (cx, cy) = (x + rx, y + ry);
    let quarter = |body: &mut String, ex: f64, ey: f64| emit(body, 'A', &[rx, ry, 0.0, 0.0, 1.0, ex, ey]);

    let mut body = String::new();
    emit(&mut body, 'M', &[x + w, cy]);
    quarter(&mut body, cx, y + h);
    quarter(&mut body, x, cy);
    quarter(&mut body, cx, y);
    quarter(&mut body, x + w, cy);
    close(&mut body);
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::catalog::{builtin, ShapeName};
    use crate::shapes::model::TextRun;

    fn shape(foreground: Vec<PathInstruction>) -> ShapeDefinition {
        ShapeDefinition {
            name: "test".to_string(),
            width: 10.0,
            height: 10.0,
            foreground,
            ..Default::default()
        }
    }

    #[test]
    fn test_rect_then_fill() {
        let compiled = compile(&shape(vec![
            PathInstruction::Rect {
                x: 0.0,
                y: 0.0,
                w: 10.0,
                h: 20.0,
            },
            PathInstruction::Fill(FillKind::Fill),
        ]));
        assert_eq!(compiled.path(), "F M0 0 L10 0 L10 20 L0 20 z x ");
    }

    #[test]
    fn test_resistor_is_single_unfilled_path() {
        let compiled = compile(&builtin(ShapeName::Resistor2).unwrap());
        let path = compiled.path();
        assert!(path.starts_with("M0 10 L18 10 "), "got {}", path);
        assert!(!path.contains('F'));
        assert_eq!(path.matches('M').count(), 1);
        assert_eq!(compiled.segment_count(), 1);
        assert!(compiled.warnings.is_empty());
    }

    #[test]
    fn test_ellipse_is_closed_loop() {
        let compiled = compile(&builtin(ShapeName::Ellipse).unwrap());
        assert_eq!(
            compiled.path(),
            "F M40 20 A20 20 0 0 1 20 40 A20 20 0 0 1 0 20 A20 20 0 0 1 20 0 A20 20 0 0 1 40 20 z x "
        );
    }

    #[test]
    fn test_close_ends_segment() {
        let compiled = compile(&shape(vec![PathInstruction::Path(vec![
            PathCommand::Move { x: 0.0, y: 0.0 },
            PathCommand::Line { x: 1.5, y: 2.0 },
            PathCommand::Close,
        ])]));
        assert_eq!(compiled.segments[0].body, "M0 0 L1.5 2 z");
    }

    #[test]
    fn test_curve_quad_and_arc() {
        let compiled = compile(&shape(vec![PathInstruction::Path(vec![
            PathCommand::Move { x: 0.0, y: 0.0 },
            PathCommand::Quad {
                x1: 1.0,
                y1: 2.0,
                x2: 3.0,
                y2: 4.0,
            },
            PathCommand::Curve {
                x1: 1.0,
                y1: 2.0,
                x2: 3.0,
                y2: 4.0,
                x3: 5.0,
                y3: 6.0,
            },
            PathCommand::Arc {
                rx: 5.0,
                ry: 5.0,
                rotation: 0.0,
                large_arc: true,
                sweep: false,
                x: 10.0,
                y: 0.0,
            },
        ])]));
        assert_eq!(compiled.path(), "M0 0 Q1 2 3 4 C1 2 3 4 5 6 A5 5 0 1 0 10 0 ");
    }

    #[test]
    fn test_round_rect_corners() {
        let compiled = compile(&shape(vec![PathInstruction::RoundRect {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 20.0,
            arcsize: None,
        }]));
        assert_eq!(
            compiled.path(),
            "M3 0 L97 0 A3 3 0 0 1 100 3 L100 17 A3 3 0 0 1 97 20 L3 20 A3 3 0 0 1 0 17 L0 3 A3 3 0 0 1 3 0 z "
        );
    }

    #[test]
    fn test_fill_before_segment_is_reported() {
        let compiled = compile(&shape(vec![
            PathInstruction::Fill(FillKind::FillStroke),
            PathInstruction::Rect {
                x: 0.0,
                y: 0.0,
                w: 1.0,
                h: 1.0,
            },
        ]));
        assert_eq!(
            compiled.warnings,
            vec![CompileWarning::FillWithoutSegment {
                kind: FillKind::FillStroke
            }]
        );
        assert!(!compiled.segments[0].is_filled());
    }

    #[test]
    fn test_unknown_tag_leaves_segments_intact() {
        let compiled = compile(&shape(vec![
            PathInstruction::Rect {
                x: 0.0,
                y: 0.0,
                w: 1.0,
                h: 1.0,
            },
            PathInstruction::Unknown("image".to_string()),
            PathInstruction::Fill(FillKind::Fill),
        ]));
        assert_eq!(compiled.path(), "F M0 0 L1 0 L1 1 L0 1 z x ");
        assert_eq!(
            compiled.warnings[0].to_string(),
            "unrecognized instruction <image>"
        );
    }

    #[test]
    fn test_text_styles_reset_after_text() {
        let run = |text: &str| {
            PathInstruction::Text(TextRun {
                text: text.to_string(),
                x: 5.0,
                y: 5.0,
                ..Default::default()
            })
        };
        let compiled = compile(&shape(vec![
            PathInstruction::TextStyle(TextStyle::Size(16.0)),
            PathInstruction::TextStyle(TextStyle::Style(FONT_BOLD | FONT_ITALIC)),
            PathInstruction::TextStyle(TextStyle::Color("#ff0000".to_string())),
            run("first"),
            run("second"),
        ]));
        assert_eq!(compiled.text.len(), 2);
        assert_eq!(compiled.text[0].font, "italic bold 16px Helvetica");
        assert_eq!(compiled.text[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(compiled.text[1].font, "11px Helvetica");
        assert_eq!(compiled.text[1].color, None);
        assert!(!compiled.has_geometry());
    }

    #[test]
    fn test_voltage_source_text() {
        let compiled = compile(&builtin(ShapeName::VoltageSource).unwrap());
        assert_eq!(compiled.text.len(), 1);
        assert_eq!(compiled.text[0].text, "V");
        assert_eq!(compiled.text[0].font, "bold 16px Helvetica");
        assert_eq!(compiled.text[0].align.as_deref(), Some("center"));
    }
}
