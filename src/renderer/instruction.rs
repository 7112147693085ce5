// MIT/Apache2 License

use crate::geometry::{Angle, Point, Rect, RectExt, Size};
use lyon_geom::{ArcFlags, SvgArc};
use lyon_path::Path;

/// One step of drawing a stroke outline. Every figure starts with
/// `BeginFigure` and is filled with the non-zero rule.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Instruction {
    BeginFigure(Point),
    LineTo(Point),
    /// An elliptical arc from the current point, as in SVG.
    ArcTo {
        to: Point,
        radii: Size,
        /// Rotation of the ellipse, in degrees.
        rotation: f64,
        large_arc: bool,
        /// Whether the arc runs clockwise.
        sweep: bool,
    },
    CubicTo {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Close,
}

/// The outline of a stroke, ready to be filled.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeGeometry {
    pub instructions: Vec<Instruction>,
    /// The bounds of every node of the stroke, if they were asked for.
    pub bounds: Rect,
}

impl Default for StrokeGeometry {
    #[inline]
    fn default() -> Self {
        Self {
            instructions: Vec::new(),
            bounds: Rect::void(),
        }
    }
}

impl StrokeGeometry {
    /// The number of figures in the outline.
    #[inline]
    pub fn figure_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, Instruction::BeginFigure(_)))
            .count()
    }

    /// Convert the outline into a path. Arcs become cubic curves.
    pub fn to_path(&self) -> Path {
        let mut builder = Path::builder();
        let mut open = false;
        let mut current = Point::origin();

        for instruction in &self.instructions {
            match *instruction {
                Instruction::BeginFigure(at) => {
                    if open {
                        builder.end(false);
                    }
                    builder.begin(at.cast());
                    open = true;
                    current = at;
                }
                Instruction::LineTo(to) if open => {
                    builder.line_to(to.cast());
                    current = to;
                }
                Instruction::ArcTo {
                    to,
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                } if open => {
                    let arc = SvgArc {
                        from: current,
                        to,
                        radii: radii.to_vector(),
                        x_rotation: Angle::degrees(rotation),
                        flags: ArcFlags { large_arc, sweep },
                    };

                    if arc.is_straight_line() {
                        builder.line_to(to.cast());
                    } else {
                        arc.to_arc().for_each_cubic_bezier(&mut |curve| {
                            builder.cubic_bezier_to(curve.ctrl1.cast(), curve.ctrl2.cast(), curve.to.cast());
                        });
                    }
                    current = to;
                }
                Instruction::CubicTo { ctrl1, ctrl2, to } if open => {
                    builder.cubic_bezier_to(ctrl1.cast(), ctrl2.cast(), to.cast());
                    current = to;
                }
                Instruction::Close if open => {
                    builder.close();
                    open = false;
                }
                _ => log::warn!("Skipping {:?} outside of a figure", instruction),
            }
        }

        if open {
            builder.end(false);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;
    use lyon_path::PathEvent;

    #[test]
    fn path_has_every_figure() {
        let geometry = StrokeGeometry {
            instructions: vec![
                Instruction::BeginFigure(point(0.0, 0.0)),
                Instruction::LineTo(point(10.0, 0.0)),
                Instruction::ArcTo {
                    to: point(10.0, 10.0),
                    radii: Size::new(5.0, 5.0),
                    rotation: 0.0,
                    large_arc: false,
                    sweep: true,
                },
                Instruction::LineTo(point(0.0, 10.0)),
                Instruction::Close,
                Instruction::BeginFigure(point(20.0, 0.0)),
                Instruction::CubicTo {
                    ctrl1: point(25.0, 0.0),
                    ctrl2: point(30.0, 5.0),
                    to: point(30.0, 10.0),
                },
                Instruction::Close,
            ],
            bounds: Rect::void(),
        };
        assert_eq!(geometry.figure_count(), 2);

        let events: Vec<PathEvent> = geometry.to_path().iter().collect();
        let begins = events.iter().filter(|e| matches!(e, PathEvent::Begin { .. })).count();
        let closed = events
            .iter()
            .filter(|e| matches!(e, PathEvent::End { close: true, .. }))
            .count();
        assert_eq!(begins, 2);
        assert_eq!(closed, 2);
        assert!(events.iter().any(|e| matches!(e, PathEvent::Cubic { .. })));
    }

    #[test]
    fn unclosed_figure_is_ended() {
        let geometry = StrokeGeometry {
            instructions: vec![
                Instruction::LineTo(point(1.0, 1.0)),
                Instruction::BeginFigure(point(0.0, 0.0)),
                Instruction::LineTo(point(1.0, 0.0)),
            ],
            ..Default::default()
        };

        let events: Vec<PathEvent> = geometry.to_path().iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], PathEvent::End { close: false, .. }));
    }
}
