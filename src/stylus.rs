// MIT/Apache2 License

use crate::{
    geometry::{point, Angle, Point, Rect, RectExt, Transform, Vector},
    Error, Result,
};
use ordered_float::NotNan;

/// Smallest nib dimension accepted, in device independent pixels.
pub const MIN_STYLUS_DIMENSION: f64 = 0.00003779527559055120;
/// Largest nib dimension accepted, in device independent pixels.
pub const MAX_STYLUS_DIMENSION: f64 = 162329.4614173230;

// (sqrt(2) - 1) * 4 / 3
const ARC_AS_BEZIER: f64 = 0.5522847498307933984;

/// The outline of the stylus tip.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StylusTip {
    Rectangle,
    Ellipse,
}

impl Default for StylusTip {
    #[inline]
    fn default() -> Self {
        StylusTip::Ellipse
    }
}

/// The cross-section of the stylus tip that is swept along a stroke.
///
/// A shape is either an ellipse, described by its width, height and
/// rotation, or a convex polygon whose vertices run clockwise (with y
/// pointing down). Both may carry an additional transform.
#[derive(Debug, Clone, PartialEq)]
pub struct StylusShape {
    tip: StylusTip,
    width: f64,
    height: f64,
    rotation: f64,
    vertices: Vec<Vector>,
    transform: Transform,
}

#[inline]
fn checked_dimension(name: &'static str, value: f64) -> Result<f64> {
    let value = NotNan::new(value)
        .map_err(|_| Error::InvalidDimension { name, value })?
        .into_inner();
    if !(MIN_STYLUS_DIMENSION..=MAX_STYLUS_DIMENSION).contains(&value) {
        return Err(Error::InvalidDimension { name, value });
    }
    Ok(value)
}

impl StylusShape {
    /// Create a shape for the given tip. `rotation` is in degrees, clockwise.
    pub fn new(tip: StylusTip, width: f64, height: f64, rotation: f64) -> Result<Self> {
        let width = checked_dimension("width", width)?;
        let height = checked_dimension("height", height)?;
        if !rotation.is_finite() {
            return Err(Error::InvalidDimension {
                name: "rotation",
                value: rotation,
            });
        }

        let rotation = if rotation == 0.0 { 0.0 } else { rotation % 360.0 };
        let vertices = match tip {
            StylusTip::Rectangle => rectangle_vertices(width, height, rotation),
            StylusTip::Ellipse => Vec::new(),
        };

        Ok(Self {
            tip,
            width,
            height,
            rotation,
            vertices,
            transform: Transform::identity(),
        })
    }

    #[inline]
    pub fn ellipse(width: f64, height: f64) -> Result<Self> {
        Self::new(StylusTip::Ellipse, width, height, 0.0)
    }

    #[inline]
    pub fn rectangle(width: f64, height: f64) -> Result<Self> {
        Self::new(StylusTip::Rectangle, width, height, 0.0)
    }

    /// Create a polygonal shape from convex vertices around the origin.
    /// Counter-clockwise vertex lists are reversed.
    pub fn polygon<I: IntoIterator<Item = Point>>(vertices: I) -> Result<Self> {
        let mut vertices: Vec<Vector> = vertices.into_iter().map(|p| p.to_vector()).collect();
        if vertices.len() < 3 {
            return Err(Error::DegeneratePolygon(vertices.len()));
        }
        if let Some(v) = vertices.iter().find(|v| !v.x.is_finite() || !v.y.is_finite()) {
            let value = if v.x.is_finite() { v.y } else { v.x };
            return Err(Error::InvalidDimension {
                name: "vertex",
                value,
            });
        }

        fix_counter_clockwise(&mut vertices);
        let bounds = vertices
            .iter()
            .fold(Rect::void(), |bounds, v| bounds.merge_point(v.to_point()));

        Ok(Self {
            tip: StylusTip::Rectangle,
            width: bounds.width(),
            height: bounds.height(),
            rotation: 0.0,
            vertices,
            transform: Transform::identity(),
        })
    }

    /// Apply an extra transform to the shape.
    #[inline]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    pub fn tip(&self) -> StylusTip {
        self.tip
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rotation in degrees.
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn is_polygon(&self) -> bool {
        !self.vertices.is_empty()
    }

    #[inline]
    pub fn is_ellipse(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounds of the untransformed shape.
    pub fn bounding_box(&self) -> Rect {
        if self.is_polygon() {
            self.vertices
                .iter()
                .fold(Rect::void(), |bounds, v| bounds.merge_point(v.to_point()))
        } else {
            Rect::new(
                point(-(self.width * 0.5), -(self.height * 0.5)),
                point(self.width * 0.5, self.height * 0.5),
            )
        }
    }

    /// The clockwise outline of the transformed shape. Ellipses are
    /// represented by the control points of four cubic Bezier curves, each
    /// curve being three points with the last point of the list as the start.
    pub fn vertices_as_vectors(&self) -> Vec<Vector> {
        if self.is_polygon() {
            let identity = self.transform == Transform::identity();
            let mut vertices: Vec<Vector> = self
                .vertices
                .iter()
                .map(|v| {
                    if identity {
                        *v
                    } else {
                        self.transform.transform_point(v.to_point()).to_vector()
                    }
                })
                .collect();
            if !identity {
                fix_counter_clockwise(&mut vertices);
            }
            vertices
        } else {
            self.bezier_control_points()
                .into_iter()
                .map(|p| p.to_vector())
                .collect()
        }
    }

    fn bezier_control_points(&self) -> Vec<Point> {
        let radius_x = self.width / 2.0;
        let radius_y = self.height / 2.0;
        let magic_x = radius_x * ARC_AS_BEZIER;
        let magic_y = radius_y * ARC_AS_BEZIER;

        let mut control_points = vec![
            point(-radius_x, -magic_y),
            point(-magic_x, -radius_y),
            point(0.0, -radius_y),
            point(magic_x, -radius_y),
            point(radius_x, -magic_y),
            point(radius_x, 0.0),
            point(radius_x, magic_y),
            point(magic_x, radius_y),
            point(0.0, radius_y),
            point(-magic_x, radius_y),
            point(-radius_x, magic_y),
            point(-radius_x, 0.0),
        ];

        let mut transform = Transform::identity();
        if self.rotation != 0.0 {
            transform = Transform::rotation(Angle::degrees(self.rotation));
        }
        if self.transform != Transform::identity() {
            transform = transform.then(&self.transform);
        }
        if transform != Transform::identity() {
            for p in control_points.iter_mut() {
                *p = transform.transform_point(*p);
            }
        }

        control_points
    }
}

fn rectangle_vertices(width: f64, height: f64, rotation: f64) -> Vec<Vector> {
    let top_left = Vector::new(-(width * 0.5), -(height * 0.5));
    let mut vertices = vec![
        top_left,
        top_left + Vector::new(width, 0.0),
        top_left + Vector::new(width, height),
        top_left + Vector::new(0.0, height),
    ];

    if !crate::util::is_zero(rotation) {
        let rotate = Transform::rotation(Angle::degrees(rotation));
        for p in vertices.iter_mut() {
            *p = rotate.transform_vector(*p);
        }
    }

    vertices
}

/// Reverse a vertex list whose every corner turns counter-clockwise.
fn fix_counter_clockwise(vertices: &mut [Vector]) {
    let n = vertices.len();
    let mut counter_clockwise = 0;
    let mut prev = vertices[n - 1];

    for i in 0..n {
        let vertex = vertices[i];
        let next = vertices[(i + 1) % n];
        if (vertex - prev).cross(next - vertex) < 0.0 {
            counter_clockwise += 1;
        }
        prev = vertex;
    }

    if counter_clockwise == n {
        vertices.reverse();
    }
}

/// A stylus sample: a position and the pen pressure in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StylusPoint {
    position: Point,
    pressure: f32,
}

impl StylusPoint {
    /// Pressure reported by devices that do not sense it.
    pub const DEFAULT_PRESSURE: f32 = 0.5;

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self::at(point(x, y))
    }

    #[inline]
    pub fn at(position: Point) -> Self {
        Self {
            position,
            pressure: Self::DEFAULT_PRESSURE,
        }
    }

    /// Create a sample with the given pressure. This function returns `None`
    /// if the pressure is NaN or outside of `[0, 1]`.
    #[inline]
    pub fn with_pressure(position: Point, pressure: f32) -> Option<Self> {
        if pressure.is_nan() || !(0.0..=1.0).contains(&pressure) {
            None
        } else {
            Some(Self { position, pressure })
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn pressure(&self) -> f32 {
        self.pressure
    }
}

impl From<Point> for StylusPoint {
    #[inline]
    fn from(position: Point) -> Self {
        Self::at(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            StylusShape::ellipse(f64::NAN, 2.0),
            Err(Error::InvalidDimension { name: "width", .. })
        ));
        assert!(StylusShape::rectangle(2.0, 0.0).is_err());
        assert!(StylusShape::new(StylusTip::Ellipse, 2.0, 2.0, f64::INFINITY).is_err());
        assert!(StylusShape::polygon(vec![point(0.0, 0.0), point(1.0, 0.0)]).is_err());
    }

    #[test]
    fn rectangle_is_clockwise() {
        let shape = StylusShape::rectangle(8.0, 4.0).unwrap();
        let v = shape.vertices_as_vectors();
        assert_eq!(
            v,
            vec![
                Vector::new(-4.0, -2.0),
                Vector::new(4.0, -2.0),
                Vector::new(4.0, 2.0),
                Vector::new(-4.0, 2.0),
            ]
        );
        assert!(shape.is_polygon());
        assert_eq!(
            shape.bounding_box(),
            Rect::new(point(-4.0, -2.0), point(4.0, 2.0))
        );
    }

    #[test]
    fn rotation_wraps() {
        let shape = StylusShape::new(StylusTip::Rectangle, 2.0, 2.0, 450.0).unwrap();
        assert_eq!(shape.rotation(), 90.0);
        let v = shape.vertices_as_vectors();
        assert_relative_eq!(v[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(v[0].y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn mirrored_polygon_stays_clockwise() {
        let shape = StylusShape::rectangle(2.0, 2.0)
            .unwrap()
            .with_transform(Transform::scale(-1.0, 1.0));
        let v = shape.vertices_as_vectors();
        for i in 0..4 {
            let prev = v[(i + 3) % 4];
            let next = v[(i + 1) % 4];
            assert!((v[i] - prev).cross(next - v[i]) > 0.0);
        }
    }

    #[test]
    fn counter_clockwise_polygon_is_reversed() {
        let shape = StylusShape::polygon(vec![
            point(0.0, -2.0),
            point(-2.0, 2.0),
            point(2.0, 2.0),
        ])
        .unwrap();
        let v = shape.vertices_as_vectors();
        assert_eq!(v[0], Vector::new(2.0, 2.0));
        assert_eq!(shape.width(), 4.0);
        assert_eq!(shape.height(), 4.0);
    }

    #[test]
    fn ellipse_control_points() {
        let shape = StylusShape::ellipse(10.0, 6.0).unwrap();
        let v = shape.vertices_as_vectors();
        assert_eq!(v.len(), 12);
        assert_eq!(v[11], Vector::new(-5.0, 0.0));
        assert_eq!(v[2], Vector::new(0.0, -3.0));
        assert_eq!(v[5], Vector::new(5.0, 0.0));
    }

    #[test]
    fn stylus_point_pressure() {
        assert!(StylusPoint::with_pressure(point(0.0, 0.0), 1.5).is_none());
        assert!(StylusPoint::with_pressure(point(0.0, 0.0), f32::NAN).is_none());
        assert_eq!(StylusPoint::new(1.0, 2.0).pressure(), 0.5);
    }
}
