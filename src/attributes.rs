// MIT/Apache2 License

use crate::{
    geometry::Transform,
    stylus::{StylusShape, StylusTip},
    Result,
};

/// The geometric drawing settings of a stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingAttributes {
    pub stylus_tip: StylusTip,
    pub width: f64,
    pub height: f64,
    pub stylus_tip_transform: Transform,
    /// Draw every node at its natural size, regardless of pen pressure.
    pub ignore_pressure: bool,
}

impl DrawingAttributes {
    pub const DEFAULT_WIDTH: f64 = 2.0031496062992127;
    pub const DEFAULT_HEIGHT: f64 = 2.0031496062992127;

    #[inline]
    pub fn with_stylus_tip(mut self, stylus_tip: StylusTip) -> Self {
        self.stylus_tip = stylus_tip;
        self
    }

    #[inline]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    pub fn with_stylus_tip_transform(mut self, transform: Transform) -> Self {
        self.stylus_tip_transform = transform;
        self
    }

    #[inline]
    pub fn with_ignore_pressure(mut self, ignore_pressure: bool) -> Self {
        self.ignore_pressure = ignore_pressure;
        self
    }

    /// Build the nib these attributes describe.
    pub fn stylus_shape(&self) -> Result<StylusShape> {
        let shape = StylusShape::new(self.stylus_tip, self.width, self.height, 0.0)?;
        Ok(shape.with_transform(self.stylus_tip_transform))
    }
}

impl Default for DrawingAttributes {
    #[inline]
    fn default() -> Self {
        Self {
            stylus_tip: StylusTip::Ellipse,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            stylus_tip_transform: Transform::identity(),
            ignore_pressure: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_nib_is_small_circle() {
        let attributes = DrawingAttributes::default();
        let shape = attributes.stylus_shape().unwrap();
        assert!(shape.is_ellipse());
        assert_eq!(shape.width(), DrawingAttributes::DEFAULT_WIDTH);
    }

    #[test]
    fn builders() {
        let attributes = DrawingAttributes::default()
            .with_stylus_tip(StylusTip::Rectangle)
            .with_size(4.0, 2.0)
            .with_ignore_pressure(true);
        let shape = attributes.stylus_shape().unwrap();
        assert!(shape.is_polygon());
        assert_eq!(shape.height(), 2.0);
        assert!(attributes.ignore_pressure);

        assert!(DrawingAttributes::default()
            .with_size(-1.0, 2.0)
            .stylus_shape()
            .is_err());
    }
}
