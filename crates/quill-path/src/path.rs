//! Source paths.
//!
//! A source path is what callers build: a sequence of drawing commands that may
//! contain cubic curves. It is converted into a [`QuadPath`](crate::QuadPath)
//! before any geometric processing.

use crate::FillRule;
use glam::Vec2;
use quill_core::math::Rect;

/// Handle length for approximating a quarter circle with one cubic.
const KAPPA: f32 = 0.552_284_8;

/// A command in a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Move to a new position without drawing.
    MoveTo(Vec2),
    /// Draw a line to a position.
    LineTo(Vec2),
    /// Draw a quadratic Bezier curve.
    QuadTo {
        /// Control point
        control: Vec2,
        /// End point
        to: Vec2,
    },
    /// Draw a cubic Bezier curve.
    CubicTo {
        /// First control point
        control1: Vec2,
        /// Second control point
        control2: Vec2,
        /// End point
        to: Vec2,
    },
    /// Close the current sub-path by drawing a line to the start.
    Close,
}

/// A 2D path consisting of drawing commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
    fill_rule: FillRule,
}

impl Path {
    /// Create a new empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path from a list of commands.
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self {
            commands,
            fill_rule: FillRule::default(),
        }
    }

    /// Get the commands in this path.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    /// Builder-style variant of [`Path::set_fill_rule`].
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Bounding box of all points, control points included.
    pub fn bounds(&self) -> Option<Rect> {
        let points = self.commands.iter().flat_map(|cmd| {
            let pts: [Option<Vec2>; 3] = match *cmd {
                PathCommand::MoveTo(to) | PathCommand::LineTo(to) => [Some(to), None, None],
                PathCommand::QuadTo { control, to } => [Some(control), Some(to), None],
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                } => [Some(control1), Some(control2), Some(to)],
                PathCommand::Close => [None, None, None],
            };
            pts.into_iter().flatten()
        });

        Rect::from_points(points).filter(|r| r.min.is_finite() && r.max.is_finite())
    }
}

/// Builder for constructing paths.
#[derive(Debug, Default)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
    fill_rule: FillRule,
    current_pos: Vec2,
    subpath_start: Vec2,
}

impl PathBuilder {
    /// Create a new path builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fill rule of the built path.
    pub fn fill_rule(&mut self, fill_rule: FillRule) -> &mut Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Move to a new position without drawing.
    pub fn move_to(&mut self, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(to));
        self.current_pos = to;
        self.subpath_start = to;
        self
    }

    /// Draw a line to a position.
    pub fn line_to(&mut self, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(to));
        self.current_pos = to;
        self
    }

    /// Draw a horizontal line to x coordinate.
    pub fn horizontal_line_to(&mut self, x: f32) -> &mut Self {
        let to = Vec2::new(x, self.current_pos.y);
        self.line_to(to)
    }

    /// Draw a vertical line to y coordinate.
    pub fn vertical_line_to(&mut self, y: f32) -> &mut Self {
        let to = Vec2::new(self.current_pos.x, y);
        self.line_to(to)
    }

    /// Draw a quadratic Bezier curve.
    pub fn quad_to(&mut self, control: Vec2, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { control, to });
        self.current_pos = to;
        self
    }

    /// Draw a cubic Bezier curve.
    pub fn cubic_to(&mut self, control1: Vec2, control2: Vec2, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            to,
        });
        self.current_pos = to;
        self
    }

    /// Close the current sub-path.
    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self.current_pos = self.subpath_start;
        self
    }

    /// Add a rectangle to the path.
    pub fn rect(&mut self, position: Vec2, size: Vec2) -> &mut Self {
        self.move_to(position);
        self.line_to(position + Vec2::new(size.x, 0.0));
        self.line_to(position + size);
        self.line_to(position + Vec2::new(0.0, size.y));
        self.close()
    }

    /// Add a rounded rectangle to the path. Corners are cubic quarter ellipses.
    pub fn rounded_rect(&mut self, position: Vec2, size: Vec2, radius: f32) -> &mut Self {
        let r = radius.min(size.x / 2.0).min(size.y / 2.0).max(0.0);
        let k = r * KAPPA;

        self.move_to(position + Vec2::new(r, 0.0));

        self.line_to(position + Vec2::new(size.x - r, 0.0));
        self.cubic_to(
            position + Vec2::new(size.x - r + k, 0.0),
            position + Vec2::new(size.x, r - k),
            position + Vec2::new(size.x, r),
        );

        self.line_to(position + Vec2::new(size.x, size.y - r));
        self.cubic_to(
            position + Vec2::new(size.x, size.y - r + k),
            position + Vec2::new(size.x - r + k, size.y),
            position + Vec2::new(size.x - r, size.y),
        );

        self.line_to(position + Vec2::new(r, size.y));
        self.cubic_to(
            position + Vec2::new(r - k, size.y),
            position + Vec2::new(0.0, size.y - r + k),
            position + Vec2::new(0.0, size.y - r),
        );

        self.line_to(position + Vec2::new(0.0, r));
        self.cubic_to(
            position + Vec2::new(0.0, r - k),
            position + Vec2::new(r - k, 0.0),
            position + Vec2::new(r, 0.0),
        );

        self.close()
    }

    /// Add a circle to the path.
    pub fn circle(&mut self, center: Vec2, radius: f32) -> &mut Self {
        self.ellipse(center, Vec2::splat(radius))
    }

    /// Add an ellipse to the path, as four cubic quadrants.
    pub fn ellipse(&mut self, center: Vec2, radii: Vec2) -> &mut Self {
        let k = radii * KAPPA;
        let (rx, ry) = (radii.x, radii.y);

        // Start at rightmost point
        self.move_to(center + Vec2::new(rx, 0.0));

        self.cubic_to(
            center + Vec2::new(rx, k.y),
            center + Vec2::new(k.x, ry),
            center + Vec2::new(0.0, ry),
        );
        self.cubic_to(
            center + Vec2::new(-k.x, ry),
            center + Vec2::new(-rx, k.y),
            center + Vec2::new(-rx, 0.0),
        );
        self.cubic_to(
            center + Vec2::new(-rx, -k.y),
            center + Vec2::new(-k.x, -ry),
            center + Vec2::new(0.0, -ry),
        );
        self.cubic_to(
            center + Vec2::new(k.x, -ry),
            center + Vec2::new(rx, -k.y),
            center + Vec2::new(rx, 0.0),
        );

        self.close()
    }

    /// Add a polygon to the path.
    pub fn polygon(&mut self, points: &[Vec2]) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };

        self.move_to(*first);
        for point in rest {
            self.line_to(*point);
        }
        self.close()
    }

    /// Get the current position.
    pub fn current_pos(&self) -> Vec2 {
        self.current_pos
    }

    /// Build the path.
    pub fn build(self) -> Path {
        Path {
            commands: self.commands,
            fill_rule: self.fill_rule,
        }
    }
}
