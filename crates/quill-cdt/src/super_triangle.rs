use glam::Vec2;
use quill_core::math::Rect;

/// How far the super-triangle reaches beyond the bounds, in units of the larger side.
const MARGIN: f32 = 20.0;

/// Counter-clockwise triangle that strictly contains every point.
///
/// Returns `None` for an empty input or non-finite coordinates.
pub fn super_triangle(points: impl IntoIterator<Item = Vec2>) -> Option<[Vec2; 3]> {
    let bounds = Rect::from_points(points)?;
    if !bounds.min.is_finite() || !bounds.max.is_finite() {
        return None;
    }

    let size = bounds.size();
    let d = size.x.max(size.y).max(1.0);
    let c = bounds.center();
    Some([
        Vec2::new(c.x - MARGIN * d, c.y - d),
        Vec2::new(c.x + MARGIN * d, c.y - d),
        Vec2::new(c.x, c.y + MARGIN * d),
    ])
}
