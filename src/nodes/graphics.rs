use crate::errors::ValidationError;
use crate::geometry::{Affine, Outline, Point};
use crate::kicad::layer::PcbLayer;
use crate::kicad::syntax::{SyntaxArgument, SyntaxItem};
use crate::tree::{Element, NodeKind};

fn width_item(width: f64) -> SyntaxItem {
    SyntaxItem::from_single_argument("width", SyntaxArgument::number(width))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub layer: PcbLayer,
    pub width: f64,
}

impl Line {
    pub fn new(start: Point, end: Point, layer: PcbLayer, width: f64) -> Self {
        Self { start, end, layer, width }
    }
}

impl Element for Line {
    fn kind_name(&self) -> &'static str {
        "Line"
    }

    fn tree_text(&self) -> String {
        format!("Line(start={}, end={}, layer={}, width={})", self.start, self.end, self.layer, self.width)
    }

    fn own_outline(&self) -> Option<Outline> {
        Some(Outline::new(self.start, self.end))
    }

    fn render(&self, frame: &Affine) -> Vec<SyntaxItem> {
        let start = frame.apply(self.start);
        let end = frame.apply(self.end);
        vec![SyntaxItem::new("fp_line")
            .with_child(SyntaxItem::xy("start", start.x, start.y))
            .with_child(SyntaxItem::xy("end", end.x, end.y))
            .with_child(self.layer.serialize())
            .with_child(width_item(self.width))]
    }
}

/// Open polyline, drawn as one line per pair of consecutive points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonLine {
    points: Vec<Point>,
    pub layer: PcbLayer,
    pub width: f64,
}

impl PolygonLine {
    pub fn new(points: Vec<Point>, layer: PcbLayer, width: f64) -> Result<Self, ValidationError> {
        if points.len() < 2 {
            return Err(ValidationError::out_of_range("PolygonLine", "points", "at least 2 points are required"));
        }
        Ok(Self { points, layer, width })
    }
}

impl Element for PolygonLine {
    fn kind_name(&self) -> &'static str {
        "PolygonLine"
    }

    fn tree_text(&self) -> String {
        format!("PolygonLine(points={}, layer={}, width={})", self.points.len(), self.layer, self.width)
    }

    fn synthesize_children(&self) -> Vec<NodeKind> {
        self.points
            .windows(2)
            .map(|pair| Line::new(pair[0], pair[1], self.layer, self.width).into())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectLine {
    pub start: Point,
    pub end: Point,
    pub layer: PcbLayer,
    pub width: f64,
    /// Grows the rectangle outwards on every side.
    pub offset: f64,
}

impl RectLine {
    pub fn new(start: Point, end: Point, layer: PcbLayer, width: f64) -> Self {
        Self { start, end, layer, width, offset: 0.0 }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn from_outline(outline: &Outline, layer: PcbLayer, width: f64) -> Self {
        Self::new(outline.min, outline.max, layer, width)
    }

    pub fn corners(&self) -> [Point; 4] {
        Outline::new(self.start, self.end).expand(self.offset).corners()
    }
}

impl Element for RectLine {
    fn kind_name(&self) -> &'static str {
        "RectLine"
    }

    fn tree_text(&self) -> String {
        format!("RectLine(start={}, end={}, layer={}, width={})", self.start, self.end, self.layer, self.width)
    }

    fn synthesize_children(&self) -> Vec<NodeKind> {
        let corners = self.corners();
        (0..4)
            .map(|i| Line::new(corners[i], corners[(i + 1) % 4], self.layer, self.width).into())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point,
    radius: f64,
    pub layer: PcbLayer,
    pub width: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64, layer: PcbLayer, width: f64) -> Result<Self, ValidationError> {
        if !(radius > 0.0) {
            return Err(ValidationError::out_of_range("Circle", "radius", "radius must be positive"));
        }
        Ok(Self { center, radius, layer, width })
    }
}

impl Element for Circle {
    fn kind_name(&self) -> &'static str {
        "Circle"
    }

    fn tree_text(&self) -> String {
        format!("Circle(center={}, radius={}, layer={}, width={})", self.center, self.radius, self.layer, self.width)
    }

    fn own_outline(&self) -> Option<Outline> {
        Some(Outline::centered(self.center, Point::splat(self.radius * 2.0)))
    }

    fn render(&self, frame: &Affine) -> Vec<SyntaxItem> {
        let center = frame.apply(self.center);
        let end = frame.apply(self.center + Point::new(self.radius, 0.0));
        vec![SyntaxItem::new("fp_circle")
            .with_child(SyntaxItem::xy("center", center.x, center.y))
            .with_child(SyntaxItem::xy("end", end.x, end.y))
            .with_child(self.layer.serialize())
            .with_child(width_item(self.width))]
    }
}

/// Circular arc starting at `start` and sweeping `angle` degrees around `center`. Positive
/// angles run clockwise on screen, as `fp_arc` expects.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub start: Point,
    pub angle: f64,
    pub layer: PcbLayer,
    pub width: f64,
}

impl Arc {
    pub fn new(center: Point, start: Point, angle: f64, layer: PcbLayer, width: f64) -> Self {
        Self { center, start, angle, layer, width }
    }

    pub fn end(&self) -> Point {
        self.start.rotate(-self.angle, self.center)
    }

    fn covers_direction(&self, start_deg: f64, direction_deg: f64) -> bool {
        if self.angle.abs() >= 360.0 {
            return true;
        }
        let swept = if self.angle >= 0.0 {
            (direction_deg - start_deg).rem_euclid(360.0)
        } else {
            (start_deg - direction_deg).rem_euclid(360.0)
        };
        swept <= self.angle.abs()
    }
}

impl Element for Arc {
    fn kind_name(&self) -> &'static str {
        "Arc"
    }

    fn tree_text(&self) -> String {
        format!("Arc(center={}, start={}, angle={}, layer={}, width={})", self.center, self.start, self.angle, self.layer, self.width)
    }

    fn own_outline(&self) -> Option<Outline> {
        let radius = self.center.distance_to(self.start);
        let delta = self.start - self.center;
        // y points down, so this angle grows clockwise on screen like the sweep
        let start_deg = delta.y.atan2(delta.x).to_degrees();
        let extremes = [
            (0.0, Point::new(radius, 0.0)),
            (90.0, Point::new(0.0, radius)),
            (180.0, Point::new(-radius, 0.0)),
            (270.0, Point::new(0.0, -radius)),
        ];
        let points = [self.start, self.end()].into_iter().chain(
            extremes
                .iter()
                .filter(|(direction, _)| self.covers_direction(start_deg, *direction))
                .map(|(_, offset)| self.center + *offset),
        );
        Outline::from_points(points)
    }

    fn render(&self, frame: &Affine) -> Vec<SyntaxItem> {
        let center = frame.apply(self.center);
        let start = frame.apply(self.start);
        let angle = if frame.is_mirrored() { -self.angle } else { self.angle };
        vec![SyntaxItem::new("fp_arc")
            .with_child(SyntaxItem::xy("start", center.x, center.y))
            .with_child(SyntaxItem::xy("end", start.x, start.y))
            .with_child(SyntaxItem::from_single_argument("angle", SyntaxArgument::number(angle)))
            .with_child(self.layer.serialize())
            .with_child(width_item(self.width))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;
    use crate::tree::Node;
    use approx::assert_abs_diff_eq;

    fn assert_outline_eq(actual: Outline, expected: Outline) {
        assert_abs_diff_eq!(actual.min.x, expected.min.x, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.min.y, expected.min.y, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.max.x, expected.max.x, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.max.y, expected.max.y, epsilon = 1e-9);
    }

    #[test]
    fn polygon_line_needs_two_points() {
        let err = PolygonLine::new(vec![Point::ORIGIN], PcbLayer::FSilkS, 0.12).unwrap_err();
        assert_eq!(err.field(), "points");
    }

    #[test]
    fn polygon_line_children_are_virtual() -> anyhow::Result<()> {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let node = Node::new(PolygonLine::new(points, PcbLayer::FSilkS, 0.12)?);
        assert!(node.children().is_empty());
        let virtual_children = node.virtual_children();
        assert_eq!(virtual_children.len(), 2);
        assert!(virtual_children.iter().all(|c| c.parent().is_some_and(|p| p.ptr_eq(&node))));
        assert_eq!(
            node.render_list()?,
            vec![
                "(fp_line (start 0 0) (end 1 0) (layer F.SilkS) (width 0.12))".to_string(),
                "(fp_line (start 1 0) (end 1 1) (layer F.SilkS) (width 0.12))".to_string(),
            ]
        );
        assert_eq!(node.calculate_outline(None)?, Outline::new(Point::ORIGIN, Point::new(1.0, 1.0)));
        Ok(())
    }

    #[test]
    fn rect_line_is_four_closed_lines() -> anyhow::Result<()> {
        let node = Node::new(RectLine::new(Point::new(-1.0, -2.0), Point::new(1.0, 2.0), PcbLayer::FFab, 0.1).with_offset(0.5));
        let fragments = node.render_list()?;
        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[0], "(fp_line (start -1.5 -2.5) (end 1.5 -2.5) (layer F.Fab) (width 0.1))");
        assert!(fragments[3].ends_with("(end -1.5 -2.5) (layer F.Fab) (width 0.1))"));
        assert_eq!(node.calculate_outline(None)?, Outline::new(Point::new(-1.5, -2.5), Point::new(1.5, 2.5)));
        assert!(node.render_tree()?.lines().count() == 1);
        assert_eq!(node.virtual_render_tree()?.lines().count(), 5);
        Ok(())
    }

    #[test]
    fn circle_rejects_non_positive_radius() {
        assert_eq!(Circle::new(Point::ORIGIN, 0.0, PcbLayer::FSilkS, 0.12).unwrap_err().field(), "radius");
        assert_eq!(Circle::new(Point::ORIGIN, f64::NAN, PcbLayer::FSilkS, 0.12).unwrap_err().field(), "radius");
    }

    #[test]
    fn circle_renders_center_and_end() -> anyhow::Result<()> {
        let circle = Circle::new(Point::new(1.0, 1.0), 0.25, PcbLayer::FSilkS, 0.15)?;
        assert_eq!(
            circle.render(&Affine::IDENTITY)[0].to_inline_string(),
            "(fp_circle (center 1 1) (end 1.25 1) (layer F.SilkS) (width 0.15))"
        );
        assert_eq!(circle.own_outline(), Some(Outline::new(Point::new(0.75, 0.75), Point::new(1.25, 1.25))));
        Ok(())
    }

    #[test]
    fn quarter_arc_outline() {
        // (1, 0) clockwise on screen by 90 degrees ends at (0, 1)
        let arc = Arc::new(Point::ORIGIN, Point::new(1.0, 0.0), 90.0, PcbLayer::FFab, 0.1);
        assert_abs_diff_eq!(arc.end().x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.end().y, 1.0, epsilon = 1e-9);
        assert_outline_eq(arc.own_outline().unwrap(), Outline::new(Point::ORIGIN, Point::new(1.0, 1.0)));
    }

    #[test]
    fn half_arc_outline_includes_extreme() {
        let arc = Arc::new(Point::ORIGIN, Point::new(0.0, -1.0), -180.0, PcbLayer::FFab, 0.1);
        assert_outline_eq(arc.own_outline().unwrap(), Outline::new(Point::new(-1.0, -1.0), Point::new(0.0, 1.0)));
    }

    #[test]
    fn arc_angle_flips_in_mirrored_frame() {
        let arc = Arc::new(Point::ORIGIN, Point::new(1.0, 0.0), 90.0, PcbLayer::FFab, 0.1);
        assert_eq!(
            arc.render(&Affine::mirror(Axis::X, 0.0))[0].to_inline_string(),
            "(fp_arc (start 0 0) (end -1 0) (angle -90) (layer F.Fab) (width 0.1))"
        );
    }
}
