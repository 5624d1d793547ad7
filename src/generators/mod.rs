pub mod jst_ph;
pub mod pin_header;

use crate::config::GeneratorConfig;
use crate::geometry::{round_to_grid, Outline, Point};
use crate::kicad::layer::PcbLayer;
use crate::nodes::{RectLine, Text, TextType};
use crate::tree::Node;

/// Courtyard rectangle around `outline`, grown by `offset` and snapped outwards to the grid.
pub(crate) fn courtyard(config: &GeneratorConfig, outline: &Outline, offset: f64) -> RectLine {
    let grown = outline.expand(offset);
    let snap = |p: Point| Point::new(round_to_grid(p.x, config.courtyard_grid), round_to_grid(p.y, config.courtyard_grid));
    RectLine::new(snap(grown.min), snap(grown.max), PcbLayer::FCrtYd, config.courtyard_line_width)
}

/// Reference above the body on silkscreen, value below it and a `%R` copy on the fab layer.
pub(crate) fn texts(config: &GeneratorConfig, value: &str, center_x: f64, top: f64, bottom: f64) -> Vec<Node> {
    let silk_font = Point::splat(config.silk_text_size);
    let fab_font = Point::splat(config.fab_text_size);
    vec![
        Node::new(
            Text::new(TextType::Reference, "REF**", Point::new(center_x, top - config.silk_text_size), PcbLayer::FSilkS)
                .with_font(silk_font, config.text_thickness),
        ),
        Node::new(
            Text::new(TextType::Value, value, Point::new(center_x, bottom + config.fab_text_size), PcbLayer::FFab)
                .with_font(fab_font, config.text_thickness),
        ),
        Node::new(
            Text::new(TextType::User, "%R", Point::new(center_x, (top + bottom) / 2.0), PcbLayer::FFab)
                .with_font(fab_font, config.text_thickness),
        ),
    ]
}
