use super::{courtyard, texts};
use crate::config::{render_template, GeneratorConfig};
use crate::geometry::{Outline, Point};
use crate::kicad::layer::PcbLayer;
use crate::nodes::{Circle, Footprint, FootprintAttribute, Line, Model, Pad, PadArray, PadArrayConfig, PadConfig, PadShape, PadType, PolygonLine, RectLine};
use crate::tree::Node;
use anyhow::ensure;
use tracing::debug;

// http://www.jst-mfg.com/product/pdf/eng/ePH.pdf
const PITCH: f64 = 2.0;
const SIGNAL_PAD: Point = Point { x: 1.0, y: 3.5 };
const MOUNTING_PAD: Point = Point { x: 1.6, y: 3.4 };
const MOUNTING_PAD_Y: f64 = 5.55;

fn smd_pad(size: Point) -> PadConfig {
    PadConfig {
        pad_type: Some(PadType::Smd),
        shape: Some(PadShape::Rect),
        size: Some(size),
        layers: PcbLayer::LAYERS_SMT.to_vec(),
        ..Default::default()
    }
}

/// JST PH side entry SMD connector (S*B-PH-SM4-TB), centered between the outer pins.
pub fn smd_side(config: &GeneratorConfig, pincount: u32) -> anyhow::Result<Node> {
    ensure!((2..=16).contains(&pincount), "JST PH SMD connectors exist with 2 to 16 pins, got {}", pincount);

    let mpn = format!("S{pincount}B-PH-SM4-TB");
    let values = [
        ("man", "JST".to_string()),
        ("series", "PH".to_string()),
        ("mpn", mpn.clone()),
        ("num_pins", pincount.to_string()),
        ("pitch", PITCH.to_string()),
        ("orientation", "Horizontal".to_string()),
    ];
    let name = render_template(&config.fp_name_format_string, &values)?;
    let lib_name = render_template(&config.lib_name_format_string, &values)?;
    debug!(footprint = %name, library = %lib_name, "generating JST PH SMD connector");

    let root = Node::new(
        Footprint::new(&name)
            .with_description(&format!("JST PH series connector, {mpn}, side entry type, surface mount"))
            .with_tags("connector jst ph")
            .with_attribute(FootprintAttribute::Smd),
    );

    let start_x = -((pincount - 1) as f64) * PITCH / 2.0;
    let end_x = -start_x;

    let body = Outline::new(Point::new(start_x - 2.95, -0.6), Point::new(end_x + 2.95, 7.0));
    let fab_body = body.expand(-config.silk_fab_offset);
    root.append(&Node::new(RectLine::from_outline(&fab_body, PcbLayer::FFab, config.fab_line_width)))?;

    let silk = Node::group();
    let width = config.silk_line_width;
    silk.append(&Node::new(PolygonLine::new(
        vec![
            Point::new(start_x + 0.5, 7.0),
            Point::new(start_x + 0.5, 6.0),
            Point::new(end_x - 0.5, 6.0),
            Point::new(end_x - 0.5, 7.0),
        ],
        PcbLayer::FSilkS,
        width,
    )?))?;
    // side walls are drawn for the left side and mirrored for the right
    for direction in [-1.0, 1.0] {
        let edge_x = if direction < 0.0 { start_x } else { end_x };
        let wall = |dx: f64, y: f64| Point::new(edge_x + direction * dx, y);
        silk.append(&Node::new(PolygonLine::new(
            vec![wall(0.9, 1.0), wall(2.15, 1.0), wall(2.15, -0.6), wall(2.95, -0.6), wall(2.95, 3.5)],
            PcbLayer::FSilkS,
            width,
        )?))?;
        silk.append(&Node::new(Line::new(wall(2.15, 1.0), wall(2.95, 1.0), PcbLayer::FSilkS, width)))?;
        silk.append(&Node::new(RectLine::new(wall(1.2, 2.1), wall(0.2, 5.5), PcbLayer::FSilkS, width)))?;
    }
    silk.append(&Node::new(Line::new(Point::new(start_x - 1.2, 7.0), Point::new(end_x + 1.2, 7.0), PcbLayer::FSilkS, width)))?;
    for i in 0..pincount - 1 {
        let middle_x = start_x + 1.0 + i as f64 * PITCH;
        silk.append(&Node::new(Line::new(Point::new(middle_x - 0.1, 1.0), Point::new(middle_x + 0.1, 1.0), PcbLayer::FSilkS, width)))?;
    }
    silk.append(&Node::new(Circle::new(Point::new(start_x - 1.4, 0.25), 0.25, PcbLayer::FSilkS, width)?))?;
    root.append(&silk)?;

    let pads = Node::group();
    pads.append(&Node::new(PadArray::new(PadArrayConfig {
        start: Point::new(start_x, 0.0),
        pincount,
        spacing: Point::new(PITCH, 0.0),
        pad: smd_pad(SIGNAL_PAD),
        ..Default::default()
    })?))?;
    for x in [start_x - 1.6 - MOUNTING_PAD.x / 2.0, end_x + 1.6 + MOUNTING_PAD.x / 2.0] {
        pads.append(&Node::new(Pad::new(PadConfig {
            at: Some(Point::new(x, MOUNTING_PAD_Y)),
            ..smd_pad(MOUNTING_PAD)
        })?))?;
    }

    let outline = pads.calculate_outline(Some(body))?;
    root.append(&Node::new(courtyard(config, &outline, config.courtyard_offset.connector)))?;
    root.extend(texts(config, &name, 0.0, outline.min.y, outline.max.y))?;
    root.append(&pads)?;
    root.append(&Node::new(Model::new(&config.model_path(&lib_name, &name))))?;
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use approx::assert_abs_diff_eq;

    fn courtyard_of(root: &Node) -> Option<Outline> {
        root.children().iter().find_map(|child| match &*child.kind() {
            NodeKind::RectLine(rect) if rect.layer == PcbLayer::FCrtYd => Some(Outline::new(rect.start, rect.end)),
            _ => None,
        })
    }

    #[test]
    fn four_pin_connector() -> anyhow::Result<()> {
        let root = smd_side(&GeneratorConfig::default(), 4)?;
        assert!(matches!(&*root.kind(), NodeKind::Footprint(f) if f.name == "JST_PH_S4B-PH-SM4-TB_1x04_P2.00mm_Horizontal"));

        let fragments = root.render_list()?;
        let pads: Vec<&String> = fragments.iter().filter(|f| f.starts_with("(pad ")).collect();
        assert_eq!(pads.len(), 6);
        assert!(pads[0].starts_with("(pad 1 smd rect (at -3 0) (size 1 3.5)"));
        assert!(pads[3].starts_with("(pad 4 smd rect (at 3 0)"));
        assert!(pads[4].starts_with("(pad \"\" smd rect (at -5.4 5.55) (size 1.6 3.4)"));
        Ok(())
    }

    #[test]
    fn courtyard_encloses_all_pads_on_grid() -> anyhow::Result<()> {
        let config = GeneratorConfig::default();
        let root = smd_side(&config, 2)?;
        // pads are the group right before the 3D model
        let children = root.children();
        let pad_outline = children[children.len() - 2].calculate_outline(None)?;
        let court = courtyard_of(&root).unwrap();

        assert!(court.min.x < pad_outline.min.x && court.min.y < pad_outline.min.y);
        assert!(court.max.x > pad_outline.max.x && court.max.y > pad_outline.max.y);
        for value in [court.min.x, court.min.y, court.max.x, court.max.y] {
            let steps = value / config.courtyard_grid;
            assert_abs_diff_eq!(steps, steps.round(), epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn pin_count_is_checked() {
        assert!(smd_side(&GeneratorConfig::default(), 1).is_err());
        assert!(smd_side(&GeneratorConfig::default(), 17).is_err());
    }
}
