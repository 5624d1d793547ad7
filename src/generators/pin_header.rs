use super::{courtyard, texts};
use crate::config::GeneratorConfig;
use crate::geometry::{Outline, Point};
use crate::kicad::layer::PcbLayer;
use crate::nodes::{Footprint, Model, Pad, PadArray, PadArrayConfig, PadConfig, PadShape, PadType, PolygonLine, RectLine, Xyz};
use crate::tree::Node;
use anyhow::ensure;
use tracing::debug;

const LIB_NAME: &str = "Pin_Headers";

#[derive(Debug, Clone, PartialEq)]
pub struct PinHeaderParams {
    pub rows: u32,
    pub cols: u32,
    pub pitch: f64,
    pub drill: f64,
    pub pad_size: Point,
}

impl Default for PinHeaderParams {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            pitch: 2.54,
            drill: 1.0,
            pad_size: Point::splat(1.7),
        }
    }
}

impl PinHeaderParams {
    pub fn footprint_name(&self) -> String {
        if self.pitch == 2.54 {
            format!("Pin_Header_Straight_{}x{:02}", self.cols, self.rows)
        } else {
            format!("Pin_Header_Straight_{}x{:02}_Pitch{:.2}mm", self.cols, self.rows, self.pitch)
        }
    }

    fn description_and_tags(&self) -> (String, String) {
        let mut description = format!("Through hole straight pin header, {}x{:02}, {:.2}mm pitch", self.cols, self.rows, self.pitch);
        let mut tags = format!("Through hole pin header THT {}x{:02} {:.2}mm", self.cols, self.rows, self.pitch);
        let (description_suffix, tag_suffix) = match self.cols {
            1 => (", single row", " single row"),
            2 => (", double rows", " double row"),
            3 => (", triple rows", " triple row"),
            _ => ("", ""),
        };
        description.push_str(description_suffix);
        tags.push_str(tag_suffix);
        (description, tags)
    }

    fn pad_template(&self, shape: PadShape) -> PadConfig {
        PadConfig {
            pad_type: Some(PadType::ThruHole),
            shape: Some(shape),
            size: Some(self.pad_size),
            drill: Some(Point::splat(self.drill)),
            layers: PcbLayer::LAYERS_THT.to_vec(),
            ..Default::default()
        }
    }
}

/// Straight through hole pin header, pin 1 at the origin, rows running down.
pub fn straight(config: &GeneratorConfig, params: &PinHeaderParams) -> anyhow::Result<Node> {
    ensure!(params.rows > 0 && params.cols > 0, "a pin header needs at least one row and one column");
    ensure!(params.pitch > 0.0, "pitch must be positive, got {}", params.pitch);

    let pitch = params.pitch;
    let rows = params.rows as f64;
    let cols = params.cols as f64;
    let name = params.footprint_name();
    let (description, tags) = params.description_and_tags();
    debug!(footprint = %name, "generating straight pin header");

    let root = Node::new(Footprint::new(&name).with_description(&description).with_tags(&tags));

    let body_width = cols * pitch;
    let body = Outline::new(
        Point::new((pitch * (cols - 1.0) - body_width) / 2.0, -pitch / 2.0),
        Point::new((pitch * (cols - 1.0) + body_width) / 2.0, (rows - 1.0) * pitch + pitch / 2.0),
    );
    root.append(&Node::new(RectLine::from_outline(&body, PcbLayer::FFab, config.fab_line_width)))?;

    // silkscreen keeps clear of pin 1, which gets its own corner marker
    let silk_offset = config.silk_fab_offset;
    let silk_width = (body.width() + 2.0 * silk_offset).max(pitch * (cols - 1.0) - params.pad_size.x - 4.0 * silk_offset);
    let left = (pitch * (cols - 1.0) - silk_width) / 2.0;
    let right = left + silk_width;
    let top = body.min.y - silk_offset;
    let bottom = body.max.y + silk_offset;
    let silk = if params.cols == 1 {
        Node::new(RectLine::new(Point::new(left, 0.5 * pitch), Point::new(right, bottom), PcbLayer::FSilkS, config.silk_line_width))
    } else {
        Node::new(PolygonLine::new(
            vec![
                Point::new(left, 0.5 * pitch),
                Point::new(left, bottom),
                Point::new(right, bottom),
                Point::new(right, top),
                Point::new(0.5 * pitch, top),
                Point::new(0.5 * pitch, 0.5 * pitch),
                Point::new(left, 0.5 * pitch),
            ],
            PcbLayer::FSilkS,
            config.silk_line_width,
        )?)
    };
    root.append(&silk)?;
    root.append(&Node::new(PolygonLine::new(
        vec![Point::new(left, 0.0), Point::new(left, top), Point::new(0.0, top)],
        PcbLayer::FSilkS,
        config.silk_line_width,
    )?))?;

    let pads = Node::group();
    pads.append(&Node::new(Pad::new(PadConfig {
        number: "1".into(),
        at: Some(Point::ORIGIN),
        ..params.pad_template(PadShape::Rect)
    })?))?;
    for row in 0..params.rows {
        let first_col = if row == 0 { 1 } else { 0 };
        if first_col >= params.cols {
            continue;
        }
        pads.append(&Node::new(PadArray::new(PadArrayConfig {
            start: Point::new(first_col as f64 * pitch, row as f64 * pitch),
            pincount: params.cols - first_col,
            initial: Some(row * params.cols + first_col + 1),
            increment: Some(1),
            spacing: Point::new(pitch, 0.0),
            pad: params.pad_template(PadShape::Oval),
        })?))?;
    }

    let outline = pads.calculate_outline(Some(body))?;
    root.append(&Node::new(courtyard(config, &outline, config.courtyard_offset.default)))?;
    root.extend(texts(config, &name, pitch * (cols - 1.0) / 2.0, top, bottom))?;
    root.append(&pads)?;

    let model = Model::new(&config.model_path(LIB_NAME, &name)).with_placement(
        Xyz::new((cols - 1.0) * pitch / 2.0 / 25.4, -(rows - 1.0) * pitch / 2.0 / 25.4, 0.0),
        Xyz::new(1.0, 1.0, 1.0),
        Xyz::new(0.0, 0.0, 90.0),
    );
    root.append(&Node::new(model))?;
    Ok(root)
}
