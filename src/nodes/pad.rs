use crate::errors::ValidationError;
use crate::geometry::{Affine, Outline, Point};
use crate::kicad::layer::{serialize_layers, PcbLayer};
use crate::kicad::syntax::{format_number, SyntaxArgument, SyntaxItem};
use crate::tree::Element;
use itertools::Itertools;
use strum::{Display, EnumString};
use tracing::warn;

const KIND: &str = "Pad";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum PadType {
    #[strum(serialize = "thru_hole")]
    ThruHole,
    #[strum(serialize = "smd")]
    Smd,
    #[strum(serialize = "connect")]
    Connect,
    #[strum(serialize = "np_thru_hole")]
    NpThruHole,
}

impl PadType {
    pub fn requires_drill(&self) -> bool {
        matches!(self, PadType::ThruHole | PadType::NpThruHole)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum PadShape {
    #[strum(serialize = "circle")]
    Circle,
    #[strum(serialize = "oval")]
    Oval,
    #[strum(serialize = "rect")]
    Rect,
    #[strum(serialize = "roundrect")]
    RoundRect,
    #[strum(serialize = "trapezoid")]
    Trapezoid,
    #[strum(serialize = "custom")]
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum AnchorShape {
    #[default]
    #[strum(serialize = "circle")]
    Circle,
    #[strum(serialize = "rect")]
    Rect,
}

/// Which shape of a custom pad is used when connecting it to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum ShapeInZone {
    #[default]
    #[strum(serialize = "outline")]
    Outline,
    #[strum(serialize = "convexhull")]
    ConvexHull,
}

/// Sub-shape of a custom pad, relative to the pad center.
#[derive(Debug, Clone, PartialEq)]
pub enum PadPrimitive {
    Line { start: Point, end: Point, width: f64 },
    Polygon { points: Vec<Point>, width: f64 },
    Circle { center: Point, radius: f64, width: f64 },
}

impl PadPrimitive {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            PadPrimitive::Polygon { points, .. } if points.len() < 3 => {
                Err(ValidationError::out_of_range(KIND, "primitives", "a polygon needs at least 3 points"))
            }
            PadPrimitive::Circle { radius, .. } if !(*radius > 0.0) => {
                Err(ValidationError::out_of_range(KIND, "primitives", "circle radius must be positive"))
            }
            _ => Ok(()),
        }
    }

    pub fn outline(&self) -> Outline {
        match self {
            PadPrimitive::Line { start, end, width } => Outline::new(*start, *end).expand(width / 2.0),
            PadPrimitive::Polygon { points, width } => Outline::from_points(points.iter().copied())
                .unwrap_or(Outline::ORIGIN)
                .expand(width / 2.0),
            PadPrimitive::Circle { center, radius, width } => {
                Outline::centered(*center, Point::splat(radius * 2.0)).expand(width / 2.0)
            }
        }
    }

    fn serialize(&self) -> SyntaxItem {
        match self {
            PadPrimitive::Line { start, end, width } => SyntaxItem::new("gr_line")
                .with_child(SyntaxItem::xy("start", start.x, start.y))
                .with_child(SyntaxItem::xy("end", end.x, end.y))
                .with_child(SyntaxItem::from_single_argument("width", SyntaxArgument::number(*width))),
            PadPrimitive::Polygon { points, width } => SyntaxItem::new("gr_poly")
                .with_child(SyntaxItem {
                    name: "pts".into(),
                    arguments: Vec::new(),
                    children: points.iter().map(|p| SyntaxItem::xy("xy", p.x, p.y)).collect(),
                })
                .with_child(SyntaxItem::from_single_argument("width", SyntaxArgument::number(*width))),
            PadPrimitive::Circle { center, radius, width } => SyntaxItem::new("gr_circle")
                .with_child(SyntaxItem::xy("center", center.x, center.y))
                .with_child(SyntaxItem::xy("end", center.x + radius, center.y))
                .with_child(SyntaxItem::from_single_argument("width", SyntaxArgument::number(*width))),
        }
    }
}

/// Constructor input for [`Pad::new`]. Required fields are `Option`s so that a missing one can
/// be reported by name.
#[derive(Debug, Clone, Default)]
pub struct PadConfig {
    pub number: String,
    pub pad_type: Option<PadType>,
    pub shape: Option<PadShape>,
    pub at: Option<Point>,
    pub rotation: f64,
    pub size: Option<Point>,
    pub offset: Option<Point>,
    pub drill: Option<Point>,
    pub solder_paste_margin_ratio: f64,
    pub solder_paste_margin: f64,
    pub solder_mask_margin: f64,
    pub layers: Vec<PcbLayer>,
    pub radius_ratio: Option<f64>,
    pub anchor_shape: Option<AnchorShape>,
    pub shape_in_zone: Option<ShapeInZone>,
    pub primitives: Vec<PadPrimitive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomShape {
    pub anchor_shape: AnchorShape,
    pub shape_in_zone: ShapeInZone,
    pub primitives: Vec<PadPrimitive>,
}

// https://dev-docs.kicad.org/en/file-formats/sexpr-intro/index.html#_footprint_pad
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub(crate) number: String,
    pub(crate) pad_type: PadType,
    pub(crate) shape: PadShape,
    pub(crate) at: Point,
    pub(crate) rotation: f64,
    pub(crate) size: Point,
    pub(crate) offset: Point,
    pub(crate) drill: Option<Point>,
    pub(crate) solder_paste_margin_ratio: f64,
    pub(crate) solder_paste_margin: f64,
    pub(crate) solder_mask_margin: f64,
    pub(crate) layers: Vec<PcbLayer>,
    pub(crate) radius_ratio: Option<f64>,
    pub(crate) custom: Option<CustomShape>,
}

impl Pad {
    pub fn new(config: PadConfig) -> Result<Pad, ValidationError> {
        let pad_type = config.pad_type.ok_or(ValidationError::missing(KIND, "type"))?;
        let shape = config.shape.ok_or(ValidationError::missing(KIND, "shape"))?;
        let at = config.at.ok_or(ValidationError::missing(KIND, "at"))?;
        let size = config.size.ok_or(ValidationError::missing(KIND, "size"))?;
        // written so that NaN is rejected as well
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(ValidationError::out_of_range(KIND, "size", format!("{} must be positive", size)));
        }
        let offset = config.offset.unwrap_or_default();

        let drill = if pad_type.requires_drill() {
            let drill = config.drill.ok_or(ValidationError::missing(KIND, "drill"))?;
            if !(drill.x >= 0.0 && drill.y >= 0.0) {
                return Err(ValidationError::out_of_range(KIND, "drill", "negative drill size not allowed"));
            }
            Some(drill)
        } else {
            if let Some(drill) = config.drill {
                warn!(pad = %config.number, %drill, "drill is not supported for {} pads, ignoring it", pad_type);
            }
            None
        };

        if config.layers.is_empty() {
            return Err(ValidationError::missing(KIND, "layers"));
        }

        let radius_ratio = if shape == PadShape::RoundRect {
            let ratio = config.radius_ratio.ok_or(ValidationError::missing(KIND, "radius_ratio"))?;
            if !(ratio > 0.0 && ratio <= 0.5) {
                return Err(ValidationError::out_of_range(KIND, "radius_ratio", "0 < rr <= 0.5"));
            }
            Some(ratio)
        } else {
            None
        };

        let custom = if shape == PadShape::Custom {
            if config.primitives.is_empty() {
                return Err(ValidationError::missing(KIND, "primitives"));
            }
            for primitive in &config.primitives {
                primitive.validate()?;
            }
            Some(CustomShape {
                anchor_shape: config.anchor_shape.unwrap_or_default(),
                shape_in_zone: config.shape_in_zone.unwrap_or_default(),
                primitives: config.primitives,
            })
        } else {
            None
        };

        Ok(Pad {
            number: config.number,
            pad_type,
            shape,
            at,
            rotation: config.rotation,
            size,
            offset,
            drill,
            solder_paste_margin_ratio: config.solder_paste_margin_ratio,
            solder_paste_margin: config.solder_paste_margin,
            solder_mask_margin: config.solder_mask_margin,
            layers: config.layers,
            radius_ratio,
            custom,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn drill(&self) -> Option<Point> {
        self.drill
    }

    fn drill_item(&self) -> Option<SyntaxItem> {
        let mut item = SyntaxItem::new("drill");
        if let Some(drill) = self.drill {
            if drill.x != drill.y {
                item = item
                    .with_argument(SyntaxArgument::identifier("oval"))
                    .with_argument(SyntaxArgument::number(drill.x))
                    .with_argument(SyntaxArgument::number(drill.y));
            } else {
                item = item.with_argument(SyntaxArgument::number(drill.x));
            }
        }
        if self.offset != Point::ORIGIN {
            item = item.with_child(SyntaxItem::xy("offset", self.offset.x, self.offset.y));
        }
        if item.arguments.is_empty() && item.children.is_empty() { None } else { Some(item) }
    }

    fn optional_number(name: &str, value: f64) -> Option<SyntaxItem> {
        (value != 0.0).then(|| SyntaxItem::from_single_argument(name, SyntaxArgument::number(value)))
    }
}

impl Element for Pad {
    fn kind_name(&self) -> &'static str {
        KIND
    }

    fn tree_text(&self) -> String {
        let mut render_strings = vec![
            "pad".to_string(),
            SyntaxArgument::quoted(&self.number).to_inline_string(),
            self.pad_type.to_string(),
            self.shape.to_string(),
            format!("(at {} {})", format_number(self.at.x), format_number(self.at.y)),
            format!("(size {} {})", format_number(self.size.x), format_number(self.size.y)),
        ];
        if let Some(drill) = self.drill {
            render_strings.push(format!("(drill {} {})", format_number(drill.x), format_number(drill.y)));
        }
        render_strings.push(format!("(layers {})", self.layers.iter().join(" ")));
        format!("{}({})", KIND, render_strings.join(" "))
    }

    fn own_outline(&self) -> Option<Outline> {
        let rotate = Affine::rotation(self.rotation);
        let local = match &self.custom {
            Some(custom) => custom
                .primitives
                .iter()
                .map(|p| p.outline().transformed(&rotate))
                .reduce(|a, b| a.union(&b))?,
            None => {
                let center = rotate.apply(self.offset);
                match self.shape {
                    PadShape::Circle => Outline::centered(center, Point::splat(self.size.x)),
                    _ => Outline::centered(self.offset, self.size).transformed(&rotate),
                }
            }
        };
        Some(local.translate(self.at))
    }

    fn render(&self, frame: &Affine) -> Vec<SyntaxItem> {
        let at = frame.apply(self.at);
        let rotation = frame.map_angle(self.rotation);
        let mut position = SyntaxItem::xy("at", at.x, at.y);
        if rotation != 0.0 {
            position = position.with_argument(SyntaxArgument::number(rotation));
        }

        let mut children = vec![position, SyntaxItem::xy("size", self.size.x, self.size.y)];
        children.extend(self.drill_item());
        children.push(serialize_layers(&self.layers));
        if let Some(ratio) = self.radius_ratio {
            children.push(SyntaxItem::from_single_argument("roundrect_rratio", SyntaxArgument::number(ratio)));
        }
        children.extend(Self::optional_number("solder_mask_margin", self.solder_mask_margin));
        children.extend(Self::optional_number("solder_paste_margin", self.solder_paste_margin));
        children.extend(Self::optional_number("solder_paste_margin_ratio", self.solder_paste_margin_ratio));
        if let Some(custom) = &self.custom {
            children.push(
                SyntaxItem::new("options")
                    .with_child(SyntaxItem::from_single_argument("clearance", SyntaxArgument::identifier(&custom.shape_in_zone.to_string())))
                    .with_child(SyntaxItem::from_single_argument("anchor", SyntaxArgument::identifier(&custom.anchor_shape.to_string()))),
            );
            children.push(SyntaxItem {
                name: "primitives".into(),
                arguments: Vec::new(),
                children: custom.primitives.iter().map(|p| p.serialize()).collect(),
            });
        }

        vec![SyntaxItem {
            name: "pad".into(),
            arguments: vec![
                SyntaxArgument::text(&self.number),
                SyntaxArgument::identifier(&self.pad_type.to_string()),
                SyntaxArgument::identifier(&self.shape.to_string()),
            ],
            children,
        }]
    }
}
