use crate::geometry::{Affine, Outline, Point};
use crate::kicad::layer::PcbLayer;
use crate::kicad::syntax::{PositionPreference, SyntaxArgument, SyntaxItem};
use crate::tree::Element;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TextType {
    Reference,
    Value,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text_type: TextType,
    pub text: String,
    pub at: Point,
    pub rotation: f64,
    pub layer: PcbLayer,
    pub size: Point,
    pub thickness: f64,
    pub hide: bool,
}

impl Text {
    pub fn new(text_type: TextType, text: &str, at: Point, layer: PcbLayer) -> Self {
        Self {
            text_type,
            text: text.into(),
            at,
            rotation: 0.0,
            layer,
            size: Point::splat(1.0),
            thickness: 0.15,
            hide: false,
        }
    }

    pub fn with_font(mut self, size: Point, thickness: f64) -> Self {
        self.size = size;
        self.thickness = thickness;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }
}

impl Element for Text {
    fn kind_name(&self) -> &'static str {
        "Text"
    }

    fn tree_text(&self) -> String {
        format!(
            "Text(type={}, text={}, at={}, layer={})",
            self.text_type,
            SyntaxArgument::quoted(&self.text).to_inline_string(),
            self.at,
            self.layer
        )
    }

    /// Rough box from the font size; glyph metrics are not known here.
    fn own_outline(&self) -> Option<Outline> {
        let estimate = Point::new(self.size.x * self.text.chars().count() as f64, self.size.y);
        Some(Outline::centered(Point::ORIGIN, estimate).transformed(&Affine::rotation(self.rotation)).translate(self.at))
    }

    fn render(&self, frame: &Affine) -> Vec<SyntaxItem> {
        let at = frame.apply(self.at);
        let rotation = frame.map_angle(self.rotation);
        let mut position = SyntaxItem::xy("at", at.x, at.y);
        if rotation != 0.0 {
            position = position.with_argument(SyntaxArgument::number(rotation));
        }

        let mut item = SyntaxItem::new("fp_text")
            .with_argument(SyntaxArgument::identifier(&self.text_type.to_string()))
            .with_argument(SyntaxArgument::text(&self.text))
            .with_child(position)
            .with_child(self.layer.serialize());
        if self.hide {
            item = item.with_argument(SyntaxArgument::Identifier("hide".into(), PositionPreference::End));
        }
        let font = SyntaxItem::new("font")
            .with_child(SyntaxItem::xy("size", self.size.x, self.size.y))
            .with_child(SyntaxItem::from_single_argument("thickness", SyntaxArgument::number(self.thickness)));
        vec![item.with_child(SyntaxItem::from_single_child("effects", font))]
    }
}
