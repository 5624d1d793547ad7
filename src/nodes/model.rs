use crate::kicad::syntax::{SyntaxArgument, SyntaxItem};
use crate::geometry::Affine;
use crate::tree::Element;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn serialize(&self, name: &str) -> SyntaxItem {
        let xyz = SyntaxItem::from_arguments(
            "xyz",
            vec![SyntaxArgument::number(self.x), SyntaxArgument::number(self.y), SyntaxArgument::number(self.z)],
        );
        SyntaxItem::from_single_child(name, xyz)
    }
}

impl From<[f64; 3]> for Xyz {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Reference to a 3D model. Placement is relative to the footprint and never transformed.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub filename: String,
    pub at: Xyz,
    pub scale: Xyz,
    pub rotate: Xyz,
}

impl Model {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.into(),
            at: Xyz::new(0.0, 0.0, 0.0),
            scale: Xyz::new(1.0, 1.0, 1.0),
            rotate: Xyz::new(0.0, 0.0, 0.0),
        }
    }

    pub fn with_placement(mut self, at: Xyz, scale: Xyz, rotate: Xyz) -> Self {
        self.at = at;
        self.scale = scale;
        self.rotate = rotate;
        self
    }
}

impl Element for Model {
    fn kind_name(&self) -> &'static str {
        "Model"
    }

    fn tree_text(&self) -> String {
        format!("Model(filename=\"{}\")", self.filename)
    }

    fn render(&self, _frame: &Affine) -> Vec<SyntaxItem> {
        vec![SyntaxItem::new("model")
            .with_argument(SyntaxArgument::text(&self.filename))
            .with_child(self.at.serialize("at"))
            .with_child(self.scale.serialize("scale"))
            .with_child(self.rotate.serialize("rotate"))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Outline, Point};
    use crate::tree::Node;

    #[test]
    fn renders_default_placement() -> anyhow::Result<()> {
        let node = Node::new(Model::new("${KISYS3DMOD}/Pin_Headers.3dshapes/Pin_Header_Straight_1x02.wrl"));
        assert_eq!(
            node.render_list()?,
            vec![
                "(model ${KISYS3DMOD}/Pin_Headers.3dshapes/Pin_Header_Straight_1x02.wrl (at (xyz 0 0 0)) (scale (xyz 1 1 1)) (rotate (xyz 0 0 0)))"
                    .to_string()
            ]
        );
        Ok(())
    }

    #[test]
    fn model_widens_outline_to_origin() -> anyhow::Result<()> {
        let root = Node::new(crate::nodes::Translation::new(Point::new(3.0, 3.0)));
        root.append(&Node::new(Model::new("a.wrl").with_placement([0.0, 0.0, 0.0].into(), [1.0, 1.0, 1.0].into(), [0.0, 0.0, 90.0].into())))?;
        assert_eq!(root.calculate_outline(None)?, Outline::ORIGIN);
        Ok(())
    }
}
