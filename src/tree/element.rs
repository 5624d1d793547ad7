use crate::geometry::{Affine, Outline};
use crate::kicad::syntax::SyntaxItem;
use crate::nodes::{Arc, Circle, Footprint, Group, Line, Mirror, Model, Pad, PadArray, PolygonLine, RectLine, Rotation, Text, Translation};

/// Capability shared by every node kind.
///
/// The debug text and the rendered items are both derived from the validated state of the
/// kind; neither is cached.
pub trait Element {
    fn kind_name(&self) -> &'static str;

    /// Text shown for this node in a render tree.
    fn tree_text(&self) -> String {
        self.kind_name().to_string()
    }

    /// Outline of the node's own geometry, excluding children.
    fn own_outline(&self) -> Option<Outline> {
        None
    }

    /// Maps points from the frame this node's children live in to the parent's frame.
    fn local_transform(&self) -> Affine {
        Affine::IDENTITY
    }

    /// Children generated from the node's attributes on every call.
    fn synthesize_children(&self) -> Vec<NodeKind> {
        Vec::new()
    }

    /// File form of this node. `frame` maps the node's coordinates to the root frame.
    fn render(&self, _frame: &Affine) -> Vec<SyntaxItem> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Footprint(Footprint),
    Group(Group),
    Translation(Translation),
    Rotation(Rotation),
    Mirror(Mirror),
    Pad(Pad),
    PadArray(PadArray),
    Line(Line),
    PolygonLine(PolygonLine),
    RectLine(RectLine),
    Circle(Circle),
    Arc(Arc),
    Text(Text),
    Model(Model),
}

impl NodeKind {
    pub fn as_element(&self) -> &dyn Element {
        match self {
            NodeKind::Footprint(e) => e,
            NodeKind::Group(e) => e,
            NodeKind::Translation(e) => e,
            NodeKind::Rotation(e) => e,
            NodeKind::Mirror(e) => e,
            NodeKind::Pad(e) => e,
            NodeKind::PadArray(e) => e,
            NodeKind::Line(e) => e,
            NodeKind::PolygonLine(e) => e,
            NodeKind::RectLine(e) => e,
            NodeKind::Circle(e) => e,
            NodeKind::Arc(e) => e,
            NodeKind::Text(e) => e,
            NodeKind::Model(e) => e,
        }
    }
}

macro_rules! node_kind_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for NodeKind {
                fn from(value: $variant) -> Self {
                    NodeKind::$variant(value)
                }
            }
        )*
    };
}

node_kind_from!(Footprint, Group, Translation, Rotation, Mirror, Pad, PadArray, Line, PolygonLine, RectLine, Circle, Arc, Text, Model);
