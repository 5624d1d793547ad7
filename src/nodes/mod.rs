pub mod graphics;
pub mod model;
pub mod pad;
pub mod pad_array;
pub mod structure;
pub mod text;

pub use graphics::{Arc, Circle, Line, PolygonLine, RectLine};
pub use model::{Model, Xyz};
pub use pad::{AnchorShape, Pad, PadConfig, PadPrimitive, PadShape, PadType, ShapeInZone};
pub use pad_array::{PadArray, PadArrayConfig};
pub use structure::{Footprint, FootprintAttribute, Group, Mirror, Rotation, Translation};
pub use text::{Text, TextType};
