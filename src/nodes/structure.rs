use crate::geometry::{Affine, Axis, Point};
use crate::tree::Element;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FootprintAttribute {
    Smd,
    Virtual,
}

/// Root container of a footprint. Header fields are written by the file writer.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub name: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub attribute: Option<FootprintAttribute>,
}

impl Footprint {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            description: None,
            tags: None,
            attribute: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_attribute(mut self, attribute: FootprintAttribute) -> Self {
        self.attribute = Some(attribute);
        self
    }
}

impl Element for Footprint {
    fn kind_name(&self) -> &'static str {
        "Footprint"
    }

    fn tree_text(&self) -> String {
        format!("Footprint({})", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Group;

impl Element for Group {
    fn kind_name(&self) -> &'static str {
        "Group"
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translation {
    pub offset: Point,
}

impl Translation {
    pub fn new(offset: Point) -> Self {
        Self { offset }
    }
}

impl Element for Translation {
    fn kind_name(&self) -> &'static str {
        "Translation"
    }

    fn tree_text(&self) -> String {
        format!("Translation{}", self.offset)
    }

    fn local_transform(&self) -> Affine {
        Affine::translation(self.offset)
    }
}

/// Rotates its children around the origin of the parent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub angle: f64,
}

impl Rotation {
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }
}

impl Element for Rotation {
    fn kind_name(&self) -> &'static str {
        "Rotation"
    }

    fn tree_text(&self) -> String {
        format!("Rotation({})", self.angle)
    }

    fn local_transform(&self) -> Affine {
        Affine::rotation(self.angle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mirror {
    pub axis: Axis,
    pub at: f64,
}

impl Mirror {
    pub fn new(axis: Axis, at: f64) -> Self {
        Self { axis, at }
    }
}

impl Element for Mirror {
    fn kind_name(&self) -> &'static str {
        "Mirror"
    }

    fn tree_text(&self) -> String {
        format!("Mirror({} = {})", self.axis, self.at)
    }

    fn local_transform(&self) -> Affine {
        Affine::mirror(self.axis, self.at)
    }
}
