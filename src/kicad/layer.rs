use crate::errors::{parse_field, ValidationError};
use crate::kicad::syntax::{SyntaxArgument, SyntaxItem};
use serde::Deserialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, EnumIter, EnumString, Display, Deserialize)]
#[serde(try_from = "String")]
pub enum PcbLayer {
    #[strum(serialize = "F.Cu")]
    FCu, // Front copper layer
    #[strum(serialize = "B.Cu")]
    BCu, // Back copper layer
    #[strum(serialize = "*.Cu")]
    AllCu, // Every copper layer
    #[strum(serialize = "F.Adhes")]
    FAdhes,
    #[strum(serialize = "B.Adhes")]
    BAdhes,
    #[strum(serialize = "F.Paste")]
    FPaste,
    #[strum(serialize = "B.Paste")]
    BPaste,
    #[strum(serialize = "*.Paste")]
    AllPaste,
    #[strum(serialize = "F.SilkS")]
    FSilkS,
    #[strum(serialize = "B.SilkS")]
    BSilkS,
    #[strum(serialize = "F.Mask")]
    FMask,
    #[strum(serialize = "B.Mask")]
    BMask,
    #[strum(serialize = "*.Mask")]
    AllMask,
    #[strum(serialize = "Dwgs.User")]
    DwgsUser, // User drawing layer
    #[strum(serialize = "Cmts.User")]
    CmtsUser, // User comment layer
    #[strum(serialize = "Edge.Cuts")]
    EdgeCuts, // Board outline layer
    #[strum(serialize = "F.CrtYd")]
    FCrtYd, // Footprint front courtyard layer
    #[strum(serialize = "B.CrtYd")]
    BCrtYd,
    #[strum(serialize = "F.Fab")]
    FFab, // Footprint front fabrication layer
    #[strum(serialize = "B.Fab")]
    BFab,
}

impl TryFrom<String> for PcbLayer {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PcbLayer::parse_field("Layer", &value)
    }
}

impl PcbLayer {
    pub const LAYERS_SMT: [PcbLayer; 3] = [PcbLayer::FCu, PcbLayer::FMask, PcbLayer::FPaste];
    pub const LAYERS_THT: [PcbLayer; 2] = [PcbLayer::AllCu, PcbLayer::AllMask];
    pub const LAYERS_NPTH: [PcbLayer; 2] = [PcbLayer::AllCu, PcbLayer::AllMask];

    pub fn parse_field(kind: &'static str, str: &str) -> Result<PcbLayer, ValidationError> {
        parse_field(kind, "layer", str)
    }

    pub fn is_copper(&self) -> bool {
        matches!(self, PcbLayer::FCu | PcbLayer::BCu | PcbLayer::AllCu)
    }

    pub fn all_copper() -> Vec<PcbLayer> {
        PcbLayer::iter().filter(|l| l.is_copper()).collect()
    }

    pub fn to_argument(&self) -> SyntaxArgument {
        SyntaxArgument::identifier(&self.to_string())
    }

    /// `(layer F.SilkS)`
    pub fn serialize(&self) -> SyntaxItem {
        SyntaxItem::from_single_argument("layer", self.to_argument())
    }
}

/// `(layers *.Cu *.Mask)`
pub fn serialize_layers(layers: &[PcbLayer]) -> SyntaxItem {
    SyntaxItem::from_arguments("layers", layers.iter().map(|l| l.to_argument()).collect())
}
