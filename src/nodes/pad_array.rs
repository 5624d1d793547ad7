use crate::errors::ValidationError;
use crate::geometry::Point;
use crate::nodes::pad::{Pad, PadConfig};
use crate::tree::{Element, NodeKind};

#[derive(Debug, Clone, Default)]
pub struct PadArrayConfig {
    pub start: Point,
    pub pincount: u32,
    pub initial: Option<u32>,
    pub increment: Option<u32>,
    pub spacing: Point,
    /// Template for every pad. `number` and `at` are overwritten per pad.
    pub pad: PadConfig,
}

/// Row of pads numbered `initial + i * increment`, placed at `start + i * spacing`.
#[derive(Debug, Clone, PartialEq)]
pub struct PadArray {
    start: Point,
    pincount: u32,
    initial: u32,
    increment: u32,
    spacing: Point,
    template: Pad,
}

impl PadArray {
    pub fn new(config: PadArrayConfig) -> Result<PadArray, ValidationError> {
        if config.pincount == 0 {
            return Err(ValidationError::out_of_range("PadArray", "pincount", "at least one pad is required"));
        }
        let initial = config.initial.unwrap_or(1);
        let increment = config.increment.unwrap_or(1);
        // the last number bounds every other one
        (config.pincount - 1)
            .checked_mul(increment)
            .and_then(|span| span.checked_add(initial))
            .ok_or(ValidationError::out_of_range("PadArray", "increment", "pad numbers exceed u32"))?;
        let template = Pad::new(PadConfig {
            at: Some(config.start),
            ..config.pad
        })?;
        Ok(PadArray {
            start: config.start,
            pincount: config.pincount,
            initial,
            increment,
            spacing: config.spacing,
            template,
        })
    }

    pub fn pads(&self) -> impl Iterator<Item = Pad> + '_ {
        (0..self.pincount).map(|i| {
            let mut pad = self.template.clone();
            pad.number = (self.initial + i * self.increment).to_string();
            pad.at = self.start + self.spacing * i as f64;
            pad
        })
    }
}

impl Element for PadArray {
    fn kind_name(&self) -> &'static str {
        "PadArray"
    }

    fn tree_text(&self) -> String {
        format!(
            "PadArray(pincount={}, initial={}, increment={}, spacing={})",
            self.pincount, self.initial, self.increment, self.spacing
        )
    }

    fn synthesize_children(&self) -> Vec<NodeKind> {
        self.pads().map(NodeKind::from).collect()
    }
}
