use crate::errors::IntegrityError;
use crate::kicad::layer::PcbLayer;
use crate::kicad::syntax::{SyntaxArgument, SyntaxItem};
use crate::nodes::Footprint;
use crate::tree::{Node, NodeKind};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes a footprint tree in the `.kicad_mod` module format.
pub struct FootprintWriter {
    root: Node,
    footprint: Footprint,
    edit_timestamp: DateTime<Utc>,
}

impl FootprintWriter {
    pub fn new(root: &Node) -> Result<FootprintWriter, IntegrityError> {
        let footprint = match &*root.kind() {
            NodeKind::Footprint(footprint) => footprint.clone(),
            other => return Err(IntegrityError::NotAFootprint(other.as_element().kind_name().into())),
        };
        Ok(FootprintWriter {
            root: root.clone(),
            footprint,
            edit_timestamp: Utc::now(),
        })
    }

    pub fn with_timestamp(mut self, edit_timestamp: DateTime<Utc>) -> Self {
        self.edit_timestamp = edit_timestamp;
        self
    }

    fn header_items(&self) -> Vec<SyntaxItem> {
        let mut items = Vec::new();
        if let Some(description) = &self.footprint.description {
            items.push(SyntaxItem::from_single_argument("descr", SyntaxArgument::quoted(description)));
        }
        if let Some(tags) = &self.footprint.tags {
            items.push(SyntaxItem::from_single_argument("tags", SyntaxArgument::quoted(tags)));
        }
        if let Some(attribute) = &self.footprint.attribute {
            items.push(SyntaxItem::from_single_argument("attr", SyntaxArgument::identifier(&attribute.to_string())));
        }
        items
    }

    pub fn serialize(&self) -> Result<String, IntegrityError> {
        let fragments = self.root.render_list()?;
        debug!(footprint = %self.footprint.name, fragments = fragments.len(), "serializing footprint");

        let mut output = format!(
            "(module {} {} (tedit {:X})\n",
            SyntaxArgument::text(&self.footprint.name).to_inline_string(),
            PcbLayer::FCu.serialize().to_inline_string(),
            self.edit_timestamp.timestamp()
        );
        let lines = self.header_items().into_iter().map(|item| item.to_inline_string()).chain(fragments);
        for line in lines {
            output.push_str("  ");
            output.push_str(&line);
            output.push('\n');
        }
        output.push_str(")\n");
        Ok(output)
    }

    /// Writes `<name>.kicad_mod` into `directory`, creating it when needed.
    pub fn write_to(&self, directory: &Path) -> anyhow::Result<PathBuf> {
        let data = self.serialize()?;
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }
        let safe_name = sanitize_filename::sanitize(&self.footprint.name);
        let path = directory.join(format!("{safe_name}.kicad_mod"));
        fs::write(&path, data)?;
        info!(path = %path.display(), "footprint written");
        Ok(path)
    }
}
