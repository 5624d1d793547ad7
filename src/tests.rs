#[cfg(test)]
mod tests {
    use crate::config::GeneratorConfig;
    use crate::errors::IntegrityError;
    use crate::generators::{jst_ph, pin_header};
    use crate::generators::pin_header::PinHeaderParams;
    use crate::geometry::{Axis, Outline, Point};
    use crate::kicad::layer::PcbLayer;
    use crate::kicad::syntax::KiCadParser;
    use crate::nodes::{Footprint, Mirror, Pad, PadConfig, PadShape, PadType, RectLine, Rotation, Translation};
    use crate::tree::Node;
    use crate::writer::FootprintWriter;
    use approx::assert_abs_diff_eq;

    macro_rules! generated_footprint {
        ($test_name:ident, $build:expr, $pads:expr) => {
            #[test]
            fn $test_name() -> anyhow::Result<()> {
                let build: fn(&GeneratorConfig) -> anyhow::Result<Node> = $build;
                let root = build(&GeneratorConfig::default())?;

                let output = FootprintWriter::new(&root)?.serialize()?;
                let parsed = KiCadParser::parse_syntax_item(&KiCadParser::tokenize(&output)?)?;
                assert_eq!(parsed.name, "module");
                assert_eq!(parsed.children.iter().filter(|c| c.name == "pad").count(), $pads);
                assert_eq!(parsed.children.iter().filter(|c| c.name == "model").count(), 1);
                assert!(parsed.children.iter().any(|c| c.name == "fp_line" && c.get_named_child("layer").is_some_and(|l| l.has_argument(&PcbLayer::FCrtYd.to_argument()))));

                // repeated traversals see the same tree
                assert_eq!(root.render_list()?, root.render_list()?);
                assert_eq!(root.virtual_render_tree()?, root.virtual_render_tree()?);
                Ok(())
            }
        };
    }

    generated_footprint!(pin_header_1x01, |c| pin_header::straight(c, &PinHeaderParams::default()), 1);
    generated_footprint!(pin_header_1x10, |c| pin_header::straight(c, &PinHeaderParams { rows: 10, ..Default::default() }), 10);
    generated_footprint!(pin_header_2x20, |c| pin_header::straight(c, &PinHeaderParams { rows: 20, cols: 2, ..Default::default() }), 40);
    generated_footprint!(
        pin_header_1x05_fine_pitch,
        |c| pin_header::straight(c, &PinHeaderParams { rows: 5, pitch: 1.27, drill: 0.65, pad_size: Point::splat(1.0), ..Default::default() }),
        5
    );
    generated_footprint!(jst_ph_smd_2, |c| jst_ph::smd_side(c, 2), 4);
    generated_footprint!(jst_ph_smd_8, |c| jst_ph::smd_side(c, 8), 10);

    fn pad(pad_type: PadType, shape: PadShape, at: (f64, f64), size: (f64, f64)) -> anyhow::Result<Pad> {
        let drill = pad_type.requires_drill().then(|| Point::splat(0.8));
        Ok(Pad::new(PadConfig {
            number: "1".into(),
            pad_type: Some(pad_type),
            shape: Some(shape),
            at: Some(at.into()),
            size: Some(size.into()),
            drill,
            layers: if drill.is_some() { PcbLayer::LAYERS_THT.to_vec() } else { PcbLayer::LAYERS_SMT.to_vec() },
            ..Default::default()
        })?)
    }

    #[test]
    fn rect_and_circle_pads_outline() -> anyhow::Result<()> {
        let root = Node::new(Footprint::new("Outline_Test"));
        root.append(&Node::new(pad(PadType::Smd, PadShape::Rect, (0.0, 0.0), (2.0, 2.0))?))?;
        root.append(&Node::new(pad(PadType::ThruHole, PadShape::Circle, (5.0, 0.0), (1.0, 1.0))?))?;

        assert_eq!(root.calculate_outline(None)?, Outline::new(Point::new(-1.0, -1.0), Point::new(5.5, 1.0)));
        assert_eq!(root.render_list()?.len(), 2);
        Ok(())
    }

    #[test]
    fn outline_of_transformed_subtree_in_root_frame() -> anyhow::Result<()> {
        let root = Node::new(Footprint::new("Transform_Test"));
        let rotation = Node::new(Rotation::new(90.0));
        let mirror = Node::new(Mirror::new(Axis::Y, 0.0));
        root.append(&rotation)?;
        rotation.append(&mirror)?;
        mirror.append(&Node::new(RectLine::new(Point::new(1.0, 1.0), Point::new(3.0, 2.0), PcbLayer::FFab, 0.1)))?;

        // every level covers its local origin: (0..3, 0..2); mirror across y = 0: (0..3, -2..0);
        // rotate 90 with x' = y, y' = -x: (-2..0, -3..0)
        let outline = root.calculate_outline(None)?;
        assert_abs_diff_eq!(outline.min.x, -2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(outline.max.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(outline.min.y, -3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(outline.max.y, 0.0, epsilon = 1e-9);

        let fragments = root.render_list()?;
        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[0], "(fp_line (start -1 -1) (end -1 -3) (layer F.Fab) (width 0.1))");
        Ok(())
    }

    #[test]
    fn translated_pad_renders_in_root_coordinates() -> anyhow::Result<()> {
        let root = Node::new(Footprint::new("Translation_Test"));
        let translation = Node::new(Translation::new(Point::new(1.0, -1.0)));
        root.append(&translation)?;
        let pad_node = Node::new(pad(PadType::Smd, PadShape::Rect, (1.0, 1.0), (1.0, 1.0))?);
        translation.append(&pad_node)?;

        assert_eq!(pad_node.real_position(Point::new(1.0, 1.0))?, Point::new(2.0, 0.0));
        assert!(pad_node.render_list()?[0].starts_with("(pad 1 smd rect (at 2 0)"));
        Ok(())
    }

    #[test]
    fn moving_a_subtree_requires_removal_first() -> anyhow::Result<()> {
        let first = Node::new(Footprint::new("First"));
        let second = Node::new(Footprint::new("Second"));
        let pad_node = Node::new(pad(PadType::Smd, PadShape::Rect, (0.0, 0.0), (1.0, 1.0))?);
        first.append(&pad_node)?;

        assert!(matches!(second.append(&pad_node), Err(IntegrityError::AlreadyParented(_))));
        first.remove(&pad_node);
        second.append(&pad_node)?;
        assert!(first.render_list()?.is_empty());
        assert_eq!(second.render_list()?.len(), 1);
        assert!(pad_node.root_node()?.ptr_eq(&second));
        Ok(())
    }

    #[test]
    fn render_tree_of_footprint() -> anyhow::Result<()> {
        let root = Node::new(Footprint::new("Tree_Test"));
        let translation = Node::new(Translation::new(Point::new(1.0, 2.0)));
        root.append(&translation)?;
        translation.append(&Node::new(RectLine::new(Point::ORIGIN, Point::splat(1.0), PcbLayer::FFab, 0.1)))?;

        assert_eq!(
            root.render_tree()?,
            "+ Footprint(Tree_Test)\n  * Translation(1, 2)\n    * RectLine(start=(0, 0), end=(1, 1), layer=F.Fab, width=0.1)"
        );
        let virtual_tree = root.virtual_render_tree()?;
        assert_eq!(virtual_tree.lines().count(), 7);
        assert!(virtual_tree.ends_with("      * Line(start=(0, 1), end=(0, 0), layer=F.Fab, width=0.1)"));
        Ok(())
    }
}
