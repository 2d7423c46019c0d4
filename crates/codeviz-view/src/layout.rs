use codeviz_core::{GraphNode, NodeKind};
use serde::{Deserialize, Serialize};

/// Kind buckets are stacked top to bottom in this fixed priority order;
/// unrecognized kinds land in the trailing `Other` bucket.
const BUCKET_ORDER: [NodeKind; 6] = [
    NodeKind::Repo,
    NodeKind::File,
    NodeKind::Class,
    NodeKind::Function,
    NodeKind::Module,
    NodeKind::Other,
];

const ROW_HEIGHT: f32 = 100.0;
const BUCKET_GAP: f32 = 80.0;
const FILE_X_SPACING: f32 = 250.0;
const DEFAULT_X_SPACING: f32 = 180.0;
const CENTER_MARGIN: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// RGB color, kept toolkit-agnostic so the layout stays testable without a
/// GUI context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

const REPO_COLOR: Color = Color::rgb(0x63, 0x66, 0xf1);
const FILE_COLOR: Color = Color::rgb(0x22, 0xc5, 0x5e);
const FUNCTION_COLOR: Color = Color::rgb(0xea, 0xb3, 0x08);
const CLASS_COLOR: Color = Color::rgb(0xef, 0x44, 0x44);
const MODULE_COLOR: Color = Color::rgb(0x8b, 0x5c, 0xf6);
const FALLBACK_COLOR: Color = Color::rgb(0x6b, 0x72, 0x80);
const TEXT_COLOR: Color = Color::rgb(0xff, 0xff, 0xff);

/// Edge strokes share the repo indigo.
pub const EDGE_COLOR: Color = REPO_COLOR;

/// Visual attributes of a laid-out node. All values are fixed constants per
/// kind; nothing here depends on viewport or interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fill: Color,
    pub text: Color,
    pub padding_x: f32,
    pub padding_y: f32,
    pub corner_radius: f32,
    pub font_size: f32,
}

impl NodeStyle {
    fn for_kind(kind: NodeKind) -> Self {
        Self {
            fill: kind_color(kind),
            text: TEXT_COLOR,
            padding_x: 15.0,
            padding_y: 10.0,
            corner_radius: 8.0,
            font_size: 12.0,
        }
    }
}

pub fn kind_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Repo => REPO_COLOR,
        NodeKind::File => FILE_COLOR,
        NodeKind::Function => FUNCTION_COLOR,
        NodeKind::Class => CLASS_COLOR,
        NodeKind::Module => MODULE_COLOR,
        NodeKind::Other => FALLBACK_COLOR,
    }
}

/// A node with its computed position and style attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub node: GraphNode,
    pub pos: Point,
    pub style: NodeStyle,
}

fn bucket_capacity(kind: NodeKind) -> usize {
    match kind {
        NodeKind::Repo => 1,
        NodeKind::File => 4,
        _ => 6,
    }
}

fn x_spacing(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::File => FILE_X_SPACING,
        _ => DEFAULT_X_SPACING,
    }
}

/// Position and style every node for the given viewport width.
///
/// Pure and deterministic: the same node list (same order) and the same
/// width always produce identical output. Nodes are partitioned into kind
/// buckets preserving their relative order, buckets are stacked vertically
/// in `BUCKET_ORDER`, and each bucket wraps into rows of its fixed capacity.
/// Empty buckets contribute no vertical gap.
pub fn layout(nodes: &[GraphNode], viewport_width: f32) -> Vec<PositionedNode> {
    let mut buckets: [Vec<&GraphNode>; BUCKET_ORDER.len()] = Default::default();
    for node in nodes {
        let slot = BUCKET_ORDER
            .iter()
            .position(|kind| *kind == node.kind)
            .unwrap_or(BUCKET_ORDER.len() - 1);
        buckets[slot].push(node);
    }

    let center_offset = viewport_width / 2.0 - CENTER_MARGIN;
    let mut positioned = Vec::with_capacity(nodes.len());
    let mut y_offset = 0.0;

    for (slot, bucket) in buckets.iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        let kind = BUCKET_ORDER[slot];
        let capacity = bucket_capacity(kind);
        let spacing = x_spacing(kind);
        let style = NodeStyle::for_kind(kind);

        for (index, node) in bucket.iter().enumerate() {
            let row = index / capacity;
            let col = index % capacity;
            let x = center_offset - (capacity as f32 * spacing) / 2.0 + col as f32 * spacing;
            let y = y_offset + row as f32 * ROW_HEIGHT;
            positioned.push(PositionedNode {
                node: (*node).clone(),
                pos: Point::new(x, y),
                style,
            });
        }

        let rows = bucket.len().div_ceil(capacity);
        y_offset += rows as f32 * ROW_HEIGHT + BUCKET_GAP;
    }

    positioned
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeviz_core::NodeId;
    use proptest::prelude::*;

    fn node(id: &str, kind: NodeKind) -> GraphNode {
        GraphNode {
            id: NodeId::new(id),
            kind,
            label: id.to_string(),
            full_path: None,
            start_line: None,
            end_line: None,
        }
    }

    fn pos_of<'a>(laid: &'a [PositionedNode], id: &str) -> &'a PositionedNode {
        laid.iter()
            .find(|p| p.node.id.as_str() == id)
            .expect("node missing from layout")
    }

    #[test]
    fn test_buckets_stack_in_priority_order() {
        let nodes = vec![
            node("f1", NodeKind::Function),
            node("file1", NodeKind::File),
            node("repo", NodeKind::Repo),
            node("c1", NodeKind::Class),
            node("m1", NodeKind::Module),
        ];
        let laid = layout(&nodes, 1280.0);

        let repo_y = pos_of(&laid, "repo").pos.y;
        let file_y = pos_of(&laid, "file1").pos.y;
        let class_y = pos_of(&laid, "c1").pos.y;
        let func_y = pos_of(&laid, "f1").pos.y;
        let module_y = pos_of(&laid, "m1").pos.y;

        assert!(repo_y < file_y);
        assert!(file_y < class_y);
        assert!(class_y < func_y);
        assert!(func_y < module_y);
    }

    #[test]
    fn test_file_bucket_wraps_after_four_columns() {
        let nodes: Vec<GraphNode> = (0..5)
            .map(|i| node(&format!("file{i}"), NodeKind::File))
            .collect();
        let laid = layout(&nodes, 1280.0);

        let first = pos_of(&laid, "file0");
        let fifth = pos_of(&laid, "file4");
        assert_eq!(fifth.pos.y, first.pos.y + 100.0);
        assert_eq!(fifth.pos.x, first.pos.x);
    }

    #[test]
    fn test_columns_advance_by_kind_spacing() {
        let nodes = vec![
            node("file0", NodeKind::File),
            node("file1", NodeKind::File),
            node("f0", NodeKind::Function),
            node("f1", NodeKind::Function),
        ];
        let laid = layout(&nodes, 1280.0);

        let file_dx = pos_of(&laid, "file1").pos.x - pos_of(&laid, "file0").pos.x;
        let func_dx = pos_of(&laid, "f1").pos.x - pos_of(&laid, "f0").pos.x;
        assert_eq!(file_dx, 250.0);
        assert_eq!(func_dx, 180.0);
    }

    #[test]
    fn test_empty_buckets_contribute_no_gap() {
        let with_gap = layout(
            &[node("repo", NodeKind::Repo), node("m1", NodeKind::Module)],
            1280.0,
        );
        // Repo occupies one row (100) plus one inter-bucket gap (80).
        assert_eq!(pos_of(&with_gap, "m1").pos.y, 180.0);
    }

    #[test]
    fn test_unknown_kind_lands_last_with_fallback_color() {
        let nodes = vec![node("x", NodeKind::Other), node("repo", NodeKind::Repo)];
        let laid = layout(&nodes, 1280.0);

        let other = pos_of(&laid, "x");
        assert!(other.pos.y > pos_of(&laid, "repo").pos.y);
        assert_eq!(other.style.fill, Color::rgb(0x6b, 0x72, 0x80));
    }

    #[test]
    fn test_row_is_centered_on_viewport() {
        let laid = layout(&[node("repo", NodeKind::Repo)], 1600.0);
        // center = 1600/2 - 400 = 400; single column at -capacity*spacing/2.
        assert_eq!(pos_of(&laid, "repo").pos.x, 400.0 - 180.0 / 2.0);
    }

    #[test]
    fn test_relative_order_within_bucket_is_preserved() {
        let nodes: Vec<GraphNode> = ["b", "a", "c"]
            .iter()
            .map(|id| node(id, NodeKind::Function))
            .collect();
        let laid = layout(&nodes, 1280.0);
        let ids: Vec<&str> = laid.iter().map(|p| p.node.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    fn arb_kind() -> impl Strategy<Value = NodeKind> {
        prop_oneof![
            Just(NodeKind::Repo),
            Just(NodeKind::File),
            Just(NodeKind::Class),
            Just(NodeKind::Function),
            Just(NodeKind::Module),
            Just(NodeKind::Other),
        ]
    }

    fn arb_nodes() -> impl Strategy<Value = Vec<GraphNode>> {
        prop::collection::vec(("[a-z]{1,8}", arb_kind()), 0..40).prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (name, kind))| node(&format!("{name}-{i}"), kind))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_layout_is_deterministic(nodes in arb_nodes(), width in 320.0f32..3840.0) {
            let first = layout(&nodes, width);
            let second = layout(&nodes, width);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_every_node_is_placed_exactly_once(nodes in arb_nodes(), width in 320.0f32..3840.0) {
            let laid = layout(&nodes, width);
            prop_assert_eq!(laid.len(), nodes.len());

            let mut ids: Vec<&str> = laid.iter().map(|p| p.node.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), nodes.len());
        }
    }
}
