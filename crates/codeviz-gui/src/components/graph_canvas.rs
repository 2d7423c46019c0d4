use crate::theme;
use codeviz_core::{GraphEdge, NodeId};
use codeviz_view::{PositionedNode, layout::EDGE_COLOR};
use eframe::egui;
use std::collections::HashMap;

// Responsibility checklist for the custom canvas:
// - Node pills painted at their layout positions with kind colors
// - Pan (drag) and zoom (pinch/scroll), clamped to the original's bounds
// - Straight edges between node centers
// - Click hit-testing reported upward as the node id

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 2.0;

pub struct CanvasOutput {
    pub clicked_node: Option<NodeId>,
    #[allow(dead_code)]
    pub hovered_node: Option<NodeId>,
}

#[derive(Clone, Copy)]
struct DragState {
    start_pan: egui::Vec2,
    start_pos: egui::Pos2,
}

/// Paints the laid-out graph and owns the pan/zoom view transform.
/// Layout coordinates come straight from the layout engine; the canvas
/// never moves nodes, it only moves the camera.
pub struct GraphCanvas {
    zoom: f32,
    pan: egui::Vec2,
    drag_state: Option<DragState>,
}

impl GraphCanvas {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
            drag_state: None,
        }
    }

    /// Reset the viewport; called when a new graph replaces the old one.
    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = egui::Vec2::ZERO;
        self.drag_state = None;
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        nodes: &[PositionedNode],
        edges: &[GraphEdge],
        selected: Option<&NodeId>,
    ) -> CanvasOutput {
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        let origin = rect.min;
        self.handle_zoom(&response, origin);
        self.handle_pan(ui, &response);

        // Lay out every node rect first so edges can anchor to centers.
        let mut node_rects: HashMap<&NodeId, egui::Rect> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let node_rect = self.node_rect(ui, node, origin);
            node_rects.insert(&node.node.id, node_rect);
        }

        let edge_stroke = egui::Stroke::new(
            2.0 * self.zoom,
            theme::to_color32(EDGE_COLOR).gamma_multiply(0.8),
        );
        for edge in edges {
            let (Some(source), Some(target)) =
                (node_rects.get(&edge.source), node_rects.get(&edge.target))
            else {
                // Dangling edges are dropped at load; this only guards
                // against a stale frame during replacement.
                continue;
            };
            painter.line_segment([source.center(), target.center()], edge_stroke);
        }

        let pointer = response.hover_pos();
        let mut hovered_node = None;
        for node in nodes {
            let node_rect = node_rects[&node.node.id];
            if !rect.intersects(node_rect) {
                continue;
            }
            let is_hovered = pointer.is_some_and(|p| node_rect.contains(p));
            if is_hovered {
                hovered_node = Some(node.node.id.clone());
            }
            self.draw_node(&painter, node, node_rect, is_hovered, selected);
        }

        let clicked_node = if response.clicked() {
            hovered_node.clone()
        } else {
            None
        };

        CanvasOutput {
            clicked_node,
            hovered_node,
        }
    }

    fn handle_zoom(&mut self, response: &egui::Response, origin: egui::Pos2) {
        let zoom_delta = response.ctx.input(|i| i.zoom_delta());
        if !response.hovered() || (zoom_delta - 1.0).abs() <= f32::EPSILON {
            return;
        }
        let prev_zoom = self.zoom;
        let new_zoom = (self.zoom * zoom_delta).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - prev_zoom).abs() <= f32::EPSILON {
            return;
        }
        self.zoom = new_zoom;
        // Keep the point under the cursor fixed while zooming.
        if let Some(pointer) = response.hover_pos() {
            let graph_pos = self.screen_to_graph(pointer, origin, prev_zoom);
            let new_screen = self.graph_to_screen(graph_pos, origin);
            self.pan += pointer - new_screen;
        }
    }

    fn handle_pan(&mut self, ui: &egui::Ui, response: &egui::Response) {
        if response.drag_started() {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.drag_state = Some(DragState {
                    start_pan: self.pan,
                    start_pos: pointer,
                });
            }
        }
        if response.dragged() {
            if let (Some(state), Some(pointer)) = (self.drag_state, response.interact_pointer_pos())
            {
                self.pan = state.start_pan + (pointer - state.start_pos);
            }
        }
        if self.drag_state.is_some() && ui.input(|i| !i.pointer.primary_down()) {
            self.drag_state = None;
        }
    }

    fn node_rect(&self, ui: &egui::Ui, node: &PositionedNode, origin: egui::Pos2) -> egui::Rect {
        let style = &node.style;
        let font = egui::FontId::proportional(style.font_size * self.zoom);
        let text_size = ui
            .painter()
            .layout_no_wrap(node.node.label.clone(), font, egui::Color32::WHITE)
            .size();
        let size = text_size
            + egui::vec2(
                2.0 * style.padding_x * self.zoom,
                2.0 * style.padding_y * self.zoom,
            );
        let screen_min = self.graph_to_screen(egui::pos2(node.pos.x, node.pos.y), origin);
        egui::Rect::from_min_size(screen_min, size)
    }

    fn draw_node(
        &self,
        painter: &egui::Painter,
        node: &PositionedNode,
        rect: egui::Rect,
        hovered: bool,
        selected: Option<&NodeId>,
    ) {
        let style = &node.style;
        let radius = style.corner_radius * self.zoom;
        painter.rect_filled(rect, radius, theme::to_color32(style.fill));

        if selected == Some(&node.node.id) {
            painter.rect_stroke(
                rect.expand(2.0),
                radius,
                egui::Stroke::new(2.0, egui::Color32::WHITE),
                egui::StrokeKind::Middle,
            );
        } else if hovered {
            painter.rect_stroke(
                rect,
                radius,
                egui::Stroke::new(1.5, egui::Color32::WHITE.gamma_multiply(0.7)),
                egui::StrokeKind::Middle,
            );
        }

        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            &node.node.label,
            egui::FontId::proportional(style.font_size * self.zoom),
            theme::to_color32(style.text),
        );
    }

    fn graph_to_screen(&self, graph_pos: egui::Pos2, origin: egui::Pos2) -> egui::Pos2 {
        origin + self.pan + graph_pos.to_vec2() * self.zoom
    }

    fn screen_to_graph(&self, screen_pos: egui::Pos2, origin: egui::Pos2, zoom: f32) -> egui::Pos2 {
        let offset = screen_pos - origin - self.pan;
        egui::Pos2::new(offset.x / zoom, offset.y / zoom)
    }
}
