use eframe::egui;
use egui::{Color32, Pos2, Rect, Sense, Stroke};

use crate::canvas::{GridLayout, Shape};
use crate::components::colors::{CellColor, ColorEngine, Rgb};
use crate::components::tools::PaintMode;
use crate::session::{Effect, PaintSession, SessionEvent};
use crate::settings::AppSettings;
use crate::{log_info, log_warn};

const CANVAS_BACKGROUND: Color32 = Color32::WHITE;
const GRID_LINE_COLOR: Color32 = Color32::from_gray(200);
const WORKSPACE_BACKGROUND: Color32 = Color32::from_gray(48);

/// The eframe application: toolbar, the cell canvas, and the blocking notice
/// for invalid input. All drawing rules live in [`PaintSession`].
pub struct PixelGridApp {
    session: PaintSession,
    /// Picker value, kept separately so the picker can show a color while a
    /// special mode is active.
    picker_rgb: [u8; 3],
    size_input: String,
    grid_lines: bool,
    fullscreen: bool,
    /// Last cell the pointer visited during the current stroke.
    last_cell: Option<usize>,
    notice: Option<String>,
}

impl PixelGridApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        Self::with_session(
            PaintSession::new(settings.session_config(), ColorEngine::new()),
            &settings,
        )
    }

    fn with_session(session: PaintSession, settings: &AppSettings) -> Self {
        log_info!(
            "canvas ready: {}x{} {}, color {}",
            session.grid().size(),
            session.grid().size(),
            session.grid().shape(),
            session.modes().solid_color().to_hex()
        );
        Self {
            picker_rgb: session.modes().solid_color().to_array(),
            size_input: session.grid().size().to_string(),
            session,
            grid_lines: settings.grid_lines,
            fullscreen: settings.fullscreen,
            last_cell: None,
            notice: None,
        }
    }

    fn send(&mut self, event: SessionEvent) {
        for effect in self.session.dispatch(event) {
            match effect {
                // Cell colors are read straight from the session grid each frame.
                Effect::ApplyColor { .. } => {}
                Effect::RegenerateGrid { size, .. } => {
                    self.last_cell = None;
                    self.size_input = size.to_string();
                }
                Effect::InvalidInput(message) => {
                    self.notice = Some(message);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Toolbar
    // ------------------------------------------------------------------------

    fn show_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal_wrapped(|ui| {
            if egui::color_picker::color_edit_button_srgb(ui, &mut self.picker_rgb).changed() {
                self.send(SessionEvent::SolidColorChosen(Rgb::from_array(self.picker_rgb)));
            }

            ui.separator();
            let active = self.session.modes().mode();
            for mode in PaintMode::SPECIAL {
                if ui.selectable_label(active == mode, mode.label()).clicked() {
                    self.send(SessionEvent::ModeToggled(mode));
                }
            }

            ui.separator();
            let draw_label = if self.session.modes().draw_enabled() { "Draw: on" } else { "Draw: off" };
            if ui.selectable_label(self.session.modes().draw_enabled(), draw_label).clicked() {
                self.send(SessionEvent::DrawToggled);
            }
            if ui.selectable_label(self.grid_lines, "Grid lines").clicked() {
                self.grid_lines = !self.grid_lines;
            }

            ui.separator();
            let can_undo = self.session.history().can_undo();
            let can_redo = self.session.history().can_redo();
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                self.send(SessionEvent::UndoRequested);
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                self.send(SessionEvent::RedoRequested);
            }

            ui.separator();
            let mut shape = self.session.grid().shape();
            egui::ComboBox::from_id_source("cell_shape")
                .selected_text(shape.label())
                .show_ui(ui, |ui| {
                    for s in Shape::ALL {
                        ui.selectable_value(&mut shape, s, s.label());
                    }
                });
            if shape != self.session.grid().shape() {
                self.send(SessionEvent::ShapeChanged(shape));
            }

            ui.label("Size");
            let field = ui.add(egui::TextEdit::singleline(&mut self.size_input).desired_width(40.0));
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Resize").clicked() || submitted {
                self.send(SessionEvent::GridResizeRequested(self.size_input.clone()));
            }
            if ui.button("Reset").clicked() {
                self.send(SessionEvent::ResetRequested);
            }

            ui.separator();
            if ui.selectable_label(self.fullscreen, "Fullscreen").clicked() {
                self.toggle_fullscreen(ctx);
            }
        });
    }

    /// Follow the window's real fullscreen state; the window manager or Esc
    /// can leave fullscreen without going through the toolbar.
    fn sync_fullscreen(&mut self, ctx: &egui::Context) {
        if let Some(fullscreen) = ctx.input(|i| i.viewport().fullscreen) {
            self.fullscreen = fullscreen;
        }
    }

    fn toggle_fullscreen(&mut self, ctx: &egui::Context) {
        self.fullscreen = !self.fullscreen;
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.fullscreen));
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Don't steal Ctrl+Z from the size field.
        if ctx.wants_keyboard_input() {
            return;
        }
        let (undo, redo, fullscreen) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            let undo = cmd && !i.modifiers.shift && i.key_pressed(egui::Key::Z);
            let redo = cmd
                && (i.key_pressed(egui::Key::Y) || (i.modifiers.shift && i.key_pressed(egui::Key::Z)));
            (undo, redo, i.key_pressed(egui::Key::F11))
        });
        if undo {
            self.send(SessionEvent::UndoRequested);
        }
        if redo {
            self.send(SessionEvent::RedoRequested);
        }
        if fullscreen {
            self.toggle_fullscreen(ctx);
        }
    }

    // ------------------------------------------------------------------------
    // Canvas
    // ------------------------------------------------------------------------

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let layout = GridLayout::fit(response.rect, self.session.grid().size());

        self.handle_pointer(ui, &response, &layout);

        painter.rect_filled(response.rect, 0.0, WORKSPACE_BACKGROUND);
        painter.rect_filled(layout.bounds(), 0.0, CANVAS_BACKGROUND);
        let shape = self.session.grid().shape();
        for (id, color) in self.session.grid().iter() {
            let rect = layout.cell_rect(id.index);
            paint_cell(&painter, rect, shape, color);
            if self.grid_lines {
                painter.rect_stroke(rect, 0.0, Stroke::new(1.0, GRID_LINE_COLOR));
            }
        }
    }

    /// Translate pointer (and touch, which egui reports as the primary
    /// pointer) into drag-start / cell-entered / drag-end events.
    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, layout: &GridLayout) {
        let (pressed, down, released, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let hovered = pos.and_then(|p| layout.cell_at(p));

        if pressed && response.hovered() {
            if let Some(index) = hovered {
                self.last_cell = Some(index);
                self.emit_for_index(index, SessionEvent::CellDragStart);
            }
        } else if down && self.session.is_dragging() && hovered != self.last_cell {
            self.last_cell = hovered;
            if let Some(index) = hovered {
                self.emit_for_index(index, SessionEvent::CellEntered);
            }
        }

        if released {
            self.last_cell = None;
            self.send(SessionEvent::CellDragEnd);
        }
    }

    fn emit_for_index(&mut self, index: usize, make: fn(crate::canvas::CellId) -> SessionEvent) {
        match self.session.grid().cell_id(index) {
            Some(id) => self.send(make(id)),
            None => log_warn!("pointer mapped to cell {} outside the grid", index),
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else { return };
        egui::Window::new("Invalid input")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.notice = None;
                }
            });
    }
}

/// Draw one cell's fill inside its bounding square.
fn paint_cell(painter: &egui::Painter, rect: Rect, shape: Shape, color: CellColor) {
    let Some(c) = color else { return };
    let fill = Color32::from_rgb(c.r, c.g, c.b);
    match shape {
        Shape::Square => {
            painter.rect_filled(rect, 0.0, fill);
        }
        Shape::Circle => {
            painter.circle_filled(rect.center(), rect.width() / 2.0, fill);
        }
        Shape::Triangle => {
            let points = vec![
                Pos2::new(rect.center().x, rect.top()),
                rect.right_bottom(),
                rect.left_bottom(),
            ];
            painter.add(egui::Shape::convex_polygon(points, fill, Stroke::NONE));
        }
        Shape::Diamond => {
            let center = rect.center();
            let points = vec![
                Pos2::new(center.x, rect.top()),
                Pos2::new(rect.right(), center.y),
                Pos2::new(center.x, rect.bottom()),
                Pos2::new(rect.left(), center.y),
            ];
            painter.add(egui::Shape::convex_polygon(points, fill, Stroke::NONE));
        }
    }
}

impl eframe::App for PixelGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_fullscreen(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.show_toolbar(ui, ctx);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                // While the notice is open the canvas ignores strokes.
                if self.notice.is_none() {
                    self.show_canvas(ui);
                } else {
                    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
                    ui.painter().rect_filled(rect, 0.0, WORKSPACE_BACKGROUND);
                }
            });

        self.show_notice(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;

    fn app() -> PixelGridApp {
        PixelGridApp::with_session(
            PaintSession::new(SessionConfig::default(), ColorEngine::with_seed(1)),
            &AppSettings::default(),
        )
    }

    #[test]
    fn invalid_resize_opens_notice() {
        let mut app = app();
        app.size_input = "abc".to_string();
        app.send(SessionEvent::GridResizeRequested(app.size_input.clone()));
        assert_eq!(
            app.notice.as_deref(),
            Some("Please enter a valid number between 1 and 100.")
        );
        assert_eq!(app.session.grid().size(), 16);
    }

    #[test]
    fn regenerate_syncs_size_field() {
        let mut app = app();
        app.send(SessionEvent::GridResizeRequested(" 24 ".to_string()));
        assert_eq!(app.size_input, "24");
        assert!(app.notice.is_none());
    }

    fn input_with_fullscreen(fullscreen: Option<bool>) -> egui::RawInput {
        let mut raw = egui::RawInput::default();
        raw.viewports.insert(
            egui::ViewportId::ROOT,
            egui::ViewportInfo {
                fullscreen,
                ..Default::default()
            },
        );
        raw
    }

    #[test]
    fn fullscreen_flag_follows_window_state() {
        let mut app = app();
        app.fullscreen = true;
        let ctx = egui::Context::default();
        let _ = ctx.run(input_with_fullscreen(Some(false)), |ctx| app.sync_fullscreen(ctx));
        assert!(!app.fullscreen);

        let _ = ctx.run(input_with_fullscreen(Some(true)), |ctx| app.sync_fullscreen(ctx));
        assert!(app.fullscreen);

        // No report from the backend keeps the last known state.
        let _ = ctx.run(input_with_fullscreen(None), |ctx| app.sync_fullscreen(ctx));
        assert!(app.fullscreen);
    }

    #[test]
    fn picker_starts_at_solid_color() {
        let settings = AppSettings {
            solid_color: Rgb::new(1, 2, 3),
            ..AppSettings::default()
        };
        let app = PixelGridApp::with_session(
            PaintSession::new(settings.session_config(), ColorEngine::with_seed(1)),
            &settings,
        );
        assert_eq!(app.picker_rgb, [1, 2, 3]);
    }
}
