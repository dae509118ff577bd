//! Main window UI
//!
//! One egui app hosting the whole session: the toolbar, the full-screen
//! selection view over the frozen screenshot, and the editing canvas. All
//! session mutation happens here, on the UI event thread.

use crate::ExportCommand;
use capture::DesktopCapture;
use crossbeam_channel::Sender;
use eframe::egui;
use export::{copy_to_clipboard, ExportFormat};
use parking_lot::Mutex;
use raster::Point;
use session::{Session, SessionState, Settings, Tool};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// Delay between minimizing the main window and snapshotting the desktop,
/// so the minimize animation is not part of the capture.
const CAPTURE_DELAY: Duration = Duration::from_millis(300);

/// Export state shared with the worker thread.
#[derive(Default)]
pub struct ExportShared {
    pub status: Option<String>,
    pub in_flight: bool,
}

pub struct SniplineApp {
    session: Session,
    settings: Settings,
    capture_source: DesktopCapture,
    cmd_tx: Sender<ExportCommand>,
    shared: Arc<Mutex<ExportShared>>,
    status: String,
    canvas_texture: Option<egui::TextureHandle>,
    overlay_texture: Option<egui::TextureHandle>,
    pending_capture: Option<Instant>,
    last_countdown_tick: Instant,
}

impl SniplineApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        session: Session,
        settings: Settings,
        cmd_tx: Sender<ExportCommand>,
        shared: Arc<Mutex<ExportShared>>,
    ) -> Self {
        Self {
            session,
            settings,
            capture_source: DesktopCapture::new(),
            cmd_tx,
            shared,
            status: "Ready".to_string(),
            canvas_texture: None,
            overlay_texture: None,
            pending_capture: None,
            last_countdown_tick: Instant::now(),
        }
    }

    fn arm_capture(&mut self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
        self.pending_capture = Some(Instant::now() + CAPTURE_DELAY);
    }

    fn perform_capture(&mut self, ctx: &egui::Context) {
        self.pending_capture = None;
        match self.session.begin_capture(&self.capture_source) {
            Ok(()) => {
                self.overlay_texture = None;
                ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));
            }
            Err(e) => {
                // Cannot read the display or allocate the backing frame:
                // unrecoverable environment failure.
                error!(error = %e, "desktop capture failed, exiting");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn leave_fullscreen(&mut self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
        self.overlay_texture = None;
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        let undo = ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z));

        if escape {
            let was_selecting = self.session.state() == SessionState::Selecting;
            if self.session.cancel() {
                if was_selecting {
                    self.leave_fullscreen(ctx);
                }
                self.status = "Cancelled".to_string();
            }
        }

        if undo && self.session.state() == SessionState::Editing {
            match self.session.undo() {
                Ok(()) => {
                    self.status = format!("Undo ({} left)", self.session.store().cursor());
                }
                Err(e) if e.is_user_correctable() => {
                    self.status = e.to_string();
                }
                Err(e) => warn!(error = %e, "undo rejected"),
            }
        }
    }

    fn drain_export_status(&mut self) {
        let mut shared = self.shared.lock();
        if let Some(status) = shared.status.take() {
            self.status = status;
        }
    }

    fn on_save_clicked(&mut self) {
        let Some(frame) = self.session.displayed_frame() else {
            return;
        };
        let dialog = rfd::FileDialog::new()
            .add_filter(ExportFormat::Png.label(), &[ExportFormat::Png.extension()])
            .add_filter(ExportFormat::Bmp.label(), &[ExportFormat::Bmp.extension()])
            .set_file_name("snip.png");
        let Some(path) = dialog.save_file() else {
            // User cancelled; session state is unaffected.
            return;
        };

        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bmp") => ExportFormat::Bmp,
            _ => ExportFormat::Png,
        };

        self.shared.lock().in_flight = true;
        self.status = "Saving...".to_string();
        if self
            .cmd_tx
            .send(ExportCommand::Save {
                frame: frame.clone(),
                path,
                format,
            })
            .is_err()
        {
            self.shared.lock().in_flight = false;
            self.status = "Save failed: export worker is gone".to_string();
        }
    }

    fn on_copy_clicked(&mut self) {
        let Some(frame) = self.session.displayed_frame() else {
            return;
        };
        match copy_to_clipboard(frame) {
            Ok(()) => self.status = "Copied to clipboard".to_string(),
            Err(e) => self.status = format!("Copy failed: {e}"),
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let editing = self.session.state() == SessionState::Editing;

        ui.horizontal(|ui| {
            if ui.button("New").clicked() {
                self.arm_capture(ctx);
            }

            let delay_label = if self.session.state() == SessionState::CountdownPending {
                format!("Delay {}", self.session.countdown())
            } else {
                "Delay".to_string()
            };
            if ui.button(delay_label).clicked() && self.session.start_countdown().is_ok() {
                self.last_countdown_tick = Instant::now();
                self.status = "Capturing after delay...".to_string();
            }

            ui.separator();

            if ui.add_enabled(editing, egui::Button::new("Save")).clicked() {
                self.on_save_clicked();
            }
            if ui.add_enabled(editing, egui::Button::new("Copy")).clicked() {
                self.on_copy_clicked();
            }
            if ui.add_enabled(editing, egui::Button::new("Undo")).clicked() {
                match self.session.undo() {
                    Ok(()) => self.status = "Undone".to_string(),
                    Err(e) => self.status = e.to_string(),
                }
            }

            ui.separator();

            for tool in Tool::ALL {
                let selected = self.session.active_tool() == Some(tool);
                if ui
                    .add_enabled(editing, egui::SelectableLabel::new(selected, tool.label()))
                    .clicked()
                {
                    // Selecting a tool deselects the previous one; clicking
                    // the active tool puts it down.
                    self.session
                        .select_tool(if selected { None } else { Some(tool) });
                }
            }

            ui.separator();

            let mut drop_shadow = self.settings.drop_shadow;
            if ui.checkbox(&mut drop_shadow, "Drop shadow").changed() {
                self.settings.drop_shadow = drop_shadow;
                self.session.set_drop_shadow(drop_shadow);
                if let Err(e) = self.settings.save() {
                    warn!(error = %e, "could not persist settings");
                }
            }
        });

        ui.label(&self.status);
    }

    fn editing_canvas(&mut self, ui: &mut egui::Ui) {
        let Some(frame) = self.session.displayed_frame() else {
            ui.label("Take a new capture to start annotating.");
            return;
        };

        let size = [frame.width() as usize, frame.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, frame.data());
        let texture = self.canvas_texture.get_or_insert_with(|| {
            ui.ctx()
                .load_texture("canvas", color_image.clone(), egui::TextureOptions::NEAREST)
        });
        texture.set(color_image, egui::TextureOptions::NEAREST);

        let image = egui::Image::new(&*texture)
            .fit_to_exact_size(egui::vec2(size[0] as f32, size[1] as f32))
            .sense(egui::Sense::click_and_drag());
        let response = ui.add(image);

        // Pointer positions are in window coordinates; the frame is blitted
        // at the image rect's origin, so translate before hit-testing.
        let origin = response.rect.min;
        let to_frame =
            |pos: egui::Pos2| Point::new((pos.x - origin.x) as i32, (pos.y - origin.y) as i32);

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                match self.session.pointer_down(to_frame(pos)) {
                    Ok(()) => {}
                    Err(e) if e.is_user_correctable() => self.status = e.to_string(),
                    Err(e) => warn!(error = %e, "stroke rejected"),
                }
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session.pointer_move(to_frame(pos));
            }
        }
        if response.drag_stopped() {
            self.commit_stroke();
        }

        // The release is not always delivered when the button comes up
        // outside the window; poll for it while a stroke is active.
        if self.session.stroke_active() && !ui.ctx().input(|i| i.pointer.any_down()) {
            self.commit_stroke();
        }
    }

    fn commit_stroke(&mut self) {
        match self.session.pointer_up() {
            Ok(()) => {}
            Err(e) if e.is_user_correctable() => self.status = e.to_string(),
            Err(e) => warn!(error = %e, "commit rejected"),
        }
    }

    fn selection_view(&mut self, ctx: &egui::Context) {
        let Some(overlay) = self.session.selection_overlay() else {
            return;
        };

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let size = [overlay.width() as usize, overlay.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, overlay.data());
                let texture = self.overlay_texture.get_or_insert_with(|| {
                    ctx.load_texture("overlay", color_image.clone(), egui::TextureOptions::NEAREST)
                });
                texture.set(color_image, egui::TextureOptions::NEAREST);

                let image = egui::Image::new(&*texture)
                    .fit_to_exact_size(ui.available_size())
                    .sense(egui::Sense::click_and_drag());
                let response = ui.add(image);

                // Map window coordinates to screenshot pixels; the overlay
                // may be scaled to fit the viewport.
                let rect = response.rect;
                let scale_x = overlay.width() as f32 / rect.width().max(1.0);
                let scale_y = overlay.height() as f32 / rect.height().max(1.0);
                let to_overlay = |pos: egui::Pos2| {
                    Point::new(
                        ((pos.x - rect.min.x) * scale_x) as i32,
                        ((pos.y - rect.min.y) * scale_y) as i32,
                    )
                };

                if response.drag_started() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.session.selection_begin(to_overlay(pos));
                    }
                }
                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.session.selection_update(to_overlay(pos));
                    }
                }
                if response.drag_stopped() {
                    self.finish_selection(ctx);
                }
            });
    }

    fn finish_selection(&mut self, ctx: &egui::Context) {
        self.leave_fullscreen(ctx);
        match self.session.selection_end() {
            Ok(region) => {
                self.canvas_texture = None;
                self.status = format!("Current snip: {}x{}", region.width, region.height);
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                    "Snipline - Current Snip: {}x{}",
                    region.width, region.height
                )));
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                    (region.width as f32 + 20.0).max(593.0),
                    region.height as f32 + 92.0,
                )));
            }
            Err(e) if e.is_user_correctable() => {
                self.status = e.to_string();
            }
            Err(e) => {
                error!(error = %e, "selection failed");
                self.status = e.to_string();
            }
        }
    }

    fn tick_countdown(&mut self, ctx: &egui::Context) {
        if self.session.state() != SessionState::CountdownPending {
            return;
        }
        if self.last_countdown_tick.elapsed() >= Duration::from_secs(1) {
            self.last_countdown_tick = Instant::now();
            if self.session.tick_countdown() {
                self.arm_capture(ctx);
                return;
            }
        }
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl eframe::App for SniplineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_export_status();
        self.handle_keys(ctx);
        self.tick_countdown(ctx);

        if let Some(due) = self.pending_capture {
            if Instant::now() >= due {
                self.perform_capture(ctx);
            } else {
                ctx.request_repaint_after(Duration::from_millis(10));
            }
        }

        if self.session.state() == SessionState::Selecting {
            self.selection_view(ctx);
        } else {
            egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
                self.toolbar(ui, ctx);
            });
            egui::CentralPanel::default().show(ctx, |ui| {
                if self.session.state() == SessionState::Editing {
                    self.editing_canvas(ui);
                } else {
                    ui.label("Click New to capture a region of the screen.");
                }
            });
        }

        if self.session.stroke_active() || self.session.state() == SessionState::Selecting {
            // Compensating poll interval while raster work is live.
            ctx.request_repaint_after(Duration::from_millis(5));
        }
        if self.shared.lock().in_flight {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
