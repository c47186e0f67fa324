use std::{cell::RefCell, rc::Rc, time::Duration};

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use geopick::{
    constants::TILE_SIZE, layers::LayerType, InputEvent, LayerTrait, MapPicker, PickerConfig,
    PickerRenderer, PickerView, Point, TileLayer, Viewport,
};

/// How close (in points) a press must be to the marker to pick it up
const MARKER_HIT_RADIUS: f32 = 18.0;

/// Desktop coordinate picker. Pass a JSON config file as the only argument to
/// override the defaults.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => PickerConfig::from_json_file(&path)?,
        None => PickerConfig::default(),
    };

    let latest = Rc::new(RefCell::new(None));
    let mut picker = MapPicker::new(config)?;
    picker.set_renderer(Box::new(ViewCache(latest.clone())));
    picker.initialize()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_title("geopick"),
        ..Default::default()
    };

    eframe::run_native(
        "geopick-app",
        options,
        Box::new(move |_cc| Box::new(GeopickApp::new(picker, latest))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run window: {}", e))?;

    Ok(())
}

/// Keeps the last view the picker rendered
struct ViewCache(Rc<RefCell<Option<PickerView>>>);

impl PickerRenderer for ViewCache {
    fn render(&mut self, view: &PickerView) {
        *self.0.borrow_mut() = Some(view.clone());
    }
}

struct GeopickApp {
    picker: MapPicker,
    latest: Rc<RefCell<Option<PickerView>>>,
    address_input: String,
    dragging_marker: bool,
}

impl GeopickApp {
    fn new(picker: MapPicker, latest: Rc<RefCell<Option<PickerView>>>) -> Self {
        Self {
            picker,
            latest,
            address_input: String::new(),
            dragging_marker: false,
        }
    }

    fn apply(&mut self, input: InputEvent) {
        if let Err(e) = self.picker.handle_input(input) {
            log::warn!("input rejected: {}", e);
        }
    }

    fn search_panel(&mut self, ui: &mut egui::Ui, view: &PickerView) {
        ui.heading("Address");
        let response = ui.text_edit_singleline(&mut self.address_input);
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Search").clicked() || submitted {
            self.picker.set_address(self.address_input.clone());
            self.picker.submit_search();
        }

        ui.separator();
        let mut chosen = None;
        for (index, place) in view.candidates.iter().enumerate() {
            if ui.link(&place.display_name).clicked() {
                chosen = Some(index);
            }
        }
        if let Some(index) = chosen {
            if let Err(e) = self.picker.choose_candidate(index) {
                log::warn!("could not choose candidate {}: {}", index, e);
            }
        }

        ui.separator();
        ui.heading("Coordinates");
        egui::Grid::new("coordinates").show(ui, |ui| {
            ui.label("Latitude");
            ui.monospace(&view.fields.latitude);
            ui.end_row();
            ui.label("Longitude");
            ui.monospace(&view.fields.longitude);
            ui.end_row();
        });
    }

    fn map_panel(&mut self, ui: &mut egui::Ui, view: &PickerView) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;

        let size = Point::new(rect.width() as f64, rect.height() as f64);
        let Some(viewport) = self.sync_viewport(size) else {
            return;
        };

        painter.rect_filled(rect, 0.0, Color32::from_rgb(226, 230, 222));

        let marker = to_screen(rect, viewport.lat_lng_to_container_point(&view.marker));

        if response.drag_started() {
            let pressed_on_marker = response
                .interact_pointer_pos()
                .is_some_and(|pos| pos.distance(marker) <= MARKER_HIT_RADIUS);
            if pressed_on_marker {
                self.dragging_marker = true;
                self.apply(InputEvent::MarkerDragStart);
            }
        }
        if self.dragging_marker && response.dragged() {
            let delta = response.drag_delta();
            self.apply(InputEvent::MarkerDragByPixels {
                delta: Point::new(delta.x as f64, delta.y as f64),
            });
        }
        if self.dragging_marker && response.drag_released() {
            self.dragging_marker = false;
            self.apply(InputEvent::MarkerDragEnd);
        }

        self.draw_layers(&painter, rect, &viewport, marker, view.dragging);
        if let Some(content) = &view.popup {
            draw_popup(&painter, marker, content);
        }
        if let Some(attribution) = &view.attribution {
            painter.text(
                rect.right_bottom() - Vec2::new(6.0, 4.0),
                Align2::RIGHT_BOTTOM,
                attribution,
                FontId::proportional(11.0),
                Color32::DARK_GRAY,
            );
        }
    }

    /// Keeps the map viewport the same size as the panel
    fn sync_viewport(&mut self, size: Point) -> Option<Viewport> {
        let current = self.picker.map().ok()?.viewport().size;
        if current != size {
            self.apply(InputEvent::Resize { size });
        }
        self.picker.map().ok().map(|map| map.viewport().clone())
    }

    /// Draws the map layers bottom to top
    fn draw_layers(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        viewport: &Viewport,
        marker: Pos2,
        dragging: bool,
    ) {
        let Ok(map) = self.picker.map() else {
            return;
        };
        for layer in map.layers() {
            match layer.layer_type() {
                LayerType::Tile => {
                    if let Some(tiles) = layer.as_any().downcast_ref::<TileLayer>() {
                        draw_tile_grid(painter, rect, viewport, tiles);
                    }
                }
                LayerType::Marker => draw_marker(painter, marker, dragging),
            }
            log::trace!("drew layer {} ({})", layer.name(), layer.id());
        }
    }
}

impl eframe::App for GeopickApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.picker.poll_search();

        let Some(view) = self.latest.borrow().clone() else {
            return;
        };

        egui::SidePanel::left("search_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.search_panel(ui, &view));

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(format!(
                "Center: {} | Zoom: {}{}",
                view.center,
                view.zoom,
                if view.searching { " | searching..." } else { "" }
            ));
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.map_panel(ui, &view));

        if let Ok(events) = self.picker.process_events() {
            for event in events {
                log::debug!("map event: {:?}", event);
            }
        }

        if view.searching {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

fn draw_tile_grid(painter: &egui::Painter, rect: Rect, viewport: &Viewport, layer: &TileLayer) {
    let tile_size = TILE_SIZE as f32;
    let stroke = Stroke::new(1.0, Color32::from_gray(200));

    for tile in layer.visible_tiles(viewport) {
        let corner = to_screen(rect, viewport.lat_lng_to_container_point(&tile.to_lat_lng()));
        let tile_rect = Rect::from_min_size(corner, Vec2::splat(tile_size));
        painter.rect_stroke(tile_rect.intersect(rect), 0.0, stroke);
        painter.text(
            tile_rect.min + Vec2::new(4.0, 4.0),
            Align2::LEFT_TOP,
            format!("{}/{}/{}", tile.z, tile.x, tile.y),
            FontId::monospace(10.0),
            Color32::from_gray(160),
        );
    }
}

fn to_screen(rect: Rect, point: Point) -> Pos2 {
    rect.min + Vec2::new(point.x as f32, point.y as f32)
}

fn draw_marker(painter: &egui::Painter, at: Pos2, dragging: bool) {
    let fill = if dragging {
        Color32::from_rgb(255, 140, 0)
    } else {
        Color32::from_rgb(40, 120, 220)
    };
    let head = at - Vec2::new(0.0, 20.0);
    painter.line_segment([head, at], Stroke::new(3.0, fill));
    painter.circle_filled(head, 9.0, fill);
    painter.circle_filled(head, 3.5, Color32::WHITE);
}

fn draw_popup(painter: &egui::Painter, anchor: Pos2, content: &str) {
    let text = content.replace(geopick::ui::POPUP_LINE_BREAK, "\n");
    let galley = painter.layout_no_wrap(text, FontId::monospace(12.0), Color32::BLACK);
    let padding = Vec2::splat(8.0);
    let size = galley.size() + padding * 2.0;
    let min = anchor - Vec2::new(size.x / 2.0, size.y + 36.0);
    let popup_rect = Rect::from_min_size(min, size);

    painter.rect_filled(popup_rect, 4.0, Color32::WHITE);
    painter.rect_stroke(popup_rect, 4.0, Stroke::new(1.0, Color32::GRAY));
    painter.galley(popup_rect.min + padding, galley, Color32::BLACK);
}
