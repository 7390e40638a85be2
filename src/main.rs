//! Slot Ring entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use slot_ring::hud::{HudSnapshot, Modal};
    use slot_ring::renderer::{DrawList, SdfRenderState, Viewport, draw_scene};
    use slot_ring::sim::{Game, LoopControl};
    use slot_ring::{Color, GameConfig, GpuError, Settings};

    /// Resting light shadows, restored when a flash ends
    const LIGHT_SHADOWS: [&str; 2] = [
        "200px 0px 100px rgba(255, 255, 255, 0.8)",
        "-80px 0px 100px rgba(255, 255, 255, 0.8)",
    ];
    const LIGHT_OFFSETS: [&str; 2] = ["200px 0px 100px", "-80px 0px 100px"];

    /// Browser host holding the game and its presentation state
    struct Host {
        game: Game,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        draw_list: DrawList,
        canvas: HtmlCanvasElement,
        last_time: f64,
        last_hud: Option<HudSnapshot>,
        /// An animation frame is scheduled
        running: bool,
    }

    impl Host {
        /// Canvas client coordinates to play-field coordinates
        fn to_field(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let local = Vec2::new(
                client_x as f32 - rect.left() as f32,
                client_y as f32 - rect.top() as f32,
            );
            let viewport = Viewport::fit(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            );
            viewport.to_field(local)
        }

        /// Advance, draw and report whether to keep looping
        fn frame(&mut self, time: f64) -> LoopControl {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                slot_ring::consts::SIM_DT
            };
            self.last_time = time;

            let control = self.game.frame(dt);
            self.render();
            self.update_hud();
            control
        }

        fn render(&mut self) {
            draw_scene(&self.game.session, &self.settings, &mut self.draw_list);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.draw_list) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Push indicator changes to the DOM
        fn update_hud(&mut self) {
            let hud = HudSnapshot::from_session(&self.game.session, &self.settings);
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let previous = self.last_hud.take();

            if previous.as_ref().map(|p| p.score) != Some(hud.score) {
                set_text(&document, "score", &hud.score.to_string());
            }
            if previous.as_ref().map(|p| p.lives) != Some(hud.lives) {
                set_text(&document, "lives", &hud.lives.to_string());
            }
            if previous.as_ref().map(|p| p.life_cells) != Some(hud.life_cells) {
                for_each_element(&document, ".bar", |i, bar| {
                    let lit = hud.life_cells.get(i).copied().unwrap_or(false);
                    let background = if lit { Color::LIFE.to_css() } else { "transparent".to_string() };
                    let _ = bar.style().set_property("background", &background);
                });
            }
            if previous.as_ref().map(|p| p.flash) != Some(hud.flash) {
                apply_flash(&document, hud.flash);
            }
            if previous.as_ref().map(|p| p.modal) != Some(hud.modal) {
                set_shown(&document, "level-up", hud.modal == Modal::LevelUp);
                set_shown(&document, "game-over", hud.modal == Modal::GameOver);
                set_shown(&document, "reload", hud.modal == Modal::GameOver);
                match hud.modal {
                    Modal::LevelUp => set_text(&document, "level-up-text", hud.level_up_message()),
                    Modal::GameOver => {
                        set_text(&document, "game-over-text", &hud.game_over_message());
                        set_text(&document, "final-score", &hud.score.to_string());
                    }
                    Modal::None => {}
                }
            }

            self.last_hud = Some(hud);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_shown(document: &Document, id: &str, shown: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if shown {
                classes.add_1("show")
            } else {
                classes.remove_1("show")
            };
        }
    }

    fn for_each_element(document: &Document, selector: &str, mut f: impl FnMut(usize, HtmlElement)) {
        let Ok(nodes) = document.query_selector_all(selector) else {
            return;
        };
        for i in 0..nodes.length() {
            if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                f(i as usize, el);
            }
        }
    }

    /// Color the lights and bulbs, or restore them
    fn apply_flash(document: &Document, flash: Option<Color>) {
        for_each_element(document, ".light", |i, light| {
            let shadow = match (flash, LIGHT_OFFSETS.get(i)) {
                (Some(color), Some(offset)) => format!("{} {}", offset, color.to_css()),
                _ => LIGHT_SHADOWS.get(i).unwrap_or(&LIGHT_SHADOWS[0]).to_string(),
            };
            let _ = light.style().set_property("box-shadow", &shadow);
        });
        let bulb = flash.unwrap_or(Color::BULB).to_css();
        for_each_element(document, ".bulb", |_, el| {
            let _ = el.style().set_property("background", &bulb);
        });
    }

    async fn init_renderer(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<SdfRenderState, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        SdfRenderState::new(surface, &adapter, width, height).await
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Slot Ring starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let config = GameConfig::load();
        let settings = Settings::load();
        log::info!("Game initialized with seed: {}", seed);

        let render_state = match init_renderer(&canvas, width, height).await {
            Ok(state) => Some(state),
            Err(e) => {
                log::error!("Renderer unavailable: {}", e);
                None
            }
        };

        let host = Rc::new(RefCell::new(Host {
            game: Game::new(config, seed),
            settings,
            render_state,
            draw_list: DrawList::new(),
            canvas: canvas.clone(),
            last_time: 0.0,
            last_hud: None,
            running: true,
        }));

        setup_input_handlers(&canvas, host.clone());
        setup_buttons(&document, host.clone());

        request_animation_frame(host);

        log::info!("Slot Ring running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Press
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut h = host.borrow_mut();
                let point = h.to_field(event.client_x(), event.client_y());
                h.game.press(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut h = host.borrow_mut();
                let point = h.to_field(event.client_x(), event.client_y());
                h.game.drag_to(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release on up or when leaving the canvas
        for name in ["mouseup", "mouseleave"] {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                host.borrow_mut().game.release();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move
        for name in ["touchstart", "touchmove"] {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut h = host.borrow_mut();
                    let point = h.to_field(touch.client_x(), touch.client_y());
                    if event.type_() == "touchstart" {
                        h.game.press(point);
                    } else {
                        h.game.drag_to(point);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                host.borrow_mut().game.release();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, host: Rc<RefCell<Host>>) {
        // Reload: new run, restart the loop if it halted
        if let Some(btn) = document.get_element_by_id("reload") {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let restart = {
                    let mut h = host.borrow_mut();
                    h.game.reset();
                    h.last_time = 0.0;
                    let restart = !h.running;
                    h.running = true;
                    restart
                };
                if restart {
                    request_animation_frame(host.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Continue after level-up
        if let Some(btn) = document.get_element_by_id("continue-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut h = host.borrow_mut();
                h.game.resume();
                log::info!("Resumed at {} slots", h.game.session.slot_count);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        let control = host.borrow_mut().frame(time);
        match control {
            LoopControl::Continue => request_animation_frame(host),
            LoopControl::Halt => {
                host.borrow_mut().running = false;
                log::info!("Loop halted");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Slot Ring (native) starting...");
    log::info!("Native mode runs a headless autoplay - run with `trunk serve` for the web version");

    autoplay(0x51_07, 60 * 60 * 20);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Steer toward the lowest ball and play until game over or `max_frames`
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64, max_frames: u32) {
    use slot_ring::consts::{RING_CENTER, SIM_DT};
    use slot_ring::polar_to_cartesian;
    use slot_ring::renderer::{DrawList, draw_scene};
    use slot_ring::sim::{DragState, Game, GamePhase, LoopControl};
    use slot_ring::{GameConfig, Settings};

    let mut game = Game::new(GameConfig::load(), seed);
    let settings = Settings::load();
    let mut draw_list = DrawList::new();

    for frame in 0..max_frames {
        let aim = {
            let s = &game.session;
            s.balls
                .iter()
                .filter_map(|b| Some((b.pos, s.slot(b.target?)?)))
                .max_by(|a, b| a.0.y.total_cmp(&b.0.y))
                .map(|(pos, slot)| {
                    (
                        DragState::angle_of(slot.midpoint(s.rotation, s.slot_count)),
                        DragState::angle_of(pos),
                    )
                })
        };
        if let Some((from, to)) = aim {
            game.press(RING_CENTER + polar_to_cartesian(100.0, from));
            game.drag_to(RING_CENTER + polar_to_cartesian(100.0, to));
            game.release();
        }

        let control = game.frame(SIM_DT);
        draw_scene(&game.session, &settings, &mut draw_list);
        for event in &game.session.events {
            log::debug!("frame {}: {:?}", frame, event);
        }

        if game.session.phase == GamePhase::LevelUp {
            log::info!("Level up at frame {}", frame);
            game.resume();
        }
        if control == LoopControl::Halt {
            break;
        }
        if frame % 600 == 0 {
            log::info!(
                "frame {:>6}: score {:>3}, lives {}, balls {:>2}, shapes {}",
                frame,
                game.session.score,
                game.session.lives,
                game.session.balls.len(),
                draw_list.len()
            );
        }
    }

    println!(
        "Final score: {} (lives {}, slots {})",
        game.session.score, game.session.lives, game.session.slot_count
    );
}
