/// Demo host: window, keyboard mapping and frame presentation
/// The engine draws into a fixed low-resolution framebuffer that is
/// integer-scaled into the window.
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
use log::{error, info};
use softvox::*;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

/// Fixed simulation rate; physics constants are per tick.
const TICK: Duration = Duration::from_millis(33);

fn key_button(key: KeyCode) -> Option<Buttons> {
    Some(match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Buttons::UP,
        KeyCode::KeyS | KeyCode::ArrowDown => Buttons::DOWN,
        KeyCode::KeyA | KeyCode::ArrowLeft => Buttons::LEFT,
        KeyCode::KeyD | KeyCode::ArrowRight => Buttons::RIGHT,
        KeyCode::Space => Buttons::JUMP,
        KeyCode::KeyE => Buttons::MINE,
        KeyCode::KeyQ => Buttons::PLACE,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Buttons::AIM,
        _ => return None,
    })
}

/// Nearest-neighbour upscale of `src` into `dst`, centered.
fn blit_scaled(src: &Framebuffer, dst: &mut [u32], dst_w: usize, dst_h: usize, background: u32) {
    dst.fill(background);
    let scale = (dst_w / src.width.max(1)).min(dst_h / src.height.max(1)).max(1);
    let off_x = dst_w.saturating_sub(src.width * scale) / 2;
    let off_y = dst_h.saturating_sub(src.height * scale) / 2;

    for y in 0..(src.height * scale).min(dst_h) {
        let src_row = &src.color_buffer[(y / scale) * src.width..][..src.width];
        let dst_row = &mut dst[(y + off_y) * dst_w..][..dst_w];
        for x in 0..(src.width * scale).min(dst_w - off_x) {
            dst_row[x + off_x] = src_row[x / scale];
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== softvox ===");
    println!("Controls:");
    println!("  W/S or Up/Down    - Walk");
    println!("  A/D or Left/Right - Turn");
    println!("  Shift + Up/Down   - Look up/down");
    println!("  Space             - Jump");
    println!("  E (hold)          - Mine, tap to place");
    println!("  Q                 - Place");
    println!("  B                 - Toggle chunk borders");
    println!("  ESC               - Exit");
    println!();

    let config = EngineConfig::default();
    let screen = config.screen.clone();
    let background = config.shading.background;
    let mut engine = Some(Engine::enter(config));
    let mut framebuffer = Framebuffer::new(screen.width as usize, screen.height as usize);

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("softvox")
            .with_inner_size(winit::dpi::LogicalSize::new(
                screen.width as u32 * 3,
                screen.height as u32 * 3,
            ))
            .build(&event_loop)?,
    );

    let context = softbuffer::Context::new(window.clone())?;
    let mut surface = softbuffer::Surface::new(&context, window.clone())?;

    let mut buttons = Buttons::empty();
    let mut last_tick = Instant::now();
    let mut fps_timer = Instant::now();
    let mut frame_count = 0u32;

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    if let Some(engine) = engine.take() {
                        engine.exit();
                    }
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    let pressed = event.state == ElementState::Pressed;
                    if let PhysicalKey::Code(keycode) = event.physical_key {
                        match keycode {
                            KeyCode::Escape if pressed => {
                                if let Some(engine) = engine.take() {
                                    engine.exit();
                                }
                                elwt.exit();
                            }
                            KeyCode::KeyB if pressed && !event.repeat => {
                                if let Some(engine) = engine.as_mut() {
                                    let render = engine.render_config_mut();
                                    render.chunk_borders = !render.chunk_borders;
                                    info!("Chunk borders: {}", render.chunk_borders);
                                }
                            }
                            key => {
                                if let Some(bit) = key_button(key) {
                                    buttons.set(bit, pressed);
                                }
                            }
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let Some(engine) = engine.as_mut() else {
                        return;
                    };

                    let now = Instant::now();
                    let elapsed = now - last_tick;
                    last_tick = now;

                    framebuffer.clear(background);
                    let stats = engine.tick(elapsed, buttons, &mut framebuffer);
                    if let Some(line) = framebuffer.text.first() {
                        window.set_title(&format!("softvox  {}", line.text));
                    }

                    let size = window.inner_size();
                    let (Some(w), Some(h)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    else {
                        return;
                    };
                    if let Err(err) = surface.resize(w, h) {
                        error!("Surface resize failed: {err}");
                        elwt.exit();
                        return;
                    }
                    match surface.buffer_mut() {
                        Ok(mut buffer) => {
                            blit_scaled(
                                &framebuffer,
                                &mut buffer,
                                size.width as usize,
                                size.height as usize,
                                background,
                            );
                            if let Err(err) = buffer.present() {
                                error!("Present failed: {err}");
                            }
                        }
                        Err(err) => error!("Surface buffer unavailable: {err}"),
                    }

                    frame_count += 1;
                    if fps_timer.elapsed() >= Duration::from_secs(1) {
                        info!(
                            "{} fps | {} blocks drawn | {} tris | tick {:.2}ms",
                            frame_count,
                            stats.rendered_blocks,
                            stats.raster.triangles_drawn,
                            stats.timings.total.as_secs_f64() * 1000.0
                        );
                        frame_count = 0;
                        fps_timer = Instant::now();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let next = last_tick + TICK;
                if Instant::now() >= next {
                    window.request_redraw();
                } else {
                    elwt.set_control_flow(ControlFlow::WaitUntil(next));
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
