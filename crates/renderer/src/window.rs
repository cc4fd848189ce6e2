use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use pixelconfig::PixelBlastConfig;
use scheduler::{ContainerSize, Lifecycle, Phase, TickOutcome};
use tracing::info;
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::gpu::WgpuBackend;
use crate::types::WindowOptions;

/// Opens a preview window and animates `config` until it is closed.
///
/// `reload` is polled once per loop iteration; any configuration it returns is
/// applied live.
pub fn run_window<F>(config: PixelBlastConfig, options: WindowOptions, mut reload: F) -> Result<()>
where
    F: FnMut() -> Option<PixelBlastConfig> + 'static,
{
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window = WindowBuilder::new()
        .with_title(options.title.as_str())
        .with_inner_size(LogicalSize::new(options.size.0, options.size.1))
        .with_transparent(config.transparent)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create preview window: {err}"))?;
    let window = Arc::new(window);

    let backend = WgpuBackend::new(Arc::clone(&window));
    let mut lifecycle = match options.seed {
        Some(seed) => Lifecycle::with_seed(backend, config, seed),
        None => Lifecycle::new(backend, config),
    };
    let scale_override = options.scale_factor;
    sync_container(&mut lifecycle, &window, scale_override);
    window.request_redraw();

    let mut cursor: Option<LogicalPosition<f64>> = None;
    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => {
                    if !lifecycle.backend().is_attached() {
                        return;
                    }
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            lifecycle.teardown();
                            elwt.exit();
                        }
                        WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                            sync_container(&mut lifecycle, &window, scale_override);
                        }
                        WindowEvent::Occluded(occluded) => lifecycle.set_visible(!occluded),
                        WindowEvent::CursorMoved { position, .. } => {
                            let logical = position.to_logical::<f64>(window.scale_factor());
                            cursor = Some(logical);
                            lifecycle.pointer_move(logical.x, logical.y);
                        }
                        WindowEvent::CursorLeft { .. } => cursor = None,
                        WindowEvent::MouseInput {
                            state: ElementState::Pressed,
                            button: MouseButton::Left,
                            ..
                        } => {
                            if let Some(position) = cursor {
                                lifecycle.pointer_down(position.x, position.y);
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            if lifecycle.tick(Instant::now()) == TickOutcome::ContextLost {
                                info!("render context lost; rebuilding");
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    if let Some(next) = reload() {
                        if let Some(transparent) = transparency_change(lifecycle.config(), &next) {
                            window.set_transparent(transparent);
                        }
                        let outcome = lifecycle.apply_configuration(next);
                        info!(?outcome, "configuration reloaded");
                    }
                    if matches!(lifecycle.phase(), Phase::Live | Phase::Uninitialized { .. }) {
                        window.request_redraw();
                    }
                }
                Event::LoopExiting => lifecycle.teardown(),
                _ => {}
            }
        })
        .map_err(|err| anyhow!("window event loop failed: {err}"))
}

fn sync_container(
    lifecycle: &mut Lifecycle<WgpuBackend>,
    window: &Window,
    scale_override: Option<f64>,
) {
    let scale = window.scale_factor();
    let logical = window.inner_size().to_logical::<f64>(scale);
    let ratio = scale_override.unwrap_or(scale);
    lifecycle.resize(ContainerSize::new(logical.width, logical.height), ratio);
}

/// Window compositing to apply when a reload flips `transparent`.
fn transparency_change(current: &PixelBlastConfig, next: &PixelBlastConfig) -> Option<bool> {
    (current.transparent != next.transparent).then_some(next.transparent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_reports_transparency_flips_only() {
        let current = PixelBlastConfig::default();
        assert!(current.transparent);

        let same = PixelBlastConfig {
            speed: 2.0,
            ..current.clone()
        };
        assert_eq!(transparency_change(&current, &same), None);

        let opaque = PixelBlastConfig {
            transparent: false,
            ..current.clone()
        };
        assert_eq!(transparency_change(&current, &opaque), Some(false));
        assert_eq!(transparency_change(&opaque, &current), Some(true));
    }
}
