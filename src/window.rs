use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::canvas::Bitmap;
use crate::color::Color;
use crate::config::WindowConfig;
use crate::deluxe::DeluxeSpeedView;
use crate::error::Result;
use crate::indicator::IndicatorKind;
use crate::section::SectionStyle;

/// Command enum for type-safe gauge updates from another thread
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    SetSpeed(f32),
    SpeedTo(f32),
    SetWithEffects(bool),
    SetSpeedBackgroundColor(Color),
    SetCenterCircleColor(Color),
    SetCenterCircleRadius(f32),
    SetIndicator(IndicatorKind),
    SetSectionStyle(SectionStyle),
    SetTickNumber(usize),
}

impl DeluxeSpeedView {
    pub fn apply_command(&mut self, command: GaugeCommand) {
        match command {
            GaugeCommand::SetSpeed(speed) => self.gauge_mut().set_speed(speed),
            GaugeCommand::SpeedTo(speed) => self.gauge_mut().speed_to(speed),
            GaugeCommand::SetWithEffects(on) => self.set_with_effects(on),
            GaugeCommand::SetSpeedBackgroundColor(color) => self.set_speed_background_color(color),
            GaugeCommand::SetCenterCircleColor(color) => self.set_center_circle_color(color),
            GaugeCommand::SetCenterCircleRadius(radius) => self.set_center_circle_radius(radius),
            GaugeCommand::SetIndicator(kind) => self.set_indicator(kind),
            GaugeCommand::SetSectionStyle(style) => self.gauge_mut().set_sections_style(style),
            GaugeCommand::SetTickNumber(n) => self.gauge_mut().set_tick_number(n),
        }
    }

    /// Drains pending commands without blocking.
    pub fn apply_pending(&mut self, receiver: &Receiver<GaugeCommand>) {
        while let Ok(command) = receiver.try_recv() {
            self.apply_command(command);
        }
    }

    pub fn show(self, window: WindowConfig) -> Result<()> {
        run_window(self, window, None)
    }

    pub fn show_with_commands(self, window: WindowConfig, receiver: Receiver<GaugeCommand>) -> Result<()> {
        run_window(self, window, Some(receiver))
    }
}

fn run_window(
    mut view: DeluxeSpeedView,
    config: WindowConfig,
    receiver: Option<Receiver<GaugeCommand>>,
) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
        .with_resizable(config.resizable)
        .build(&event_loop)?;

    let window = Arc::new(window);

    let window_clone = window.clone();
    let size = window.inner_size();
    let mut fb_width = size.width as usize;
    let mut fb_height = size.height as usize;
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
    view.set_size(fb_width, fb_height);
    tracing::info!(width = fb_width, height = fb_height, "window opened");

    let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate.max(1.0));
    let mut last_frame = Instant::now();
    let mut frame = Bitmap::new(fb_width, fb_height);

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                        tracing::warn!(error = %e, "failed to resize pixel buffer");
                    }
                    if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                        tracing::warn!(error = %e, "failed to resize surface");
                    }
                    frame = Bitmap::new(fb_width, fb_height);
                    view.set_size(fb_width, fb_height);
                }
                WindowEvent::RedrawRequested => {
                    if let Some(ref receiver) = receiver {
                        view.apply_pending(receiver);
                    }
                    view.tick();

                    frame.clear(config.background);
                    view.draw(&mut frame);
                    frame.copy_to_frame(pixels.frame_mut());
                    if let Err(e) = pixels.render() {
                        tracing::error!(error = %e, "render failed");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_pending_commands_are_applied_in_order() {
        let (sender, receiver) = mpsc::channel();
        for command in [
            GaugeCommand::SetSpeed(30.0),
            GaugeCommand::SpeedTo(70.0),
            GaugeCommand::SetWithEffects(false),
            GaugeCommand::SetSectionStyle(SectionStyle::Round),
            GaugeCommand::SetIndicator(IndicatorKind::Needle),
        ] {
            sender.send(command).unwrap();
        }
        let mut view = DeluxeSpeedView::new();
        view.apply_pending(&receiver);
        assert_eq!(view.gauge().speed(), 30.0);
        assert_eq!(view.gauge().target_speed(), 70.0);
        assert!(!view.is_with_effects());
        assert!(!view.gauge().indicator().has_effects());
        assert_eq!(view.gauge().sections()[0].style, SectionStyle::Round);
    }
}
