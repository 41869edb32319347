use crate::config::{self, Settings};
use crate::input::{poll_events, WindowEvent};
use crate::logging;
use crate::raster::Context;
use crate::screenshot::Screenshotter;
use crate::terminal::Window;
use anyhow::Result;
use crossterm::event::KeyCode;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// What a demo sees each frame.
pub struct Frame<'a> {
    pub gl: &'a mut Context,
    /// Seconds since the loop started.
    pub elapsed: f32,
}

/// One exercise: static setup plus per-frame draw calls.
pub trait Demo: Sized {
    /// Demo-specific settings, flattened into the settings file.
    type Extra: Serialize + DeserializeOwned + Default + Debug;

    /// Window title, settings file and log file stem.
    const NAME: &'static str;

    fn new(settings: &Settings<Self::Extra>) -> Result<Self>;

    fn capture_prefix(&self) -> String {
        format!("{}-ss", Self::NAME)
    }

    /// Clear color, depth test and friends.
    fn setup(&mut self, gl: &mut Context) -> Result<()>;

    fn key(&mut self, _code: KeyCode) -> Result<()> {
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<()>;

    fn status(&self) -> String {
        String::new()
    }
}

pub fn run<D: Demo>() -> Result<()> {
    let paths = config::project_paths(D::NAME)?;
    logging::init(&paths.log_path)?;
    let settings: Settings<D::Extra> = config::load_or_create(&paths.settings_path)?;
    log::info!("starting {} with {:?}", D::NAME, settings);

    let mut demo = D::new(&settings)?;
    let mut window = Window::open(D::NAME, settings.enable_color)?;
    let res = frame_loop(&mut demo, &mut window, &settings);
    finish(D::NAME, res, window.close())
}

/// Logs both outcomes; the loop's error wins over a failed terminal restore.
fn finish(name: &str, res: Result<()>, closed: Result<()>) -> Result<()> {
    if let Err(e) = &res {
        log::error!("{} stopped: {:#}", name, e);
    }
    if let Err(e) = &closed {
        log::error!("restoring the terminal failed: {:#}", e);
    }
    res.and(closed)
}

fn frame_loop<D: Demo>(
    demo: &mut D,
    window: &mut Window,
    settings: &Settings<D::Extra>,
) -> Result<()> {
    let frame_dt = Duration::from_secs_f32(1.0 / settings.fps() as f32);
    let (w, h) = window.framebuffer_size();
    let mut gl = Context::new(w, h);
    demo.setup(&mut gl)?;

    let mut shots = Screenshotter::new(demo.capture_prefix(), settings.capture_dir());
    let mut notice = String::new();
    let start = Instant::now();
    let mut frames: u64 = 0;

    loop {
        let frame_start = Instant::now();
        if window.resize_if_needed()? {
            let (w, h) = window.framebuffer_size();
            gl.resize(w, h);
            log::debug!("framebuffer resized to {}x{}", w, h);
        }

        let mut capture = false;
        for ev in poll_events(frame_dt)? {
            match ev {
                WindowEvent::Close => {
                    log::info!("{} closed after {} frames", D::NAME, frames);
                    return Ok(());
                }
                WindowEvent::Capture => capture = true,
                WindowEvent::Key(code) => demo.key(code)?,
            }
        }

        let mut frame = Frame {
            gl: &mut gl,
            elapsed: start.elapsed().as_secs_f32(),
        };
        demo.draw(&mut frame)?;

        if capture {
            log::info!("capture window {}", shots.next_id());
            notice = match shots.capture(gl.framebuffer()) {
                Ok(path) => {
                    log::info!("wrote {}", path.display());
                    format!("saved {}", path.display())
                }
                Err(e) => {
                    log::warn!("capture failed: {}", e);
                    format!("capture failed: {}", e)
                }
            };
        }

        let mut status = demo.status();
        if !notice.is_empty() {
            status.push_str("  ");
            status.push_str(&notice);
        }
        window.present(gl.framebuffer(), &status)?;

        frames += 1;
        spin_sleep(frame_dt, frame_start);
    }
}

fn spin_sleep(target: Duration, since: Instant) {
    let end = since + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn loop_error_is_kept_when_close_also_fails() {
        let res = finish("demo", Err(anyhow!("draw")), Err(anyhow!("close")));
        let err = res.unwrap_err();
        assert_eq!(err.to_string(), "draw");
    }

    #[test]
    fn close_error_surfaces_after_a_clean_loop() {
        let err = finish("demo", Ok(()), Err(anyhow!("close"))).unwrap_err();
        assert_eq!(err.to_string(), "close");
        assert!(finish("demo", Ok(()), Ok(())).is_ok());
    }
}
