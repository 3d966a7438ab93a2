/// Terminal host for the spinmesh pipeline
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use spinmesh_core::{RenderHost, Scene};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod canvas;

pub use canvas::AsciiCanvas;

const TARGET_FPS: u64 = 30;

/// Owns the frame loop: timing, input, and presenting the canvas
pub struct TerminalApp<S: Scene> {
    scene: S,
    canvas: AsciiCanvas,
    running: bool,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl<S: Scene> TerminalApp<S> {
    /// Size the canvas to the terminal and run the scene's one-time setup
    pub fn new(mut scene: S) -> Result<Self> {
        let (width, height) = terminal::size().context("failed to query terminal size")?;
        let canvas = AsciiCanvas::new(width as usize, height as usize);

        scene.on_create(&canvas)?;
        info!("Scene created for a {}x{} terminal", width, height);

        Ok(Self {
            scene,
            canvas,
            running: true,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / TARGET_FPS);
        let mut last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            let elapsed = frame_start.duration_since(last_tick).as_secs_f32();
            last_tick = frame_start;
            self.scene.on_update(&mut self.canvas, elapsed)?;

            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let spent = frame_start.elapsed();
            if spent < target_frame_time {
                std::thread::sleep(target_frame_time - spent);
            }

            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, .. }) => {
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.running = false;
                }
            }
            Event::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
                self.canvas.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn present(&mut self) -> Result<()> {
        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;

        let viewport = self.canvas.viewport();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "spinmesh | {}x{} | FPS: {:.1} | Q/Esc=Quit",
                viewport.width, viewport.height, self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
