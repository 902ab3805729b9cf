/// Terminal front end for the ladder truck viewer
use std::io::{stdout, Write};
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use laddertruck_core::{
    Clock, InputController, InputEvent, Keymap, Scene, SceneState, SystemClock,
};
use tracing::{debug, info};

pub mod config;
pub mod events;
pub mod logging;
pub mod renderer;

pub use config::Config;
pub use events::{translate, TerminalEvent};
pub use renderer::AsciiRenderer;

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    state: SceneState,
    scene: Scene,
    controller: InputController,
    renderer: AsciiRenderer,
    clock: SystemClock,
    config: Config,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &Config) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let keymap = match &config.keymap_path {
            Some(path) => Keymap::load(path)?,
            None => Keymap::default(),
        };
        let renderer = AsciiRenderer::new(width as usize, height as usize);
        let scene = Scene::default();
        scene.validate(&renderer)?;

        let mut state = SceneState::new();
        state.display.pixel_aspect = config.cell_aspect;
        state.resize(width as u32, height as u32);
        info!(width, height, bindings = keymap.len(), "terminal viewer ready");

        Ok(Self {
            state,
            scene,
            controller: InputController::new(keymap),
            renderer,
            clock: SystemClock,
            config: config.clone(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = self.config.frame_time();

        while self.running {
            let frame_start = Instant::now();

            // Drain every pending event before drawing
            while event::poll(std::time::Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(&event);
            }
            if !self.running {
                break;
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("terminal viewer stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: &event::Event) {
        match translate(event) {
            Some(TerminalEvent::Quit) => self.running = false,
            Some(TerminalEvent::Input(input)) => {
                if let InputEvent::Resize { width, height } = input {
                    self.renderer.resize(width as usize, height as usize);
                }
                let command = self.controller.handle(&mut self.state, &input);
                debug!(?input, ?command, "input");
            }
            None => {}
        }
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.clear();
        self.scene
            .render(&self.state, &mut self.renderer, self.clock.now_millis());

        let mut stdout = stdout();
        self.renderer.present(&mut stdout)?;

        // Draw UI overlay
        let display = &self.state.display;
        let view = if display.quad {
            "quad"
        } else {
            display.selected.label()
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Laddertruck | FPS: {:.1} | view: {} | zoom: {:.1} | h=Help Esc=Quit",
                self.fps, view, self.state.camera.zoom
            )),
        )?;
        if display.show_help {
            for (row, (keys, description)) in self.controller.help_lines().into_iter().enumerate() {
                queue!(
                    stdout,
                    cursor::MoveTo(1, row as u16 + 2),
                    Print(format!("{keys:>12}  {description}")),
                )?;
            }
        }
        queue!(stdout, ResetColor)?;

        stdout.flush()?;
        Ok(())
    }
}
