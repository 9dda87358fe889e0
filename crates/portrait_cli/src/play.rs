//! Interactive terminal playback driven by the portrait frame loop.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use log::{debug, warn};
use portrait_render::{
    CharGrid, Console, ConsoleAction, ConsoleKey, FrameQueue, PortraitConfig, PortraitLoop,
    Renderer, TextSurface, ThemeSwitch,
};

type TerminalLoop = PortraitLoop<TextSurface, FrameQueue>;

/// Restores the terminal when playback ends, including on error.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let restored =
            execute!(self.stdout, ResetColor, Show, DisableMouseCapture, LeaveAlternateScreen);
        if let Err(err) = restored {
            warn!("failed to restore terminal: {err}");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            warn!("failed to leave raw mode: {err}");
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Session {
    portrait: TerminalLoop,
    console: Console,
    theme: ThemeSwitch,
    status: Option<String>,
}

pub fn play(
    grid: CharGrid,
    config: &PortraitConfig,
    theme: ThemeSwitch,
    max_frames: Option<u64>,
) -> Result<()> {
    let display = &config.display;
    let mut renderer = Renderer::new(grid, display);
    renderer.set_theme(theme.resolved());

    let surface = TextSurface::new(display.cell_width, display.cell_height);
    let portrait = PortraitLoop::mount(renderer, surface, FrameQueue::new());
    if !portrait.is_running() {
        return Ok(());
    }

    let console = Console::new(&config.console);
    let mut session = Session { portrait, console, theme, status: None };
    let fps = f64::from(display.frames_per_second.max(1));
    let frame_interval = Duration::from_secs_f64(1.0 / fps);

    let mut guard = TerminalGuard::enter()?;
    let result = session.run(&mut guard.stdout, frame_interval, max_frames);
    session.portrait.teardown();
    drop(guard);

    debug!("playback finished after {} frame(s)", session.portrait.frames());
    result
}

impl Session {
    fn run(&mut self, out: &mut Stdout, interval: Duration, max_frames: Option<u64>) -> Result<()> {
        self.draw(out)?;

        loop {
            let deadline = Instant::now() + interval;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() || !event::poll(remaining)? {
                    break;
                }
                if let Flow::Quit = self.handle_event(event::read()?) {
                    return Ok(());
                }
            }

            let Some(handle) = self.portrait.scheduler_mut().pop_due() else {
                return Ok(());
            };
            self.portrait.on_frame(handle);
            self.draw(out)?;

            if max_frames.is_some_and(|limit| self.portrait.frames() >= limit) {
                return Ok(());
            }
        }
    }

    fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Flow::Continue
            },
            _ => Flow::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        let console_key = match key.code {
            KeyCode::Char(ch) => Some(ConsoleKey::Char(ch)),
            KeyCode::Backspace => Some(ConsoleKey::Backspace),
            KeyCode::Enter => Some(ConsoleKey::Enter),
            KeyCode::Esc => Some(ConsoleKey::Escape),
            _ => None,
        };
        let Some(console_key) = console_key else {
            return Flow::Continue;
        };

        let (consumed, action) = self.console.handle_key(console_key);
        if consumed && console_key == ConsoleKey::Enter {
            self.status = match action {
                Some(ConsoleAction::OpenLink(url)) => Some(format!("open {url}")),
                None => None,
            };
        }
        if consumed {
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('q') => Flow::Quit,
            KeyCode::Char('t') => {
                let preference = self.theme.cycle();
                self.portrait.set_theme(self.theme.resolved());
                self.status = Some(format!("theme {}", preference.label()));
                Flow::Continue
            },
            _ => Flow::Continue,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }

        let renderer = self.portrait.renderer();
        let grid = renderer.grid();
        let inside = mouse.column < grid.width() && mouse.row < grid.height();
        let hovering = renderer.state().is_hovering();

        if inside {
            let center = renderer.cell_center(mouse.column, mouse.row);
            if !hovering {
                self.portrait.pointer_enter();
            }
            self.portrait.pointer_move(center.x, center.y);
        } else if hovering {
            self.portrait.pointer_leave();
        }
    }

    fn draw(&self, out: &mut Stdout) -> Result<()> {
        let [r, g, b] = self.portrait.renderer().theme().foreground();
        queue!(out, MoveTo(0, 0), SetForegroundColor(Color::Rgb { r, g, b }))?;
        for line in self.portrait.surface().lines() {
            queue!(out, Print(line), Clear(ClearType::UntilNewLine), MoveToNextLine(1))?;
        }
        queue!(out, ResetColor)?;

        if self.console.is_active() {
            let hint = self.console.hint().unwrap_or_default();
            queue!(out, Print(format!("~/portrait {}", self.console.input())))?;
            queue!(out, SetForegroundColor(Color::DarkGrey), Print(hint), ResetColor)?;
        } else {
            queue!(out, Print(format!("~/portrait   {}", self.theme.preference().label())))?;
        }
        queue!(out, Clear(ClearType::UntilNewLine), MoveToNextLine(1))?;

        let output = self.console.history().last().map(|entry| entry.output.as_str());
        let message = self.status.as_deref().or(output).unwrap_or_default();
        queue!(out, Print(message), Clear(ClearType::FromCursorDown))?;

        out.flush()?;
        Ok(())
    }
}
