//! TUI for zynthora
//!
//! Plays the engine from the computer keyboard and shows what the render
//! thread is doing.

mod spectrum;
pub mod state;
mod status;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use zynthora::control::{CommandDecoder, Controller};
use zynthora::dsp::oscillator::Waveform;
use zynthora::effects::Stage;
use zynthora::event::SourceSelect;
use zynthora::EngineStatus;

use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::{InputMode, Keyboard};
use status::{render_envelope, render_stages, render_status_bar, render_voices, AudioStats};
use waveform::render_scope;

/// Samples kept for the scope and the spectrum.
pub const SCOPE_LEN: usize = 2048;

const SOURCES: [SourceSelect; 9] = [
    SourceSelect::Oscillator(Waveform::Sine),
    SourceSelect::Oscillator(Waveform::Triangle),
    SourceSelect::Oscillator(Waveform::Saw),
    SourceSelect::Oscillator(Waveform::Square),
    SourceSelect::Fm,
    SourceSelect::Wavetable,
    SourceSelect::Paraphonic,
    SourceSelect::Macro(0),
    SourceSelect::Macro(1),
];

const HELP: &str = " [a-k] notes  [z/x] octave  [1-9] source  [D F C L R M] effects  [Space] release  [:] command  [Q] quit";

pub struct UiApp {
    controller: Controller,
    decoder: CommandDecoder,
    scope_rx: Consumer<f32>,
    status_rx: Consumer<EngineStatus>,
    status: EngineStatus,
    scope: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    keyboard: Keyboard,
    mode: InputMode,
    message: String,
    sample_rate: f32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        controller: Controller,
        scope_rx: Consumer<f32>,
        status_rx: Consumer<EngineStatus>,
        status: EngineStatus,
        sample_rate: f32,
    ) -> Self {
        Self {
            controller,
            decoder: CommandDecoder::new(),
            scope_rx,
            status_rx,
            status,
            scope: vec![0.0; SCOPE_LEN],
            spectrum: SpectrumAnalyzer::new(SCOPE_LEN, sample_rate),
            keyboard: Keyboard::default(),
            mode: InputMode::Normal,
            message: String::new(),
            sample_rate,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.poll_status();
            self.spectrum.update(&self.scope);

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        self.controller.all_notes_off();
        Ok(())
    }

    fn poll_scope(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > SCOPE_LEN {
            let excess = self.scope.len() - SCOPE_LEN;
            self.scope.drain(..excess);
        }
    }

    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match &mut self.mode {
            InputMode::Command(line) => match key.code {
                KeyCode::Enter => {
                    let line = std::mem::take(line);
                    self.mode = InputMode::Normal;
                    self.run_command(&line);
                }
                KeyCode::Esc => self.mode = InputMode::Normal,
                KeyCode::Backspace => {
                    line.pop();
                }
                KeyCode::Char(c) => line.push(c),
                _ => {}
            },
            InputMode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        let KeyCode::Char(c) = code else {
            if code == KeyCode::Esc {
                self.should_quit = true;
            }
            return;
        };

        match c {
            'q' | 'Q' => self.should_quit = true,
            ':' => self.mode = InputMode::Command(String::new()),
            'z' => self.keyboard.shift_octave(-1),
            'x' => self.keyboard.shift_octave(1),
            ' ' => {
                self.keyboard.release_all();
                self.controller.all_notes_off();
            }
            '1'..='9' => {
                let source = SOURCES[c as usize - '1' as usize];
                self.controller.select_source(source);
                self.message = format!("source {}", source.name());
            }
            'D' => self.toggle_stage(Stage::Drive),
            'F' => self.toggle_stage(Stage::Filter),
            'C' => self.toggle_stage(Stage::Chorus),
            'L' => self.toggle_stage(Stage::Delay),
            'R' => self.toggle_stage(Stage::Reverb),
            'M' => self.toggle_stage(Stage::Master),
            key => {
                if let Some(note) = self.keyboard.note_for(key) {
                    if self.keyboard.toggle(note) {
                        self.controller.note_on(note, 100);
                    } else {
                        self.controller.note_off(note);
                    }
                }
            }
        }
    }

    fn toggle_stage(&mut self, stage: Stage) {
        let enable = !self.status.stages.get(stage);
        self.controller
            .set_param(stage.toggle_param(), if enable { 1.0 } else { 0.0 });
        self.message = format!("{} {}", stage.name(), if enable { "on" } else { "off" });
    }

    fn run_command(&mut self, line: &str) {
        tracing::debug!(line, "prompt command");
        self.message = match self.controller.command(&mut self.decoder, line) {
            Ok(true) => format!("sent {line}"),
            Ok(false) => "event channel full".to_owned(),
            Err(err) => {
                tracing::warn!(%err, line, "rejected command");
                err.to_string()
            }
        };
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(10),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let stats = AudioStats::from_buffer(&self.scope);
        render_status_bar(
            frame,
            rows[0],
            &self.status,
            self.sample_rate,
            self.keyboard.octave(),
            &stats,
        );

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(20)])
            .split(rows[1]);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(7), Constraint::Length(3), Constraint::Length(3)])
            .split(middle[0]);

        render_voices(frame, side[0], &self.status);
        render_envelope(frame, side[1], self.status.envelope);
        render_stages(frame, side[2], &self.status);
        render_scope(frame, middle[1], &self.scope, self.status.gate);
        render_spectrum(frame, rows[2], self.spectrum.data());

        let (text, colour) = match &self.mode {
            InputMode::Command(line) => (format!(":{line}"), Color::White),
            InputMode::Normal if !self.message.is_empty() => {
                (format!(" {}", self.message), Color::Yellow)
            }
            InputMode::Normal => (HELP.to_owned(), Color::DarkGray),
        };
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(colour)), rows[3]);
    }
}
