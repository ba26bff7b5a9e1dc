//! Status bar, voice panel and effect stage panel.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use zynthora::effects::Stage;
use zynthora::EngineStatus;

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status: &EngineStatus,
    sample_rate: f32,
    octave: i8,
    stats: &AudioStats,
) {
    let block = Block::default().title(" zynthora ").borders(Borders::ALL);

    let (gate_symbol, gate_colour) = if status.gate {
        ("●", Color::Green)
    } else {
        ("○", Color::DarkGray)
    };

    let line = Line::from(vec![
        Span::styled(format!(" {gate_symbol} "), Style::default().fg(gate_colour)),
        Span::styled(
            format!("{:<10} ", status.source.name()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{:>7.1} Hz  ", status.frequency)),
        Span::raw(format!("oct {octave}  ")),
        Span::styled(
            format!("amp {:.2}  ", status.master_amp),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!(
                "events {} / ignored {} / steals {}  ",
                status.router.applied, status.router.ignored, status.router.steals
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

pub fn render_voices(frame: &mut Frame, area: Rect, status: &EngineStatus) {
    let block = Block::default()
        .title(format!(" Voices {}/{} ", status.active_voices, status.voices.len()))
        .borders(Borders::ALL);

    let mut lines: Vec<Line> = status
        .voices
        .iter()
        .enumerate()
        .map(|(index, voice)| match voice.note {
            Some(note) if voice.active => Line::from(vec![
                Span::styled(format!(" {index} "), Style::default().fg(Color::Green)),
                Span::raw(format!("{:<4} vel {:>3}", note_name(note), voice.velocity)),
                Span::styled(
                    format!("  {:+.3} st", voice.detune),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            _ => Line::styled(format!(" {index} -"), Style::default().fg(Color::DarkGray)),
        })
        .collect();

    lines.push(Line::raw(""));
    lines.push(Line::raw(format!(" env {:.2}", status.envelope)));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_stages(frame: &mut Frame, area: Rect, status: &EngineStatus) {
    let block = Block::default().title(" Effects ").borders(Borders::ALL);

    let spans: Vec<Span> = Stage::ALL
        .iter()
        .map(|&stage| {
            let style = if status.stages.get(stage) {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {} ", stage.name()), style)
        })
        .flat_map(|span| [span, Span::raw(" ")])
        .collect();

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

pub fn render_envelope(frame: &mut Frame, area: Rect, level: f32) {
    let gauge = Gauge::default()
        .block(Block::default().title(" Envelope ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(level.clamp(0.0, 1.0) as f64);
    frame.render_widget(gauge, area);
}

fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    format!("{}{}", NAMES[note as usize % 12], note as i32 / 12 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
    }

    #[test]
    fn stats_of_square() {
        let stats = AudioStats::from_buffer(&[0.5, -0.5, 0.5, -0.5]);
        assert_eq!(stats.peak, 0.5);
        assert!((stats.rms - 0.5).abs() < 1e-6);
    }
}
