//! Oscilloscope of the left output channel.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

pub fn render_scope(frame: &mut Frame, area: Rect, samples: &[f32], gate: bool) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    // start on a rising zero crossing so periodic signals stand still
    let start = samples
        .windows(2)
        .take(samples.len() / 2)
        .position(|pair| pair[0] <= 0.0 && pair[1] > 0.0)
        .unwrap_or(0);
    let visible = &samples[start..];

    let len = visible.len().max(1) as f64;
    let data: Vec<(f64, f64)> = visible
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / len, sample as f64))
        .collect();

    let colour = if gate { Color::Cyan } else { Color::DarkGray };
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(colour))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().bounds([0.0, 1.0]))
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
