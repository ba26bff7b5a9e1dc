//! FFT spectrum of the scope feed, drawn on a log-frequency axis.

use std::f32::consts::TAU;
use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const BANDS: usize = 64;
const FLOOR_DB: f64 = -96.0;
/// Per-frame fall of the displayed level, in dB.
const FALL_DB: f64 = 1.5;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    /// FFT bin index per display band
    bins: Vec<usize>,
    /// (log10 Hz, dB)
    points: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize, sample_rate: f32) -> Self {
        let size = size.max(2);
        let fft = FftPlanner::new().plan_fft_forward(size);

        let window = (0..size)
            .map(|i| 0.5 - 0.5 * (TAU * i as f32 / (size - 1) as f32).cos())
            .collect();

        let nyquist = (sample_rate as f64 / 2.0).clamp(40.0, 20_000.0);
        let (lo, hi) = (20f64.log10(), nyquist.log10());
        let last_bin = size / 2 - 1;

        let mut bins = Vec::with_capacity(BANDS);
        let mut points = Vec::with_capacity(BANDS);
        for band in 0..BANDS {
            let log_hz = lo + (hi - lo) * band as f64 / (BANDS - 1) as f64;
            let bin = (10f64.powf(log_hz) * size as f64 / sample_rate as f64).round() as usize;
            bins.push(bin.clamp(1, last_bin.max(1)));
            points.push((log_hz, FLOOR_DB));
        }

        Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); size],
            bins,
            points,
        }
    }

    pub fn size(&self) -> usize {
        self.window.len()
    }

    /// Analyse the most recent `size()` samples. Shorter input is ignored.
    pub fn update(&mut self, samples: &[f32]) {
        let Some(start) = samples.len().checked_sub(self.size()) else {
            return;
        };

        for ((slot, sample), w) in self.buffer.iter_mut().zip(&samples[start..]).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.buffer);

        let scale = 2.0 / self.size() as f32;
        for (point, &bin) in self.points.iter_mut().zip(&self.bins) {
            let magnitude = (self.buffer[bin].norm() * scale).max(1e-6);
            let db = (20.0 * magnitude.log10()) as f64;
            point.1 = db.max(point.1 - FALL_DB).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);
    let max_x = points.last().map_or(4.3, |(x, _)| *x);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([20f64.log10(), max_x])
                .labels(["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(["-96", "-48", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
