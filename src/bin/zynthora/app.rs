//! Audio device setup and the output callback.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use zynthora::{
    control::Controller, event, Engine, EngineConfig, EngineStatus, SourceId, MAX_BLOCK_SIZE,
};

use crate::ui::{UiApp, SCOPE_LEN};

/// Status snapshots published per second, roughly.
const STATUS_RATE_HZ: f32 = 60.0;

pub fn run() -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    tracing::info!(
        device = %device.name().unwrap_or_default(),
        sample_rate,
        channels,
        "opening output stream"
    );

    let engine_config = EngineConfig::default().sample_rate(sample_rate);
    let (producer, consumer) = event::channel(engine_config.event_capacity)?;
    let mut engine = Engine::new(engine_config, consumer)?;
    let controller = Controller::new(producer, SourceId::GuiMain);

    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_LEN * 8);
    let (mut status_tx, status_rx) = RingBuffer::<EngineStatus>::new(16);
    let initial_status = engine.status();

    let status_every = (sample_rate / STATUS_RATE_HZ) as usize;
    let mut since_status = 0usize;

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            for block in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                engine.render(block, channels);

                for frame in block.chunks_exact(channels) {
                    // full scope buffer: the UI is behind, drop the sample
                    let _ = scope_tx.push(frame[0]);
                }

                since_status += block.len() / channels;
                if since_status >= status_every {
                    since_status = 0;
                    let _ = status_tx.push(engine.status());
                }
            }
        },
        |err| tracing::error!(%err, "audio stream error"),
        None,
    )?;
    stream.play().wrap_err("failed to start output stream")?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(controller, scope_rx, status_rx, initial_status, sample_rate)
        .run(&mut terminal);
    ratatui::restore();

    drop(stream);
    tracing::info!("stream closed");
    result
}
