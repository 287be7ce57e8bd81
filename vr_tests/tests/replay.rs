//! Trace replay through a console-backed driver.

use vr_input::{
    controller::{Buttons, FrameInput},
    replay::{parse_trace, play, ReplayDriver},
    tunables::Tunables,
};
use vr_shared::config::VrConfig;
use vr_tests::FRAME_MS;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn trace_text(frames: &[FrameInput]) -> anyhow::Result<String> {
    let mut text = String::from("// generated\n");
    for frame in frames {
        text.push_str(&serde_json::to_string(frame)?);
        text.push('\n');
    }
    Ok(text)
}

#[tokio::test]
async fn left_handed_trace_drives_engine_buttons() -> anyhow::Result<()> {
    init_tracing();

    let cfg = VrConfig::from_json_str(r#"{ "handedness": "left", "refresh_hz": 500 }"#)?;
    let mut frames = vec![FrameInput::default(); 4];
    for (i, frame) in frames.iter_mut().enumerate() {
        frame.now_ms = i as f64 * FRAME_MS;
    }
    frames[1].left.buttons = Buttons::TRIGGER;
    frames[2].left.buttons = Buttons::TRIGGER;

    let frames = parse_trace(&trace_text(&frames)?)?;
    assert_eq!(frames.len(), 4);

    let mut driver = ReplayDriver::new(&cfg);
    play(&mut driver, &frames[..3], cfg.refresh_hz, None).await?;
    assert!(driver.console.button_held("attack"));

    play(&mut driver, &frames[3..], cfg.refresh_hz, None).await?;
    assert!(!driver.console.button_held("attack"));
    Ok(())
}

#[tokio::test]
async fn laser_toggle_persists_in_console() -> anyhow::Result<()> {
    init_tracing();

    let mut driver = ReplayDriver::new(&VrConfig::default());
    let mut frames = vec![FrameInput::default(); 4];
    frames[1].left.buttons = Buttons::JOYSTICK;
    frames[3].left.buttons = Buttons::JOYSTICK;
    for (i, frame) in frames.iter_mut().enumerate() {
        frame.now_ms = i as f64 * FRAME_MS;
    }

    play(&mut driver, &frames[..2], 500, None).await?;
    assert!(Tunables::read(&driver.console).laser_sight);

    play(&mut driver, &frames[2..], 500, None).await?;
    assert!(!Tunables::read(&driver.console).laser_sight);
    Ok(())
}

#[tokio::test]
async fn zero_refresh_rate_is_rejected() {
    let mut driver = ReplayDriver::new(&VrConfig::default());
    let frames = vec![FrameInput::default()];
    assert!(play(&mut driver, &frames, 0, None).await.is_err());
}
