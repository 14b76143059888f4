use faisca_bridge::Bridge::{EventPump, NativeEvent};
use faisca_bridge::Host::{AppSource, HeadlessPlatform, HeadlessPump, HostBuilder, HostConfig, HostError, Platform};
use faisca_bridge::Protocol::{Extent2D, Fullscreen};
use std::time::Duration;

#[test]
fn drawable_size_scales_without_overflow() {
    let mut platform = HeadlessPlatform::new().with_pixel_scale(2);
    let window = platform.create_window("scaled", Extent2D::new(640, 360)).unwrap();
    assert_eq!(platform.drawable_size(window), Some(Extent2D::new(1280, 720)));

    platform.set_window_size(window, Extent2D::new(u32::MAX, 10)).unwrap();
    assert_eq!(platform.drawable_size(window), Some(Extent2D::new(u32::MAX, 20)));
}

#[test]
fn window_state_follows_the_calls() {
    let mut platform = HeadlessPlatform::new();
    let window = platform.create_window("first", Extent2D::new(800, 450)).unwrap();
    platform.set_fullscreen(window, Fullscreen::Real).unwrap();
    platform.set_bordered(window, false).unwrap();
    platform.set_title(window, c"second").unwrap();

    let state = platform.window(window).unwrap();
    assert_eq!(state.title, "second");
    assert_eq!(state.fullscreen, Fullscreen::Real);
    assert!(!state.bordered);

    platform.destroy_window(window);
    assert!(platform.set_title(window, c"gone").is_err());
    assert_eq!(platform.destroy_count(window), 1);
    assert!(platform.required_instance_extensions(window).is_err());
}

#[test]
fn pump_reports_pending_events() {
    let pump = HeadlessPump::new(4).unwrap();
    assert_eq!(pump.pending(), 0);
    pump.push(NativeEvent::Quit).unwrap();
    pump.push(NativeEvent::Quit).unwrap();
    assert_eq!(pump.pending(), 2);
    assert!(pump.poll().is_some());
    assert_eq!(pump.pending(), 1);
}

#[test]
fn builder_starts_from_a_config() {
    let config = HostConfig {
        title: "configured".to_string(),
        window_size: Extent2D::new(320, 200),
        idle_timeout: Duration::from_millis(2),
        ..HostConfig::default()
    };
    let builder = HostBuilder::from_config(config.clone());
    assert_eq!(builder.config(), &config);
    assert_eq!(builder.config().queue_capacity, 1024);

    let platform = HeadlessPlatform::new();
    let result = HostBuilder::from_config(config).build_with(
        HeadlessPump::new(16).unwrap(),
        platform.clone(),
        AppSource::Module("/nonexistent/libconfigured.so".into()),
    );
    assert!(matches!(result, Err(HostError::ModuleLoad { .. })));
    // The window was created with the configured size, then released
    assert_eq!(platform.window_count(), 0);
}

#[test]
fn config_defaults() {
    let config = HostConfig::default();
    assert_eq!(config.title, "Faisca Window");
    assert_eq!(config.window_size, Extent2D::new(800, 450));
    assert_eq!(config.idle_timeout, Duration::from_millis(8));
}
