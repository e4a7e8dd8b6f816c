//! Integration tests for error handling

use livecam_core::error::{LiveCamError, ResultExt};

#[test]
fn test_error_context_chaining() {
    let base_error = LiveCamError::converter("YUV_422_HDYC");
    let with_context = base_error.with_context("Starting HDMI Capture");

    let msg = format!("{}", with_context);
    assert!(msg.contains("Starting HDMI Capture"));
    assert!(msg.contains("YUV_422_HDYC"));
}

#[test]
fn test_error_context_preserves_hint() {
    let base_error = LiveCamError::LibraryNotFound("livecam-native".to_string());
    let hint_before = base_error.user_hint();

    let with_context = base_error.with_context("During manager init");
    let hint_after = with_context.user_hint();

    // Hint should be preserved through context
    assert_eq!(hint_before, hint_after);
}

#[test]
fn test_result_ext_context() {
    let result: Result<(), LiveCamError> = Err(LiveCamError::StartRejected(1));
    let with_context = result.context("Restarting after reconnect");

    assert!(with_context.is_err());
    let err = with_context.unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Restarting after reconnect"));
    assert!(msg.contains("#1"));
}

#[test]
fn test_user_hints() {
    // A missing native library should explain where the plugin goes
    let err = LiveCamError::LibraryNotFound("test".to_string());
    assert!(err.user_hint().is_some());
    assert!(err.user_hint().unwrap().contains("plugin"));

    // Unknown devices point at the device list
    let err = LiveCamError::DeviceNotFound("Webcam".to_string());
    assert!(err.user_hint().unwrap().contains("livecam list"));

    // Unsupported formats suggest another mode
    let err = LiveCamError::InvalidDimensions {
        width: 0,
        height: 0,
    };
    assert!(err.user_hint().unwrap().contains("mode"));

    // Config errors should have hints
    let err = LiveCamError::config("test");
    assert!(err.user_hint().is_some());
    assert!(err.user_hint().unwrap().contains("config.toml"));

    // Backend failures carry no generic advice
    assert!(LiveCamError::backend("test").user_hint().is_none());
}

#[test]
fn test_user_recoverable() {
    // These should be user-recoverable
    assert!(LiveCamError::LibraryNotFound("test".to_string()).is_user_recoverable());
    assert!(LiveCamError::DeviceNotFound("test".to_string()).is_user_recoverable());
    assert!(LiveCamError::StartRejected(0).is_user_recoverable());
    assert!(LiveCamError::converter("test").is_user_recoverable());
    assert!(LiveCamError::config("test").is_user_recoverable());

    // These should not be user-recoverable
    assert!(!LiveCamError::backend("test").is_user_recoverable());
    assert!(!LiveCamError::NotInitialised.is_user_recoverable());
    assert!(!LiveCamError::setting("test").is_user_recoverable());
}

#[test]
fn test_error_display_format() {
    let err = LiveCamError::backend("Device lost");
    assert_eq!(format!("{}", err), "Backend error: Device lost");

    let err = LiveCamError::InvalidDimensions {
        width: 8192,
        height: 0,
    };
    assert_eq!(format!("{}", err), "Invalid frame dimensions 8192x0");

    let err = LiveCamError::NotInitialised;
    assert_eq!(format!("{}", err), "Manager is not initialised");

    let err = LiveCamError::SettingTypeMismatch {
        index: 3,
        expected: "float",
    };
    assert_eq!(format!("{}", err), "Setting #3 is not a float setting");
}

#[test]
fn test_nested_context() {
    let err = LiveCamError::DeviceNotFound("Webcam".to_string())
        .with_context("Resolving device")
        .with_context("Running watch");

    let msg = format!("{}", err);
    assert!(msg.contains("Running watch"));
    // The full chain should still preserve the original hint
    assert!(err.user_hint().is_some());
    assert!(err.is_user_recoverable());
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let err: LiveCamError = io_err.into();

    let msg = format!("{}", err);
    assert!(msg.contains("I/O error"));
    assert!(msg.contains("File not found"));
}

#[test]
fn test_toml_error_conversion() {
    let parse: Result<toml::Value, _> = toml::from_str("key = ");
    let err: LiveCamError = parse.unwrap_err().into();
    assert!(matches!(err, LiveCamError::Config(_)));
}
