#![no_main]

use libfuzzer_sys::fuzz_target;
use veil_runtime::config::OverlayConfig;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must parse or fail cleanly, never panic.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = OverlayConfig::from_toml_str(text)
        && config.validate().is_empty()
    {
        let line = config.to_jsonl();
        assert!(line.starts_with('{') && line.ends_with('}'), "bad jsonl: {line}");
        assert!(config.validated().is_ok());
    }
    let _ = OverlayConfig::from_json_str(text);
});
