#![no_main]

use libfuzzer_sys::fuzz_target;
use vela_ai::{parse_model_version, ModelVersion};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    if let Some(version) = parse_model_version(&raw) {
        let rendered = version.to_string();
        assert_eq!(rendered.parse::<ModelVersion>(), Ok(version));
        assert_eq!(
            parse_model_version(&format!("models/gemini-{rendered}-flash")),
            Some(version)
        );
    }
});
