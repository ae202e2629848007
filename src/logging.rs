use serde_json::{Map, Number, Value};

pub const WELCOME_BANNER: &str = "
🤖 Welcome to BotWork.tch Terms of Service!
🎨 Discord-themed design with smooth animations
📱 Fully responsive and mobile-friendly
⚡ Built with modern web technologies
";

#[cfg(target_arch = "wasm32")]
pub fn init(level: crate::config::LogLevel) {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the first logger.
    let _ = console_log::init_with_level(level.to_log());
}

/// One JSON object per line: `ts`, `level`, `event`, then the caller's fields.
pub fn log_event(level: log::Level, event: &str, fields: Value) {
    if !log::log_enabled!(level) {
        return;
    }

    log::log!(level, "{}", event_payload(level, event, fields));
}

fn event_payload(level: log::Level, event: &str, fields: Value) -> Value {
    let mut payload = Map::new();
    payload.insert("ts".to_string(), Value::Number(Number::from(now_unix_millis())));
    payload.insert(
        "level".to_string(),
        Value::String(level.as_str().to_ascii_lowercase()),
    );
    payload.insert("event".to_string(), Value::String(event.to_string()));

    if let Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    Value::Object(payload)
}

#[cfg(target_arch = "wasm32")]
fn now_unix_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|value| value.as_millis() as u64)
        .unwrap_or(0)
}
