//! Service URL baked in at compile time.
//!
//! When `ROADSHOCK_API_BASE` is set at build time the dashboard talks to that
//! simulation service; otherwise it falls back to the local default.
use roadshock_core::constants::DEFAULT_API_BASE;

/// Base URL of the simulation service.
#[must_use]
pub fn api_base() -> String {
    api_base_with(option_env!("ROADSHOCK_API_BASE"))
}

fn api_base_with(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_defaults_to_local_service() {
        assert_eq!(api_base_with(None), "http://127.0.0.1:8000");
        assert_eq!(api_base_with(Some("  ")), "http://127.0.0.1:8000");
    }

    #[test]
    fn api_base_drops_trailing_slash() {
        assert_eq!(
            api_base_with(Some("https://sim.example.org/api/")),
            "https://sim.example.org/api"
        );
    }
}
