//! Environment-supplied configuration.
//!
//! Interface, streaming endpoint, and the VMAF toggle come from the
//! environment so the same binary runs against a lab interface or the
//! loopback without rebuilds.

use std::env;

/// Configuration read from `VSTRESS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Interface network simulations shape. `VSTRESS_INTERFACE`.
    pub interface: String,
    /// Port the external media server listens on. `VSTRESS_PORT`.
    pub port: u16,
    /// Mount path prefix for served streams. `VSTRESS_STREAM_PATH`.
    pub stream_path: String,
    /// Whether perceptual scoring uses VMAF (`1`) or falls back to PSNR
    /// (`0`). `VSTRESS_VMAF`.
    pub vmaf_enabled: bool,
}

impl EnvConfig {
    /// Loads configuration from the process environment.
    #[must_use]
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let interface = get("VSTRESS_INTERFACE").unwrap_or_else(|| "lo".to_string());
        let port = get("VSTRESS_PORT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(8554);
        let stream_path = get("VSTRESS_STREAM_PATH").unwrap_or_else(|| "/".to_string());
        let vmaf_enabled = get("VSTRESS_VMAF").as_deref() == Some("1");
        Self {
            interface,
            port,
            stream_path,
            vmaf_enabled,
        }
    }

    /// The URL a mounted stream is reachable at.
    #[must_use]
    pub fn stream_url(&self, mount: &str) -> String {
        let path = self.stream_path.trim_end_matches('/');
        format!("rtsp://localhost:{}{path}/{mount}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> EnvConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = from_map(&[]);
        assert_eq!(config.interface, "lo");
        assert_eq!(config.port, 8554);
        assert_eq!(config.stream_path, "/");
        assert!(!config.vmaf_enabled);
    }

    #[test]
    fn environment_overrides() {
        let config = from_map(&[
            ("VSTRESS_INTERFACE", "eth-test"),
            ("VSTRESS_PORT", "9000"),
            ("VSTRESS_VMAF", "1"),
        ]);
        assert_eq!(config.interface, "eth-test");
        assert_eq!(config.port, 9000);
        assert!(config.vmaf_enabled);
    }

    #[test]
    fn unparsable_port_falls_back() {
        let config = from_map(&[("VSTRESS_PORT", "not-a-port")]);
        assert_eq!(config.port, 8554);
    }

    #[test]
    fn stream_url_joins_cleanly() {
        let config = from_map(&[("VSTRESS_PORT", "8554"), ("VSTRESS_STREAM_PATH", "/live/")]);
        assert_eq!(
            config.stream_url("match.mp4"),
            "rtsp://localhost:8554/live/match.mp4"
        );
    }
}
