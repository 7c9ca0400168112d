use std::net::SocketAddr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5008;

// Trimmed value of `key`, or None when unset. Blank values are noted and ignored.
fn non_blank(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    notes: &mut Vec<String>,
) -> Option<String> {
    let raw = lookup(key)?;
    let value = raw.trim();
    if value.is_empty() {
        notes.push(format!("{key} is set but blank; ignoring it"));
        return None;
    }
    Some(value.to_string())
}

/// Bind settings. Host and port are the only knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// Reads `AIR_RELAY_HOST` and `AIR_RELAY_PORT` (falling back to `PORT`).
    /// Unusable values fall back to the defaults with a warning.
    pub fn from_env() -> Self {
        let (settings, notes) = Self::from_lookup(|key| std::env::var(key).ok());
        for note in &notes {
            tracing::warn!("{note}");
        }
        settings
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut notes = Vec::new();

        let host = non_blank(&lookup, "AIR_RELAY_HOST", &mut notes)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let raw_port = match non_blank(&lookup, "AIR_RELAY_PORT", &mut notes) {
            Some(raw) => Some(raw),
            None => non_blank(&lookup, "PORT", &mut notes),
        };
        let port = match raw_port {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|e| {
                notes.push(format!("invalid port {raw:?}: {e}; falling back to {DEFAULT_PORT}"));
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        (Self { host, port }, notes)
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}
