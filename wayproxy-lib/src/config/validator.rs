use super::root::Config;

/// Validate a loaded [`Config`] before the proxy starts.
///
/// Mirrors how backend/route cross-references are validated in comparable
/// proxies: everything that can be checked up front, is, so failures surface
/// at startup rather than mid-connection.
pub fn validate(config: &Config) -> Result<(), String> {
    if config.merge_margin <= 8 {
        return Err(format!("merge_margin must be greater than 8, got {}", config.merge_margin));
    }
    if config.listen.is_none() && config.connect.is_none() {
        return Err("at least one of listen/connect must be set".into());
    }
    if let Some(listen) = &config.listen {
        if listen.trim().is_empty() {
            return Err("listen socket path cannot be empty".into());
        }
    }
    if let Some(connect) = &config.connect {
        if connect.trim().is_empty() {
            return Err("connect socket path cannot be empty".into());
        }
    }
    if config.timeouts.connect_ms == 0 {
        return Err("connect_ms must be > 0".into());
    }
    if config.timeouts.idle_ms == 0 {
        return Err("idle_ms must be > 0".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::root::TimeoutConfig;
    use crate::config::logging::LoggingConfig;

    fn base() -> Config {
        Config {
            listen: Some("/tmp/wayproxy.sock".into()),
            connect: None,
            merge_margin: 1024,
            timeouts: TimeoutConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn rejects_small_merge_margin() {
        let mut cfg = base();
        cfg.merge_margin = 8;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn rejects_no_listen_and_no_connect() {
        let mut cfg = base();
        cfg.listen = None;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn accepts_connect_only() {
        let mut cfg = base();
        cfg.listen = None;
        cfg.connect = Some("/run/wayland-0".into());
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate(&base()).is_ok());
    }
}
