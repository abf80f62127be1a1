use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use url::Url;

/// Answers "is the network reachable for this target right now".
pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self, target: &str) -> bool;
}

/// Probe that resolves the target host and attempts a short TCP connect.
///
/// Targets that are not http(s) URLs (relative paths, file references) need
/// no network and always count as reachable.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    pub connect_timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(1_500),
        }
    }
}

impl ConnectivityProbe for TcpProbe {
    fn is_online(&self, target: &str) -> bool {
        let Ok(url) = Url::parse(target) else {
            return true;
        };
        if !matches!(url.scheme(), "http" | "https") {
            return true;
        }
        let Some(host) = url.host_str() else {
            return true;
        };
        let port = url.port_or_known_default().unwrap_or(443);

        let Ok(addrs) = (host, port).to_socket_addrs() else {
            // DNS resolution failing is the usual offline signature.
            return false;
        };
        for addr in addrs.take(3) {
            if TcpStream::connect_timeout(&addr, self.connect_timeout).is_ok() {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_network_targets_are_reachable() {
        let probe = TcpProbe::default();
        assert!(probe.is_online("home.html"));
        assert!(probe.is_online("./pages/home.html"));
    }

    #[test]
    fn unresolvable_host_is_offline() {
        let probe = TcpProbe {
            connect_timeout: Duration::from_millis(200),
        };
        assert!(!probe.is_online("https://no-such-host.invalid/home.html"));
    }
}
