//! ARP-based reachability probing via the system `arping` utility.

use std::process::{Command, Stdio};

use super::Prober;

const IP_BIN: &str = "/usr/sbin/ip";
const ARPING_BIN: &str = "/usr/sbin/arping";

/// Probes the target with `arping`, bound by a per-probe timeout.
///
/// The outgoing interface is resolved on every probe with
/// `ip -oneline route get <target>`, so an interface change between samples
/// is picked up automatically. Both utilities are opaque collaborators: only
/// `arping`'s exit status is consumed (success means UP, anything else DOWN).
#[derive(Debug)]
pub struct ArpingProber {
    target: String,
    timeout_secs: u32,
    description: String,
}

impl ArpingProber {
    pub fn new(target: impl Into<String>, timeout_secs: u32) -> Self {
        let target = target.into();
        let description = format!("arping: {target}");
        Self {
            target,
            timeout_secs,
            description,
        }
    }

    /// Ask the routing table which interface reaches the target.
    fn resolve_interface(&self) -> Option<String> {
        let output = Command::new(IP_BIN)
            .args(["-oneline", "route", "get", &self.target])
            .output();
        match output {
            Ok(output) if output.status.success() => {
                interface_from_route(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                tracing::warn!(
                    target = %self.target,
                    status = %output.status,
                    "Route lookup failed"
                );
                None
            }
            Err(e) => {
                tracing::warn!(target = %self.target, error = %e, "Could not run route lookup");
                None
            }
        }
    }
}

/// Pull the interface name out of one `ip -oneline route get` line, e.g.
/// `192.168.1.17 dev wlan0 src 192.168.1.2 uid 1000`.
fn interface_from_route(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "dev" {
            return tokens.next().map(str::to_string);
        }
    }
    None
}

impl Prober for ArpingProber {
    fn probe(&mut self) -> bool {
        let Some(interface) = self.resolve_interface() else {
            tracing::warn!(target = %self.target, "No outgoing interface; treating as DOWN");
            return false;
        };

        let status = Command::new(ARPING_BIN)
            .args(["-qf", "-I", &interface, "-w"])
            .arg(self.timeout_secs.to_string())
            .arg(&self.target)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                tracing::warn!(target = %self.target, error = %e, "arping invocation failed; treating as DOWN");
                false
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_from_direct_route() {
        let line = "192.168.1.17 dev wlan0 src 192.168.1.2 uid 1000 \\    cache";
        assert_eq!(interface_from_route(line), Some("wlan0".to_string()));
    }

    #[test]
    fn test_interface_from_gateway_route() {
        let line = "8.8.8.8 via 192.168.1.1 dev eth0 src 192.168.1.2 uid 0";
        assert_eq!(interface_from_route(line), Some("eth0".to_string()));
    }

    #[test]
    fn test_interface_missing() {
        assert_eq!(interface_from_route("unreachable 8.8.8.8"), None);
        assert_eq!(interface_from_route(""), None);
    }
}
