//! Service detection based on well-known port numbers.
//!
//! Provides the port-to-service-name mapping used when reporting open
//! ports. The table covers the services a default 1-1000 scan is likely to
//! meet, plus a handful of common high ports.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Well-known (port, service) pairs.
const KNOWN_SERVICES: &[(u16, &str)] = &[
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (53, "dns"),
    (67, "dhcp-server"),
    (69, "tftp"),
    (80, "http"),
    (88, "kerberos"),
    (110, "pop3"),
    (111, "rpcbind"),
    (123, "ntp"),
    (135, "msrpc"),
    (137, "netbios-ns"),
    (139, "netbios-ssn"),
    (143, "imap"),
    (161, "snmp"),
    (179, "bgp"),
    (389, "ldap"),
    (443, "https"),
    (445, "microsoft-ds"),
    (465, "smtps"),
    (514, "syslog"),
    (515, "printer"),
    (554, "rtsp"),
    (587, "submission"),
    (631, "ipp"),
    (636, "ldaps"),
    (873, "rsync"),
    (993, "imaps"),
    (995, "pop3s"),
    (1080, "socks"),
    (1433, "mssql"),
    (1521, "oracle"),
    (1883, "mqtt"),
    (2049, "nfs"),
    (2181, "zookeeper"),
    (2375, "docker"),
    (3000, "grafana"),
    (3306, "mysql"),
    (3389, "rdp"),
    (5060, "sip"),
    (5432, "postgresql"),
    (5672, "amqp"),
    (5900, "vnc"),
    (6379, "redis"),
    (8000, "http-alt"),
    (8080, "http-proxy"),
    (8443, "https-alt"),
    (9090, "prometheus"),
    (9200, "elasticsearch"),
    (9418, "git"),
    (11211, "memcached"),
    (27017, "mongodb"),
];

/// Static map of well-known ports to service names.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> =
    LazyLock::new(|| KNOWN_SERVICES.iter().copied().collect());

/// Look up the probable service name for a given port.
///
/// Returns `None` if the port is not in the well-known services table.
pub fn service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// Get a descriptive string for the service on a port.
///
/// Returns "unknown" if the port is not recognized.
pub fn service_description(port: u16) -> &'static str {
    service_name(port).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ports() {
        assert_eq!(service_name(22), Some("ssh"));
        assert_eq!(service_name(80), Some("http"));
        assert_eq!(service_name(443), Some("https"));
        assert_eq!(service_name(5432), Some("postgresql"));
    }

    #[test]
    fn test_unknown_port() {
        assert_eq!(service_name(12345), None);
        assert_eq!(service_description(12345), "unknown");
    }
}
