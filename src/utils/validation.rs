//! Common validation utilities shared across modules

/// Check if a string is empty or only whitespace
pub fn is_empty_or_whitespace(s: &str) -> bool {
    s.trim().is_empty()
}

/// True when the host is an IPv6 literal that still needs brackets before a port can be appended
pub fn needs_ipv6_brackets(host: &str) -> bool {
    host.contains(':') && !host.starts_with('[')
}

/// Join a host and a port the way a socket address is written, bracketing bare IPv6 literals
pub fn join_host_port(host: &str, port: &str) -> String {
    if needs_ipv6_brackets(host) { format!("[{}]:{}", host, port) } else { format!("{}:{}", host, port) }
}
