//! Parsing of `lsof -i -P -n` output into listening-port records.

use crate::common::types::PortRecord;
use std::collections::HashSet;

/// Minimum whitespace-separated fields in a usable lsof row
const MIN_FIELDS: usize = 9;

/// Parse every LISTEN row of an lsof listing.
///
/// Rows with too few fields, a non-numeric pid, or a NAME column without a
/// trailing `:port` are skipped. Duplicate (pid, port) pairs keep the first
/// row seen, so a process bound on both IPv4 and IPv6 shows up once.
pub fn parse_listening_sockets(output: &str) -> Vec<PortRecord> {
    let mut seen = HashSet::new();

    output
        .lines()
        .filter(|line| line.contains("LISTEN"))
        .filter_map(parse_lsof_line)
        .filter(|record| seen.insert((record.pid, record.port)))
        .collect()
}

/// Parse a single lsof row.
///
/// Layout: `COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME [(STATE)]`
fn parse_lsof_line(line: &str) -> Option<PortRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let command = fields[0];
    let pid: u32 = fields[1].parse().ok()?;
    let user = fields[2];
    let address = fields[8];
    let port = trailing_port(address)?;

    Some(PortRecord::new(port, pid, command, user, address))
}

/// Port from the `:digits` suffix of an address such as `*:3000` or `[::1]:8080`.
pub fn trailing_port(address: &str) -> Option<u16> {
    let (_, digits) = address.rsplit_once(':')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "COMMAND     PID   USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME";

    #[test]
    fn test_trailing_port_ipv4() {
        assert_eq!(trailing_port("127.0.0.1:8080"), Some(8080));
    }

    #[test]
    fn test_trailing_port_wildcard() {
        assert_eq!(trailing_port("*:3000"), Some(3000));
    }

    #[test]
    fn test_trailing_port_ipv6() {
        assert_eq!(trailing_port("[::1]:443"), Some(443));
        assert_eq!(trailing_port("[::]:9090"), Some(9090));
    }

    #[test]
    fn test_trailing_port_invalid() {
        assert_eq!(trailing_port("no-colon"), None);
        assert_eq!(trailing_port("127.0.0.1:http"), None);
        assert_eq!(trailing_port("127.0.0.1:"), None);
        assert_eq!(trailing_port("localhost:80->remote:1234x"), None);
        assert_eq!(trailing_port(""), None);
    }

    #[test]
    fn test_parse_lsof_line_valid() {
        let line = "node       1234 alice   22u  IPv4 0x1234  0t0  TCP 127.0.0.1:3000 (LISTEN)";
        let record = parse_lsof_line(line).unwrap();
        assert_eq!(record.command, "node");
        assert_eq!(record.pid, 1234);
        assert_eq!(record.user, "alice");
        assert_eq!(record.address, "127.0.0.1:3000");
        assert_eq!(record.port, 3000);
        assert!(record.cwd.is_pending());
        assert!(record.full_command.is_pending());
    }

    #[test]
    fn test_parse_lsof_line_too_few_fields() {
        assert!(parse_lsof_line("node 1234 alice 22u IPv4 0x1 0t0 *:80").is_none());
        assert!(parse_lsof_line("short line").is_none());
        assert!(parse_lsof_line("").is_none());
    }

    #[test]
    fn test_parse_lsof_line_bad_pid() {
        let line = "node   notpid alice 22u IPv4 0x1234 0t0 TCP *:80 (LISTEN)";
        assert!(parse_lsof_line(line).is_none());
    }

    #[test]
    fn test_parse_skips_header_and_non_listen_rows() {
        let output = format!(
            "{}\n{}\n{}\n",
            HEADER,
            "node   1234 alice 22u IPv4 0x1 0t0 TCP 127.0.0.1:3000 (LISTEN)",
            "node   1234 alice 23u IPv4 0x2 0t0 TCP 127.0.0.1:3000->127.0.0.1:50000 (ESTABLISHED)",
        );
        let records = parse_listening_sockets(&output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].port, 3000);
    }

    #[test]
    fn test_parse_dedups_pid_port_pairs() {
        let output = "\
node   1234 alice 22u IPv4 0x1 0t0 TCP 127.0.0.1:3000 (LISTEN)
node   1234 alice 23u IPv6 0x2 0t0 TCP [::1]:3000 (LISTEN)
node   1234 alice 24u IPv4 0x3 0t0 TCP *:3001 (LISTEN)
nginx  5678 root  10u  IPv4 0x4 0t0 TCP *:3000 (LISTEN)
";
        let records = parse_listening_sockets(output);
        let keys: Vec<(u32, u16)> = records.iter().map(|r| (r.pid, r.port)).collect();
        assert_eq!(keys, vec![(1234, 3000), (1234, 3001), (5678, 3000)]);
        // First occurrence wins
        assert_eq!(records[0].address, "127.0.0.1:3000");

        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_parse_skips_rows_without_trailing_port() {
        let output = "\
cupsd  300 root 7u IPv4 0x1 0t0 TCP localhost:ipp (LISTEN)
sshd   400 root 3u IPv4 0x2 0t0 TCP *:22 (LISTEN)
";
        let records = parse_listening_sockets(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].command, "sshd");
        assert_eq!(records[0].port, 22);
    }

    #[test]
    fn test_parse_short_listen_rows_contribute_nothing() {
        let output = "LISTEN\nnode 1 u LISTEN *:80\n";
        assert!(parse_listening_sockets(output).is_empty());
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_listening_sockets("").is_empty());
    }
}
