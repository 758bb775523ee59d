//! Classification of `ipsec status <name>` output

use std::{fmt, sync::LazyLock};

use regex::Regex;

static INSTALLED_TUNNEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bINSTALLED,\s*TUNNEL\b").expect("valid installed pattern"));
static ESTABLISHED_SA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bESTABLISHED\b").expect("valid established pattern"));
static REKEYED_TUNNEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bREKEYED,\s*TUNNEL\b").expect("valid rekeyed pattern"));

/// Health of a single tunnel as reported by the status command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunnelStatus {
    /// The ESP tunnel is installed and carrying traffic.
    TunnelInstalled,
    /// The IKE SA is up but no tunnel is installed yet.
    ConnectionEstablished,
    /// Nothing recognizable was reported.
    Down,
}

impl TunnelStatus {
    pub fn metric_value(self) -> i64 {
        match self {
            Self::TunnelInstalled => 0,
            Self::ConnectionEstablished => 1,
            Self::Down => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TunnelInstalled => "tunnel_installed",
            Self::ConnectionEstablished => "connection_established",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for TunnelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies raw status output.
///
/// The strongest signal wins no matter where it appears in the text: an
/// installed tunnel always reports an established SA as well.
pub fn classify_status(output: &[u8]) -> TunnelStatus {
    let text = String::from_utf8_lossy(output);

    if INSTALLED_TUNNEL.is_match(&text) {
        return TunnelStatus::TunnelInstalled;
    }

    if ESTABLISHED_SA.is_match(&text) || REKEYED_TUNNEL.is_match(&text) {
        return TunnelStatus::ConnectionEstablished;
    }

    TunnelStatus::Down
}

#[cfg(test)]
mod tests {
    use super::{classify_status, TunnelStatus};

    const ESTABLISHED_REKEYED: &str = "Security Associations (1 up, 0 connecting):\n  fancy[3]: ESTABLISHED 16 hours ago, 10.0.0.7[213.123.123.9]...212.93.93.93[212.93.93.93]\n\t fancy{134}:  REKEYED, TUNNEL, reqid 2, ESP in UDP SPIs: cc2e965d_i 6d01c0d7_o\n \tfancy{134}:   10.2.0.112/29 === 10.3.0.0/24";
    const ESTABLISHED_INSTALLED: &str = "Security Associations (1 up, 0 connecting):\n  fancy[3]: ESTABLISHED 16 hours ago, 10.0.0.7[213.123.123.9]...212.93.93.93[212.93.93.93]\n\t fancy{134}:  INSTALLED, TUNNEL, reqid 2, ESP in UDP SPIs: cc2e965d_i 6d01c0d7_o\n \tfancy{134}:   10.2.0.112/29 === 10.3.0.0/24";

    #[test]
    fn no_match_is_down() {
        let status = classify_status(b"Security Associations (1 up, 0 connecting):\n\t no match");

        assert_eq!(status, TunnelStatus::Down);
    }

    #[test]
    fn empty_output_is_down() {
        assert_eq!(classify_status(b""), TunnelStatus::Down);
    }

    #[test]
    fn rekeyed_without_install_is_established() {
        assert_eq!(
            classify_status(ESTABLISHED_REKEYED.as_bytes()),
            TunnelStatus::ConnectionEstablished
        );
    }

    #[test]
    fn installed_tunnel_is_operational() {
        assert_eq!(
            classify_status(ESTABLISHED_INSTALLED.as_bytes()),
            TunnelStatus::TunnelInstalled
        );
    }

    #[test]
    fn installed_wins_regardless_of_order() {
        let reordered = "  fancy{134}:  INSTALLED, TUNNEL, reqid 2\n  fancy[3]: ESTABLISHED 1 minute ago";

        assert_eq!(
            classify_status(reordered.as_bytes()),
            TunnelStatus::TunnelInstalled
        );
    }

    #[test]
    fn rekeyed_tunnel_alone_is_established() {
        let output = "  fancy{7}:  REKEYED, TUNNEL, reqid 1";

        assert_eq!(
            classify_status(output.as_bytes()),
            TunnelStatus::ConnectionEstablished
        );
    }

    #[test]
    fn keywords_inside_names_do_not_trigger() {
        let output = "Security Associations (0 up, 1 connecting):\n  NOT_ESTABLISHED_dc[1]: CONNECTING, 10.0.0.7...212.93.93.93\n  UNINSTALLED_TUNNEL_dc{2}: nothing";

        assert_eq!(classify_status(output.as_bytes()), TunnelStatus::Down);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let output = "fancy[3]: established 1 minute ago\nfancy{1}: installed, tunnel";

        assert_eq!(classify_status(output.as_bytes()), TunnelStatus::Down);
    }

    #[test]
    fn installed_transport_is_not_a_tunnel() {
        let output = "fancy[3]: ESTABLISHED 2 minutes ago\nfancy{1}:  INSTALLED, TRANSPORT, reqid 1";

        assert_eq!(
            classify_status(output.as_bytes()),
            TunnelStatus::ConnectionEstablished
        );
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let mut output = vec![0xff, 0xfe];
        output.extend_from_slice(ESTABLISHED_INSTALLED.as_bytes());

        assert_eq!(classify_status(&output), TunnelStatus::TunnelInstalled);
    }

    #[test]
    fn classification_is_repeatable() {
        let first = classify_status(ESTABLISHED_REKEYED.as_bytes());
        let second = classify_status(ESTABLISHED_REKEYED.as_bytes());

        assert_eq!(first, second);
    }

    #[test]
    fn displays_snake_case_names() {
        assert_eq!(TunnelStatus::TunnelInstalled.to_string(), "tunnel_installed");
        assert_eq!(
            TunnelStatus::ConnectionEstablished.to_string(),
            "connection_established"
        );
        assert_eq!(TunnelStatus::Down.to_string(), "down");
    }

    #[test]
    fn metric_values_are_stable() {
        assert_eq!(TunnelStatus::TunnelInstalled.metric_value(), 0);
        assert_eq!(TunnelStatus::ConnectionEstablished.metric_value(), 1);
        assert_eq!(TunnelStatus::Down.metric_value(), 2);
    }
}
