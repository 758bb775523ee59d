//! `ipsec.conf` connection discovery
//!
//! Only three things in the file matter here: `conn <name>` declarations, the
//! `%default` section and the `auto=ignore` attribute. Everything else is
//! skipped without complaint.

const CONN_KEYWORD: &str = "conn";
const DEFAULT_SECTION: &str = "%default";
const IGNORE_ATTRIBUTE: &str = "auto=ignore";

/// A tunnel declared in the daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub name: String,
    pub ignored: bool,
}

impl Connection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ignored: false,
        }
    }
}

/// Collects the connections declared in `lines`, in declaration order.
///
/// Blank lines never close a block: attributes keep attaching to the most
/// recent `conn` until the next one starts. Attributes below `conn %default`
/// are swallowed.
pub fn parse_connections<S: AsRef<str>>(lines: &[S]) -> Vec<Connection> {
    let mut connections: Vec<Connection> = Vec::new();
    let mut current: Option<usize> = None;

    for line in lines {
        let line = line.as_ref().trim();

        if let Some(name) = connection_name(line) {
            current = match name {
                "" | DEFAULT_SECTION => None,
                name => {
                    connections.push(Connection::new(name));
                    Some(connections.len() - 1)
                }
            };
            continue;
        }

        if line == IGNORE_ATTRIBUTE {
            if let Some(index) = current {
                connections[index].ignored = true;
            }
        }
    }

    connections
}

/// Returns the declared name if `line` is a `conn` header.
///
/// A header with nothing but a comment after the keyword yields `Some("")`.
fn connection_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(CONN_KEYWORD)?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    let declared = match rest.split_once('#') {
        Some((before_comment, _)) => before_comment,
        None => rest,
    };

    Some(declared.split_whitespace().next().unwrap_or_default())
}
