use crate::topology::types::ServerId;

/// A coordinate pair token of the form `±DD.DDDDDD±DDD.DDDDDD`.
///
/// The client's exact text is kept alongside the parsed degrees so that
/// replies and persisted lines echo the position verbatim instead of
/// re-rendering it through float formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    raw: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Splits the token at the sign that opens the longitude component.
    /// Both components must be sign-prefixed plain decimals.
    pub fn parse(token: &str) -> Option<Self> {
        if !token.starts_with(['+', '-']) {
            return None;
        }
        let split = token[1..].find(['+', '-'])? + 1;
        let (lat, lon) = token.split_at(split);
        Some(Self {
            raw: token.to_string(),
            latitude: parse_decimal(lat)?,
            longitude: parse_decimal(lon)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// A POSIX timestamp token (seconds, optionally fractional), kept verbatim
/// for echoing and parsed once for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    raw: String,
    pub seconds: f64,
}

impl Timestamp {
    pub fn parse(token: &str) -> Option<Self> {
        Some(Self {
            raw: token.to_string(),
            seconds: parse_decimal(token)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// The unit of knowledge about one client's last reported position.
///
/// `origin_server` and `server_time` are fixed at the moment the report is
/// first accepted and carried unchanged through every flood hop;
/// `client_time` alone decides recency when two records for the same client
/// meet. Records are immutable; the location table replaces entries
/// wholesale.
#[derive(Debug, Clone)]
pub struct LocationRecord {
    pub client_id: String,
    pub position: Position,
    pub client_time: Timestamp,
    pub origin_server: ServerId,
    pub server_time: f64,
}

impl LocationRecord {
    /// Client-to-origin propagation delay as displayed in the `AT` form.
    pub fn latency(&self) -> f64 {
        self.server_time - self.client_time.seconds
    }

    /// Canonical textual form: the `IAMAT` reply, the persisted form, and
    /// the flood wire form minus the relay marker.
    pub fn canonical_line(&self) -> String {
        format!(
            "AT {} {:+} {} {} {}",
            self.origin_server,
            self.latency(),
            self.client_id,
            self.position.as_str(),
            self.client_time.as_str()
        )
    }

    /// Flood wire form: the canonical line plus the forwarding server's
    /// identity, so the receiver can attribute the connection to a peer and
    /// suppress echo-back. The marker never reaches disk or the table.
    pub fn relayed_line(&self, relay: &ServerId) -> String {
        format!("{} {}", self.canonical_line(), relay)
    }
}

/// One inbound line, classified exactly once. Dispatch matches on the
/// variant and never re-inspects the raw text.
#[derive(Debug, Clone)]
pub enum Message {
    IamAt {
        client_id: String,
        position: Position,
        client_time: Timestamp,
    },
    WhatsAt {
        client_id: String,
        radius_km: f64,
        max_results: usize,
    },
    At {
        record: LocationRecord,
        relayed_from: Option<ServerId>,
    },
    Malformed {
        raw: String,
    },
}

impl Message {
    pub fn parse(line: &str) -> Message {
        let line = line.trim_end_matches(['\r', '\n']);
        match Self::try_parse(line) {
            Some(message) => message,
            None => Message::Malformed {
                raw: line.to_string(),
            },
        }
    }

    fn try_parse(line: &str) -> Option<Message> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (verb, args) = parts.split_first()?;

        match (*verb, args) {
            ("IAMAT", [client_id, position, client_time]) => Some(Message::IamAt {
                client_id: client_id.to_string(),
                position: Position::parse(position)?,
                client_time: Timestamp::parse(client_time)?,
            }),
            ("WHATSAT", [client_id, radius, limit]) => Some(Message::WhatsAt {
                client_id: client_id.to_string(),
                radius_km: parse_decimal(radius)?,
                max_results: limit.parse().ok()?,
            }),
            ("AT", [origin, latency, client_id, position, client_time]) => {
                Self::parse_at(origin, latency, client_id, position, client_time, None)
            }
            ("AT", [origin, latency, client_id, position, client_time, relay]) => Self::parse_at(
                origin,
                latency,
                client_id,
                position,
                client_time,
                Some(ServerId::from(*relay)),
            ),
            _ => None,
        }
    }

    fn parse_at(
        origin: &str,
        latency: &str,
        client_id: &str,
        position: &str,
        client_time: &str,
        relayed_from: Option<ServerId>,
    ) -> Option<Message> {
        let latency = parse_decimal(latency)?;
        let client_time = Timestamp::parse(client_time)?;
        // The origin's clock is reconstructed, not re-measured: the latency
        // it stamped travels with the record through every hop.
        let server_time = client_time.seconds + latency;

        Some(Message::At {
            record: LocationRecord {
                client_id: client_id.to_string(),
                position: Position::parse(position)?,
                client_time,
                origin_server: ServerId::from(origin),
                server_time,
            },
            relayed_from,
        })
    }
}

/// Plain signed decimal: optional sign, digits, at most one dot. Rejects
/// the exponents, infinities, and NaN that `f64::from_str` would accept.
fn parse_decimal(token: &str) -> Option<f64> {
    let body = token.strip_prefix(['+', '-']).unwrap_or(token);
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if body.chars().filter(|&c| c == '.').count() > 1 || !body.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }
    token.parse().ok()
}
