//! Minimal HTTP/1.1 plumbing shared by the async and blocking sessions.
//!
//! Deliberately dependency-free: one POST per connection, `Connection:
//! close`, read to EOF. Chunked transfer encoding is decoded because some
//! servers use it even for small JSON bodies.

use chainql_core::TransportError;

/// Host, port, and path split out of an endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Endpoint {
    /// Parses an `http://` URL. HTTPS is rejected: this transport speaks
    /// plain TCP only.
    pub(crate) fn parse(url: &str) -> Result<Self, TransportError> {
        let url = url.trim();
        let rest = if let Some(rest) = url.strip_prefix("http://") {
            rest
        } else if url.starts_with("https://") {
            return Err(TransportError::Network(
                "https endpoints are not supported by the built-in transport".into(),
            ));
        } else {
            url
        };

        let (authority, path) = match rest.find('/') {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, "/"),
        };

        // IPv6 literals carry colons, so the bracketed form is split first.
        let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
            let Some((host, after)) = bracketed.split_once(']') else {
                return Err(TransportError::Network(format!("invalid endpoint `{url}`")));
            };
            let port = match after.strip_prefix(':') {
                Some(port) => port
                    .parse()
                    .map_err(|_| TransportError::Network(format!("invalid port in `{url}`")))?,
                None if after.is_empty() => 80,
                None => {
                    return Err(TransportError::Network(format!("invalid endpoint `{url}`")));
                }
            };
            (host, port)
        } else {
            match authority.rsplit_once(':') {
                Some((host, port)) => {
                    let port = port
                        .parse()
                        .map_err(|_| TransportError::Network(format!("invalid port in `{url}`")))?;
                    (host, port)
                }
                None => (authority, 80),
            }
        };
        if host.is_empty() {
            return Err(TransportError::Network(format!("invalid endpoint `{url}`")));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    pub(crate) fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Builds the raw request bytes for one JSON POST.
pub(crate) fn post_request(
    endpoint: &Endpoint,
    headers: &[(String, String)],
    body: &str,
) -> String {
    let mut request = format!(
        "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        endpoint.path,
        endpoint.host,
        body.len()
    );
    for (key, value) in headers {
        request.push_str(key);
        request.push_str(": ");
        request.push_str(value);
        request.push_str("\r\n");
    }
    request.push_str("\r\n");
    request.push_str(body);
    request
}

/// Extracts the body from a raw HTTP/1.1 response, decoding chunked
/// transfer encoding when the server used it.
///
/// Works on bytes: chunk sizes count bytes, and a multi-byte character may
/// legally be split across chunks, so UTF-8 conversion happens only after
/// the framing is undone.
pub(crate) fn response_body(raw: &[u8]) -> Result<String, TransportError> {
    let (head, body) = split_head(raw)?;
    let head = String::from_utf8_lossy(head);

    let status_line = head
        .lines()
        .next()
        .ok_or_else(|| TransportError::InvalidResponse("empty response".into()))?;
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| {
            TransportError::InvalidResponse(format!("malformed status line `{status_line}`"))
        })?;
    if !(200..300).contains(&status) {
        return Err(TransportError::Http(status_line.to_string()));
    }

    let chunked = head
        .lines()
        .any(|line| line.to_ascii_lowercase().trim() == "transfer-encoding: chunked");
    let body = if chunked {
        decode_chunked(body)?
    } else {
        body.to_vec()
    };
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn split_head(raw: &[u8]) -> Result<(&[u8], &[u8]), TransportError> {
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
        return Ok((&raw[..pos], &raw[pos + 4..]));
    }
    if let Some(pos) = raw.windows(2).position(|w| w == b"\n\n") {
        return Ok((&raw[..pos], &raw[pos + 2..]));
    }
    Err(TransportError::InvalidResponse("response has no body".into()))
}

fn decode_chunked(mut body: &[u8]) -> Result<Vec<u8>, TransportError> {
    let mut decoded = Vec::new();
    loop {
        let Some((size_line, rest)) = split_chunk_line(body) else {
            return Err(TransportError::InvalidResponse(
                "chunked body ends without a terminating chunk".into(),
            ));
        };
        let size_line = String::from_utf8_lossy(size_line);
        let size = usize::from_str_radix(size_line.trim(), 16).map_err(|_| {
            TransportError::InvalidResponse(format!("bad chunk size `{}`", size_line.trim()))
        })?;
        if size == 0 {
            break;
        }
        if rest.len() < size {
            return Err(TransportError::InvalidResponse("truncated chunk in response".into()));
        }
        decoded.extend_from_slice(&rest[..size]);
        let after = &rest[size..];
        body = after
            .strip_prefix(b"\r\n")
            .or_else(|| after.strip_prefix(b"\n"))
            .unwrap_or(after);
    }
    Ok(decoded)
}

fn split_chunk_line(body: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = body.iter().position(|&b| b == b'\n')?;
    let line = body[..pos].strip_suffix(b"\r").unwrap_or(&body[..pos]);
    Some((line, &body[pos + 1..]))
}
