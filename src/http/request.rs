use crate::errors::{BoxedError, Error, Result};
use std::io::{BufReader, Read};

/// Represents an HTTP request.
///
/// The query string is split off the path at parse time so that routing
/// matches on the bare path and handlers read parameters by name.
#[derive(Debug)]
pub struct Request {
    /// The HTTP method used in the request
    pub method: String,
    /// The path of the request, without the query string
    pub path: String,
    /// Decoded query parameters, in the order they appeared
    pub query: Vec<(String, String)>,
    /// Headers of the request
    pub headers: Vec<(String, String)>,
    /// Body of the request
    pub body: String,
}

impl Request {
    /// Create a new request from scratch. `target` may carry a query string.
    pub fn new(method: &str, target: &str, headers: Vec<(String, String)>, body: String) -> Request {
        let (path, query) = split_query(target);
        Request {
            method: method.to_string(),
            path,
            query,
            headers,
            body,
        }
    }

    /// Create a new GET request for the given target, with an empty body
    pub fn get(target: &str) -> Request {
        Request::new("GET", target, vec![], "".to_string())
    }

    /// Create a new POST request for the given target, with the given body
    pub fn post(target: &str, body: String) -> Request {
        Request::new("POST", target, vec![], body)
    }

    /// Create a new PUT request for the given target, with the given body
    pub fn put(target: &str, body: String) -> Request {
        Request::new("PUT", target, vec![], body)
    }

    /// Create a new PATCH request for the given target, with the given body
    pub fn patch(target: &str, body: String) -> Request {
        Request::new("PATCH", target, vec![], body)
    }

    /// Create a new DELETE request for the given target, with an empty body
    pub fn delete(target: &str) -> Request {
        Request::new("DELETE", target, vec![], "".to_string())
    }

    /// First value of the given query parameter, if present
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Split a request target into its path and parsed query pairs
pub fn split_query(target: &str) -> (String, Vec<(String, String)>) {
    match target.split_once('?') {
        None => (target.to_string(), vec![]),
        Some((path, query)) => {
            let pairs = query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((k, v)) => (k.to_string(), v.to_string()),
                    None => (pair.to_string(), "".to_string()),
                })
                .collect();
            (path.to_string(), pairs)
        }
    }
}

/// Parse an HTTP request from a byte stream
///
/// Headers are accumulated across reads until httparse reports a complete
/// head, then the body is read up to Content-Length.
pub fn parse_request<T>(mut buf_reader: BufReader<T>) -> Result<Request>
where
    T: Sized + Read,
{
    let mut buf = [0; 4096];
    let mut buf_str = String::new();

    let (body_len, parsed_len, mut request) = loop {
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        let bytes_read = buf_reader.read(&mut buf)?;

        if bytes_read == 0 {
            return Err(Box::new(Error::ConnectionReset));
        }

        buf_str.push_str(&String::from_utf8_lossy(&buf[..bytes_read]));

        match req.parse(buf_str.as_bytes()) {
            Ok(httparse::Status::Complete(parsed_len)) => {
                let body_len = content_length(req.headers);
                let headers = req
                    .headers
                    .iter()
                    .map(|h| {
                        (
                            h.name.to_string(),
                            String::from_utf8_lossy(h.value).to_string(),
                        )
                    })
                    .collect();

                break (
                    body_len,
                    parsed_len,
                    Request::new(
                        req.method.unwrap_or("GET"),
                        req.path.unwrap_or("/"),
                        headers,
                        "".to_string(),
                    ),
                );
            }
            Ok(httparse::Status::Partial) => continue,
            Err(err) => return Err(BoxedError::from(err)),
        }
    };

    // Requests are not pipelined on this connection, so reading exactly
    // Content-Length bytes past the head is safe for HTTP/1.1.
    while body_len > buf_str.len() - parsed_len {
        let bytes_read = buf_reader.read(&mut buf)?;
        if bytes_read == 0 {
            return Err(Box::new(Error::ConnectionReset));
        }
        buf_str.push_str(&String::from_utf8_lossy(&buf[..bytes_read]));
    }
    request.body = buf_str[parsed_len..parsed_len + body_len].to_string();

    Ok(request)
}

pub(crate) fn content_length(headers: &[httparse::Header]) -> usize {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("Content-Length"))
        .and_then(|h| String::from_utf8_lossy(h.value).parse::<usize>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_parse_simple_request() {
        let req_str = b"GET / HTTP/1.1\r\nHost: localhost:8080\r\nUser-Agent: curl/7.68.0\r\nAccept: */*\r\n\r\n";
        let buf_reader = BufReader::new(&req_str[..]);

        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.method, "GET");
        assert_eq!(parsed_req.path, "/");
        assert!(parsed_req.query.is_empty());
        assert_eq!(parsed_req.headers.len(), 3);
        assert_eq!(parsed_req.body, "");
    }

    #[test]
    fn test_parse_request_with_query_string() {
        let req_str =
            b"GET /api/v1/menu-items?category=mains&popular=true&limit=4 HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let buf_reader = BufReader::new(&req_str[..]);

        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.path, "/api/v1/menu-items");
        assert_eq!(parsed_req.query_param("category"), Some("mains"));
        assert_eq!(parsed_req.query_param("popular"), Some("true"));
        assert_eq!(parsed_req.query_param("limit"), Some("4"));
        assert_eq!(parsed_req.query_param("missing"), None);
    }

    #[test]
    fn test_parse_incomplete_request() {
        let req_str =
            b"GET / HTTP/1.1\r\nHost: localhost:8080\r\nUser-Agent: curl/7.68.0\r\nAccept: */*";
        let buf_reader = BufReader::new(&req_str[..]);

        let parsed_req = parse_request(buf_reader);

        assert!(parsed_req.is_err());
    }

    #[test]
    fn test_parse_request_with_body() {
        let body = "{ \"quantity\": 2 }";
        let req_str = format!(
            "POST /api/v1/cart/abc/items HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );

        let buf_reader = BufReader::new(req_str.as_bytes());

        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.method, "POST");
        assert_eq!(parsed_req.path, "/api/v1/cart/abc/items");
        assert_eq!(parsed_req.body, body);
    }

    #[test]
    fn test_parse_request_with_large_body() {
        let mut rng = rand::thread_rng();
        let mut buffer = [0; 40960];
        for c in buffer.iter_mut() {
            *c = rng.gen_range(b'a'..=b'z')
        }
        let body = String::from_utf8_lossy(&buffer);

        let req_str = format!(
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n{}",
            buffer.len(),
            body
        );

        let buf_reader = BufReader::new(req_str.as_bytes());
        let parsed_req = parse_request(buf_reader).unwrap();

        assert_eq!(parsed_req.body, body);
    }

    #[test]
    fn test_split_query_edge_cases() {
        let (path, query) = split_query("/a/b");
        assert_eq!(path, "/a/b");
        assert!(query.is_empty());

        let (path, query) = split_query("/a/b?flag&k=v");
        assert_eq!(path, "/a/b");
        assert_eq!(query, vec![
            ("flag".to_string(), "".to_string()),
            ("k".to_string(), "v".to_string()),
        ]);
    }
}
