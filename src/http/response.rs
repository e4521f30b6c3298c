use crate::errors::{BoxedError, Error, Result};
use crate::http::request::content_length;
use std::io::{BufReader, Read};

/// An HTTP response to be sent to a client
#[derive(Debug)]
pub struct Response {
    /// Status code of the response. Optional because that's what httparse
    /// returns, but it shouldn't happen in practice since we control the
    /// responses.
    pub status: Option<u16>,
    /// Headers for the response. Content-Length is added automatically on
    /// serialization.
    pub headers: Vec<(String, String)>,
    /// Body of the response. An empty string means no body.
    pub body: String,
}

impl Response {
    /// Creates an empty OK response (204)
    pub fn ok() -> Response {
        Response {
            status: Some(204),
            headers: vec![],
            body: "".to_string(),
        }
    }

    /// Creates an OK (200) response carrying a JSON body
    pub fn json(body: String) -> Response {
        Response {
            status: Some(200),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    /// Creates a Created (201) response carrying a JSON body
    pub fn created(body: String) -> Response {
        Response {
            status: Some(201),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    /// Creates an error response with an empty body.
    ///
    /// The code must be in the 4xx or 5xx range.
    pub fn error(code: u16) -> Response {
        assert!((400..600).contains(&code), "Invalid error code");
        Response {
            status: Some(code),
            headers: vec![],
            body: "".to_string(),
        }
    }

    /// Creates a 4xx response with a JSON error body. Server-side failures
    /// keep an empty body to avoid leaking internals; client mistakes get
    /// told what was wrong.
    pub fn client_error(code: u16, message: &str) -> Response {
        assert!((400..500).contains(&code), "Invalid client error code");
        Response {
            status: Some(code),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    /// Creates an Internal Server Error (500) response
    pub fn internal_server_error() -> Response {
        Self::error(500)
    }
}

/// Parse an HTTP response from a byte stream.
///
/// Same accumulation scheme as `parse_request`; the two stay separate
/// because httparse types request and response heads differently.
pub fn parse_response<T>(mut buf_reader: BufReader<T>) -> Result<Response>
where
    T: Sized + Read,
{
    let mut buf = [0; 4096];
    let mut buf_str = String::new();

    let (body_len, parsed_len, mut response) = loop {
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut resp = httparse::Response::new(&mut headers);
        let bytes_read = buf_reader.read(&mut buf)?;

        if bytes_read == 0 {
            return Err(Box::new(Error::ConnectionReset));
        }

        buf_str.push_str(&String::from_utf8_lossy(&buf[..bytes_read]));

        match resp.parse(buf_str.as_bytes()) {
            Ok(httparse::Status::Complete(parsed_len)) => {
                let body_len = content_length(resp.headers);

                break (
                    body_len,
                    parsed_len,
                    Response {
                        status: resp.code,
                        headers: resp
                            .headers
                            .iter()
                            .map(|h| {
                                (
                                    h.name.to_string(),
                                    String::from_utf8_lossy(h.value).to_string(),
                                )
                            })
                            .collect(),
                        body: "".to_string(),
                    },
                );
            }
            Ok(httparse::Status::Partial) => continue,
            Err(err) => return Err(BoxedError::from(err)),
        }
    };

    while body_len > buf_str.len() - parsed_len {
        let bytes_read = buf_reader.read(&mut buf)?;
        if bytes_read == 0 {
            return Err(Box::new(Error::ConnectionReset));
        }
        buf_str.push_str(&String::from_utf8_lossy(&buf[..bytes_read]));
    }
    response.body = buf_str[parsed_len..parsed_len + body_len].to_string();

    Ok(response)
}
