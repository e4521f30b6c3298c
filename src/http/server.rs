use crate::http::{parse_request, Request, Response};
use crate::{errors, threadpool::ThreadPool};
use std::io::{BufReader, Write};
use std::net::{TcpListener, TcpStream};
use tracing::error;

/// Turn an HTTP status code into its reason phrase
pub fn code_to_string(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        c => panic!("Missing reason phrase for code {}", c),
    }
}

/// This is the main server.
///
/// It listens for incoming connections on a TCP socket, parses the requests
/// and dispatches them to a handler. Whatever the handler produces is then
/// converted into an HTTP response and sent back to the client.
pub struct HttpServer {
    listener: TcpListener,
}

impl HttpServer {
    /// Create a new server listening on the given address
    pub fn new(addr: &str) -> errors::Result<Self> {
        Ok(HttpServer {
            listener: TcpListener::bind(addr)?,
        })
    }

    /// Start the server.
    ///
    /// Calls the handler with the incoming requests. Uses a threadpool
    /// internally to handle the requests concurrently on as many threads as
    /// the system can handle.
    ///
    /// This function is blocking, with no real way of stopping it (except
    /// the socket being forcefully closed by the OS or the program being
    /// killed).
    pub fn serve<F>(&self, handler: F)
    where
        F: Fn(Request) -> Response + Send + Sync + 'static + Clone,
    {
        let threadpool = ThreadPool::new(
            std::thread::available_parallelism()
                .map(|x| x.into())
                .unwrap_or(4),
        );
        for stream in self.listener.incoming() {
            let mut stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    error!("Failed to accept connection: {}", err);
                    continue;
                }
            };
            let handler = handler.clone();
            threadpool.execute(move || handle_stream(&mut stream, &handler))
        }
    }

    /// Utility function for one-shot servers.
    ///
    /// This is mostly for testing; it listens to a single connection,
    /// processes the request and exits.
    pub fn serve_once<F>(&self, handler: F)
    where
        F: Fn(Request) -> Response,
    {
        let mut stream = self.listener.incoming().next().unwrap().unwrap();
        handle_stream(&mut stream, &handler);
    }
}

/// Parse an HTTP request from a TCP stream, call the handler and write back
/// the answer. Unparseable requests get a bare 400.
fn handle_stream<F>(mut stream: &mut TcpStream, handler: F)
where
    F: Fn(Request) -> Response,
{
    let buf_reader = BufReader::new(&mut stream);
    match parse_request(buf_reader) {
        Ok(req) => respond(&mut stream, handler(req)),
        Err(_) => respond(&mut stream, Response::error(400)),
    }
}

/// Writes an HTTP response to a stream
fn respond(stream: &mut TcpStream, resp: Response) {
    let status = stream.write_all(
        format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}\r\n{}",
            resp.status.unwrap_or(500),
            code_to_string(resp.status.unwrap_or(500)),
            resp.body.len(),
            resp.headers
                .iter()
                .map(|(k, v)| format!["{}: {}\r\n", k, v])
                .collect::<Vec<_>>()
                .join(""),
            resp.body
        )
        .as_bytes(),
    );

    if let Err(err) = status {
        error!("Failed to respond: {}", err);
    }
}
