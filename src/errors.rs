pub type BoxedError = Box<dyn std::error::Error>;
pub type Result<T> = std::result::Result<T, BoxedError>;

#[derive(Debug)]
pub enum Error {
    /// A time string that is neither "HH:MM(:SS)" nor "H:MM AM/PM".
    ///
    /// This must stay a distinct kind: availability checks treat it as
    /// "cannot determine availability" and exclude the item, instead of
    /// silently reading a broken window as minute zero.
    MalformedTime(String),
    NotFound(String),
    BadRequest(String),
    /// Revalidation secret missing or wrong
    Unauthorized(String),
    /// Invalid startup configuration, fatal
    Config(String),
    /// The upstream content/payment API answered with an error or garbage
    Upstream(String),
    NoResponse,
    ConnectionReset,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedTime(t) => write!(f, "Malformed time: {}", t),
            Error::NotFound(err) => write!(f, "Not found: {}", err),
            Error::BadRequest(err) => write!(f, "Bad request: {}", err),
            Error::Unauthorized(err) => write!(f, "Unauthorized: {}", err),
            Error::Config(err) => write!(f, "Invalid configuration: {}", err),
            Error::Upstream(err) => write!(f, "Upstream failure: {}", err),
            Error::NoResponse => write!(f, "No response from server"),
            Error::ConnectionReset => write!(f, "Connection reset by peer"),
        }
    }
}

impl std::error::Error for Error {}
