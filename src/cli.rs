use regex::Regex;

/// Errors that can occur when parsing the command line arguments
#[derive(Debug, Clone)]
pub enum CLIError {
    InvalidAddressFormat,
    MissingParameter(&'static str),
    InvalidParameter,
}

impl std::fmt::Display for CLIError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CLIError::InvalidAddressFormat => {
                write!(f, "Invalid target format. Should be <host>:<port>")
            }
            CLIError::MissingParameter(missing) => write!(f, "Missing parameter '{}'", missing),
            CLIError::InvalidParameter => write!(f, "Invalid parameter"),
        }
    }
}

impl std::error::Error for CLIError {}

/// Validate the format of a TCP address
///
/// Returns its input if the address is in the format <host>:<port>,
/// otherwise InvalidAddressFormat. Used both for the client target and for
/// the listen/upstream addresses in the server configuration.
pub fn validate_address(addr: &str) -> std::result::Result<&str, CLIError> {
    let re = Regex::new(r"^[a-zA-Z0-9\.\-]+:\d{1,5}$").unwrap();
    if re.is_match(addr) {
        Ok(addr)
    } else {
        Err(CLIError::InvalidAddressFormat)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate_address() {
        assert!(validate_address("127.0.0.1:9898").is_ok());
        assert!(validate_address("menu.example.com:80").is_ok());
        assert!(validate_address("no-port").is_err());
        assert!(validate_address("spaces in host:80").is_err());
        assert!(validate_address("127.0.0.1:123456").is_err());
    }
}
