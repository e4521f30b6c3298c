use crate::cli::validate_address;
use crate::errors::{Error, Result};
use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use regex::Regex;

/// Default address the server listens on
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:9898";
/// Default address of the upstream content/payment API
pub const DEFAULT_UPSTREAM_ADDRESS: &str = "127.0.0.1:9999";
/// How many selectable pickup days to offer, today included
pub const DEFAULT_DAYS_AHEAD: u32 = 7;
/// Upper bound on the `days_ahead` query parameter. The endpoint is
/// unauthenticated, so the request must not be able to size the response.
pub const MAX_DAYS_AHEAD: u32 = 60;
/// Pickup slot grid, in minutes
pub const DEFAULT_INTERVAL_MINUTES: u32 = 15;

/// Operating hours of the restaurant, immutable for the process lifetime
#[derive(Debug, Clone)]
pub struct RestaurantHours {
    /// IANA timezone the opening hours are expressed in. All "now" reads
    /// happen in this timezone, never in the server's local time.
    pub timezone: Tz,
    /// Weekdays with no pickup at all
    pub closed_days: Vec<Weekday>,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl RestaurantHours {
    pub fn is_closed_on(&self, day: Weekday) -> bool {
        self.closed_days.contains(&day)
    }
}

/// Full server configuration, validated once at startup.
///
/// Nothing else in the crate reads the environment; every collaborator gets
/// its values injected from here.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_address: String,
    pub upstream_address: String,
    /// Shared secret guarding the revalidation endpoint
    pub revalidate_secret: String,
    pub hours: RestaurantHours,
    pub days_ahead: u32,
    pub interval_minutes: u32,
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// the defaults above. Any invalid value is a fatal `Error::Config`.
    pub fn from_env() -> Result<Config> {
        let listen_address =
            std::env::var("TAVOLA_LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN_ADDRESS.to_string());
        let upstream_address = std::env::var("TAVOLA_UPSTREAM")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_ADDRESS.to_string());
        let revalidate_secret = std::env::var("TAVOLA_REVALIDATE_SECRET").unwrap_or_default();
        let timezone = std::env::var("TAVOLA_TIMEZONE").unwrap_or_else(|_| "America/New_York".to_string());
        let closed_days = std::env::var("TAVOLA_CLOSED_DAYS").unwrap_or_else(|_| "Mon".to_string());
        let open = std::env::var("TAVOLA_OPEN").unwrap_or_else(|_| "11:00".to_string());
        let close = std::env::var("TAVOLA_CLOSE").unwrap_or_else(|_| "22:30".to_string());

        Config::build(
            &listen_address,
            &upstream_address,
            &revalidate_secret,
            &timezone,
            &closed_days,
            &open,
            &close,
        )
    }

    /// Assemble and validate a configuration from raw string values
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        listen_address: &str,
        upstream_address: &str,
        revalidate_secret: &str,
        timezone: &str,
        closed_days: &str,
        open: &str,
        close: &str,
    ) -> Result<Config> {
        validate_address(listen_address)
            .map_err(|err| Error::Config(format!("listen address: {}", err)))?;
        validate_address(upstream_address)
            .map_err(|err| Error::Config(format!("upstream address: {}", err)))?;

        let timezone: Tz = timezone
            .parse()
            .map_err(|_| Error::Config(format!("unknown timezone '{}'", timezone)))?;

        let closed_days = parse_closed_days(closed_days)?;
        let open = parse_local_time(open)?;
        let close = parse_local_time(close)?;

        if open >= close {
            return Err(Error::Config(format!(
                "opening time {} is not before closing time {}",
                open, close
            ))
            .into());
        }

        Ok(Config {
            listen_address: listen_address.to_string(),
            upstream_address: upstream_address.to_string(),
            revalidate_secret: revalidate_secret.to_string(),
            hours: RestaurantHours {
                timezone,
                closed_days,
                open,
                close,
            },
            days_ahead: DEFAULT_DAYS_AHEAD,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
        })
    }
}

/// Parse a comma-separated list of weekday names ("Mon,Tue"). Empty input
/// means the restaurant is open every day.
fn parse_closed_days(raw: &str) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day: Weekday = part
            .parse()
            .map_err(|_| Error::Config(format!("unknown weekday '{}'", part)))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

/// Parse a local "HH:MM" time-of-day string
fn parse_local_time(raw: &str) -> Result<NaiveTime> {
    let re = Regex::new(r"^\d{2}:\d{2}$").unwrap();
    if !re.is_match(raw) {
        return Err(Error::Config(format!("'{}' is not a HH:MM time", raw)).into());
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| Error::Config(format!("'{}' is not a valid time of day", raw)).into())
}

#[cfg(test)]
mod test {
    use super::*;

    fn build(open: &str, close: &str, closed_days: &str) -> Result<Config> {
        Config::build(
            "127.0.0.1:9898",
            "127.0.0.1:9999",
            "s3cret",
            "America/New_York",
            closed_days,
            open,
            close,
        )
    }

    #[test]
    fn test_valid_config() {
        let config = build("11:00", "22:30", "Mon,Tue").unwrap();
        assert_eq!(config.hours.closed_days, vec![Weekday::Mon, Weekday::Tue]);
        assert_eq!(config.hours.open.to_string(), "11:00:00");
        assert!(config.hours.is_closed_on(Weekday::Mon));
        assert!(!config.hours.is_closed_on(Weekday::Wed));
        assert_eq!(config.days_ahead, DEFAULT_DAYS_AHEAD);
    }

    #[test]
    fn test_open_every_day() {
        let config = build("11:00", "22:30", "").unwrap();
        assert!(config.hours.closed_days.is_empty());
    }

    #[test]
    fn test_open_must_precede_close() {
        assert!(build("22:30", "11:00", "").is_err());
        assert!(build("11:00", "11:00", "").is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(build("eleven", "22:30", "").is_err());
        assert!(build("11:00", "22:30", "Funday").is_err());
        assert!(Config::build(
            "127.0.0.1:9898",
            "127.0.0.1:9999",
            "",
            "Mars/Olympus_Mons",
            "",
            "11:00",
            "22:30",
        )
        .is_err());
        assert!(Config::build(
            "not an address",
            "127.0.0.1:9999",
            "",
            "America/New_York",
            "",
            "11:00",
            "22:30",
        )
        .is_err());
    }
}
