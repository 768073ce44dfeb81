// src/config.rs
// =============================================================================
// This module turns command-line flags and environment variables into one
// immutable Config value, built once at startup.
//
// Where each setting comes from (highest priority first):
// 1. the command-line flag (e.g. --url-prefix)
// 2. the GITLAB_CLI_<FLAG> environment variable (e.g. GITLAB_CLI_URL_PREFIX)
//    - a .env file in the working directory also counts, see main.rs
// 3. the built-in default (only --timeout has one: 10s)
//
// The finished Config is handed to the paginator by reference and never
// changes afterwards.
//
// Rust concepts:
// - Generic closures: `F: Fn(&str) -> Option<String>` lets us swap the real
//   environment for a HashMap in tests
// - Option combinators: .filter(), .unwrap_or() to express precedence
// - Checked arithmetic: checked_mul/checked_add to reject huge durations
// - Result and ?: every validation failure becomes an Error value
// =============================================================================

use std::time::Duration;

use url::Url;

use crate::cli::Cli;
use crate::error::{Error, Result};

/// Prefix of every environment variable that can stand in for a flag
pub const ENV_PREFIX: &str = "GITLAB_CLI_";

/// Per-request timeout used when neither --timeout nor GITLAB_CLI_TIMEOUT is set
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Everything a run needs, fully validated
//
// #[derive(Debug, Clone)] lets us print it while debugging and copy it in tests
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GitLab server
    pub url_prefix: Url,
    /// Group name or full path
    pub group: String,
    /// Private token
    pub token: String,
    /// Timeout applied to each page request
    pub timeout: Duration,
}

impl Config {
    // Builds a Config from parsed flags, falling back to the environment
    //
    // Parameters:
    //   cli: the flags as clap parsed them (None = flag not given)
    //   lookup: maps an environment variable name to its value
    //           - production passes |name| std::env::var(name).ok()
    //           - tests pass a HashMap so they never touch the real environment
    //
    // Returns: Result<Config>
    //   Success: a validated Config
    //   Error: MissingFlag (checked in the order url-prefix, group, token),
    //          InvalidTimeout, InvalidUrl or UnusableBaseUrl
    pub fn resolve<F>(cli: &Cli, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Required values first, in the same order every time so the error
        // message is predictable
        let url_prefix = require(pick("url-prefix", cli.url_prefix.as_deref(), &lookup), "url-prefix")?;
        let group = require(pick("group", cli.group.as_deref(), &lookup), "group")?;
        let token = require(pick("token", cli.token.as_deref(), &lookup), "token")?;

        // Optional timeout: parse it if given, otherwise use the default
        let timeout = match pick("timeout", cli.timeout.as_deref(), &lookup) {
            Some(text) => {
                let timeout = parse_duration(&text)?;

                // A zero timeout would make every request fail immediately
                if timeout.is_zero() {
                    return Err(Error::InvalidTimeout {
                        value: text,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                timeout
            }
            None => DEFAULT_TIMEOUT,
        };

        // Validate the URL last; it is only parsed once all flags are present
        let url_prefix = parse_base_url(&url_prefix)?;

        Ok(Config {
            url_prefix,
            group,
            token,
            timeout,
        })
    }
}

// Name of the environment variable backing a flag
//
// Example:
//   "url-prefix" -> "GITLAB_CLI_URL_PREFIX"
pub fn env_var_name(flag: &str) -> String {
    format!("{}{}", ENV_PREFIX, flag.to_uppercase().replace('-', "_"))
}

// Picks the raw value for one flag
//
// Returns:
//   Some(flag value) if the flag was given (even if it is empty)
//   Some(env value) if the flag was not given and the variable is non-empty
//   None otherwise
fn pick<F>(flag: &str, flag_value: Option<&str>, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match flag_value {
        Some(value) => Some(value.to_string()),
        None => lookup(&env_var_name(flag)).filter(|value| !value.is_empty()),
    }
}

// Turns "no value" or "empty value" into a MissingFlag error
fn require(value: Option<String>, flag: &'static str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingFlag { flag }),
    }
}

// Parses the --url-prefix value
//
// Rejects relative URLs ("gitlab.example.com") and URLs that cannot have a
// path appended ("mailto:ops@example.com")
fn parse_base_url(text: &str) -> Result<Url> {
    let url = Url::parse(text).map_err(|source| Error::InvalidUrl {
        value: text.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() {
        return Err(Error::UnusableBaseUrl {
            value: text.to_string(),
        });
    }

    Ok(url)
}

// Parses a Go-style duration string
//
// Parameters:
//   text: one or more <number><unit> terms, e.g. "10s", "1m30s", "1.5h",
//         "250ms"; a bare "0" is also accepted
//
// Units: ns, us (or µs), ms, s, m, h
//
// Returns: Result<Duration>
//   Success: the summed duration
//   Error: InvalidTimeout for a missing/unknown unit, a malformed number,
//          or a total too large to fit in a Duration
pub fn parse_duration(text: &str) -> Result<Duration> {
    // Small helper closure so every error carries the original text
    let invalid = |reason: String| Error::InvalidTimeout {
        value: text.to_string(),
        reason,
    };
    let out_of_range = || invalid("duration out of range".to_string());

    let s = text.trim();
    if s.is_empty() {
        return Err(invalid("empty duration".to_string()));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    // We add everything up in nanoseconds; u128 leaves plenty of headroom
    // before the final conversion to u64
    let mut rest = s;
    let mut total_nanos: u128 = 0;

    while !rest.is_empty() {
        // Split off the number part: digits and at most one '.'
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);

        // Then the unit: everything up to the next number
        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        // How many nanoseconds one unit is worth
        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "" => return Err(invalid(format!("missing unit after '{number}'"))),
            other => return Err(invalid(format!("unknown unit '{other}'"))),
        };

        // "1.5" -> ("1", "5"), "2" -> ("2", ""), ".5" -> ("", "5")
        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(invalid(format!("malformed number '{number}'")));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| invalid(format!("number '{whole}' out of range")))?
        };

        let mut nanos = whole.checked_mul(scale).ok_or_else(out_of_range)?;

        // Digits past nanosecond precision are dropped, as Go does.
        let mut place = scale;
        for digit in fraction.bytes() {
            place /= 10;
            nanos = nanos
                .checked_add(u128::from(digit - b'0') * place)
                .ok_or_else(out_of_range)?;
        }

        total_nanos = total_nanos.checked_add(nanos).ok_or_else(out_of_range)?;
        rest = tail;
    }

    // Duration::from_nanos takes a u64 (about 584 years)
    let total_nanos = u64::try_from(total_nanos).map_err(|_| out_of_range())?;
    Ok(Duration::from_nanos(total_nanos))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does resolve() take a closure instead of calling std::env::var?
//    - The closure is a "seam": production passes the real environment,
//      tests pass a HashMap
//    - Tests then never race each other over global environment variables
//
// 2. What is checked_mul / checked_add?
//    - Normal `a * b` panics on overflow in debug builds and silently wraps
//      in release builds
//    - checked_mul returns Option: Some(result), or None on overflow
//    - .ok_or_else(out_of_range)? turns that None into our own error
//
// 3. Why u128 for nanoseconds?
//    - A huge "whole" number times a unit can exceed u64 before we notice
//    - u128 lets us do the math first and range-check once at the end
//
// 4. What does split_once do?
//    - "1.5".split_once('.') == Some(("1", "5"))
//    - Returns None if the separator is not there, so we fall back to
//      (number, "") with unwrap_or
//
// 5. What is `&'static str`?
//    - A string slice that lives for the whole program (a string literal)
//    - MissingFlag stores the flag name this way; no allocation needed
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn full_cli() -> Cli {
        Cli {
            token: Some("secret".to_string()),
            group: Some("platform".to_string()),
            url_prefix: Some("https://gitlab.example.com".to_string()),
            timeout: None,
        }
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("token"), "GITLAB_CLI_TOKEN");
        assert_eq!(env_var_name("url-prefix"), "GITLAB_CLI_URL_PREFIX");
    }

    #[test]
    fn test_resolve_from_flags_with_default_timeout() {
        let config = Config::resolve(&full_cli(), env(&[])).unwrap();
        assert_eq!(config.url_prefix.as_str(), "https://gitlab.example.com/");
        assert_eq!(config.group, "platform");
        assert_eq!(config.token, "secret");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_resolve_from_environment() {
        let config = Config::resolve(
            &Cli::default(),
            env(&[
                ("GITLAB_CLI_TOKEN", "env-token"),
                ("GITLAB_CLI_GROUP", "env-group"),
                ("GITLAB_CLI_URL_PREFIX", "https://git.internal"),
                ("GITLAB_CLI_TIMEOUT", "1m30s"),
            ]),
        )
        .unwrap();

        assert_eq!(config.token, "env-token");
        assert_eq!(config.group, "env-group");
        assert_eq!(config.url_prefix.host_str(), Some("git.internal"));
        assert_eq!(config.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_flag_beats_environment() {
        let config = Config::resolve(
            &full_cli(),
            env(&[("GITLAB_CLI_TOKEN", "env-token"), ("GITLAB_CLI_GROUP", "env-group")]),
        )
        .unwrap();
        assert_eq!(config.token, "secret");
        assert_eq!(config.group, "platform");
    }

    #[test]
    fn test_empty_environment_value_is_unset() {
        let mut cli = full_cli();
        cli.token = None;
        let err = Config::resolve(&cli, env(&[("GITLAB_CLI_TOKEN", "")])).unwrap_err();
        assert!(matches!(err, Error::MissingFlag { flag: "token" }));

        let config = Config::resolve(&full_cli(), env(&[("GITLAB_CLI_TIMEOUT", "")])).unwrap();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_empty_flag_value_is_missing() {
        let mut cli = full_cli();
        cli.group = Some(String::new());
        let err = Config::resolve(&cli, env(&[("GITLAB_CLI_GROUP", "env-group")])).unwrap_err();
        assert!(matches!(err, Error::MissingFlag { flag: "group" }));
    }

    #[test]
    fn test_missing_flags_reported_in_order() {
        let err = Config::resolve(&Cli::default(), env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "--url-prefix must be specified");

        let cli = Cli {
            url_prefix: Some("https://gitlab.example.com".to_string()),
            ..Cli::default()
        };
        let err = Config::resolve(&cli, env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "--group must be specified");

        let cli = Cli {
            url_prefix: Some("https://gitlab.example.com".to_string()),
            group: Some("platform".to_string()),
            ..Cli::default()
        };
        let err = Config::resolve(&cli, env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "--token must be specified");
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_url_prefix() {
        let mut cli = full_cli();
        cli.url_prefix = Some("gitlab.example.com".to_string());
        let err = Config::resolve(&cli, env(&[])).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));

        cli.url_prefix = Some("mailto:ops@example.com".to_string());
        let err = Config::resolve(&cli, env(&[])).unwrap_err();
        assert!(matches!(err, Error::UnusableBaseUrl { .. }));
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_and_zero_timeout() {
        let mut cli = full_cli();
        cli.timeout = Some("10".to_string());
        assert!(matches!(
            Config::resolve(&cli, env(&[])).unwrap_err(),
            Error::InvalidTimeout { .. }
        ));

        cli.timeout = Some("0s".to_string());
        assert!(matches!(
            Config::resolve(&cli, env(&[])).unwrap_err(),
            Error::InvalidTimeout { .. }
        ));
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("750us").unwrap(), Duration::from_micros(750));
        assert_eq!(parse_duration("750µs").unwrap(), Duration::from_micros(750));
        assert_eq!(parse_duration("42ns").unwrap(), Duration::from_nanos(42));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_fractions() {
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration(".5m").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("2.s").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        for bad in ["", "10", "s", ".s", "1..5s", "10 s", "3d", "-5s", "1m30"] {
            assert!(parse_duration(bad).is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        // Whole part fits in u128 nanoseconds, the fraction pushes it over
        let err = parse_duration("340282366920938463463374607431.999999999s").unwrap_err();
        assert!(matches!(err, Error::InvalidTimeout { .. }));

        // Fits in u128 but not in a u64 Duration
        assert!(parse_duration("100000000000h").is_err());
        assert!(parse_duration("99999999999999999999999999999999999999999s").is_err());
    }
}
