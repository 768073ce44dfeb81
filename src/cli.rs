// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag is optional at the clap level: a flag left unset can still be
// filled in from a GITLAB_CLI_* environment variable, so "required" is
// enforced later by config::Config::resolve rather than by clap.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates all the parsing code
// - Option<T>: "flag given" vs "flag not given"
// =============================================================================

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "gitlab-cli",
    version,
    about = "Dump every project of a GitLab group to stdout, one page per line",
    long_about = "gitlab-cli walks /api/v4/groups/<group>/projects page by page and writes each \
                  raw JSON page to stdout followed by a newline.\n\n\
                  Each flag can also be set through GITLAB_CLI_<FLAG> (e.g. GITLAB_CLI_URL_PREFIX), \
                  including from a .env file in the working directory."
)]
pub struct Cli {
    /// Private token sent in the Private-Token header
    #[arg(long)]
    pub token: Option<String>,

    /// Group name (or full path for subgroups)
    #[arg(long)]
    pub group: Option<String>,

    /// URL prefix of the GitLab server (e.g. https://gitlab.example.com)
    #[arg(long = "url-prefix")]
    pub url_prefix: Option<String>,

    /// Timeout of each HTTP request, Go duration syntax (e.g. 10s, 1m30s, 500ms)
    ///
    /// Defaults to 10s.
    #[arg(long)]
    pub timeout: Option<String>,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<String> instead of String?
//    - clap would reject a missing String field itself
//    - We want to look at the environment before deciding a flag is missing
//    - None = "the user did not pass this flag"
//
// 2. What does #[arg(long = "url-prefix")] do?
//    - Field names become --field-name by default, so this is explicit
//      documentation more than a rename
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "gitlab-cli",
            "--token",
            "secret",
            "--group",
            "platform",
            "--url-prefix",
            "https://gitlab.example.com",
            "--timeout",
            "30s",
        ])
        .unwrap();

        assert_eq!(cli.token.as_deref(), Some("secret"));
        assert_eq!(cli.group.as_deref(), Some("platform"));
        assert_eq!(cli.url_prefix.as_deref(), Some("https://gitlab.example.com"));
        assert_eq!(cli.timeout.as_deref(), Some("30s"));
    }

    #[test]
    fn test_flags_are_optional_to_clap() {
        let cli = Cli::try_parse_from(["gitlab-cli"]).unwrap();
        assert!(cli.token.is_none());
        assert!(cli.group.is_none());
        assert!(cli.url_prefix.is_none());
        assert!(cli.timeout.is_none());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["gitlab-cli", "--json"]).is_err());
    }
}
