// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load a .env file (if any) so GITLAB_CLI_* variables can live there
// 2. Parse command-line flags using clap
// 3. Set up logging on stderr (stdout is reserved for the page bodies)
// 4. Resolve flags + environment into an immutable Config
// 5. Run the paginator, writing every page to stdout
// 6. Exit with proper code (0 = success, 1 = request/output error, 2 = bad configuration)
//
// Only this file decides exit codes; everything below it returns typed errors.
//
// Rust concepts used:
// - async/await: reqwest and tokio's stdout are asynchronous
// - Result<T, E>: errors flow back up to here instead of exiting mid-function
// - match: to turn an Error into the right exit code
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;     // src/cli.rs - command-line parsing
mod config;  // src/config.rs - flags + environment -> Config
mod error;   // src/error.rs - the Error enum
mod gitlab;  // src/gitlab/ - GitLab URL building and pagination
mod logging; // src/logging.rs - tracing setup

// Import items we need from our modules
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use config::Config;
use error::Error;
use gitlab::Paginator;

// anyhow::Result is only used for startup problems (e.g. logging init);
// everything else uses our own error::Result
use anyhow::Result;
use tracing::info;

/// Exit code for a run that fetched every page
const EXIT_OK: i32 = 0;
/// Exit code for transport, HTTP status and output failures
const EXIT_FAILURE: i32 = 1;
/// Exit code for missing or invalid flags (clap uses 2 for its own usage errors too)
const EXIT_USAGE: i32 = 2;

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected startup error: {:#} prints the whole context chain
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
//
// Returns:
//   Ok(0) = every page fetched
//   Ok(1) = a request failed or stdout could not be written
//   Ok(2) = a flag is missing or invalid (no request was made)
//   Err = unexpected startup error
async fn run() -> Result<i32> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    // Exits by itself on --help, --version and malformed flags
    let cli = Cli::parse();

    logging::init_logging()?;

    // Build the immutable config; nothing touches the network before this succeeds
    let config = match Config::resolve(&cli, |name| std::env::var(name).ok()) {
        Ok(config) => config,
        Err(e) => return Ok(report(&e)),
    };

    let paginator = Paginator::new(&config)?;
    let mut stdout = tokio::io::stdout();

    match paginator.run(&mut stdout).await {
        Ok(summary) => {
            info!(pages = summary.pages, group = %config.group, "all pages fetched");
            Ok(EXIT_OK)
        }
        Err(e) => Ok(report(&e)),
    }
}

// Prints a fatal error and picks the exit code for it
fn report(error: &Error) -> i32 {
    eprintln!("Error: {}", error);
    exit_code_for(error)
}

// Maps an error to the process exit code
//
// Parameters:
//   error: any error returned by Config::resolve or Paginator::run
//
// Returns:
//   2 for configuration errors (bad or missing flags)
//   1 for everything that happened while talking to GitLab or writing output
fn exit_code_for(error: &Error) -> i32 {
    if error.is_config() {
        EXIT_USAGE
    } else {
        EXIT_FAILURE
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not call std::process::exit() wherever an error happens?
//    - exit() skips destructors, so buffered output may never be flushed
//    - Returning errors up to main keeps the exit decision in one place
//
// 2. What does `dotenv::dotenv().ok()` do?
//    - dotenv() returns a Result; .ok() turns it into an Option and we
//      ignore it, so a missing .env file is not an error
//
// 3. Why does logging go to stderr?
//    - Users pipe stdout into tools like jq; log lines would corrupt the JSON
// -----------------------------------------------------------------------------
