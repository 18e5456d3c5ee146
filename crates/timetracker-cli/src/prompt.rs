//! Console prompt for the authorization code.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use timetracker_google::{AuthorizationPrompt, GoogleError, GoogleResult};

/// Prints the authorization URL and reads the code back from a terminal.
///
/// Reading blocks until the operator enters a line; there is no timeout.
#[derive(Debug)]
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
    open_browser: bool,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Creates a prompt on the process's stdin and stdout.
    pub fn stdio(open_browser: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), open_browser)
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    /// Creates a prompt over arbitrary streams.
    pub fn new(input: R, output: W, open_browser: bool) -> Self {
        Self {
            input,
            output,
            open_browser,
        }
    }

    /// Returns the output stream.
    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> AuthorizationPrompt for ConsolePrompt<R, W> {
    fn request_code(&mut self, auth_url: &str) -> GoogleResult<String> {
        write!(
            self.output,
            "Go to the following link in your browser then type the authorization code: \n{}\n",
            auth_url
        )
        .and_then(|()| self.output.flush())
        .map_err(|e| GoogleError::prompt("unable to print authorization URL").with_source(e))?;

        if self.open_browser {
            match open::that(auth_url) {
                Ok(()) => debug!("opened authorization URL in browser"),
                Err(e) => warn!("failed to open browser: {}", e),
            }
        }

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|e| GoogleError::prompt("unable to read authorization code").with_source(e))?;

        line.split_whitespace()
            .next()
            .map(str::to_string)
            .ok_or_else(|| GoogleError::prompt("unable to read authorization code"))
    }
}
