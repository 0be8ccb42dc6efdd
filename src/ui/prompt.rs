// Terminal front-end for the packaging pipeline.
//
// Implements the PackagerUi collaborator over stdin/stdout. Prompts block
// until the user answers; everything the pipeline needs from "the UI" flows
// through these three methods.

use crate::services::packaging::PackagerUi;
use crate::models::Platform;
use camino::Utf8PathBuf;
use std::io::{self, BufRead, Write};

pub struct ConsoleUi {
    /// Answer every warn-and-confirm prompt with yes (`--yes` or config).
    assume_yes: bool,
    /// Fixed output directory; when set, suggested file names are used
    /// without prompting.
    output_dir: Option<Utf8PathBuf>,
}

impl ConsoleUi {
    pub fn new(assume_yes: bool, output_dir: Option<Utf8PathBuf>) -> Self {
        Self {
            assume_yes,
            output_dir,
        }
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None, // EOF
            Ok(_) => Some(line.trim().to_string()),
            Err(err) => {
                tracing::warn!("failed to read from stdin: {err}");
                None
            }
        }
    }
}

impl PackagerUi for ConsoleUi {
    fn warn_confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            println!("WARNING: {message}");
            println!("Continuing (--yes).");
            return true;
        }

        print!("WARNING: {message} [y/N] ");
        let _ = io::stdout().flush();
        match self.read_line() {
            Some(answer) => {
                answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
            }
            None => false,
        }
    }

    fn choose_output_path(
        &self,
        platform: Platform,
        suggested_name: &str,
    ) -> Option<Utf8PathBuf> {
        if let Some(dir) = &self.output_dir {
            return Some(dir.join(suggested_name));
        }

        print!("Output path for the {platform} profile (empty skips this platform) [{suggested_name}]: ");
        let _ = io::stdout().flush();
        match self.read_line() {
            Some(answer) if !answer.is_empty() => Some(Utf8PathBuf::from(answer)),
            _ => None,
        }
    }

    fn status(&self, message: &str) {
        println!("{message}");
        tracing::info!("{message}");
    }
}
