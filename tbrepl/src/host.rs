//! The terminal `HostIo`; the VM core never touches stdin/stdout directly.
//! This is the one implementation of `ilvm::HostIo` that does.

use ilvm::HostIo;
use std::io::{self, Write};

pub struct Terminal;

impl HostIo for Terminal {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => None, // end-of-input
            Ok(_) => Some(line.trim_end_matches(|c| c == '\n' || c == '\r').to_string()),
            Err(_) => None,
        }
    }

    fn write(&mut self, s: &str) {
        print!("{}", s);
        io::stdout().flush().ok();
    }
}
