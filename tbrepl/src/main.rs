//! CLI front end for the IL virtual machine.
//!
//! Wires together the three workspace crates: `ilasm` turns IL source text
//! into an `ilvm::Image`, `ilvm::Vm` executes it, and this crate supplies
//! the `HostIo` that talks to the real terminal plus the `--file` autoload
//! queue. A SIGINT handler sets an `AtomicBool` that the step loop checks
//! between opcodes, calling `Vm::interrupt` the same way the reference
//! interpreter's `KeyboardInterrupt` handler does.

#[macro_use]
extern crate clap;

mod host;

#[cfg(test)]
mod test;

use clap::Arg;
use host::Terminal;
use ilvm::{Mode, StepOutcome, Vm};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const TINYBASIC_IL: &str = include_str!("../il/tinybasic.il");
const TBX_IL: &str = include_str!("../il/tbx.il");

#[derive(Debug)]
enum Error {
    ReadIl(PathBuf, io::Error),
    ReadAutoload(PathBuf, io::Error),
    Assemble(ilasm::Error),
    Vm(ilvm::VmFault),
    Signal(ctrlc::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ReadIl(path, err) => {
                write!(f, "reading IL file \"{}\" failed: {}", path.display(), err)
            }
            Error::ReadAutoload(path, err) => write!(
                f,
                "reading BASIC source file \"{}\" failed: {}",
                path.display(),
                err
            ),
            Error::Assemble(err) => write!(f, "failed to assemble IL program: {}", err),
            Error::Vm(fault) => write!(f, "VM fault: {}", fault),
            Error::Signal(err) => write!(f, "failed to install interrupt handler: {}", err),
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("extended")
                .short("x")
                .long("extended")
                .help("Run in TBX (Tiny BASIC Extended) mode instead of classic Tiny BASIC"),
        )
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .takes_value(true)
                .value_name("FILE")
                .help("Autoloads a BASIC source file, fed to GETLN ahead of interactive input"),
        )
        .arg(
            Arg::with_name("il")
                .long("il")
                .takes_value(true)
                .value_name("IL_FILE")
                .help("Overrides the bundled IL program for the selected mode"),
        )
        .get_matches();

    let mode = if matches.is_present("extended") {
        Mode::Tbx
    } else {
        Mode::TinyBasic
    };

    if let Err(err) = run(mode, matches.value_of("il"), matches.value_of("file")) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(mode: Mode, il_path: Option<&str>, autoload_path: Option<&str>) -> Result<(), Error> {
    let il_source = match il_path {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| Error::ReadIl(PathBuf::from(path), err))?,
        None => match mode {
            Mode::TinyBasic => TINYBASIC_IL.to_string(),
            Mode::Tbx => TBX_IL.to_string(),
        },
    };

    let image = ilasm::assemble(&il_source).map_err(Error::Assemble)?;
    let mut vm = Vm::new(image, mode, Terminal);

    if let Some(path) = autoload_path {
        let contents = fs::read_to_string(path)
            .map_err(|err| Error::ReadAutoload(PathBuf::from(path), err))?;
        vm.autoload(contents.lines().map(str::to_string));
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .map_err(Error::Signal)?;
    }

    loop {
        if interrupted.swap(false, Ordering::SeqCst) {
            vm.interrupt();
        }
        match vm.step().map_err(Error::Vm)? {
            StepOutcome::Continue => {}
            StepOutcome::Quit => break,
        }
    }
    Ok(())
}
