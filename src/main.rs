//! The command line driver.
//!
//! Loads a rom image into the machine and clocks it from the outside: one
//! instruction per [`cpu::INTERVAL_US`] with the timers derived from that
//! cadence by the runner. The frame presentation is a plain terminal dump,
//! anything fancier is the job of a real rendering collaborator.
use std::{error::Error, path::PathBuf, process, time::Duration};

use clap::Parser;

use chirp8::{
    chip8::ChipSet,
    definitions::cpu,
    devices::{DisplayCommands, KeyEvent, KeyboardCommands},
    framebuffer::Framebuffer,
    opcode::Operation,
    resources::Rom,
    Runner,
};

/// the sample rom used when no path is given
const DEFAULT_ROM: &str = "roms/IBMLOGO.ch8";

#[derive(Parser, Debug)]
#[command(name = "chirp8")]
#[command(about = "A CHIP-8 execution engine", long_about = None)]
struct Args {
    /// Path to the rom image to execute
    #[arg(default_value = DEFAULT_ROM)]
    rom: PathBuf,
}

/// Dumps every frame as rows of on / off glyphs onto the terminal.
struct TermDisplay;

impl DisplayCommands for TermDisplay {
    fn draw(&mut self, framebuffer: &Framebuffer) {
        let mut frame = String::new();
        for row in framebuffer.rows() {
            for &pixel in row.iter() {
                frame.push(if pixel { '█' } else { ' ' });
            }
            frame.push('\n');
        }
        // move the cursor home instead of clearing, avoids flicker
        print!("\x1B[H{}", frame);
    }
}

/// The headless driver attaches no input source, key-dependent roms will
/// stall on their first key wait.
struct NoInput;

impl KeyboardCommands for NoInput {
    fn poll_key(&mut self) -> Option<KeyEvent> {
        None
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let rom = Rom::from_file(&args.rom)?;
    log::info!("loaded rom '{}' ({} bytes)", rom.get_name(), rom.len());

    let mut runner = Runner::new(ChipSet::new(rom), TermDisplay, NoInput);
    let interval = Duration::from_micros(cpu::INTERVAL_US);

    // clear the terminal once, the display then redraws in place
    print!("\x1B[2J");

    loop {
        match runner.cycle()? {
            Operation::Idle => break,
            Operation::Wait => {
                log::warn!("the rom waits for key input, but no input source is attached");
                break;
            }
            Operation::None | Operation::Draw => {}
        }
        spin_sleep::sleep(interval);
    }

    Ok(())
}
