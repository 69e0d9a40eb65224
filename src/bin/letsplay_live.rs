//! letsplay_live -- loads a real ROM file and runs it for N frames, emitting
//! a per-frame replay capture (register/PPU/APU-activity snapshots) as a
//! single JSON file, and optionally a save-state JSON alongside it.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use dmg_core::{Cartridge, Gameboy};
use serde::Serialize;

#[derive(Parser)]
#[command(about = "Run a ROM file for N frames and capture a JSON replay")]
struct Args {
    /// Path to a .gb ROM file.
    rom: PathBuf,

    /// Number of frames to run.
    #[arg(default_value_t = 60)]
    frames: u64,

    /// Directory replay/save-state output files are written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write a save-state JSON file after the run.
    #[arg(long)]
    save_state: bool,

    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
}

#[derive(Serialize)]
struct ReplayFrame {
    frame: u64,
    t_cycles: u8,
    pc: u16,
    sp: u16,
    a: u8,
    f: u8,
    bc: u16,
    de: u16,
    hl: u16,
    ly: u8,
    samples_produced: usize,
}

#[derive(Serialize)]
struct ReplayCapture {
    rom_title: String,
    total_frames: u64,
    frames: Vec<ReplayFrame>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let rom_bytes = fs::read(&args.rom).unwrap_or_else(|e| {
        eprintln!("cannot read ROM {}: {e}", args.rom.display());
        std::process::exit(1);
    });
    let cart = Cartridge::from_bytes(rom_bytes).unwrap_or_else(|e| {
        eprintln!("invalid ROM: {e}");
        std::process::exit(1);
    });
    let rom_title = cart.title.clone();

    log::info!("letsplay_live: {} for {} frames", rom_title, args.frames);
    let mut gb = Gameboy::boot_skipped(cart, args.sample_rate);
    let mut replay = ReplayCapture {
        rom_title: rom_title.clone(),
        total_frames: 0,
        frames: Vec::with_capacity(args.frames as usize),
    };

    for frame in 0..args.frames {
        let t_cycles = match gb.run_frame() {
            Ok(t) => t as u8,
            Err(e) => {
                log::error!("core error at frame {frame}: {e}");
                break;
            }
        };
        let samples_produced = gb.bus.apu.drain_samples().len();
        replay.frames.push(ReplayFrame {
            frame,
            t_cycles,
            pc: gb.cpu.regs.pc,
            sp: gb.cpu.regs.sp,
            a: gb.cpu.regs.a,
            f: gb.cpu.regs.f,
            bc: gb.cpu.regs.bc(),
            de: gb.cpu.regs.de(),
            hl: gb.cpu.regs.hl(),
            ly: gb.bus.ppu.ly,
            samples_produced,
        });
        replay.total_frames += 1;
        if frame % 60 == 0 {
            log::debug!("frame {frame}: pc={:#06x} ly={}", gb.cpu.regs.pc, gb.bus.ppu.ly);
        }
    }

    fs::create_dir_all(&args.output_dir).ok();
    let stem = args
        .rom
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "rom".to_string());

    let replay_path = args.output_dir.join(format!("{stem}.replay.json"));
    let replay_json = serde_json::to_string_pretty(&replay).expect("replay serializes");
    if let Err(e) = fs::write(&replay_path, &replay_json) {
        log::error!("failed to write replay to {}: {e}", replay_path.display());
    } else {
        log::info!("replay written to {}", replay_path.display());
    }

    if args.save_state {
        let save_path = args.output_dir.join(format!("{stem}.save.json"));
        let state_json = serde_json::to_string_pretty(&gb.save_state()).expect("save state serializes");
        if let Err(e) = fs::write(&save_path, &state_json) {
            log::error!("failed to write save state to {}: {e}", save_path.display());
        } else {
            log::info!("save state written to {}", save_path.display());
        }
    }

    println!(
        "{} frames run for {rom_title}, cpu.cycles={}",
        replay.total_frames, gb.cpu.cycles
    );
}
