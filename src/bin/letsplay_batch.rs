//! letsplay_batch -- scans a directory of .gb/.gbc ROM files, runs each for
//! N frames, and writes one summary JSON per ROM plus a manifest covering
//! the whole batch. Useful for characterizing a large ROM collection
//! (crashes, timing, which ones reach VBlank) without a human watching each
//! one run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use dmg_core::{Cartridge, CartridgeKind, Gameboy};
use serde::Serialize;

#[derive(Parser)]
#[command(about = "Run every ROM in a directory for N frames and summarize")]
struct Args {
    /// Directory containing .gb/.gbc ROM files.
    #[arg(default_value = "roms")]
    roms_dir: PathBuf,

    /// Directory summary/manifest JSON files are written to.
    #[arg(default_value = "batch_output")]
    output_dir: PathBuf,

    /// Frames to run per ROM.
    #[arg(default_value_t = 300)]
    frames: u64,

    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,
}

#[derive(Serialize)]
struct RomSummary {
    path: String,
    title: String,
    kind: String,
    frames_completed: u64,
    cpu_cycles: u64,
    samples_produced: u64,
    elapsed_ms: u128,
    error: Option<String>,
}

fn run_one(rom_path: &Path, frames: u64, sample_rate: u32) -> RomSummary {
    let start = Instant::now();
    let path_str = rom_path.to_string_lossy().to_string();

    let rom_bytes = match std::fs::read(rom_path) {
        Ok(b) => b,
        Err(e) => {
            return RomSummary {
                path: path_str,
                title: String::new(),
                kind: format!("{:?}", CartridgeKind::Unknown(0)),
                frames_completed: 0,
                cpu_cycles: 0,
                samples_produced: 0,
                elapsed_ms: start.elapsed().as_millis(),
                error: Some(format!("read error: {e}")),
            }
        }
    };

    let cart = match Cartridge::from_bytes(rom_bytes) {
        Ok(c) => c,
        Err(e) => {
            return RomSummary {
                path: path_str,
                title: String::new(),
                kind: format!("{:?}", CartridgeKind::Unknown(0)),
                frames_completed: 0,
                cpu_cycles: 0,
                samples_produced: 0,
                elapsed_ms: start.elapsed().as_millis(),
                error: Some(format!("cartridge error: {e}")),
            }
        }
    };

    let title = cart.title.clone();
    let kind = format!("{:?}", cart.kind);
    let mut gb = Gameboy::boot_skipped(cart, sample_rate);
    let mut frames_completed = 0u64;
    let mut samples_produced = 0u64;
    let mut error = None;

    for _ in 0..frames {
        match gb.run_frame() {
            Ok(_) => {
                frames_completed += 1;
                samples_produced += gb.bus.apu.drain_samples().len() as u64;
            }
            Err(e) => {
                error = Some(e.to_string());
                break;
            }
        }
    }

    RomSummary {
        path: path_str,
        title,
        kind,
        frames_completed,
        cpu_cycles: gb.cpu.cycles,
        samples_produced,
        elapsed_ms: start.elapsed().as_millis(),
        error,
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.output_dir).expect("cannot create output dir");

    let rom_files: Vec<PathBuf> = std::fs::read_dir(&args.roms_dir)
        .unwrap_or_else(|e| {
            eprintln!("cannot read {}: {e}", args.roms_dir.display());
            std::process::exit(1);
        })
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|s| s.to_str()).map(str::to_lowercase).as_deref(),
                Some("gb") | Some("gbc")
            )
        })
        .collect();

    if rom_files.is_empty() {
        println!("no .gb/.gbc ROMs found in {}", args.roms_dir.display());
        return;
    }

    println!("found {} ROM(s) under {}", rom_files.len(), args.roms_dir.display());
    let mut summaries = Vec::with_capacity(rom_files.len());
    for (i, path) in rom_files.iter().enumerate() {
        print!("[{}/{}] {} ... ", i + 1, rom_files.len(), path.display());
        let summary = run_one(path, args.frames, args.sample_rate);
        match &summary.error {
            None => println!("ok ({} frames, {}ms)", summary.frames_completed, summary.elapsed_ms),
            Some(e) => println!("failed: {e}"),
        }
        let out_path = args
            .output_dir
            .join(format!("{}.summary.json", path.file_stem().unwrap_or_default().to_string_lossy()));
        if let Ok(json) = serde_json::to_string_pretty(&summary) {
            let _ = std::fs::write(out_path, json);
        }
        summaries.push(summary);
    }

    let ok_count = summaries.iter().filter(|s| s.error.is_none()).count();
    let manifest_path = args.output_dir.join("manifest.json");
    if let Ok(json) = serde_json::to_string_pretty(&summaries) {
        std::fs::write(&manifest_path, json).expect("cannot write manifest");
    }

    println!(
        "batch complete: {}/{} succeeded, manifest at {}",
        ok_count,
        summaries.len(),
        manifest_path.display()
    );
}
