//! Build script for keel-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses and validates syscfg.toml at compile time
//! - Generates the `SYSCFG` constant the firmware boots from

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use keel_core::bringup::plan;
use keel_core::config::SysConfig;

fn main() {
    setup_linker();
    let cfg = load_config();
    validate_config(&cfg);
    generate_config(&cfg);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read syscfg.toml into a config snapshot
fn load_config() -> SysConfig {
    println!("cargo:rerun-if-changed=syscfg.toml");

    let config_path = Path::new("syscfg.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: syscfg.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a syscfg.toml board configuration.        ║\n\
            ║  Please create one in the keel-firmware directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read syscfg.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&config_content) {
        Ok(cfg) => cfg,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid syscfg.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            // Count chars, not bytes; toml quotes the offending input
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reject configurations that would fail bring-up on every boot
fn validate_config(cfg: &SysConfig) {
    let mut errors = Vec::new();

    let steps = match plan(cfg) {
        Ok(steps) => steps.len(),
        Err(e) => {
            errors.push(format!("{:?}", e));
            0
        }
    };

    if cfg.polled_spi
        && (cfg.i2c_0.enabled || cfg.spi_0_master.enabled || cfg.spi_0_slave.enabled)
    {
        errors.push("polled_spi shares serial box 0 with i2c_0/spi_0_*".to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: syscfg.toml cannot boot                                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!(
        "cargo:warning=syscfg.toml validated successfully ({} bring-up steps)",
        steps
    );
}

/// Write the snapshot out as a Rust constant
///
/// The `Debug` form of the config types is a valid struct expression, so
/// the generated file only needs the config types in scope.
fn generate_config(cfg: &SysConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("syscfg.rs")).unwrap();
    writeln!(f, "pub const SYSCFG: SysConfig = {:#?};", cfg).unwrap();
}
