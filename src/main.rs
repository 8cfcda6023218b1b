use std::process::ExitCode;

use clap::Parser;
use eframe::egui;

use pixelgrid::app::PixelGridApp;
use pixelgrid::cli::CliArgs;
use pixelgrid::{log_err, log_info, logger};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Initialize session log (overwrites previous session log)
    logger::init();

    let settings = match args.resolve_settings() {
        Ok(s) => s,
        Err(e) => {
            log_err!("startup: {}", e);
            eprintln!("pixelgrid: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log_info!("settings: {:?}", settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_fullscreen(settings.fullscreen)
            .with_title("PixelGrid"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "PixelGrid",
        options,
        Box::new(move |cc| Box::new(PixelGridApp::new(cc, settings))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!("eframe: {}", e);
            eprintln!("pixelgrid: {}", e);
            ExitCode::FAILURE
        }
    }
}
