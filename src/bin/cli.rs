//! ref-measure - measure objects in a photo against a reference of known size
//!
//! This is the CLI entry point for the ref-measure tool.
//! Run with: cargo run --bin ref-measure -- <image> [--mock] [--preview out.png]

use ref_measure::workflow::SessionEvent;
use ref_measure::{
    get_messages, render_preview, AppSettings, CompletionStatus, HttpDetector, Messages,
    MockDetector, Point, PointerRelease, Session, SessionError, SourceImage,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let use_mock_flag = args.iter().any(|arg| arg == "--mock");
    let preview_path = args
        .iter()
        .position(|arg| arg == "--preview")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);
    let image_path = args
        .iter()
        .enumerate()
        .find(|(i, arg)| {
            !arg.starts_with("--") && (*i == 0 || args[*i - 1] != "--preview")
        })
        .map(|(_, arg)| PathBuf::from(arg));

    let Some(image_path) = image_path else {
        eprintln!("Usage: ref-measure <image> [--mock] [--preview out.png]");
        std::process::exit(2);
    };

    let settings = apply_env_overrides(AppSettings::load());
    let use_mock = use_mock_flag || settings.use_mock_detector;
    let messages = get_messages(&settings.lang);

    println!("📏 ref-measure");
    println!("================================================");
    if use_mock {
        println!("Detector: built-in placeholder");
    } else {
        println!("Detector: {}", settings.base_url);
    }
    println!("Language: {}", settings.lang);
    println!(
        "Display bounds: {}x{}",
        settings.max_display_width, settings.max_display_height
    );
    println!("================================================\n");

    let mut session = Session::new(settings.measure_config());
    session.subscribe(move |event| {
        if let SessionEvent::Notice(notice) = event {
            println!("⚠️ {}", messages.notice(notice));
        }
    });

    let image = SourceImage::from_path(&image_path)?;
    let geometry = session.load_image(image)?;
    println!(
        "🖼️ {} ({}x{} shown at {:.0}x{:.0})",
        messages.image_loaded,
        session.image().map(SourceImage::width).unwrap_or_default(),
        session.image().map(SourceImage::height).unwrap_or_default(),
        geometry.display_width,
        geometry.display_height
    );

    println!("🔍 {}", messages.analyzing);
    let status = if use_mock {
        session.analyze_with(&MockDetector::default()).await?
    } else {
        let detector = HttpDetector::new(settings.detector_config())?;
        match detector.health().await {
            Ok(report) => println!(
                "✅ {} (v{}, {}ms)",
                messages.connection_successful,
                report.info.version,
                report.latency.as_millis()
            ),
            Err(e) => eprintln!("❌ {}: {}", messages.connection_failed, e),
        }
        session.analyze_with(&detector).await?
    };

    let reference = match status {
        CompletionStatus::Detected(reference) => reference,
        // Notices were already printed by the subscriber.
        _ => return Ok(()),
    };
    if let Some(display_box) = session.reference_in_display() {
        println!(
            "📦 {} at ({:.0}, {:.0}) {:.0}x{:.0} on the display, confidence {:.2}",
            messages.reference_name(&reference.kind),
            display_box.x,
            display_box.y,
            display_box.width,
            display_box.height,
            reference.confidence
        );
    }
    write_preview(&session, preview_path.as_deref())?;

    if !confirm_reference(&mut session, messages)? {
        println!("Goodbye! 👋");
        return Ok(());
    }
    if !enter_reference_size(&mut session, messages)? {
        println!("Goodbye! 👋");
        return Ok(());
    }

    select_rectangles(&mut session, messages, preview_path.as_deref())?;
    println!("Goodbye! 👋");
    Ok(())
}

/// Override persisted settings with environment variables.
fn apply_env_overrides(mut settings: AppSettings) -> AppSettings {
    if let Ok(base_url) = env::var("DETECTOR_BASE_URL") {
        settings.base_url = base_url;
    }
    if let Some(max_retries) = env::var("DETECTOR_MAX_RETRIES")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        settings.max_retries = max_retries;
    }
    if let Some(retry_delay) = env::var("DETECTOR_RETRY_DELAY")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        settings.retry_delay = retry_delay;
    }
    if let Ok(lang) = env::var("MEASURE_LANG") {
        settings.lang = lang;
    }
    if let Some(width) = env::var("MEASURE_MAX_WIDTH")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        settings.max_display_width = width;
    }
    if let Some(height) = env::var("MEASURE_MAX_HEIGHT")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        settings.max_display_height = height;
    }
    settings
}

/// Print a prompt and read one trimmed line. `None` on end of input.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_quit(input: &str) -> bool {
    input == "quit" || input == "exit"
}

/// Ask until the user confirms the detected box. Returns false on quit.
fn confirm_reference(session: &mut Session, messages: &Messages) -> anyhow::Result<bool> {
    let Some(kind) = session.reference().map(|reference| reference.kind.clone()) else {
        return Ok(false);
    };
    let label = format!("❓ {} [y/n]: ", messages.confirm_prompt(&kind));

    loop {
        let Some(answer) = prompt(&label)? else {
            return Ok(false);
        };
        match answer.to_lowercase().as_str() {
            "y" | "yes" => {
                session.confirm_reference()?;
                return Ok(true);
            }
            "n" | "no" => {
                session.reject_reference()?;
            }
            input if is_quit(input) => return Ok(false),
            _ => {}
        }
    }
}

/// Ask for the reference size until it calibrates. Returns false on quit.
fn enter_reference_size(session: &mut Session, messages: &Messages) -> anyhow::Result<bool> {
    let suggested = session
        .reference()
        .map(|reference| reference.kind.suggested_size())
        .unwrap_or(ref_measure::calibration::FALLBACK_REFERENCE_SIZE);
    let label = format!(
        "📐 {} (mm) [{} {}]: ",
        messages.enter_reference_size, suggested.width_mm, suggested.height_mm
    );

    loop {
        let Some(input) = prompt(&label)? else {
            return Ok(false);
        };
        if is_quit(&input) {
            return Ok(false);
        }

        let (width_mm, height_mm) = if input.is_empty() {
            (suggested.width_mm, suggested.height_mm)
        } else {
            let mut values = input
                .split_whitespace()
                .map(|value| value.parse::<f64>().unwrap_or(f64::NAN));
            (
                values.next().unwrap_or(f64::NAN),
                values.next().unwrap_or(f64::NAN),
            )
        };

        match session.set_reference_size(width_mm, height_mm) {
            Ok(calibration) => {
                println!(
                    "✅ {:.4} mm/px ({} {:.1} mm, {} {:.1} mm)",
                    calibration.mm_per_pixel(),
                    messages.width,
                    calibration.reference_width_mm(),
                    messages.height,
                    calibration.reference_height_mm()
                );
                let deviation = calibration.height_deviation();
                if deviation.abs() > 0.1 {
                    tracing::warn!(
                        "Reference box height disagrees with the entered height by {:.0}%",
                        deviation * 100.0
                    );
                }
                return Ok(true);
            }
            Err(SessionError::Validation(e)) => {
                println!("❌ {} ({})", messages.invalid_reference_size, e);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Read display-space rectangles and measure each one.
fn select_rectangles(
    session: &mut Session,
    messages: &Messages,
    preview_path: Option<&Path>,
) -> anyhow::Result<()> {
    println!("\n{} (x1 y1 x2 y2)", messages.select_rect);
    println!("Type 'quit' or 'exit' to exit.\n");

    loop {
        let Some(input) = prompt("▭ ")? else {
            return Ok(());
        };
        if input.is_empty() {
            continue;
        }
        if is_quit(&input) {
            return Ok(());
        }

        let Some([x1, y1, x2, y2]) = parse_corners(&input) else {
            println!("Expected four numbers: x1 y1 x2 y2");
            continue;
        };

        session.pointer_down(Point::new(x1, y1));
        session.pointer_move(Point::new(x2, y2));
        match session.pointer_up(Point::new(x2, y2))? {
            PointerRelease::Measured(result) => {
                println!("   {}: {:.1} mm", messages.width, result.width_mm);
                println!("   {}: {:.1} mm", messages.height, result.height_mm);
                println!(
                    "   {}: {}",
                    messages.aspect_ratio,
                    result
                        .aspect_label()
                        .unwrap_or_else(|| messages.aspect_undefined.to_string())
                );
                write_preview(session, preview_path)?;
            }
            PointerRelease::Discarded => println!("⚠️ {}", messages.selection_too_small),
            PointerRelease::Ignored => {}
        }
    }
}

fn parse_corners(input: &str) -> Option<[f64; 4]> {
    let values: Vec<f64> = input
        .split_whitespace()
        .map(|value| value.parse().ok())
        .collect::<Option<_>>()?;
    values.try_into().ok()
}

fn write_preview(session: &Session, path: Option<&Path>) -> anyhow::Result<()> {
    let (Some(path), Some(image), Some(geometry)) = (path, session.image(), session.geometry())
    else {
        return Ok(());
    };
    let preview = render_preview(
        image,
        geometry,
        session.reference_in_display(),
        session.selection(),
    )?;
    preview.save(path)?;
    tracing::info!("Preview written to {}", path.display());
    Ok(())
}
