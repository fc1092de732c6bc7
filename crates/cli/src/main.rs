use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser};

use face_detector_core::detection::infrastructure::model_resolver::{
    self, ModelFiles, ModelResolveError,
};
use face_detector_core::detection::infrastructure::onnx_ssd_model::OnnxSsdModel;
use face_detector_core::display::infrastructure::window_display::WindowDisplay;
use face_detector_core::pipeline::file_mode_use_case::FileModeUseCase;
use face_detector_core::pipeline::frame_processor::FrameProcessor;
use face_detector_core::pipeline::live_mode_use_case::LiveModeUseCase;
use face_detector_core::pipeline::pipeline_logger::LogPipelineLogger;
use face_detector_core::pipeline::stop_condition::{StopCondition, StopSignal};
use face_detector_core::shared::constants::{
    DEFAULT_MIN_CONFIDENCE, IMAGE_EXTENSIONS, KEY_POLL_INTERVAL,
};
use face_detector_core::shared::run_config::{RunConfig, RunMode};
use face_detector_core::video::infrastructure::ffmpeg_camera_source::{
    CameraDevice, FfmpegCameraSource,
};
use face_detector_core::video::infrastructure::image_file_reader::ImageFileReader;
use face_detector_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Conventional exit status for a process ended by SIGINT.
const FORCED_EXIT_CODE: i32 = 130;

const CAMERA_PROMPT: &str =
    "This utility is going to access your camera. Are you okay with that? [Y]: ";

/// Detect faces in an image or a live camera feed, boxing or blurring each one.
#[derive(Parser, Debug)]
#[command(name = "face-detector", version)]
struct Cli {
    /// Image file to annotate (jpg/png). Without it the camera is used.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Blur detected faces instead of drawing a box around them.
    #[arg(short, long)]
    blur: bool,

    /// Minimum detection confidence (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    confidence: f32,

    /// Directory containing `model/` with the network and weights files.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Network graph file; overrides the model search.
    #[arg(long, requires = "weights")]
    network: Option<PathBuf>,

    /// Trained weights file; must sit next to the network file.
    #[arg(long, requires = "network")]
    weights: Option<PathBuf>,

    /// Capture device (e.g. /dev/video1 on Linux, 1 on macOS).
    #[arg(long)]
    camera: Option<String>,

    /// Skip the camera access prompt.
    #[arg(short, long)]
    yes: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            mode: match &self.file {
                Some(path) => RunMode::File(path.clone()),
                None => RunMode::Live,
            },
            blur_faces: self.blur,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;
    let config = cli.run_config();

    let model_files = resolve_model_files(&cli)?;
    let model = OnnxSsdModel::new(&model_files)?;
    let processor = FrameProcessor::new(Box::new(model), config.pipeline_options(cli.confidence));

    match config.mode {
        RunMode::File(path) => run_file_mode(&path, processor),
        RunMode::Live => {
            print_usage();
            if !cli.yes && !confirm_camera_access(&mut io::stdin().lock(), &mut io::stdout())? {
                log::info!("Exiting. No operation was performed.");
                return Ok(());
            }
            run_live_mode(cli.camera, processor)
        }
    }
}

fn run_file_mode(
    input: &Path,
    processor: FrameProcessor,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut use_case = FileModeUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        processor,
        std::env::current_dir()?,
    );
    let outcome = use_case.execute(input)?;
    log::info!(
        "{} face(s) found in {}",
        outcome.faces.len(),
        input.display()
    );
    Ok(())
}

fn run_live_mode(
    camera: Option<String>,
    processor: FrameProcessor,
) -> Result<(), Box<dyn std::error::Error>> {
    let signal = StopSignal::new();
    let handler_signal = signal.clone();
    ctrlc::set_handler(move || {
        if is_forced_exit(&handler_signal) {
            eprintln!("Interrupted again, exiting immediately.");
            process::exit(FORCED_EXIT_CODE);
        }
    })?;

    let device = camera
        .map(CameraDevice::with_name)
        .unwrap_or_else(CameraDevice::platform_default);

    let mut use_case = LiveModeUseCase::new(
        Box::new(FfmpegCameraSource::new(device)),
        Box::new(WindowDisplay::new()),
        processor,
        StopCondition::new(signal, KEY_POLL_INTERVAL),
    )
    .with_logger(Box::new(LogPipelineLogger::new()));
    use_case.execute()?;
    Ok(())
}

/// First Ctrl+C asks the live loop to stop; a second one while the loop is
/// still blocked (e.g. on a hung camera read) ends the process.
fn is_forced_exit(signal: &StopSignal) -> bool {
    let repeated = signal.trigger_again();
    if !repeated {
        log::info!("Stopping. Press Ctrl+C again to exit immediately.");
    }
    repeated
}

fn resolve_model_files(cli: &Cli) -> Result<ModelFiles, ModelResolveError> {
    match (&cli.network, &cli.weights) {
        (Some(network), Some(weights)) => ModelFiles::explicit(network.clone(), weights.clone()),
        _ => model_resolver::resolve(&model_resolver::search_roots(cli.model_dir.as_deref())),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if let Some(file) = &cli.file {
        if !is_image(file) {
            return Err(format!(
                "Unsupported image format: {} (expected one of: {})",
                file.display(),
                IMAGE_EXTENSIONS.join(", ")
            )
            .into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn print_usage() {
    let name = Cli::command().get_name().to_string();
    println!("Usage:");
    println!("  {name} -f <image_file>       # Detect faces in an image and draw a green box around each face");
    println!("  {name} -f <image_file> -b    # Detect and blur faces in an image");
    println!("  {name}                       # Prompt to access camera and detect faces using webcam");
    println!();
}

/// Asks for camera consent. Only an answer of `y` or `Y` counts as yes.
fn confirm_camera_access<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{CAMERA_PROMPT}")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_consent(&answer))
}

fn is_consent(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}
