//! Replays recorded camera frames through the try-on overlay and writes the composited frames.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tryon::accessory::AccessoryKind;
use tryon::asset::{AssetId, FsAssetSource};
use tryon::camera::ReplayCamera;
use tryon::config::TryOnConfig;
use tryon::controller::{OverlayController, Screen};
use tryon::face::{Face, FixedFaceDetector};
use tryon::image::Rect;
use tryon::loader::AssetLoader;
use tryon::permission::StaticPermission;
use tryon::renderer::BlendRenderer;
use tryon::session::{DirectorySink, Session, SessionPlan};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kind of jewelry to try on
    #[arg(long, value_enum, default_value_t = AccessoryKind::Necklace)]
    accessory: AccessoryKind,

    /// Asset to select once the default asset has loaded
    #[arg(long)]
    asset: Option<String>,

    /// Face bounding box `x,y,width,height` reported for every frame (repeatable)
    #[arg(long, value_parser = parse_face)]
    face: Vec<Face>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write the composited frames to
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Deny camera permission
    #[arg(long)]
    no_permission: bool,

    /// Pretend that there is no camera device
    #[arg(long)]
    no_device: bool,

    /// Frame index at which the screen loses focus
    #[arg(long)]
    focus_lost_at: Option<usize>,

    /// Camera frames to replay (PNG or JPEG)
    frames: Vec<PathBuf>,
}

fn parse_face(s: &str) -> Result<Face, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid face '{s}': {e}"))?;
    match parts[..] {
        [x, y, width, height] => Ok(Face::new(Rect::from_top_left(x, y, width, height))),
        _ => Err(format!("expected `x,y,width,height`, got '{s}'")),
    }
}

fn main() -> anyhow::Result<()> {
    tryon::init_logger!();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => TryOnConfig::load(path)?,
        None => TryOnConfig::default(),
    }
    .with_env();
    log::debug!("{:?}", config);

    let mut plan = SessionPlan {
        focus_lost_at: args.focus_lost_at,
        block_on_selection: true,
        ..SessionPlan::default()
    };
    if let Some(asset) = &args.asset {
        let asset = AssetId::new(asset.as_str());
        if !args.accessory.offers(&asset) {
            bail!(
                "unknown {} asset '{}', expected one of {:?}",
                args.accessory,
                asset,
                args.accessory.catalog()
            );
        }
        plan.selections.push((0, asset));
    }

    let loader = AssetLoader::spawn(FsAssetSource::new(&config.asset_dir))
        .context("failed to spawn asset loader")?;
    let controller = OverlayController::new(config.strategy(args.accessory), loader)
        .with_detection_options(config.detection);

    let mut camera = ReplayCamera::new(&args.frames, FixedFaceDetector::new(args.face));
    if args.no_device {
        camera = camera.without_device();
    }
    let gate = if args.no_permission {
        StaticPermission::denied()
    } else {
        StaticPermission::granted()
    };
    let sink = DirectorySink::new(&args.out)?;

    println!("{}", controller.instructions());

    let mut session = Session::new(controller, gate, camera, BlendRenderer::new(), sink);
    let report = session.run(&plan)?;

    match report.screen {
        Screen::RequestPermission => bail!("camera permission denied"),
        Screen::NoDevice => bail!("No camera device or permission"),
        Screen::Camera => {}
    }
    println!(
        "wrote {} frame(s) to '{}' ({} with overlay, {} camera error(s))",
        report.frames,
        session.sink().dir().display(),
        report.overlaid,
        report.camera_errors,
    );

    Ok(())
}
