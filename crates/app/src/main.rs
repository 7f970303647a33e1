use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use magick_shapes_core::{
    presentation, style::BACKGROUND_COLOR, AppConfig, ColorShift, ContrastConfig, Drawing,
    ElementId, FrameClock, Presentation, PresentationEvent, RenderSurface, Scheduler,
    ShapeVisibility, StyleSurface, StyleTree, SvgDocument, TextContrast, SHAPE_DESCRIPTORS,
};
use tracing_subscriber::EnvFilter;

fn main() -> magick_shapes_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_live(&args),
        Commands::Render {
            shapes,
            output,
            size,
            config,
        } => run_render(&shapes, &output, size, config.as_deref()),
        Commands::Shapes => {
            for d in &SHAPE_DESCRIPTORS {
                let parts: Vec<String> = d
                    .components()
                    .iter()
                    .map(|c| format!("{{{}/{}}}", c.n, c.step))
                    .collect();
                println!("{:<16} {}", d.key, parts.join(" + "));
            }
            Ok(())
        }
    }
}

/// Custom property the drawing strokes read their color from.
const LINE_PROPERTY: &str = "--line";

/// The elements of the page the core modules act on.
struct Page {
    tree: StyleTree,
    root: ElementId,
    svg: ElementId,
    readout: ElementId,
}

impl Page {
    fn build() -> Self {
        let mut tree = StyleTree::new();
        let root = tree.insert("html", None);
        let svg = tree.insert("svg", Some(root));
        let controls = tree.insert("controls", Some(root));
        tree.insert("download", Some(controls));
        tree.insert("chevron", Some(controls));
        let readout = tree.insert("colorInfo", Some(root));
        Self {
            tree,
            root,
            svg,
            readout,
        }
    }

    /// Elements whose `color` follows the background.
    fn text_elements(&self) -> Vec<ElementId> {
        (0..self.tree.len())
            .map(ElementId)
            .filter(|&id| matches!(self.tree.name(id), Some("controls" | "download" | "chevron")))
            .collect()
    }

    fn background(&self) -> &str {
        self.tree.property(self.root, BACKGROUND_COLOR).unwrap_or("#ffffff")
    }

    fn line(&self) -> &str {
        self.tree.property(self.svg, LINE_PROPERTY).unwrap_or("#000000")
    }

    /// Resolver for the stroke color of the drawing, sharing the configured
    /// colors and threshold with the text resolvers.
    fn line_contrast(&self, config: &ContrastConfig) -> TextContrast {
        TextContrast::new(self.svg, config.retarget(LINE_PROPERTY))
    }
}

fn run_live(args: &RunArgs) -> magick_shapes_core::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut clock = FrameClock::new(args.fps, Some(args.frames))?;
    tracing::info!(
        frames = args.frames,
        fps = args.fps,
        presentation = args.presentation,
        "starting live mode"
    );

    let mut page = Page::build();
    let mut scheduler = Scheduler::new();

    let mut shift = ColorShift::new(page.root, config.background.clone());
    if args.color_controls {
        shift.attach_readout(page.readout);
    }
    let background = scheduler.register(shift);
    scheduler.register(page.line_contrast(&config.contrast));
    for element in page.text_elements() {
        scheduler.register(TextContrast::new(element, config.contrast.clone()));
    }

    let mut visibility = ShapeVisibility::new();
    for key in &args.shapes {
        visibility.set(key, true)?;
    }
    let mut svg = SvgDocument::new();
    svg.redraw(&Drawing::compose(config.canvas.size, &visibility, &config.canvas))?;

    let mut show = if args.presentation {
        let mut show = Presentation::new(config.presentation.clone())?;
        if let PresentationEvent::Show(index) = show.begin(0.0) {
            presentation::apply_combo(index, &mut visibility)?;
            svg.redraw(&Drawing::compose(config.canvas.size, &visibility, &config.canvas))?;
        }
        Some(show)
    } else {
        None
    };

    let mut draw_error = None;
    scheduler.start(&mut clock, &mut page.tree, |tick| {
        let Some(show) = show.as_mut() else {
            return;
        };
        match show.poll(tick.time) {
            Some(PresentationEvent::FadeOut) => tracing::debug!(time = tick.time, "fade out"),
            Some(PresentationEvent::Show(index)) => {
                let redraw = presentation::apply_combo(index, &mut visibility).and_then(|()| {
                    svg.redraw(&Drawing::compose(config.canvas.size, &visibility, &config.canvas))
                });
                if let Err(err) = redraw {
                    draw_error.get_or_insert(err);
                }
            }
            None => {}
        }
    });
    if let Some(err) = draw_error {
        return Err(err);
    }

    if let Some(shift) = scheduler.module_mut::<ColorShift>(background) {
        if let Some(color) = shift.current() {
            tracing::info!(hue = color.h, saturation = color.s, lightness = color.l, "final background");
        }
    }
    if args.color_controls {
        println!("{}", page.tree.text(page.readout).unwrap_or_default());
    }
    tracing::info!(
        background = page.background(),
        line = page.line(),
        shapes = ?visibility.visible_keys(),
        "finished"
    );

    if let Some(output) = &args.output {
        svg.write_to(output, page.background(), page.line())?;
    }
    Ok(())
}

fn run_render(
    shapes: &[String],
    output: &Path,
    size: Option<f64>,
    config: Option<&Path>,
) -> magick_shapes_core::Result<()> {
    let config = load_config(config)?;
    let size = size.unwrap_or(config.canvas.size);
    tracing::info!(?shapes, size, ?output, "rendering snapshot");

    let mut visibility = ShapeVisibility::new();
    for key in shapes {
        visibility.set(key, true)?;
    }

    let mut page = Page::build();
    let mut scheduler = Scheduler::new();
    scheduler.register(ColorShift::new(page.root, config.background.clone()));
    scheduler.register(page.line_contrast(&config.contrast));
    scheduler.tick(0.0, &mut page.tree);

    let mut svg = SvgDocument::new();
    svg.redraw(&Drawing::compose(size, &visibility, &config.canvas))?;
    svg.write_to(output, page.background(), page.line())
}

fn load_config(path: Option<&Path>) -> magick_shapes_core::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_json_file(path),
        None => Ok(AppConfig::live_defaults()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated polygon and star generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate the page against a synthetic display clock.
    Run(RunArgs),
    /// Write a single SVG snapshot of the selected shapes.
    Render {
        /// Shape keys to draw.
        #[arg(short, long = "shape", required = true)]
        shapes: Vec<String>,
        /// Output path for the SVG file.
        #[arg(short, long)]
        output: PathBuf,
        /// Canvas size in pixels.
        #[arg(long)]
        size: Option<f64>,
        /// Optional JSON config file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the available shapes.
    Shapes,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Number of frames to run.
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Frames per second of the synthetic clock.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Shapes visible from the start.
    #[arg(short, long = "shape")]
    shapes: Vec<String>,
    /// Mirror the background color into a readout.
    #[arg(long)]
    color_controls: bool,
    /// Cycle through preset combos.
    #[arg(long)]
    presentation: bool,
    /// Optional JSON config file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the final frame as SVG.
    #[arg(short, long)]
    output: Option<PathBuf>,
}
