use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture};

use imgslider::haptics::{Haptics, SilentHaptics, default_haptics};
use imgslider::logging::init_logging;
use imgslider::{AnchorPolicy, App, Binding, ImageSlider, Rgba, SliderSpec};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Anchor {
    /// Re-latch the drag anchor whenever the translation is near zero.
    Heuristic,
    /// Latch the drag anchor once when the drag starts.
    Explicit,
}

impl From<Anchor> for AnchorPolicy {
    fn from(anchor: Anchor) -> Self {
        match anchor {
            Anchor::Heuristic => AnchorPolicy::TranslationHeuristic,
            Anchor::Explicit => AnchorPolicy::ExplicitStart,
        }
    }
}

#[derive(Parser)]
#[command(name = "imgslider", about = "Drag an image thumb along a gradient track")]
struct Cli {
    /// Path to a TOML slider config. Overrides the range/step/image/color flags.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lower bound of the range.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    min: f64,

    /// Upper bound of the range.
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    max: f64,

    /// Step the reported value snaps to.
    #[arg(long, default_value_t = 10.0)]
    step: f64,

    /// Initial value. Defaults to the lower bound.
    #[arg(long, allow_negative_numbers = true)]
    value: Option<f64>,

    /// PNG used as the thumb. Defaults to a built-in clock face.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Track gradient stop as #rrggbb or #rrggbbaa; repeat for more stops.
    #[arg(long = "color")]
    colors: Vec<Rgba>,

    /// Slider height in terminal rows.
    #[arg(long, default_value_t = 3)]
    rows: u16,

    /// How the drag anchor is latched.
    #[arg(long, value_enum, default_value_t = Anchor::Heuristic)]
    anchor: Anchor,

    /// Disable audible drag feedback.
    #[arg(long, default_value_t = false)]
    no_haptics: bool,

    /// Write logs to this file. Logging is off otherwise.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at trace level.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn slider_spec(&self) -> Result<SliderSpec> {
        if let Some(path) = &self.config {
            return Ok(SliderSpec::load(path)?);
        }
        let defaults = SliderSpec::default();
        Ok(SliderSpec {
            range: [self.min, self.max],
            step: self.step,
            value: self.value,
            image: self.image.clone(),
            colors: if self.colors.is_empty() {
                defaults.colors
            } else {
                self.colors.clone()
            },
        })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref(), cli.verbose)?;

    let spec = cli.slider_spec()?;
    let value = Binding::new(spec.initial_value());
    let configuration = spec.into_configuration()?;
    tracing::info!(
        lower = configuration.lower(),
        upper = configuration.upper(),
        step = configuration.step(),
        "starting slider demo"
    );

    let haptics: Box<dyn Haptics> = if cli.no_haptics {
        Box::new(SilentHaptics)
    } else {
        default_haptics()
    };
    let slider = ImageSlider::new(value, configuration)
        .haptics(haptics)
        .anchor_policy(cli.anchor.into());
    let mut app = App::new(slider, cli.rows);

    let terminal = ratatui::init();
    let result = imgslider::with_teardown(
        || {
            enable_pointer_events()?;
            imgslider::run(&mut app, terminal)
        },
        || {
            let disabled = disable_pointer_events();
            ratatui::restore();
            disabled
        },
    );
    tracing::info!(value = app.slider().value(), "exiting");
    result
}

fn enable_pointer_events() -> Result<()> {
    std::io::stdout()
        .execute(EnableMouseCapture)?
        .execute(EnableFocusChange)?;
    Ok(())
}

fn disable_pointer_events() -> Result<()> {
    std::io::stdout()
        .execute(DisableFocusChange)?
        .execute(DisableMouseCapture)?;
    Ok(())
}
