mod play;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use portrait_render::{
    is_supported_image, theme_from_colorfgbg, CharGrid, GridGenerator, LayoutPolicy, Point,
    PortraitConfig, Renderer, Surface, TextSurface, ThemePreference, ThemeSwitch,
};
use walkdir::WalkDir;

/// Rows shown after generating a single grid.
const PREVIEW_ROWS: usize = 20;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate, preview and animate ASCII portraits")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an image (or every image in a directory) to a character grid
    Generate(GenerateArgs),
    /// Print a single animation frame to stdout
    Preview(PreviewArgs),
    /// Animate a character grid in the terminal
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input image path or directory of images
    input: PathBuf,
    /// Output JSON file, or output directory when the input is a directory
    #[arg(short, long)]
    output: PathBuf,
    /// Target column width before padding (defaults to the configured width)
    #[arg(long, conflicts_with = "rows")]
    width: Option<u16>,
    /// Target row count; columns follow the image aspect ratio
    #[arg(long)]
    rows: Option<u16>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Character grid JSON file
    grid: PathBuf,
    /// Animation time to render
    #[arg(long, default_value_t = 0.0)]
    time: f64,
    /// Pointer position in surface units, e.g. `120,80`
    #[arg(long)]
    pointer: Option<PointerArg>,
    #[arg(long, value_enum, default_value = "system")]
    theme: ThemeChoice,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Character grid JSON file
    grid: PathBuf,
    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
    #[arg(long, value_enum, default_value = "system")]
    theme: ThemeChoice,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
    System,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PointerArg(Point);

impl FromStr for PointerArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (x, y) = value.split_once(',').ok_or_else(|| format!("expected X,Y, got {value:?}"))?;
        let parse = |part: &str| {
            part.trim().parse::<f64>().map_err(|err| format!("invalid coordinate {part:?}: {err}"))
        };
        Ok(Self(Point::new(parse(x)?, parse(y)?)))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PortraitConfig::load(path)
            .with_context(|| format!("failed to load configuration {:?}", path))?,
        None => PortraitConfig::default(),
    };

    match cli.command {
        Commands::Generate(args) => generate(args, &config),
        Commands::Preview(args) => preview(args, &config),
        Commands::Play(args) => {
            let grid = load_grid(&args.grid)?;
            play::play(grid, &config, theme_switch(args.theme), args.frames)
        },
    }
}

fn generate(args: GenerateArgs, config: &PortraitConfig) -> Result<()> {
    let generator =
        GridGenerator::new(&config.generator).context("invalid generator configuration")?;
    let layout = match (args.width, args.rows) {
        (_, Some(rows)) => LayoutPolicy::ScaleToHeight(rows),
        (width, None) => LayoutPolicy::FixedColumns(width.unwrap_or(config.generator.columns)),
    };

    if args.input.is_dir() {
        return generate_directory(&generator, layout, &args.input, &args.output);
    }

    let grid = generator
        .generate_path(&args.input, layout)
        .with_context(|| format!("failed to generate grid from {:?}", args.input))?;
    write_grid(&grid, &args.output)?;

    let target = generator.unpadded_geometry(&grid);
    println!("ASCII data generated: {}x{} characters", target.columns, target.rows);
    println!("Saved to: {}", args.output.display());
    println!("\nPreview:");
    for row in grid.rows().take(PREVIEW_ROWS) {
        println!("{}", row);
    }
    Ok(())
}

fn generate_directory(
    generator: &GridGenerator,
    layout: LayoutPolicy,
    input: &Path,
    out_dir: &Path,
) -> Result<()> {
    let mut entries: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_supported_image(entry.path()))
        .map(|entry| entry.path().to_path_buf())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", input);
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {:?}", out_dir))?;

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )
        .context("invalid progress template")?
        .progress_chars("=> "),
    );

    for entry in &entries {
        let grid = generator
            .generate_path(entry, layout)
            .with_context(|| format!("failed to generate grid from {:?}", entry))?;
        let output = output_path(input, entry, out_dir);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {:?}", parent))?;
        }
        write_grid(&grid, &output)?;
        debug!("wrote {}x{} grid to {}", grid.width(), grid.height(), output.display());
        progress.inc(1);
    }

    progress.finish_with_message(format!("Grids written to {:?}", out_dir));
    Ok(())
}

/// Mirrors `entry`'s path below `input` under `out_dir`, with a `.json` extension.
fn output_path(input: &Path, entry: &Path, out_dir: &Path) -> PathBuf {
    let relative = entry.strip_prefix(input).unwrap_or(entry);
    out_dir.join(relative).with_extension("json")
}

fn preview(args: PreviewArgs, config: &PortraitConfig) -> Result<()> {
    let grid = load_grid(&args.grid)?;
    let mut renderer = Renderer::new(grid, &config.display);
    renderer.set_theme(theme_switch(args.theme).resolved());
    renderer.state_mut().time = args.time;
    if let Some(PointerArg(point)) = args.pointer {
        renderer.state_mut().enter();
        renderer.state_mut().move_to(point);
    }

    let mut surface = TextSurface::new(config.display.cell_width, config.display.cell_height);
    if !surface.acquire(renderer.surface_spec()) {
        anyhow::bail!("grid {:?} does not fit the configured cell size", args.grid);
    }
    renderer.draw(&mut surface);

    for line in surface.lines() {
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn load_grid(path: &Path) -> Result<CharGrid> {
    CharGrid::load(path).with_context(|| format!("failed to load character grid {:?}", path))
}

fn write_grid(grid: &CharGrid, path: &Path) -> Result<()> {
    let json = grid.to_json_pretty().context("failed to serialize grid")?;
    fs::write(path, json).with_context(|| format!("failed to write {:?}", path))
}

fn theme_switch(choice: ThemeChoice) -> ThemeSwitch {
    let system = theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref());
    ThemeSwitch::new(choice.to_preference(), system)
}

impl ThemeChoice {
    fn to_preference(self) -> ThemePreference {
        match self {
            ThemeChoice::Light => ThemePreference::Light,
            ThemeChoice::Dark => ThemePreference::Dark,
            ThemeChoice::System => ThemePreference::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_argument_parses_coordinates() {
        assert_eq!("120, 80.5".parse::<PointerArg>(), Ok(PointerArg(Point::new(120.0, 80.5))));
        assert!("120".parse::<PointerArg>().is_err());
        assert!("a,b".parse::<PointerArg>().is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn directory_outputs_mirror_input_tree() {
        use image::{Rgba, RgbaImage};

        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        for dir in ["a", "b"] {
            fs::create_dir(input.path().join(dir)).unwrap();
            let image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
            image.save(input.path().join(dir).join("face.png")).unwrap();
        }

        let generator = GridGenerator::new(&PortraitConfig::default().generator).unwrap();
        generate_directory(&generator, LayoutPolicy::FixedColumns(4), input.path(), out.path())
            .unwrap();

        for dir in ["a", "b"] {
            let grid = CharGrid::load(out.path().join(dir).join("face.json")).unwrap();
            assert_eq!(generator.unpadded_geometry(&grid).columns, 4);
        }
        assert!(!out.path().join("face.json").exists());
    }

    #[test]
    fn output_path_swaps_extension() {
        let path = output_path(Path::new("in"), Path::new("in/x/portrait.jpeg"), Path::new("out"));
        assert_eq!(path, Path::new("out/x/portrait.json"));
    }

    #[test]
    fn width_and_rows_conflict() {
        let parsed = Cli::try_parse_from([
            "portrait", "generate", "in.png", "-o", "out.json", "--width", "40", "--rows", "9",
        ]);
        assert!(parsed.is_err());
    }
}
