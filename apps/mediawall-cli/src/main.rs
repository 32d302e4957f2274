use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use mediawall_input::PointerEvent;
use mediawall_kernel::{MemoryRouter, Wall, WallConfig};
use mediawall_layout::WallLayout;
use mediawall_render::{DebugTextRenderer, Renderer};
use mediawall_tools::WallInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mediawall-cli", about = "CLI tool for media wall layouts and sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Wall descriptor (JSON or YAML); the built-in demo wall when omitted
    #[arg(long, global = true)]
    layout: Option<PathBuf>,

    /// Wall configuration (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List item identifiers in wall order
    Ids,
    /// Load and validate the layout and config
    Validate,
    /// Replay an interaction script and print the resulting frames
    ///
    /// Steps: `<index>` clicks an item, `miss` clicks empty space,
    /// `hover:<index>` / `unhover` move the pointer, `nav:<path>` pushes a
    /// route, `back` / `forward` walk the history.
    Simulate {
        /// Script steps
        #[arg(required = true)]
        steps: Vec<String>,
        /// Frames to run after each step
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Frame delta in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Print every frame instead of the last frame of each step
        #[arg(long)]
        every_frame: bool,
    },
}

/// One parsed simulation step.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Click(usize),
    Miss,
    Hover(usize),
    Unhover,
    Navigate(String),
    Back,
    Forward,
}

fn parse_step(raw: &str) -> anyhow::Result<Step> {
    let raw = raw.trim();
    let step = match raw {
        "miss" => Step::Miss,
        "unhover" => Step::Unhover,
        "back" => Step::Back,
        "forward" => Step::Forward,
        _ => {
            if let Some(path) = raw.strip_prefix("nav:") {
                Step::Navigate(path.to_string())
            } else if let Some(index) = raw.strip_prefix("hover:") {
                Step::Hover(index.parse().with_context(|| format!("bad hover index in {raw:?}"))?)
            } else if let Ok(index) = raw.parse() {
                Step::Click(index)
            } else {
                bail!("unknown step {raw:?}");
            }
        }
    };
    Ok(step)
}

fn load_layout(path: Option<&PathBuf>) -> anyhow::Result<WallLayout> {
    match path {
        Some(path) => {
            WallLayout::load(path).with_context(|| format!("loading layout {}", path.display()))
        }
        None => Ok(WallLayout::demo()),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<WallConfig> {
    match path {
        Some(path) => {
            WallConfig::load(path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(WallConfig::default()),
    }
}

fn apply(wall: &mut Wall, step: &Step, hovered: &mut Option<usize>) -> anyhow::Result<()> {
    let id_at = |wall: &Wall, index: usize| {
        wall.layout()
            .get(index)
            .map(|item| item.id)
            .with_context(|| format!("no item at index {index}"))
    };
    match step {
        Step::Click(index) => {
            let id = id_at(wall, *index)?;
            wall.handle(PointerEvent::click(id));
        }
        Step::Miss => wall.handle(PointerEvent::miss()),
        Step::Hover(index) => {
            let id = id_at(wall, *index)?;
            if let Some(prev) = hovered.replace(*index) {
                let prev = id_at(wall, prev)?;
                wall.handle(PointerEvent::Leave(prev));
            }
            wall.handle(PointerEvent::Enter(id));
        }
        Step::Unhover => {
            if let Some(prev) = hovered.take() {
                let prev = id_at(wall, prev)?;
                wall.handle(PointerEvent::Leave(prev));
            }
        }
        Step::Navigate(path) => wall.navigator_mut().push_path(path),
        Step::Back => {
            if !wall.navigator_mut().back() {
                println!("(history: nothing to go back to)");
            }
        }
        Step::Forward => {
            if !wall.navigator_mut().forward() {
                println!("(history: nothing to go forward to)");
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("mediawall-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("layout: {}", mediawall_layout::crate_info());
            println!("input: {}", mediawall_input::crate_info());
            println!("kernel: {}", mediawall_kernel::crate_info());
            println!("render: {}", mediawall_render::crate_info());
            println!("tools: {}", mediawall_tools::crate_info());
        }
        Commands::Ids => {
            let layout = load_layout(cli.layout.as_ref())?;
            for item in layout.items() {
                println!("{:>3}  {}  {}", item.index, item.id, item.image_ref);
            }
        }
        Commands::Validate => {
            let layout = load_layout(cli.layout.as_ref())?;
            let config = load_config(cli.config.as_ref())?;
            println!(
                "layout OK: {} items, origin=({:.2}, {:.2}, {:.2}), fingerprint={}",
                layout.len(),
                layout.origin().x,
                layout.origin().y,
                layout.origin().z,
                layout.fingerprint()
            );
            println!(
                "config OK: focus_distance={} position_tau={}s orientation_tau={}s hover_tau={}s",
                config.focus_distance,
                config.position_tau,
                config.orientation_tau,
                config.hover_tau
            );
        }
        Commands::Simulate {
            steps,
            frames,
            dt,
            every_frame,
        } => {
            let steps = steps
                .iter()
                .map(|s| parse_step(s))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let layout = load_layout(cli.layout.as_ref())?;
            let config = load_config(cli.config.as_ref())?;
            let mut wall = Wall::new(layout, config, MemoryRouter::new());
            let renderer = DebugTextRenderer::new();
            let mut hovered = None;

            for step in &steps {
                println!(">>> {step:?}");
                apply(&mut wall, step, &mut hovered)?;
                for event in wall.drain_events() {
                    println!("event: {event:?}");
                }
                let mut last = None;
                for _ in 0..frames {
                    let frame = wall.step(dt);
                    if every_frame {
                        print!("{}", renderer.render(&frame, wall.layout()));
                    } else {
                        last = Some(frame);
                    }
                }
                // Navigation picked up during stepping shows up as events too.
                for event in wall.drain_events() {
                    println!("event: {event:?}");
                }
                if let Some(frame) = last {
                    print!("{}", renderer.render(&frame, wall.layout()));
                }
                println!("route: {}", wall.navigator().path());
                println!("{}", WallInspector::summary(&wall));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_steps() {
        assert_eq!(parse_step("3").unwrap(), Step::Click(3));
        assert_eq!(parse_step("miss").unwrap(), Step::Miss);
        assert_eq!(parse_step("hover:2").unwrap(), Step::Hover(2));
        assert_eq!(parse_step("nav:/").unwrap(), Step::Navigate("/".into()));
        assert_eq!(parse_step(" back ").unwrap(), Step::Back);
        assert!(parse_step("jump").is_err());
        assert!(parse_step("hover:x").is_err());
    }

    #[test]
    fn script_click_and_back() {
        let mut wall = Wall::new(WallLayout::demo(), WallConfig::default(), MemoryRouter::new());
        let mut hovered = None;
        apply(&mut wall, &Step::Click(1), &mut hovered).unwrap();
        let id = wall.layout().items()[1].id;
        assert_eq!(wall.navigator().path(), format!("/item/{id}"));
        apply(&mut wall, &Step::Back, &mut hovered).unwrap();
        wall.step(0.016);
        assert!(wall.selection().selected().is_none());
    }

    #[test]
    fn script_hover_moves_between_items() {
        let mut wall = Wall::new(WallLayout::demo(), WallConfig::default(), MemoryRouter::new());
        let mut hovered = None;
        apply(&mut wall, &Step::Hover(0), &mut hovered).unwrap();
        apply(&mut wall, &Step::Hover(4), &mut hovered).unwrap();
        let hovered_now: Vec<usize> = wall.hover().hovered_indices().collect();
        assert_eq!(hovered_now, vec![4]);
        apply(&mut wall, &Step::Unhover, &mut hovered).unwrap();
        assert!(!wall.hover().any_hovered());
    }

    #[test]
    fn script_rejects_out_of_range_index() {
        let mut wall = Wall::new(WallLayout::demo(), WallConfig::default(), MemoryRouter::new());
        assert!(apply(&mut wall, &Step::Click(42), &mut None).is_err());
    }
}
