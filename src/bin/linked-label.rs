use clap::{Parser, Subcommand};
use linked_label::TextLink;
use linked_label::geometry::{Point, Size};
use linked_label::hit_test::{self, HitTestInput};
use linked_label::layout::{LayoutConstraints, MonospaceMetrics, ParagraphLayout};
use linked_label::registry::LinkRegistry;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "linked-label")]
#[command(about = "Probe linked label layout and hit testing without a display", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the URL of the link under a label-local point
    Probe {
        /// Label text
        #[arg(short, long)]
        text: String,

        /// Link the first occurrence of TEXT to URL (repeatable)
        #[arg(short, long, value_name = "TEXT=URL")]
        link: Vec<TextLink>,

        /// Label width
        #[arg(short, long)]
        width: f64,

        /// Label height (default: unbounded)
        #[arg(long)]
        height: Option<f64>,

        /// Maximum number of lines (0 = unlimited)
        #[arg(long, default_value = "0")]
        lines: usize,

        /// Font size
        #[arg(long, default_value = "14")]
        size: u8,

        x: f64,
        y: f64,
    },
    /// Print every laid-out line with its character range and bounds
    Layout {
        /// Label text
        #[arg(short, long)]
        text: String,

        /// Label width
        #[arg(short, long)]
        width: f64,

        /// Font size
        #[arg(long, default_value = "14")]
        size: u8,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Probe {
            text,
            link,
            width,
            height,
            lines,
            size,
            x,
            y,
        } => {
            let mut registry = LinkRegistry::new(text);
            registry.add_text_links(&link);

            let bounds = match height {
                Some(height) => Size::new(width, height),
                None => Size::with_unbounded_height(width),
            };
            let input = HitTestInput {
                styled: registry.styled_text(),
                origin: Point::ZERO,
                constraints: LayoutConstraints::new(bounds)
                    .with_max_lines(lines)
                    .with_font(0, size),
            };

            match hit_test::url_at_local_point(&input, Point::new(x, y), &mut MonospaceMetrics) {
                Some(url) => {
                    println!("{url}");
                    ExitCode::SUCCESS
                }
                None => {
                    println!("no link");
                    ExitCode::from(1)
                }
            }
        }
        Commands::Layout { text, width, size } => {
            let constraints =
                LayoutConstraints::new(Size::with_unbounded_height(width)).with_font(0, size);
            let layout = ParagraphLayout::compute(&text, &constraints, &mut MonospaceMetrics);

            for (i, line) in layout.lines().iter().enumerate() {
                let start = line.glyphs.first().map_or(0, |g| g.bytes.start);
                let end = line.glyphs.last().map_or(0, |g| g.bytes.end);
                println!(
                    "{i:>3} [{}, {}) top={:.1} height={:.1} width={:.1} {:?}",
                    line.range.start,
                    line.range.end(),
                    line.top,
                    line.height,
                    line.width,
                    &text[start..end]
                );
            }
            ExitCode::SUCCESS
        }
    }
}
