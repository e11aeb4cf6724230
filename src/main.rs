use clap::Parser;
use fltk::{prelude::*, *};
use linked_label::TextLink;
use linked_label::config;
use linked_label::fltk_linked_label::FltkLinkedLabel;
use linked_label::opener::{SystemOpener, UrlOpener};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEMO_TEXT: &str = "Please click here now, or read the documentation before you continue.";

#[derive(Parser, Debug)]
#[command(name = "linked-label-gui")]
#[command(about = "A label with clickable links", long_about = None)]
struct Args {
    /// Label text
    #[arg(short, long, default_value = DEMO_TEXT)]
    text: String,

    /// Link the first occurrence of TEXT to URL (repeatable)
    #[arg(short, long, value_name = "TEXT=URL")]
    link: Vec<TextLink>,

    /// Label width in pixels
    #[arg(short, long, default_value = "360")]
    width: i32,

    /// Maximum number of lines (0 = unlimited)
    #[arg(long)]
    lines: Option<usize>,

    /// Only report tapped links, never open them
    #[arg(long)]
    no_open: bool,
}

fn demo_links() -> Vec<TextLink> {
    [
        ("click here", "https://example.com/"),
        ("documentation", "https://docs.rs/fltk"),
    ]
    .into_iter()
    .filter_map(|(text, url)| {
        let url = Url::parse(url).ok()?;
        Some(TextLink::new(url, text))
    })
    .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = config::load_or_default();

    let links = if args.link.is_empty() && args.text == DEMO_TEXT {
        demo_links()
    } else {
        args.link.clone()
    };

    // Initialize FLTK
    let app = app::App::default();
    let label_height = 200;
    let mut wind = window::Window::default()
        .with_size(args.width + 20, label_height + 45)
        .with_label("linked-label");

    wind.begin();

    let mut label = FltkLinkedLabel::new(10, 10, args.width, label_height);
    label.frame.set_frame(enums::FrameType::FlatBox);
    label.frame.set_color(enums::Color::from_rgb(255, 255, 245));

    let mut status = frame::Frame::new(0, label_height + 20, args.width + 20, 25, None);
    status.set_frame(enums::FrameType::FlatBox);
    status.set_color(enums::Color::Black);
    status.set_label_color(enums::Color::White);
    status.set_label("Click a link");

    wind.end();
    wind.resizable(&label.frame);
    wind.show();

    {
        let mut l = label.label.borrow_mut();
        l.apply_config(&config);
        if let Some(lines) = args.lines {
            l.set_number_of_lines(lines);
        }
        l.set_text(&args.text);
        if !l.add_text_links(&links) && !links.is_empty() {
            tracing::warn!("none of the requested links occur in the label text");
        }
    }

    let opener = SystemOpener::with_schemes(&config.openable_schemes);
    let no_open = args.no_open;
    label.set_link_callback(Some(Box::new(move |url: &Url| {
        tracing::info!(url = %url, "link tapped");
        let mut status = status.clone();
        status.set_label(url.as_str());

        if no_open {
            return;
        }
        if let Err(err) = opener.open(url) {
            tracing::warn!("{err}");
            status.set_label(&err.to_string());
        }
    })));

    label.redraw_if_needed();

    if let Err(err) = app.run() {
        tracing::error!("event loop failed: {err}");
        std::process::exit(1);
    }
}
