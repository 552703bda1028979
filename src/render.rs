//! Responsive image rendering.
//!
//! The runtime half of the pipeline. Given a source image reference and
//! display hints, constructs the markup that lets the displaying
//! environment pick the best-fitting candidate, plus a three-state loading
//! presentation (skeleton → image, or error placeholder).
//!
//! The renderer depends only on the breakpoint ladder and the query-string
//! convention — not on the optimizer having run. Candidate URLs embed
//! `w`/`q`/`f` parameters for a compatible image-serving layer; if no
//! candidate resolves, the displaying environment falls back to the plain
//! `src`.
//!
//! ## Display state machine
//!
//! ```text
//! Loading ──load──▶ Loaded      (terminal)
//!    └─────error──▶ Errored     (terminal)
//! ```
//!
//! Each rendered instance owns its state independently. Load/error signals
//! after a terminal state is reached are ignored; a remount starts a fresh
//! instance at `Loading`.
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/): compile-time
//! checked, auto-escaped markup.

use crate::config::DEFAULT_SIZES;
use maud::{Markup, html};

/// Modern formats offered ahead of the untyped fallback candidates.
const MODERN_FORMATS: &[&str] = &["webp", "avif"];

/// Fetch scheduling for the displaying environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loading {
    #[default]
    Lazy,
    Eager,
}

/// Placeholder shown beneath the skeleton while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    #[default]
    Empty,
    Blur,
}

/// Display hints for one rendered image.
///
/// Only `src` and `alt` are required; everything else has the documented
/// default.
#[derive(Debug, Clone)]
pub struct ImageProps {
    pub src: String,
    pub alt: String,
    /// Intrinsic display width in pixels; absent means fill the container.
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Request the image immediately instead of near-viewport (overrides
    /// `loading`).
    pub priority: bool,
    pub loading: Loading,
    /// Viewport-relative width hint, passed through unmodified.
    pub sizes: String,
    /// Candidate quality, embedded in every candidate URL.
    pub quality: u32,
    pub placeholder: Placeholder,
    /// Pre-computed low-resolution stand-in for `Placeholder::Blur`.
    pub blur_data_url: Option<String>,
    /// Stretch to the containing element instead of intrinsic sizing.
    pub fill: bool,
}

impl ImageProps {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            width: None,
            height: None,
            priority: false,
            loading: Loading::default(),
            sizes: "100vw".to_string(),
            quality: 75,
            placeholder: Placeholder::default(),
            blur_data_url: None,
            fill: false,
        }
    }
}

/// Presentation state of one rendered image instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Loading,
    Loaded,
    Errored,
}

/// Per-instance state machine with optional caller callbacks.
///
/// `Loaded` and `Errored` are terminal: the first signal wins, later
/// signals are ignored, and each callback fires at most once.
#[derive(Default)]
pub struct ImageState {
    state: DisplayState,
    on_load: Option<Box<dyn FnMut()>>,
    on_error: Option<Box<dyn FnMut()>>,
}

impl ImageState {
    /// A fresh mount, in `Loading`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_load(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_load = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Successful fetch-and-decode signal. Returns whether a transition
    /// happened.
    pub fn notify_loaded(&mut self) -> bool {
        if self.state != DisplayState::Loading {
            return false;
        }
        self.state = DisplayState::Loaded;
        if let Some(cb) = &mut self.on_load {
            cb();
        }
        true
    }

    /// Fetch/decode failure signal. Returns whether a transition happened.
    /// There is no automatic retry.
    pub fn notify_failed(&mut self) -> bool {
        if self.state != DisplayState::Loading {
            return false;
        }
        self.state = DisplayState::Errored;
        if let Some(cb) = &mut self.on_error {
            cb();
        }
        true
    }
}

/// Build the candidate list for responsive selection.
///
/// For each modern format, one candidate per ladder width
/// (`{src}?w={w}&q={q}&f={fmt} {w}w`), followed by the untyped fallback set
/// (`{src}?w={w}&q={q} {w}w`), all joined by `", "`. The displaying
/// environment picks a candidate; `src` is not validated here.
pub fn srcset(src: &str, quality: u32) -> String {
    let mut candidates =
        Vec::with_capacity(DEFAULT_SIZES.len() * (MODERN_FORMATS.len() + 1));
    for format in MODERN_FORMATS {
        for &w in DEFAULT_SIZES {
            candidates.push(format!("{src}?w={w}&q={quality}&f={format} {w}w"));
        }
    }
    for &w in DEFAULT_SIZES {
        candidates.push(format!("{src}?w={w}&q={quality} {w}w"));
    }
    candidates.join(", ")
}

/// Neutral inline blur stand-in used when no `blur_data_url` is supplied.
///
/// A 1x1 light-gray GIF; the real low-resolution preview is expected to
/// come from the caller.
const DEFAULT_BLUR_DATA_URL: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAPPz8wAAACH5BAAAAAAALAAAAAABAAEAAAICRAEAOw==";

fn container_style(props: &ImageProps) -> String {
    if props.fill {
        "position:relative;width:100%;height:100%".to_string()
    } else {
        let width = props
            .width
            .map_or("100%".to_string(), |w| format!("{w}px"));
        let height = props
            .height
            .map_or("auto".to_string(), |h| format!("{h}px"));
        format!("position:relative;width:{width};height:{height}")
    }
}

/// Render one image instance in the given display state.
///
/// - `Loading`: skeleton block (plus blur stand-in for
///   `Placeholder::Blur`) with the image at opacity 0.
/// - `Loaded`: the image cross-faded in (`is-loaded` drives a fixed
///   300ms opacity transition in the stylesheet).
/// - `Errored`: a neutral labelled placeholder block; no image element.
///
/// The source reference is always exposed as a `meta itemprop="image"`
/// annotation for indexing, independent of the candidate list.
pub fn render(props: &ImageProps, state: DisplayState) -> Markup {
    if state == DisplayState::Errored {
        return html! {
            div .image-error style=(container_style(props)) {
                span .image-error-text { "Image failed to load" }
                meta itemprop="image" content=(props.src);
            }
        };
    }

    let loading = if props.priority {
        "eager"
    } else {
        match props.loading {
            Loading::Lazy => "lazy",
            Loading::Eager => "eager",
        }
    };
    let loaded = state == DisplayState::Loaded;
    let blur_url = props
        .blur_data_url
        .as_deref()
        .unwrap_or(DEFAULT_BLUR_DATA_URL);

    html! {
        div .image-frame style=(container_style(props)) {
            @if !loaded && props.placeholder == Placeholder::Blur {
                div .image-blur style=(format!("background-image:url({blur_url})")) {}
            }
            @if !loaded {
                div .image-skeleton {}
            }
            img .image-fade .is-loaded[loaded]
                src=(props.src)
                alt=(props.alt)
                srcset=(srcset(&props.src, props.quality))
                sizes=(props.sizes)
                loading=(loading)
                decoding="async"
                width=[(!props.fill).then_some(props.width).flatten()]
                height=[(!props.fill).then_some(props.height).flatten()];
            meta itemprop="image" content=(props.src);
        }
    }
}
