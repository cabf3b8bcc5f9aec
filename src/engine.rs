use crate::browser;
use anyhow::{anyhow, Error, Result};
// Web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use futures::future::try_join_all;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

pub mod input {
    use crate::browser;
    use anyhow::Result;
    use futures::channel::mpsc::{unbounded, UnboundedReceiver};

    /// Key codes that arrived since the previous frame, in press order.
    /// Edge events rather than held state: grid movement wants one step per
    /// keypress, not one per frame the key is down.
    pub struct FrameInput {
        pressed: Vec<String>,
    }

    impl FrameInput {
        pub fn is_pressed(&self, code: &str) -> bool {
            self.pressed.iter().any(|pressed| pressed == code)
        }
    }

    /// Buffers keydown events between frames. The browser callback pushes
    /// into an unbounded channel; the loop drains it once per tick.
    pub struct InputQueue {
        receiver: UnboundedReceiver<String>,
        // Keeps the DOM callback alive for as long as the queue exists.
        _onkeydown: browser::KeydownClosure,
    }

    impl InputQueue {
        pub fn attach() -> Result<Self> {
            let (sender, receiver) = unbounded();
            let onkeydown = browser::create_keydown_closure(move |event: web_sys::KeyboardEvent| {
                let _ = sender.unbounded_send(event.code());
            });
            browser::on_keydown(&onkeydown)?;
            Ok(InputQueue {
                receiver,
                _onkeydown: onkeydown,
            })
        }

        pub fn drain(&mut self) -> FrameInput {
            let mut pressed = Vec::new();
            while let Ok(Some(code)) = self.receiver.try_next() {
                pressed.push(code);
            }
            FrameInput { pressed }
        }
    }

}

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, dt: f32, input: &input::FrameInput);
    fn draw(&self, renderer: &Renderer);
}

pub struct GameLoop {
    last_frame: f64,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    /// One-time bootstrap, then the loop drives itself: each animation frame
    /// computes the seconds elapsed since the previous one, runs `update`
    /// to completion, then `draw`, then re-requests the next frame. The host
    /// delivers frames serially, so ticks never overlap.
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut game = game.initialize().await?;
        let mut input = input::InputQueue::attach()?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            let dt = ((perf - game_loop.last_frame) / 1000.0) as f32;
            let frame_input = input.drain();
            game.update(dt, &frame_input);
            game.draw(&renderer);
            game_loop.last_frame = perf;
            let _ = browser::request_animation_frame(f.borrow().as_ref().unwrap());
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

/// Canvas text attributes for one draw call. The context is stateful, so
/// every call sets the full style rather than trusting what was left behind.
pub struct TextStyle<'a> {
    pub font: &'a str,
    pub align: &'a str,
    pub baseline: &'a str,
    pub fill: &'a str,
    pub stroke: Option<&'a str>,
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn draw_image(&self, image: &HtmlImageElement, position: &Point) {
        self.context
            .draw_image_with_html_image_element(image, position.x.into(), position.y.into())
            .expect("Drawing is throwing exceptions! Unrecoverable error");
    }

    /// Draws mirrored around the vertical axis, for sprites traveling
    /// opposite their art's facing.
    pub fn draw_image_flipped(&self, image: &HtmlImageElement, position: &Point) {
        self.context.save();
        self.context
            .translate((position.x + image.width() as f32).into(), position.y.into())
            .expect("Translate is throwing exceptions! Unrecoverable error");
        self.context
            .scale(-1.0, 1.0)
            .expect("Scale is throwing exceptions! Unrecoverable error");
        self.context
            .draw_image_with_html_image_element(image, 0.0, 0.0)
            .expect("Drawing is throwing exceptions! Unrecoverable error");
        self.context.restore();
    }

    pub fn fill_rect(&self, rect: &Rect, fill: &str) {
        self.context.set_fill_style_str(fill);
        self.context.fill_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn draw_text(&self, text: &str, position: &Point, style: &TextStyle) {
        self.context.set_font(style.font);
        self.context.set_text_align(style.align);
        self.context.set_text_baseline(style.baseline);
        self.context.set_fill_style_str(style.fill);
        self.context
            .fill_text(text, position.x.into(), position.y.into())
            .expect("Text drawing is throwing exceptions! Unrecoverable error");
        if let Some(stroke) = style.stroke {
            self.context.set_stroke_style_str(stroke);
            self.context
                .stroke_text(text, position.x.into(), position.y.into())
                .expect("Text drawing is throwing exceptions! Unrecoverable error");
        }
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once::<dyn FnMut(), _, _, _>(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once::<dyn FnMut(JsValue), _, _, _>(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // first ? yields the channel result, second ? the load result
    rx.await??;

    Ok(image)
}

/// Preloaded images keyed by path, the renderer's only image source. Filled
/// once during initialization so draw calls never race a pending fetch.
pub struct Assets {
    images: HashMap<String, HtmlImageElement>,
}

impl Assets {
    /// Fetch every path concurrently; total wait is the slowest resource.
    pub async fn load(paths: &[&str]) -> Result<Self> {
        let images = try_join_all(paths.iter().map(|path| async move {
            let image = load_image(path).await?;
            Ok::<(String, HtmlImageElement), Error>((path.to_string(), image))
        }))
        .await?;
        Ok(Assets {
            images: images.into_iter().collect(),
        })
    }

    pub fn get(&self, path: &str) -> &HtmlImageElement {
        self.images
            .get(path)
            .unwrap_or_else(|| panic!("Image was never loaded : {}", path))
    }
}
