// FLTK integration for LinkedLabel

use crate::geometry::Point;
use crate::label::LinkedLabel;
use crate::layout::{DrawContext, TextMeasure};
use crate::link::TextRange;
use crate::touch::Touch;
use fltk::{
    draw as fltk_draw,
    enums::{Align, Color, Cursor, Event, Font},
    frame::Frame,
    prelude::*,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use url::Url;

/// FLTK implementation of DrawContext
#[derive(Debug, Clone, Copy, Default)]
pub struct FltkDrawContext;

impl FltkDrawContext {
    pub fn new() -> Self {
        FltkDrawContext
    }
}

impl TextMeasure for FltkDrawContext {
    fn text_width(&mut self, text: &str, font: u8, size: u8) -> f64 {
        fltk_draw::set_font(Font::by_index(font as usize), size as i32);
        fltk_draw::width(text)
    }

    fn text_height(&self, font: u8, size: u8) -> i32 {
        fltk_draw::set_font(Font::by_index(font as usize), size as i32);
        fltk_draw::height()
    }

    fn text_descent(&self, font: u8, size: u8) -> i32 {
        fltk_draw::set_font(Font::by_index(font as usize), size as i32);
        fltk_draw::descent()
    }
}

impl DrawContext for FltkDrawContext {
    fn set_color(&mut self, color: u32) {
        fltk_draw::set_draw_color(to_fltk_color(color));
    }

    fn set_font(&mut self, font: u8, size: u8) {
        fltk_draw::set_font(Font::by_index(font as usize), size as i32);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        fltk_draw::draw_text2(text, x, y, 0, 0, Align::Left);
    }

    fn draw_rect_filled(&mut self, x: i32, y: i32, w: i32, h: i32) {
        fltk_draw::draw_rectf(x, y, w, h);
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        fltk_draw::draw_line(x1, y1, x2, y2);
    }

    fn push_clip(&mut self, x: i32, y: i32, w: i32, h: i32) {
        fltk_draw::push_clip(x, y, w, h);
    }

    fn pop_clip(&mut self) {
        fltk_draw::pop_clip();
    }
}

/// RGBA as packed by the label into an FLTK color; alpha is ignored.
fn to_fltk_color(color: u32) -> Color {
    let r = ((color >> 24) & 0xFF) as u8;
    let g = ((color >> 16) & 0xFF) as u8;
    let b = ((color >> 8) & 0xFF) as u8;
    Color::from_rgb(r, g, b)
}

type LinkCallback = Rc<RefCell<Option<Box<dyn Fn(&Url) + 'static>>>>;

/// FLTK wrapper for LinkedLabel with release and hover handling
pub struct FltkLinkedLabel {
    pub frame: Frame,
    pub label: Rc<RefCell<LinkedLabel>>,
    link_cb: LinkCallback,
    pending_tap: Rc<RefCell<Option<Url>>>,
}

impl FltkLinkedLabel {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        let mut frame = Frame::new(x, y, w, h, None);
        let label = Rc::new(RefCell::new(LinkedLabel::new(
            x,
            y,
            w,
            h,
            Box::new(FltkDrawContext::new()),
        )));
        let link_cb: LinkCallback = Rc::new(RefCell::new(None));
        let pending_tap: Rc<RefCell<Option<Url>>> = Rc::new(RefCell::new(None));

        // Release timestamps only need to be ordered
        let clock = Instant::now();

        frame.draw({
            let label = label.clone();
            move |w| {
                let mut ctx = FltkDrawContext::new();

                // Draw background
                fltk_draw::set_draw_color(w.color());
                fltk_draw::draw_rectf(w.x(), w.y(), w.w(), w.h());

                label.borrow().draw(&mut ctx);
                label.borrow_mut().mark_displayed();
            }
        });

        frame.handle({
            let label = label.clone();
            let link_cb = link_cb.clone();
            let pending_tap = pending_tap.clone();
            move |w, event| match event {
                // Claim the press so the matching release comes back here
                Event::Push => true,
                Event::Released => {
                    let touch = Touch::new(
                        (fltk::app::event_x(), fltk::app::event_y()),
                        clock.elapsed().as_secs_f64(),
                    );
                    let disposition = label.borrow_mut().handle_release(&[touch]);

                    // The label is no longer borrowed, so the callback may use it
                    let tapped = pending_tap.borrow_mut().take();
                    if let Some(url) = tapped {
                        if let Some(cb) = &*link_cb.borrow() {
                            cb(&url);
                        }
                    }

                    disposition.or_else(|| false)
                }
                Event::Enter | Event::Move => {
                    let local = Point::new(
                        (fltk::app::event_x() - w.x()) as f64,
                        (fltk::app::event_y() - w.y()) as f64,
                    );
                    let hit = label.borrow().link_at_point(local);
                    update_hover(w, &label, hit.map(|(_, range)| range));
                    true
                }
                Event::Leave => {
                    update_hover(w, &label, None);
                    true
                }
                _ => false,
            }
        });

        frame.resize_callback({
            let label = label.clone();
            move |w, x, y, width, height| {
                label.borrow_mut().resize(x, y, width, height);
                w.redraw();
            }
        });

        FltkLinkedLabel {
            frame,
            label,
            link_cb,
            pending_tap,
        }
    }

    /// Route tapped URLs to `cb` instead of the system opener. `None` restores
    /// the default of opening them.
    pub fn set_link_callback(&self, cb: Option<Box<dyn Fn(&Url) + 'static>>) {
        let mut label = self.label.borrow_mut();
        match cb {
            Some(cb) => {
                let pending = self.pending_tap.clone();
                label.set_link_did_tap(move |url| {
                    *pending.borrow_mut() = Some(url.clone());
                });
                *self.link_cb.borrow_mut() = Some(cb);
            }
            None => {
                label.clear_link_did_tap();
                *self.link_cb.borrow_mut() = None;
            }
        }
    }

    /// Schedule a redraw if the label changed since it was last drawn.
    pub fn redraw_if_needed(&mut self) {
        if self.label.borrow().needs_display() {
            self.frame.redraw();
        }
    }
}

fn update_hover(w: &mut Frame, label: &Rc<RefCell<LinkedLabel>>, range: Option<TextRange>) {
    if let Some(mut win) = w.window() {
        win.set_cursor(if range.is_some() {
            Cursor::Hand
        } else {
            Cursor::Default
        });
    }
    if label.borrow_mut().set_hovered_link(range) {
        w.redraw();
    }
}

