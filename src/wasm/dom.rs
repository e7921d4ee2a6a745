use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Node,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use super::render::{AnimationFrames, Canvas, Timeouts};
use crate::driver::{PlayOutcome, Player, PlayerConfig, ReleaseHook};
use crate::kind::AnimationKind;
use crate::page::{Command, Effect, Page, PageLayout};
use crate::params::PLAYING_LABEL;

struct Inner {
    player: Player,
    page: RefCell<Page>,
    layout: PageLayout,
    document: Document,
    cards: Vec<HtmlElement>,
    filter_buttons: Vec<Element>,
}

/// The mounted page: the player, the chrome state and the elements both act on.
#[derive(Clone)]
pub struct App {
    inner: Rc<Inner>,
}

fn query_all<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}

fn on_click(target: &EventTarget, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn mount_canvas(document: &Document, kind: AnimationKind) -> Result<Option<Canvas>, JsValue> {
    let selector = format!("#{} canvas", kind.container_id());
    let Some(element) = document.query_selector(&selector)? else {
        tracing::debug!(%kind, "no canvas on page");
        return Ok(None);
    };
    let canvas = element
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("{selector} is not a canvas")))?;
    Ok(Some(Canvas::new(&canvas)?))
}

impl App {
    pub fn mount(window: &Window, document: &Document) -> Result<Self, JsValue> {
        let layout = PageLayout::default();
        let player = Player::new(
            AnimationFrames::new(window.clone()),
            Timeouts::new(window.clone()),
            PlayerConfig::default(),
        );
        for kind in AnimationKind::ALL {
            if let Some(canvas) = mount_canvas(document, kind)? {
                player.attach(kind, canvas);
            }
        }

        let cards: Vec<HtmlElement> = query_all(document, layout.card)?;
        let topics = cards
            .iter()
            .map(|card| card.get_attribute(layout.topic_attr).unwrap_or_default());
        let page = Page::new(topics);
        let filter_buttons = query_all(document, layout.filter_button)?;

        tracing::info!(cards = cards.len(), "page mounted");
        Ok(Self {
            inner: Rc::new(Inner {
                player,
                page: RefCell::new(page),
                layout,
                document: document.clone(),
                cards,
                filter_buttons,
            }),
        })
    }

    pub fn player(&self) -> &Player {
        &self.inner.player
    }

    pub fn run(&self, command: Command) {
        self.run_from(command, None);
    }

    /// Dispatches `command`; `trigger` is the play button that raised it.
    fn run_from(&self, command: Command, trigger: Option<HtmlButtonElement>) {
        let effects = self.inner.page.borrow_mut().dispatch(command);
        for effect in effects {
            self.apply(effect, trigger.clone());
        }
    }

    pub fn play(&self, kind: AnimationKind, button: Option<HtmlButtonElement>) {
        play_from_button(&self.inner.player, kind, button);
    }

    fn element(&self, selector: &str) -> Option<Element> {
        self.inner.document.query_selector(selector).ok().flatten()
    }

    fn card_index(&self, target: &Element) -> Option<usize> {
        let node: &Node = target;
        self.inner
            .cards
            .iter()
            .position(|card| card.is_same_node(Some(node)))
    }

    fn apply(&self, effect: Effect, trigger: Option<HtmlButtonElement>) {
        let layout = &self.inner.layout;
        let result = match effect {
            Effect::SetMenuOpen(open) => [layout.hamburger, layout.nav_menu]
                .into_iter()
                .filter_map(|selector| self.element(selector))
                .try_for_each(|el| {
                    el.class_list()
                        .toggle_with_force(layout.active_class, open)
                        .map(drop)
                }),
            Effect::ScrollIntoView(id) => {
                match self.inner.document.get_element_by_id(&id) {
                    Some(target) => {
                        let options = ScrollIntoViewOptions::new();
                        options.set_behavior(ScrollBehavior::Smooth);
                        options.set_block(ScrollLogicalPosition::Start);
                        target.scroll_into_view_with_scroll_into_view_options(&options);
                    }
                    None => tracing::debug!(%id, "scroll target missing"),
                }
                Ok(())
            }
            Effect::SetActiveFilter(filter) => {
                self.inner.filter_buttons.iter().try_for_each(|button| {
                    let active = button.get_attribute(layout.filter_attr).as_deref()
                        == Some(filter.as_str());
                    button
                        .class_list()
                        .toggle_with_force(layout.active_class, active)
                        .map(drop)
                })
            }
            Effect::ShowCard(index) => self.set_card_display(index, "block"),
            Effect::HideCard(index) => self.set_card_display(index, "none"),
            Effect::FadeIn(index) => match self.inner.cards.get(index) {
                Some(card) => card.class_list().add_1(layout.fade_in_class),
                None => Ok(()),
            },
            Effect::Play(kind) => {
                self.play(kind, trigger);
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::warn!(error = ?err, "page update failed");
        }
    }

    fn set_card_display(&self, index: usize, display: &str) -> Result<(), JsValue> {
        match self.inner.cards.get(index) {
            Some(card) => card.style().set_property("display", display),
            None => Ok(()),
        }
    }
}

/// Plays `kind`, marking `button` as playing while the request holds the
/// page. The button gets its label and enabled state back on release and
/// is left alone when the request is rejected.
pub fn play_from_button(
    player: &Player,
    kind: AnimationKind,
    button: Option<HtmlButtonElement>,
) -> PlayOutcome {
    let hook = button.clone().map(|button| {
        let label = button.text_content().unwrap_or_default();
        Box::new(move || {
            button.set_text_content(Some(&label));
            button.set_disabled(false);
        }) as ReleaseHook
    });
    let outcome = player.play_with(kind, hook);
    tracing::debug!(%kind, ?outcome, "play");
    if let (true, Some(button)) = (outcome.holds_busy(), button) {
        button.set_text_content(Some(PLAYING_LABEL));
        button.set_disabled(true);
    }
    outcome
}

/// Hooks the page's controls up to [`App::run`].
pub fn wire(app: &App) -> Result<(), JsValue> {
    let document = &app.inner.document;
    let layout = &app.inner.layout;

    if let Some(hamburger) = app.element(layout.hamburger) {
        let app = app.clone();
        on_click(&hamburger, move |_| app.run(Command::ToggleMenu))?;
    }

    for link in query_all::<Element>(document, layout.nav_link)? {
        let app = app.clone();
        on_click(&link, move |_| app.run(Command::NavLinkClicked))?;
    }

    for anchor in query_all::<Element>(document, layout.anchor_link)? {
        let app = app.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();
        on_click(&anchor, move |event| {
            event.prevent_default();
            let id = href.trim_start_matches('#');
            if !id.is_empty() {
                app.run(Command::ScrollTo(id.to_owned()));
            }
        })?;
    }

    for button in &app.inner.filter_buttons {
        let app = app.clone();
        let filter = button.get_attribute(layout.filter_attr).unwrap_or_default();
        on_click(button, move |_| app.run(Command::Filter(filter.clone())))?;
    }

    for button in query_all::<HtmlButtonElement>(document, layout.play_button)? {
        let name = button.get_attribute(layout.play_attr).unwrap_or_default();
        let kind = match name.parse::<AnimationKind>() {
            Ok(kind) => kind,
            Err(err) => {
                tracing::warn!(%err, "play button ignored");
                continue;
            }
        };
        let app = app.clone();
        let target = button.clone();
        on_click(&button, move |_| {
            app.run_from(Command::Play(kind), Some(target.clone()))
        })?;
    }

    observe_cards(app)
}

/// Fades cards in as they scroll into view.
fn observe_cards(app: &App) -> Result<(), JsValue> {
    let layout = &app.inner.layout;
    let handler = {
        let app = app.clone();
        Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                if let Some(index) = app.card_index(&entry.target()) {
                    app.run(Command::CardIntersected(index));
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>)
    };

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(layout.observer_threshold));
    options.set_root_margin(layout.observer_root_margin);
    let observer =
        IntersectionObserver::new_with_options(handler.as_ref().unchecked_ref(), &options)?;
    for card in &app.inner.cards {
        observer.observe(card);
    }
    handler.forget();
    Ok(())
}

/// Asks MathJax, when the page loaded it, to typeset formulas.
pub fn typeset_math(window: &Window) {
    let mathjax = match js_sys::Reflect::get(window, &JsValue::from_str("MathJax")) {
        Ok(value) if value.is_object() => value,
        _ => return,
    };
    let typeset = js_sys::Reflect::get(&mathjax, &JsValue::from_str("typesetPromise"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
    if let Some(typeset) = typeset {
        if let Err(err) = typeset.call0(&mathjax) {
            tracing::warn!(error = ?err, "MathJax typeset failed");
        }
    }
}
