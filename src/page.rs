//! Page chrome as plain state: menu, filters, card visibility.
//!
//! DOM events are turned into [`Command`]s and fed through
//! [`Page::dispatch`], which updates the state and returns the [`Effect`]s
//! the browser layer has to apply. Nothing here touches the DOM.

use crate::kind::AnimationKind;

/// Filter value that shows every card.
pub const FILTER_ALL: &str = "all";

/// Selectors, class names and attributes the page markup uses.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub hamburger: &'static str,
    pub nav_menu: &'static str,
    pub nav_link: &'static str,
    pub anchor_link: &'static str,
    pub filter_button: &'static str,
    pub card: &'static str,
    pub play_button: &'static str,
    pub active_class: &'static str,
    pub fade_in_class: &'static str,
    pub filter_attr: &'static str,
    pub topic_attr: &'static str,
    pub play_attr: &'static str,
    pub observer_threshold: f64,
    pub observer_root_margin: &'static str,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            hamburger: ".hamburger",
            nav_menu: ".nav-menu",
            nav_link: ".nav-link",
            anchor_link: "a[href^=\"#\"]",
            filter_button: ".filter-btn",
            card: ".animation-card",
            play_button: "[data-play]",
            active_class: "active",
            fade_in_class: "fade-in",
            filter_attr: "data-filter",
            topic_attr: "data-topic",
            play_attr: "data-play",
            observer_threshold: 0.1,
            observer_root_margin: "0px 0px -50px 0px",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleMenu,
    /// Any navigation link was followed; the mobile menu closes.
    NavLinkClicked,
    /// Smooth-scroll to the element with this id.
    ScrollTo(String),
    /// A filter button was pressed; `"all"` or a card topic.
    Filter(String),
    /// Card at this index scrolled into view.
    CardIntersected(usize),
    Play(AnimationKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetMenuOpen(bool),
    ScrollIntoView(String),
    /// Highlight the filter button with this value, un-highlight the rest.
    SetActiveFilter(String),
    ShowCard(usize),
    HideCard(usize),
    FadeIn(usize),
    Play(AnimationKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub topic: String,
    pub visible: bool,
    pub faded_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    menu_open: bool,
    active_filter: String,
    cards: Vec<Card>,
}

impl Page {
    /// A page whose cards carry these topics, in document order.
    pub fn new<T: Into<String>>(topics: impl IntoIterator<Item = T>) -> Self {
        Self {
            menu_open: false,
            active_filter: FILTER_ALL.to_owned(),
            cards: topics
                .into_iter()
                .map(|topic| Card {
                    topic: topic.into(),
                    visible: true,
                    faded_in: false,
                })
                .collect(),
        }
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn active_filter(&self) -> &str {
        &self.active_filter
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        tracing::trace!(?command, "dispatch");
        match command {
            Command::ToggleMenu => {
                self.menu_open = !self.menu_open;
                vec![Effect::SetMenuOpen(self.menu_open)]
            }
            Command::NavLinkClicked => {
                self.menu_open = false;
                vec![Effect::SetMenuOpen(false)]
            }
            Command::ScrollTo(id) => vec![Effect::ScrollIntoView(id)],
            Command::Filter(filter) => self.filter(filter),
            Command::CardIntersected(index) => match self.cards.get_mut(index) {
                Some(card) => {
                    card.faded_in = true;
                    vec![Effect::FadeIn(index)]
                }
                None => Vec::new(),
            },
            Command::Play(kind) => vec![Effect::Play(kind)],
        }
    }

    fn filter(&mut self, filter: String) -> Vec<Effect> {
        let mut effects = vec![Effect::SetActiveFilter(filter.clone())];
        for (index, card) in self.cards.iter_mut().enumerate() {
            if filter == FILTER_ALL || card.topic == filter {
                card.visible = true;
                card.faded_in = true;
                effects.push(Effect::ShowCard(index));
                effects.push(Effect::FadeIn(index));
            } else {
                card.visible = false;
                effects.push(Effect::HideCard(index));
            }
        }
        tracing::debug!(%filter, shown = self.cards.iter().filter(|c| c.visible).count(), "filter applied");
        self.active_filter = filter;
        effects
    }
}
