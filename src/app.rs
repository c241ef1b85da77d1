use crate::api::Lookup;
use crate::error::FetchError;
use crate::image::SelectedImage;
use crate::model::RecipeResult;
use std::time::{Duration, Instant};

pub const INPUT_REQUIRED: &str = "Please enter a dish name or select an image.";

/// Which screen is showing. Landing only ever moves to Form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Form,
}

/// Which part of the form receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    DishName,
    ImagePath,
    Results,
}

impl Focus {
    pub fn next(self, has_results: bool) -> Self {
        match self {
            Self::DishName => Self::ImagePath,
            Self::ImagePath if has_results => Self::Results,
            Self::ImagePath | Self::Results => Self::DishName,
        }
    }

    pub fn prev(self, has_results: bool) -> Self {
        match self {
            Self::DishName if has_results => Self::Results,
            Self::DishName | Self::Results => Self::ImagePath,
            Self::ImagePath => Self::DishName,
        }
    }
}

/// A request the event loop should run in the background.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub generation: u64,
    pub lookup: Lookup,
}

/// Delivered back to the event loop once a request settles.
#[derive(Debug)]
pub struct DispatchCompletion {
    pub generation: u64,
    pub outcome: Result<RecipeResult, FetchError>,
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,
    pub service_url: String,

    // Form
    pub dish_name: String,
    pub image_path: String,
    pub selected_image: Option<SelectedImage>,
    pub focus: Focus,

    // Last dispatch outcome; at most one of these is set
    pub result: Option<RecipeResult>,
    pub error: Option<String>,
    pub result_scroll: u16,
    /// Set once the delay after a successful lookup has elapsed.
    pub results_revealed: bool,

    /// Modal input-required notice; dismissed by any key.
    pub prompt: Option<String>,

    pub status_msg: String,

    reveal_delay: Duration,
    reveal_at: Option<Instant>,
    next_generation: u64,
    pending: Option<u64>,
}

impl App {
    pub fn new(service_url: impl Into<String>, reveal_delay: Duration) -> Self {
        Self {
            should_quit: false,
            view: View::Landing,
            show_help: false,
            service_url: service_url.into(),

            dish_name: String::new(),
            image_path: String::new(),
            selected_image: None,
            focus: Focus::DishName,

            result: None,
            error: None,
            result_scroll: 0,
            results_revealed: false,

            prompt: None,

            status_msg: String::new(),

            reveal_delay,
            reveal_at: None,
            next_generation: 0,
            pending: None,
        }
    }

    pub fn landing_visible(&self) -> bool {
        self.view == View::Landing
    }

    /// Leave the landing splash. There is no way back.
    pub fn enter_form(&mut self) {
        if self.view == View::Landing {
            self.view = View::Form;
            self.focus = Focus::DishName;
            self.status_msg = "Type a dish name or attach a photo".to_string();
        }
    }

    /// What a dispatch would send. An image wins over the dish name; a
    /// blank name counts as absent.
    pub fn request_input(&self) -> Option<Lookup> {
        if let Some(image) = &self.selected_image {
            Some(Lookup::Image(image.clone()))
        } else if !self.dish_name.trim().is_empty() {
            Some(Lookup::DishName(self.dish_name.clone()))
        } else {
            None
        }
    }

    /// Start a dispatch: clear the previous outcome, then either hand back
    /// the one request to run or raise the input-required prompt.
    pub fn begin_dispatch(&mut self) -> Option<DispatchRequest> {
        self.error = None;
        self.result = None;
        self.reveal_at = None;
        self.result_scroll = 0;
        self.results_revealed = false;
        if self.focus == Focus::Results {
            self.focus = Focus::DishName;
        }

        let Some(lookup) = self.request_input() else {
            self.prompt = Some(INPUT_REQUIRED.to_string());
            return None;
        };

        self.next_generation += 1;
        let generation = self.next_generation;
        if let Some(stale) = self.pending.replace(generation) {
            tracing::debug!("Dispatch {} supersedes in-flight dispatch {}", generation, stale);
        }
        self.status_msg = match &lookup {
            Lookup::Image(image) => format!("Identifying {}...", image.file_name),
            Lookup::DishName(name) => format!("Looking up \"{}\"...", name),
        };
        Some(DispatchRequest { generation, lookup })
    }

    /// Apply a settled request. Only the most recent dispatch is applied.
    pub fn finish_dispatch(&mut self, completion: DispatchCompletion, now: Instant) {
        if self.pending != Some(completion.generation) {
            tracing::debug!("Dropping stale completion {}", completion.generation);
            return;
        }
        self.pending = None;

        match completion.outcome {
            Ok(result) => {
                self.status_msg = format!(
                    "{} recipe(s) for \"{}\"",
                    result.recipes.len(),
                    result.label
                );
                self.result = Some(result);
                self.reveal_at = Some(now + self.reveal_delay);
            }
            Err(e) => {
                tracing::warn!("Dispatch {} failed: {}", completion.generation, e);
                self.error = Some(e.user_message());
                self.status_msg.clear();
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Called every loop iteration; reveals the results once the delay has
    /// passed. Keyboard focus stays where the user left it.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.reveal_at {
            if now >= at {
                self.reveal_at = None;
                if self.result.is_some() {
                    self.results_revealed = true;
                    self.result_scroll = 0;
                }
            }
        }
    }

    /// Load the file named in the image field.
    pub fn attach_image(&mut self) {
        match SelectedImage::load(&self.image_path) {
            Ok(image) => {
                self.status_msg = format!("Attached {} ({})", image.file_name, image.size_label());
                self.selected_image = Some(image);
            }
            Err(e) => {
                tracing::warn!("Could not attach image: {}", e);
                self.status_msg = e.to_string();
            }
        }
    }

    pub fn detach_image(&mut self) {
        if self.selected_image.take().is_some() {
            self.status_msg = "Image removed".to_string();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next(self.result.is_some());
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev(self.result.is_some());
    }

    /// The text field under focus, if any.
    pub fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::DishName => Some(&mut self.dish_name),
            Focus::ImagePath => Some(&mut self.image_path),
            Focus::Results => None,
        }
    }

    pub fn scroll_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(20);
    }

    pub fn scroll_page_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(20);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_detail;
    use proptest::prelude::*;

    fn form_app() -> App {
        let mut app = App::new("http://127.0.0.1:8000", Duration::from_millis(300));
        app.enter_form();
        app
    }

    fn sample_result(label: &str) -> RecipeResult {
        RecipeResult {
            label: label.to_string(),
            recipes: vec![("Palak Paneer".to_string(), sample_detail("Indian"))],
        }
    }

    fn jpeg() -> SelectedImage {
        SelectedImage::new("idli.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn test_starts_on_landing_and_leaves_once() {
        let mut app = App::new("http://x", Duration::ZERO);
        assert!(app.landing_visible());
        app.enter_form();
        assert_eq!(app.view, View::Form);
        app.enter_form();
        assert_eq!(app.view, View::Form);
        assert!(!app.landing_visible());
    }

    #[test]
    fn test_blank_dispatch_prompts_without_request() {
        let mut app = form_app();
        app.dish_name = "   ".to_string();

        assert!(app.begin_dispatch().is_none());
        assert_eq!(app.prompt.as_deref(), Some(INPUT_REQUIRED));
        assert!(app.error.is_none());
        assert!(app.result.is_none());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_text_dispatch_sends_literal_name() {
        let mut app = form_app();
        app.dish_name = " masala karela ".to_string();

        let request = app.begin_dispatch().unwrap();
        assert_eq!(request.lookup, Lookup::DishName(" masala karela ".to_string()));
        assert!(app.is_loading());
        assert!(app.prompt.is_none());
    }

    #[test]
    fn test_image_takes_precedence_over_name() {
        let mut app = form_app();
        app.dish_name = "masala karela".to_string();
        app.selected_image = Some(jpeg());

        let request = app.begin_dispatch().unwrap();
        assert_eq!(request.lookup, Lookup::Image(jpeg()));
    }

    #[test]
    fn test_dispatch_clears_previous_outcome() {
        let mut app = form_app();
        app.dish_name = "idli".to_string();
        app.error = Some("no match found".to_string());
        app.result = Some(sample_result("dosa"));

        let request = app.begin_dispatch();
        assert!(request.is_some());
        assert!(app.error.is_none());
        assert!(app.result.is_none());
    }

    #[test]
    fn test_success_sets_result_and_reveals_after_delay() {
        let mut app = form_app();
        app.dish_name = "masala karela".to_string();
        let request = app.begin_dispatch().unwrap();

        let now = Instant::now();
        app.finish_dispatch(
            DispatchCompletion {
                generation: request.generation,
                outcome: Ok(sample_result("masala karela")),
            },
            now,
        );
        assert!(!app.is_loading());
        assert_eq!(app.result.as_ref().unwrap().label, "masala karela");
        assert!(app.error.is_none());

        app.result_scroll = 7;
        app.tick(now + Duration::from_millis(100));
        assert!(!app.results_revealed);
        assert_eq!(app.result_scroll, 7);

        app.tick(now + Duration::from_millis(300));
        assert!(app.results_revealed);
        assert_eq!(app.result_scroll, 0);
        assert_eq!(app.focus, Focus::DishName);
    }

    #[test]
    fn test_failure_sets_error_only() {
        let mut app = form_app();
        app.dish_name = "pizza".to_string();
        let request = app.begin_dispatch().unwrap();

        app.finish_dispatch(
            DispatchCompletion {
                generation: request.generation,
                outcome: Err(FetchError::Server {
                    status: 404,
                    message: "no match found".to_string(),
                }),
            },
            Instant::now(),
        );
        assert_eq!(app.error.as_deref(), Some("no match found"));
        assert!(app.result.is_none());

        app.tick(Instant::now() + Duration::from_secs(1));
        assert!(!app.results_revealed);
        assert_eq!(app.focus, Focus::DishName);
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut app = form_app();
        app.dish_name = "dosa".to_string();
        let first = app.begin_dispatch().unwrap();
        app.dish_name = "idli".to_string();
        let second = app.begin_dispatch().unwrap();

        app.finish_dispatch(
            DispatchCompletion {
                generation: first.generation,
                outcome: Ok(sample_result("dosa")),
            },
            Instant::now(),
        );
        assert!(app.result.is_none());
        assert!(app.is_loading());

        app.finish_dispatch(
            DispatchCompletion {
                generation: second.generation,
                outcome: Ok(sample_result("idli")),
            },
            Instant::now(),
        );
        assert_eq!(app.result.as_ref().unwrap().label, "idli");
        assert!(!app.is_loading());
    }

    #[test]
    fn test_focus_cycle_skips_results_when_absent() {
        let mut app = form_app();
        app.focus_next();
        assert_eq!(app.focus, Focus::ImagePath);
        app.focus_next();
        assert_eq!(app.focus, Focus::DishName);
        app.focus_prev();
        assert_eq!(app.focus, Focus::ImagePath);

        app.result = Some(sample_result("idli"));
        app.focus_next();
        assert_eq!(app.focus, Focus::Results);
        app.focus_next();
        assert_eq!(app.focus, Focus::DishName);
        app.focus_prev();
        assert_eq!(app.focus, Focus::Results);
    }

    #[test]
    fn test_detach_image_falls_back_to_name() {
        let mut app = form_app();
        app.dish_name = "idli".to_string();
        app.selected_image = Some(jpeg());
        app.detach_image();
        assert_eq!(app.request_input(), Some(Lookup::DishName("idli".to_string())));
    }

    #[test]
    fn test_attach_missing_file_reports_on_status_line() {
        let mut app = form_app();
        app.image_path = "/definitely/not/here.jpg".to_string();
        app.attach_image();
        assert!(app.selected_image.is_none());
        assert!(app.status_msg.contains("/definitely/not/here.jpg"));
        assert!(app.error.is_none());
    }

    proptest! {
        #[test]
        fn prop_whitespace_names_never_dispatch(name in "[ \t\n]*") {
            let mut app = form_app();
            app.dish_name = name;
            prop_assert!(app.begin_dispatch().is_none());
            prop_assert!(app.prompt.is_some());
            prop_assert!(!app.is_loading());
        }

        #[test]
        fn prop_non_blank_names_dispatch_verbatim(name in "[ ]{0,3}[a-z]{1,12}[ ]{0,3}") {
            let mut app = form_app();
            app.dish_name = name.clone();
            let request = app.begin_dispatch();
            prop_assert_eq!(request.map(|r| r.lookup), Some(Lookup::DishName(name)));
        }

        #[test]
        fn prop_image_ignores_name(name in ".*") {
            let mut app = form_app();
            app.dish_name = name;
            app.selected_image = Some(jpeg());
            let request = app.begin_dispatch();
            prop_assert_eq!(request.map(|r| r.lookup), Some(Lookup::Image(jpeg())));
        }
    }
}
