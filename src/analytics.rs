//! Conversion and engagement tracking.
//!
//! Events fan out to two optional sinks. The tag manager gets the event data
//! merged with engagement defaults, the pixel gets the data as given. With
//! neither configured every call is a no-op apart from a debug event.
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub type EventData = Map<String, Value>;

/// Receives named analytics events.
pub trait EventSink: Send + Sync {
    fn send(&self, event: &str, data: &EventData);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    pub location: String,
    pub lead_source: String,
    pub event_category: String,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            location: "Houston, TX".to_string(),
            lead_source: "website".to_string(),
            event_category: "engagement".to_string(),
        }
    }
}

#[derive(Clone, Default)]
pub struct Tracker {
    settings: TrackingSettings,
    tag_manager: Option<Arc<dyn EventSink>>,
    pixel: Option<Arc<dyn EventSink>>,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("settings", &self.settings)
            .field("tag_manager", &self.tag_manager.is_some())
            .field("pixel", &self.pixel.is_some())
            .finish()
    }
}

impl Tracker {
    pub fn new(settings: TrackingSettings) -> Self {
        Self {
            settings,
            tag_manager: None,
            pixel: None,
        }
    }

    pub fn with_tag_manager(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.tag_manager = Some(sink);
        self
    }

    pub fn with_pixel(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.pixel = Some(sink);
        self
    }

    pub fn settings(&self) -> &TrackingSettings {
        &self.settings
    }

    pub fn track(&self, event: &str, data: EventData) {
        debug!(
            event_name = event,
            tag_manager = self.tag_manager.is_some(),
            pixel = self.pixel.is_some(),
            "analytics_event"
        );

        if let Some(tag_manager) = &self.tag_manager {
            let label = data
                .get("form_type")
                .and_then(Value::as_str)
                .unwrap_or("general")
                .to_string();
            let mut merged = EventData::new();
            merged.insert(
                "event_category".into(),
                Value::from(self.settings.event_category.as_str()),
            );
            merged.insert("event_label".into(), Value::from(label));
            merged.insert(
                "location".into(),
                Value::from(self.settings.location.as_str()),
            );
            merged.extend(data.clone());
            tag_manager.send(event, &merged);
        }

        if let Some(pixel) = &self.pixel {
            pixel.send(event, &data);
        }
    }

    /// Emits `{form_type}_form_submitted`.
    pub fn track_conversion(&self, form_type: &str) {
        let mut data = EventData::new();
        data.insert("form_type".into(), Value::from(form_type));
        data.insert(
            "lead_source".into(),
            Value::from(self.settings.lead_source.as_str()),
        );
        data.insert(
            "location".into(),
            Value::from(self.settings.location.as_str()),
        );
        self.track(&format!("{form_type}_form_submitted"), data);
    }

    pub fn track_page_view(&self, page_title: &str, page_location: &str) {
        let mut data = EventData::new();
        data.insert("page_title".into(), Value::from(page_title));
        data.insert("page_location".into(), Value::from(page_location));
        data.insert(
            "location".into(),
            Value::from(self.settings.location.as_str()),
        );
        self.track("page_view", data);
    }

    /// Emits `call_button_clicked`.
    pub fn track_call_click(&self, phone_number: &str) {
        let mut data = EventData::new();
        data.insert("interaction_type".into(), Value::from("call"));
        data.insert(
            "location".into(),
            Value::from(self.settings.location.as_str()),
        );
        data.insert("phone_number".into(), Value::from(phone_number));
        self.track("call_button_clicked", data);
    }

    /// Feeds a scroll position to `depth` and emits `scroll` on a new milestone.
    pub fn track_scroll(
        &self,
        depth: &mut ScrollDepth,
        scroll_top: f64,
        document_height: f64,
        viewport_height: f64,
    ) -> Option<u32> {
        let milestone = depth.observe(scroll_top, document_height, viewport_height)?;
        let mut data = EventData::new();
        data.insert("scroll_depth".into(), Value::from(milestone));
        self.track("scroll", data);
        Some(milestone)
    }
}

/// Highest scroll milestone reached on a page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollDepth {
    max_percent: u32,
}

impl ScrollDepth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_percent(&self) -> u32 {
        self.max_percent
    }

    /// Returns the percentage when it is a multiple of 25 above the last
    /// milestone. Positions between milestones are not recorded.
    pub fn observe(&mut self, scroll_top: f64, document_height: f64, viewport_height: f64) -> Option<u32> {
        let scrollable = document_height - viewport_height;
        if scrollable <= 0.0 || !scroll_top.is_finite() {
            return None;
        }
        let percent = (scroll_top / scrollable * 100.0).round().clamp(0.0, 100.0) as u32;
        if percent <= self.max_percent || percent % 25 != 0 {
            return None;
        }
        self.max_percent = percent;
        Some(percent)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<(String, EventData)>>,
    }

    impl EventSink for RecordingSink {
        fn send(&self, event: &str, data: &EventData) {
            self.events
                .lock()
                .unwrap()
                .push((event.to_string(), data.clone()));
        }
    }

    #[test]
    fn conversion_reaches_both_sinks() {
        let tag = Arc::new(RecordingSink::default());
        let pixel = Arc::new(RecordingSink::default());
        let tracker = Tracker::default()
            .with_tag_manager(tag.clone())
            .with_pixel(pixel.clone());

        tracker.track_conversion("hero");

        let tag_events = tag.events.lock().unwrap();
        let (name, data) = &tag_events[0];
        assert_eq!(name, "hero_form_submitted");
        assert_eq!(data["event_category"], "engagement");
        assert_eq!(data["event_label"], "hero");
        assert_eq!(data["location"], "Houston, TX");
        assert_eq!(data["lead_source"], "website");

        let pixel_events = pixel.events.lock().unwrap();
        let (_, raw) = &pixel_events[0];
        assert!(raw.get("event_category").is_none());
        assert_eq!(raw["form_type"], "hero");
    }

    #[test]
    fn call_click_carries_interaction_and_location() {
        let tag = Arc::new(RecordingSink::default());
        let pixel = Arc::new(RecordingSink::default());
        let tracker = Tracker::default()
            .with_tag_manager(tag.clone())
            .with_pixel(pixel.clone());
        tracker.track_call_click("(832) 602-2021");

        let events = tag.events.lock().unwrap();
        assert_eq!(events[0].0, "call_button_clicked");
        assert_eq!(events[0].1["event_label"], "general");

        let raw = pixel.events.lock().unwrap();
        assert_eq!(raw[0].0, "call_button_clicked");
        assert_eq!(raw[0].1["interaction_type"], "call");
        assert_eq!(raw[0].1["location"], "Houston, TX");
        assert_eq!(raw[0].1["phone_number"], "(832) 602-2021");
    }

    #[test]
    fn page_view_reaches_pixel_with_location() {
        let pixel = Arc::new(RecordingSink::default());
        let tracker = Tracker::default().with_pixel(pixel.clone());
        tracker.track_page_view("Home", "https://example.com/");

        let events = pixel.events.lock().unwrap();
        assert_eq!(events[0].0, "page_view");
        assert_eq!(events[0].1["page_title"], "Home");
        assert_eq!(events[0].1["page_location"], "https://example.com/");
        assert_eq!(events[0].1["location"], "Houston, TX");
    }

    #[test]
    fn no_sinks_is_noop() {
        Tracker::default().track_page_view("Home", "https://example.com/");
    }

    #[test]
    fn scroll_milestones_fire_once_each() {
        let mut depth = ScrollDepth::new();
        assert_eq!(depth.observe(250.0, 2000.0, 1000.0), Some(25));
        assert_eq!(depth.observe(250.0, 2000.0, 1000.0), None);
        assert_eq!(depth.observe(500.0, 2000.0, 1000.0), Some(50));
        assert_eq!(depth.max_percent(), 50);
        assert_eq!(depth.observe(10.0, 800.0, 1000.0), None);
    }

    #[test]
    fn milestone_fires_after_scrolling_past_it() {
        let mut depth = ScrollDepth::new();
        assert_eq!(depth.observe(300.0, 2000.0, 1000.0), None);
        assert_eq!(depth.max_percent(), 0);
        assert_eq!(depth.observe(250.0, 2000.0, 1000.0), Some(25));
        assert_eq!(depth.max_percent(), 25);
    }

    #[test]
    fn tracker_emits_scroll_event() {
        let pixel = Arc::new(RecordingSink::default());
        let tracker = Tracker::default().with_pixel(pixel.clone());
        let mut depth = ScrollDepth::new();
        assert_eq!(tracker.track_scroll(&mut depth, 1000.0, 2000.0, 1000.0), Some(100));
        let events = pixel.events.lock().unwrap();
        assert_eq!(events[0].0, "scroll");
        assert_eq!(events[0].1["scroll_depth"], 100);
    }
}
