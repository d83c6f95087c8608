use super::records::*;
use super::Repository;
use crate::error::{LcarsError, LcarsResult};
use crate::traits::TaskSource;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_USER: &str = "default_user";
pub const DEFAULT_CITY: &str = "New York";

/// All console resources for the single default user.
pub struct Console {
    tasks: Repository<Task>,
    events: Repository<CalendarEvent>,
    notifications: Repository<Notification>,
    conversations: Repository<Conversation>,
    analytics: Repository<AnalyticsSnapshot>,
    routes: Repository<TravelRoute>,
    settings: DashMap<String, Settings>,
    next_settings_id: AtomicU64,
}

fn require(field: &str, value: &str) -> LcarsResult<()> {
    if value.trim().is_empty() {
        return Err(LcarsError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

impl Console {
    /// Empty console with no records.
    pub fn new() -> Self {
        Self {
            tasks: Repository::new(),
            events: Repository::new(),
            notifications: Repository::new(),
            conversations: Repository::new(),
            analytics: Repository::new(),
            routes: Repository::new(),
            settings: DashMap::new(),
            next_settings_id: AtomicU64::new(1),
        }
    }

    /// Console with the startup data: two tasks, default settings, one analytics
    /// snapshot and a welcome notification.
    pub fn seeded() -> Self {
        let console = Self::new();
        let now = Utc::now();
        let seeds = [
            (
                "Complete LCARS Console Setup",
                "Finish restructuring the LCARS AI Console",
                2,
            ),
            (
                "Test All Features",
                "Verify voice, weather, travel, and all interactions",
                1,
            ),
        ];
        for (title, description, days) in seeds {
            let seeded = console.create_task(NewTask {
                title: title.to_string(),
                description: description.to_string(),
                priority: Priority::High,
                status: TaskStatus::Active,
                due_date: now + Duration::days(days),
            });
            if let Err(e) = seeded {
                tracing::warn!(target: "lcars::store", error = %e, title, "seed task rejected");
            }
        }
        console.update_settings(SettingsPatch::default());
        console.create_analytics(now, 75);
        let welcome = console.create_notification(NewNotification {
            title: "Welcome to LCARS Console".to_string(),
            message: "All systems online. Ready for mission objectives.".to_string(),
            kind: NotificationType::Success,
        });
        if let Err(e) = welcome {
            tracing::warn!(target: "lcars::store", error = %e, "seed notification rejected");
        }
        tracing::debug!(target: "lcars::store", "Console seeded with default data");
        console
    }

    // ---- tasks ----

    /// Tasks newest first.
    pub fn tasks(&self) -> Vec<Task> {
        let mut tasks = self.tasks.list();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        tasks
    }

    pub fn task(&self, id: u64) -> LcarsResult<Task> {
        self.tasks
            .get(id)
            .ok_or(LcarsError::NotFound { kind: "Task", id })
    }

    pub fn create_task(&self, new: NewTask) -> LcarsResult<Task> {
        require("title", &new.title)?;
        let task = self.tasks.insert_with(|id| Task {
            id,
            title: new.title.trim().to_string(),
            description: new.description,
            priority: new.priority,
            status: new.status,
            due_date: new.due_date,
            completed_at: None,
            created_at: Utc::now(),
        });
        tracing::debug!(target: "lcars::store", id = task.id, "task created");
        Ok(task)
    }

    pub fn complete_task(&self, id: u64) -> LcarsResult<Task> {
        self.tasks
            .update(id, |t| {
                t.status = TaskStatus::Completed;
                t.completed_at = Some(Utc::now());
            })
            .ok_or(LcarsError::NotFound { kind: "Task", id })
    }

    pub fn delete_task(&self, id: u64) -> bool {
        self.tasks.delete(id)
    }

    pub fn task_stats(&self) -> TaskStats {
        self.task_stats_at(Utc::now())
    }

    /// Task counters relative to `now`; "today" starts at UTC midnight.
    pub fn task_stats_at(&self, now: DateTime<Utc>) -> TaskStats {
        let tasks = self.tasks.list();
        let today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|d| d.and_utc())
            .unwrap_or(now);
        let active = tasks.iter().filter(|t| t.is_active()).count();
        let completed: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect();
        let completed_today = completed
            .iter()
            .filter(|t| t.completed_at.is_some_and(|at| at >= today))
            .count();
        let productivity_score = if tasks.is_empty() {
            0
        } else {
            ((completed.len() as f64 / tasks.len() as f64) * 100.0).round() as u32
        };
        TaskStats {
            active_tasks: active,
            completed_tasks: completed.len(),
            completed_today,
            productivity_score,
        }
    }

    // ---- calendar ----

    /// Events by start date, earliest first.
    pub fn events(&self) -> Vec<CalendarEvent> {
        let mut events = self.events.list();
        events.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        events
    }

    pub fn create_event(&self, new: NewCalendarEvent) -> LcarsResult<CalendarEvent> {
        require("title", &new.title)?;
        Ok(self.events.insert_with(|id| CalendarEvent {
            id,
            title: new.title.trim().to_string(),
            description: new.description,
            start_date: new.start_date,
            end_date: new.end_date,
            location: new.location,
            event_type: new.event_type,
            created_at: Utc::now(),
        }))
    }

    pub fn delete_event(&self, id: u64) -> bool {
        self.events.delete(id)
    }

    // ---- notifications ----

    pub fn notifications(&self) -> Vec<Notification> {
        let mut rows = self.notifications.list();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }

    pub fn create_notification(&self, new: NewNotification) -> LcarsResult<Notification> {
        require("title", &new.title)?;
        require("message", &new.message)?;
        Ok(self.notifications.insert_with(|id| Notification {
            id,
            title: new.title,
            message: new.message,
            kind: new.kind,
            read: false,
            created_at: Utc::now(),
        }))
    }

    pub fn mark_notification_read(&self, id: u64) -> LcarsResult<Notification> {
        self.notifications
            .update(id, |n| n.read = true)
            .ok_or(LcarsError::NotFound {
                kind: "Notification",
                id,
            })
    }

    pub fn mark_all_notifications_read(&self) {
        self.notifications.update_all(|n| n.read = true);
    }

    pub fn delete_notification(&self, id: u64) -> bool {
        self.notifications.delete(id)
    }

    // ---- settings ----

    /// Settings of the default user, created with defaults on first read.
    pub fn settings(&self) -> Settings {
        if let Some(s) = self.settings.get(DEFAULT_USER) {
            return s.clone();
        }
        self.update_settings(SettingsPatch::default())
    }

    /// Merges `patch` over the current settings (or the defaults).
    pub fn update_settings(&self, patch: SettingsPatch) -> Settings {
        let mut entry = self
            .settings
            .entry(DEFAULT_USER.to_string())
            .or_insert_with(|| Settings {
                id: self.next_settings_id.fetch_add(1, Ordering::SeqCst),
                user_id: DEFAULT_USER.to_string(),
                voice_recognition: true,
                text_to_speech: true,
                sound_effects: true,
                desktop_notifications: true,
                task_reminders: true,
                default_city: DEFAULT_CITY.to_string(),
                theme: "dark".to_string(),
                updated_at: Utc::now(),
            });
        let s = entry.value_mut();
        if let Some(v) = patch.voice_recognition {
            s.voice_recognition = v;
        }
        if let Some(v) = patch.text_to_speech {
            s.text_to_speech = v;
        }
        if let Some(v) = patch.sound_effects {
            s.sound_effects = v;
        }
        if let Some(v) = patch.desktop_notifications {
            s.desktop_notifications = v;
        }
        if let Some(v) = patch.task_reminders {
            s.task_reminders = v;
        }
        if let Some(v) = patch.default_city {
            s.default_city = v;
        }
        if let Some(v) = patch.theme {
            s.theme = v;
        }
        s.updated_at = Utc::now();
        s.clone()
    }

    // ---- conversations ----

    /// Conversation log, newest first.
    pub fn conversations(&self) -> Vec<Conversation> {
        let mut rows = self.conversations.list();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }

    pub fn record_conversation(&self, new: NewConversation) -> Conversation {
        self.conversations.insert_with(|id| Conversation {
            id,
            message: new.message,
            response: new.response,
            sentiment: new.sentiment,
            sentiment_score: new.sentiment_score,
            intent: new.intent,
            created_at: Utc::now(),
        })
    }

    // ---- analytics ----

    pub fn create_analytics(&self, date: DateTime<Utc>, productivity_score: u32) -> AnalyticsSnapshot {
        self.analytics.insert_with(|id| AnalyticsSnapshot {
            id,
            date,
            tasks_completed: 0,
            productivity_score,
            ai_interactions: 0,
            commands_executed: 0,
        })
    }

    /// Most recent snapshot by date.
    pub fn latest_analytics(&self) -> Option<AnalyticsSnapshot> {
        self.analytics
            .list()
            .into_iter()
            .max_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)))
    }

    /// Counts one executed assistant command on the latest snapshot.
    pub fn record_command(&self) {
        if let Some(latest) = self.latest_analytics() {
            self.analytics
                .update(latest.id, |a| a.commands_executed += 1);
        }
    }

    pub fn analytics_stats(&self) -> AnalyticsStats {
        let latest = self.latest_analytics();
        AnalyticsStats {
            tasks_completed: self
                .tasks
                .list()
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .count(),
            productivity_score: latest.as_ref().map_or(0, |a| a.productivity_score),
            ai_interactions: self.conversations.len(),
            commands_executed: latest.as_ref().map_or(0, |a| a.commands_executed),
        }
    }

    // ---- travel routes ----

    pub fn routes(&self) -> Vec<TravelRoute> {
        let mut rows = self.routes.list();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }

    pub fn save_route(&self, new: NewTravelRoute) -> LcarsResult<TravelRoute> {
        require("origin", &new.origin)?;
        require("destination", &new.destination)?;
        Ok(self.routes.insert_with(|id| TravelRoute {
            id,
            name: new.name,
            origin: new.origin,
            destination: new.destination,
            waypoints: new.waypoints,
            distance: new.distance,
            duration: new.duration,
            mode: new.mode,
            created_at: Utc::now(),
        }))
    }

    pub fn delete_route(&self, id: u64) -> bool {
        self.routes.delete(id)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskSource for Console {
    async fn list(&self) -> LcarsResult<Vec<Task>> {
        Ok(self.tasks())
    }

    async fn create(&self, task: NewTask) -> LcarsResult<Task> {
        self.create_task(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status: TaskStatus::Active,
            due_date: Utc::now(),
        }
    }

    #[test]
    fn seeded_console_has_defaults() {
        let console = Console::seeded();
        let tasks = console.tasks();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.priority == Priority::High && t.is_active()));
        assert_eq!(console.settings().default_city, "New York");
        assert_eq!(console.latest_analytics().map(|a| a.productivity_score), Some(75));
        let notes = console.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationType::Success);
    }

    #[test]
    fn tasks_are_newest_first() {
        let console = Console::new();
        console.create_task(new_task("first")).unwrap();
        console.create_task(new_task("second")).unwrap();
        let titles: Vec<String> = console.tasks().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[test]
    fn empty_title_is_rejected() {
        let console = Console::new();
        assert!(matches!(
            console.create_task(new_task("   ")),
            Err(LcarsError::Validation(_))
        ));
    }

    #[test]
    fn complete_and_stats() {
        let console = Console::new();
        assert_eq!(console.task_stats().productivity_score, 0);
        let a = console.create_task(new_task("a")).unwrap();
        console.create_task(new_task("b")).unwrap();
        console.create_task(new_task("c")).unwrap();
        let done = console.complete_task(a.id).unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());

        let stats = console.task_stats();
        assert_eq!(stats.active_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.productivity_score, 33);

        let tomorrow = Utc::now() + Duration::days(1);
        assert_eq!(console.task_stats_at(tomorrow).completed_today, 0);
    }

    #[test]
    fn complete_missing_task_is_not_found() {
        let console = Console::new();
        assert!(matches!(
            console.complete_task(42),
            Err(LcarsError::NotFound { kind: "Task", id: 42 })
        ));
    }

    #[test]
    fn settings_merge_keeps_unset_fields() {
        let console = Console::new();
        let first = console.settings();
        let updated = console.update_settings(SettingsPatch {
            default_city: Some("San Francisco".to_string()),
            sound_effects: Some(false),
            ..Default::default()
        });
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.default_city, "San Francisco");
        assert!(!updated.sound_effects);
        assert!(updated.voice_recognition);
        assert_eq!(updated.theme, "dark");
    }

    #[test]
    fn events_sorted_by_start() {
        let console = Console::new();
        let now = Utc::now();
        for (title, offset) in [("later", 5), ("soon", 1)] {
            console
                .create_event(NewCalendarEvent {
                    title: title.to_string(),
                    description: String::new(),
                    start_date: now + Duration::hours(offset),
                    end_date: None,
                    location: String::new(),
                    event_type: EventType::Meeting,
                })
                .unwrap();
        }
        let titles: Vec<String> = console.events().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["soon", "later"]);
    }

    #[test]
    fn notifications_mark_read() {
        let console = Console::seeded();
        let n = console
            .create_notification(NewNotification {
                title: "Red alert".to_string(),
                message: "Shields up".to_string(),
                kind: NotificationType::Danger,
            })
            .unwrap();
        assert!(console.mark_notification_read(n.id).unwrap().read);
        assert!(console.notifications().iter().any(|n| !n.read));
        console.mark_all_notifications_read();
        assert!(console.notifications().iter().all(|n| n.read));
        assert!(console.delete_notification(n.id));
        assert!(!console.delete_notification(n.id));
    }

    #[test]
    fn analytics_counts_commands_and_conversations() {
        let console = Console::seeded();
        console.record_command();
        console.record_command();
        console.record_conversation(NewConversation {
            message: "hi".to_string(),
            response: "hello".to_string(),
            sentiment: "neutral".to_string(),
            sentiment_score: 0,
            intent: "greeting".to_string(),
        });
        let stats = console.analytics_stats();
        assert_eq!(stats.commands_executed, 2);
        assert_eq!(stats.ai_interactions, 1);
        assert_eq!(stats.productivity_score, 75);
        assert_eq!(stats.tasks_completed, 0);
    }

    #[tokio::test]
    async fn console_is_a_task_source() {
        let console = Console::new();
        let created = TaskSource::create(&console, new_task("via trait")).await.unwrap();
        let listed = TaskSource::list(&console).await.unwrap();
        assert_eq!(listed[0].id, created.id);
    }
}
