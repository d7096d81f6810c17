use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use semcal_core::{
    CategorySelection, Controller, FeedFailure, FeedLoader, FeedSource, Layout, Normalizer,
    SemcalConfig, ViewMode,
};
use tokio::sync::Mutex;
use tracing::info;

/// Controllers for both layouts and the outcome of the last load.
pub struct Session {
    pub grid: Controller,
    pub semester: Option<Controller>,
    pub failures: Vec<FeedFailure>,
}

impl Session {
    pub fn controller(&self, layout: Layout) -> Option<&Controller> {
        match layout {
            Layout::Grid => Some(&self.grid),
            Layout::List => self.semester.as_ref(),
        }
    }

    /// The controller for `layout` along with the current failures.
    pub fn controller_mut(&mut self, layout: Layout) -> Option<(&mut Controller, &[FeedFailure])> {
        let controller = match layout {
            Layout::Grid => &mut self.grid,
            Layout::List => self.semester.as_mut()?,
        };
        Some((controller, &self.failures))
    }
}

struct Feeds {
    grid_loader: FeedLoader,
    grid_sources: Vec<FeedSource>,
    semester: Option<(FeedLoader, FeedSource)>,
}

impl Feeds {
    /// Grid feeds and the semester feed are fetched at the same time.
    async fn load(&self) -> Loaded {
        let semester = async {
            match &self.semester {
                Some((loader, source)) => Some(loader.load(std::slice::from_ref(source)).await),
                None => None,
            }
        };
        let (grid, semester) = tokio::join!(self.grid_loader.load(&self.grid_sources), semester);

        let mut failures = grid.failures;
        let semester = semester.map(|load| {
            failures.extend(load.failures);
            load.events
        });

        Loaded {
            grid: grid.events,
            semester,
            failures,
        }
    }
}

struct Loaded {
    grid: Vec<semcal_core::Event>,
    semester: Option<Vec<semcal_core::Event>>,
    failures: Vec<FeedFailure>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub calendar_name: Arc<str>,
    pub colors: Arc<BTreeMap<String, String>>,
    feeds: Arc<Feeds>,
}

impl AppState {
    /// Load all feeds and set up the controllers at `now`.
    pub async fn load(config: &SemcalConfig, now: chrono::NaiveDateTime) -> Result<Self> {
        let timezone = config.timezone()?;
        let timeout = config.fetch_timeout()?;

        let feeds = Feeds {
            grid_loader: FeedLoader::new(Normalizer::grid(timezone), timeout)?,
            grid_sources: config.grid_sources(),
            semester: match config.semester_source() {
                Some(source) => Some((
                    FeedLoader::new(
                        Normalizer::list(timezone, config.semester_categories()),
                        timeout,
                    )?,
                    source,
                )),
                None => None,
            },
        };

        let loaded = feeds.load().await;
        let rule = config.category_rule();

        let grid = Controller::new(
            ViewMode::Week,
            loaded.grid,
            CategorySelection::all(&config.category_names()),
            now,
            rule,
        );
        let semester = loaded.semester.map(|events| {
            Controller::new(
                ViewMode::Semester,
                events,
                CategorySelection::all(config.semester_categories()),
                now,
                rule,
            )
        });

        let colors = config
            .feeds
            .iter()
            .filter_map(|f| Some((f.category.clone(), f.color.clone()?)))
            .collect();

        Ok(AppState {
            session: Arc::new(Mutex::new(Session {
                grid,
                semester,
                failures: loaded.failures,
            })),
            calendar_name: config.calendar_name.as_str().into(),
            colors: Arc::new(colors),
            feeds: Arc::new(feeds),
        })
    }

    /// Refetch every feed and swap the new events in. View parameters and
    /// the category selection are kept.
    pub async fn reload(&self) -> Vec<FeedFailure> {
        let loaded = self.feeds.load().await;

        let mut session = self.session.lock().await;
        session.grid.replace_events(loaded.grid);
        if let (Some(controller), Some(events)) = (session.semester.as_mut(), loaded.semester) {
            controller.replace_events(events);
        }
        session.failures = loaded.failures.clone();

        info!(failed = loaded.failures.len(), "reloaded feeds");
        loaded.failures
    }
}
