//! Scrape options

/// Caller-facing options for a meeting or season scrape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Session names to keep (e.g., "Race", "Practice 1"); `None` keeps every session
    pub session_types: Option<Vec<String>>,
    /// Fetch lap timing
    pub include_laps: bool,
    /// Fetch tyre stints
    pub include_stints: bool,
    /// Fetch pit stops
    pub include_pits: bool,
    /// Fetch race control messages
    pub include_race_control: bool,
}

impl ScrapeOptions {
    /// Every session, no extras
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the scrape to sessions with these names
    ///
    /// Names are compared exactly against the upstream `session_name` ("Practice 1",
    /// "Qualifying", "Sprint", "Race"), never against `session_type`. A type such as
    /// "Practice" matches nothing, and "Race" does not select the sprint even though
    /// OpenF1 reports the sprint with type "Race".
    pub fn with_session_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.session_types = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Toggle lap timing
    pub fn with_laps(mut self, include: bool) -> Self {
        self.include_laps = include;
        self
    }

    /// Toggle tyre stints
    pub fn with_stints(mut self, include: bool) -> Self {
        self.include_stints = include;
        self
    }

    /// Toggle pit stops
    pub fn with_pits(mut self, include: bool) -> Self {
        self.include_pits = include;
        self
    }

    /// Toggle race control messages
    pub fn with_race_control(mut self, include: bool) -> Self {
        self.include_race_control = include;
        self
    }

    /// Enable every optional sub-resource
    pub fn all_extras(self) -> Self {
        self.with_laps(true)
            .with_stints(true)
            .with_pits(true)
            .with_race_control(true)
    }

    /// Whether a session passes the name filter
    pub fn accepts_session(&self, session_name: &str) -> bool {
        match &self.session_types {
            Some(names) => names.iter().any(|name| name == session_name),
            None => true,
        }
    }

    /// Per-session fetch flags; the starting grid is decided by the session type
    pub fn session_fetch_options(&self, include_starting_grid: bool) -> SessionFetchOptions {
        SessionFetchOptions {
            include_laps: self.include_laps,
            include_stints: self.include_stints,
            include_pits: self.include_pits,
            include_race_control: self.include_race_control,
            include_starting_grid,
        }
    }
}

/// Optional sub-resources to fetch for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFetchOptions {
    /// Fetch lap timing
    pub include_laps: bool,
    /// Fetch tyre stints
    pub include_stints: bool,
    /// Fetch pit stops
    pub include_pits: bool,
    /// Fetch race control messages
    pub include_race_control: bool,
    /// Fetch the starting grid
    pub include_starting_grid: bool,
}
