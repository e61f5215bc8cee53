use bevy::prelude::*;

use super::corridor::Corridor;
use super::records::HighScoreBook;
use super::settings::SimSettings;
use super::vehicle::VehiclePose;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Menu,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DayNight {
    #[default]
    Day,
    Night,
}

impl DayNight {
    pub fn toggled(self) -> Self {
        match self {
            DayNight::Day => DayNight::Night,
            DayNight::Night => DayNight::Day,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RaceEndCause {
    Crash,
    TimeUp,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct StartRace {
    pub duration_seconds: u32,
}

#[derive(Event, Default)]
pub struct ReturnToMenu;

#[derive(Event, Default)]
pub struct ToggleDayNight;

#[derive(Event, Clone, Copy, Debug)]
pub struct RaceEnded {
    pub cause: RaceEndCause,
}

/// How a race finished.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Finish {
    pub score: u32,
    pub new_record: bool,
}

/// Authoritative session record. The Bevy `AppState` follows `phase`.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct Session {
    pub phase: AppState,
    pub score: u32,
    pub high_score: u32,
    pub time_remaining_seconds: u32,
    pub initial_duration_seconds: u32,
    pub day_night: DayNight,
}

impl Default for Session {
    fn default() -> Self {
        let seconds = SimSettings::default().default_race_seconds;
        Self {
            phase: AppState::Menu,
            score: 0,
            high_score: 0,
            time_remaining_seconds: seconds,
            initial_duration_seconds: seconds,
            day_night: DayNight::Day,
        }
    }
}

impl Session {
    pub fn is_playing(&self) -> bool {
        self.phase == AppState::Playing
    }

    /// Begins a race from the menu or the game-over screen. Returns false
    /// when a race is already running.
    pub fn start(&mut self, duration_seconds: u32) -> bool {
        if self.is_playing() {
            return false;
        }
        let seconds = duration_seconds.max(1);
        self.score = 0;
        self.initial_duration_seconds = seconds;
        self.time_remaining_seconds = seconds;
        self.phase = AppState::Playing;
        true
    }

    pub fn add_points(&mut self, points: u32) {
        if self.is_playing() {
            self.score = self.score.saturating_add(points);
        }
    }

    /// One second of race time. True exactly once: on the tick that empties
    /// the clock.
    pub fn tick_second(&mut self) -> bool {
        if !self.is_playing() || self.time_remaining_seconds == 0 {
            return false;
        }
        self.time_remaining_seconds -= 1;
        self.time_remaining_seconds == 0
    }

    /// Ends the running race, whatever the reason. `None` if nothing was
    /// running.
    pub fn end(&mut self) -> Option<Finish> {
        if !self.is_playing() {
            return None;
        }
        self.phase = AppState::GameOver;
        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
        }
        Some(Finish {
            score: self.score,
            new_record,
        })
    }

    pub fn to_menu(&mut self) -> bool {
        if self.phase != AppState::GameOver {
            return false;
        }
        self.phase = AppState::Menu;
        true
    }

    pub fn toggle_day_night(&mut self) {
        self.day_night = self.day_night.toggled();
    }
}

pub(super) fn start_race(
    mut starts: EventReader<StartRace>,
    settings: Res<SimSettings>,
    mut session: ResMut<Session>,
    mut pose: ResMut<VehiclePose>,
    mut corridor: ResMut<Corridor>,
) {
    let Some(request) = starts.read().last().copied() else {
        return;
    };
    if !session.start(request.duration_seconds) {
        return;
    }
    let seconds = session.initial_duration_seconds;
    pose.speed = 0.0;
    corridor.reset(pose.z, &settings);
    info!("race started: {seconds}s on the clock");
}

pub(super) fn finish_race(
    mut ended: EventReader<RaceEnded>,
    mut session: ResMut<Session>,
    mut pose: ResMut<VehiclePose>,
    mut book: ResMut<HighScoreBook>,
) {
    let Some(cause) = ended.read().last().map(|ev| ev.cause) else {
        return;
    };
    let Some(finish) = session.end() else {
        return;
    };
    pose.speed = 0.0;
    if finish.new_record {
        book.record(finish.score);
    }
    info!(
        "race over ({cause:?}): score {}{}",
        finish.score,
        if finish.new_record { ", new record" } else { "" }
    );
}

pub(super) fn return_to_menu(mut requests: EventReader<ReturnToMenu>, mut session: ResMut<Session>) {
    if requests.read().last().is_some() && session.to_menu() {
        debug!("back to menu");
    }
}

pub(super) fn toggle_day_night(mut requests: EventReader<ToggleDayNight>, mut session: ResMut<Session>) {
    for _ in requests.read() {
        session.toggle_day_night();
    }
}

pub(super) fn sync_app_state(
    session: Res<Session>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if *state.get() != session.phase {
        next_state.set(session.phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_resets_score_and_clock() {
        let mut session = Session {
            high_score: 40,
            ..default()
        };
        assert!(session.start(90));
        session.add_points(30);
        session.end();

        assert!(session.start(120));
        assert_eq!(session.phase, AppState::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.time_remaining_seconds, 120);
        assert_eq!(session.initial_duration_seconds, 120);
        assert_eq!(session.high_score, 40);
    }

    #[test]
    fn zero_duration_still_gives_a_positive_clock() {
        let mut session = Session::default();
        session.start(0);
        assert_eq!(session.time_remaining_seconds, 1);
    }

    #[test]
    fn cannot_start_twice() {
        let mut session = Session::default();
        assert!(session.start(60));
        session.add_points(10);
        assert!(!session.start(60));
        assert_eq!(session.score, 10);
    }

    #[test]
    fn full_clock_runs_out_into_game_over() {
        let duration = 60;
        let mut session = Session::default();
        session.start(duration);

        let mut expiries = 0;
        let mut last = session.time_remaining_seconds;
        for _ in 0..duration {
            assert_eq!(session.phase, AppState::Playing);
            if session.tick_second() {
                expiries += 1;
                session.end();
            }
            assert!(session.time_remaining_seconds <= last);
            last = session.time_remaining_seconds;
        }

        assert_eq!(expiries, 1);
        assert_eq!(session.phase, AppState::GameOver);
        assert_eq!(session.time_remaining_seconds, 0);
        assert!(!session.tick_second());
    }

    #[test]
    fn higher_score_becomes_the_record() {
        let mut session = Session {
            high_score: 50,
            ..default()
        };
        session.start(60);
        session.add_points(70);
        let finish = session.end().unwrap();
        assert!(finish.new_record);
        assert_eq!(session.high_score, 70);
    }

    #[test]
    fn equal_or_lower_score_keeps_the_record() {
        for score in [0, 20, 50] {
            let mut session = Session {
                high_score: 50,
                ..default()
            };
            session.start(60);
            session.add_points(score);
            let finish = session.end().unwrap();
            assert!(!finish.new_record);
            assert_eq!(session.high_score, 50);
        }
    }

    #[test]
    fn ending_twice_is_a_no_op() {
        let mut session = Session::default();
        session.start(60);
        assert!(session.end().is_some());
        assert!(session.end().is_none());
        assert_eq!(session.phase, AppState::GameOver);
    }

    #[test]
    fn points_only_count_during_a_race() {
        let mut session = Session::default();
        session.add_points(10);
        assert_eq!(session.score, 0);
        session.start(60);
        session.add_points(10);
        session.end();
        session.add_points(10);
        assert_eq!(session.score, 10);
    }

    #[test]
    fn menu_only_reachable_from_game_over() {
        let mut session = Session::default();
        assert!(!session.to_menu());
        session.start(60);
        assert!(!session.to_menu());
        session.end();
        assert!(session.to_menu());
        assert_eq!(session.phase, AppState::Menu);
    }

    #[test]
    fn day_night_is_independent_of_phase() {
        let mut session = Session::default();
        session.toggle_day_night();
        assert_eq!(session.day_night, DayNight::Night);
        session.start(60);
        session.toggle_day_night();
        assert_eq!(session.day_night, DayNight::Day);
        assert_eq!(session.phase, AppState::Playing);
    }
}
