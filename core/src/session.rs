use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Revealing,
    AwaitingInput,
    Won,
    Lost,
}

impl Step {
    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::AwaitingInput)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Revealing
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Correct,
    Won,
    Lost,
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        use ClickOutcome::*;
        match self {
            Ignored => false,
            Correct => true,
            Won => true,
            Lost => true,
        }
    }
}

type Observer = Box<dyn FnMut(&Snapshot)>;

/// One player's game: current level, its sequence and the reveal timeline driving it.
///
/// Nothing here runs on its own. The owner calls [`LevelSession::advance`] at or after
/// [`LevelSession::next_deadline`] to play the reveal, and forwards clicks to
/// [`LevelSession::handle_click`]. Every reveal timeline is tagged with the epoch of the level
/// start that scheduled it, events from older epochs are dropped.
pub struct LevelSession<C = SystemClock, G = RandomSequenceGenerator> {
    config: SessionConfig,
    clock: C,
    generator: G,
    scheduler: RevealScheduler,
    epoch: Epoch,
    level: Level,
    step: Step,
    sequence: Sequence,
    reveal_cursor: Option<usize>,
    user_clicks: BTreeSet<CellIndex>,
    wrong_click: Option<CellIndex>,
    observers: Vec<Observer>,
}

impl<C: Clock> LevelSession<C, RandomSequenceGenerator> {
    pub fn new(config: SessionConfig, clock: C, seed: u64) -> Self {
        Self::with_generator(config, clock, RandomSequenceGenerator::new(seed))
    }
}

impl<C: Clock, G: SequenceGenerator> LevelSession<C, G> {
    /// Creates the session and starts level 1.
    pub fn with_generator(config: SessionConfig, clock: C, generator: G) -> Self {
        let mut session = Self {
            config,
            clock,
            generator,
            scheduler: RevealScheduler::new(),
            epoch: 0,
            level: 1,
            step: Step::default(),
            sequence: Sequence::default(),
            reveal_cursor: None,
            user_clicks: BTreeSet::new(),
            wrong_click: None,
            observers: Vec::new(),
        };
        session.start_level();
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn reveal_cursor(&self) -> Option<usize> {
        self.reveal_cursor
    }

    pub fn user_clicks(&self) -> &BTreeSet<CellIndex> {
        &self.user_clicks
    }

    pub fn wrong_click(&self) -> Option<CellIndex> {
        self.wrong_click
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn reveal_delay(&self) -> Duration {
        self.config.reveal_delay()
    }

    /// When the next reveal event is due, `None` once the reveal is over.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.config.grid_size(),
            level: self.level,
            step: self.step,
            sequence: self.sequence.clone(),
            reveal_cursor: self.reveal_cursor,
            user_clicks: self.user_clicks.clone(),
            wrong_click: self.wrong_click,
            difficulty: self.config.difficulty(),
            theme: self.config.theme(),
        }
    }

    /// Registers a callback receiving a fresh snapshot after every state change.
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Starts the current level over with a new sequence, dropping any running reveal.
    pub fn start_level(&mut self) {
        let count = self.config.tiles_for_level(self.level);
        let sequence = self
            .generator
            .generate(count, self.config.grid_size())
            .expect("tile count should never exceed the grid");

        self.epoch = self.epoch.wrapping_add(1);
        self.sequence = sequence;
        self.user_clicks.clear();
        self.wrong_click = None;
        self.step = Step::Revealing;
        self.reveal_cursor = (!self.sequence.is_empty()).then_some(0);

        let delay = self.reveal_delay();
        let cancelled =
            self.scheduler
                .schedule(self.epoch, self.clock.now(), self.sequence.len(), delay);
        log::debug!(
            "level {} (epoch {}): revealing {} tiles every {:?}, {} stale events cancelled",
            self.level,
            self.epoch,
            self.sequence.len(),
            delay,
            cancelled
        );
        self.emit();
    }

    /// Applies every reveal event due by now, returns how many changed the state.
    pub fn advance(&mut self) -> usize {
        let now = self.clock.now();
        let mut applied = 0;
        while let Some(scheduled) = self.scheduler.pop_due(now) {
            if self.deliver(scheduled) {
                applied += 1;
            }
        }
        applied
    }

    /// Applies a single reveal event, for drivers that run their own timers.
    ///
    /// Returns `false` when the event was discarded.
    pub fn deliver(&mut self, scheduled: ScheduledEvent) -> bool {
        if scheduled.epoch != self.epoch {
            log::debug!(
                "dropping stale {:?} from epoch {}, current epoch is {}",
                scheduled.event,
                scheduled.epoch,
                self.epoch
            );
            return false;
        }
        if self.step != Step::Revealing {
            log::debug!("dropping {:?}, reveal is already over", scheduled.event);
            return false;
        }

        match scheduled.event {
            RevealEvent::Highlight(index) => {
                if index >= self.sequence.len() {
                    log::warn!(
                        "highlight {} past the end of a {} tile sequence",
                        index,
                        self.sequence.len()
                    );
                    return false;
                }
                self.reveal_cursor = Some(index);
            }
            RevealEvent::Complete => {
                self.reveal_cursor = None;
                self.step = Step::AwaitingInput;
                log::debug!("level {}: awaiting input", self.level);
            }
        }
        self.emit();
        true
    }

    pub fn handle_click(&mut self, cell: CellIndex) -> ClickOutcome {
        use ClickOutcome::*;

        if !self.step.accepts_input() {
            log::trace!("click on {} ignored while {:?}", cell, self.step);
            return Ignored;
        }
        if cell >= self.config.cell_count() {
            log::warn!("click on {} is outside the grid", cell);
            return Ignored;
        }
        if self.user_clicks.contains(&cell) {
            return Ignored;
        }

        let outcome = if self.sequence.contains(cell) {
            self.user_clicks.insert(cell);
            if self.user_clicks.len() == self.sequence.len() {
                self.step = Step::Won;
                log::info!("level {} won", self.level);
                Won
            } else {
                Correct
            }
        } else {
            self.wrong_click = Some(cell);
            self.step = Step::Lost;
            log::info!("level {} lost on cell {}", self.level, cell);
            Lost
        };
        self.emit();
        outcome
    }

    /// Moves on to the next level, only once the current one is won.
    pub fn next_level(&mut self) -> bool {
        if self.step != Step::Won {
            log::trace!("next level ignored while {:?}", self.step);
            return false;
        }
        self.level = self.config.level_after(self.level);
        self.start_level();
        true
    }

    /// Replays level 1, from wherever the player is.
    pub fn retry(&mut self) {
        if self.level != 1 {
            log::debug!("back to level 1 from level {}", self.level);
            self.level = 1;
        }
        self.start_level();
    }

    /// Releases the running reveal, for when the player leaves the game.
    pub fn abandon(&mut self) {
        let cancelled = self.scheduler.cancel();
        self.epoch = self.epoch.wrapping_add(1);
        log::debug!(
            "session abandoned at level {}, {} reveal events released",
            self.level,
            cancelled
        );
    }

    fn emit(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Hands out predefined sequences, in order.
    struct Scripted(VecDeque<Vec<CellIndex>>);

    impl Scripted {
        fn new(script: &[&[CellIndex]]) -> Self {
            Self(script.iter().map(|cells| cells.to_vec()).collect())
        }
    }

    impl SequenceGenerator for Scripted {
        fn generate(&mut self, length: CellCount, grid_size: GridSize) -> Result<Sequence> {
            let cells = self.0.pop_front().expect("script should not run out");
            log::trace!("scripted {:?} for {} tiles", cells, length);
            Sequence::from_cells(cells, grid_size)
        }
    }

    fn easy_session(seed: u64) -> (LevelSession<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let session = LevelSession::new(SessionConfig::default(), clock.clone(), seed);
        (session, clock)
    }

    fn scripted(script: &[&[CellIndex]]) -> (LevelSession<ManualClock, Scripted>, ManualClock) {
        let clock = ManualClock::new();
        let session = LevelSession::with_generator(
            SessionConfig::default(),
            clock.clone(),
            Scripted::new(script),
        );
        (session, clock)
    }

    /// Plays the whole reveal of the current level.
    fn finish_reveal<G: SequenceGenerator>(
        session: &mut LevelSession<ManualClock, G>,
        clock: &ManualClock,
    ) {
        clock.advance(session.reveal_delay() * session.sequence().len() as u32 + REVEAL_TAIL);
        session.advance();
        assert_eq!(session.step(), Step::AwaitingInput);
    }

    fn win_level<G: SequenceGenerator>(
        session: &mut LevelSession<ManualClock, G>,
        clock: &ManualClock,
    ) {
        finish_reveal(session, clock);
        let cells: Vec<_> = session.sequence().iter().collect();
        for cell in cells {
            session.handle_click(cell);
        }
        assert_eq!(session.step(), Step::Won);
    }

    fn outside_of(sequence: &Sequence) -> CellIndex {
        (0..25)
            .find(|&cell| !sequence.contains(cell))
            .expect("a 5x5 grid has more than 10 cells")
    }

    #[test]
    fn level_one_easy_scenario() {
        let (mut session, clock) = easy_session(1);

        assert_eq!(session.level(), 1);
        assert_eq!(session.step(), Step::Revealing);
        assert_eq!(session.sequence().len(), 1);
        assert_eq!(session.reveal_cursor(), Some(0));

        clock.advance_ms(1699);
        session.advance();
        assert_eq!(session.step(), Step::Revealing);

        clock.advance_ms(1);
        session.advance();
        assert_eq!(session.step(), Step::AwaitingInput);
        assert_eq!(session.reveal_cursor(), None);

        let cell = session.sequence().get(0).unwrap();
        assert_eq!(session.handle_click(cell), ClickOutcome::Won);
        assert_eq!(session.step(), Step::Won);
    }

    #[test]
    fn wrong_click_loses() {
        let (mut session, clock) = scripted(&[&[7]]);
        finish_reveal(&mut session, &clock);

        assert_eq!(session.handle_click(3), ClickOutcome::Lost);
        assert_eq!(session.step(), Step::Lost);
        assert_eq!(session.wrong_click(), Some(3));
        assert!(session.user_clicks().is_empty());
    }

    #[test]
    fn wrong_click_loses_after_correct_ones() {
        let (mut session, clock) = scripted(&[&[0], &[4, 9]]);
        win_level(&mut session, &clock);
        session.next_level();
        finish_reveal(&mut session, &clock);

        assert_eq!(session.handle_click(9), ClickOutcome::Correct);
        assert_eq!(session.handle_click(10), ClickOutcome::Lost);
        assert_eq!(session.wrong_click(), Some(10));
        assert_eq!(session.handle_click(4), ClickOutcome::Ignored);
        assert_eq!(session.step(), Step::Lost);
    }

    #[test]
    fn sequence_length_follows_level_until_max_tiles() {
        let (mut session, clock) = easy_session(5);
        for level in 1..=15 {
            assert_eq!(session.level(), level);
            assert_eq!(session.sequence().len(), level.min(10) as usize);
            win_level(&mut session, &clock);
            assert!(session.next_level());
        }
        assert_eq!(session.level(), 16);
    }

    #[test]
    fn level_cap_holds_level_at_max_tiles() {
        let clock = ManualClock::new();
        let config = SessionConfig::new(3, 2).unwrap().with_level_cap(true);
        let mut session = LevelSession::new(config, clock.clone(), 9);
        for _ in 0..4 {
            win_level(&mut session, &clock);
            session.next_level();
        }
        assert_eq!(session.level(), 2);
        assert_eq!(session.sequence().len(), 2);
        assert_eq!(session.step(), Step::Revealing);
    }

    #[test]
    fn levels_past_a_full_grid_replay_the_whole_grid() {
        let clock = ManualClock::new();
        let config = SessionConfig::new_unchecked(2, 10);
        let mut session = LevelSession::new(config, clock.clone(), 6);
        for _ in 0..4 {
            win_level(&mut session, &clock);
            assert!(session.next_level());
        }
        assert_eq!(session.level(), 5);
        assert_eq!(session.sequence().len(), 4);
        win_level(&mut session, &clock);
    }

    #[test]
    fn repeated_click_is_idempotent() {
        let (mut session, clock) = scripted(&[&[0], &[4, 9]]);
        win_level(&mut session, &clock);
        session.next_level();
        finish_reveal(&mut session, &clock);

        assert!(session.handle_click(4).has_update());
        assert!(!session.handle_click(4).has_update());
        assert_eq!(session.user_clicks().len(), 1);
        assert_eq!(session.step(), Step::AwaitingInput);
    }

    #[test]
    fn clicking_every_tile_in_any_order_wins() {
        let (mut session, clock) = easy_session(11);
        for _ in 0..5 {
            win_level(&mut session, &clock);
            session.next_level();
        }
        finish_reveal(&mut session, &clock);

        let mut cells: Vec<_> = session.sequence().iter().collect();
        cells.reverse();
        let last = cells.pop().unwrap();
        for cell in cells {
            assert_eq!(session.handle_click(cell), ClickOutcome::Correct);
        }
        assert_eq!(session.handle_click(last), ClickOutcome::Won);

        let expected: BTreeSet<_> = session.sequence().iter().collect();
        assert_eq!(session.user_clicks(), &expected);
    }

    #[test]
    fn clicks_during_reveal_change_nothing() {
        let (mut session, clock) = easy_session(2);
        let sequence_cell = session.sequence().get(0).unwrap();
        let other_cell = outside_of(session.sequence());

        assert_eq!(session.handle_click(sequence_cell), ClickOutcome::Ignored);
        clock.advance_ms(1600);
        session.advance();
        assert_eq!(session.handle_click(other_cell), ClickOutcome::Ignored);

        assert_eq!(session.step(), Step::Revealing);
        assert!(session.user_clicks().is_empty());
        assert_eq!(session.wrong_click(), None);
    }

    #[test]
    fn clicks_after_the_game_ended_are_ignored() {
        let (mut session, clock) = scripted(&[&[7]]);
        finish_reveal(&mut session, &clock);
        session.handle_click(3);

        assert_eq!(session.handle_click(7), ClickOutcome::Ignored);
        assert_eq!(session.step(), Step::Lost);
        assert!(!session.next_level());
    }

    #[test]
    fn clicks_outside_the_grid_are_ignored() {
        let (mut session, clock) = scripted(&[&[7]]);
        finish_reveal(&mut session, &clock);

        assert_eq!(session.handle_click(25), ClickOutcome::Ignored);
        assert_eq!(session.step(), Step::AwaitingInput);
        assert_eq!(session.wrong_click(), None);
    }

    #[test]
    fn retry_on_level_one_regenerates_sequence() {
        let (mut session, clock) = scripted(&[&[7], &[12]]);
        finish_reveal(&mut session, &clock);
        session.handle_click(3);
        let epoch = session.epoch();

        session.retry();

        assert_eq!(session.level(), 1);
        assert_eq!(session.sequence().as_slice(), &[12]);
        assert_eq!(session.step(), Step::Revealing);
        assert_eq!(session.wrong_click(), None);
        assert!(session.epoch() > epoch);
    }

    #[test]
    fn retry_on_level_five_resets_to_level_one() {
        let (mut session, clock) = easy_session(3);
        for _ in 0..4 {
            win_level(&mut session, &clock);
            session.next_level();
        }
        assert_eq!(session.level(), 5);
        assert_eq!(session.sequence().len(), 5);

        session.retry();

        assert_eq!(session.level(), 1);
        assert_eq!(session.sequence().len(), 1);
        assert_eq!(session.step(), Step::Revealing);
        assert!(session.user_clicks().is_empty());
    }

    #[test]
    fn restart_mid_reveal_drops_old_timeline() {
        let (mut session, clock) = scripted(&[&[0], &[1, 2], &[3]]);
        win_level(&mut session, &clock);
        session.next_level();

        // old level 2 timeline: highlights at 0ms and 1500ms, complete at 3200ms
        clock.advance_ms(1000);
        session.advance();
        session.retry();
        let epoch = session.epoch();
        assert_eq!(session.sequence().as_slice(), &[3]);
        // first highlight of the new timeline is due right away
        assert_eq!(session.advance(), 1);

        // past where the old timeline would have highlighted and completed,
        // the new one completes at 1700ms after the retry
        clock.advance_ms(1600);
        assert_eq!(session.advance(), 0);
        assert_eq!(session.step(), Step::Revealing);
        assert_eq!(session.reveal_cursor(), Some(0));

        clock.advance_ms(100);
        assert_eq!(session.advance(), 1);
        assert_eq!(session.step(), Step::AwaitingInput);
        assert_eq!(session.epoch(), epoch);
    }

    #[test]
    fn late_delivery_from_old_epoch_is_discarded() {
        let (mut session, clock) = scripted(&[&[5], &[6]]);
        let stale_complete = ScheduledEvent {
            epoch: session.epoch(),
            due: clock.now(),
            event: RevealEvent::Complete,
        };
        let stale_highlight = ScheduledEvent {
            event: RevealEvent::Highlight(0),
            ..stale_complete
        };

        session.retry();

        assert!(!session.deliver(stale_complete));
        assert!(!session.deliver(stale_highlight));
        assert_eq!(session.step(), Step::Revealing);
        assert_eq!(session.sequence().as_slice(), &[6]);

        finish_reveal(&mut session, &clock);
        let current_complete = ScheduledEvent {
            epoch: session.epoch(),
            due: clock.now(),
            event: RevealEvent::Complete,
        };
        assert!(!session.deliver(current_complete));
    }

    #[test]
    fn abandon_releases_pending_events() {
        let (mut session, clock) = easy_session(4);
        assert!(session.next_deadline().is_some());

        session.abandon();

        assert_eq!(session.next_deadline(), None);
        clock.advance_ms(10_000);
        assert_eq!(session.advance(), 0);
        assert_eq!(session.step(), Step::Revealing);
    }

    #[test]
    fn subscribers_see_every_transition() {
        let (mut session, clock) = scripted(&[&[7, 8]]);
        let seen: Rc<RefCell<Vec<Step>>> = Rc::default();
        let sink = seen.clone();
        session.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.step));

        // level 1 was scripted with two tiles to exercise highlight events
        clock.advance_ms(1500);
        session.advance();
        clock.advance_ms(1700);
        session.advance();
        session.handle_click(7);
        session.handle_click(8);

        assert_eq!(
            *seen.borrow(),
            vec![
                Step::Revealing,
                Step::Revealing,
                Step::AwaitingInput,
                Step::AwaitingInput,
                Step::Won
            ]
        );
    }
}
