//! Session state machine.
//!
//! `Idle -> CountingDown -> Active -> Completed`. Inside `Active` a session
//! alternates between awaiting an answer (`feedback` unset) and showing
//! feedback (`feedback` set) until a scheduled advance picks the next item.
//!
//! The controller never reads the clock itself: every operation takes the
//! current `Instant`, and delayed transitions are fired by [`SessionController::tick`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::catalog::{Catalog, CatalogItem, ItemId};
use crate::config::Config;
use crate::engine::picker::{classification_options, generate_options, pick_next};
use crate::engine::{ChunkInfo, Difficulty, active_pool, current_chunk};
use crate::session::result::SessionResult;
use crate::session::state::{Choice, Feedback, Phase, SessionState};
use crate::session::timer::{TimerKind, TimerQueue};

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub countdown_secs: u32,
    pub correct_delay: Duration,
    pub incorrect_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            correct_delay: Duration::from_millis(1000),
            incorrect_delay: Duration::from_millis(2500),
        }
    }
}

impl Timing {
    pub fn from_config(config: &Config) -> Self {
        Self {
            countdown_secs: config.countdown_secs,
            correct_delay: Duration::from_millis(config.correct_delay_ms),
            incorrect_delay: Duration::from_millis(config.incorrect_delay_ms),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The answer arrived when no answer was expected.
    Ignored,
    Answered(Feedback),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    CountdownTick { remaining: u32 },
    Started,
    Advanced(ItemId),
    Completed(SessionResult),
}

pub struct SessionController {
    catalog: Arc<Catalog>,
    state: SessionState,
    timers: TimerQueue,
    timing: Timing,
    rng: SmallRng,
}

impl SessionController {
    pub fn new(catalog: Arc<Catalog>, difficulty: Difficulty, timing: Timing) -> Self {
        Self::with_rng(catalog, difficulty, timing, SmallRng::from_entropy())
    }

    pub fn with_rng(
        catalog: Arc<Catalog>,
        difficulty: Difficulty,
        timing: Timing,
        rng: SmallRng,
    ) -> Self {
        let difficulty = Difficulty::clamped(catalog.domain(), difficulty.level());
        let state = SessionState::new(&catalog, difficulty);
        Self {
            catalog,
            state,
            timers: TimerQueue::default(),
            timing,
            rng,
        }
    }

    /// Reset every card and begin a new session. Timers scheduled by any
    /// earlier session are invalidated by the generation bump.
    pub fn start(&mut self, difficulty: Difficulty, now: Instant) -> Vec<SessionEvent> {
        let domain = self.catalog.domain();
        let generation = self.state.generation + 1;
        self.state = SessionState::new(&self.catalog, Difficulty::clamped(domain, difficulty.level()));
        self.state.generation = generation;

        tracing::info!(
            domain = %domain,
            difficulty = %self.state.difficulty,
            generation,
            items = self.catalog.len(),
            "session started"
        );

        if self.timing.countdown_secs == 0 {
            return self.activate(now);
        }
        self.state.phase = Phase::CountingDown {
            remaining: self.timing.countdown_secs,
        };
        self.timers
            .schedule(generation, now + COUNTDOWN_STEP, TimerKind::CountdownStep);
        vec![SessionEvent::CountdownTick {
            remaining: self.timing.countdown_secs,
        }]
    }

    pub fn submit(&mut self, choice: &Choice, now: Instant) -> SubmitOutcome {
        if self.state.phase != Phase::Active || self.state.feedback.is_some() {
            tracing::trace!(phase = ?self.state.phase, "answer ignored: not awaiting an answer");
            return SubmitOutcome::Ignored;
        }
        let Some(id) = self.state.current_item.clone() else {
            tracing::trace!("answer ignored: no current item");
            return SubmitOutcome::Ignored;
        };
        let Some(item) = self.catalog.get(&id) else {
            return SubmitOutcome::Ignored;
        };

        let Some(is_correct) = choice.answers(item) else {
            tracing::trace!(item = %id, "answer ignored: wrong answer shape for domain");
            return SubmitOutcome::Ignored;
        };
        let correct_answer_label = (!is_correct).then(|| correct_label(item));

        self.state.attempts += 1;
        if is_correct {
            self.state.correct += 1;
        }
        let streak = self
            .state
            .cards
            .record_answer(&id, is_correct)
            .map_or(0, |c| c.streak);
        if self.state.cards.all_mastered() {
            self.state.finished_at.get_or_insert(now);
        }

        tracing::debug!(item = %id, correct = is_correct, streak, "answer recorded");

        let delay = if is_correct {
            self.timing.correct_delay
        } else {
            self.timing.incorrect_delay
        };
        self.timers
            .schedule(self.state.generation, now + delay, TimerKind::Advance);

        let feedback = Feedback {
            correct: is_correct,
            correct_answer_label,
        };
        self.state.feedback = Some(feedback.clone());
        SubmitOutcome::Answered(feedback)
    }

    /// Fire every timer due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for timer in self.timers.drain_due(now) {
            if timer.generation != self.state.generation {
                tracing::trace!(
                    stale = timer.generation,
                    current = self.state.generation,
                    "discarding timer from a superseded session"
                );
                continue;
            }
            match timer.kind {
                TimerKind::CountdownStep => {
                    let Phase::CountingDown { remaining } = self.state.phase else {
                        continue;
                    };
                    let remaining = remaining.saturating_sub(1);
                    if remaining == 0 {
                        events.extend(self.activate(timer.due));
                    } else {
                        self.state.phase = Phase::CountingDown { remaining };
                        self.timers.schedule(
                            self.state.generation,
                            timer.due + COUNTDOWN_STEP,
                            TimerKind::CountdownStep,
                        );
                        events.push(SessionEvent::CountdownTick { remaining });
                    }
                }
                TimerKind::Advance => {
                    if self.state.phase == Phase::Active {
                        events.extend(self.advance(timer.due));
                    }
                }
            }
        }
        events
    }

    /// Leave the current session. Returns a partial result when the session
    /// was in play.
    pub fn abandon(&mut self, now: Instant) -> Option<SessionResult> {
        let result = (self.state.phase == Phase::Active)
            .then(|| SessionResult::from_state(&self.state, now));
        if self.state.phase != Phase::Idle {
            tracing::info!(
                domain = %self.state.domain,
                generation = self.state.generation,
                "session abandoned"
            );
        }
        self.state.generation += 1;
        self.state.phase = Phase::Idle;
        self.state.current_item = None;
        self.state.current_options.clear();
        self.state.feedback = None;
        result
    }

    fn activate(&mut self, now: Instant) -> Vec<SessionEvent> {
        self.state.phase = Phase::Active;
        self.state.started_at = Some(now);
        let mut events = vec![SessionEvent::Started];
        events.extend(self.advance(now));
        events
    }

    /// Clear feedback and show the next item, or complete the session when
    /// nothing is left to practice.
    fn advance(&mut self, now: Instant) -> Option<SessionEvent> {
        self.state.feedback = None;
        let pool = active_pool(&self.state.cards, self.state.difficulty);
        let next = pick_next(&pool, self.state.current_item.as_ref(), &mut self.rng);

        match next {
            Some(id) => {
                self.state.current_options = self.options_for(&id);
                self.state.current_item = Some(id.clone());
                Some(SessionEvent::Advanced(id))
            }
            None if self.state.cards.all_mastered() => {
                self.state.phase = Phase::Completed;
                self.state.current_item = None;
                self.state.current_options.clear();
                self.state.finished_at.get_or_insert(now);
                let result = SessionResult::from_state(&self.state, now);
                tracing::info!(
                    domain = %result.domain,
                    difficulty = result.difficulty,
                    elapsed_secs = result.elapsed_seconds(),
                    attempts = result.attempts,
                    "session completed"
                );
                Some(SessionEvent::Completed(result))
            }
            None => {
                tracing::warn!("active pool empty while cards remain unmastered");
                None
            }
        }
    }

    fn options_for(&mut self, id: &ItemId) -> Vec<Choice> {
        match self.catalog.get(id) {
            Some(item) if self.catalog.domain().uses_item_options() => {
                generate_options(item, &self.catalog, &mut self.rng)
                    .into_iter()
                    .map(Choice::Item)
                    .collect()
            }
            _ => classification_options(self.state.difficulty, &mut self.rng)
                .into_iter()
                .map(Choice::Classification)
                .collect(),
        }
    }

    /// Applies from the next `start`.
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_item(&self) -> Option<&CatalogItem> {
        self.state
            .current_item
            .as_ref()
            .and_then(|id| self.catalog.get(id))
    }

    pub fn options(&self) -> &[Choice] {
        &self.state.current_options
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.state.feedback.as_ref()
    }

    pub fn streak(&self) -> u32 {
        self.state.current_streak()
    }

    /// Mastered cards over total cards.
    pub fn progress(&self) -> (usize, usize) {
        (self.state.cards.mastered_count(), self.state.cards.len())
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        match self.state.phase {
            Phase::CountingDown { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub fn chunk(&self) -> Option<ChunkInfo> {
        current_chunk(&self.state.cards, self.state.difficulty)
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        self.state.elapsed_secs(now)
    }
}

fn correct_label(item: &CatalogItem) -> String {
    match item {
        CatalogItem::Classification(it) => it.classification.label(),
        other => other.display_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Classification, ClassificationItem, Domain};

    fn catalog() -> Arc<Catalog> {
        let items = [
            ("1", Classification::XDominant),
            ("2", Classification::XRecessive),
            ("3", Classification::AutoRecessive),
            ("4", Classification::AutoDominant),
        ]
        .into_iter()
        .map(|(id, classification)| {
            CatalogItem::Classification(ClassificationItem {
                id: ItemId::new(id),
                display_name: format!("Disease {id}"),
                classification,
            })
        })
        .collect();
        Arc::new(Catalog::new(Domain::Classification, items).unwrap())
    }

    fn controller(countdown_secs: u32) -> SessionController {
        let timing = Timing {
            countdown_secs,
            ..Timing::default()
        };
        SessionController::with_rng(
            catalog(),
            Difficulty::clamped(Domain::Classification, 3),
            timing,
            SmallRng::seed_from_u64(17),
        )
    }

    fn right_answer(ctl: &SessionController) -> Choice {
        Choice::Classification(ctl.current_item().unwrap().classification().unwrap())
    }

    fn wrong_answer(ctl: &SessionController) -> Choice {
        let right = ctl.current_item().unwrap().classification().unwrap();
        let wrong = Classification::ALL
            .into_iter()
            .find(|c| *c != right)
            .unwrap();
        Choice::Classification(wrong)
    }

    #[test]
    fn test_countdown_then_active() {
        let mut ctl = controller(3);
        let t0 = Instant::now();
        let events = ctl.start(Difficulty::clamped(Domain::Classification, 3), t0);
        assert_eq!(events, vec![SessionEvent::CountdownTick { remaining: 3 }]);
        assert_eq!(ctl.phase(), Phase::CountingDown { remaining: 3 });

        assert!(ctl.tick(t0 + Duration::from_millis(500)).is_empty());
        ctl.tick(t0 + Duration::from_secs(1));
        assert_eq!(ctl.phase(), Phase::CountingDown { remaining: 2 });
        ctl.tick(t0 + Duration::from_secs(2));
        let events = ctl.tick(t0 + Duration::from_secs(3));
        assert_eq!(events[0], SessionEvent::Started);
        assert!(matches!(events[1], SessionEvent::Advanced(_)));
        assert_eq!(ctl.phase(), Phase::Active);
        assert_eq!(ctl.state().started_at, Some(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_countdown_starts_immediately() {
        let mut ctl = controller(0);
        let events = ctl.start(Difficulty::clamped(Domain::Classification, 3), Instant::now());
        assert_eq!(events[0], SessionEvent::Started);
        assert_eq!(ctl.phase(), Phase::Active);
        assert!(ctl.current_item().is_some());
        assert_eq!(ctl.options().len(), 4);
    }

    #[test]
    fn test_submit_ignored_outside_active() {
        let mut ctl = controller(3);
        let t0 = Instant::now();
        assert_eq!(
            ctl.submit(&Choice::Classification(Classification::XDominant), t0),
            SubmitOutcome::Ignored
        );
        ctl.start(Difficulty::clamped(Domain::Classification, 3), t0);
        assert_eq!(
            ctl.submit(&Choice::Classification(Classification::XDominant), t0),
            SubmitOutcome::Ignored
        );
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let mut ctl = controller(0);
        let t0 = Instant::now();
        ctl.start(Difficulty::clamped(Domain::Classification, 3), t0);
        let answer = right_answer(&ctl);
        assert!(matches!(ctl.submit(&answer, t0), SubmitOutcome::Answered(_)));
        assert_eq!(ctl.submit(&answer, t0), SubmitOutcome::Ignored);
        assert_eq!(ctl.state().attempts, 1);
    }

    #[test]
    fn test_wrong_shape_is_ignored() {
        let mut ctl = controller(0);
        let t0 = Instant::now();
        ctl.start(Difficulty::clamped(Domain::Classification, 3), t0);
        let outcome = ctl.submit(&Choice::Item(ItemId::new("1")), t0);
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(ctl.feedback().is_none());
    }

    #[test]
    fn test_wrong_answer_shows_label_and_waits_longer() {
        let mut ctl = controller(0);
        let t0 = Instant::now();
        ctl.start(Difficulty::clamped(Domain::Classification, 3), t0);
        let expected = ctl.current_item().unwrap().classification().unwrap().label();
        let answer = wrong_answer(&ctl);

        let SubmitOutcome::Answered(feedback) = ctl.submit(&answer, t0) else {
            panic!("answer should be accepted");
        };
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_answer_label, Some(expected));

        // Still showing feedback after the short delay.
        assert!(ctl.tick(t0 + Duration::from_millis(1000)).is_empty());
        assert!(ctl.feedback().is_some());

        let events = ctl.tick(t0 + Duration::from_millis(2500));
        assert!(matches!(events[0], SessionEvent::Advanced(_)));
        assert!(ctl.feedback().is_none());
    }

    #[test]
    fn test_correct_answer_has_no_label_and_advances_without_repeat() {
        let mut ctl = controller(0);
        let t0 = Instant::now();
        ctl.start(Difficulty::clamped(Domain::Classification, 3), t0);
        let first = ctl.state().current_item.clone();
        let SubmitOutcome::Answered(feedback) = ctl.submit(&right_answer(&ctl), t0) else {
            panic!("answer should be accepted");
        };
        assert!(feedback.correct);
        assert_eq!(feedback.correct_answer_label, None);
        assert_eq!(ctl.state().current_streak(), 1);

        ctl.tick(t0 + Duration::from_millis(1000));
        assert_ne!(ctl.state().current_item, first);
    }

    #[test]
    fn test_restart_discards_stale_advance() {
        let mut ctl = controller(0);
        let t0 = Instant::now();
        ctl.start(Difficulty::clamped(Domain::Classification, 3), t0);
        ctl.submit(&right_answer(&ctl), t0);

        // Restart before the pending advance fires.
        ctl.start(Difficulty::clamped(Domain::Classification, 3), t0 + Duration::from_millis(100));
        let item_after_restart = ctl.state().current_item.clone();
        assert_eq!(ctl.state().cards.mastered_count(), 0);
        assert!(ctl.state().cards.cards().iter().all(|c| c.streak == 0));

        let events = ctl.tick(t0 + Duration::from_millis(1100));
        assert!(events.is_empty());
        assert_eq!(ctl.state().current_item, item_after_restart);
    }

    #[test]
    fn test_abandon_returns_partial_result() {
        let mut ctl = controller(0);
        let t0 = Instant::now();
        ctl.start(Difficulty::clamped(Domain::Classification, 3), t0);
        ctl.submit(&right_answer(&ctl), t0);

        let result = ctl.abandon(t0 + Duration::from_secs(42)).unwrap();
        assert!(!result.completed);
        assert_eq!(result.elapsed_seconds(), 42);
        assert_eq!(result.attempts, 1);
        assert_eq!(ctl.phase(), Phase::Idle);

        // Pending advance belongs to the abandoned session.
        assert!(ctl.tick(t0 + Duration::from_secs(60)).is_empty());
        assert!(ctl.abandon(t0 + Duration::from_secs(61)).is_none());
    }

    #[test]
    fn test_twelve_correct_answers_complete() {
        let mut ctl = controller(0);
        let mut now = Instant::now();
        ctl.start(Difficulty::clamped(Domain::Classification, 3), now);

        let mut completed = None;
        for _ in 0..12 {
            assert!(!ctl.state().is_completed());
            ctl.submit(&right_answer(&ctl), now);
            now += Duration::from_millis(1000);
            for event in ctl.tick(now) {
                if let SessionEvent::Completed(result) = event {
                    completed = Some(result);
                }
            }
        }
        let result = completed.expect("session should complete after 12 correct answers");
        assert!(result.completed);
        assert_eq!(result.attempts, 12);
        assert_eq!(result.mastered, 4);
        assert!(ctl.state().is_completed());
        assert!(ctl.current_item().is_none());
    }
}
