//! Session worker that owns the authoritative [`combat_core::CombatState`].
//!
//! Receives commands from [`RuntimeHandle`], executes actions through
//! [`combat_core::CombatEngine`], and publishes events to the bus. The
//! channel serializes every mutation, so no locks guard the state.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use combat_core::{
    Action, ActionResult, CombatEngine, CombatState, ErrorSeverity, SessionSnapshot,
};

use crate::api::{Result, RuntimeError};
use crate::events::{CombatEvent, EventBus};
use crate::notify::{InitiativeRollNote, NotificationSink};
use crate::oracle::OracleManager;

/// Commands that can be sent to the session worker.
pub enum Command {
    /// Execute an action against the live session.
    ExecuteAction {
        action: Action,
        reply: oneshot::Sender<Result<ActionResult>>,
    },
    /// Query the current state (read-only clone).
    QueryState { reply: oneshot::Sender<CombatState> },
    /// Replace the live session with a restored snapshot.
    RestoreSnapshot {
        snapshot: SessionSnapshot,
        reply: oneshot::Sender<()>,
    },
}

/// Background task that processes session commands.
///
/// Each execution runs against a clone of the committed state and commits
/// the clone back only on success, so a rejected or failed action can never
/// leave the session half-mutated.
pub struct SessionWorker {
    state: CombatState,
    oracles: OracleManager,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    notifier: Arc<dyn NotificationSink>,
    /// Publishes the committed action nonce for the autosave worker.
    revision_tx: watch::Sender<u64>,
}

impl SessionWorker {
    pub fn new(
        state: CombatState,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        notifier: Arc<dyn NotificationSink>,
        revision_tx: watch::Sender<u64>,
    ) -> Self {
        info!(
            target: "runtime::session",
            in_combat = state.is_in_combat,
            combatants = state.turn_order.len(),
            nonce = state.action_nonce,
            "session worker initialized"
        );
        Self {
            state,
            oracles,
            command_rx,
            event_bus,
            notifier,
            revision_tx,
        }
    }

    /// Main worker loop; runs until every command sender is gone.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "runtime::session", "command channel closed, session worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::ExecuteAction { action, reply } => {
                let result = self.execute(action);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::session", "execute reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!(target: "runtime::session", "query reply channel closed (caller dropped)");
                }
            }
            Command::RestoreSnapshot { snapshot, reply } => {
                self.state = snapshot.restore();
                let _ = self.revision_tx.send(self.state.action_nonce);
                info!(
                    target: "runtime::session",
                    in_combat = self.state.is_in_combat,
                    round = self.state.round,
                    combatants = self.state.turn_order.len(),
                    "session restored from snapshot"
                );
                let _ = reply.send(());
            }
        }
    }

    /// Executes one action with commit-on-success semantics.
    fn execute(&mut self, action: Action) -> Result<ActionResult> {
        let kind = action.as_snake_case();
        let mut working = self.state.clone();

        let outcome = {
            let env = self.oracles.as_combat_env();
            let mut engine = CombatEngine::new(&mut working);
            engine.execute(&env, &action)
        };

        match outcome {
            Ok(result) => {
                self.state = working;
                let _ = self.revision_tx.send(self.state.action_nonce);
                debug!(
                    target: "runtime::session",
                    action = kind,
                    nonce = self.state.action_nonce,
                    "action committed"
                );
                self.publish(&result);
                Ok(result)
            }
            Err(error) => {
                // Validation rejections are ordinary player mistakes; only
                // wiring-level failures deserve a warning.
                if error.severity().is_recoverable() {
                    debug!(
                        target: "runtime::session",
                        action = kind,
                        phase = %error.phase(),
                        error = %error,
                        "action rejected"
                    );
                } else {
                    warn!(
                        target: "runtime::session",
                        action = kind,
                        phase = %error.phase(),
                        severity = %error.severity(),
                        error = %error,
                        "action failed"
                    );
                }
                Err(RuntimeError::Engine(error))
            }
        }
    }

    /// Publishes bus events and notifications for a committed result.
    fn publish(&self, result: &ActionResult) {
        match result {
            // A start that resolved nobody left the session untouched;
            // nothing to announce.
            ActionResult::CombatStarted(started) if started.started => {
                self.event_bus.publish(CombatEvent::Started {
                    order: started.rolls.clone(),
                    round: self.state.round,
                });
                for roll in &started.rolls {
                    self.notifier.notify(InitiativeRollNote::from_roll(roll));
                }
            }
            ActionResult::TurnAdvanced(advanced) => {
                for failure in &advanced.side_effects.failures {
                    warn!(
                        target: "runtime::session",
                        token = %advanced.next_token,
                        failure = %failure,
                        "turn-start collaborator failed"
                    );
                }
                self.event_bus.publish(CombatEvent::TurnChanged {
                    ended: advanced.ended_token.clone(),
                    next: advanced.next_token.clone(),
                    round: advanced.round,
                    wrapped: advanced.round_advanced,
                });
                self.notifier.notify(InitiativeRollNote::from_roll(&advanced.roll));
            }
            ActionResult::CombatEnded | ActionResult::CombatReset => {
                self.event_bus.publish(CombatEvent::Ended);
            }
            ActionResult::ActionPointsSpent(spent) => {
                self.event_bus.publish(CombatEvent::ActionPointsSpent {
                    token_id: spent.token_id.clone(),
                    amount: spent.amount,
                    remaining: spent.remaining,
                });
            }
            // A confirmed move spends points too; surface it on the same
            // economy topic.
            ActionResult::MoveConfirmed(confirmed) if confirmed.ap_cost > 0 => {
                self.event_bus.publish(CombatEvent::ActionPointsSpent {
                    token_id: confirmed.token_id.clone(),
                    amount: confirmed.ap_cost,
                    remaining: confirmed.remaining_action_points,
                });
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use crate::notify::TracingSink;
    use combat_core::{CreatureRecord, StartCombatAction, TokenId, TokenRef};

    fn record(name: &str, agility: i32) -> CreatureRecord {
        CreatureRecord {
            name: name.to_owned(),
            agility,
            initiative_mod: None,
            speed_feet: None,
            max_action_points: None,
            token_icon: None,
            token_border: None,
            max_hp: None,
            max_mana: None,
        }
    }

    fn token(id: &str, creature: &str) -> TokenRef {
        TokenRef {
            token_id: TokenId::from(id),
            creature_id: Some(creature.into()),
            player_id: None,
            is_player_token: false,
        }
    }

    fn worker() -> (SessionWorker, watch::Receiver<u64>) {
        let oracles = OracleManager::in_memory();
        oracles.creatures().insert("goblin", record("Goblin", 14));
        oracles.creatures().insert("wolf", record("Wolf", 10));

        let (_command_tx, command_rx) = mpsc::channel(4);
        let (revision_tx, revision_rx) = watch::channel(0);
        let worker = SessionWorker::new(
            CombatState::with_seed(42),
            oracles,
            command_rx,
            EventBus::with_capacity(16),
            Arc::new(TracingSink),
            revision_tx,
        );
        (worker, revision_rx)
    }

    fn start_action(ids: &[(&str, &str)]) -> Action {
        Action::StartCombat(StartCombatAction {
            tokens: ids.iter().map(|(id, creature)| token(id, creature)).collect(),
            now_ms: 1_000,
        })
    }

    #[test]
    fn commit_bumps_the_revision_and_publishes() {
        let (mut worker, revision_rx) = worker();
        let mut session_rx = worker.event_bus.subscribe(Topic::Session);

        let result = worker
            .execute(start_action(&[("a", "goblin"), ("b", "wolf")]))
            .unwrap();

        let ActionResult::CombatStarted(started) = result else {
            panic!("expected a combat-started result");
        };
        assert_eq!(started.rolls.len(), 2);
        assert!(worker.state.is_in_combat);
        assert_eq!(*revision_rx.borrow(), 1);

        let event = session_rx.try_recv().unwrap();
        assert!(matches!(event, CombatEvent::Started { round: 1, .. }));
    }

    #[test]
    fn a_start_that_resolves_nobody_stays_silent() {
        let (mut worker, _revision_rx) = worker();
        let mut session_rx = worker.event_bus.subscribe(Topic::Session);

        let result = worker.execute(start_action(&[("a", "missing")])).unwrap();

        let ActionResult::CombatStarted(started) = result else {
            panic!("expected a combat-started result");
        };
        assert!(!started.started);
        assert!(!worker.state.is_in_combat);
        assert!(session_rx.try_recv().is_err());
    }

    #[test]
    fn rejection_leaves_state_and_revision_untouched() {
        let (mut worker, revision_rx) = worker();
        let baseline = worker.state.clone();

        let error = worker
            .execute(Action::NextTurn(combat_core::NextTurnAction { now_ms: 0 }))
            .unwrap_err();

        assert!(matches!(error, RuntimeError::Engine(_)));
        assert_eq!(worker.state, baseline);
        assert_eq!(*revision_rx.borrow(), 0);
    }

    #[test]
    fn restore_swaps_the_live_session() {
        let (mut worker, revision_rx) = worker();
        worker
            .execute(start_action(&[("a", "goblin")]))
            .unwrap();

        let mut saved = CombatState::with_seed(7);
        saved.is_in_combat = true;
        saved.round = 6;
        saved.action_nonce = 40;
        let snapshot = SessionSnapshot::capture(&saved);

        let (reply_tx, mut reply_rx) = oneshot::channel();
        worker.handle_command(Command::RestoreSnapshot {
            snapshot,
            reply: reply_tx,
        });

        assert!(reply_rx.try_recv().is_ok());
        assert_eq!(worker.state.round, 6);
        assert_eq!(*revision_rx.borrow(), 40);
    }

    #[test]
    fn move_confirm_surfaces_on_the_economy_topic() {
        let (mut worker, _revision_rx) = worker();
        worker
            .execute(start_action(&[("a", "goblin")]))
            .unwrap();
        let mut economy_rx = worker.event_bus.subscribe(Topic::Economy);

        worker
            .execute(Action::ConfirmMove(combat_core::ConfirmMoveAction {
                token_id: TokenId::from("a"),
                ap_cost: 1,
                total_distance_feet: 15.0,
            }))
            .unwrap();

        let event = economy_rx.try_recv().unwrap();
        assert!(matches!(
            event,
            CombatEvent::ActionPointsSpent { amount: 1, .. }
        ));
    }
}
