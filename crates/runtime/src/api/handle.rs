//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting actions, querying session state, and streaming events from
//! specific topics.

use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{
    Action, ActionResult, CombatStarted, CombatState, ConfirmMoveAction, EndCombatAction,
    ForceResetAction, MoveConfirmed, MoveValidation, NextTurnAction, Position, SessionSnapshot,
    SpendActionPointsAction, StartCombatAction, TokenId, TokenRef, TurnAdvanced,
    ValidateMoveAction,
};

use super::errors::{Result, RuntimeError};
use crate::events::{CombatEvent, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Submits any action and returns its typed result.
    ///
    /// Rejections come back as [`RuntimeError::Engine`]; the committed
    /// session state is untouched on any error.
    pub async fn submit(&self, action: Action) -> Result<ActionResult> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::ExecuteAction {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Rolls initiative for the nominated tokens and starts combat.
    pub async fn start_combat(
        &self,
        tokens: Vec<TokenRef>,
        now_ms: u64,
    ) -> Result<CombatStarted> {
        match self
            .submit(Action::StartCombat(StartCombatAction { tokens, now_ms }))
            .await?
        {
            ActionResult::CombatStarted(started) => Ok(started),
            _ => Err(RuntimeError::UnexpectedResult {
                action: "start_combat",
            }),
        }
    }

    /// Hands the turn to the next combatant.
    pub async fn next_turn(&self, now_ms: u64) -> Result<TurnAdvanced> {
        match self
            .submit(Action::NextTurn(NextTurnAction { now_ms }))
            .await?
        {
            ActionResult::TurnAdvanced(advanced) => Ok(advanced),
            _ => Err(RuntimeError::UnexpectedResult { action: "next_turn" }),
        }
    }

    /// Ends combat and clears the session.
    pub async fn end_combat(&self) -> Result<()> {
        match self.submit(Action::EndCombat(EndCombatAction)).await? {
            ActionResult::CombatEnded => Ok(()),
            _ => Err(RuntimeError::UnexpectedResult { action: "end_combat" }),
        }
    }

    /// Resets the session unconditionally, recovering a degraded state.
    pub async fn force_reset(&self) -> Result<()> {
        match self.submit(Action::ForceReset(ForceResetAction)).await? {
            ActionResult::CombatReset => Ok(()),
            _ => Err(RuntimeError::UnexpectedResult {
                action: "force_reset",
            }),
        }
    }

    /// Spends action points from a combatant's pool, flooring at zero.
    pub async fn spend_action_points(&self, token_id: TokenId, amount: u32) -> Result<u32> {
        match self
            .submit(Action::SpendActionPoints(SpendActionPointsAction {
                token_id,
                amount,
            }))
            .await?
        {
            ActionResult::ActionPointsSpent(spent) => Ok(spent.remaining),
            _ => Err(RuntimeError::UnexpectedResult {
                action: "spend_action_points",
            }),
        }
    }

    /// Quotes the action-point cost of a proposed drag.
    pub async fn validate_move(
        &self,
        token_id: TokenId,
        drag_start: Position,
        end_position: Position,
    ) -> Result<MoveValidation> {
        match self
            .submit(Action::ValidateMove(ValidateMoveAction {
                token_id,
                drag_start,
                end_position,
            }))
            .await?
        {
            ActionResult::MoveValidated(validation) => Ok(validation),
            _ => Err(RuntimeError::UnexpectedResult {
                action: "validate_move",
            }),
        }
    }

    /// Commits a quoted move, spending the approved cost.
    pub async fn confirm_move(
        &self,
        token_id: TokenId,
        ap_cost: u32,
        total_distance_feet: f64,
    ) -> Result<MoveConfirmed> {
        match self
            .submit(Action::ConfirmMove(ConfirmMoveAction {
                token_id,
                ap_cost,
                total_distance_feet,
            }))
            .await?
        {
            ActionResult::MoveConfirmed(confirmed) => Ok(confirmed),
            _ => Err(RuntimeError::UnexpectedResult {
                action: "confirm_move",
            }),
        }
    }

    /// Queries the current combat state (a consistent snapshot clone).
    pub async fn query_state(&self) -> Result<CombatState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Replaces the live session with a restored snapshot.
    pub async fn restore_snapshot(&self, snapshot: SessionSnapshot) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::RestoreSnapshot {
                snapshot,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribes to events from a specific topic.
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - combat started, ended, reset
    /// - `Topic::Turns` - turn hand-offs and round changes
    /// - `Topic::Economy` - action-point movements
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribes to multiple topics at once.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<CombatEvent>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Direct access to the event bus for advanced usage.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
